//! Byte layout of individual STL records.
//!
//! Binary record (50 bytes, little-endian):
//! - 12 bytes: normal (3 × f32), always zero
//! - 36 bytes: 3 vertices (3 × 3 × f32)
//! - 2 bytes: attribute byte count, always zero

use std::io::{self, Write};

use terrain_types::Vertex;

/// 80-byte free-form header plus the 4-byte triangle count.
pub const BINARY_HEADER_LEN: usize = 84;

/// Byte offset of the little-endian u32 triangle count.
pub const COUNT_OFFSET: u64 = 80;

pub const BINARY_RECORD_LEN: usize = 50;

pub(crate) const SOLID_NAME: &str = "stlobject";

/// Header with a zero count placeholder.
pub(crate) fn write_binary_header<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(&[0u8; BINARY_HEADER_LEN])
}

pub(crate) fn write_binary_record<W: Write>(out: &mut W, vertices: &[Vertex; 3]) -> io::Result<()> {
    let mut record = [0u8; BINARY_RECORD_LEN];
    // Normal stays zeroed.
    let mut at = 12;
    for v in vertices {
        for c in v.to_array() {
            record[at..at + 4].copy_from_slice(&c.to_le_bytes());
            at += 4;
        }
    }
    // Attribute bytes stay zeroed.
    out.write_all(&record)
}

pub(crate) fn write_ascii_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "solid {SOLID_NAME}")
}

pub(crate) fn write_ascii_record<W: Write>(out: &mut W, vertices: &[Vertex; 3]) -> io::Result<()> {
    out.write_all(b"  facet normal 0 0 0\n    outer loop\n")?;
    for v in vertices {
        writeln!(out, "      vertex {} {} {}", v.x, v.y, v.z)?;
    }
    out.write_all(b"    endloop\n  endfacet\n")
}

/// Closing line, no trailing newline.
pub(crate) fn write_ascii_footer<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "endsolid {SOLID_NAME}")
}

/// Triangle count stored in a binary STL, `None` if `bytes` is too short.
pub fn binary_triangle_count(bytes: &[u8]) -> Option<u32> {
    let field = bytes.get(COUNT_OFFSET as usize..BINARY_HEADER_LEN)?;
    Some(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}
