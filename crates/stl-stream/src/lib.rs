//! Streaming STL output.
//!
//! Records are written as soon as they arrive; nothing is buffered beyond
//! the underlying writer. Binary streams reserve the triangle count at byte
//! 80 and patch it in when the stream is finalized.

pub mod errors;
pub mod record;
pub mod writer;

pub use errors::StlError;
pub use record::{binary_triangle_count, BINARY_HEADER_LEN, BINARY_RECORD_LEN, COUNT_OFFSET};
pub use writer::{encode_to_vec, StlWriter};
