use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use terrain_types::{Emission, StlEncoding, Vertex};
use tracing::{debug, info, instrument, warn};

use crate::errors::StlError;
use crate::record::{self, BINARY_HEADER_LEN, BINARY_RECORD_LEN, COUNT_OFFSET};

/// Shortens a sink to the given length.
pub type Truncate<W> = fn(&mut W, u64) -> io::Result<()>;

/// An open STL stream.
///
/// The header goes out on construction and every record is written
/// immediately. [`finalize`](Self::finalize) commits the stream: binary
/// output gets its triangle count patched in at byte 80, ASCII output gets
/// its closing line. If the writer is dropped without being finalized (an
/// early `?`, a panic) finalization runs from `Drop` so the file is never
/// left with a placeholder count.
///
/// A record whose write fails is not counted. If part of it reached the
/// sink, `finalize` cuts it off when the writer has a [`Truncate`] hook
/// (files opened with [`create`](StlWriter::create) do) and otherwise
/// reports [`StlError::Torn`].
pub struct StlWriter<W: Write + Seek> {
    sink: Option<W>,
    encoding: StlEncoding,
    triangles: u64,
    /// Bytes of header and complete records.
    committed: u64,
    /// A record write failed since the last commit.
    torn: bool,
    truncate: Option<Truncate<W>>,
    finalized: bool,
}

impl StlWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn create(path: impl AsRef<Path>, encoding: StlEncoding) -> Result<Self, StlError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| StlError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        info!(?encoding, "opened STL output");
        Ok(Self::new(BufWriter::new(file), encoding)?.with_truncate(truncate_file))
    }
}

fn truncate_file(sink: &mut BufWriter<File>, len: u64) -> io::Result<()> {
    sink.flush()?;
    sink.get_ref().set_len(len)
}

impl<W: Write + Seek> StlWriter<W> {
    /// Start a stream on `sink`, which must be seekable for binary output.
    pub fn new(mut sink: W, encoding: StlEncoding) -> Result<Self, StlError> {
        let mut header = Vec::with_capacity(BINARY_HEADER_LEN);
        match encoding {
            StlEncoding::Binary => record::write_binary_header(&mut header)?,
            StlEncoding::Ascii => record::write_ascii_header(&mut header)?,
        }
        sink.write_all(&header)?;

        Ok(Self {
            sink: Some(sink),
            encoding,
            triangles: 0,
            committed: header.len() as u64,
            torn: false,
            truncate: None,
            finalized: false,
        })
    }

    /// Let `finalize` cut a partly written record off the end of the sink.
    pub fn with_truncate(mut self, truncate: Truncate<W>) -> Self {
        self.truncate = Some(truncate);
        self
    }

    /// Records written so far. A point counts as one triangle.
    pub fn triangle_count(&self) -> u64 {
        self.triangles
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn emit(&mut self, emission: &Emission) -> Result<(), StlError> {
        self.write_facet(&emission.vertices())
    }

    /// Write a lone point as a degenerate triangle.
    pub fn emit_point(&mut self, x: f32, y: f32, z: f32) -> Result<(), StlError> {
        let v = Vertex::new(x, y, z);
        self.write_facet(&[v, v, v])
    }

    pub fn emit_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) -> Result<(), StlError> {
        self.write_facet(&[a, b, c])
    }

    /// Write every record of `emissions`, stopping at the first error.
    ///
    /// Does not finalize; the caller decides when the stream is complete.
    pub fn emit_all<I>(&mut self, emissions: I) -> Result<(), StlError>
    where
        I: IntoIterator<Item = Emission>,
    {
        for emission in emissions {
            self.emit(&emission)?;
        }
        Ok(())
    }

    fn write_facet(&mut self, vertices: &[Vertex; 3]) -> Result<(), StlError> {
        if self.finalized {
            return Err(StlError::Finalized);
        }
        if self.encoding.is_binary() && self.triangles >= u64::from(u32::MAX) {
            return Err(StlError::TooManyTriangles);
        }

        let mut bytes = Vec::with_capacity(BINARY_RECORD_LEN);
        match self.encoding {
            StlEncoding::Binary => record::write_binary_record(&mut bytes, vertices)?,
            StlEncoding::Ascii => record::write_ascii_record(&mut bytes, vertices)?,
        }

        let sink = self.sink.as_mut().ok_or(StlError::Finalized)?;
        if let Err(e) = sink.write_all(&bytes) {
            self.torn = true;
            return Err(e.into());
        }
        self.committed += bytes.len() as u64;
        self.triangles += 1;
        Ok(())
    }

    /// Commit the stream and flush it. Returns the final triangle count.
    ///
    /// Runs its side effects once; later calls return the count unchanged.
    /// A binary sink that cannot seek back to the count is an error, as is
    /// a partial record left behind on a sink without a truncate hook. The
    /// count and closing line are written in that case too.
    pub fn finalize(&mut self) -> Result<u64, StlError> {
        if self.finalized {
            return Ok(self.triangles);
        }
        self.finalized = true;

        let committed = self.committed;
        let sink = self.sink.as_mut().ok_or(StlError::Finalized)?;
        let seek_err = |offset: u64| move |source: io::Error| StlError::Seek { offset, source };

        let mut leftover = None;
        if self.torn {
            let actual = sink.seek(SeekFrom::End(0)).map_err(seek_err(committed))?;
            if actual != committed {
                match self.truncate {
                    Some(truncate) => {
                        truncate(sink, committed)?;
                        sink.seek(SeekFrom::Start(committed))
                            .map_err(seek_err(committed))?;
                        debug!(dropped = actual - committed, "cut off partial record");
                    }
                    None => leftover = Some(actual),
                }
            }
        }

        match self.encoding {
            StlEncoding::Binary => {
                // Guarded at write time, so the count always fits.
                let count = u32::try_from(self.triangles).map_err(|_| StlError::TooManyTriangles)?;
                sink.seek(SeekFrom::Start(COUNT_OFFSET))
                    .map_err(seek_err(COUNT_OFFSET))?;
                sink.write_all(&count.to_le_bytes())?;
                sink.seek(SeekFrom::End(0)).map_err(seek_err(COUNT_OFFSET))?;
            }
            StlEncoding::Ascii => record::write_ascii_footer(sink)?,
        }
        sink.flush()?;

        debug!(triangles = self.triangles, encoding = ?self.encoding, "finalized STL stream");
        match leftover {
            Some(actual) => Err(StlError::Torn { committed, actual }),
            None => Ok(self.triangles),
        }
    }

    /// Finalize and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, StlError> {
        self.finalize()?;
        self.sink.take().ok_or(StlError::Finalized)
    }
}

impl<W: Write + Seek + fmt::Debug> fmt::Debug for StlWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StlWriter")
            .field("sink", &self.sink)
            .field("encoding", &self.encoding)
            .field("triangles", &self.triangles)
            .field("committed", &self.committed)
            .field("torn", &self.torn)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Seek> Drop for StlWriter<W> {
    fn drop(&mut self) {
        if self.finalized || self.sink.is_none() {
            return;
        }
        if let Err(e) = self.finalize() {
            warn!(error = %e, "failed to finalize STL stream on drop");
        }
    }
}

/// Encode `emissions` to an in-memory STL file.
pub fn encode_to_vec<I>(emissions: I, encoding: StlEncoding) -> Result<Vec<u8>, StlError>
where
    I: IntoIterator<Item = Emission>,
{
    let mut writer = StlWriter::new(Cursor::new(Vec::new()), encoding)?;
    writer.emit_all(emissions)?;
    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::binary_triangle_count;

    #[test]
    fn empty_binary_is_bare_header() {
        let bytes = encode_to_vec(std::iter::empty(), StlEncoding::Binary).unwrap();
        assert_eq!(bytes.len(), BINARY_HEADER_LEN);
        assert!(bytes.iter().all(|&b| b == 0));
        assert_eq!(binary_triangle_count(&bytes), Some(0));
    }

    #[test]
    fn empty_ascii_is_solid_and_endsolid() {
        let bytes = encode_to_vec(std::iter::empty(), StlEncoding::Ascii).unwrap();
        assert_eq!(bytes, b"solid stlobject\nendsolid stlobject");
    }

    #[test]
    fn count_patched_on_finalize() {
        let mut w = StlWriter::new(Cursor::new(Vec::new()), StlEncoding::Binary).unwrap();
        for i in 0..5 {
            w.emit_point(i as f32, 0.0, 0.0).unwrap();
        }
        assert_eq!(w.triangle_count(), 5);
        let bytes = w.finish().unwrap().into_inner();
        assert_eq!(bytes.len(), BINARY_HEADER_LEN + 5 * BINARY_RECORD_LEN);
        assert_eq!(binary_triangle_count(&bytes), Some(5));
    }

    #[test]
    fn double_finalize_leaves_bytes_alone() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut w = StlWriter::new(&mut cursor, StlEncoding::Ascii).unwrap();
            w.emit_point(1.0, 2.0, 3.0).unwrap();
            assert_eq!(w.finalize().unwrap(), 1);
            assert_eq!(w.finalize().unwrap(), 1);
        }
        let text = String::from_utf8(cursor.into_inner()).unwrap();
        assert_eq!(text.matches("endsolid").count(), 1);
    }

    #[test]
    fn emit_after_finalize_is_rejected() {
        let mut w = StlWriter::new(Cursor::new(Vec::new()), StlEncoding::Binary).unwrap();
        w.finalize().unwrap();
        assert!(matches!(
            w.emit_point(0.0, 0.0, 0.0),
            Err(StlError::Finalized)
        ));
    }

    #[test]
    fn drop_finalizes_binary_count() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut w = StlWriter::new(&mut cursor, StlEncoding::Binary).unwrap();
            w.emit_point(0.0, 0.0, 0.0).unwrap();
            w.emit_point(1.0, 1.0, 1.0).unwrap();
        }
        assert_eq!(binary_triangle_count(cursor.get_ref()), Some(2));
    }

    /// Accepts writes but refuses to seek.
    struct NoSeek(Vec<u8>);

    impl Write for NoSeek {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for NoSeek {
        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "pipe"))
        }
    }

    #[test]
    fn unseekable_binary_sink_fails_finalize() {
        let mut w = StlWriter::new(NoSeek(Vec::new()), StlEncoding::Binary).unwrap();
        w.emit_point(0.0, 0.0, 0.0).unwrap();
        let err = w.finalize().unwrap_err();
        assert!(matches!(err, StlError::Seek { offset: 80, .. }));
    }

    #[test]
    fn unseekable_sink_is_fine_for_ascii() {
        let mut w = StlWriter::new(NoSeek(Vec::new()), StlEncoding::Ascii).unwrap();
        w.emit_point(0.0, 0.0, 0.0).unwrap();
        let sink = w.finish().unwrap();
        assert!(sink.0.ends_with(b"endsolid stlobject"));
    }

    /// Accepts bytes up to `fail_at`, fails the write that reaches it, then
    /// recovers.
    struct Flaky {
        inner: Cursor<Vec<u8>>,
        fail_at: u64,
        tripped: bool,
    }

    impl Flaky {
        fn new(fail_at: usize) -> Self {
            Self {
                inner: Cursor::new(Vec::new()),
                fail_at: fail_at as u64,
                tripped: false,
            }
        }

        fn cut(sink: &mut Flaky, len: u64) -> io::Result<()> {
            sink.inner.get_mut().truncate(len as usize);
            Ok(())
        }
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let pos = self.inner.position();
            if !self.tripped && pos + buf.len() as u64 > self.fail_at {
                let room = (self.fail_at - pos) as usize;
                if room == 0 {
                    self.tripped = true;
                    return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
                }
                return self.inner.write(&buf[..room]);
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for Flaky {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn partial_record_without_truncate_is_torn() {
        let sink = Flaky::new(BINARY_HEADER_LEN + BINARY_RECORD_LEN + 20);
        let mut w = StlWriter::new(sink, StlEncoding::Binary).unwrap();
        w.emit_point(0.0, 0.0, 0.0).unwrap();
        assert!(matches!(w.emit_point(1.0, 1.0, 1.0), Err(StlError::Write(_))));
        assert_eq!(w.triangle_count(), 1);

        let err = w.finalize().unwrap_err();
        assert!(matches!(
            err,
            StlError::Torn {
                committed: 134,
                actual: 154
            }
        ));
        assert!(w.is_finalized());

        let bytes = w.finish().unwrap().inner.into_inner();
        assert_eq!(binary_triangle_count(&bytes), Some(1));
    }

    #[test]
    fn partial_record_is_cut_off_by_truncate() {
        let sink = Flaky::new(BINARY_HEADER_LEN + BINARY_RECORD_LEN + 20);
        let mut w = StlWriter::new(sink, StlEncoding::Binary)
            .unwrap()
            .with_truncate(Flaky::cut);
        w.emit_point(0.0, 0.0, 0.0).unwrap();
        assert!(w.emit_point(1.0, 1.0, 1.0).is_err());
        assert_eq!(w.finalize().unwrap(), 1);

        let bytes = w.finish().unwrap().inner.into_inner();
        assert_eq!(bytes.len(), BINARY_HEADER_LEN + BINARY_RECORD_LEN);
        assert_eq!(binary_triangle_count(&bytes), Some(1));
    }

    #[test]
    fn partial_ascii_record_is_cut_before_footer() {
        let header = "solid stlobject\n".len();
        let sink = Flaky::new(header + 30);
        let mut w = StlWriter::new(sink, StlEncoding::Ascii)
            .unwrap()
            .with_truncate(Flaky::cut);
        assert!(w.emit_point(1.0, 2.0, 3.0).is_err());
        assert_eq!(w.finalize().unwrap(), 0);

        let bytes = w.finish().unwrap().inner.into_inner();
        assert_eq!(bytes, b"solid stlobject\nendsolid stlobject");
    }

    #[test]
    fn failed_write_on_record_boundary_still_finalizes() {
        let sink = Flaky::new(BINARY_HEADER_LEN + 2 * BINARY_RECORD_LEN);
        let mut w = StlWriter::new(sink, StlEncoding::Binary).unwrap();
        let points = (0..5).map(|i| Emission::point(Vertex::new(i as f32, 0.0, 0.0)));
        assert!(w.emit_all(points).is_err());
        assert_eq!(w.finalize().unwrap(), 2);

        let bytes = w.finish().unwrap().inner.into_inner();
        assert_eq!(bytes.len(), BINARY_HEADER_LEN + 2 * BINARY_RECORD_LEN);
        assert_eq!(binary_triangle_count(&bytes), Some(2));
    }

    #[test]
    fn truncate_file_flushes_then_shortens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.stl");
        let mut sink = BufWriter::new(File::create(&path).unwrap());
        sink.write_all(&[7u8; 40]).unwrap();

        truncate_file(&mut sink, 25).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 25);
    }
}
