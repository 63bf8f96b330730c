use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use terrain_types::{Emission, Vertex};

use crate::sampler::SampleBuffer;

/// What to emit for a sampled grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshMode {
    /// One degenerate triangle per sample.
    #[default]
    Points,
    /// Two triangles per quad of adjacent samples.
    Faces,
}

impl MeshMode {
    pub fn from_render_faces(render_faces: bool) -> Self {
        if render_faces {
            MeshMode::Faces
        } else {
            MeshMode::Points
        }
    }
}

/// Number of records `build` yields for a `width` x `height` grid.
pub fn emission_count(width: usize, height: usize, mode: MeshMode) -> usize {
    match mode {
        MeshMode::Points => width * height,
        MeshMode::Faces => 2 * width.saturating_sub(1) * height.saturating_sub(1),
    }
}

/// Lazily walk `buffer`, yielding points or triangles in row-major order.
///
/// Coordinates are raster indices times `scale`; heights are samples
/// times the same `scale`.
pub fn build(buffer: &SampleBuffer, scale: f64, mode: MeshMode) -> MeshIter<'_> {
    MeshIter {
        buffer,
        scale,
        mode,
        row: 0,
        col: 0,
        pending: None,
        remaining: emission_count(buffer.width(), buffer.height(), mode),
    }
}

/// Single-pass producer of emission records over a sampled grid.
#[derive(Debug)]
pub struct MeshIter<'a> {
    buffer: &'a SampleBuffer,
    scale: f64,
    mode: MeshMode,
    row: usize,
    col: usize,
    /// Second triangle of the current quad.
    pending: Option<Emission>,
    remaining: usize,
}

impl MeshIter<'_> {
    fn vertex(&self, row: usize, col: usize) -> Vertex {
        let b = self.buffer;
        Vertex::new(
            (b.raster_x(col) as f64 * self.scale) as f32,
            (b.raster_y(row) as f64 * self.scale) as f32,
            (b.get(row, col) * self.scale) as f32,
        )
    }

    /// Step to the next cell of a grid `columns` wide.
    fn advance(&mut self, columns: usize) {
        self.col += 1;
        if self.col == columns {
            self.col = 0;
            self.row += 1;
        }
    }
}

impl Iterator for MeshIter<'_> {
    type Item = Emission;

    fn next(&mut self) -> Option<Emission> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if let Some(second) = self.pending.take() {
            return Some(second);
        }

        let (row, col) = (self.row, self.col);
        match self.mode {
            MeshMode::Points => {
                let point = Emission::point(self.vertex(row, col));
                self.advance(self.buffer.width());
                Some(point)
            }
            MeshMode::Faces => {
                // A--C
                // |/ |
                // B--D
                let a = self.vertex(row, col);
                let b = self.vertex(row + 1, col);
                let c = self.vertex(row, col + 1);
                let d = self.vertex(row + 1, col + 1);
                self.pending = Some(Emission::triangle(b, c, d));
                self.advance(self.buffer.width() - 1);
                Some(Emission::triangle(a, b, c))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for MeshIter<'_> {}

impl FusedIterator for MeshIter<'_> {}
