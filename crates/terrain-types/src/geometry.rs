use serde::{Deserialize, Serialize};

/// A single-precision point in model space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// One record handed to the STL writer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    /// A lone sample, written as a degenerate triangle.
    Point { vertex: Vertex },
    /// A surface facet.
    Triangle { vertices: [Vertex; 3] },
}

impl Emission {
    pub fn point(vertex: Vertex) -> Self {
        Emission::Point { vertex }
    }

    pub fn triangle(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Emission::Triangle {
            vertices: [a, b, c],
        }
    }

    /// The three STL vertices of this record. A point repeats itself.
    pub fn vertices(&self) -> [Vertex; 3] {
        match *self {
            Emission::Point { vertex } => [vertex, vertex, vertex],
            Emission::Triangle { vertices } => vertices,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Emission::Point { .. })
    }
}

/// STL flavor to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlEncoding {
    /// Packed little-endian records behind an 84-byte header.
    #[default]
    Binary,
    /// `solid` / `facet` text.
    Ascii,
}

impl StlEncoding {
    pub fn is_binary(self) -> bool {
        self == StlEncoding::Binary
    }
}
