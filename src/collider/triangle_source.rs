use crate::bounding_volume::CoarseVolume;
use crate::query::TriangleId;
use crate::shape::{MeshChunk, Triangle};

/// Triangles indexed by the map entries of a collision tree.
pub trait TriangleSource {
    /// The number of triangles of this source.
    fn num_triangles(&self) -> usize;

    /// The triangle with the given index.
    fn triangle(&self, i: u32) -> Triangle;

    /// The identifier reported for the triangle with the given index.
    fn triangle_id(&self, i: u32) -> TriangleId {
        TriangleId::Local(i)
    }

    /// The cheap bound tested before any tree traversal.
    fn coarse_volume(&self) -> CoarseVolume;
}

impl TriangleSource for MeshChunk {
    #[inline]
    fn num_triangles(&self) -> usize {
        MeshChunk::num_triangles(self)
    }

    #[inline]
    fn triangle(&self, i: u32) -> Triangle {
        MeshChunk::triangle(self, i)
    }

    #[inline]
    fn coarse_volume(&self) -> CoarseVolume {
        *self.bounds()
    }
}
