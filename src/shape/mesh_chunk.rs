use crate::bounding_volume::{Aabb, CoarseVolume};
use crate::math::{Point, Real};
use crate::partitioning::{CollisionTree, TreeBuildParams};
use crate::shape::Triangle;
use std::sync::OnceLock;

/// Indicates an inconsistency between the buffers of a mesh chunk.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkError {
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {vertex} but the chunk only has {num_vertices} vertices.")]
    VertexOutOfBounds {
        /// The faulty triangle.
        triangle: u32,
        /// The vertex index it references.
        vertex: u32,
        /// The number of vertices of the chunk.
        num_vertices: usize,
    },
    /// The collision tree maps a leaf to a triangle that does not exist.
    #[error("the collision tree references the triangle {triangle} but the chunk only has {num_triangles} triangles.")]
    TreeTriangleOutOfBounds {
        /// The triangle index found in the tree map.
        triangle: u32,
        /// The number of triangles of the chunk.
        num_triangles: usize,
    },
}

/// One rigid vertex/triangle buffer with its own bounding volume.
///
/// This is a leaf of the world hierarchy. The collision tree is optional: chunks
/// loaded without one are queried through a naive single-leaf tree.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MeshChunk {
    vertices: Vec<Point<Real>>,
    triangles: Vec<[u32; 3]>,
    bounds: CoarseVolume,
    tree: Option<CollisionTree>,
    // Synthesized on first use when `tree` is `None`.
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    naive: OnceLock<CollisionTree>,
}

impl MeshChunk {
    /// Creates a mesh chunk from its buffers, bounded by the AABB of its vertices.
    pub fn new(vertices: Vec<Point<Real>>, triangles: Vec<[u32; 3]>) -> Result<Self, ChunkError> {
        for (tid, triangle) in triangles.iter().enumerate() {
            for vid in triangle {
                if *vid as usize >= vertices.len() {
                    return Err(ChunkError::VertexOutOfBounds {
                        triangle: tid as u32,
                        vertex: *vid,
                        num_vertices: vertices.len(),
                    });
                }
            }
        }

        let bounds = CoarseVolume::Box(Aabb::from_points(&vertices));

        Ok(Self {
            vertices,
            triangles,
            bounds,
            tree: None,
            naive: OnceLock::new(),
        })
    }

    /// Replaces the coarse bounding volume of this chunk (e.g. with the one stored in the asset).
    pub fn with_bounds(mut self, bounds: CoarseVolume) -> Self {
        self.bounds = bounds;
        self
    }

    /// Attaches a persisted collision tree to this chunk.
    pub fn with_collision_tree(mut self, tree: CollisionTree) -> Result<Self, ChunkError> {
        if let Some(triangle) = tree
            .map()
            .iter()
            .copied()
            .find(|tid| *tid as usize >= self.triangles.len())
        {
            return Err(ChunkError::TreeTriangleOutOfBounds {
                triangle,
                num_triangles: self.triangles.len(),
            });
        }

        let _ = self.naive.take();
        self.tree = Some(tree);
        Ok(self)
    }

    /// Builds a collision tree for this chunk, replacing any existing one.
    pub fn build_collision_tree(&mut self, params: &TreeBuildParams) -> &CollisionTree {
        let _ = self.naive.take();
        self.tree
            .insert(CollisionTree::build(&self.vertices, &self.triangles, params))
    }

    /// Makes sure this chunk carries a collision tree, synthesizing the naive one if needed.
    pub fn ensure_collision_tree(&mut self) -> &CollisionTree {
        let num_triangles = self.triangles.len();
        let cached = self.naive.take();
        self.tree.get_or_insert_with(|| {
            cached.unwrap_or_else(|| {
                log::debug!(
                    "no collision tree for a chunk with {} triangles: using a single leaf.",
                    num_triangles
                );
                CollisionTree::naive(num_triangles)
            })
        })
    }

    /// The vertex buffer of this chunk.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer of this chunk.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The number of triangles of this chunk.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// The `i`-th triangle of this chunk.
    #[inline]
    pub fn triangle(&self, i: u32) -> Triangle {
        let idx = self.triangles[i as usize];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }

    /// The coarse bounding volume of this chunk.
    #[inline]
    pub fn bounds(&self) -> &CoarseVolume {
        &self.bounds
    }

    /// The collision tree of this chunk, if it has one.
    #[inline]
    pub fn collision_tree(&self) -> Option<&CollisionTree> {
        self.tree.as_ref()
    }

    /// The collision tree of this chunk, or a naive single-leaf tree if it has none.
    ///
    /// The naive tree is built once and kept for the next queries.
    pub fn collision_tree_or_naive(&self) -> &CollisionTree {
        match &self.tree {
            Some(tree) => tree,
            None => self.naive.get_or_init(|| {
                log::debug!(
                    "no collision tree for a chunk with {} triangles: querying a single leaf.",
                    self.triangles.len()
                );
                CollisionTree::naive(self.triangles.len())
            }),
        }
    }
}
