//! Bindings of collision trees to the triangles they index.

pub use self::chunk_collider::{ChunkCollider, ChunkIntersections};
pub use self::tree_collider::{Intersections, TreeCollider};
pub use self::triangle_source::TriangleSource;

mod chunk_collider;
mod tree_collider;
mod triangle_source;
