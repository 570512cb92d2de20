//! Shapes consumed or queried by the collision trees.

pub use self::mesh_chunk::{ChunkError, MeshChunk};
pub use self::oriented_box::OrientedBox;
pub use self::query_shape::QueryShape;
pub use self::segment::Segment;
pub use self::sphere::Sphere;
pub use self::triangle::Triangle;

mod mesh_chunk;
mod oriented_box;
mod query_shape;
mod segment;
mod sphere;
mod triangle;
