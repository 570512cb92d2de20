use crate::bounding_volume::Aabb;
use crate::collider::{Intersections, TreeCollider};
use crate::math::{Isometry, Real};
use crate::partitioning::CollisionTree;
use crate::query::{Intersection, Ray, RayHit};
use crate::shape::{MeshChunk, QueryShape};

/// The leaf collider of one mesh chunk.
///
/// Queries go through the chunk's collision tree, or through a naive single-leaf
/// tree if the chunk was loaded without one. An optional transform places the
/// chunk in the world: each query is moved into the chunk frame and each result
/// moved back, per call.
#[derive(Copy, Clone, Debug)]
pub struct ChunkCollider<'a> {
    chunk: &'a MeshChunk,
    tree: &'a CollisionTree,
    transform: Option<Isometry<Real>>,
}

impl<'a> ChunkCollider<'a> {
    /// A collider for `chunk`, in the chunk frame.
    pub fn new(chunk: &'a MeshChunk) -> Self {
        Self {
            chunk,
            tree: chunk.collision_tree_or_naive(),
            transform: None,
        }
    }

    /// Places the chunk in the world with the given transform.
    pub fn with_transform(mut self, transform: Isometry<Real>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The chunk queried by this collider.
    #[inline]
    pub fn chunk(&self) -> &'a MeshChunk {
        self.chunk
    }

    /// The collision tree used by this collider.
    #[inline]
    pub fn tree(&self) -> &'a CollisionTree {
        self.tree
    }

    /// The transform placing the chunk in the world, if any.
    #[inline]
    pub fn transform(&self) -> Option<&Isometry<Real>> {
        self.transform.as_ref()
    }

    /// The AABB enclosing the chunk bounds once placed in the world.
    pub fn bounds(&self) -> Aabb {
        let aabb = self.chunk.bounds().aabb();
        match &self.transform {
            Some(m) if aabb.is_valid() => aabb.transform_by(m),
            _ => aabb,
        }
    }

    fn collider(&self) -> TreeCollider<'a, MeshChunk> {
        TreeCollider::new(self.tree, self.chunk)
    }

    /// Finds the nearest triangle hit by `ray` with a ray parameter up to `max_length`.
    pub fn cast(&self, ray: &Ray, max_length: Real) -> Option<RayHit> {
        match &self.transform {
            Some(m) => {
                // Rejects in the world frame before moving the ray.
                let _ = self.bounds().clip_ray(ray, 0.0, max_length)?;
                self.collider()
                    .cast(&ray.inverse_transform_by(m), max_length)
                    .map(|hit| hit.transform_by(m))
            }
            None => self.collider().cast(ray, max_length),
        }
    }

    /// Does `shape` intersect any triangle of the chunk?
    pub fn intersects(&self, shape: &QueryShape) -> bool {
        self.intersections(shape).next().is_some()
    }

    /// Iterates lazily through the triangles of the chunk intersecting `shape`.
    pub fn intersections(&self, shape: &QueryShape) -> ChunkIntersections<'a> {
        match &self.transform {
            Some(m) => ChunkIntersections {
                inner: self.bounds().intersects(&shape.aabb()).then(|| {
                    self.collider()
                        .intersections(&shape.transformed(&m.inverse()))
                }),
                transform: Some(*m),
            },
            None => ChunkIntersections {
                inner: Some(self.collider().intersections(shape)),
                transform: None,
            },
        }
    }
}

/// Iterator over the triangles of a [`ChunkCollider`] intersecting a shape.
pub struct ChunkIntersections<'a> {
    // `None` if the shape misses the chunk bounds in the world frame.
    inner: Option<Intersections<'a, MeshChunk>>,
    transform: Option<Isometry<Real>>,
}

impl Iterator for ChunkIntersections<'_> {
    type Item = Intersection;

    fn next(&mut self) -> Option<Intersection> {
        let hit = self.inner.as_mut()?.next()?;
        Some(match &self.transform {
            Some(m) => hit.transform_by(m),
            None => hit,
        })
    }
}
