use crate::collider::TriangleSource;
use crate::math::Real;
use crate::partitioning::{Candidates, CollisionTree};
use crate::query::{ray_triangle_intersection, Intersection, Ray, RayHit};
use crate::shape::QueryShape;

/// Queries on a collision tree paired with the triangles it indexes.
pub struct TreeCollider<'a, S: TriangleSource + ?Sized> {
    tree: &'a CollisionTree,
    source: &'a S,
}

impl<S: TriangleSource + ?Sized> Clone for TreeCollider<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: TriangleSource + ?Sized> Copy for TreeCollider<'_, S> {}

impl<'a, S: TriangleSource + ?Sized> TreeCollider<'a, S> {
    /// Pairs `tree` with the triangles its map entries refer to.
    pub fn new(tree: &'a CollisionTree, source: &'a S) -> Self {
        Self { tree, source }
    }

    /// The collision tree.
    #[inline]
    pub fn tree(&self) -> &'a CollisionTree {
        self.tree
    }

    /// The triangles indexed by the tree.
    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Finds the nearest triangle hit by `ray` with a ray parameter up to `max_length`.
    ///
    /// Use `Real::MAX` for unbounded casts.
    pub fn cast(&self, ray: &Ray, max_length: Real) -> Option<RayHit> {
        // The coarse volume only rejects: its faces may coincide with split thresholds,
        // so the tree walk clips the full interval itself.
        let _ = self.source.coarse_volume().clip_ray(ray, 0.0, max_length)?;
        let source = self.source;

        self.tree.cast_ray(ray, (0.0, max_length), max_length, |i, max_t| {
            let (distance, normal) = ray_triangle_intersection(&source.triangle(i), ray, max_t)?;
            Some(RayHit {
                distance,
                point: ray.point_at(distance),
                normal,
                triangle: source.triangle_id(i),
            })
        })
    }

    /// Does `shape` intersect any triangle?
    pub fn intersects(&self, shape: &QueryShape) -> bool {
        self.intersections(shape).next().is_some()
    }

    /// Iterates lazily through the triangles intersecting `shape`.
    ///
    /// A triangle mapped by several reached leaves is yielded once per leaf.
    pub fn intersections(&self, shape: &QueryShape) -> Intersections<'a, S> {
        let candidates = self
            .source
            .coarse_volume()
            .intersects_aabb(&shape.aabb())
            .then(|| self.tree.candidates(shape));

        Intersections {
            source: self.source,
            candidates,
        }
    }
}

/// Iterator over the triangles of a [`TreeCollider`] intersecting a shape.
pub struct Intersections<'a, S: TriangleSource + ?Sized> {
    source: &'a S,
    // `None` if the shape misses the coarse volume.
    candidates: Option<Candidates<'a>>,
}

impl<S: TriangleSource + ?Sized> Iterator for Intersections<'_, S> {
    type Item = Intersection;

    fn next(&mut self) -> Option<Intersection> {
        let candidates = self.candidates.as_mut()?;

        loop {
            let i = candidates.next()?;
            let triangle = self.source.triangle(i);

            if let Some(contact) = candidates.shape().contact_with_triangle(&triangle) {
                return Some(Intersection::new(contact, self.source.triangle_id(i)));
            }
        }
    }
}
