//! Bounding sphere.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::Ray;

/// A bounding sphere.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BoundingSphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    pub fn new(center: Point<Real>, radius: Real) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// The AABB of this bounding sphere.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }

    /// Does this sphere intersect the given AABB?
    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        if !aabb.is_valid() {
            return false;
        }

        let closest = self.center.coords.sup(&aabb.mins.coords).inf(&aabb.maxs.coords);
        (closest - self.center.coords).norm_squared() <= self.radius * self.radius
    }

    /// Clips the parameter interval `[min_t, max_t]` of `ray` to the part inside this sphere.
    pub fn clip_ray(&self, ray: &Ray, min_t: Real, max_t: Real) -> Option<(Real, Real)> {
        let dcenter = ray.origin - self.center;

        let a = ray.dir.norm_squared();
        let b = dcenter.dot(&ray.dir);
        let c = dcenter.norm_squared() - self.radius * self.radius;

        // Special case for when the dir is zero.
        if a == 0.0 {
            return (c <= 0.0).then_some((min_t, max_t));
        }

        let delta = b * b - a * c;

        if delta < 0.0 {
            return None;
        }

        let sqrt_delta = delta.sqrt();
        let tmin = ((-b - sqrt_delta) / a).max(min_t);
        let tmax = ((-b + sqrt_delta) / a).min(max_t);

        (tmin <= tmax).then_some((tmin, tmax))
    }
}
