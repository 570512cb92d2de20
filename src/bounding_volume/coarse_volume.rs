use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::Real;
use crate::query::Ray;

/// The cheap bounding primitive tested before descending into a collision tree.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum CoarseVolume {
    /// An axis-aligned box.
    Box(Aabb),
    /// A sphere.
    Sphere(BoundingSphere),
}

impl CoarseVolume {
    /// The AABB enclosing this volume.
    pub fn aabb(&self) -> Aabb {
        match self {
            CoarseVolume::Box(aabb) => *aabb,
            CoarseVolume::Sphere(sphere) => sphere.aabb(),
        }
    }

    /// Does this volume intersect the given AABB?
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        match self {
            CoarseVolume::Box(bounds) => bounds.intersects(aabb),
            CoarseVolume::Sphere(sphere) => sphere.intersects_aabb(aabb),
        }
    }

    /// Clips the parameter interval `[min_t, max_t]` of `ray` to the part inside this volume.
    pub fn clip_ray(&self, ray: &Ray, min_t: Real, max_t: Real) -> Option<(Real, Real)> {
        match self {
            CoarseVolume::Box(aabb) => aabb.clip_ray(ray, min_t, max_t),
            CoarseVolume::Sphere(sphere) => sphere.clip_ray(ray, min_t, max_t),
        }
    }
}

impl From<Aabb> for CoarseVolume {
    fn from(aabb: Aabb) -> Self {
        CoarseVolume::Box(aabb)
    }
}

impl From<BoundingSphere> for CoarseVolume {
    fn from(sphere: BoundingSphere) -> Self {
        CoarseVolume::Sphere(sphere)
    }
}
