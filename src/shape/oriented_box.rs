use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Rotation, Vector};

/// A box with an arbitrary orientation.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct OrientedBox {
    /// The center of the box.
    pub center: Point<Real>,
    /// The half-extents of the box along its local axes.
    pub half_extents: Vector<Real>,
    /// The rotation from the box-local frame to the ambient frame.
    pub rotation: Rotation<Real>,
}

impl OrientedBox {
    /// Creates a new oriented box.
    #[inline]
    pub fn new(center: Point<Real>, half_extents: Vector<Real>, rotation: Rotation<Real>) -> Self {
        OrientedBox {
            center,
            half_extents,
            rotation,
        }
    }

    /// The oriented box covering exactly the given AABB.
    #[inline]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.half_extents(), Rotation::identity())
    }

    /// The AABB enclosing this oriented box.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        let ws_half_extents = self.rotation.to_rotation_matrix().into_inner().abs() * self.half_extents;
        Aabb::from_half_extents(self.center, ws_half_extents)
    }

    /// Expresses the ambient-space point `pt` in the box-local frame (centered on the box).
    #[inline]
    pub fn to_local_point(&self, pt: &Point<Real>) -> Point<Real> {
        Point::from(self.rotation.inverse_transform_vector(&(pt - self.center)))
    }

    /// Returns this box moved by `m`.
    #[inline]
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        Self::new(m * self.center, self.half_extents, m.rotation * self.rotation)
    }
}
