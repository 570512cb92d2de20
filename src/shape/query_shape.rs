use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Real, Rotation};
use crate::partitioning::Axis;
use crate::query::intersection_test::{
    intersection_test_aabb_triangle, intersection_test_obb_triangle,
    intersection_test_triangle_triangle, segment_triangle_intersection,
    sphere_triangle_closest_point,
};
use crate::query::TriangleContact;
use crate::shape::{OrientedBox, Segment, Sphere, Triangle};

/// The closed set of shapes that can be tested against the geometry.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum QueryShape {
    /// An axis-aligned box.
    Box(Aabb),
    /// A box with an arbitrary orientation.
    OrientedBox(OrientedBox),
    /// A sphere.
    Sphere(Sphere),
    /// A triangle.
    Triangle(Triangle),
    /// A line segment.
    Segment(Segment),
}

impl QueryShape {
    /// The AABB enclosing this shape.
    pub fn aabb(&self) -> Aabb {
        match self {
            QueryShape::Box(aabb) => *aabb,
            QueryShape::OrientedBox(obb) => obb.aabb(),
            QueryShape::Sphere(sphere) => sphere.aabb(),
            QueryShape::Triangle(triangle) => triangle.aabb(),
            QueryShape::Segment(segment) => segment.aabb(),
        }
    }

    /// Is every point of this shape strictly greater than `value` along `axis`?
    #[inline]
    pub fn is_above(&self, axis: Axis, value: Real) -> bool {
        let i = axis.index();
        match self {
            // NOTE: the SIMD trees evaluate exactly `center - value > radius` too.
            QueryShape::Sphere(sphere) => sphere.center[i] - value > sphere.radius,
            _ => self.aabb().mins[i] > value,
        }
    }

    /// Is every point of this shape strictly smaller than `value` along `axis`?
    #[inline]
    pub fn is_below(&self, axis: Axis, value: Real) -> bool {
        let i = axis.index();
        match self {
            QueryShape::Sphere(sphere) => value - sphere.center[i] > sphere.radius,
            _ => self.aabb().maxs[i] < value,
        }
    }

    /// Returns this shape moved by `m`.
    ///
    /// An axis-aligned box becomes an oriented box unless `m` has no rotation.
    pub fn transformed(&self, m: &Isometry<Real>) -> QueryShape {
        match self {
            QueryShape::Box(aabb) => {
                if m.rotation == Rotation::identity() {
                    QueryShape::Box(Aabb::new(m * aabb.mins, m * aabb.maxs))
                } else {
                    QueryShape::OrientedBox(OrientedBox::from_aabb(aabb).transformed(m))
                }
            }
            QueryShape::OrientedBox(obb) => QueryShape::OrientedBox(obb.transformed(m)),
            QueryShape::Sphere(sphere) => QueryShape::Sphere(sphere.transformed(m)),
            QueryShape::Triangle(triangle) => QueryShape::Triangle(triangle.transformed(m)),
            QueryShape::Segment(segment) => QueryShape::Segment(segment.transformed(m)),
        }
    }

    /// Tests this shape against one triangle of the geometry.
    pub fn contact_with_triangle(&self, triangle: &Triangle) -> Option<TriangleContact> {
        match self {
            QueryShape::Box(aabb) => intersection_test_aabb_triangle(aabb, triangle)
                .then(|| TriangleContact::new(None, triangle.normal())),
            QueryShape::OrientedBox(obb) => intersection_test_obb_triangle(obb, triangle)
                .then(|| TriangleContact::new(None, triangle.normal())),
            QueryShape::Sphere(sphere) => sphere_triangle_closest_point(sphere, triangle)
                .map(|pt| TriangleContact::new(Some(pt), triangle.normal())),
            QueryShape::Triangle(other) => intersection_test_triangle_triangle(other, triangle)
                .then(|| TriangleContact::new(None, triangle.normal())),
            QueryShape::Segment(segment) => segment_triangle_intersection(segment, triangle)
                .map(|pt| TriangleContact::new(Some(pt), triangle.normal())),
        }
    }
}

impl From<Aabb> for QueryShape {
    fn from(aabb: Aabb) -> Self {
        QueryShape::Box(aabb)
    }
}

impl From<OrientedBox> for QueryShape {
    fn from(obb: OrientedBox) -> Self {
        QueryShape::OrientedBox(obb)
    }
}

impl From<Sphere> for QueryShape {
    fn from(sphere: Sphere) -> Self {
        QueryShape::Sphere(sphere)
    }
}

impl From<Triangle> for QueryShape {
    fn from(triangle: Triangle) -> Self {
        QueryShape::Triangle(triangle)
    }
}

impl From<Segment> for QueryShape {
    fn from(segment: Segment) -> Self {
        QueryShape::Segment(segment)
    }
}
