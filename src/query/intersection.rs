use crate::math::{Isometry, Point, Real, UnitVector};

/// Stable identifier of a triangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum TriangleId {
    /// Index of the triangle inside its own mesh chunk.
    Local(u32),
    /// A triangle of a world: the chunk index and the triangle index inside that chunk.
    World {
        /// Index of the chunk in the world.
        chunk: u32,
        /// Index of the triangle inside the chunk.
        triangle: u32,
    },
}

impl TriangleId {
    /// The index of the triangle inside its chunk.
    #[inline]
    pub fn local_index(self) -> u32 {
        match self {
            TriangleId::Local(triangle) | TriangleId::World { triangle, .. } => triangle,
        }
    }

    /// Attaches a chunk index to a chunk-local id.
    ///
    /// World-scale ids are returned unchanged.
    #[inline]
    pub fn in_chunk(self, chunk: u32) -> TriangleId {
        match self {
            TriangleId::Local(triangle) => TriangleId::World { chunk, triangle },
            world => world,
        }
    }
}

/// Geometric details of a shape-versus-triangle intersection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleContact {
    /// A point shared by the shape and the triangle, for shapes that produce one.
    pub point: Option<Point<Real>>,
    /// The normal of the touched triangle, `None` for degenerate triangles.
    pub normal: Option<UnitVector<Real>>,
}

impl TriangleContact {
    /// Creates a new contact description.
    #[inline]
    pub fn new(point: Option<Point<Real>>, normal: Option<UnitVector<Real>>) -> Self {
        Self { point, normal }
    }
}

/// A triangle intersected by a query shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    /// A point shared by the shape and the triangle, for shapes that produce one.
    pub point: Option<Point<Real>>,
    /// The normal of the touched triangle.
    pub normal: Option<UnitVector<Real>>,
    /// The touched triangle.
    pub triangle: TriangleId,
}

impl Intersection {
    /// Creates a new intersection from a contact and the id of the touched triangle.
    #[inline]
    pub fn new(contact: TriangleContact, triangle: TriangleId) -> Self {
        Self {
            point: contact.point,
            normal: contact.normal,
            triangle,
        }
    }

    /// Transforms the point and normal of this intersection by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        Self {
            point: self.point.map(|pt| m * pt),
            normal: self.normal.map(|n| m * n),
            triangle: self.triangle,
        }
    }

    /// Attaches a chunk index to the triangle id of this intersection.
    #[inline]
    pub fn in_chunk(mut self, chunk: u32) -> Self {
        self.triangle = self.triangle.in_chunk(chunk);
        self
    }
}
