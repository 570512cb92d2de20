use crate::math::Real;
use crate::partitioning::Axis;
use crate::query::Ray;
use crate::shape::QueryShape;

/// Marks a sector whose `index` references another split rather than a range of the map.
pub const SENTINEL: u32 = u32::MAX;

/// The two sides of a split.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// The sector covering the coordinates lower or equal to its threshold.
    Left,
    /// The sector covering the coordinates greater or equal to its threshold.
    Right,
}

/// One side of a split: either a reference to another split or a leaf range into the map.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Sector {
    /// The threshold of this sector along the split axis.
    pub value: Real,
    /// The referenced split if `count == SENTINEL`, otherwise the first map entry of the leaf.
    pub index: u32,
    /// The number of map entries of the leaf, or `SENTINEL` for internal sectors.
    pub count: u32,
}

/// What a sector points to, without its threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SectorKind {
    /// Another split, by index.
    Split(u32),
    /// A (possibly empty) range of the map.
    Leaf {
        /// The first map entry.
        start: u32,
        /// The number of map entries.
        count: u32,
    },
}

impl Sector {
    /// A sector referencing the split at `index`.
    #[inline]
    pub fn split(value: Real, index: u32) -> Self {
        Self {
            value,
            index,
            count: SENTINEL,
        }
    }

    /// A leaf sector covering `count` map entries starting at `start`.
    #[inline]
    pub fn leaf(value: Real, start: u32, count: u32) -> Self {
        Self {
            value,
            index: start,
            count,
        }
    }

    /// Is this sector a leaf range?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.count != SENTINEL
    }

    /// What this sector points to.
    #[inline]
    pub fn kind(&self) -> SectorKind {
        if self.is_leaf() {
            SectorKind::Leaf {
                start: self.index,
                count: self.count,
            }
        } else {
            SectorKind::Split(self.index)
        }
    }
}

/// A slab split: two half-spaces along the same axis that may overlap.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Split {
    /// The axis shared by both sectors.
    pub axis: Axis,
    /// The sector covering `axis <= left.value`.
    pub left: Sector,
    /// The sector covering `axis >= right.value`.
    pub right: Sector,
}

impl Split {
    /// Creates a new split.
    #[inline]
    pub fn new(axis: Axis, left: Sector, right: Sector) -> Self {
        Self { axis, left, right }
    }

    /// The sector on the given side.
    #[inline]
    pub fn sector(&self, side: Side) -> &Sector {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// The sector on the given side, mutably.
    #[inline]
    pub fn sector_mut(&mut self, side: Side) -> &mut Sector {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Position of a shape relative to one sector of a split.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaneClass {
    /// The shape lies strictly inside the sector.
    Inside,
    /// The shape lies strictly on the excluded side of the sector threshold.
    Outside,
    /// The shape crosses or touches the sector threshold.
    Intersecting,
}

/// Classifies `shape` against the sector on `side` of a split along `axis` with the threshold `value`.
///
/// Traversals descend into every sector not classified as [`PlaneClass::Outside`].
#[inline]
pub fn classify(shape: &QueryShape, axis: Axis, value: Real, side: Side) -> PlaneClass {
    let (outside, inside) = match side {
        Side::Left => (shape.is_above(axis, value), shape.is_below(axis, value)),
        Side::Right => (shape.is_below(axis, value), shape.is_above(axis, value)),
    };

    if outside {
        PlaneClass::Outside
    } else if inside {
        PlaneClass::Inside
    } else {
        PlaneClass::Intersecting
    }
}

/// The parameter intervals of `ray` within `[t0, t1]` inside each sector of a slab split.
///
/// Intervals are returned far sector first, the order in which a depth-first traversal
/// must push them. Empty intervals are `None`. A ray parallel to the split plane keeps
/// its whole interval in each sector containing its origin.
#[inline]
pub fn ray_sector_ranges(
    ray: &Ray,
    axis: Axis,
    left_value: Real,
    right_value: Real,
    t0: Real,
    t1: Real,
) -> [Option<(Side, Real, Real)>; 2] {
    let dim = axis.index();
    let o = ray.origin[dim];
    let d = ray.dir[dim];

    if d == 0.0 {
        return [
            (o >= right_value).then_some((Side::Right, t0, t1)),
            (o <= left_value).then_some((Side::Left, t0, t1)),
        ];
    }

    let tl = (left_value - o) / d;
    let tr = (right_value - o) / d;

    let (near, far) = if d > 0.0 {
        ((Side::Left, t0, t1.min(tl)), (Side::Right, t0.max(tr), t1))
    } else {
        ((Side::Right, t0, t1.min(tr)), (Side::Left, t0.max(tl), t1))
    };

    [far, near].map(|range| (range.1 <= range.2).then_some(range))
}
