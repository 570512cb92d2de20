use crate::math::Real;
use crate::partitioning::{
    classify, ray_sector_ranges, CollisionTree, PlaneClass, SectorKind, Side, TRAVERSAL_STACK_SIZE,
};
use crate::query::{Ray, RayHit};
use crate::shape::QueryShape;
use smallvec::SmallVec;

/// Cost associated to a leaf entry during a nearest-first ray traversal.
pub trait LeafCost {
    /// The cost value associated to the entry.
    ///
    /// Ray traversals keep the entry with the lowest cost.
    fn cost(&self) -> Real;
}

impl LeafCost for Real {
    #[inline(always)]
    fn cost(&self) -> Real {
        *self
    }
}

impl LeafCost for RayHit {
    #[inline(always)]
    fn cost(&self) -> Real {
        self.distance
    }
}

/// Iterator over the map entries of every leaf a query shape may reach.
///
/// A sector is skipped only if the shape lies strictly on its excluded side. The same
/// triangle is yielded several times if it is mapped by several reached leaves.
pub struct Candidates<'a> {
    tree: &'a CollisionTree,
    shape: QueryShape,
    stack: SmallVec<[SectorKind; TRAVERSAL_STACK_SIZE]>,
    leaf: core::slice::Iter<'a, u32>,
}

impl<'a> Candidates<'a> {
    fn new(tree: &'a CollisionTree, shape: QueryShape) -> Self {
        let mut stack = SmallVec::new();
        stack.push(tree.root());

        Self {
            tree,
            shape,
            stack,
            leaf: [].iter(),
        }
    }

    /// The shape this iterator was created for.
    #[inline]
    pub fn shape(&self) -> &QueryShape {
        &self.shape
    }
}

impl Iterator for Candidates<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(triangle) = self.leaf.next() {
                return Some(*triangle);
            }

            match self.stack.pop()? {
                SectorKind::Leaf { start, count } => {
                    self.leaf = self.tree.leaf(start, count).iter();
                }
                SectorKind::Split(id) => {
                    let split = &self.tree.splits()[id as usize];

                    // Right first so the left subtree is visited first.
                    for side in [Side::Right, Side::Left] {
                        let sector = split.sector(side);
                        if classify(&self.shape, split.axis, sector.value, side)
                            != PlaneClass::Outside
                        {
                            self.stack.push(sector.kind());
                        }
                    }
                }
            }
        }
    }
}

impl CollisionTree {
    /// Iterates through the map entries of all the leaves `shape` may reach, in depth-first order.
    pub fn candidates(&self, shape: &QueryShape) -> Candidates<'_> {
        Candidates::new(self, *shape)
    }

    /// Finds the leaf entry with the lowest cost along a ray.
    ///
    /// `range` is the parameter interval of the ray inside the coarse bounds of the
    /// geometry. Each split clips it at its thresholds and the nearest sector along the
    /// ray is visited first; sectors whose interval is empty or starts after the best
    /// cost found so far are skipped. When the ray is parallel to a split plane, only
    /// the sectors containing its origin are visited.
    ///
    /// `leaf_cast` is called with a map entry and the best cost found so far (initially
    /// `max_t`) and must return an entry cheaper than that, if any.
    pub fn cast_ray<L: LeafCost>(
        &self,
        ray: &Ray,
        range: (Real, Real),
        max_t: Real,
        mut leaf_cast: impl FnMut(u32, Real) -> Option<L>,
    ) -> Option<L> {
        let mut best_t = max_t;
        let mut best = None;
        let mut stack: SmallVec<[(SectorKind, Real, Real); TRAVERSAL_STACK_SIZE]> =
            SmallVec::new();
        stack.push((self.root(), range.0, range.1));

        while let Some((sector, t0, t1)) = stack.pop() {
            if t0 > best_t {
                continue;
            }

            match sector {
                SectorKind::Leaf { start, count } => {
                    for triangle in self.leaf(start, count) {
                        if let Some(hit) = leaf_cast(*triangle, best_t) {
                            let cost = hit.cost();
                            if best.is_none() || cost < best_t {
                                best_t = cost;
                                best = Some(hit);
                            }
                        }
                    }
                }
                SectorKind::Split(id) => {
                    let split = &self.splits()[id as usize];
                    let ranges = ray_sector_ranges(
                        ray,
                        split.axis,
                        split.left.value,
                        split.right.value,
                        t0,
                        t1,
                    );

                    for (side, t0, t1) in ranges.into_iter().flatten() {
                        stack.push((split.sector(side).kind(), t0, t1));
                    }
                }
            }
        }

        best
    }
}
