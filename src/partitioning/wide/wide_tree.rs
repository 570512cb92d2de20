use crate::collider::TriangleSource;
use crate::math::{Point, Real, SimdReal4, SimdReal8};
use crate::partitioning::{CollisionTree, SectorKind, TRAVERSAL_STACK_SIZE};
use crate::query::Intersection;
use crate::shape::{QueryShape, Sphere};
use simba::simd::{SimdBool as _, SimdPartialOrd as _, SimdValue as _};
use smallvec::SmallVec;

/// A child of a wide node: either another wide node or a leaf range of the map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WideChild {
    /// The child node if `count == WideChild::INTERNAL`, otherwise the first map entry of the leaf.
    pub index: u32,
    /// The number of map entries of the leaf, or `WideChild::INTERNAL`.
    pub count: u32,
}

impl WideChild {
    /// The `count` of children referencing another wide node.
    pub const INTERNAL: u32 = u32::MAX;

    fn node(index: u32) -> Self {
        Self {
            index,
            count: Self::INTERNAL,
        }
    }

    fn leaf(start: u32, count: u32) -> Self {
        Self {
            index: start,
            count,
        }
    }

    fn empty() -> Self {
        Self::leaf(0, 0)
    }

    /// Is this child a leaf range?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.count != Self::INTERNAL
    }
}

macro_rules! impl_wide_tree(
    (
        $(#[$doc: meta])*
        $WideTree: ident, $WideNode: ident, $WideCandidates: ident,
        $SimdReal: ty, $LANES: expr, $LEVELS: expr
    ) => {
        #[derive(Copy, Clone, Debug)]
        struct $WideNode {
            // thresholds[l][j]: the threshold tested by the lane `j` at the level `l`.
            thresholds: [$SimdReal; $LEVELS],
            axes: [[u8; $LANES]; $LEVELS],
            children: [WideChild; $LANES],
        }

        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $WideTree {
            nodes: Vec<$WideNode>,
            // signs[l][j]: +1 if the lane `j` is on the left side at the level `l`, -1 otherwise.
            signs: [$SimdReal; $LEVELS],
            root: WideChild,
            map: Vec<u32>,
        }

        impl $WideTree {
            /// The number of children of a wide node.
            pub const LANES: usize = $LANES;
            /// The number of split levels regrouped into one wide node.
            pub const LEVELS: usize = $LEVELS;

            const FULL_MASK: u64 = (1 << $LANES) - 1;

            /// Flattens a collision tree into wide nodes.
            ///
            /// Subtrees shallower than a wide node are padded: their leaf occupies the
            /// leftmost lane of its block and an infinite threshold routes every query to it.
            pub fn new(tree: &CollisionTree) -> Self {
                let mut signs = [<$SimdReal>::splat(1.0); $LEVELS];
                for (level, signs) in signs.iter_mut().enumerate() {
                    let block = $LANES >> (level + 1);
                    let lanes: [Real; $LANES] = core::array::from_fn(|j| {
                        if (j / block) % 2 == 0 {
                            1.0
                        } else {
                            -1.0
                        }
                    });
                    *signs = <$SimdReal>::from(lanes);
                }

                let mut result = Self {
                    nodes: vec![],
                    signs,
                    root: WideChild::empty(),
                    map: tree.map().to_vec(),
                };
                result.root = result.child(tree, tree.root());

                log::trace!(
                    "flattened {} splits into {} nodes of {} lanes.",
                    tree.num_splits(),
                    result.nodes.len(),
                    $LANES
                );

                result
            }

            fn child(&mut self, tree: &CollisionTree, kind: SectorKind) -> WideChild {
                match kind {
                    SectorKind::Leaf { start, count } => WideChild::leaf(start, count),
                    SectorKind::Split(id) => WideChild::node(self.flatten(tree, id)),
                }
            }

            fn flatten(&mut self, tree: &CollisionTree, split: u32) -> u32 {
                let id = self.nodes.len() as u32;
                let mut thresholds = [[Real::INFINITY; $LANES]; $LEVELS];
                let mut axes = [[0u8; $LANES]; $LEVELS];
                let mut children = [WideChild::empty(); $LANES];

                // Reserve the slot so nodes are numbered in pre-order.
                self.nodes.push($WideNode {
                    thresholds: [<$SimdReal>::splat(Real::INFINITY); $LEVELS],
                    axes,
                    children,
                });

                self.expand(
                    tree,
                    (&mut thresholds, &mut axes, &mut children),
                    SectorKind::Split(split),
                    0,
                    0,
                    $LANES,
                );

                self.nodes[id as usize] = $WideNode {
                    thresholds: thresholds.map(<$SimdReal>::from),
                    axes,
                    children,
                };
                id
            }

            #[allow(clippy::type_complexity)]
            fn expand(
                &mut self,
                tree: &CollisionTree,
                node: (
                    &mut [[Real; $LANES]; $LEVELS],
                    &mut [[u8; $LANES]; $LEVELS],
                    &mut [WideChild; $LANES],
                ),
                kind: SectorKind,
                level: usize,
                lane: usize,
                width: usize,
            ) {
                let (thresholds, axes, children) = node;

                if level == $LEVELS {
                    children[lane] = self.child(tree, kind);
                    return;
                }

                let half = width / 2;

                match kind {
                    SectorKind::Split(id) => {
                        let split = tree.splits()[id as usize];
                        for j in lane..lane + width {
                            let sector = if j < lane + half { &split.left } else { &split.right };
                            thresholds[level][j] = sector.value;
                            axes[level][j] = split.axis as u8;
                        }

                        self.expand(
                            tree,
                            (&mut *thresholds, &mut *axes, &mut *children),
                            split.left.kind(),
                            level + 1,
                            lane,
                            half,
                        );
                        self.expand(
                            tree,
                            (thresholds, axes, children),
                            split.right.kind(),
                            level + 1,
                            lane + half,
                            half,
                        );
                    }
                    SectorKind::Leaf { .. } => {
                        // Pseudo-level: infinite thresholds keep only the left half alive.
                        self.expand(
                            tree,
                            (thresholds, axes, children),
                            kind,
                            level + 1,
                            lane,
                            half,
                        );
                    }
                }
            }

            /// The number of wide nodes of this tree.
            #[inline]
            pub fn num_nodes(&self) -> usize {
                self.nodes.len()
            }

            /// The map shared with the collision tree this was flattened from.
            #[inline]
            pub fn map(&self) -> &[u32] {
                &self.map
            }

            /// Iterates through the map entries of all the leaves `sphere` may reach.
            ///
            /// This reaches exactly the leaves reached by [`CollisionTree::candidates`] for
            /// the same sphere.
            pub fn candidates(&self, sphere: &Sphere) -> $WideCandidates<'_> {
                let mut stack = SmallVec::new();
                stack.push(self.root);

                $WideCandidates {
                    tree: self,
                    center: sphere.center,
                    radius: <$SimdReal>::splat(sphere.radius),
                    stack,
                    leaf: [].iter(),
                }
            }

            /// Iterates through the triangles of `source` intersecting `sphere`.
            ///
            /// `source` must be the triangle source of the collision tree this was
            /// flattened from.
            pub fn intersections<'a, S: TriangleSource + ?Sized>(
                &'a self,
                source: &'a S,
                sphere: &Sphere,
            ) -> impl Iterator<Item = Intersection> + 'a {
                let shape = QueryShape::Sphere(*sphere);
                let mut candidates = self.candidates(sphere);

                if !source.coarse_volume().intersects_aabb(&shape.aabb()) {
                    candidates.stack.clear();
                }

                candidates.filter_map(move |i| {
                    shape
                        .contact_with_triangle(&source.triangle(i))
                        .map(|contact| Intersection::new(contact, source.triangle_id(i)))
                })
            }

            /// Does `sphere` intersect any triangle of `source`?
            pub fn intersects<S: TriangleSource + ?Sized>(&self, source: &S, sphere: &Sphere) -> bool {
                self.intersections(source, sphere).next().is_some()
            }
        }

        /// Iterator over the map entries of every wide-tree leaf a sphere may reach.
        pub struct $WideCandidates<'a> {
            tree: &'a $WideTree,
            center: Point<Real>,
            radius: $SimdReal,
            stack: SmallVec<[WideChild; TRAVERSAL_STACK_SIZE]>,
            leaf: core::slice::Iter<'a, u32>,
        }

        impl Iterator for $WideCandidates<'_> {
            type Item = u32;

            fn next(&mut self) -> Option<u32> {
                loop {
                    if let Some(triangle) = self.leaf.next() {
                        return Some(*triangle);
                    }

                    let child = self.stack.pop()?;

                    if child.is_leaf() {
                        let start = child.index as usize;
                        self.leaf = self.tree.map[start..start + child.count as usize].iter();
                        continue;
                    }

                    let node = &self.tree.nodes[child.index as usize];
                    let mut mask = $WideTree::FULL_MASK;

                    for level in 0..$LEVELS {
                        let axes = &node.axes[level];
                        let coords: [Real; $LANES] =
                            core::array::from_fn(|j| self.center[axes[j] as usize]);
                        // Positive distances point toward the excluded side of each lane.
                        let dist =
                            (<$SimdReal>::from(coords) - node.thresholds[level]) * self.tree.signs[level];
                        let excluded = dist.simd_gt(self.radius).bitmask();
                        mask &= excluded ^ $WideTree::FULL_MASK;
                    }

                    while mask != 0 {
                        let lane = mask.trailing_zeros() as usize;
                        mask &= mask - 1;

                        let child = node.children[lane];
                        if !child.is_leaf() || child.count > 0 {
                            self.stack.push(child);
                        }
                    }
                }
            }
        }
    }
);

impl_wide_tree!(
    /// A collision tree regrouped into 4-lane nodes of 2 split levels (128-bit SIMD).
    WideTree4, WideNode4, WideCandidates4, SimdReal4, 4, 2
);

impl_wide_tree!(
    /// A collision tree regrouped into 8-lane nodes of 3 split levels (256-bit SIMD).
    WideTree8, WideNode8, WideCandidates8, SimdReal8, 8, 3
);
