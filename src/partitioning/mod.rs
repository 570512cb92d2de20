//! Spatial partitioning of triangle geometry.

pub use self::tree::{
    classify, ray_sector_ranges, Axis, Candidates, CollisionTree, LeafCost, PlaneClass, Sector,
    SectorKind, Side, Split, TreeBuildParams, TreeFormatError, SENTINEL,
};
pub use self::wide::{WideCandidates4, WideCandidates8, WideChild, WideTree4, WideTree8};

mod tree;
mod wide;

/// Inline capacity of the traversal stacks; deeper trees spill to the heap.
pub(crate) const TRAVERSAL_STACK_SIZE: usize = 32;
