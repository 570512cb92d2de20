//! The slab-split collision tree: format, construction and scalar traversal.

pub use self::axis::Axis;
pub use self::build::TreeBuildParams;
pub use self::collision_tree::{CollisionTree, TreeFormatError};
pub use self::split::{
    classify, ray_sector_ranges, PlaneClass, Sector, SectorKind, Side, Split, SENTINEL,
};
pub use self::traversal::{Candidates, LeafCost};

mod axis;
mod build;
mod codec;
mod collision_tree;
mod split;
mod traversal;
