//! Whole-world composition of mesh chunks under a hierarchy of plane sections.

pub use self::merge::{MergeError, MergedWorld};
pub use self::plane_section::{PlaneSection, SectionNode};
pub use self::world::{World, WorldError, WorldIntersections};

mod merge;
mod plane_section;
mod world;
