use crate::math::Real;
use crate::partitioning::{Axis, Side};

/// A node of the world hierarchy: either a plane section or a mesh chunk.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum SectionNode {
    /// An internal node.
    Plane(Box<PlaneSection>),
    /// A leaf: the index of a mesh chunk of the world.
    Chunk(u32),
}

/// An internal node of the world hierarchy, splitting space with a pair of axis-aligned planes.
///
/// Like the splits of a collision tree, the left child covers `axis <= left_value`
/// and the right child `axis >= right_value`; the two may overlap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PlaneSection {
    /// The axis of both planes.
    pub axis: Axis,
    /// The threshold of the left child.
    pub left_value: Real,
    /// The threshold of the right child.
    pub right_value: Real,
    /// The left child.
    pub left: SectionNode,
    /// The right child.
    pub right: SectionNode,
}

impl PlaneSection {
    /// Creates a new plane section.
    pub fn new(
        axis: Axis,
        left_value: Real,
        right_value: Real,
        left: SectionNode,
        right: SectionNode,
    ) -> Self {
        Self {
            axis,
            left_value,
            right_value,
            left,
            right,
        }
    }

    /// The child on the given side.
    #[inline]
    pub fn child(&self, side: Side) -> &SectionNode {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// The threshold of the child on the given side.
    #[inline]
    pub fn value(&self, side: Side) -> Real {
        match side {
            Side::Left => self.left_value,
            Side::Right => self.right_value,
        }
    }
}

impl From<PlaneSection> for SectionNode {
    fn from(section: PlaneSection) -> Self {
        SectionNode::Plane(Box::new(section))
    }
}

impl SectionNode {
    /// Calls `f` on this node and all its descendants, in depth-first pre-order.
    pub fn visit(&self, f: &mut impl FnMut(&SectionNode)) {
        f(self);
        if let SectionNode::Plane(section) = self {
            section.left.visit(f);
            section.right.visit(f);
        }
    }
}
