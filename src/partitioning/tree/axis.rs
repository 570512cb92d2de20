/// One of the three coordinate axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Axis {
    /// The X axis.
    X = 0,
    /// The Y axis.
    Y = 1,
    /// The Z axis.
    Z = 2,
}

impl Axis {
    /// All the axes, in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The coordinate index of this axis.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The axis with the given coordinate index, if it is one of 0, 1, 2.
    #[inline]
    pub fn from_index(i: u32) -> Option<Axis> {
        Self::ALL.get(i as usize).copied()
    }
}
