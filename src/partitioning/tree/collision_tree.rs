use crate::partitioning::{Sector, SectorKind, Split};
use std::io;

/// Error indicating that a collision tree is malformed or cannot be encoded.
#[derive(thiserror::Error, Debug)]
pub enum TreeFormatError {
    /// The stream ended before the whole tree was read.
    #[error("the collision tree stream is truncated.")]
    Truncated,
    /// The leaf-count header is not a positive number.
    #[error("invalid collision tree header: {0} leaves.")]
    InvalidSplitCount(i32),
    /// The map-length header is negative.
    #[error("invalid collision tree header: map length {0}.")]
    InvalidMapLength(i32),
    /// A map entry is negative.
    #[error("the map entry {index} has the negative value {value}.")]
    NegativeMapEntry {
        /// The position of the entry in the map.
        index: usize,
        /// The decoded value.
        value: i32,
    },
    /// A split header stores an axis other than 0, 1, 2.
    #[error("the split {split} has the invalid axis {axis}.")]
    InvalidAxis {
        /// The faulty split.
        split: usize,
        /// The decoded axis.
        axis: u32,
    },
    /// A sector references a split that does not exist.
    #[error("the split {split} references the split {target} but the tree only has {num_splits} splits.")]
    SplitIndexOutOfBounds {
        /// The faulty split.
        split: usize,
        /// The referenced split.
        target: u32,
        /// The number of splits of the tree.
        num_splits: usize,
    },
    /// A sector references a split that does not come after its own.
    #[error("the split {split} references the split {target} which does not come after it.")]
    BackwardReference {
        /// The faulty split.
        split: usize,
        /// The referenced split.
        target: u32,
    },
    /// Two sectors reference the same split.
    #[error("the split {split} references the split {target} which is already referenced.")]
    SplitReferencedTwice {
        /// The split holding the second reference.
        split: usize,
        /// The referenced split.
        target: u32,
    },
    /// A split is not reachable from the root.
    #[error("the split {0} is not reachable from the root split.")]
    UnreachableSplit(usize),
    /// A leaf range does not fit inside the map.
    #[error("a leaf of the split {split} covers {count} map entries from {start} but the map only has {map_len} entries.")]
    LeafOutOfBounds {
        /// The faulty split.
        split: usize,
        /// The first map entry of the leaf.
        start: u32,
        /// The number of map entries of the leaf.
        count: u32,
        /// The length of the map.
        map_len: usize,
    },
    /// The single leaf of a tree without splits does not cover the whole map.
    #[error("the root leaf of a tree without splits must cover the whole map.")]
    InvalidRootLeaf,
    /// A value does not fit the fixed-size fields of the binary layout.
    #[error("{what} = {value} does not fit the binary collision tree layout.")]
    TooLarge {
        /// The field that overflows.
        what: &'static str,
        /// The value that overflows.
        value: usize,
    },
    /// Any other I/O error.
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for TreeFormatError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TreeFormatError::Truncated
        } else {
            TreeFormatError::Io(err)
        }
    }
}

/// A binary tree of slab splits indexing the triangles of one mesh chunk (or of a merged world).
///
/// The tree is rooted at the split 0. A tree without any split is a single leaf
/// covering the whole map. The map translates leaf ranges into triangle indices and
/// may contain the same triangle several times when it straddles split thresholds.
///
/// A tree is immutable once constructed.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CollisionTree {
    splits: Vec<Split>,
    map: Vec<u32>,
}

impl CollisionTree {
    /// Creates a collision tree from its splits and map.
    ///
    /// Fails if a sector references a split out of bounds or not strictly after its
    /// own (which rules out cycles), or if a leaf range overflows the map.
    pub fn new(splits: Vec<Split>, map: Vec<u32>) -> Result<Self, TreeFormatError> {
        validate_split_references(&splits)?;

        for (i, split) in splits.iter().enumerate() {
            for sector in [&split.left, &split.right] {
                validate_leaf_range(i, sector, map.len())?;
            }
        }

        Ok(Self { splits, map })
    }

    /// The trivial tree: no split, a single leaf covering the triangles `0..num_triangles`.
    ///
    /// Queries against it are correct but test every triangle.
    pub fn naive(num_triangles: usize) -> Self {
        Self {
            splits: vec![],
            map: (0..num_triangles as u32).collect(),
        }
    }

    /// The root of this tree.
    #[inline]
    pub fn root(&self) -> SectorKind {
        if self.splits.is_empty() {
            SectorKind::Leaf {
                start: 0,
                count: self.map.len() as u32,
            }
        } else {
            SectorKind::Split(0)
        }
    }

    /// The splits of this tree.
    #[inline]
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// The number of splits of this tree.
    #[inline]
    pub fn num_splits(&self) -> usize {
        self.splits.len()
    }

    /// The map of this tree.
    #[inline]
    pub fn map(&self) -> &[u32] {
        &self.map
    }

    /// The triangle indices of the given leaf range.
    #[inline]
    pub fn leaf(&self, start: u32, count: u32) -> &[u32] {
        &self.map[start as usize..start as usize + count as usize]
    }

    /// Destructures this tree into its splits and map.
    pub fn into_parts(self) -> (Vec<Split>, Vec<u32>) {
        (self.splits, self.map)
    }

    pub(super) fn from_parts_unchecked(splits: Vec<Split>, map: Vec<u32>) -> Self {
        Self { splits, map }
    }
}

/// Checks that the splits form a single tree rooted at the split 0.
///
/// Every reference must point to a later split, and every split but the root must be
/// referenced exactly once. Walking the splits is linear after this check.
pub(super) fn validate_split_references(splits: &[Split]) -> Result<(), TreeFormatError> {
    let mut referenced = vec![false; splits.len()];

    for (i, split) in splits.iter().enumerate() {
        for sector in [&split.left, &split.right] {
            if let SectorKind::Split(target) = sector.kind() {
                if target as usize >= splits.len() {
                    return Err(TreeFormatError::SplitIndexOutOfBounds {
                        split: i,
                        target,
                        num_splits: splits.len(),
                    });
                }

                if target as usize <= i {
                    return Err(TreeFormatError::BackwardReference { split: i, target });
                }

                if core::mem::replace(&mut referenced[target as usize], true) {
                    return Err(TreeFormatError::SplitReferencedTwice { split: i, target });
                }
            }
        }
    }

    if let Some(unreachable) = referenced.iter().skip(1).position(|seen| !seen) {
        return Err(TreeFormatError::UnreachableSplit(unreachable + 1));
    }

    Ok(())
}

fn validate_leaf_range(split: usize, sector: &Sector, map_len: usize) -> Result<(), TreeFormatError> {
    if let SectorKind::Leaf { start, count } = sector.kind() {
        if start as u64 + count as u64 > map_len as u64 {
            return Err(TreeFormatError::LeafOutOfBounds {
                split,
                start,
                count,
                map_len,
            });
        }
    }

    Ok(())
}
