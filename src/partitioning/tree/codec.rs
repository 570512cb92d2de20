//! Binary layout of a collision tree.
//!
//! All values are little-endian:
//!
//! ```text
//! i32               number of splits + 1
//! i32               map length
//! per split:        u32 packed axis and leaf flags
//!                   u16 right index, u16 left index
//!                   f32 right value, f32 left value
//! per leaf sector:  u16 map start, u16 entry count
//! per map entry:    i32 triangle index
//! ```
//!
//! Leaf sectors carry no range in their split header. Their ranges follow all the
//! headers, in the depth-first order of a stack walk that pushes the right sector
//! before the left one. A tree without splits stores a single range covering the map.

use super::collision_tree::validate_split_references;
use crate::math::Real;
use crate::partitioning::{Axis, CollisionTree, Sector, SectorKind, Side, Split, TreeFormatError};
use smallvec::SmallVec;
use std::io::{Read, Write};

bitflags::bitflags! {
    /// Leaf flags of the packed word of a split header.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct PackedFlags: u32 {
        /// The value written for a leaf left sector.
        const LEFT_LEAF = 0x0000_0001;
        /// The value written for a leaf right sector.
        const RIGHT_LEAF = 0x0000_0100;
        /// The 8-bit field of the left flag; any non-zero value marks a leaf.
        const LEFT_FIELD = 0x0000_00ff;
        /// The 8-bit field of the right flag; any non-zero value marks a leaf.
        const RIGHT_FIELD = 0x0000_ff00;
    }
}

const AXIS_SHIFT: u32 = 16;

/// The leaf sectors of `splits` in stream order.
fn leaf_sectors(splits: &[Split]) -> Vec<(usize, Side)> {
    let mut result = vec![];
    let mut stack: SmallVec<[(usize, Side); 32]> = SmallVec::new();

    if !splits.is_empty() {
        stack.push((0, Side::Right));
        stack.push((0, Side::Left));
    }

    while let Some((id, side)) = stack.pop() {
        match splits[id].sector(side).kind() {
            SectorKind::Split(child) => {
                stack.push((child as usize, Side::Right));
                stack.push((child as usize, Side::Left));
            }
            SectorKind::Leaf { .. } => result.push((id, side)),
        }
    }

    result
}

fn read_bytes<const N: usize>(reader: &mut impl Read) -> Result<[u8; N], TreeFormatError> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_i32(reader: &mut impl Read) -> Result<i32, TreeFormatError> {
    read_bytes(reader).map(i32::from_le_bytes)
}

fn read_u32(reader: &mut impl Read) -> Result<u32, TreeFormatError> {
    read_bytes(reader).map(u32::from_le_bytes)
}

fn read_u16(reader: &mut impl Read) -> Result<u16, TreeFormatError> {
    read_bytes(reader).map(u16::from_le_bytes)
}

fn read_f32(reader: &mut impl Read) -> Result<Real, TreeFormatError> {
    read_bytes(reader).map(f32::from_le_bytes)
}

fn to_u16(what: &'static str, value: u32) -> Result<u16, TreeFormatError> {
    u16::try_from(value).map_err(|_| TreeFormatError::TooLarge {
        what,
        value: value as usize,
    })
}

fn to_i32(what: &'static str, value: usize) -> Result<i32, TreeFormatError> {
    i32::try_from(value).map_err(|_| TreeFormatError::TooLarge { what, value })
}

impl CollisionTree {
    /// Decodes a collision tree from its binary layout.
    ///
    /// Fails with [`TreeFormatError::Truncated`] if the stream ends early. Nothing is
    /// recovered from a malformed stream.
    pub fn read_from(reader: &mut impl Read) -> Result<Self, TreeFormatError> {
        let leaf_count = read_i32(reader)?;
        if leaf_count < 1 {
            return Err(TreeFormatError::InvalidSplitCount(leaf_count));
        }

        let map_len = read_i32(reader)?;
        if map_len < 0 {
            return Err(TreeFormatError::InvalidMapLength(map_len));
        }

        let num_splits = leaf_count as usize - 1;
        let mut splits = Vec::with_capacity(num_splits.min(u16::MAX as usize + 1));

        for id in 0..num_splits {
            let packed = read_u32(reader)?;
            let right_index = read_u16(reader)?;
            let left_index = read_u16(reader)?;
            let right_value = read_f32(reader)?;
            let left_value = read_f32(reader)?;

            let axis_id = packed >> AXIS_SHIFT;
            let axis = Axis::from_index(axis_id).ok_or(TreeFormatError::InvalidAxis {
                split: id,
                axis: axis_id,
            })?;
            let flags = PackedFlags::from_bits_truncate(packed);

            // Leaf ranges are filled by the second pass.
            let left = if flags.intersects(PackedFlags::LEFT_FIELD) {
                Sector::leaf(left_value, 0, 0)
            } else {
                Sector::split(left_value, left_index as u32)
            };
            let right = if flags.intersects(PackedFlags::RIGHT_FIELD) {
                Sector::leaf(right_value, 0, 0)
            } else {
                Sector::split(right_value, right_index as u32)
            };

            splits.push(Split::new(axis, left, right));
        }

        // Must be checked before walking the splits to rule out cycles.
        validate_split_references(&splits)?;

        if splits.is_empty() {
            let start = read_u16(reader)?;
            let count = read_u16(reader)?;
            if start != 0 || count as i32 != map_len {
                return Err(TreeFormatError::InvalidRootLeaf);
            }
        } else {
            for (id, side) in leaf_sectors(&splits) {
                let start = read_u16(reader)?;
                let count = read_u16(reader)?;
                let sector = splits[id].sector_mut(side);
                sector.index = start as u32;
                sector.count = count as u32;
            }
        }

        let mut map = Vec::with_capacity((map_len as usize).min(u16::MAX as usize + 1));
        for index in 0..map_len as usize {
            let value = read_i32(reader)?;
            if value < 0 {
                return Err(TreeFormatError::NegativeMapEntry { index, value });
            }
            map.push(value as u32);
        }

        CollisionTree::new(splits, map)
    }

    /// Decodes a collision tree from a byte slice. Trailing bytes are ignored.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self, TreeFormatError> {
        Self::read_from(&mut bytes)
    }

    /// Encodes this tree with its binary layout.
    ///
    /// Fails with [`TreeFormatError::TooLarge`] before writing anything if an index or
    /// a count does not fit its 16-bit field.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), TreeFormatError> {
        let splits = self.splits();
        let map = self.map();

        let leaf_count = to_i32("split count", splits.len() + 1)?;
        let map_len = to_i32("map length", map.len())?;

        let mut headers = Vec::with_capacity(splits.len());
        for split in splits {
            let mut flags = PackedFlags::empty();
            let mut indices = [0u16; 2];

            for (k, (sector, leaf_flag)) in [
                (&split.right, PackedFlags::RIGHT_LEAF),
                (&split.left, PackedFlags::LEFT_LEAF),
            ]
            .into_iter()
            .enumerate()
            {
                match sector.kind() {
                    SectorKind::Split(target) => indices[k] = to_u16("split index", target)?,
                    SectorKind::Leaf { start, count } => {
                        let _ = to_u16("leaf start", start)?;
                        let _ = to_u16("leaf count", count)?;
                        flags |= leaf_flag;
                    }
                }
            }

            let packed = ((split.axis.index() as u32) << AXIS_SHIFT) | flags.bits();
            headers.push((packed, indices));
        }

        let leaves: Vec<(u16, u16)> = if splits.is_empty() {
            vec![(0, to_u16("map length", map.len() as u32)?)]
        } else {
            // Ranges were checked against the 16-bit fields above.
            leaf_sectors(splits)
                .into_iter()
                .map(|(id, side)| {
                    let sector = splits[id].sector(side);
                    (sector.index as u16, sector.count as u16)
                })
                .collect()
        };

        let entries = map
            .iter()
            .map(|value| to_i32("map entry", *value as usize))
            .collect::<Result<Vec<_>, _>>()?;

        writer.write_all(&leaf_count.to_le_bytes())?;
        writer.write_all(&map_len.to_le_bytes())?;

        for (split, (packed, [right_index, left_index])) in splits.iter().zip(headers) {
            writer.write_all(&packed.to_le_bytes())?;
            writer.write_all(&right_index.to_le_bytes())?;
            writer.write_all(&left_index.to_le_bytes())?;
            writer.write_all(&split.right.value.to_le_bytes())?;
            writer.write_all(&split.left.value.to_le_bytes())?;
        }

        for (start, count) in leaves {
            writer.write_all(&start.to_le_bytes())?;
            writer.write_all(&count.to_le_bytes())?;
        }

        for entry in entries {
            writer.write_all(&entry.to_le_bytes())?;
        }

        Ok(())
    }

    /// Encodes this tree into a new byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TreeFormatError> {
        let mut bytes = vec![];
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }
}
