use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::partitioning::{Axis, CollisionTree, Sector, Split};
use crate::shape::Triangle;

/// Parameters of the offline collision tree builder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TreeBuildParams {
    /// Leaves with at most this many triangles are not split further. Values below 1 count as 1.
    pub max_leaf_triangles: usize,
    /// Maximum number of splits between the root and any leaf.
    pub max_depth: usize,
}

impl Default for TreeBuildParams {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 8,
            max_depth: 24,
        }
    }
}

struct TreeBuilder {
    aabbs: Vec<Aabb>,
    centers: Vec<Point<Real>>,
    max_leaf: usize,
    max_depth: usize,
    splits: Vec<Split>,
    map: Vec<u32>,
}

impl TreeBuilder {
    fn is_leaf(&self, len: usize, depth: usize) -> bool {
        len <= self.max_leaf || depth >= self.max_depth
    }

    fn sector(&mut self, value: Real, indices: &mut [u32], depth: usize) -> Sector {
        if self.is_leaf(indices.len(), depth) {
            let start = self.map.len() as u32;
            self.map.extend_from_slice(indices);
            Sector::leaf(value, start, indices.len() as u32)
        } else {
            Sector::split(value, self.split(indices, depth))
        }
    }

    /// Splits `indices` at the median of the widest centroid extent.
    ///
    /// Splits are allocated in pre-order so children always come after their parent.
    fn split(&mut self, indices: &mut [u32], depth: usize) -> u32 {
        let id = self.splits.len() as u32;
        let placeholder = Sector::leaf(0.0, 0, 0);
        self.splits.push(Split::new(Axis::X, placeholder, placeholder));

        let mut centroid_aabb = Aabb::new_invalid();
        for i in indices.iter() {
            centroid_aabb.take_point(self.centers[*i as usize]);
        }

        let extents = centroid_aabb.maxs - centroid_aabb.mins;
        let axis = Axis::ALL[extents.imax()];
        let dim = axis.index();

        let mid = indices.len() / 2;
        let centers = &self.centers;
        let _ = indices.select_nth_unstable_by(mid, |a, b| {
            centers[*a as usize][dim]
                .partial_cmp(&centers[*b as usize][dim])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let (left, right) = indices.split_at_mut(mid);
        let left_value = left
            .iter()
            .map(|i| self.aabbs[*i as usize].maxs[dim])
            .fold(-Real::MAX, Real::max);
        let right_value = right
            .iter()
            .map(|i| self.aabbs[*i as usize].mins[dim])
            .fold(Real::MAX, Real::min);

        let left = self.sector(left_value, left, depth + 1);
        let right = self.sector(right_value, right, depth + 1);
        self.splits[id as usize] = Split::new(axis, left, right);
        id
    }
}

impl CollisionTree {
    /// Builds a collision tree for the given triangles.
    ///
    /// Each split cuts its triangles at the median centroid along the axis where the
    /// centroids spread the most. The left threshold is the highest coordinate reached
    /// by the left triangles and the right threshold the lowest reached by the right
    /// ones, so triangles are never duplicated and the two sectors may overlap.
    ///
    /// # Panics
    /// Panics if a triangle references a vertex out of bounds.
    pub fn build(
        vertices: &[Point<Real>],
        triangles: &[[u32; 3]],
        params: &TreeBuildParams,
    ) -> CollisionTree {
        let max_leaf = params.max_leaf_triangles.max(1);

        if triangles.len() <= max_leaf || params.max_depth == 0 {
            return CollisionTree::naive(triangles.len());
        }

        let (aabbs, centers) = triangles
            .iter()
            .map(|idx| {
                let tri = Triangle::new(
                    vertices[idx[0] as usize],
                    vertices[idx[1] as usize],
                    vertices[idx[2] as usize],
                );
                (tri.aabb(), tri.center())
            })
            .unzip();

        let mut builder = TreeBuilder {
            aabbs,
            centers,
            max_leaf,
            max_depth: params.max_depth,
            splits: vec![],
            map: Vec::with_capacity(triangles.len()),
        };

        let mut indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let _ = builder.split(&mut indices, 0);

        log::debug!(
            "built a collision tree with {} splits for {} triangles.",
            builder.splits.len(),
            triangles.len()
        );

        CollisionTree::from_parts_unchecked(builder.splits, builder.map)
    }
}
