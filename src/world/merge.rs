use crate::bounding_volume::{Aabb, CoarseVolume};
use crate::collider::{Intersections, TreeCollider, TriangleSource};
use crate::math::{Point, Real};
use crate::partitioning::{CollisionTree, Sector, Split, TreeFormatError};
use crate::query::{Ray, RayHit, TriangleId};
use crate::shape::{QueryShape, Triangle};
use crate::world::{PlaneSection, SectionNode, World};

/// Error indicating that a world cannot be merged into a single collision tree.
#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    /// The world has no triangle at all.
    #[error("the world has no geometry to merge.")]
    NoGeometry,
    /// The world has a shape the merge does not handle.
    #[error("merge not implemented: {0}.")]
    NotImplemented(&'static str),
    /// The merged tree is inconsistent.
    #[error(transparent)]
    Tree(#[from] TreeFormatError),
}

// Offsets of one chunk inside the merged buffers.
#[derive(Copy, Clone, Debug, Default)]
struct ChunkBase {
    split: u32,
    map: u32,
    triangle: u32,
    vertex: u32,
}

/// A whole world flattened into a single collision tree.
///
/// Plane sections become the first splits of the tree, followed by the splits of
/// every chunk in chunk order. Vertices, triangles and map entries are concatenated
/// with the matching offsets, so queries run without the two-level dispatch of
/// [`World`] and still report `(chunk, triangle)` ids.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MergedWorld {
    tree: CollisionTree,
    vertices: Vec<Point<Real>>,
    triangles: Vec<[u32; 3]>,
    triangle_ids: Vec<TriangleId>,
    bounds: Aabb,
}

impl MergedWorld {
    /// Merges the plane hierarchy and all the chunk trees of `world` into one tree.
    ///
    /// Fails with [`MergeError::NotImplemented`] if the world is a single root chunk.
    pub fn merge(world: &World) -> Result<Self, MergeError> {
        let root = match world.root() {
            SectionNode::Plane(section) => section,
            SectionNode::Chunk(_) => {
                return Err(MergeError::NotImplemented(
                    "worlds made of a single root chunk",
                ))
            }
        };

        if world.num_triangles() == 0 {
            return Err(MergeError::NoGeometry);
        }

        let mut num_planes = 0;
        world.root().visit(&mut |node| {
            if let SectionNode::Plane(_) = node {
                num_planes += 1;
            }
        });

        let trees: Vec<&CollisionTree> = world
            .chunks()
            .iter()
            .map(|chunk| chunk.collision_tree_or_naive())
            .collect();

        let mut bases = Vec::with_capacity(trees.len());
        let mut next = ChunkBase {
            split: num_planes,
            ..ChunkBase::default()
        };
        for (chunk, tree) in world.chunks().iter().zip(&trees) {
            bases.push(next);
            next.split += tree.num_splits() as u32;
            next.map += tree.map().len() as u32;
            next.triangle += chunk.num_triangles() as u32;
            next.vertex += chunk.vertices().len() as u32;
        }

        let mut splits = Vec::with_capacity(next.split as usize);
        let _ = merge_planes(root, &trees, &bases, &mut splits);

        let mut map = Vec::with_capacity(next.map as usize);
        let mut vertices = Vec::with_capacity(next.vertex as usize);
        let mut triangles = Vec::with_capacity(next.triangle as usize);
        let mut triangle_ids = Vec::with_capacity(next.triangle as usize);

        for (c, (chunk, tree)) in world.chunks().iter().zip(&trees).enumerate() {
            let base = bases[c];

            splits.extend(tree.splits().iter().map(|split| {
                let rebase = |sector: &Sector| {
                    if sector.is_leaf() {
                        Sector::leaf(sector.value, sector.index + base.map, sector.count)
                    } else {
                        Sector::split(sector.value, sector.index + base.split)
                    }
                };
                Split::new(split.axis, rebase(&split.left), rebase(&split.right))
            }));
            map.extend(tree.map().iter().map(|i| i + base.triangle));
            vertices.extend_from_slice(chunk.vertices());
            triangles.extend(chunk.triangles().iter().map(|idx| idx.map(|i| i + base.vertex)));
            triangle_ids.extend((0..chunk.num_triangles() as u32).map(|triangle| {
                TriangleId::World {
                    chunk: c as u32,
                    triangle,
                }
            }));
        }

        log::debug!(
            "merged {} planes and {} chunks into {} splits, {} map entries and {} triangles.",
            num_planes,
            trees.len(),
            splits.len(),
            map.len(),
            triangles.len()
        );

        Ok(Self {
            tree: CollisionTree::new(splits, map)?,
            vertices,
            triangles,
            triangle_ids,
            bounds: *world.bounds(),
        })
    }

    /// The merged collision tree.
    #[inline]
    pub fn tree(&self) -> &CollisionTree {
        &self.tree
    }

    /// The vertices of all the chunks, in chunk order.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The triangles of all the chunks, in chunk order, indexing [`Self::vertices`].
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The `(chunk, triangle)` id of each merged triangle.
    #[inline]
    pub fn triangle_ids(&self) -> &[TriangleId] {
        &self.triangle_ids
    }

    /// The union of the bounds of all the chunks.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// The merged tree paired with the merged triangles.
    #[inline]
    pub fn collider(&self) -> TreeCollider<'_, Self> {
        TreeCollider::new(&self.tree, self)
    }

    /// Finds the nearest triangle hit by `ray` with a ray parameter up to `max_length`.
    pub fn cast(&self, ray: &Ray, max_length: Real) -> Option<RayHit> {
        self.collider().cast(ray, max_length)
    }

    /// Does `shape` intersect any triangle of the world?
    pub fn intersects(&self, shape: &QueryShape) -> bool {
        self.collider().intersects(shape)
    }

    /// Iterates lazily through the triangles of the world intersecting `shape`.
    pub fn intersections(&self, shape: &QueryShape) -> Intersections<'_, Self> {
        self.collider().intersections(shape)
    }
}

impl TriangleSource for MergedWorld {
    #[inline]
    fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    fn triangle(&self, i: u32) -> Triangle {
        let idx = self.triangles[i as usize];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }

    #[inline]
    fn triangle_id(&self, i: u32) -> TriangleId {
        self.triangle_ids[i as usize]
    }

    #[inline]
    fn coarse_volume(&self) -> CoarseVolume {
        CoarseVolume::Box(self.bounds)
    }
}

/// Allocates the slot of `section` and of its descendant planes in pre-order.
fn merge_planes(
    section: &PlaneSection,
    trees: &[&CollisionTree],
    bases: &[ChunkBase],
    splits: &mut Vec<Split>,
) -> u32 {
    let id = splits.len() as u32;
    let placeholder = Sector::leaf(0.0, 0, 0);
    splits.push(Split::new(section.axis, placeholder, placeholder));

    let sector = |value: Real, node: &SectionNode, splits: &mut Vec<Split>| match node {
        SectionNode::Plane(child) => {
            Sector::split(value, merge_planes(child, trees, bases, splits))
        }
        SectionNode::Chunk(chunk) => {
            let tree = &trees[*chunk as usize];
            let base = bases[*chunk as usize];

            if tree.num_splits() > 0 {
                Sector::split(value, base.split)
            } else {
                Sector::leaf(value, base.map, tree.map().len() as u32)
            }
        }
    };

    let left = sector(section.left_value, &section.left, splits);
    let right = sector(section.right_value, &section.right, splits);
    splits[id as usize] = Split::new(section.axis, left, right);
    id
}
