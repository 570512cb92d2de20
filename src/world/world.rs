use crate::bounding_volume::Aabb;
use crate::collider::{ChunkCollider, ChunkIntersections};
use crate::math::Real;
use crate::partitioning::{classify, ray_sector_ranges, PlaneClass, Side, TRAVERSAL_STACK_SIZE};
use crate::query::{Intersection, Ray, RayHit};
use crate::shape::{MeshChunk, QueryShape};
use crate::world::{PlaneSection, SectionNode};
use smallvec::SmallVec;

/// Indicates that the world hierarchy handed by the loader is inconsistent.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// Exactly one of the root plane section and the root chunk must be given.
    #[error("a world needs exactly one root (root section given: {has_section}, root chunk given: {has_chunk}).")]
    InvalidRoot {
        /// Whether a root plane section was given.
        has_section: bool,
        /// Whether a root chunk was given.
        has_chunk: bool,
    },
    /// A node references a chunk that does not exist.
    #[error("the hierarchy references the chunk {chunk} but the world only has {num_chunks} chunks.")]
    ChunkOutOfBounds {
        /// The referenced chunk.
        chunk: u32,
        /// The number of chunks of the world.
        num_chunks: usize,
    },
    /// A chunk is referenced by several nodes.
    #[error("the chunk {0} is referenced more than once.")]
    DuplicateChunk(u32),
    /// A chunk is not referenced by any node.
    #[error("the chunk {0} is not referenced by the hierarchy.")]
    UnreferencedChunk(u32),
}

/// Static world geometry: mesh chunks at the leaves of a plane-section hierarchy.
///
/// Queries traverse the plane hierarchy like a collision tree, then delegate to the
/// collision tree of each reached chunk. Reported triangle ids carry the chunk index.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct World {
    root: SectionNode,
    chunks: Vec<MeshChunk>,
    bounds: Aabb,
}

impl World {
    /// Assembles a world from the hierarchy and chunks handed by the loader.
    ///
    /// Exactly one of `root_section` and `root_chunk` must be given, and every chunk
    /// must be referenced exactly once. Chunks without a collision tree get the naive one.
    pub fn new(
        root_section: Option<PlaneSection>,
        root_chunk: Option<u32>,
        mut chunks: Vec<MeshChunk>,
    ) -> Result<Self, WorldError> {
        let root = match (root_section, root_chunk) {
            (Some(section), None) => SectionNode::from(section),
            (None, Some(chunk)) => SectionNode::Chunk(chunk),
            (section, chunk) => {
                return Err(WorldError::InvalidRoot {
                    has_section: section.is_some(),
                    has_chunk: chunk.is_some(),
                })
            }
        };

        let num_chunks = chunks.len();
        let mut referenced = vec![false; num_chunks];
        let mut error = None;
        root.visit(&mut |node| {
            if let SectionNode::Chunk(chunk) = node {
                let err = match referenced.get_mut(*chunk as usize) {
                    None => Some(WorldError::ChunkOutOfBounds {
                        chunk: *chunk,
                        num_chunks,
                    }),
                    Some(true) => Some(WorldError::DuplicateChunk(*chunk)),
                    Some(seen) => {
                        *seen = true;
                        None
                    }
                };
                error = error.or(err);
            }
        });

        if let Some(err) = error {
            return Err(err);
        }

        if let Some(chunk) = referenced.iter().position(|seen| !seen) {
            return Err(WorldError::UnreferencedChunk(chunk as u32));
        }

        let mut bounds = Aabb::new_invalid();
        for chunk in &mut chunks {
            let _ = chunk.ensure_collision_tree();
            bounds.merge(&chunk.bounds().aabb());
        }

        Ok(Self {
            root,
            chunks,
            bounds,
        })
    }

    /// The root of the world hierarchy.
    #[inline]
    pub fn root(&self) -> &SectionNode {
        &self.root
    }

    /// The mesh chunks of this world.
    #[inline]
    pub fn chunks(&self) -> &[MeshChunk] {
        &self.chunks
    }

    /// The union of the bounds of all the chunks.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// The total number of triangles of this world.
    pub fn num_triangles(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.num_triangles()).sum()
    }

    /// The leaf collider of the `chunk`-th chunk.
    pub fn chunk_collider(&self, chunk: u32) -> ChunkCollider<'_> {
        ChunkCollider::new(&self.chunks[chunk as usize])
    }

    /// Finds the nearest triangle hit by `ray` with a ray parameter up to `max_length`.
    pub fn cast(&self, ray: &Ray, max_length: Real) -> Option<RayHit> {
        // Plane thresholds may coincide with faces of the bounds: those only reject.
        let _ = self.bounds.clip_ray(ray, 0.0, max_length)?;

        let mut best_t = max_length;
        let mut best: Option<RayHit> = None;
        let mut stack: SmallVec<[(&SectionNode, Real, Real); TRAVERSAL_STACK_SIZE]> =
            SmallVec::new();
        stack.push((&self.root, 0.0, max_length));

        while let Some((node, t0, t1)) = stack.pop() {
            if t0 > best_t {
                continue;
            }

            match node {
                SectionNode::Chunk(chunk) => {
                    let hit = self.chunk_collider(*chunk).cast(ray, best_t);

                    if let Some(hit) = hit {
                        if best.is_none() || hit.distance < best_t {
                            best_t = hit.distance;
                            best = Some(RayHit {
                                triangle: hit.triangle.in_chunk(*chunk),
                                ..hit
                            });
                        }
                    }
                }
                SectionNode::Plane(section) => {
                    let ranges = ray_sector_ranges(
                        ray,
                        section.axis,
                        section.left_value,
                        section.right_value,
                        t0,
                        t1,
                    );

                    for (side, t0, t1) in ranges.into_iter().flatten() {
                        stack.push((section.child(side), t0, t1));
                    }
                }
            }
        }

        best
    }

    /// Does `shape` intersect any triangle of the world?
    pub fn intersects(&self, shape: &QueryShape) -> bool {
        self.intersections(shape).next().is_some()
    }

    /// Iterates lazily through the triangles of the world intersecting `shape`.
    pub fn intersections(&self, shape: &QueryShape) -> WorldIntersections<'_> {
        let mut stack = SmallVec::new();
        if self.bounds.intersects(&shape.aabb()) {
            stack.push(&self.root);
        }

        WorldIntersections {
            world: self,
            shape: *shape,
            stack,
            current: None,
        }
    }
}

/// Iterator over the triangles of a [`World`] intersecting a shape.
pub struct WorldIntersections<'a> {
    world: &'a World,
    shape: QueryShape,
    stack: SmallVec<[&'a SectionNode; TRAVERSAL_STACK_SIZE]>,
    current: Option<(u32, ChunkIntersections<'a>)>,
}

impl Iterator for WorldIntersections<'_> {
    type Item = Intersection;

    fn next(&mut self) -> Option<Intersection> {
        loop {
            if let Some((chunk, inner)) = &mut self.current {
                if let Some(hit) = inner.next() {
                    return Some(hit.in_chunk(*chunk));
                }
            }

            self.current = None;

            match self.stack.pop()? {
                SectionNode::Chunk(chunk) => {
                    let inner = self.world.chunk_collider(*chunk).intersections(&self.shape);
                    self.current = Some((*chunk, inner));
                }
                SectionNode::Plane(section) => {
                    for side in [Side::Right, Side::Left] {
                        if classify(&self.shape, section.axis, section.value(side), side)
                            != PlaneClass::Outside
                        {
                            self.stack.push(section.child(side));
                        }
                    }
                }
            }
        }
    }
}
