use oorandom::Rand32;
use slabtree3d::bounding_volume::Aabb;
use slabtree3d::math::{Isometry, Point, Real, Vector};
use slabtree3d::partitioning::{Axis, TreeBuildParams};
use slabtree3d::query::{ray_triangle_intersection, Ray, TriangleId};
use slabtree3d::shape::{MeshChunk, OrientedBox, QueryShape, Segment, Sphere, Triangle};
use slabtree3d::world::{PlaneSection, SectionNode, World};
use std::collections::BTreeSet;

pub const SOUP_EXTENT: Real = 10.0;

pub fn rand_point(rng: &mut Rand32, extent: Real) -> Point<Real> {
    Point::new(
        rng.rand_float() * extent,
        rng.rand_float() * extent,
        rng.rand_float() * extent,
    )
}

pub fn rand_vector(rng: &mut Rand32, extent: Real) -> Vector<Real> {
    Vector::new(
        rng.rand_float() * 2.0 - 1.0,
        rng.rand_float() * 2.0 - 1.0,
        rng.rand_float() * 2.0 - 1.0,
    ) * extent
}

/// Random triangles of size up to `1.5` scattered in `[0, SOUP_EXTENT]³`.
pub fn triangle_soup(rng: &mut Rand32, n: usize) -> Vec<Triangle> {
    (0..n)
        .map(|_| {
            let a = rand_point(rng, SOUP_EXTENT);
            Triangle::new(a, a + rand_vector(rng, 1.5), a + rand_vector(rng, 1.5))
        })
        .collect()
}

pub fn chunk_from_triangles(triangles: &[Triangle]) -> MeshChunk {
    let vertices = triangles.iter().flat_map(|tri| tri.vertices()).collect();
    let indices = (0..triangles.len() as u32)
        .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
        .collect();
    MeshChunk::new(vertices, indices).unwrap()
}

pub fn small_leaves() -> TreeBuildParams {
    TreeBuildParams {
        max_leaf_triangles: 4,
        ..TreeBuildParams::default()
    }
}

/// A plane section separating two groups of triangles along `axis` with a slab.
fn section_between(
    axis: Axis,
    left: &[Triangle],
    right: &[Triangle],
    left_node: SectionNode,
    right_node: SectionNode,
) -> PlaneSection {
    let i = axis.index();
    let left_value = left
        .iter()
        .map(|tri| tri.aabb().maxs[i])
        .fold(-Real::MAX, Real::max);
    let right_value = right
        .iter()
        .map(|tri| tri.aabb().mins[i])
        .fold(Real::MAX, Real::min);
    PlaneSection::new(axis, left_value, right_value, left_node, right_node)
}

/// Splits a soup into four chunks (by centroid quadrant in the XY plane) under two levels of plane sections.
///
/// Returns the world and, for each chunk, its triangles.
pub fn quadrant_world(soup: &[Triangle]) -> (World, Vec<Vec<Triangle>>) {
    let half = SOUP_EXTENT / 2.0;
    let mut quadrants = vec![vec![]; 4];

    for tri in soup {
        let c = tri.center();
        let q = (c.x >= half) as usize * 2 + (c.y >= half) as usize;
        quadrants[q].push(*tri);
    }

    let mut chunks: Vec<MeshChunk> = quadrants.iter().map(|q| chunk_from_triangles(q)).collect();
    for chunk in &mut chunks {
        let _ = chunk.build_collision_tree(&small_leaves());
    }

    let low_x: Vec<Triangle> = quadrants[0].iter().chain(&quadrants[1]).copied().collect();
    let high_x: Vec<Triangle> = quadrants[2].iter().chain(&quadrants[3]).copied().collect();

    let low = section_between(
        Axis::Y,
        &quadrants[0],
        &quadrants[1],
        SectionNode::Chunk(0),
        SectionNode::Chunk(1),
    );
    let high = section_between(
        Axis::Y,
        &quadrants[2],
        &quadrants[3],
        SectionNode::Chunk(2),
        SectionNode::Chunk(3),
    );
    let root = section_between(Axis::X, &low_x, &high_x, low.into(), high.into());

    let world = World::new(Some(root), None, chunks).unwrap();
    (world, quadrants)
}

/// The nearest hit over all the triangles, with its id.
pub fn brute_force_cast(
    triangles: impl IntoIterator<Item = (TriangleId, Triangle)>,
    ray: &Ray,
    max_length: Real,
) -> Option<(Real, TriangleId)> {
    let mut best: Option<(Real, TriangleId)> = None;

    for (id, tri) in triangles {
        if let Some((t, _)) = ray_triangle_intersection(&tri, ray, max_length) {
            if best.map(|(best_t, _)| t < best_t).unwrap_or(true) {
                best = Some((t, id));
            }
        }
    }

    best
}

/// The ids of all the triangles intersecting `shape`.
pub fn brute_force_intersections(
    triangles: impl IntoIterator<Item = (TriangleId, Triangle)>,
    shape: &QueryShape,
) -> BTreeSet<TriangleId> {
    triangles
        .into_iter()
        .filter(|(_, tri)| shape.contact_with_triangle(tri).is_some())
        .map(|(id, _)| id)
        .collect()
}

pub fn local_ids(triangles: &[Triangle]) -> impl Iterator<Item = (TriangleId, Triangle)> + '_ {
    triangles
        .iter()
        .enumerate()
        .map(|(i, tri)| (TriangleId::Local(i as u32), *tri))
}

pub fn world_ids(chunks: &[Vec<Triangle>]) -> impl Iterator<Item = (TriangleId, Triangle)> + '_ {
    chunks.iter().enumerate().flat_map(|(c, tris)| {
        tris.iter().enumerate().map(move |(i, tri)| {
            (
                TriangleId::World {
                    chunk: c as u32,
                    triangle: i as u32,
                },
                *tri,
            )
        })
    })
}

/// A ray from a random point around the soup toward a random point inside it.
pub fn rand_ray(rng: &mut Rand32) -> Ray {
    let origin = rand_point(rng, SOUP_EXTENT * 2.0) - Vector::repeat(SOUP_EXTENT / 2.0);
    let target = rand_point(rng, SOUP_EXTENT);
    Ray::new(origin, target - origin)
}

/// A random query shape of each kind, in turn.
pub fn rand_shape(rng: &mut Rand32, k: usize) -> QueryShape {
    let center = rand_point(rng, SOUP_EXTENT);

    match k % 5 {
        0 => Sphere::new(center, rng.rand_float() * 2.0).into(),
        1 => Aabb::from_half_extents(center, rand_vector(rng, 1.0).abs()).into(),
        2 => {
            let pose = Isometry::new(center.coords, rand_vector(rng, 3.0));
            OrientedBox::from_aabb(&Aabb::from_half_extents(
                Point::origin(),
                rand_vector(rng, 1.5).abs(),
            ))
            .transformed(&pose)
            .into()
        }
        3 => Triangle::new(
            center,
            center + rand_vector(rng, 2.0),
            center + rand_vector(rng, 2.0),
        )
        .into(),
        _ => Segment::new(center, center + rand_vector(rng, 3.0)).into(),
    }
}
