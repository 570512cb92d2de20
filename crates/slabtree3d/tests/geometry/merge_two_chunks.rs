use super::common::{chunk_from_triangles, rand_point, rand_vector, small_leaves};
use approx::assert_relative_eq;
use oorandom::Rand32;
use slabtree3d::math::{Point, Real, Vector};
use slabtree3d::partitioning::{Axis, SectorKind};
use slabtree3d::query::{Ray, TriangleId};
use slabtree3d::shape::{QueryShape, Sphere, Triangle};
use slabtree3d::world::{MergedWorld, PlaneSection, SectionNode, World};
use std::collections::BTreeSet;

/// Triangles with all their vertices in `x ∈ [x0, x0 + 4]`, `y, z ∈ [0, 4]`.
fn half_soup(rng: &mut Rand32, x0: Real, n: usize) -> Vec<Triangle> {
    let offset = Vector::new(x0, 0.0, 0.0);
    (0..n)
        .map(|_| {
            let a = rand_point(rng, 3.0) + offset + Vector::repeat(0.5);
            let b = a + rand_vector(rng, 0.5);
            let c = a + rand_vector(rng, 0.5);
            Triangle::new(a, b, c)
        })
        .collect()
}

fn two_chunk_world(rng: &mut Rand32) -> World {
    let mut left = chunk_from_triangles(&half_soup(rng, -4.0, 60));
    let mut right = chunk_from_triangles(&half_soup(rng, 0.0, 40));
    let _ = left.build_collision_tree(&small_leaves());
    let _ = right.build_collision_tree(&small_leaves());

    let section = PlaneSection::new(
        Axis::X,
        0.0,
        0.0,
        SectionNode::Chunk(0),
        SectionNode::Chunk(1),
    );
    World::new(Some(section), None, vec![left, right]).unwrap()
}

#[test]
fn merged_tree_concatenates_chunk_trees() {
    let mut rng = Rand32::new(20);
    let world = two_chunk_world(&mut rng);
    let merged = MergedWorld::merge(&world).unwrap();

    let a = world.chunks()[0].collision_tree().unwrap();
    let b = world.chunks()[1].collision_tree().unwrap();
    assert!(a.num_splits() > 0 && b.num_splits() > 0);

    assert_eq!(merged.tree().num_splits(), 1 + a.num_splits() + b.num_splits());
    assert_eq!(merged.tree().map().len(), a.map().len() + b.map().len());
    assert_eq!(merged.triangles().len(), world.num_triangles());
    assert_eq!(merged.vertices().len(), 3 * world.num_triangles());

    assert_eq!(merged.tree().root(), SectorKind::Split(0));
    let root = merged.tree().splits()[0];
    assert_eq!(root.axis, Axis::X);
    assert_eq!(root.left.value, 0.0);
    assert_eq!(root.right.value, 0.0);

    // Every triangle of the world appears exactly once in the merged map.
    let mapped: BTreeSet<_> = merged
        .tree()
        .map()
        .iter()
        .map(|i| merged.triangle_ids()[*i as usize])
        .collect();
    assert_eq!(mapped.len(), world.num_triangles());
}

#[test]
fn straddling_sphere_hits_both_chunks() {
    let mut rng = Rand32::new(21);
    let world = two_chunk_world(&mut rng);
    let merged = MergedWorld::merge(&world).unwrap();

    let shape: QueryShape = Sphere::new(Point::new(0.0, 2.0, 2.0), 3.0).into();
    let world_chunks: BTreeSet<u32> = world
        .intersections(&shape)
        .filter_map(|hit| match hit.triangle {
            TriangleId::World { chunk, .. } => Some(chunk),
            TriangleId::Local(_) => None,
        })
        .collect();
    assert_eq!(world_chunks, [0, 1].into_iter().collect());

    let world_hits: BTreeSet<_> = world.intersections(&shape).map(|hit| hit.triangle).collect();
    let merged_hits: BTreeSet<_> = merged.intersections(&shape).map(|hit| hit.triangle).collect();
    assert_eq!(world_hits, merged_hits);

    // Far to the right, only the right chunk can be reached.
    let shape: QueryShape = Sphere::new(Point::new(3.5, 2.0, 2.0), 0.3).into();
    assert!(merged.intersections(&shape).all(|hit| matches!(
        hit.triangle,
        TriangleId::World { chunk: 1, .. }
    )));
}

#[test]
fn merged_cast_crosses_the_plane() {
    let mut rng = Rand32::new(22);
    let world = two_chunk_world(&mut rng);
    let merged = MergedWorld::merge(&world).unwrap();

    for _ in 0..200 {
        let origin = Point::new(-6.0, rng.rand_float() * 4.0, rng.rand_float() * 4.0);
        let ray = Ray::new(origin, Vector::x());
        let expected = world.cast(&ray, Real::MAX);
        let hit = merged.cast(&ray, Real::MAX);

        assert_eq!(hit.is_some(), expected.is_some());
        if let (Some(hit), Some(expected)) = (hit, expected) {
            assert_relative_eq!(hit.distance, expected.distance, max_relative = 1.0e-5);
        }
    }
}
