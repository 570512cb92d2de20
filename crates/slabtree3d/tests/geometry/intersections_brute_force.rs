use super::common::{
    brute_force_intersections, chunk_from_triangles, local_ids, quadrant_world, rand_point,
    rand_shape, small_leaves, triangle_soup, world_ids, SOUP_EXTENT,
};
use oorandom::Rand32;
use slabtree3d::collider::{ChunkCollider, TreeCollider};
use slabtree3d::partitioning::{WideTree4, WideTree8};
use slabtree3d::query::{Intersection, TriangleId};
use slabtree3d::shape::{QueryShape, Sphere};
use slabtree3d::world::MergedWorld;
use std::collections::BTreeSet;

fn ids(hits: impl Iterator<Item = Intersection>) -> BTreeSet<TriangleId> {
    hits.map(|hit| hit.triangle).collect()
}

#[test]
fn chunk_intersections_match_brute_force() {
    let mut rng = Rand32::new(10);
    let soup = triangle_soup(&mut rng, 300);
    let mut chunk = chunk_from_triangles(&soup);
    let naive = chunk.clone();
    let tree = chunk.build_collision_tree(&small_leaves()).clone();

    let accelerated = TreeCollider::new(&tree, &chunk);
    let naive = ChunkCollider::new(&naive);

    for k in 0..1000 {
        let shape = rand_shape(&mut rng, k);
        let expected = brute_force_intersections(local_ids(&soup), &shape);

        assert_eq!(ids(accelerated.intersections(&shape)), expected, "{:?}", shape);
        assert_eq!(ids(naive.intersections(&shape)), expected, "{:?}", shape);
        assert_eq!(accelerated.intersects(&shape), !expected.is_empty());
    }
}

#[test]
fn world_and_merged_intersections_match_brute_force() {
    let mut rng = Rand32::new(11);
    let soup = triangle_soup(&mut rng, 400);
    let (world, chunks) = quadrant_world(&soup);
    let merged = MergedWorld::merge(&world).unwrap();

    for k in 0..1000 {
        let shape = rand_shape(&mut rng, k);
        let expected = brute_force_intersections(world_ids(&chunks), &shape);

        assert_eq!(ids(world.intersections(&shape)), expected, "{:?}", shape);
        assert_eq!(ids(merged.intersections(&shape)), expected, "{:?}", shape);
        assert_eq!(world.intersects(&shape), !expected.is_empty());
        assert_eq!(merged.intersects(&shape), !expected.is_empty());
    }
}

#[test]
fn wide_trees_match_scalar_engine() {
    let mut rng = Rand32::new(12);
    let soup = triangle_soup(&mut rng, 400);
    let mut chunk = chunk_from_triangles(&soup);
    let tree = chunk.build_collision_tree(&small_leaves()).clone();
    let scalar = TreeCollider::new(&tree, &chunk);
    let wide4 = WideTree4::new(&tree);
    let wide8 = WideTree8::new(&tree);
    assert!(wide4.num_nodes() > 0);
    assert!(wide8.num_nodes() < wide4.num_nodes());

    let (world, chunks) = quadrant_world(&soup);
    let merged = MergedWorld::merge(&world).unwrap();
    let merged4 = WideTree4::new(merged.tree());
    let merged8 = WideTree8::new(merged.tree());

    for _ in 0..1000 {
        let sphere = Sphere::new(rand_point(&mut rng, SOUP_EXTENT), rng.rand_float() * 2.0);
        let shape = QueryShape::from(sphere);

        // Same candidate multiset, not only the same result set.
        let mut scalar_candidates: Vec<u32> = tree.candidates(&shape).collect();
        let mut wide4_candidates: Vec<u32> = wide4.candidates(&sphere).collect();
        let mut wide8_candidates: Vec<u32> = wide8.candidates(&sphere).collect();
        scalar_candidates.sort_unstable();
        wide4_candidates.sort_unstable();
        wide8_candidates.sort_unstable();
        assert_eq!(wide4_candidates, scalar_candidates);
        assert_eq!(wide8_candidates, scalar_candidates);

        let expected = brute_force_intersections(local_ids(&soup), &shape);
        assert_eq!(ids(scalar.intersections(&shape)), expected);
        assert_eq!(ids(wide4.intersections(&chunk, &sphere)), expected);
        assert_eq!(ids(wide8.intersections(&chunk, &sphere)), expected);
        assert_eq!(wide8.intersects(&chunk, &sphere), !expected.is_empty());

        let expected = brute_force_intersections(world_ids(&chunks), &shape);
        assert_eq!(ids(merged4.intersections(&merged, &sphere)), expected);
        assert_eq!(ids(merged8.intersections(&merged, &sphere)), expected);
    }
}

#[test]
fn straddling_triangles_may_repeat() {
    let mut rng = Rand32::new(13);
    let soup = triangle_soup(&mut rng, 200);
    let (world, _) = quadrant_world(&soup);

    for k in 0..200 {
        let shape = rand_shape(&mut rng, k);
        let all: Vec<_> = world.intersections(&shape).map(|hit| hit.triangle).collect();
        let distinct: BTreeSet<_> = all.iter().copied().collect();
        assert!(all.len() >= distinct.len());

        // Enumeration can be abandoned and restarted at any point.
        let first_two: Vec<_> = world.intersections(&shape).take(2).map(|hit| hit.triangle).collect();
        assert_eq!(first_two, all.iter().copied().take(2).collect::<Vec<_>>());
    }
}
