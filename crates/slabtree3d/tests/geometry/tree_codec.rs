use super::common::{chunk_from_triangles, rand_ray, rand_shape, small_leaves, triangle_soup};
use oorandom::Rand32;
use slabtree3d::collider::ChunkCollider;
use slabtree3d::math::Real;
use slabtree3d::partitioning::{CollisionTree, TreeFormatError};
use std::collections::BTreeSet;

#[test]
fn built_tree_survives_serialization() {
    let mut rng = Rand32::new(30);
    let soup = triangle_soup(&mut rng, 250);
    let mut built = chunk_from_triangles(&soup);
    let tree = built.build_collision_tree(&small_leaves()).clone();

    let bytes = tree.to_bytes().unwrap();
    let num_leaves = tree.num_splits() + 1;
    assert_eq!(
        bytes.len(),
        8 + 16 * tree.num_splits() + 4 * num_leaves + 4 * tree.map().len()
    );

    let decoded = CollisionTree::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, tree);
    assert_eq!(decoded.to_bytes().unwrap(), bytes);

    let loaded = chunk_from_triangles(&soup)
        .with_collision_tree(decoded)
        .unwrap();
    let built = ChunkCollider::new(&built);
    let loaded = ChunkCollider::new(&loaded);

    for k in 0..300 {
        let ray = rand_ray(&mut rng);
        let expected = built.cast(&ray, Real::MAX);
        let hit = loaded.cast(&ray, Real::MAX);
        assert_eq!(
            hit.map(|hit| hit.distance),
            expected.map(|hit| hit.distance)
        );

        let shape = rand_shape(&mut rng, k);
        let expected: BTreeSet<_> = built.intersections(&shape).map(|hit| hit.triangle).collect();
        let found: BTreeSet<_> = loaded.intersections(&shape).map(|hit| hit.triangle).collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn truncated_stream_is_rejected() {
    let mut rng = Rand32::new(31);
    let soup = triangle_soup(&mut rng, 50);
    let mut chunk = chunk_from_triangles(&soup);
    let bytes = chunk.build_collision_tree(&small_leaves()).to_bytes().unwrap();

    for len in [0, 3, 4, 7, 8, bytes.len() / 2, bytes.len() - 1] {
        assert!(matches!(
            CollisionTree::from_bytes(&bytes[..len]),
            Err(TreeFormatError::Truncated)
        ));
    }
}

#[test]
fn loaded_tree_must_match_the_chunk() {
    let mut rng = Rand32::new(32);
    let soup = triangle_soup(&mut rng, 50);
    let tree = CollisionTree::naive(51);
    assert!(chunk_from_triangles(&soup).with_collision_tree(tree).is_err());
}
