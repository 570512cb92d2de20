use super::common::{
    brute_force_cast, chunk_from_triangles, local_ids, quadrant_world, rand_point, rand_ray,
    small_leaves, triangle_soup, world_ids, SOUP_EXTENT,
};
use approx::assert_relative_eq;
use oorandom::Rand32;
use slabtree3d::collider::{ChunkCollider, TreeCollider};
use slabtree3d::math::{Point, Real, Vector};
use slabtree3d::partitioning::TreeBuildParams;
use slabtree3d::query::{Ray, RayHit, TriangleId};
use slabtree3d::shape::Triangle;
use slabtree3d::world::{MergedWorld, World};

fn check_hit(name: &str, ray: &Ray, hit: Option<RayHit>, expected: Option<(Real, TriangleId)>) {
    match (hit, expected) {
        (None, None) => {}
        (Some(hit), Some((distance, triangle))) => {
            assert_relative_eq!(hit.distance, distance, epsilon = 1.0e-4);
            // Several triangles may be hit at the same distance.
            if hit.triangle != triangle {
                assert_relative_eq!(hit.distance, distance, max_relative = 1.0e-5);
            }
            assert_relative_eq!(hit.point, ray.point_at(hit.distance), epsilon = 1.0e-4);
        }
        (hit, expected) => panic!(
            "{}: ray {:?} returned {:?}, expected {:?}",
            name, ray, hit, expected
        ),
    }
}

#[test]
fn chunk_cast_matches_brute_force() {
    let mut rng = Rand32::new(0);
    let soup = triangle_soup(&mut rng, 300);
    let mut chunk = chunk_from_triangles(&soup);
    let naive = chunk.clone();
    let tree = chunk.build_collision_tree(&small_leaves()).clone();
    assert!(tree.num_splits() > 10);

    let accelerated = TreeCollider::new(&tree, &chunk);
    let naive = ChunkCollider::new(&naive);

    for _ in 0..500 {
        let ray = rand_ray(&mut rng);
        let expected = brute_force_cast(local_ids(&soup), &ray, Real::MAX);
        check_hit("tree", &ray, accelerated.cast(&ray, Real::MAX), expected);
        check_hit("naive", &ray, naive.cast(&ray, Real::MAX), expected);

        let max_length = rng.rand_float() * 1.5;
        let expected = brute_force_cast(local_ids(&soup), &ray, max_length);
        check_hit("bounded", &ray, accelerated.cast(&ray, max_length), expected);
    }
}

#[test]
fn world_and_merged_cast_match_brute_force() {
    let mut rng = Rand32::new(1);
    let soup = triangle_soup(&mut rng, 400);
    let (world, chunks) = quadrant_world(&soup);
    let merged = MergedWorld::merge(&world).unwrap();

    for _ in 0..500 {
        let ray = rand_ray(&mut rng);
        let expected = brute_force_cast(world_ids(&chunks), &ray, Real::MAX);
        check_hit("world", &ray, world.cast(&ray, Real::MAX), expected);
        check_hit("merged", &ray, merged.cast(&ray, Real::MAX), expected);
    }
}

#[test]
fn rays_on_split_boundaries() {
    let mut rng = Rand32::new(2);
    let soup = triangle_soup(&mut rng, 300);
    let mut chunk = chunk_from_triangles(&soup);
    let tree = chunk.build_collision_tree(&small_leaves()).clone();
    let collider = TreeCollider::new(&tree, &chunk);

    for split in tree.splits().iter().take(20) {
        let i = split.axis.index();

        for value in [split.left.value, split.right.value] {
            for sign in [1.0, -1.0] {
                let mut origin = rand_point(&mut rng, SOUP_EXTENT);
                origin[i] = value;
                let ray = Ray::new(origin, Vector::ith(i, sign));

                let expected = brute_force_cast(local_ids(&soup), &ray, Real::MAX);
                check_hit("on boundary", &ray, collider.cast(&ray, Real::MAX), expected);
            }
        }
    }
}

#[test]
fn repeated_casts_are_idempotent() {
    let mut rng = Rand32::new(3);
    let soup = triangle_soup(&mut rng, 200);
    let (world, _) = quadrant_world(&soup);

    for _ in 0..50 {
        let ray = rand_ray(&mut rng);
        let first = world.cast(&ray, Real::MAX);
        for _ in 0..3 {
            assert_eq!(world.cast(&ray, Real::MAX), first);
        }
    }
}

/// Flat triangles in planes `x = const`: the outermost ones lie on the faces of the chunk bounds.
fn x_planar_walls(rng: &mut Rand32, n: usize) -> Vec<Triangle> {
    (0..n)
        .map(|_| {
            let a = rand_point(rng, 1.0);
            let b = a + Vector::y() * (0.2 + rng.rand_float() * 0.5);
            let c = a + Vector::z() * (0.2 + rng.rand_float() * 0.5);
            Triangle::new(a, b, c)
        })
        .collect()
}

#[test]
fn walls_on_bounding_box_faces() {
    let mut rng = Rand32::new(7);
    let params = TreeBuildParams {
        max_leaf_triangles: 2,
        ..TreeBuildParams::default()
    };

    for _ in 0..200 {
        let soup = x_planar_walls(&mut rng, 12);
        let mut chunk = chunk_from_triangles(&soup);
        let tree = chunk.build_collision_tree(&params).clone();
        let world = World::new(None, Some(0), vec![chunk.clone()]).unwrap();
        let collider = TreeCollider::new(&tree, &chunk);
        let chunks = [soup.clone()];

        for k in 0..200 {
            let x = if k % 2 == 0 { -1.0 } else { 2.0 };
            let origin = Point::new(x, rng.rand_float() * 1.4 - 0.2, rng.rand_float() * 1.4 - 0.2);
            let target = rand_point(&mut rng, 1.0);
            // Non-unit directions.
            let scale = 0.1 + rng.rand_float() * 3.0;
            let ray = Ray::new(origin, (target - origin) * scale);

            let expected = brute_force_cast(local_ids(&soup), &ray, Real::MAX);
            check_hit("tree", &ray, collider.cast(&ray, Real::MAX), expected);

            let expected = brute_force_cast(world_ids(&chunks), &ray, Real::MAX);
            check_hit("world", &ray, world.cast(&ray, Real::MAX), expected);
        }
    }
}
