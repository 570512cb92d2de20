use slabtree3d::collider::ChunkCollider;
use slabtree3d::math::{Point, Vector};
use slabtree3d::partitioning::{Axis, CollisionTree, WideTree4, WideTree8};
use slabtree3d::query::Ray;
use slabtree3d::shape::{MeshChunk, QueryShape, Sphere};
use slabtree3d::world::{MergeError, MergedWorld, PlaneSection, SectionNode, World};

fn empty_chunk() -> MeshChunk {
    MeshChunk::new(vec![], vec![]).unwrap()
}

fn sample_queries() -> (Ray, QueryShape) {
    let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vector::new(0.0, 0.0, -1.0));
    let shape = Sphere::new(Point::origin(), 100.0).into();
    (ray, shape)
}

#[test]
fn empty_chunk_never_hits() {
    let (ray, shape) = sample_queries();
    let chunk = empty_chunk();
    let collider = ChunkCollider::new(&chunk);

    assert_eq!(collider.tree(), &CollisionTree::naive(0));
    assert!(collider.cast(&ray, f32::MAX).is_none());
    assert!(!collider.intersects(&shape));
    assert_eq!(collider.intersections(&shape).count(), 0);
}

#[test]
fn empty_world_never_hits() {
    let (ray, shape) = sample_queries();
    let world = World::new(None, Some(0), vec![empty_chunk()]).unwrap();

    assert_eq!(world.num_triangles(), 0);
    assert!(!world.bounds().is_valid());
    assert!(world.cast(&ray, f32::MAX).is_none());
    assert!(!world.intersects(&shape));
    assert_eq!(world.intersections(&shape).count(), 0);
}

#[test]
fn empty_wide_trees_never_hit() {
    let chunk = empty_chunk();
    let tree = CollisionTree::naive(0);
    let sphere = Sphere::new(Point::origin(), 100.0);

    let wide4 = WideTree4::new(&tree);
    let wide8 = WideTree8::new(&tree);
    assert_eq!(wide4.candidates(&sphere).count(), 0);
    assert_eq!(wide8.candidates(&sphere).count(), 0);
    assert!(!wide4.intersects(&chunk, &sphere));
    assert!(!wide8.intersects(&chunk, &sphere));
}

#[test]
fn merging_without_triangles_fails() {
    let section = PlaneSection::new(
        Axis::Z,
        0.0,
        0.0,
        SectionNode::Chunk(0),
        SectionNode::Chunk(1),
    );
    let world = World::new(Some(section), None, vec![empty_chunk(), empty_chunk()]).unwrap();
    assert!(matches!(
        MergedWorld::merge(&world),
        Err(MergeError::NoGeometry)
    ));

    let single = World::new(None, Some(0), vec![empty_chunk()]).unwrap();
    assert!(matches!(
        MergedWorld::merge(&single),
        Err(MergeError::NotImplemented(_))
    ));
}
