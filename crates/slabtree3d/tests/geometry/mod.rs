mod common;
mod empty_geometry;
mod intersections_brute_force;
mod merge_two_chunks;
mod ray_cast_brute_force;
mod tree_codec;
