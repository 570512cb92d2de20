pub use self::point_triangle::closest_point_on_triangle;

mod point_triangle;
