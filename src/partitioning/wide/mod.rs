//! Collision trees regrouped into wide nodes for batched SIMD sphere queries.

pub use self::wide_tree::{WideCandidates4, WideCandidates8, WideChild, WideTree4, WideTree8};

mod wide_tree;
