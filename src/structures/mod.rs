//! Standalone generic containers

pub mod bst;
pub mod spatial_hash;

pub use bst::BinarySearchTree;
pub use spatial_hash::SpatialHashTable;
