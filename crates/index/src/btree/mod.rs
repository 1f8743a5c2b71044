//! B-tree index implementation for Tabula.
//!
//! This module provides a classic (keys in every node) B-tree mapping one
//! column's values to row positions.

mod node;
mod tree;

pub use node::{Node, NodeId};
pub use tree::{BTree, DEGREE, MAX_KEYS, MIN_KEYS};
