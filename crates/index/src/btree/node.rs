//! B-tree node definitions.

use tabula_core::{RowPosition, Value};

/// Node identifier in the B-tree arena.
pub type NodeId = usize;

/// A node in the B-tree.
///
/// `keys` and `positions` are parallel. An internal node has exactly
/// `keys.len() + 1` children; a leaf has none.
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Keys stored in this node, ascending.
    pub keys: Vec<Value>,
    /// Row position associated with each key.
    pub positions: Vec<RowPosition>,
    /// Child node IDs. Empty for leaves.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Creates a new empty leaf node.
    pub fn new_leaf() -> Self {
        Self::default()
    }

    /// Creates a new internal node with a single child.
    pub fn new_internal(child: NodeId) -> Self {
        Self {
            keys: Vec::new(),
            positions: Vec::new(),
            children: vec![child],
        }
    }

    /// Returns true if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the number of keys in this node.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Inserts an entry at the given position in a leaf node.
    pub fn insert_entry(&mut self, idx: usize, key: Value, position: RowPosition) {
        debug_assert!(self.is_leaf());
        self.keys.insert(idx, key);
        self.positions.insert(idx, position);
    }

    /// Removes the entry at the given position and returns it.
    pub fn remove_entry(&mut self, idx: usize) -> (Value, RowPosition) {
        (self.keys.remove(idx), self.positions.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        let leaf = Node::new_leaf();
        assert!(leaf.is_leaf());
        assert_eq!(leaf.key_count(), 0);

        let internal = Node::new_internal(3);
        assert!(!internal.is_leaf());
        assert_eq!(internal.children, vec![3]);
    }

    #[test]
    fn test_entry_insert_remove() {
        let mut leaf = Node::new_leaf();
        leaf.insert_entry(0, Value::Integer(20), 2);
        leaf.insert_entry(0, Value::Integer(10), 1);
        assert_eq!(leaf.keys, vec![Value::Integer(10), Value::Integer(20)]);
        assert_eq!(leaf.positions, vec![1, 2]);

        assert_eq!(leaf.remove_entry(1), (Value::Integer(20), 2));
        assert_eq!(leaf.key_count(), 1);
    }
}
