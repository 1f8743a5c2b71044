//! B-tree implementation.
//!
//! Insertion is top-down: every full node met on the way down is split before
//! the descent enters it, so a split never has to propagate upwards. Deletion
//! likewise tops up any child holding only `MIN_KEYS` keys before descending
//! into it.

use super::node::{Node, NodeId};
use crate::comparator::{compare_keys, locate};
use crate::error::IndexError;
use core::cmp::Ordering;
use parking_lot::RwLock;
use tabula_core::{RowPosition, Value};

/// Minimum degree of the tree.
pub const DEGREE: usize = 4;

/// Maximum number of keys per node.
pub const MAX_KEYS: usize = 2 * DEGREE - 1;

/// Minimum number of keys in every non-root node.
pub const MIN_KEYS: usize = DEGREE - 1;

/// A unique B-tree index over one column.
///
/// Maps each non-null value to the position of the row holding it. All methods
/// take `&self`; a read-write lock inside the tree serialises writers.
#[derive(Debug)]
pub struct BTree {
    /// Column this tree indexes, used in error messages.
    column: String,
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Arena of all nodes.
    arena: Vec<Node>,
    /// Arena slots released by merges, reused by later splits.
    free: Vec<NodeId>,
    /// Root node ID.
    root: NodeId,
    /// Number of keys in the tree.
    len: usize,
}

impl BTree {
    /// Creates an empty tree for the given column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            inner: RwLock::new(Inner::new()),
        }
    }

    /// Returns the indexed column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every key.
    pub fn clear(&self) {
        *self.inner.write() = Inner::new();
    }

    /// Inserts a key mapped to a row position.
    ///
    /// Fails with `DuplicateKey` if the key is already present and with
    /// `NullKey` for a null key. The tree is unchanged on failure.
    pub fn insert(&self, key: Value, position: RowPosition) -> Result<(), IndexError> {
        if key.is_null() {
            return Err(IndexError::NullKey {
                column: self.column.clone(),
            });
        }
        let mut inner = self.inner.write();
        if inner.search(&key)?.is_some() {
            return Err(self.duplicate(&key));
        }

        let root = inner.root;
        if inner.arena[root].key_count() == MAX_KEYS {
            let new_root = inner.alloc_node(Node::new_internal(root));
            inner.root = new_root;
            inner.split_child(new_root, 0);
        }
        let root = inner.root;
        let inserted = inner.insert_non_full(root, key, position)?;
        debug_assert!(inserted, "key present after failed search");
        if inserted {
            inner.len += 1;
        }
        Ok(())
    }

    /// Returns the row position stored for a key.
    pub fn search(&self, key: &Value) -> Result<Option<RowPosition>, IndexError> {
        if key.is_null() {
            return Ok(None);
        }
        self.inner.read().search(key)
    }

    /// Removes a key. Returns false if it was not present.
    pub fn delete(&self, key: &Value) -> Result<bool, IndexError> {
        if key.is_null() {
            return Ok(false);
        }
        let mut inner = self.inner.write();
        // Locating the key first surfaces comparison errors before any node
        // is restructured.
        if inner.search(key)?.is_none() {
            return Ok(false);
        }

        let root = inner.root;
        let removed = inner.delete_from(root, key)?;
        inner.collapse_root();
        if removed {
            inner.len -= 1;
        }
        Ok(removed)
    }

    /// Replaces the stored row position of an existing key.
    pub fn set_position(&self, key: &Value, position: RowPosition) -> Result<bool, IndexError> {
        if key.is_null() {
            return Ok(false);
        }
        let mut inner = self.inner.write();
        let mut id = inner.root;
        loop {
            let node = &mut inner.arena[id];
            match locate(&node.keys, key)? {
                Ok(idx) => {
                    node.positions[idx] = position;
                    return Ok(true);
                }
                Err(_) if node.is_leaf() => return Ok(false),
                Err(idx) => id = node.children[idx],
            }
        }
    }

    /// Returns every `(key, position)` pair in ascending key order.
    pub fn get_all(&self) -> Vec<(Value, RowPosition)> {
        let inner = self.inner.read();
        let mut result = Vec::with_capacity(inner.len);
        inner.collect(inner.root, &mut result);
        result
    }

    /// Verifies the structural invariants of the tree.
    ///
    /// Returns the height (a lone root leaf has height 1) or a description of
    /// the first violation found.
    pub fn check_structure(&self) -> Result<usize, String> {
        let inner = self.inner.read();
        let mut leaf_depth = None;
        let mut count = 0;
        let mut last: Option<Value> = None;
        inner.check_node(inner.root, 1, true, &mut leaf_depth, &mut count, &mut last)?;
        if count != inner.len {
            return Err(format!("tree holds {} keys but len is {}", count, inner.len));
        }
        Ok(leaf_depth.unwrap_or(1))
    }

    fn duplicate(&self, key: &Value) -> IndexError {
        IndexError::DuplicateKey {
            column: self.column.clone(),
            key: key.to_string(),
        }
    }
}

impl Inner {
    fn new() -> Self {
        Self {
            arena: vec![Node::new_leaf()],
            free: Vec::new(),
            root: 0,
            len: 0,
        }
    }

    /// Allocates a node, reusing a released slot when one is available.
    fn alloc_node(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.arena[id] = node;
                id
            }
            None => {
                self.arena.push(node);
                self.arena.len() - 1
            }
        }
    }

    fn release_node(&mut self, id: NodeId) {
        self.arena[id] = Node::default();
        self.free.push(id);
    }

    fn search(&self, key: &Value) -> Result<Option<RowPosition>, IndexError> {
        let mut id = self.root;
        loop {
            let node = &self.arena[id];
            match locate(&node.keys, key)? {
                Ok(idx) => return Ok(Some(node.positions[idx])),
                Err(_) if node.is_leaf() => return Ok(None),
                Err(idx) => id = node.children[idx],
            }
        }
    }

    /// Splits the full child at `idx` of `parent`, moving its median key up.
    fn split_child(&mut self, parent: NodeId, idx: usize) {
        let child = self.arena[parent].children[idx];

        let (median_key, median_pos, right) = {
            let node = &mut self.arena[child];
            debug_assert_eq!(node.key_count(), MAX_KEYS);
            let mut right = Node::new_leaf();
            right.keys = node.keys.split_off(DEGREE);
            right.positions = node.positions.split_off(DEGREE);
            if !node.is_leaf() {
                right.children = node.children.split_off(DEGREE);
            }
            // After split_off the left half holds DEGREE keys; the last of
            // them is the median.
            match (node.keys.pop(), node.positions.pop()) {
                (Some(k), Some(p)) => (k, p, right),
                _ => return,
            }
        };

        let right_id = self.alloc_node(right);
        let p = &mut self.arena[parent];
        p.keys.insert(idx, median_key);
        p.positions.insert(idx, median_pos);
        p.children.insert(idx + 1, right_id);
    }

    /// Inserts into the subtree rooted at a node known not to be full.
    ///
    /// Returns false if the key turns out to be present.
    fn insert_non_full(
        &mut self,
        mut id: NodeId,
        key: Value,
        position: RowPosition,
    ) -> Result<bool, IndexError> {
        loop {
            let mut idx = match locate(&self.arena[id].keys, &key)? {
                Ok(_) => return Ok(false),
                Err(idx) => idx,
            };

            if self.arena[id].is_leaf() {
                self.arena[id].insert_entry(idx, key, position);
                return Ok(true);
            }

            let child = self.arena[id].children[idx];
            if self.arena[child].key_count() == MAX_KEYS {
                self.split_child(id, idx);
                match compare_keys(&key, &self.arena[id].keys[idx])? {
                    Ordering::Greater => idx += 1,
                    Ordering::Equal => return Ok(false),
                    Ordering::Less => {}
                }
            }
            id = self.arena[id].children[idx];
        }
    }

    /// Deletes a key from the subtree rooted at `id`.
    ///
    /// Every node this is called on, except the root, holds at least
    /// `DEGREE` keys.
    fn delete_from(&mut self, id: NodeId, key: &Value) -> Result<bool, IndexError> {
        match locate(&self.arena[id].keys, key)? {
            Ok(idx) if self.arena[id].is_leaf() => {
                self.arena[id].remove_entry(idx);
                Ok(true)
            }
            Ok(idx) => {
                let left = self.arena[id].children[idx];
                let right = self.arena[id].children[idx + 1];
                if self.arena[left].key_count() >= DEGREE {
                    let (pred_key, pred_pos) = self.max_entry(left);
                    self.arena[id].keys[idx] = pred_key.clone();
                    self.arena[id].positions[idx] = pred_pos;
                    self.delete_from(left, &pred_key)
                } else if self.arena[right].key_count() >= DEGREE {
                    let (succ_key, succ_pos) = self.min_entry(right);
                    self.arena[id].keys[idx] = succ_key.clone();
                    self.arena[id].positions[idx] = succ_pos;
                    self.delete_from(right, &succ_key)
                } else {
                    self.merge_children(id, idx);
                    self.delete_from(left, key)
                }
            }
            Err(_) if self.arena[id].is_leaf() => Ok(false),
            Err(idx) => {
                let child_idx = if self.arena[self.arena[id].children[idx]].key_count() < DEGREE {
                    self.fill_child(id, idx)
                } else {
                    idx
                };
                let child = self.arena[id].children[child_idx];
                self.delete_from(child, key)
            }
        }
    }

    /// Gives the child at `idx` at least `DEGREE` keys.
    ///
    /// Returns the index of the child that now covers the original child's
    /// key range (it moves left when merged into its left sibling).
    fn fill_child(&mut self, parent: NodeId, idx: usize) -> usize {
        let key_count = self.arena[parent].key_count();
        let children = &self.arena[parent].children;

        if idx > 0 && self.arena[children[idx - 1]].key_count() >= DEGREE {
            self.borrow_from_left(parent, idx);
            idx
        } else if idx < key_count && self.arena[children[idx + 1]].key_count() >= DEGREE {
            self.borrow_from_right(parent, idx);
            idx
        } else if idx < key_count {
            self.merge_children(parent, idx);
            idx
        } else {
            self.merge_children(parent, idx - 1);
            idx - 1
        }
    }

    /// Rotates the last entry of the left sibling through the parent.
    fn borrow_from_left(&mut self, parent: NodeId, idx: usize) {
        let child = self.arena[parent].children[idx];
        let sibling = self.arena[parent].children[idx - 1];

        let (sib_key, sib_pos, sib_child) = {
            let s = &mut self.arena[sibling];
            (s.keys.pop(), s.positions.pop(), s.children.pop())
        };
        let (Some(sib_key), Some(sib_pos)) = (sib_key, sib_pos) else {
            return;
        };

        let p = &mut self.arena[parent];
        let sep_key = std::mem::replace(&mut p.keys[idx - 1], sib_key);
        let sep_pos = std::mem::replace(&mut p.positions[idx - 1], sib_pos);

        let c = &mut self.arena[child];
        c.keys.insert(0, sep_key);
        c.positions.insert(0, sep_pos);
        if let Some(grandchild) = sib_child {
            c.children.insert(0, grandchild);
        }
    }

    /// Rotates the first entry of the right sibling through the parent.
    fn borrow_from_right(&mut self, parent: NodeId, idx: usize) {
        let child = self.arena[parent].children[idx];
        let sibling = self.arena[parent].children[idx + 1];

        let (sib_key, sib_pos, sib_child) = {
            let s = &mut self.arena[sibling];
            let grandchild = if s.is_leaf() {
                None
            } else {
                Some(s.children.remove(0))
            };
            let (k, p) = s.remove_entry(0);
            (k, p, grandchild)
        };

        let p = &mut self.arena[parent];
        let sep_key = std::mem::replace(&mut p.keys[idx], sib_key);
        let sep_pos = std::mem::replace(&mut p.positions[idx], sib_pos);

        let c = &mut self.arena[child];
        c.keys.push(sep_key);
        c.positions.push(sep_pos);
        if let Some(grandchild) = sib_child {
            c.children.push(grandchild);
        }
    }

    /// Merges child `idx + 1` and separator `idx` into child `idx`.
    fn merge_children(&mut self, parent: NodeId, idx: usize) {
        let left = self.arena[parent].children[idx];
        let right = self.arena[parent].children[idx + 1];

        let (sep_key, sep_pos) = self.arena[parent].remove_entry(idx);
        self.arena[parent].children.remove(idx + 1);

        let right_node = std::mem::take(&mut self.arena[right]);
        let l = &mut self.arena[left];
        l.keys.push(sep_key);
        l.positions.push(sep_pos);
        l.keys.extend(right_node.keys);
        l.positions.extend(right_node.positions);
        l.children.extend(right_node.children);

        self.release_node(right);
    }

    /// Replaces an emptied internal root with its only child.
    fn collapse_root(&mut self) {
        let root = self.root;
        if self.arena[root].key_count() == 0 && !self.arena[root].is_leaf() {
            self.root = self.arena[root].children[0];
            self.release_node(root);
        }
    }

    fn min_entry(&self, mut id: NodeId) -> (Value, RowPosition) {
        while !self.arena[id].is_leaf() {
            id = self.arena[id].children[0];
        }
        let node = &self.arena[id];
        (node.keys[0].clone(), node.positions[0])
    }

    fn max_entry(&self, mut id: NodeId) -> (Value, RowPosition) {
        while let Some(&last) = self.arena[id].children.last() {
            id = last;
        }
        let node = &self.arena[id];
        let last = node.key_count() - 1;
        (node.keys[last].clone(), node.positions[last])
    }

    fn collect(&self, id: NodeId, out: &mut Vec<(Value, RowPosition)>) {
        let node = &self.arena[id];
        for i in 0..node.key_count() {
            if !node.is_leaf() {
                self.collect(node.children[i], out);
            }
            out.push((node.keys[i].clone(), node.positions[i]));
        }
        if let Some(&last) = node.children.last() {
            self.collect(last, out);
        }
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        is_root: bool,
        leaf_depth: &mut Option<usize>,
        count: &mut usize,
        last: &mut Option<Value>,
    ) -> Result<(), String> {
        let node = &self.arena[id];
        let keys = node.key_count();

        if keys > MAX_KEYS {
            return Err(format!("node {} holds {} keys (max {})", id, keys, MAX_KEYS));
        }
        if !is_root && keys < MIN_KEYS {
            return Err(format!("node {} holds {} keys (min {})", id, keys, MIN_KEYS));
        }
        if node.positions.len() != keys {
            return Err(format!("node {} has {} keys but {} positions", id, keys, node.positions.len()));
        }
        if !node.is_leaf() && node.children.len() != keys + 1 {
            return Err(format!(
                "node {} has {} keys but {} children",
                id,
                keys,
                node.children.len()
            ));
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(d) if d != depth => {
                    return Err(format!("leaf {} at depth {}, expected {}", id, depth, d));
                }
                Some(_) => {}
            }
        }

        for i in 0..keys {
            if !node.is_leaf() {
                self.check_node(node.children[i], depth + 1, false, leaf_depth, count, last)?;
            }
            let key = &node.keys[i];
            if let Some(prev) = last.as_ref() {
                match compare_keys(prev, key) {
                    Ok(Ordering::Less) => {}
                    Ok(_) => return Err(format!("key {} out of order after {}", key, prev)),
                    Err(e) => return Err(e.to_string()),
                }
            }
            *last = Some(key.clone());
            *count += 1;
        }
        if let Some(&child) = node.children.last() {
            self.check_node(child, depth + 1, false, leaf_depth, count, last)?;
        }
        Ok(())
    }
}
