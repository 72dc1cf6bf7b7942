//! AvlIndex: height-balanced, in-memory ordered index over keyed records.
//!
//! Nodes live in a flat arena (`Vec<Node<R>>`) and refer to their children by
//! arena id. Nodes are never removed, so an id stays valid for the lifetime of
//! the index and arena order is creation order.
//!
//! Insertion is iterative: the descent records the ancestor path, the new node
//! is appended to the arena, then the path is unwound bottom-up, re-linking each
//! ancestor to its (possibly rotated) child and rebalancing it. Path length is
//! bounded by the tree height, which the balance invariant keeps logarithmic.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use serde::Serialize;

use crate::config::MAX_HEIGHT;
use crate::record::{Book, Keyed};

type NodeId = usize;

/// Insertion-sequence number assigned to a node when it is created.
///
/// Starts at 1 and increases by one per distinct key. Unrelated to sorted rank
/// and never changed by rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Position(u32);

impl Position {
    /// Raw sequence number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for index operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The position counter is exhausted; no further node can be created.
    #[error("index is full: position counter exhausted")]
    Full,
}

/// Outcome of [`AvlIndex::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new node was created with this position.
    Inserted(Position),
    /// The key was already present; nothing changed. Carries the position of
    /// the existing node.
    Duplicate(Position),
}

impl Insertion {
    /// Position of the node holding the key.
    pub const fn position(self) -> Position {
        match self {
            Insertion::Inserted(p) | Insertion::Duplicate(p) => p,
        }
    }

    /// `true` when a node was created.
    pub const fn is_new(self) -> bool {
        matches!(self, Insertion::Inserted(_))
    }
}

#[derive(Debug)]
struct Node<R> {
    record: R,
    position: Position,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: u8,
    balance: i8,
}

impl<R> Node<R> {
    fn new(record: R, position: Position) -> Self {
        Node {
            record,
            position,
            left: None,
            right: None,
            height: 1,
            balance: 0,
        }
    }
}

/// A height-balanced binary search tree (AVL tree) keyed by [`Keyed::key`].
///
/// Built by a batch of [`insert`](Self::insert) calls, then read through
/// [`materialize`](Self::materialize) (sorted, annotated view) or
/// [`root`](Self::root) (tree shape). Inserting a key that is already present
/// is a silent no-op.
///
/// After every insert:
/// - every key in a left subtree is less than its node's key, every key in a
///   right subtree greater;
/// - stored height and balance match the actual subtree shape;
/// - every balance factor is in `-1..=1`;
/// - positions are distinct and increase in node-creation order.
#[derive(Debug)]
pub struct AvlIndex<R> {
    nodes: Vec<Node<R>>,
    root: Option<NodeId>,
    next_position: u32,
}

/// Index of catalogue books keyed by title.
pub type BookIndex = AvlIndex<Book>;

impl<R> AvlIndex<R> {
    /// Create an empty index.
    pub const fn new() -> Self {
        AvlIndex {
            nodes: Vec::new(),
            root: None,
            next_position: 0,
        }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> u8 {
        self.height_of(self.root)
    }

    /// Read-only handle on the root node, for walking the tree shape.
    pub fn root(&self) -> Option<NodeRef<'_, R>> {
        self.root.map(|id| NodeRef { index: self, id })
    }

    /// Every record in ascending key order, with its position and current
    /// balance factor.
    ///
    /// Each call starts a fresh traversal; the index is not modified.
    pub fn materialize(&self) -> Materialize<'_, R> {
        Materialize {
            index: self,
            stack: Vec::with_capacity(usize::from(self.height())),
            cursor: self.root,
            remaining: self.nodes.len(),
        }
    }

    // SAFETY: ids are minted by `insert` as `nodes.len()` just before the push
    // and nodes are never removed, so every stored id is in bounds.
    #[allow(clippy::indexing_slicing)]
    fn node(&self, id: NodeId) -> &Node<R> {
        &self.nodes[id]
    }

    // SAFETY: see `node`.
    #[allow(clippy::indexing_slicing)]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<R> {
        &mut self.nodes[id]
    }

    fn height_of(&self, id: Option<NodeId>) -> u8 {
        id.map_or(0, |id| self.node(id).height)
    }

    /// Recompute height and balance of `id` from its children.
    fn update(&mut self, id: NodeId) {
        let node = self.node(id);
        let left = self.height_of(node.left);
        let right = self.height_of(node.right);
        let node = self.node_mut(id);
        node.height = left.max(right).saturating_add(1);
        node.balance = balance_of(left, right);
        debug_assert!(node.height <= MAX_HEIGHT);
    }

    /// `y`'s left child `x` becomes the subtree root; `x`'s former right
    /// subtree moves under `y`. Returns the new subtree root.
    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let Some(x) = self.node(y).left else {
            return y;
        };
        let moved = self.node(x).right;
        self.node_mut(x).right = Some(y);
        self.node_mut(y).left = moved;
        // y first: x's metrics depend on y's.
        self.update(y);
        self.update(x);
        tracing::trace!(
            pivot = self.node(x).position.get(),
            demoted = self.node(y).position.get(),
            "rotate right"
        );
        x
    }

    /// Mirror of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.node(x).right else {
            return x;
        };
        let moved = self.node(y).left;
        self.node_mut(y).left = Some(x);
        self.node_mut(x).right = moved;
        self.update(x);
        self.update(y);
        tracing::trace!(
            pivot = self.node(y).position.get(),
            demoted = self.node(x).position.get(),
            "rotate left"
        );
        y
    }
}

impl<R: Keyed> AvlIndex<R> {
    /// Build an index by inserting `records` in iteration order.
    pub fn from_records<I>(records: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = R>,
    {
        let mut index = AvlIndex::new();
        let mut duplicates = 0usize;
        for record in records {
            if !index.insert(record)?.is_new() {
                duplicates = duplicates.saturating_add(1);
            }
        }
        tracing::debug!(
            nodes = index.len(),
            duplicates,
            height = index.height(),
            "index built"
        );
        Ok(index)
    }

    /// Insert `record` under its key, creating at most one node.
    ///
    /// A key that is already present leaves the index untouched and returns
    /// [`Insertion::Duplicate`]; the passed record is dropped. Returns
    /// `Err(IndexError::Full)` only when the position counter is exhausted.
    pub fn insert(&mut self, record: R) -> Result<Insertion, IndexError> {
        let mut path: Vec<(NodeId, Ordering)> = Vec::with_capacity(usize::from(self.height()));
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            let side = record.key().cmp(node.record.key());
            cursor = match side {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => {
                    tracing::debug!(position = node.position.get(), "duplicate key ignored");
                    return Ok(Insertion::Duplicate(node.position));
                }
            };
            path.push((id, side));
        }

        let next = self.next_position.checked_add(1).ok_or(IndexError::Full)?;
        self.next_position = next;
        let position = Position(next);
        let inserted = self.nodes.len();
        self.nodes.push(Node::new(record, position));

        let mut subtree = inserted;
        while let Some((parent, side)) = path.pop() {
            let node = self.node_mut(parent);
            if side == Ordering::Less {
                node.left = Some(subtree);
            } else {
                node.right = Some(subtree);
            }
            subtree = self.rebalance(parent, inserted);
        }
        self.root = Some(subtree);

        Ok(Insertion::Inserted(position))
    }

    /// Look up the record stored under `key`.
    pub fn get(&self, key: &R::Key) -> Option<Entry<'_, R>> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match key.cmp(node.record.key()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(Entry::of(node)),
            };
        }
        None
    }

    /// Returns `true` if a record is stored under `key`.
    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.get(key).is_some()
    }

    fn key(&self, id: NodeId) -> &R::Key {
        self.node(id).record.key()
    }

    /// Refresh `at` after one of its subtrees grew by the node `inserted`, and
    /// rotate if it is out of balance. Returns the subtree's new root.
    ///
    /// The inserted key, compared against the heavy child's key, tells which
    /// grandchild subtree grew and therefore single vs double rotation.
    fn rebalance(&mut self, at: NodeId, inserted: NodeId) -> NodeId {
        self.update(at);
        let node = self.node(at);
        let (balance, left, right) = (node.balance, node.left, node.right);

        if balance > 1 {
            if let Some(left) = left {
                if self.key(inserted) < self.key(left) {
                    return self.rotate_right(at);
                }
                let pivot = self.rotate_left(left);
                self.node_mut(at).left = Some(pivot);
                return self.rotate_right(at);
            }
        } else if balance < -1 {
            if let Some(right) = right {
                if self.key(inserted) > self.key(right) {
                    return self.rotate_left(at);
                }
                let pivot = self.rotate_right(right);
                self.node_mut(at).right = Some(pivot);
                return self.rotate_left(at);
            }
        }
        at
    }
}

impl<R> Default for AvlIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R> IntoIterator for &'a AvlIndex<R> {
    type Item = Entry<'a, R>;
    type IntoIter = Materialize<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.materialize()
    }
}

// SAFETY: heights never exceed MAX_HEIGHT (45), so both casts are lossless.
#[allow(clippy::cast_possible_wrap)]
fn balance_of(left: u8, right: u8) -> i8 {
    (left as i8).saturating_sub(right as i8)
}

/// One record of the materialised view.
#[derive(Debug)]
pub struct Entry<'a, R> {
    /// The stored record.
    pub record: &'a R,
    /// Insertion-sequence number of its node.
    pub position: Position,
    /// Balance factor of its node: height(left) - height(right).
    pub balance: i8,
}

impl<'a, R> Entry<'a, R> {
    fn of(node: &'a Node<R>) -> Self {
        Entry {
            record: &node.record,
            position: node.position,
            balance: node.balance,
        }
    }
}

impl<R> Clone for Entry<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Entry<'_, R> {}

/// In-order iterator returned by [`AvlIndex::materialize`].
///
/// Holds an explicit stack of pending ancestors, at most the tree height deep.
pub struct Materialize<'a, R> {
    index: &'a AvlIndex<R>,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a, R> Iterator for Materialize<'a, R> {
    type Item = Entry<'a, R>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = self.index.node(id).left;
        }
        let id = self.stack.pop()?;
        let node = self.index.node(id);
        self.cursor = node.right;
        self.remaining = self.remaining.saturating_sub(1);
        Some(Entry::of(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R> ExactSizeIterator for Materialize<'_, R> {}

impl<R> FusedIterator for Materialize<'_, R> {}

/// Read-only handle on one node of an [`AvlIndex`], for walking the shape.
pub struct NodeRef<'a, R> {
    index: &'a AvlIndex<R>,
    id: NodeId,
}

impl<'a, R> NodeRef<'a, R> {
    fn node(&self) -> &'a Node<R> {
        self.index.node(self.id)
    }

    /// The stored record.
    pub fn record(&self) -> &'a R {
        &self.node().record
    }

    /// Insertion-sequence number.
    pub fn position(&self) -> Position {
        self.node().position
    }

    /// Current balance factor.
    pub fn balance(&self) -> i8 {
        self.node().balance
    }

    /// Height of the subtree rooted here (a leaf is 1).
    pub fn height(&self) -> u8 {
        self.node().height
    }

    /// Left child, if any.
    pub fn left(&self) -> Option<NodeRef<'a, R>> {
        self.node().left.map(|id| NodeRef {
            index: self.index,
            id,
        })
    }

    /// Right child, if any.
    pub fn right(&self) -> Option<NodeRef<'a, R>> {
        self.node().right.map(|id| NodeRef {
            index: self.index,
            id,
        })
    }

    /// This node as a materialised entry.
    pub fn entry(&self) -> Entry<'a, R> {
        Entry::of(self.node())
    }
}

impl<R> Clone for NodeRef<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for NodeRef<'_, R> {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn build(keys: &[&'static str]) -> AvlIndex<&'static str> {
        let mut idx = AvlIndex::new();
        for k in keys {
            idx.insert(*k).expect("insert");
        }
        idx
    }

    fn keys(idx: &AvlIndex<&'static str>) -> Vec<&'static str> {
        idx.materialize().map(|e| *e.record).collect()
    }

    /// Shape as (key, left key, right key) of the root.
    fn root_shape(idx: &AvlIndex<&'static str>) -> (&'static str, Option<&'static str>, Option<&'static str>) {
        let root = idx.root().expect("non-empty");
        (
            *root.record(),
            root.left().map(|n| *n.record()),
            root.right().map(|n| *n.record()),
        )
    }

    /// Recompute heights from the shape and check every stored field.
    fn check(node: Option<NodeRef<'_, &'static str>>, lo: Option<&str>, hi: Option<&str>) -> u8 {
        let Some(n) = node else { return 0 };
        let key = *n.record();
        if let Some(lo) = lo {
            assert!(lo < key, "{lo} must sort before {key}");
        }
        if let Some(hi) = hi {
            assert!(key < hi, "{key} must sort before {hi}");
        }
        let l = check(n.left(), lo, Some(key));
        let r = check(n.right(), Some(key), hi);
        assert_eq!(n.height(), l.max(r) + 1, "stale height at {key}");
        assert_eq!(i16::from(n.balance()), i16::from(l) - i16::from(r), "stale balance at {key}");
        assert!(n.balance().abs() <= 1, "unbalanced at {key}");
        n.height()
    }

    #[test]
    fn test_index_starts_empty() {
        let idx = AvlIndex::<&str>::new();
        assert!(idx.is_empty());
        assert_eq!(idx.height(), 0);
        assert!(idx.root().is_none());
        assert_eq!(idx.materialize().count(), 0);
    }

    #[test]
    fn test_first_insert_is_root_with_position_one() {
        let mut idx = AvlIndex::new();
        let outcome = idx.insert("Solaris").unwrap();
        assert_eq!(outcome, Insertion::Inserted(Position(1)));
        let root = idx.root().unwrap();
        assert_eq!(*root.record(), "Solaris");
        assert_eq!(root.height(), 1);
        assert_eq!(root.balance(), 0);
    }

    #[test]
    fn test_positions_follow_insertion_order() {
        let idx = build(&["Banana", "Apple", "Cherry"]);
        let got: Vec<_> = idx
            .materialize()
            .map(|e| (*e.record, e.position.get()))
            .collect();
        assert_eq!(got, vec![("Apple", 2), ("Banana", 1), ("Cherry", 3)]);
    }

    #[test]
    fn test_ascending_triggers_left_rotation() {
        let idx = build(&["A", "B", "C"]);
        assert_eq!(root_shape(&idx), ("B", Some("A"), Some("C")));
        assert!(idx.materialize().all(|e| e.balance == 0));
    }

    #[test]
    fn test_descending_triggers_right_rotation() {
        let idx = build(&["C", "B", "A"]);
        assert_eq!(root_shape(&idx), ("B", Some("A"), Some("C")));
        assert!(idx.materialize().all(|e| e.balance == 0));
    }

    #[test]
    fn test_left_right_case() {
        let idx = build(&["C", "A", "B"]);
        assert_eq!(root_shape(&idx), ("B", Some("A"), Some("C")));
        // Positions survive the double rotation.
        let b = idx.get("B").unwrap();
        assert_eq!(b.position.get(), 3);
    }

    #[test]
    fn test_right_left_case() {
        let idx = build(&["A", "C", "B"]);
        assert_eq!(root_shape(&idx), ("B", Some("A"), Some("C")));
        assert_eq!(check(idx.root(), None, None), 2);
    }

    #[test]
    fn test_case_sensitive_keys_are_distinct() {
        let mut idx = build(&["Apple", "apple"]);
        assert_eq!(idx.len(), 2);
        let outcome = idx.insert("Apple").unwrap();
        assert_eq!(outcome, Insertion::Duplicate(Position(1)));
        assert_eq!(idx.len(), 2);
        assert_eq!(keys(&idx), vec!["Apple", "apple"]);
    }

    #[test]
    fn test_duplicate_consumes_no_position() {
        let mut idx = build(&["M", "F"]);
        assert!(!idx.insert("M").unwrap().is_new());
        let outcome = idx.insert("T").unwrap();
        assert_eq!(outcome.position().get(), 3);
    }

    #[test]
    fn test_duplicate_leaves_shape_untouched() {
        let mut idx = build(&["D", "B", "F", "A", "C"]);
        let before: Vec<_> = idx
            .materialize()
            .map(|e| (*e.record, e.position, e.balance))
            .collect();
        let shape_before = root_shape(&idx);
        idx.insert("C").unwrap();
        let after: Vec<_> = idx
            .materialize()
            .map(|e| (*e.record, e.position, e.balance))
            .collect();
        assert_eq!(before, after);
        assert_eq!(shape_before, root_shape(&idx));
    }

    #[test]
    fn test_duplicate_keeps_first_record() {
        let mut idx = AvlIndex::new();
        idx.insert(Book::try_new("Emma", "Austen Jane", "Novel", "", "").unwrap())
            .unwrap();
        idx.insert(Book::try_new("Emma", "Someone Else", "Other", "", "").unwrap())
            .unwrap();
        let e = idx.get("Emma").unwrap();
        assert_eq!(e.record.author.as_str(), "Austen Jane");
    }

    #[test]
    fn test_invariants_hold_after_every_insert() {
        let mut idx = AvlIndex::new();
        let words = [
            "m", "d", "x", "a", "f", "p", "z", "b", "e", "g", "n", "q", "y", "c", "h", "o",
            "r", "i", "s", "j", "t", "k", "u", "l", "v", "w",
        ];
        for w in words {
            idx.insert(w).unwrap();
            check(idx.root(), None, None);
        }
        assert_eq!(idx.len(), words.len());
    }

    #[test]
    fn test_materialize_is_restartable() {
        let idx = build(&["q", "w", "e", "r", "t", "y"]);
        let first = keys(&idx);
        let second = keys(&idx);
        assert_eq!(first, second);
        assert_eq!(first, vec!["e", "q", "r", "t", "w", "y"]);
    }

    #[test]
    fn test_materialize_exact_size() {
        let idx = build(&["q", "w", "e", "r"]);
        let mut it = idx.materialize();
        assert_eq!(it.len(), 4);
        it.next();
        assert_eq!(it.len(), 3);
    }

    #[test]
    fn test_get_missing_key() {
        let idx = build(&["a", "b"]);
        assert!(idx.get("c").is_none());
        assert!(idx.contains_key("a"));
    }

    #[test]
    fn test_full_when_positions_exhausted() {
        let mut idx = AvlIndex::new();
        idx.insert("a").unwrap();
        idx.next_position = u32::MAX;
        assert_eq!(idx.insert("b"), Err(IndexError::Full));
        // A failed insert creates nothing.
        assert_eq!(idx.len(), 1);
        // Duplicates still resolve.
        assert!(matches!(idx.insert("a"), Ok(Insertion::Duplicate(_))));
    }

    #[test]
    fn test_from_records_counts_distinct() {
        let idx = AvlIndex::from_records(["b", "a", "b", "c", "a"]).unwrap();
        assert_eq!(idx.len(), 3);
        assert_eq!(keys(&idx), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let mut idx = AvlIndex::new();
        for i in 0..1024u32 {
            idx.insert(alloc::format!("{i:05}")).unwrap();
        }
        // Perfectly balanced for 2^10 - 1 plus one leaf.
        assert_eq!(idx.height(), 11);
    }
}
