//! An ordered map implemented with an AVL tree.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

use log::{debug, trace};

use crate::compare::{Comparator, Natural};
use crate::error::{Error, Result};

mod iter;
mod node;

pub use iter::{IntoIter, Iter, IterMut, Keys, Values};
use node::{Link, Node};

/// An ordered map implemented with an AVL tree.
///
/// Keys are ordered by the comparator `C`, which defaults to the key type's
/// [`Ord`] implementation. Every mutation restores the AVL condition on its way
/// back up to the root, so lookups, insertions and removals take O(log n).
///
/// ```
/// use avl_tree_map::{AvlTreeMap, Error};
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero").unwrap();
/// map.insert(1, "one").unwrap();
/// map.insert(2, "two").unwrap();
/// assert_eq!(map.insert(2, "two"), Err(Error::DuplicateKey));
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(map.remove(&1), Ok("one"));
/// assert!(map.get(&1).is_none());
/// ```
pub struct AvlTreeMap<K, V, C = Natural> {
    root: Link<K, V>,
    num_nodes: usize,
    comparator: C,
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map ordered by `K: Ord`.
    /// No memory is allocated until the first entry is inserted.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Builds a map by inserting the entries one by one, in iteration order.
    /// Fails with [`Error::DuplicateKey`] on the first repeated key.
    pub fn try_from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::try_from_entries_with(entries, Natural)
    }
}

impl<K, V, C: Comparator<K>> AvlTreeMap<K, V, C> {
    /// Creates an empty map ordered by the given comparator.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            comparator,
        }
    }

    /// Builds a map ordered by `comparator` by inserting the entries one by
    /// one, in iteration order.
    /// Fails with [`Error::DuplicateKey`] on the first key that compares
    /// equal to an earlier one.
    pub fn try_from_entries_with<I>(entries: I, comparator: C) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_comparator(comparator);
        for (key, value) in entries {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    /// Returns a reference to the comparator ordering the keys.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|node| (&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value for a key that may be missing altogether.
    ///
    /// Fails with [`Error::InvalidKey`] when `key` is `None`, before searching,
    /// and with [`Error::KeyNotFound`] when the map has no such key.
    pub fn get_checked(&self, key: Option<&K>) -> Result<&V> {
        let key = key.ok_or(Error::InvalidKey)?;
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Sets the value for a key that may be missing altogether.
    ///
    /// Replaces the value in place if the key is present, inserts a new entry
    /// otherwise. Fails with [`Error::InvalidKey`] when `key` is `None`.
    pub fn set(&mut self, key: Option<K>, value: V) -> Result<()> {
        let key = key.ok_or(Error::InvalidKey)?;
        match self.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => self.insert(key, value),
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Fails with [`Error::DuplicateKey`] if the map already contains a key
    /// comparing equal to `key`; the map is left unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        Self::insert_at(&mut self.root, key, value, &self.comparator)?;
        self.num_nodes += 1;
        Ok(())
    }

    /// Removes a key from the map, returning its value.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is not in the map.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is not in the map.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, V)> {
        match Self::remove_at(&mut self.root, key, &self.comparator) {
            Some(entry) => {
                debug_assert!(self.num_nodes >= 1);
                self.num_nodes -= 1;
                Ok(entry)
            }
            None => {
                debug!("remove: key not found");
                Err(Error::KeyNotFound)
            }
        }
    }

    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        current
    }

    fn insert_at(link: &mut Link<K, V>, key: K, value: V, comparator: &C) -> Result<()> {
        let node = match link {
            None => {
                *link = Some(Node::create(key, value));
                return Ok(());
            }
            Some(node) => node,
        };
        match comparator.compare(&key, &node.key) {
            Ordering::Equal => {
                debug!("insert: duplicate key rejected");
                return Err(Error::DuplicateKey);
            }
            Ordering::Less => Self::insert_at(&mut node.left, key, value, comparator)?,
            Ordering::Greater => Self::insert_at(&mut node.right, key, value, comparator)?,
        }
        *link = link.take().map(Self::rebalance);
        Ok(())
    }

    /// Removes the node matching `key` from the subtree at `link`.
    /// Returns `None` without touching the subtree if there is no such node.
    fn remove_at(link: &mut Link<K, V>, key: &K, comparator: &C) -> Option<(K, V)> {
        let node = link.as_mut()?;
        let removed = match comparator.compare(key, &node.key) {
            Ordering::Less => Self::remove_at(&mut node.left, key, comparator)?,
            Ordering::Greater => Self::remove_at(&mut node.right, key, comparator)?,
            Ordering::Equal => {
                let mut target = link.take()?;
                match target.right.take() {
                    None => {
                        // Stem or leaf, its left subtree is already balanced
                        *link = target.left.take();
                        return Some((target.key, target.value));
                    }
                    Some(right) => {
                        // Splice the in-order successor into the position of the target node
                        let (rest, mut successor) = Self::remove_min(right);
                        successor.left = target.left.take();
                        successor.right = rest;
                        *link = Some(successor);
                        (target.key, target.value)
                    }
                }
            }
        };
        *link = link.take().map(Self::rebalance);
        Some(removed)
    }

    /// Detaches the node with the smallest key from a subtree.
    /// Returns the rebalanced rest of the subtree and the detached node.
    fn remove_min(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (rest, node)
            }
            Some(left) => {
                let (rest, min) = Self::remove_min(left);
                node.left = rest;
                (Some(Self::rebalance(node)), min)
            }
        }
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree: 0 if empty, 1 for a single entry.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns true if any entry holds a value equal to `value`.
    /// Scans the map in key order, O(n).
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Walks the map in ascending key order (left subtree, node, right subtree).
    pub fn traverse(&self) -> Iter<'_, K, V> {
        self.iter()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.root, self.num_nodes)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        C: Comparator<K>,
    {
        // Returns number of nodes in the subtree
        fn check_node<K, V, C: Comparator<K>>(
            node: &Node<K, V>,
            lower: Option<&K>,
            upper: Option<&K>,
            comparator: &C,
        ) -> usize {
            // Check search tree order against every ancestor bound
            if let Some(lower) = lower {
                assert_eq!(comparator.compare(lower, &node.key), Ordering::Less);
            }
            if let Some(upper) = upper {
                assert_eq!(comparator.compare(&node.key, upper), Ordering::Less);
            }

            let mut num_nodes = 1;
            if let Some(left) = node.left.as_deref() {
                num_nodes += check_node(left, lower, Some(&node.key), comparator);
            }
            if let Some(right) = node.right.as_deref() {
                num_nodes += check_node(right, Some(&node.key), upper, comparator);
            }

            // Check height
            let left_height = node.left_height();
            let right_height = node.right_height();
            assert_eq!(node.height, 1 + left_height.max(right_height));

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            num_nodes
        }

        let num_nodes = match self.root.as_deref() {
            None => 0,
            Some(root) => check_node(root, None, None, &self.comparator),
        };

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
    }

    /// Restores the AVL condition at the top of a subtree whose children are
    /// both balanced, and returns the new top node.
    /// The height difference of the children must not exceed 2, which always
    /// holds after a single insert or remove below.
    fn rebalance(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        node.adjust_height();
        let balance = node.balance_factor();
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            // Left heavy, left-right case needs the left child turned first
            if let Some(left) = node.left.take() {
                node.left = Some(if left.balance_factor() < 0 {
                    Self::rotate_left(left)
                } else {
                    left
                });
            }
            Self::rotate_right(node)
        } else if balance < -1 {
            // Right heavy, right-left case needs the right child turned first
            if let Some(right) = node.right.take() {
                node.right = Some(if right.balance_factor() > 0 {
                    Self::rotate_right(right)
                } else {
                    right
                });
            }
            Self::rotate_left(node)
        } else {
            node
        }
    }

    /// Promotes the right child of `node` and returns it.
    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.right.take() {
            Some(mut right) => {
                trace!("rotate left");
                node.right = right.left.take();
                node.adjust_height();
                right.left = Some(node);
                right.adjust_height();
                right
            }
            None => node,
        }
    }

    /// Promotes the left child of `node` and returns it.
    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.left.take() {
            Some(mut left) => {
                trace!("rotate right");
                node.left = left.right.take();
                node.adjust_height();
                left.right = Some(node);
                left.adjust_height();
                left
            }
            None => node,
        }
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for AvlTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            num_nodes: self.num_nodes,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for AvlTreeMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> TryFrom<BTreeMap<K, V>> for AvlTreeMap<K, V> {
    type Error = Error;

    fn try_from(entries: BTreeMap<K, V>) -> Result<Self> {
        Self::try_from_entries(entries)
    }
}

impl<K: Ord, V, S> TryFrom<HashMap<K, V, S>> for AvlTreeMap<K, V> {
    type Error = Error;

    fn try_from(entries: HashMap<K, V, S>) -> Result<Self> {
        Self::try_from_entries(entries)
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for AvlTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root, self.num_nodes)
    }
}
