//! BK-trees, arena-allocated trees over a discrete metric space which answer "which items lie within this distance of the query" without measuring the distance to every item.
//!
//! Each node stores one item, and every edge is labelled with the exact distance between the parent's item and the child's item. The triangle inequality then rules out whole subtrees during a range search: if the query is at distance `d` from a node, only the children attached under a distance in `[d - radius, d + radius]` can possibly contain a match.
//!
//! # Example
//! ```rust
//! use burkhard::{BkTree, Metric, Distance};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! struct Num(i32);
//! impl Metric for Num {
//!     fn distance(&self, other: &Self) -> Distance {
//!         (self.0 - other.0).unsigned_abs()
//!     }
//! }
//!
//! // The turbofish there is needed to state that we are using the default storage method
//! // instead of asking the compiler to infer it, which would be impossible.
//! let mut tree = BkTree::<_>::new();
//! for n in [10, 3, 17, 12, 25, 8] {
//!     tree.insert(Num(n));
//! }
//!
//! let mut found = tree.range_search(&Num(11), 2);
//! found.sort_by_key(|n| n.0);
//! assert_eq!(found, [&Num(10), &Num(12)]);
//!
//! // Negative radii never match anything.
//! assert!(tree.range_search(&Num(11), -1).is_empty());
//! ```

use core::{
    fmt::{self, Debug, Formatter},
    iter::{FromIterator, FusedIterator},
};
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use tracing::trace;
use crate::{
    storage::{Storage, DefaultStorage},
    CapacityError,
    Distance,
    Metric,
};

mod node;
mod node_ref;
#[cfg(feature = "alloc")]
mod search;

#[cfg(all(test, feature = "std"))]
mod tests;

pub use node::Node;
pub use node_ref::{NodeRef, Children, ChildKeys};
#[cfg(feature = "parallel")]
pub(crate) use search::{Window, clamp_radius};

/// A BK-tree.
///
/// See the [module-level documentation] for more.
///
/// [module-level documentation]: index.html " "
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BkTree<T, S = DefaultStorage<Node<T>>>
where
    S: Storage<Element = Node<T>>,
{
    storage: S,
    root: Option<usize>,
    height: usize,
}
impl<T, S> BkTree<T, S>
where
    S: Storage<Element = Node<T>>,
{
    /// Creates an empty BK-tree.
    ///
    /// # Example
    /// ```rust
    /// # use burkhard::BkTree;
    /// let tree = BkTree::<u32>::new();
    /// assert!(tree.is_empty());
    /// assert!(tree.root().is_none());
    /// ```
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            storage: S::new(),
            root: None,
            height: 0,
        }
    }
    /// Creates an empty BK-tree with the specified capacity for the storage.
    ///
    /// # Panics
    /// The storage may panic if it has fixed capacity and the specified value does not match it.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: S::with_capacity(capacity),
            root: None,
            height: 0,
        }
    }

    /// Returns the number of items in the tree.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.storage.len()
    }
    /// Returns `true` if nothing was inserted into the tree yet, `false` otherwise.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
    /// Returns the number of nodes the storage can hold without reallocating.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }
    /// Reserves capacity for at least `additional` more items.
    ///
    /// # Panics
    /// Fixed-capacity storages panic if the reservation cannot be satisfied.
    #[inline(always)]
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional)
    }
    /// Shrinks the capacity of the storage as much as possible.
    #[inline(always)]
    pub fn shrink_to_fit(&mut self) {
        self.storage.shrink_to_fit()
    }
    /// Returns the number of nodes on the longest path from the root to a leaf: zero for an empty tree, one if there's only a root.
    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns a reference to the root node of the tree, or `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<NodeRef<'_, T, S>> {
        self.root.map(|key| NodeRef::new(self, key))
    }
    /// Returns a reference to the node with the specified key, or `None` if there is no such node.
    ///
    /// Keys are handed out by [`insert`] and [`try_insert`] and stay valid for as long as the tree lives.
    ///
    /// [`insert`]: #method.insert " "
    /// [`try_insert`]: #method.try_insert " "
    #[inline]
    pub fn node(&self, key: usize) -> Option<NodeRef<'_, T, S>> {
        if self.storage.contains_key(key) {
            Some(NodeRef::new(self, key))
        } else {
            None
        }
    }
    /// Returns an iterator over all items in the order in which they were inserted.
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            storage: &self.storage,
            index: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn node_at(&self, key: usize) -> &Node<T> {
        debug_assert!(self.storage.contains_key(key), "invalid node key: {}", key);
        unsafe {
            // SAFETY: keys are only ever handed out by the storage, which never removes nodes
            self.storage.get_unchecked(key)
        }
    }
    #[inline(always)]
    fn node_at_mut(&mut self, key: usize) -> &mut Node<T> {
        debug_assert!(self.storage.contains_key(key), "invalid node key: {}", key);
        unsafe {
            // SAFETY: as above
            self.storage.get_unchecked_mut(key)
        }
    }
    #[inline(always)]
    pub(crate) fn root_key(&self) -> Option<usize> {
        self.root
    }
}
impl<T, S> BkTree<T, S>
where
    T: Metric,
    S: Storage<Element = Node<T>>,
{
    /// Inserts an item into the tree, returning the key of the node which now holds it.
    ///
    /// Starting from the root, the tree is descended along the edges labelled with the distance between the item and each visited node, until a node without such an edge is found. The item is then attached there. Existing nodes are never moved or modified, except for gaining one child.
    ///
    /// # Panics
    /// Panics if the storage has a fixed capacity and is full. Use [`try_insert`] to handle that case.
    ///
    /// # Example
    /// ```rust
    /// # use burkhard::{BkTree, Metric, Distance};
    /// # #[derive(Debug, PartialEq)]
    /// # struct Num(i32);
    /// # impl Metric for Num {
    /// #     fn distance(&self, other: &Self) -> Distance { (self.0 - other.0).unsigned_abs() }
    /// # }
    /// let mut tree = BkTree::<_>::new();
    /// let root = tree.insert(Num(100));
    /// let child = tree.insert(Num(97));
    ///
    /// let child = tree.node(child).unwrap();
    /// assert_eq!(child.attach_distance(), Some(3));
    /// assert_eq!(child.parent().map(|parent| parent.key()), Some(root));
    /// ```
    ///
    /// [`try_insert`]: #method.try_insert " "
    #[inline]
    #[track_caller]
    pub fn insert(&mut self, item: T) -> usize {
        self.try_insert(item)
            .unwrap_or_else(|_| panic!("the tree's storage is full"))
    }
    /// Inserts an item into the tree, returning the key of the node which now holds it, or giving the item back if the storage is full.
    ///
    /// # Errors
    /// Only fails for storages with a fixed capacity, once that capacity is exhausted.
    ///
    /// # Example
    /// ```rust
    /// # use burkhard::{BkTree, Metric, Distance, Node};
    /// use arrayvec::ArrayVec;
    /// # #[derive(Debug, PartialEq)]
    /// # struct Num(i32);
    /// # impl Metric for Num {
    /// #     fn distance(&self, other: &Self) -> Distance { (self.0 - other.0).unsigned_abs() }
    /// # }
    ///
    /// let mut tree = BkTree::<Num, ArrayVec<Node<Num>, 2>>::new();
    /// assert!(tree.try_insert(Num(1)).is_ok());
    /// assert!(tree.try_insert(Num(2)).is_ok());
    /// let error = tree.try_insert(Num(3)).unwrap_err();
    /// assert_eq!(error.into_inner(), Num(3));
    /// ```
    pub fn try_insert(&mut self, item: T) -> Result<usize, CapacityError<T>> {
        let mut current = if let Some(root) = self.root {
            root
        } else {
            let key = self
                .storage
                .try_add(Node::root(item))
                .map_err(|node| CapacityError::new(node.into_item()))?;
            self.root = Some(key);
            self.height = 1;
            trace!(key, "inserted root");
            return Ok(key);
        };
        let mut depth = 1;
        loop {
            let node = self.node_at(current);
            let distance = node.item.distance(&item);
            // Find the first child attached at `distance` or further; children are sorted
            let mut previous = None;
            let mut next = node.first_child;
            while let Some(child) = next {
                let child_node = self.node_at(child);
                if child_node.distance >= distance {
                    break;
                }
                previous = Some(child);
                next = child_node.next_sibling;
            }
            match next {
                Some(child) if self.node_at(child).distance == distance => {
                    current = child;
                    depth += 1;
                }
                _ => {
                    let key = self
                        .storage
                        .try_add(Node::child(item, distance, current, next))
                        .map_err(|node| CapacityError::new(node.into_item()))?;
                    match previous {
                        Some(previous) => self.node_at_mut(previous).next_sibling = Some(key),
                        None => self.node_at_mut(current).first_child = Some(key),
                    }
                    depth += 1;
                    if depth > self.height {
                        self.height = depth;
                    }
                    trace!(key, parent = current, distance, depth, "inserted item");
                    return Ok(key);
                }
            }
        }
    }
    /// Returns `true` if an item at distance zero from `item` is stored in the tree, `false` otherwise.
    ///
    /// Only the single path of edges labelled with the distances to `item` is followed, so this is as cheap as an insertion.
    pub fn contains(&self, item: &T) -> bool {
        let mut current = if let Some(root) = self.root {
            root
        } else {
            return false;
        };
        loop {
            let node = self.node_at(current);
            let distance = node.item.distance(item);
            if distance == 0 {
                return true;
            }
            match NodeRef::new(self, current).child(distance) {
                Some(child) => current = child.key(),
                None => return false,
            }
        }
    }
}
impl<T, S> Default for BkTree<T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
impl<T, S> Extend<T> for BkTree<T, S>
where
    T: Metric,
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}
impl<T, S> FromIterator<T> for BkTree<T, S>
where
    T: Metric,
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
impl<'a, T, S> IntoIterator for &'a BkTree<T, S>
where
    S: Storage<Element = Node<T>>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the items of a BK-tree in insertion order.
///
/// Created by the [`iter`] method on [`BkTree`].
///
/// [`iter`]: struct.BkTree.html#method.iter " "
/// [`BkTree`]: struct.BkTree.html " "
pub struct Iter<'a, T: 'a, S>
where
    S: Storage<Element = Node<T>>,
{
    storage: &'a S,
    index: usize,
}
impl<'a, T, S> Iterator for Iter<'a, T, S>
where
    S: Storage<Element = Node<T>>,
{
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.storage.get(self.index)?;
        self.index += 1;
        Some(&node.item)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.storage.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
impl<T, S> ExactSizeIterator for Iter<'_, T, S> where S: Storage<Element = Node<T>> {}
impl<T, S> FusedIterator for Iter<'_, T, S> where S: Storage<Element = Node<T>> {}
impl<T, S> Clone for Iter<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            index: self.index,
        }
    }
}
impl<T, S> Debug for Iter<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("index", &self.index)
            .field("len", &self.storage.len())
            .finish()
    }
}

/// A BK-tree which uses a `Vec` as backing storage.
///
/// The default `BkTree` type already uses this when the `alloc` feature is enabled, so this is only provided for explicitness and consistency.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub type VecBkTree<T> = BkTree<T, Vec<Node<T>>>;
/// A BK-tree which uses a fixed-capacity `ArrayVec` as backing storage, and thus never allocates.
pub type ArrayBkTree<T, const CAP: usize> = BkTree<T, arrayvec::ArrayVec<Node<T>, CAP>>;
