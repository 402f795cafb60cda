use core::{
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
};
use crate::{storage::Storage, Distance};
use super::{BkTree, Node};

/// A reference to a node in a BK-tree.
///
/// Since this type does not point to the node directly, but rather the tree the node is in and the key of the node in the storage, it can be used to traverse the tree.
pub struct NodeRef<'a, T, S>
where
    S: Storage<Element = Node<T>>,
{
    tree: &'a BkTree<T, S>,
    key: usize,
}
impl<'a, T, S> NodeRef<'a, T, S>
where
    S: Storage<Element = Node<T>>,
{
    /// Creates a reference to the node with the specified key, which has to be valid.
    #[inline(always)]
    pub(super) fn new(tree: &'a BkTree<T, S>, key: usize) -> Self {
        Self { tree, key }
    }
    #[inline(always)]
    fn node(&self) -> &'a Node<T> {
        self.tree.node_at(self.key)
    }

    /// Returns the item stored in the node.
    #[inline(always)]
    pub fn item(&self) -> &'a T {
        self.node().item()
    }
    /// Returns the key of the node in the tree's storage.
    #[inline(always)]
    pub fn key(&self) -> usize {
        self.key
    }
    /// Returns the distance between this node's item and its parent's item as it was measured when the node was inserted, or `None` if this is the root node.
    #[inline(always)]
    pub fn attach_distance(&self) -> Option<Distance> {
        self.node().attach_distance()
    }
    /// Returns a reference to the parent node of the pointee, or `None` if it's the root node.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|key| Self::new(self.tree, key))
    }
    /// Returns `true` if the node is the root node, `false` otherwise.
    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }
    /// Returns `true` if the node has no children, `false` otherwise.
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.node().first_child.is_none()
    }
    /// Returns the number of edges between this node and the root.
    #[inline]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node();
        while let Some(parent) = current.parent {
            current = self.tree.node_at(parent);
            depth += 1;
        }
        depth
    }
    /// Returns an iterator over the children of the node, in ascending order of their attach distances.
    #[inline(always)]
    pub fn children(&self) -> Children<'a, T, S> {
        Children {
            keys: self.child_keys(),
        }
    }
    /// Returns an iterator over the attach distances and keys of the children of the node, in ascending order of attach distance.
    #[inline(always)]
    pub fn child_keys(&self) -> ChildKeys<'a, T, S> {
        ChildKeys {
            tree: self.tree,
            next: self.node().first_child,
        }
    }
    /// Returns the number of children of the node.
    #[inline]
    pub fn num_children(&self) -> usize {
        self.child_keys().count()
    }
    /// Returns the child attached under the specified distance, or `None` if there is no such child.
    #[inline]
    pub fn child(&self, distance: Distance) -> Option<Self> {
        self.child_keys()
            .take_while(|&(child_distance, _)| child_distance <= distance)
            .find(|&(child_distance, _)| child_distance == distance)
            .map(|(_, key)| Self::new(self.tree, key))
    }
}
impl<T, S> Copy for NodeRef<'_, T, S> where S: Storage<Element = Node<T>> {}
impl<T, S> Clone for NodeRef<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, S> Debug for NodeRef<'_, T, S>
where
    T: Debug,
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key)
            .field("item", self.item())
            .field("attach_distance", &self.attach_distance())
            .finish()
    }
}

/// An iterator over the attach distances and keys of the children of a BK-tree node.
///
/// Created by [`NodeRef::child_keys`].
///
/// [`NodeRef::child_keys`]: struct.NodeRef.html#method.child_keys " "
pub struct ChildKeys<'a, T, S>
where
    S: Storage<Element = Node<T>>,
{
    tree: &'a BkTree<T, S>,
    next: Option<usize>,
}
impl<T, S> Iterator for ChildKeys<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    type Item = (Distance, usize);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        let node = self.tree.node_at(key);
        self.next = node.next_sibling;
        Some((node.distance, key))
    }
}
impl<T, S> FusedIterator for ChildKeys<'_, T, S> where S: Storage<Element = Node<T>> {}
impl<T, S> Clone for ChildKeys<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            next: self.next,
        }
    }
}
impl<T, S> Debug for ChildKeys<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildKeys")
            .field("next", &self.next)
            .finish()
    }
}

/// An iterator over the children of a BK-tree node.
///
/// Created by [`NodeRef::children`].
///
/// [`NodeRef::children`]: struct.NodeRef.html#method.children " "
pub struct Children<'a, T, S>
where
    S: Storage<Element = Node<T>>,
{
    keys: ChildKeys<'a, T, S>,
}
impl<'a, T, S> Iterator for Children<'a, T, S>
where
    S: Storage<Element = Node<T>>,
{
    type Item = NodeRef<'a, T, S>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.keys.tree;
        self.keys.next().map(|(_, key)| NodeRef::new(tree, key))
    }
}
impl<T, S> FusedIterator for Children<'_, T, S> where S: Storage<Element = Node<T>> {}
impl<T, S> Clone for Children<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}
impl<T, S> Debug for Children<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("next", &self.keys.next)
            .finish()
    }
}
