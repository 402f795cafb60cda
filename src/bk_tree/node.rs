use crate::Distance;

/// A node of a BK-tree.
///
/// Created by the tree internally and only publicly exposed so that the generic arguments of tree storages could be specified.
///
/// The children of a node form a singly linked list threaded through the arena, kept sorted by ascending attach distance, which both makes child lookups by distance stop early and lets range searches stop scanning once they walk past the pruning window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node<T> {
    pub(super) item: T,
    /// The distance to the parent, computed once when the node was attached. Zero for the root.
    pub(super) distance: Distance,
    pub(super) parent: Option<usize>,
    pub(super) first_child: Option<usize>,
    pub(super) next_sibling: Option<usize>,
}
impl<T> Node<T> {
    /// Creates a root node.
    #[inline(always)]
    pub(super) const fn root(item: T) -> Self {
        Self {
            item,
            distance: 0,
            parent: None,
            first_child: None,
            next_sibling: None,
        }
    }
    /// Creates a leaf node which is going to be linked into the children of `parent` right before `next_sibling`.
    #[inline(always)]
    pub(super) const fn child(
        item: T,
        distance: Distance,
        parent: usize,
        next_sibling: Option<usize>,
    ) -> Self {
        Self {
            item,
            distance,
            parent: Some(parent),
            first_child: None,
            next_sibling,
        }
    }
    /// Returns the indexed item.
    #[inline(always)]
    pub const fn item(&self) -> &T {
        &self.item
    }
    /// Returns the distance under which the node is attached to its parent, or `None` for the root.
    #[inline(always)]
    pub fn attach_distance(&self) -> Option<Distance> {
        self.parent.map(|_| self.distance)
    }
    #[inline(always)]
    pub(super) fn into_item(self) -> T {
        self.item
    }
}
