use core::convert::TryFrom;
use alloc::{collections::VecDeque, vec::Vec};
use tracing::debug;
use crate::{storage::Storage, Distance, Metric};
use super::{BkTree, Node, NodeRef};

/// The range of attach distances which a child must fall into for its subtree to possibly contain a match.
///
/// If the query is at distance `d` from a node and `c` is one of that node's children attached under distance `k`, the triangle inequality gives `d(query, c) >= |d - k|`, so only children with `k` in `[d - radius, d + radius]` are worth visiting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Window {
    low: Distance,
    high: Distance,
}
impl Window {
    #[inline(always)]
    pub(crate) fn around(distance: Distance, radius: Distance) -> Self {
        Self {
            low: distance.saturating_sub(radius),
            high: distance.saturating_add(radius),
        }
    }
    #[inline(always)]
    pub(crate) fn contains(self, distance: Distance) -> bool {
        self.low <= distance && distance <= self.high
    }
}

/// Converts a caller-provided radius into a distance, or `None` if it's negative.
#[inline]
pub(crate) fn clamp_radius(radius: i64) -> Option<Distance> {
    if radius < 0 {
        None
    } else {
        Some(Distance::try_from(radius).unwrap_or(Distance::MAX))
    }
}

impl<T, S> BkTree<T, S>
where
    S: Storage<Element = Node<T>>,
{
    /// Returns the keys of the children of the node at `key` whose attach distance is inside `window`.
    #[inline]
    pub(crate) fn children_within(
        &self,
        key: usize,
        window: Window,
    ) -> impl Iterator<Item = usize> + '_ {
        NodeRef::new(self, key)
            .child_keys()
            .skip_while(move |&(distance, _)| distance < window.low)
            .take_while(move |&(distance, _)| window.contains(distance))
            .map(|(_, key)| key)
    }
}
impl<T, S> BkTree<T, S>
where
    T: Metric,
    S: Storage<Element = Node<T>>,
{
    /// Returns all items within `radius` of `query`.
    ///
    /// The tree is walked breadth-first, skipping every subtree which the triangle inequality proves to be out of reach. Items are returned in the order they were discovered in, which is deterministic for a given tree and query but is *not* sorted by distance; use [`range_search_with_distances`] to sort without measuring distances again.
    ///
    /// Searching an empty tree, or searching with a negative radius, returns nothing.
    ///
    /// [`range_search_with_distances`]: #method.range_search_with_distances " "
    #[inline]
    pub fn range_search(&self, query: &T, radius: i64) -> Vec<&T> {
        self.range_search_with_distances(query, radius)
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }
    /// Returns all items within `radius` of `query`, along with their distances to the query.
    ///
    /// Apart from the distances, this is identical to [`range_search`].
    ///
    /// # Example
    /// ```rust
    /// # use burkhard::{BkTree, Metric, Distance};
    /// # #[derive(Debug, PartialEq)]
    /// # struct Num(i32);
    /// # impl Metric for Num {
    /// #     fn distance(&self, other: &Self) -> Distance { (self.0 - other.0).unsigned_abs() }
    /// # }
    /// let tree: BkTree<_> = (0..100).map(Num).collect();
    ///
    /// let mut found = tree.range_search_with_distances(&Num(50), 2);
    /// found.sort_by_key(|&(distance, item)| (distance, item.0));
    /// let found: Vec<_> = found.into_iter().map(|(distance, item)| (distance, item.0)).collect();
    /// assert_eq!(found, [(0, 50), (1, 49), (1, 51), (2, 48), (2, 52)]);
    /// ```
    ///
    /// [`range_search`]: #method.range_search " "
    pub fn range_search_with_distances(&self, query: &T, radius: i64) -> Vec<(Distance, &T)> {
        let mut results = Vec::new();
        let (root, radius) = match (self.root, clamp_radius(radius)) {
            (Some(root), Some(radius)) => (root, radius),
            _ => return results,
        };
        let mut queue = VecDeque::new();
        queue.push_back(root);
        let mut visited = 0_usize;
        while let Some(key) = queue.pop_front() {
            visited += 1;
            let node = self.node_at(key);
            let distance = node.item.distance(query);
            if distance <= radius {
                results.push((distance, &node.item));
            }
            queue.extend(self.children_within(key, Window::around(distance, radius)));
        }
        debug!(radius, visited, matches = results.len(), "range search finished");
        results
    }
}
