use crate::SearchError;

/// Whether a concurrent search explored everything it had to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Completeness {
    /// Every subtree which could contain a match was visited.
    Complete,
    /// The search was cancelled before the tree was exhausted. The matches collected so far were discarded.
    Incomplete,
}

/// The result of a concurrent range search.
///
/// A complete outcome holds the same set of items as the sequential [`range_search`] would have returned, in no particular order. An incomplete outcome holds no items at all: partial results are never handed out, since there is no telling which matches are missing from them.
///
/// [`range_search`]: ../bk_tree/struct.BkTree.html#method.range_search " "
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchOutcome<I> {
    items: Vec<I>,
    completeness: Completeness,
    visited: usize,
}
impl<I> SearchOutcome<I> {
    #[inline(always)]
    pub(super) fn complete(items: Vec<I>, visited: usize) -> Self {
        Self {
            items,
            completeness: Completeness::Complete,
            visited,
        }
    }
    #[inline(always)]
    pub(super) fn incomplete(visited: usize) -> Self {
        Self {
            items: Vec::new(),
            completeness: Completeness::Incomplete,
            visited,
        }
    }

    /// Returns the matching items. Always empty if the search was cancelled.
    #[inline(always)]
    pub fn items(&self) -> &[I] {
        &self.items
    }
    /// Returns whether the search ran to completion.
    #[inline(always)]
    pub fn completeness(&self) -> Completeness {
        self.completeness
    }
    /// Returns `true` if the search ran to completion, `false` if it was cancelled.
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }
    /// Returns the number of nodes whose distance to the query was measured.
    #[inline(always)]
    pub fn visited(&self) -> usize {
        self.visited
    }
    /// Converts the outcome into the matching items, or an error if the search was cancelled.
    ///
    /// # Errors
    /// Returns [`SearchError::Cancelled`] for incomplete outcomes.
    ///
    /// [`SearchError::Cancelled`]: ../enum.SearchError.html#variant.Cancelled " "
    #[inline]
    pub fn into_result(self) -> Result<Vec<I>, SearchError> {
        match self.completeness {
            Completeness::Complete => Ok(self.items),
            Completeness::Incomplete => Err(SearchError::Cancelled),
        }
    }
}
