//! Concurrent range search over BK-trees.
//!
//! The module is home to the following items:
//! - [`ParallelSearcher`], which owns a thread pool and runs range searches on it
//! - [`CancellationToken`], a handle for abandoning a search midway through
//! - [`SearchOutcome`] and [`Completeness`], the result of a concurrent search and whether it ran to the end
//!
//! Every node visit is a separate unit of work: it measures the distance to the query, records a match if there is one, and spawns a unit of its own for each child inside the pruning window. Matches are pushed into a shared, mutex-guarded collection. The search ends exactly when no unit is running and none is queued, which is when the pool's scope returns. Termination relies on that join alone; debug builds additionally count outstanding units and assert that the count is zero afterwards. There is no idle timeout anywhere.
//!
//! # Example
//! ```rust
//! use burkhard::{BkTree, Metric, Distance, ParallelSearcher, CancellationToken};
//!
//! #[derive(Debug, PartialEq)]
//! struct Num(i64);
//! impl Metric for Num {
//!     fn distance(&self, other: &Self) -> Distance {
//!         (self.0 - other.0).unsigned_abs() as Distance
//!     }
//! }
//!
//! let tree: BkTree<_> = (0..1000).map(|n| Num(n * 7 % 1000)).collect();
//! let searcher = ParallelSearcher::with_threads(&tree, 4).expect("failed to build the pool");
//!
//! let outcome = searcher.range_search(&Num(500), 3, &CancellationToken::new());
//! assert!(outcome.is_complete());
//! let mut found: Vec<i64> = outcome.items().iter().map(|n| n.0).collect();
//! found.sort_unstable();
//! assert_eq!(found, [497, 498, 499, 500, 501, 502, 503]);
//! ```
//!
//! [`ParallelSearcher`]: struct.ParallelSearcher.html " "
//! [`CancellationToken`]: struct.CancellationToken.html " "
//! [`SearchOutcome`]: struct.SearchOutcome.html " "
//! [`Completeness`]: enum.Completeness.html " "

mod cancel;
mod outcome;

#[cfg(test)]
mod tests;

pub use cancel::CancellationToken;
pub use outcome::{SearchOutcome, Completeness};

use std::{
    fmt::{self, Debug, Formatter},
    num::NonZeroUsize,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    thread,
};
use parking_lot::Mutex;
use rayon::{Scope, ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, warn};
use crate::{
    bk_tree::{clamp_radius, Window},
    storage::{Storage, DefaultStorage},
    BkTree,
    Distance,
    Metric,
    Node,
};

/// The error type returned when the thread pool for concurrent searches could not be created.
#[derive(Debug, Error)]
#[error("failed to build the thread pool for concurrent search")]
pub struct BuildPoolError(#[from] ThreadPoolBuildError);

/// Runs range searches over a BK-tree on a dedicated thread pool.
///
/// The tree stays immutably borrowed for as long as the searcher exists, which rules out insertions racing with searches. Building the pool is comparatively expensive, so a searcher is best reused for many queries.
///
/// See the [module-level documentation] for more.
///
/// [module-level documentation]: index.html " "
pub struct ParallelSearcher<'t, T, S = DefaultStorage<Node<T>>>
where
    S: Storage<Element = Node<T>>,
{
    tree: &'t BkTree<T, S>,
    pool: ThreadPool,
}
impl<'t, T, S> ParallelSearcher<'t, T, S>
where
    T: Metric + Sync,
    S: Storage<Element = Node<T>> + Sync,
{
    /// Creates a searcher with one worker thread per unit of hardware parallelism reported by the platform.
    ///
    /// # Errors
    /// Fails if the operating system refuses to spawn the worker threads.
    #[inline]
    pub fn new(tree: &'t BkTree<T, S>) -> Result<Self, BuildPoolError> {
        Self::with_threads(tree, 0)
    }
    /// Creates a searcher with the specified number of worker threads. Zero means the same as [`new`]: as many as the platform reports hardware parallelism for.
    ///
    /// # Errors
    /// Fails if the operating system refuses to spawn the worker threads.
    ///
    /// [`new`]: #method.new " "
    pub fn with_threads(tree: &'t BkTree<T, S>, num_threads: usize) -> Result<Self, BuildPoolError> {
        let num_threads = if num_threads == 0 {
            default_num_threads()
        } else {
            num_threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("bk-search-{}", index))
            .build()?;
        debug!(num_threads, "built thread pool for concurrent search");
        Ok(Self { tree, pool })
    }

    /// Returns the tree being searched.
    #[inline(always)]
    pub fn tree(&self) -> &'t BkTree<T, S> {
        self.tree
    }
    /// Returns the number of worker threads in the pool.
    #[inline(always)]
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Returns all items within `radius` of `query`, exploring independent subtrees in parallel.
    ///
    /// Unless cancelled, the outcome holds exactly the same set of items as [`BkTree::range_search`] would have returned, in an unspecified order. Empty trees and negative radii produce a complete outcome with no items.
    ///
    /// If `token` gets cancelled while the search is running, no further nodes are visited, the matches found so far are thrown away and the outcome is marked as [`Incomplete`]. A token which gets cancelled only after every node has already been visited does not affect the outcome.
    ///
    /// [`BkTree::range_search`]: ../bk_tree/struct.BkTree.html#method.range_search " "
    /// [`Incomplete`]: enum.Completeness.html#variant.Incomplete " "
    pub fn range_search(
        &self,
        query: &T,
        radius: i64,
        token: &CancellationToken,
    ) -> SearchOutcome<&'t T> {
        let (root, radius) = match (self.tree.root_key(), clamp_radius(radius)) {
            (Some(root), Some(radius)) => (root, radius),
            _ => return SearchOutcome::complete(Vec::new(), 0),
        };
        let visit = Visit {
            tree: self.tree,
            query,
            radius,
            token,
            sink: Mutex::new(Vec::new()),
            #[cfg(debug_assertions)]
            outstanding: AtomicUsize::new(0),
            visited: AtomicUsize::new(0),
            interrupted: AtomicBool::new(false),
        };
        self.pool.scope(|scope| visit.spawn(scope, root));
        #[cfg(debug_assertions)]
        assert_eq!(
            visit.outstanding.load(Ordering::Acquire),
            0,
            "the pool scope returned with units of work still outstanding",
        );

        let Visit {
            sink,
            visited,
            interrupted,
            ..
        } = visit;
        let visited = visited.into_inner();
        if interrupted.into_inner() {
            warn!(radius, visited, "concurrent range search was cancelled");
            SearchOutcome::incomplete(visited)
        } else {
            let items = sink.into_inner();
            debug!(
                radius,
                visited,
                matches = items.len(),
                "concurrent range search finished",
            );
            SearchOutcome::complete(items, visited)
        }
    }
}
impl<T, S> Debug for ParallelSearcher<'_, T, S>
where
    S: Storage<Element = Node<T>>,
{
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelSearcher")
            .field("tree_len", &self.tree.len())
            .field("num_threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl<T, S> BkTree<T, S>
where
    T: Metric + Sync,
    S: Storage<Element = Node<T>> + Sync,
{
    /// Runs a single concurrent range search on a freshly built [`ParallelSearcher`] with the default number of threads.
    ///
    /// Prefer keeping a `ParallelSearcher` around when running many queries, since this builds a new thread pool every time.
    ///
    /// # Errors
    /// Fails if the thread pool could not be built.
    ///
    /// [`ParallelSearcher`]: ../parallel/struct.ParallelSearcher.html " "
    #[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "parallel")))]
    #[inline]
    pub fn range_search_concurrent(
        &self,
        query: &T,
        radius: i64,
        token: &CancellationToken,
    ) -> Result<SearchOutcome<&T>, BuildPoolError> {
        Ok(ParallelSearcher::new(self)?.range_search(query, radius, token))
    }
}

/// The state shared by all units of work of one concurrent search.
struct Visit<'t, 'q, T, S>
where
    S: Storage<Element = Node<T>>,
{
    tree: &'t BkTree<T, S>,
    query: &'q T,
    radius: Distance,
    token: &'q CancellationToken,
    sink: Mutex<Vec<&'t T>>,
    /// Units of work which were spawned and have not finished yet.
    #[cfg(debug_assertions)]
    outstanding: AtomicUsize,
    visited: AtomicUsize,
    /// Set once any unit of work skips a node because of cancellation.
    interrupted: AtomicBool,
}
impl<'t, 'q, T, S> Visit<'t, 'q, T, S>
where
    T: Metric + Sync,
    S: Storage<Element = Node<T>> + Sync,
{
    fn spawn<'s>(&'s self, scope: &Scope<'s>, key: usize) {
        #[cfg(debug_assertions)]
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        scope.spawn(move |scope| {
            self.visit(scope, key);
            #[cfg(debug_assertions)]
            self.outstanding.fetch_sub(1, Ordering::AcqRel);
        });
    }
    fn visit<'s>(&'s self, scope: &Scope<'s>, key: usize) {
        if self.token.is_cancelled() {
            self.interrupted.store(true, Ordering::Release);
            return;
        }
        self.visited.fetch_add(1, Ordering::Relaxed);
        let tree = self.tree;
        let item = tree.node_at(key).item();
        let distance = item.distance(self.query);
        if distance <= self.radius {
            self.sink.lock().push(item);
        }
        for child in tree.children_within(key, Window::around(distance, self.radius)) {
            if self.token.is_cancelled() {
                self.interrupted.store(true, Ordering::Release);
                return;
            }
            self.spawn(scope, child);
        }
    }
}

fn default_num_threads() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
