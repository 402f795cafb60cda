//! Implements arena-allocated BK-trees for approximate lookup in discrete metric spaces.
//!
//! ------------------------
//!
//! # Overview
//! A [BK-tree] (Burkhard–Keller tree) indexes items of a metric space, such as words under edit distance or perceptual hashes under Hamming distance, and answers *range queries*: given a query item and a radius, find every indexed item whose distance to the query is at most that radius. This is what spell-checkers and near-duplicate detectors are built on, since exact equality is too strict but measuring the distance to every single item is too slow.
//!
//! Every edge of the tree is labelled with the exact distance between the parent's item and the child's item. During a search, the triangle inequality proves that most subtrees cannot contain a match, and those are never visited.
//!
//! The crate never computes distances by itself. Item types implement the [`Metric`] trait, and the tree only orchestrates calls to it.
//!
//! ```rust
//! use burkhard::{BkTree, Metric, Distance};
//!
//! #[derive(Debug, PartialEq)]
//! struct Word(&'static str);
//! impl Metric for Word {
//!     fn distance(&self, other: &Self) -> Distance {
//!         // A toy metric: the number of mismatched positions plus the length difference.
//!         let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
//!         let mismatched = a.iter().zip(b).filter(|(x, y)| x != y).count();
//!         (mismatched + a.len().max(b.len()) - a.len().min(b.len())) as Distance
//!     }
//! }
//!
//! let tree: BkTree<_> = ["book", "back", "boot", "cook", "books"].iter().copied().map(Word).collect();
//! let mut found = tree.range_search(&Word("bock"), 1);
//! found.sort_by_key(|word| word.0);
//! assert_eq!(found, [&Word("back"), &Word("book")]);
//! ```
//!
//! # Storage
//! Trees use a technique called ["arena-allocated trees"][arena tree blog post], described by Ben Lovy. The nodes are kept in a backing storage, typically a [`Vec`] (or its variants, like [`SmallVec`] or [`ArrayVec`]), and instead of using pointers to link to children, indices into the storage are used instead. BK-trees never remove nodes, so those indices stay valid forever and double as stable node keys.
//!
//! The trait used for defining the "arena" type is [`Storage`]. Several types from both the standard library and external crates implement it out of the box:
//! - [`Vec`] and [`VecDeque`] — the latter does not use `VecDeque` semantics and is simply provided for convenience
//! - [`SmallVec`]
//! - [`ArrayVec`], which never allocates and makes [`try_insert`] report a full tree instead of growing
//!
//! # Concurrent search
//! With the `parallel` feature, [`ParallelSearcher`] explores independent subtrees on a thread pool. Every node visit is a separate unit of work, matches are collected under a lock, and a search finishes exactly when no unit of work is running or queued. Searches can be abandoned through a [`CancellationToken`], in which case the outcome is explicitly marked as incomplete instead of being silently truncated.
//!
//! # Feature flags
//! - `std` (**enabled by default**) — enables the full standard library, disabling `no_std` for the crate. Adds [`Error`] trait implementations for the error types and lets `tracing` use the standard library.
//! - `alloc` (**enabled by default**) — adds `Storage` trait implementations for standard library containers and enables range searches, which need a work queue. *This does not require standard library support and will only panic at runtime in `no_std` environments without an allocator.*
//! - `parallel` (**enabled by default**) — adds the concurrent range search, backed by `rayon`. Requires `std`.
//! - `smallvec` — adds a `Storage` trait implementation for [`SmallVec`].
//!
//! # Diagnostics
//! Insertions and searches emit `tracing` events at the `trace` and `debug` levels. The crate never installs a subscriber by itself.
//!
//! # Public dependencies
//! - `arrayvec` (**required**) — `^0.7`
//! - `smallvec` (*optional*) — `^1.4`
//! - `rayon` (*optional*) — `^1.8`
//!
//! [BK-tree]: https://en.wikipedia.org/wiki/BK-tree " "
//! [`Metric`]: trait.Metric.html " "
//! [`Storage`]: storage/trait.Storage.html " "
//! [`try_insert`]: bk_tree/struct.BkTree.html#method.try_insert " "
//! [`ParallelSearcher`]: parallel/struct.ParallelSearcher.html " "
//! [`CancellationToken`]: parallel/struct.CancellationToken.html " "
//! [`Error`]: https://doc.rust-lang.org/std/error/trait.Error.html " "
//! [`Vec`]: https://doc.rust-lang.org/std/vec/struct.Vec.html " "
//! [`VecDeque`]: https://doc.rust-lang.org/std/collections/struct.VecDeque.html " "
//! [`SmallVec`]: https://docs.rs/smallvec/*/smallvec/struct.SmallVec.html " "
//! [`ArrayVec`]: https://docs.rs/arrayvec/*/arrayvec/struct.ArrayVec.html " "
//! [arena tree blog post]: https://dev.to/deciduously/no-more-tears-no-more-knots-arena-allocated-trees-in-rust-44k6 " "

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::nursery,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::cast_lossless,
    clippy::checked_conversions,
    clippy::copy_iterator,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::filter_map_next,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::fn_params_excessive_bools,
    clippy::implicit_hasher,
    clippy::implicit_saturating_sub,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::items_after_statements,
    clippy::large_stack_arrays,
    clippy::let_unit_value,
    clippy::macro_use_imports,
    clippy::match_same_arms,
    clippy::match_wild_err_arm,
    clippy::match_wildcard_for_single_variants,
    // sick of this stupid lint, disabling
    // clippy::module_name_repetitions,
    clippy::mut_mut,
    clippy::needless_continue,
    clippy::needless_pass_by_value,
    clippy::option_option,
    clippy::range_plus_one,
    clippy::range_minus_one,
    clippy::redundant_closure_for_method_calls,
    clippy::same_functions_in_if_condition,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::string_add_assign,
    clippy::too_many_lines,
    clippy::type_repetition_in_bounds,
    clippy::trivially_copy_pass_by_ref,
    clippy::unicode_not_nfc,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::used_underscore_binding,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::decimal_literal_representation,
    clippy::get_unwrap,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::unwrap_used, // Only .expect() allowed
    clippy::use_debug,
    clippy::verbose_file_reads,
)]
#![deny(
    anonymous_parameters,
    bare_trait_objects,
    clippy::exit,
)]
#![allow(clippy::use_self)] // FIXME reenable when it gets fixed
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod storage;
#[doc(no_inline)]
pub use storage::{Storage, DefaultStorage};

mod metric;
pub use metric::{Metric, Distance};

pub mod bk_tree;
pub use bk_tree::{BkTree, Node, NodeRef};

#[cfg(all(test, feature = "std"))]
mod test_words;

#[cfg(feature = "parallel")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "parallel")))]
pub mod parallel;
#[cfg(feature = "parallel")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "parallel")))]
pub use parallel::{ParallelSearcher, CancellationToken, SearchOutcome, Completeness};

/// A prelude for using the crate, containing the most used types in a renamed form for safe glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::storage::{
        Storage as BkTreeStorage,
        DefaultStorage as DefaultBkTreeStorage,
    };
    #[doc(no_inline)]
    pub use crate::metric::{Metric, Distance};
    #[doc(no_inline)]
    pub use crate::bk_tree::{
        BkTree,
        NodeRef as BkTreeNodeRef,
    };
    #[cfg(feature = "parallel")]
    #[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "parallel")))]
    #[doc(no_inline)]
    pub use crate::parallel::{
        ParallelSearcher,
        CancellationToken,
        SearchOutcome,
        Completeness,
    };
}

use core::fmt::{self, Formatter, Debug};
use thiserror::Error;

/// The error type returned by [`try_insert`] when the tree's storage has a fixed capacity and is full.
///
/// [`try_insert`]: bk_tree/struct.BkTree.html#method.try_insert " "
#[derive(Copy, Clone, PartialEq, Eq, Hash, Error)]
#[error("the fixed-capacity node storage of the tree is full")]
pub struct CapacityError<T> {
    item: T,
}
impl<T> CapacityError<T> {
    #[inline(always)]
    pub(crate) const fn new(item: T) -> Self {
        Self { item }
    }
    /// Returns the item which could not be inserted, so that it doesn't get dropped if it could instead be reused in the event of a failure.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)] // const fn cannot evaluate drop
    pub fn into_inner(self) -> T {
        self.item
    }
}
impl<T> Debug for CapacityError<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityError").finish_non_exhaustive()
    }
}

/// The error type returned when converting an incomplete [`SearchOutcome`] into a `Result`.
///
/// [`SearchOutcome`]: parallel/struct.SearchOutcome.html " "
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The search was cancelled before the tree was exhausted, so some matches may be missing.
    #[error("the search was cancelled before it could finish")]
    Cancelled,
}
