use super::*;
use std::time::{Duration, Instant};
use std::sync::atomic::AtomicUsize;
use crate::{
    test_words::{random_words, words, Word},
    SearchError,
};

fn sorted<'a>(found: impl IntoIterator<Item = &'a Word>) -> Vec<&'a str> {
    let mut found: Vec<&str> = found.into_iter().map(|word| word.0.as_str()).collect();
    found.sort_unstable();
    found
}

#[test]
fn basic() {
    let tree: BkTree<Word> = words(&["cat", "cats", "bat", "hat", "cast"]).into_iter().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 2).expect("failed to build the pool");
    let outcome = searcher.range_search(&Word::new("cat"), 1, &CancellationToken::never());
    assert!(outcome.is_complete());
    assert_eq!(outcome.completeness(), Completeness::Complete);
    assert_eq!(sorted(outcome.items().iter().copied()), ["bat", "cast", "cat", "cats", "hat"]);
    assert_eq!(
        sorted(outcome.items().iter().copied()),
        sorted(tree.range_search(&Word::new("cat"), 1)),
    );
}

#[test]
fn agrees_with_sequential() {
    let items = random_words(11, 2000);
    let tree: BkTree<Word> = items.iter().cloned().collect();
    let queries = random_words(12, 25);
    for &num_threads in &[1, 2, 4, 7] {
        let searcher = ParallelSearcher::with_threads(&tree, num_threads)
            .expect("failed to build the pool");
        assert_eq!(searcher.num_threads(), num_threads);
        for query in &queries {
            for radius in 0..4 {
                let outcome = searcher.range_search(query, radius, &CancellationToken::new());
                assert!(outcome.is_complete());
                assert_eq!(
                    sorted(outcome.items().iter().copied()),
                    sorted(tree.range_search(query, radius)),
                    "query {:?}, radius {}, {} threads",
                    query,
                    radius,
                    num_threads,
                );
            }
        }
    }
}

#[test]
fn visits_every_node_for_huge_radius() {
    let items = random_words(13, 500);
    let tree: BkTree<Word> = items.iter().cloned().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 3).expect("failed to build the pool");
    let outcome = searcher.range_search(&Word::new("d"), i64::MAX, &CancellationToken::new());
    assert!(outcome.is_complete());
    assert_eq!(outcome.items().len(), items.len());
    assert_eq!(outcome.visited(), items.len());
}

#[test]
fn empty_tree_and_negative_radius() {
    let empty = BkTree::<Word>::new();
    let outcome = empty
        .range_search_concurrent(&Word::new("cat"), 5, &CancellationToken::new())
        .expect("failed to build the pool");
    assert!(outcome.is_complete());
    assert!(outcome.items().is_empty());
    assert_eq!(outcome.visited(), 0);

    let tree: BkTree<Word> = words(&["cat", "cats"]).into_iter().collect();
    let outcome = tree
        .range_search_concurrent(&Word::new("cat"), -3, &CancellationToken::new())
        .expect("failed to build the pool");
    assert!(outcome.is_complete());
    assert!(outcome.items().is_empty());
    assert_eq!(outcome.into_result().map(|items| items.len()), Ok(0));
}

#[test]
fn cancelled_before_start() {
    let tree: BkTree<Word> = random_words(14, 300).into_iter().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 2).expect("failed to build the pool");
    let token = CancellationToken::new();
    token.clone().cancel();

    let outcome = searcher.range_search(&Word::new("abc"), 2, &token);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.completeness(), Completeness::Incomplete);
    assert!(outcome.items().is_empty());
    assert_eq!(outcome.visited(), 0);
    assert_eq!(outcome.into_result(), Err(SearchError::Cancelled));
}

/// Cancels its token once the distance has been measured a set number of times.
struct Tripwire {
    token: CancellationToken,
    calls: AtomicUsize,
    limit: usize,
}
/// An integer under absolute difference which counts every distance measurement on a shared tripwire.
struct Counted<'w> {
    value: i64,
    wire: &'w Tripwire,
}
impl Metric for Counted<'_> {
    fn distance(&self, other: &Self) -> Distance {
        if self.wire.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.wire.limit {
            self.wire.token.cancel();
        }
        (self.value - other.value).unsigned_abs() as Distance
    }
}

#[test]
fn cancelled_midway() {
    const LEN: i64 = 5000;
    let wire = Tripwire {
        token: CancellationToken::new(),
        calls: AtomicUsize::new(0),
        limit: 50,
    };
    let tree: BkTree<Counted<'_>> = (0..LEN)
        .map(|n| Counted {
            value: n * 7919 % LEN,
            wire: &wire,
        })
        .collect();
    // Insertion measures distances too
    wire.calls.store(0, Ordering::SeqCst);
    assert!(!wire.token.is_cancelled());

    let searcher = ParallelSearcher::with_threads(&tree, 4).expect("failed to build the pool");
    let query = Counted {
        value: LEN / 2,
        wire: &wire,
    };
    // Every item matches, so only cancellation can cut the search short
    let outcome = searcher.range_search(&query, 4000, &wire.token);
    assert!(wire.token.is_cancelled());
    assert_eq!(outcome.completeness(), Completeness::Incomplete);
    assert!(outcome.items().is_empty());
    assert!(outcome.visited() >= wire.limit);
    assert!(outcome.visited() < tree.len());
    assert_eq!(outcome.into_result().map(|items| items.len()), Err(SearchError::Cancelled));
}

#[test]
fn expired_deadline() {
    let tree: BkTree<Word> = random_words(15, 300).into_iter().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 2).expect("failed to build the pool");
    let token = CancellationToken::with_deadline(Instant::now() - Duration::from_millis(1));
    assert!(token.is_cancelled());
    let outcome = searcher.range_search(&Word::new("abc"), 2, &token);
    assert_eq!(outcome.completeness(), Completeness::Incomplete);
    assert!(outcome.items().is_empty());
}

#[test]
fn distant_deadline_does_not_interfere() {
    let tree: BkTree<Word> = random_words(16, 300).into_iter().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 2).expect("failed to build the pool");
    let token = CancellationToken::with_timeout(Duration::from_secs(3600));
    let outcome = searcher.range_search(&Word::new("abc"), 2, &token);
    assert!(outcome.is_complete());
    assert_eq!(
        sorted(outcome.items().iter().copied()),
        sorted(tree.range_search(&Word::new("abc"), 2)),
    );
}

#[test]
fn cancelling_afterwards_changes_nothing() {
    let tree: BkTree<Word> = random_words(17, 300).into_iter().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 2).expect("failed to build the pool");
    let token = CancellationToken::new();
    let outcome = searcher.range_search(&Word::new("abc"), 1, &token);
    token.cancel();
    assert!(outcome.is_complete());
    let expected = sorted(tree.range_search(&Word::new("abc"), 1));
    let items = outcome.into_result().expect("the search was not cancelled");
    assert_eq!(sorted(items), expected);

    // The same token now cancels every later search right away
    let later = searcher.range_search(&Word::new("abc"), 1, &token);
    assert!(!later.is_complete());
}

#[test]
fn default_thread_count() {
    let tree = BkTree::<Word>::new();
    let searcher = ParallelSearcher::with_threads(&tree, 0).expect("failed to build the pool");
    assert_eq!(searcher.num_threads(), default_num_threads());
    let searcher = ParallelSearcher::new(&tree).expect("failed to build the pool");
    assert_eq!(searcher.num_threads(), default_num_threads());
    assert!(std::ptr::eq(searcher.tree(), &tree));
}

#[test]
fn searcher_is_reusable_across_threads() {
    let tree: BkTree<Word> = random_words(18, 500).into_iter().collect();
    let searcher = ParallelSearcher::with_threads(&tree, 2).expect("failed to build the pool");
    let queries = random_words(19, 8);
    thread::scope(|scope| {
        for query in &queries {
            let searcher = &searcher;
            let tree = &tree;
            scope.spawn(move || {
                let outcome = searcher.range_search(query, 2, &CancellationToken::new());
                assert_eq!(
                    sorted(outcome.items().iter().copied()),
                    sorted(tree.range_search(query, 2)),
                );
            });
        }
    });
}
