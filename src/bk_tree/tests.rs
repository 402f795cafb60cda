use super::*;
use std::collections::BTreeSet;
use crate::test_words::{levenshtein, random_words, words, Word};

fn tree_of(items: &[Word]) -> BkTree<Word> {
    items.iter().cloned().collect()
}
fn sorted<'a>(found: impl IntoIterator<Item = &'a Word>) -> Vec<&'a str> {
    let mut found: Vec<&str> = found.into_iter().map(|word| word.0.as_str()).collect();
    found.sort_unstable();
    found
}
fn brute_force<'a>(items: &'a [Word], query: &Word, radius: Distance) -> Vec<&'a str> {
    sorted(items.iter().filter(|&item| item.distance(query) <= radius))
}

#[test]
fn basic() {
    let tree = tree_of(&words(&["cat", "cats", "bat", "hat", "cast"]));
    assert_eq!(tree.len(), 5);

    // "cast" is a single insertion away from "cat", even though it sits three edges deep
    let found = tree.range_search(&Word::new("cat"), 1);
    // Breadth-first discovery order, children in ascending attach distance
    assert_eq!(
        found.iter().map(|word| word.0.as_str()).collect::<Vec<_>>(),
        ["cat", "cats", "bat", "hat", "cast"],
    );
    assert_eq!(
        sorted(tree.range_search(&Word::new("cat"), 0)),
        ["cat"],
    );
    assert_eq!(
        sorted(tree.range_search(&Word::new("bat"), 1)),
        ["bat", "cat", "hat"],
    );
}

#[test]
fn layout() {
    let tree = tree_of(&words(&["cat", "cats", "bat", "hat", "cast"]));
    let root = tree.root().expect("the tree is not empty");
    assert_eq!(root.item(), &Word::new("cat"));
    assert!(root.is_root());
    assert_eq!(root.attach_distance(), None);

    let cats = root.child(1).expect("cats hangs off cat at distance 1");
    assert_eq!(cats.item(), &Word::new("cats"));
    assert_eq!(root.num_children(), 1);

    let bat = cats.child(2).expect("bat hangs off cats at distance 2");
    assert_eq!(bat.item(), &Word::new("bat"));
    assert_eq!(bat.depth(), 2);

    let children: Vec<_> = bat
        .children()
        .map(|child| (child.attach_distance(), child.item().0.as_str()))
        .collect();
    assert_eq!(children, [(Some(1), "hat"), (Some(2), "cast")]);
    assert!(bat.children().all(|child| child.is_leaf()));
    assert_eq!(tree.height(), 4);
}

#[test]
fn empty_tree() {
    let tree = BkTree::<Word>::new();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert!(tree.root().is_none());
    assert!(tree.range_search(&Word::new("anything"), 0).is_empty());
    assert!(tree.range_search(&Word::new("anything"), i64::MAX).is_empty());
    assert!(!tree.contains(&Word::new("anything")));
}

#[test]
fn negative_radius() {
    let tree = tree_of(&words(&["cat", "cats", "bat"]));
    assert!(tree.range_search(&Word::new("cat"), -1).is_empty());
    assert!(tree.range_search(&Word::new("cat"), i64::MIN).is_empty());
}

#[test]
fn huge_radius_matches_everything() {
    let items = random_words(1, 200);
    let tree = tree_of(&items);
    let found = tree.range_search(&Word::new("abc"), i64::MAX);
    assert_eq!(found.len(), items.len());
}

#[test]
fn every_item_finds_itself() {
    let items = random_words(2, 500);
    let tree = tree_of(&items);
    for item in &items {
        assert!(tree.range_search(item, 0).contains(&item));
        assert!(tree.contains(item));
    }
    assert!(!tree.contains(&Word::new("zzz")));
}

#[test]
fn matches_linear_scan() {
    let items = random_words(3, 400);
    let tree = tree_of(&items);
    for query in random_words(4, 40) {
        for radius in 0..4 {
            assert_eq!(
                sorted(tree.range_search(&query, i64::from(radius))),
                brute_force(&items, &query, radius),
                "query {:?}, radius {}",
                query,
                radius,
            );
        }
    }
}

#[test]
fn monotonic_in_radius() {
    let items = random_words(5, 300);
    let tree = tree_of(&items);
    for query in random_words(6, 20) {
        let mut previous = BTreeSet::new();
        for radius in 0..6 {
            let current: BTreeSet<_> = tree.range_search(&query, radius).into_iter().collect();
            assert!(previous.is_subset(&current), "radius {} lost matches", radius);
            previous = current;
        }
    }
}

#[test]
fn distances_are_reported() {
    let items = random_words(7, 200);
    let tree = tree_of(&items);
    let query = Word::new("abca");
    for (distance, item) in tree.range_search_with_distances(&query, 2) {
        assert!(distance <= 2);
        assert_eq!(distance, levenshtein(&item.0, &query.0));
    }
}

#[test]
fn same_insertions_same_tree() {
    let items = random_words(8, 300);
    let first = tree_of(&items);
    let second = tree_of(&items);
    assert_eq!(first, second);

    // Shuffling the input changes the layout, but never the answers
    let mut reversed = items.clone();
    reversed.reverse();
    let third = tree_of(&reversed);
    let query = Word::new("bad");
    assert_eq!(
        sorted(first.range_search(&query, 2)),
        sorted(third.range_search(&query, 2)),
    );
}

#[test]
fn attach_distances_hold() {
    let items = random_words(9, 300);
    let tree = tree_of(&items);
    let mut seen = 0;
    for key in 0..tree.len() {
        let node = tree.node(key).expect("keys are dense");
        seen += 1;
        match node.parent() {
            Some(parent) => assert_eq!(
                node.attach_distance(),
                Some(parent.item().distance(node.item())),
            ),
            None => assert_eq!(key, 0),
        }
        // Siblings are unique and sorted by attach distance
        let distances: Vec<_> = node.child_keys().map(|(distance, _)| distance).collect();
        assert!(distances.windows(2).all(|pair| pair[0] < pair[1]));
    }
    assert_eq!(seen, items.len());
    assert!(tree.node(tree.len()).is_none());
}

#[test]
fn duplicates_are_kept() {
    let tree = tree_of(&words(&["same", "same", "same"]));
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.range_search(&Word::new("same"), 0).len(), 3);
    assert_eq!(tree.height(), 3);
}

#[test]
fn iteration_follows_insertion_order() {
    let items = words(&["delta", "alpha", "charlie", "bravo"]);
    let tree = tree_of(&items);
    assert_eq!(tree.iter().len(), 4);
    assert!(tree.iter().eq(items.iter()));
    assert!((&tree).into_iter().eq(items.iter()));
}

#[test]
fn fixed_capacity() {
    let mut tree = ArrayBkTree::<Word, 3>::new();
    assert_eq!(tree.capacity(), 3);
    for word in words(&["cat", "cats", "bat"]) {
        assert!(tree.try_insert(word).is_ok());
    }
    let rejected = tree.try_insert(Word::new("hat")).expect_err("the storage is full");
    assert_eq!(rejected.into_inner(), Word::new("hat"));
    // The failed insertion left the tree untouched
    assert_eq!(tree.len(), 3);
    assert_eq!(
        sorted(tree.range_search(&Word::new("cat"), 1)),
        ["bat", "cat", "cats"],
    );
}

#[test]
#[should_panic(expected = "storage is full")]
fn insert_into_full_storage_panics() {
    let mut tree = ArrayBkTree::<Word, 1>::new();
    tree.insert(Word::new("one"));
    tree.insert(Word::new("two"));
}

#[test]
fn vecdeque_storage() {
    use std::collections::VecDeque;
    let items = random_words(10, 100);
    let mut tree = BkTree::<Word, VecDeque<Node<Word>>>::with_capacity(100);
    tree.extend(items.iter().cloned());
    let query = Word::new("abc");
    assert_eq!(
        sorted(tree.range_search(&query, 1)),
        brute_force(&items, &query, 1),
    );
}

#[test]
fn boxed_items_in_vec_tree() {
    let mut tree = VecBkTree::<Box<Word>>::new();
    tree.extend(words(&["cat", "cats", "bat"]).into_iter().map(Box::new));
    let found: Vec<&str> = tree
        .range_search(&Box::new(Word::new("cast")), 2)
        .into_iter()
        .map(|word| word.0.as_str())
        .collect();
    assert_eq!(found, ["cat", "cats", "bat"]);
}
