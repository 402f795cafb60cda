//! Words under Levenshtein distance, shared by the test suites.

use rand::{rngs::StdRng, Rng, SeedableRng};
use crate::{Distance, Metric};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Word(pub(crate) String);
impl Word {
    pub(crate) fn new(word: &str) -> Self {
        Self(word.to_owned())
    }
}
impl Metric for Word {
    fn distance(&self, other: &Self) -> Distance {
        levenshtein(&self.0, &other.0)
    }
}

pub(crate) fn levenshtein(a: &str, b: &str) -> Distance {
    let b: Vec<char> = b.chars().collect();
    // One row of the edit matrix, reused for every character of `a`
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = substitution.min(row[j] + 1).min(above + 1);
            diagonal = above;
        }
    }
    row[b.len()] as Distance
}

pub(crate) fn words(list: &[&str]) -> Vec<Word> {
    list.iter().copied().map(Word::new).collect()
}

/// Short words over a tiny alphabet, so that distances collide a lot and the trees get deep.
pub(crate) fn random_words(seed: u64, count: usize) -> Vec<Word> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=7);
            let word = (0..len)
                .map(|_| char::from(b'a' + rng.gen_range(0..4_u8)))
                .collect();
            Word(word)
        })
        .collect()
}

#[test]
fn levenshtein_sanity() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("cat", ""), 3);
    assert_eq!(levenshtein("cat", "cat"), 0);
    assert_eq!(levenshtein("cat", "cats"), 1);
    assert_eq!(levenshtein("cats", "cast"), 2);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
}
