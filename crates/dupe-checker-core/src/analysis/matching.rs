use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Paired duplicate/original positions, in the order duplicates were found.
///
/// `duplicates[k]` is a position in the list that was scanned for repeats and
/// `originals[k]` is the position of the file it repeats. Both vectors always
/// have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMatches {
    pub duplicates: Vec<usize>,
    pub originals: Vec<usize>,
}

impl IndexMatches {
    fn push(&mut self, duplicate: usize, original: usize) {
        self.duplicates.push(duplicate);
        self.originals.push(original);
    }

    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// `(duplicate, original)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.duplicates
            .iter()
            .copied()
            .zip(self.originals.iter().copied())
    }
}

/// Find entries that repeat an earlier entry of the same list.
///
/// The first occurrence of a fingerprint is the original for every later
/// occurrence. Indices in `ignore` are neither reported nor registered as
/// originals.
pub fn find_self_duplicates<T: Eq + Hash>(
    fingerprints: &[T],
    ignore: &HashSet<usize>,
) -> IndexMatches {
    let mut matches = IndexMatches::default();
    let mut first_seen: HashMap<&T, usize> = HashMap::new();

    for (i, fingerprint) in fingerprints.iter().enumerate() {
        if ignore.contains(&i) {
            continue;
        }
        match first_seen.get(fingerprint) {
            Some(&original) => matches.push(i, original),
            None => {
                first_seen.insert(fingerprint, i);
            }
        }
    }

    matches
}

/// Find entries of `secondary` whose fingerprint occurs anywhere in `main`.
///
/// The original is always the lowest index of that fingerprint in `main`.
/// Indices in `ignore` refer to `secondary`.
pub fn find_cross_duplicates<T: Eq + Hash>(
    main: &[T],
    secondary: &[T],
    ignore: &HashSet<usize>,
) -> IndexMatches {
    let mut first_in_main: HashMap<&T, usize> = HashMap::with_capacity(main.len());
    for (i, fingerprint) in main.iter().enumerate() {
        first_in_main.entry(fingerprint).or_insert(i);
    }

    let mut matches = IndexMatches::default();
    for (i, fingerprint) in secondary.iter().enumerate() {
        if ignore.contains(&i) {
            continue;
        }
        if let Some(&original) = first_in_main.get(fingerprint) {
            matches.push(i, original);
        }
    }

    matches
}
