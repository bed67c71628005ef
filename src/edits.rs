use std::collections::HashSet;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Split points beyond this prefix length are not considered.
pub(crate) const MAX_SPLIT: usize = 20;

/// Every string one deletion, transposition, replacement or insertion away
/// from `word`.
///
/// `word` is expected to be lowercase ASCII.
pub fn edits1(word: &str) -> HashSet<String> {
    candidates(word).collect()
}

/// `word` plus every string reachable in at most `distance` rounds of
/// [`edits1`]. The result grows roughly by a factor of `54 * len` per round.
pub fn edits_n(word: &str, distance: usize) -> HashSet<String> {
    let mut seen = HashSet::new();
    seen.insert(word.to_owned());

    let mut frontier = vec![word.to_owned()];
    for _ in 0..distance {
        let mut next = Vec::new();
        for edited in frontier.iter().flat_map(|w| candidates(w)) {
            if !seen.contains(&edited) {
                seen.insert(edited.clone());
                next.push(edited);
            }
        }
        frontier = next;
    }

    seen
}

/// One-edit candidates in generation order, duplicates included.
fn candidates(word: &str) -> impl Iterator<Item = String> + '_ {
    let limit = word.len().min(MAX_SPLIT);
    let splits = (0..=limit).map(move |i| word.split_at(i));

    let deletes = splits
        .clone()
        .filter(|(_, right)| !right.is_empty())
        .map(|(left, right)| [left, &right[1..]].concat());

    let transposes = splits
        .clone()
        .filter(|(_, right)| right.len() > 1)
        .map(|(left, right)| [left, &right[1..2], &right[0..1], &right[2..]].concat());

    let replaces = splits
        .clone()
        .filter(|(_, right)| !right.is_empty())
        .flat_map(|(left, right)| {
            ALPHABET
                .iter()
                .map(move |&c| [left, char_str(c), &right[1..]].concat())
        });

    let inserts = splits.flat_map(|(left, right)| {
        ALPHABET
            .iter()
            .map(move |&c| [left, char_str(c), right].concat())
    });

    deletes.chain(transposes).chain(replaces).chain(inserts)
}

fn char_str(c: u8) -> &'static str {
    let index = (c - b'a') as usize;
    &"abcdefghijklmnopqrstuvwxyz"[index..index + 1]
}
