use std::collections::HashMap;

use wordnet_types::Pos;

/// Run-scoped map from `(offset, pos, lemma)` to the lemma's 0-based sense number.
///
/// Filled while `index.*` files are converted and only read afterwards, when
/// `data.*` lines resolve their words. Lemmas are stored lowercased.
#[derive(Debug, Default)]
pub struct SenseIndex {
    synsets: HashMap<(u32, Pos), HashMap<String, u32>>,
    len: usize,
}

impl SenseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sense` for `lemma` in synset `(offset, pos)`.
    ///
    /// Returns `false` and keeps the existing number if the key is already
    /// present; sense numbers are never reassigned.
    pub fn put(&mut self, offset: u32, pos: Pos, lemma: &str, sense: u32) -> bool {
        let lemmas = self.synsets.entry((offset, pos)).or_default();
        let key = normalize_lemma(lemma);
        if lemmas.contains_key(&key) {
            return false;
        }
        lemmas.insert(key, sense);
        self.len += 1;
        true
    }

    pub fn contains(&self, offset: u32, pos: Pos, lemma: &str) -> bool {
        self.lookup(offset, pos, &normalize_lemma(lemma)).is_some()
    }

    /// Resolve the sense number of `lemma` within synset `(offset, pos)`.
    ///
    /// On a miss, a trailing parenthesized marker such as `(ip)` or `(a)` is
    /// stripped and the lookup retried once.
    pub fn get(&self, offset: u32, pos: Pos, lemma: &str) -> Option<u32> {
        let key = normalize_lemma(lemma);
        self.lookup(offset, pos, &key).or_else(|| {
            strip_marker(&key).and_then(|bare| self.lookup(offset, pos, bare))
        })
    }

    /// Number of `(offset, pos, lemma)` entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn lookup(&self, offset: u32, pos: Pos, key: &str) -> Option<u32> {
        self.synsets.get(&(offset, pos))?.get(key).copied()
    }
}

fn normalize_lemma(text: &str) -> String {
    text.to_lowercase()
}

/// `galore(ip)` -> `galore`; `None` when there is no trailing `(...)`.
fn strip_marker(lemma: &str) -> Option<&str> {
    let open = lemma.strip_suffix(')')?.rfind('(')?;
    Some(&lemma[..open])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_lowercased_and_never_reassigns() {
        let mut idx = SenseIndex::new();
        assert!(idx.put(101742, Pos::Verb, "Run", 0));
        assert!(idx.put(201234, Pos::Verb, "run", 1));
        assert!(!idx.put(101742, Pos::Verb, "RUN", 5));

        assert_eq!(idx.get(101742, Pos::Verb, "run"), Some(0));
        assert_eq!(idx.get(201234, Pos::Verb, "Run"), Some(1));
        assert_eq!(idx.get(101742, Pos::Noun, "run"), None);
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn falls_back_to_lemma_without_marker() {
        let mut idx = SenseIndex::new();
        idx.put(1740, Pos::Adj, "galore", 0);
        assert_eq!(idx.get(1740, Pos::Adj, "galore(ip)"), Some(0));
        assert_eq!(idx.get(1740, Pos::Adj, "Galore(IP)"), Some(0));
        assert_eq!(idx.get(1740, Pos::Adj, "galores(ip)"), None);
        assert!(!idx.contains(1740, Pos::Adj, "galore(ip)"));
    }

    #[test]
    fn exact_key_wins_over_stripped_key() {
        let mut idx = SenseIndex::new();
        idx.put(7, Pos::Noun, "x(y)", 3);
        idx.put(7, Pos::Noun, "x", 1);
        assert_eq!(idx.get(7, Pos::Noun, "x(y)"), Some(3));
    }

    #[test]
    fn strips_only_a_trailing_group() {
        assert_eq!(strip_marker("galore(ip)"), Some("galore"));
        assert_eq!(strip_marker("a(b)c"), None);
        assert_eq!(strip_marker("plain"), None);
        assert_eq!(strip_marker("odd)"), None);
    }
}
