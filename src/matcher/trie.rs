//! Character trie for multi-term substring search

use std::collections::HashMap;

/// Root node index
const ROOT: usize = 0;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, usize>,
    /// A dictionary term ends at this node
    terminal: bool,
}

/// Immutable character trie built once from a word list.
///
/// Nodes live in a flat arena and reference children by index. Every
/// root-to-terminal path spells exactly one inserted term.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<Node>,
    terms: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default()],
            terms: 0,
        }
    }
}

impl Trie {
    /// Build a trie from a word list. Empty words are skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::default();
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let mut node = ROOT;
        for ch in word.chars() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(ch, next);
                    next
                }
            };
        }

        if !self.nodes[node].terminal {
            self.nodes[node].terminal = true;
            self.terms += 1;
        }
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms == 0
    }

    /// First match scanning start offsets left to right.
    ///
    /// At a given offset the walk reports the first terminal it reaches,
    /// which is the shortest term starting there.
    pub fn find_first<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.char_indices()
            .find_map(|(start, _)| self.walk(text, start).next().map(|end| &text[start..end]))
    }

    /// Every match, including overlapping and nested ones, in order of
    /// start offset then length. Duplicates are kept.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.char_indices()
            .flat_map(|(start, _)| self.walk(text, start).map(move |end| &text[start..end]))
            .collect()
    }

    /// Whether any term occurs in `text`
    pub fn contains_match(&self, text: &str) -> bool {
        self.find_first(text).is_some()
    }

    fn walk<'a>(&'a self, text: &'a str, start: usize) -> Walk<'a> {
        Walk {
            trie: self,
            chars: text[start..].char_indices(),
            start,
            node: Some(ROOT),
        }
    }
}

/// Walk down the trie from one start offset, yielding the end byte offset
/// of every terminal node passed.
struct Walk<'a> {
    trie: &'a Trie,
    chars: std::str::CharIndices<'a>,
    start: usize,
    /// `None` once the walk has left the trie
    node: Option<usize>,
}

impl Iterator for Walk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let node = self.node?;
            let Some((offset, ch)) = self.chars.next() else {
                self.node = None;
                return None;
            };

            match self.trie.nodes[node].children.get(&ch) {
                Some(&next) => {
                    self.node = Some(next);
                    if self.trie.nodes[next].terminal {
                        return Some(self.start + offset + ch.len_utf8());
                    }
                }
                None => {
                    self.node = None;
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_chinese() {
        let trie = Trie::from_words(["敏感词", "违禁"]);
        assert_eq!(trie.find_first("这是敏感词测试"), Some("敏感词"));
        assert_eq!(trie.find_first("没有问题"), None);
    }

    #[test]
    fn test_every_term_matches_itself() {
        // Prefix-free list: no term is reached through another term's mark
        let words = ["abc", "赌博", "毒品交易", "xyz"];
        let trie = Trie::from_words(words);
        for word in words {
            assert_eq!(trie.find_first(word), Some(word));
        }
    }

    #[test]
    fn test_prefix_term_shadows_longer_term() {
        let trie = Trie::from_words(["a", "abc"]);
        assert_eq!(trie.find_first("abc"), Some("a"));
        assert_eq!(trie.find_all("abc"), vec!["a", "abc"]);
    }

    #[test]
    fn test_find_first_reports_shortest_at_earliest_offset() {
        let trie = Trie::from_words(["abcd", "ab", "bc"]);
        // "ab" at offset 0 is reached before "abcd"; "bc" starts later
        assert_eq!(trie.find_first("xabcd"), Some("ab"));
    }

    #[test]
    fn test_find_first_prefers_earliest_offset() {
        let trie = Trie::from_words(["cd", "b"]);
        assert_eq!(trie.find_first("abcd"), Some("b"));
    }

    #[test]
    fn test_find_all_overlapping_and_nested() {
        let trie = Trie::from_words(["ab", "abc", "bc"]);
        assert_eq!(trie.find_all("abc"), vec!["ab", "abc", "bc"]);
    }

    #[test]
    fn test_find_all_keeps_duplicates() {
        let trie = Trie::from_words(["赌"]);
        assert_eq!(trie.find_all("赌一赌"), vec!["赌", "赌"]);
    }

    #[test]
    fn test_empty_text_and_empty_trie() {
        let trie = Trie::from_words(["word"]);
        assert_eq!(trie.find_first(""), None);
        assert!(trie.find_all("").is_empty());

        let empty = Trie::from_words(Vec::<String>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.find_first("anything"), None);
    }

    #[test]
    fn test_duplicate_and_blank_words() {
        let trie = Trie::from_words(["dup", "dup", ""]);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_dead_end_prefix_does_not_match() {
        let trie = Trie::from_words(["hello"]);
        assert!(trie.contains_match("help hell hello!"));
        assert!(!trie.contains_match("help hell"));
    }

    #[test]
    fn test_mixed_width_offsets() {
        let trie = Trie::from_words(["词b"]);
        assert_eq!(trie.find_all("a词b词b"), vec!["词b", "词b"]);
    }
}
