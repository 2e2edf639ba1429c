//! Single-pass scan of a query text against a compiled automaton.

use std::time::{Duration, Instant};

use crate::automaton::{Automaton, PatternId};

/// Constant confidence value carried on every match, preserved for
/// interface compatibility.
pub const MATCH_CONFIDENCE: u32 = 95;

/// One occurrence of a pattern in the query text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Byte position where the pattern begins.
    pub offset: usize,
    /// Byte length of the pattern.
    pub length: usize,
    /// Position of the pattern in the input list.
    pub pattern_id: PatternId,
    /// Always [`MATCH_CONFIDENCE`].
    pub confidence: u32,
}

impl Match {
    /// Byte position just past the end of the occurrence.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Enumerate every occurrence of every pattern in `text`.
///
/// Scanning is total: any byte sequence is accepted and an empty text yields
/// an empty list. Matches come out in non-decreasing order of end position;
/// at a shared end position they follow the terminal state's output-list
/// order, which puts the shorter (suffix) pattern first.
///
/// The per-byte work is amortized O(1); total time is O(text + matches).
pub fn scan(automaton: &Automaton, text: &[u8]) -> (Vec<Match>, Duration) {
    let start = Instant::now();

    let mut matches = Vec::new();
    let mut state: u32 = 0;

    for (i, &byte) in text.iter().enumerate() {
        let byte = byte.to_ascii_lowercase();

        while state != 0 && automaton.goto_step(state, byte) == 0 {
            state = automaton.failure(state);
        }
        state = automaton.goto_step(state, byte);

        for &pattern_id in automaton.outputs(state) {
            let length = automaton.pattern_length(pattern_id);
            matches.push(Match {
                offset: i + 1 - length,
                length,
                pattern_id,
                confidence: MATCH_CONFIDENCE,
            });
        }
    }

    (matches, start.elapsed())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::automaton::build;

    fn triples(matches: &[Match]) -> Vec<(usize, usize, PatternId)> {
        matches
            .iter()
            .map(|m| (m.offset, m.length, m.pattern_id))
            .collect()
    }

    /// Reference implementation: scan the text once per pattern.
    fn naive_scan(patterns: &[String], text: &str) -> Vec<(usize, usize, PatternId)> {
        let text = text.to_ascii_lowercase();
        let text = text.as_bytes();
        let mut found = Vec::new();
        for (id, pattern) in patterns.iter().enumerate() {
            let pattern = pattern.to_ascii_lowercase();
            let pattern = pattern.as_bytes();
            if pattern.is_empty() || pattern.len() > text.len() {
                continue;
            }
            for i in 0..=(text.len() - pattern.len()) {
                if &text[i..i + pattern.len()] == pattern {
                    found.push((i, pattern.len(), id as PatternId));
                }
            }
        }
        found
    }

    #[test]
    fn test_empty_text() {
        let automaton = build(&["he said"]).unwrap();
        let (matches, _) = scan(&automaton, b"");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_text_shorter_than_pattern() {
        let automaton = build(&["he said"]).unwrap();
        let (matches, _) = scan(&automaton, b"he sa");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_pattern_equals_text() {
        let automaton = build(&["he said"]).unwrap();
        let (matches, _) = scan(&automaton, b"he said");
        assert_eq!(triples(&matches), vec![(0, 7, 0)]);
    }

    #[test]
    fn test_overlapping_patterns_all_emitted() {
        // "ab" and "abc" overlap; "bc" is a suffix of "abc".
        let automaton = build(&["ab", "bc", "abc"]).unwrap();
        let (matches, _) = scan(&automaton, b"xabcx");
        assert_eq!(triples(&matches), vec![(1, 2, 0), (2, 2, 1), (1, 3, 2)]);
    }

    #[test]
    fn test_repeated_single_byte_pattern() {
        let automaton = build(&["a"]).unwrap();
        let (matches, _) = scan(&automaton, b"aaaa");
        assert_eq!(
            triples(&matches),
            vec![(0, 1, 0), (1, 1, 0), (2, 1, 0), (3, 1, 0)]
        );
    }

    #[test]
    fn test_suffix_pattern_emitted_before_longer_at_same_end() {
        // Both end at index 11; the shorter "to" is enumerated first.
        let automaton = build(&["according to", "to"]).unwrap();
        let (matches, _) = scan(&automaton, b"According To The Jury");
        assert_eq!(triples(&matches), vec![(10, 2, 1), (0, 12, 0)]);
    }

    #[test]
    fn test_embedded_occurrence_via_failure_chain() {
        // "she said" contains "he said" at offset 1, so the text holds two
        // occurrences of pattern 0 and one of pattern 1.
        let automaton = build(&["he said", "she said"]).unwrap();
        let (matches, _) = scan(&automaton, b"he said she said");
        assert_eq!(
            triples(&matches),
            vec![(0, 7, 0), (9, 7, 0), (8, 8, 1)]
        );
    }

    #[test]
    fn test_self_overlapping_patterns() {
        let automaton = build(&["ab", "aba", "baba"]).unwrap();
        let (matches, _) = scan(&automaton, b"ababa");
        assert_eq!(
            triples(&matches),
            vec![(0, 2, 0), (0, 3, 1), (2, 2, 0), (2, 3, 1), (1, 4, 2)]
        );
    }

    #[test]
    fn test_case_folding() {
        let automaton = build(&["HE SAID"]).unwrap();
        let (matches, _) = scan(&automaton, b"He Said");
        assert_eq!(triples(&matches), vec![(0, 7, 0)]);
    }

    #[test]
    fn test_duplicate_patterns_report_separately() {
        let automaton = build(&["to", "to"]).unwrap();
        let (matches, _) = scan(&automaton, b"to to");
        assert_eq!(
            triples(&matches),
            vec![(0, 2, 0), (0, 2, 1), (3, 2, 0), (3, 2, 1)]
        );
    }

    #[test]
    fn test_non_ascii_bytes_pass_through() {
        let automaton = build(&[&[0xC3u8, 0xA9][..]]).unwrap();
        let (matches, _) = scan(&automaton, &[b'x', 0xC3, 0xA9, b'x']);
        assert_eq!(triples(&matches), vec![(1, 2, 0)]);
    }

    #[test]
    fn test_confidence_is_constant() {
        let automaton = build(&["a"]).unwrap();
        let (matches, _) = scan(&automaton, b"a");
        assert_eq!(matches[0].confidence, MATCH_CONFIDENCE);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let automaton = build(&["he said", "she said", "said"]).unwrap();
        let (first, _) = scan(&automaton, b"she said it, he said");
        let (second, _) = scan(&automaton, b"she said it, he said");
        assert_eq!(first, second);
    }

    proptest! {
        /// The multiset of matches equals a per-pattern naive scan.
        #[test]
        fn prop_scan_equals_naive_reference(
            patterns in proptest::collection::vec("[abAB]{1,4}", 1..8),
            text in "[abAB]{0,40}",
        ) {
            let automaton = build(&patterns).unwrap();
            let (matches, _) = scan(&automaton, text.as_bytes());

            let mut got = triples(&matches);
            let mut expected = naive_scan(&patterns, &text);
            got.sort_unstable();
            expected.sort_unstable();
            prop_assert_eq!(got, expected);
        }

        /// Matches come out ordered by end position.
        #[test]
        fn prop_end_positions_non_decreasing(
            patterns in proptest::collection::vec("[abcABC]{1,5}", 1..10),
            text in "[abcABC]{0,60}",
        ) {
            let automaton = build(&patterns).unwrap();
            let (matches, _) = scan(&automaton, text.as_bytes());
            let ends: Vec<usize> = matches.iter().map(Match::end).collect();
            prop_assert!(ends.windows(2).all(|w| w[0] <= w[1]));
        }

        /// Every emitted match is a real occurrence of its pattern.
        #[test]
        fn prop_soundness(
            patterns in proptest::collection::vec("[abAB]{1,4}", 1..8),
            text in "[abAB]{0,40}",
        ) {
            let automaton = build(&patterns).unwrap();
            let (matches, _) = scan(&automaton, text.as_bytes());
            let folded = text.to_ascii_lowercase();
            for m in &matches {
                let pattern = patterns[m.pattern_id as usize].to_ascii_lowercase();
                prop_assert_eq!(&folded[m.offset..m.end()], pattern.as_str());
            }
        }
    }
}
