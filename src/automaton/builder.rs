//! Automaton construction: trie, failure links, output propagation.
//!
//! Construction runs in three passes over the pattern set:
//!
//! 1. Trie: walk/create goto edges for each ASCII-folded pattern and record
//!    the pattern id at its terminal state.
//! 2. Failure links: breadth-first from the depth-1 states, each link set to
//!    the longest proper suffix of the state's prefix that is itself a
//!    prefix of some pattern.
//! 3. Output propagation: in the same BFS order, each state's output list is
//!    extended with its failure target's (already propagated) list, so the
//!    scan never walks failure links to collect outputs.

use std::collections::VecDeque;
use std::time::Instant;

use log::info;

use super::state::{Automaton, PatternId, State, ALPHABET_SIZE};
use crate::HearsayError;

/// Default cap on the number of states a build may allocate.
pub const DEFAULT_STATE_LIMIT: usize = 1 << 20;

/// Compile a pattern list into an immutable [`Automaton`].
///
/// Patterns are ASCII case-folded; bytes >= 128 participate as raw bytes.
/// Empty patterns are skipped and not assigned an id, so ids are the
/// zero-based positions among the non-empty patterns. Duplicate patterns
/// each keep their own id and are reported separately.
///
/// Fails with [`HearsayError::EmptyPatternSet`] when nothing remains after
/// skipping, and with [`HearsayError::StateLimit`] when the state budget is
/// exhausted; a partial automaton is never returned.
pub fn build<P: AsRef<[u8]>>(patterns: &[P]) -> Result<Automaton, HearsayError> {
    build_with_limit(patterns, DEFAULT_STATE_LIMIT)
}

/// [`build`] with an explicit state budget.
pub fn build_with_limit<P: AsRef<[u8]>>(
    patterns: &[P],
    state_limit: usize,
) -> Result<Automaton, HearsayError> {
    let start = Instant::now();
    let state_limit = state_limit.min(u32::MAX as usize);

    let mut states = vec![State::new()];
    let mut pattern_lengths: Vec<u32> = Vec::new();

    // Pass 1: trie over the folded patterns.
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            continue;
        }

        let mut state = 0usize;
        for &byte in pattern {
            let byte = byte.to_ascii_lowercase() as usize;
            let next = states[state].next[byte];
            if next == 0 {
                if states.len() >= state_limit {
                    return Err(HearsayError::StateLimit { limit: state_limit });
                }
                states.push(State::new());
                let created = (states.len() - 1) as u32;
                states[state].next[byte] = created;
                state = created as usize;
            } else {
                state = next as usize;
            }
        }

        let id = pattern_lengths.len() as PatternId;
        states[state].outputs.push(id);
        pattern_lengths.push(pattern.len() as u32);
    }

    if pattern_lengths.is_empty() {
        return Err(HearsayError::EmptyPatternSet);
    }

    // Pass 2 and 3: failure links and output propagation, breadth-first.
    let mut queue: VecDeque<u32> = VecDeque::with_capacity(states.len());
    for byte in 0..ALPHABET_SIZE {
        let child = states[0].next[byte];
        if child != 0 {
            states[child as usize].failure = 0;
            queue.push_back(child);
        }
    }

    while let Some(r) = queue.pop_front() {
        for byte in 0..ALPHABET_SIZE {
            let u = states[r as usize].next[byte];
            if u == 0 {
                continue;
            }
            queue.push_back(u);

            let mut probe = states[r as usize].failure;
            while probe != 0 && states[probe as usize].next[byte] == 0 {
                probe = states[probe as usize].failure;
            }
            let fail = states[probe as usize].next[byte];
            states[u as usize].failure = fail;

            // Inherited outputs come first: at a shared end position the
            // shorter (suffix) pattern is enumerated before the longer one.
            if !states[fail as usize].outputs.is_empty() {
                let mut merged = states[fail as usize].outputs.clone();
                let own = std::mem::take(&mut states[u as usize].outputs);
                for id in own {
                    if !merged.contains(&id) {
                        merged.push(id);
                    }
                }
                states[u as usize].outputs = merged;
            }
        }
    }

    info!(
        "automaton built: {} states, {} patterns, {:?}",
        states.len(),
        pattern_lengths.len(),
        start.elapsed()
    );

    Ok(Automaton {
        states,
        pattern_lengths,
    })
}
