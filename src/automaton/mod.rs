//! Aho-Corasick automaton: construction and the compiled representation.
//!
//! The automaton recognizes occurrences of any of a set of byte-string
//! patterns in a single left-to-right pass. The key components are:
//!
//! - `state`: the dense state arena and the immutable `Automaton`
//! - `builder`: trie construction, failure-link BFS, output propagation
//!
//! Once built the automaton is deeply immutable and safe to share across
//! threads without synchronization; see [`crate::scan`] for the query side.

mod builder;
mod state;

pub use builder::{build, build_with_limit, DEFAULT_STATE_LIMIT};
pub use state::{Automaton, PatternId, ALPHABET_SIZE};
