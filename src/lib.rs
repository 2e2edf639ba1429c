//! hearsay: fast multi-pattern phrase detection over text
//!
//! Compiles a set of case-insensitive byte-string patterns (tens to
//! millions) into an Aho-Corasick automaton once, then enumerates every
//! occurrence in a query text in a single linear pass. Repeated queries for
//! identical text are served from a bounded concurrent result cache.

pub mod automaton;
mod cache;
mod patterns;
mod scanner;

pub use automaton::{build, build_with_limit, Automaton, PatternId, DEFAULT_STATE_LIMIT};
pub use cache::{CacheStats, ResultCache};
pub use patterns::{default_patterns, load_pattern_file, LEGAL_PATTERNS};
pub use scanner::{scan, Match, MATCH_CONFIDENCE};

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Cache capacity used by [`Matcher::new`].
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Errors that can occur while constructing a matcher.
///
/// Construction is fatal-on-failure: a matcher is never produced from a
/// partial build. Scanning and cache operations have no error paths.
#[derive(Debug)]
pub enum HearsayError {
    /// The pattern source was empty after filtering.
    EmptyPatternSet,
    /// The automaton build exceeded its state budget.
    StateLimit { limit: usize },
    /// The pattern file could not be opened or read.
    PatternFile { path: PathBuf, source: io::Error },
}

impl fmt::Display for HearsayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HearsayError::EmptyPatternSet => write!(f, "no patterns after filtering"),
            HearsayError::StateLimit { limit } => {
                write!(f, "automaton exceeded the state budget of {}", limit)
            }
            HearsayError::PatternFile { path, source } => {
                write!(f, "pattern file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for HearsayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HearsayError::PatternFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A match as returned at the engine boundary: the core record plus the
/// exact slice of the query text it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub offset: usize,
    pub length: usize,
    pub pattern_id: PatternId,
    pub confidence: u32,
    /// The query text at `[offset, offset + length)`, original casing.
    pub text: String,
}

/// Shape and size of a compiled automaton.
#[derive(Clone, Copy, Debug)]
pub struct AutomatonStats {
    pub state_count: usize,
    pub pattern_count: usize,
}

/// Combined engine statistics.
#[derive(Clone, Copy, Debug)]
pub struct MatcherStats {
    pub cache: CacheStats,
    pub automaton: AutomatonStats,
}

/// The pattern-matching engine: one compiled automaton plus a result cache.
///
/// `Matcher` is `Send + Sync`. The automaton is immutable after build and
/// shared without synchronization; per-scan state lives on the calling
/// thread, so any number of [`search`](Matcher::search) calls may run
/// concurrently.
pub struct Matcher {
    automaton: Arc<Automaton>,
    /// Accepted patterns, aligned with their ids.
    patterns: Vec<String>,
    cache: ResultCache,
}

impl Matcher {
    /// Build a matcher from a pattern list, with the default cache capacity.
    ///
    /// Empty patterns are dropped; ids are assigned to the remaining
    /// patterns in order.
    pub fn new(patterns: Vec<String>) -> Result<Self, HearsayError> {
        Self::with_cache_capacity(patterns, DEFAULT_CACHE_CAPACITY)
    }

    /// [`Matcher::new`] with an explicit result-cache capacity.
    pub fn with_cache_capacity(
        patterns: Vec<String>,
        cache_capacity: usize,
    ) -> Result<Self, HearsayError> {
        let patterns: Vec<String> = patterns.into_iter().filter(|p| !p.is_empty()).collect();
        if patterns.is_empty() {
            return Err(HearsayError::EmptyPatternSet);
        }
        let automaton = automaton::build(&patterns)?;
        Ok(Self {
            automaton: Arc::new(automaton),
            patterns,
            cache: ResultCache::new(cache_capacity),
        })
    }

    /// Build a matcher from a pattern file (one pattern per line).
    pub fn from_pattern_file(path: &Path) -> Result<Self, HearsayError> {
        Self::new(load_pattern_file(path)?)
    }

    /// Build a matcher over the built-in legal-domain demonstration list.
    pub fn with_default_patterns() -> Result<Self, HearsayError> {
        Self::new(default_patterns())
    }

    /// Cache-aware scan of `text`.
    ///
    /// On a cache hit the previously measured scan duration is returned;
    /// on a miss the text is scanned and the result recorded. The returned
    /// records carry the matched slices of this query text.
    pub fn search(&self, text: &str) -> (Vec<MatchResult>, Duration) {
        let bytes = text.as_bytes();

        if let Some((matches, duration)) = self.cache.get(bytes) {
            return (self.shape(text, &matches), duration);
        }

        let (matches, duration) = scanner::scan(&self.automaton, bytes);
        let shaped = self.shape(text, &matches);
        self.cache.put(bytes, matches, duration);
        (shaped, duration)
    }

    /// Attach the matched text slices to core match records.
    fn shape(&self, text: &str, matches: &[Match]) -> Vec<MatchResult> {
        let bytes = text.as_bytes();
        matches
            .iter()
            .map(|m| MatchResult {
                offset: m.offset,
                length: m.length,
                pattern_id: m.pattern_id,
                confidence: m.confidence,
                text: String::from_utf8_lossy(&bytes[m.offset..m.offset + m.length]).into_owned(),
            })
            .collect()
    }

    /// The pattern text for an id, if the id is in range.
    pub fn pattern_name(&self, id: PatternId) -> Option<&str> {
        self.patterns.get(id as usize).map(String::as_str)
    }

    /// Number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Snapshot of cache and automaton statistics.
    pub fn stats(&self) -> MatcherStats {
        MatcherStats {
            cache: self.cache.stats(),
            automaton: AutomatonStats {
                state_count: self.automaton.state_count(),
                pattern_count: self.automaton.pattern_count(),
            },
        }
    }

    /// Fraction of searches served from the cache.
    pub fn cache_hit_ratio(&self) -> f64 {
        self.cache.hit_ratio()
    }

    /// Drop all cached results and reset cache counters.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
