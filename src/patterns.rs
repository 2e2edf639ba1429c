//! Pattern sources: the built-in demonstration list and file loading.
//!
//! Pattern files hold one pattern per line. Lines whose first non-blank
//! character is `#` are comments; blank lines are skipped; leading and
//! trailing spaces and tabs are trimmed. Patterns keep file order and are
//! assigned sequential ids starting at zero.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::HearsayError;

/// Built-in legal-domain phrases, used when no pattern file is given.
pub const LEGAL_PATTERNS: [&str; 20] = [
    "he said",
    "she said",
    "she told",
    "he told",
    "i heard",
    "according to",
    "reportedly",
    "allegedly",
    "it was reported",
    "sources say",
    "witnesses claim",
    "testimony indicates",
    "didn't you say",
    "you mentioned",
    "as stated by",
    "witness testified",
    "plaintiff claims",
    "defendant stated",
    "court records show",
    "evidence suggests",
];

/// The built-in list as owned strings.
pub fn default_patterns() -> Vec<String> {
    LEGAL_PATTERNS.iter().map(|p| (*p).to_string()).collect()
}

/// Load patterns from a UTF-8 text file, one per line.
pub fn load_pattern_file(path: &Path) -> Result<Vec<String>, HearsayError> {
    let file = File::open(path).map_err(|source| HearsayError::PatternFile {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut patterns = Vec::new();
    let mut line_count = 0usize;
    for line in reader.lines() {
        let line = line.map_err(|source| HearsayError::PatternFile {
            path: path.to_path_buf(),
            source,
        })?;
        line_count += 1;
        if line_count % 100_000 == 0 {
            debug!("reading {}: {} lines so far", path.display(), line_count);
        }

        let trimmed = line.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r');
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        patterns.push(trimmed.to_string());
    }

    info!("loaded {} patterns from {}", patterns.len(), path.display());
    Ok(patterns)
}
