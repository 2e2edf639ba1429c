//! Synthetic pattern-file generator for large-scale runs.
//!
//! Combines base phrases with qualifier prefixes, situational suffixes and
//! subject-verb-object clauses until the requested count is reached, then
//! falls back to numbered variants. Output is a plain pattern file the
//! `hearsay` CLI accepts via `--patterns`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rustc_hash::FxHashSet;

/// Generate a synthetic pattern file
#[derive(Parser)]
#[command(name = "gen-patterns")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of patterns to generate
    count: usize,

    /// Output file (default: patterns_<count>.txt)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

const BASE_PHRASES: [&str; 20] = [
    "he said",
    "she said",
    "he told",
    "she told",
    "i heard",
    "they said",
    "someone said",
    "according to",
    "reportedly",
    "allegedly",
    "sources say",
    "witnesses claim",
    "testimony indicates",
    "plaintiff claims",
    "defendant stated",
    "witness testified",
    "court records show",
    "evidence suggests",
    "attorney argued",
    "counsel stated",
];

const PREFIXES: [&str; 21] = [
    "",
    "apparently ",
    "clearly ",
    "obviously ",
    "supposedly ",
    "allegedly ",
    "reportedly ",
    "presumably ",
    "evidently ",
    "seemingly ",
    "ostensibly ",
    "purportedly ",
    "conceivably ",
    "potentially ",
    "possibly ",
    "probably ",
    "likely ",
    "certainly ",
    "definitely ",
    "undoubtedly ",
    "surely ",
];

const SUFFIXES: [&str; 23] = [
    "",
    " that",
    " yesterday",
    " today",
    " recently",
    " earlier",
    " before",
    " during the meeting",
    " in court",
    " under oath",
    " in the deposition",
    " to the jury",
    " to the judge",
    " to counsel",
    " to the witness",
    " in the record",
    " on the stand",
    " in testimony",
    " in evidence",
    " in the filing",
    " in the brief",
    " in the motion",
    " in the pleading",
];

const SUBJECTS: [&str; 24] = [
    "the defendant",
    "the plaintiff",
    "the witness",
    "the attorney",
    "the judge",
    "the jury",
    "the expert",
    "the doctor",
    "the officer",
    "the investigator",
    "the client",
    "the victim",
    "the suspect",
    "the accused",
    "the complainant",
    "the respondent",
    "the petitioner",
    "the appellant",
    "the appellee",
    "the party",
    "the individual",
    "the person",
    "the entity",
    "the corporation",
];

const VERBS: [&str; 23] = [
    "was", "were", "had", "did", "would", "could", "should", "might", "may", "will", "shall",
    "must", "can", "cannot", "won't", "wouldn't", "couldn't", "shouldn't", "didn't", "hadn't",
    "hasn't", "haven't", "isn't",
];

const OBJECTS: [&str; 22] = [
    "guilty",
    "innocent",
    "liable",
    "responsible",
    "negligent",
    "fraudulent",
    "compliant",
    "non-compliant",
    "present",
    "absent",
    "aware",
    "unaware",
    "informed",
    "uninformed",
    "cooperative",
    "uncooperative",
    "truthful",
    "dishonest",
    "credible",
    "incredible",
    "reliable",
    "unreliable",
];

/// Collapse runs of spaces and trim the ends.
fn clean(pattern: &str) -> String {
    let mut cleaned = String::with_capacity(pattern.len());
    let mut last_was_space = false;
    for c in pattern.chars() {
        if c == ' ' {
            if !last_was_space {
                cleaned.push(' ');
            }
            last_was_space = true;
        } else {
            cleaned.push(c);
            last_was_space = false;
        }
    }
    cleaned.trim_matches(' ').to_string()
}

struct Emitter<W: Write> {
    out: W,
    seen: FxHashSet<String>,
    target: usize,
}

impl<W: Write> Emitter<W> {
    fn done(&self) -> bool {
        self.seen.len() >= self.target
    }

    fn emit(&mut self, pattern: String) -> anyhow::Result<()> {
        if self.done() || self.seen.contains(&pattern) {
            return Ok(());
        }
        writeln!(self.out, "{}", pattern)?;
        self.seen.insert(pattern);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("patterns_{}.txt", cli.count)));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# generated phrase patterns")?;
    writeln!(out, "# total patterns: {}", cli.count)?;
    writeln!(out)?;

    let mut emitter = Emitter {
        out,
        seen: FxHashSet::default(),
        target: cli.count,
    };

    'combos: for base in BASE_PHRASES {
        for prefix in PREFIXES {
            for suffix in SUFFIXES {
                if emitter.done() {
                    break 'combos;
                }

                let simple = clean(&format!("{}{}{}", prefix, base, suffix));
                if simple.len() > 3 {
                    emitter.emit(simple)?;
                }

                for subject in SUBJECTS {
                    for verb in VERBS {
                        for object in OBJECTS {
                            if emitter.done() {
                                break 'combos;
                            }
                            let clause = clean(&format!(
                                "{}{} that {} {} {}",
                                prefix, base, subject, verb, object
                            ));
                            if clause.len() > 10 {
                                emitter.emit(clause)?;
                            }
                        }
                    }
                }
            }
        }
    }

    // Numbered variants cover any remainder.
    let mut counter = 0usize;
    while !emitter.done() {
        for base in BASE_PHRASES {
            if emitter.done() {
                break;
            }
            emitter.emit(format!("{} {}", base, counter))?;
        }
        counter += 1;
    }

    emitter.out.flush()?;
    println!(
        "generated {} unique patterns in {}",
        emitter.seen.len(),
        path.display()
    );
    Ok(())
}
