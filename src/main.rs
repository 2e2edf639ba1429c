//! `hearsay` CLI: interactive phrase detection, canned tests, benchmark.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use hearsay::{MatchResult, Matcher};

/// Multi-pattern phrase detection with microsecond scans
#[derive(Parser)]
#[command(name = "hearsay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load patterns from a file (one per line, `#` starts a comment)
    #[arg(short, long, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Run a fixed-workload benchmark
    #[arg(short, long)]
    benchmark: bool,

    /// Run the canned test scenarios
    #[arg(short, long)]
    test: bool,
}

const BENCHMARK_TEXTS: [&str; 15] = [
    "he said the defendant was guilty",
    "according to the witness testimony, the case was clear",
    "she told me that it happened yesterday during the meeting",
    "the contract was signed without any issues whatsoever",
    "reportedly there were serious problems with the case",
    "i heard from multiple sources about this incident",
    "this is clean legal text with no hearsay indicators",
    "witnesses claim that the events unfolded differently",
    "testimony indicates a pattern of misconduct over time",
    "didn't you say something different during your deposition",
    "plaintiff claims damages in excess of one million dollars",
    "defendant stated under oath that the allegations were false",
    "court records show a pattern of similar complaints",
    "evidence suggests that the incident occurred as described",
    "witness testified that they saw the defendant at the scene",
];

const TEST_TEXTS: [&str; 6] = [
    "he said the defendant was guilty",
    "according to witnesses, the meeting was productive",
    "clean legal text with no hearsay",
    "she told me about the contract terms",
    "plaintiff claims damages in the amount of fifty thousand dollars",
    "witness testified that the events occurred as described",
];

const BENCHMARK_ITERATIONS: usize = 10_000;

/// Running tallies for one session.
#[derive(Default)]
struct SessionTotals {
    searches: u64,
    matches: u64,
    elapsed: Duration,
}

impl SessionTotals {
    fn record(&mut self, results: &[MatchResult], duration: Duration) {
        self.searches += 1;
        self.matches += results.len() as u64;
        self.elapsed += duration;
    }

    fn reset(&mut self) {
        *self = SessionTotals::default();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let matcher = match &cli.patterns {
        Some(path) => Matcher::from_pattern_file(path)
            .with_context(|| format!("loading patterns from {}", path.display()))?,
        None => Matcher::with_default_patterns().context("building default pattern set")?,
    };

    let stats = matcher.stats();
    println!(
        "matcher ready: {} patterns, {} automaton states",
        stats.automaton.pattern_count, stats.automaton.state_count
    );

    if cli.benchmark {
        run_benchmark(&matcher);
        return Ok(());
    }
    if cli.test {
        run_tests(&matcher);
        return Ok(());
    }

    run_interactive(&matcher)
}

fn run_interactive(matcher: &Matcher) -> anyhow::Result<()> {
    println!("interactive mode: type text and press Enter");
    println!("commands: stats, clear, help, quit");
    println!();

    let stdin = io::stdin();
    let mut totals = SessionTotals::default();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "stats" | "s" => {
                print_stats(matcher, &totals);
                continue;
            }
            "clear" | "c" => {
                matcher.clear_cache();
                totals.reset();
                println!("cache and session stats cleared");
                continue;
            }
            "help" | "h" => {
                println!("  stats/s  show performance statistics");
                println!("  clear/c  clear cache and reset stats");
                println!("  quit/q   exit");
                continue;
            }
            _ => {}
        }

        let (results, duration) = matcher.search(input);
        totals.record(&results, duration);
        print_results(input, &results, duration);

        let ratio = matcher.cache_hit_ratio();
        println!(
            "searches: {} | matches: {} | cache: {:.0}% hit",
            totals.searches,
            totals.matches,
            ratio * 100.0
        );
        println!();
    }

    Ok(())
}

fn print_results(text: &str, results: &[MatchResult], duration: Duration) {
    if results.is_empty() {
        println!("no matches ({:?})", duration);
        return;
    }

    println!("{} matches ({:?}):", results.len(), duration);
    for result in results {
        println!(
            "  \"{}\" at {}-{} (pattern {}, confidence {}%)",
            result.text,
            result.offset,
            result.offset + result.length - 1,
            result.pattern_id,
            result.confidence
        );

        let context_start = result.offset.saturating_sub(10);
        let context_end = (result.offset + result.length + 10).min(text.len());
        let context = &text.as_bytes()[context_start..context_end];
        println!("    context: ...{}...", String::from_utf8_lossy(context));
    }
}

fn print_stats(matcher: &Matcher, totals: &SessionTotals) {
    let stats = matcher.stats();

    println!("session:");
    println!("  searches: {}", totals.searches);
    println!("  matches: {}", totals.matches);
    println!("  total time: {:?}", totals.elapsed);
    if totals.searches > 0 {
        println!(
            "  avg time/search: {:?}",
            totals.elapsed / totals.searches as u32
        );
    }

    println!("cache:");
    println!("  hits: {}", stats.cache.hits);
    println!("  misses: {}", stats.cache.misses);
    println!("  evictions: {}", stats.cache.evictions);
    println!("  entries: {}", stats.cache.total_entries);
    println!("  hit ratio: {:.1}%", matcher.cache_hit_ratio() * 100.0);

    println!("automaton:");
    println!("  states: {}", stats.automaton.state_count);
    println!("  patterns: {}", stats.automaton.pattern_count);
}

fn run_tests(matcher: &Matcher) {
    println!("running test scenarios...");
    let mut totals = SessionTotals::default();

    for text in TEST_TEXTS {
        println!();
        println!("input: \"{}\"", text);
        let (results, duration) = matcher.search(text);
        totals.record(&results, duration);
        print_results(text, &results, duration);
    }

    println!();
    print_stats(matcher, &totals);
}

fn run_benchmark(matcher: &Matcher) {
    println!(
        "benchmark: {} texts x {} iterations...",
        BENCHMARK_TEXTS.len(),
        BENCHMARK_ITERATIONS
    );

    let start = Instant::now();
    let mut total_matches = 0u64;

    for _ in 0..BENCHMARK_ITERATIONS {
        for text in BENCHMARK_TEXTS {
            let (results, _) = matcher.search(text);
            total_matches += results.len() as u64;
        }
    }

    let elapsed = start.elapsed();
    let total_searches = (BENCHMARK_ITERATIONS * BENCHMARK_TEXTS.len()) as u64;

    println!("benchmark results:");
    println!("  total searches: {}", total_searches);
    println!("  total matches: {}", total_matches);
    println!("  total time: {:?}", elapsed);
    println!("  avg time/search: {:?}", elapsed / total_searches as u32);
    println!(
        "  searches/second: {:.0}",
        total_searches as f64 / elapsed.as_secs_f64()
    );
    println!(
        "  cache hit ratio: {:.1}%",
        matcher.cache_hit_ratio() * 100.0
    );
}
