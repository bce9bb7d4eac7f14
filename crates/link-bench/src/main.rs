use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use link_label::{GridLayout, LinkDetector, LinkRegistry, PatternDetector, link_at};
use ratatui::layout::{Alignment, Position, Rect};

const WORDS: [&str; 10] = [
    "lorem",
    "@amy",
    "ipsum",
    "#rust",
    "dolor",
    "https://example.com/a",
    "sit",
    "@bob_2",
    "amet",
    "www.example.org",
];

#[derive(Parser, Debug)]
#[command(
    name = "link-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Measure link registry rebuilds and hit-testing on synthetic label text"
)]
struct BenchCli {
    /// Number of rebuild + hit-test rounds.
    #[arg(short = 'n', long = "iterations", value_name = "COUNT", default_value_t = 1_000)]
    iterations: u32,

    /// Approximate number of words in the generated text.
    #[arg(short = 'w', long = "words", value_name = "COUNT", default_value_t = 200)]
    words: usize,

    /// Label width in cells used for the grid layout.
    #[arg(long = "width", value_name = "CELLS", default_value_t = 80)]
    width: u16,
}

struct BenchConfig {
    iterations: u32,
    words: usize,
    width: u16,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=1_000_000).contains(&cli.iterations) {
            return Err("iterations must be between 1 and 1000000".to_string());
        }
        if !(1..=100_000).contains(&cli.words) {
            return Err("words must be between 1 and 100000".to_string());
        }
        if !(8..=1_000).contains(&cli.width) {
            return Err("width must be between 8 and 1000 cells".to_string());
        }
        Ok(Self {
            iterations: cli.iterations,
            words: cli.words,
            width: cli.width,
        })
    }
}

#[derive(Debug, Default)]
struct BenchStats {
    rebuild: Duration,
    hit_test: Duration,
    links: usize,
    samples: u64,
    hits: u64,
}

impl BenchStats {
    fn final_report(&self, config: &BenchConfig) -> String {
        let rounds = config.iterations.max(1);
        let per_rebuild = self.rebuild / rounds;
        let per_sample = if self.samples == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos((self.hit_test.as_nanos() / self.samples as u128) as u64)
        };
        format!(
            "rounds: {rounds}\n\
             words: {}\n\
             links per rebuild: {}\n\
             avg rebuild: {per_rebuild:?}\n\
             hit-tests: {} ({} hits)\n\
             avg hit-test: {per_sample:?}",
            config.words, self.links, self.samples, self.hits
        )
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn synthetic_text(words: usize) -> String {
    (0..words)
        .map(|i| WORDS[(i * 7 + i / 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let text = synthetic_text(config.words);
    let detectors: Vec<Box<dyn LinkDetector>> = vec![
        Box::new(PatternDetector::mention()),
        Box::new(PatternDetector::hashtag()),
        Box::new(PatternDetector::url()),
    ];
    let text_len = link_label::grapheme::grapheme_len(&text);
    let area = Rect::new(0, 0, config.width, u16::MAX / 2);
    let layout = GridLayout::new(&text, area, true, Alignment::Left);
    let rows = layout.row_count().min(u16::MAX as usize) as u16;

    let mut stats = BenchStats::default();
    let mut registry = LinkRegistry::new();
    for round in 0..config.iterations {
        let started = Instant::now();
        registry.rebuild(&text, &detectors);
        stats.rebuild += started.elapsed();
        stats.links = registry.len();

        let started = Instant::now();
        for sample in 0..rows.max(1) {
            let column = ((round as u64 * 31 + sample as u64 * 17) % config.width as u64) as u16;
            if link_at(&registry, &layout, text_len, Position::new(column, sample)).is_some() {
                stats.hits += 1;
            }
            stats.samples += 1;
        }
        stats.hit_test += started.elapsed();
    }
    stats
}
