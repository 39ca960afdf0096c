//! Bylines extraction tool
//!
//! Reads episode descriptions and prints the book recommendations found in
//! them as JSON. Logs go to stderr so stdout stays machine-readable.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bylines_core::{BookExtractor, Episode, ExtractorConfig, merge_recommendations};
use bylines_llm::{OpenAiConfig, openai_fallback};
use clap::Parser;
use tracing::{info, warn};

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "bylines-extract")]
#[command(about = "Extract book recommendations from podcast episode descriptions")]
#[command(version)]
struct Cli {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Treat input as JSON lines of {"id", "description"} episodes
    #[arg(long)]
    jsonl: bool,

    /// With --jsonl, print one deduplicated list across all episodes
    #[arg(long, requires = "jsonl")]
    merge: bool,

    /// Never call the LLM fallback
    #[arg(long)]
    no_fallback: bool,

    /// Chat model used by the fallback
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Upper bound on a single fallback call, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Deterministic results with fewer books are escalated (0 disables)
    #[arg(long, default_value_t = 5)]
    min_books: usize,
}

impl Cli {
    fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::new()
            .with_min_book_count(self.min_books)
            .with_fallback_timeout(Duration::from_secs(self.timeout_secs))
            .with_fallback(!self.no_fallback)
    }

    fn openai_config(&self) -> OpenAiConfig {
        let config = OpenAiConfig::from_env()
            .with_request_timeout(Duration::from_secs(self.timeout_secs));
        match &self.model {
            Some(model) => config.with_model(model.clone()),
            None => config,
        }
    }
}

fn build_extractor(cli: &Cli) -> Result<BookExtractor> {
    let extractor = BookExtractor::new(cli.extractor_config())
        .context("failed to build extractor")?;
    if cli.no_fallback {
        return Ok(extractor);
    }

    let openai = cli.openai_config();
    if openai.api_key.is_none() {
        warn!("no OpenAI key set, escalations will keep deterministic results");
    }
    let fallback = openai_fallback(openai).context("failed to build fallback backend")?;
    Ok(extractor.with_fallback(Arc::new(fallback)))
}

/// Parses JSON-lines input, skipping blank lines.
fn parse_episodes(input: &str) -> Result<Vec<Episode>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid episode on line {}", idx + 1))
        })
        .collect()
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

async fn run(cli: &Cli, input: &str, out: &mut impl Write) -> Result<()> {
    let extractor = build_extractor(cli)?;

    if !cli.jsonl {
        let result = extractor.extract(input).await;
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
        return Ok(());
    }

    let episodes = parse_episodes(input)?;
    info!(episodes = episodes.len(), "extracting batch");
    let extractions = extractor.extract_episodes(&episodes).await;

    if cli.merge {
        let books = merge_recommendations(&extractions);
        info!(books = books.len(), "merged recommendations");
        writeln!(out, "{}", serde_json::to_string(&books)?)?;
    } else {
        for extraction in &extractions {
            writeln!(out, "{}", serde_json::to_string(extraction)?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let input = read_input(cli.input.as_ref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &input, &mut out).await
}
