//! Sound chunk generator (asl-tts-seed)
//!
//! Pre-generates letters, digits, phonetic alphabet, calendar words and
//! common repeater phrases into the custom sounds directory.
//!
//! **Usage:**
//! ```bash
//! asl-tts-seed -t 4
//! asl-tts-seed --force -p /etc/asl-tts-tools/phrases.txt
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use asl_common::logging;
use asl_tts::cli;
use asl_tts::seed::{self, SeedOutcome, SeedReport};
use asl_tts::synthesis::{AslTtsEngine, SpeechEngine};
use clap::Parser;
use tracing::{info, warn};

/// Command-line arguments for asl-tts-seed
#[derive(Parser, Debug)]
#[command(name = "asl-tts-seed")]
#[command(about = "Generate common sound chunks for ASL TTS tools")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "ASL_TTS_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Force regeneration of existing files
    #[arg(short, long)]
    force: bool,

    /// Number of concurrent generators (default: number of CPUs)
    #[arg(short, long)]
    threads: Option<usize>,

    /// File with additional phrases (one per line, optionally filename->text)
    #[arg(short, long)]
    phrases: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = cli::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let tts_bin = config
        .resolve_tts_binary()
        .context("TTS binary check failed")?;

    let mut catalogs = seed::builtin_catalogs();
    if let Some(path) = &args.phrases {
        match seed::load_phrases_file(path) {
            Ok(custom) => catalogs.push(custom),
            Err(e) => warn!("Phrases file {} skipped: {}", path.display(), e),
        }
    }

    let items = seed::plan(
        &catalogs,
        &config.custom_sounds_directory,
        config.max_phrase_words_for_filenames,
    );
    let workers = args.threads.unwrap_or_else(num_cpus::get).max(1);
    info!(items = items.len(), workers, "Generating sound chunks");

    let engine: Arc<dyn SpeechEngine> = Arc::new(AslTtsEngine::new(tts_bin));
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let results = runtime.block_on(seed::run(items, engine, workers, args.force));

    for result in &results {
        let item = &result.item;
        match &result.outcome {
            SeedOutcome::Generated(took) => println!(
                "Generating '{}' -> '{}': Done ({:.1}s)",
                item.text,
                item.filename,
                took.as_secs_f64()
            ),
            SeedOutcome::Skipped => println!(
                "Generating '{}' -> '{}': Skipping, file already exists",
                item.text, item.filename
            ),
            SeedOutcome::Failed(reason) => println!(
                "Generating '{}' -> '{}': Failed ({})",
                item.text, item.filename, reason
            ),
        }
    }

    let report = SeedReport::from_results(&results);
    println!(
        "Generated {}, skipped {}, failed {}",
        report.generated, report.skipped, report.failed
    );
    Ok(())
}
