//! Whole-text TTS wrapper (asl-tts-wrapper)
//!
//! Synthesizes the full text as one unit (cached), optionally saves it and
//! plays it on a node.
//!
//! **Usage:**
//! ```bash
//! asl-tts-wrapper -n 2000 "The net starts in five minutes"
//! asl-tts-wrapper -f /tmp/net-start "The net starts in five minutes"
//! ```

use std::path::PathBuf;

use asl_common::logging;
use asl_common::Result;
use asl_tts::cli;
use asl_tts::pipeline::{self, Delivery};
use asl_tts::playback::AsteriskPlayback;
use asl_tts::synthesis::{AslTtsEngine, CachedSynthesizer};
use clap::Parser;
use tracing::info;

/// Command-line arguments for asl-tts-wrapper
#[derive(Parser, Debug)]
#[command(name = "asl-tts-wrapper")]
#[command(about = "ASL TTS wrapper with Asterisk playback")]
#[command(version)]
struct Args {
    /// Text to convert to speech
    text: String,

    /// Node number
    #[arg(short, long)]
    node: Option<String>,

    /// Output file to save the audio, .ul extension will be added
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, env = "ASL_TTS_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let code = match run(args) {
        Ok(()) => cli::EXIT_SUCCESS,
        Err(e) => cli::report(&e),
    };
    std::process::exit(code);
}

fn run(args: Args) -> Result<()> {
    let delivery = Delivery {
        output_file: args.file,
        node: args.node,
    };
    delivery.validate()?;

    let config = cli::load_config(args.config.as_deref())?;
    config.ensure_directories()?;
    let text = cli::read_text(Some(args.text))?;

    let node = delivery.node.clone().unwrap_or_else(|| "0".to_string());
    let engine = AslTtsEngine::new(config.resolve_tts_binary()?).with_node(node);
    let synthesizer = CachedSynthesizer::new(
        engine,
        &config.cache_directory,
        config.max_phrase_words_for_filenames,
    );

    let cache_file = pipeline::speak_whole(
        &config,
        &text,
        &delivery,
        &synthesizer,
        &AsteriskPlayback::default(),
    )?;
    info!("Announcement cached at {}", cache_file.display());
    Ok(())
}
