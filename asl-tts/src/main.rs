//! ASL TTS Concatenator (asl-tts-concat) - Main entry point
//!
//! Speaks text by stitching together existing sound files, synthesizing
//! only the words no sound covers.
//!
//! **Usage:**
//! ```bash
//! asl-tts-concat -n 2000 "Node 2000, connected-to W1AW"
//! echo "good morning" | asl-tts-concat -f /tmp/greeting.ul
//! ```

use std::path::PathBuf;

use asl_common::logging;
use asl_common::{Config, Result};
use asl_tts::audio::SoxAssembler;
use asl_tts::cli;
use asl_tts::pipeline::{self, Collaborators, Delivery};
use asl_tts::playback::AsteriskPlayback;
use asl_tts::synthesis::{AslTtsEngine, CachedSynthesizer, NoSynthesis, Synthesizer};
use clap::Parser;
use tracing::info;

/// Command-line arguments for asl-tts-concat
#[derive(Parser, Debug)]
#[command(name = "asl-tts-concat")]
#[command(about = "Speak text on an AllStarLink node by concatenating sound files")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "ASL_TTS_CONFIG")]
    config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Asterisk node number for playback
    #[arg(short, long)]
    node: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Auto-generate TTS for missing words
    #[arg(short = 'g', long)]
    generate_tts: bool,

    /// Text to speak (read from stdin when omitted)
    text: Option<String>,
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

    let mut config = cli::load_config(args.config.as_deref())?;
    if args.generate_tts {
        config.auto_generate_words = true;
    }
    config.check_runtime(config.auto_generate_words)?;
    config.ensure_directories()?;

    let text = cli::read_text(args.text)?;

    let synthesizer = build_synthesizer(&config)?;
    let assembler = SoxAssembler::default();
    let playback = AsteriskPlayback::default();
    let collaborators = Collaborators {
        synthesizer: synthesizer.as_ref(),
        assembler: &assembler,
        playback: &playback,
    };

    let cache_file = pipeline::concatenate(&config, &text, &delivery, &collaborators)?;
    info!("Announcement cached at {}", cache_file.display());
    Ok(())
}

/// Synthesized words land in the override tree so later runs find them
fn build_synthesizer(config: &Config) -> Result<Box<dyn Synthesizer>> {
    if !config.auto_generate_words {
        return Ok(Box::new(NoSynthesis));
    }
    let engine = AslTtsEngine::new(config.resolve_tts_binary()?);
    Ok(Box::new(CachedSynthesizer::new(
        engine,
        &config.custom_sounds_directory,
        config.max_phrase_words_for_filenames,
    )))
}
