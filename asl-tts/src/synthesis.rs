//! On-demand speech synthesis
//!
//! The resolver only sees the [`Synthesizer`] capability. The production
//! implementation is a [`CachedSynthesizer`] wrapping a [`SpeechEngine`]:
//! units are cached by filename, so synthesizing the same text twice runs
//! the engine once.

use crate::sounds::AudioUnitRef;
use asl_common::keys::phrase_to_filename;
use asl_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Extension the external engine appends to its output
pub const SYNTH_EXTENSION: &str = "ul";

/// Produces a playable unit for a piece of text
pub trait Synthesizer {
    fn synthesize(&self, text: &str) -> Result<AudioUnitRef>;
}

/// Renders text into an audio file
///
/// `stem` is the output path without extension; the engine returns the path
/// it actually wrote.
pub trait SpeechEngine: Send + Sync {
    fn render(&self, text: &str, stem: &Path) -> Result<PathBuf>;
}

/// Synthesizer used when synthesis is unavailable
pub struct NoSynthesis;

impl Synthesizer for NoSynthesis {
    fn synthesize(&self, text: &str) -> Result<AudioUnitRef> {
        Err(Error::Synthesis(format!(
            "synthesis unavailable for '{}'",
            text
        )))
    }
}

/// Decide whether a piece of text may be synthesized
///
/// **Rules:**
/// - Parenthesized phrases are always eligible
/// - Pure numbers (hyphens ignored) are not
/// - All-uppercase text is not (it gets spelled instead)
/// - Single characters are not
/// - Otherwise eligible only if it contains a lowercase letter
pub fn is_eligible(text: &str) -> bool {
    if text.chars().count() >= 2 && text.starts_with('(') && text.ends_with(')') {
        return true;
    }

    let unhyphenated: Vec<char> = text.chars().filter(|c| *c != '-').collect();
    if !unhyphenated.is_empty() && unhyphenated.iter().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let has_lowercase = text.chars().any(char::is_lowercase);
    if !has_lowercase && text.chars().any(char::is_uppercase) {
        return false;
    }

    if text.chars().count() == 1 {
        return false;
    }

    has_lowercase
}

/// Filesystem-cached synthesis on top of a [`SpeechEngine`]
pub struct CachedSynthesizer<E> {
    engine: E,
    cache_dir: PathBuf,
    max_words: usize,
}

impl<E: SpeechEngine> CachedSynthesizer<E> {
    pub fn new(engine: E, cache_dir: impl Into<PathBuf>, max_words: usize) -> Self {
        Self {
            engine,
            cache_dir: cache_dir.into(),
            max_words,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Path a unit for `text` is cached at
    pub fn cache_path(&self, text: &str) -> PathBuf {
        self.cache_dir
            .join(phrase_to_filename(text, self.max_words))
            .with_extension(SYNTH_EXTENSION)
    }
}

impl<E: SpeechEngine> Synthesizer for CachedSynthesizer<E> {
    fn synthesize(&self, text: &str) -> Result<AudioUnitRef> {
        let target = self.cache_path(text);
        if target.exists() {
            debug!(text, path = %target.display(), "Found existing synthesized unit");
            return Ok(AudioUnitRef::new(target));
        }

        std::fs::create_dir_all(&self.cache_dir)?;
        let written = match self.engine.render(text, &target.with_extension("")) {
            Ok(written) => written,
            Err(e) => {
                // A partial file would be served as a cache hit next time
                if target.exists() {
                    let _ = std::fs::remove_file(&target);
                }
                return Err(e);
            }
        };
        if !written.exists() {
            return Err(Error::Synthesis(format!(
                "engine reported success but {} is missing",
                written.display()
            )));
        }

        info!(text, path = %written.display(), "Synthesized unit");
        Ok(AudioUnitRef::new(written))
    }
}

/// The `asl-tts` command-line engine
///
/// Invoked as `asl-tts -n <node> -t <text> -f <stem>`; it writes
/// `<stem>.ul`.
#[derive(Debug, Clone)]
pub struct AslTtsEngine {
    bin: PathBuf,
    node: String,
}

impl AslTtsEngine {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            node: "1".to_string(),
        }
    }

    /// Node number passed to the engine
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }
}

impl SpeechEngine for AslTtsEngine {
    fn render(&self, text: &str, stem: &Path) -> Result<PathBuf> {
        debug!(
            bin = %self.bin.display(),
            node = %self.node,
            text,
            stem = %stem.display(),
            "Running TTS engine"
        );

        let output = Command::new(&self.bin)
            .arg("-n")
            .arg(&self.node)
            .arg("-t")
            .arg(text)
            .arg("-f")
            .arg(stem)
            .output()
            .map_err(|e| {
                Error::Synthesis(format!("cannot run {}: {}", self.bin.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::Synthesis(format!(
                "{} exited with {} for '{}': {}",
                self.bin.display(),
                output.status,
                text,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(stem.with_extension(SYNTH_EXTENSION))
    }
}
