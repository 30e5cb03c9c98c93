//! End-to-end announcement pipelines used by the binaries
//!
//! Both pipelines finish the same way: the result lives in the cache
//! directory, is optionally copied out and played, and the cache is
//! trimmed afterwards.

use crate::audio::AudioAssembler;
use crate::cache;
use crate::playback::Playback;
use crate::resolver::Resolver;
use crate::sounds::SoundIndexBuilder;
use crate::synthesis::{Synthesizer, SYNTH_EXTENSION};
use asl_common::keys::phrase_to_filename;
use asl_common::{Config, Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the finished announcement goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Copy the result to this path
    pub output_file: Option<PathBuf>,
    /// Play the result on this node
    pub node: Option<String>,
}

impl Delivery {
    /// At least one destination is required
    pub fn validate(&self) -> Result<()> {
        if self.output_file.is_none() && self.node.is_none() {
            return Err(Error::InvalidInput(
                "Either -n/--node or -f/--file (or both) must be specified".to_string(),
            ));
        }
        Ok(())
    }
}

/// Capabilities the pipelines drive
pub struct Collaborators<'a> {
    pub synthesizer: &'a dyn Synthesizer,
    pub assembler: &'a dyn AudioAssembler,
    pub playback: &'a dyn Playback,
}

/// Cache path for the announcement of `text`
pub fn cache_file_for(config: &Config, text: &str) -> PathBuf {
    config.cache_directory.join(format!(
        "{}.{}",
        phrase_to_filename(text, config.max_phrase_words_for_filenames),
        SYNTH_EXTENSION
    ))
}

/// Resolve `text` against the sound trees, concatenate and deliver it
///
/// Returns the cache file holding the concatenated audio.
pub fn concatenate(
    config: &Config,
    text: &str,
    delivery: &Delivery,
    collaborators: &Collaborators<'_>,
) -> Result<PathBuf> {
    delivery.validate()?;

    let index =
        SoundIndexBuilder::new(&config.sounds_directory, &config.custom_sounds_directory).build()?;
    let policy = config.policy();
    let resolver = Resolver::new(&index, &policy, collaborators.synthesizer);

    info!("Text: {}", text);
    let result = resolver.resolve_text(text)?;
    if result.is_empty() {
        return Err(Error::NoMatches);
    }
    debug!(units = result.units.len(), steps = result.steps.len(), "Resolution complete");

    let cache_file = cache_file_for(config, text);
    collaborators.assembler.assemble(&result.units, &cache_file)?;

    if let Some(output) = &delivery.output_file {
        copy_out(&cache_file, output)?;
    }
    if let Some(node) = &delivery.node {
        collaborators.playback.play(&cache_file, node)?;
    }

    trim_cache(config);
    Ok(cache_file)
}

/// Synthesize `text` as a single unit and deliver it
///
/// The output file gets `.ul` appended to the given path.
pub fn speak_whole(
    config: &Config,
    text: &str,
    delivery: &Delivery,
    synthesizer: &dyn Synthesizer,
    playback: &dyn Playback,
) -> Result<PathBuf> {
    delivery.validate()?;

    let unit = synthesizer.synthesize(text)?;
    let cache_file = unit.path().to_path_buf();

    if let Some(output) = &delivery.output_file {
        let mut with_ext = output.clone().into_os_string();
        with_ext.push(format!(".{SYNTH_EXTENSION}"));
        copy_out(&cache_file, Path::new(&with_ext))?;
    }
    if let Some(node) = &delivery.node {
        playback.play(&cache_file, node)?;
    }

    trim_cache(config);
    Ok(cache_file)
}

fn copy_out(cache_file: &Path, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(cache_file, output)?;
    info!("Wrote output to {}", output.display());
    Ok(())
}

/// Eviction problems never fail the run
fn trim_cache(config: &Config) {
    debug!("Performing cache cleanup...");
    if let Err(e) = cache::evict(&config.cache_directory, config.cache_limits()) {
        warn!("Cache cleanup error: {}", e);
    }
}
