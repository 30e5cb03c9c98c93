//! Playback of a finished file on an AllStarLink node

use asl_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Plays an audio file on a node
pub trait Playback {
    fn play(&self, file: &Path, node: &str) -> Result<()>;
}

/// Playback through `asterisk -rx "rpt localplay <node> <file>"`
///
/// Asterisk expects the absolute path without extension and picks the
/// format itself.
#[derive(Debug, Clone)]
pub struct AsteriskPlayback {
    bin: String,
}

impl Default for AsteriskPlayback {
    fn default() -> Self {
        Self {
            bin: "asterisk".to_string(),
        }
    }
}

impl AsteriskPlayback {
    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// CLI command handed to `asterisk -rx`
    pub fn localplay_command(file: &Path, node: &str) -> String {
        format!("rpt localplay {} {}", node, bare_sound_path(file).display())
    }
}

/// Absolute path with the extension removed
fn bare_sound_path(file: &Path) -> PathBuf {
    let absolute = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
    absolute.with_extension("")
}

impl Playback for AsteriskPlayback {
    fn play(&self, file: &Path, node: &str) -> Result<()> {
        let command = Self::localplay_command(file, node);
        info!("Executing: {} -rx \"{}\"", self.bin, command);

        let status = Command::new(&self.bin)
            .arg("-rx")
            .arg(&command)
            .status()
            .map_err(|e| Error::Playback(format!("cannot run {}: {}", self.bin, e)))?;

        if !status.success() {
            return Err(Error::Playback(format!(
                "'{}' exited with {}",
                command, status
            )));
        }
        Ok(())
    }
}
