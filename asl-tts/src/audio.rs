//! Concatenation of resolved units into one playable file

use crate::sounds::{AudioUnitRef, Codec};
use asl_common::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Joins units, in order, into a single output file
pub trait AudioAssembler {
    fn assemble(&self, units: &[AudioUnitRef], output: &Path) -> Result<()>;
}

/// Assembler backed by the `sox` command
///
/// Each input is passed with an explicit `-t <type>` since raw telephony
/// formats carry no header.
#[derive(Debug, Clone)]
pub struct SoxAssembler {
    bin: String,
}

impl Default for SoxAssembler {
    fn default() -> Self {
        Self {
            bin: "sox".to_string(),
        }
    }
}

impl SoxAssembler {
    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn command(&self, units: &[AudioUnitRef], output: &Path) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("-V0");
        for unit in units {
            cmd.arg("-t").arg(unit.codec().sox_type()).arg(unit.path());
        }
        cmd.arg("-t")
            .arg(Codec::from_path(output).sox_type())
            .arg(output);
        cmd
    }
}

impl AudioAssembler for SoxAssembler {
    /// An empty unit list writes nothing
    fn assemble(&self, units: &[AudioUnitRef], output: &Path) -> Result<()> {
        if units.is_empty() {
            return Ok(());
        }

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut cmd = self.command(units, output);
        debug!(units = units.len(), output = %output.display(), "Concatenating audio with {}", self.bin);

        let status = cmd
            .status()
            .map_err(|e| Error::AudioProcessing(format!("cannot run {}: {}", self.bin, e)))?;
        if !status.success() {
            return Err(Error::AudioProcessing(format!(
                "{} exited with {} writing {}",
                self.bin,
                status,
                output.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_passes_type_per_input() {
        let units = vec![
            AudioUnitRef::new("/s/digits/5.gsm"),
            AudioUnitRef::new("/s/connected-to.ulaw"),
        ];
        let cmd = SoxAssembler::default().command(&units, Path::new("/tmp/out.ul"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-V0",
                "-t",
                "gsm",
                "/s/digits/5.gsm",
                "-t",
                "ul",
                "/s/connected-to.ulaw",
                "-t",
                "ul",
                "/tmp/out.ul"
            ]
        );
    }

    #[test]
    fn test_empty_input_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out.ul");
        SoxAssembler::with_binary("/nonexistent/sox")
            .assemble(&[], &out)
            .unwrap();
        assert!(!out.exists());
        assert!(!out.parent().unwrap().exists());
    }

    #[test]
    fn test_missing_binary_is_audio_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SoxAssembler::with_binary("/nonexistent/sox")
            .assemble(&[AudioUnitRef::new("/s/a.ul")], &dir.path().join("out.ul"));
        assert!(matches!(result, Err(Error::AudioProcessing(_))));
    }
}
