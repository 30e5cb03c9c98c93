//! Configuration loading, validation and runtime checks
//!
//! The tools read one TOML file. Every field is optional and falls back to
//! the compiled default, so an empty file is a valid configuration.
//!
//! ```toml
//! sounds_directory = "/usr/share/asterisk/sounds/en"
//! custom_sounds_directory = "/usr/share/asterisk/sounds/custom/generated"
//! cache_directory = "/tmp/asl-tts-tools-cache"
//! on_missing = "beep"
//! max_phrase_words_for_filenames = 5
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// System-wide configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/asl-tts-tools/config.toml";

/// Environment variable consulted by the binaries for the config path
pub const CONFIG_ENV_VAR: &str = "ASL_TTS_CONFIG";

/// Sentinel for "no limit" in the cache settings
pub const UNLIMITED: i64 = -1;

/// What to do with a token no strategy could resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissing {
    /// Abort the pass with a MissingToken error
    Error,
    /// Emit the configured beep unit and continue
    Beep,
    /// Drop the token silently and continue
    Skip,
}

impl fmt::Display for OnMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OnMissing::Error => "error",
            OnMissing::Beep => "beep",
            OnMissing::Skip => "skip",
        };
        f.write_str(name)
    }
}

/// Tool configuration, loaded once and passed by reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base sound tree (read-only, e.g. the Asterisk sounds)
    pub sounds_directory: PathBuf,
    /// Override sound tree; also receives synthesized units
    pub custom_sounds_directory: PathBuf,
    /// Concatenated output cache
    pub cache_directory: PathBuf,

    pub on_missing: OnMissing,
    /// Key of the unit played for unresolved tokens under `on_missing = "beep"`
    pub beep_sound: String,
    /// Key of the unit played for pause characters
    pub silence_sound: String,
    /// Words kept in generated filenames before hashing kicks in
    pub max_phrase_words_for_filenames: usize,

    /// Synthesize missing words with the external engine
    pub auto_generate_words: bool,
    /// Synthesis engine binary (absolute path or looked up on PATH)
    pub asl_tts_bin: String,

    /// Maximum files kept in the cache, -1 for no limit
    pub max_cache_files: i64,
    /// Maximum age of cached files in days, -1 for no limit
    pub max_cache_age_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sounds_directory: PathBuf::from("/usr/share/asterisk/sounds/en"),
            custom_sounds_directory: PathBuf::from("/usr/share/asterisk/sounds/custom/generated"),
            cache_directory: PathBuf::from("/tmp/asl-tts-tools-cache"),
            on_missing: OnMissing::Error,
            beep_sound: "beep".to_string(),
            silence_sound: "silence/1".to_string(),
            max_phrase_words_for_filenames: 5,
            auto_generate_words: true,
            asl_tts_bin: "asl-tts".to_string(),
            max_cache_files: 100,
            max_cache_age_days: UNLIMITED,
        }
    }
}

/// Immutable per-pass resolution policy derived from [`Config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub on_missing: OnMissing,
    pub beep_key: String,
    pub silence_key: String,
    pub max_words: usize,
    pub synthesis_enabled: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Config::default().policy()
    }
}

/// Limits applied by cache eviction; `None` means unlimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheLimits {
    pub max_files: Option<usize>,
    pub max_age_days: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file is a configuration error; the binaries require an
    /// explicit file so that operators notice a mistyped path.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field-level constraints
    pub fn validate(&self) -> Result<()> {
        if self.max_cache_files != UNLIMITED && self.max_cache_files < 0 {
            return Err(Error::Config(
                "max_cache_files must be -1 or a positive number".to_string(),
            ));
        }
        if self.max_cache_age_days != UNLIMITED && self.max_cache_age_days < 0 {
            return Err(Error::Config(
                "max_cache_age_days must be -1 or a positive number".to_string(),
            ));
        }
        if self.max_phrase_words_for_filenames < 1 {
            return Err(Error::Config(
                "max_phrase_words_for_filenames must be a positive number".to_string(),
            ));
        }
        if self.asl_tts_bin.trim().is_empty() {
            return Err(Error::Config("asl_tts_bin cannot be empty".to_string()));
        }
        if self.beep_sound.trim().is_empty() {
            return Err(Error::Config("beep_sound cannot be empty".to_string()));
        }
        if self.silence_sound.trim().is_empty() {
            return Err(Error::Config("silence_sound cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Create the writable directories (override tree and cache) if missing
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.custom_sounds_directory, &self.cache_directory] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Config(format!("Cannot create directory {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Verify the environment before any resolution work starts
    ///
    /// **Checks:**
    /// 1. Base sounds directory exists
    /// 2. Synthesis binary is resolvable when synthesis is enabled
    pub fn check_runtime(&self, synthesis_enabled: bool) -> Result<()> {
        if !self.sounds_directory.is_dir() {
            return Err(Error::Config(format!(
                "Base sounds directory not found: {}",
                self.sounds_directory.display()
            )));
        }
        if synthesis_enabled {
            self.resolve_tts_binary()?;
        }
        Ok(())
    }

    /// Locate the synthesis binary
    ///
    /// Absolute (or relative-with-separator) paths must exist; bare names
    /// are searched on `PATH`.
    pub fn resolve_tts_binary(&self) -> Result<PathBuf> {
        let bin = Path::new(&self.asl_tts_bin);
        if bin.components().count() > 1 || bin.is_absolute() {
            if bin.is_file() {
                return Ok(bin.to_path_buf());
            }
            return Err(Error::Config(format!(
                "TTS binary not found: {}",
                self.asl_tts_bin
            )));
        }

        std::env::var_os("PATH")
            .and_then(|paths| {
                std::env::split_paths(&paths)
                    .map(|dir| dir.join(bin))
                    .find(|candidate| candidate.is_file())
            })
            .ok_or_else(|| {
                Error::Config(format!("TTS binary not found in PATH: {}", self.asl_tts_bin))
            })
    }

    /// Derive the per-pass resolution policy
    pub fn policy(&self) -> Policy {
        Policy {
            on_missing: self.on_missing,
            beep_key: self.beep_sound.clone(),
            silence_key: self.silence_sound.clone(),
            max_words: self.max_phrase_words_for_filenames,
            synthesis_enabled: self.auto_generate_words,
        }
    }

    /// Cache eviction limits with the -1 sentinel mapped to `None`
    pub fn cache_limits(&self) -> CacheLimits {
        CacheLimits {
            max_files: usize::try_from(self.max_cache_files).ok(),
            max_age_days: u64::try_from(self.max_cache_age_days).ok(),
        }
    }

    /// Log every setting at info level (shown with `-v`)
    pub fn log_summary(&self) {
        info!("Configuration:");
        info!("  sounds_directory: {}", self.sounds_directory.display());
        info!(
            "  custom_sounds_directory: {}",
            self.custom_sounds_directory.display()
        );
        info!("  cache_directory: {}", self.cache_directory.display());
        info!("  on_missing: {}", self.on_missing);
        info!("  beep_sound: {}", self.beep_sound);
        info!("  silence_sound: {}", self.silence_sound);
        info!(
            "  max_phrase_words_for_filenames: {}",
            self.max_phrase_words_for_filenames
        );
        info!("  auto_generate_words: {}", self.auto_generate_words);
        info!("  asl_tts_bin: {}", self.asl_tts_bin);
        info!("  max_cache_files: {}", self.max_cache_files);
        info!("  max_cache_age_days: {}", self.max_cache_age_days);
    }
}

/// Resolve the config path: explicit argument, then the per-user file
/// (`~/.config/asl-tts-tools/config.toml`) if present, then the system default
pub fn resolve_config_path(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(user_config) =
        dirs::config_dir().map(|d| d.join("asl-tts-tools").join("config.toml"))
    {
        if user_config.exists() {
            return user_config;
        }
    }

    PathBuf::from(DEFAULT_CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.on_missing, OnMissing::Error);
        assert_eq!(config.silence_sound, "silence/1");
    }

    #[test]
    fn test_policy_mirrors_config() {
        let config = Config {
            on_missing: OnMissing::Skip,
            auto_generate_words: false,
            max_phrase_words_for_filenames: 3,
            ..Config::default()
        };
        let policy = config.policy();
        assert_eq!(policy.on_missing, OnMissing::Skip);
        assert!(!policy.synthesis_enabled);
        assert_eq!(policy.max_words, 3);
        assert_eq!(policy.beep_key, "beep");
    }

    #[test]
    fn test_cache_limits_sentinel() {
        let config = Config {
            max_cache_files: UNLIMITED,
            max_cache_age_days: 7,
            ..Config::default()
        };
        let limits = config.cache_limits();
        assert_eq!(limits.max_files, None);
        assert_eq!(limits.max_age_days, Some(7));
    }

    #[test]
    fn test_on_missing_display_matches_toml() {
        assert_eq!(OnMissing::Beep.to_string(), "beep");
        let parsed = Config::from_toml_str("on_missing = \"skip\"").unwrap();
        assert_eq!(parsed.on_missing, OnMissing::Skip);
    }
}
