//! Sound index construction
//!
//! Scans the base and override sound trees into one flat map from
//! normalized key to playable unit. Override entries replace base entries
//! that normalize to the same key.

use asl_common::keys::path_to_key;
use asl_common::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Extensions Asterisk can play, lowercase without the dot
pub const SUPPORTED_EXTENSIONS: [&str; 15] = [
    "ul",      // uLaw
    "ulaw",    // uLaw
    "al",      // aLaw
    "alaw",    // aLaw
    "g711",    // G.711
    "g723",    // G.723.1
    "g726",    // G.726
    "g729",    // G.729
    "gsm",     // Raw GSM
    "ilbc",    // iLBC codec
    "pcm",     // Raw PCM
    "sln",     // Signed Linear
    "vox",     // Dialogic VOX
    "wav",     // WAV format
    "wav_gsm", // WAV with GSM encoding
];

/// File name prefixes never treated as sounds
pub const SKIP_PREFIXES: [&str; 5] = [".", "CREDITS", "LICENSE", "CHANGES", "README"];

/// File name suffixes never treated as sounds
pub const SKIP_SUFFIXES: [&str; 1] = [".txt"];

/// Audio encoding of a unit, as understood by sox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Ulaw,
    Gsm,
    Wav,
    Sln,
    G729,
}

impl Codec {
    /// Infer the codec from a file extension; unknown extensions fall back
    /// to uLaw
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "ul" | "ulaw" => Codec::Ulaw,
            "gsm" => Codec::Gsm,
            "wav" => Codec::Wav,
            "sln" => Codec::Sln,
            "g729" => Codec::G729,
            _ => Codec::Ulaw,
        }
    }

    /// Type name passed to `sox -t`
    pub fn sox_type(&self) -> &'static str {
        match self {
            Codec::Ulaw => "ul",
            Codec::Gsm => "gsm",
            Codec::Wav => "wav",
            Codec::Sln => "sln",
            Codec::G729 => "g729",
        }
    }
}

/// Handle to one playable audio unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioUnitRef {
    path: PathBuf,
    codec: Codec,
}

impl AudioUnitRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let codec = Codec::from_path(&path);
        Self { path, codec }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }
}

impl fmt::Display for AudioUnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Immutable map from normalized key to audio unit
#[derive(Debug, Clone, Default)]
pub struct SoundIndex {
    entries: HashMap<String, AudioUnitRef>,
}

impl SoundIndex {
    pub fn get(&self, key: &str) -> Option<&AudioUnitRef> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<(String, AudioUnitRef)> for SoundIndex {
    fn from_iter<I: IntoIterator<Item = (String, AudioUnitRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A sound file found under one root
#[derive(Debug, Clone)]
struct SoundFile {
    key: String,
    path: PathBuf,
}

/// Builds a [`SoundIndex`] from a base and an override root
pub struct SoundIndexBuilder {
    base_root: PathBuf,
    override_root: PathBuf,
}

impl SoundIndexBuilder {
    pub fn new(base_root: impl Into<PathBuf>, override_root: impl Into<PathBuf>) -> Self {
        Self {
            base_root: base_root.into(),
            override_root: override_root.into(),
        }
    }

    /// Scan both roots and merge them
    ///
    /// **Errors:**
    /// - `Permission` if the base root exists but cannot be read
    /// - `Config` if the base root contributes no usable sound files
    pub fn build(&self) -> Result<SoundIndex> {
        let base_files = scan_root(&self.base_root, true)?;
        if base_files.is_empty() {
            return Err(Error::Config(format!(
                "No sound files found in base directory: {}",
                self.base_root.display()
            )));
        }
        let override_files = scan_root(&self.override_root, false)?;

        let mut entries: HashMap<String, AudioUnitRef> = HashMap::new();

        for file in base_files {
            if let Some(existing) = entries.get(&file.key) {
                debug!(
                    key = %file.key,
                    kept = %existing,
                    skipped = %file.path.display(),
                    "Key already registered from base directory, keeping first"
                );
                continue;
            }
            entries.insert(file.key, AudioUnitRef::new(file.path));
        }
        let base_count = entries.len();

        let mut seen_override: HashMap<String, PathBuf> = HashMap::new();
        for file in override_files {
            if let Some(previous) = seen_override.get(&file.key) {
                debug!(
                    key = %file.key,
                    replaced = %previous.display(),
                    winner = %file.path.display(),
                    "Key registered twice in override directory, later file wins"
                );
            } else if let Some(existing) = entries.get(&file.key) {
                debug!(
                    key = %file.key,
                    base = %existing,
                    custom = %file.path.display(),
                    "Override file replaces base file"
                );
            }
            seen_override.insert(file.key.clone(), file.path.clone());
            entries.insert(file.key, AudioUnitRef::new(file.path));
        }

        info!(
            base_keys = base_count,
            override_files = seen_override.len(),
            total_keys = entries.len(),
            "Sound index built"
        );

        Ok(SoundIndex { entries })
    }
}

/// Collect the usable sound files below one root
///
/// Missing roots yield nothing. An unreadable root is fatal only when
/// `required` is set; otherwise it is logged and skipped.
fn scan_root(root: &Path, required: bool) -> Result<Vec<SoundFile>> {
    debug!("Loading sounds from directory: {}", root.display());

    if !root.exists() {
        debug!("Directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    if let Err(e) = std::fs::read_dir(root) {
        if required {
            return Err(match e.kind() {
                std::io::ErrorKind::PermissionDenied => Error::Permission(root.to_path_buf()),
                _ => Error::Io(e),
            });
        }
        warn!("Cannot read sounds directory {}: {}", root.display(), e);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !has_supported_extension(path) {
            debug!("Skipping unsupported sound file: {}", path.display());
            continue;
        }

        if let Err(e) = File::open(path) {
            let err = match e.kind() {
                std::io::ErrorKind::PermissionDenied => Error::UnreadableSound(path.to_path_buf()),
                _ => Error::Io(e),
            };
            warn!("{}", err);
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let key = path_to_key(&relative_key_source(relative));
        tracing::trace!(key = %key, path = %path.display(), "Registered sound file");
        files.push(SoundFile {
            key,
            path: path.to_path_buf(),
        });
    }

    debug!("Loaded {} sound files from {}", files.len(), root.display());
    Ok(files)
}

/// Relative path rendered with `/` separators
fn relative_key_source(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    SKIP_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
        || SKIP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
