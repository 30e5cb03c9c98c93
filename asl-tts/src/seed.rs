//! Bulk pre-generation of common sound units
//!
//! Fills the override tree ahead of time so that resolution rarely needs
//! on-demand synthesis. Work items are independent: each renders one text
//! into its own file, and an existing file is left alone unless forced.

use crate::synthesis::{SpeechEngine, SYNTH_EXTENSION};
use asl_common::keys::phrase_to_filename;
use asl_common::Result;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Categories whose names are already Asterisk sound names
const VERBATIM_CATEGORIES: [&str; 2] = ["rpt", "phonetic"];

/// Category used for entries from a phrases file
pub const CUSTOM_CATEGORY: &str = "custom";

const NATO: [(&str, &str); 26] = [
    ("a", "alpha"),
    ("b", "bravo"),
    ("c", "charlie"),
    ("d", "delta"),
    ("e", "echo"),
    ("f", "foxtrot"),
    ("g", "golf"),
    ("h", "hotel"),
    ("i", "india"),
    ("j", "juliet"),
    ("k", "kilo"),
    ("l", "lima"),
    ("m", "mike"),
    ("n", "november"),
    ("o", "oscar"),
    ("p", "papa"),
    ("q", "quebec"),
    ("r", "romeo"),
    ("s", "sierra"),
    ("t", "tango"),
    ("u", "uniform"),
    ("v", "victor"),
    ("w", "whiskey"),
    ("x", "x-ray"),
    ("y", "yankee"),
    ("z", "zulu"),
];

const TIME: [(&str, &str); 6] = [
    ("oclock", "o'clock"),
    ("morning", "morning"),
    ("afternoon", "afternoon"),
    ("evening", "evening"),
    ("night", "night"),
    ("day", "day"),
];

const CALENDAR: [&str; 19] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const SYMBOLS: [(&str, &str); 12] = [
    ("exclamation", "exclamation"),
    ("question", "question"),
    ("asterisk", "asterisk"),
    ("at", "at"),
    ("ampersand", "and"),
    ("percent", "percent"),
    ("dollar", "dollar"),
    ("pound", "pound"),
    ("plus", "plus"),
    ("minus", "minus"),
    ("equals", "equals"),
    ("slash", "slash"),
];

const PHRASES: [(&str, &str); 26] = [
    ("connected-to", "connected to"),
    ("disconnected-from", "disconnected from"),
    ("connecting", "connecting"),
    ("disconnecting", "disconnecting"),
    ("node", "node"),
    ("nodes", "nodes"),
    ("repeater", "repeater"),
    ("link", "link"),
    ("online", "online"),
    ("offline", "offline"),
    ("enabled", "enabled"),
    ("disabled", "disabled"),
    ("activated", "activated"),
    ("deactivated", "deactivated"),
    ("affirmative", "affirmative"),
    ("negative", "negative"),
    ("confirmed", "confirmed"),
    ("invalid", "invalid"),
    ("error", "error"),
    ("warning", "warning"),
    ("please-wait", "please wait"),
    ("thank-you", "thank you"),
    ("goodbye", "goodbye"),
    ("hello", "hello"),
    ("welcome", "welcome"),
    ("please-try-again", "please try again"),
];

const RPT: [(&str, &str); 51] = [
    ("act-timeout-warning", "activity timeout warning"),
    ("timeout-warning", "timeout warning"),
    ("timeout", "timeout"),
    ("unkeyedfor", "unkeyed for"),
    ("keyedfor", "keyed for"),
    ("alllinksdisconnected", "all links disconnected"),
    ("alllinksrestored", "all links restored"),
    ("connection_failed", "connection failed"),
    ("connected", "connected"),
    ("connected-to", "connected to"),
    ("node_enabled", "node enabled"),
    ("node", "node"),
    ("up", "up"),
    ("down", "down"),
    ("hipwr", "high power"),
    ("medpwr", "medium power"),
    ("lopwr", "low power"),
    ("remote_already", "remote already"),
    ("remote_busy", "remote busy"),
    ("remote_cmd", "remote command"),
    ("remote_disc", "remote disconnect"),
    ("remote_go", "remote go"),
    ("remote_monitor", "remote monitor"),
    ("remote_notfound", "remote not found"),
    ("remote_tx", "remote transmit"),
    ("goodmorning", "good morning"),
    ("goodafternoon", "good afternoon"),
    ("goodevening", "good evening"),
    ("frequency", "frequency"),
    ("latitude", "latitude"),
    ("longitude", "longitude"),
    ("thetemperatureis", "the temperature is"),
    ("thetimeis", "the time is"),
    ("thevoltageis", "the voltage is"),
    ("thewindis", "the wind is"),
    ("autopatch_on", "autopatch on"),
    ("revpatch-intro", "reverse patch introduction"),
    ("revpatch-noanswer", "reverse patch no answer"),
    ("functioncomplete", "function complete"),
    ("invalid-freq", "invalid frequency"),
    ("localmonitor", "local monitor"),
    ("memory_notfound", "memory not found"),
    ("repeat_only", "repeat only"),
    ("rxpl", "receive PL"),
    ("txpl", "transmit PL"),
    ("seconds", "seconds"),
    ("simplex", "simplex"),
    ("sitenorm", "site normal"),
    ("stop", "stop"),
    ("tranceive", "transceive"),
    ("version", "version"),
];

/// A named group of (filename, text) entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub category: String,
    pub entries: Vec<(String, String)>,
}

impl Catalog {
    fn from_pairs(category: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            category: category.to_string(),
            entries: pairs
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
        }
    }
}

/// Catalogs generated on every run
///
/// `digits` and `phonetic` use the names the resolver looks up
/// (`digits/7`, `phonetic/a_p`).
pub fn builtin_catalogs() -> Vec<Catalog> {
    let digits = Catalog {
        category: "digits".to_string(),
        entries: (0..100).map(|n| (n.to_string(), n.to_string())).collect(),
    };
    let phonetic = Catalog {
        category: "phonetic".to_string(),
        entries: NATO
            .iter()
            .map(|(letter, word)| (format!("{letter}_p"), word.to_string()))
            .collect(),
    };
    let calendar = Catalog {
        category: "calendar".to_string(),
        entries: CALENDAR
            .iter()
            .map(|word| (word.to_string(), word.to_string()))
            .collect(),
    };

    vec![
        Catalog::from_pairs("letters", &NATO),
        digits,
        phonetic,
        Catalog::from_pairs("time", &TIME),
        calendar,
        Catalog::from_pairs("symbols", &SYMBOLS),
        Catalog::from_pairs("phrases", &PHRASES),
        Catalog::from_pairs("rpt", &RPT),
    ]
}

/// Parse a phrases file: one entry per line, `#` comments, blank lines
/// ignored, `filename->text` or bare text (used as both)
pub fn parse_phrases(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once("->") {
            Some((name, text)) => (name.trim().to_string(), text.trim().to_string()),
            None => (line.to_string(), line.to_string()),
        })
        .collect()
}

/// Load a phrases file as the `custom` catalog
pub fn load_phrases_file(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    Ok(Catalog {
        category: CUSTOM_CATEGORY.to_string(),
        entries: parse_phrases(&content),
    })
}

/// One unit to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub category: String,
    pub filename: String,
    pub text: String,
    pub output: PathBuf,
}

/// Expand catalogs into work items under `custom_root`
pub fn plan(catalogs: &[Catalog], custom_root: &Path, max_words: usize) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for catalog in catalogs {
        let dir = custom_root.join(&catalog.category);
        let verbatim = VERBATIM_CATEGORIES.contains(&catalog.category.as_str());

        for (name, text) in &catalog.entries {
            let filename = if verbatim {
                name.clone()
            } else {
                phrase_to_filename(name, max_words)
            };
            items.push(WorkItem {
                category: catalog.category.clone(),
                output: dir.join(format!("{filename}.{SYNTH_EXTENSION}")),
                filename,
                text: text.clone(),
            });
        }
    }
    items
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Generated(Duration),
    /// Target already present and not forced
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SeedResult {
    pub item: WorkItem,
    pub outcome: SeedOutcome,
}

/// Totals over a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SeedReport {
    pub fn from_results(results: &[SeedResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut report, result| {
                match result.outcome {
                    SeedOutcome::Generated(_) => report.generated += 1,
                    SeedOutcome::Skipped => report.skipped += 1,
                    SeedOutcome::Failed(_) => report.failed += 1,
                }
                report
            })
    }
}

/// Generate every item with at most `workers` renders in flight
///
/// Rendering blocks on the external engine, so each item runs on the
/// blocking pool. Results come back in completion order.
pub async fn run(
    items: Vec<WorkItem>,
    engine: Arc<dyn SpeechEngine>,
    workers: usize,
    force: bool,
) -> Vec<SeedResult> {
    let workers = workers.max(1);
    debug!(items = items.len(), workers, force, "Starting seeding run");

    stream::iter(items)
        .map(|item| {
            let engine = Arc::clone(&engine);
            async move {
                let task_item = item.clone();
                let outcome =
                    tokio::task::spawn_blocking(move || seed_one(&task_item, engine.as_ref(), force))
                        .await
                        .unwrap_or_else(|e| SeedOutcome::Failed(format!("worker failed: {e}")));
                SeedResult { item, outcome }
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await
}

fn seed_one(item: &WorkItem, engine: &dyn SpeechEngine, force: bool) -> SeedOutcome {
    if item.output.exists() && !force {
        return SeedOutcome::Skipped;
    }

    let start = Instant::now();
    if let Some(parent) = item.output.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return SeedOutcome::Failed(format!("cannot create {}: {}", parent.display(), e));
        }
    }

    match engine.render(&item.text, &item.output.with_extension("")) {
        Ok(_) => SeedOutcome::Generated(start.elapsed()),
        Err(e) => {
            warn!("Error generating TTS for {}: {}", item.text, e);
            SeedOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asl_common::Error;
    use std::sync::Mutex;

    #[test]
    fn test_parse_phrases() {
        let content = "# comment\n\nhello world\nnet-open -> the net is open\n  spaced  \n";
        assert_eq!(
            parse_phrases(content),
            vec![
                ("hello world".to_string(), "hello world".to_string()),
                ("net-open".to_string(), "the net is open".to_string()),
                ("spaced".to_string(), "spaced".to_string()),
            ]
        );
    }

    #[test]
    fn test_builtin_catalog_names_match_lookup_keys() {
        let catalogs = builtin_catalogs();
        let find = |name: &str| catalogs.iter().find(|c| c.category == name).unwrap();

        let digits = find("digits");
        assert_eq!(digits.entries.len(), 100);
        assert_eq!(digits.entries[0], ("0".to_string(), "0".to_string()));

        let phonetic = find("phonetic");
        assert_eq!(phonetic.entries[0], ("a_p".to_string(), "alpha".to_string()));
        assert_eq!(find("rpt").entries.len(), RPT.len());
    }

    #[test]
    fn test_plan_sanitizes_except_verbatim_categories() {
        let catalogs = vec![
            Catalog::from_pairs("phrases", &[("Thank You", "thank you")]),
            Catalog::from_pairs("rpt", &[("node_enabled", "node enabled")]),
            Catalog::from_pairs("phonetic", &[("a_p", "alpha")]),
        ];
        let items = plan(&catalogs, Path::new("/custom"), 5);

        assert_eq!(items[0].output, Path::new("/custom/phrases/thank-you.ul"));
        assert_eq!(items[1].output, Path::new("/custom/rpt/node_enabled.ul"));
        assert_eq!(items[2].output, Path::new("/custom/phonetic/a_p.ul"));
    }

    struct RecordingEngine {
        rendered: Mutex<Vec<String>>,
    }

    impl SpeechEngine for RecordingEngine {
        fn render(&self, text: &str, stem: &Path) -> Result<PathBuf> {
            if text == "broken" {
                return Err(Error::Synthesis("engine failed".to_string()));
            }
            self.rendered.lock().unwrap().push(text.to_string());
            let path = stem.with_extension(SYNTH_EXTENSION);
            std::fs::write(&path, b"\x7f")?;
            Ok(path)
        }
    }

    #[tokio::test]
    async fn test_run_skips_existing_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let catalogs = vec![Catalog::from_pairs(
            "phrases",
            &[("hello", "hello"), ("broken", "broken"), ("node", "node")],
        )];
        let items = plan(&catalogs, dir.path(), 5);
        std::fs::create_dir_all(dir.path().join("phrases")).unwrap();
        std::fs::write(dir.path().join("phrases").join("node.ul"), b"").unwrap();

        let engine = Arc::new(RecordingEngine {
            rendered: Mutex::new(Vec::new()),
        });
        let results = run(items.clone(), engine.clone(), 2, false).await;
        let report = SeedReport::from_results(&results);
        assert_eq!(
            report,
            SeedReport {
                generated: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert!(dir.path().join("phrases").join("hello.ul").exists());

        let results = run(items, engine.clone(), 1, true).await;
        assert_eq!(SeedReport::from_results(&results).generated, 2);
        assert_eq!(engine.rendered.lock().unwrap().len(), 3);
    }
}
