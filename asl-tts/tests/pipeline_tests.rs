//! End-to-end pipeline tests with fake assembler, playback and engine

use asl_common::{Config, Error, OnMissing, Result};
use asl_tts::audio::AudioAssembler;
use asl_tts::pipeline::{self, Collaborators, Delivery};
use asl_tts::playback::Playback;
use asl_tts::sounds::AudioUnitRef;
use asl_tts::synthesis::{CachedSynthesizer, NoSynthesis, SpeechEngine, SYNTH_EXTENSION};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingAssembler {
    calls: RefCell<Vec<(Vec<PathBuf>, PathBuf)>>,
}

impl AudioAssembler for RecordingAssembler {
    fn assemble(&self, units: &[AudioUnitRef], output: &Path) -> Result<()> {
        fs::create_dir_all(output.parent().unwrap())?;
        fs::write(output, b"concatenated")?;
        self.calls.borrow_mut().push((
            units.iter().map(|u| u.path().to_path_buf()).collect(),
            output.to_path_buf(),
        ));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPlayback {
    played: RefCell<Vec<(PathBuf, String)>>,
}

impl Playback for RecordingPlayback {
    fn play(&self, file: &Path, node: &str) -> Result<()> {
        self.played
            .borrow_mut()
            .push((file.to_path_buf(), node.to_string()));
        Ok(())
    }
}

struct EchoEngine;

impl SpeechEngine for EchoEngine {
    fn render(&self, text: &str, stem: &Path) -> Result<PathBuf> {
        let path = stem.with_extension(SYNTH_EXTENSION);
        fs::write(&path, text.as_bytes())?;
        Ok(path)
    }
}

struct Fixture {
    _root: TempDir,
    config: Config,
}

fn fixture(on_missing: OnMissing) -> Fixture {
    let root = TempDir::new().unwrap();
    let base = root.path().join("sounds");
    for rel in ["hello.gsm", "digits/5.gsm", "silence/1.gsm"] {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"\x00").unwrap();
    }

    let config = Config {
        sounds_directory: base,
        custom_sounds_directory: root.path().join("custom"),
        cache_directory: root.path().join("cache"),
        on_missing,
        auto_generate_words: false,
        max_cache_files: -1,
        ..Config::default()
    };
    config.ensure_directories().unwrap();
    Fixture {
        _root: root,
        config,
    }
}

#[test]
fn test_concatenate_copies_and_plays() {
    let fx = fixture(OnMissing::Error);
    let assembler = RecordingAssembler::default();
    let playback = RecordingPlayback::default();
    let collaborators = Collaborators {
        synthesizer: &NoSynthesis,
        assembler: &assembler,
        playback: &playback,
    };
    let output = fx.config.cache_directory.parent().unwrap().join("out/greeting.ul");
    let delivery = Delivery {
        output_file: Some(output.clone()),
        node: Some("2000".to_string()),
    };

    let cache_file = pipeline::concatenate(&fx.config, "Hello, 5", &delivery, &collaborators).unwrap();

    assert_eq!(cache_file, fx.config.cache_directory.join("hello-5.ul"));
    let calls = assembler.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        vec![
            fx.config.sounds_directory.join("hello.gsm"),
            fx.config.sounds_directory.join("silence/1.gsm"),
            fx.config.sounds_directory.join("digits/5.gsm"),
        ]
    );
    assert_eq!(fs::read(&output).unwrap(), b"concatenated");
    assert_eq!(
        *playback.played.borrow(),
        vec![(cache_file.clone(), "2000".to_string())]
    );
}

#[test]
fn test_nothing_resolved_is_no_matches() {
    let fx = fixture(OnMissing::Skip);
    let assembler = RecordingAssembler::default();
    let playback = RecordingPlayback::default();
    let collaborators = Collaborators {
        synthesizer: &NoSynthesis,
        assembler: &assembler,
        playback: &playback,
    };
    let delivery = Delivery {
        node: Some("1".to_string()),
        ..Delivery::default()
    };

    let result = pipeline::concatenate(&fx.config, "xyzzy", &delivery, &collaborators);

    assert!(matches!(result, Err(Error::NoMatches)));
    assert!(assembler.calls.borrow().is_empty());
    assert!(playback.played.borrow().is_empty());
}

#[test]
fn test_missing_token_aborts_before_assembly() {
    let fx = fixture(OnMissing::Error);
    let assembler = RecordingAssembler::default();
    let playback = RecordingPlayback::default();
    let collaborators = Collaborators {
        synthesizer: &NoSynthesis,
        assembler: &assembler,
        playback: &playback,
    };
    let delivery = Delivery {
        node: Some("1".to_string()),
        ..Delivery::default()
    };

    let result = pipeline::concatenate(&fx.config, "hello xyzzy", &delivery, &collaborators);

    assert!(matches!(result, Err(Error::MissingToken { position: 1, .. })));
    assert!(assembler.calls.borrow().is_empty());
}

#[test]
fn test_delivery_is_checked_first() {
    let fx = fixture(OnMissing::Error);
    let assembler = RecordingAssembler::default();
    let playback = RecordingPlayback::default();
    let collaborators = Collaborators {
        synthesizer: &NoSynthesis,
        assembler: &assembler,
        playback: &playback,
    };

    let result = pipeline::concatenate(&fx.config, "hello", &Delivery::default(), &collaborators);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_cache_trimmed_after_run() {
    let mut fx = fixture(OnMissing::Error);
    fx.config.max_cache_files = 1;
    let stale = fx.config.cache_directory.join("stale.ul");
    let file = fs::File::create(&stale).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();

    let assembler = RecordingAssembler::default();
    let playback = RecordingPlayback::default();
    let collaborators = Collaborators {
        synthesizer: &NoSynthesis,
        assembler: &assembler,
        playback: &playback,
    };
    let delivery = Delivery {
        node: Some("1".to_string()),
        ..Delivery::default()
    };

    let cache_file = pipeline::concatenate(&fx.config, "hello", &delivery, &collaborators).unwrap();

    assert!(cache_file.exists());
    assert!(!stale.exists());
}

#[test]
fn test_speak_whole_caches_and_copies() {
    let fx = fixture(OnMissing::Error);
    let synthesizer = CachedSynthesizer::new(
        EchoEngine,
        &fx.config.cache_directory,
        fx.config.max_phrase_words_for_filenames,
    );
    let playback = RecordingPlayback::default();
    let output = fx.config.cache_directory.parent().unwrap().join("saved/net");
    let delivery = Delivery {
        output_file: Some(output.clone()),
        node: Some("2000".to_string()),
    };

    let cache_file = pipeline::speak_whole(
        &fx.config,
        "The net starts now",
        &delivery,
        &synthesizer,
        &playback,
    )
    .unwrap();

    assert_eq!(
        cache_file,
        fx.config.cache_directory.join("the-net-starts-now.ul")
    );
    let saved = output.with_extension("ul");
    assert_eq!(fs::read_to_string(saved).unwrap(), "The net starts now");
    assert_eq!(playback.played.borrow().len(), 1);
}
