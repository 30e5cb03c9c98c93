//! Integration tests for sound index construction over real directory trees

use asl_common::Error;
use asl_tts::sounds::{Codec, SoundIndexBuilder};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"\xff\xff\xff\xff").unwrap();
}

fn roots() -> (TempDir, TempDir) {
    (TempDir::new().unwrap(), TempDir::new().unwrap())
}

#[test]
fn test_namespaced_and_phrase_keys() {
    let (base, custom) = roots();
    touch(base.path(), "digits/5.ulaw");
    touch(base.path(), "letters/a.gsm");
    touch(base.path(), "silence/1.ul");
    touch(base.path(), "rpt/Connected-To.gsm");
    touch(base.path(), "good_morning.wav");

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    assert_eq!(
        index.keys(),
        vec!["connected to", "digits/5", "good morning", "letters/a", "silence/1"]
    );
    assert_eq!(index.get("letters/a").unwrap().codec(), Codec::Gsm);
    assert_eq!(index.get("good morning").unwrap().codec(), Codec::Wav);
}

#[test]
fn test_override_root_wins() {
    let (base, custom) = roots();
    touch(base.path(), "hello.ulaw");
    touch(custom.path(), "phrases/Hello.ul");

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    let unit = index.get("hello").unwrap();
    assert!(unit.path().starts_with(custom.path()));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_override_adds_new_keys() {
    let (base, custom) = roots();
    touch(base.path(), "beep.gsm");
    touch(custom.path(), "phonetic/a_p.ul");

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    assert!(index.contains("beep"));
    assert!(index.contains("phonetic/a_p"));
}

#[test]
fn test_base_collision_keeps_first_in_walk_order() {
    let (base, custom) = roots();
    touch(base.path(), "a/hello.gsm");
    touch(base.path(), "b/hello.gsm");

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    assert_eq!(
        index.get("hello").unwrap().path(),
        base.path().join("a").join("hello.gsm")
    );
}

#[test]
fn test_skip_lists_and_unsupported_extensions() {
    let (base, custom) = roots();
    touch(base.path(), "hello.gsm");
    touch(base.path(), ".hidden/secret.gsm");
    touch(base.path(), ".beep.ul");
    touch(base.path(), "README.ul");
    touch(base.path(), "CREDITS/voice.ul");
    touch(base.path(), "LICENSE-sounds.wav");
    touch(base.path(), "notes.txt");
    touch(base.path(), "music.mp3");

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    assert_eq!(index.keys(), vec!["hello"]);
}

#[test]
fn test_base_without_sounds_is_config_error() {
    let (base, custom) = roots();
    touch(base.path(), "README.txt");
    touch(custom.path(), "hello.ul");

    let result = SoundIndexBuilder::new(base.path(), custom.path()).build();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_missing_override_root_is_fine() {
    let (base, custom) = roots();
    touch(base.path(), "hello.gsm");

    let index = SoundIndexBuilder::new(base.path(), custom.path().join("not-created"))
        .build()
        .unwrap();
    assert_eq!(index.len(), 1);
}

#[test]
fn test_override_collision_keeps_last_in_walk_order() {
    let (base, custom) = roots();
    touch(base.path(), "hello.gsm");
    touch(custom.path(), "a/hello.ul");
    touch(custom.path(), "b/hello.ul");

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    assert_eq!(
        index.get("hello").unwrap().path(),
        custom.path().join("b").join("hello.ul")
    );
    assert_eq!(index.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let (base, custom) = roots();
    touch(base.path(), "hello.gsm");
    touch(base.path(), "locked.gsm");
    let locked = base.path().join("locked.gsm");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not bind a privileged user
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let index = SoundIndexBuilder::new(base.path(), custom.path())
        .build()
        .unwrap();

    assert_eq!(index.keys(), vec!["hello"]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
