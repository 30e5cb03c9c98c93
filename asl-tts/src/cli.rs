//! Shared command-line plumbing: exit codes, config loading, text input

use asl_common::config::resolve_config_path;
use asl_common::{Config, Error, Result};
use std::io::Read;
use std::path::Path;
use tracing::error;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID_ARGS: i32 = 1;
pub const EXIT_NO_MATCHES: i32 = 2;
pub const EXIT_AUDIO_PROCESSING: i32 = 3;
pub const EXIT_CONFIG: i32 = 4;
pub const EXIT_FILE: i32 = 5;
pub const EXIT_PLAYBACK: i32 = 6;

/// Process exit code for an error reaching a binary's top level
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::InvalidInput(_) => EXIT_INVALID_ARGS,
        Error::MissingToken { .. } | Error::NoMatches | Error::Synthesis(_) => EXIT_NO_MATCHES,
        Error::AudioProcessing(_) => EXIT_AUDIO_PROCESSING,
        Error::Config(_) | Error::Permission(_) => EXIT_CONFIG,
        Error::Io(_) | Error::UnreadableSound(_) => EXIT_FILE,
        Error::Playback(_) => EXIT_PLAYBACK,
    }
}

/// Log the error and map it to an exit code
pub fn report(err: &Error) -> i32 {
    error!("{}", err);
    exit_code(err)
}

/// Load, validate and log the configuration
pub fn load_config(cli_path: Option<&Path>) -> Result<Config> {
    let path = resolve_config_path(cli_path);
    let config = Config::from_file(&path)?;
    config.log_summary();
    Ok(config)
}

/// Text from the positional argument, or stdin when absent
pub fn read_text(arg: Option<String>) -> Result<String> {
    let text = match arg {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    non_empty(text)
}

fn non_empty(text: String) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("No text provided".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Error::InvalidInput("x".into())), EXIT_INVALID_ARGS);
        assert_eq!(exit_code(&Error::NoMatches), EXIT_NO_MATCHES);
        assert_eq!(
            exit_code(&Error::MissingToken {
                token: "xyzzy".into(),
                position: 0
            }),
            EXIT_NO_MATCHES
        );
        assert_eq!(exit_code(&Error::AudioProcessing("sox".into())), EXIT_AUDIO_PROCESSING);
        assert_eq!(exit_code(&Error::Config("bad".into())), EXIT_CONFIG);
        assert_eq!(exit_code(&Error::Permission(PathBuf::from("/s"))), EXIT_CONFIG);
        assert_eq!(
            exit_code(&Error::Io(std::io::Error::other("disk"))),
            EXIT_FILE
        );
        assert_eq!(exit_code(&Error::Playback("asterisk".into())), EXIT_PLAYBACK);
        assert_ne!(exit_code(&Error::NoMatches), EXIT_SUCCESS);
    }

    #[test]
    fn test_text_is_trimmed_and_required() {
        assert_eq!(read_text(Some("  hello \n".into())).unwrap(), "hello");
        assert!(matches!(
            read_text(Some("   ".into())),
            Err(Error::InvalidInput(_))
        ));
    }
}
