//! Common error types for ASL TTS

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for ASL TTS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ASL TTS tools
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid settings, required directories or binaries
    #[error("Configuration error: {0}")]
    Config(String),

    /// No matching strategy resolved a token and the policy is `error`
    #[error("No match found for token '{token}' at position {position}")]
    MissingToken { token: String, position: usize },

    /// The whole input resolved to zero audio units
    #[error("No sound files matched the input text")]
    NoMatches,

    /// External synthesis engine failed to produce a unit
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// A required path exists but cannot be read
    #[error("Permission denied: {0}")]
    Permission(PathBuf),

    /// A single sound file cannot be read; the scan skips it
    #[error("Cannot read sound file: {0}")]
    UnreadableSound(PathBuf),

    /// PBX playback command failed
    #[error("Playback error: {0}")]
    Playback(String),

    /// Concatenation or conversion of audio units failed
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// What an error does to the resolution pass that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorEffect {
    /// The whole pass stops and the error reaches the caller
    AbortPass,
    /// The current token is abandoned and resolution continues
    SkipToken,
    /// The error is logged and the pass continues unaffected
    LogAndContinue,
}

impl Error {
    /// Classify the effect this error has when raised inside a pass
    pub fn effect(&self) -> ErrorEffect {
        match self {
            Error::Synthesis(_) => ErrorEffect::SkipToken,
            Error::UnreadableSound(_) => ErrorEffect::LogAndContinue,
            Error::Permission(_)
            | Error::Config(_)
            | Error::MissingToken { .. }
            | Error::NoMatches
            | Error::Playback(_)
            | Error::AudioProcessing(_)
            | Error::Io(_)
            | Error::InvalidInput(_) => ErrorEffect::AbortPass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_message_names_token() {
        let err = Error::MissingToken {
            token: "xyzzy".to_string(),
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "No match found for token 'xyzzy' at position 3"
        );
    }

    #[test]
    fn test_synthesis_failure_only_skips_token() {
        assert_eq!(
            Error::Synthesis("engine exited 1".into()).effect(),
            ErrorEffect::SkipToken
        );
        assert_eq!(Error::NoMatches.effect(), ErrorEffect::AbortPass);
        assert_eq!(
            Error::Permission(PathBuf::from("/root")).effect(),
            ErrorEffect::AbortPass
        );
        assert_eq!(
            Error::UnreadableSound(PathBuf::from("beep.ul")).effect(),
            ErrorEffect::LogAndContinue
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
