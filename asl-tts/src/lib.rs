//! # ASL TTS Library (asl-tts)
//!
//! Turns free text into an ordered sequence of pre-recorded audio units for
//! announcement on an AllStarLink node.
//!
//! **Purpose:** Tokenize text, resolve each token against the sound trees
//! through an ordered strategy chain, synthesize missing words on demand,
//! concatenate the result and hand it to Asterisk.
//!
//! **Architecture:** `tokenizer` → `resolver` (reads a `sounds::SoundIndex`,
//! calls a `synthesis::Synthesizer`) → `audio` → `playback`. External
//! programs sit behind traits so the core runs without them in tests.

pub mod audio;
pub mod cache;
pub mod cli;
pub mod pipeline;
pub mod playback;
pub mod resolver;
pub mod seed;
pub mod sounds;
pub mod synthesis;
pub mod tokenizer;

pub use resolver::{MatchResult, Resolver, Strategy};
pub use sounds::{AudioUnitRef, SoundIndex, SoundIndexBuilder};
pub use tokenizer::{tokenize, Token, TokenKind};
