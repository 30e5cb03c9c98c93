//! The ordered matching strategies
//!
//! Each strategy looks at the tokens from the cursor onward and either
//! declines (`None`) or returns the units it emits and how many tokens it
//! consumed. Order in [`STRATEGY_CHAIN`] is the priority order.

use super::symbols::symbol_key;
use super::{Hit, Resolver};
use crate::sounds::AudioUnitRef;
use crate::tokenizer::{Token, TokenKind};
use asl_common::keys::{path_to_key, phrase_key, phrase_to_filename};
use std::fmt;

/// Identifies the strategy that matched a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    ParenthesizedLiteral,
    BracedKey,
    UppercaseLetters,
    PhoneticSpelling,
    DigitRun,
    Symbol,
    MixedSpelling,
    LongestPhrase,
    Synthesized,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::ParenthesizedLiteral => "parenthesized-literal",
            Strategy::BracedKey => "braced-key",
            Strategy::UppercaseLetters => "uppercase-letters",
            Strategy::PhoneticSpelling => "phonetic-spelling",
            Strategy::DigitRun => "digit-run",
            Strategy::Symbol => "symbol",
            Strategy::MixedSpelling => "mixed-spelling",
            Strategy::LongestPhrase => "longest-phrase",
            Strategy::Synthesized => "synthesized",
        };
        f.write_str(name)
    }
}

/// A strategy attempt: resolver plus the tokens from the cursor onward
pub type StrategyFn = fn(&Resolver<'_>, &[Token]) -> Option<Hit>;

/// Strategies in priority order
pub const STRATEGY_CHAIN: [(Strategy, StrategyFn); 9] = [
    (Strategy::ParenthesizedLiteral, parenthesized_literal),
    (Strategy::BracedKey, braced_key),
    (Strategy::UppercaseLetters, uppercase_letters),
    (Strategy::PhoneticSpelling, phonetic_spelling),
    (Strategy::DigitRun, digit_run),
    (Strategy::Symbol, symbol),
    (Strategy::MixedSpelling, mixed_spelling),
    (Strategy::LongestPhrase, longest_phrase),
    (Strategy::Synthesized, synthesized),
];

fn parenthesized_literal(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    if token.kind() != TokenKind::Parenthesized {
        return None;
    }
    let inner = token.inner()?;

    let key = phrase_to_filename(inner, r.policy.max_words);
    if let Some(unit) = r.lookup(&key) {
        return Some(Hit::single(unit));
    }
    // Eligibility is judged on the inner text, so `(W1AW)` falls to spelling
    r.synthesize(inner).map(Hit::single)
}

fn braced_key(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    if token.kind() != TokenKind::Braced {
        return None;
    }
    r.lookup(&path_to_key(token.inner()?)).map(Hit::single)
}

/// Partial: letters without a sound are dropped
fn uppercase_letters(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    if token.kind() != TokenKind::Uppercase {
        return None;
    }
    let units: Vec<AudioUnitRef> = token.text().chars().filter_map(|c| letter_unit(r, c)).collect();
    Hit::spelled(units)
}

/// Atomic: one missing character fails the whole token
fn phonetic_spelling(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    if token.kind() != TokenKind::Bracketed {
        return None;
    }
    let units = token
        .inner()?
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| {
            if c.is_ascii_digit() {
                digit_unit(r, c)
            } else {
                r.lookup(&format!("phonetic/{}_p", lowercase(c)))
            }
        })
        .collect::<Option<Vec<_>>>()?;
    Hit::spelled(units)
}

fn digit_run(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    if token.kind() != TokenKind::Digits {
        return None;
    }
    let units = token
        .text()
        .chars()
        .map(|c| digit_unit(r, c))
        .collect::<Option<Vec<_>>>()?;
    Hit::spelled(units)
}

fn symbol(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    let unit = match token.kind() {
        TokenKind::Pause => r.lookup(&r.policy.silence_key),
        TokenKind::Symbol => r.lookup(&symbol_key(token.single_char()?)?),
        _ => None,
    }?;
    Some(Hit::single(unit))
}

/// Spells alphanumerics of tokens without lowercase that no earlier class
/// claimed (`W1AW`, `(ABC)` after a failed literal lookup)
fn mixed_spelling(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    let claimed = matches!(
        token.kind(),
        TokenKind::Uppercase
            | TokenKind::Bracketed
            | TokenKind::Digits
            | TokenKind::Pause
            | TokenKind::Symbol
    );
    if claimed || !token.is_spellable() {
        return None;
    }

    let units = token
        .text()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| {
            if c.is_ascii_digit() {
                digit_unit(r, c)
            } else {
                letter_unit(r, c)
            }
        })
        .collect::<Option<Vec<_>>>()?;
    Hit::spelled(units)
}

/// Longest run of word tokens first, shrinking to one
fn longest_phrase(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let run = tokens.iter().take_while(|t| t.is_word()).count();

    (1..=run).rev().find_map(|len| {
        let phrase = tokens[..len]
            .iter()
            .map(Token::text)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        r.lookup(&phrase_key(&phrase)).map(|unit| Hit {
            units: vec![unit],
            consumed: len,
        })
    })
}

/// Undelimited tokens only: parenthesized phrases already had their
/// synthesis attempt, braced and bracketed tokens are lookups
fn synthesized(r: &Resolver<'_>, tokens: &[Token]) -> Option<Hit> {
    let token = tokens.first()?;
    // `[abc]` or `{abc}` is never spoken with its delimiters; a missed lookup
    // goes to the on-missing policy instead
    if token.inner().is_some() || !token.has_lowercase() {
        return None;
    }
    r.synthesize(token.text()).map(Hit::single)
}

/// Letter Resolution: first present of `letters/<l>`, `<l>`, `alpha/<l>`,
/// `phonetic/<l>_p`
pub(crate) fn letter_keys(c: char) -> [String; 4] {
    let l = lowercase(c);
    [
        format!("letters/{l}"),
        l.clone(),
        format!("alpha/{l}"),
        format!("phonetic/{l}_p"),
    ]
}

fn letter_unit(r: &Resolver<'_>, c: char) -> Option<AudioUnitRef> {
    letter_keys(c).iter().find_map(|key| r.lookup(key))
}

fn digit_unit(r: &Resolver<'_>, c: char) -> Option<AudioUnitRef> {
    r.lookup(&format!("digits/{c}"))
}

fn lowercase(c: char) -> String {
    c.to_lowercase().collect()
}
