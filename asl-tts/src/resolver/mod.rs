//! Token → audio unit resolution
//!
//! The resolver walks the token sequence with a cursor. At each position it
//! tries the strategies of [`STRATEGY_CHAIN`] in order; the first that
//! matches emits its units and consumes one or more tokens. A position no
//! strategy claims is handled by the on-missing policy.
//!
//! Resolution is synchronous and single-threaded. The only blocking call is
//! into the injected [`Synthesizer`], made at most once per strategy attempt.

mod strategies;
pub mod symbols;

pub use strategies::{Strategy, STRATEGY_CHAIN};

use crate::sounds::{AudioUnitRef, SoundIndex};
use crate::synthesis::{is_eligible, Synthesizer};
use crate::tokenizer::{tokenize, Token};
use asl_common::{Error, OnMissing, Policy, Result};
use tracing::{debug, info, warn};

/// What happened at one cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A strategy matched
    Matched(Strategy),
    /// Nothing matched; the beep unit was emitted (if present)
    Beeped,
    /// Nothing matched; the token was dropped
    Skipped,
}

/// One entry of the resolution trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStep {
    /// Cursor position the step started at
    pub position: usize,
    /// Text of the token at that position
    pub token: String,
    pub outcome: StepOutcome,
    /// Tokens consumed by the step
    pub consumed: usize,
    /// Units emitted by the step
    pub units: usize,
}

/// Ordered units for one resolution pass plus the trace that produced them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub units: Vec<AudioUnitRef>,
    pub steps: Vec<MatchStep>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn into_units(self) -> Vec<AudioUnitRef> {
        self.units
    }
}

/// Units emitted by a matching strategy and the tokens it consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub units: Vec<AudioUnitRef>,
    pub consumed: usize,
}

impl Hit {
    fn single(unit: AudioUnitRef) -> Self {
        Self {
            units: vec![unit],
            consumed: 1,
        }
    }

    fn spelled(units: Vec<AudioUnitRef>) -> Option<Self> {
        if units.is_empty() {
            None
        } else {
            Some(Self { units, consumed: 1 })
        }
    }
}

/// Resolves tokens against a sound index under a policy
pub struct Resolver<'a> {
    index: &'a SoundIndex,
    policy: &'a Policy,
    synthesizer: &'a dyn Synthesizer,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a SoundIndex, policy: &'a Policy, synthesizer: &'a dyn Synthesizer) -> Self {
        Self {
            index,
            policy,
            synthesizer,
        }
    }

    /// Tokenize and resolve text in one call
    pub fn resolve_text(&self, text: &str) -> Result<MatchResult> {
        self.resolve(&tokenize(text))
    }

    /// Resolve a token sequence
    ///
    /// **Errors:** `MissingToken` when a token is unresolvable and the
    /// policy is `error`. Synthesis failures never surface here; they only
    /// make the strategy that needed synthesis miss.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<MatchResult> {
        let tokens: Vec<Token> = tokens.iter().map(|t| Token::classify(t.as_ref())).collect();
        let mut result = MatchResult::default();
        let mut cursor = 0;

        while cursor < tokens.len() {
            let remaining = &tokens[cursor..];
            let token = &remaining[0];
            debug!(position = cursor, token = %token.text(), kind = ?token.kind(), "Trying to match token");

            let matched = STRATEGY_CHAIN.iter().find_map(|(strategy, attempt)| {
                attempt(self, remaining).map(|hit| (*strategy, hit))
            });

            let step = match matched {
                Some((strategy, hit)) => {
                    let consumed = hit.consumed.clamp(1, remaining.len());
                    info!(
                        token = %token.text(),
                        strategy = %strategy,
                        consumed,
                        units = hit.units.len(),
                        "Matched token"
                    );
                    let step = MatchStep {
                        position: cursor,
                        token: token.text().to_string(),
                        outcome: StepOutcome::Matched(strategy),
                        consumed,
                        units: hit.units.len(),
                    };
                    result.units.extend(hit.units);
                    step
                }
                None => self.unresolved(token, cursor, &mut result.units)?,
            };

            cursor += step.consumed;
            result.steps.push(step);
        }

        Ok(result)
    }

    /// Apply the on-missing policy to a token nothing matched
    fn unresolved(
        &self,
        token: &Token,
        position: usize,
        units: &mut Vec<AudioUnitRef>,
    ) -> Result<MatchStep> {
        info!(token = %token.text(), position, policy = %self.policy.on_missing, "No match found for token");

        let (outcome, emitted) = match self.policy.on_missing {
            OnMissing::Error => {
                return Err(Error::MissingToken {
                    token: token.text().to_string(),
                    position,
                });
            }
            OnMissing::Beep => match self.index.get(&self.policy.beep_key) {
                Some(unit) => {
                    units.push(unit.clone());
                    (StepOutcome::Beeped, 1)
                }
                None => {
                    warn!("Beep sound not found: {}", self.policy.beep_key);
                    (StepOutcome::Beeped, 0)
                }
            },
            OnMissing::Skip => (StepOutcome::Skipped, 0),
        };

        Ok(MatchStep {
            position,
            token: token.text().to_string(),
            outcome,
            consumed: 1,
            units: emitted,
        })
    }

    fn lookup(&self, key: &str) -> Option<AudioUnitRef> {
        self.index.get(key).cloned()
    }

    /// Synthesize `text` if the policy allows it and the text is eligible
    ///
    /// Failures are logged and reported as a miss.
    fn synthesize(&self, text: &str) -> Option<AudioUnitRef> {
        if !self.policy.synthesis_enabled {
            return None;
        }
        if !is_eligible(text) {
            debug!(text, "Text not eligible for synthesis");
            return None;
        }
        match self.synthesizer.synthesize(text) {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!("Failed to synthesize '{}': {}", text, e);
                None
            }
        }
    }
}
