//! Text tokenization
//!
//! Splits announcement text into the tokens the resolver matches against
//! the sound index. Three escape syntaxes survive as single tokens:
//! - `(phrase here)`: phrase grouping, synthesized when missing
//! - `{rpt/connected-to}`: exact sound key
//! - `[W1AW]`: phonetic spelling
//!
//! Everything else splits on whitespace; words made of letters, digits and
//! hyphens pass through whole, other runs are broken into alphanumeric
//! pieces and single punctuation tokens.

/// Characters that map to the silence unit
pub const PAUSE_CHARS: [char; 5] = [',', '.', ';', ':', '-'];

/// Check if a token is a word (letters/digits and optionally hyphens)
pub fn is_word(token: &str) -> bool {
    !token.is_empty()
        && token.chars().all(|c| c.is_alphanumeric() || c == '-')
        && token.chars().any(char::is_alphanumeric)
}

/// Check if a character is a pause character
pub fn is_pause_char(c: char) -> bool {
    PAUSE_CHARS.contains(&c)
}

fn closing_delimiter(open: char) -> Option<char> {
    match open {
        '[' => Some(']'),
        '{' => Some('}'),
        '(' => Some(')'),
        _ => None,
    }
}

/// Split text into tokens
///
/// Pure and deterministic: the same text always yields the same tokens.
///
/// ```
/// use asl_tts::tokenizer::tokenize;
/// assert_eq!(
///     tokenize("Node 5, connected-to W1AW!"),
///     vec!["Node", "5", ",", "connected-to", "W1AW", "!"]
/// );
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for candidate in split_candidates(text) {
        if candidate.starts_with(['[', '{', '(']) || is_word(&candidate) {
            tracing::trace!(token = %candidate, "Keeping token whole");
            tokens.push(candidate);
            continue;
        }
        decompose(&candidate, &mut tokens);
    }

    tokens.retain(|t| !t.is_empty());
    tracing::debug!(?tokens, "Tokenized text");
    tokens
}

/// First pass: whitespace split plus atomic delimited groups
fn split_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut current = String::new();
    let mut expected_close: Option<char> = None;

    for c in text.chars() {
        if let Some(close) = expected_close {
            current.push(c);
            if c == close {
                candidates.push(collapse_delimited(&current));
                current.clear();
                expected_close = None;
            }
            continue;
        }

        if let Some(close) = closing_delimiter(c) {
            if !current.is_empty() {
                candidates.push(std::mem::take(&mut current));
            }
            current.push(c);
            expected_close = Some(close);
            continue;
        }

        if c.is_whitespace() {
            if !current.is_empty() {
                candidates.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(c);
    }

    // An unterminated group runs to the end of the text, verbatim
    if !current.is_empty() {
        candidates.push(current);
    }
    candidates
}

/// Trim and collapse whitespace between the delimiters of a closed group
fn collapse_delimited(group: &str) -> String {
    let mut chars = group.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return group.to_string();
    };
    let inner = chars.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{open}{inner}{close}")
}

/// Second pass: break a non-word candidate into pieces
fn decompose(candidate: &str, tokens: &mut Vec<String>) {
    let mut current = String::new();

    for c in candidate.chars() {
        if c.is_alphanumeric() || c == '-' {
            // A hyphen not attached to a word is a pause
            if c == '-' && !current.chars().any(char::is_alphanumeric) {
                flush(&mut current, tokens);
                push_collapsed(tokens, "-");
            } else {
                current.push(c);
            }
        } else {
            flush(&mut current, tokens);
            let mut buf = [0u8; 4];
            push_collapsed(tokens, c.encode_utf8(&mut buf));
        }
    }

    flush(&mut current, tokens);
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Push a punctuation token unless it repeats the previous token
fn push_collapsed(tokens: &mut Vec<String>, token: &str) {
    if tokens.last().map(String::as_str) != Some(token) {
        tokens.push(token.to_string());
    }
}

/// Token classification, computed once per token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `(phrase)`: literal phrase, synthesized when missing
    Parenthesized,
    /// `{key}`: exact sound key
    Braced,
    /// `[ABC]`: phonetic spelling
    Bracketed,
    /// Letters only, all uppercase (`NODE`)
    Uppercase,
    /// Digits only (`2024`)
    Digits,
    /// One pause character
    Pause,
    /// One other non-alphanumeric character
    Symbol,
    /// Alphanumerics without lowercase that fit no class above (`W1AW`)
    Mixed,
    /// Anything else, typically words containing lowercase
    Text,
}

/// A classified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
    is_word: bool,
    has_lowercase: bool,
    has_alphanumeric: bool,
}

impl Token {
    /// Classify a raw token string
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        let has_lowercase = text.chars().any(char::is_lowercase);
        let has_alphanumeric = text.chars().any(char::is_alphanumeric);
        let kind = Self::kind_of(&text, has_lowercase, has_alphanumeric);
        Self {
            is_word: is_word(&text),
            text,
            kind,
            has_lowercase,
            has_alphanumeric,
        }
    }

    fn kind_of(text: &str, has_lowercase: bool, has_alphanumeric: bool) -> TokenKind {
        let wrapped = |open: char, close: char| {
            text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close)
        };

        if wrapped('(', ')') {
            return TokenKind::Parenthesized;
        }
        if wrapped('{', '}') {
            return TokenKind::Braced;
        }
        if wrapped('[', ']') {
            return TokenKind::Bracketed;
        }
        if !text.is_empty() && !has_lowercase && text.chars().all(char::is_alphabetic) {
            return TokenKind::Uppercase;
        }
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            return TokenKind::Digits;
        }

        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !c.is_alphanumeric() {
                return if is_pause_char(c) {
                    TokenKind::Pause
                } else {
                    TokenKind::Symbol
                };
            }
        }

        if has_alphanumeric && !has_lowercase {
            TokenKind::Mixed
        } else {
            TokenKind::Text
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Letters/digits/hyphens only, with at least one letter or digit
    pub fn is_word(&self) -> bool {
        self.is_word
    }

    pub fn has_lowercase(&self) -> bool {
        self.has_lowercase
    }

    /// Contains alphanumerics but no lowercase letter
    pub fn is_spellable(&self) -> bool {
        self.has_alphanumeric && !self.has_lowercase
    }

    /// Text between the delimiters of a parenthesized/braced/bracketed token
    pub fn inner(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Parenthesized | TokenKind::Braced | TokenKind::Bracketed => {
                Some(&self.text[1..self.text.len() - 1])
            }
            _ => None,
        }
    }

    /// The single character of a pause/symbol token
    pub fn single_char(&self) -> Option<char> {
        match self.kind {
            TokenKind::Pause | TokenKind::Symbol => self.text.chars().next(),
            _ => None,
        }
    }
}
