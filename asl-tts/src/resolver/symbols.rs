//! Character → sound-name tables for single-symbol tokens
//!
//! Two disjoint tables exist. Digit-like symbols resolve under `digits/`,
//! letter-like symbols under `letters/`. `*` could belong to either
//! (`digits/star` or `letters/asterisk`); it lives only in the letter-like
//! table, so it always resolves to `letters/asterisk`.
//!
//! Characters missing from both tables are either pause characters (handled
//! as silence) or escape delimiters the tokenizer never emits alone.

/// Symbols spoken with a `digits/` sound
pub const DIGIT_SYMBOLS: &[(char, &str)] = &[('#', "pound")];

/// Symbols spoken with a `letters/` sound
pub const LETTER_SYMBOLS: &[(char, &str)] = &[
    ('=', "equals"),
    ('*', "asterisk"),
    ('"', "ascii34"),
    ('?', "ascii63"),
    ('`', "ascii96"),
    ('|', "ascii124"),
    ('&', "ascii38"),
    ('\'', "ascii39"),
    ('>', "ascii62"),
    ('+', "plus"),
    ('\\', "ascii92"),
    ('!', "exclaimation-point"),
    ('$', "ascii36"),
    ('/', "slash"),
    ('@', "at"),
    (')', "ascii41"),
    ('~', "ascii126"),
    ('^', "ascii94"),
    ('_', "ascii95"),
    ('(', "ascii40"),
    ('%', "ascii37"),
    ('<', "ascii60"),
];

fn lookup(table: &[(char, &'static str)], c: char) -> Option<&'static str> {
    table
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, name)| *name)
}

/// Namespaced sound key for a symbol, digit-like table first
pub fn symbol_key(c: char) -> Option<String> {
    if let Some(name) = lookup(DIGIT_SYMBOLS, c) {
        return Some(format!("digits/{name}"));
    }
    lookup(LETTER_SYMBOLS, c).map(|name| format!("letters/{name}"))
}
