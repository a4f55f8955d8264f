use thiserror::Error;

use super::{cursor::Cursor, kinds::Shortcode};

/// Ordered key/value arguments of a shortcode.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps the
/// key at its original position, so `[t a=1 b=2 a=3]` iterates as `a=3, b=2`.
/// Values are kept exactly as written; `0` stays `"0"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    entries: Vec<(String, String)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

/// Why an argument list could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("unterminated {quote} quote opened at byte {offset}")]
    UnterminatedQuote { quote: char, offset: usize },

    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("argument list ended at byte {offset} before the tag was closed")]
    UnexpectedEnd { offset: usize },
}

/// Where an argument list stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminator {
    /// The whole input is the argument list.
    EndOfInput,
    /// Stop in front of `]` or `/]`, leaving the cursor on it.
    TagClose,
}

/// Parses a standalone argument list such as `foo="bar", baz=1 flag`.
///
/// Entries are separated by whitespace and/or commas. Values may be double
/// quoted, single quoted or bare; a bare key, or `key=` followed by nothing,
/// yields an empty value. Duplicate keys keep the last value.
pub fn parse_arguments(raw: &str) -> Result<Arguments, ArgumentError> {
    let mut cur = Cursor::new(raw, 0);
    read_arguments(&mut cur, Terminator::EndOfInput)
}

pub(crate) fn read_arguments(
    cur: &mut Cursor<'_>,
    until: Terminator,
) -> Result<Arguments, ArgumentError> {
    let mut args = Arguments::new();

    loop {
        cur.bump_while(Shortcode::is_separator);
        if at_terminator(cur, until) {
            return Ok(args);
        }
        let Some(b) = cur.peek() else {
            return Err(ArgumentError::UnexpectedEnd { offset: cur.pos() });
        };

        let key_start = cur.pos();
        if cur.bump_while(Shortcode::is_key_byte) == 0 {
            return Err(unexpected(cur, b));
        }
        let key = cur.text(key_start, cur.pos());

        // Whitespace may surround `=`; without `=` the key stands alone.
        let after_key = cur.clone();
        cur.bump_while(|b| b.is_ascii_whitespace());
        if cur.peek() == Some(Shortcode::ASSIGN) {
            cur.bump();
            cur.bump_while(|b| b.is_ascii_whitespace());
            let value = read_value(cur, until)?;
            args.insert(key, value);
        } else {
            *cur = after_key;
            args.insert(key, "");
        }
    }
}

fn read_value(cur: &mut Cursor<'_>, until: Terminator) -> Result<String, ArgumentError> {
    if let Some(quote) = cur.peek().filter(|&b| Shortcode::is_quote(b)) {
        let offset = cur.pos();
        cur.bump();
        let start = cur.pos();
        cur.bump_while(|b| b != quote);
        if cur.peek() != Some(quote) {
            return Err(ArgumentError::UnterminatedQuote {
                quote: quote as char,
                offset,
            });
        }
        let value = cur.text(start, cur.pos()).to_string();
        cur.bump();
        return Ok(value);
    }

    let start = cur.pos();
    while let Some(b) = cur.peek() {
        if Shortcode::is_separator(b) || at_terminator(cur, until) {
            break;
        }
        cur.bump();
    }
    Ok(cur.text(start, cur.pos()).to_string())
}

fn at_terminator(cur: &Cursor<'_>, until: Terminator) -> bool {
    match until {
        Terminator::EndOfInput => cur.eof(),
        Terminator::TagClose => {
            cur.peek() == Some(Shortcode::CLOSE) || cur.starts_with(Shortcode::SELF_CLOSE)
        }
    }
}

fn unexpected(cur: &Cursor<'_>, b: u8) -> ArgumentError {
    // Only reached on ASCII delimiters, so the byte is the whole char.
    let ch = cur.s[cur.i..].chars().next().unwrap_or(b as char);
    ArgumentError::UnexpectedCharacter {
        ch,
        offset: cur.pos(),
    }
}
