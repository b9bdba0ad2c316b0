//! Downgrade module: rewrite a regular expression as an equality or a
//! wildcard (`LIKE`) pattern when that loses nothing.
//!
//! The conversion runs as a fixed sequence of passes over the pattern text:
//!
//! 1. reject repetition of anything but "any character" and multi-character
//!    classes outright;
//! 2. strip `^`/`$` anchors, remembering which ends are open;
//! 3. tokenize the body: `[x]` and `\x` (punctuation other than `<`/`>`)
//!    become literals, `.*` becomes a multi-character wildcard, `.` a
//!    single-character wildcard, and any remaining regex syntax aborts the
//!    downgrade;
//! 4. open ends get a multi-character wildcard, and runs of them collapse;
//! 5. render with `%`/`_` as wildcards and `\` as the escape character.
//!
//! Whatever cannot be expressed comes back as [`Mode::Native`] with the
//! original source untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape a regular expression downgrades to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Equals,
    Like,
    Native,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Equals => "equals",
            Mode::Like => "like",
            Mode::Native => "native",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`convert_regex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub mode: Mode,
    pub case_sensitive: bool,
    /// Wildcard pattern for `Like`, escaped literal for `Equals`, the
    /// untouched regex for `Native`.
    pub source: String,
}

impl Conversion {
    /// The source with wildcard escapes removed, for use as a plain value.
    pub fn literal(&self) -> String {
        unescape_like(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
}

/// Downgrade `pattern` to the simplest fragment shape that matches the
/// same strings.
pub fn convert_regex(pattern: &str, case_insensitive: bool) -> Conversion {
    let case_sensitive = !case_insensitive;
    match to_like(pattern) {
        Some((rendered, has_wildcard)) => Conversion {
            mode: if has_wildcard { Mode::Like } else { Mode::Equals },
            case_sensitive,
            source: rendered,
        },
        None => Conversion {
            mode: Mode::Native,
            case_sensitive,
            source: pattern.to_string(),
        },
    }
}

fn to_like(pattern: &str) -> Option<(String, bool)> {
    if has_unconvertible_repetition(pattern) || has_wide_class(pattern) {
        return None;
    }
    let (open_start, body, open_end) = strip_anchors(pattern);
    let body = tokenize(body)?;

    let mut tokens = Vec::with_capacity(body.len() + 2);
    if open_start {
        tokens.push(Token::AnyRun);
    }
    tokens.extend(body);
    if open_end {
        tokens.push(Token::AnyRun);
    }
    tokens.dedup_by(|a, b| *a == Token::AnyRun && *b == Token::AnyRun);

    let has_wildcard = tokens.iter().any(|t| !matches!(t, Token::Literal(_)));
    Some((render(&tokens), has_wildcard))
}

/// `x*` where `x` is anything but `.`: repetition of a specific character or
/// class has no wildcard equivalent.
fn has_unconvertible_repetition(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    chars.windows(2).any(|w| w[1] == '*' && w[0] != '.')
}

/// A bracket class with two or more characters between the brackets, on one
/// line. Tracks the first `[` of the current line, which gives the widest
/// span for any later `]`.
fn has_wide_class(pattern: &str) -> bool {
    let mut open = None;
    for (i, c) in pattern.chars().enumerate() {
        match c {
            '\n' => open = None,
            '[' if open.is_none() => open = Some(i),
            ']' if open.is_some_and(|start| i >= start + 3) => return true,
            _ => {}
        }
    }
    false
}

fn strip_anchors(pattern: &str) -> (bool, &str, bool) {
    let (open_start, rest) = match pattern.strip_prefix('^') {
        Some(rest) => (false, rest),
        None => (true, pattern),
    };
    match rest.strip_suffix('$') {
        Some(body) if !ends_with_escape(body) => (open_start, body, false),
        _ => (open_start, rest, true),
    }
}

/// Whether the text ends in an unpaired backslash.
fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn tokenize(body: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = body.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                // single-character class used as an escape, e.g. `[.]`
                match (chars.get(i + 1), chars.get(i + 2)) {
                    (Some(&x), Some(']')) if x != '\n' => {
                        tokens.push(Token::Literal(x));
                        i += 3;
                    }
                    _ => return None,
                }
            }
            '\\' => {
                let x = *chars.get(i + 1)?;
                if !is_escaped_literal(x) {
                    return None;
                }
                tokens.push(Token::Literal(x));
                i += 2;
            }
            '.' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::AnyRun);
                i += 2;
            }
            '.' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            ']' | '(' | ')' | '{' | '}' | '*' | '+' | '?' | '|' | '^' | '$' => return None,
            _ => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }
    Some(tokens)
}

/// Whether `\x` is a plain literal in the regex engine. `\<` and `\>` are
/// word-boundary assertions, letters and digits are classes or assertions.
fn is_escaped_literal(x: char) -> bool {
    x.is_ascii_punctuation() && !matches!(x, '<' | '>')
}

fn render(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.len() + 4);
    for token in tokens {
        match token {
            Token::Literal(c) => {
                if matches!(c, '%' | '_' | '\\') {
                    out.push('\\');
                }
                out.push(*c);
            }
            Token::AnyChar => out.push('_'),
            Token::AnyRun => out.push('%'),
        }
    }
    out
}

/// Escape `%`, `_` and `\` so `text` matches itself in a wildcard pattern.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape_like`] for a pattern without wildcards.
pub fn unescape_like(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}
