//! Chord normalization.
//!
//! A chord's canonical form is its modifiers in the fixed order
//! `control, alt, shift, meta` followed by the base key, lower-cased and
//! joined with `+` (`"control+shift+k"`). Two spellings that canonicalize to
//! the same string are the same chord.

use std::fmt;

use thiserror::Error;

use crate::input::{InputEvent, Modifiers};

/// Errors that can occur when parsing a chord string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutParseError {
    #[error("shortcut string is empty")]
    Empty,
    #[error("shortcut has no key, only modifiers")]
    MissingKey,
}

/// A normalized keyboard chord.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Chord {
    pub fn new(key: &str, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: canonicalize_key(key),
        }
    }

    /// Parse a chord such as `"Ctrl+Shift+K"`, `"cmd + enter"`, or `"ctrl++"`.
    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        // A trailing "+" after a separator (or on its own) is the plus key.
        let (body, plus_key) = match compact.strip_suffix('+') {
            Some(rest) if rest.is_empty() || rest.ends_with('+') => {
                (rest.trim_end_matches('+'), true)
            }
            _ => (compact.as_str(), false),
        };

        let mut modifiers = Modifiers::default();
        let mut key: Option<String> = None;

        for token in body.split('+').filter(|t| !t.is_empty()) {
            let lower = token.to_lowercase();
            if !apply_modifier(&mut modifiers, &lower) {
                // Last non-modifier token wins as the base key
                key = Some(canonicalize_key(&lower));
            }
        }

        if plus_key {
            key = Some("+".to_string());
        }

        let key = key.ok_or(ShortcutParseError::MissingKey)?;
        Ok(Self { modifiers, key })
    }

    /// Chord produced by a key event.
    pub fn from_event(event: &InputEvent) -> Self {
        Self::new(&event.key, event.modifiers)
    }

    pub fn to_canonical_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(5);
        if self.modifiers.control {
            parts.push("control");
        }
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        if self.modifiers.meta {
            parts.push("meta");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

/// Set the modifier named by `token`. Returns false for anything that is not a
/// recognized modifier name.
fn apply_modifier(modifiers: &mut Modifiers, token: &str) -> bool {
    match token {
        "control" | "ctrl" => modifiers.control = true,
        "alt" | "option" | "opt" => modifiers.alt = true,
        "shift" => modifiers.shift = true,
        "meta" | "cmd" | "command" | "super" | "win" => modifiers.meta = true,
        _ => return false,
    }
    true
}

/// Canonicalize a key name. Unrecognized names pass through lower-cased.
pub fn canonicalize_key(key: &str) -> String {
    if key == " " {
        return "space".to_string();
    }
    let key_lower: String = key
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    match key_lower.as_str() {
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        "return" => "enter",
        "esc" => "escape",
        "spacebar" => "space",
        "del" => "delete",
        "ctrl" => "control",
        "cmd" | "os" => "meta",
        _ => return key_lower,
    }
    .to_string()
}
