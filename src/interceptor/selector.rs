//! Allow-list selectors.
//!
//! Supported forms: `#id`, `.class`, `[attr]`, `[attr=value]`,
//! `[attr="value"]`, and a bare tag name. A selector matches an event when
//! the target or any of its ancestors matches.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::input::{ElementInfo, InputEvent};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported selector '{0}'")]
pub struct SelectorParseError(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementSelector {
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
    Tag(String),
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\[\s*([A-Za-z_][\w-]*)\s*(?:=\s*(?:"([^"]*)"|'([^']*)'|([^\]"'\s]+))\s*)?\]$"#)
            .expect("Invalid regex")
    })
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ElementSelector {
    pub fn parse(raw: &str) -> Result<Self, SelectorParseError> {
        let s = raw.trim();
        let err = || SelectorParseError(raw.to_string());

        if let Some(id) = s.strip_prefix('#') {
            return is_name(id).then(|| Self::Id(id.to_string())).ok_or_else(err);
        }
        if let Some(class) = s.strip_prefix('.') {
            return is_name(class)
                .then(|| Self::Class(class.to_string()))
                .ok_or_else(err);
        }
        if s.starts_with('[') {
            let caps = attribute_pattern().captures(s).ok_or_else(err)?;
            let name = caps[1].to_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            return Ok(Self::Attribute { name, value });
        }
        if is_name(s) {
            return Ok(Self::Tag(s.to_lowercase()));
        }
        Err(err())
    }

    pub fn matches_element(&self, element: &ElementInfo) -> bool {
        match self {
            Self::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Self::Class(class) => element.classes.iter().any(|c| c == class),
            Self::Attribute { name, value } => match (element.attributes.get(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
        }
    }

    /// True when the event's target or any ancestor matches.
    pub fn matches_event(&self, event: &InputEvent) -> bool {
        event.path.iter().any(|element| self.matches_element(element))
    }
}

impl fmt::Display for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attribute { name, value: None } => write!(f, "[{name}]"),
            Self::Attribute {
                name,
                value: Some(value),
            } => write!(f, "[{name}=\"{value}\"]"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Set of selectors exempt from interception.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    selectors: Vec<ElementSelector>,
}

impl AllowList {
    pub fn new(selectors: Vec<ElementSelector>) -> Self {
        Self { selectors }
    }

    /// Parse selector strings. Unsupported entries are dropped, so a typo
    /// narrows the allow-list instead of widening it.
    pub fn parse<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = raw
            .into_iter()
            .filter_map(|s| match ElementSelector::parse(s.as_ref()) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    warn!(error = %e, "Dropping allow-list entry");
                    None
                }
            })
            .collect();
        Self { selectors }
    }

    pub fn allows(&self, event: &InputEvent) -> bool {
        self.selectors.iter().any(|s| s.matches_event(event))
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}
