//! # Label Dictionary
//!
//! Translates human-readable header labels into caller-defined column keys.
//! Entries are tested in order and the first match wins.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// How a dictionary entry recognises a normalized label
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact comparison against the normalized label
    Literal(String),
    /// Unanchored regex search over the normalized label
    Pattern(Regex),
}

impl Matcher {
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Compile a pattern matcher; `key` is only used for error reporting
    pub fn pattern(key: &str, pattern: &str) -> ParsingResult<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| ParsingError::InvalidPattern {
                key: key.to_string(),
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Self::Literal(text) => text == label,
            Self::Pattern(regex) => regex.is_match(label),
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// One `key -> matcher` dictionary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LabelEntryConfig", into = "LabelEntryConfig")]
pub struct LabelEntry {
    pub key: String,
    pub matcher: Matcher,
}

/// Serialized form of a [`LabelEntry`]: exactly one of `literal` or `pattern`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntryConfig {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl TryFrom<LabelEntryConfig> for LabelEntry {
    type Error = ParsingError;

    fn try_from(config: LabelEntryConfig) -> ParsingResult<Self> {
        let matcher = match (config.literal, config.pattern) {
            (Some(text), None) => Matcher::Literal(text),
            (None, Some(pattern)) => Matcher::pattern(&config.key, &pattern)?,
            (Some(_), Some(_)) => {
                return Err(ParsingError::InvalidDictionaryEntry {
                    key: config.key,
                    reason: "both 'literal' and 'pattern' are set".to_string(),
                });
            }
            (None, None) => {
                return Err(ParsingError::InvalidDictionaryEntry {
                    key: config.key,
                    reason: "one of 'literal' or 'pattern' is required".to_string(),
                });
            }
        };
        Ok(Self {
            key: config.key,
            matcher,
        })
    }
}

impl From<LabelEntry> for LabelEntryConfig {
    fn from(entry: LabelEntry) -> Self {
        let (literal, pattern) = match entry.matcher {
            Matcher::Literal(text) => (Some(text), None),
            Matcher::Pattern(regex) => (None, Some(regex.as_str().to_string())),
        };
        Self {
            key: entry.key,
            literal,
            pattern,
        }
    }
}

/// Ordered label dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelDictionary {
    entries: Vec<LabelEntry>,
}

impl LabelDictionary {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an exact-match entry
    #[must_use]
    pub fn literal(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.push(LabelEntry {
            key: key.into(),
            matcher: Matcher::literal(text),
        });
        self
    }

    /// Append a regex entry
    pub fn pattern(mut self, key: impl Into<String>, pattern: &str) -> ParsingResult<Self> {
        let key = key.into();
        let matcher = Matcher::pattern(&key, pattern)?;
        self.entries.push(LabelEntry { key, matcher });
        Ok(self)
    }

    pub fn push(&mut self, entry: LabelEntry) {
        self.entries.push(entry);
    }

    /// Key of the first entry matching `label`
    #[must_use]
    pub fn find_key(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.matcher.matches(label))
            .map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LabelEntry> for LabelDictionary {
    fn from_iter<I: IntoIterator<Item = LabelEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
