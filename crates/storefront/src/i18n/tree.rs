//! Translation trees and template interpolation.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Matches `{{name}}` placeholders.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid regex"));

/// Every display string for one language, as a nested JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTree(Map<String, Value>);

impl TranslationTree {
    /// A tree with no entries; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree from a JSON value. Returns `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Whether the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walk a dotted key. Returns `None` if a segment is missing or the value
    /// at the end is not a string.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        current.as_str()
    }
}

/// Replace each `{{name}}` with its variable. Unknown names stay literal.
#[must_use]
pub fn interpolate(template: &str, variables: &[(&str, &str)]) -> String {
    if variables.is_empty() {
        return template.to_owned();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            variables
                .iter()
                .find(|(key, _)| *key == name)
                .map_or_else(
                    || caps.get(0).map_or_else(String::new, |m| m.as_str().to_owned()),
                    |(_, value)| (*value).to_owned(),
                )
        })
        .into_owned()
}
