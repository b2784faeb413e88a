//! Customization choices and the option catalog they refer to.

use std::collections::BTreeSet;

use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Fries slug meaning "no fries".
pub const NO_FRIES: &str = "none";

/// Fries slug that is free for products that include sides.
pub const INCLUDED_FRIES: &str = "regular-fries";

/// Slug of a customization option (sauce, fries or extra).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSlug(String);

impl OptionSlug {
    /// Wrap a slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OptionSlug {
    fn from(slug: String) -> Self {
        Self(slug)
    }
}

impl From<&str> for OptionSlug {
    fn from(slug: &str) -> Self {
        Self(slug.to_owned())
    }
}

/// The options a customer picked for one line.
///
/// Extras are a set and always iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub sauce: Option<OptionSlug>,
    pub fries: Option<OptionSlug>,
    #[serde(default)]
    pub extras: BTreeSet<OptionSlug>,
    pub removal_notes: Option<String>,
    pub special_instructions: Option<String>,
}

impl Customization {
    /// No choices at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the sauce.
    #[must_use]
    pub fn with_sauce(mut self, slug: impl Into<OptionSlug>) -> Self {
        self.sauce = Some(slug.into());
        self
    }

    /// Set the fries choice.
    #[must_use]
    pub fn with_fries(mut self, slug: impl Into<OptionSlug>) -> Self {
        self.fries = Some(slug.into());
        self
    }

    /// Add an extra.
    #[must_use]
    pub fn with_extra(mut self, slug: impl Into<OptionSlug>) -> Self {
        self.extras.insert(slug.into());
        self
    }

    /// Set the removal notes ("no onions").
    #[must_use]
    pub fn with_removal_notes(mut self, notes: impl Into<String>) -> Self {
        self.removal_notes = Some(notes.into());
        self
    }

    /// Set free-text instructions for the kitchen.
    #[must_use]
    pub fn with_special_instructions(mut self, text: impl Into<String>) -> Self {
        self.special_instructions = Some(text.into());
        self
    }

    /// Extras joined with `,` in sorted order.
    #[must_use]
    pub fn extras_key(&self) -> String {
        self.extras
            .iter()
            .map(OptionSlug::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One selectable option as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub slug: OptionSlug,
    pub name: String,
    /// Add-on price; `None` means the option is free.
    #[serde(default)]
    pub price: Option<Price>,
}

/// Read-only catalog of sauces, fries and extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationCatalog {
    #[serde(default)]
    pub sauces: Vec<CustomizationOption>,
    #[serde(default)]
    pub fries: Vec<CustomizationOption>,
    #[serde(default)]
    pub extras: Vec<CustomizationOption>,
}

impl CustomizationCatalog {
    /// Look up a fries option by slug.
    #[must_use]
    pub fn fries_option(&self, slug: &OptionSlug) -> Option<&CustomizationOption> {
        self.fries.iter().find(|option| &option.slug == slug)
    }
}
