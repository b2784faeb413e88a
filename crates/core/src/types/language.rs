//! Supported interface languages.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`LanguageCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    /// The code is not on the allow-list.
    #[error("unsupported language code '{0}'")]
    Unsupported(String),
}

/// A language the site is translated into.
///
/// The allow-list is fixed: German is the primary language and the default,
/// English and French follow.
///
/// ```
/// use bistro_core::LanguageCode;
///
/// assert_eq!("en".parse::<LanguageCode>(), Ok(LanguageCode::En));
/// assert!("xx".parse::<LanguageCode>().is_err());
/// assert_eq!(LanguageCode::default(), LanguageCode::De);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    De,
    En,
    Fr,
}

impl LanguageCode {
    /// Every supported language, primary first.
    pub const ALL: [Self; 3] = [Self::De, Self::En, Self::Fr];

    /// Two-letter code as used in storage and translation file names.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Whether this is the default language.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            other => Err(LanguageError::Unsupported(other.to_owned())),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
