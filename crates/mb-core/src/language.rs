//! Supported display languages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display language. The stored code is the upper-case tag (`KR`, `EN`, `JA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Korean
    #[default]
    #[serde(rename = "KR")]
    Kr,
    /// English
    #[serde(rename = "EN")]
    En,
    /// Japanese
    #[serde(rename = "JA")]
    Ja,
}

impl Language {
    /// All supported languages, in switcher order
    pub const ALL: [Language; 3] = [Language::Kr, Language::En, Language::Ja];

    /// Persisted / wire code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Kr => "KR",
            Language::En => "EN",
            Language::Ja => "JA",
        }
    }

    /// Name of the language written in itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Kr => "한국어",
            Language::En => "ENGLISH",
            Language::Ja => "日本語",
        }
    }

    /// English name, used when instructing the recommendation service
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::Kr => "Korean",
            Language::En => "English",
            Language::Ja => "Japanese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unrecognized language code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KR" | "KO" => Ok(Language::Kr),
            "EN" => Ok(Language::En),
            "JA" | "JP" => Ok(Language::Ja),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}
