// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale identifiers and fallback chains.
//!
//! Accepts the POSIX forms gettext uses: `ll`, `ll_CC`, `ll-CC`,
//! `ll_CC.UTF-8`, `ll@variant`. The codeset is dropped; lookups walk from
//! the most specific form to the bare language.

mod iso639;

pub use iso639::{is_known_language, is_valid_iso639_1, language_name};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("invalid locale identifier: {0:?}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    pub language: String,
    pub territory: Option<String>,
    pub variant: Option<String>,
}

impl Locale {
    pub fn parse(value: &str) -> Result<Self, LocaleError> {
        let invalid = || LocaleError::Invalid(value.to_string());
        let trimmed = value.trim();
        let (main, variant) = match trimmed.split_once('@') {
            Some((main, variant)) => (main, Some(variant)),
            None => (trimmed, None),
        };
        let main = main.split('.').next().unwrap_or(main);
        let (language, territory) = match main.split_once(['_', '-']) {
            Some((lang, territory)) => (lang, Some(territory)),
            None => (main, None),
        };

        let language_ok = (2..=3).contains(&language.len())
            && language.bytes().all(|b| b.is_ascii_alphabetic());
        if !language_ok {
            return Err(invalid());
        }
        let territory = match territory {
            Some(t)
                if (t.len() == 2 && t.bytes().all(|b| b.is_ascii_alphabetic()))
                    || (t.len() == 3 && t.bytes().all(|b| b.is_ascii_digit())) =>
            {
                Some(t.to_ascii_uppercase())
            }
            Some(_) => return Err(invalid()),
            None => None,
        };
        let variant = match variant {
            Some(v) if !v.is_empty() && v.bytes().all(|b| b.is_ascii_alphanumeric()) => {
                Some(v.to_ascii_lowercase())
            }
            Some(_) => return Err(invalid()),
            None => None,
        };

        Ok(Locale {
            language: language.to_ascii_lowercase(),
            territory,
            variant,
        })
    }

    /// Bare-language locale, e.g. `sv`.
    pub fn language_only(&self) -> Locale {
        Locale {
            language: self.language.clone(),
            territory: None,
            variant: None,
        }
    }

    /// Most specific first: `ll_CC@v`, `ll_CC`, `ll@v`, `ll`.
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        if self.territory.is_some() && self.variant.is_some() {
            chain.push(Locale {
                variant: None,
                ..self.clone()
            });
            chain.push(Locale {
                territory: None,
                ..self.clone()
            });
        }
        let bare = self.language_only();
        if !chain.contains(&bare) {
            chain.push(bare);
        }
        chain
    }

    /// Locale requested by the environment, following gettext's order:
    /// `LANGUAGE` (first entry), `LC_ALL`, `LC_MESSAGES`, `LANG`.
    pub fn from_env() -> Option<Locale> {
        let language = std::env::var("LANGUAGE").ok().and_then(|v| {
            v.split(':')
                .find(|s| !s.is_empty())
                .map(str::to_string)
        });
        language
            .into_iter()
            .chain(
                ["LC_ALL", "LC_MESSAGES", "LANG"]
                    .iter()
                    .filter_map(|key| std::env::var(key).ok()),
            )
            .filter(|v| !v.is_empty() && v.as_str() != "C" && v.as_str() != "POSIX")
            .find_map(|v| Locale::parse(&v).ok())
    }

    /// English language name plus territory, e.g. `Portuguese (BR)`.
    pub fn display_name(&self) -> String {
        let name = language_name(&self.language).unwrap_or(self.language.as_str());
        match &self.territory {
            Some(t) => format!("{} ({})", name, t),
            None => name.to_string(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(t) = &self.territory {
            write!(f, "_{}", t)?;
        }
        if let Some(v) = &self.variant {
            write!(f, "@{}", v)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
