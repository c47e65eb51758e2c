// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lint rule table
//!
//! Ids are stable and appear in SARIF output; names are what the config
//! file and `--disable` use, though either form is accepted.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    PlaceholderMismatch,
    DuplicateMsgid,
    MalformedPlaceholder,
    HeaderFieldMissing,
    PluralFormsInvalid,
    PluralCountMismatch,
    Untranslated,
    Fuzzy,
    LanguageMismatch,
    UnknownLanguage,
    MissingFromTemplate,
    NotInTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown lint rule {0:?}")]
pub struct UnknownRule(pub String);

impl Rule {
    pub const ALL: [Rule; 12] = [
        Rule::PlaceholderMismatch,
        Rule::DuplicateMsgid,
        Rule::MalformedPlaceholder,
        Rule::HeaderFieldMissing,
        Rule::PluralFormsInvalid,
        Rule::PluralCountMismatch,
        Rule::Untranslated,
        Rule::Fuzzy,
        Rule::LanguageMismatch,
        Rule::UnknownLanguage,
        Rule::MissingFromTemplate,
        Rule::NotInTemplate,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Rule::PlaceholderMismatch => "PO001",
            Rule::DuplicateMsgid => "PO002",
            Rule::MalformedPlaceholder => "PO003",
            Rule::HeaderFieldMissing => "PO004",
            Rule::PluralFormsInvalid => "PO005",
            Rule::PluralCountMismatch => "PO006",
            Rule::Untranslated => "PO007",
            Rule::Fuzzy => "PO008",
            Rule::LanguageMismatch => "PO009",
            Rule::UnknownLanguage => "PO010",
            Rule::MissingFromTemplate => "PO011",
            Rule::NotInTemplate => "PO012",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::PlaceholderMismatch => "placeholder-mismatch",
            Rule::DuplicateMsgid => "duplicate-msgid",
            Rule::MalformedPlaceholder => "malformed-placeholder",
            Rule::HeaderFieldMissing => "header-field-missing",
            Rule::PluralFormsInvalid => "plural-forms-invalid",
            Rule::PluralCountMismatch => "plural-count-mismatch",
            Rule::Untranslated => "untranslated",
            Rule::Fuzzy => "fuzzy",
            Rule::LanguageMismatch => "language-mismatch",
            Rule::UnknownLanguage => "unknown-language",
            Rule::MissingFromTemplate => "missing-from-template",
            Rule::NotInTemplate => "not-in-template",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Rule::PlaceholderMismatch
            | Rule::DuplicateMsgid
            | Rule::MalformedPlaceholder
            | Rule::PluralFormsInvalid
            | Rule::PluralCountMismatch => Severity::Error,
            Rule::HeaderFieldMissing
            | Rule::LanguageMismatch
            | Rule::UnknownLanguage
            | Rule::MissingFromTemplate
            | Rule::NotInTemplate => Severity::Warning,
            Rule::Untranslated | Rule::Fuzzy => Severity::Info,
        }
    }

    /// One-line description, used as the SARIF short description.
    pub fn description(&self) -> &'static str {
        match self {
            Rule::PlaceholderMismatch => "Translation does not use the same placeholders as its msgid",
            Rule::DuplicateMsgid => "The same msgid (and context) is defined twice in one file",
            Rule::MalformedPlaceholder => "A '%' does not start a valid python-format placeholder",
            Rule::HeaderFieldMissing => "The header lacks Content-Type, Language or Plural-Forms",
            Rule::PluralFormsInvalid => "The Plural-Forms header cannot be parsed",
            Rule::PluralCountMismatch => "A plural entry has a different number of forms than nplurals",
            Rule::Untranslated => "The entry has no translation",
            Rule::Fuzzy => "The translation is marked fuzzy and will not be served",
            Rule::LanguageMismatch => "The Language header disagrees with the file name",
            Rule::UnknownLanguage => "The language is not an ISO 639 code",
            Rule::MissingFromTemplate => "A template msgid is absent from this locale",
            Rule::NotInTemplate => "This locale has a msgid the template does not",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rule {
    type Err = UnknownRule;

    /// Accepts either the id (`PO007`) or the name (`untranslated`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Rule::ALL
            .iter()
            .copied()
            .find(|r| r.id().eq_ignore_ascii_case(s) || r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRule(s.to_string()))
    }
}
