// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for fas-locale
//!
//! A parsed `.po` file is a [`PoFile`]: an optional [`Header`] followed by
//! ordered [`Entry`] blocks. Lint output is expressed as [`Finding`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flag marking a string interpolated with Python `%` formatting.
pub const FLAG_PYTHON_FORMAT: &str = "python-format";
/// Flag explicitly opting a string out of placeholder checks.
pub const FLAG_NO_PYTHON_FORMAT: &str = "no-python-format";
/// Flag marking a translation that needs review; never served.
pub const FLAG_FUZZY: &str = "fuzzy";

/// Source reference from a `#:` comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Location {
    /// Parse a single `#:` token such as `fedora/tg/identity/jsonfasprovider2.py:59`.
    pub fn parse(token: &str) -> Self {
        if let Some((file, line)) = token.rsplit_once(':') {
            if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(line) = line.parse::<u32>() {
                    return Location {
                        file: file.to_string(),
                        line: Some(line),
                    };
                }
            }
        }
        Location {
            file: token.to_string(),
            line: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// One translation entry.
///
/// Equality ignores `line`: two entries are equal when they carry the same
/// content, wherever it sat in the file.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// 1-based line of the first keyword (`msgctxt` or `msgid`).
    #[serde(default)]
    pub line: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translator_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracted_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Raw `#|` lines, kept verbatim without the marker.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous: Vec<String>,
    #[serde(default)]
    pub obsolete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msgctxt: Option<String>,
    pub msgid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msgid_plural: Option<String>,
    /// `msgstr` for singular entries is index 0; plural entries use `msgstr[n]`.
    pub msgstr: Vec<String>,
}

impl Entry {
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Entry {
            msgid: msgid.into(),
            msgstr: vec![msgstr.into()],
            ..Default::default()
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag(FLAG_FUZZY)
    }

    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    /// True when every msgstr is non-empty.
    pub fn is_translated(&self) -> bool {
        !self.msgstr.is_empty() && self.msgstr.iter().all(|s| !s.is_empty())
    }

    /// True when the entry may be served at runtime.
    pub fn is_servable(&self) -> bool {
        !self.obsolete && !self.is_fuzzy() && self.is_translated()
    }

    /// `(msgctxt, msgid)` identity used for uniqueness and lookup.
    pub fn key(&self) -> MessageKey {
        MessageKey {
            context: self.msgctxt.clone(),
            msgid: self.msgid.clone(),
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.translator_comments == other.translator_comments
            && self.extracted_comments == other.extracted_comments
            && self.locations == other.locations
            && self.flags == other.flags
            && self.previous == other.previous
            && self.obsolete == other.obsolete
            && self.msgctxt == other.msgctxt
            && self.msgid == other.msgid
            && self.msgid_plural == other.msgid_plural
            && self.msgstr == other.msgstr
    }
}

/// Identity of a message within one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageKey {
    pub context: Option<String>,
    pub msgid: String,
}

impl MessageKey {
    pub fn new(context: Option<&str>, msgid: &str) -> Self {
        MessageKey {
            context: context.map(str::to_string),
            msgid: msgid.to_string(),
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "[{}] {:?}", ctx, self.msgid),
            None => write!(f, "{:?}", self.msgid),
        }
    }
}

/// Metadata fields of the header entry, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Comments and flags attached to the header entry.
    #[serde(default)]
    pub entry: Entry,
    pub fields: Vec<(String, String)>,
}

/// A parsed `.po` or `.pot` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub entries: Vec<Entry>,
}

impl PoFile {
    /// Header field lookup, case-insensitive on the field name.
    pub fn header_field(&self, name: &str) -> Option<&str> {
        self.header.as_ref().and_then(|h| h.get(name))
    }

    /// Entries that are not obsolete.
    pub fn active_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.obsolete)
    }
}

/// Lint severity, mapped directly onto SARIF levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// A single lint result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    /// `path:line` of the offending entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
