// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale maps for JSON/YAML consumers
//!
//! Only servable translations are exported, so the map answers exactly what
//! a [`crate::catalog::Catalog`] built from the same file would. Entries
//! with a `msgctxt` are keyed `context\u{4}msgid`, the separator gettext
//! uses in compiled catalogs.

use crate::locale::Locale;
use crate::po;
use crate::report::ReportOutputFormat;
use crate::types::PoFile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Separator between context and msgid in exported keys.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleExport {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_forms: Option<String>,
    /// Singular messages without context.
    pub messages: BTreeMap<String, String>,
    /// Plural messages without context, keyed by the singular msgid.
    pub plurals: BTreeMap<String, Vec<String>>,
    /// Every message with a context, singular or plural.
    pub contexts: BTreeMap<String, Vec<String>>,
}

impl LocaleExport {
    pub fn from_po(file: &PoFile, locale: &Locale) -> Self {
        let mut export = LocaleExport {
            locale: locale.to_string(),
            plural_forms: file.header_field("Plural-Forms").map(str::to_string),
            messages: BTreeMap::new(),
            plurals: BTreeMap::new(),
            contexts: BTreeMap::new(),
        };

        for entry in file.entries.iter().filter(|e| e.is_servable()) {
            match &entry.msgctxt {
                Some(ctx) => {
                    let key = format!("{}{}{}", ctx, CONTEXT_SEPARATOR, entry.msgid);
                    export
                        .contexts
                        .entry(key)
                        .or_insert_with(|| entry.msgstr.clone());
                }
                None if entry.is_plural() => {
                    export
                        .plurals
                        .entry(entry.msgid.clone())
                        .or_insert_with(|| entry.msgstr.clone());
                }
                None => {
                    if let Some(text) = entry.msgstr.first() {
                        export
                            .messages
                            .entry(entry.msgid.clone())
                            .or_insert_with(|| text.clone());
                    }
                }
            }
        }
        export
    }

    pub fn len(&self) -> usize {
        self.messages.len() + self.plurals.len() + self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Export the catalog at `path`, naming its locale from the file name or
/// header.
pub fn export_file(path: &Path, format: ReportOutputFormat) -> Result<String> {
    let file = po::read_file(path)?;
    let locale = crate::catalog::infer_locale(path, &file)
        .with_context(|| format!("cannot determine the locale of {}", path.display()))?;
    let export = LocaleExport::from_po(&file, &locale);
    tracing::debug!(path = %path.display(), %locale, messages = export.len(), "exported catalog");
    format.serialize(&export)
}
