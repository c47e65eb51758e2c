// SPDX-License-Identifier: PMPL-1.0-or-later

//! Gettext portable-object codec
//!
//! [`parse`] and [`write`] are inverse on canonical files; [`read_file`]
//! adds charset detection for catalogs that are not UTF-8.

pub mod escape;
pub mod header;
pub mod parser;
pub mod writer;

use crate::types::PoFile;
use anyhow::{Context, Result};
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;

pub use header::REQUIRED_FIELDS;
pub use parser::{parse, ParseError};
pub use writer::{write, write_entry};

/// Read and parse a catalog from disk.
pub fn read_file(path: &Path) -> Result<PoFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let content = decode(&bytes, path);
    parse(&content).with_context(|| format!("parsing {}", path.display()))
}

/// A catalog as stored on disk next to its canonical UTF-8 rewrite.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub original: Vec<u8>,
    pub canonical: String,
}

impl Normalized {
    pub fn is_canonical(&self) -> bool {
        self.original == self.canonical.as_bytes()
    }
}

/// Read a catalog and produce its canonical form.
///
/// Decoding follows [`read_file`]. Catalogs that were not UTF-8 on disk
/// are re-declared as `charset=UTF-8`, since the canonical form always is.
pub fn normalize_file(path: &Path) -> Result<Normalized> {
    let original = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = decode(&original, path);
    let mut file = parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    if std::str::from_utf8(&original).is_err() {
        if let Some(header) = &mut file.header {
            header.set_charset("UTF-8");
        }
    }
    Ok(Normalized {
        canonical: write(&file),
        original,
    })
}

/// Decode catalog bytes: UTF-8 first, then the header's declared charset,
/// then Windows-1252.
pub fn decode(bytes: &[u8], path: &Path) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').unwrap_or(s).to_string(),
        Err(_) => {
            let encoding = sniff_charset(bytes)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
                .unwrap_or(encoding_rs::WINDOWS_1252);
            let (cow, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                tracing::warn!(
                    path = %path.display(),
                    encoding = encoding.name(),
                    "catalog contains undecodable bytes"
                );
            } else {
                tracing::debug!(
                    path = %path.display(),
                    encoding = encoding.name(),
                    "decoded non-UTF-8 catalog"
                );
            }
            cow.into_owned()
        }
    }
}

/// Find `charset=` in the raw header; the header is ASCII in every
/// charset gettext supports.
fn sniff_charset(bytes: &[u8]) -> Option<String> {
    let ascii: String = bytes
        .iter()
        .take(4096)
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect();
    let start = ascii.to_ascii_lowercase().find("content-type:")? + "content-type:".len();
    let value = ascii[start..].split("\\n").next()?;
    header::charset_from_content_type(value.trim_end_matches('"'))
        .map(|c| c.trim_end_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latin1_catalog() {
        let mut bytes = b"msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\nmsgid \"Welcome, %s\"\nmsgstr \"V".to_vec();
        bytes.push(0xe4);
        bytes.extend_from_slice(b"lkommen, %s\"\n");
        let text = decode(&bytes, Path::new("sv.po"));
        let file = parse(&text).unwrap();
        assert_eq!(file.entries[0].msgstr[0], "Välkommen, %s");
    }

    #[test]
    fn sniffs_declared_charset() {
        let bytes = b"\"Content-Type: text/plain; charset=KOI8-R\\n\"\n\xff";
        assert_eq!(sniff_charset(bytes).as_deref(), Some("KOI8-R"));
    }
}
