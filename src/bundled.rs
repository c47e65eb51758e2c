// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalogs shipped with the identity module.
//!
//! The template and every translated locale are embedded at compile time and
//! parsed on first use. The embedded files are canonical: writing them back
//! out reproduces them byte for byte.
//!
//! ## Adding a locale
//!
//! 1. Create `locales/<locale>.po` from `locales/python-fedora.pot`
//! 2. Add it to [`LOCALES`]
//! 3. Run `fas-locale lint locales/<locale>.po --template locales/python-fedora.pot`

use crate::catalog::{Catalog, Library};
use crate::locale::Locale;
use crate::po;
use crate::types::PoFile;
use std::sync::OnceLock;

/// Gettext domain of the bundled catalogs.
pub const DOMAIN: &str = "python-fedora";

/// Language the msgids are written in.
pub const SOURCE_LOCALE: &str = "en";

pub const TEMPLATE: &str = include_str!("../locales/python-fedora.pot");

/// `(locale, file contents)` for every bundled translation.
pub const LOCALES: &[(&str, &str)] = &[
    ("de", include_str!("../locales/de.po")),
    ("es", include_str!("../locales/es.po")),
    ("fr", include_str!("../locales/fr.po")),
    ("ja", include_str!("../locales/ja.po")),
    ("pt_BR", include_str!("../locales/pt_BR.po")),
    ("sv", include_str!("../locales/sv.po")),
];

static LIBRARY: OnceLock<Library> = OnceLock::new();
static TEMPLATE_FILE: OnceLock<Option<PoFile>> = OnceLock::new();

/// Bundled catalogs, parsed once.
pub fn library() -> &'static Library {
    LIBRARY.get_or_init(build_library)
}

/// Parsed template, or `None` if it fails to parse.
pub fn template() -> Option<&'static PoFile> {
    TEMPLATE_FILE
        .get_or_init(|| match po::parse(TEMPLATE) {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::warn!(%err, "bundled template does not parse");
                None
            }
        })
        .as_ref()
}

fn build_library() -> Library {
    let source = Locale {
        language: SOURCE_LOCALE.to_string(),
        territory: None,
        variant: None,
    };
    let mut library = Library::new(DOMAIN, source);
    for &(code, text) in LOCALES {
        let locale = match Locale::parse(code) {
            Ok(locale) => locale,
            Err(err) => {
                tracing::warn!(code, %err, "skipping bundled catalog");
                continue;
            }
        };
        match po::parse(text) {
            Ok(file) => {
                library.insert(Catalog::from_po(&file, locale));
            }
            Err(err) => tracing::warn!(%locale, %err, "skipping bundled catalog"),
        }
    }
    library
}

/// Translate `msgid` into `locale` using the bundled catalogs.
///
/// Unknown locales and missing messages give back `msgid`.
pub fn t(locale: &str, msgid: &str) -> String {
    match Locale::parse(locale) {
        Ok(locale) => library().translator(&locale).gettext(msgid).to_string(),
        Err(_) => msgid.to_string(),
    }
}
