// SPDX-License-Identifier: PMPL-1.0-or-later

//! fas-locale: gettext catalogs for the FAS identity provider.
//!
//! The login pages, CSRF notices, wiki reports and visit-tracking log
//! messages of the identity module are translated through `.po` catalogs.
//! This crate ships those catalogs and the tooling around them.
//!
//! PILLARS:
//! 1. **Codec**: [`po`] parses and canonically re-serializes `.po` files,
//!    byte for byte on canonical input.
//! 2. **Lookup**: [`catalog`] answers gettext-style lookups with locale
//!    fallback, rendering python-format placeholders via [`placeholder`].
//! 3. **Lint**: [`lint`] enforces that every translation keeps its msgid's
//!    placeholders, plus header, plural and template consistency; [`sweep`]
//!    runs it over whole trees and [`report`] prints or exports the result.
//!
//! ```
//! assert_eq!(fas_locale::bundled::t("sv", "Welcome, %s"), "Välkommen, %s");
//! ```

pub mod bundled;
pub mod catalog;
pub mod config;
pub mod export;
pub mod lint;
pub mod locale;
pub mod placeholder;
pub mod plural;
pub mod po;
pub mod report;
pub mod sweep;
pub mod types;
