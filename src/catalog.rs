// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation lookup with locale fallback
//!
//! A [`Catalog`] is the read-only msgid -> msgstr table of one locale. A
//! [`Library`] holds every catalog of a domain, and hands out
//! [`Translator`]s that walk the locale fallback chain before returning the
//! source string. Nothing here mutates after load, so a `Library` can be
//! shared freely between threads.

use crate::locale::Locale;
use crate::placeholder::{self, FormatArgs, FormatError};
use crate::plural::PluralForms;
use crate::po;
use crate::types::{MessageKey, PoFile};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Servable translations of one locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    plural_forms: PluralForms,
    messages: HashMap<MessageKey, Vec<String>>,
}

impl Catalog {
    /// Build from a parsed file. Fuzzy, obsolete and untranslated entries
    /// are left out; a later duplicate never replaces the first entry.
    pub fn from_po(file: &PoFile, locale: Locale) -> Self {
        let plural_forms = match file.header.as_ref().and_then(|h| h.plural_forms()) {
            Some(Ok(forms)) => forms,
            Some(Err(err)) => {
                tracing::warn!(%locale, %err, "invalid Plural-Forms, using n != 1");
                PluralForms::germanic()
            }
            None => PluralForms::germanic(),
        };

        let mut messages = HashMap::new();
        for entry in file.entries.iter().filter(|e| e.is_servable()) {
            messages
                .entry(entry.key())
                .or_insert_with(|| entry.msgstr.clone());
        }

        Catalog {
            locale,
            plural_forms,
            messages,
        }
    }

    /// Parse `path` and build its catalog; the locale comes from the file
    /// name (`sv.po`, `sv/LC_MESSAGES/domain.po`) or the `Language` header.
    pub fn load(path: &Path) -> Result<Self> {
        let file = po::read_file(path)?;
        let locale = infer_locale(path, &file)
            .with_context(|| format!("cannot determine the locale of {}", path.display()))?;
        Ok(Catalog::from_po(&file, locale))
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn plural_forms(&self) -> &PluralForms {
        &self.plural_forms
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, context: Option<&str>, msgid: &str) -> Option<&str> {
        self.messages
            .get(&MessageKey::new(context, msgid))
            .and_then(|forms| forms.first())
            .map(String::as_str)
    }

    /// Plural lookup using this catalog's own Plural-Forms.
    pub fn get_plural(&self, context: Option<&str>, msgid: &str, n: u64) -> Option<&str> {
        let forms = self.messages.get(&MessageKey::new(context, msgid))?;
        let index = self.plural_forms.index(n);
        forms.get(index).or_else(|| forms.first()).map(String::as_str)
    }

    /// All servable messages, in no particular order.
    pub fn messages(&self) -> impl Iterator<Item = (&MessageKey, &[String])> {
        self.messages.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Locale named by the path alone: `<locale>/LC_MESSAGES/<domain>.po` or
/// `<locale>.po`.
pub fn locale_from_path(path: &Path) -> Option<Locale> {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let from_layout = path
        .parent()
        .filter(|p| p.file_name().and_then(|n| n.to_str()) == Some("LC_MESSAGES"))
        .and_then(Path::parent)
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());

    from_layout.or(stem).and_then(|s| Locale::parse(s).ok())
}

/// Locale from the file name, else from the `Language` header.
pub fn infer_locale(path: &Path, file: &PoFile) -> Option<Locale> {
    locale_from_path(path).or_else(|| {
        file.header
            .as_ref()
            .and_then(|h| h.language())
            .and_then(|l| Locale::parse(l).ok())
    })
}

/// Lookups for one requested locale.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    requested: Option<Locale>,
    chain: Vec<&'a Catalog>,
}

impl<'a> Translator<'a> {
    pub fn new(requested: Option<Locale>, chain: Vec<&'a Catalog>) -> Self {
        Translator { requested, chain }
    }

    /// Translator that always answers with the source strings.
    pub fn source() -> Self {
        Translator::new(None, Vec::new())
    }

    pub fn requested(&self) -> Option<&Locale> {
        self.requested.as_ref()
    }

    /// Locales consulted, most specific first.
    pub fn chain(&self) -> Vec<&Locale> {
        self.chain.iter().map(|c| c.locale()).collect()
    }

    pub fn gettext<'s>(&'s self, msgid: &'s str) -> &'s str {
        self.pgettext_opt(None, msgid)
    }

    pub fn pgettext<'s>(&'s self, context: &str, msgid: &'s str) -> &'s str {
        self.pgettext_opt(Some(context), msgid)
    }

    pub fn ngettext<'s>(&'s self, msgid: &'s str, msgid_plural: &'s str, n: u64) -> &'s str {
        self.npgettext_opt(None, msgid, msgid_plural, n)
    }

    pub fn npgettext<'s>(
        &'s self,
        context: &str,
        msgid: &'s str,
        msgid_plural: &'s str,
        n: u64,
    ) -> &'s str {
        self.npgettext_opt(Some(context), msgid, msgid_plural, n)
    }

    fn pgettext_opt<'s>(&'s self, context: Option<&str>, msgid: &'s str) -> &'s str {
        self.chain
            .iter()
            .find_map(|c| c.get(context, msgid))
            .unwrap_or(msgid)
    }

    fn npgettext_opt<'s>(
        &'s self,
        context: Option<&str>,
        msgid: &'s str,
        msgid_plural: &'s str,
        n: u64,
    ) -> &'s str {
        self.chain
            .iter()
            .find_map(|c| c.get_plural(context, msgid, n))
            .unwrap_or(if n == 1 { msgid } else { msgid_plural })
    }

    /// Translate and interpolate. A translation that fails to render is
    /// replaced by the rendered source string.
    pub fn format(&self, msgid: &str, args: &FormatArgs) -> Result<String, FormatError> {
        let translated = self.gettext(msgid);
        render_with_fallback(translated, msgid, args)
    }

    pub fn nformat(
        &self,
        msgid: &str,
        msgid_plural: &str,
        n: u64,
        args: &FormatArgs,
    ) -> Result<String, FormatError> {
        let translated = self.ngettext(msgid, msgid_plural, n);
        let source = if n == 1 { msgid } else { msgid_plural };
        render_with_fallback(translated, source, args)
    }

    pub fn pformat(
        &self,
        context: &str,
        msgid: &str,
        args: &FormatArgs,
    ) -> Result<String, FormatError> {
        let translated = self.pgettext(context, msgid);
        render_with_fallback(translated, msgid, args)
    }

    pub fn npformat(
        &self,
        context: &str,
        msgid: &str,
        msgid_plural: &str,
        n: u64,
        args: &FormatArgs,
    ) -> Result<String, FormatError> {
        let translated = self.npgettext(context, msgid, msgid_plural, n);
        let source = if n == 1 { msgid } else { msgid_plural };
        render_with_fallback(translated, source, args)
    }
}

fn render_with_fallback(
    translated: &str,
    source: &str,
    args: &FormatArgs,
) -> Result<String, FormatError> {
    match placeholder::format(translated, args) {
        Ok(text) => Ok(text),
        Err(err) if translated != source => {
            tracing::warn!(msgid = source, %err, "translation failed to render, using source string");
            placeholder::format(source, args)
        }
        Err(err) => Err(err),
    }
}

/// Every catalog of one gettext domain.
#[derive(Debug, Clone)]
pub struct Library {
    domain: String,
    source: Locale,
    catalogs: BTreeMap<Locale, Catalog>,
}

impl Library {
    pub fn new(domain: impl Into<String>, source: Locale) -> Self {
        Library {
            domain: domain.into(),
            source,
            catalogs: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn source_locale(&self) -> &Locale {
        &self.source
    }

    /// Add a catalog, returning the one it replaces.
    pub fn insert(&mut self, catalog: Catalog) -> Option<Catalog> {
        self.catalogs.insert(catalog.locale().clone(), catalog)
    }

    pub fn get(&self, locale: &Locale) -> Option<&Catalog> {
        self.catalogs.get(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.catalogs.keys()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Load `<dir>/<locale>.po` and `<dir>/<locale>/LC_MESSAGES/<domain>.po`.
    /// Files whose name is not a locale are skipped.
    pub fn load_dir(dir: &Path, domain: &str, source: Locale) -> Result<Self> {
        let mut library = Library::new(domain, source);
        let entries =
            fs::read_dir(dir).with_context(|| format!("reading locale directory {}", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let nested = path.join("LC_MESSAGES").join(format!("{}.po", domain));
                if nested.is_file() {
                    paths.push(nested);
                }
            } else if path.extension().and_then(|e| e.to_str()) == Some("po") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let file = po::read_file(&path)?;
            match infer_locale(&path, &file) {
                Some(locale) => {
                    tracing::debug!(path = %path.display(), %locale, "loaded catalog");
                    library.insert(Catalog::from_po(&file, locale));
                }
                None => {
                    tracing::warn!(path = %path.display(), "skipping catalog with no locale");
                }
            }
        }
        Ok(library)
    }

    /// Translator for `locale`: its fallback chain, then the source strings.
    pub fn translator(&self, locale: &Locale) -> Translator<'_> {
        let chain = locale
            .fallback_chain()
            .into_iter()
            .take_while(|l| l.language != self.source.language || l.territory.is_some())
            .filter_map(|l| self.catalogs.get(&l))
            .collect();
        Translator::new(Some(locale.clone()), chain)
    }
}
