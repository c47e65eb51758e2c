// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog linting
//!
//! Runs every enabled [`Rule`] over one parsed file and collects
//! [`Finding`]s with `path:line` locations. Template files (`.pot`) are
//! only checked for duplicate and malformed msgids; everything else
//! concerns translations.

pub mod rules;

pub use rules::{Rule, UnknownRule};

use crate::catalog::locale_from_path;
use crate::locale::{is_known_language, Locale};
use crate::placeholder::{has_placeholders, PlaceholderSet};
use crate::plural::PluralForms;
use crate::po;
use crate::types::{
    Entry, Finding, MessageKey, PoFile, Severity, FLAG_NO_PYTHON_FORMAT, FLAG_PYTHON_FORMAT,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// What to check and against which template.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    pub template: Option<PoFile>,
    pub disabled: HashSet<Rule>,
}

impl LintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: PoFile) -> Self {
        self.template = Some(template);
        self
    }

    /// Disable rules by id or name.
    pub fn disable<I, S>(mut self, rules: I) -> Result<Self, UnknownRule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for rule in rules {
            self.disabled.insert(rule.as_ref().parse()?);
        }
        Ok(self)
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        !self.disabled.contains(&rule)
    }
}

/// Lint result for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub is_template: bool,
    pub entries: usize,
    pub translated: usize,
    pub fuzzy: usize,
    pub untranslated: usize,
    pub findings: Vec<Finding>,
}

impl LintReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Percentage of entries with a servable translation.
    pub fn coverage(&self) -> f64 {
        if self.entries == 0 {
            return 100.0;
        }
        self.translated as f64 * 100.0 / self.entries as f64
    }

    /// True when the findings should fail a lint run.
    pub fn fails(&self, deny_warnings: bool) -> bool {
        self.errors() > 0 || (deny_warnings && self.warnings() > 0)
    }
}

/// Read, parse and lint `path`.
pub fn lint_file(path: &Path, options: &LintOptions) -> Result<LintReport> {
    let file = po::read_file(path)?;
    Ok(lint_po(&file, path, options))
}

/// Lint an already parsed file; `path` names it in findings.
pub fn lint_po(file: &PoFile, path: &Path, options: &LintOptions) -> LintReport {
    let is_template = path.extension().and_then(|e| e.to_str()) == Some("pot");
    let path_locale = if is_template {
        None
    } else {
        locale_from_path(path)
    };

    let mut linter = Linter {
        path: path.display().to_string(),
        options,
        findings: Vec::new(),
    };

    let plural_forms = if is_template {
        None
    } else {
        linter.check_header(file, path_locale.as_ref())
    };

    let mut report = LintReport {
        file: path.to_path_buf(),
        locale: path_locale
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| file.header_field("Language").filter(|l| !l.is_empty()).map(str::to_string)),
        is_template,
        entries: 0,
        translated: 0,
        fuzzy: 0,
        untranslated: 0,
        findings: Vec::new(),
    };

    let mut seen: HashMap<MessageKey, usize> = HashMap::new();
    for entry in file.active_entries() {
        report.entries += 1;
        let key = entry.key();
        if let Some(first) = seen.get(&key) {
            linter.emit(
                Rule::DuplicateMsgid,
                Some(entry.line),
                format!("duplicate msgid {}, first defined at line {}", key, first),
            );
        } else {
            seen.insert(key, entry.line);
        }

        if is_template {
            linter.check_msgid_placeholders(entry);
            continue;
        }

        if entry.is_fuzzy() {
            report.fuzzy += 1;
            linter.emit(
                Rule::Fuzzy,
                Some(entry.line),
                format!("msgid {:?} is marked fuzzy", entry.msgid),
            );
        }
        if entry.is_servable() {
            report.translated += 1;
        } else if !entry.is_translated() {
            report.untranslated += 1;
            linter.emit(
                Rule::Untranslated,
                Some(entry.line),
                format!("msgid {:?} has no translation", entry.msgid),
            );
        }

        if let (true, Some(forms)) = (entry.is_plural(), plural_forms.as_ref()) {
            if entry.msgstr.len() != forms.nplurals as usize {
                linter.emit(
                    Rule::PluralCountMismatch,
                    Some(entry.line),
                    format!(
                        "msgid {:?} has {} plural forms, Plural-Forms declares nplurals={}",
                        entry.msgid,
                        entry.msgstr.len(),
                        forms.nplurals
                    ),
                );
            }
        }

        linter.check_placeholders(entry);
    }

    if let (false, Some(template)) = (is_template, options.template.as_ref()) {
        linter.check_template(file, template);
    }

    report.findings = linter.findings;
    report
}

/// Entries whose msgid and msgstr must agree on placeholders: flagged
/// `python-format`, or with a `%` on either side unless flagged
/// `no-python-format`.
pub fn checks_placeholders(entry: &Entry) -> bool {
    if entry.has_flag(FLAG_PYTHON_FORMAT) {
        return true;
    }
    !entry.has_flag(FLAG_NO_PYTHON_FORMAT)
        && (has_placeholders(&entry.msgid)
            || entry.msgid_plural.as_deref().map(has_placeholders).unwrap_or(false)
            || entry.msgstr.iter().any(|s| has_placeholders(s)))
}

struct Linter<'a> {
    path: String,
    options: &'a LintOptions,
    findings: Vec<Finding>,
}

impl Linter<'_> {
    fn emit(&mut self, rule: Rule, line: Option<usize>, message: String) {
        if !self.options.is_enabled(rule) {
            return;
        }
        let location = match line {
            Some(line) if line > 0 => format!("{}:{}", self.path, line),
            _ => self.path.clone(),
        };
        self.findings.push(Finding {
            rule: rule.id().to_string(),
            severity: rule.severity(),
            message,
            location: Some(location),
        });
    }

    /// Header fields, Plural-Forms and language checks. Returns the parsed
    /// Plural-Forms for the plural count check.
    fn check_header(&mut self, file: &PoFile, path_locale: Option<&Locale>) -> Option<PluralForms> {
        let Some(header) = &file.header else {
            self.emit(
                Rule::HeaderFieldMissing,
                None,
                "file has no header entry".to_string(),
            );
            return None;
        };
        let line = Some(header.entry.line);

        for field in header.missing_fields() {
            self.emit(
                Rule::HeaderFieldMissing,
                line,
                format!("header field {} is missing or empty", field),
            );
        }

        let plural_forms = match header.plural_forms() {
            Some(Ok(forms)) => Some(forms),
            Some(Err(err)) => {
                self.emit(
                    Rule::PluralFormsInvalid,
                    line,
                    format!("invalid Plural-Forms: {}", err),
                );
                None
            }
            None => None,
        };

        if let Some(language) = header.language() {
            match Locale::parse(language) {
                Ok(declared) => {
                    if !is_known_language(&declared.language) {
                        self.emit(
                            Rule::UnknownLanguage,
                            line,
                            format!("language {:?} is not an ISO 639 code", declared.language),
                        );
                    }
                    if let Some(named) = path_locale {
                        if named.language != declared.language
                            || (named.territory.is_some() && named.territory != declared.territory)
                        {
                            self.emit(
                                Rule::LanguageMismatch,
                                line,
                                format!(
                                    "Language header says {} but the file is named for {}",
                                    declared, named
                                ),
                            );
                        }
                    }
                }
                Err(_) => self.emit(
                    Rule::UnknownLanguage,
                    line,
                    format!("Language header {:?} is not a locale", language),
                ),
            }
        } else if let Some(named) = path_locale {
            if !is_known_language(&named.language) {
                self.emit(
                    Rule::UnknownLanguage,
                    None,
                    format!("language {:?} is not an ISO 639 code", named.language),
                );
            }
        }

        plural_forms
    }

    fn check_msgid_placeholders(&mut self, entry: &Entry) -> Option<(PlaceholderSet, PlaceholderSet)> {
        if !checks_placeholders(entry) {
            return None;
        }
        let singular = self.placeholder_set(entry, "msgid", &entry.msgid)?;
        let plural = match &entry.msgid_plural {
            Some(text) => self.placeholder_set(entry, "msgid_plural", text)?,
            None => singular.clone(),
        };
        Some((singular, plural))
    }

    fn check_placeholders(&mut self, entry: &Entry) {
        let Some((singular, plural)) = self.check_msgid_placeholders(entry) else {
            return;
        };

        for (index, msgstr) in entry.msgstr.iter().enumerate() {
            if msgstr.is_empty() {
                continue;
            }
            let field = if entry.is_plural() {
                format!("msgstr[{}]", index)
            } else {
                "msgstr".to_string()
            };
            let Some(found) = self.placeholder_set(entry, &field, msgstr) else {
                continue;
            };
            // A single-form language covers every count with msgstr[0].
            let expected = if index == 0 && !(entry.is_plural() && entry.msgstr.len() == 1) {
                &singular
            } else {
                &plural
            };
            if !found.matches(expected) {
                self.emit(
                    Rule::PlaceholderMismatch,
                    Some(entry.line),
                    format!(
                        "{} of {:?} has placeholders {}, expected {}",
                        field, entry.msgid, found, expected
                    ),
                );
            }
        }
    }

    fn placeholder_set(&mut self, entry: &Entry, field: &str, text: &str) -> Option<PlaceholderSet> {
        match PlaceholderSet::from_text(text) {
            Ok(set) => Some(set),
            Err(err) => {
                self.emit(
                    Rule::MalformedPlaceholder,
                    Some(entry.line),
                    format!("{} of {:?}: {}", field, entry.msgid, err),
                );
                None
            }
        }
    }

    fn check_template(&mut self, file: &PoFile, template: &PoFile) {
        let ours: HashSet<MessageKey> = file.active_entries().map(Entry::key).collect();
        let theirs: HashSet<MessageKey> = template.active_entries().map(Entry::key).collect();

        for entry in template.active_entries() {
            let key = entry.key();
            if !ours.contains(&key) {
                self.emit(
                    Rule::MissingFromTemplate,
                    None,
                    format!("template msgid {} is missing", key),
                );
            }
        }
        for entry in file.active_entries() {
            let key = entry.key();
            if !theirs.contains(&key) {
                self.emit(
                    Rule::NotInTemplate,
                    Some(entry.line),
                    format!("msgid {} is not in the template", key),
                );
            }
        }
    }
}
