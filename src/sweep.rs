// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sweep: lint every catalog under a directory tree
//!
//! Walks the tree for `*.po` files, lints them in parallel against the
//! template (given, or the first `*.pot` found), and produces a summary
//! sorted by finding count (highest first) with coverage per locale.

use crate::lint::{self, LintOptions, LintReport};
use crate::locale::Locale;
use crate::po;
use crate::types::Severity;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &["target", "node_modules", "build", "dist", "__pycache__", "vendor"];

/// Configuration for a sweep run
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// Root of the tree to scan
    pub directory: PathBuf,
    /// Template to compare against; discovered when `None`
    pub template: Option<PathBuf>,
    /// Base lint options; the template is filled in by the sweep
    pub options: LintOptions,
    /// Only keep files with findings
    pub findings_only: bool,
    /// Minimum number of findings to include
    pub min_findings: usize,
}

/// Results from linting a single catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub entries: usize,
    pub translated: usize,
    pub coverage: f64,
    pub finding_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub report: Option<LintReport>,
}

impl FileResult {
    fn from_report(report: LintReport) -> Self {
        FileResult {
            path: report.file.clone(),
            locale: report.locale.clone(),
            entries: report.entries,
            translated: report.translated,
            coverage: report.coverage(),
            finding_count: report.findings.len(),
            error_count: report.count(Severity::Error),
            warning_count: report.count(Severity::Warning),
            info_count: report.count(Severity::Info),
            error: None,
            report: Some(report),
        }
    }

    fn failed(path: PathBuf, err: &anyhow::Error) -> Self {
        FileResult {
            path,
            locale: None,
            entries: 0,
            translated: 0,
            coverage: 0.0,
            finding_count: 0,
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            error: Some(format!("{:#}", err)),
            report: None,
        }
    }
}

/// Translation coverage of one locale across every file that carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleCoverage {
    pub locale: String,
    /// English display name, or the code when the language has none
    pub name: String,
    pub files: usize,
    pub entries: usize,
    pub translated: usize,
    pub coverage: f64,
}

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub created_at: String,
    pub directory: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    pub files_scanned: usize,
    pub files_with_findings: usize,
    pub total_findings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_info: usize,
    pub locales: Vec<LocaleCoverage>,
    pub results: Vec<FileResult>,
}

impl SweepReport {
    /// Lint reports of every file that parsed.
    pub fn lint_reports(&self) -> impl Iterator<Item = &LintReport> {
        self.results.iter().filter_map(|r| r.report.as_ref())
    }

    /// True when any file failed to load or has errors (or warnings, when denied).
    pub fn fails(&self, deny_warnings: bool) -> bool {
        self.results.iter().any(|r| r.error.is_some())
            || self.total_errors > 0
            || (deny_warnings && self.total_warnings > 0)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_str().unwrap_or("");
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Catalogs and templates under `directory`, sorted.
fn discover(directory: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    if !directory.is_dir() {
        anyhow::bail!("Not a directory: {}", directory.display());
    }

    let mut catalogs = Vec::new();
    let mut templates = Vec::new();
    for entry in WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if has_extension(&path, "po") {
            catalogs.push(path);
        } else if has_extension(&path, "pot") {
            templates.push(path);
        }
    }

    catalogs.sort();
    templates.sort();
    Ok((catalogs, templates))
}

/// Run a sweep across all catalogs in a directory
pub fn run(config: &SweepConfig) -> Result<SweepReport> {
    let (catalogs, templates) = discover(&config.directory)?;

    let mut options = config.options.clone();
    let template = match (&config.template, options.template.is_some()) {
        (Some(path), _) => {
            let file = po::read_file(path)
                .with_context(|| format!("loading template {}", path.display()))?;
            options.template = Some(file);
            Some(path.clone())
        }
        (None, true) => None,
        (None, false) => match templates.first() {
            Some(path) => match po::read_file(path) {
                Ok(file) => {
                    tracing::debug!(path = %path.display(), "using discovered template");
                    options.template = Some(file);
                    Some(path.clone())
                }
                Err(err) => {
                    let err = format!("{:#}", err);
                    tracing::warn!(path = %path.display(), %err, "ignoring unreadable template");
                    None
                }
            },
            None => None,
        },
    };

    let mut results: Vec<FileResult> = catalogs
        .par_iter()
        .map(|path| match lint::lint_file(path, &options) {
            Ok(report) => FileResult::from_report(report),
            Err(err) => FileResult::failed(path.clone(), &err),
        })
        .collect();

    let locales = locale_coverage(&results);

    // Most findings first; ties keep path order
    results.sort_by(|a, b| {
        b.finding_count
            .cmp(&a.finding_count)
            .then_with(|| a.path.cmp(&b.path))
    });

    // Totals cover every scanned file; the filters below only trim the listing.
    let files_with_findings = results.iter().filter(|r| r.finding_count > 0).count();
    let total_findings = results.iter().map(|r| r.finding_count).sum();
    let total_errors = results.iter().map(|r| r.error_count).sum();
    let total_warnings = results.iter().map(|r| r.warning_count).sum();
    let total_info = results.iter().map(|r| r.info_count).sum();

    if config.findings_only {
        results.retain(|r| r.finding_count > 0 || r.error.is_some());
    }
    if config.min_findings > 0 {
        results.retain(|r| r.finding_count >= config.min_findings || r.error.is_some());
    }

    Ok(SweepReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: config.directory.clone(),
        template,
        files_scanned: catalogs.len(),
        files_with_findings,
        total_findings,
        total_errors,
        total_warnings,
        total_info,
        locales,
        results,
    })
}

fn locale_coverage(results: &[FileResult]) -> Vec<LocaleCoverage> {
    let mut by_locale: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for result in results.iter().filter(|r| r.error.is_none()) {
        let Some(locale) = result.locale.as_deref() else {
            continue;
        };
        let slot = by_locale.entry(locale).or_default();
        slot.0 += 1;
        slot.1 += result.entries;
        slot.2 += result.translated;
    }

    by_locale
        .into_iter()
        .map(|(locale, (files, entries, translated))| LocaleCoverage {
            locale: locale.to_string(),
            name: display_name(locale),
            files,
            entries,
            translated,
            coverage: if entries == 0 {
                100.0
            } else {
                translated as f64 * 100.0 / entries as f64
            },
        })
        .collect()
}

fn display_name(code: &str) -> String {
    Locale::parse(code)
        .map(|l| l.display_name())
        .unwrap_or_else(|_| code.to_string())
}

/// Print a summary table to the terminal
pub fn print_summary(report: &SweepReport, quiet: bool) {
    if quiet {
        return;
    }

    println!("\n=== SWEEP SUMMARY ===");
    println!(
        "Directory: {}  |  Catalogs scanned: {}  |  With findings: {}",
        report.directory.display(),
        report.files_scanned,
        report.files_with_findings
    );
    if let Some(template) = &report.template {
        println!("Template: {}", template.display());
    }
    println!(
        "Findings: {}  |  Errors: {}  |  Warnings: {}  |  Info: {}",
        report.total_findings, report.total_errors, report.total_warnings, report.total_info
    );
    println!();

    if !report.locales.is_empty() {
        println!(
            "  {:<12} {:<20} {:>6} {:>8} {:>10} {:>9}",
            "Locale", "Language", "Files", "Entries", "Translated", "Coverage"
        );
        println!("  {}", "-".repeat(70));
        for locale in &report.locales {
            println!(
                "  {:<12} {:<20} {:>6} {:>8} {:>10} {:>8.1}%",
                locale.locale,
                locale.name,
                locale.files,
                locale.entries,
                locale.translated,
                locale.coverage
            );
        }
        println!();
    }

    if report.results.is_empty() {
        println!("  No catalogs with findings.");
        return;
    }

    println!(
        "  {:<40} {:>6} {:>6} {:>6} {:>6}",
        "Catalog", "Total", "Error", "Warn", "Info"
    );
    println!("  {}", "-".repeat(68));

    for result in report.results.iter().take(20) {
        let name = result
            .path
            .strip_prefix(&report.directory)
            .unwrap_or(result.path.as_path())
            .display()
            .to_string();
        if let Some(err) = &result.error {
            println!("  {:<40} ERROR: {}", name, err);
        } else {
            println!(
                "  {:<40} {:>6} {:>6} {:>6} {:>6}",
                name, result.finding_count, result.error_count, result.warning_count, result.info_count,
            );
        }
    }

    if report.results.len() > 20 {
        println!("  ... and {} more catalogs", report.results.len() - 20);
    }
    println!();
}

/// Write sweep report as JSON
pub fn write_report(report: &SweepReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
