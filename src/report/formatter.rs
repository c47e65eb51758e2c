// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::lint::LintReport;
use crate::types::{Finding, Severity};
use crate::locale::Locale;
use colored::*;

pub struct ReportFormatter {
    /// Include info-level findings (untranslated, fuzzy) in the listing
    pub show_info: bool,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self { show_info: false }
    }

    pub fn with_info(mut self, show_info: bool) -> Self {
        self.show_info = show_info;
        self
    }

    pub fn print(&self, report: &LintReport) {
        let kind = if report.is_template { "template" } else { "catalog" };
        println!(
            "\n{} {} ({})",
            "===".bold().cyan(),
            report.file.display().to_string().bold(),
            kind
        );

        self.print_statistics(report);
        self.print_findings(&report.findings);
    }

    fn print_statistics(&self, report: &LintReport) {
        if let Some(locale) = &report.locale {
            match Locale::parse(locale) {
                Ok(parsed) => println!("  Locale: {} ({})", locale, parsed.display_name()),
                Err(_) => println!("  Locale: {}", locale),
            }
        }
        if report.is_template {
            println!("  Messages: {}", report.entries);
            return;
        }

        let coverage = report.coverage();
        let coverage_color = if coverage >= 95.0 {
            "green"
        } else if coverage >= 60.0 {
            "yellow"
        } else {
            "red"
        };
        println!(
            "  Messages: {}  |  Translated: {}  |  Fuzzy: {}  |  Untranslated: {}",
            report.entries, report.translated, report.fuzzy, report.untranslated
        );
        println!(
            "  Coverage: {}",
            format!("{:.1}%", coverage).color(coverage_color).bold()
        );
    }

    fn print_findings(&self, findings: &[Finding]) {
        let shown: Vec<&Finding> = findings
            .iter()
            .filter(|f| self.show_info || f.severity != Severity::Info)
            .collect();
        let hidden = findings.len() - shown.len();

        if shown.is_empty() {
            println!("  {}", "No problems found".green());
        } else {
            println!();
            for finding in shown {
                println!(
                    "  {} {} {}",
                    severity_label(finding.severity),
                    finding.rule.bold(),
                    finding.message
                );
                if let Some(loc) = &finding.location {
                    println!("      at {}", loc.dimmed());
                }
            }
        }
        if hidden > 0 {
            println!(
                "  {}",
                format!("({} info findings hidden, use --info to show)", hidden).dimmed()
            );
        }
    }

    /// One-line totals across several reports.
    pub fn print_totals(&self, reports: &[LintReport]) {
        let errors: usize = reports.iter().map(LintReport::errors).sum();
        let warnings: usize = reports.iter().map(LintReport::warnings).sum();
        let line = format!(
            "{} file(s) checked: {} error(s), {} warning(s)",
            reports.len(),
            errors,
            warnings
        );
        println!();
        if errors > 0 {
            println!("{}", line.red().bold());
        } else if warnings > 0 {
            println!("{}", line.yellow().bold());
        } else {
            println!("{}", line.green().bold());
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue(),
    }
}
