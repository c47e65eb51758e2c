// SPDX-License-Identifier: PMPL-1.0-or-later

//! SARIF 2.1.0 output for code-scanning integration
//!
//! Converts lint findings into OASIS SARIF format.
//! See: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::lint::{LintReport, Rule};
use crate::types::Severity;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

/// Top-level SARIF log
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifTool {
    pub driver: SarifToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifToolComponent {
    pub name: String,
    pub version: String,
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifMessage,
    pub default_configuration: SarifConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifConfiguration {
    pub level: String,
}

/// A single finding
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

/// Split "locales/sv.po:42" into (path, optional line)
fn parse_location(loc: &str) -> (&str, Option<u32>) {
    if let Some((path, line)) = loc.rsplit_once(':') {
        if let Ok(line) = line.parse::<u32>() {
            return (path, Some(line));
        }
    }
    (loc, None)
}

fn rule_descriptor(rule: Rule) -> SarifRule {
    SarifRule {
        id: rule.id().to_string(),
        name: rule.name().to_string(),
        short_description: SarifMessage {
            text: rule.description().to_string(),
        },
        default_configuration: SarifConfiguration {
            level: sarif_level(rule.severity()).to_string(),
        },
    }
}

/// Convert lint reports to a single SARIF run
pub fn to_sarif<'a, I>(reports: I) -> Result<SarifLog>
where
    I: IntoIterator<Item = &'a LintReport>,
{
    let mut seen_rules = BTreeSet::new();
    let mut results = Vec::new();

    for report in reports {
        let fallback_uri = report.file.display().to_string();
        for finding in &report.findings {
            if let Ok(rule) = finding.rule.parse::<Rule>() {
                seen_rules.insert(rule);
            }
            let (path, line) = match finding.location.as_deref() {
                Some(loc) => parse_location(loc),
                None => (fallback_uri.as_str(), None),
            };
            results.push(SarifResult {
                rule_id: finding.rule.clone(),
                level: sarif_level(finding.severity).to_string(),
                message: SarifMessage {
                    text: finding.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: path.to_string(),
                        },
                        region: line.map(|l| SarifRegion { start_line: l }),
                    },
                }],
            });
        }
    }

    Ok(SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifToolComponent {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/fedora-infra/python-fedora".to_string(),
                    rules: seen_rules.into_iter().map(rule_descriptor).collect(),
                },
            },
            results,
        }],
    })
}

/// Serialize lint reports as a SARIF JSON string
pub fn to_sarif_json<'a, I>(reports: I) -> Result<String>
where
    I: IntoIterator<Item = &'a LintReport>,
{
    let log = to_sarif(reports)?;
    let json = serde_json::to_string_pretty(&log)?;
    Ok(json)
}
