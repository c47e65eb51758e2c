// SPDX-License-Identifier: PMPL-1.0-or-later

//! fas-locale: lint, inspect and export the identity provider's gettext catalogs
//!
//! Checks that every translation keeps the placeholders of its msgid, sweeps
//! whole trees of catalogs, answers lookups against the bundled or on-disk
//! catalogs, and rewrites files into canonical form.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use fas_locale::catalog::Library;
use fas_locale::config::Config;
use fas_locale::export;
use fas_locale::lint::{self, LintOptions, LintReport};
use fas_locale::locale::Locale;
use fas_locale::placeholder::FormatArgs;
use fas_locale::report::{self, sarif, ReportFormatter, ReportOutputFormat};
use fas_locale::{bundled, po, sweep};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fas-locale")]
#[command(version)]
#[command(about = "Gettext catalogs, lookup and lint tooling for the FAS identity provider")]
#[command(long_about = None)]
struct Cli {
    /// Config file (default: ./fas-locale.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging on stderr (otherwise FAS_LOCALE_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint one or more catalogs
    Lint {
        /// Catalogs to check (default: every *.po in the configured directory)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Template (.pot) to compare msgids against
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Rules to skip, by id or name
        #[arg(short, long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Exit non-zero on warnings too
        #[arg(long)]
        deny_warnings: bool,

        /// Show info findings (untranslated, fuzzy)
        #[arg(long)]
        info: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: LintFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lint every catalog under a directory
    Sweep {
        /// Directory to scan (default: the configured catalog directory)
        #[arg(value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Template (.pot); the first one found is used otherwise
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Rules to skip, by id or name
        #[arg(short, long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Only list catalogs with findings
        #[arg(long)]
        findings_only: bool,

        /// Minimum number of findings to list a catalog
        #[arg(long, default_value = "0")]
        min_findings: usize,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write SARIF instead of the JSON report
        #[arg(long)]
        sarif: bool,

        /// Exit non-zero on warnings too
        #[arg(long)]
        deny_warnings: bool,

        /// Suppress the summary table
        #[arg(short, long)]
        quiet: bool,
    },

    /// Translate a message
    Lookup {
        /// Source-language msgid
        #[arg(value_name = "MSGID")]
        msgid: String,

        /// Values for positional placeholders
        #[arg(value_name = "VALUE")]
        values: Vec<String>,

        /// Locale (default: LANGUAGE, LC_ALL, LC_MESSAGES, LANG)
        #[arg(short, long)]
        locale: Option<String>,

        /// Message context (msgctxt)
        #[arg(short, long)]
        context: Option<String>,

        /// Plural msgid; requires --count
        #[arg(long, requires = "count")]
        plural: Option<String>,

        /// Count selecting the plural form
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Named placeholder value, NAME=VALUE
        #[arg(short, long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,

        /// Load catalogs from this directory instead of the bundled ones
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Export a catalog as a JSON or YAML locale map
    Export {
        /// Catalog to export
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (default: from --output extension, else json)
        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite catalogs in canonical form
    Normalize {
        /// Catalogs to normalize
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Only report files that are not canonical
        #[arg(long, conflicts_with = "in_place")]
        check: bool,

        /// Overwrite the files
        #[arg(short, long)]
        in_place: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LintFormat {
    Text,
    Json,
    Yaml,
    Sarif,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FAS_LOCALE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("reading the working directory")?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;

    let ok = match cli.command {
        Commands::Lint {
            files,
            template,
            disable,
            deny_warnings,
            info,
            format,
            output,
        } => {
            let files = if files.is_empty() {
                catalogs_in(&config.catalog.directory)?
            } else {
                files
            };
            let options = lint_options(&config, template.or(config.catalog.template.clone()), &disable)?;
            let deny_warnings = deny_warnings || config.lint.deny_warnings;

            let reports = files
                .iter()
                .map(|path| lint::lint_file(path, &options))
                .collect::<Result<Vec<LintReport>>>()?;

            let rendered = match format {
                LintFormat::Text => None,
                LintFormat::Json => Some(ReportOutputFormat::Json.serialize(&reports)?),
                LintFormat::Yaml => Some(ReportOutputFormat::Yaml.serialize(&reports)?),
                LintFormat::Sarif => Some(sarif::to_sarif_json(&reports)?),
            };
            match (rendered, output) {
                (None, output) => {
                    let formatter = ReportFormatter::new().with_info(info);
                    for report in &reports {
                        formatter.print(report);
                    }
                    formatter.print_totals(&reports);
                    if let Some(path) = output {
                        report::save_reports(&reports, &path)?;
                        println!("Report saved to: {}", path.display());
                    }
                }
                (Some(text), Some(path)) => {
                    fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Report saved to: {}", path.display());
                }
                (Some(text), None) => println!("{}", text),
            }

            !reports.iter().any(|r| r.fails(deny_warnings))
        }

        Commands::Sweep {
            directory,
            template,
            disable,
            findings_only,
            min_findings,
            output,
            sarif: as_sarif,
            deny_warnings,
            quiet,
        } => {
            let directory = directory.unwrap_or_else(|| config.catalog.directory.clone());
            let sweep_config = sweep::SweepConfig {
                directory,
                template: template.or(config.catalog.template.clone()),
                options: lint_options(&config, None, &disable)?,
                findings_only,
                min_findings,
            };
            let deny_warnings = deny_warnings || config.lint.deny_warnings;

            let report = sweep::run(&sweep_config)?;
            sweep::print_summary(&report, quiet);

            if let Some(path) = output {
                if as_sarif {
                    let json = sarif::to_sarif_json(report.lint_reports())?;
                    fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                } else {
                    sweep::write_report(&report, &path)?;
                }
                if !quiet {
                    println!("Report saved to: {}", path.display());
                }
            } else if as_sarif {
                println!("{}", sarif::to_sarif_json(report.lint_reports())?);
            }

            !report.fails(deny_warnings)
        }

        Commands::Lookup {
            msgid,
            values,
            locale,
            context,
            plural,
            count,
            args,
            dir,
        } => {
            let locale = match locale {
                Some(code) => Locale::parse(&code)?,
                None => Locale::from_env().unwrap_or_else(|| Locale {
                    language: config.catalog.source_locale.clone(),
                    territory: None,
                    variant: None,
                }),
            };
            let loaded;
            let library: &Library = match dir {
                Some(dir) => {
                    let source = Locale::parse(&config.catalog.source_locale)?;
                    loaded = Library::load_dir(&dir, &config.catalog.domain, source)?;
                    &loaded
                }
                None => bundled::library(),
            };
            let translator = library.translator(&locale);
            tracing::debug!(%locale, chain = ?translator.chain(), "lookup");

            let format_args = lookup_args(values, &args)?;
            let n = count.unwrap_or(1);
            let text = match (&context, &plural, &format_args) {
                (None, None, FormatArgs::None) => translator.gettext(&msgid).to_string(),
                (Some(ctx), None, FormatArgs::None) => translator.pgettext(ctx, &msgid).to_string(),
                (None, Some(pl), FormatArgs::None) => translator.ngettext(&msgid, pl, n).to_string(),
                (Some(ctx), Some(pl), FormatArgs::None) => {
                    translator.npgettext(ctx, &msgid, pl, n).to_string()
                }
                (None, None, a) => translator.format(&msgid, a)?,
                (Some(ctx), None, a) => translator.pformat(ctx, &msgid, a)?,
                (None, Some(pl), a) => translator.nformat(&msgid, pl, n, a)?,
                (Some(ctx), Some(pl), a) => translator.npformat(ctx, &msgid, pl, n, a)?,
            };
            println!("{}", text);
            true
        }

        Commands::Export {
            file,
            format,
            output,
        } => {
            let format = format
                .or_else(|| output.as_deref().and_then(ReportOutputFormat::from_path))
                .unwrap_or(ReportOutputFormat::Json);
            let text = export::export_file(&file, format)?;
            match output {
                Some(path) => {
                    fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported {} to {}", file.display(), path.display());
                }
                None => print!("{}", text),
            }
            true
        }

        Commands::Normalize {
            files,
            check,
            in_place,
        } => {
            let mut canonical = true;
            for path in &files {
                let normalized = po::normalize_file(path)?;

                if check {
                    if !normalized.is_canonical() {
                        canonical = false;
                        println!("{} {}", "not canonical:".yellow().bold(), path.display());
                    }
                } else if in_place {
                    if !normalized.is_canonical() {
                        fs::write(path, &normalized.canonical)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("{} {}", "normalized".green(), path.display());
                    }
                } else {
                    print!("{}", normalized.canonical);
                }
            }
            canonical
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn lint_options(config: &Config, template: Option<PathBuf>, disable: &[String]) -> Result<LintOptions> {
    let mut options = config.lint_options()?.disable(disable)?;
    if let Some(path) = template {
        let file = po::read_file(&path)
            .with_context(|| format!("loading template {}", path.display()))?;
        options = options.with_template(file);
    }
    Ok(options)
}

/// `*.po` files directly in `dir` or in `<dir>/<locale>/LC_MESSAGES/`.
fn catalogs_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            let messages = path.join("LC_MESSAGES");
            if messages.is_dir() {
                for nested in fs::read_dir(&messages)? {
                    let nested = nested?.path();
                    if nested.extension().and_then(|e| e.to_str()) == Some("po") {
                        files.push(nested);
                    }
                }
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("po") {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        anyhow::bail!("no catalogs found in {}", dir.display());
    }
    Ok(files)
}

fn lookup_args(values: Vec<String>, named: &[String]) -> Result<FormatArgs> {
    match (values.is_empty(), named.is_empty()) {
        (true, true) => Ok(FormatArgs::None),
        (false, true) => Ok(FormatArgs::Positional(values)),
        (true, false) => {
            let pairs = named
                .iter()
                .map(|pair| {
                    pair.split_once('=')
                        .with_context(|| format!("expected NAME=VALUE, got {:?}", pair))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(FormatArgs::named(pairs))
        }
        (false, false) => anyhow::bail!("positional values and --arg cannot be combined"),
    }
}
