// SPDX-License-Identifier: PMPL-1.0-or-later

//! `fas-locale.toml` project configuration
//!
//! Every field is optional; command-line flags override whatever is set
//! here.

use crate::lint::LintOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "fas-locale.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub lint: LintConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory holding `<locale>.po` or `<locale>/LC_MESSAGES/<domain>.po`
    pub directory: PathBuf,
    pub domain: String,
    /// Language the msgids are written in
    pub source_locale: String,
    /// Template compared against by lint and sweep
    pub template: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("locales"),
            domain: crate::bundled::DOMAIN.to_string(),
            source_locale: crate::bundled::SOURCE_LOCALE.to_string(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Rule ids or names to skip
    pub disabled: Vec<String>,
    /// Fail on warnings as well as errors
    pub deny_warnings: bool,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `fas-locale.toml` in `dir`, if present.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Explicit path, else the discovered file, else defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Config> {
        match explicit.map(Path::to_path_buf).or_else(|| Config::discover(dir)) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Config::load_from_path(&path)
            }
            None => Ok(Config::default()),
        }
    }

    /// Lint options with the configured rules disabled. The template is
    /// loaded by the caller.
    pub fn lint_options(&self) -> Result<LintOptions> {
        LintOptions::new()
            .disable(&self.lint.disabled)
            .context("invalid [lint] disabled entry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.catalog.directory, PathBuf::from("locales"));
        assert_eq!(config.catalog.domain, "python-fedora");
    }

    #[test]
    fn discovers_and_parses_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[catalog]\ndirectory = \"po\"\ntemplate = \"po/app.pot\"\n\n[lint]\ndisabled = [\"untranslated\", \"PO008\"]\ndeny_warnings = true\n",
        )
        .unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.catalog.directory, PathBuf::from("po"));
        assert_eq!(config.catalog.source_locale, "en");
        assert_eq!(config.catalog.template, Some(PathBuf::from("po/app.pot")));
        assert!(config.lint.deny_warnings);

        let options = config.lint_options().unwrap();
        assert!(!options.is_enabled(crate::lint::Rule::Untranslated));
        assert!(!options.is_enabled(crate::lint::Rule::Fuzzy));
        assert!(options.is_enabled(crate::lint::Rule::PlaceholderMismatch));
    }

    #[test]
    fn rejects_unknown_keys_and_rules() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[lint]\nstrict = true\n").unwrap();
        assert!(Config::load(Some(&path), dir.path()).is_err());

        fs::write(&path, "[lint]\ndisabled = [\"PO999\"]\n").unwrap();
        let config = Config::load(Some(&path), dir.path()).unwrap();
        assert!(config.lint_options().is_err());
    }
}
