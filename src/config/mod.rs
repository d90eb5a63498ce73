//! Configuration management for `vizindex.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Page text (title, subtitle, link label)          |
//! | `[build]`   | Input directory, output page, grouping, ledger   |
//! | `[deploy]`  | git commit message, remote, branch               |
//!
//! The file is optional: without it every field takes its default and the
//! tool behaves like a plain `results/` → `index.html` generator.
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Group Dance 3D Plot"
//!
//! [build]
//! input = "results"
//! group = "size"
//!
//! [deploy]
//! message = "Update visualization index ({date})"
//! ```

mod base;
mod build;
pub mod defaults;
mod deploy;
mod error;

pub use build::GroupMode;

use base::BaseConfig;
use build::BuildConfig;
use deploy::DeployConfig;
use error::ConfigError;

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing vizindex.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Page text
    #[serde(default)]
    pub base: BaseConfig,

    /// Scan, reconcile and render settings
    #[serde(default)]
    pub build: BuildConfig,

    /// git publishing settings
    #[serde(default)]
    pub deploy: DeployConfig,
}

impl IndexConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: IndexConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in `{}`", path.display()))
    }

    /// Load the config file named on the command line, if present, and apply
    /// CLI overrides. Without the file every field keeps its default.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let path = root.join(&cli.config);

        let mut config = if path.exists() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);

        if !config.config_path.exists() {
            log!("config"; "{} not found, using defaults", config.config_path.display());
        }
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Commit message with `{date}` expanded.
    pub fn commit_message(&self, today: NaiveDate) -> String {
        self.deploy
            .message
            .replace("{date}", &today.format("%Y-%m-%d").to_string())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = Self::normalize_path(&expand_tilde(&root));
        self.set_root(&root);

        let args = cli.build_args();
        Self::update_option(&mut self.build.input, args.input.as_ref());
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.group, args.group.as_ref());
        Self::update_option(&mut self.build.threshold, args.threshold.as_ref());
        Self::update_option(&mut self.build.ledger.enable, args.ledger.as_ref());

        if let Commands::Deploy { message, force, .. } = &cli.command {
            Self::update_option(&mut self.deploy.message, message.as_ref());
            Self::update_option(&mut self.deploy.force, force.as_ref());
        }

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.update_path_with_root(&root);
    }

    /// Helper to update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every configured path against the project root.
    fn update_path_with_root(&mut self, root: &Path) {
        let resolve = |path: &Path| Self::normalize_path(&root.join(expand_tilde(path)));

        self.build.input = resolve(&self.build.input);
        self.build.output = resolve(&self.build.output);
        self.build.ledger.path = resolve(&self.build.ledger.path);

        self.build.extensions = self
            .build
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .collect();
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.build.threshold.is_finite() || self.build.threshold < 0.0 {
            bail!(ConfigError::Validation(format!(
                "[build.threshold] must be a non-negative number of seconds, got {}",
                self.build.threshold
            )));
        }

        if self.build.extensions.iter().all(String::is_empty) {
            bail!(ConfigError::Validation(
                "[build.extensions] must contain at least one extension".into()
            ));
        }

        if self.build.ledger.enable && self.build.ledger.path == self.build.output {
            bail!(ConfigError::PathConflict(
                "[build.output]",
                "[build.ledger.path]",
                self.build.output.clone()
            ));
        }

        if self.cli.is_some_and(Cli::is_deploy) {
            if self.deploy.message.trim().is_empty() {
                bail!(ConfigError::Validation(
                    "[deploy.message] cannot be empty".into()
                ));
            }
            if self.deploy.paths.is_empty() {
                bail!(ConfigError::Validation(
                    "[deploy.paths] must name at least one pathspec".into()
                ));
            }
            which::which("git").context("`git` not found. Please install it first.")?;
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn leak_cli(args: &[&str]) -> &'static Cli {
        Box::leak(Box::new(Cli::try_parse_from(args).unwrap()))
    }

    #[test]
    fn test_from_str() {
        let config = IndexConfig::from_str(
            r#"
            [base]
            title = "Plots"
            [build]
            threshold = 0.5
        "#,
        )
        .unwrap();

        assert_eq!(config.base.title, "Plots");
        assert_eq!(config.build.threshold, 0.5);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(IndexConfig::from_str("[base\ntitle = 1").is_err());
    }

    #[test]
    fn test_unknown_top_level_section_rejection() {
        assert!(IndexConfig::from_str("[serve]\nport = 80").is_err());
    }

    #[test]
    fn test_from_path_missing() {
        let err = IndexConfig::from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_load_reads_file_under_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("vizindex.toml"), "[base]\ntitle = \"Plots\"\n").unwrap();
        let root = dir.path().to_str().unwrap().to_owned();

        let config = IndexConfig::load(leak_cli(&["vizindex", "-r", &root, "build"])).unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.base.title, "Plots");
        assert_eq!(config.config_path, root.join("vizindex.toml"));
        assert_eq!(config.build.input, root.join("results"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap().to_owned();

        let config = IndexConfig::load(leak_cli(&["vizindex", "-r", &root, "build"])).unwrap();
        assert_eq!(config.base.title, "Group Dance 3D Plot");
        assert!(!config.config_path.exists());
    }

    #[test]
    fn test_get_root_default() {
        let config = IndexConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_commit_message_expands_date() {
        let config = IndexConfig::default();
        let day = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        assert_eq!(
            config.commit_message(day),
            "Update visualization index (2025-03-21)"
        );
    }

    #[test]
    fn test_update_with_cli_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap().to_owned();
        let cli = leak_cli(&["vizindex", "-r", &root, "build", "-i", "plots", "--group", "date"]);

        let mut config = IndexConfig::default();
        config.build.extensions = vec![".HTML".into(), "htm".into()];
        config.update_with_cli(cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.input, root.join("plots"));
        assert_eq!(config.build.output, root.join("index.html"));
        assert_eq!(config.build.ledger.path, root.join("index.json"));
        assert_eq!(config.config_path, root.join("vizindex.toml"));
        assert_eq!(config.build.group, GroupMode::Date);
        assert_eq!(config.build.extensions, vec!["html", "htm"]);
    }

    #[test]
    fn test_update_with_cli_deploy_overrides() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap().to_owned();
        let cli = leak_cli(&["vizindex", "-r", &root, "deploy", "-m", "nightly {date}", "-f"]);

        let mut config = IndexConfig::default();
        config.update_with_cli(cli);

        assert_eq!(config.deploy.message, "nightly {date}");
        assert!(config.deploy.force);
    }

    #[test]
    fn test_validate_threshold() {
        let mut config = IndexConfig::default();
        assert!(config.validate().is_ok());

        config.build.threshold = -1.0;
        assert!(config.validate().is_err());

        config.build.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_extensions() {
        let mut config = IndexConfig::default();
        config.build.extensions = vec![String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ledger_conflict() {
        let mut config = IndexConfig::default();
        config.build.ledger.path = config.build.output.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("both point to"));

        config.build.ledger.enable = false;
        assert!(config.validate().is_ok());
    }
}
