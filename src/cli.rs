//! Command-line interface definitions.

use crate::config::GroupMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate an index page for a directory of rendered visualizations
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; also the git working directory for `deploy`
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: vizindex.toml)
    #[arg(short = 'C', long, default_value = "vizindex.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared arguments for Build and Deploy
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Directory containing the visualization files (relative to root)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path of the generated index page (relative to root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How entries are grouped into sections
    #[arg(short, long, value_enum)]
    pub group: Option<GroupMode>,

    /// Seconds an mtime must advance past the recorded time to count as an update
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Keep timestamps in a JSON ledger next to the index page
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub ledger: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan the input directory and regenerate the index page
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Regenerate the index page, then git add, commit and push it
    Deploy {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Commit message; `{date}` expands to today's date
        #[arg(short, long)]
        message: Option<String>,

        /// Force push (overwrites remote history)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        force: Option<bool>,
    },
}

impl Cli {
    pub const fn is_deploy(&self) -> bool {
        matches!(self.command, Commands::Deploy { .. })
    }

    pub fn build_args(&self) -> &BuildArgs {
        match &self.command {
            Commands::Build { build_args } | Commands::Deploy { build_args, .. } => build_args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["vizindex", "build", "-i", "plots", "--group", "date"]).unwrap();
        assert!(!cli.is_deploy());
        let args = cli.build_args();
        assert_eq!(args.input, Some(PathBuf::from("plots")));
        assert!(matches!(args.group, Some(GroupMode::Date)));
        assert_eq!(cli.config, PathBuf::from("vizindex.toml"));
    }

    #[test]
    fn test_parse_deploy() {
        let cli = Cli::try_parse_from(["vizindex", "-r", "site", "deploy", "-m", "refresh", "-f"]).unwrap();
        assert!(cli.is_deploy());
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        match cli.command {
            Commands::Deploy { message, force, .. } => {
                assert_eq!(message.as_deref(), Some("refresh"));
                assert_eq!(force, Some(true));
            }
            Commands::Build { .. } => panic!("expected deploy"),
        }
    }

    #[test]
    fn test_parse_ledger_flag() {
        let cli = Cli::try_parse_from(["vizindex", "build", "--ledger", "false"]).unwrap();
        assert_eq!(cli.build_args().ledger, Some(false));
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["vizindex"]).is_err());
    }
}
