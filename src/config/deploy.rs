//! `[deploy]` section configuration.
//!
//! Controls the git add/commit/push cycle run by `vizindex deploy`.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[deploy]` section in vizindex.toml.
///
/// # Example
/// ```toml
/// [deploy]
/// message = "Update visualization index ({date})"
/// remote = "origin"
/// branch = "main"
/// force = false
/// paths = ["."]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Commit message template. `{date}` expands to today's `YYYY-MM-DD`.
    #[serde(default = "defaults::deploy::message")]
    #[educe(Default = defaults::deploy::message())]
    pub message: String,

    /// Remote pushed to when `branch` is set.
    #[serde(default = "defaults::deploy::remote")]
    #[educe(Default = defaults::deploy::remote())]
    pub remote: String,

    /// Target branch. Empty means a plain `git push` to the configured upstream.
    #[serde(default = "defaults::deploy::branch")]
    #[educe(Default = defaults::deploy::branch())]
    pub branch: String,

    /// Force push (overwrites remote history).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub force: bool,

    /// Pathspecs handed to `git add`.
    #[serde(default = "defaults::deploy::paths")]
    #[educe(Default = defaults::deploy::paths())]
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::super::IndexConfig;

    #[test]
    fn test_deploy_config_defaults() {
        let config: IndexConfig = toml::from_str("").unwrap();

        assert_eq!(config.deploy.message, "Update visualization index ({date})");
        assert_eq!(config.deploy.remote, "origin");
        assert!(config.deploy.branch.is_empty());
        assert!(!config.deploy.force);
        assert_eq!(config.deploy.paths, vec![".".to_string()]);
    }

    #[test]
    fn test_deploy_config_custom() {
        let config = r#"
            [deploy]
            message = "refresh plots"
            remote = "upstream"
            branch = "gh-pages"
            force = true
            paths = ["index.html", "results"]
        "#;
        let config: IndexConfig = toml::from_str(config).unwrap();

        assert_eq!(config.deploy.message, "refresh plots");
        assert_eq!(config.deploy.remote, "upstream");
        assert_eq!(config.deploy.branch, "gh-pages");
        assert!(config.deploy.force);
        assert_eq!(config.deploy.paths, vec!["index.html", "results"]);
    }

    #[test]
    fn test_deploy_config_unknown_field_rejection() {
        let config = r#"
            [deploy]
            provider = "github"
        "#;
        let result: Result<IndexConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
