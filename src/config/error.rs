//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    #[error("{0} and {1} both point to `{2}`")]
    PathConflict(&'static str, &'static str, PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("vizindex.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("vizindex.toml"));

        let validation_err = ConfigError::Validation("[build.threshold] must be >= 0".into());
        assert!(format!("{validation_err}").contains("[build.threshold]"));

        let conflict = ConfigError::PathConflict("[build.output]", "[build.ledger.path]", PathBuf::from("/site/index.html"));
        assert_eq!(
            conflict.to_string(),
            "[build.output] and [build.ledger.path] both point to `/site/index.html`"
        );
    }
}
