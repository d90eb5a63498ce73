//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "Group Dance 3D Plot".into()
    }

    pub fn subtitle() -> String {
        "Experiment Records".into()
    }

    pub fn link_text() -> String {
        "🎮 Interact with 3D plot".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn input() -> PathBuf {
        "results".into()
    }

    pub fn output() -> PathBuf {
        "index.html".into()
    }

    pub fn extensions() -> Vec<String> {
        vec!["html".into()]
    }

    /// Seconds an mtime must advance past the recorded time to count as an edit.
    pub fn threshold() -> f64 {
        crate::index::reconcile::DEFAULT_THRESHOLD
    }

    pub mod ledger {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "index.json".into()
        }
    }
}

// ============================================================================
// [deploy] Section Defaults
// ============================================================================

pub mod deploy {
    pub fn message() -> String {
        "Update visualization index ({date})".into()
    }

    pub fn remote() -> String {
        "origin".into()
    }

    pub fn branch() -> String {
        String::new()
    }

    pub fn paths() -> Vec<String> {
        vec![".".into()]
    }
}
