//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "root".into()
    }

    pub fn output() -> PathBuf {
        "build".into()
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn context() -> PathBuf {
        "context.yaml".into()
    }

    pub fn index() -> String {
        "index.html".into()
    }

    pub fn ignore() -> PathBuf {
        ".supernumignore".into()
    }

    pub fn marker() -> String {
        crate::document::DEFAULT_MARKER.into()
    }

    pub fn template() -> String {
        "base.html".into()
    }

    pub fn blog() -> PathBuf {
        "blog".into()
    }

    pub fn feed_len() -> usize {
        10
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml.gz".into()
        }

        pub fn hidden() -> Vec<String> {
            Vec::new()
        }
    }

    pub mod feed {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "feed.xml".into()
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        8000
    }
}
