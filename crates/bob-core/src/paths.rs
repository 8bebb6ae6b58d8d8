use crate::error::{BobError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File and directory constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "bob_config.json";
pub const LLM_CONFIG_FILE: &str = "llm_config.json";

pub const OBJECTIVES_FILE: &str = "bob_objectives.yaml";
pub const USER_STORIES_FILE: &str = "bob_userstories.yaml";
pub const DESIGN_FILE: &str = "bob_design.yaml";

pub const SRC_DIR: &str = "src";
pub const TESTS_DIR: &str = "tests";
pub const DOCS_DIR: &str = "docs";

pub const README_MD: &str = "README.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn llm_config_path(root: &Path) -> PathBuf {
    root.join(LLM_CONFIG_FILE)
}

pub fn objectives_path(root: &Path) -> PathBuf {
    root.join(OBJECTIVES_FILE)
}

pub fn user_stories_path(root: &Path) -> PathBuf {
    root.join(USER_STORIES_FILE)
}

pub fn design_path(root: &Path) -> PathBuf {
    root.join(DESIGN_FILE)
}

pub fn tests_dir(root: &Path) -> PathBuf {
    root.join(TESTS_DIR)
}

pub fn docs_dir(root: &Path) -> PathBuf {
    root.join(DOCS_DIR)
}

// ---------------------------------------------------------------------------
// Build target validation
// ---------------------------------------------------------------------------

static TARGET_RE: OnceLock<Regex> = OnceLock::new();

fn target_re() -> &'static Regex {
    TARGET_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").unwrap())
}

/// Build targets become file names under `tests/` and `docs/`.
pub fn validate_target(target: &str) -> Result<()> {
    if target.is_empty() || target.len() > 64 || !target_re().is_match(target) {
        return Err(BobError::InvalidTarget(target.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_targets() {
        for target in ["function_builder", "auth-login", "A1", "x"] {
            validate_target(target).unwrap_or_else(|_| panic!("expected valid: {target}"));
        }
    }

    #[test]
    fn invalid_targets() {
        for target in ["", "_leading", "-leading", "has spaces", "../escape", "a/b", "a.py"] {
            assert!(validate_target(target).is_err(), "expected invalid: {target}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(config_path(root), PathBuf::from("/tmp/proj/bob_config.json"));
        assert_eq!(
            user_stories_path(root),
            PathBuf::from("/tmp/proj/bob_userstories.yaml")
        );
        assert_eq!(design_path(root), PathBuf::from("/tmp/proj/bob_design.yaml"));
        assert_eq!(docs_dir(root), PathBuf::from("/tmp/proj/docs"));
    }
}
