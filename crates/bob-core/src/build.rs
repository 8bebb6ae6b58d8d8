//! Test and documentation generation from the latest design entry.

use crate::config::ProjectConfig;
use crate::design::{DesignDoc, DesignEntry};
use crate::error::{BobError, Result};
use crate::paths;
use crate::prompt;
use crate::stage::StageDocument;
use crate::workflow;
use bob_llm::Complete;
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET: &str = "function_builder";

/// Where generated tests go and which framework the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestLayout {
    pub file_name: String,
    pub framework: &'static str,
}

impl TestLayout {
    pub fn for_language(language: &str, target: &str) -> Self {
        let (file_name, framework) = match language.trim().to_ascii_lowercase().as_str() {
            "python" => (format!("test_{target}.py"), "pytest"),
            "rust" => (format!("{target}_test.rs"), "cargo test"),
            "javascript" => (format!("{target}.test.js"), "jest"),
            "typescript" => (format!("{target}.test.ts"), "jest"),
            _ => (format!("test_{target}.txt"), "standard testing"),
        };
        Self {
            file_name,
            framework,
        }
    }
}

pub fn latest_design(doc: &DesignDoc) -> Result<&DesignEntry> {
    doc.latest().ok_or(BobError::NoDesigns)
}

/// Generate a test file for `target` and return the path written.
pub fn generate_tests(
    root: &Path,
    config: &ProjectConfig,
    target: &str,
    llm: &dyn Complete,
) -> Result<PathBuf> {
    paths::validate_target(target)?;
    let doc = DesignDoc::load(root)?;
    let entry = latest_design(&doc)?;

    let layout = TestLayout::for_language(&config.language, target);
    tracing::info!(
        build_target = target,
        language = %config.language,
        framework = layout.framework,
        "generating test code"
    );
    let code = workflow::ask(
        llm,
        &prompt::test_code(entry, &config.language, layout.framework),
    )?;

    let path = paths::tests_dir(root).join(&layout.file_name);
    crate::io::atomic_write(&path, code.as_bytes())?;
    tracing::info!(path = %path.display(), "wrote test code");
    Ok(path)
}

/// Generate Markdown documentation for `target` and return the path written.
pub fn generate_docs(root: &Path, target: &str, llm: &dyn Complete) -> Result<PathBuf> {
    paths::validate_target(target)?;
    let doc = DesignDoc::load(root)?;
    let entry = latest_design(&doc)?;

    tracing::info!(build_target = target, "generating documentation");
    let docs = workflow::ask(llm, &prompt::documentation(entry))?;

    let path = paths::docs_dir(root).join(format!("{target}.md"));
    crate::io::atomic_write(&path, docs.as_bytes())?;
    tracing::info!(path = %path.display(), "wrote documentation");
    Ok(path)
}
