use super::open_provider;
use crate::output::print_json;
use anyhow::Context;
use bob_core::build::{self, DEFAULT_TARGET};
use bob_core::config::ProjectConfig;
use bob_core::design::DesignDoc;
use bob_core::paths;
use bob_core::stage::StageDocument;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum BuildSubcommand {
    /// Generate a test file from the latest design
    Test {
        /// Component name used for the output file
        #[arg(default_value = DEFAULT_TARGET)]
        target: String,
    },

    /// Generate Markdown documentation from the latest design
    Docs {
        /// Component name used for the output file
        #[arg(default_value = DEFAULT_TARGET)]
        target: String,
    },
}

pub fn run(
    root: &Path,
    subcmd: BuildSubcommand,
    provider: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (kind, target) = match subcmd {
        BuildSubcommand::Test { target } => ("tests", target),
        BuildSubcommand::Docs { target } => ("docs", target),
    };
    paths::validate_target(&target)?;

    // Check local inputs before contacting the provider.
    let config = ProjectConfig::load(root).context("failed to load bob_config.json")?;
    let designs = DesignDoc::load(root).context("failed to load bob_design.yaml")?;
    build::latest_design(&designs)?;
    let llm = open_provider(root, provider)?;

    let path = if kind == "tests" {
        build::generate_tests(root, &config, &target, &llm)?
    } else {
        build::generate_docs(root, &target, &llm)?
    };

    let shown = path.strip_prefix(root).unwrap_or(&path);
    if json {
        return print_json(&serde_json::json!({
            "kind": kind,
            "target": target,
            "path": shown.display().to_string(),
        }));
    }
    println!("Generated {kind}: {}", shown.display());
    Ok(())
}
