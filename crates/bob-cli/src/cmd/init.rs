use crate::output::print_json;
use anyhow::Context;
use bob_core::config::{LlmConfig, ProjectConfig};
use bob_core::{io, paths};
use clap::Args;
use std::path::Path;

#[derive(Args, Default)]
pub struct InitOptions {
    /// Project name (default: the root directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Short project description
    #[arg(long)]
    pub description: Option<String>,

    /// Project author
    #[arg(long)]
    pub author: Option<String>,

    /// Provider recorded in bob_config.json
    #[arg(long)]
    pub ai_provider: Option<String>,

    /// Language used for generated tests (python, rust, javascript, typescript)
    #[arg(long)]
    pub language: Option<String>,
}

/// Files and directories touched by `bob init`, for reporting.
#[derive(Default, serde::Serialize)]
struct InitReport {
    created: Vec<String>,
    existing: Vec<String>,
}

impl InitReport {
    fn record(&mut self, name: &str, created: bool) {
        if created {
            self.created.push(name.to_string());
        } else {
            self.existing.push(name.to_string());
        }
    }
}

pub fn run(root: &Path, opts: InitOptions, json: bool) -> anyhow::Result<()> {
    let project_name = opts.name.clone().unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    });

    let mut report = InitReport::default();

    // 1. Directory layout
    for dir in [paths::SRC_DIR, paths::TESTS_DIR, paths::DOCS_DIR] {
        let p = root.join(dir);
        let existed = p.is_dir();
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
        report.record(&format!("{dir}/"), !existed);
    }

    // 2. bob_config.json
    let existing = ProjectConfig::load_optional(root).context("failed to read bob_config.json")?;
    let project = match existing {
        Some(cfg) => {
            report.record(paths::CONFIG_FILE, false);
            cfg
        }
        None => {
            let cfg = new_project_config(&project_name, &opts)?;
            cfg.save(root).context("failed to write bob_config.json")?;
            report.record(paths::CONFIG_FILE, true);
            cfg
        }
    };

    // 3. llm_config.json
    let llm_created = !paths::llm_config_path(root).exists();
    if llm_created {
        LlmConfig::default()
            .save(root)
            .context("failed to write llm_config.json")?;
    }
    report.record(paths::LLM_CONFIG_FILE, llm_created);

    // 4. README.md
    let readme = readme_content(&project);
    let readme_created = io::write_if_missing(&root.join(paths::README_MD), readme.as_bytes())
        .context("failed to write README.md")?;
    report.record(paths::README_MD, readme_created);

    // 5. .gitignore: provider keys stay out of version control
    let added = io::ensure_gitignore_entry(root, paths::LLM_CONFIG_FILE)
        .context("failed to update .gitignore")?;
    report.record(".gitignore", added);

    tracing::debug!(root = %root.display(), created = report.created.len(), "init finished");

    if json {
        return print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "project_name": project.project_name,
            "created": report.created,
            "existing": report.existing,
        }));
    }

    println!("Initialized bob project '{}' in {}", project.project_name, root.display());
    for name in &report.created {
        println!("  created: {name}");
    }
    for name in &report.existing {
        println!("  exists:  {name}");
    }
    println!();
    println!("Next steps:");
    println!("  bob llm use <provider>     choose ollama, openai, anthropic, or groq");
    println!("  bob objectives add         describe what the project must achieve");
    println!("  bob stories generate       turn objectives into user stories");
    Ok(())
}

fn new_project_config(name: &str, opts: &InitOptions) -> anyhow::Result<ProjectConfig> {
    let mut cfg = ProjectConfig::new(name);
    if let Some(d) = &opts.description {
        cfg.description = d.clone();
    }
    if let Some(a) = &opts.author {
        cfg.author = a.clone();
    }
    if let Some(l) = &opts.language {
        cfg.language = l.trim().to_ascii_lowercase();
    }
    if let Some(p) = &opts.ai_provider {
        cfg.set_ai_provider(p)?;
    }
    Ok(cfg)
}

fn readme_content(project: &ProjectConfig) -> String {
    let mut out = format!("# {}\n\n", project.project_name);
    if !project.description.is_empty() {
        out.push_str(&project.description);
        out.push_str("\n\n");
    }
    out.push_str(
        "## Planning files\n\n\
         - `bob_objectives.yaml`: project objectives\n\
         - `bob_userstories.yaml`: generated user stories\n\
         - `bob_design.yaml`: generated class and function designs\n",
    );
    out
}
