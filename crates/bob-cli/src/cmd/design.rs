use super::{open_provider, refine_interactively, refine_saved};
use crate::interact::Console;
use crate::output::{print_json, short_time};
use anyhow::Context;
use bob_core::design::DesignDoc;
use bob_core::objective::ObjectivesDoc;
use bob_core::stage::{Refinable, StageDocument};
use bob_core::stories::UserStoriesDoc;
use bob_core::{workflow, BobError};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum DesignSubcommand {
    /// Propose classes and functions from objectives and user stories
    Generate {
        /// Save the generated design without offering refinement
        #[arg(long)]
        no_interactive: bool,
    },

    /// Show every design entry with its latest text
    List,

    /// Revise a design entry with feedback
    Refine {
        #[arg(required = true)]
        feedback: Vec<String>,

        /// 1-based entry number (default: latest)
        #[arg(long)]
        entry: Option<usize>,
    },
}

pub fn run(
    root: &Path,
    subcmd: DesignSubcommand,
    provider: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        DesignSubcommand::Generate { no_interactive } => {
            generate(root, provider, !no_interactive && !json, json)
        }
        DesignSubcommand::List => list(root, json),
        DesignSubcommand::Refine { feedback, entry } => refine_saved::<DesignDoc>(
            root,
            entry,
            &feedback.join(" "),
            provider,
            json,
            BobError::NoDesigns,
        ),
    }
}

fn generate(
    root: &Path,
    provider: Option<&str>,
    interactive: bool,
    json: bool,
) -> anyhow::Result<()> {
    let objectives = ObjectivesDoc::load(root).context("failed to load bob_objectives.yaml")?;
    if objectives.objectives.is_empty() {
        return Err(BobError::NoObjectives.into());
    }
    let stories = UserStoriesDoc::load(root).context("failed to load bob_userstories.yaml")?;
    if stories.user_stories.is_empty() {
        return Err(BobError::NoUserStories.into());
    }
    let llm = open_provider(root, provider)?;

    if !json {
        println!(
            "Generating design from {} objective(s) and {} story batch(es)...",
            objectives.objectives.len(),
            stories.user_stories.len()
        );
    }
    let mut entry =
        workflow::generate_design(&objectives.objectives, &stories.user_stories, &llm)?;

    if interactive {
        println!("\n{}", entry.design);
        refine_interactively(&mut Console::stdio(), &mut entry, &llm)?;
    }

    let mut doc = DesignDoc::load(root).context("failed to load bob_design.yaml")?;
    doc.append(entry);
    doc.save(root).context("failed to save bob_design.yaml")?;
    let saved = doc.designs.len();
    tracing::debug!(entry = saved, "design saved");

    if json {
        return print_json(&doc.designs[saved - 1]);
    }
    if !interactive {
        println!("\n{}", doc.designs[saved - 1].current_text());
    }
    println!("\nSaved as design {saved} in bob_design.yaml");
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let doc = DesignDoc::load(root).context("failed to load bob_design.yaml")?;
    if json {
        return print_json(&doc.designs);
    }
    if doc.designs.is_empty() {
        println!("No designs yet. Run 'bob design generate'.");
        return Ok(());
    }
    for (i, entry) in doc.designs.iter().enumerate() {
        println!(
            "Design {}  generated {}  story batches: {}  refinements: {}",
            i + 1,
            short_time(&entry.generated_at),
            entry.user_stories_snapshot.len(),
            entry.refined_designs.len()
        );
        println!("{}\n", entry.current_text().trim_end());
    }
    Ok(())
}
