use crate::interact::Console;
use crate::output::{print_json, print_table, short_time};
use anyhow::Context;
use bob_core::objective::{self, Objective, ObjectivesDoc, Priority};
use bob_core::stage::StageDocument;
use clap::Subcommand;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const DONE_COMMAND: &str = ":done";

#[derive(Subcommand)]
pub enum ObjectivesSubcommand {
    /// List objectives
    List,

    /// Add objectives from flags, a YAML file, or interactively
    Add {
        /// YAML file with a list of {title, description, priority}
        #[arg(long, conflicts_with_all = ["title", "description", "priority"])]
        file: Option<PathBuf>,

        #[arg(long, requires = "description")]
        title: Option<String>,

        #[arg(long, requires = "title")]
        description: Option<String>,

        /// high, medium, or low (default: medium)
        #[arg(long, requires = "title")]
        priority: Option<String>,
    },

    /// Remove the objective at a 1-based index
    Remove { index: usize },

    /// Delete all objectives
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(root: &Path, subcmd: ObjectivesSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ObjectivesSubcommand::List => list(root, json),
        ObjectivesSubcommand::Add {
            file,
            title,
            description,
            priority,
        } => add(root, file.as_deref(), title, description, priority.as_deref(), json),
        ObjectivesSubcommand::Remove { index } => remove(root, index, json),
        ObjectivesSubcommand::Clear { yes } => clear(root, yes, json),
    }
}

fn load(root: &Path) -> anyhow::Result<ObjectivesDoc> {
    ObjectivesDoc::load(root).context("failed to load bob_objectives.yaml")
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(root)?;
    if json {
        return print_json(&doc.objectives);
    }
    if doc.objectives.is_empty() {
        println!("No objectives yet. Add one with 'bob objectives add'.");
        return Ok(());
    }
    let rows = doc
        .objectives
        .iter()
        .enumerate()
        .map(|(i, o)| {
            vec![
                (i + 1).to_string(),
                o.priority.to_string(),
                o.title.clone(),
                crate::output::preview(&o.description, 60),
                short_time(&o.added_at),
            ]
        })
        .collect();
    print_table(&["#", "PRIORITY", "TITLE", "DESCRIPTION", "ADDED"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

fn add(
    root: &Path,
    file: Option<&Path>,
    title: Option<String>,
    description: Option<String>,
    priority: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let new = match (file, title, description) {
        (Some(path), _, _) => objective::import_file(path)
            .with_context(|| format!("failed to import {}", path.display()))?,
        (None, Some(title), Some(description)) => {
            let priority = priority.map_or(Ok(Priority::Medium), str::parse)?;
            vec![Objective::new(title, description, priority)]
        }
        _ => {
            println!("Enter objectives. Type {DONE_COMMAND} as the title to finish.");
            prompt_objectives(&mut Console::stdio())?
        }
    };

    if new.is_empty() {
        println!("No objectives added.");
        return Ok(());
    }

    let mut doc = load(root)?;
    let added = new.len();
    doc.extend(new);
    doc.save(root).context("failed to save bob_objectives.yaml")?;
    tracing::debug!(added, total = doc.objectives.len(), "objectives saved");

    if json {
        return print_json(&doc.objectives[doc.objectives.len() - added..]);
    }
    println!(
        "Added {added} objective{} ({} total).",
        if added == 1 { "" } else { "s" },
        doc.objectives.len()
    );
    Ok(())
}

/// Read objectives until `:done` or end of input. Invalid priorities are
/// asked again.
fn prompt_objectives<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> anyhow::Result<Vec<Objective>> {
    let mut out = Vec::new();
    loop {
        let Some(title) = console.ask_required("Title: ")? else {
            break;
        };
        if title == DONE_COMMAND {
            break;
        }
        let Some(description) = console.ask_required("Description: ")? else {
            break;
        };
        let priority = loop {
            let Some(answer) = console.ask("Priority (high/medium/low) [medium]: ")? else {
                break None;
            };
            if answer.trim().is_empty() {
                break Some(Priority::Medium);
            }
            match answer.parse::<Priority>() {
                Ok(p) => break Some(p),
                Err(e) => console.say(&e.to_string())?,
            }
        };
        let Some(priority) = priority else {
            break;
        };
        out.push(Objective::new(title, description, priority));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// remove
// ---------------------------------------------------------------------------

fn remove(root: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let mut doc = load(root)?;
    let removed = doc.remove(index)?;
    doc.save(root).context("failed to save bob_objectives.yaml")?;

    if json {
        return print_json(&removed);
    }
    println!("Removed objective {index}: {}", removed.title);
    Ok(())
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

fn clear(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes && !Console::stdio().confirm("Delete all objectives?")? {
        println!("Aborted.");
        return Ok(());
    }
    let removed = ObjectivesDoc::clear(root).context("failed to delete bob_objectives.yaml")?;

    if json {
        return print_json(&serde_json::json!({ "cleared": removed }));
    }
    if removed {
        println!("All objectives cleared.");
    } else {
        println!("No objectives to clear.");
    }
    Ok(())
}
