use crate::objective::Objective;
use crate::paths;
use crate::stage::{Refinable, Refinement, StageDocument};
use crate::stories::UserStoryBatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// DesignEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignEntry {
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub generated_at: DateTime<Utc>,
    pub objectives_snapshot: Vec<Objective>,
    /// The `stories` text of every batch at generation time.
    pub user_stories_snapshot: Vec<String>,
    pub design: String,
    #[serde(default)]
    pub refined_designs: Vec<Refinement>,
}

impl DesignEntry {
    pub fn new(
        objectives_snapshot: Vec<Objective>,
        batches: &[UserStoryBatch],
        design: impl Into<String>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            objectives_snapshot,
            user_stories_snapshot: batches.iter().map(|b| b.stories.clone()).collect(),
            design: design.into(),
            refined_designs: Vec::new(),
        }
    }
}

impl Refinable for DesignEntry {
    const SUBJECT: &'static str = "design";

    fn original_text(&self) -> &str {
        &self.design
    }

    fn refinements(&self) -> &[Refinement] {
        &self.refined_designs
    }

    fn refinements_mut(&mut self) -> &mut Vec<Refinement> {
        &mut self.refined_designs
    }
}

// ---------------------------------------------------------------------------
// DesignDoc (bob_design.yaml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignDoc {
    #[serde(default)]
    pub designs: Vec<DesignEntry>,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StageDocument for DesignDoc {
    type Entry = DesignEntry;
    const STAGE: &'static str = "design";

    fn path(root: &Path) -> PathBuf {
        paths::design_path(root)
    }

    fn entries(&self) -> &[DesignEntry] {
        &self.designs
    }

    fn entries_mut(&mut self) -> &mut Vec<DesignEntry> {
        &mut self.designs
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Some(updated_at);
    }
}
