use crate::objective::Objective;
use crate::paths;
use crate::stage::{Refinable, Refinement, StageDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// UserStoryBatch
// ---------------------------------------------------------------------------

/// One generation run: the objectives it was generated from, the model's
/// stories, and any refinement rounds that followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStoryBatch {
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub generated_at: DateTime<Utc>,
    pub objectives_snapshot: Vec<Objective>,
    pub stories: String,
    #[serde(default)]
    pub refined_stories: Vec<Refinement>,
}

impl UserStoryBatch {
    pub fn new(objectives_snapshot: Vec<Objective>, stories: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            objectives_snapshot,
            stories: stories.into(),
            refined_stories: Vec::new(),
        }
    }
}

impl Refinable for UserStoryBatch {
    const SUBJECT: &'static str = "user stories";

    fn original_text(&self) -> &str {
        &self.stories
    }

    fn refinements(&self) -> &[Refinement] {
        &self.refined_stories
    }

    fn refinements_mut(&mut self) -> &mut Vec<Refinement> {
        &mut self.refined_stories
    }
}

// ---------------------------------------------------------------------------
// UserStoriesDoc (bob_userstories.yaml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStoriesDoc {
    #[serde(default)]
    pub user_stories: Vec<UserStoryBatch>,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StageDocument for UserStoriesDoc {
    type Entry = UserStoryBatch;
    const STAGE: &'static str = "user stories";

    fn path(root: &Path) -> PathBuf {
        paths::user_stories_path(root)
    }

    fn entries(&self) -> &[UserStoryBatch] {
        &self.user_stories
    }

    fn entries_mut(&mut self) -> &mut Vec<UserStoryBatch> {
        &mut self.user_stories
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Some(updated_at);
    }
}
