use crate::error::{BobError, Result};
use crate::paths;
use crate::stage::StageDocument;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = BobError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(BobError::InvalidPriority(s.to_string())),
        }
    }
}

/// Stored files are hand-edited, so reading goes through `FromStr` too.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(d: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Objective
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub added_at: DateTime<Utc>,
}

impl Objective {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            added_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectivesDoc (bob_objectives.yaml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectivesDoc {
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::timestamp::option::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StageDocument for ObjectivesDoc {
    type Entry = Objective;
    const STAGE: &'static str = "objectives";

    fn path(root: &Path) -> PathBuf {
        paths::objectives_path(root)
    }

    fn entries(&self) -> &[Objective] {
        &self.objectives
    }

    fn entries_mut(&mut self) -> &mut Vec<Objective> {
        &mut self.objectives
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Some(updated_at);
    }
}

impl ObjectivesDoc {
    /// Append several objectives with a single timestamp refresh.
    pub fn extend(&mut self, objectives: impl IntoIterator<Item = Objective>) {
        self.objectives.extend(objectives);
        self.touch();
    }

    /// Remove the objective at 1-based `index`. Other entries keep their order.
    pub fn remove(&mut self, index: usize) -> Result<Objective> {
        let len = self.objectives.len();
        if index == 0 || index > len {
            return Err(BobError::ObjectiveIndexOutOfRange { index, len });
        }
        let removed = self.objectives.remove(index - 1);
        self.touch();
        Ok(removed)
    }

    /// Delete the objectives file. Returns false if there was nothing to delete.
    pub fn clear(root: &Path) -> Result<bool> {
        crate::io::remove_if_exists(&Self::path(root))
    }
}

// ---------------------------------------------------------------------------
// Bulk import
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ObjectiveInput {
    title: String,
    description: String,
    priority: String,
}

/// Parse a YAML list of `{title, description, priority}` records.
///
/// The whole list is validated before anything is returned, so a bad record
/// never results in a partial import.
pub fn parse_import(yaml: &str) -> Result<Vec<Objective>> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)
        .map_err(|e| BobError::InvalidObjectivesFile(format!("not valid YAML: {e}")))?;
    let serde_yaml::Value::Sequence(items) = value else {
        return Err(BobError::InvalidObjectivesFile(
            "file must contain a list of objectives".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let input: ObjectiveInput = serde_yaml::from_value(item).map_err(|_| {
                BobError::InvalidObjectivesFile(format!(
                    "objective {} must have title, description, and priority",
                    i + 1
                ))
            })?;
            let priority: Priority = input.priority.parse()?;
            Ok(Objective::new(input.title, input.description, priority))
        })
        .collect()
}

pub fn import_file(path: &Path) -> Result<Vec<Objective>> {
    let data = std::fs::read_to_string(path)?;
    parse_import(&data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
