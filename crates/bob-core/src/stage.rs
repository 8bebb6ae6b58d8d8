//! Shared persistence for the three planning stages.
//!
//! Each stage document is a YAML file holding an append-only list of entries
//! plus `created_at` / `updated_at`. Generated entries carry a list of
//! [`Refinement`] rounds that is only ever appended to.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Refinement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refinement {
    pub refinement_prompt: String,
    pub refined_result: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub refined_at: DateTime<Utc>,
}

/// A generated entry that can be revised by follow-up prompts.
pub trait Refinable {
    /// Noun used in prompts and messages ("user stories", "design").
    const SUBJECT: &'static str;

    fn original_text(&self) -> &str;
    fn refinements(&self) -> &[Refinement];
    fn refinements_mut(&mut self) -> &mut Vec<Refinement>;

    /// Latest refined result, or the original text if never refined.
    fn current_text(&self) -> &str {
        self.refinements()
            .last()
            .map(|r| r.refined_result.as_str())
            .unwrap_or_else(|| self.original_text())
    }

    fn add_refinement(&mut self, prompt: String, result: String) -> &Refinement {
        let list = self.refinements_mut();
        list.push(Refinement {
            refinement_prompt: prompt,
            refined_result: result,
            refined_at: Utc::now(),
        });
        &list[list.len() - 1]
    }
}

// ---------------------------------------------------------------------------
// StageDocument
// ---------------------------------------------------------------------------

/// `bob_objectives.yaml` -> `bob_objectives.yaml.20240501T100000.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.{stamp}.bak"))
}

/// Rename `path` to a backup if it exists, is non-empty, and does not parse
/// as `D`. Returns the backup location when one was made.
pub fn back_up_unparsable<D: DeserializeOwned>(path: &Path) -> Result<Option<PathBuf>> {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if data.trim().is_empty() || serde_yaml::from_str::<D>(&data).is_ok() {
        return Ok(None);
    }
    let backup = backup_path(path);
    std::fs::rename(path, &backup)?;
    tracing::warn!(
        path = %path.display(),
        backup = %backup.display(),
        "moved unparsable file aside before saving"
    );
    Ok(Some(backup))
}

pub trait StageDocument: Default + Serialize + DeserializeOwned {
    type Entry;

    /// Stage name used in messages ("objectives", "user stories", "design").
    const STAGE: &'static str;

    fn path(root: &Path) -> PathBuf;
    fn entries(&self) -> &[Self::Entry];
    fn entries_mut(&mut self) -> &mut Vec<Self::Entry>;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>);

    /// Load the document at `path`. A missing, empty, or unparsable file
    /// yields the empty skeleton; only other I/O failures are errors. An
    /// unparsable file is left in place and moved aside by the next save.
    fn load_from(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_yaml::from_str(&data) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "unparsable {} file, starting from an empty document (kept as a backup on save)",
                    Self::STAGE
                );
                Ok(Self::default())
            }
        }
    }

    fn load(root: &Path) -> Result<Self> {
        Self::load_from(&Self::path(root))
    }

    /// Serialize to YAML. Multi-line strings are emitted as block literals.
    /// An existing file that does not parse is renamed first, never replaced.
    fn save_to(&self, path: &Path) -> Result<()> {
        back_up_unparsable::<Self>(path)?;
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())?;
        tracing::debug!(path = %path.display(), "saved {}", Self::STAGE);
        Ok(())
    }

    fn save(&self, root: &Path) -> Result<()> {
        self.save_to(&Self::path(root))
    }

    /// Refresh `updated_at`, setting `created_at` on first write.
    fn touch(&mut self) {
        let now = Utc::now();
        let created = self.created_at().unwrap_or(now);
        self.set_timestamps(Some(created), now);
    }

    fn append(&mut self, entry: Self::Entry) {
        self.entries_mut().push(entry);
        self.touch();
    }

    /// 1-based lookup, as shown by the `list` commands.
    fn entry_mut(&mut self, index: usize) -> Result<&mut Self::Entry> {
        let len = self.entries().len();
        if index == 0 || index > len {
            return Err(crate::error::BobError::EntryIndexOutOfRange {
                stage: Self::STAGE,
                index,
                len,
            });
        }
        Ok(&mut self.entries_mut()[index - 1])
    }

    fn latest(&self) -> Option<&Self::Entry> {
        self.entries().last()
    }
}
