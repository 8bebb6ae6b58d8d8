use thiserror::Error;

#[derive(Debug, Error)]
pub enum BobError {
    #[error("not initialized: run 'bob init'")]
    NotInitialized,

    #[error("no objectives found: add some with 'bob objectives add'")]
    NoObjectives,

    #[error("no user stories found: run 'bob stories generate' first")]
    NoUserStories,

    #[error("no designs found: run 'bob design generate' first")]
    NoDesigns,

    #[error("no objective at index {index} ({len} defined)")]
    ObjectiveIndexOutOfRange { index: usize, len: usize },

    #[error("no {stage} entry at index {index} ({len} defined)")]
    EntryIndexOutOfRange {
        stage: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invalid priority '{0}': must be high, medium, or low")]
    InvalidPriority(String),

    #[error("invalid objectives file: {0}")]
    InvalidObjectivesFile(String),

    #[error("invalid build target '{0}': use letters, digits, '-' or '_'")]
    InvalidTarget(String),

    #[error("unknown configuration key '{key}': valid keys are {valid}")]
    UnknownConfigKey { key: String, valid: String },

    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("provider returned empty output")]
    EmptyOutput,

    #[error(transparent)]
    Llm(#[from] bob_llm::LlmError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BobError>;
