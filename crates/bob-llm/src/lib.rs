//! `bob-llm`: provider resolution and the prompt/response bridge.
//!
//! Every `bob` command that talks to a model goes through this crate. The
//! configured provider name is parsed into a closed [`ProviderKind`], its
//! settings are validated by the resolver, and the resulting [`LlmClient`]
//! sends a single user-role prompt over blocking HTTP.
//!
//! # Architecture
//!
//! ```text
//! provider name + BTreeMap<String, ProviderSettings>
//!     │
//!     ▼
//! resolve()        ← parses ProviderKind, checks model / API key / base URL
//!     │
//!     ▼
//! ResolvedProvider ← fully validated, no HTTP client yet
//!     │
//!     ▼
//! LlmClient        ← reqwest::blocking, one handler per ProviderKind
//!     │
//!     ▼
//! Result<String, LlmError>
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use bob_llm::{connect, Complete, ProviderSettings, ProviderKind};
//! use std::collections::BTreeMap;
//!
//! let mut providers = BTreeMap::new();
//! providers.insert("ollama".to_string(), ProviderSettings::for_kind(ProviderKind::Ollama));
//!
//! let client = connect("ollama", &providers)?;
//! let answer = client.complete("Say hello")?;
//! ```

pub mod client;
pub mod error;
pub mod resolver;
pub mod types;


pub use client::{Complete, LlmClient};
pub use error::LlmError;
pub use resolver::{connect, resolve, resolve_with_env, ResolvedProvider};
pub use types::{ProviderKind, ProviderSettings};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, LlmError>;
