pub mod build;
pub mod config;
pub mod design;
pub mod error;
pub mod io;
pub mod objective;
pub mod paths;
pub mod prompt;
pub mod stage;
pub mod stories;
pub mod timestamp;
pub mod workflow;

pub use error::{BobError, Result};
