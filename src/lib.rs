pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod publisher;
pub mod resolver;
pub mod runner;
pub mod ui;

pub use cli::orchestration::{RunOutcome, RunSettings, TagSemverHandler};
pub use domain::{ReleaseType, TagTriple};
pub use error::{BackendError, Result, TagSemverError};
