//! Workflow layer between argument parsing and the git backends

pub mod orchestration;
