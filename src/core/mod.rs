//! Ambient plumbing shared by the pipeline stages.

pub mod config;
pub mod error;
pub mod fs_utils;
pub mod output;
