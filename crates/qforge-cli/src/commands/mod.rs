//! CLI command implementations.

pub mod backends;
pub mod common;
pub mod library;
pub mod run;
pub mod state;
pub mod version;
