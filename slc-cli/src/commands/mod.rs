//! CLI command implementations.

pub mod common;
pub mod config;
pub mod publish;
pub mod resolve;
pub mod run;
