//! Bitlet: a miniature version-control engine
//!
//! - `areas`: the on-disk parts of a repository
//! - `artifacts`: objects, branches, histories and the merge engine
//! - `commands`: one `impl Repository` block per command
//! - `config`: environment-driven settings
//! - `errors`: the typed failures commands report

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
