//! CLI command implementation for dagcorrect.
//!
//! - [`correct`] - the correction command run by the binary
//! - [`common`] - option groups flattened into the command
//! - [`command`] - the [`Command`](command::Command) trait

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod command;
pub mod common;
pub mod correct;
