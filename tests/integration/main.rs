//! Integration tests for dagcorrect.
//!
//! These tests validate end-to-end workflows through the library pipeline and the binary.

mod helpers;
mod test_correct_command;
mod test_pipeline_concurrency;
