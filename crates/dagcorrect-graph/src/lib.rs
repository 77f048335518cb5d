#![deny(unsafe_code)]

//! Alignment graph consensus for long-read correction.
//!
//! This crate provides the pieces a correction worker needs once it holds a
//! template and the reads aligned to it:
//! - [`Alignment`], the gapped read-to-template correspondence, together with
//!   [`normalize_gaps`] and [`trim_alignment`]
//! - [`AlignmentGraph`], a directed acyclic graph seeded from the template
//!   backbone onto which alignments are overlaid, merged and walked to
//!   produce [`ConsensusResult`]s

pub mod alignment;
pub mod graph;

pub use alignment::{Alignment, GAP, normalize_gaps, trim_alignment};
pub use graph::{AlignmentGraph, ConsensusResult, NodeId};
