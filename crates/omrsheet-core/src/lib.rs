//! omrsheet-core: Answer parsing, scoring, comparison and analytics.
//!
//! This crate defines the data model and the pure grading logic that the
//! renderer, scanner integration and CLI build on.

pub mod compare;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod patterns;
pub mod report;
pub mod roster;
pub mod scoring;
pub mod session;
pub mod statistics;
pub mod traits;
