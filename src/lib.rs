//! Recitation grader: compares a transcribed recitation against its reference
//! text and produces a percentage grade with a pass/fail verdict.

pub mod config;
pub mod grading;
pub mod types;
