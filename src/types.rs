//! Request and response shapes exchanged with callers of the grader

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::grading::metrics::StepScore;
use crate::grading::{GradeReport, GradeResult};

/// Response body returned for a graded recitation.
///
/// Field order matches the documented JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResponse {
    pub transcribed_text: String,
    pub grade: f64,
    pub is_passed: bool,
    pub reference_text: String,
    pub similarity_score: f64,
    /// Wall-clock time spent grading, measured by the caller.
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepScore>>,
}

impl GradeResponse {
    pub fn new(result: GradeResult, elapsed: Duration) -> Self {
        Self {
            transcribed_text: result.transcribed_text,
            grade: result.grade,
            is_passed: result.is_passed,
            reference_text: result.reference_text,
            similarity_score: result.similarity_score,
            processing_time_ms: elapsed.as_millis().try_into().unwrap_or(u64::MAX),
            steps: None,
        }
    }

    /// Builds a response that also lists per-step credits.
    pub fn detailed(report: GradeReport, elapsed: Duration) -> Self {
        let mut response = Self::new(report.result, elapsed);
        response.steps = Some(report.steps);
        response
    }
}

/// One reference/transcript pair in a batch file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCase {
    #[serde(alias = "reference_text", alias = "compared_letters")]
    pub reference: String,
    #[serde(alias = "transcribed_text", alias = "hypothesis")]
    pub transcript: String,
}

/// Result slot for a batch case: a response or the reason it was rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Graded(GradeResponse),
    Rejected { error: String },
}

/// Parses a JSON array of batch cases.
pub fn parse_batch(raw: &str) -> Result<Vec<BatchCase>> {
    let cases: Vec<BatchCase> =
        serde_json::from_str(raw).context("failed to parse batch JSON")?;
    ensure!(!cases.is_empty(), "batch must contain at least one case");
    Ok(cases)
}
