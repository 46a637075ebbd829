use serde::Serialize;

use crate::grading::alignment::{Alignment, AlignmentStep, StepKind, PHONETIC_PENALTY};
use crate::grading::text::Token;
use crate::grading::{validate_threshold, GradeError, GradeResult, Result};

/// Credit deducted for each transcript word with no reference counterpart.
///
/// A quarter of what a missing reference word costs, so extra words lower a
/// grade but never below the score the transcript would get if each extra
/// word had instead knocked out a reference word.
pub const INSERTION_PENALTY: f64 = 0.25;

/// Numeric part of a grade, before the texts are attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub grade: f64,
    pub is_passed: bool,
    pub similarity_score: f64,
}

impl Verdict {
    pub fn into_result(self, reference_text: String, transcribed_text: String) -> GradeResult {
        GradeResult {
            grade: self.grade,
            is_passed: self.is_passed,
            similarity_score: self.similarity_score,
            reference_text,
            transcribed_text,
        }
    }
}

/// Credit earned by one alignment step, with the words involved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepScore {
    pub kind: StepKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
    pub credit: f64,
}

/// Turns alignments into grades.
#[derive(Debug, Clone, Default)]
pub struct Scorer {}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(
        &self,
        alignment: &Alignment,
        reference_len: usize,
        pass_threshold: f64,
    ) -> Result<Verdict> {
        if reference_len == 0 {
            return Err(GradeError::EmptyReference);
        }
        validate_threshold(pass_threshold)?;
        let (earned, penalty) = alignment.steps.iter().map(step_credit).fold(
            (0.0f64, 0.0f64),
            |(earned, penalty), credit| {
                if credit < 0.0 {
                    (earned, penalty - credit)
                } else {
                    (earned + credit, penalty)
                }
            },
        );
        let adjusted = earned - penalty.min(earned);
        let similarity_score = (adjusted / reference_len.max(1) as f64).clamp(0.0, 1.0);
        let grade = round_to_hundredths(similarity_score * 100.0);
        Ok(Verdict {
            grade,
            is_passed: grade >= pass_threshold,
            similarity_score,
        })
    }

    /// Per-step credits labelled with the tokens each step touched.
    pub fn breakdown(
        &self,
        alignment: &Alignment,
        reference: &[Token],
        hypothesis: &[Token],
    ) -> Vec<StepScore> {
        alignment
            .steps
            .iter()
            .map(|step| StepScore {
                kind: step.kind,
                reference: token_text(reference, step.reference_index),
                hypothesis: token_text(hypothesis, step.hypothesis_index),
                credit: step_credit(step),
            })
            .collect()
    }
}

/// Pairs earn their similarity, deletions nothing and insertions a penalty.
pub fn step_credit(step: &AlignmentStep) -> f64 {
    match step.kind {
        StepKind::Exact => 1.0,
        StepKind::PhoneticMatch => 1.0 - PHONETIC_PENALTY,
        StepKind::Substitution => step.similarity.clamp(0.0, 1.0),
        StepKind::Insertion => -INSERTION_PENALTY,
        StepKind::Deletion => 0.0,
    }
}

fn token_text(tokens: &[Token], index: Option<usize>) -> Option<String> {
    index
        .and_then(|idx| tokens.get(idx))
        .map(|token| token.text.clone())
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
