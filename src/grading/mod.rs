pub mod alignment;
pub mod cli;
pub mod metrics;
pub mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use alignment::phonetics::PhoneticTable;
use alignment::{Aligner, Alignment};
use metrics::{Scorer, StepScore};
use text::{normalize, tokenize, Token};

/// Pass threshold applied when no configuration overrides it.
pub const DEFAULT_PASS_THRESHOLD: f64 = 70.0;

/// Convenient alias for results returned by grading modules.
pub type Result<T> = std::result::Result<T, GradeError>;

/// Reasons a grading request is rejected before any score is produced.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("reference text is empty after normalization")]
    EmptyReference,
    #[error("transcribed text is empty after normalization")]
    EmptyHypothesis,
    #[error("pass threshold must be a finite value within [0, 100], got {0}")]
    InvalidThreshold(f64),
    #[error("phonetic lexicon line {line}: {message}")]
    Lexicon { line: usize, message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl GradeError {
    pub(crate) fn lexicon(line: usize, message: impl Into<String>) -> Self {
        Self::Lexicon {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// How a transcription with no recognizable words is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyHypothesisPolicy {
    /// Grade it as a complete miss (0%, not passed).
    #[default]
    Score,
    /// Reject the request with [`GradeError::EmptyHypothesis`].
    Reject,
}

/// Grading knobs shared by the library, CLI and configuration file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingSettings {
    pub pass_threshold: f64,
    pub empty_hypothesis: EmptyHypothesisPolicy,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            empty_hypothesis: EmptyHypothesisPolicy::default(),
        }
    }
}

impl GradingSettings {
    pub fn with_threshold(mut self, pass_threshold: f64) -> Self {
        self.pass_threshold = pass_threshold;
        self
    }

    pub fn with_empty_hypothesis(mut self, policy: EmptyHypothesisPolicy) -> Self {
        self.empty_hypothesis = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.pass_threshold)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && (0.0..=100.0).contains(&threshold) {
        Ok(())
    } else {
        Err(GradeError::InvalidThreshold(threshold))
    }
}

/// Outcome of one grading call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResult {
    pub grade: f64,
    pub is_passed: bool,
    pub similarity_score: f64,
    pub reference_text: String,
    pub transcribed_text: String,
}

/// A grade together with the alignment it was derived from.
#[derive(Debug, Clone)]
pub struct GradeReport {
    pub result: GradeResult,
    pub alignment: Alignment,
    pub steps: Vec<StepScore>,
}

struct Evaluation {
    result: GradeResult,
    alignment: Alignment,
    reference_tokens: Vec<Token>,
    hypothesis_tokens: Vec<Token>,
}

/// Runs normalize → tokenize → align → score for individual requests.
///
/// A grader only borrows its [`PhoneticTable`], so one instance can be shared
/// across threads and reused for any number of calls.
#[derive(Debug, Clone)]
pub struct Grader<'t> {
    aligner: Aligner<'t>,
    scorer: Scorer,
    settings: GradingSettings,
}

impl Grader<'static> {
    /// Builds a grader backed by the bundled phonetic table.
    pub fn new(settings: GradingSettings) -> Result<Self> {
        Grader::with_table(PhoneticTable::shared(), settings)
    }
}

impl<'t> Grader<'t> {
    pub fn with_table(table: &'t PhoneticTable, settings: GradingSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            aligner: Aligner::new(table),
            scorer: Scorer::new(),
            settings,
        })
    }

    pub fn settings(&self) -> &GradingSettings {
        &self.settings
    }

    pub fn grade(&self, reference: &str, transcribed: &str) -> Result<GradeResult> {
        self.evaluate(reference, transcribed)
            .map(|evaluation| evaluation.result)
    }

    /// Grades a request and keeps the alignment plus per-step credits.
    pub fn grade_detailed(&self, reference: &str, transcribed: &str) -> Result<GradeReport> {
        let evaluation = self.evaluate(reference, transcribed)?;
        let steps = self.scorer.breakdown(
            &evaluation.alignment,
            &evaluation.reference_tokens,
            &evaluation.hypothesis_tokens,
        );
        Ok(GradeReport {
            result: evaluation.result,
            alignment: evaluation.alignment,
            steps,
        })
    }

    fn evaluate(&self, reference: &str, transcribed: &str) -> Result<Evaluation> {
        let reference_text = normalize(reference);
        let transcribed_text = normalize(transcribed);
        let reference_tokens = tokenize(&reference_text);
        let hypothesis_tokens = tokenize(&transcribed_text);
        self.ensure_inputs(&reference_tokens, &hypothesis_tokens)?;

        let alignment = self.aligner.align(&reference_tokens, &hypothesis_tokens);
        let verdict = self.scorer.score(
            &alignment,
            reference_tokens.len(),
            self.settings.pass_threshold,
        )?;
        debug!(
            reference_tokens = reference_tokens.len(),
            hypothesis_tokens = hypothesis_tokens.len(),
            total_cost = alignment.total_cost,
            grade = verdict.grade,
            is_passed = verdict.is_passed,
            "graded recitation"
        );

        Ok(Evaluation {
            result: verdict.into_result(reference_text, transcribed_text),
            alignment,
            reference_tokens,
            hypothesis_tokens,
        })
    }

    fn ensure_inputs(&self, reference: &[Token], hypothesis: &[Token]) -> Result<()> {
        if reference.is_empty() {
            warn!("rejecting grading request with empty reference");
            return Err(GradeError::EmptyReference);
        }
        if hypothesis.is_empty() && self.settings.empty_hypothesis == EmptyHypothesisPolicy::Reject
        {
            warn!("rejecting grading request with empty transcription");
            return Err(GradeError::EmptyHypothesis);
        }
        Ok(())
    }
}

/// One-shot grading against the bundled table with a custom threshold.
pub fn grade(reference: &str, transcribed: &str, pass_threshold: f64) -> Result<GradeResult> {
    Grader::new(GradingSettings::default().with_threshold(pass_threshold))?
        .grade(reference, transcribed)
}
