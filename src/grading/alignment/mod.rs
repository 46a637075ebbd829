pub mod edit;
pub mod phonetics;
pub mod similarity;

use serde::Serialize;

use crate::grading::text::{Token, TokenKind};
use phonetics::PhoneticTable;
use similarity::similarity_ratio;

/// Credit withheld from a phonetic match relative to an exact one.
pub const PHONETIC_PENALTY: f64 = 0.05;
/// Cost multiplier for pairing two tokens. At 2.0 a complete mismatch costs
/// the same as deleting one token and inserting the other.
pub const SUBSTITUTION_WEIGHT: f64 = 2.0;
/// Cost of leaving one token unmatched.
pub const GAP_COST: f64 = 1.0;

/// Share of credit kept when a spoken letter name contains, or is contained
/// in, a listed name.
const NAME_CONTAINMENT_DISCOUNT: f64 = 0.9;
/// Minimum similarity for the containment rule to apply.
const NAME_CONTAINMENT_MIN_SIMILARITY: f64 = 0.7;
/// Credit for a short spoken form that includes the letter itself.
const LETTER_PRESENT_CREDIT: f64 = 0.8;
/// Share of credit kept for the closest listed name otherwise.
const NAME_SIMILARITY_DISCOUNT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Exact,
    PhoneticMatch,
    Substitution,
    /// Hypothesis token with no reference counterpart.
    Insertion,
    /// Reference token the hypothesis never produced.
    Deletion,
}

impl StepKind {
    pub fn is_pair(self) -> bool {
        matches!(
            self,
            StepKind::Exact | StepKind::PhoneticMatch | StepKind::Substitution
        )
    }
}

/// One decision on the optimal alignment path.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentStep {
    pub kind: StepKind,
    pub reference_index: Option<usize>,
    pub hypothesis_index: Option<usize>,
    pub cost: f64,
    /// Credit the pair earns in `[0, 1]`; zero for gaps.
    pub similarity: f64,
}

/// Ordered alignment steps with their summed cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub steps: Vec<AlignmentStep>,
    pub total_cost: f64,
}

impl Alignment {
    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|step| step.kind == kind).count()
    }
}

/// How well a reference/hypothesis token pair matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub kind: StepKind,
    pub similarity: f64,
}

impl PairScore {
    pub fn cost(&self) -> f64 {
        SUBSTITUTION_WEIGHT * (1.0 - self.similarity)
    }
}

/// Minimum-cost word alignment between reference and hypothesis tokens.
#[derive(Debug, Clone, Copy)]
pub struct Aligner<'t> {
    table: &'t PhoneticTable,
}

impl<'t> Aligner<'t> {
    pub fn new(table: &'t PhoneticTable) -> Self {
        Self { table }
    }

    pub fn align(&self, reference: &[Token], hypothesis: &[Token]) -> Alignment {
        edit::align_tokens(reference, hypothesis, |r, h| self.pair_score(r, h))
    }

    /// Classifies a token pair as exact, phonetic or graded substitution.
    pub fn pair_score(&self, reference: &Token, hypothesis: &Token) -> PairScore {
        if reference.text == hypothesis.text {
            PairScore {
                kind: StepKind::Exact,
                similarity: 1.0,
            }
        } else if self.table.accepts(reference, hypothesis) {
            PairScore {
                kind: StepKind::PhoneticMatch,
                similarity: 1.0 - PHONETIC_PENALTY,
            }
        } else {
            let direct = similarity_ratio(&reference.text, &hypothesis.text);
            let by_name = match (reference.kind, hypothesis.kind) {
                (TokenKind::Letter, TokenKind::Word) => {
                    self.letter_name_similarity(reference, hypothesis)
                }
                (TokenKind::Word, TokenKind::Letter) => {
                    self.letter_name_similarity(hypothesis, reference)
                }
                _ => 0.0,
            };
            PairScore {
                kind: StepKind::Substitution,
                similarity: direct.max(by_name),
            }
        }
    }

    /// Partial credit for a word that resembles one of the letter's names.
    ///
    /// Only words at most one character longer than the longest listed name
    /// are considered. The result stays below a phonetic match.
    fn letter_name_similarity(&self, letter: &Token, spoken: &Token) -> f64 {
        let Some(names) = self.table.alternates_of(letter) else {
            return 0.0;
        };
        let longest = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);
        if spoken.text.chars().count() > longest + 1 {
            return 0.0;
        }

        let mut best = 0.0f64;
        for name in names {
            let ratio = similarity_ratio(&spoken.text, name);
            let contained =
                name.contains(spoken.as_str()) || spoken.text.contains(name.as_str());
            if contained && ratio > NAME_CONTAINMENT_MIN_SIMILARITY {
                best = best.max(ratio * NAME_CONTAINMENT_DISCOUNT);
            }
            best = best.max(ratio * NAME_SIMILARITY_DISCOUNT);
        }
        if spoken.text.contains(letter.as_str()) {
            best = best.max(LETTER_PRESENT_CREDIT);
        }
        best
    }
}
