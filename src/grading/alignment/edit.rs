use crate::grading::text::Token;

use super::{Alignment, AlignmentStep, PairScore, StepKind, GAP_COST};

const COST_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Start,
    Pair,
    Delete,
    Insert,
}

/// Weighted edit-distance alignment over two token sequences.
///
/// `cost[i][j]` is the cheapest way to align the first `i` reference tokens
/// with the first `j` hypothesis tokens. Ties resolve to pairing, then
/// deletion, then insertion, which keeps both sequences advancing together.
pub fn align_tokens<F>(reference: &[Token], hypothesis: &[Token], pair_score: F) -> Alignment
where
    F: Fn(&Token, &Token) -> PairScore,
{
    let rows = reference.len() + 1;
    let cols = hypothesis.len() + 1;
    let mut cost = vec![vec![0.0f64; cols]; rows];
    let mut backtrack = vec![vec![Move::Start; cols]; rows];
    seed_borders(&mut cost, &mut backtrack);
    fill_tables(&mut cost, &mut backtrack, reference, hypothesis, &pair_score);
    let steps = backtrack_steps(&backtrack, reference, hypothesis, &pair_score);
    Alignment {
        steps,
        total_cost: cost[reference.len()][hypothesis.len()],
    }
}

fn seed_borders(cost: &mut [Vec<f64>], backtrack: &mut [Vec<Move>]) {
    for i in 1..cost.len() {
        cost[i][0] = i as f64 * GAP_COST;
        backtrack[i][0] = Move::Delete;
    }
    for j in 1..cost[0].len() {
        cost[0][j] = j as f64 * GAP_COST;
        backtrack[0][j] = Move::Insert;
    }
}

fn fill_tables<F>(
    cost: &mut [Vec<f64>],
    backtrack: &mut [Vec<Move>],
    reference: &[Token],
    hypothesis: &[Token],
    pair_score: &F,
) where
    F: Fn(&Token, &Token) -> PairScore,
{
    for i in 1..=reference.len() {
        for j in 1..=hypothesis.len() {
            let score = pair_score(&reference[i - 1], &hypothesis[j - 1]);
            let pair = cost[i - 1][j - 1] + score.cost();
            let delete = cost[i - 1][j] + GAP_COST;
            let insert = cost[i][j - 1] + GAP_COST;
            let (best, step) = choose(pair, delete, insert);
            cost[i][j] = best;
            backtrack[i][j] = step;
        }
    }
}

fn choose(pair: f64, delete: f64, insert: f64) -> (f64, Move) {
    if pair <= delete + COST_EPSILON && pair <= insert + COST_EPSILON {
        (pair, Move::Pair)
    } else if delete <= insert + COST_EPSILON {
        (delete, Move::Delete)
    } else {
        (insert, Move::Insert)
    }
}

fn backtrack_steps<F>(
    backtrack: &[Vec<Move>],
    reference: &[Token],
    hypothesis: &[Token],
    pair_score: &F,
) -> Vec<AlignmentStep>
where
    F: Fn(&Token, &Token) -> PairScore,
{
    let mut steps = Vec::with_capacity(reference.len().max(hypothesis.len()));
    let (mut i, mut j) = (reference.len(), hypothesis.len());
    loop {
        match backtrack[i][j] {
            Move::Start => break,
            Move::Pair => {
                let score = pair_score(&reference[i - 1], &hypothesis[j - 1]);
                steps.push(AlignmentStep {
                    kind: score.kind,
                    reference_index: Some(i - 1),
                    hypothesis_index: Some(j - 1),
                    cost: score.cost(),
                    similarity: score.similarity,
                });
                i -= 1;
                j -= 1;
            }
            Move::Delete => {
                steps.push(gap(StepKind::Deletion, Some(i - 1), None));
                i -= 1;
            }
            Move::Insert => {
                steps.push(gap(StepKind::Insertion, None, Some(j - 1)));
                j -= 1;
            }
        }
    }
    steps.reverse();
    steps
}

fn gap(
    kind: StepKind,
    reference_index: Option<usize>,
    hypothesis_index: Option<usize>,
) -> AlignmentStep {
    AlignmentStep {
        kind,
        reference_index,
        hypothesis_index,
        cost: GAP_COST,
        similarity: 0.0,
    }
}
