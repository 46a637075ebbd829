use approx::assert_relative_eq;
use recitation_grader::grading::alignment::{Alignment, AlignmentStep, StepKind};
use recitation_grader::grading::metrics::{Scorer, INSERTION_PENALTY};
use recitation_grader::grading::text::tokenize;
use recitation_grader::grading::GradeError;

fn step(
    kind: StepKind,
    reference: Option<usize>,
    hypothesis: Option<usize>,
    similarity: f64,
) -> AlignmentStep {
    let cost = if kind.is_pair() { 2.0 * (1.0 - similarity) } else { 1.0 };
    AlignmentStep {
        kind,
        reference_index: reference,
        hypothesis_index: hypothesis,
        cost,
        similarity,
    }
}

fn make_alignment(steps: Vec<AlignmentStep>) -> Alignment {
    let total_cost = steps.iter().map(|step| step.cost).sum();
    Alignment { steps, total_cost }
}

fn mixed_alignment() -> Alignment {
    make_alignment(vec![
        step(StepKind::Exact, Some(0), Some(0), 1.0),
        step(StepKind::PhoneticMatch, Some(1), Some(1), 0.95),
        step(StepKind::Substitution, Some(2), Some(2), 0.5),
        step(StepKind::Insertion, None, Some(3), 0.0),
        step(StepKind::Deletion, Some(3), None, 0.0),
    ])
}

#[test]
fn metrics_average_credit_over_reference_length() {
    let verdict = Scorer::new().score(&mixed_alignment(), 4, 70.0).unwrap();

    println!("mixed grade={:.2}", verdict.grade);
    assert_relative_eq!(
        verdict.similarity_score,
        (2.45 - INSERTION_PENALTY) / 4.0,
        epsilon = 1e-12
    );
    assert_relative_eq!(verdict.grade, 55.0);
    assert!(!verdict.is_passed);
}

#[test]
fn metrics_pass_at_exact_threshold() {
    let verdict = Scorer::new().score(&mixed_alignment(), 4, 55.0).unwrap();
    assert!(verdict.is_passed);
}

#[test]
fn metrics_insertions_lower_score_down_to_deletion_floor() {
    let scorer = Scorer::new();
    let clean = make_alignment(vec![
        step(StepKind::Exact, Some(0), Some(0), 1.0),
        step(StepKind::Exact, Some(1), Some(1), 1.0),
    ]);
    let padded = make_alignment(vec![
        step(StepKind::Insertion, None, Some(0), 0.0),
        step(StepKind::Exact, Some(0), Some(1), 1.0),
        step(StepKind::Exact, Some(1), Some(2), 1.0),
    ]);

    let clean = scorer.score(&clean, 2, 70.0).unwrap();
    let padded = scorer.score(&padded, 2, 70.0).unwrap();
    assert_eq!(clean.grade, 100.0);
    assert_relative_eq!(padded.grade, 87.5);
    assert!(padded.similarity_score < clean.similarity_score);
    // as if the extra word had cost one reference word
    assert!(padded.similarity_score >= 0.5);
}

#[test]
fn metrics_insertion_penalty_is_capped_by_earned_credit() {
    let steps = (0..10)
        .map(|idx| step(StepKind::Insertion, None, Some(idx), 0.0))
        .chain([step(StepKind::Substitution, Some(0), Some(10), 0.5)])
        .collect();
    let verdict = Scorer::new().score(&make_alignment(steps), 1, 70.0).unwrap();
    assert_eq!(verdict.similarity_score, 0.0);
    assert_eq!(verdict.grade, 0.0);
}

#[test]
fn metrics_clamp_to_unit_interval() {
    let inflated = make_alignment(vec![
        step(StepKind::Exact, Some(0), Some(0), 1.0),
        step(StepKind::Exact, Some(1), Some(1), 1.0),
    ]);
    let verdict = Scorer::new().score(&inflated, 1, 70.0).unwrap();
    assert_eq!(verdict.similarity_score, 1.0);
    assert_eq!(verdict.grade, 100.0);
}

#[test]
fn metrics_empty_alignment_scores_zero() {
    let verdict = Scorer::new().score(&Alignment::default(), 3, 0.0).unwrap();
    assert_eq!(verdict.grade, 0.0);
    // a zero threshold passes everything, including a zero grade
    assert!(verdict.is_passed);
}

#[test]
fn metrics_reject_empty_reference_and_bad_threshold() {
    let scorer = Scorer::new();
    assert!(matches!(
        scorer.score(&Alignment::default(), 0, 70.0),
        Err(GradeError::EmptyReference)
    ));
    assert!(matches!(
        scorer.score(&mixed_alignment(), 4, 101.0),
        Err(GradeError::InvalidThreshold(_))
    ));
}

#[test]
fn metrics_breakdown_labels_steps_with_tokens() {
    let reference = tokenize("ا ب ج د");
    let hypothesis = tokenize("ا باء جيم زاي");
    let steps = Scorer::new().breakdown(&mixed_alignment(), &reference, &hypothesis);

    assert_eq!(steps.len(), 5);
    assert_eq!(steps[1].reference.as_deref(), Some("ب"));
    assert_eq!(steps[1].hypothesis.as_deref(), Some("باء"));
    assert_relative_eq!(steps[1].credit, 0.95);
    assert_eq!(steps[3].reference, None);
    assert_eq!(steps[3].credit, -INSERTION_PENALTY);
    assert_eq!(steps[3].hypothesis.as_deref(), Some("زاي"));
    assert_eq!(steps[4].reference.as_deref(), Some("د"));
    assert_eq!(steps[4].credit, 0.0);

    let json = serde_json::to_value(&steps[3]).unwrap();
    assert_eq!(json["kind"], "insertion");
    assert!(json.get("reference").is_none());
}
