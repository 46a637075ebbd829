//! Property tests for normalization and grading invariants.

use proptest::prelude::*;
use recitation_grader::grading::text::{normalize, tokenize};
use recitation_grader::grading::{Grader, GradingSettings};

const ARABIC_PIECES: &[&str] = &[
    "ا", "أ", "إ", "آ", "ٱ", "ب", "ت", "ة", "ث", "ج", "ح", "د", "ذ", "ر", "س", "ص", "ع", "ف",
    "ق", "ك", "ل", "م", "ن", "ه", "و", "ؤ", "ي", "ى", "ئ", "ء", "\u{064E}", "\u{064F}",
    "\u{0650}", "\u{0651}", "\u{0652}", "\u{0670}", "\u{06E1}", "\u{0640}", "\u{FEFB}",
    "\u{FDF2}", " ", "  ", "،", ".", "\u{06DD}", "\n", "a", "7", "٣",
];

const WORDS: &[&str] = &[
    "بسم", "الله", "الرحمن", "الرحيم", "الحمد", "لله", "رب", "العالمين", "مالك", "يوم",
    "الدين", "اياك", "نعبد", "نستعين", "ا", "ل", "م", "الف", "لام", "ميم", "ذلك", "الكتاب",
];

const EXTRA_WORDS: &[&str] = &["قال", "كفو", "صمد", "والشمس", "وضحاها", "احد"];

fn arb_arabic_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ARABIC_PIECES), 0..40)
        .prop_map(|pieces| pieces.concat())
}

fn arb_any_text() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..24).prop_map(|chars| chars.into_iter().collect())
}

fn arb_words(max: usize) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(WORDS), 1..max)
}

fn grader() -> Grader<'static> {
    Grader::new(GradingSettings::default()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn normalize_is_idempotent(text in arb_arabic_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_for_any_input(text in arb_any_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_text_has_single_interior_spaces(text in arb_arabic_text()) {
        let normalized = normalize(&text);
        prop_assert!(!normalized.starts_with(' '));
        prop_assert!(!normalized.ends_with(' '));
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(tokenize(&normalized).len(), normalized.split(' ').filter(|w| !w.is_empty()).count());
    }

    #[test]
    fn identical_texts_grade_perfectly(text in arb_arabic_text()) {
        prop_assume!(!tokenize(&normalize(&text)).is_empty());
        let result = grader().grade(&text, &text).unwrap();
        prop_assert_eq!(result.grade, 100.0);
        prop_assert!(result.is_passed);
    }

    #[test]
    fn grades_stay_within_percentage_range(reference in arb_arabic_text(), transcript in arb_arabic_text()) {
        prop_assume!(!tokenize(&normalize(&reference)).is_empty());
        let result = grader().grade(&reference, &transcript).unwrap();
        prop_assert!((0.0..=100.0).contains(&result.grade));
        prop_assert!((0.0..=1.0).contains(&result.similarity_score));
        prop_assert_eq!(result.is_passed, result.grade >= 70.0);
    }

    #[test]
    fn extra_words_lower_grade_within_deletion_floor(
        reference in arb_words(8),
        extras in prop::collection::vec(prop::sample::select(EXTRA_WORDS), 1..5),
        slots in prop::collection::vec(any::<prop::sample::Index>(), 4),
    ) {
        let mut transcript = reference.clone();
        for (extra, slot) in extras.iter().zip(&slots) {
            transcript.insert(slot.index(transcript.len() + 1), *extra);
        }
        let result = grader().grade(&reference.join(" "), &transcript.join(" ")).unwrap();

        prop_assert!(result.grade < 100.0);
        let matched = reference.len() as f64;
        let floor = (matched - extras.len() as f64).max(0.0) / matched;
        prop_assert!(
            result.similarity_score >= floor - 1e-6,
            "{} extra words fell below the floor: {} < {}",
            extras.len(),
            result.similarity_score,
            floor
        );
    }

    #[test]
    fn skipping_a_reference_word_costs_credit(
        reference in arb_words(8),
        index in any::<prop::sample::Index>(),
    ) {
        let mut transcript = reference.clone();
        transcript.remove(index.index(transcript.len()));
        let result = grader().grade(&reference.join(" "), &transcript.join(" ")).unwrap();

        prop_assert!(result.grade < 100.0);
        let expected = (reference.len() - 1) as f64 / reference.len() as f64;
        prop_assert!(result.similarity_score >= expected - 1e-6);
    }
}
