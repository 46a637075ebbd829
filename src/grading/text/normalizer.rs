use unicode_normalization::UnicodeNormalization;

const ALEF: char = '\u{0627}';
const WAW: char = '\u{0648}';
const YEH: char = '\u{064A}';
const HEH: char = '\u{0647}';
const KAF: char = '\u{0643}';
const ALEF_MAKSURA: char = '\u{0649}';
const TATWEEL: char = '\u{0640}';
const SUPERSCRIPT_ALEF: char = '\u{0670}';

/// Canonicalizes raw Arabic text for comparison.
///
/// Presentation forms are folded with NFKC, tashkeel and Quranic annotation
/// marks are dropped, alef/hamza/yeh variants collapse onto their base letters
/// and tatweel disappears. The superscript alef spells out a full alef,
/// except after a long vowel letter that already carries it (`عَلَىٰ` → `على`).
/// Punctuation and whitespace become single spaces; anything outside the
/// Arabic letter and digit repertoire is discarded.
///
/// The output contains no combining marks, so normalizing it again is a no-op.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.nfkc() {
        if is_boundary(ch) {
            pending_space = !normalized.is_empty();
            continue;
        }
        if ch == SUPERSCRIPT_ALEF && !pending_space && ends_with_long_vowel(&normalized) {
            continue;
        }
        let Some(mapped) = canonical_letter(ch) else {
            continue;
        };
        if pending_space {
            normalized.push(' ');
            pending_space = false;
        }
        normalized.push(mapped);
    }
    normalized
}

fn ends_with_long_vowel(normalized: &str) -> bool {
    matches!(normalized.chars().last(), Some(ALEF | ALEF_MAKSURA | WAW))
}

/// Characters that separate words: whitespace, the zero-width space and
/// punctuation of any script.
///
/// Symbols outside these ranges (and format characters such as ZWJ/ZWNJ)
/// are not separators; the normalizer drops them in place, so they never
/// split a word.
pub fn is_boundary(ch: char) -> bool {
    ch.is_whitespace()
        || ch.is_ascii_punctuation()
        || matches!(
            ch,
            '\u{200B}' // zero-width space
                | '\u{060C}' // arabic comma
                | '\u{060D}'
                | '\u{061B}' // arabic semicolon
                | '\u{061E}'
                | '\u{061F}' // arabic question mark
                | '\u{066A}'..='\u{066D}'
                | '\u{06D4}' // full stop
                | '\u{06DD}' // end of ayah
                | '\u{06DE}'
                | '\u{06E9}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{2E00}'..='\u{2E7F}'
                | '\u{3000}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
                | '\u{00A1}'
                | '\u{00AB}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{FD3E}'
                | '\u{FD3F}'
        )
}

fn canonical_letter(ch: char) -> Option<char> {
    match ch {
        SUPERSCRIPT_ALEF => Some(ALEF),
        '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0671}' | '\u{0672}' | '\u{0673}'
        | '\u{0675}' => Some(ALEF),
        '\u{0624}' => Some(WAW),
        '\u{0626}' | '\u{06CC}' => Some(YEH),
        '\u{06C0}' => Some(HEH),
        '\u{06A9}' => Some(KAF),
        TATWEEL => None,
        _ if is_tashkeel(ch) => None,
        _ if is_arabic_letter(ch) || ch.is_ascii_digit() || is_arabic_digit(ch) => Some(ch),
        _ => None,
    }
}

fn is_tashkeel(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{06D6}'..='\u{06DC}'
            | '\u{06DF}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06ED}'
    )
}

pub(crate) fn is_arabic_letter(ch: char) -> bool {
    matches!(ch,
        '\u{0621}'..='\u{063A}'
            | '\u{0641}'..='\u{064A}'
            | '\u{0671}'..='\u{06D3}'
            | '\u{06D5}'
            | '\u{06EE}'
            | '\u{06EF}'
            | '\u{06FA}'..='\u{06FC}'
            | '\u{06FF}'
    )
}

fn is_arabic_digit(ch: char) -> bool {
    matches!(ch, '\u{0660}'..='\u{0669}' | '\u{06F0}'..='\u{06F9}')
}
