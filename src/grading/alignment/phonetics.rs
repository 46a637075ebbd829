use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::grading::text::{normalize, Token, TokenKind};
use crate::grading::{GradeError, Result};

const RAW_LEXICON: &str = include_str!("../../../assets/phonetics/lexicon.txt");

/// Shared table instance backed by the bundled lexicon.
pub static DEFAULT_TABLE: Lazy<PhoneticTable> = Lazy::new(|| {
    PhoneticTable::from_lexicon(RAW_LEXICON)
        .unwrap_or_else(|err| panic!("failed to initialize phonetic table: {err}"))
});

/// Accepted alternate spellings keyed by normalized letters and short words.
///
/// Every relation is stored in both directions: a letter lists its spoken
/// names and each name lists the letter back.
#[derive(Debug, Clone, Default)]
pub struct PhoneticTable {
    alternates: HashMap<String, BTreeSet<String>>,
    names: HashMap<String, String>,
}

impl PhoneticTable {
    /// Parses lexicon text: one `KEY ALT...` entry per line, `;` starts a comment.
    ///
    /// When the key is a single letter, its first word alternate becomes the
    /// letter's canonical spoken name.
    pub fn from_lexicon(data: &str) -> Result<Self> {
        let mut table = Self::default();

        for (idx, line) in data.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let raw_key = parts
                .next()
                .ok_or_else(|| GradeError::lexicon(line_number, "missing key column"))?;
            let key = normalize_entry(raw_key).ok_or_else(|| {
                GradeError::lexicon(
                    line_number,
                    format!("key \"{raw_key}\" is empty after normalization"),
                )
            })?;

            let mut alternates = Vec::new();
            for raw_alternate in parts {
                let alternate = normalize_entry(raw_alternate).ok_or_else(|| {
                    GradeError::lexicon(
                        line_number,
                        format!("alternate \"{raw_alternate}\" is empty after normalization"),
                    )
                })?;
                if alternate != key {
                    alternates.push(alternate);
                }
            }
            if alternates.is_empty() {
                return Err(GradeError::lexicon(
                    line_number,
                    format!("entry \"{raw_key}\" lists no alternates"),
                ));
            }

            table.insert(key, alternates);
        }

        if table.alternates.is_empty() {
            return Err(GradeError::lexicon(0, "lexicon contained no entries"));
        }

        Ok(table)
    }

    /// Reads and parses a lexicon file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|err| GradeError::io(format!("reading lexicon {}", path.display()), err))?;
        Self::from_lexicon(&data)
    }

    /// Returns a handle to the globally shared table.
    pub fn shared() -> &'static Self {
        &DEFAULT_TABLE
    }

    /// Alternate spellings accepted in place of `token`.
    pub fn alternates_of(&self, token: &Token) -> Option<&BTreeSet<String>> {
        self.alternates.get(&token.text)
    }

    /// Spoken name of a single-letter token.
    pub fn canonical_name_of(&self, letter: &Token) -> Option<&str> {
        if letter.kind != TokenKind::Letter {
            return None;
        }
        self.names.get(&letter.text).map(String::as_str)
    }

    /// True when either token is a listed alternate of the other.
    pub fn accepts(&self, a: &Token, b: &Token) -> bool {
        let listed = |from: &Token, to: &Token| {
            self.alternates_of(from)
                .is_some_and(|set| set.contains(&to.text))
        };
        listed(a, b) || listed(b, a)
    }

    pub fn len(&self) -> usize {
        self.alternates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternates.is_empty()
    }

    fn insert(&mut self, key: String, alternates: Vec<String>) {
        if TokenKind::of(&key) == TokenKind::Letter {
            if let Some(name) = alternates
                .iter()
                .find(|alternate| TokenKind::of(alternate) == TokenKind::Word)
            {
                self.names.entry(key.clone()).or_insert_with(|| name.clone());
            }
        }
        for alternate in alternates {
            self.alternates
                .entry(alternate.clone())
                .or_default()
                .insert(key.clone());
            self.alternates.entry(key.clone()).or_default().insert(alternate);
        }
    }
}

/// Lexicon spellings pass through the same normalizer as graded text.
fn normalize_entry(raw: &str) -> Option<String> {
    let normalized = normalize(raw);
    if normalized.is_empty() || normalized.contains(' ') {
        None
    } else {
        Some(normalized)
    }
}
