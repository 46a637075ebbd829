use super::normalizer::{is_arabic_letter, is_boundary};

/// Shape of a token, decided once by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    /// A lone Arabic letter, usually recited by its spoken name.
    Letter,
}

impl TokenKind {
    pub fn of(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if is_arabic_letter(ch) => TokenKind::Letter,
            _ => TokenKind::Word,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Index of the token within its sequence.
    pub position: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        let kind = TokenKind::of(&text);
        Self {
            text,
            position,
            kind,
        }
    }

    pub fn is_single_letter(&self) -> bool {
        self.kind == TokenKind::Letter
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Splits normalized text into ordered tokens on whitespace and punctuation.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split(is_boundary)
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(position, piece)| Token::new(piece, position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_in_order() {
        let tokens = tokenize("بسم الله الرحمن");
        let texts: Vec<&str> = tokens.iter().map(Token::as_str).collect();
        assert_eq!(texts, ["بسم", "الله", "الرحمن"]);
        assert_eq!(tokens[2].position, 2);
        assert!(tokens.iter().all(|token| token.kind == TokenKind::Word));
    }

    #[test]
    fn marks_single_letters() {
        let tokens = tokenize("ا لم ق");
        assert!(tokens[0].is_single_letter());
        assert!(!tokens[1].is_single_letter());
        assert!(tokens[2].is_single_letter());
    }

    #[test]
    fn single_digit_is_a_word() {
        assert_eq!(TokenKind::of("٣"), TokenKind::Word);
        assert_eq!(TokenKind::of("7"), TokenKind::Word);
    }

    #[test]
    fn splits_on_punctuation_left_in_input() {
        let tokens = tokenize("الله،الرحمن");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
