//! Text preparation: canonical Arabic spelling and word tokens.

mod normalizer;
mod tokenizer;

pub use normalizer::{is_boundary, normalize};
pub use tokenizer::{tokenize, Token, TokenKind};
