//! Lexer for dynamic text using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Whitespace is significant in dynamic text, so nothing is skipped
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[regex(r"[^{}:.]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Tokenize dynamic text, dropping anything the lexer rejects
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
