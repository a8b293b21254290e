//! # Lexer for UVM program tables

use logos::Logos;

/// Tokens of a comma-separated program table
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")] // Skip whitespace (not newlines)
#[logos(skip r"#[^\n]*")] // Skip comments
pub enum Token {
    /// Identifier (mnemonics, header names)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    /// Decimal number
    #[regex(r"[0-9]+")]
    Decimal,

    /// Hexadecimal number
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,

    /// Binary number
    #[regex(r"0[bB][01]+")]
    Binary,

    /// Negative number (never a valid operand)
    #[regex(r"-[0-9]+")]
    Negative,

    /// Cell separator
    #[token(",")]
    Comma,

    /// Row separator
    #[regex(r"\n")]
    Newline,
}

impl Token {
    /// Check if this token is an unsigned numeric literal
    pub fn is_number(self) -> bool {
        matches!(self, Token::Decimal | Token::Hex | Token::Binary)
    }
}

/// Parse the text of a numeric token
///
/// Returns `None` if the literal does not fit in 64 bits.
pub fn parse_number(token: Token, text: &str) -> Option<u64> {
    match token {
        Token::Decimal => text.parse().ok(),
        Token::Hex => u64::from_str_radix(&text[2..], 16).ok(),
        Token::Binary => u64::from_str_radix(&text[2..], 2).ok(),
        _ => None,
    }
}
