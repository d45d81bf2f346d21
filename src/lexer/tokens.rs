// cminus - A table-driven compiler for a small C subset creating MIPS assembly
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Token definitions for the cminus language.

use std::fmt;

use crate::error::Span;

/// The text carried by the end-of-file token.
///
/// It doubles as the end-of-input marker of the grammar.
pub const END_MARKER: &str = "#";

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    /// `if`
    If,
    /// `else`
    Else,
    /// `int`
    Int,
    /// `return`
    Return,
    /// `void`
    Void,
    /// `while`
    While,

    // Literals
    /// Identifier (variable or function name).
    Identifier,
    /// Decimal integer literal.
    Number,

    // Punctuation
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `;`
    Semicolon,
    /// `,`
    Comma,

    // Comparison operators
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `!=`
    NotEqual,
    /// `==`
    EqualEqual,
    /// `<`
    Less,
    /// `>`
    Greater,

    // Other operators
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `!` on its own. Lexically valid, no grammar rule uses it.
    Bang,

    /// End of input.
    EndOfFile,
    /// A character that starts no token.
    Error,
}

impl TokenKind {
    /// Look up a reserved word.
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "int" => Some(TokenKind::Int),
            "return" => Some(TokenKind::Return),
            "void" => Some(TokenKind::Void),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// The upper-case name used in the token listing.
    pub fn listing_name(&self) -> &'static str {
        match self {
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Int => "INT",
            TokenKind::Return => "RETURN",
            TokenKind::Void => "VOID",
            TokenKind::While => "WHILE",
            TokenKind::Identifier => "ID",
            TokenKind::Number => "NUM",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::Semicolon => "SEMI",
            TokenKind::Comma => "COMMA",
            TokenKind::GreaterEqual => "GTE",
            TokenKind::LessEqual => "LTE",
            TokenKind::NotEqual => "NEQ",
            TokenKind::EqualEqual => "EQ",
            TokenKind::Less => "LT",
            TokenKind::Greater => "GT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULT",
            TokenKind::Slash => "DIV",
            TokenKind::Bang => "NOT",
            TokenKind::EndOfFile => "ENDFILE",
            TokenKind::Error => "ERROR",
        }
    }

    /// The grammar terminal this token is matched against in the parse table.
    ///
    /// Identifiers and numbers map to the pseudo-terminals `ID` and `NUM`,
    /// end of file maps to the end marker. Error tokens match nothing.
    pub fn terminal(&self) -> Option<&'static str> {
        let name = match self {
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Int => "int",
            TokenKind::Return => "return",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::Identifier => "ID",
            TokenKind::Number => "NUM",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::NotEqual => "!=",
            TokenKind::EqualEqual => "==",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::EndOfFile => END_MARKER,
            TokenKind::Error => return None,
        };
        Some(name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.listing_name())
    }
}

/// A classified lexeme with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token classification.
    pub kind: TokenKind,
    /// The literal source text.
    pub text: String,
    /// Line the token starts on (1-indexed).
    pub line: usize,
    /// Byte range in the source.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            span,
        }
    }

    /// Check if this token marks the end of input.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }
}

/// Renders the token in listing format: `KIND  literal`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.kind.listing_name(), self.text)
    }
}

/// Render a token sequence as the token listing, one token per line.
pub fn token_listing(tokens: &[Token]) -> String {
    let mut listing = String::new();
    for token in tokens {
        listing.push_str(&token.to_string());
        listing.push('\n');
    }
    listing
}
