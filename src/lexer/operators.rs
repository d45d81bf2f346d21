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

//! Operator and punctuation scanning for the lexer.
//!
//! This module handles scanning of:
//! - Arithmetic operators (+, -, *, /)
//! - Comparison operators (==, !=, <, >, <=, >=)
//! - Assignment (=) and the lone `!`
//! - Punctuation (braces, parentheses, semicolon, comma)
//!
//! Characters that start no token become error tokens.

use super::helpers::LexerHelpers;
use super::{Lexer, Token, TokenKind};
use crate::error::{CompileError, ErrorCode};

/// Trait for operator scanning operations.
pub trait OperatorScanner<'source> {
    /// Scan an operator or punctuation.
    ///
    /// Returns an error token (and records the error) for unknown characters.
    fn scan_operator_or_punctuation(&mut self) -> Token;
}

impl<'source> OperatorScanner<'source> for Lexer<'source> {
    fn scan_operator_or_punctuation(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        let Some(c) = self.advance() else {
            return self.token_from(TokenKind::EndOfFile, start, line);
        };

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => {
                if self.advance_if('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.advance_if('=') {
                    TokenKind::NotEqual
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.advance_if('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.advance_if('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => {
                self.errors.push(
                    CompileError::new(
                        ErrorCode::InvalidCharacter,
                        format!("invalid character '{}' on line {}", c, line),
                        self.span_from(start),
                    )
                    .with_line(line),
                );
                TokenKind::Error
            }
        };

        self.token_from(kind, start, line)
    }
}
