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

//! Lexer helper methods for character navigation and span creation.
//!
//! This module provides utility methods for the lexer including:
//! - Character stream navigation (peek, peek_next, advance)
//! - Line tracking
//! - Span and token creation

use super::{Lexer, Token, TokenKind};
use crate::error::Span;

/// Trait for lexer helper operations.
pub trait LexerHelpers<'source> {
    /// Peek at the current character without advancing.
    fn peek(&self) -> Option<char>;

    /// Peek at the next character without advancing.
    fn peek_next(&self) -> Option<char>;

    /// Advance to the next character and return it.
    ///
    /// Crossing a newline increments the line counter.
    fn advance(&mut self) -> Option<char>;

    /// Consume the current character if it equals `expected`.
    fn advance_if(&mut self, expected: char) -> bool;

    /// Create a span from start position to current position.
    fn span_from(&self, start: usize) -> Span;

    /// Create a token of `kind` covering `start..position`.
    fn token_from(&self, kind: TokenKind, start: usize, line: usize) -> Token;
}

impl<'source> LexerHelpers<'source> for Lexer<'source> {
    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.position)
    }

    fn token_from(&self, kind: TokenKind, start: usize, line: usize) -> Token {
        Token::new(
            kind,
            &self.source[start..self.position],
            line,
            self.span_from(start),
        )
    }
}
