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

//! Lexer module for the cminus compiler.
//!
//! This module tokenizes source code into a stream of tokens.
//! It handles:
//! - Keywords and identifiers
//! - Decimal integer literals
//! - Operators and punctuation
//! - Line (`//`) and block (`/* */`) comments
//!
//! Whitespace and comments are never forwarded; every token carries the
//! line it starts on. Unknown characters produce `ERROR` tokens and
//! scanning continues, so all lexical errors of a file are reported at once.
//! The stream always ends with exactly one `ENDFILE` token.

mod comments;
mod helpers;
mod operators;
mod tokens;

pub use tokens::{token_listing, Token, TokenKind, END_MARKER};

use comments::CommentScanner;
use helpers::LexerHelpers;
use operators::OperatorScanner;

use crate::error::{CompileError, ErrorCode, Errors};

/// The lexer state for tokenizing source code.
pub struct Lexer<'source> {
    /// The source code being tokenized.
    source: &'source str,
    /// Current byte position in the source.
    position: usize,
    /// Current line number (1-indexed).
    line: usize,
    /// Lexical errors found so far.
    errors: Errors,
    /// Whether the end-of-file token was handed out.
    finished: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            errors: Errors::new(),
            finished: false,
        }
    }

    /// Get the current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the lexical errors found so far.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Consume the lexer and return its errors.
    pub fn into_errors(self) -> Errors {
        self.errors
    }

    /// Get the next token from the source.
    ///
    /// Once the input is exhausted this keeps returning `ENDFILE`.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.position;
            let line = self.line;
            let Some(c) = self.peek() else {
                return self.end_of_file();
            };

            if c == '/' && self.peek_next() == Some('/') {
                self.skip_line_comment();
                continue;
            }

            if c == '/' && self.peek_next() == Some('*') {
                if self.skip_block_comment() {
                    continue;
                }
                self.errors.push(
                    CompileError::new(
                        ErrorCode::UnterminatedComment,
                        format!("block comment starting on line {} is never closed", line),
                        self.span_from(start),
                    )
                    .with_line(line)
                    .with_hint("close the comment with '*/'"),
                );
                return self.end_of_file();
            }

            if c.is_ascii_digit() {
                return self.scan_number();
            }

            if c.is_ascii_alphabetic() {
                return self.scan_identifier();
            }

            return self.scan_operator_or_punctuation();
        }
    }

    /// Skip spaces, tabs, carriage returns and newlines.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scan an identifier or keyword: `[A-Za-z][A-Za-z0-9]*`.
    fn scan_identifier(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text = &self.source[start..self.position];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.token_from(kind, start, line)
    }

    /// Scan a decimal integer literal.
    fn scan_number(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let text = &self.source[start..self.position];
        if text.parse::<i32>().is_err() {
            self.errors.push(
                CompileError::new(
                    ErrorCode::IntegerTooLarge,
                    format!("integer literal {} does not fit into 32 bits", text),
                    self.span_from(start),
                )
                .with_line(line)
                .with_hint(format!("the largest literal is {}", i32::MAX)),
            );
            return self.token_from(TokenKind::Error, start, line);
        }

        self.token_from(TokenKind::Number, start, line)
    }

    fn end_of_file(&mut self) -> Token {
        self.position = self.source.len();
        let mut token = self.token_from(TokenKind::EndOfFile, self.position, self.line);
        token.text = END_MARKER.to_string();
        token
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.finished = true;
        }
        Some(token)
    }
}

/// Scan the whole source, returning every token and all lexical errors.
///
/// The token list always ends with `ENDFILE`, even when errors were found.
pub fn scan(source: &str) -> (Vec<Token>, Errors) {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    (tokens, lexer.into_errors())
}

/// Tokenize source code, failing if any lexical error was found.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Errors> {
    let (tokens, errors) = scan(source);
    if errors.has_errors() {
        Err(errors)
    } else {
        Ok(tokens)
    }
}
