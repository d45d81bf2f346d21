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

//! Parser helper methods for stack handling and error creation.
//!
//! This module provides utility methods for the parser including:
//! - Stack navigation (current state, push, pop)
//! - The optional step trace
//! - Error creation

use super::node::{GrammarNode, Lexeme};
use super::Parser;
use crate::error::{CompileError, ErrorCode};
use crate::grammar::SymbolId;
use crate::lexer::{Token, TokenKind};

/// Trait for parser helper operations.
pub trait ParserHelpers {
    /// The state on top of the state stack.
    fn current_state(&self) -> usize;

    /// Push a symbol, its state and its value.
    fn push(&mut self, symbol: SymbolId, state: usize, value: GrammarNode);

    /// Pop the top `count` entries, returning their values bottom first.
    fn pop(&mut self, count: usize) -> Vec<GrammarNode>;

    /// Record the stacks before a step, if tracing is enabled.
    fn record_step(&mut self, lookahead: &Token);

    /// Create an error located at a lexeme.
    fn error_at(&self, code: ErrorCode, message: impl Into<String>, at: &Lexeme) -> CompileError;

    /// Record a semantic error and continue.
    fn semantic_error(&mut self, code: ErrorCode, message: impl Into<String>, at: &Lexeme);

    /// Create the error for a token with no table entry in `state`.
    fn syntax_error(&self, token: &Token, state: usize) -> CompileError;
}

impl<'t> ParserHelpers for Parser<'t> {
    fn current_state(&self) -> usize {
        self.states.last().copied().unwrap_or(0)
    }

    fn push(&mut self, symbol: SymbolId, state: usize, value: GrammarNode) {
        self.symbols.push(symbol);
        self.states.push(state);
        self.values.push(value);
    }

    fn pop(&mut self, count: usize) -> Vec<GrammarNode> {
        // The bottom entry (end marker, state 0) is never popped.
        let split = self.values.len().saturating_sub(count).max(1);
        self.symbols.truncate(split);
        self.states.truncate(split);
        self.values.split_off(split)
    }

    fn record_step(&mut self, lookahead: &Token) {
        let Some(trace) = self.trace.as_mut() else {
            return;
        };
        let grammar = self.table.grammar();
        let symbols: Vec<&str> = self.symbols.iter().map(|&s| grammar.name(s)).collect();
        let states: Vec<String> = self.states.iter().map(|s| s.to_string()).collect();
        trace.push(format!(
            "{} | {} | {}",
            symbols.join(" "),
            states.join(" "),
            lookahead.text
        ));
    }

    fn error_at(&self, code: ErrorCode, message: impl Into<String>, at: &Lexeme) -> CompileError {
        CompileError::new(code, message, at.span).with_line(at.line)
    }

    fn semantic_error(&mut self, code: ErrorCode, message: impl Into<String>, at: &Lexeme) {
        let error = self.error_at(code, message, at);
        log::debug!("line {}: {}", at.line, error);
        self.errors.push(error);
    }

    fn syntax_error(&self, token: &Token, state: usize) -> CompileError {
        let (code, message) = if token.kind == TokenKind::EndOfFile {
            (ErrorCode::UnexpectedEndOfFile, "unexpected end of file".to_string())
        } else {
            (
                ErrorCode::UnexpectedToken,
                format!("unexpected symbol '{}'", token.text),
            )
        };

        let expected = self.table.expected_terminals(state);
        let error = CompileError::new(code, message, token.span).with_line(token.line);
        if expected.is_empty() {
            error
        } else {
            error.with_hint(format!("expected one of: {}", expected.join(" ")))
        }
    }
}
