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

//! Parser module for the cminus compiler.
//!
//! This module drives a shift/reduce parse over a [`GrammarTable`] and
//! produces quadruple intermediate code while it reduces. It uses
//! backpatching for control flow: jumps are emitted with an open target and
//! patched once the target quadruple is known.
//!
//! # Module Structure
//!
//! - `actions` - Reduction semantics (SemanticActions trait)
//! - `helpers` - Stack handling and error creation (ParserHelpers trait)
//! - `node` - Values on the parse stack
//! - `symbol_table` - Variable scopes and declared functions
//!
//! Syntax errors stop the parse. Semantic errors are collected and the
//! parse goes on, so one run reports all of them.

pub mod actions;
pub mod helpers;
pub mod node;
pub mod symbol_table;

pub use actions::SemanticAction;
pub use node::{GrammarNode, Lexeme};
pub use symbol_table::{DataType, Function, SymbolTable, Variable};

use actions::{Rhs, SemanticActions};
use helpers::ParserHelpers;

use crate::error::{CompileError, ErrorCode, Errors, Span};
use crate::grammar::{Action, GrammarTable, END};
use crate::ir::{BackpatchList, IntermediateCode};
use crate::lexer::Token;

/// The result of a parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// The generated quadruples.
    pub code: IntermediateCode,
    /// Declared functions, ordered by entry quadruple.
    pub functions: Vec<Function>,
    /// Stack snapshots, one per step, if tracing was enabled.
    pub trace: Vec<String>,
}

impl ParseOutput {
    /// `(entry, name)` of every function, ordered by entry.
    pub fn function_entries(&self) -> Vec<(usize, &str)> {
        self.functions
            .iter()
            .map(|function| (function.entry, function.name.as_str()))
            .collect()
    }

    /// The trace, one step per line.
    pub fn trace_listing(&self) -> String {
        self.trace.iter().map(|line| format!("{}\n", line)).collect()
    }
}

/// The parser state.
pub struct Parser<'t> {
    table: &'t GrammarTable,
    /// One action per production, by production id.
    actions: Vec<SemanticAction>,
    symbols: Vec<usize>,
    states: Vec<usize>,
    values: Vec<GrammarNode>,
    code: IntermediateCode,
    scopes: SymbolTable,
    errors: Errors,
    trace: Option<Vec<String>>,
}

impl<'t> Parser<'t> {
    /// Create a parser and bind the table's productions to their actions.
    pub fn new(table: &'t GrammarTable) -> Self {
        let grammar = table.grammar();
        let actions = grammar
            .productions()
            .iter()
            .map(|production| SemanticAction::resolve(grammar, production))
            .collect();

        Self {
            table,
            actions,
            symbols: vec![END],
            states: vec![0],
            values: vec![GrammarNode::Plain],
            code: IntermediateCode::new(),
            scopes: SymbolTable::new(),
            errors: Errors::new(),
            trace: None,
        }
    }

    /// Record the symbol and state stacks before every step.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled.then(Vec::new);
        self
    }

    /// Parse a token stream that ends with `ENDFILE`.
    ///
    /// The output is returned even when errors were found; it then holds
    /// whatever was generated up to the point the parse stopped.
    pub fn parse(mut self, tokens: &[Token]) -> (ParseOutput, Errors) {
        let table = self.table;
        let grammar = table.grammar();
        let mut position = 0;

        loop {
            let Some(token) = tokens.get(position) else {
                let line = tokens.last().map_or(1, |token| token.line);
                self.errors.push(
                    CompileError::new(
                        ErrorCode::UnexpectedEndOfFile,
                        "unexpected end of input",
                        Span::default(),
                    )
                    .with_line(line),
                );
                break;
            };

            self.record_step(token);
            let state = self.current_state();
            let symbol = token
                .kind
                .terminal()
                .and_then(|terminal| grammar.symbol_id(terminal));
            let action =
                symbol.and_then(|symbol| Some((symbol, table.actions().get(state, symbol)?)));

            match action {
                Some((symbol, Action::Shift(next))) => {
                    log::trace!("shift '{}' -> state {}", token.text, next);
                    self.push(symbol, next, GrammarNode::Terminal(Lexeme::from(token)));
                    position += 1;
                }
                Some((_, Action::Reduce(production))) => {
                    if let Err(error) = self.reduce(production) {
                        self.errors.push(error);
                        break;
                    }
                }
                Some((_, Action::Accept)) => {
                    self.accept(token);
                    break;
                }
                None => {
                    let error = self.syntax_error(token, state);
                    log::debug!("line {}: {}", token.line, error);
                    self.errors.push(error);
                    break;
                }
            }
        }

        let mut functions = self.scopes.into_functions();
        functions.sort_by_key(|function| function.entry);
        let output = ParseOutput {
            code: self.code,
            functions,
            trace: self.trace.unwrap_or_default(),
        };
        (output, self.errors)
    }

    /// Reduce by a production: pop its right-hand side, run its action and
    /// push the left-hand side.
    fn reduce(&mut self, id: usize) -> Result<(), CompileError> {
        let table = self.table;
        let production = table.grammar().production(id);
        log::trace!("reduce {}", table.grammar().production_text(id));

        let values = self.pop(production.right.len());
        let action = self.actions.get(id).copied().unwrap_or(SemanticAction::Default);
        let node = self.apply(action, Rhs::new(values));

        let state = self.current_state();
        let next = table.goto(state, production.left).ok_or_else(|| {
            CompileError::new(
                ErrorCode::UnexpectedToken,
                format!(
                    "no transition over '{}' from state {}",
                    table.grammar().name(production.left),
                    state
                ),
                Span::default(),
            )
        })?;
        self.push(production.left, next, node);
        Ok(())
    }

    /// Finish the parse: route the leading jump to `main`.
    fn accept(&mut self, token: &Token) {
        let pending: BackpatchList = self
            .values
            .drain(1..)
            .flat_map(|value| match value {
                GrammarNode::Skip(list) => list,
                _ => BackpatchList::new(),
            })
            .collect();

        match self.scopes.lookup_function("main") {
            Some(main) => {
                let entry = main.entry;
                self.code.backpatch(&pending, entry);
            }
            None => {
                let at = Lexeme::from(token);
                let error = self
                    .error_at(ErrorCode::MissingMainFunction, "no 'main' function defined", &at)
                    .with_hint("every program needs an entry point `int main(void)`");
                self.errors.push(error);
            }
        }
    }
}

/// Parse a token stream with a table.
pub fn parse(table: &GrammarTable, tokens: &[Token]) -> (ParseOutput, Errors) {
    Parser::new(table).parse(tokens)
}
