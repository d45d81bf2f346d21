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

//! Parse table construction.
//!
//! This module turns grammar text into a [`GrammarTable`]:
//! - FIRST/FOLLOW sets by fixed-point iteration ([`sets`])
//! - item closure and the canonical collection ([`items`])
//! - the conflict-checked action/goto table ([`table`])
//!
//! Items are `(production, dot)` pairs and reductions are placed on the
//! FOLLOW set of the production's left-hand side. Grammars that need real
//! lookaheads are rejected with a conflict instead of being resolved
//! silently.
//!
//! A table is independent of any source text. It is immutable once built
//! and can be shared by any number of compilations.

pub mod items;
pub mod sets;
pub mod symbols;
pub mod table;

use std::path::Path;

pub use items::{CanonicalCollection, Item, ItemSet};
pub use sets::{FirstFollow, SymbolSet};
pub use symbols::{is_terminal, Grammar, Production, Symbol, SymbolId, SymbolKind, EMPTY, END};
pub use table::{Action, ActionTable};

use crate::error::GrammarError;

/// The grammar shipped with the compiler.
pub const DEFAULT_GRAMMAR: &str = include_str!("c_minus.grammar");

/// A grammar together with everything derived from it.
#[derive(Debug, Clone)]
pub struct GrammarTable {
    grammar: Grammar,
    sets: FirstFollow,
    collection: CanonicalCollection,
    actions: ActionTable,
}

impl GrammarTable {
    /// Build the table for grammar text.
    pub fn build(text: &str) -> Result<Self, GrammarError> {
        let grammar = Grammar::parse(text)?;
        let sets = FirstFollow::compute(&grammar);
        let collection = CanonicalCollection::build(&grammar);
        let actions = ActionTable::build(&grammar, &collection, &sets)?;

        log::debug!(
            "grammar table: {} productions, {} symbols, {} states",
            grammar.productions().len(),
            grammar.symbol_count(),
            collection.len()
        );

        Ok(Self {
            grammar,
            sets,
            collection,
            actions,
        })
    }

    /// Read and build a grammar file.
    pub fn from_file(path: &Path) -> Result<Self, GrammarError> {
        let text = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::build(&text)
    }

    /// Build the bundled C-minus grammar.
    pub fn default_grammar() -> Result<Self, GrammarError> {
        Self::build(DEFAULT_GRAMMAR)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn productions(&self) -> &[Production] {
        self.grammar.productions()
    }

    pub fn sets(&self) -> &FirstFollow {
        &self.sets
    }

    pub fn collection(&self) -> &CanonicalCollection {
        &self.collection
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn state_count(&self) -> usize {
        self.collection.len()
    }

    /// Look up the action for a state and a terminal name.
    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        let symbol = self.grammar.symbol_id(terminal)?;
        self.actions.get(state, symbol)
    }

    /// The state reached from `state` over a non-terminal.
    pub fn goto(&self, state: usize, symbol: SymbolId) -> Option<usize> {
        self.actions.goto(state, symbol)
    }

    /// Names of FIRST of a symbol, sorted. Empty for unknown symbols.
    pub fn first_names(&self, name: &str) -> Vec<&str> {
        self.names_of(name, &self.sets.first)
    }

    /// Names of FOLLOW of a symbol, sorted. Empty for unknown symbols.
    pub fn follow_names(&self, name: &str) -> Vec<&str> {
        self.names_of(name, &self.sets.follow)
    }

    fn names_of(&self, name: &str, sets: &[SymbolSet]) -> Vec<&str> {
        let Some(id) = self.grammar.symbol_id(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = sets[id].iter().map(|&s| self.grammar.name(s)).collect();
        names.sort_unstable();
        names
    }

    /// Terminal names with an entry in `state`, in table order.
    pub fn expected_terminals(&self, state: usize) -> Vec<&str> {
        self.actions
            .row(state)
            .filter(|&(symbol, _)| self.grammar.is_terminal(symbol))
            .map(|(symbol, _)| self.grammar.name(symbol))
            .collect()
    }

    /// The canonical collection in `I<n>= [...]` listing format.
    pub fn dfa_listing(&self) -> String {
        self.collection.listing(&self.grammar)
    }
}
