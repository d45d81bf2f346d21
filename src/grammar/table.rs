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

//! The action/goto table and its conflict-checked construction.

use std::fmt;

use indexmap::IndexMap;

use super::items::CanonicalCollection;
use super::sets::FirstFollow;
use super::symbols::{Grammar, SymbolId};
use crate::error::{ConflictKind, GrammarError};

/// A parse table entry.
///
/// A shift on a non-terminal is the goto entry of that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(production) => write!(f, "r{}", production),
            Action::Accept => f.write_str("acc"),
        }
    }
}

/// Actions per state, keyed by symbol. Absence is a syntax error.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    rows: Vec<IndexMap<SymbolId, Action>>,
}

impl ActionTable {
    /// Fill the table from the canonical collection.
    ///
    /// Complete items reduce on every symbol of FOLLOW of their left-hand
    /// side; completing production 0 accepts. Any second, different action
    /// for an occupied entry fails the whole build.
    pub fn build(
        grammar: &Grammar,
        collection: &CanonicalCollection,
        sets: &FirstFollow,
    ) -> Result<Self, GrammarError> {
        let mut table = Self {
            rows: vec![IndexMap::new(); collection.len()],
        };

        for (state, items) in collection.states.iter().enumerate() {
            for item in items {
                match item.next_symbol(grammar) {
                    Some(symbol) => {
                        let target = collection.transitions[state][&symbol];
                        table.insert(grammar, state, symbol, Action::Shift(target))?;
                    }
                    None => {
                        let production = grammar.production(item.production);
                        let action = if production.id == 0 {
                            Action::Accept
                        } else {
                            Action::Reduce(production.id)
                        };
                        for &symbol in &sets.follow[production.left] {
                            table.insert(grammar, state, symbol, action)?;
                        }
                    }
                }
            }
        }

        Ok(table)
    }

    fn insert(
        &mut self,
        grammar: &Grammar,
        state: usize,
        symbol: SymbolId,
        action: Action,
    ) -> Result<(), GrammarError> {
        let row = &mut self.rows[state];
        match row.get(&symbol) {
            None => {
                row.insert(symbol, action);
                Ok(())
            }
            Some(&existing) if existing == action => Ok(()),
            Some(&existing) => {
                let kind = match (existing, action) {
                    (Action::Shift(_), _) | (_, Action::Shift(_)) => ConflictKind::ShiftReduce,
                    _ => ConflictKind::ReduceReduce,
                };
                Err(GrammarError::Conflict {
                    kind,
                    state,
                    symbol: grammar.name(symbol).to_string(),
                    existing: describe(grammar, existing),
                    incoming: describe(grammar, action),
                })
            }
        }
    }

    /// Look up the action for `(state, symbol)`.
    pub fn get(&self, state: usize, symbol: SymbolId) -> Option<Action> {
        self.rows.get(state)?.get(&symbol).copied()
    }

    /// The state reached from `state` over a non-terminal.
    pub fn goto(&self, state: usize, symbol: SymbolId) -> Option<usize> {
        match self.get(state, symbol)? {
            Action::Shift(target) => Some(target),
            _ => None,
        }
    }

    /// The entries of one state, in registration order.
    pub fn row(&self, state: usize) -> impl Iterator<Item = (SymbolId, Action)> + '_ {
        self.rows
            .get(state)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&symbol, &action)| (symbol, action)))
    }

    pub fn state_count(&self) -> usize {
        self.rows.len()
    }
}

fn describe(grammar: &Grammar, action: Action) -> String {
    match action {
        Action::Shift(state) => format!("shift to state {}", state),
        Action::Reduce(production) => {
            format!("reduce by `{}`", grammar.production_text(production))
        }
        Action::Accept => "accept".to_string(),
    }
}
