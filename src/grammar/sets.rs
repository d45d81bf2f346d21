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

//! FIRST and FOLLOW sets, computed by fixed-point iteration.
//!
//! FIRST sets use the [`EMPTY`] marker for nullable symbols; FOLLOW of the
//! start symbol is seeded with the [`END`] marker.

use std::collections::BTreeSet;

use super::symbols::{Grammar, SymbolId, EMPTY, END};

/// A set of symbol ids, ordered by id.
pub type SymbolSet = BTreeSet<SymbolId>;

/// FIRST and FOLLOW sets of every symbol, indexed by [`SymbolId`].
#[derive(Debug, Clone)]
pub struct FirstFollow {
    pub first: Vec<SymbolSet>,
    pub follow: Vec<SymbolSet>,
}

impl FirstFollow {
    /// Compute both sets to their fixed points.
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets = Self {
            first: initial_first(grammar),
            follow: vec![SymbolSet::new(); grammar.symbol_count()],
        };
        sets.follow[grammar.start_symbol()].insert(END);

        let mut rounds = 0;
        while sets.first_pass(grammar) {
            rounds += 1;
        }
        log::trace!("FIRST sets converged after {} rounds", rounds + 1);

        rounds = 0;
        while sets.follow_pass(grammar) {
            rounds += 1;
        }
        log::trace!("FOLLOW sets converged after {} rounds", rounds + 1);

        sets
    }

    /// Run one FIRST iteration over all productions.
    ///
    /// Returns `true` if any set grew.
    pub fn first_pass(&mut self, grammar: &Grammar) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            let gained = self.first_of_sequence(&production.right);
            let target = &mut self.first[production.left];
            let before = target.len();
            target.extend(gained);
            changed |= target.len() != before;
        }
        changed
    }

    /// Run one FOLLOW iteration over all productions.
    ///
    /// Returns `true` if any set grew.
    pub fn follow_pass(&mut self, grammar: &Grammar) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            for (position, &symbol) in production.right.iter().enumerate() {
                if grammar.is_terminal(symbol) {
                    continue;
                }

                let rest = self.first_of_sequence(&production.right[position + 1..]);
                let mut gained: SymbolSet = rest.iter().copied().filter(|&s| s != EMPTY).collect();
                if rest.contains(&EMPTY) {
                    gained.extend(self.follow[production.left].iter().copied());
                }

                let target = &mut self.follow[symbol];
                let before = target.len();
                target.extend(gained);
                changed |= target.len() != before;
            }
        }
        changed
    }

    /// FIRST of a symbol sequence.
    ///
    /// Contains [`EMPTY`] if every symbol can derive the empty string,
    /// which includes the empty sequence.
    pub fn first_of_sequence(&self, symbols: &[SymbolId]) -> SymbolSet {
        let mut result = SymbolSet::new();
        for &symbol in symbols {
            let first = &self.first[symbol];
            result.extend(first.iter().copied().filter(|&s| s != EMPTY));
            if !first.contains(&EMPTY) {
                return result;
            }
        }
        result.insert(EMPTY);
        result
    }

    /// Check if a symbol can derive the empty string.
    pub fn is_nullable(&self, symbol: SymbolId) -> bool {
        self.first[symbol].contains(&EMPTY)
    }
}

/// Terminals start with themselves, non-terminals with nothing.
fn initial_first(grammar: &Grammar) -> Vec<SymbolSet> {
    (0..grammar.symbol_count())
        .map(|id| {
            if grammar.is_terminal(id) {
                SymbolSet::from([id])
            } else {
                SymbolSet::new()
            }
        })
        .collect()
}
