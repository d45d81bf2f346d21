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

//! LR items, item-set closure and the canonical collection of states.
//!
//! Item identity is `(production, dot)` only; lookaheads are never part of
//! a state. Reduce decisions come from FOLLOW sets in the table builder.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use indexmap::{IndexMap, IndexSet};

use super::symbols::{Grammar, SymbolId};

/// A position inside a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
}

impl Item {
    pub fn new(production: usize, dot: usize) -> Self {
        Self { production, dot }
    }

    /// The same item with the dot moved one symbol to the right.
    pub fn advance(&self) -> Self {
        Self::new(self.production, self.dot + 1)
    }

    /// The symbol right after the dot, `None` for a complete item.
    pub fn next_symbol(&self, grammar: &Grammar) -> Option<SymbolId> {
        grammar.production(self.production).right.get(self.dot).copied()
    }

    /// Check if the dot is at the end of the production.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.production(self.production).right.len()
    }

    /// Render the item as `left -> a . b `.
    pub fn display(&self, grammar: &Grammar) -> String {
        let production = grammar.production(self.production);
        let mut text = format!("{} -> ", grammar.name(production.left));
        for (position, &symbol) in production.right.iter().enumerate() {
            if position == self.dot {
                text.push_str(". ");
            }
            text.push_str(grammar.name(symbol));
            text.push(' ');
        }
        if self.is_complete(grammar) {
            text.push_str(". ");
        }
        text
    }
}

/// A DFA state: an ordered set of items.
pub type ItemSet = BTreeSet<Item>;

/// Closure computation with a per-item cache.
pub struct Closure<'g> {
    grammar: &'g Grammar,
    cache: HashMap<Item, ItemSet>,
}

impl<'g> Closure<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            cache: HashMap::new(),
        }
    }

    /// Closure of a single item.
    ///
    /// Uses a worklist, so left-recursive non-terminals terminate.
    pub fn of_item(&mut self, item: Item) -> &ItemSet {
        let grammar = self.grammar;
        self.cache.entry(item).or_insert_with(|| {
            let mut closure = ItemSet::from([item]);
            let mut worklist = vec![item];

            while let Some(current) = worklist.pop() {
                let Some(symbol) = current.next_symbol(grammar) else {
                    continue;
                };
                if grammar.is_terminal(symbol) {
                    continue;
                }
                for &production in grammar.productions_of(symbol) {
                    let added = Item::new(production, 0);
                    if closure.insert(added) {
                        worklist.push(added);
                    }
                }
            }

            closure
        })
    }

    /// Closure of a set of items: the union of the item closures.
    pub fn of_set<I: IntoIterator<Item = Item>>(&mut self, items: I) -> ItemSet {
        let mut result = ItemSet::new();
        for item in items {
            result.extend(self.of_item(item).iter().copied());
        }
        result
    }
}

/// The canonical collection: states plus the transition map.
#[derive(Debug, Clone)]
pub struct CanonicalCollection {
    pub states: Vec<ItemSet>,
    /// Outgoing transitions per state, in discovery order.
    pub transitions: Vec<IndexMap<SymbolId, usize>>,
}

impl CanonicalCollection {
    /// Build all states reachable from the closure of `(0, 0)`.
    ///
    /// States are numbered in discovery order; within a state, symbols are
    /// handled in the order of the items that first mention them.
    pub fn build(grammar: &Grammar) -> Self {
        let mut closure = Closure::new(grammar);
        let mut states: IndexSet<ItemSet> = IndexSet::new();
        let mut transitions: Vec<IndexMap<SymbolId, usize>> = Vec::new();

        states.insert(closure.of_set([Item::new(0, 0)]));

        let mut current = 0;
        while current < states.len() {
            let mut outgoing = IndexMap::new();
            let items: Vec<Item> = states[current].iter().copied().collect();

            for item in &items {
                let Some(symbol) = item.next_symbol(grammar) else {
                    continue;
                };
                if outgoing.contains_key(&symbol) {
                    continue;
                }

                let kernel = items
                    .iter()
                    .filter(|other| other.next_symbol(grammar) == Some(symbol))
                    .map(Item::advance);
                let target = closure.of_set(kernel);
                let (index, _) = states.insert_full(target);
                outgoing.insert(symbol, index);
            }

            transitions.push(outgoing);
            current += 1;
        }

        log::debug!("canonical collection has {} states", states.len());

        Self {
            states: states.into_iter().collect(),
            transitions,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Render every state as `I<n>= [[item][item]]`, separated by blank lines.
    pub fn listing(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        for (index, state) in self.states.iter().enumerate() {
            let _ = write!(out, "I{}= [", index);
            for item in state {
                let _ = write!(out, "[{}]", item.display(grammar));
            }
            out.push_str("]\n\n");
        }
        out
    }
}
