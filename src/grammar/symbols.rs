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

//! Grammar vocabulary, productions and the grammar text format.
//!
//! A grammar is written one production per line as `LHS ::= sym*`.
//! Blank lines and lines starting with `#` or `//` are ignored.
//! Production 0 is the start production.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;

use crate::error::GrammarError;
use crate::lexer::END_MARKER;

/// Name of the marker that stands for the empty string in FIRST sets.
pub const EMPTY_MARKER: &str = "EMPTY";

/// Index of a symbol in the grammar vocabulary.
pub type SymbolId = usize;

/// Id of [`EMPTY_MARKER`] in every grammar.
pub const EMPTY: SymbolId = 0;

/// Id of the end-of-input marker in every grammar.
pub const END: SymbolId = 1;

const TERMINALS: &[&str] = &[
    "int", "void", "if", "else", "while", "return", "+", "-", "*", "/", "=", "==", ">", "<", "!=",
    ">=", "<=", ";", ",", "(", ")", "{", "}", "ID", "NUM",
];

/// Check if a grammar symbol name denotes a terminal.
///
/// Reserved words, operators, punctuation and the pseudo-terminals `ID`
/// and `NUM` are terminals. Every other name is a non-terminal.
pub fn is_terminal(name: &str) -> bool {
    TERMINALS.contains(&name)
}

/// Whether a symbol is a terminal or a non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// A grammar symbol. Equality, ordering and hashing use the name only.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
}

impl Symbol {
    /// Create a symbol, classifying it by name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = if is_terminal(&name) || name == END_MARKER || name == EMPTY_MARKER {
            SymbolKind::Terminal
        } else {
            SymbolKind::NonTerminal
        };
        Self { name, kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A production `left ::= right...` with its positional id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: usize,
    pub left: SymbolId,
    pub right: Vec<SymbolId>,
}

impl Production {
    /// Check if the right-hand side is empty.
    pub fn is_empty(&self) -> bool {
        self.right.is_empty()
    }
}

/// The vocabulary and productions of a context-free grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: IndexSet<Symbol>,
    productions: Vec<Production>,
    /// Production ids per left-hand symbol.
    by_left: Vec<Vec<usize>>,
}

impl Grammar {
    /// Parse grammar text.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut symbols = IndexSet::new();
        symbols.insert(Symbol::new(EMPTY_MARKER));
        symbols.insert(Symbol::new(END_MARKER));

        let mut productions = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let malformed = |reason| GrammarError::MalformedProduction {
                line: index + 1,
                text: line.to_string(),
                reason,
            };

            let (left, right) = line.split_once("::=").ok_or_else(|| malformed("missing '::='"))?;
            let mut left_parts = left.split_whitespace();
            let left = match (left_parts.next(), left_parts.next()) {
                (Some(name), None) => name,
                (None, _) => return Err(malformed("missing left-hand side")),
                (Some(_), Some(_)) => return Err(malformed("more than one left-hand symbol")),
            };
            if is_terminal(left) {
                return Err(malformed("left-hand side is a terminal"));
            }

            let mut rhs = Vec::new();
            for name in std::iter::once(left).chain(right.split_whitespace()) {
                if name == EMPTY_MARKER || name == END_MARKER {
                    return Err(malformed("reserved marker symbol"));
                }
                let (id, _) = symbols.insert_full(Symbol::new(name));
                rhs.push(id);
            }
            let left = rhs.remove(0);

            productions.push(Production {
                id: productions.len(),
                left,
                right: rhs,
            });
        }

        if productions.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut by_left = vec![Vec::new(); symbols.len()];
        for production in &productions {
            by_left[production.left].push(production.id);
        }

        for (id, symbol) in symbols.iter().enumerate() {
            if !symbol.is_terminal() && by_left[id].is_empty() {
                return Err(GrammarError::UndefinedSymbol {
                    symbol: symbol.name().to_string(),
                });
            }
        }

        Ok(Self {
            symbols,
            productions,
            by_left,
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Get the symbol with the given id.
    ///
    /// Panics if `id` was not handed out by this grammar.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Look up a symbol id by name.
    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get_index_of(name)
    }

    pub fn name(&self, id: SymbolId) -> &str {
        self.symbols[id].name()
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        self.symbols[id].is_terminal()
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: usize) -> &Production {
        &self.productions[id]
    }

    /// Ids of the productions with `left` as left-hand side.
    pub fn productions_of(&self, left: SymbolId) -> &[usize] {
        &self.by_left[left]
    }

    /// The left-hand side of production 0.
    pub fn start_symbol(&self) -> SymbolId {
        self.productions[0].left
    }

    /// Render a production as `left -> a b c`.
    pub fn production_text(&self, id: usize) -> String {
        let production = &self.productions[id];
        let mut text = format!("{} ->", self.name(production.left));
        for &symbol in &production.right {
            text.push(' ');
            text.push_str(self.name(symbol));
        }
        text
    }
}
