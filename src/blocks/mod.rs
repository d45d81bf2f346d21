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

//! Basic blocks and their successor edges.
//!
//! Each function's quadruples `[entry, next entry)` are cut at leaders:
//! - the function entry
//! - the target of every jump, and the quadruple after it
//! - the quadruple after every `call` and `return`
//!
//! The first block of a function is named after the function, later
//! blocks get `Label<n>` names from a counter shared by all functions.
//! Jump destinations are rewritten from quadruple indices to labels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::ops::Range;

use crate::ir::{Dest, JumpTarget, Opcode, Quad};
use crate::parser::Function;

/// A maximal straight-line run of quadruples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub quads: Vec<Quad>,
    /// Fall-through or jump successor, as a block index.
    pub next1: Option<usize>,
    /// Taken branch of a conditional jump, if it differs from `next1`.
    pub next2: Option<usize>,
}

impl Block {
    pub fn last(&self) -> Option<&Quad> {
        self.quads.last()
    }

    /// Successor block indices.
    pub fn successors(&self) -> impl Iterator<Item = usize> {
        self.next1.into_iter().chain(self.next2)
    }
}

/// Splits functions into blocks and hands out block labels.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    labels: usize,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_label(&mut self) -> String {
        let label = format!("Label{}", self.labels);
        self.labels += 1;
        label
    }

    /// Build the blocks of one function occupying `range` of `code`.
    pub fn build_function(&mut self, name: &str, code: &[Quad], range: Range<usize>) -> Vec<Block> {
        let range = range.start.min(code.len())..range.end.min(code.len());
        if range.is_empty() {
            return Vec::new();
        }

        let leaders = find_leaders(code, range.clone());
        let block_of = |index: usize| leaders.binary_search(&index).ok();

        let mut blocks: Vec<Block> = leaders
            .iter()
            .enumerate()
            .map(|(position, &start)| {
                let end = leaders.get(position + 1).copied().unwrap_or(range.end);
                let name = if position == 0 {
                    name.to_string()
                } else {
                    self.new_label()
                };
                Block {
                    name,
                    quads: code[start..end].to_vec(),
                    next1: None,
                    next2: None,
                }
            })
            .collect();

        let names: Vec<String> = blocks.iter().map(|block| block.name.clone()).collect();
        let count = blocks.len();
        for (index, block) in blocks.iter_mut().enumerate() {
            let fall_through = (index + 1 < count).then_some(index + 1);
            let Some(last) = block.quads.last_mut() else {
                continue;
            };

            let target = match last.target() {
                Some(JumpTarget::Quad(quad)) => block_of(*quad),
                _ => None,
            };
            match last.op {
                Opcode::Jump => {
                    block.next1 = target;
                }
                Opcode::JumpIf(_) => {
                    block.next1 = fall_through;
                    block.next2 = target.filter(|&target| Some(target) != fall_through);
                }
                Opcode::Return => {}
                _ => {
                    block.next1 = fall_through;
                }
            }

            if last.op.is_jump() {
                match target {
                    Some(target) => {
                        last.dest = Dest::Target(JumpTarget::Label(names[target].clone()));
                    }
                    None => log::warn!("jump {} in '{}' leaves its function", last, name),
                }
            }
        }

        log::debug!("function '{}': {} block(s)", name, blocks.len());
        blocks
    }
}

/// Sorted, distinct leader indices of `range`.
fn find_leaders(code: &[Quad], range: Range<usize>) -> Vec<usize> {
    let mut leaders = BTreeSet::new();
    leaders.insert(range.start);

    for index in range.clone() {
        let quad = &code[index];
        if let Some(JumpTarget::Quad(target)) = quad.target() {
            leaders.insert(*target);
        }
        if quad.op.is_jump() || matches!(quad.op, Opcode::Call | Opcode::Return) {
            leaders.insert(index + 1);
        }
    }

    leaders.into_iter().filter(|index| range.contains(index)).collect()
}

/// The blocks of every function of a program.
#[derive(Debug, Clone, Default)]
pub struct ProgramBlocks {
    /// Blocks by function name.
    functions: BTreeMap<String, Vec<Block>>,
}

impl ProgramBlocks {
    /// Build blocks for all functions.
    ///
    /// A function extends up to the next function's entry; quadruples
    /// before the first entry (the jump to `main`) belong to no function.
    pub fn build(code: &[Quad], functions: &[Function]) -> Self {
        let mut ordered: Vec<&Function> = functions.iter().collect();
        ordered.sort_by_key(|function| function.entry);

        let mut builder = BlockBuilder::new();
        let mut result = BTreeMap::new();
        for (position, function) in ordered.iter().enumerate() {
            let end = ordered
                .get(position + 1)
                .map_or(code.len(), |next| next.entry);
            let blocks = builder.build_function(&function.name, code, function.entry..end);
            result.insert(function.name.clone(), blocks);
        }

        Self { functions: result }
    }

    /// Functions and their blocks, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Block])> {
        self.functions
            .iter()
            .map(|(name, blocks)| (name.as_str(), blocks.as_slice()))
    }

    pub fn function(&self, name: &str) -> Option<&[Block]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Render the blocks in the `[function]` / `label:` listing format.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (function, blocks) in self.iter() {
            let _ = writeln!(out, "[{}]", function);
            for block in blocks {
                let _ = writeln!(out, "{}:", block.name);
                for quad in &block.quads {
                    let _ = writeln!(out, "    {}", quad);
                }
                let _ = writeln!(out, "    next1 = {}", index_text(block.next1));
                let _ = writeln!(out, "    next2 = {}", index_text(block.next2));
            }
        }
        out
    }
}

pub(crate) fn index_text(index: Option<usize>) -> String {
    index.map_or_else(|| "-1".to_string(), |index| index.to_string())
}
