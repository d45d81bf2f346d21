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

//! Block-level def/use sets and the global live-variable fixed point.

use super::VarSet;
use crate::blocks::Block;
use crate::ir::{Opcode, Quad, Value};

/// Live-variable sets of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSets {
    /// Variables assigned before any use in the block.
    pub def: VarSet,
    /// Variables read before any assignment in the block.
    pub uses: VarSet,
    pub live_in: VarSet,
    pub live_out: VarSet,
}

/// The variables a quadruple reads and writes, for liveness purposes.
///
/// `j` and `call` touch no variables; conditional jumps only read.
pub fn reads_and_writes(quad: &Quad) -> (Vec<&Value>, Option<&Value>) {
    match quad.op {
        Opcode::Jump | Opcode::Call => (Vec::new(), None),
        Opcode::JumpIf(_) => (operand_values(quad), None),
        _ => (operand_values(quad), quad.dest.as_value()),
    }
}

fn operand_values(quad: &Quad) -> Vec<&Value> {
    [&quad.arg1, &quad.arg2]
        .into_iter()
        .filter_map(|operand| operand.as_value())
        .collect()
}

/// Compute `def` and `use` of a block.
pub fn def_use(block: &Block) -> (VarSet, VarSet) {
    let mut def = VarSet::new();
    let mut uses = VarSet::new();

    for quad in &block.quads {
        let (reads, write) = reads_and_writes(quad);
        for value in reads {
            if !def.contains(value) {
                uses.insert(value.clone());
            }
        }
        if let Some(value) = write {
            if !uses.contains(value) {
                def.insert(value.clone());
            }
        }
    }

    (def, uses)
}

/// Solve `out = ∪ in(succ)`, `in = use ∪ (out − def)` for a function.
pub fn solve(blocks: &[Block]) -> Vec<BlockSets> {
    let mut sets: Vec<BlockSets> = blocks
        .iter()
        .map(|block| {
            let (def, uses) = def_use(block);
            BlockSets {
                live_in: uses.clone(),
                def,
                uses,
                live_out: VarSet::new(),
            }
        })
        .collect();

    let mut rounds = 0;
    loop {
        rounds += 1;
        let mut changed = false;

        // Backward problem: visiting blocks last to first converges faster.
        for index in (0..blocks.len()).rev() {
            let live_out: VarSet = blocks[index]
                .successors()
                .filter_map(|successor| sets.get(successor))
                .flat_map(|successor| successor.live_in.iter().cloned())
                .collect();

            let mut live_in = sets[index].uses.clone();
            live_in.extend(live_out.difference(&sets[index].def).cloned());

            let block = &mut sets[index];
            if block.live_out != live_out || block.live_in != live_in {
                block.live_out = live_out;
                block.live_in = live_in;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    log::debug!("liveness converged after {} round(s)", rounds);
    sets
}
