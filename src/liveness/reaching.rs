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

//! Reads that no assignment can reach.
//!
//! A forward "may be assigned" problem over a function's blocks:
//! `in = ∪ out(pred)`, `out = in ∪ writes`, starting from nothing assigned
//! at the function entry. A variable read while outside the set has no
//! value on any path to that read.

use super::dataflow::reads_and_writes;
use super::{AnnotatedBlock, VarSet};
use crate::ir::Value;

/// Variables read somewhere in `blocks` without any assignment reaching
/// the read, each reported once, in order of the first such read.
pub fn unassigned_reads(blocks: &[AnnotatedBlock]) -> Vec<Value> {
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); blocks.len()];
    for (index, block) in blocks.iter().enumerate() {
        for successor in block.next1.into_iter().chain(block.next2) {
            if let Some(list) = predecessors.get_mut(successor) {
                list.push(index);
            }
        }
    }

    let writes: Vec<VarSet> = blocks
        .iter()
        .map(|block| {
            block
                .quads
                .iter()
                .filter_map(|annotated| reads_and_writes(&annotated.quad).1.cloned())
                .collect()
        })
        .collect();

    let mut assigned_in = vec![VarSet::new(); blocks.len()];
    let mut assigned_out = writes.clone();
    let mut changed = true;
    while changed {
        changed = false;
        for index in 0..blocks.len() {
            let incoming: VarSet = predecessors[index]
                .iter()
                .flat_map(|&predecessor| assigned_out[predecessor].iter().cloned())
                .collect();
            if incoming != assigned_in[index] {
                let mut outgoing = incoming.clone();
                outgoing.extend(writes[index].iter().cloned());
                assigned_in[index] = incoming;
                assigned_out[index] = outgoing;
                changed = true;
            }
        }
    }

    let mut reported = VarSet::new();
    let mut unassigned = Vec::new();
    for (block, assigned) in blocks.iter().zip(assigned_in) {
        let mut assigned = assigned;
        for annotated in &block.quads {
            let (reads, write) = reads_and_writes(&annotated.quad);
            for value in reads {
                if !assigned.contains(value) && reported.insert(value.clone()) {
                    unassigned.push(value.clone());
                }
            }
            if let Some(value) = write {
                assigned.insert(value.clone());
            }
        }
    }
    unassigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ProgramBlocks;
    use crate::grammar::GrammarTable;
    use crate::lexer::tokenize;
    use crate::liveness::ProgramLiveness;
    use crate::parser::parse;

    fn unassigned_in_main(source: &str) -> Vec<String> {
        let table = GrammarTable::default_grammar().unwrap();
        let tokens = tokenize(source).unwrap();
        let (output, errors) = parse(&table, &tokens);
        assert!(errors.is_empty(), "{:?}", errors);
        let blocks = ProgramBlocks::build(output.code.quads(), &output.functions);
        let liveness = ProgramLiveness::analyze(&blocks);
        unassigned_reads(liveness.function("main").unwrap())
            .iter()
            .map(Value::to_string)
            .collect()
    }

    #[test]
    fn test_assignment_inside_loop_reaches_read_after_it() {
        let unassigned = unassigned_in_main(
            "int main(void) { int r; int i; i = 0;\n\
             while (i < 5) { r = i * 2; i = i + 1; } return r; }",
        );
        assert!(unassigned.is_empty(), "{:?}", unassigned);
    }

    #[test]
    fn test_assignment_on_one_branch_reaches_join() {
        let unassigned = unassigned_in_main(
            "int main(void) { int x; int c; c = 1; if (c > 0) { x = 4; } return x; }",
        );
        assert!(unassigned.is_empty(), "{:?}", unassigned);
    }

    #[test]
    fn test_never_assigned_variable_is_reported_once() {
        let unassigned = unassigned_in_main(
            "int main(void) { int x; int i; i = 0;\n\
             while (i < x) { i = i + x; } return x; }",
        );
        assert_eq!(unassigned, vec!["x".to_string()]);
    }

    #[test]
    fn test_read_before_later_assignment_is_reported() {
        let unassigned =
            unassigned_in_main("int main(void) { int y; int z; z = y; y = 1; return z + y; }");
        assert_eq!(unassigned, vec!["y".to_string()]);
    }

    #[test]
    fn test_loop_carried_assignment_reaches_loop_head() {
        // `s` is read in the loop body before its own assignment; the back
        // edge carries the assignment from the previous iteration, and the
        // initial one reaches from the entry.
        let unassigned = unassigned_in_main(
            "int main(void) { int s; int i; s = 0; i = 0;\n\
             while (i < 3) { s = s + i; i = i + 1; } return s; }",
        );
        assert!(unassigned.is_empty(), "{:?}", unassigned);
    }
}
