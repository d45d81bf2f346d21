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

//! Live-variable analysis.
//!
//! This module provides:
//! - per-block `def`/`use` sets and the global in/out fixed point ([`dataflow`])
//! - next-use annotation of every quadruple operand ([`next_use`])
//! - reads that no assignment reaches ([`reaching`])
//! - the annotated block listing
//!
//! The result feeds the register allocator, which needs to know for each
//! operand whether its value is still needed after the current quadruple.

pub mod dataflow;
pub mod next_use;
pub mod reaching;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

pub use dataflow::{def_use, solve, BlockSets};
pub use next_use::{annotate, AnnotatedQuad, UseInfo};
pub use reaching::unassigned_reads;

use crate::blocks::{index_text, ProgramBlocks};
use crate::ir::Value;

/// A set of variables and temporaries, ordered for stable output.
pub type VarSet = BTreeSet<Value>;

/// A block with its live sets and annotated quadruples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedBlock {
    pub name: String,
    pub quads: Vec<AnnotatedQuad>,
    pub next1: Option<usize>,
    pub next2: Option<usize>,
    pub live_in: VarSet,
    pub live_out: VarSet,
}

/// Liveness results for every function of a program.
#[derive(Debug, Clone, Default)]
pub struct ProgramLiveness {
    functions: BTreeMap<String, Vec<AnnotatedBlock>>,
}

impl ProgramLiveness {
    /// Solve liveness and annotate the blocks of every function.
    pub fn analyze(blocks: &ProgramBlocks) -> Self {
        let functions = blocks
            .iter()
            .map(|(name, blocks)| {
                let sets = solve(blocks);
                let annotated = blocks
                    .iter()
                    .zip(sets)
                    .map(|(block, sets)| AnnotatedBlock {
                        name: block.name.clone(),
                        quads: annotate(&block.quads, &sets.live_out),
                        next1: block.next1,
                        next2: block.next2,
                        live_in: sets.live_in,
                        live_out: sets.live_out,
                    })
                    .collect();
                (name.to_string(), annotated)
            })
            .collect();

        Self { functions }
    }

    /// Functions and their annotated blocks, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AnnotatedBlock])> {
        self.functions
            .iter()
            .map(|(name, blocks)| (name.as_str(), blocks.as_slice()))
    }

    pub fn function(&self, name: &str) -> Option<&[AnnotatedBlock]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// Render the annotated blocks: live sets, then every quadruple
    /// followed by the `(next,live)` pairs of its three fields, then the
    /// successor indices.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (function, blocks) in self.iter() {
            let _ = writeln!(out, "[{}]", function);
            for block in blocks {
                let _ = writeln!(out, "{}:", block.name);
                let _ = writeln!(out, "    in  = {}", set_text(&block.live_in));
                let _ = writeln!(out, "    out = {}", set_text(&block.live_out));
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

fn set_text(set: &VarSet) -> String {
    let names: Vec<String> = set.iter().map(|value| value.to_string()).collect();
    format!("{{{}}}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarTable;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn liveness_of(source: &str) -> ProgramLiveness {
        let table = GrammarTable::default_grammar().unwrap();
        let tokens = tokenize(source).unwrap();
        let (output, errors) = parse(&table, &tokens);
        assert!(errors.is_empty(), "{:?}", errors);
        ProgramLiveness::analyze(&ProgramBlocks::build(output.code.quads(), &output.functions))
    }

    #[test]
    fn test_loop_variable_is_live_around_the_loop() {
        let liveness = liveness_of(
            "int main(void) { int i; int s; i = 0; s = 0;\n\
             while (i < 10) { s = s + i; i = i + 1; } return s; }",
        );
        let main = liveness.function("main").unwrap();
        let i = Value::Var("i".to_string());
        let s = Value::Var("s".to_string());
        assert!(main[0].live_in.is_empty());
        assert!(main[0].live_out.contains(&i));
        assert!(main[0].live_out.contains(&s));
        // Loop head reads `i`.
        assert!(main[1].live_in.contains(&i));
    }

    #[test]
    fn test_live_on_exit_implies_out_set() {
        let liveness = liveness_of(
            "int f(int a, int b) { int c; c = a; if (a > b) { c = b; } return c; }\n\
             int main(void) { int x; x = f(1, 2); while (x < 5) { x = x + 1; } return x; }",
        );
        for (_, blocks) in liveness.iter() {
            for block in blocks {
                let Some(last) = block.quads.last() else {
                    continue;
                };
                let fields = [
                    (last.quad.arg1.as_value(), last.arg1),
                    (last.quad.arg2.as_value(), last.arg2),
                    (last.quad.dest.as_value(), last.dest),
                ];
                for (value, info) in fields {
                    if let Some(value) = value {
                        if info.live && info.next_use.is_none() {
                            assert!(block.live_out.contains(value), "{} in {}", value, block.name);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_temporaries_do_not_escape_blocks() {
        let liveness = liveness_of("int main(void) { int x; x = 1 + 2 * 3; return x; }");
        for (_, blocks) in liveness.iter() {
            for block in blocks {
                assert!(block.live_out.iter().all(|v| matches!(v, Value::Var(_))));
            }
        }
    }

    #[test]
    fn test_listing_shape() {
        let liveness = liveness_of("int main(void) { int x; x = 2; return x; }");
        assert_eq!(
            liveness.listing(),
            "[main]\n\
             main:\n\
             \x20   in  = {}\n\
             \x20   out = {}\n\
             \x20   (=,2,_,x)(^,^)(^,^)(1,y)\n\
             \x20   (return,x,_,_)(^,^)(^,^)(^,^)\n\
             \x20   next1 = -1\n\
             \x20   next2 = -1\n"
        );
    }
}
