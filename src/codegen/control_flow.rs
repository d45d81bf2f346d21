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


//! Jumps and conditional branches.

use super::allocation::RegisterAllocator;
use super::emit::EmitHelpers;
use super::mips::Instruction;
use super::CodeGenerator;
use crate::error::CompileError;
use crate::ir::{Quad, Relop};
use crate::liveness::AnnotatedQuad;

/// Extension trait for control flow code generation.
pub trait ControlFlowEmitter {
    /// `j label`
    fn generate_jump(&mut self, quad: &Quad);

    /// `b<cond> rs rt label`, releasing sources that die here.
    fn generate_branch(&mut self, annotated: &AnnotatedQuad, relop: Relop) -> Result<(), CompileError>;
}

/// Label text of a jump destination.
fn target_label(quad: &Quad) -> String {
    quad.dest
        .as_target()
        .map_or_else(String::new, |target| target.to_string())
}

impl ControlFlowEmitter for CodeGenerator {
    fn generate_jump(&mut self, quad: &Quad) {
        self.emit(Instruction::J(target_label(quad)));
    }

    fn generate_branch(&mut self, annotated: &AnnotatedQuad, relop: Relop) -> Result<(), CompileError> {
        let quad = &annotated.quad;
        let rs = self.load_operand(&quad.arg1, &[])?;
        let rt = self.load_operand(&quad.arg2, &[rs])?;
        self.emit(Instruction::Branch {
            relop,
            rs,
            rt,
            label: target_label(quad),
        });
        self.release_if_dead(&quad.arg1, annotated.arg1, None);
        self.release_if_dead(&quad.arg2, annotated.arg2, None);
        Ok(())
    }
}
