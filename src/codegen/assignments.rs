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


//! Copy quadruples (`=`).
//!
//! A copy between variables emits nothing: the destination joins the
//! register that holds the source.

use super::allocation::RegisterAllocator;
use super::emit::EmitHelpers;
use super::mips::Register;
use super::CodeGenerator;
use crate::error::CompileError;
use crate::ir::Operand;
use crate::liveness::AnnotatedQuad;

/// Extension trait for assignment code generation.
pub trait AssignmentEmitter {
    fn generate_assignment(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError>;
}

impl AssignmentEmitter for CodeGenerator {
    fn generate_assignment(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError> {
        let quad = &annotated.quad;
        let Some(dest) = quad.dest.as_value() else {
            return Ok(());
        };

        match &quad.arg1 {
            Operand::Value(source) => {
                let register = self.load_value(source, &[])?;
                if source != dest {
                    self.descriptors.define_copy(dest, register);
                    self.release_if_dead(&quad.arg1, annotated.arg1, Some(dest));
                }
            }
            Operand::Const(value) => {
                let register = self.select_register(&[]);
                self.emit_immediate(register, *value);
                self.descriptors.define(dest, register);
            }
            Operand::ReturnValue => {
                let register = self.select_register(&[]);
                self.emit_move(register, Register::V0);
                self.descriptors.define(dest, register);
            }
            Operand::Empty | Operand::Function(_) => {}
        }
        Ok(())
    }
}
