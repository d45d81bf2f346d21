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


//! Arithmetic quadruples: `+`, `-`, `*` and `/`.

use super::allocation::RegisterAllocator;
use super::emit::EmitHelpers;
use super::mips::Instruction;
use super::CodeGenerator;
use crate::error::CompileError;
use crate::ir::Opcode;
use crate::liveness::AnnotatedQuad;

/// Extension trait for arithmetic code generation.
pub trait BinaryOpsEmitter {
    /// `dest = arg1 op arg2`. Division goes through `lo`.
    fn generate_arithmetic(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError>;
}

impl BinaryOpsEmitter for CodeGenerator {
    fn generate_arithmetic(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError> {
        let quad = &annotated.quad;
        let Some(dest) = quad.dest.as_value() else {
            return Ok(());
        };

        let rs = self.load_operand(&quad.arg1, &[])?;
        let rt = self.load_operand(&quad.arg2, &[rs])?;
        let rd = self.destination_register(dest, &quad.arg1, annotated.arg1, rs);

        match quad.op {
            Opcode::Add => self.emit(Instruction::Add { rd, rs, rt }),
            Opcode::Sub => self.emit(Instruction::Sub { rd, rs, rt }),
            Opcode::Mul => self.emit(Instruction::Mul { rd, rs, rt }),
            Opcode::Div => {
                self.emit(Instruction::Div { rs, rt });
                self.emit(Instruction::Mflo { rd });
            }
            _ => return Ok(()),
        }

        self.descriptors.define(dest, rd);
        self.release_if_dead(&quad.arg1, annotated.arg1, Some(dest));
        self.release_if_dead(&quad.arg2, annotated.arg2, Some(dest));
        Ok(())
    }
}
