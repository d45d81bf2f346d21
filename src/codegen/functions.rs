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


//! Function entry, parameters, calls and returns.
//!
//! Calling sequence for `f(a, b)` from a frame of `top` bytes:
//!
//! ```text
//! sw a' top+8($sp)      arguments above the caller frame
//! sw b' top+12($sp)
//! sw $sp top($sp)       saved caller $sp at 0 of the callee frame
//! addi $sp $sp top
//! jal f                 callee saves $ra at 4($sp) on entry
//! lw $sp 0($sp)
//! ```

use super::allocation::RegisterAllocator;
use super::constants::{
    END_LABEL, ENTRY_FUNCTION, MAX_IMMEDIATE, RETURN_ADDRESS_OFFSET, SAVED_SP_OFFSET, WORD_SIZE,
};
use super::emit::EmitHelpers;
use super::mips::{Instruction, Register};
use super::CodeGenerator;
use crate::error::{CompileError, ErrorCode, Span};
use crate::ir::{Operand, Quad};
use crate::liveness::AnnotatedQuad;

/// Extension trait for function-related code generation.
pub trait FunctionEmitter {
    /// Save the return address on entry to a function other than `main`.
    fn generate_entry(&mut self);

    /// `get`: the parameter already sits in its slot.
    fn generate_get(&mut self, quad: &Quad);

    /// `par`: defer the argument until the `call`.
    fn generate_param(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError>;

    fn generate_call(&mut self, quad: &Quad) -> Result<(), CompileError>;

    /// Place the value in `$v0` and leave the function.
    fn generate_return(&mut self, quad: &Quad) -> Result<(), CompileError>;
}

impl FunctionEmitter for CodeGenerator {
    fn generate_entry(&mut self) {
        if self.function != ENTRY_FUNCTION {
            self.emit_store(Register::Ra, RETURN_ADDRESS_OFFSET);
        }
    }

    fn generate_get(&mut self, quad: &Quad) {
        if let Some(param) = quad.dest.as_value() {
            self.frame.slot(param);
            self.descriptors.stored(param);
        }
    }

    fn generate_param(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError> {
        let argument = &annotated.quad.arg1;
        if let Some(value) = argument.as_value() {
            if !self.descriptors.has_location(value) {
                return Err(self.used_before_init(value));
            }
        }
        self.pending_args.push((argument.clone(), annotated.arg1));
        Ok(())
    }

    fn generate_call(&mut self, quad: &Quad) -> Result<(), CompileError> {
        let top = self.frame.size();
        let mut slot = top + 2 * WORD_SIZE;

        let arguments = self.pending_args.len() as i32;
        let last_slot = slot + WORD_SIZE * (arguments - 1);
        if arguments > 0 && last_slot > MAX_IMMEDIATE {
            return Err(CompileError::new(
                ErrorCode::FrameTooLarge,
                format!(
                    "arguments of a call in function '{}' need offset {}, more than {}",
                    self.function, last_slot, MAX_IMMEDIATE
                ),
                Span::default(),
            )
            .with_hint("pass fewer arguments or use fewer variables in the caller"));
        }

        while !self.pending_args.is_empty() {
            let (argument, info) = self.pending_args.remove(0);
            let register = self.load_operand(&argument, &[])?;
            self.emit_store(register, slot);
            self.release_if_dead(&argument, info, None);
            slot += WORD_SIZE;
        }

        let callee = match &quad.arg1 {
            Operand::Function(name) => name.clone(),
            other => other.to_string(),
        };
        self.emit_store(Register::Sp, top);
        self.emit(Instruction::Addi {
            rt: Register::Sp,
            rs: Register::Sp,
            imm: top,
        });
        self.emit(Instruction::Jal(callee));
        self.emit_load(Register::Sp, SAVED_SP_OFFSET);
        Ok(())
    }

    fn generate_return(&mut self, quad: &Quad) -> Result<(), CompileError> {
        match &quad.arg1 {
            Operand::Const(value) => self.emit_immediate(Register::V0, *value),
            Operand::Value(value) => {
                if let Some(register) = self.descriptors.register_of(value) {
                    self.emit_move(Register::V0, register);
                } else if self.descriptors.in_memory(value) {
                    let offset = self.frame.slot(value);
                    self.emit_load(Register::V0, offset);
                } else {
                    return Err(self.used_before_init(value));
                }
            }
            Operand::ReturnValue => {}
            Operand::Empty | Operand::Function(_) => {}
        }

        if self.function == ENTRY_FUNCTION {
            self.emit(Instruction::J(END_LABEL.to_string()));
        } else {
            self.emit_load(Register::Ra, RETURN_ADDRESS_OFFSET);
            self.emit(Instruction::Jr(Register::Ra));
        }
        Ok(())
    }
}
