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


//! Emit helper methods for code generation.
//!
//! Low-level instruction emission shared by the quadruple translators:
//! plain instructions, labels and `$sp`-relative loads and stores.

use super::mips::{Instruction, Register};
use super::CodeGenerator;

/// Extension trait for low-level code emission.
pub trait EmitHelpers {
    /// Append one instruction.
    fn emit(&mut self, instruction: Instruction);

    fn emit_label(&mut self, name: &str);

    /// `lw rt offset($sp)`
    fn emit_load(&mut self, rt: Register, offset: i32);

    /// `sw rt offset($sp)`
    fn emit_store(&mut self, rt: Register, offset: i32);

    /// Move `rs` into `rd` (`add rd $zero rs`).
    fn emit_move(&mut self, rd: Register, rs: Register);

    /// Load an immediate into `rt` (`addi rt $zero value`).
    fn emit_immediate(&mut self, rt: Register, value: i32);
}

impl EmitHelpers for CodeGenerator {
    fn emit(&mut self, instruction: Instruction) {
        log::trace!("emit {}", instruction);
        self.code.push(instruction);
    }

    fn emit_label(&mut self, name: &str) {
        self.emit(Instruction::Label(name.to_string()));
    }

    fn emit_load(&mut self, rt: Register, offset: i32) {
        self.emit(Instruction::Lw {
            rt,
            offset,
            base: Register::Sp,
        });
    }

    fn emit_store(&mut self, rt: Register, offset: i32) {
        self.emit(Instruction::Sw {
            rt,
            offset,
            base: Register::Sp,
        });
    }

    fn emit_move(&mut self, rd: Register, rs: Register) {
        self.emit(Instruction::Add {
            rd,
            rs: Register::Zero,
            rt: rs,
        });
    }

    fn emit_immediate(&mut self, rt: Register, value: i32) {
        self.emit(Instruction::Addi {
            rt,
            rs: Register::Zero,
            imm: value,
        });
    }
}
