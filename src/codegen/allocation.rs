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


//! Register selection and spilling.
//!
//! Operands are brought into registers on demand. When the register file
//! is full a victim is chosen by next use: a register whose variables are
//! not read again in the block is taken first, otherwise the one whose
//! nearest read is furthest away. Victims that still matter are stored to
//! their stack slot before the register is reused.

use std::cmp::Reverse;

use super::emit::EmitHelpers;
use super::mips::Register;
use super::CodeGenerator;
use crate::error::{CompileError, ErrorCode, Span};
use crate::ir::{Operand, Value};
use crate::liveness::dataflow::reads_and_writes;
use crate::liveness::UseInfo;

/// What happens to a variable next, from the current quadruple on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upcoming {
    /// Read by the quadruple at this block index.
    Read(usize),
    /// Overwritten before any read.
    Written,
    /// Neither read nor written in the rest of the block.
    Untouched,
}

/// Extension trait for register allocation.
pub trait RegisterAllocator {
    /// Scan the rest of the block (the current quadruple included) for the
    /// next access of `value`. Arguments waiting for a `call` count as read
    /// right now.
    fn upcoming(&self, value: &Value) -> Upcoming;

    /// Whether the only copy of `value` must be written back before its
    /// register is reused.
    fn needs_store(&self, value: &Value) -> bool;

    /// Pick a register for a new value, never one of `pinned`.
    fn select_register(&mut self, pinned: &[Register]) -> Register;

    /// Empty `register`, storing the variables that would otherwise be lost.
    fn spill(&mut self, register: Register);

    /// Bring an operand into a register.
    fn load_operand(&mut self, operand: &Operand, pinned: &[Register]) -> Result<Register, CompileError>;

    /// Bring a variable into a register, loading it from its slot if needed.
    fn load_value(&mut self, value: &Value, pinned: &[Register]) -> Result<Register, CompileError>;

    /// Register for the destination of an arithmetic quadruple. The first
    /// source's register is reused when it holds only that source and the
    /// source is dead afterwards or is the destination itself.
    fn destination_register(
        &mut self,
        dest: &Value,
        source: &Operand,
        source_info: UseInfo,
        source_register: Register,
    ) -> Register;

    /// Forget a source operand that is not needed after this quadruple.
    fn release_if_dead(&mut self, operand: &Operand, info: UseInfo, dest: Option<&Value>);

    /// Store variables live at block exit that have no up-to-date memory copy.
    fn store_out_live(&mut self);

    /// The error for reading a variable that holds no value.
    fn used_before_init(&self, value: &Value) -> CompileError;
}

impl RegisterAllocator for CodeGenerator {
    fn upcoming(&self, value: &Value) -> Upcoming {
        if self
            .pending_args
            .iter()
            .any(|(operand, _)| operand.as_value() == Some(value))
        {
            return Upcoming::Read(self.position);
        }

        for (index, annotated) in self.quads.iter().enumerate().skip(self.position) {
            let (reads, write) = reads_and_writes(&annotated.quad);
            if reads.contains(&value) {
                return Upcoming::Read(index);
            }
            if write == Some(value) {
                return Upcoming::Written;
            }
        }
        Upcoming::Untouched
    }

    fn needs_store(&self, value: &Value) -> bool {
        match self.upcoming(value) {
            Upcoming::Read(_) => true,
            Upcoming::Written => false,
            Upcoming::Untouched => self.live_out.contains(value),
        }
    }

    fn select_register(&mut self, pinned: &[Register]) -> Register {
        if let Some(register) = self.descriptors.free_register(pinned) {
            return register;
        }

        let victim = self
            .descriptors
            .file()
            .iter()
            .copied()
            .filter(|register| !pinned.contains(register))
            .map(|register| {
                let nearest = self
                    .descriptors
                    .residents(register)
                    .iter()
                    .filter(|value| self.descriptors.only_in(value, register))
                    .filter_map(|value| match self.upcoming(value) {
                        Upcoming::Read(index) => Some(index),
                        _ => None,
                    })
                    .min()
                    .unwrap_or(usize::MAX);
                (register, nearest)
            })
            .min_by_key(|&(_, nearest)| Reverse(nearest))
            .map_or(Register::Saved(0), |(register, _)| register);

        self.spill(victim);
        victim
    }

    fn spill(&mut self, register: Register) {
        for value in self.descriptors.clear_register(register) {
            if self.descriptors.has_location(&value) || !self.needs_store(&value) {
                continue;
            }
            let offset = self.frame.slot(&value);
            self.emit_store(register, offset);
            self.descriptors.stored(&value);
            log::debug!(
                "{}: spilled {} from {} to {}($sp)",
                self.function,
                value,
                register,
                offset
            );
        }
    }

    fn load_operand(&mut self, operand: &Operand, pinned: &[Register]) -> Result<Register, CompileError> {
        match operand {
            Operand::Const(value) => {
                let register = self.select_register(pinned);
                self.emit_immediate(register, *value);
                Ok(register)
            }
            Operand::Value(value) => self.load_value(value, pinned),
            Operand::ReturnValue => {
                let register = self.select_register(pinned);
                self.emit_move(register, Register::V0);
                Ok(register)
            }
            Operand::Empty | Operand::Function(_) => Err(CompileError::new(
                ErrorCode::VariableUsedBeforeInit,
                format!("operand '{}' has no value in function '{}'", operand, self.function),
                Span::default(),
            )),
        }
    }

    fn load_value(&mut self, value: &Value, pinned: &[Register]) -> Result<Register, CompileError> {
        if let Some(register) = self.descriptors.register_of(value) {
            return Ok(register);
        }
        if !self.descriptors.in_memory(value) {
            return Err(self.used_before_init(value));
        }

        let register = self.select_register(pinned);
        let offset = self.frame.slot(value);
        self.emit_load(register, offset);
        self.descriptors.attach(value, register);
        Ok(register)
    }

    fn destination_register(
        &mut self,
        dest: &Value,
        source: &Operand,
        source_info: UseInfo,
        source_register: Register,
    ) -> Register {
        if let Some(value) = source.as_value() {
            if self.descriptors.holds_only(source_register, value)
                && (value == dest || !source_info.live)
            {
                return source_register;
            }
        }
        self.select_register(&[])
    }

    fn release_if_dead(&mut self, operand: &Operand, info: UseInfo, dest: Option<&Value>) {
        if let Some(value) = operand.as_value() {
            if !info.live && Some(value) != dest {
                self.descriptors.release(value);
            }
        }
    }

    fn store_out_live(&mut self) {
        let live: Vec<Value> = self.live_out.iter().cloned().collect();
        for value in live {
            if self.descriptors.in_memory(&value) {
                continue;
            }
            if let Some(register) = self.descriptors.register_of(&value) {
                let offset = self.frame.slot(&value);
                self.emit_store(register, offset);
                self.descriptors.stored(&value);
            }
        }
    }

    fn used_before_init(&self, value: &Value) -> CompileError {
        CompileError::new(
            ErrorCode::VariableUsedBeforeInit,
            format!(
                "variable '{}' is used before it is initialized in function '{}'",
                value, self.function
            ),
            Span::default(),
        )
        .with_hint("assign a value to the variable before reading it")
    }
}
