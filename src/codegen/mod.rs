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


//! Code generation module.
//!
//! This module turns the annotated blocks into MIPS assembly. It handles:
//! - Frame layout (one stack slot per variable, parameters first)
//! - Register allocation driven by next-use information
//! - Calls, returns and parameter passing on the stack
//! - Branches to block labels
//!
//! Functions are emitted in name order between a fixed prologue, which
//! sets up `$sp` and jumps to `main`, and the `end:` epilogue label.

pub mod allocation;
pub mod assignments;
pub mod binary_ops;
pub mod constants;
pub mod control_flow;
pub mod emit;
pub mod functions;
pub mod mips;
pub mod registers;
pub mod variables;

use std::fmt::Write;

use allocation::RegisterAllocator;
use assignments::AssignmentEmitter;
use binary_ops::BinaryOpsEmitter;
use constants::{END_LABEL, ENTRY_FUNCTION, MAX_IMMEDIATE, STACK_BASE_UPPER};
use control_flow::ControlFlowEmitter;
use emit::EmitHelpers;
use functions::FunctionEmitter;

pub use mips::{Instruction, Register};
pub use registers::{AllocatorConfig, Descriptors};
pub use variables::FrameLayout;

use crate::error::{CompileError, ErrorCode, Errors, Span};
use crate::ir::{Opcode, Operand};
use crate::liveness::{
    unassigned_reads, AnnotatedBlock, AnnotatedQuad, ProgramLiveness, UseInfo, VarSet,
};

/// A generated assembly program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    instructions: Vec<Instruction>,
}

impl Assembly {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// One instruction or label per line.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for instruction in &self.instructions {
            let _ = writeln!(out, "{}", instruction);
        }
        out
    }
}

/// The MIPS code generator.
pub struct CodeGenerator {
    config: AllocatorConfig,
    /// The generated instructions.
    code: Vec<Instruction>,
    errors: Errors,
    /// Function being generated.
    function: String,
    frame: FrameLayout,
    descriptors: Descriptors,
    /// Quadruples of the current block.
    quads: Vec<AnnotatedQuad>,
    /// Variables live on exit from the current block.
    live_out: VarSet,
    /// Index of the current quadruple within the block.
    position: usize,
    /// `par` arguments waiting for their `call`.
    pending_args: Vec<(Operand, UseInfo)>,
}

impl CodeGenerator {
    /// Create a new code generator.
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            config,
            code: Vec::new(),
            errors: Errors::new(),
            function: String::new(),
            frame: FrameLayout::default(),
            descriptors: Descriptors::new(config),
            quads: Vec::new(),
            live_out: VarSet::new(),
            position: 0,
            pending_args: Vec::new(),
        }
    }

    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    /// Generate the program. Any register allocation error fails the
    /// whole program; every function is still checked so all errors are
    /// reported at once.
    pub fn generate(&mut self, liveness: &ProgramLiveness) -> Result<Assembly, Errors> {
        self.code.clear();
        self.errors = Errors::new();

        self.emit(Instruction::Lui {
            rt: Register::Sp,
            imm: STACK_BASE_UPPER,
        });
        self.emit(Instruction::J(ENTRY_FUNCTION.to_string()));

        for (name, blocks) in liveness.iter() {
            self.generate_function(name, blocks);
        }

        self.emit_label(END_LABEL);

        if self.errors.has_errors() {
            return Err(std::mem::take(&mut self.errors));
        }
        Ok(Assembly {
            instructions: std::mem::take(&mut self.code),
        })
    }

    fn generate_function(&mut self, name: &str, blocks: &[AnnotatedBlock]) {
        self.function = name.to_string();
        self.frame = FrameLayout::of(blocks);

        // `top` is both an `addi` immediate and a `$sp` offset.
        if self.frame.size() > MAX_IMMEDIATE {
            self.errors.push(
                CompileError::new(
                    ErrorCode::FrameTooLarge,
                    format!(
                        "function '{}' needs a frame of {} bytes, more than {}",
                        name,
                        self.frame.size(),
                        MAX_IMMEDIATE
                    ),
                    Span::default(),
                )
                .with_hint("split the function or use fewer variables"),
            );
            return;
        }

        let unassigned = unassigned_reads(blocks);
        if !unassigned.is_empty() {
            for value in unassigned {
                self.errors.push(
                    CompileError::new(
                        ErrorCode::VariableUsedBeforeInit,
                        format!(
                            "variable '{}' is read in function '{}' but never assigned before",
                            value, name
                        ),
                        Span::default(),
                    )
                    .with_hint("assign a value to the variable before reading it"),
                );
            }
            return;
        }

        for (index, block) in blocks.iter().enumerate() {
            if let Err(error) = self.generate_block(index, block) {
                self.errors.push(error);
                return;
            }
        }
        log::debug!("function '{}': frame of {} bytes", name, self.frame.size());
    }

    fn generate_block(&mut self, index: usize, block: &AnnotatedBlock) -> Result<(), CompileError> {
        self.descriptors.reset(&block.live_in);
        self.quads = block.quads.clone();
        self.live_out = block.live_out.clone();
        self.pending_args.clear();

        self.emit_label(&block.name);
        if index == 0 {
            self.generate_entry();
        }

        let count = block.quads.len();
        for (position, annotated) in block.quads.iter().enumerate() {
            self.position = position;
            let is_last = position + 1 == count;
            let is_control = annotated.quad.op.is_control();

            if is_last && is_control {
                self.store_out_live();
            }
            self.generate_quad(annotated)?;
            if is_last && !is_control {
                self.store_out_live();
            }
        }
        Ok(())
    }

    fn generate_quad(&mut self, annotated: &AnnotatedQuad) -> Result<(), CompileError> {
        let quad = &annotated.quad;
        match quad.op {
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                self.generate_arithmetic(annotated)
            }
            Opcode::Assign => self.generate_assignment(annotated),
            Opcode::Jump => {
                self.generate_jump(quad);
                Ok(())
            }
            Opcode::JumpIf(relop) => self.generate_branch(annotated, relop),
            Opcode::Param => self.generate_param(annotated),
            Opcode::Call => self.generate_call(quad),
            Opcode::Return => self.generate_return(quad),
            Opcode::Get => {
                self.generate_get(quad);
                Ok(())
            }
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(AllocatorConfig::default())
    }
}

/// Generate assembly for an analyzed program.
pub fn generate(liveness: &ProgramLiveness, config: AllocatorConfig) -> Result<Assembly, Errors> {
    let mut generator = CodeGenerator::new(config);
    generator.generate(liveness)
}
