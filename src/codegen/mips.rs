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


//! MIPS registers and the instruction subset the code generator emits.
//!
//! Instructions are kept as values until the listing is rendered, one
//! instruction per line in the textual form the MARS/SPIM assemblers read.

use std::fmt;

use crate::ir::Relop;

/// A machine register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    /// `$zero`, always 0.
    Zero,
    /// `$sp`, the frame pointer of the running function.
    Sp,
    /// `$ra`, the return address set by `jal`.
    Ra,
    /// `$v0`, the function return value.
    V0,
    /// `$s0`..`$s7`, the registers handed out by the allocator.
    Saved(u8),
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Zero => f.write_str("$zero"),
            Register::Sp => f.write_str("$sp"),
            Register::Ra => f.write_str("$ra"),
            Register::V0 => f.write_str("$v0"),
            Register::Saved(index) => write!(f, "$s{}", index),
        }
    }
}

/// One emitted instruction or label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Label(String),
    /// Load upper immediate.
    Lui { rt: Register, imm: u16 },
    Lw { rt: Register, offset: i32, base: Register },
    Sw { rt: Register, offset: i32, base: Register },
    Add { rd: Register, rs: Register, rt: Register },
    Sub { rd: Register, rs: Register, rt: Register },
    Mul { rd: Register, rs: Register, rt: Register },
    /// Divide into `lo`/`hi`; the quotient is fetched with `mflo`.
    Div { rs: Register, rt: Register },
    Mflo { rd: Register },
    Addi { rt: Register, rs: Register, imm: i32 },
    /// Conditional branch (`bge`, `bgt`, `beq`, `bne`, `blt`, `ble`).
    Branch {
        relop: Relop,
        rs: Register,
        rt: Register,
        label: String,
    },
    J(String),
    Jal(String),
    Jr(Register),
}

impl Instruction {
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }
}

/// Branch mnemonic for a relational operator.
pub fn branch_mnemonic(relop: Relop) -> &'static str {
    match relop {
        Relop::Ge => "bge",
        Relop::Gt => "bgt",
        Relop::Eq => "beq",
        Relop::Ne => "bne",
        Relop::Lt => "blt",
        Relop::Le => "ble",
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label(name) => write!(f, "{}:", name),
            Instruction::Lui { rt, imm } => write!(f, "lui {},0x{:x}", rt, imm),
            Instruction::Lw { rt, offset, base } => write!(f, "lw {} {}({})", rt, offset, base),
            Instruction::Sw { rt, offset, base } => write!(f, "sw {} {}({})", rt, offset, base),
            Instruction::Add { rd, rs, rt } => write!(f, "add {} {} {}", rd, rs, rt),
            Instruction::Sub { rd, rs, rt } => write!(f, "sub {} {} {}", rd, rs, rt),
            Instruction::Mul { rd, rs, rt } => write!(f, "mul {} {} {}", rd, rs, rt),
            Instruction::Div { rs, rt } => write!(f, "div {} {}", rs, rt),
            Instruction::Mflo { rd } => write!(f, "mflo {}", rd),
            Instruction::Addi { rt, rs, imm } => write!(f, "addi {} {} {}", rt, rs, imm),
            Instruction::Branch {
                relop,
                rs,
                rt,
                label,
            } => write!(f, "{} {} {} {}", branch_mnemonic(*relop), rs, rt, label),
            Instruction::J(label) => write!(f, "j {}", label),
            Instruction::Jal(label) => write!(f, "jal {}", label),
            Instruction::Jr(rs) => write!(f, "jr {}", rs),
        }
    }
}
