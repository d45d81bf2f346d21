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

//! Quadruple types.
//!
//! Every field is typed: temporaries can never collide with user
//! variables, and a jump destination is either unresolved, a quadruple
//! index (after backpatching) or a block label (after block construction).

use std::fmt;

/// Text used for the call return slot operand.
pub const RETURN_PLACE: &str = "@RETURN_PLACE";

/// A relational operator of a conditional jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relop {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Relop {
    /// Map a comparison terminal (`>`, `<=`, ...) to its operator.
    pub fn from_symbol(symbol: &str) -> Option<Relop> {
        match symbol {
            "==" => Some(Relop::Eq),
            "!=" => Some(Relop::Ne),
            ">" => Some(Relop::Gt),
            "<" => Some(Relop::Lt),
            ">=" => Some(Relop::Ge),
            "<=" => Some(Relop::Le),
            _ => None,
        }
    }

    /// The operator that holds exactly when `self` does not.
    pub fn negate(self) -> Relop {
        match self {
            Relop::Eq => Relop::Ne,
            Relop::Ne => Relop::Eq,
            Relop::Gt => Relop::Le,
            Relop::Lt => Relop::Ge,
            Relop::Ge => Relop::Lt,
            Relop::Le => Relop::Gt,
        }
    }

    /// Evaluate the comparison.
    pub fn holds(self, left: i32, right: i32) -> bool {
        match self {
            Relop::Eq => left == right,
            Relop::Ne => left != right,
            Relop::Gt => left > right,
            Relop::Lt => left < right,
            Relop::Ge => left >= right,
            Relop::Le => left <= right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relop::Eq => "==",
            Relop::Ne => "!=",
            Relop::Gt => ">",
            Relop::Lt => "<",
            Relop::Ge => ">=",
            Relop::Le => "<=",
        }
    }
}

/// The operator of a quadruple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
    Assign,
    /// `j`: unconditional jump.
    Jump,
    /// `j<relop>`: jump if `arg1 relop arg2`.
    JumpIf(Relop),
    /// `par`: pass `arg1` as the next call argument.
    Param,
    /// `call`: call the function in `arg1`.
    Call,
    /// `return`: return `arg1` (or nothing).
    Return,
    /// `get`: bind the next incoming parameter to `dest`.
    Get,
}

impl Opcode {
    /// Map an arithmetic terminal to its operator.
    pub fn arithmetic(symbol: &str) -> Option<Opcode> {
        match symbol {
            "+" => Some(Opcode::Add),
            "-" => Some(Opcode::Sub),
            "*" => Some(Opcode::Mul),
            "/" => Some(Opcode::Div),
            _ => None,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jump | Opcode::JumpIf(_))
    }

    pub fn is_conditional_jump(self) -> bool {
        matches!(self, Opcode::JumpIf(_))
    }

    /// Check if control leaves the straight line at this quadruple.
    ///
    /// Live variables must reach memory before such a quadruple runs.
    pub fn is_control(self) -> bool {
        matches!(
            self,
            Opcode::Jump | Opcode::JumpIf(_) | Opcode::Call | Opcode::Return | Opcode::Get
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Add => f.write_str("+"),
            Opcode::Sub => f.write_str("-"),
            Opcode::Mul => f.write_str("*"),
            Opcode::Div => f.write_str("/"),
            Opcode::Assign => f.write_str("="),
            Opcode::Jump => f.write_str("j"),
            Opcode::JumpIf(relop) => write!(f, "j{}", relop.as_str()),
            Opcode::Param => f.write_str("par"),
            Opcode::Call => f.write_str("call"),
            Opcode::Return => f.write_str("return"),
            Opcode::Get => f.write_str("get"),
        }
    }
}

/// A storage location visible to liveness analysis and register allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// A user variable.
    Var(String),
    /// A compiler temporary `T<n>`.
    Temp(usize),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Var(name) => f.write_str(name),
            Value::Temp(index) => write!(f, "T{}", index),
        }
    }
}

/// A source operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `_`
    Empty,
    Const(i32),
    Value(Value),
    /// The value returned by the last `call`.
    ReturnValue,
    /// A callee name.
    Function(String),
}

impl Operand {
    pub fn var(name: impl Into<String>) -> Self {
        Operand::Value(Value::Var(name.into()))
    }

    /// The variable or temporary this operand reads, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Empty => f.write_str("_"),
            Operand::Const(value) => write!(f, "{}", value),
            Operand::Value(value) => write!(f, "{}", value),
            Operand::ReturnValue => f.write_str(RETURN_PLACE),
            Operand::Function(name) => f.write_str(name),
        }
    }
}

/// Where a jump goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JumpTarget {
    /// Not known yet; printed as `-1`.
    Unresolved,
    /// A quadruple index, after backpatching.
    Quad(usize),
    /// A block label, after block construction.
    Label(String),
}

impl fmt::Display for JumpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpTarget::Unresolved => f.write_str("-1"),
            JumpTarget::Quad(index) => write!(f, "{}", index),
            JumpTarget::Label(label) => f.write_str(label),
        }
    }
}

/// The destination field of a quadruple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dest {
    /// `_`
    Empty,
    Value(Value),
    Target(JumpTarget),
}

impl Dest {
    /// The variable or temporary written by this quadruple, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Dest::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_target(&self) -> Option<&JumpTarget> {
        match self {
            Dest::Target(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dest::Empty => f.write_str("_"),
            Dest::Value(value) => write!(f, "{}", value),
            Dest::Target(target) => write!(f, "{}", target),
        }
    }
}

/// A quadruple `(op, arg1, arg2, dest)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quad {
    pub op: Opcode,
    pub arg1: Operand,
    pub arg2: Operand,
    pub dest: Dest,
}

impl Quad {
    pub fn new(op: Opcode, arg1: Operand, arg2: Operand, dest: Dest) -> Self {
        Self {
            op,
            arg1,
            arg2,
            dest,
        }
    }

    /// `(j, _, _, target)`
    pub fn jump(target: JumpTarget) -> Self {
        Self::new(
            Opcode::Jump,
            Operand::Empty,
            Operand::Empty,
            Dest::Target(target),
        )
    }

    /// `(j<relop>, left, right, target)`
    pub fn jump_if(relop: Relop, left: Operand, right: Operand, target: JumpTarget) -> Self {
        Self::new(Opcode::JumpIf(relop), left, right, Dest::Target(target))
    }

    /// The jump destination, for jump quadruples.
    pub fn target(&self) -> Option<&JumpTarget> {
        if self.op.is_jump() {
            self.dest.as_target()
        } else {
            None
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.op, self.arg1, self.arg2, self.dest)
    }
}
