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

//! Quadruple intermediate code.
//!
//! This module provides:
//! - the typed quadruple ([`Quad`]) and its operands
//! - the growing code buffer with temporaries and backpatching
//! - the indexed listing format

mod quad;

pub use quad::{Dest, JumpTarget, Opcode, Operand, Quad, Relop, Value, RETURN_PLACE};

/// Quadruple indices whose jump destination is still open.
pub type BackpatchList = Vec<usize>;

/// Concatenate two backpatch lists, keeping order.
pub fn merge(mut first: BackpatchList, second: BackpatchList) -> BackpatchList {
    first.extend(second);
    first
}

/// The intermediate code of one compilation.
#[derive(Debug, Clone, Default)]
pub struct IntermediateCode {
    quads: Vec<Quad>,
    temp_counter: usize,
}

impl IntermediateCode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next emitted quadruple will get.
    pub fn next_quad(&self) -> usize {
        self.quads.len()
    }

    /// Append a quadruple and return its index.
    pub fn emit(&mut self, quad: Quad) -> usize {
        log::trace!("emit {:>4} {}", self.quads.len(), quad);
        self.quads.push(quad);
        self.quads.len() - 1
    }

    /// A fresh temporary. Temporaries are never reused.
    pub fn new_temp(&mut self) -> Value {
        let temp = Value::Temp(self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    /// Point every jump in `list` at quadruple `target`.
    pub fn backpatch(&mut self, list: &[usize], target: usize) {
        for &index in list {
            if let Some(quad) = self.quads.get_mut(index) {
                quad.dest = Dest::Target(JumpTarget::Quad(target));
            }
        }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn last(&self) -> Option<&Quad> {
        self.quads.last()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }

    /// Render the code one quadruple per line, prefixed by its index.
    pub fn listing(&self) -> String {
        listing(&self.quads)
    }
}

/// Render quadruples as `index (op,arg1,arg2,dest)` lines.
pub fn listing(quads: &[Quad]) -> String {
    quads
        .iter()
        .enumerate()
        .map(|(index, quad)| format!("{:>4} {}\n", index, quad))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_temporaries_are_fresh() {
        let mut code = IntermediateCode::new();
        assert_eq!(code.new_temp(), Value::Temp(0));
        assert_eq!(code.new_temp(), Value::Temp(1));
    }

    #[test]
    fn test_backpatch() {
        let mut code = IntermediateCode::new();
        let first = code.emit(Quad::jump(JumpTarget::Unresolved));
        let second = code.emit(Quad::jump_if(
            Relop::Lt,
            Operand::var("a"),
            Operand::Const(3),
            JumpTarget::Unresolved,
        ));
        code.emit(Quad::jump(JumpTarget::Unresolved));
        assert_eq!(code.next_quad(), 3);

        code.backpatch(&merge(vec![first], vec![second]), 7);
        assert_eq!(code.quads()[0].target(), Some(&JumpTarget::Quad(7)));
        assert_eq!(code.quads()[1].target(), Some(&JumpTarget::Quad(7)));
        assert_eq!(code.quads()[2].target(), Some(&JumpTarget::Unresolved));
    }

    #[test]
    fn test_merge_keeps_order() {
        assert_eq!(merge(vec![4, 1], vec![9, 2]), vec![4, 1, 9, 2]);
    }

    #[test]
    fn test_listing() {
        let mut code = IntermediateCode::new();
        code.emit(Quad::jump(JumpTarget::Unresolved));
        code.emit(Quad::new(
            Opcode::Return,
            Operand::Const(0),
            Operand::Empty,
            Dest::Empty,
        ));
        assert_eq!(code.listing(), "   0 (j,_,_,-1)\n   1 (return,0,_,_)\n");
    }
}
