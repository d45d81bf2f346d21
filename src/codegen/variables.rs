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


//! Stack slots of a function's variables.

use std::collections::HashMap;

use super::constants::{FIRST_SLOT_OFFSET, WORD_SIZE};
use crate::ir::{Opcode, Value};
use crate::liveness::AnnotatedBlock;

/// Stack offsets of every variable and temporary of one function.
///
/// The layout is fixed before any instruction is emitted, so the frame
/// size is known up front and serves as the base of the callee frame when
/// the function makes a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    slots: HashMap<Value, i32>,
    size: i32,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            size: FIRST_SLOT_OFFSET,
        }
    }
}

impl FrameLayout {
    /// Lay out the frame of a function from its blocks.
    ///
    /// Parameters (`get` destinations) come first in declaration order,
    /// then every other value in order of first appearance.
    pub fn of(blocks: &[AnnotatedBlock]) -> Self {
        let mut layout = Self::default();

        let quads = || blocks.iter().flat_map(|block| block.quads.iter());
        for annotated in quads().filter(|annotated| annotated.quad.op == Opcode::Get) {
            if let Some(param) = annotated.quad.dest.as_value() {
                layout.slot(param);
            }
        }
        for annotated in quads() {
            let quad = &annotated.quad;
            let values = [quad.arg1.as_value(), quad.arg2.as_value(), quad.dest.as_value()];
            for value in values.into_iter().flatten() {
                layout.slot(value);
            }
        }

        layout
    }

    /// Offset of `value`, assigning the next free slot if it has none.
    pub fn slot(&mut self, value: &Value) -> i32 {
        if let Some(&offset) = self.slots.get(value) {
            return offset;
        }
        let offset = self.size;
        self.slots.insert(value.clone(), offset);
        self.size += WORD_SIZE;
        offset
    }

    pub fn offset(&self, value: &Value) -> Option<i32> {
        self.slots.get(value).copied()
    }

    /// Bytes used by the frame; a callee frame starts at this offset.
    pub fn size(&self) -> i32 {
        self.size
    }
}
