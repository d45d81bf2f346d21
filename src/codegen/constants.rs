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


//! Frame layout and program-level constants.
//!
//! A frame grows upward from `$sp`:
//!
//! ```text
//! 0($sp)   caller's $sp
//! 4($sp)   return address
//! 8($sp)   first parameter, then the other variables
//! ```

/// Upper half of the initial stack pointer (`0x10010000`).
pub const STACK_BASE_UPPER: u16 = 0x1001;

/// Size of one stack slot in bytes.
pub const WORD_SIZE: i32 = 4;

/// Offset of the saved caller stack pointer.
pub const SAVED_SP_OFFSET: i32 = 0;

/// Offset of the saved return address.
pub const RETURN_ADDRESS_OFFSET: i32 = 4;

/// Offset of the first parameter or variable slot.
pub const FIRST_SLOT_OFFSET: i32 = 8;

/// Largest `$sp` offset or `addi` immediate: a signed 16-bit field.
pub const MAX_IMMEDIATE: i32 = i16::MAX as i32;

/// The function the program starts in.
pub const ENTRY_FUNCTION: &str = "main";

/// Label of the program epilogue that `main` returns to.
pub const END_LABEL: &str = "end";
