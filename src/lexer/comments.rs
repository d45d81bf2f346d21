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

//! Comment skipping for the lexer.

use super::helpers::LexerHelpers;
use super::Lexer;

/// Trait for comment skipping operations.
pub trait CommentScanner<'source> {
    /// Skip a `//` comment up to (not including) the end of the line.
    fn skip_line_comment(&mut self);

    /// Skip a `/* ... */` comment, counting the lines it spans.
    ///
    /// Returns `false` if the input ended before the closing `*/`.
    fn skip_block_comment(&mut self) -> bool;
}

impl<'source> CommentScanner<'source> for Lexer<'source> {
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> bool {
        // consume "/*"
        self.advance();
        self.advance();

        while let Some(c) = self.advance() {
            if c == '*' && self.advance_if('/') {
                return true;
            }
        }
        false
    }
}
