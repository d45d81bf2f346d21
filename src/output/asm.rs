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


//! Assembly file writer.
//!
//! The file is the assembly listing as is: one instruction or label per
//! line, ready for MARS or SPIM.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::codegen::Assembly;

/// Write an assembly program to `path`.
pub fn write_assembly(assembly: &Assembly, path: &Path) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for instruction in assembly.instructions() {
        writeln!(file, "{}", instruction)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use std::fs;

    #[test]
    fn test_write_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.asm");

        let compiler = Compiler::with_default_grammar().unwrap();
        let compilation = compiler.compile("int main(void) { return 3; }");
        let assembly = compilation.assembly().unwrap();
        write_assembly(assembly, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, assembly.listing());
        assert!(written.starts_with("lui $sp,0x1001\nj main\n"));
    }
}
