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


//! Output module for the cminus compiler.
//!
//! This module writes the results of a compilation to disk:
//! - the assembly program (`<stem>.asm`)
//! - the text artifacts of every stage that ran, for inspection

mod asm;

pub use asm::write_assembly;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::compiler::Compilation;

pub const TOKENS_FILE: &str = "tokens.txt";
pub const IR_FILE: &str = "ir.txt";
pub const BLOCKS_FILE: &str = "blocks.txt";
pub const LIVENESS_FILE: &str = "liveness.txt";
pub const TRACE_FILE: &str = "trace.txt";
pub const DFA_FILE: &str = "dfa.txt";

/// Derive the assembly path for a source file: same stem, `.asm` extension.
pub fn assembly_path(source: &Path) -> PathBuf {
    source.with_extension("asm")
}

/// Write every artifact the compilation produced into `dir`, which is
/// created if missing. Stages that did not run leave no file; the parse
/// trace is only written when it was recorded.
///
/// Returns the paths written, in a fixed order.
pub fn write_artifacts(compilation: &Compilation<'_>, dir: &Path, stem: &str) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let trace = compilation.parse_trace().filter(|trace| !trace.is_empty());
    let texts = [
        (TOKENS_FILE.to_string(), compilation.token_listing()),
        (IR_FILE.to_string(), compilation.ir_listing()),
        (TRACE_FILE.to_string(), trace),
        (BLOCKS_FILE.to_string(), compilation.block_listing()),
        (LIVENESS_FILE.to_string(), compilation.annotated_listing()),
        (
            DFA_FILE.to_string(),
            Some(compilation.compiler().table().dfa_listing()),
        ),
        (format!("{}.asm", stem), compilation.assembly_listing()),
    ];

    let mut written = Vec::new();
    for (name, text) in texts {
        let Some(text) = text else {
            continue;
        };
        let path = dir.join(name);
        fs::write(&path, text)?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    #[test]
    fn test_assembly_path() {
        assert_eq!(
            assembly_path(Path::new("dir/prog.c")),
            PathBuf::from("dir/prog.asm")
        );
        assert_eq!(assembly_path(Path::new("prog")), PathBuf::from("prog.asm"));
    }

    #[test]
    fn test_write_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::with_default_grammar().unwrap().with_trace(true);
        let compilation = compiler.compile("int main(void) { int x; x = 4; return x; }");

        let written = write_artifacts(&compilation, dir.path(), "prog").unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "tokens.txt",
                "ir.txt",
                "trace.txt",
                "blocks.txt",
                "liveness.txt",
                "dfa.txt",
                "prog.asm"
            ]
        );
        let ir = fs::read_to_string(dir.path().join(IR_FILE)).unwrap();
        assert!(ir.contains("(return,x,_,_)"));
    }

    #[test]
    fn test_failed_compilation_writes_partial_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::with_default_grammar().unwrap();
        let compilation = compiler.compile("int main(void) { return y; }");
        assert!(!compilation.succeeded());

        write_artifacts(&compilation, dir.path(), "prog").unwrap();
        assert!(dir.path().join(IR_FILE).exists());
        assert!(!dir.path().join(TRACE_FILE).exists());
        assert!(!dir.path().join("prog.asm").exists());
    }
}
