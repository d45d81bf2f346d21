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


//! cminus Compiler Library
//!
//! This library compiles a small C subset into MIPS assembly. The parser is
//! driven by an LR table built at runtime from a grammar file, so the
//! accepted language can be changed without touching the compiler.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`grammar`] - Grammar loading, FIRST/FOLLOW sets and the parse table
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Table-driven parsing with intermediate code generation
//! - [`ir`] - Quadruples and backpatching
//! - [`blocks`] - Basic blocks and control flow edges
//! - [`liveness`] - Live-variable analysis and next-use information
//! - [`codegen`] - Register allocation and MIPS code generation
//! - [`compiler`] - The staged compilation pipeline
//! - [`output`] - Assembly and artifact files
//!
//! # Example
//!
//! ```no_run
//! use cminus::compiler::Compiler;
//!
//! fn build(source: &str) -> Result<String, Box<dyn std::error::Error>> {
//!     let compiler = Compiler::with_default_grammar()?;
//!     let compilation = compiler.compile(source);
//!     match compilation.assembly_listing() {
//!         Some(listing) if compilation.succeeded() => Ok(listing),
//!         _ => Err(compilation.diagnostics_text().into()),
//!     }
//! }
//! ```

use std::sync::Arc;

pub mod blocks;
pub mod codegen;
pub mod compiler;
pub mod error;
pub mod grammar;
pub mod ir;
pub mod lexer;
pub mod liveness;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use codegen::{AllocatorConfig, Assembly};
pub use compiler::{Compilation, Compiler, CompilerState};
pub use error::{format_error, CompileError, ErrorCode, Errors, GrammarError, Result, Span};
pub use grammar::GrammarTable;
pub use lexer::Token;

/// The version of the cminus compiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the compiler.
pub const NAME: &str = "cminus";

/// Compile source code to MIPS assembly with the full register file.
///
/// The table is shared, not copied, so calling this repeatedly with the
/// same table only pays for the compilation itself.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// let table = Arc::new(cminus::GrammarTable::default_grammar().unwrap());
/// let source = "int main(void) { int x; x = 1 + 2 * 3; return x; }";
///
/// match cminus::compile(&table, source) {
///     Ok(assembly) => print!("{}", assembly.listing()),
///     Err(errors) => eprint!("{}", errors.render(source, None)),
/// }
/// ```
pub fn compile(
    table: &Arc<GrammarTable>,
    source: &str,
) -> std::result::Result<Assembly, Errors> {
    let compiler = Compiler::new(Arc::clone(table));
    let mut compilation = compiler.compilation(source);
    compilation.run();
    match compilation.assembly() {
        Some(assembly) if compilation.succeeded() => Ok(assembly.clone()),
        _ => Err(compilation.diagnostics().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "cminus");
    }

    #[test]
    fn test_compile() {
        let table = Arc::new(GrammarTable::default_grammar().unwrap());
        let assembly = compile(&table, "int main(void) { return 0; }").unwrap();
        assert!(!assembly.is_empty());

        let errors = compile(&table, "int main(void) { return x; }").unwrap_err();
        assert!(errors.contains(ErrorCode::UndefinedVariable));

        // Both compilations used the one shared table.
        assert_eq!(Arc::strong_count(&table), 1);
    }

    #[test]
    fn test_compilers_share_one_table() {
        let table = Arc::new(GrammarTable::default_grammar().unwrap());
        let first = Compiler::new(Arc::clone(&table));
        let second = Compiler::new(Arc::clone(&table)).with_registers(AllocatorConfig::new(2));
        assert!(std::ptr::eq(first.table(), second.table()));
        assert_eq!(Arc::strong_count(&table), 3);
        assert!(first.compile("int main(void) { return 1; }").succeeded());
        assert!(second.compile("int main(void) { return 2; }").succeeded());
    }
}
