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


//! The compilation pipeline.
//!
//! A [`Compiler`] owns a parse table and the code generator settings and is
//! reused for any number of sources. Each source gets its own
//! [`Compilation`], which runs the stages one at a time:
//!
//! 1. lexical analysis (tokens)
//! 2. syntax analysis (parse trace and intermediate code)
//! 3. object code generation (blocks, liveness, assembly)
//!
//! Every stage checks the diagnostics gathered so far and does nothing if
//! an earlier stage failed. Artifacts of the stages that ran stay available.

use std::path::Path;
use std::sync::Arc;

use crate::blocks::ProgramBlocks;
use crate::codegen::{self, AllocatorConfig, Assembly};
use crate::error::{Errors, GrammarError};
use crate::grammar::GrammarTable;
use crate::lexer::{self, token_listing, Token};
use crate::liveness::ProgramLiveness;
use crate::parser::{ParseOutput, Parser};

/// The stage a compilation is in.
///
/// A stage name means that stage ran last and succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerState {
    Wait,
    LexicalAnalysis,
    SyntaxAnalysis,
    ObjectCodeGeneration,
    Finish,
    Error,
}

/// A reusable compiler: parse table plus settings.
#[derive(Debug, Clone)]
pub struct Compiler {
    table: Arc<GrammarTable>,
    registers: AllocatorConfig,
    trace: bool,
}

impl Compiler {
    /// Create a compiler over `table`. Pass an `Arc` to share one table
    /// between several compilers.
    pub fn new(table: impl Into<Arc<GrammarTable>>) -> Self {
        Self {
            table: table.into(),
            registers: AllocatorConfig::default(),
            trace: false,
        }
    }

    /// Build the parse table from a grammar file.
    pub fn from_grammar_file(path: &Path) -> Result<Self, GrammarError> {
        GrammarTable::from_file(path).map(Self::new)
    }

    /// Use the bundled C-minus grammar.
    pub fn with_default_grammar() -> Result<Self, GrammarError> {
        GrammarTable::default_grammar().map(Self::new)
    }

    /// Set the register file used by the code generator.
    pub fn with_registers(mut self, registers: AllocatorConfig) -> Self {
        self.registers = registers;
        self
    }

    /// Record the parser's stack at every step.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn table(&self) -> &GrammarTable {
        &self.table
    }

    pub fn registers(&self) -> AllocatorConfig {
        self.registers
    }

    /// Start a compilation of `source` without running any stage.
    pub fn compilation(&self, source: impl Into<String>) -> Compilation<'_> {
        Compilation {
            compiler: self,
            source: source.into(),
            filename: None,
            state: CompilerState::Wait,
            diagnostics: Errors::new(),
            tokens: None,
            parse: None,
            blocks: None,
            liveness: None,
            assembly: None,
        }
    }

    /// Run every stage on `source`.
    pub fn compile(&self, source: impl Into<String>) -> Compilation<'_> {
        let mut compilation = self.compilation(source);
        compilation.run();
        compilation
    }
}

/// One source file going through the pipeline.
#[derive(Debug)]
pub struct Compilation<'c> {
    compiler: &'c Compiler,
    source: String,
    filename: Option<String>,
    state: CompilerState,
    diagnostics: Errors,
    tokens: Option<Vec<Token>>,
    parse: Option<ParseOutput>,
    blocks: Option<ProgramBlocks>,
    liveness: Option<ProgramLiveness>,
    assembly: Option<Assembly>,
}

impl<'c> Compilation<'c> {
    /// Name the source in rendered diagnostics.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Run all remaining stages.
    pub fn run(&mut self) -> CompilerState {
        self.object_code_generation()
    }

    /// Tokenize the source. Every lexical error is collected.
    pub fn lexical_analysis(&mut self) -> CompilerState {
        if self.tokens.is_some() || self.halted() {
            return self.state;
        }

        let (tokens, errors) = lexer::scan(&self.source);
        log::debug!("lexical analysis: {} token(s), {} error(s)", tokens.len(), errors.len());
        self.tokens = Some(tokens);
        self.finish_stage(CompilerState::LexicalAnalysis, errors)
    }

    /// Parse the tokens and generate intermediate code.
    pub fn syntax_analysis(&mut self) -> CompilerState {
        self.lexical_analysis();
        if self.parse.is_some() || self.halted() {
            return self.state;
        }
        let Some(tokens) = self.tokens.as_deref() else {
            return self.state;
        };

        let (output, errors) = Parser::new(&self.compiler.table)
            .with_trace(self.compiler.trace)
            .parse(tokens);
        log::debug!(
            "syntax analysis: {} quadruple(s), {} function(s)",
            output.code.len(),
            output.functions.len()
        );
        self.parse = Some(output);
        self.finish_stage(CompilerState::SyntaxAnalysis, errors)
    }

    /// Build blocks, solve liveness and emit assembly.
    pub fn object_code_generation(&mut self) -> CompilerState {
        self.syntax_analysis();
        if self.assembly.is_some() || self.halted() {
            return self.state;
        }
        let Some(parse) = self.parse.as_ref() else {
            return self.state;
        };

        self.state = CompilerState::ObjectCodeGeneration;
        let blocks = ProgramBlocks::build(parse.code.quads(), &parse.functions);
        let liveness = ProgramLiveness::analyze(&blocks);
        let result = codegen::generate(&liveness, self.compiler.registers);
        self.blocks = Some(blocks);
        self.liveness = Some(liveness);

        match result {
            Ok(assembly) => {
                log::debug!("object code generation: {} line(s)", assembly.len());
                self.assembly = Some(assembly);
                self.finish_stage(CompilerState::Finish, Errors::new())
            }
            Err(errors) => self.finish_stage(CompilerState::Finish, errors),
        }
    }

    fn halted(&self) -> bool {
        self.state == CompilerState::Error
    }

    fn finish_stage(&mut self, reached: CompilerState, errors: Errors) -> CompilerState {
        if errors.has_errors() {
            self.diagnostics.extend(errors.into_vec());
            self.state = CompilerState::Error;
        } else {
            self.state = reached;
        }
        self.state
    }

    pub fn state(&self) -> CompilerState {
        self.state
    }

    pub fn compiler(&self) -> &'c Compiler {
        self.compiler
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether every stage ran without errors.
    pub fn succeeded(&self) -> bool {
        self.state == CompilerState::Finish
    }

    pub fn diagnostics(&self) -> &Errors {
        &self.diagnostics
    }

    /// All diagnostics rendered with source context.
    pub fn diagnostics_text(&self) -> String {
        self.diagnostics.render(&self.source, self.filename.as_deref())
    }

    pub fn tokens(&self) -> Option<&[Token]> {
        self.tokens.as_deref()
    }

    pub fn parse_output(&self) -> Option<&ParseOutput> {
        self.parse.as_ref()
    }

    pub fn assembly(&self) -> Option<&Assembly> {
        self.assembly.as_ref()
    }

    pub fn token_listing(&self) -> Option<String> {
        self.tokens.as_deref().map(token_listing)
    }

    pub fn ir_listing(&self) -> Option<String> {
        self.parse.as_ref().map(|parse| parse.code.listing())
    }

    /// The parser's stack per step; empty unless tracing was enabled.
    pub fn parse_trace(&self) -> Option<String> {
        self.parse.as_ref().map(ParseOutput::trace_listing)
    }

    pub fn block_listing(&self) -> Option<String> {
        self.blocks.as_ref().map(ProgramBlocks::listing)
    }

    pub fn annotated_listing(&self) -> Option<String> {
        self.liveness.as_ref().map(ProgramLiveness::listing)
    }

    pub fn assembly_listing(&self) -> Option<String> {
        self.assembly.as_ref().map(Assembly::listing)
    }
}
