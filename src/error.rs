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

//! Error types for the cminus compiler.
//!
//! This module defines all error types used throughout the compiler:
//! - [`GrammarError`] for failures while building the parse table
//! - [`CompileError`] for lexical, syntax, semantic and register
//!   allocation errors of a single compilation
//! - [`Errors`], the per-compilation diagnostic collector

use std::fmt;
use std::path::PathBuf;

use ariadne::{CharSet, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    RegisterAllocation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Semantic => "semantic error",
            ErrorKind::RegisterAllocation => "register allocation error",
        };
        f.write_str(name)
    }
}

/// Error codes for the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexical errors (E001-E010)
    InvalidCharacter,
    UnterminatedComment,
    IntegerTooLarge,

    // Syntax errors (E100-E101)
    UnexpectedToken,
    UnexpectedEndOfFile,

    // Semantic errors (E200-E231)
    UndefinedVariable,
    VariableAlreadyDefined,
    UndefinedFunction,
    FunctionAlreadyDefined,
    WrongNumberOfArguments,
    MissingMainFunction,
    ConditionNotRelational,
    ComparisonAsValue,

    // Register allocation errors (E300-E301)
    VariableUsedBeforeInit,
    FrameTooLarge,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::UnterminatedComment => "E002",
            ErrorCode::IntegerTooLarge => "E003",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfFile => "E101",

            // Semantic errors
            ErrorCode::UndefinedVariable => "E200",
            ErrorCode::VariableAlreadyDefined => "E201",
            ErrorCode::UndefinedFunction => "E220",
            ErrorCode::FunctionAlreadyDefined => "E221",
            ErrorCode::WrongNumberOfArguments => "E222",
            ErrorCode::MissingMainFunction => "E223",
            ErrorCode::ConditionNotRelational => "E230",
            ErrorCode::ComparisonAsValue => "E231",

            // Register allocation errors
            ErrorCode::VariableUsedBeforeInit => "E300",
            ErrorCode::FrameTooLarge => "E301",
        }
    }

    /// Get the stage category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::InvalidCharacter
            | ErrorCode::UnterminatedComment
            | ErrorCode::IntegerTooLarge => ErrorKind::Lexical,
            ErrorCode::UnexpectedToken | ErrorCode::UnexpectedEndOfFile => ErrorKind::Syntax,
            ErrorCode::VariableUsedBeforeInit | ErrorCode::FrameTooLarge => {
                ErrorKind::RegisterAllocation
            }
            _ => ErrorKind::Semantic,
        }
    }
}

/// A compiler error with source location.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Source line (1-indexed), 0 if the error has no source position.
    pub line: usize,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            line: 0,
            hint: None,
        }
    }

    /// Attach the source line this error was found on.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the stage category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// The two colliding entries of a parse table conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::ShiftReduce => f.write_str("shift/reduce"),
            ConflictKind::ReduceReduce => f.write_str("reduce/reduce"),
        }
    }
}

/// Errors raised while building a parse table from a grammar.
///
/// All of them are fatal: no partial table is ever handed out.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("line {line}: malformed production `{text}` ({reason})")]
    MalformedProduction {
        line: usize,
        text: String,
        reason: &'static str,
    },

    #[error("grammar contains no productions")]
    EmptyGrammar,

    #[error("non-terminal `{symbol}` has no productions")]
    UndefinedSymbol { symbol: String },

    #[error("{kind} conflict in state {state} on `{symbol}`: {existing} vs. {incoming}")]
    Conflict {
        kind: ConflictKind,
        state: usize,
        symbol: String,
        existing: String,
        incoming: String,
    },

    #[error("cannot read grammar file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GrammarError {
    /// Get a hint on how to fix the grammar, if one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            GrammarError::Conflict {
                kind: ConflictKind::ReduceReduce,
                ..
            } => Some("FOLLOW sets cannot separate the reductions; the grammar probably needs LR(1) lookaheads"),
            GrammarError::Conflict { .. } => Some("the grammar is ambiguous for a FOLLOW-based table"),
            _ => None,
        }
    }
}

/// Format an error with source context.
///
/// The report is rendered without colors so it can be stored as a text
/// artifact. Errors without a source position are rendered as one line.
pub fn format_error(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let filename = filename.unwrap_or("<input>");

    if error.span.is_empty() && error.line == 0 {
        let mut output = format!("error[{}]: {}\n", error.code_str(), error.message);
        if let Some(hint) = &error.hint {
            output.push_str(&format!("  = hint: {}\n", hint));
        }
        return output;
    }

    // ariadne counts characters, spans count bytes
    let start = char_offset(source, error.span.start);
    let end = char_offset(source, error.span.end).max(start + 1);

    let mut builder = Report::build(ReportKind::Error, filename, start)
        .with_config(
            Config::default()
                .with_color(false)
                .with_char_set(CharSet::Ascii),
        )
        .with_code(error.code_str())
        .with_message(format!("{}: {}", error.kind(), error.message))
        .with_label(Label::new((filename, start..end)).with_message(&error.message));
    if let Some(hint) = &error.hint {
        builder = builder.with_help(hint);
    }

    let mut buffer = Vec::new();
    match builder
        .finish()
        .write((filename, Source::from(source.to_string())), &mut buffer)
    {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => format!(
            "error[{}]: {} (line {})\n",
            error.code_str(),
            error.message,
            error.line
        ),
    }
}

fn char_offset(source: &str, byte_offset: usize) -> usize {
    let mut offset = byte_offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    source[..offset].chars().count()
}

/// A collection of compile errors.
#[derive(Debug, Clone, Default)]
pub struct Errors {
    errors: Vec<CompileError>,
}

impl Errors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the first recorded error.
    pub fn first(&self) -> Option<&CompileError> {
        self.errors.first()
    }

    /// Get an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter()
    }

    /// Check if an error with the given code was recorded.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Render every error with source context, in recording order.
    pub fn render(&self, source: &str, filename: Option<&str>) -> String {
        self.errors
            .iter()
            .map(|e| format_error(e, source, filename))
            .collect()
    }

    /// Convert into a vector of errors.
    pub fn into_vec(self) -> Vec<CompileError> {
        self.errors
    }
}

impl Extend<CompileError> for Errors {
    fn extend<T: IntoIterator<Item = CompileError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl From<CompileError> for Errors {
    fn from(error: CompileError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for Errors {
    type Item = CompileError;
    type IntoIter = std::vec::IntoIter<CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
