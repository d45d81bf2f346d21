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

//! Semantic values carried on the parse stack.

use super::symbol_table::DataType;
use crate::error::Span;
use crate::ir::{BackpatchList, Operand};
use crate::lexer::Token;

/// The text and position of a shifted terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexeme {
    pub text: String,
    pub line: usize,
    pub span: Span,
}

impl From<&Token> for Lexeme {
    fn from(token: &Token) -> Self {
        Self {
            text: token.text.clone(),
            line: token.line,
            span: token.span,
        }
    }
}

/// A value on the parse stack, one per grammar symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarNode {
    /// A shifted terminal.
    Terminal(Lexeme),
    /// A non-terminal without semantic payload.
    Plain,
    /// `M ::=`: the quadruple index at this point.
    Mark(usize),
    /// `N ::=`: the jump emitted at this point.
    Skip(BackpatchList),
    /// A parameter type list.
    Parameters(Vec<DataType>),
    /// A function's parameters and the jumps still leaving its body.
    FunctionBody {
        params: Vec<DataType>,
        next: BackpatchList,
    },
    /// A statement (or block, or list) and the jumps leaving it.
    Statement { next: BackpatchList },
    /// An arithmetic value.
    Value(Operand),
    /// A comparison: the jumps taken when it is false.
    Condition {
        false_list: BackpatchList,
        operator: Lexeme,
    },
    /// Call arguments in source order.
    Arguments(Vec<Operand>),
}

impl GrammarNode {
    /// The lexeme of a terminal node.
    pub fn into_lexeme(self) -> Option<Lexeme> {
        match self {
            GrammarNode::Terminal(lexeme) => Some(lexeme),
            _ => None,
        }
    }

    /// The pending jumps of a statement-like node; empty for anything else.
    pub fn into_next_list(self) -> BackpatchList {
        match self {
            GrammarNode::Statement { next } | GrammarNode::Skip(next) => next,
            GrammarNode::FunctionBody { next, .. } => next,
            _ => BackpatchList::new(),
        }
    }

    /// The quadruple index of a mark, if this is one.
    pub fn mark(&self) -> Option<usize> {
        match self {
            GrammarNode::Mark(quad) => Some(*quad),
            _ => None,
        }
    }

    /// The parameter types of a parameter-carrying node.
    pub fn into_parameters(self) -> Vec<DataType> {
        match self {
            GrammarNode::Parameters(params) | GrammarNode::FunctionBody { params, .. } => params,
            _ => Vec::new(),
        }
    }

    pub fn into_arguments(self) -> Vec<Operand> {
        match self {
            GrammarNode::Arguments(arguments) => arguments,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_extraction() {
        assert_eq!(GrammarNode::Mark(3).mark(), Some(3));
        assert_eq!(GrammarNode::Plain.mark(), None);
        assert_eq!(
            GrammarNode::Statement { next: vec![1, 2] }.into_next_list(),
            vec![1, 2]
        );
        assert!(GrammarNode::Value(Operand::Const(1)).into_next_list().is_empty());
        assert!(GrammarNode::Plain.into_lexeme().is_none());
    }
}
