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

//! Semantic actions run on reductions.
//!
//! Each production is bound to an action by its shape, the left-hand side
//! and the right-hand side symbol names, when the parser is created. A
//! grammar that renumbers or reorders its productions keeps working; a
//! production with an unknown shape just builds a plain node.

use super::helpers::ParserHelpers;
use super::node::{GrammarNode, Lexeme};
use super::symbol_table::{DataType, Function};
use super::Parser;
use crate::error::ErrorCode;
use crate::grammar::{Grammar, Production};
use crate::ir::{
    merge, BackpatchList, Dest, JumpTarget, Opcode, Operand, Quad, Relop, Value,
};

/// What to do when a production is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticAction {
    /// Pop the right-hand side, push a plain node.
    Default,
    /// Pass the only right-hand side value through.
    Forward,
    /// `declare ::= <type> ID M A function_declare`
    FunctionDeclaration(DataType),
    /// `declare ::= int ID var_declare`
    GlobalVariable,
    /// `A ::=`
    EnterScope,
    /// `M ::=`
    Mark,
    /// `N ::=`
    Skip,
    /// `function_declare ::= ( parameter ) sentence_block`
    FunctionBody,
    /// `parameter ::= void`
    NoParameters,
    /// `parameter_list ::= param`
    FirstParameter,
    /// `parameter_list ::= param , parameter_list`
    NextParameter,
    /// `param ::= int ID`
    Parameter,
    /// `sentence_block ::= { inner_declare sentence_list }`
    Block,
    /// `inner_var_declare ::= int ID`
    LocalVariable,
    /// `sentence_list ::= sentence M sentence_list`
    Sequence,
    /// `assign_sentence ::= ID = expression ;`
    Assignment,
    /// `return_sentence ::= return [expression] ;`
    Return { with_value: bool },
    /// `while_sentence ::= while M ( expression ) A sentence_block`
    While,
    /// `if_sentence ::= if ( expression ) A sentence_block`
    If,
    /// `if_sentence ::= if ( expression ) A sentence_block N else M A sentence_block`
    IfElse,
    /// `expression ::= add_expression <relop> add_expression`
    Comparison(Relop),
    /// `add_expression ::= item (+|-) add_expression`, `item ::= factor (*|/) item`
    Arithmetic(Opcode),
    /// `factor ::= NUM`
    Number,
    /// `factor ::= ID`
    Variable,
    /// `factor ::= ( expression )`
    Parenthesized,
    /// `factor ::= ID ( argument_list )`
    Call,
    /// `argument_list ::=`
    NoArguments,
    /// `argument_list ::= expression`
    FirstArgument,
    /// `argument_list ::= expression , argument_list`
    NextArgument,
}

impl SemanticAction {
    /// Bind a production to its action by shape.
    pub fn resolve(grammar: &Grammar, production: &Production) -> SemanticAction {
        use SemanticAction::*;

        let left = grammar.name(production.left);
        let right: Vec<&str> = production
            .right
            .iter()
            .map(|&symbol| grammar.name(symbol))
            .collect();

        match (left, right.as_slice()) {
            ("declare", ["int", "ID", "M", "A", "function_declare"]) => {
                FunctionDeclaration(DataType::Int)
            }
            ("declare", ["void", "ID", "M", "A", "function_declare"]) => {
                FunctionDeclaration(DataType::Void)
            }
            ("declare", ["int", "ID", "var_declare"]) => GlobalVariable,
            ("A", []) => EnterScope,
            ("M", []) => Mark,
            ("N", []) => Skip,
            ("function_declare", ["(", "parameter", ")", "sentence_block"]) => FunctionBody,
            ("parameter", ["parameter_list"]) => Forward,
            ("parameter", ["void"]) => NoParameters,
            ("parameter_list", ["param"]) => FirstParameter,
            ("parameter_list", ["param", ",", "parameter_list"]) => NextParameter,
            ("param", ["int", "ID"]) => Parameter,
            ("sentence_block", ["{", "inner_declare", "sentence_list", "}"]) => Block,
            ("inner_var_declare", ["int", "ID"]) => LocalVariable,
            ("sentence_list", ["sentence", "M", "sentence_list"]) => Sequence,
            ("sentence_list", ["sentence"]) | ("sentence", [_]) => Forward,
            ("assign_sentence", ["ID", "=", "expression", ";"]) => Assignment,
            ("return_sentence", ["return", ";"]) => Return { with_value: false },
            ("return_sentence", ["return", "expression", ";"]) => Return { with_value: true },
            ("while_sentence", ["while", "M", "(", "expression", ")", "A", "sentence_block"]) => {
                While
            }
            ("if_sentence", ["if", "(", "expression", ")", "A", "sentence_block"]) => If,
            (
                "if_sentence",
                ["if", "(", "expression", ")", "A", "sentence_block", "N", "else", "M", "A", "sentence_block"],
            ) => IfElse,
            ("expression", ["add_expression"])
            | ("add_expression", ["item"])
            | ("item", ["factor"]) => Forward,
            ("expression", ["add_expression", operator, "add_expression"]) => {
                Relop::from_symbol(operator).map_or(Default, Comparison)
            }
            ("add_expression", ["item", operator @ ("+" | "-"), "add_expression"])
            | ("item", ["factor", operator @ ("*" | "/"), "item"]) => {
                Opcode::arithmetic(operator).map_or(Default, Arithmetic)
            }
            ("factor", ["NUM"]) => Number,
            ("factor", ["ID"]) => Variable,
            ("factor", ["(", "expression", ")"]) => Parenthesized,
            ("factor", ["ID", "(", "argument_list", ")"]) => Call,
            ("argument_list", []) => NoArguments,
            ("argument_list", ["expression"]) => FirstArgument,
            ("argument_list", ["expression", ",", "argument_list"]) => NextArgument,
            _ => Default,
        }
    }
}

/// The popped right-hand side of a reduction, consumed left to right.
///
/// Missing values read as [`GrammarNode::Plain`].
pub struct Rhs(std::vec::IntoIter<GrammarNode>);

impl Rhs {
    pub fn new(values: Vec<GrammarNode>) -> Self {
        Self(values.into_iter())
    }

    pub fn take(&mut self) -> GrammarNode {
        self.0.next().unwrap_or(GrammarNode::Plain)
    }

    pub fn lexeme(&mut self) -> Lexeme {
        self.take().into_lexeme().unwrap_or_default()
    }

    pub fn skip(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.0.next();
        }
        self
    }
}

/// Trait for the reduction semantics of the C-minus grammar.
pub trait SemanticActions {
    /// Run `action` over the popped right-hand side and return the value
    /// of the left-hand side.
    fn apply(&mut self, action: SemanticAction, rhs: Rhs) -> GrammarNode;

    /// Close a function body: add a `return` if control can fall off its
    /// end and send the pending jumps there.
    fn close_function(&mut self, next: BackpatchList);

    /// The operand of a value node. A comparison used as a value is an error.
    fn value_of(&mut self, node: GrammarNode) -> Operand;

    /// The false list of a condition node. A plain value is an error.
    fn condition_of(&mut self, node: GrammarNode, keyword: &Lexeme) -> BackpatchList;

    /// Declare a variable in the current scope, reporting redeclarations.
    fn declare_variable(&mut self, name: &Lexeme);
}

impl<'t> SemanticActions for Parser<'t> {
    fn apply(&mut self, action: SemanticAction, mut rhs: Rhs) -> GrammarNode {
        match action {
            SemanticAction::Default => GrammarNode::Plain,
            SemanticAction::Forward => rhs.take(),

            SemanticAction::FunctionDeclaration(return_type) => {
                let name = rhs.skip(1).lexeme();
                let entry = rhs.take().mark().unwrap_or_else(|| self.code.next_quad());
                let (params, next) = match rhs.skip(1).take() {
                    GrammarNode::FunctionBody { params, next } => (params, next),
                    _ => (Vec::new(), BackpatchList::new()),
                };
                self.close_function(next);

                let function = Function {
                    name: name.text.clone(),
                    return_type,
                    params,
                    entry,
                };
                log::debug!(
                    "function '{}' at quad {} with {} parameter(s)",
                    function.name,
                    function.entry,
                    function.params.len()
                );
                if self.scopes.declare_function(function).is_err() {
                    self.semantic_error(
                        ErrorCode::FunctionAlreadyDefined,
                        format!("function '{}' is already defined", name.text),
                        &name,
                    );
                }
                GrammarNode::Plain
            }
            SemanticAction::GlobalVariable => {
                let name = rhs.skip(1).lexeme();
                self.declare_variable(&name);
                GrammarNode::Plain
            }
            SemanticAction::EnterScope => {
                self.scopes.enter_scope();
                GrammarNode::Plain
            }
            SemanticAction::Mark => GrammarNode::Mark(self.code.next_quad()),
            SemanticAction::Skip => {
                let jump = self.code.emit(Quad::jump(JumpTarget::Unresolved));
                GrammarNode::Skip(vec![jump])
            }

            SemanticAction::FunctionBody => {
                let params = rhs.skip(1).take().into_parameters();
                let next = rhs.skip(1).take().into_next_list();
                GrammarNode::FunctionBody { params, next }
            }
            SemanticAction::NoParameters => GrammarNode::Parameters(Vec::new()),
            SemanticAction::FirstParameter => GrammarNode::Parameters(vec![DataType::Int]),
            SemanticAction::NextParameter => {
                let mut params = rhs.skip(2).take().into_parameters();
                params.insert(0, DataType::Int);
                GrammarNode::Parameters(params)
            }
            SemanticAction::Parameter => {
                let name = rhs.skip(1).lexeme();
                self.declare_variable(&name);
                self.code.emit(Quad::new(
                    Opcode::Get,
                    Operand::Empty,
                    Operand::Empty,
                    Dest::Value(Value::Var(name.text)),
                ));
                GrammarNode::Plain
            }

            SemanticAction::Block => {
                let next = rhs.skip(2).take().into_next_list();
                self.scopes.leave_scope();
                GrammarNode::Statement { next }
            }
            SemanticAction::LocalVariable => {
                let name = rhs.skip(1).lexeme();
                self.declare_variable(&name);
                GrammarNode::Plain
            }
            SemanticAction::Sequence => {
                let first = rhs.take().into_next_list();
                if let Some(target) = rhs.take().mark() {
                    self.code.backpatch(&first, target);
                }
                GrammarNode::Statement {
                    next: rhs.take().into_next_list(),
                }
            }

            SemanticAction::Assignment => {
                let name = rhs.lexeme();
                let value = rhs.skip(1).take();
                let value = self.value_of(value);
                if self.scopes.lookup_variable(&name.text).is_none() {
                    self.semantic_error(
                        ErrorCode::UndefinedVariable,
                        format!("undeclared variable '{}'", name.text),
                        &name,
                    );
                }
                self.code.emit(Quad::new(
                    Opcode::Assign,
                    value,
                    Operand::Empty,
                    Dest::Value(Value::Var(name.text)),
                ));
                GrammarNode::Statement {
                    next: BackpatchList::new(),
                }
            }
            SemanticAction::Return { with_value } => {
                let value = if with_value {
                    let node = rhs.skip(1).take();
                    self.value_of(node)
                } else {
                    Operand::Empty
                };
                self.code.emit(Quad::new(
                    Opcode::Return,
                    value,
                    Operand::Empty,
                    Dest::Empty,
                ));
                GrammarNode::Statement {
                    next: BackpatchList::new(),
                }
            }
            SemanticAction::While => {
                let keyword = rhs.lexeme();
                let start = rhs.take().mark().unwrap_or(0);
                let condition = rhs.skip(1).take();
                let false_list = self.condition_of(condition, &keyword);
                let body = rhs.skip(2).take().into_next_list();

                self.code.backpatch(&body, start);
                self.code.emit(Quad::jump(JumpTarget::Quad(start)));
                GrammarNode::Statement { next: false_list }
            }
            SemanticAction::If => {
                let keyword = rhs.lexeme();
                let condition = rhs.skip(1).take();
                let false_list = self.condition_of(condition, &keyword);
                let body = rhs.skip(2).take().into_next_list();
                GrammarNode::Statement {
                    next: merge(body, false_list),
                }
            }
            SemanticAction::IfElse => {
                let keyword = rhs.lexeme();
                let condition = rhs.skip(1).take();
                let false_list = self.condition_of(condition, &keyword);
                let then_next = rhs.skip(2).take().into_next_list();
                let skip = rhs.take().into_next_list();
                if let Some(else_start) = rhs.skip(1).take().mark() {
                    self.code.backpatch(&false_list, else_start);
                }
                let else_next = rhs.skip(1).take().into_next_list();
                GrammarNode::Statement {
                    next: merge(merge(then_next, else_next), skip),
                }
            }

            SemanticAction::Comparison(relop) => {
                let left = rhs.take();
                let left = self.value_of(left);
                let operator = rhs.lexeme();
                let right = rhs.take();
                let right = self.value_of(right);
                let jump = self.code.emit(Quad::jump_if(
                    relop.negate(),
                    left,
                    right,
                    JumpTarget::Unresolved,
                ));
                GrammarNode::Condition {
                    false_list: vec![jump],
                    operator,
                }
            }
            SemanticAction::Arithmetic(opcode) => {
                let left = rhs.take();
                let left = self.value_of(left);
                let right = rhs.skip(1).take();
                let right = self.value_of(right);
                let temp = self.code.new_temp();
                self.code
                    .emit(Quad::new(opcode, left, right, Dest::Value(temp.clone())));
                GrammarNode::Value(temp.into())
            }
            SemanticAction::Number => {
                let literal = rhs.lexeme();
                // Out-of-range literals were already reported by the lexer.
                GrammarNode::Value(Operand::Const(literal.text.parse().unwrap_or(0)))
            }
            SemanticAction::Variable => {
                let name = rhs.lexeme();
                if self.scopes.lookup_variable(&name.text).is_none() {
                    self.semantic_error(
                        ErrorCode::UndefinedVariable,
                        format!("undeclared variable '{}'", name.text),
                        &name,
                    );
                }
                GrammarNode::Value(Operand::var(name.text))
            }
            SemanticAction::Parenthesized => rhs.skip(1).take(),
            SemanticAction::Call => {
                let name = rhs.lexeme();
                let arguments = rhs.skip(1).take().into_arguments();

                let Some(function) = self.scopes.lookup_function(&name.text) else {
                    self.semantic_error(
                        ErrorCode::UndefinedFunction,
                        format!("undeclared function '{}'", name.text),
                        &name,
                    );
                    return GrammarNode::Value(Operand::Const(0));
                };
                let expected = function.params.len();
                if expected != arguments.len() {
                    self.semantic_error(
                        ErrorCode::WrongNumberOfArguments,
                        format!(
                            "function '{}' expects {} argument(s), got {}",
                            name.text,
                            expected,
                            arguments.len()
                        ),
                        &name,
                    );
                }

                for argument in arguments {
                    self.code.emit(Quad::new(
                        Opcode::Param,
                        argument,
                        Operand::Empty,
                        Dest::Empty,
                    ));
                }
                self.code.emit(Quad::new(
                    Opcode::Call,
                    Operand::Function(name.text),
                    Operand::Empty,
                    Dest::Empty,
                ));
                let result = self.code.new_temp();
                self.code.emit(Quad::new(
                    Opcode::Assign,
                    Operand::ReturnValue,
                    Operand::Empty,
                    Dest::Value(result.clone()),
                ));
                GrammarNode::Value(result.into())
            }
            SemanticAction::NoArguments => GrammarNode::Arguments(Vec::new()),
            SemanticAction::FirstArgument => {
                let node = rhs.take();
                GrammarNode::Arguments(vec![self.value_of(node)])
            }
            SemanticAction::NextArgument => {
                let node = rhs.take();
                let first = self.value_of(node);
                let mut arguments = rhs.skip(1).take().into_arguments();
                arguments.insert(0, first);
                GrammarNode::Arguments(arguments)
            }
        }
    }

    fn close_function(&mut self, next: BackpatchList) {
        let ends_in_return = self
            .code
            .last()
            .is_some_and(|quad| quad.op == Opcode::Return);
        if next.is_empty() && ends_in_return {
            return;
        }

        let target = self.code.emit(Quad::new(
            Opcode::Return,
            Operand::Empty,
            Operand::Empty,
            Dest::Empty,
        ));
        self.code.backpatch(&next, target);
    }

    fn value_of(&mut self, node: GrammarNode) -> Operand {
        match node {
            GrammarNode::Value(operand) => operand,
            GrammarNode::Condition { operator, .. } => {
                self.semantic_error(
                    ErrorCode::ComparisonAsValue,
                    format!("comparison '{}' cannot be used as a value", operator.text),
                    &operator,
                );
                Operand::Const(0)
            }
            _ => Operand::Empty,
        }
    }

    fn condition_of(&mut self, node: GrammarNode, keyword: &Lexeme) -> BackpatchList {
        match node {
            GrammarNode::Condition { false_list, .. } => false_list,
            _ => {
                let error = self
                    .error_at(
                        ErrorCode::ConditionNotRelational,
                        format!("the condition of '{}' must be a comparison", keyword.text),
                        keyword,
                    )
                    .with_hint("compare the value explicitly, for example `x != 0`");
                self.errors.push(error);
                BackpatchList::new()
            }
        }
    }

    fn declare_variable(&mut self, name: &Lexeme) {
        if let Err(existing) = self.scopes.declare_variable(&name.text, DataType::Int) {
            self.semantic_error(
                ErrorCode::VariableAlreadyDefined,
                format!(
                    "variable '{}' is already declared in this scope (level {})",
                    name.text, existing.level
                ),
                name,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarTable;

    fn resolved(table: &GrammarTable, text: &str) -> SemanticAction {
        let grammar = table.grammar();
        let production = grammar
            .productions()
            .iter()
            .find(|p| grammar.production_text(p.id) == text)
            .unwrap();
        SemanticAction::resolve(grammar, production)
    }

    #[test]
    fn test_resolution_by_shape() {
        let table = GrammarTable::default_grammar().unwrap();
        assert_eq!(resolved(&table, "M ->"), SemanticAction::Mark);
        assert_eq!(
            resolved(&table, "expression -> add_expression >= add_expression"),
            SemanticAction::Comparison(Relop::Ge)
        );
        assert_eq!(
            resolved(&table, "item -> factor / item"),
            SemanticAction::Arithmetic(Opcode::Div)
        );
        assert_eq!(
            resolved(&table, "declare -> void ID M A function_declare"),
            SemanticAction::FunctionDeclaration(DataType::Void)
        );
        assert_eq!(resolved(&table, "declare_list -> declare"), SemanticAction::Default);
    }

    #[test]
    fn test_resolution_ignores_production_order() {
        let table = GrammarTable::build(
            "program ::= N declare_list\n\
             M ::=\n\
             N ::=\n\
             declare_list ::= declare\n\
             declare ::= int ID var_declare\n\
             var_declare ::= ;\n",
        )
        .unwrap();
        assert_eq!(resolved(&table, "N ->"), SemanticAction::Skip);
        assert_eq!(resolved(&table, "M ->"), SemanticAction::Mark);
        assert_eq!(
            resolved(&table, "declare -> int ID var_declare"),
            SemanticAction::GlobalVariable
        );
    }

    #[test]
    fn test_rhs_reads_missing_values_as_plain() {
        let mut rhs = Rhs::new(vec![GrammarNode::Mark(2)]);
        assert_eq!(rhs.take(), GrammarNode::Mark(2));
        assert_eq!(rhs.take(), GrammarNode::Plain);
        assert_eq!(rhs.lexeme(), Lexeme::default());
    }
}
