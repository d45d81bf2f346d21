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


//! Negative tests for the cminus compiler.
//!
//! Every program here must be rejected, with the expected error code and
//! without producing assembly.

use cminus::compiler::Compiler;
use cminus::{lexer, CompilerState, ErrorCode, Errors};
use test_case::test_case;

fn diagnostics_of(source: &str) -> Errors {
    let compiler = Compiler::with_default_grammar().unwrap();
    let compilation = compiler.compile(source);
    assert_eq!(compilation.state(), CompilerState::Error, "accepted:\n{}", source);
    assert!(compilation.assembly().is_none());
    compilation.diagnostics().clone()
}

// ============================================================================
// Lexical Errors
// ============================================================================

#[test_case("int main(void) { return @; }", ErrorCode::InvalidCharacter; "at_sign")]
#[test_case("int main(void) { return $; }", ErrorCode::InvalidCharacter; "dollar")]
#[test_case("int main(void) { int a_b; return 0; }", ErrorCode::InvalidCharacter; "underscore")]
#[test_case("int main(void) { return 0; } /* open", ErrorCode::UnterminatedComment; "open_comment")]
#[test_case("int main(void) { return 2147483648; }", ErrorCode::IntegerTooLarge; "integer_overflow")]
fn test_lexical_errors(source: &str, expected: ErrorCode) {
    let errors = lexer::tokenize(source).unwrap_err();
    assert!(errors.contains(expected), "{:?}", errors);

    // The pipeline stops before parsing, so only lexical errors are reported.
    let diagnostics = diagnostics_of(source);
    assert!(diagnostics.iter().all(|e| e.code == expected));
}

#[test]
fn test_lexical_errors_are_all_reported() {
    let errors = diagnostics_of("int main(void) {\n  int x; x = @;\n  return #;\n}");
    assert_eq!(errors.len(), 2);
    let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![2, 3]);
}

#[test]
fn test_largest_integer_is_accepted() {
    assert!(lexer::tokenize("x = 2147483647;").is_ok());
}

// ============================================================================
// Syntax Errors
// ============================================================================

#[test_case("int main(void) { return 1 }", ErrorCode::UnexpectedToken; "missing_semicolon")]
#[test_case("int main(void) { }", ErrorCode::UnexpectedToken; "empty_body")]
#[test_case("int main(void) { int x; x = ; return x; }", ErrorCode::UnexpectedToken; "missing_operand")]
#[test_case("int main(void) { int x; x = (1 + 2; return x; }", ErrorCode::UnexpectedToken; "unbalanced_paren")]
#[test_case("int main(void) { int x; x = 1; int y; return x; }", ErrorCode::UnexpectedToken; "declaration_after_statement")]
#[test_case("main(void) { return 0; }", ErrorCode::UnexpectedToken; "missing_return_type")]
#[test_case("int main(void) { return 0;", ErrorCode::UnexpectedEndOfFile; "missing_brace")]
#[test_case("", ErrorCode::UnexpectedEndOfFile; "empty_source")]
fn test_syntax_errors(source: &str, expected: ErrorCode) {
    let errors = diagnostics_of(source);
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert_eq!(errors.first().unwrap().code, expected);
}

#[test]
fn test_syntax_error_names_the_token() {
    let errors = diagnostics_of("int main(void) {\n  return 1\n}");
    let error = errors.first().unwrap();
    assert_eq!(error.line, 3);
    assert!(error.message.contains('}'), "{}", error.message);
}

// ============================================================================
// Semantic Errors
// ============================================================================

#[test_case("int main(void) { return x; }", ErrorCode::UndefinedVariable; "undefined_variable")]
#[test_case("int main(void) { int x; int x; x = 1; return x; }", ErrorCode::VariableAlreadyDefined; "duplicate_local")]
#[test_case("int f(int a, int a) { return a; } int main(void) { return 0; }", ErrorCode::VariableAlreadyDefined; "duplicate_parameter")]
#[test_case("int main(void) { return g(1); }", ErrorCode::UndefinedFunction; "undefined_function")]
#[test_case("int f(int n) { return f(n); } int main(void) { return 0; }", ErrorCode::UndefinedFunction; "recursion")]
#[test_case("int f(void) { return 1; } int f(void) { return 2; } int main(void) { return 0; }", ErrorCode::FunctionAlreadyDefined; "duplicate_function")]
#[test_case("int f(int a) { return a; } int main(void) { return f(); }", ErrorCode::WrongNumberOfArguments; "too_few_arguments")]
#[test_case("int f(void) { return 1; } int main(void) { return f(1); }", ErrorCode::WrongNumberOfArguments; "too_many_arguments")]
#[test_case("int f(void) { return 1; }", ErrorCode::MissingMainFunction; "missing_main")]
#[test_case("int main(void) { int x; x = 1; if (x) { x = 2; } return x; }", ErrorCode::ConditionNotRelational; "if_without_relop")]
#[test_case("int main(void) { int x; x = 1; while (x + 1) { x = 2; } return x; }", ErrorCode::ConditionNotRelational; "while_without_relop")]
#[test_case("int main(void) { int x; int a; int b; a = 1; b = 2; x = a < b; return x; }", ErrorCode::ComparisonAsValue; "comparison_assigned")]
fn test_semantic_errors(source: &str, expected: ErrorCode) {
    let errors = diagnostics_of(source);
    assert!(errors.contains(expected), "{:?}", errors);
}

#[test]
fn test_semantic_errors_do_not_stop_parsing() {
    let errors = diagnostics_of(
        "int main(void) {\n  x = 1;\n  y = 2;\n  return z;\n}",
    );
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e.code == ErrorCode::UndefinedVariable));
}

#[test]
fn test_nested_block_may_shadow() {
    let compiler = Compiler::with_default_grammar().unwrap();
    let compilation = compiler.compile(
        "int main(void) { int x; x = 1; if (x > 0) { int x; x = 2; } return x; }",
    );
    assert!(compilation.succeeded(), "{}", compilation.diagnostics_text());
}

// ============================================================================
// Register Allocation Errors
// ============================================================================

#[test]
fn test_global_read_has_no_storage() {
    let errors = diagnostics_of("int g;\nint main(void) { return g; }");
    assert_eq!(errors.len(), 1);
    let error = errors.first().unwrap();
    assert_eq!(error.code, ErrorCode::VariableUsedBeforeInit);
    assert!(error.message.contains('g'));
}

#[test]
fn test_local_read_before_assignment() {
    let errors = diagnostics_of("int main(void) { int x; int y; y = x + 1; return y; }");
    assert!(errors.contains(ErrorCode::VariableUsedBeforeInit));
}

#[test]
fn test_errors_in_several_functions_are_collected() {
    let errors = diagnostics_of(
        "int f(void) { int a; return a; }\nint main(void) { int b; return b; }",
    );
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.code == ErrorCode::VariableUsedBeforeInit));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_rendered_diagnostics_carry_codes() {
    let compiler = Compiler::with_default_grammar().unwrap();
    let compilation = compiler
        .compile("int main(void) { return x; }")
        .with_filename("broken.c");
    let text = compilation.diagnostics_text();
    assert!(text.contains("E200"), "{}", text);
    assert!(text.contains("broken.c"), "{}", text);
}
