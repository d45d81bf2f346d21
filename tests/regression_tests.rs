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


//! Regression tests for register allocation.
//!
//! Each program once produced wrong code for some size of the register
//! file, so every one runs with all sizes from 2 to 8.

mod common;

use common::compile_and_run;
use test_case::test_case;

/// Three computed arguments: earlier ones must survive spills while the
/// later ones are evaluated.
const ARGUMENT_PRESSURE: &str = "int f(int x, int y, int z) {
    return x * 100 + y * 10 + z;
}
int main(void) {
    int a;
    int b;
    int c;
    int d;
    a = 1;
    b = 2;
    c = 3;
    d = 4;
    return f(a + b, c * d, a - d);
}";

/// `x = y` shares a register; redefining `y` must not change `x`.
const COPY_THEN_REDEFINE: &str = "int main(void) {
    int x;
    int y;
    y = 5;
    x = y;
    y = y + 1;
    return x * 10 + y;
}";

/// A temporary computed before a call is used after it.
const TEMPORARY_ACROSS_CALL: &str = "int f(int n) {
    return n + 1;
}
int main(void) {
    int a;
    int b;
    int x;
    a = 3;
    b = 4;
    x = (a + b) * f(2);
    return x;
}";

/// The callee writes its parameter slot, not the caller's variable.
const CALLER_VALUE_SURVIVES: &str = "int g(int a) {
    a = a * 2;
    return a;
}
int main(void) {
    int x;
    int y;
    x = 7;
    y = g(x);
    return x + y;
}";

const CALLS_IN_SEQUENCE: &str = "int f(int n) {
    return n + 1;
}
int main(void) {
    int x;
    int y;
    x = f(1);
    y = f(2);
    return x * 10 + y;
}";

const NESTED_CALL_ARGUMENT: &str = "int f(int n) {
    return n + 1;
}
int g(int a, int b) {
    return a - b;
}
int main(void) {
    int x;
    x = 10;
    return g(x, f(f(1)));
}";

/// `100 / 5 / 2` groups to the right.
const RIGHT_GROUPED_DIVISION: &str = "int main(void) {
    return 100 / 5 / 2;
}";

/// Six variables live around a loop.
const ROTATING_LOOP: &str = "int main(void) {
    int a;
    int b;
    int c;
    int d;
    int e;
    int i;
    a = 1;
    b = 2;
    c = 3;
    d = 4;
    e = 5;
    i = 0;
    while (i < 3) {
        a = a + b;
        b = b + c;
        c = c + d;
        d = d + e;
        e = e + a;
        i = i + 1;
    }
    return a + b + c + d + e;
}";

const OVERWRITTEN_BEFORE_READ: &str = "int main(void) {
    int x;
    x = 1;
    x = 2;
    return x;
}";

/// Assigned on both branches, so never read uninitialized.
const ASSIGNED_ON_BOTH_BRANCHES: &str = "int main(void) {
    int x;
    int c;
    c = 0;
    if (c > 0) {
        x = 1;
    } else {
        x = 2;
    }
    return x;
}";

const SELF_ASSIGNMENT: &str = "int main(void) {
    int x;
    x = 3;
    x = x;
    return x;
}";

/// Both sources name the same variable.
const SAME_OPERAND_TWICE: &str = "int main(void) {
    int x;
    int y;
    x = 6;
    y = x * x - x;
    return y;
}";

#[test_case(ARGUMENT_PRESSURE, 417; "argument_pressure")]
#[test_case(COPY_THEN_REDEFINE, 56; "copy_then_redefine")]
#[test_case(TEMPORARY_ACROSS_CALL, 21; "temporary_across_call")]
#[test_case(CALLER_VALUE_SURVIVES, 21; "caller_value_survives")]
#[test_case(CALLS_IN_SEQUENCE, 23; "calls_in_sequence")]
#[test_case(NESTED_CALL_ARGUMENT, 7; "nested_call_argument")]
#[test_case(RIGHT_GROUPED_DIVISION, 50; "right_grouped_division")]
#[test_case(ROTATING_LOOP, 150; "rotating_loop")]
#[test_case(OVERWRITTEN_BEFORE_READ, 2; "overwritten_before_read")]
#[test_case(ASSIGNED_ON_BOTH_BRANCHES, 2; "assigned_on_both_branches")]
#[test_case(SELF_ASSIGNMENT, 3; "self_assignment")]
#[test_case(SAME_OPERAND_TWICE, 30; "same_operand_twice")]
fn test_regression(source: &str, expected: i32) {
    for registers in 2..=8 {
        assert_eq!(
            compile_and_run(source, registers),
            expected,
            "{} registers",
            registers
        );
    }
}
