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


//! Snapshot tests for the cminus compiler.
//!
//! These tests use the `insta` crate to pin the listings every stage of
//! the pipeline produces for a few small programs.

use cminus::compiler::{Compilation, Compiler};
use cminus::AllocatorConfig;

const WHILE_LOOP: &str = "int main(void) { int i; i = 0; while (i < 10) { i = i + 1; } return i; }";

const PRECEDENCE: &str = "int main(void) { int x; x = 1 + 2 * 3; return x; }";

fn compiled(compiler: &Compiler, source: &str) -> String {
    let compilation: Compilation<'_> = compiler.compile(source);
    assert!(compilation.succeeded(), "{}", compilation.diagnostics_text());
    compilation.assembly_listing().unwrap()
}

fn compiler() -> Compiler {
    Compiler::with_default_grammar().unwrap()
}

// ============================================================================
// Front End
// ============================================================================

#[test]
fn test_token_listing_snapshot() {
    let compiler = compiler();
    let compilation = compiler.compile("int main(void) { return 0; }");
    insta::assert_snapshot!(compilation.token_listing().unwrap(), @r"
    INT  int
    ID  main
    LPAREN  (
    VOID  void
    RPAREN  )
    LBRACE  {
    RETURN  return
    NUM  0
    SEMI  ;
    RBRACE  }
    ENDFILE  #
    ");
}

#[test]
fn test_ir_snapshot_while_loop() {
    let compiler = compiler();
    let compilation = compiler.compile(WHILE_LOOP);
    let listing = compilation.ir_listing().unwrap();
    let ir: Vec<&str> = listing.lines().map(str::trim_start).collect();
    insta::assert_snapshot!(ir.join("\n"), @r"
    0 (j,_,_,1)
    1 (=,0,_,i)
    2 (j>=,i,10,6)
    3 (+,i,1,T0)
    4 (=,T0,_,i)
    5 (j,_,_,2)
    6 (return,i,_,_)
    ");
}

// ============================================================================
// Blocks and Liveness
// ============================================================================

#[test]
fn test_block_snapshot_while_loop() {
    let compiler = compiler();
    let compilation = compiler.compile(WHILE_LOOP);
    insta::assert_snapshot!(compilation.block_listing().unwrap(), @r"
    [main]
    main:
        (=,0,_,i)
        next1 = 1
        next2 = -1
    Label0:
        (j>=,i,10,Label2)
        next1 = 2
        next2 = 3
    Label1:
        (+,i,1,T0)
        (=,T0,_,i)
        (j,_,_,Label0)
        next1 = 1
        next2 = -1
    Label2:
        (return,i,_,_)
        next1 = -1
        next2 = -1
    ");
}

#[test]
fn test_liveness_snapshot_while_loop() {
    let compiler = compiler();
    let compilation = compiler.compile(WHILE_LOOP);
    insta::assert_snapshot!(compilation.annotated_listing().unwrap(), @r"
    [main]
    main:
        in  = {}
        out = {i}
        (=,0,_,i)(^,^)(^,^)(^,y)
        next1 = 1
        next2 = -1
    Label0:
        in  = {i}
        out = {i}
        (j>=,i,10,Label2)(^,y)(^,^)(^,^)
        next1 = 2
        next2 = 3
    Label1:
        in  = {i}
        out = {i}
        (+,i,1,T0)(^,^)(^,^)(1,y)
        (=,T0,_,i)(^,^)(^,^)(^,y)
        (j,_,_,Label0)(^,^)(^,^)(^,^)
        next1 = 1
        next2 = -1
    Label2:
        in  = {i}
        out = {}
        (return,i,_,_)(^,^)(^,^)(^,^)
        next1 = -1
        next2 = -1
    ");
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_asm_snapshot_while_loop() {
    insta::assert_snapshot!(compiled(&compiler(), WHILE_LOOP), @r"
    lui $sp,0x1001
    j main
    main:
    addi $s0 $zero 0
    sw $s0 8($sp)
    Label0:
    lw $s0 8($sp)
    addi $s1 $zero 10
    bge $s0 $s1 Label2
    Label1:
    lw $s0 8($sp)
    addi $s1 $zero 1
    add $s0 $s0 $s1
    sw $s0 8($sp)
    j Label0
    Label2:
    lw $v0 8($sp)
    j end
    end:
    ");
}

#[test]
fn test_asm_snapshot_precedence() {
    insta::assert_snapshot!(compiled(&compiler(), PRECEDENCE), @r"
    lui $sp,0x1001
    j main
    main:
    addi $s0 $zero 2
    addi $s1 $zero 3
    mul $s0 $s0 $s1
    addi $s1 $zero 1
    add $s1 $s1 $s0
    add $v0 $zero $s1
    j end
    end:
    ");
}

#[test]
fn test_asm_snapshot_two_registers() {
    let compiler = compiler().with_registers(AllocatorConfig::new(2));
    insta::assert_snapshot!(
        compiled(&compiler, "int main(void) { int a; int b; int c; a = 1; b = 2; c = 3; return a + b + c; }"),
        @r"
    lui $sp,0x1001
    j main
    main:
    addi $s0 $zero 1
    addi $s1 $zero 2
    sw $s0 8($sp)
    addi $s0 $zero 3
    add $s1 $s1 $s0
    lw $s0 8($sp)
    add $s0 $s0 $s1
    add $v0 $zero $s0
    j end
    end:
    "
    );
}
