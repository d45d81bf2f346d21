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


//! End-to-end CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const PROGRAM: &str = "int add(int a, int b) {\n    return a + b;\n}\n\
                       int main(void) {\n    int x;\n    x = add(3, 4);\n    return x * 2;\n}\n";

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cminus"))
}

/// Write `source` to `<dir>/<name>` and return the path.
fn write_source(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

fn run(args: &[&Path]) -> Output {
    cargo_bin()
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_flag() {
    let output = cargo_bin().arg("--help").output().unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("cminus"));
    assert!(text.contains("--output"));
    assert!(text.contains("--registers"));
    assert!(text.contains("--emit-dir"));
    assert!(text.contains("--dump-dfa"));
}

#[test]
fn test_version_flag() {
    let output = cargo_bin().arg("--version").output().unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("cminus"));
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_source_argument() {
    let output = cargo_bin().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_compile_next_to_source() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);

    let output = run(&[&source]);
    assert!(output.status.success(), "{}", stderr(&output));

    let asm = fs::read_to_string(dir.path().join("prog.asm")).unwrap();
    assert!(asm.starts_with("lui $sp,0x1001\nj main\n"), "{}", asm);
    assert!(asm.contains("jal add\n"));
    assert!(asm.ends_with("end:\n"));
}

#[test]
fn test_compile_with_output_path() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);
    let target = dir.path().join("out").with_extension("s");

    let output = cargo_bin()
        .arg(&source)
        .arg("-o")
        .arg(&target)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(target.exists());
    assert!(!dir.path().join("prog.asm").exists());
}

#[test]
fn test_verbose_reports_the_output() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);

    let output = cargo_bin().arg(&source).arg("-v").output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Compiled prog.c"), "{}", stdout(&output));
}

#[test]
fn test_emit_dir_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);
    let emit = dir.path().join("build");

    let output = cargo_bin()
        .arg(&source)
        .arg("--emit-dir")
        .arg(&emit)
        .arg("--trace")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));

    for name in [
        "tokens.txt",
        "ir.txt",
        "trace.txt",
        "blocks.txt",
        "liveness.txt",
        "dfa.txt",
        "prog.asm",
    ] {
        assert!(emit.join(name).exists(), "missing {}", name);
    }
    let tokens = fs::read_to_string(emit.join("tokens.txt")).unwrap();
    assert!(tokens.starts_with("INT  int\nID  add\n"), "{}", tokens);
    let blocks = fs::read_to_string(emit.join("blocks.txt")).unwrap();
    assert!(blocks.starts_with("[add]\nadd:\n"), "{}", blocks);
}

#[test]
fn test_trace_without_emit_dir_prints_trace() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);

    let output = cargo_bin().arg(&source).arg("--trace").output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!stdout(&output).is_empty());
}

#[test]
fn test_compile_error_exit_code() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "bad.c", "int main(void) {\n    return y;\n}\n");

    let output = run(&[&source]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("E200"), "{}", stderr(&output));
    assert!(!dir.path().join("bad.asm").exists());
}

#[test]
fn test_failed_compilation_still_emits_front_end_artifacts() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "bad.c", "int main(void) { return 1 }");
    let emit = dir.path().join("build");

    let output = cargo_bin()
        .arg(&source)
        .arg("--emit-dir")
        .arg(&emit)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(emit.join("tokens.txt").exists());
    assert!(!emit.join("bad.asm").exists());
}

#[test]
fn test_missing_source_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.c");

    let output = run(&[&missing]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Cannot read"));
}

#[test]
fn test_bad_grammar_file() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);
    let grammar = write_source(&dir, "broken.grammar", "program ::= missing\n");

    let output = cargo_bin()
        .arg(&source)
        .arg("--grammar")
        .arg(&grammar)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("missing"), "{}", stderr(&output));
}

#[test]
fn test_unreadable_grammar_file() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);

    let output = cargo_bin()
        .arg(&source)
        .arg("--grammar")
        .arg(dir.path().join("nope.grammar"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_dump_dfa_without_source() {
    let output = cargo_bin().arg("--dump-dfa").output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("I0= ["), "{}", &text[..text.len().min(200)]);
    assert!(text.contains("program -> . N declare_list "));
}

#[test_case::test_case("1"; "too_few")]
#[test_case::test_case("9"; "too_many")]
fn test_register_count_is_validated(count: &str) {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);

    let output = cargo_bin()
        .arg(&source)
        .arg("--registers")
        .arg(count)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_two_registers_compile() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "prog.c", PROGRAM);

    let output = cargo_bin()
        .arg(&source)
        .arg("--registers")
        .arg("2")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let asm = fs::read_to_string(dir.path().join("prog.asm")).unwrap();
    assert!(!asm.contains("$s2"), "{}", asm);
}
