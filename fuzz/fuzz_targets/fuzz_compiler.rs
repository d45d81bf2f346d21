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


//! Fuzz target for the complete cminus compiler pipeline.
//!
//! This fuzzer feeds random source code through the entire compilation
//! pipeline, with a random register file size, to find crashes at any
//! stage.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_compiler
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_compiler -- -max_total_time=60

#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use cminus::compiler::Compiler;
use cminus::AllocatorConfig;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    registers: u8,
    source: String,
}

fn compiler() -> &'static Compiler {
    static COMPILER: OnceLock<Compiler> = OnceLock::new();
    COMPILER.get_or_init(|| Compiler::with_default_grammar().expect("bundled grammar builds"))
}

fuzz_target!(|input: Input| {
    let compiler = compiler()
        .clone()
        .with_registers(AllocatorConfig::new(input.registers));
    let compilation = compiler.compile(input.source);
    // A successful compilation always yields a program
    if compilation.succeeded() {
        assert!(compilation.assembly().is_some_and(|asm| !asm.is_empty()));
    }
});
