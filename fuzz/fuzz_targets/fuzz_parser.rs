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


//! Fuzz target for the cminus parser.
//!
//! Token sequences are generated structurally with `arbitrary`, so most
//! inputs get past the lexer and exercise the parse table and the
//! semantic actions.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_parser
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_parser -- -max_total_time=60

#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use cminus::GrammarTable;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum FuzzToken {
    Int,
    Void,
    If,
    Else,
    While,
    Return,
    Name(u8),
    Number(u16),
    Operator(u8),
    Punctuation(u8),
}

impl FuzzToken {
    fn text(&self) -> String {
        const OPERATORS: [&str; 11] = ["+", "-", "*", "/", "=", "==", "!=", "<", "<=", ">", ">="];
        const PUNCTUATION: [&str; 6] = ["(", ")", "{", "}", ";", ","];
        match self {
            FuzzToken::Int => "int".to_string(),
            FuzzToken::Void => "void".to_string(),
            FuzzToken::If => "if".to_string(),
            FuzzToken::Else => "else".to_string(),
            FuzzToken::While => "while".to_string(),
            FuzzToken::Return => "return".to_string(),
            FuzzToken::Name(n) if n % 4 == 0 => "main".to_string(),
            FuzzToken::Name(n) => format!("v{}", n % 8),
            FuzzToken::Number(n) => n.to_string(),
            FuzzToken::Operator(n) => OPERATORS[*n as usize % OPERATORS.len()].to_string(),
            FuzzToken::Punctuation(n) => PUNCTUATION[*n as usize % PUNCTUATION.len()].to_string(),
        }
    }
}

fn table() -> &'static GrammarTable {
    static TABLE: OnceLock<GrammarTable> = OnceLock::new();
    TABLE.get_or_init(|| GrammarTable::default_grammar().expect("bundled grammar builds"))
}

fuzz_target!(|tokens: Vec<FuzzToken>| {
    let source: Vec<String> = tokens.iter().map(FuzzToken::text).collect();
    if let Ok(tokens) = cminus::lexer::tokenize(&source.join(" ")) {
        // Should never panic, syntax errors are reported
        let _ = cminus::parser::parse(table(), &tokens);
    }
});
