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

//! Shared helpers for the integration tests.
//!
//! [`run`] executes an assembly listing produced by the compiler on a tiny
//! MIPS interpreter covering exactly the emitted instruction subset. Reads
//! of registers or memory words that were never written are reported as
//! errors, which catches allocator bugs that would otherwise only produce
//! a wrong value by accident.

#![allow(dead_code)]

use std::collections::HashMap;

use cminus::compiler::Compiler;
use cminus::AllocatorConfig;

/// Instructions executed before a program is considered stuck.
pub const STEP_LIMIT: usize = 200_000;

/// Compile `source`, panicking with the rendered diagnostics on failure.
pub fn compile(source: &str, registers: u8) -> String {
    let compiler = Compiler::with_default_grammar()
        .unwrap()
        .with_registers(AllocatorConfig::new(registers));
    let compilation = compiler.compile(source);
    assert!(
        compilation.succeeded(),
        "compilation failed:\n{}",
        compilation.diagnostics_text()
    );
    compilation.assembly_listing().unwrap()
}

/// Compile and run `source`, returning `main`'s return value.
pub fn compile_and_run(source: &str, registers: u8) -> i32 {
    let listing = compile(source, registers);
    run(&listing).unwrap_or_else(|e| panic!("{}\n--- assembly ---\n{}", e, listing))
}

struct Machine {
    registers: HashMap<String, i32>,
    lo: Option<i32>,
    memory: HashMap<i32, i32>,
}

impl Machine {
    fn read(&self, register: &str) -> Result<i32, String> {
        if register == "$zero" {
            return Ok(0);
        }
        self.registers
            .get(register)
            .copied()
            .ok_or_else(|| format!("read of unset register {}", register))
    }

    fn write(&mut self, register: &str, value: i32) {
        self.registers.insert(register.to_string(), value);
    }

    /// Resolve `offset(base)` to an address.
    fn address(&self, operand: &str) -> Result<i32, String> {
        let (offset, rest) = operand
            .split_once('(')
            .ok_or_else(|| format!("bad memory operand {}", operand))?;
        let base = rest.trim_end_matches(')');
        let offset: i32 = offset
            .parse()
            .map_err(|_| format!("bad offset in {}", operand))?;
        Ok(self.read(base)?.wrapping_add(offset))
    }

    fn load(&self, address: i32) -> Result<i32, String> {
        self.memory
            .get(&address)
            .copied()
            .ok_or_else(|| format!("read of unset memory word {:#x}", address))
    }
}

fn immediate(text: &str) -> Result<i32, String> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => text.parse::<i64>(),
    };
    parsed
        .map(|value| value as i32)
        .map_err(|_| format!("bad immediate {}", text))
}

/// Execute an assembly listing until control reaches `end:` and return `$v0`.
pub fn run(listing: &str) -> Result<i32, String> {
    let mut program: Vec<Vec<String>> = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();
    for line in listing.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(label) = line.strip_suffix(':') {
            labels.insert(label.to_string(), program.len());
            continue;
        }
        program.push(
            line.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect(),
        );
    }

    let target = |label: &str| -> Result<usize, String> {
        labels
            .get(label)
            .copied()
            .ok_or_else(|| format!("undefined label {}", label))
    };
    let end = target("end")?;

    let mut machine = Machine {
        registers: HashMap::new(),
        lo: None,
        memory: HashMap::new(),
    };
    let mut pc = 0;
    let mut steps = 0;

    while pc != end {
        let instruction = program
            .get(pc)
            .ok_or_else(|| format!("execution ran past the program at {}", pc))?;
        pc += 1;
        steps += 1;
        if steps > STEP_LIMIT {
            return Err("step limit exceeded".to_string());
        }

        let op = |index: usize| -> Result<&str, String> {
            instruction
                .get(index)
                .map(String::as_str)
                .ok_or_else(|| format!("missing operand in {:?}", instruction))
        };

        match op(0)? {
            "lui" => machine.write(op(1)?, immediate(op(2)?)? << 16),
            "lw" => {
                let value = machine.load(machine.address(op(2)?)?)?;
                machine.write(op(1)?, value);
            }
            "sw" => {
                let value = machine.read(op(1)?)?;
                let address = machine.address(op(2)?)?;
                machine.memory.insert(address, value);
            }
            "add" | "sub" | "mul" => {
                let left = machine.read(op(2)?)?;
                let right = machine.read(op(3)?)?;
                let value = match op(0)? {
                    "add" => left.wrapping_add(right),
                    "sub" => left.wrapping_sub(right),
                    _ => left.wrapping_mul(right),
                };
                machine.write(op(1)?, value);
            }
            "div" => {
                let left = machine.read(op(1)?)?;
                let right = machine.read(op(2)?)?;
                if right == 0 {
                    return Err("division by zero".to_string());
                }
                machine.lo = Some(left.wrapping_div(right));
            }
            "mflo" => {
                let value = machine.lo.ok_or("mflo before div")?;
                machine.write(op(1)?, value);
            }
            "addi" => {
                let value = machine.read(op(2)?)?.wrapping_add(immediate(op(3)?)?);
                machine.write(op(1)?, value);
            }
            branch @ ("bge" | "bgt" | "beq" | "bne" | "blt" | "ble") => {
                let left = machine.read(op(1)?)?;
                let right = machine.read(op(2)?)?;
                let taken = match branch {
                    "bge" => left >= right,
                    "bgt" => left > right,
                    "beq" => left == right,
                    "bne" => left != right,
                    "blt" => left < right,
                    _ => left <= right,
                };
                if taken {
                    pc = target(op(3)?)?;
                }
            }
            "j" => pc = target(op(1)?)?,
            "jal" => {
                machine.write("$ra", pc as i32);
                pc = target(op(1)?)?;
            }
            "jr" => pc = machine.read(op(1)?)? as usize,
            other => return Err(format!("unknown instruction {}", other)),
        }
    }

    machine.read("$v0")
}
