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


//! cminus Compiler CLI
//!
//! Compiles a C-minus source file into MIPS assembly.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use cminus::compiler::Compiler;
use cminus::error::GrammarError;
use cminus::output::{assembly_path, write_artifacts, write_assembly};
use cminus::AllocatorConfig;

/// cminus - A table-driven compiler for a small C subset
#[derive(Parser, Debug)]
#[command(name = "cminus")]
#[command(version)]
#[command(about = "A table-driven compiler for a small C subset creating MIPS assembly")]
#[command(long_about = r#"
cminus compiles C-minus programs (int/void functions, int variables,
if/else, while, return and integer arithmetic) into MIPS assembly for
the MARS or SPIM simulators.

The parser is generated at startup from a grammar file. A custom grammar
can be supplied with --grammar.

Example usage:
  cminus prog.c
  cminus prog.c -o out.asm
  cminus prog.c --emit-dir build --trace
  cminus prog.c --registers 2
  cminus --dump-dfa
"#)]
struct Cli {
    /// Source file to compile
    #[arg(required_unless_present = "dump_dfa")]
    source_file: Option<PathBuf>,

    /// Output assembly file (default: source file with .asm extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Grammar file to build the parser from (default: bundled grammar)
    #[arg(long)]
    grammar: Option<PathBuf>,

    /// Write all intermediate artifacts into this directory
    #[arg(long)]
    emit_dir: Option<PathBuf>,

    /// Number of allocatable registers ($s0 upward)
    #[arg(long, default_value_t = AllocatorConfig::MAX_REGISTERS,
          value_parser = clap::value_parser!(u8).range(2..=8))]
    registers: u8,

    /// Record the parser stack at every step
    #[arg(long)]
    trace: bool,

    /// Print the parser automaton and exit if no source file is given
    #[arg(long)]
    dump_dfa: bool,

    /// Enable verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let compiler = match &cli.grammar {
        Some(path) => Compiler::from_grammar_file(path),
        None => Compiler::with_default_grammar(),
    };
    let compiler = match compiler {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("  = hint: {}", hint);
            }
            return match e {
                GrammarError::Io { .. } => ExitCode::from(3),
                _ => ExitCode::from(4),
            };
        }
    };
    let compiler = compiler
        .with_registers(AllocatorConfig::new(cli.registers))
        .with_trace(cli.trace);

    log::info!(
        "{} v{}: {} parser states, {} register(s)",
        cminus::NAME,
        cminus::VERSION,
        compiler.table().state_count(),
        cli.registers
    );

    if cli.dump_dfa {
        print!("{}", compiler.table().dfa_listing());
    }

    let Some(source_path) = &cli.source_file else {
        return ExitCode::SUCCESS;
    };

    let source = match std::fs::read_to_string(source_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", source_path.display(), e);
            return ExitCode::from(3);
        }
    };

    let filename = source_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<input>");
    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("program");

    let compilation = compiler.compile(source.as_str()).with_filename(filename);

    if let Some(dir) = &cli.emit_dir {
        match write_artifacts(&compilation, dir, stem) {
            Ok(paths) => log::info!("wrote {} artifact(s) to {}", paths.len(), dir.display()),
            Err(e) => {
                eprintln!("Error: Cannot write artifacts to {}: {}", dir.display(), e);
                return ExitCode::from(3);
            }
        }
    } else if cli.trace {
        if let Some(trace) = compilation.parse_trace() {
            print!("{}", trace);
        }
    }

    let assembly = match compilation.assembly() {
        Some(assembly) if compilation.succeeded() => assembly,
        _ => {
            eprint!("{}", compilation.diagnostics_text());
            return ExitCode::from(1);
        }
    };

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| assembly_path(source_path));
    if let Err(e) = write_assembly(assembly, &output_path) {
        eprintln!("Error: Cannot write {}: {}", output_path.display(), e);
        return ExitCode::from(3);
    }

    if cli.verbose > 0 {
        println!(
            "Compiled {} -> {} ({} lines)",
            filename,
            output_path.display(),
            assembly.len()
        );
    }

    ExitCode::SUCCESS
}
