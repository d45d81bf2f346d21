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

//! Next-use information within a block.

use std::collections::HashMap;
use std::fmt;

use super::dataflow::reads_and_writes;
use super::VarSet;
use crate::ir::{Quad, Value};

/// Where a variable is next read and whether it is live, seen right after
/// the quadruple it is attached to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UseInfo {
    /// Index (within the block) of the next quadruple reading the variable.
    pub next_use: Option<usize>,
    /// Live after this quadruple: read later in the block or live on exit.
    pub live: bool,
}

impl UseInfo {
    pub const DEAD: UseInfo = UseInfo {
        next_use: None,
        live: false,
    };

    pub fn used_at(index: usize) -> Self {
        Self {
            next_use: Some(index),
            live: true,
        }
    }
}

impl fmt::Display for UseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.next_use {
            Some(index) => write!(f, "({},", index)?,
            None => f.write_str("(^,")?,
        }
        f.write_str(if self.live { "y)" } else { "^)" })
    }
}

/// A quadruple with next-use information for each of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedQuad {
    pub quad: Quad,
    pub arg1: UseInfo,
    pub arg2: UseInfo,
    pub dest: UseInfo,
}

impl fmt::Display for AnnotatedQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.quad, self.arg1, self.arg2, self.dest)
    }
}

/// Annotate a block's quadruples by a backward scan.
///
/// Variables live on exit start out live with no next use, all others dead.
/// Each quadruple first receives the current information, then its
/// destination becomes dead and its sources become used at its index.
pub fn annotate(quads: &[Quad], live_out: &VarSet) -> Vec<AnnotatedQuad> {
    let mut table: HashMap<&Value, UseInfo> = HashMap::new();
    for quad in quads {
        let (reads, write) = reads_and_writes(quad);
        for value in reads.into_iter().chain(write) {
            table.insert(value, UseInfo::DEAD);
        }
    }
    for value in live_out {
        table.insert(
            value,
            UseInfo {
                next_use: None,
                live: true,
            },
        );
    }

    let mut annotated = Vec::with_capacity(quads.len());
    for (index, quad) in quads.iter().enumerate().rev() {
        annotated.push(AnnotatedQuad {
            quad: quad.clone(),
            arg1: info_of(&table, quad.arg1.as_value()),
            arg2: info_of(&table, quad.arg2.as_value()),
            dest: info_of(&table, quad.dest.as_value()),
        });

        let (reads, write) = reads_and_writes(quad);
        if let Some(value) = write {
            table.insert(value, UseInfo::DEAD);
        }
        for value in reads {
            table.insert(value, UseInfo::used_at(index));
        }
    }

    annotated.reverse();
    annotated
}

fn info_of(table: &HashMap<&Value, UseInfo>, value: Option<&Value>) -> UseInfo {
    value
        .and_then(|value| table.get(value).copied())
        .unwrap_or(UseInfo::DEAD)
}
