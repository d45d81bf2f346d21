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


//! Register file configuration and the register/address descriptors.
//!
//! The descriptors answer two questions during code generation:
//! - where is the current value of a variable (registers and/or memory)?
//! - which variables does a register currently hold?
//!
//! Constants loaded into a register are not tracked: such a register
//! looks free again right after the instruction that consumes it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::mips::Register;
use crate::ir::Value;
use crate::liveness::VarSet;

/// The allocatable register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    registers: u8,
}

impl AllocatorConfig {
    /// Fewest registers code can be generated with: a binary operation
    /// needs both sources in registers at once.
    pub const MIN_REGISTERS: u8 = 2;
    /// `$s0`..`$s7`.
    pub const MAX_REGISTERS: u8 = 8;

    /// A register file of `registers` saved registers, clamped to
    /// `MIN_REGISTERS..=MAX_REGISTERS`.
    pub fn new(registers: u8) -> Self {
        Self {
            registers: registers.clamp(Self::MIN_REGISTERS, Self::MAX_REGISTERS),
        }
    }

    pub fn registers(&self) -> u8 {
        self.registers
    }

    /// The allocatable registers, lowest first.
    pub fn register_file(&self) -> Vec<Register> {
        (0..self.registers).map(Register::Saved).collect()
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(Self::MAX_REGISTERS)
    }
}

/// Where copies of a variable's current value live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Location {
    registers: BTreeSet<Register>,
    memory: bool,
}

/// Register descriptors (register to variables) and address descriptors
/// (variable to locations), kept consistent with each other.
#[derive(Debug, Clone)]
pub struct Descriptors {
    file: Vec<Register>,
    residents: BTreeMap<Register, BTreeSet<Value>>,
    locations: HashMap<Value, Location>,
}

impl Descriptors {
    pub fn new(config: AllocatorConfig) -> Self {
        let file = config.register_file();
        let residents = file.iter().map(|&register| (register, BTreeSet::new())).collect();
        Self {
            file,
            residents,
            locations: HashMap::new(),
        }
    }

    /// Start a block: every register is free and the variables live on
    /// entry are in memory.
    pub fn reset(&mut self, live_in: &VarSet) {
        for values in self.residents.values_mut() {
            values.clear();
        }
        self.locations = live_in
            .iter()
            .map(|value| {
                (
                    value.clone(),
                    Location {
                        registers: BTreeSet::new(),
                        memory: true,
                    },
                )
            })
            .collect();
    }

    /// The register file, lowest first.
    pub fn file(&self) -> &[Register] {
        &self.file
    }

    /// The lowest register that holds nothing and is not pinned.
    pub fn free_register(&self, pinned: &[Register]) -> Option<Register> {
        self.file
            .iter()
            .copied()
            .find(|register| !pinned.contains(register) && self.residents(*register).is_empty())
    }

    /// Variables held by `register`.
    pub fn residents(&self, register: Register) -> Vec<Value> {
        self.residents
            .get(&register)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// A register holding `value`, if any.
    pub fn register_of(&self, value: &Value) -> Option<Register> {
        self.locations
            .get(value)
            .and_then(|location| location.registers.iter().next().copied())
    }

    pub fn in_memory(&self, value: &Value) -> bool {
        self.locations.get(value).is_some_and(|location| location.memory)
    }

    pub fn has_location(&self, value: &Value) -> bool {
        self.locations
            .get(value)
            .is_some_and(|location| location.memory || !location.registers.is_empty())
    }

    /// `register` holds `value` and `value` exists nowhere else.
    pub fn only_in(&self, value: &Value, register: Register) -> bool {
        self.locations.get(value).is_some_and(|location| {
            !location.memory
                && location.registers.len() == 1
                && location.registers.contains(&register)
        })
    }

    /// `register` holds exactly `value` and nothing else.
    pub fn holds_only(&self, register: Register, value: &Value) -> bool {
        self.residents
            .get(&register)
            .is_some_and(|values| values.len() == 1 && values.contains(value))
    }

    /// Record an extra copy of `value` in `register` (after a load or a
    /// copy); existing copies stay valid.
    pub fn attach(&mut self, value: &Value, register: Register) {
        self.locations
            .entry(value.clone())
            .or_default()
            .registers
            .insert(register);
        self.residents.entry(register).or_default().insert(value.clone());
    }

    /// Record that `value` was just written to `register`: every other copy
    /// of `value` is stale and `register` no longer holds anything else.
    pub fn define(&mut self, value: &Value, register: Register) {
        for other in self.clear_register(register) {
            if &other != value {
                log::trace!("{} loses its copy in {}", other, register);
            }
        }
        if let Some(location) = self.locations.get(value) {
            for stale in location.registers.clone() {
                if let Some(values) = self.residents.get_mut(&stale) {
                    values.remove(value);
                }
            }
        }
        self.locations.insert(
            value.clone(),
            Location {
                registers: BTreeSet::from([register]),
                memory: false,
            },
        );
        self.residents.entry(register).or_default().insert(value.clone());
    }

    /// Record that `value` was copied into `register`, which keeps its
    /// other residents: the copy and its source share the register until
    /// one of them is redefined.
    pub fn define_copy(&mut self, value: &Value, register: Register) {
        self.release(value);
        self.attach(value, register);
    }

    /// Empty `register`, returning the variables it held.
    pub fn clear_register(&mut self, register: Register) -> Vec<Value> {
        let values: Vec<Value> = self
            .residents
            .get_mut(&register)
            .map(|values| std::mem::take(values).into_iter().collect())
            .unwrap_or_default();
        for value in &values {
            if let Some(location) = self.locations.get_mut(value) {
                location.registers.remove(&register);
            }
        }
        values
    }

    /// Record that the memory slot of `value` is up to date.
    pub fn stored(&mut self, value: &Value) {
        self.locations.entry(value.clone()).or_default().memory = true;
    }

    /// Forget a dead variable entirely.
    pub fn release(&mut self, value: &Value) {
        if let Some(location) = self.locations.remove(value) {
            for register in location.registers {
                if let Some(values) = self.residents.get_mut(&register) {
                    values.remove(value);
                }
            }
        }
    }

    /// Every register holding a variable has that variable in its
    /// address descriptor and vice versa.
    #[cfg(test)]
    pub fn is_consistent(&self) -> bool {
        let forward = self.residents.iter().all(|(register, values)| {
            values.iter().all(|value| {
                self.locations
                    .get(value)
                    .is_some_and(|location| location.registers.contains(register))
            })
        });
        let backward = self.locations.iter().all(|(value, location)| {
            location.registers.iter().all(|register| {
                self.residents
                    .get(register)
                    .is_some_and(|values| values.contains(value))
            })
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Value {
        Value::Var(name.to_string())
    }

    const S0: Register = Register::Saved(0);
    const S1: Register = Register::Saved(1);

    #[test]
    fn test_config_is_clamped() {
        assert_eq!(AllocatorConfig::new(1).registers(), 2);
        assert_eq!(AllocatorConfig::new(20).registers(), 8);
        assert_eq!(AllocatorConfig::default().register_file().len(), 8);
        assert_eq!(AllocatorConfig::new(3).register_file(), vec![S0, S1, Register::Saved(2)]);
    }

    #[test]
    fn test_reset_puts_live_in_into_memory() {
        let mut descriptors = Descriptors::new(AllocatorConfig::new(2));
        descriptors.attach(&var("t"), S0);
        descriptors.reset(&VarSet::from([var("a")]));
        assert!(descriptors.in_memory(&var("a")));
        assert!(!descriptors.has_location(&var("t")));
        assert_eq!(descriptors.free_register(&[]), Some(S0));
        assert_eq!(descriptors.free_register(&[S0]), Some(S1));
    }

    #[test]
    fn test_define_invalidates_other_copies() {
        let mut descriptors = Descriptors::new(AllocatorConfig::new(2));
        descriptors.reset(&VarSet::from([var("a")]));
        descriptors.attach(&var("a"), S0);
        descriptors.attach(&var("b"), S1);
        assert!(!descriptors.only_in(&var("a"), S0));

        descriptors.define(&var("a"), S1);
        assert!(descriptors.only_in(&var("a"), S1));
        assert!(!descriptors.in_memory(&var("a")));
        assert!(descriptors.residents(S0).is_empty());
        // `b` was overwritten in place.
        assert!(!descriptors.has_location(&var("b")));
        assert!(descriptors.is_consistent());
    }

    #[test]
    fn test_copy_shares_register() {
        let mut descriptors = Descriptors::new(AllocatorConfig::new(2));
        descriptors.define(&var("x"), S0);
        descriptors.stored(&var("y"));
        descriptors.define_copy(&var("y"), S0);
        assert!(!descriptors.in_memory(&var("y")));
        assert!(!descriptors.holds_only(S0, &var("x")));

        descriptors.define(&var("y"), S1);
        assert!(descriptors.holds_only(S0, &var("x")));
        assert_eq!(descriptors.register_of(&var("y")), Some(S1));
        assert!(descriptors.is_consistent());
    }

    #[test]
    fn test_release_frees_register() {
        let mut descriptors = Descriptors::new(AllocatorConfig::new(2));
        descriptors.define(&var("x"), S0);
        descriptors.stored(&var("x"));
        descriptors.release(&var("x"));
        assert!(!descriptors.has_location(&var("x")));
        assert_eq!(descriptors.free_register(&[]), Some(S0));
        assert!(descriptors.is_consistent());
    }
}
