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

//! Variable and function tables used while parsing.
//!
//! Variables live on a single stack tagged with their nesting level.
//! Leaving a block pops every variable deeper than the new level, so
//! lookups from the top always find the innermost declaration.

use std::fmt;

/// The declared type of a variable, parameter or function result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Void,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => f.write_str("int"),
            DataType::Void => f.write_str("void"),
        }
    }
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub data_type: DataType,
    /// Block nesting level; globals are level 0.
    pub level: usize,
}

/// A declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: DataType,
    pub params: Vec<DataType>,
    /// Index of the function's first quadruple.
    pub entry: usize,
}

/// The symbol tables of one parse.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Declared variables, innermost last.
    variables: Vec<Variable>,
    /// Functions in declaration order.
    functions: Vec<Function>,
    level: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current block nesting level.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Enter a nested block.
    pub fn enter_scope(&mut self) {
        self.level += 1;
    }

    /// Leave the current block and drop its variables.
    pub fn leave_scope(&mut self) {
        self.level = self.level.saturating_sub(1);
        while self
            .variables
            .last()
            .is_some_and(|variable| variable.level > self.level)
        {
            self.variables.pop();
        }
    }

    /// Declare a variable at the current level.
    ///
    /// Returns the existing declaration if the name is already taken at
    /// this level. Shadowing an outer declaration is allowed.
    pub fn declare_variable(&mut self, name: &str, data_type: DataType) -> Result<(), Variable> {
        if let Some(existing) = self
            .variables
            .iter()
            .rev()
            .take_while(|variable| variable.level == self.level)
            .find(|variable| variable.name == name)
        {
            return Err(existing.clone());
        }

        self.variables.push(Variable {
            name: name.to_string(),
            data_type,
            level: self.level,
        });
        Ok(())
    }

    /// Look up a variable, innermost declaration first.
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().rev().find(|variable| variable.name == name)
    }

    /// Declare a function. Returns the existing one on a name clash.
    pub fn declare_function(&mut self, function: Function) -> Result<(), Function> {
        if let Some(existing) = self.lookup_function(&function.name) {
            return Err(existing.clone());
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn into_functions(self) -> Vec<Function> {
        self.functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_levels() {
        let mut table = SymbolTable::new();
        table.declare_variable("g", DataType::Int).unwrap();
        table.enter_scope();
        table.declare_variable("a", DataType::Int).unwrap();
        table.enter_scope();
        table.declare_variable("a", DataType::Int).unwrap();
        assert_eq!(table.lookup_variable("a").unwrap().level, 2);

        table.leave_scope();
        assert_eq!(table.lookup_variable("a").unwrap().level, 1);
        table.leave_scope();
        assert!(table.lookup_variable("a").is_none());
        assert!(table.lookup_variable("g").is_some());
        assert_eq!(table.level(), 0);
    }

    #[test]
    fn test_duplicate_in_same_level() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.declare_variable("x", DataType::Int).unwrap();
        let existing = table.declare_variable("x", DataType::Int).unwrap_err();
        assert_eq!(existing.level, 1);
    }

    #[test]
    fn test_leave_global_scope_is_harmless() {
        let mut table = SymbolTable::new();
        table.leave_scope();
        assert_eq!(table.level(), 0);
    }

    #[test]
    fn test_duplicate_function() {
        let mut table = SymbolTable::new();
        let function = Function {
            name: "f".to_string(),
            return_type: DataType::Int,
            params: vec![DataType::Int],
            entry: 1,
        };
        table.declare_function(function.clone()).unwrap();
        assert!(table.declare_function(function).is_err());
        assert_eq!(table.functions().len(), 1);
    }
}
