// file: src/export/rules.rs
// version: 1.0.0
// guid: 6f2b8d41-c07e-4a95-b3d8-1e9a5c7f0b32

//! Per-column export rules and `SET @var` constants

use std::collections::HashMap;

/// Special handling for one column of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Binary column written as text when every byte is printable ASCII
    NameText,
    /// Number replaced by the variable declared with exactly that value
    Constant,
    /// Number written as the `|`-joined variables whose bits it contains
    Bitmask,
}

/// Table/column rules consulted while formatting rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRules {
    rules: HashMap<(String, usize), FieldRule>,
}

impl Default for ExportRules {
    fn default() -> Self {
        Self::empty()
            .with_rule("npc_list", 1, FieldRule::NameText)
            .with_rule("mob_droplist", 5, FieldRule::Constant)
            .with_rule("pet_skills", 9, FieldRule::Bitmask)
    }
}

impl ExportRules {
    /// No special columns at all
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with_rule(mut self, table: &str, column: usize, rule: FieldRule) -> Self {
        self.rules.insert((table.to_string(), column), rule);
        self
    }

    pub fn rule_for(&self, table: &str, column: usize) -> Option<FieldRule> {
        self.rules.get(&(table.to_string(), column)).copied()
    }
}

/// Variables declared so far in a fixture, in declaration order
///
/// Keyed by value: a later declaration with the same value replaces the
/// name but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlVariables {
    entries: Vec<(String, String)>,
}

impl SqlVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declaration on `line`, if it is one
    pub fn scan_line(&mut self, line: &str) {
        if let Some((name, value)) = parse_declaration(line) {
            self.insert(name, value);
        }
    }

    pub fn insert(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = name,
            None => self.entries.push((value, name)),
        }
    }

    /// Variable whose declared value is exactly `value`
    pub fn name_for(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, name)| name.as_str())
    }

    /// Names of every declared constant sharing a bit with `value`
    ///
    /// Bits not covered by any constant are appended as a number so the
    /// expression still evaluates to `value`. Returns `None` when no
    /// constant matches.
    pub fn expand_bitmask(&self, value: i64) -> Option<String> {
        let mut names = Vec::new();
        let mut covered = 0i64;

        for (declared, name) in &self.entries {
            if let Some(bits) = parse_integer(declared) {
                if value & bits != 0 {
                    names.push(name.clone());
                    covered |= bits;
                }
            }
        }

        if names.is_empty() {
            return None;
        }

        let leftover = value & !covered;
        if leftover != 0 {
            names.push(leftover.to_string());
        }

        Some(names.join(" | "))
    }
}

/// Parse `SET @NAME = value; -- comment` into `("@NAME", "value")`
pub fn parse_declaration(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if !line.starts_with("SET @") {
        return None;
    }

    let mut parts = line.split('=');
    let lhs = parts.next()?;
    let rhs = parts.next()?;

    let name = lhs.split_whitespace().nth(1)?;
    let value = rhs.replace(';', "");
    let value = value.split("--").next().unwrap_or_default().trim();

    Some((name.to_string(), value.to_string()))
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        text.parse::<i64>().ok()
    }
}
