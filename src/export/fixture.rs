// file: src/export/fixture.rs
// version: 1.0.0
// guid: d95f1a38-7c6e-4b02-8e4d-2f1b0a9c6e73

//! Rewriting `INSERT` rows of a fixture file in place
//!
//! Each `INSERT INTO <table> VALUES (...);` line receives the next row read
//! from the database. The text before the value list and everything after
//! the terminating `;` (spacing, `--` comment, line ending) stay untouched,
//! as do all other lines.

use super::format::format_value;
use super::rules::{ExportRules, SqlVariables};
use crate::database::TableRows;
use crate::{error::XiToolError, Result};
use regex::Regex;

/// Outcome of rewriting one fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    pub content: String,
    pub rows_written: usize,
    /// Rows fetched from the table with no INSERT line left to receive them
    pub rows_unused: usize,
}

/// Rewrites the INSERT lines of one table's fixture
pub struct FixtureRewriter<'a> {
    table: &'a str,
    rules: &'a ExportRules,
    insert_re: Regex,
}

impl<'a> FixtureRewriter<'a> {
    pub fn new(table: &'a str, rules: &'a ExportRules) -> Result<Self> {
        let pattern = format!(
            r"(?i)^\s*insert\s+into\s+`?{}`?\s+values\s*\(",
            regex::escape(table)
        );
        let insert_re = Regex::new(&pattern)
            .map_err(|e| XiToolError::fixture(format!("Invalid INSERT pattern for {}: {}", table, e)))?;

        Ok(Self {
            table,
            rules,
            insert_re,
        })
    }

    /// Produce the new fixture text for `source` using `data`
    pub fn rewrite(&self, source: &str, data: &TableRows) -> Result<RewriteReport> {
        let mut variables = SqlVariables::new();
        let mut rows = data.rows.iter();
        let mut rows_written = 0;
        let mut out = String::with_capacity(source.len());

        for line in source.split_inclusive('\n') {
            variables.scan_line(line);

            let Some(prefix) = self.insert_re.find(line) else {
                out.push_str(line);
                continue;
            };

            let row = rows.next().ok_or_else(|| {
                XiToolError::fixture(format!(
                    "{}.sql has more INSERT rows than the table ({} rows)",
                    self.table,
                    data.rows.len()
                ))
            })?;

            let values = row
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    format_value(
                        value,
                        data.columns.get(i),
                        self.rules.rule_for(self.table, i),
                        &variables,
                    )
                })
                .collect::<Vec<_>>()
                .join(",");

            out.push_str(&line[..prefix.end()]);
            out.push_str(&values);
            out.push_str(");");
            out.push_str(statement_tail(line, prefix.end()));
            rows_written += 1;
        }

        Ok(RewriteReport {
            content: out,
            rows_written,
            rows_unused: rows.len(),
        })
    }
}

/// Text following the `;` that ends the statement opened at `values_start`
fn statement_tail(line: &str, values_start: usize) -> &str {
    if let Some(end) = find_statement_end(line, values_start) {
        return &line[end..];
    }
    if let Some(idx) = line.find(");") {
        return &line[idx + 2..];
    }
    line_ending(line)
}

/// Index just past the closing `)` and its `;`, honouring quoted strings
fn find_statement_end(line: &str, values_start: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut depth = 1usize;
    let mut in_quote = false;
    let mut i = values_start;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quote {
            match b {
                b'\\' => i += 1,
                b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 1,
                b'\'' => in_quote = false,
                _ => {}
            }
        } else {
            match b {
                b'\'' => in_quote = true,
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        let rest = &line[i + 1..];
                        let trimmed = rest.trim_start_matches([' ', '\t']);
                        return Some(match trimmed.strip_prefix(';') {
                            Some(after) => line.len() - after.len(),
                            None => i + 1,
                        });
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
