// file: src/database/rows.rs
// version: 1.0.0
// guid: e6a0b3f9-58c2-4d17-8a4e-0c9f1d6b7e25

//! Row data as read back from the server

/// A single column value, typed the way the client library decoded it
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    /// Value of a column with the binary character set
    Bytes(Vec<u8>),
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    /// DECIMAL columns, kept as the server's exact text
    Decimal(String),
    /// DATE, TIME, DATETIME and TIMESTAMP values in SQL literal form
    Temporal(String),
}

impl SqlValue {
    /// Integer view used for constant and bitmask substitution
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// Broad storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Double,
    Decimal,
    Text,
    Binary,
    Temporal,
    Other,
}

/// Column description needed to format its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    /// Declared number of decimals, when the column has a fixed scale
    pub scale: Option<u8>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scale: None,
        }
    }

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Every row of one table, in storage order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRows {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<SqlValue>>,
}
