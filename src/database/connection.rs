// file: src/database/connection.rs
// version: 1.0.0
// guid: b7d1f0a4-3e96-4c28-91b5-8f2a6c0e3d79

//! Read-only access to the live database through the client library

use super::rows::{ColumnKind, ColumnMeta, SqlValue, TableRows};
use crate::config::NetworkSettings;
use crate::{error::XiToolError, Result};
use mysql::consts::ColumnType;
use mysql::prelude::Queryable;
use mysql::{Column, Conn, OptsBuilder, Value};
use tracing::debug;

/// Character set number MySQL reports for binary columns
const BINARY_CHARSET: u16 = 63;

/// Decimals value reported for floating columns without a declared scale
const NOT_FIXED_DEC: u8 = 31;

/// Queries the export and update flows need from the server
pub trait DatabaseReader {
    /// Every row of `table`, in storage order, with column metadata
    fn fetch_table(&mut self, table: &str) -> Result<TableRows>;

    /// Names of the tables present in the configured schema
    fn existing_tables(&mut self) -> Result<Vec<String>>;
}

/// A client-library connection to the configured server
pub struct MysqlConnection {
    conn: Conn,
    database: String,
}

impl MysqlConnection {
    /// Connect to the server, selecting the configured schema when asked
    pub fn connect(network: &NetworkSettings, use_database: bool) -> Result<Self> {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(network.host.clone()))
            .tcp_port(network.port)
            .user(Some(network.login.clone()))
            .pass(Some(network.password.clone()))
            .db_name(use_database.then(|| network.database.clone()));

        debug!("Connecting to {}:{}", network.host, network.port);
        let conn = Conn::new(opts)?;

        Ok(Self {
            conn,
            database: network.database.clone(),
        })
    }
}

impl DatabaseReader for MysqlConnection {
    fn fetch_table(&mut self, table: &str) -> Result<TableRows> {
        let query = format!("SELECT * FROM `{}`", table.replace('`', "``"));
        let result = self.conn.query_iter(query)?;

        let columns: Vec<ColumnMeta> = result.columns().as_ref().iter().map(column_meta).collect();

        let mut rows = Vec::new();
        for row in result {
            // Row::unwrap yields the owned column values
            let values = row?
                .unwrap()
                .into_iter()
                .zip(&columns)
                .map(|(value, column)| convert_value(value, column))
                .collect::<Result<Vec<_>>>()?;
            rows.push(values);
        }

        debug!("Fetched {} rows from {}", rows.len(), table);
        Ok(TableRows { columns, rows })
    }

    fn existing_tables(&mut self) -> Result<Vec<String>> {
        let tables: Vec<String> = self.conn.exec(
            "SELECT TABLE_NAME FROM `information_schema`.`tables` WHERE `TABLE_SCHEMA` = ?",
            (self.database.as_str(),),
        )?;
        Ok(tables)
    }
}

fn column_meta(column: &Column) -> ColumnMeta {
    let binary = column.character_set() == BINARY_CHARSET;
    let kind = match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => ColumnKind::Integer,
        ColumnType::MYSQL_TYPE_FLOAT => ColumnKind::Float,
        ColumnType::MYSQL_TYPE_DOUBLE => ColumnKind::Double,
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => ColumnKind::Decimal,
        ColumnType::MYSQL_TYPE_DATE
        | ColumnType::MYSQL_TYPE_NEWDATE
        | ColumnType::MYSQL_TYPE_TIME
        | ColumnType::MYSQL_TYPE_TIME2
        | ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => ColumnKind::Temporal,
        ColumnType::MYSQL_TYPE_BIT => ColumnKind::Binary,
        ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_ENUM
        | ColumnType::MYSQL_TYPE_SET
        | ColumnType::MYSQL_TYPE_JSON => {
            if binary {
                ColumnKind::Binary
            } else {
                ColumnKind::Text
            }
        }
        _ => ColumnKind::Other,
    };

    let decimals = column.decimals();
    let scale = match kind {
        ColumnKind::Float | ColumnKind::Double if decimals > 0 && decimals < NOT_FIXED_DEC => Some(decimals),
        _ => None,
    };

    ColumnMeta {
        name: column.name_str().into_owned(),
        kind,
        scale,
    }
}

/// Turn a text-protocol value into a typed one using the column metadata
fn convert_value(value: Value, column: &ColumnMeta) -> Result<SqlValue> {
    let bytes = match value {
        Value::NULL => return Ok(SqlValue::Null),
        Value::Int(v) => return Ok(SqlValue::Int(v)),
        Value::UInt(v) => return Ok(SqlValue::UInt(v)),
        Value::Float(v) => return Ok(SqlValue::Float(v)),
        Value::Double(v) => return Ok(SqlValue::Double(v)),
        other @ (Value::Date(..) | Value::Time(..)) => {
            let literal = other.as_sql(false);
            return Ok(SqlValue::Temporal(literal.trim_matches('\'').to_string()));
        }
        Value::Bytes(bytes) => bytes,
    };

    let parse_error = |what: &str, bytes: &[u8]| {
        XiToolError::database(format!(
            "Column {} returned a non-{} value: {}",
            column.name,
            what,
            String::from_utf8_lossy(bytes)
        ))
    };

    let value = match column.kind {
        ColumnKind::Binary => SqlValue::Bytes(bytes),
        ColumnKind::Integer => {
            let text = std::str::from_utf8(&bytes).map_err(|_| parse_error("integer", &bytes))?;
            if let Ok(v) = text.parse::<i64>() {
                SqlValue::Int(v)
            } else {
                SqlValue::UInt(text.parse::<u64>().map_err(|_| parse_error("integer", &bytes))?)
            }
        }
        ColumnKind::Float => {
            let text = std::str::from_utf8(&bytes).map_err(|_| parse_error("float", &bytes))?;
            SqlValue::Float(text.parse::<f32>().map_err(|_| parse_error("float", &bytes))?)
        }
        ColumnKind::Double => {
            let text = std::str::from_utf8(&bytes).map_err(|_| parse_error("double", &bytes))?;
            SqlValue::Double(text.parse::<f64>().map_err(|_| parse_error("double", &bytes))?)
        }
        ColumnKind::Decimal => SqlValue::Decimal(String::from_utf8_lossy(&bytes).into_owned()),
        ColumnKind::Temporal => SqlValue::Temporal(String::from_utf8_lossy(&bytes).into_owned()),
        ColumnKind::Text | ColumnKind::Other => SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned()),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_integer_columns() {
        let column = ColumnMeta::new("mobid", ColumnKind::Integer);

        assert_eq!(
            convert_value(Value::Bytes(b"-12".to_vec()), &column).unwrap(),
            SqlValue::Int(-12)
        );
        assert_eq!(
            convert_value(Value::Bytes(b"18446744073709551615".to_vec()), &column).unwrap(),
            SqlValue::UInt(u64::MAX)
        );
        assert!(convert_value(Value::Bytes(b"abc".to_vec()), &column).is_err());
    }

    #[test]
    fn test_convert_binary_and_text() {
        let binary = ColumnMeta::new("name", ColumnKind::Binary);
        let text = ColumnMeta::new("comment", ColumnKind::Text);

        assert_eq!(
            convert_value(Value::Bytes(vec![0x00, 0xFF]), &binary).unwrap(),
            SqlValue::Bytes(vec![0x00, 0xFF])
        );
        assert_eq!(
            convert_value(Value::Bytes(b"Maat".to_vec()), &text).unwrap(),
            SqlValue::Text("Maat".to_string())
        );
        assert_eq!(convert_value(Value::NULL, &text).unwrap(), SqlValue::Null);
    }

    #[test]
    fn test_convert_float_and_decimal() {
        let float = ColumnMeta::new("pos_x", ColumnKind::Float).with_scale(3);
        let decimal = ColumnMeta::new("rate", ColumnKind::Decimal);

        assert_eq!(
            convert_value(Value::Bytes(b"1.5".to_vec()), &float).unwrap(),
            SqlValue::Float(1.5)
        );
        assert_eq!(
            convert_value(Value::Bytes(b"0.250".to_vec()), &decimal).unwrap(),
            SqlValue::Decimal("0.250".to_string())
        );
    }
}
