use std::fmt::{self, Display, Formatter};
use std::str::from_utf8;

use libsqlite3_sys::{SQLITE_BLOB, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_NULL, SQLITE_TEXT};

use crate::error::DecodeError;

/// SQLite storage classes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SqliteDataType {
    Null,
    Int,
    Float,
    Text,
    Blob,
}

impl Display for SqliteDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl SqliteDataType {
    pub fn name(&self) -> &'static str {
        match self {
            SqliteDataType::Null => "NULL",
            SqliteDataType::Int => "INTEGER",
            SqliteDataType::Float => "REAL",
            SqliteDataType::Text => "TEXT",
            SqliteDataType::Blob => "BLOB",
        }
    }

    // https://sqlite.org/c3ref/c_blob.html
    pub(crate) fn from_code(code: i32) -> Option<Self> {
        match code {
            SQLITE_INTEGER => Some(SqliteDataType::Int),
            SQLITE_FLOAT => Some(SqliteDataType::Float),
            SQLITE_BLOB => Some(SqliteDataType::Blob),
            SQLITE_NULL => Some(SqliteDataType::Null),
            SQLITE_TEXT => Some(SqliteDataType::Text),
            _ => None,
        }
    }
}

/// An owned copy of a result column.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Double(f64),
    Text(Vec<u8>),
    Blob(Vec<u8>),
}

impl Value {
    pub fn int64(&self) -> Result<i64, DecodeError> {
        match self {
            Value::Integer(v) => Ok(*v),
            other => Err(DecodeError::DataType(other.type_info())),
        }
    }

    pub fn double(&self) -> Result<f64, DecodeError> {
        match self {
            Value::Double(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => Err(DecodeError::DataType(other.type_info())),
        }
    }

    pub fn text(&self) -> Result<&str, DecodeError> {
        match self {
            Value::Text(v) => from_utf8(v).map_err(|e| DecodeError::Conversion(e.to_string())),
            other => Err(DecodeError::DataType(other.type_info())),
        }
    }

    /// Raw bytes of a text or blob value; empty for every other storage class.
    pub fn blob(&self) -> &[u8] {
        match self {
            Value::Blob(v) | Value::Text(v) => v.as_slice(),
            _ => &[],
        }
    }

    pub fn type_info(&self) -> SqliteDataType {
        match self {
            Value::Null => SqliteDataType::Null,
            Value::Integer(_) => SqliteDataType::Int,
            Value::Double(_) => SqliteDataType::Float,
            Value::Text(_) => SqliteDataType::Text,
            Value::Blob(_) => SqliteDataType::Blob,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_check_storage_class() {
        assert_eq!(Value::Integer(7).double().unwrap(), 7.0);
        assert!(matches!(
            Value::Text(b"NaN".to_vec()).double(),
            Err(DecodeError::DataType(SqliteDataType::Text))
        ));
        assert_eq!(Value::Text(b"abc".to_vec()).text().unwrap(), "abc");
        assert!(Value::Blob(vec![]).blob().is_empty());
        assert!(!Value::Blob(vec![]).is_null());
        assert_eq!(Value::Null.type_info().to_string(), "NULL");
    }
}
