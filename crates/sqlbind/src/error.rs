//! Types for working with errors produced by sqlbind.

use std::io;

use crate::{
    sqlite::{SqliteDataType, SqliteError, ffi},
    value::ParameterKind,
};

/// A specialized `Result` type for sqlbind.
pub type Result<T> = std::result::Result<T, Error>;

/// A bind primitive rejected a value.
///
/// Every variant carries the kind of the parameter that was being bound. The
/// binder never retries or downgrades one of these; the statement should be reset
/// and rebound, or abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BindError {
    /// The slot index, or the value, is out of the representable range.
    #[error("{kind} bind value out of range")]
    Range { kind: ParameterKind },

    /// SQLite ran out of memory storing the value.
    #[error("{kind} bind out of memory")]
    OutOfMemory { kind: ParameterKind },

    /// The value exceeds the connection's size limits.
    #[error("{kind} bind too big")]
    TooBig { kind: ParameterKind },

    /// Any other result code.
    #[error("{kind} bind returned unexpected value: {code} ({})", describe(.code))]
    Unexpected { kind: ParameterKind, code: i32 },
}

impl BindError {
    /// The kind of the parameter being bound.
    pub fn kind(&self) -> ParameterKind {
        match self {
            BindError::Range { kind }
            | BindError::OutOfMemory { kind }
            | BindError::TooBig { kind }
            | BindError::Unexpected { kind, .. } => *kind,
        }
    }

    /// The SQLite result code behind this failure.
    pub fn code(&self) -> i32 {
        match self {
            BindError::Range { .. } => libsqlite3_sys::SQLITE_RANGE,
            BindError::OutOfMemory { .. } => libsqlite3_sys::SQLITE_NOMEM,
            BindError::TooBig { .. } => libsqlite3_sys::SQLITE_TOOBIG,
            BindError::Unexpected { code, .. } => *code,
        }
    }

    /// SQLite's English description of [`code`](Self::code).
    pub fn description(&self) -> &'static str {
        ffi::errstr(self.code())
    }
}

fn describe(code: &i32) -> &'static str {
    ffi::errstr(*code)
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("incompatible source data type: {0}")]
    DataType(SqliteDataType),
    #[error("decoding conversion error: {0}")]
    Conversion(String),
}

/// Represents all the ways a method can fail within sqlbind.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error returned from the database outside of binding.
    #[error("error returned from database: {0}")]
    Sqlite(#[source] SqliteError),

    /// A parameter could not be bound.
    #[error("sqlite3 error: {0}")]
    Bind(#[from] BindError),

    /// A value could not be converted to its text form before binding.
    #[error("failed to encode {kind} parameter: {message}")]
    Encode {
        kind: ParameterKind,
        message: String,
    },

    /// Column index was out of bounds.
    #[error("column index out of bounds: the len is {len}, but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// Error occurred while decoding a result column.
    #[error("error occurred while decoding: {0}")]
    Decode(#[from] DecodeError),

    /// Error opening the database.
    #[error("error communicating with database: {0}")]
    Io(#[from] io::Error),

    /// Unexpected or invalid input, such as SQL containing more than one statement.
    #[error("encountered unexpected or invalid data: {0}")]
    Protocol(String),
}

impl Error {
    pub fn into_sqlite_error(self) -> Option<SqliteError> {
        match self {
            Error::Sqlite(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_bind_error(&self) -> Option<&BindError> {
        match self {
            Error::Bind(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SqliteError> for Error {
    fn from(error: SqliteError) -> Self {
        Error::Sqlite(error)
    }
}
