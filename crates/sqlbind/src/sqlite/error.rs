use crate::sqlite::ffi;
use libsqlite3_sys::{self, sqlite3};

// Error Codes And Messages
// https://www.sqlite.org/c3ref/errcode.html

/// Primary SQLite result codes.
///
/// Extended result codes are folded onto their primary code by masking the low
/// eight bits; the full code is kept on [`SqliteError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrimaryErrCode {
    Error,
    Internal,
    Perm,
    Abort,
    Busy,
    Locked,
    NoMem,
    ReadOnly,
    Interrupt,
    IoErr,
    Corrupt,
    NotFound,
    Full,
    CantOpen,
    Protocol,
    Empty,
    Schema,
    TooBig,
    Constraint,
    Mismatch,
    Misuse,
    NoLfs,
    Auth,
    Format,
    Range,
    NotADB,
    Notice,
    Warning,
    Unknown(i32),
}

impl PrimaryErrCode {
    pub(crate) fn from_code(code: i32) -> PrimaryErrCode {
        match code & 0xff {
            libsqlite3_sys::SQLITE_ERROR => PrimaryErrCode::Error,
            libsqlite3_sys::SQLITE_INTERNAL => PrimaryErrCode::Internal,
            libsqlite3_sys::SQLITE_PERM => PrimaryErrCode::Perm,
            libsqlite3_sys::SQLITE_ABORT => PrimaryErrCode::Abort,
            libsqlite3_sys::SQLITE_BUSY => PrimaryErrCode::Busy,
            libsqlite3_sys::SQLITE_LOCKED => PrimaryErrCode::Locked,
            libsqlite3_sys::SQLITE_NOMEM => PrimaryErrCode::NoMem,
            libsqlite3_sys::SQLITE_READONLY => PrimaryErrCode::ReadOnly,
            libsqlite3_sys::SQLITE_INTERRUPT => PrimaryErrCode::Interrupt,
            libsqlite3_sys::SQLITE_IOERR => PrimaryErrCode::IoErr,
            libsqlite3_sys::SQLITE_CORRUPT => PrimaryErrCode::Corrupt,
            libsqlite3_sys::SQLITE_NOTFOUND => PrimaryErrCode::NotFound,
            libsqlite3_sys::SQLITE_FULL => PrimaryErrCode::Full,
            libsqlite3_sys::SQLITE_CANTOPEN => PrimaryErrCode::CantOpen,
            libsqlite3_sys::SQLITE_PROTOCOL => PrimaryErrCode::Protocol,
            libsqlite3_sys::SQLITE_EMPTY => PrimaryErrCode::Empty,
            libsqlite3_sys::SQLITE_SCHEMA => PrimaryErrCode::Schema,
            libsqlite3_sys::SQLITE_TOOBIG => PrimaryErrCode::TooBig,
            libsqlite3_sys::SQLITE_CONSTRAINT => PrimaryErrCode::Constraint,
            libsqlite3_sys::SQLITE_MISMATCH => PrimaryErrCode::Mismatch,
            libsqlite3_sys::SQLITE_MISUSE => PrimaryErrCode::Misuse,
            libsqlite3_sys::SQLITE_NOLFS => PrimaryErrCode::NoLfs,
            libsqlite3_sys::SQLITE_AUTH => PrimaryErrCode::Auth,
            libsqlite3_sys::SQLITE_FORMAT => PrimaryErrCode::Format,
            libsqlite3_sys::SQLITE_RANGE => PrimaryErrCode::Range,
            libsqlite3_sys::SQLITE_NOTADB => PrimaryErrCode::NotADB,
            libsqlite3_sys::SQLITE_NOTICE => PrimaryErrCode::Notice,
            libsqlite3_sys::SQLITE_WARNING => PrimaryErrCode::Warning,
            _ => PrimaryErrCode::Unknown(code),
        }
    }
}

/// An error returned from SQLite outside of parameter binding: opening, preparing,
/// executing or stepping.
#[derive(Debug, thiserror::Error)]
#[error("(code: {code}) {message}")]
pub struct SqliteError {
    pub primary: PrimaryErrCode,
    /// The full, possibly extended, result code.
    pub code: i32,
    pub message: String,
}

impl SqliteError {
    /// Capture the most recent error recorded on a connection.
    pub(crate) fn new(handle: *mut sqlite3) -> Self {
        let code = ffi::extended_errcode(handle);
        Self {
            primary: PrimaryErrCode::from_code(code),
            code,
            message: ffi::errmsg(handle),
        }
    }

    /// Build an error from a bare result code when no connection is available.
    pub(crate) fn from_code(code: i32, context: &str) -> Self {
        Self {
            primary: PrimaryErrCode::from_code(code),
            code,
            message: format!("{context}: {}", ffi::errstr(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_codes_fold_onto_primary() {
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_CONSTRAINT_UNIQUE),
            PrimaryErrCode::Constraint
        );
        assert_eq!(
            PrimaryErrCode::from_code(libsqlite3_sys::SQLITE_BUSY_TIMEOUT),
            PrimaryErrCode::Busy
        );
        assert_eq!(PrimaryErrCode::from_code(200), PrimaryErrCode::Unknown(200));
    }

    #[test]
    fn error_from_code_has_description() {
        let err = SqliteError::from_code(libsqlite3_sys::SQLITE_CANTOPEN, "open");
        assert_eq!(err.primary, PrimaryErrCode::CantOpen);
        assert!(err.message.starts_with("open: "));
        assert!(err.to_string().contains("code: 14"));
    }
}
