use libsqlite3_sys::{SQLITE_NOMEM, SQLITE_OK, SQLITE_RANGE, SQLITE_TOOBIG};

use crate::{error::BindError, value::ParameterKind};

/// The result codes a bind primitive can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindStatus {
    Ok,
    Range,
    NoMem,
    TooBig,
    Other(i32),
}

impl BindStatus {
    pub(crate) fn from_code(code: i32) -> Self {
        match code & 0xff {
            SQLITE_OK => BindStatus::Ok,
            SQLITE_RANGE => BindStatus::Range,
            SQLITE_NOMEM => BindStatus::NoMem,
            SQLITE_TOOBIG => BindStatus::TooBig,
            _ => BindStatus::Other(code),
        }
    }
}

/// Map the result of a bind primitive onto success or a [`BindError`] tagged with `kind`.
pub fn check_bind_result(code: i32, kind: ParameterKind) -> Result<(), BindError> {
    match BindStatus::from_code(code) {
        BindStatus::Ok => Ok(()),
        BindStatus::Range => Err(BindError::Range { kind }),
        BindStatus::NoMem => Err(BindError::OutOfMemory { kind }),
        BindStatus::TooBig => Err(BindError::TooBig { kind }),
        BindStatus::Other(code) => Err(BindError::Unexpected { kind, code }),
    }
}
