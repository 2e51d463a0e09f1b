use std::ffi::CString;
use std::ptr::NonNull;
use std::rc::Rc;

use libsqlite3_sys::{SQLITE_MISUSE, SQLITE_OK, SQLITE_ROW, sqlite3, sqlite3_stmt};

use crate::Error;
use crate::sqlite::ffi::{self, Destructor};
use crate::sqlite::{SqliteDataType, SqliteError, Value};

/// Managed handle to the raw SQLite3 database handle.
///
/// The database handle is closed when this is dropped. Every [`StatementHandle`]
/// holds a reference, so the connection outlives the statements prepared on it.
#[derive(Debug)]
pub(crate) struct ConnectionHandle(NonNull<sqlite3>);

impl ConnectionHandle {
    /// # Safety
    /// `ptr` must be a non-null handle returned by a successful `sqlite3_open_v2`.
    pub(crate) unsafe fn new(ptr: *mut sqlite3) -> Self {
        Self(unsafe { NonNull::new_unchecked(ptr) })
    }

    pub(crate) fn as_ptr(&self) -> *mut sqlite3 {
        self.0.as_ptr()
    }

    pub(crate) fn exec(&self, sql: &str) -> Result<(), Error> {
        let sql =
            CString::new(sql).map_err(|_| Error::Protocol("query contains nul bytes".into()))?;
        ffi::exec(self.as_ptr(), sql.as_ptr())?;
        Ok(())
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        // https://sqlite.org/c3ref/close.html
        if let Err(e) = ffi::close(self.0.as_ptr()) {
            // statements keep the connection alive, so this only happens if SQLite
            // itself left something open
            tracing::error!("sqlite3_close failed: {}", e);
        }
    }
}

/// Owned handle to a compiled statement.
#[derive(Debug)]
pub(crate) struct StatementHandle {
    ptr: NonNull<sqlite3_stmt>,
    conn: Rc<ConnectionHandle>,
}

impl StatementHandle {
    pub(crate) fn new(ptr: NonNull<sqlite3_stmt>, conn: Rc<ConnectionHandle>) -> Self {
        Self { ptr, conn }
    }

    pub(crate) fn as_ptr(&self) -> *mut sqlite3_stmt {
        self.ptr.as_ptr()
    }

    pub(crate) fn last_error(&self) -> SqliteError {
        SqliteError::new(self.conn.as_ptr())
    }

    pub(crate) fn sql(&self) -> String {
        ffi::sql(self.as_ptr())
    }

    // Number Of SQL Parameters
    // https://www.sqlite.org/c3ref/bind_parameter_count.html

    pub(crate) fn bind_parameter_count(&self) -> usize {
        ffi::bind_parameter_count(self.as_ptr()).max(0) as usize
    }

    /// Look up a named parameter, returning its one-based position.
    pub(crate) fn bind_parameter_index(&self, name: &str) -> Option<usize> {
        let name = CString::new(name).ok()?;
        match ffi::bind_parameter_index(self.as_ptr(), name.as_ptr()) {
            0 => None,
            n => Some(n as usize),
        }
    }

    // Binding Values To Prepared Statements
    // NOTE: The first host parameter has an index of 1, not 0.

    pub(crate) fn bind_blob(&self, position: i32, v: &[u8], destructor: Destructor) -> i32 {
        ffi::bind_blob64(self.as_ptr(), position, v, destructor)
    }

    pub(crate) fn bind_text(&self, position: i32, v: &str, destructor: Destructor) -> i32 {
        ffi::bind_text64(self.as_ptr(), position, v, destructor)
    }

    pub(crate) fn bind_int(&self, position: i32, v: i32) -> i32 {
        ffi::bind_int(self.as_ptr(), position, v)
    }

    pub(crate) fn bind_int64(&self, position: i32, v: i64) -> i32 {
        ffi::bind_int64(self.as_ptr(), position, v)
    }

    pub(crate) fn bind_double(&self, position: i32, v: f64) -> i32 {
        ffi::bind_double(self.as_ptr(), position, v)
    }

    pub(crate) fn bind_null(&self, position: i32) -> i32 {
        ffi::bind_null(self.as_ptr(), position)
    }

    pub(crate) fn clear_bindings(&self) {
        ffi::clear_bindings(self.as_ptr());
    }

    /// Reset execution state. The error returned, if any, is the one from the most
    /// recent failed step; the statement is reset regardless.
    pub(crate) fn reset(&self) -> Result<(), SqliteError> {
        ffi::reset(self.as_ptr())
    }

    /// Advance to the next row. Returns `false` once the statement is done.
    pub(crate) fn step(&self) -> Result<bool, SqliteError> {
        Ok(ffi::step(self.as_ptr())? == SQLITE_ROW)
    }

    // result values from the query
    // https://www.sqlite.org/c3ref/column_blob.html

    pub(crate) fn column_count(&self) -> usize {
        ffi::column_count(self.as_ptr()).max(0) as usize
    }

    pub(crate) fn column_value(&self, index: usize) -> Value {
        let stmt = self.as_ptr();
        let index = index as i32;
        match SqliteDataType::from_code(ffi::column_type(stmt, index)) {
            Some(SqliteDataType::Int) => Value::Integer(ffi::column_int64(stmt, index)),
            Some(SqliteDataType::Float) => Value::Double(ffi::column_double(stmt, index)),
            Some(SqliteDataType::Text) => Value::Text(ffi::column_bytes_copied(stmt, index)),
            Some(SqliteDataType::Blob) => Value::Blob(ffi::column_bytes_copied(stmt, index)),
            Some(SqliteDataType::Null) | None => Value::Null,
        }
    }
}

impl Drop for StatementHandle {
    fn drop(&mut self) {
        // https://sqlite.org/c3ref/finalize.html
        let status = ffi::finalize(self.as_ptr());
        if status == SQLITE_MISUSE {
            // Panic in case of detected misuse of SQLite API, such as finalizing
            // an already finalized statement.
            panic!("Detected sqlite3_finalize misuse.");
        } else if status != SQLITE_OK {
            // finalize echoes the error of the last failed step; nothing leaks
            tracing::debug!("sqlite3_finalize reported: {}", self.last_error());
        }
    }
}
