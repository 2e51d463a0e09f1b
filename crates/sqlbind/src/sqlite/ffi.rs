// Safe wrappers around libsqlite3_sys functions used within this crate.
// These wrappers centralize the `unsafe` blocks needed when calling into
// the SQLite C API so that the rest of the codebase can remain safe.
//
// The bind wrappers return the raw status code: classifying it is the
// binder's job, and it needs the code even when no error message was set.

use std::ffi::{CStr, c_void};
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::sqlite::error::SqliteError;
use libsqlite3_sys::{self as ffi_sys, sqlite3, sqlite3_stmt};

#[allow(dead_code)]
const fn assert_c_int_is_32bit() {
    assert!(std::mem::size_of::<c_int>() == 4);
}

// A compile-time assertion to ensure that `c_int` is 32 bits.
const _ASSERT_C_INT_32BIT: () = assert_c_int_is_32bit();

/// How long SQLite may assume a text or blob buffer stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destructor {
    /// The buffer outlives the statement; SQLite keeps the pointer.
    Static,
    /// SQLite copies the buffer before the bind call returns.
    Transient,
}

impl Destructor {
    fn as_sqlite(self) -> ffi_sys::sqlite3_destructor_type {
        match self {
            Destructor::Static => ffi_sys::SQLITE_STATIC(),
            Destructor::Transient => ffi_sys::SQLITE_TRANSIENT(),
        }
    }
}

/// Wrapper around [`sqlite3_open_v2`].
pub(crate) fn open_v2(
    filename: *const c_char,
    handle: *mut *mut sqlite3,
    flags: i32,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_open_v2(filename, handle, flags as c_int, ptr::null()) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        // handle may be null on OOM
        let db = unsafe { *handle };
        if db.is_null() {
            Err(SqliteError::from_code(rc, "sqlite3_open_v2 failed"))
        } else {
            let err = SqliteError::new(db);
            // SAFETY: sqlite3_open_v2 hands back a handle even on failure and
            // it must be released with sqlite3_close
            unsafe {
                ffi_sys::sqlite3_close(db);
            }
            Err(err)
        }
    }
}

/// Wrapper around [`sqlite3_extended_result_codes`].
pub(crate) fn extended_result_codes(db: *mut sqlite3, onoff: i32) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_extended_result_codes(db, onoff as c_int) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db))
    }
}

/// Wrapper around [`sqlite3_busy_timeout`].
pub(crate) fn busy_timeout(db: *mut sqlite3, ms: i32) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_busy_timeout(db, ms as c_int) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db))
    }
}

/// Wrapper around [`sqlite3_limit`]. Returns the previous value of the limit.
pub(crate) fn limit(db: *mut sqlite3, id: i32, new_value: i32) -> i32 {
    unsafe { ffi_sys::sqlite3_limit(db, id as c_int, new_value as c_int) as i32 }
}

/// Wrapper around [`sqlite3_prepare_v3`].
pub(crate) fn prepare_v3(
    db: *mut sqlite3,
    sql: *const c_char,
    n_byte: i32,
    flags: u32,
    stmt: *mut *mut sqlite3_stmt,
    tail: *mut *const c_char,
) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_prepare_v3(db, sql, n_byte as c_int, flags, stmt, tail) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db))
    }
}

/// Wrapper around [`sqlite3_extended_errcode`].
pub(crate) fn extended_errcode(db: *mut sqlite3) -> i32 {
    unsafe { ffi_sys::sqlite3_extended_errcode(db) as i32 }
}

/// Wrapper around [`sqlite3_errmsg`].
pub(crate) fn errmsg(db: *mut sqlite3) -> String {
    unsafe {
        let msg = ffi_sys::sqlite3_errmsg(db);
        debug_assert!(!msg.is_null());
        CStr::from_ptr(msg).to_string_lossy().into_owned()
    }
}

/// Wrapper around [`sqlite3_errstr`]: the English description of a result code.
pub(crate) fn errstr(code: i32) -> &'static str {
    unsafe {
        let msg = ffi_sys::sqlite3_errstr(code as c_int);
        if msg.is_null() {
            return "unknown error";
        }
        // SQLite returns pointers into a static table
        CStr::from_ptr(msg).to_str().unwrap_or("unknown error")
    }
}

/// Wrapper around [`sqlite3_close`].
pub(crate) fn close(db: *mut sqlite3) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_close(db) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db))
    }
}

/// Wrapper around [`sqlite3_exec`] with no callback.
pub(crate) fn exec(db: *mut sqlite3, sql: *const c_char) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_exec(db, sql, None, ptr::null_mut(), ptr::null_mut()) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db))
    }
}

/// Wrapper around [`sqlite3_db_handle`].
pub(crate) fn db_handle(stmt: *mut sqlite3_stmt) -> *mut sqlite3 {
    unsafe { ffi_sys::sqlite3_db_handle(stmt) }
}

/// Wrapper around [`sqlite3_sql`].
pub(crate) fn sql(stmt: *mut sqlite3_stmt) -> String {
    unsafe {
        let sql = ffi_sys::sqlite3_sql(stmt);
        if sql.is_null() {
            return String::new();
        }
        CStr::from_ptr(sql).to_string_lossy().into_owned()
    }
}

/// Wrapper around [`sqlite3_column_count`].
pub(crate) fn column_count(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_column_count(stmt) as i32 }
}

/// Wrapper around [`sqlite3_bind_parameter_count`].
pub(crate) fn bind_parameter_count(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_parameter_count(stmt) as i32 }
}

/// Wrapper around [`sqlite3_bind_parameter_index`]. Returns 0 when no parameter matches.
pub(crate) fn bind_parameter_index(stmt: *mut sqlite3_stmt, name: *const c_char) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_parameter_index(stmt, name) as i32 }
}

// Binding Values To Prepared Statements
// https://www.sqlite.org/c3ref/bind_blob.html

/// Wrapper around [`sqlite3_bind_blob64`].
pub(crate) fn bind_blob64(
    stmt: *mut sqlite3_stmt,
    index: i32,
    data: &[u8],
    destructor: Destructor,
) -> i32 {
    unsafe {
        ffi_sys::sqlite3_bind_blob64(
            stmt,
            index as c_int,
            data.as_ptr() as *const c_void,
            data.len() as u64,
            destructor.as_sqlite(),
        ) as i32
    }
}

/// Wrapper around [`sqlite3_bind_text64`].
pub(crate) fn bind_text64(
    stmt: *mut sqlite3_stmt,
    index: i32,
    data: &str,
    destructor: Destructor,
) -> i32 {
    unsafe {
        ffi_sys::sqlite3_bind_text64(
            stmt,
            index as c_int,
            data.as_ptr() as *const c_char,
            data.len() as u64,
            destructor.as_sqlite(),
            ffi_sys::SQLITE_UTF8 as u8,
        ) as i32
    }
}

/// Wrapper around [`sqlite3_bind_int`].
pub(crate) fn bind_int(stmt: *mut sqlite3_stmt, index: i32, value: i32) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_int(stmt, index as c_int, value as c_int) as i32 }
}

/// Wrapper around [`sqlite3_bind_int64`].
pub(crate) fn bind_int64(stmt: *mut sqlite3_stmt, index: i32, value: i64) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_int64(stmt, index as c_int, value) as i32 }
}

/// Wrapper around [`sqlite3_bind_double`].
pub(crate) fn bind_double(stmt: *mut sqlite3_stmt, index: i32, value: f64) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_double(stmt, index as c_int, value) as i32 }
}

/// Wrapper around [`sqlite3_bind_null`].
pub(crate) fn bind_null(stmt: *mut sqlite3_stmt, index: i32) -> i32 {
    unsafe { ffi_sys::sqlite3_bind_null(stmt, index as c_int) as i32 }
}

/// Wrapper around [`sqlite3_column_type`].
pub(crate) fn column_type(stmt: *mut sqlite3_stmt, index: i32) -> i32 {
    unsafe { ffi_sys::sqlite3_column_type(stmt, index as c_int) as i32 }
}

/// Wrapper around [`sqlite3_column_int64`].
pub(crate) fn column_int64(stmt: *mut sqlite3_stmt, index: i32) -> i64 {
    unsafe { ffi_sys::sqlite3_column_int64(stmt, index as c_int) }
}

/// Wrapper around [`sqlite3_column_double`].
pub(crate) fn column_double(stmt: *mut sqlite3_stmt, index: i32) -> f64 {
    unsafe { ffi_sys::sqlite3_column_double(stmt, index as c_int) }
}

/// Copy the bytes of a text or blob column.
///
/// `sqlite3_column_blob` must be called before `sqlite3_column_bytes`; a zero-length
/// value comes back as a null pointer.
pub(crate) fn column_bytes_copied(stmt: *mut sqlite3_stmt, index: i32) -> Vec<u8> {
    unsafe {
        let data = ffi_sys::sqlite3_column_blob(stmt, index as c_int);
        let len = ffi_sys::sqlite3_column_bytes(stmt, index as c_int);
        if data.is_null() || len <= 0 {
            return Vec::new();
        }
        std::slice::from_raw_parts(data as *const u8, len as usize).to_vec()
    }
}

/// Wrapper around [`sqlite3_clear_bindings`].
pub(crate) fn clear_bindings(stmt: *mut sqlite3_stmt) {
    unsafe { ffi_sys::sqlite3_clear_bindings(stmt) };
}

/// Wrapper around [`sqlite3_reset`].
pub(crate) fn reset(stmt: *mut sqlite3_stmt) -> Result<(), SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_reset(stmt) };
    if rc == ffi_sys::SQLITE_OK {
        Ok(())
    } else {
        Err(SqliteError::new(db_handle(stmt)))
    }
}

/// Wrapper around [`sqlite3_step`]. Returns the raw result code on success paths.
pub(crate) fn step(stmt: *mut sqlite3_stmt) -> Result<i32, SqliteError> {
    let rc = unsafe { ffi_sys::sqlite3_step(stmt) };
    if rc == ffi_sys::SQLITE_ROW || rc == ffi_sys::SQLITE_DONE {
        Ok(rc as i32)
    } else {
        Err(SqliteError::new(db_handle(stmt)))
    }
}

/// Wrapper around [`sqlite3_finalize`].
pub(crate) fn finalize(stmt: *mut sqlite3_stmt) -> i32 {
    unsafe { ffi_sys::sqlite3_finalize(stmt) as i32 }
}
