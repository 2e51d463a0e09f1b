use std::{
    ffi::CString,
    fmt, io,
    os::raw::c_char,
    ptr::{NonNull, null, null_mut},
    rc::Rc,
    sync::Arc,
};

use libsqlite3_sys::{
    SQLITE_LIMIT_LENGTH, SQLITE_OPEN_CREATE, SQLITE_OPEN_NOMUTEX, SQLITE_OPEN_PRIVATECACHE,
    SQLITE_OPEN_READONLY, SQLITE_OPEN_READWRITE,
};

use crate::{
    Error, Options, PreparedStatement, Result,
    logger::{BindObserver, TracingObserver},
    sqlite::{
        ffi,
        handle::{ConnectionHandle, StatementHandle},
    },
};

/// A connection to a SQLite database.
///
/// Statements prepared from a connection keep it open until they are dropped.
pub struct Connection {
    handle: Rc<ConnectionHandle>,
    debug: bool,
    observer: Arc<dyn BindObserver>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("debug", &self.debug)
            .field("observer", &self.observer)
            .finish()
    }
}

impl Connection {
    /// Open a private in-memory database with default options.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&Options::new())
    }

    pub fn open(options: &Options) -> Result<Self> {
        let filename = options.filename.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "filename passed to SQLite must be valid UTF-8",
            )
        })?;
        let filename = CString::new(filename).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "filename passed to SQLite must not contain nul bytes",
            )
        })?;

        // Connections are not shared between threads, so SQLite's mutexes are not needed
        let mut flags = SQLITE_OPEN_NOMUTEX | SQLITE_OPEN_PRIVATECACHE;
        flags |= if options.read_only {
            SQLITE_OPEN_READONLY
        } else if options.create_if_missing {
            SQLITE_OPEN_CREATE | SQLITE_OPEN_READWRITE
        } else {
            SQLITE_OPEN_READWRITE
        };

        let mut handle = null_mut();

        // <https://www.sqlite.org/c3ref/open.html>
        ffi::open_v2(filename.as_ptr(), &mut handle, flags)?;

        if handle.is_null() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::OutOfMemory,
                "SQLite is unable to allocate memory to hold the sqlite3 object",
            )));
        }

        // SAFE: tested for NULL just above and open_v2 succeeded
        let handle = unsafe { ConnectionHandle::new(handle) };

        // Enable extended result codes
        // https://www.sqlite.org/c3ref/extended_result_codes.html
        ffi::extended_result_codes(handle.as_ptr(), 1)?;

        // Clamp to `i32::MAX` to comply with SQLite's API.
        let ms = i32::try_from(options.busy_timeout.as_millis()).unwrap_or(i32::MAX);
        ffi::busy_timeout(handle.as_ptr(), ms)?;

        if let Some(max_length) = options.max_length {
            // https://www.sqlite.org/c3ref/limit.html
            ffi::limit(handle.as_ptr(), SQLITE_LIMIT_LENGTH, max_length);
        }

        let observer = options.observer.clone().unwrap_or_else(|| {
            Arc::new(TracingObserver::new(options.log_settings.clone())) as Arc<dyn BindObserver>
        });

        Ok(Self {
            handle: Rc::new(handle),
            debug: options.debug,
            observer,
        })
    }

    /// Run one or more statements that take no parameters.
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.handle.exec(sql)
    }

    /// The connection's current size limit for strings and blobs, in bytes.
    pub fn max_length(&self) -> i32 {
        ffi::limit(self.handle.as_ptr(), SQLITE_LIMIT_LENGTH, -1)
    }

    /// Compile a single statement. Text after the first statement, other than
    /// whitespace and semicolons, is rejected.
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement> {
        let n_byte = i32::try_from(sql.len())
            .map_err(|_| Error::Protocol("query is too large to prepare".into()))?;

        let base = sql.as_ptr() as *const c_char;
        let mut stmt = null_mut();
        let mut tail: *const c_char = null();

        // <https://www.sqlite.org/c3ref/prepare.html>
        ffi::prepare_v3(self.handle.as_ptr(), base, n_byte, 0, &mut stmt, &mut tail)?;

        // an empty string or a lone comment compiles to nothing
        let Some(stmt) = NonNull::new(stmt) else {
            return Err(Error::Protocol("query contains no statement".into()));
        };
        let statement = StatementHandle::new(stmt, Rc::clone(&self.handle));

        let consumed = if tail.is_null() {
            sql.len()
        } else {
            tail as usize - base as usize
        };
        let rest = sql.get(consumed..).unwrap_or_default();
        if !rest.trim_matches(|c: char| c.is_whitespace() || c == ';').is_empty() {
            return Err(Error::Protocol(format!(
                "query contains more than one statement: {}",
                rest.trim()
            )));
        }

        Ok(PreparedStatement::new(
            statement,
            self.debug,
            Arc::clone(&self.observer),
        ))
    }
}
