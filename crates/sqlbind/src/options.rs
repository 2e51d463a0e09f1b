use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::LevelFilter;

use crate::{
    Result,
    logger::{BindObserver, LogSettings},
    sqlite::Connection,
};

/// The smallest string and blob size limit SQLite accepts, in bytes.
pub const MIN_MAX_LENGTH: i32 = 30;

/// Options for opening a [`Connection`].
#[derive(Clone, Debug)]
pub struct Options {
    pub(crate) filename: PathBuf,
    pub(crate) read_only: bool,
    pub(crate) create_if_missing: bool,
    pub(crate) busy_timeout: Duration,
    pub(crate) max_length: Option<i32>,
    pub(crate) debug: bool,
    pub(crate) log_settings: LogSettings,
    pub(crate) observer: Option<Arc<dyn BindObserver>>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Construct `Self` with default options: a private in-memory database, a five
    /// second busy timeout, SQLite's compiled-in limits and bind diagnostics off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filename: ":memory:".into(),
            read_only: false,
            create_if_missing: false,
            busy_timeout: Duration::from_secs(5),
            max_length: None,
            debug: false,
            log_settings: LogSettings::default(),
            observer: None,
        }
    }

    /// Sets the name of the database file.
    #[must_use]
    pub fn filename(mut self, filename: impl AsRef<Path>) -> Self {
        self.filename = filename.as_ref().to_owned();
        self
    }

    /// Sets the [access mode](https://www.sqlite.org/c3ref/open.html) to open the database
    /// for read-only access.
    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the [access mode](https://www.sqlite.org/c3ref/open.html) to create the database file
    /// if the file does not exist.
    ///
    /// By default, a new file **will not be created** if one is not found.
    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets a timeout value to wait when the database is locked, before
    /// returning a busy timeout error.
    ///
    /// The default busy timeout is 5 seconds.
    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Cap the size in bytes of any string or blob, including bound parameters
    /// (`SQLITE_LIMIT_LENGTH`). Binding a larger value fails with
    /// [`BindError::TooBig`](crate::BindError::TooBig).
    ///
    /// SQLite never enforces a limit below [`MIN_MAX_LENGTH`] bytes; smaller
    /// values are raised to it.
    #[must_use]
    pub fn max_length(mut self, bytes: i32) -> Self {
        self.max_length = Some(bytes.max(MIN_MAX_LENGTH));
        self
    }

    /// Enable bind diagnostics on every statement prepared from the connection.
    ///
    /// Statements can toggle this individually with
    /// [`PreparedStatement::set_debug`](crate::PreparedStatement::set_debug).
    #[must_use]
    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    /// Level at which the default observer logs binds.
    #[must_use]
    pub fn log_binds(mut self, level: LevelFilter) -> Self {
        self.log_settings.log_binds(level);
        self
    }

    /// Replace the default tracing observer.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn BindObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Open a connection with these options.
    pub fn open(&self) -> Result<Connection> {
        Connection::open(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::new();
        assert_eq!(options.filename, PathBuf::from(":memory:"));
        assert!(!options.debug);
        assert!(!options.read_only);
        assert!(options.max_length.is_none());
        assert!(options.observer.is_none());
        assert_eq!(options.busy_timeout, Duration::from_secs(5));
        assert_eq!(options.log_settings.binds_level, LevelFilter::Debug);
    }

    #[test]
    fn builder_chains() {
        let options = Options::new()
            .filename("test.db")
            .create_if_missing(true)
            .max_length(128)
            .debug(true)
            .log_binds(LevelFilter::Trace);
        assert_eq!(options.filename, PathBuf::from("test.db"));
        assert!(options.create_if_missing);
        assert_eq!(options.max_length, Some(128));
        assert!(options.debug);
        assert_eq!(options.log_settings.binds_level, LevelFilter::Trace);
    }

    #[test]
    fn max_length_has_a_floor() {
        assert_eq!(Options::new().max_length(8).max_length, Some(MIN_MAX_LENGTH));
        assert_eq!(Options::new().max_length(-1).max_length, Some(MIN_MAX_LENGTH));
        assert_eq!(Options::new().max_length(31).max_length, Some(31));
    }
}
