use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::{
    Error, Result,
    logger::BindObserver,
    sqlite::{SqliteError, StatementHandle, Value},
};

struct StatementInner {
    handle: StatementHandle,
    debug: Cell<bool>,
    observer: Arc<dyn BindObserver>,
}

/// A compiled statement ready for its parameters.
///
/// Clones share the underlying handle, its bindings and its debug flag. The type is
/// neither `Send` nor `Sync`: SQLite's per-statement parameter state is not
/// synchronized, so every bind and reset must come from one thread.
#[derive(Clone)]
pub struct PreparedStatement {
    inner: Rc<StatementInner>,
}

impl fmt::Debug for PreparedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.sql())
            .field("debug", &self.debug())
            .finish()
    }
}

impl PreparedStatement {
    pub(crate) fn new(handle: StatementHandle, debug: bool, observer: Arc<dyn BindObserver>) -> Self {
        let statement = Self {
            inner: Rc::new(StatementInner {
                handle,
                debug: Cell::new(debug),
                observer,
            }),
        };
        if debug {
            statement.inner.observer.prepared(&statement.sql());
        }
        statement
    }

    pub(crate) fn handle(&self) -> &StatementHandle {
        &self.inner.handle
    }

    pub(crate) fn observer(&self) -> Option<&dyn BindObserver> {
        self.debug().then(|| self.inner.observer.as_ref())
    }

    /// The SQL text this statement was prepared from.
    pub fn sql(&self) -> String {
        self.handle().sql()
    }

    /// Whether bind diagnostics are emitted.
    pub fn debug(&self) -> bool {
        self.inner.debug.get()
    }

    /// Toggle bind diagnostics for this statement and every clone of it.
    pub fn set_debug(&self, on: bool) {
        self.inner.debug.set(on);
    }

    /// Number of parameter slots. Slot indexes run from `0` to `parameter_count() - 1`.
    pub fn parameter_count(&self) -> usize {
        self.handle().bind_parameter_count()
    }

    /// Zero-based slot index of a named parameter.
    ///
    /// `name` may carry its `:`, `@` or `$` prefix; without one, each prefix is tried
    /// in turn.
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        let handle = self.handle();
        if name.starts_with([':', '@', '$', '?']) {
            return handle.bind_parameter_index(name).map(|n| n - 1);
        }
        [':', '@', '$']
            .iter()
            .find_map(|prefix| handle.bind_parameter_index(&format!("{prefix}{name}")))
            .map(|n| n - 1)
    }

    /// Reset the statement for another execution and clear every bound parameter.
    ///
    /// Slots read as null until bound again.
    pub fn reset(&self) {
        if let Some(observer) = self.observer() {
            observer.reset(&self.sql());
        }

        let handle = self.handle();
        if let Err(e) = handle.reset() {
            // reset echoes the error of the last failed step; the statement is
            // reset regardless
            tracing::debug!("sqlite3_reset reported: {}", e);
        }
        handle.clear_bindings();
    }

    /// Advance to the next row. Returns `false` once the statement is done.
    ///
    /// After a failed step the statement must be [`reset`](Self::reset) before it
    /// is bound or stepped again.
    pub fn step(&self) -> Result<bool> {
        Ok(self.handle().step()?)
    }

    pub fn column_count(&self) -> usize {
        self.handle().column_count()
    }

    /// Copy a column of the current row.
    pub fn column(&self, index: usize) -> Result<Value> {
        let len = self.column_count();
        if index >= len {
            return Err(Error::ColumnIndexOutOfBounds { index, len });
        }
        Ok(self.handle().column_value(index))
    }

    /// Step to the first row and copy all of its columns, then reset the statement's
    /// execution state. Bindings are kept, including when the step fails.
    pub fn query_row(&self) -> Result<Option<Vec<Value>>> {
        let handle = self.handle();
        let row = handle.step().map(|has_row| {
            has_row.then(|| (0..self.column_count()).map(|i| handle.column_value(i)).collect())
        });
        self.finish(row)
    }

    /// Run the statement to completion, then reset its execution state. Bindings are
    /// kept, including when a step fails.
    pub fn execute(&self) -> Result<()> {
        let handle = self.handle();
        let done = loop {
            match handle.step() {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.finish(done)
    }

    /// Reset execution state after running the statement, keeping its bindings.
    fn finish<T>(&self, outcome: std::result::Result<T, SqliteError>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.handle().reset()?;
                Ok(value)
            }
            Err(e) => {
                // reset only echoes the step error here
                let _ = self.handle().reset();
                Err(e.into())
            }
        }
    }
}
