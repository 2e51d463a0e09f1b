//! sqlbind binds typed application values to the parameters of SQLite prepared
//! statements.
//!
//! ```no_run
//! use sqlbind::{Connection, Value};
//! use time::macros::date;
//!
//! # fn main() -> sqlbind::Result<()> {
//! let conn = Connection::open_in_memory()?;
//! let stmt = conn.prepare("SELECT ?, ?, ?")?;
//! stmt.bind_floating_point(0, f64::NAN, false)?;
//! stmt.bind_date(1, date!(2024 - 3 - 5), false)?;
//! stmt.bind_text(2, "ignored", true)?;
//!
//! let row = stmt.query_row()?.unwrap_or_default();
//! assert_eq!(row[0], Value::Text(b"NaN".to_vec()));
//! assert_eq!(row[1], Value::Text(b"2024-03-05".to_vec()));
//! assert_eq!(row[2], Value::Null);
//! # Ok(())
//! # }
//! ```

mod sqlite;

mod arguments;
mod binder;
pub mod encode;
mod error;
mod logger;
mod options;
mod statement;
pub mod value;

pub use crate::{
    arguments::Arguments,
    binder::check_bind_result,
    encode::Encode,
    error::{BindError, DecodeError, Error, Result},
    logger::{BindEvent, BindObserver, LogSettings, NopObserver, TracingObserver},
    options::{MIN_MAX_LENGTH, Options},
    sqlite::{Connection, PrimaryErrCode, SqliteDataType, SqliteError, Value},
    statement::PreparedStatement,
    value::{Argument, ParameterKind, TypedValue},
};

pub use log::LevelFilter;
