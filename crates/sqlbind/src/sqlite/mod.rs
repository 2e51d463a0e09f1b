pub use connection::Connection;
pub use error::{PrimaryErrCode, SqliteError};
pub(crate) use handle::StatementHandle;
pub use value::{SqliteDataType, Value};

/// SQLite connection handling.
mod connection;
/// SQLite error types and helpers.
pub mod error;
/// Raw FFI bindings.
pub(crate) mod ffi;
/// Owned connection and statement handles.
mod handle;
/// SQLite value container and accessors.
pub mod value;
