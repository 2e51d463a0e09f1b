use sqlbind::{Connection, Options, PreparedStatement, Value};

pub use paste;

const TEST_SCHEMA: &str = include_str!("setup.sql");

// Make a new connection
pub fn connection() -> anyhow::Result<Connection> {
    Ok(Connection::open(&Options::new())?)
}

/// Return a connection to a database pre-configured with our test schema.
pub fn tdb() -> anyhow::Result<Connection> {
    let conn = connection()?;
    conn.execute(TEST_SCHEMA)?;
    Ok(conn)
}

/// Run a statement and return the first row, failing if there is none.
pub fn first_row(stmt: &PreparedStatement) -> anyhow::Result<Vec<Value>> {
    stmt.query_row()?
        .ok_or_else(|| anyhow::anyhow!("statement returned no rows: {}", stmt.sql()))
}

/// Run a statement and return the first column of its first row.
pub fn first_value(stmt: &PreparedStatement) -> anyhow::Result<Value> {
    first_row(stmt)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("statement returned no columns: {}", stmt.sql()))
}

// Bind each value to `SELECT ?` and compare what comes back
#[macro_export]
macro_rules! test_bind {
    ($name:ident($($value:expr => $expected:expr),+ $(,)?)) => {
        $crate::paste::item! {
            #[test]
            fn [< test_bind_ $name >] () -> anyhow::Result<()> {
                #[allow(unused_imports)]
                use sqlbind::*;

                let conn = $crate::connection()?;
                let stmt = conn.prepare("SELECT ?")?;

                $(
                    let value = $value;
                    println!("binding {value:?}");

                    stmt.reset();
                    stmt.bind_value(0, value)?;
                    let returned = $crate::first_value(&stmt)?;

                    assert_eq!(returned, $expected,
                            "DB value mismatch; bound with: {}\nas returned: {:?}",
                            stringify!($value), returned);
                )+

                Ok(())
            }
        }
    };
}

// Bind a value and compare SQLite's storage class name for it
#[macro_export]
macro_rules! test_storage_class {
    ($name:ident($($value:expr => $class:literal),+ $(,)?)) => {
        $crate::paste::item! {
            #[test]
            fn [< test_storage_class_ $name >] () -> anyhow::Result<()> {
                #[allow(unused_imports)]
                use sqlbind::*;

                let conn = $crate::connection()?;
                let stmt = conn.prepare("SELECT typeof(?)")?;

                $(
                    stmt.reset();
                    stmt.bind_value(0, $value)?;
                    let returned = $crate::first_value(&stmt)?;

                    assert_eq!(returned.text()?, $class,
                            "storage class mismatch for {}", stringify!($value));
                )+

                Ok(())
            }
        }
    };
}
