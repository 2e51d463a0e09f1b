//! Binding typed values to statement parameters.
//!
//! Each bind either fully succeeds or fails with a [`BindError`] tagged with the kind
//! being bound. Nothing is retried and no state is kept between calls beyond the
//! statement handle itself.

mod status;
pub(crate) mod wire;

use std::borrow::Cow;

use time::{Date, PrimitiveDateTime};

pub use status::check_bind_result;

use crate::{
    Result,
    arguments::Arguments,
    encode::Encode,
    error::BindError,
    logger::BindEvent,
    sqlite::ffi::Destructor,
    statement::PreparedStatement,
    value::{Argument, ParameterKind, TypedValue},
};

use wire::Encoded;

/// Map a zero-based slot index onto SQLite's one-based position.
fn position(index: usize) -> Option<i32> {
    index.checked_add(1).and_then(|p| i32::try_from(p).ok())
}

impl PreparedStatement {
    /// Bind a boolean as the integer `0` or `1`.
    pub fn bind_boolean(&self, index: usize, value: bool, is_null: bool) -> Result<()> {
        self.bind(index, &TypedValue::Boolean(value), is_null)
    }

    pub fn bind_integral(&self, index: usize, value: i64, is_null: bool) -> Result<()> {
        self.bind(index, &TypedValue::Integral(value), is_null)
    }

    /// Bind a double. NaN and the infinities are bound as the text `NaN`, `Inf` and
    /// `-Inf`, and so read back as text.
    pub fn bind_floating_point(&self, index: usize, value: f64, is_null: bool) -> Result<()> {
        self.bind(index, &TypedValue::FloatingPoint(value), is_null)
    }

    pub fn bind_text(&self, index: usize, value: &str, is_null: bool) -> Result<()> {
        self.bind(index, &TypedValue::Text(Cow::Borrowed(value)), is_null)
    }

    pub fn bind_blob(&self, index: usize, value: &[u8], is_null: bool) -> Result<()> {
        self.bind(index, &TypedValue::Blob(Cow::Borrowed(value)), is_null)
    }

    /// Bind a calendar day as `YYYY-MM-DD` text.
    pub fn bind_date(&self, index: usize, value: Date, is_null: bool) -> Result<()> {
        self.bind(index, &TypedValue::Date(value), is_null)
    }

    /// Bind a timestamp as `YYYY-MM-DD HH:MM:SS[.mmm]` text, truncated to the
    /// millisecond. Failures are reported with the `date` kind.
    pub fn bind_date_time(
        &self,
        index: usize,
        value: PrimitiveDateTime,
        is_null: bool,
    ) -> Result<()> {
        self.bind(index, &TypedValue::DateTime(value), is_null)
    }

    /// Bind any typed value. When `is_null` is set the payload is ignored and a null
    /// is bound.
    pub fn bind(&self, index: usize, value: &TypedValue<'_>, is_null: bool) -> Result<()> {
        let kind = value.kind();
        if let Some(observer) = self.observer() {
            observer.bind(&BindEvent {
                index,
                kind,
                is_null,
                value: Some(value),
            });
        }

        let encoded = wire::encode(value, is_null)?;
        self.bind_encoded(index, kind, &encoded)
    }

    /// Bind a null. `kind` only labels a failure.
    pub fn bind_null(&self, index: usize, kind: ParameterKind) -> Result<()> {
        if let Some(observer) = self.observer() {
            observer.bind(&BindEvent {
                index,
                kind,
                is_null: true,
                value: None,
            });
        }

        self.bind_encoded(index, kind, &Encoded::Null)
    }

    pub fn bind_argument(&self, index: usize, argument: &Argument<'_>) -> Result<()> {
        match argument {
            Argument::Null(kind) => self.bind_null(index, *kind),
            Argument::Value(value) => self.bind(index, value, false),
        }
    }

    /// Encode and bind a Rust value; `None` binds a null.
    pub fn bind_value<'a, T>(&self, index: usize, value: T) -> Result<()>
    where
        T: Encode<'a>,
    {
        self.bind_argument(index, &value.encode())
    }

    /// Bind every argument to slots `0..arguments.len()` in order, stopping at the
    /// first failure.
    pub fn bind_all(&self, arguments: &Arguments<'_>) -> Result<()> {
        for (index, argument) in arguments.iter().enumerate() {
            self.bind_argument(index, argument)?;
        }
        Ok(())
    }

    fn bind_encoded(&self, index: usize, kind: ParameterKind, encoded: &Encoded<'_>) -> Result<()> {
        let kind = kind.failure_kind();
        let position = position(index).ok_or(BindError::Range { kind })?;

        let handle = self.handle();
        let code = match encoded {
            Encoded::Null => handle.bind_null(position),
            Encoded::Int(v) => handle.bind_int(position, *v),
            Encoded::Int64(v) => handle.bind_int64(position, *v),
            Encoded::Double(v) => handle.bind_double(position, *v),
            Encoded::Text(text) => handle.bind_text(position, text.as_str(), text.destructor()),
            Encoded::Blob(v) => handle.bind_blob(position, v, Destructor::Transient),
        };

        check_bind_result(code, kind)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::position;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position(0), Some(1));
        assert_eq!(position(41), Some(42));
    }

    #[test]
    fn positions_overflowing_c_int_are_rejected() {
        assert_eq!(position(i32::MAX as usize - 1), Some(i32::MAX));
        assert_eq!(position(i32::MAX as usize), None);
        assert_eq!(position(usize::MAX), None);
    }
}
