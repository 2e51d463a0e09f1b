//! The wire form of a parameter: what actually reaches a bind primitive.
//!
//! SQLite stores integers, doubles, text and blobs. Everything else is mapped onto
//! those here, before any FFI call, so the policy can be tested without a
//! connection.

use std::borrow::Cow;

use time::{Date, PrimitiveDateTime, macros::format_description as fd};

use crate::{
    Error, Result,
    sqlite::ffi::Destructor,
    value::{ParameterKind, TypedValue},
};

/// Sentinel text bound for NaN.
pub(crate) const NAN_TEXT: &str = "NaN";
/// Sentinel text bound for positive infinity.
pub(crate) const INF_TEXT: &str = "Inf";
/// Sentinel text bound for negative infinity.
pub(crate) const NEG_INF_TEXT: &str = "-Inf";

/// Text on its way to `sqlite3_bind_text64`, tagged with its lifetime contract.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WireText<'a> {
    /// Lives forever; SQLite may keep the pointer.
    Static(&'static str),
    /// Copied by SQLite before the bind call returns.
    Transient(Cow<'a, str>),
}

impl WireText<'_> {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            WireText::Static(s) => s,
            WireText::Transient(s) => s,
        }
    }

    pub(crate) fn destructor(&self) -> Destructor {
        match self {
            WireText::Static(_) => Destructor::Static,
            WireText::Transient(_) => Destructor::Transient,
        }
    }
}

/// A parameter in one of SQLite's native representations.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Encoded<'a> {
    Null,
    Int(i32),
    Int64(i64),
    Double(f64),
    Text(WireText<'a>),
    /// Always bound transient: a borrowed slice may not outlive the call.
    Blob(&'a [u8]),
}

/// Encode a value, or a null when `is_null` is set. The payload is ignored for nulls.
pub(crate) fn encode<'v>(value: &'v TypedValue<'_>, is_null: bool) -> Result<Encoded<'v>> {
    if is_null {
        return Ok(Encoded::Null);
    }

    Ok(match value {
        TypedValue::Boolean(v) => Encoded::Int(i32::from(*v)),
        TypedValue::Integral(v) => Encoded::Int64(*v),
        TypedValue::FloatingPoint(v) => floating_point(*v),
        TypedValue::Text(v) => Encoded::Text(WireText::Transient(Cow::Borrowed(v.as_ref()))),
        TypedValue::Blob(v) => Encoded::Blob(v.as_ref()),
        TypedValue::Date(v) => Encoded::Text(WireText::Transient(format_date(*v)?.into())),
        TypedValue::DateTime(v) => {
            Encoded::Text(WireText::Transient(format_date_time(*v)?.into()))
        }
    })
}

/// Non-finite doubles have no faithful numeric storage, so they go over as text.
pub(crate) fn floating_point(v: f64) -> Encoded<'static> {
    if v.is_nan() {
        Encoded::Text(WireText::Static(NAN_TEXT))
    } else if v.is_infinite() {
        if v > f64::MAX {
            Encoded::Text(WireText::Static(INF_TEXT))
        } else {
            Encoded::Text(WireText::Static(NEG_INF_TEXT))
        }
    } else {
        Encoded::Double(v)
    }
}

/// `YYYY-MM-DD`
pub(crate) fn format_date(date: Date) -> Result<String> {
    date.format(fd!("[year]-[month]-[day]"))
        .map_err(|e| Error::Encode {
            kind: ParameterKind::Date,
            message: format!("failed to format Date: {e}"),
        })
}

/// `YYYY-MM-DD HH:MM:SS`, followed by `.mmm` when the millisecond is non-zero.
///
/// Precision below a millisecond is truncated, never rounded.
pub(crate) fn format_date_time(dt: PrimitiveDateTime) -> Result<String> {
    let conversion = |e: &dyn std::fmt::Display| Error::Encode {
        kind: ParameterKind::DateTime.failure_kind(),
        message: format!("failed to format PrimitiveDateTime: {e}"),
    };

    let millis = dt.millisecond();
    let dt = dt
        .replace_millisecond(millis)
        .map_err(|e| conversion(&e))?;

    let formatted = if millis == 0 {
        dt.format(fd!("[year]-[month]-[day] [hour]:[minute]:[second]"))
    } else {
        dt.format(fd!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        ))
    };
    formatted.map_err(|e| conversion(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn non_finite_floats_become_sentinels() {
        assert_eq!(
            floating_point(f64::NAN),
            Encoded::Text(WireText::Static("NaN"))
        );
        assert_eq!(
            floating_point(f64::INFINITY),
            Encoded::Text(WireText::Static("Inf"))
        );
        assert_eq!(
            floating_point(f64::NEG_INFINITY),
            Encoded::Text(WireText::Static("-Inf"))
        );
        assert_eq!(NAN_TEXT.len(), 3);
        assert_eq!(INF_TEXT.len(), 3);
        assert_eq!(NEG_INF_TEXT.len(), 4);
    }

    #[test]
    fn finite_floats_stay_numeric() {
        for v in [0.0, -0.0, 1.5, f64::MAX, f64::MIN, f64::MIN_POSITIVE, 5e-324] {
            assert_eq!(floating_point(v), Encoded::Double(v));
        }
    }

    #[test]
    fn sentinels_use_static_contract() {
        let Encoded::Text(text) = floating_point(f64::NAN) else {
            panic!("expected text");
        };
        assert_eq!(text.destructor(), Destructor::Static);

        let value = TypedValue::Text("abc".into());
        let Encoded::Text(text) = encode(&value, false).unwrap() else {
            panic!("expected text");
        };
        assert_eq!(text.destructor(), Destructor::Transient);
        assert_eq!(text.as_str(), "abc");
    }

    #[test]
    fn null_ignores_payload() {
        let values = [
            TypedValue::Boolean(true),
            TypedValue::Integral(1),
            TypedValue::FloatingPoint(f64::NAN),
            TypedValue::Text("x".into()),
            TypedValue::Blob(vec![1u8].into()),
            TypedValue::Date(date!(2024 - 3 - 5)),
            TypedValue::DateTime(datetime!(2024 - 3 - 5 7:08:09)),
        ];
        for value in &values {
            assert_eq!(encode(value, true).unwrap(), Encoded::Null);
        }
    }

    #[test]
    fn booleans_are_zero_or_one() {
        assert_eq!(
            encode(&TypedValue::Boolean(true), false).unwrap(),
            Encoded::Int(1)
        );
        assert_eq!(
            encode(&TypedValue::Boolean(false), false).unwrap(),
            Encoded::Int(0)
        );
    }

    #[test]
    fn dates() {
        assert_eq!(format_date(date!(2024 - 3 - 5)).unwrap(), "2024-03-05");
        assert_eq!(format_date(date!(1 - 1 - 1)).unwrap(), "0001-01-01");
    }

    #[test]
    fn date_times() {
        assert_eq!(
            format_date_time(datetime!(2024 - 3 - 5 7:08:09.500)).unwrap(),
            "2024-03-05 07:08:09.500"
        );
        assert_eq!(
            format_date_time(datetime!(2024 - 3 - 5 7:08:09)).unwrap(),
            "2024-03-05 07:08:09"
        );
        assert_eq!(
            format_date_time(datetime!(2024 - 3 - 5 7:08:09.012)).unwrap(),
            "2024-03-05 07:08:09.012"
        );
    }

    #[test]
    fn sub_millisecond_precision_truncates() {
        assert_eq!(
            format_date_time(datetime!(2024 - 3 - 5 7:08:09.0007)).unwrap(),
            "2024-03-05 07:08:09"
        );
        assert_eq!(
            format_date_time(datetime!(2024 - 3 - 5 23:59:59.999999999)).unwrap(),
            "2024-03-05 23:59:59.999"
        );
    }
}
