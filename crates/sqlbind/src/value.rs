//! Typed parameter values.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use time::{Date, PrimitiveDateTime};

/// The kind of a bound parameter. Carried by every bind failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Boolean,
    Integral,
    FloatingPoint,
    Text,
    Blob,
    Date,
    DateTime,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Boolean => "boolean",
            ParameterKind::Integral => "integral",
            ParameterKind::FloatingPoint => "floating_point",
            ParameterKind::Text => "text",
            ParameterKind::Blob => "blob",
            ParameterKind::Date => "date",
            ParameterKind::DateTime => "date_time",
        }
    }

    /// The kind a bind failure is reported under. Date-times share the `date` label.
    pub fn failure_kind(self) -> ParameterKind {
        match self {
            ParameterKind::DateTime => ParameterKind::Date,
            kind => kind,
        }
    }
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A value to bind, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue<'a> {
    Boolean(bool),
    Integral(i64),
    FloatingPoint(f64),
    Text(Cow<'a, str>),
    Blob(Cow<'a, [u8]>),
    /// A calendar day with no time of day.
    Date(Date),
    /// A UTC timestamp; sub-millisecond precision is discarded when bound.
    DateTime(PrimitiveDateTime),
}

impl TypedValue<'_> {
    pub fn kind(&self) -> ParameterKind {
        match self {
            TypedValue::Boolean(_) => ParameterKind::Boolean,
            TypedValue::Integral(_) => ParameterKind::Integral,
            TypedValue::FloatingPoint(_) => ParameterKind::FloatingPoint,
            TypedValue::Text(_) => ParameterKind::Text,
            TypedValue::Blob(_) => ParameterKind::Blob,
            TypedValue::Date(_) => ParameterKind::Date,
            TypedValue::DateTime(_) => ParameterKind::DateTime,
        }
    }

    /// Detach from any borrowed buffer.
    pub fn into_owned(self) -> TypedValue<'static> {
        match self {
            TypedValue::Boolean(v) => TypedValue::Boolean(v),
            TypedValue::Integral(v) => TypedValue::Integral(v),
            TypedValue::FloatingPoint(v) => TypedValue::FloatingPoint(v),
            TypedValue::Text(v) => TypedValue::Text(Cow::Owned(v.into_owned())),
            TypedValue::Blob(v) => TypedValue::Blob(Cow::Owned(v.into_owned())),
            TypedValue::Date(v) => TypedValue::Date(v),
            TypedValue::DateTime(v) => TypedValue::DateTime(v),
        }
    }
}

impl Display for TypedValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Boolean(v) => write!(f, "{v}"),
            TypedValue::Integral(v) => write!(f, "{v}"),
            TypedValue::FloatingPoint(v) => write!(f, "{v}"),
            TypedValue::Text(v) => f.write_str(v),
            TypedValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
            TypedValue::Date(v) => write!(f, "{v}"),
            TypedValue::DateTime(v) => write!(f, "{v}"),
        }
    }
}

/// A single positional argument: a typed value or a null of a known kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument<'a> {
    Null(ParameterKind),
    Value(TypedValue<'a>),
}

impl Argument<'_> {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Argument::Null(kind) => *kind,
            Argument::Value(value) => value.kind(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Argument::Null(_))
    }
}

impl<'a> From<TypedValue<'a>> for Argument<'a> {
    fn from(value: TypedValue<'a>) -> Self {
        Argument::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn labels() {
        let kinds = [
            (ParameterKind::Boolean, "boolean"),
            (ParameterKind::Integral, "integral"),
            (ParameterKind::FloatingPoint, "floating_point"),
            (ParameterKind::Text, "text"),
            (ParameterKind::Blob, "blob"),
            (ParameterKind::Date, "date"),
            (ParameterKind::DateTime, "date_time"),
        ];
        for (kind, label) in kinds {
            assert_eq!(kind.as_str(), label);
            assert_eq!(kind.to_string(), label);
        }
    }

    #[test]
    fn date_times_fail_as_dates() {
        assert_eq!(ParameterKind::DateTime.failure_kind(), ParameterKind::Date);
        assert_eq!(ParameterKind::Date.failure_kind(), ParameterKind::Date);
        assert_eq!(ParameterKind::Blob.failure_kind(), ParameterKind::Blob);
    }

    #[test]
    fn kind_follows_variant() {
        assert_eq!(TypedValue::Text("".into()).kind(), ParameterKind::Text);
        assert_eq!(
            TypedValue::Date(date!(2024 - 3 - 5)).kind(),
            ParameterKind::Date
        );
        assert_eq!(
            TypedValue::DateTime(datetime!(2024 - 3 - 5 7:08:09)).kind(),
            ParameterKind::DateTime
        );
        assert_eq!(
            Argument::Null(ParameterKind::Blob).kind(),
            ParameterKind::Blob
        );
    }

    #[test]
    fn display_hides_blob_contents() {
        let blob = TypedValue::Blob(vec![1u8, 2, 3].into());
        assert_eq!(blob.to_string(), "<3 bytes>");
        assert_eq!(TypedValue::Boolean(true).to_string(), "true");
    }

    #[test]
    fn into_owned_keeps_contents() {
        let text = String::from("borrowed");
        let value = TypedValue::Text(Cow::Borrowed(text.as_str())).into_owned();
        drop(text);
        assert_eq!(value, TypedValue::Text("borrowed".into()));
    }
}
