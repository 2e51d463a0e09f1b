//! Provides [`Encode`] for turning Rust values into bind arguments.
//!
//! | Rust type                          | Parameter kind   |
//! |------------------------------------|------------------|
//! | `bool`                             | boolean          |
//! | `i8`, `i16`, `i32`, `i64`          | integral         |
//! | `u8`, `u16`, `u32`                 | integral         |
//! | `f32`, `f64`                       | floating_point   |
//! | `&str`, [`String`]                 | text             |
//! | `&[u8]`, `Vec<u8>`                 | blob             |
//! | `time::Date`                       | date             |
//! | `time::PrimitiveDateTime`          | date_time        |
//! | `time::OffsetDateTime`             | date_time        |
//!
//! Unsigned integers are zero-extended into the 64-bit integral kind. `u64` has no
//! lossless representation and is not supported.
//!
//! `Option<T>` encodes `None` as a null of `T`'s kind.

use std::borrow::Cow;

use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::value::{Argument, ParameterKind, TypedValue};

/// Encode a single value as a bind argument.
pub trait Encode<'a> {
    /// The kind this type binds as, also used for its nulls.
    const KIND: ParameterKind;

    fn encode(self) -> Argument<'a>;
}

macro_rules! impl_encode {
    ($kind:ident, $($ty:ty => |$v:ident| $conv:expr),+ $(,)?) => {
        $(
            impl<'a> Encode<'a> for $ty {
                const KIND: ParameterKind = ParameterKind::$kind;

                fn encode(self) -> Argument<'a> {
                    let $v = self;
                    Argument::Value(TypedValue::$kind($conv))
                }
            }
        )+
    };
}

impl_encode!(Boolean, bool => |v| v);

impl_encode!(
    Integral,
    i8 => |v| v.into(),
    i16 => |v| v.into(),
    i32 => |v| v.into(),
    i64 => |v| v,
    u8 => |v| v.into(),
    u16 => |v| v.into(),
    u32 => |v| v.into(),
);

impl_encode!(
    FloatingPoint,
    f32 => |v| v.into(),
    f64 => |v| v,
);

impl_encode!(
    Text,
    String => |v| Cow::Owned(v),
);

impl_encode!(
    Blob,
    Vec<u8> => |v| Cow::Owned(v),
);

impl_encode!(Date, Date => |v| v);

impl_encode!(
    DateTime,
    PrimitiveDateTime => |v| v,
    OffsetDateTime => |v| {
        let utc = v.to_offset(UtcOffset::UTC);
        PrimitiveDateTime::new(utc.date(), utc.time())
    },
);

impl<'a> Encode<'a> for &'a str {
    const KIND: ParameterKind = ParameterKind::Text;

    fn encode(self) -> Argument<'a> {
        Argument::Value(TypedValue::Text(Cow::Borrowed(self)))
    }
}

impl<'a> Encode<'a> for &'a String {
    const KIND: ParameterKind = ParameterKind::Text;

    fn encode(self) -> Argument<'a> {
        self.as_str().encode()
    }
}

impl<'a> Encode<'a> for &'a [u8] {
    const KIND: ParameterKind = ParameterKind::Blob;

    fn encode(self) -> Argument<'a> {
        Argument::Value(TypedValue::Blob(Cow::Borrowed(self)))
    }
}

impl<'a> Encode<'a> for &'a Vec<u8> {
    const KIND: ParameterKind = ParameterKind::Blob;

    fn encode(self) -> Argument<'a> {
        self.as_slice().encode()
    }
}

impl<'a, T> Encode<'a> for Option<T>
where
    T: Encode<'a>,
{
    const KIND: ParameterKind = T::KIND;

    fn encode(self) -> Argument<'a> {
        match self {
            Some(v) => v.encode(),
            None => Argument::Null(T::KIND),
        }
    }
}
