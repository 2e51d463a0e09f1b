use crate::{
    encode::Encode,
    value::{Argument, ParameterKind, TypedValue},
};

/// An ordered list of positional arguments, bound with
/// [`PreparedStatement::bind_all`](crate::PreparedStatement::bind_all).
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Arguments<'a> {
    values: Vec<Argument<'a>>,
}

impl<'a> Arguments<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the next slot.
    pub fn add<T>(&mut self, value: T)
    where
        T: Encode<'a>,
    {
        self.values.push(value.encode());
    }

    /// Append a typed value, or a null of its kind when `is_null` is set.
    pub fn add_typed(&mut self, value: TypedValue<'a>, is_null: bool) {
        self.values.push(if is_null {
            Argument::Null(value.kind())
        } else {
            Argument::Value(value)
        });
    }

    /// Append a null to the next slot.
    pub fn add_null(&mut self, kind: ParameterKind) {
        self.values.push(Argument::Null(kind));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument<'a>> {
        self.values.iter()
    }

    pub fn into_owned(self) -> Arguments<'static> {
        Arguments {
            values: self
                .values
                .into_iter()
                .map(|argument| match argument {
                    Argument::Null(kind) => Argument::Null(kind),
                    Argument::Value(value) => Argument::Value(value.into_owned()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_kinds() {
        let name = String::from("ferris");
        let mut args = Arguments::new();
        args.add(1_i32);
        args.add(name.as_str());
        args.add(None::<f64>);
        args.add_null(ParameterKind::Blob);
        args.add_typed(TypedValue::Boolean(true), true);

        let kinds: Vec<_> = args.iter().map(|a| (a.kind(), a.is_null())).collect();
        assert_eq!(
            kinds,
            vec![
                (ParameterKind::Integral, false),
                (ParameterKind::Text, false),
                (ParameterKind::FloatingPoint, true),
                (ParameterKind::Blob, true),
                (ParameterKind::Boolean, true),
            ]
        );

        let owned = args.into_owned();
        drop(name);
        assert_eq!(owned.len(), 5);
        assert!(!owned.is_empty());
    }
}
