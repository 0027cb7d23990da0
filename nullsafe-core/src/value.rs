use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;

use crate::type_info::SqlType;

/// Named parameters, in the order they were inserted.
pub type ParamMap = IndexMap<String, Value>;

/// A single argument to be bound against a statement.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// A `NULL` with no type attached.
    ///
    /// Strict drivers reject this at bind time; the interceptor rewrites it to
    /// [`Value::TypedNull`] before the driver ever sees it.
    Null,

    /// A `NULL` that must be bound as exactly this SQL type.
    TypedNull(SqlType),

    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns `true` for both untyped and typed nulls.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::TypedNull(_))
    }

    /// Returns `true` for a `NULL` the driver cannot bind: [`Value::Null`], or a typed null
    /// whose type is [`SqlType::Unknown`].
    #[inline]
    pub fn is_untyped_null(&self) -> bool {
        matches!(self, Value::Null | Value::TypedNull(SqlType::Unknown))
    }

    /// The type carried by a typed null, if this is one.
    #[inline]
    pub fn null_type(&self) -> Option<SqlType> {
        match self {
            Value::TypedNull(ty) => Some(*ty),
            _ => None,
        }
    }

    /// Renders the value for a log line, cut down to at most `max_len` characters.
    ///
    /// Values longer than `max_len` keep their first `max_len - 3` characters followed by `...`.
    /// A `max_len` of 3 or less leaves no room for the ellipsis and just truncates.
    pub fn preview(&self, max_len: usize) -> String {
        let s = self.to_string();

        if s.chars().count() <= max_len {
            return s;
        }

        if max_len <= 3 {
            return s.chars().take(max_len).collect();
        }

        let mut out: String = s.chars().take(max_len - 3).collect();
        out.push_str("...");
        out
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::TypedNull(ty) => write!(f, "NULL::{ty}"),
            Value::Bool(b) => Display::fmt(b, f),
            Value::Int(i) => Display::fmt(i, f),
            Value::Double(d) => Display::fmt(d, f),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )+
    };
}

impl_from_for_value!(
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    f32 => Double,
    f64 => Double,
    String => Text,
    &'_ str => Text,
    Vec<u8> => Bytes,
    &'_ [u8] => Bytes,
);
