use crate::avatica::{ColumnValue, Rep, Row, TypedValue};

#[cfg(feature = "chrono")]
use chrono::{NaiveDate, NaiveDateTime};

/// A trait that allows automatic conversion of Rust primitives into the
/// discriminated value representation the wire protocol exchanges.
///
/// # Overview
///
/// `ToTypedValue` provides a unified interface for turning native Rust
/// values into [`TypedValue`]s: a [`Rep`] discriminant plus exactly one
/// populated value field matching that kind. It is intended for use with
/// [`PreparedStatement::execute`](crate::PreparedStatement::execute) and
/// the fluent [`QueryBuilder::bind`](crate::query::QueryBuilder::bind),
/// which align parameters positionally with SQL placeholders.
///
/// Special cases are handled for optional values and, when the `chrono`
/// feature is enabled, for date/time types.
///
/// # Examples
///
/// ```rust
/// use phoenix_connect::ToTypedValue;
///
/// let v = 42i32.to_typed_value(); // Rep::INTEGER, number field set
/// let v = "hello".to_typed_value(); // Rep::STRING, string field set
/// ```
pub trait ToTypedValue {
    fn to_typed_value(self) -> TypedValue;
}

impl TypedValue {
    pub(crate) fn of(rep: Rep) -> Self {
        TypedValue {
            r#type: rep as i32,
            ..Default::default()
        }
    }

    /// The SQL NULL value.
    pub fn null() -> Self {
        TypedValue {
            r#type: Rep::Null as i32,
            null: true,
            ..Default::default()
        }
    }

    /// The representation kind discriminant.
    pub fn rep(&self) -> Rep {
        Rep::try_from(self.r#type).unwrap_or(Rep::Object)
    }

    pub fn is_null(&self) -> bool {
        self.null || self.rep() == Rep::Null
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.rep() {
            Rep::String | Rep::Character | Rep::PrimitiveChar | Rep::BigDecimal => {
                Some(self.string_value.as_str())
            }
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.rep() {
            Rep::PrimitiveByte
            | Rep::PrimitiveShort
            | Rep::PrimitiveInt
            | Rep::PrimitiveLong
            | Rep::Byte
            | Rep::Short
            | Rep::Integer
            | Rep::Long
            | Rep::Number
            | Rep::BigInteger
            | Rep::JavaSqlTime
            | Rep::JavaSqlTimestamp
            | Rep::JavaSqlDate
            | Rep::JavaUtilDate => Some(self.number_value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.rep() {
            Rep::PrimitiveFloat | Rep::PrimitiveDouble | Rep::Float | Rep::Double => {
                Some(self.double_value)
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.rep() {
            Rep::PrimitiveBoolean | Rep::Boolean => Some(self.bool_value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.rep() {
            Rep::ByteString => Some(self.bytes_value.as_slice()),
            _ => None,
        }
    }
}

impl Row {
    /// The scalar value of one column, regardless of whether the server
    /// used the scalar field or the legacy repeated encoding.
    pub fn column(&self, index: usize) -> Option<&TypedValue> {
        let column: &ColumnValue = self.value.get(index)?;
        column.scalar_value.as_ref().or_else(|| column.value.first())
    }
}

/// Macro to implement ToTypedValue for a type mapping to a Rep kind.
macro_rules! impl_to_typed_value {
    ($ty:ty => $rep:ident, $field:ident) => {
        impl ToTypedValue for $ty {
            fn to_typed_value(self) -> TypedValue {
                let mut value = TypedValue::of(Rep::$rep);
                value.$field = self.into();
                value
            }
        }
    };
}

// Primitives
impl_to_typed_value!(bool => Boolean, bool_value);
impl_to_typed_value!(i8 => Byte, number_value);
impl_to_typed_value!(i16 => Short, number_value);
impl_to_typed_value!(i32 => Integer, number_value);
impl_to_typed_value!(i64 => Long, number_value);
impl_to_typed_value!(f32 => Float, double_value);
impl_to_typed_value!(f64 => Double, double_value);
impl_to_typed_value!(String => String, string_value);
impl_to_typed_value!(Vec<u8> => ByteString, bytes_value);

// Special cases
impl ToTypedValue for &str {
    fn to_typed_value(self) -> TypedValue {
        self.to_string().to_typed_value()
    }
}

impl ToTypedValue for TypedValue {
    fn to_typed_value(self) -> TypedValue {
        self
    }
}

// Option as NULL
impl<T: ToTypedValue> ToTypedValue for Option<T> {
    fn to_typed_value(self) -> TypedValue {
        match self {
            Some(inner) => inner.to_typed_value(),
            None => TypedValue::null(),
        }
    }
}

#[cfg(feature = "chrono")]
impl ToTypedValue for NaiveDate {
    fn to_typed_value(self) -> TypedValue {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let mut value = TypedValue::of(Rep::JavaSqlDate);
        value.number_value = self.signed_duration_since(epoch).num_days();
        value
    }
}

#[cfg(feature = "chrono")]
impl ToTypedValue for NaiveDateTime {
    fn to_typed_value(self) -> TypedValue {
        let mut value = TypedValue::of(Rep::JavaSqlTimestamp);
        value.number_value = self.and_utc().timestamp_millis();
        value
    }
}
