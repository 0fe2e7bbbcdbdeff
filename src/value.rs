//! Runtime value wrapper for column data moving between entities and SQL.

use rusqlite::types::ToSqlOutput;
use rust_decimal::Decimal;

/// A generic wrapper enum to hold any column value supported by the schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Integer(i64),
    Text(String),
    Decimal(Decimal),
    Null,
}

// macro rules for implementing conversions for Value enum variants
macro_rules! impl_conv_for_value {
    ($variant:ident, $ty:ty, $name:ident) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }

        impl Value {
            /// Attempts to extract a reference to the inner value if it matches the variant.
            pub fn $name(&self) -> Option<&$ty> {
                if let Value::$variant(v) = self {
                    Some(v)
                } else {
                    None
                }
            }
        }
    };
}

impl_conv_for_value!(Integer, i64, as_integer);
impl_conv_for_value!(Text, String, as_text);
impl_conv_for_value!(Decimal, Decimal, as_decimal);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl Value {
    /// Checks if the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Text(_) => "Text",
            Value::Decimal(_) => "Decimal",
            Value::Null => "Null",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{}", encode_decimal(v)),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Integer(v) => ToSqlOutput::from(*v),
            Value::Text(v) => ToSqlOutput::from(v.as_str()),
            Value::Decimal(v) => ToSqlOutput::from(encode_decimal(v)),
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
        })
    }
}

/// Canonical text encoding for decimal columns.
///
/// Numerically equal decimals must encode identically so that SQL equality
/// on the stored text is exact decimal equality: `56.50` and `56.5` both
/// encode as `"56.5"`.
pub fn encode_decimal(value: &Decimal) -> String {
    value.normalize().to_string()
}

/// Parses a decimal column back from its canonical text form.
pub fn decode_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str_exact(text)
}

/// Reads a decimal column from a row, mapping parse failures to a rusqlite
/// conversion error so row decoding stays on one error path.
pub(crate) fn decimal_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    decode_decimal(&text).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
    })
}
