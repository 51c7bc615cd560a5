use rust_decimal::Decimal;
use std::fmt::{self, Display, Formatter};
use time::{Date, PrimitiveDateTime, Time};

/// Dynamic value exchanged with the native backends (bound parameters and fetched columns).
#[derive(Default, Clone, Debug, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    /// DB2 `DECIMAL` / `NUMERIC`, also the type of `IDENTITY_VAL_LOCAL()`.
    Decimal(Decimal),
    Float64(f64),
    Varchar(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(..) => "BOOLEAN",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::Decimal(..) => "DECIMAL",
            Value::Float64(..) => "DOUBLE",
            Value::Varchar(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
            Value::Date(..) => "DATE",
            Value::Time(..) => "TIME",
            Value::Timestamp(..) => "TIMESTAMP",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Varchar(v) => f.write_str(v),
            Value::Blob(v) => {
                f.write_str("X'")?;
                for byte in v.iter() {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Decimal(Decimal::from(42)).to_string(), "42");
        assert_eq!(Value::Blob(Box::new([0x0A, 0xFF])).to_string(), "X'0AFF'");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert!(Value::default().is_null());
    }
}
