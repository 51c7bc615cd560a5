use crate::{Error, Result, Value, truncate_long};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::any;

/// Convert both ways between Rust types and `Value`.
pub trait AsValue {
    /// Convert into owned `Value`.
    fn as_value(self) -> Value;
    /// Try to convert a dynamic `Value` into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::Conversion(format!(
        "Cannot convert {} value `{}` into {}",
        value.kind(),
        truncate_long!(value.to_string(), true),
        any::type_name::<T>(),
    ))
}

impl AsValue for Value {
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                $destination(self as _)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int32(v) => <$source>::try_from(*v).ok(),
                    Value::Int64(v) => <$source>::try_from(*v).ok(),
                    // DB2 returns identity values as DECIMAL(31, 0)
                    Value::Decimal(v) if v.fract().is_zero() => v.to_i128().and_then(|v| <$source>::try_from(v).ok()),
                    Value::Float64(v) if v.is_finite() && v.fract() == 0.0 => {
                        <$source>::try_from(*v as i128).ok()
                    }
                    Value::Varchar(v) => v.trim().parse::<$source>().ok(),
                    _ => None,
                };
                converted.ok_or_else(|| conversion_error::<Self>(&value))
            }
        }
    };
}

impl_as_value_integer!(i16, Value::Int32);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(u16, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u32, Value::Int64);

impl AsValue for u64 {
    fn as_value(self) -> Value {
        match i64::try_from(self) {
            Ok(v) => Value::Int64(v),
            Err(..) => Value::Decimal(Decimal::from(self)),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Int32(v) => u64::try_from(*v).ok(),
            Value::Int64(v) => u64::try_from(*v).ok(),
            Value::Decimal(v) if v.fract().is_zero() => v.to_u64(),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int32(v) => Ok(v != 0),
            Value::Int64(v) => Ok(v != 0),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
}

impl AsValue for f64 {
    fn as_value(self) -> Value {
        Value::Float64(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Float64(v) => Some(*v),
            Value::Int32(v) => Some(*v as f64),
            Value::Int64(v) => Some(*v as f64),
            Value::Decimal(v) => v.to_f64(),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Decimal(v) => Some(*v),
            Value::Int32(v) => Some(Decimal::from(*v)),
            Value::Int64(v) => Some(Decimal::from(*v)),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        };
        converted.ok_or_else(|| conversion_error::<Self>(&value))
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Null | Value::Blob(..) => Err(conversion_error::<Self>(&value)),
            v => Ok(v.to_string()),
        }
    }
}

impl AsValue for &str {
    fn as_value(self) -> Value {
        Value::Varchar(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(conversion_error::<Self>(&value))
    }
}

impl AsValue for Vec<u8> {
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.into()),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_decimal() {
        let value = Value::Decimal(Decimal::from(1234));
        assert_eq!(i64::try_from_value(value.clone()).unwrap(), 1234);
        assert_eq!(u64::try_from_value(value.clone()).unwrap(), 1234);
        assert_eq!(i32::try_from_value(value).unwrap(), 1234);
        assert!(i64::try_from_value(Value::Decimal(Decimal::new(15, 1))).is_err());
    }

    #[test]
    fn ranges() {
        assert!(i16::try_from_value(Value::Int64(70_000)).is_err());
        assert_eq!(u16::try_from_value(Value::Int32(65_535)).unwrap(), 65_535);
        assert!(u32::try_from_value(Value::Int32(-1)).is_err());
    }

    #[test]
    fn strings_and_options() {
        assert_eq!(i64::try_from_value(Value::Varchar(" 77 ".into())).unwrap(), 77);
        assert_eq!(String::try_from_value(Value::Int64(5)).unwrap(), "5");
        assert_eq!(Option::<i64>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Some(3_i32).as_value(), Value::Int32(3));
        assert!(matches!(
            bool::try_from_value(Value::Varchar("x".into())),
            Err(Error::Conversion(..))
        ));
    }
}
