use crate::error::Error;
use crate::grammer::ast::Type;
use std::fmt;

/// Longest string a program can build, as with Turbo Pascal's `string`
pub const MAX_STRING: usize = 255;

/// Largest `:width` and `:decimals` honored by `write`
pub const MAX_FIELD: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Char(char),
    Str(String),
}

impl Value {
    /// Initial value of a freshly declared variable
    pub fn default_of(ty: Type) -> Value {
        match ty {
            Type::Integer => Value::Integer(0),
            Type::Real => Value::Real(0.0),
            Type::Boolean => Value::Boolean(false),
            Type::Char => Value::Char('\0'),
            Type::String => Value::Str(String::new()),
        }
    }

    pub fn type_of(&self) -> Type {
        match self {
            Value::Integer(_) => Type::Integer,
            Value::Real(_) => Type::Real,
            Value::Boolean(_) => Type::Boolean,
            Value::Char(_) => Type::Char,
            Value::Str(_) => Type::String,
        }
    }

    pub fn as_int(&self) -> Result<i64, Error> {
        match self {
            Value::Integer(val) => Ok(*val),
            other => Err(mismatch("integer", other)),
        }
    }

    /// Numeric value, promoting integers
    pub fn as_real(&self) -> Result<f64, Error> {
        match self {
            Value::Integer(val) => Ok(*val as f64),
            Value::Real(val) => Ok(*val),
            other => Err(mismatch("real", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Boolean(val) => Ok(*val),
            other => Err(mismatch("boolean", other)),
        }
    }

    /// Text of a char or string value
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Char(c) => Some(c.to_string()),
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Convert for storage into a variable of type `ty`
    pub fn coerce(self, ty: Type) -> Result<Value, Error> {
        match (ty, self) {
            (Type::Integer, val @ Value::Integer(_)) => Ok(val),
            (Type::Real, Value::Integer(val)) => Ok(Value::Real(val as f64)),
            (Type::Real, val @ Value::Real(_)) => Ok(val),
            (Type::Boolean, val @ Value::Boolean(_)) => Ok(val),
            (Type::Char, val @ Value::Char(_)) => Ok(val),
            (Type::Char, Value::Str(s)) if s.chars().count() == 1 => {
                Ok(Value::Char(s.chars().next().unwrap_or_default()))
            }
            (Type::String, Value::Char(c)) => Ok(Value::Str(c.to_string())),
            (Type::String, val @ Value::Str(_)) => Ok(val),
            (ty, val) => Err(Error::TypeMismatch(format!("cannot assign {} to {}", val.type_of(), ty))),
        }
    }

    /// Render for `write`, honoring `value:width:decimals`
    pub fn format(&self, width: Option<usize>, decimals: Option<usize>) -> String {
        let width = width.map(|width| width.min(MAX_FIELD));
        let decimals = decimals.map(|places| places.min(MAX_FIELD));
        let text = match (self, decimals) {
            (Value::Real(val), Some(places)) => format!("{val:.places$}"),
            (Value::Integer(val), Some(places)) => format!("{:.places$}", *val as f64),
            _ => self.to_string(),
        };
        match width {
            Some(width) => format!("{text:>width$}"),
            None => text,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(val) => write!(f, "{val}"),
            Value::Real(val) => write!(f, "{val:?}"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

pub fn mismatch(expected: &str, found: &Value) -> Error {
    Error::TypeMismatch(format!("expected {expected}, found {}", found.type_of()))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_format {
        ($name:ident, $val:expr, $width:expr, $dec:expr, $expect:expr) => {
            #[test]
            fn $name() {
                assert_eq!($val.format($width, $dec), $expect);
            }
        };
    }

    test_format!(int_plain, Value::Integer(42), None, None, "42");
    test_format!(int_width, Value::Integer(42), Some(5), None, "   42");
    test_format!(real_plain, Value::Real(2.0), None, None, "2.0");
    test_format!(real_fraction, Value::Real(0.1), None, None, "0.1");
    test_format!(real_decimals, Value::Real(3.14159), Some(8), Some(2), "    3.14");
    test_format!(bool_true, Value::Boolean(true), None, None, "TRUE");
    test_format!(text_width, Value::Str("ab".into()), Some(4), None, "  ab");

    #[test]
    fn huge_fields_are_clamped() {
        assert_eq!(Value::Char('x').format(Some(70_000), None).len(), MAX_FIELD);
        let text = Value::Real(1.5).format(Some(0), Some(70_000));
        assert_eq!(text.len(), 2 + MAX_FIELD);
    }

    #[test]
    fn coerce_promotes_integer() {
        assert_eq!(Value::Integer(3).coerce(Type::Real), Ok(Value::Real(3.0)));
    }

    #[test]
    fn coerce_rejects_real_to_integer() {
        assert!(matches!(Value::Real(1.5).coerce(Type::Integer), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn coerce_single_char_string() {
        assert_eq!(Value::Str("x".into()).coerce(Type::Char), Ok(Value::Char('x')));
    }
}
