use super::value::{mismatch, Value};
use crate::error::Error;

/// Call a builtin function on already evaluated arguments
pub fn call(name: &str, args: &[Value]) -> Result<Value, Error> {
    let arg = match args {
        [arg] => arg,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "{name} expects 1 argument, got {}",
                args.len()
            )))
        }
    };
    match name {
        "abs" => match arg {
            Value::Integer(val) => Ok(Value::Integer(val.wrapping_abs())),
            other => Ok(Value::Real(other.as_real()?.abs())),
        },
        "sqr" => match arg {
            Value::Integer(val) => Ok(Value::Integer(val.wrapping_mul(*val))),
            other => {
                let val = other.as_real()?;
                Ok(Value::Real(val * val))
            }
        },
        "sqrt" => {
            let val = arg.as_real()?;
            if val < 0.0 {
                return Err(Error::InvalidArgument(format!("sqrt of negative number {val:?}")));
            }
            Ok(Value::Real(val.sqrt()))
        }
        "trunc" => Ok(Value::Integer(arg.as_real()?.trunc() as i64)),
        "round" => Ok(Value::Integer(arg.as_real()?.round() as i64)),
        "odd" => Ok(Value::Boolean(arg.as_int()? % 2 != 0)),
        "ord" => match arg {
            Value::Integer(val) => Ok(Value::Integer(*val)),
            Value::Boolean(val) => Ok(Value::Integer(*val as i64)),
            Value::Char(c) => Ok(Value::Integer(*c as i64)),
            Value::Str(s) if s.chars().count() == 1 => Ok(Value::Integer(s.chars().next().map_or(0, |c| c as i64))),
            other => Err(mismatch("ordinal", other)),
        },
        "chr" => {
            let code = arg.as_int()?;
            u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| Error::InvalidArgument(format!("chr({code})")))
        }
        "length" => match arg.as_text() {
            Some(text) => Ok(Value::Integer(text.chars().count() as i64)),
            None => Err(mismatch("string", arg)),
        },
        _ => Err(Error::UnknownIdentifier(name.to_string())),
    }
}
