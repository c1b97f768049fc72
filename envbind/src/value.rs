//! Primitive kinds, typed values and the string coercion table

use std::fmt;

/// The closed set of field kinds the binder understands.
///
/// `Other` marks a field type with no default coercion. Such fields are only
/// ever written by a record's custom decoder; the default path skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    String,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    Other,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::String => "string",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A typed value produced by coercion or by a custom decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::String(_) => Kind::String,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::Isize(_) => Kind::Isize,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::Usize(_) => Kind::Usize,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// A floating-point string that could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {kind} value {raw:?}: {message}")]
pub struct CoerceError {
    /// Kind the value was parsed as
    pub kind: Kind,
    /// Raw environment string
    pub raw: String,
    /// Parser message
    pub message: String,
}

impl CoerceError {
    fn new(kind: Kind, raw: &str, message: impl fmt::Display) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            message: message.to_string(),
        }
    }
}

impl Kind {
    /// Parse a raw environment string as this kind.
    ///
    /// Returns `Ok(None)` when nothing should be assigned: malformed integers
    /// and kinds without a coercion are skipped rather than reported.
    /// Booleans and strings always produce a value. Only floats fail.
    pub fn coerce(self, raw: &str) -> Result<Option<Value>, CoerceError> {
        let value = match self {
            Kind::Bool => Some(Value::Bool(parse_bool(raw))),
            Kind::String => Some(Value::String(raw.to_string())),
            Kind::F32 => Some(Value::F32(parse_f32(raw)?)),
            Kind::F64 => Some(Value::F64(parse_f64(raw)?)),
            Kind::I8 => raw.parse().ok().map(Value::I8),
            Kind::I16 => raw.parse().ok().map(Value::I16),
            Kind::I32 => raw.parse().ok().map(Value::I32),
            Kind::I64 => raw.parse().ok().map(Value::I64),
            Kind::Isize => raw.parse::<i64>().ok().map(|v| Value::Isize(v as isize)),
            Kind::U8 => parse_unsigned(raw).map(Value::U8),
            Kind::U16 => parse_unsigned(raw).map(Value::U16),
            Kind::U32 => parse_unsigned(raw).map(Value::U32),
            Kind::U64 => parse_unsigned(raw).map(Value::U64),
            Kind::Usize => parse_unsigned::<u64>(raw).map(|v| Value::Usize(v as usize)),
            Kind::Other => None,
        };
        Ok(value)
    }
}

fn parse_bool(raw: &str) -> bool {
    !(raw.is_empty() || raw == "0" || raw.eq_ignore_ascii_case("false"))
}

// Unsigned values never carry a sign, not even `+`.
fn parse_unsigned<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}

fn parse_f32(raw: &str) -> Result<f32, CoerceError> {
    let value = match parse_hex_float(raw) {
        Some(hex) => hex
            .map(|v| v as f32)
            .map_err(|e| CoerceError::new(Kind::F32, raw, e))?,
        None => raw
            .parse::<f32>()
            .map_err(|e| CoerceError::new(Kind::F32, raw, e))?,
    };
    if value.is_infinite() && !is_infinity_literal(raw) {
        return Err(CoerceError::new(Kind::F32, raw, "value out of range"));
    }
    Ok(value)
}

fn parse_f64(raw: &str) -> Result<f64, CoerceError> {
    let value = match parse_hex_float(raw) {
        Some(hex) => hex.map_err(|e| CoerceError::new(Kind::F64, raw, e))?,
        None => raw
            .parse::<f64>()
            .map_err(|e| CoerceError::new(Kind::F64, raw, e))?,
    };
    if value.is_infinite() && !is_infinity_literal(raw) {
        return Err(CoerceError::new(Kind::F64, raw, "value out of range"));
    }
    Ok(value)
}

/// Hexadecimal floats such as `0x1.8p3`. `None` when `raw` has no `0x` prefix.
///
/// The binary exponent is mandatory. Mantissa digits beyond 64 bits are
/// truncated.
fn parse_hex_float(raw: &str) -> Option<Result<f64, &'static str>> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let body = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))?;
    Some(parse_hex_body(body).map(|v| if negative { -v } else { v }))
}

fn parse_hex_body(body: &str) -> Result<f64, &'static str> {
    let (mantissa, exponent) = body
        .split_once(['p', 'P'])
        .ok_or("hexadecimal mantissa requires a 'p' exponent")?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| "invalid hexadecimal exponent")?;

    let mut bits: u64 = 0;
    let mut shift: i32 = 0;
    let mut digits = 0;
    let mut seen_dot = false;
    for c in mantissa.chars() {
        if c == '.' && !seen_dot {
            seen_dot = true;
            continue;
        }
        let digit = c.to_digit(16).ok_or("invalid hexadecimal mantissa")?;
        digits += 1;
        if bits >> 60 == 0 {
            bits = bits << 4 | u64::from(digit);
            if seen_dot {
                shift -= 4;
            }
        } else if !seen_dot {
            shift += 4;
        }
    }
    if digits == 0 {
        return Err("invalid hexadecimal mantissa");
    }

    Ok(scale_by_two(bits as f64, exponent.saturating_add(shift)))
}

// Applies large exponents in steps so intermediate powers stay finite.
fn scale_by_two(mut value: f64, mut exponent: i32) -> f64 {
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent)
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// A field type that can hold a [`Value`].
///
/// Implemented for every built-in primitive. Implement it for a newtype to
/// let a custom decoder (or the default coercion for `KIND`) populate it, then
/// register the newtype with [`primitive_field!`](crate::primitive_field).
pub trait Primitive: Sized {
    /// Kind used for default coercion of this type.
    const KIND: Kind;

    /// Convert a value into this type, handing it back on mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl Primitive for bool {
    const KIND: Kind = Kind::Bool;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl Primitive for String {
    const KIND: Kind = Kind::String;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(other),
        }
    }
}

// Numeric values convert into any numeric type with `as` semantics.
macro_rules! numeric_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: Kind = Kind::$kind;

                fn from_value(value: Value) -> Result<Self, Value> {
                    Ok(match value {
                        Value::F32(v) => v as $ty,
                        Value::F64(v) => v as $ty,
                        Value::I8(v) => v as $ty,
                        Value::I16(v) => v as $ty,
                        Value::I32(v) => v as $ty,
                        Value::I64(v) => v as $ty,
                        Value::Isize(v) => v as $ty,
                        Value::U8(v) => v as $ty,
                        Value::U16(v) => v as $ty,
                        Value::U32(v) => v as $ty,
                        Value::U64(v) => v as $ty,
                        Value::Usize(v) => v as $ty,
                        other => return Err(other),
                    })
                }
            }
        )*
    };
}

numeric_primitive! {
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_false_inputs() {
        for raw in ["", "0", "false", "False", "FALSE"] {
            assert_eq!(Kind::Bool.coerce(raw).unwrap(), Some(Value::Bool(false)), "{raw:?}");
        }
    }

    #[test]
    fn test_bool_true_inputs() {
        for raw in ["1", "true", "zzz", " ", " false", "no"] {
            assert_eq!(Kind::Bool.coerce(raw).unwrap(), Some(Value::Bool(true)), "{raw:?}");
        }
    }

    #[test]
    fn test_string_is_identity() {
        assert_eq!(
            Kind::String.coerce(" spaced ").unwrap(),
            Some(Value::String(" spaced ".to_string()))
        );
        assert_eq!(Kind::String.coerce("").unwrap(), Some(Value::String(String::new())));
    }

    #[test]
    fn test_malformed_integers_are_skipped() {
        for kind in [Kind::I8, Kind::I64, Kind::Isize, Kind::U8, Kind::U64, Kind::Usize] {
            assert_eq!(kind.coerce("GGG").unwrap(), None);
            assert_eq!(kind.coerce("").unwrap(), None);
        }
    }

    #[test]
    fn test_integer_range_follows_width() {
        assert_eq!(Kind::U8.coerce("250").unwrap(), Some(Value::U8(250)));
        assert_eq!(Kind::U8.coerce("256").unwrap(), None);
        assert_eq!(Kind::I8.coerce("-128").unwrap(), Some(Value::I8(-128)));
        assert_eq!(Kind::I8.coerce("128").unwrap(), None);
        assert_eq!(Kind::U16.coerce("65536").unwrap(), None);
        assert_eq!(
            Kind::Isize.coerce("9223372036854775807").unwrap(),
            Some(Value::Isize(i64::MAX as isize))
        );
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        assert_eq!(Kind::U32.coerce("+5").unwrap(), None);
        assert_eq!(Kind::U32.coerce("-5").unwrap(), None);
        assert_eq!(Kind::I32.coerce("+5").unwrap(), Some(Value::I32(5)));
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(Kind::F32.coerce("3.14").unwrap(), Some(Value::F32(3.14)));
        assert_eq!(Kind::F64.coerce("3.14").unwrap(), Some(Value::F64(3.14)));
        assert_eq!(Kind::F64.coerce("-inf").unwrap(), Some(Value::F64(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_hex_float_parsing() {
        assert_eq!(Kind::F64.coerce("0x1p-2").unwrap(), Some(Value::F64(0.25)));
        assert_eq!(Kind::F32.coerce("0x1p-2").unwrap(), Some(Value::F32(0.25)));
        assert_eq!(Kind::F64.coerce("-0X1.8p1").unwrap(), Some(Value::F64(-3.0)));
        assert_eq!(Kind::F64.coerce("0x.8p0").unwrap(), Some(Value::F64(0.5)));
        assert_eq!(
            Kind::F32.coerce("0x1.fffffep127").unwrap(),
            Some(Value::F32(f32::MAX))
        );
    }

    #[test]
    fn test_hex_float_failures_propagate() {
        let err = Kind::F64.coerce("0x1").unwrap_err();
        assert!(err.message.contains("'p' exponent"), "{err}");
        assert!(Kind::F64.coerce("0xp1").is_err());
        assert!(Kind::F64.coerce("0x1.2.3p1").is_err());
        assert!(Kind::F64.coerce("0x1p1024").is_err());
        assert!(Kind::F32.coerce("0x1p128").is_err());
    }

    #[test]
    fn test_float_failures_propagate() {
        let err = Kind::F64.coerce("abc").unwrap_err();
        assert_eq!(err.kind, Kind::F64);
        assert_eq!(err.raw, "abc");
        assert!(Kind::F32.coerce("").is_err());
        assert!(Kind::F32.coerce("1e40").is_err());
    }

    #[test]
    fn test_other_kind_has_no_coercion() {
        assert_eq!(Kind::Other.coerce("anything").unwrap(), None);
    }

    #[test]
    fn test_numeric_values_convert_across_widths() {
        assert_eq!(u8::from_value(Value::I64(250)), Ok(250u8));
        assert_eq!(i64::from_value(Value::U8(7)), Ok(7i64));
        assert_eq!(f64::from_value(Value::I32(2)), Ok(2.0));
    }

    #[test]
    fn test_mismatched_values_are_returned() {
        assert_eq!(
            u8::from_value(Value::String("x".into())),
            Err(Value::String("x".into()))
        );
        assert_eq!(String::from_value(Value::U8(1)), Err(Value::U8(1)));
        assert_eq!(bool::from_value(Value::I8(1)), Err(Value::I8(1)));
    }
}
