use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use num_bigint::BigInt as BigInteger;
use num_traits::ToPrimitive;

// ============================================================================
// Numeric Type System
// ============================================================================

/// Numbers as they appear in printed forms.
///
/// `BigInt` only ever holds values outside the `i64` range; constructors
/// normalize so that structural equality never has to compare across variants.
#[derive(Debug, Clone)]
pub enum NumericType {
    Int(i64),
    BigInt(Rc<BigInteger>),
    Float(f64),
}

impl NumericType {
    pub fn from_big(n: BigInteger) -> Self {
        match n.to_i64() {
            Some(small) => NumericType::Int(small),
            None => NumericType::BigInt(Rc::new(n)),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericType::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            NumericType::Int(n) => *n as f64,
            NumericType::BigInt(n) => n.to_f64().unwrap_or(f64::NAN),
            NumericType::Float(x) => *x,
        }
    }

    /// Read a number from its printed text.
    ///
    /// Accepts `[+-]digits`, decimals with a fraction and/or exponent, and the
    /// `e+NaN` / `e+INF` suffixes the printer emits for non-finite floats.
    /// Anything else (including bare `inf` or `nan`) is not a number.
    pub fn parse(text: &str) -> Option<NumericType> {
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        if let Some(mantissa) = body.strip_suffix("e+NaN") {
            return is_decimal(mantissa).then_some(NumericType::Float(f64::NAN));
        }
        if let Some(mantissa) = body.strip_suffix("e+INF") {
            let inf = if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            return is_decimal(mantissa).then_some(NumericType::Float(inf));
        }

        if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
            return match text.parse::<i64>() {
                Ok(n) => Some(NumericType::Int(n)),
                Err(_) => text.parse::<BigInteger>().ok().map(NumericType::from_big),
            };
        }

        if is_float_literal(body) {
            return text.parse::<f64>().ok().map(NumericType::Float);
        }

        None
    }
}

/// `digits[.digits]` with at least one digit overall
fn is_decimal(text: &str) -> bool {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    !(int_part.is_empty() && frac_part.is_empty()) && digits(int_part) && digits(frac_part)
}

/// A decimal with a fractional part, an exponent, or both
fn is_float_literal(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(i) => (&text[..i], Some(&text[i + 1..])),
        None => (text, None),
    };
    if !is_decimal(mantissa) {
        return false;
    }
    match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && exp.bytes().all(|b| b.is_ascii_digit())
        }
        // "12." reads as a float here; a plain integer has no dot
        None => mantissa.contains('.'),
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumericType::Int(n) => write!(f, "{n}"),
            NumericType::BigInt(n) => write!(f, "{n}"),
            NumericType::Float(x) => {
                if x.is_nan() {
                    write!(f, "0.0e+NaN")
                } else if x.is_infinite() {
                    let sign = if *x > 0.0 { "" } else { "-" };
                    write!(f, "{sign}1.0e+INF")
                } else {
                    // Debug keeps a '.' or exponent so the text reads back as a float
                    write!(f, "{x:?}")
                }
            }
        }
    }
}

// ============================================================================
// Equality
// ============================================================================

impl PartialEq for NumericType {
    fn eq(&self, other: &Self) -> bool {
        use NumericType::*;

        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            // Bitwise, so NaN equals itself and a printed NaN reads back equal
            (Float(a), Float(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl Eq for NumericType {}

impl Hash for NumericType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use NumericType::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Int(n) => n.hash(state),
            BigInt(n) => n.hash(state),
            Float(x) => {
                if x.is_nan() {
                    u64::MAX.hash(state);
                } else {
                    x.to_bits().hash(state);
                }
            }
        }
    }
}
