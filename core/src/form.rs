//! Conversion between Rust values and printed forms.
//!
//! `ToForm` and `FromForm` are the seam that lets records, alists and plain
//! Rust data share one on-disk representation. Conversions are structural:
//! `Vec<T>` is a list, `Option<T>` is the value or `nil`, a pair is a cons.

use std::path::PathBuf;

use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::interner::Symbol;
use crate::language::{AtomType, Value, cons, list};
use crate::numeric::NumericType;

pub trait ToForm {
    fn to_form(&self) -> Value;
}

pub trait FromForm: Sized {
    fn from_form(form: &Value) -> Result<Self>;
}

impl ToForm for Value {
    fn to_form(&self) -> Value {
        self.clone()
    }
}

impl FromForm for Value {
    fn from_form(form: &Value) -> Result<Self> {
        Ok(form.clone())
    }
}

impl<T: ToForm + ?Sized> ToForm for &T {
    fn to_form(&self) -> Value {
        (**self).to_form()
    }
}

// ============================================================================
// Atoms
// ============================================================================

impl ToForm for i64 {
    fn to_form(&self) -> Value {
        Value::int(*self)
    }
}

impl FromForm for i64 {
    fn from_form(form: &Value) -> Result<Self> {
        form.as_number()
            .and_then(NumericType::as_i64)
            .ok_or_else(|| Error::shape("integer", form))
    }
}

impl ToForm for usize {
    fn to_form(&self) -> Value {
        match i64::try_from(*self) {
            Ok(n) => Value::int(n),
            Err(_) => Value::Atom(AtomType::Number(NumericType::from_big(BigInt::from(*self)))),
        }
    }
}

impl FromForm for usize {
    fn from_form(form: &Value) -> Result<Self> {
        let n = BigInt::from_form(form)?;
        usize::try_from(&n).map_err(|_| Error::shape("usize", form))
    }
}

impl ToForm for BigInt {
    fn to_form(&self) -> Value {
        Value::Atom(AtomType::Number(NumericType::from_big(self.clone())))
    }
}

impl FromForm for BigInt {
    fn from_form(form: &Value) -> Result<Self> {
        match form.as_number() {
            Some(NumericType::Int(n)) => Ok(BigInt::from(*n)),
            Some(NumericType::BigInt(n)) => Ok((**n).clone()),
            _ => Err(Error::shape("integer", form)),
        }
    }
}

impl ToForm for f64 {
    fn to_form(&self) -> Value {
        Value::float(*self)
    }
}

impl FromForm for f64 {
    fn from_form(form: &Value) -> Result<Self> {
        form.as_number()
            .map(NumericType::as_f64)
            .ok_or_else(|| Error::shape("number", form))
    }
}

impl ToForm for bool {
    fn to_form(&self) -> Value {
        Value::from(*self)
    }
}

impl FromForm for bool {
    /// Anything but nil is true
    fn from_form(form: &Value) -> Result<Self> {
        Ok(!form.is_nil())
    }
}

impl ToForm for str {
    fn to_form(&self) -> Value {
        Value::string(self)
    }
}

impl ToForm for String {
    fn to_form(&self) -> Value {
        Value::string(self.as_str())
    }
}

impl FromForm for String {
    fn from_form(form: &Value) -> Result<Self> {
        form.as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::shape("string", form))
    }
}

impl ToForm for PathBuf {
    fn to_form(&self) -> Value {
        Value::string(self.to_string_lossy())
    }
}

impl FromForm for PathBuf {
    fn from_form(form: &Value) -> Result<Self> {
        String::from_form(form).map(PathBuf::from)
    }
}

impl ToForm for Symbol {
    fn to_form(&self) -> Value {
        Value::Atom(AtomType::Symbol(*self))
    }
}

impl FromForm for Symbol {
    fn from_form(form: &Value) -> Result<Self> {
        form.as_symbol().ok_or_else(|| Error::shape("symbol", form))
    }
}

// ============================================================================
// Compound
// ============================================================================

impl<T: ToForm> ToForm for Option<T> {
    fn to_form(&self) -> Value {
        match self {
            Some(v) => v.to_form(),
            None => Value::Nil,
        }
    }
}

impl<T: FromForm> FromForm for Option<T> {
    fn from_form(form: &Value) -> Result<Self> {
        match form {
            Value::Nil => Ok(None),
            other => T::from_form(other).map(Some),
        }
    }
}

impl<T: ToForm> ToForm for [T] {
    fn to_form(&self) -> Value {
        list(self.iter().map(ToForm::to_form))
    }
}

impl<T: ToForm> ToForm for Vec<T> {
    fn to_form(&self) -> Value {
        self.as_slice().to_form()
    }
}

/// Accepts a proper list or a vector
impl<T: FromForm> FromForm for Vec<T> {
    fn from_form(form: &Value) -> Result<Self> {
        match form {
            Value::Vector(items) => items.iter().map(T::from_form).collect(),
            other => other.to_vec()?.iter().map(T::from_form).collect(),
        }
    }
}

impl<A: ToForm, B: ToForm> ToForm for (A, B) {
    fn to_form(&self) -> Value {
        cons(self.0.to_form(), self.1.to_form())
    }
}

impl<A: FromForm, B: FromForm> FromForm for (A, B) {
    fn from_form(form: &Value) -> Result<Self> {
        match form {
            Value::Cons(cell) => Ok((A::from_form(&cell.car)?, B::from_form(&cell.cdr)?)),
            other => Err(Error::shape("cons pair", other)),
        }
    }
}
