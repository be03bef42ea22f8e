use std::fmt;
use std::mem;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::interner::Symbol;
use crate::numeric::NumericType;

// ============================================================================
// Value Tree
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomType {
    Symbol(Symbol),
    Number(NumericType),
    String(String),
    /// The canonical true value, printed as `t`
    T,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsCell {
    pub car: Value,
    pub cdr: Value,
}

// Long lists are chains of cdrs; the default recursive drop would overflow the
// stack on them, so uniquely owned children are unlinked onto a work list.
impl Drop for ConsCell {
    fn drop(&mut self) {
        if !self.car.has_children() && !self.cdr.has_children() {
            return;
        }
        drop_iteratively(vec![mem::take(&mut self.car), mem::take(&mut self.cdr)]);
    }
}

/// Elements of a vector value. Dropped through the same work list as cons
/// cells, so deeply nested vectors are released without recursion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VectorItems(Vec<Value>);

impl Deref for VectorItems {
    type Target = Vec<Value>;

    fn deref(&self) -> &Vec<Value> {
        &self.0
    }
}

impl Drop for VectorItems {
    fn drop(&mut self) {
        if !self.0.iter().any(Value::has_children) {
            return;
        }
        drop_iteratively(mem::take(&mut self.0));
    }
}

fn drop_iteratively(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Cons(rc) => {
                if let Ok(mut cell) = Rc::try_unwrap(rc) {
                    pending.push(mem::take(&mut cell.car));
                    pending.push(mem::take(&mut cell.cdr));
                }
            }
            Value::Vector(rc) => {
                if let Ok(mut items) = Rc::try_unwrap(rc) {
                    pending.append(&mut items.0);
                }
            }
            _ => {}
        }
    }
}

/// A printed-form value: atoms, cons cells (proper and dotted lists) and
/// vectors. Equality is structural.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Atom(AtomType),
    Cons(Rc<ConsCell>),
    Vector(Rc<VectorItems>),
}

impl PartialEq for Value {
    // Iterative for the same reason as ConsCell's drop
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Value::Nil, Value::Nil) => {}
                (Value::Atom(x), Value::Atom(y)) => {
                    if x != y {
                        return false;
                    }
                }
                (Value::Cons(x), Value::Cons(y)) => {
                    if !Rc::ptr_eq(x, y) {
                        pending.push((&x.cdr, &y.cdr));
                        pending.push((&x.car, &y.car));
                    }
                }
                (Value::Vector(x), Value::Vector(y)) => {
                    if x.len() != y.len() {
                        return false;
                    }
                    pending.extend(x.iter().zip(y.iter()).rev());
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Value {}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

impl Value {
    pub fn symbol(name: &str) -> Value {
        Value::Atom(AtomType::Symbol(Symbol::new(name)))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::Atom(AtomType::String(s.into()))
    }

    pub fn int(n: i64) -> Value {
        Value::Atom(AtomType::Number(NumericType::Int(n)))
    }

    pub fn float(x: f64) -> Value {
        Value::Atom(AtomType::Number(NumericType::Float(x)))
    }

    pub fn t() -> Value {
        Value::Atom(AtomType::T)
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(VectorItems(items)))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    fn has_children(&self) -> bool {
        matches!(self, Value::Cons(_) | Value::Vector(_))
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Atom(AtomType::Symbol(s)) => Some(*s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Atom(AtomType::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumericType> {
        match self {
            Value::Atom(AtomType::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Short description used in shape errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Atom(AtomType::Symbol(_)) => "symbol",
            Value::Atom(AtomType::Number(_)) => "number",
            Value::Atom(AtomType::String(_)) => "string",
            Value::Atom(AtomType::T) => "t",
            Value::Cons(_) => "cons",
            Value::Vector(_) => "vector",
        }
    }

    /// Iterate the cars of a list. Stops at the first non-cons tail, so a
    /// dotted list yields its proper prefix.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter { current: self }
    }

    /// Elements of a proper list; errors on a dotted tail or a non-list.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut current = self;
        loop {
            match current {
                Value::Nil => return Ok(items),
                Value::Cons(cell) => {
                    items.push(cell.car.clone());
                    current = &cell.cdr;
                }
                other => return Err(Error::shape("proper list", other)),
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b { Value::t() } else { Value::Nil }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        list(iter)
    }
}

pub struct ListIter<'a> {
    current: &'a Value,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Value::Cons(cell) => {
                self.current = &cell.cdr;
                Some(&cell.car)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Primitive Operations
// ============================================================================

pub fn cons(car: Value, cdr: Value) -> Value {
    Value::Cons(Rc::new(ConsCell { car, cdr }))
}

pub fn car(value: &Value) -> Result<Value> {
    match value {
        Value::Cons(cell) => Ok(cell.car.clone()),
        Value::Nil => Ok(Value::Nil),
        _ => Err(Error::shape("cons cell", value)),
    }
}

pub fn cdr(value: &Value) -> Result<Value> {
    match value {
        Value::Cons(cell) => Ok(cell.cdr.clone()),
        Value::Nil => Ok(Value::Nil),
        _ => Err(Error::shape("cons cell", value)),
    }
}

/// Build a proper list
pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Value {
    list_with_tail(items, Value::Nil)
}

/// Build a list ending in `tail` instead of nil (a dotted list when `tail`
/// is an atom)
pub fn list_with_tail<I: IntoIterator<Item = Value>>(items: I, tail: Value) -> Value {
    let items: Vec<Value> = items.into_iter().collect();
    items
        .into_iter()
        .rev()
        .fold(tail, |acc, val| cons(val, acc))
}

// ============================================================================
// Display Implementation
// ============================================================================

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c => result.push(c),
        }
    }
    result
}

/// Characters that end a symbol token unless escaped
pub(crate) fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | '\'' | ';' | '\\')
}

fn escape_symbol(name: &str) -> String {
    if name.is_empty() {
        return "##".to_string();
    }

    let mut result = String::with_capacity(name.len() + 1);
    // Names that would read back as something other than this symbol
    if name == "nil" || name == "t" || name == "." || NumericType::parse(name).is_some() {
        result.push('\\');
    }
    for (i, c) in name.chars().enumerate() {
        if is_delimiter(c) || (i == 0 && c == '#') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AtomType::Symbol(s) => s.with_str(|name| f.write_str(&escape_symbol(name))),
            AtomType::Number(n) => write!(f, "{n}"),
            AtomType::String(s) => write!(f, "\"{}\"", escape_string(s)),
            AtomType::T => f.write_str("t"),
        }
    }
}

enum PrintStep<'a> {
    Value(&'a Value),
    Text(&'static str),
    /// The cdr of a cons whose car has already been printed
    Tail(&'a Value),
}

/// Canonical printed form. Walks the tree with an explicit stack so arbitrarily
/// deep values print without growing the call stack.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack = vec![PrintStep::Value(self)];

        while let Some(step) = stack.pop() {
            match step {
                PrintStep::Text(text) => f.write_str(text)?,
                PrintStep::Value(value) => match value {
                    Value::Nil => f.write_str("nil")?,
                    Value::Atom(atom) => write!(f, "{atom}")?,
                    Value::Cons(cell) => {
                        f.write_str("(")?;
                        stack.push(PrintStep::Tail(&cell.cdr));
                        stack.push(PrintStep::Value(&cell.car));
                    }
                    Value::Vector(items) => {
                        f.write_str("[")?;
                        stack.push(PrintStep::Text("]"));
                        for (i, item) in items.iter().enumerate().rev() {
                            stack.push(PrintStep::Value(item));
                            if i > 0 {
                                stack.push(PrintStep::Text(" "));
                            }
                        }
                    }
                },
                PrintStep::Tail(tail) => match tail {
                    Value::Nil => f.write_str(")")?,
                    Value::Cons(cell) => {
                        f.write_str(" ")?;
                        stack.push(PrintStep::Tail(&cell.cdr));
                        stack.push(PrintStep::Value(&cell.car));
                    }
                    other => {
                        f.write_str(" . ")?;
                        stack.push(PrintStep::Text(")"));
                        stack.push(PrintStep::Value(other));
                    }
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_proper_list() {
        let v = list([Value::int(1), Value::int(2), Value::int(3)]);
        assert_eq!(v.to_string(), "(1 2 3)");
    }

    #[test]
    fn test_display_dotted_pair() {
        let v = cons(Value::symbol("x"), Value::int(1));
        assert_eq!(v.to_string(), "(x . 1)");
    }

    #[test]
    fn test_display_dotted_list() {
        let v = list_with_tail([Value::int(1), Value::int(2)], Value::int(3));
        assert_eq!(v.to_string(), "(1 2 . 3)");
    }

    #[test]
    fn test_display_vector_and_nesting() {
        let v = Value::vector(vec![
            Value::string("a b"),
            list([Value::t(), Value::Nil]),
            Value::vector(vec![]),
        ]);
        assert_eq!(v.to_string(), "[\"a b\" (t nil) []]");
    }

    #[test]
    fn test_display_escapes_strings() {
        let v = Value::string("say \"hi\"\n\\");
        assert_eq!(v.to_string(), r#""say \"hi\"\n\\""#);
    }

    #[test]
    fn test_display_escapes_ambiguous_symbols() {
        assert_eq!(Value::symbol("12").to_string(), "\\12");
        assert_eq!(Value::symbol("nil").to_string(), "\\nil");
        assert_eq!(Value::symbol("a b").to_string(), "a\\ b");
        assert_eq!(Value::symbol("").to_string(), "##");
        assert_eq!(Value::symbol("#x").to_string(), "\\#x");
        assert_eq!(Value::symbol("wg-win").to_string(), "wg-win");
    }

    #[test]
    fn test_display_deep_nesting_does_not_recurse() {
        let mut v = Value::Nil;
        for _ in 0..100_000 {
            v = list([v]);
        }
        let printed = v.to_string();
        assert!(printed.starts_with("(((("));
        assert_eq!(printed.len(), 100_000 * 2 + 3);
    }

    #[test]
    fn test_long_list_compares_and_drops() {
        let a = list((0..200_000).map(Value::int));
        let b = list((0..200_000).map(Value::int));
        assert_eq!(a, b);
        assert_ne!(a, list((0..199_999).map(Value::int)));
    }

    #[test]
    fn test_to_vec_rejects_dotted() {
        let v = cons(Value::int(1), Value::int(2));
        assert!(v.to_vec().is_err());
        assert_eq!(v.iter().count(), 1);
    }

    #[test]
    fn test_car_cdr_of_nil() {
        assert_eq!(car(&Value::Nil).unwrap(), Value::Nil);
        assert_eq!(cdr(&Value::Nil).unwrap(), Value::Nil);
        assert!(car(&Value::int(1)).is_err());
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(Value::from(true), Value::t());
        assert_eq!(Value::from(false), Value::Nil);
    }
}
