//! Namespaced record families.
//!
//! A namespace is a zero-sized tag type carrying a prefix (`namespace!`). A
//! record is a plain struct declared with `defrecord!` inside a namespace; the
//! macro generates the struct, its defaults and a [`Record`] impl. The
//! constructor, copy and field access are the generic functions in this
//! module, so two families that both define a `win` record stay distinct by
//! type and by printed head (`wg-win` vs `ui-win`).
//!
//! Printed form: `(wg-win (edges 0 0 80 24) (buffer . "*scratch*"))`, i.e.
//! the qualified name followed by one `(field . value)` pair per field.

use tracing::warn;

use crate::error::{Error, Result};
use crate::form::ToForm;
use crate::interner::Symbol;
use crate::language::{Value, cons, list};

pub trait Namespace {
    const PREFIX: &'static str;
}

pub trait Record: Clone + Default {
    type Namespace: Namespace;
    /// Record name within its namespace
    const NAME: &'static str;
    /// Field names as declared (snake_case)
    const FIELDS: &'static [&'static str];

    /// Printed value of `field`, or `None` for an unknown field
    fn get_field(&self, field: &str) -> Option<Value>;

    /// Set `field` from a printed value. `Ok(false)` for an unknown field.
    fn set_field(&mut self, field: &str, value: &Value) -> Result<bool>;
}

/// Declare a namespace tag type.
///
/// ```
/// wgutil::namespace!(pub Wg = "wg");
/// assert_eq!(<Wg as wgutil::record::Namespace>::PREFIX, "wg");
/// ```
#[macro_export]
macro_rules! namespace {
    ($(#[$meta:meta])* $vis:vis $name:ident = $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis struct $name;

        impl $crate::record::Namespace for $name {
            const PREFIX: &'static str = $prefix;
        }
    };
}

/// Declare a record in a namespace.
///
/// Every field needs a type implementing `ToForm`, `FromForm`, `Clone`,
/// `PartialEq` and `Debug`, and a default expression.
///
/// ```
/// use wgutil::{defrecord, namespace, record};
///
/// namespace!(pub Wg = "wg");
///
/// defrecord! {
///     /// A window in a saved layout
///     pub struct Win in Wg as "win" {
///         pub edges: Vec<i64> = vec![0, 0, 80, 24],
///         pub buffer: Option<String> = None,
///     }
/// }
///
/// let w = record::make(|w: &mut Win| w.buffer = Some("*scratch*".into()));
/// assert_eq!(record::qualified_name::<Win>(), "wg-win");
/// assert_eq!(w.edges, vec![0, 0, 80, 24]);
/// ```
#[macro_export]
macro_rules! defrecord {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident in $ns:ty as $tag:literal {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                $name {
                    $( $field: $default, )*
                }
            }
        }

        impl $crate::record::Record for $name {
            type Namespace = $ns;
            const NAME: &'static str = $tag;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            fn get_field(&self, field: &str) -> ::std::option::Option<$crate::language::Value> {
                $(
                    if field == stringify!($field) {
                        return ::std::option::Option::Some($crate::form::ToForm::to_form(&self.$field));
                    }
                )*
                ::std::option::Option::None
            }

            fn set_field(
                &mut self,
                field: &str,
                value: &$crate::language::Value,
            ) -> $crate::error::Result<bool> {
                $(
                    if field == stringify!($field) {
                        self.$field = $crate::form::FromForm::from_form(value)?;
                        return ::std::result::Result::Ok(true);
                    }
                )*
                let _ = value;
                ::std::result::Result::Ok(false)
            }
        }

        impl $crate::form::ToForm for $name {
            fn to_form(&self) -> $crate::language::Value {
                $crate::record::to_form(self)
            }
        }

        impl $crate::form::FromForm for $name {
            fn from_form(form: &$crate::language::Value) -> $crate::error::Result<Self> {
                $crate::record::from_form(form)
            }
        }
    };
}

/// `prefix-name`, the record's printed head
pub fn qualified_name<R: Record>() -> String {
    format!("{}-{}", <R::Namespace as Namespace>::PREFIX, R::NAME)
}

/// A record with default fields, then adjusted by `init`
pub fn make<R: Record>(init: impl FnOnce(&mut R)) -> R {
    let mut record = R::default();
    init(&mut record);
    record
}

/// Keyword-style constructor: unnamed fields keep their defaults, an unknown
/// field name is an error.
pub fn make_from<R: Record>(fields: &[(&str, Value)]) -> Result<R> {
    let mut record = R::default();
    for (name, value) in fields {
        if !record.set_field(name, value)? {
            return Err(Error::shape(
                format!("a field of {}", qualified_name::<R>()),
                name,
            ));
        }
    }
    Ok(record)
}

/// Independent shallow copy
pub fn copy<R: Record>(record: &R) -> R {
    record.clone()
}

/// Printed value of a field by name
pub fn field<R: Record>(record: &R, name: &str) -> Option<Value> {
    record.get_field(name)
}

fn printed_field(name: &str) -> String {
    name.replace('_', "-")
}

pub fn to_form<R: Record>(record: &R) -> Value {
    let head = Symbol::new(&qualified_name::<R>()).to_form();
    let fields = R::FIELDS.iter().map(|name| {
        let value = record.get_field(name).unwrap_or_default();
        cons(Value::symbol(&printed_field(name)), value)
    });
    cons(head, list(fields))
}

/// Rebuild a record from its printed form. Fields missing from the form keep
/// their defaults; unknown fields are skipped with a warning.
pub fn from_form<R: Record>(form: &Value) -> Result<R> {
    let expected = qualified_name::<R>();
    let items = form.to_vec().map_err(|_| Error::shape(&expected, form))?;
    let (head, pairs) = items
        .split_first()
        .ok_or_else(|| Error::shape(&expected, form))?;
    if !head.as_symbol().is_some_and(|s| s.is(&expected)) {
        return Err(Error::shape(&expected, head));
    }

    let mut record = R::default();
    for pair in pairs {
        let Value::Cons(cell) = pair else {
            return Err(Error::shape("(field . value)", pair));
        };
        let name = cell
            .car
            .as_symbol()
            .ok_or_else(|| Error::shape("field name", &cell.car))?
            .name()
            .replace('-', "_");
        if !record.set_field(&name, &cell.cdr)? {
            warn!(record = %expected, field = %name, "Skipping unknown record field");
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FromForm;
    use crate::parser::parse;

    crate::namespace!(Wg = "wg");
    crate::namespace!(Ui = "ui");

    crate::defrecord! {
        struct Win in Wg as "win" {
            edges: Vec<i64> = vec![0, 0, 80, 24],
            buffer: Option<String> = None,
            dedicated: bool = false,
        }
    }

    crate::defrecord! {
        struct UiWin in Ui as "win" {
            title: String = String::new(),
        }
    }

    crate::defrecord! {
        struct Wconfig in Wg as "wconfig" {
            name: String = "untitled".to_string(),
            min_width: i64 = 10,
            windows: Vec<Win> = Vec::new(),
        }
    }

    #[test]
    fn test_make_uses_defaults() {
        let w: Win = make(|_| {});
        assert_eq!(w.edges, vec![0, 0, 80, 24]);
        assert_eq!(w.buffer, None);
    }

    #[test]
    fn test_qualified_names_differ_by_namespace() {
        assert_eq!(qualified_name::<Win>(), "wg-win");
        assert_eq!(qualified_name::<UiWin>(), "ui-win");
    }

    #[test]
    fn test_equal_but_independent() {
        let a: Win = make(|w: &mut Win| w.buffer = Some("a".into()));
        let mut b = copy(&a);
        assert_eq!(a, b);
        b.edges.push(1);
        assert_ne!(a, b);
        assert_eq!(a.edges.len(), 4);
    }

    #[test]
    fn test_make_from_keywords() {
        let w: Win = make_from(&[("buffer", Value::string("*Messages*")), ("dedicated", Value::t())]).unwrap();
        assert_eq!(w.buffer.as_deref(), Some("*Messages*"));
        assert!(w.dedicated);
        assert!(make_from::<Win>(&[("nope", Value::Nil)]).is_err());
    }

    #[test]
    fn test_field_accessor() {
        let w: Win = make(|w: &mut Win| w.buffer = Some("x".into()));
        assert_eq!(field(&w, "buffer"), Some(Value::string("x")));
        assert_eq!(field(&w, "missing"), None);
    }

    #[test]
    fn test_printed_form() {
        let w: Win = make(|w: &mut Win| w.buffer = Some("*scratch*".into()));
        assert_eq!(
            w.to_form().to_string(),
            "(wg-win (edges 0 0 80 24) (buffer . \"*scratch*\") (dedicated))"
        );
    }

    #[test]
    fn test_nested_records_round_trip() {
        let wc: Wconfig = make(|c: &mut Wconfig| {
            c.name = "editing".into();
            c.min_width = 3;
            c.windows = vec![make(|w: &mut Win| w.dedicated = true), make(|_| {})];
        });
        let printed = wc.to_form().to_string();
        assert!(printed.contains("(min-width . 3)"));
        let back = Wconfig::from_form(&parse(&printed).unwrap()).unwrap();
        assert_eq!(back, wc);
    }

    #[test]
    fn test_from_form_checks_namespace() {
        let w: Win = make(|_| {});
        let form = w.to_form();
        assert!(UiWin::from_form(&form).is_err());
    }

    #[test]
    fn test_from_form_missing_and_unknown_fields() {
        let w = Win::from_form(&parse("(wg-win (buffer . \"b\") (color . red))").unwrap()).unwrap();
        assert_eq!(w.buffer.as_deref(), Some("b"));
        assert_eq!(w.edges, vec![0, 0, 80, 24]);
    }

    #[test]
    fn test_from_form_bad_field_value() {
        let result = Win::from_form(&parse("(wg-win (edges . \"wide\"))").unwrap());
        assert!(result.is_err());
    }
}
