//! Support library for editor session management
//!
//! This crate holds the generic layer a session manager is built on:
//! binding combinators, sequence and cyclic-index utilities, ordered
//! association lists, namespaced records, base-36 ids, and a canonical
//! s-expression format for saving all of it to disk. Host editor wrappers live
//! in the `wghost` crate.

pub mod alist;
pub mod base36;
pub mod binding;
pub mod error;
pub mod form;
pub mod interner;
pub mod language;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod persist;
pub mod record;
pub mod sequence;

// Re-export commonly used items for convenience
pub use alist::Alist;
pub use base36::{decode_base36, encode_base36, generate_uid};
pub use binding::{AAnd, ACond, Binding, Truthy, aif, awhen, guarded_bind};
pub use error::{Error, Result};
pub use form::{FromForm, ToForm};
pub use interner::Symbol;
pub use language::{AtomType, ConsCell, Value, cons, list};
pub use numeric::NumericType;
pub use parser::{parse, parse_all};
pub use persist::{read_form, read_form_as, write_form};
pub use record::{Namespace, Record};
pub use sequence::Opts;
