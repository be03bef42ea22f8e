//! Reading and writing one printed form per file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::form::{FromForm, ToForm};
use crate::language::Value;
use crate::parser::parse;

/// Print `value` in full and write it to `path`, replacing any existing file.
pub fn write_form<T: ToForm + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = value.to_form().to_string();

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.write_all(b"\n")?;
    // Flush explicitly so a failed write is reported instead of lost in drop
    writer.flush()?;

    debug!(path = %path.display(), bytes = text.len() + 1, "Wrote form");
    Ok(())
}

/// Read `path` and parse exactly one form from it
pub fn read_form(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "Read form");
    parse(&text)
}

/// [`read_form`] followed by conversion to `T`
pub fn read_form_as<T: FromForm>(path: impl AsRef<Path>) -> Result<T> {
    T::from_form(&read_form(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::language::list;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.el");
        let value = list([Value::symbol("a"), Value::string("b"), Value::int(3)]);
        write_form(&value, &path).unwrap();
        assert_eq!(read_form(&path).unwrap(), value);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.el");
        write_form(&Value::string("a much longer first value"), &path).unwrap();
        write_form(&Value::int(1), &path).unwrap();
        assert_eq!(read_form(&path).unwrap(), Value::int(1));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_form(dir.path().join("absent.el"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_read_malformed_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.el");
        fs::write(&path, "(unclosed").unwrap();
        assert!(matches!(read_form(&path), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_read_form_as() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nums.el");
        write_form(&vec![1i64, 2, 3], &path).unwrap();
        let nums: Vec<i64> = read_form_as(&path).unwrap();
        assert_eq!(nums, vec![1, 2, 3]);
    }
}
