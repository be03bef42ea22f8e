//! Ordered association lists.
//!
//! An [`Alist`] is a sequence of key/value pairs searched front to back; the
//! first pair with an equal key is the live one. Updates return a new alist
//! and leave the receiver untouched. The pairs live in an `im::Vector`, so
//! those copies share structure instead of duplicating the list.
//!
//! Insertion policy: [`Alist::put`] replaces an existing key in place and
//! *prepends* a new key. Consumers that iterate alists see the most recently
//! added key first.

use im::Vector;

use crate::error::{Error, Result};
use crate::form::{FromForm, ToForm};
use crate::language::{Value, list};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alist<K: Clone, V: Clone> {
    pairs: Vector<(K, V)>,
}

impl<K: Clone, V: Clone> Default for Alist<K, V> {
    fn default() -> Self {
        Alist {
            pairs: Vector::new(),
        }
    }
}

/// Build an alist from `key => value` arguments, preserving their order.
///
/// ```
/// use wgutil::alist;
///
/// let m = alist!["name" => 1, "uid" => 2];
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec!["name", "uid"]);
/// ```
#[macro_export]
macro_rules! alist {
    () => { $crate::alist::Alist::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::alist::Alist::make_mapping([$(($key, $value)),+])
    };
}

impl<K: Clone, V: Clone> Alist<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alist with `pairs` in input order. Duplicate keys are kept; the
    /// earliest one shadows the rest.
    pub fn make_mapping<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Alist {
            pairs: pairs.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.pairs.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.pairs.iter().map(|(_, v)| v)
    }

    /// New alist holding the same pairs. Values are cloned, not deep-copied
    /// beyond what their own `Clone` does.
    pub fn copy_shallow(&self) -> Self {
        self.clone()
    }
}

impl<K: Clone + PartialEq, V: Clone> Alist<K, V> {
    fn index_of(&self, key: &K) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| k == key)
    }

    /// Value of the first pair whose key equals `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).cloned().unwrap_or(default)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index_of(key).is_some()
    }

    /// Alist with `key` bound to `value`: replaced in place when present,
    /// prepended otherwise.
    pub fn put(&self, key: K, value: V) -> Self {
        let pairs = match self.index_of(&key) {
            Some(i) => self.pairs.update(i, (key, value)),
            None => {
                let mut pairs = self.pairs.clone();
                pairs.push_front((key, value));
                pairs
            }
        };
        Alist { pairs }
    }

    /// Alist without the first pair for `key`; unchanged if absent
    pub fn remove(&self, key: &K) -> Self {
        let mut pairs = self.pairs.clone();
        if let Some(i) = self.index_of(key) {
            pairs.remove(i);
        }
        Alist { pairs }
    }

    /// Look up every key and hand the results to `body` positionally.
    ///
    /// Local names are whatever the caller's pattern calls them, so a name
    /// can differ from the key it reads. Missing keys come through as `None`.
    ///
    /// ```
    /// use wgutil::alist;
    ///
    /// let session = alist!["name" => "work", "file" => "~/.wg"];
    /// let label = session.destructure_bind(["name", "dirty"], |[name, dirty]| {
    ///     format!("{}{}", name.unwrap_or(&""), if dirty.is_some() { "*" } else { "" })
    /// });
    /// assert_eq!(label, "work");
    /// ```
    pub fn destructure_bind<const N: usize, R>(
        &self,
        keys: [K; N],
        body: impl FnOnce([Option<&V>; N]) -> R,
    ) -> R {
        let found = keys.map(|key| self.get(&key));
        body(found)
    }
}

impl<K: Clone, V: Clone> FromIterator<(K, V)> for Alist<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::make_mapping(iter)
    }
}

// ============================================================================
// Printed Form
// ============================================================================

/// `((key . value) ...)`
impl<K: Clone + ToForm, V: Clone + ToForm> ToForm for Alist<K, V> {
    fn to_form(&self) -> Value {
        list(self.pairs.iter().map(|pair| pair.to_form()))
    }
}

impl<K: Clone + FromForm, V: Clone + FromForm> FromForm for Alist<K, V> {
    fn from_form(form: &Value) -> Result<Self> {
        let items = form
            .to_vec()
            .map_err(|_| Error::shape("association list", form))?;
        items
            .iter()
            .map(<(K, V)>::from_form)
            .collect::<Result<Vector<_>>>()
            .map(|pairs| Alist { pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::Symbol;
    use crate::parser::parse;

    #[test]
    fn test_make_mapping_preserves_order() {
        let m = alist!["a" => 1, "b" => 2, "c" => 3];
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_get_first_match_wins() {
        let m = Alist::make_mapping([("a", 1), ("a", 2)]);
        assert_eq!(m.get(&"a"), Some(&1));
        assert_eq!(m.get(&"z"), None);
        assert_eq!(m.get_or(&"z", 9), 9);
    }

    #[test]
    fn test_put_replaces_in_place() {
        let m = alist!["a" => 1, "b" => 2, "c" => 3];
        let updated = m.put("b", 20);
        assert_eq!(updated.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), vec![
            ("a", 1),
            ("b", 20),
            ("c", 3)
        ]);
        // receiver untouched
        assert_eq!(m.get(&"b"), Some(&2));
    }

    #[test]
    fn test_put_prepends_new_key() {
        let m = alist!["a" => 1].put("b", 2);
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_first_only() {
        let m = Alist::make_mapping([("a", 1), ("b", 2), ("a", 3)]);
        let removed = m.remove(&"a");
        assert_eq!(removed.get(&"a"), Some(&3));
        assert_eq!(removed.len(), 2);
        assert_eq!(m.remove(&"zz"), m);
    }

    #[test]
    fn test_copy_shallow_is_independent() {
        let m = alist!["a" => vec![1]];
        let copy = m.copy_shallow();
        let changed = copy.put("a", vec![2]);
        assert_eq!(m.get(&"a"), Some(&vec![1]));
        assert_eq!(changed.get(&"a"), Some(&vec![2]));
    }

    #[test]
    fn test_destructure_bind_missing_keys() {
        let m = alist!["x" => 1, "y" => 2];
        let sum = m.destructure_bind(["x", "y", "z"], |[x, y, z]| {
            x.copied().unwrap_or(0) + y.copied().unwrap_or(0) + z.copied().unwrap_or(100)
        });
        assert_eq!(sum, 103);
    }

    #[test]
    fn test_printed_form() {
        let m = alist![Symbol::new("name") => "work".to_string(), Symbol::new("uid") => "0A".to_string()];
        let form = m.to_form();
        assert_eq!(form.to_string(), "((name . \"work\") (uid . \"0A\"))");
        let back: Alist<Symbol, String> = FromForm::from_form(&parse(&form.to_string()).unwrap()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_from_form_rejects_non_pairs() {
        let result = Alist::<Symbol, i64>::from_form(&parse("(a b)").unwrap());
        assert!(result.is_err());
    }
}
