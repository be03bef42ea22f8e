//! Positional and cyclic operations over ordered sequences.
//!
//! Inputs are slices; operations that rearrange return fresh `Vec`s and never
//! touch their argument. Cyclic indices resolve with a true modulo, so negative
//! offsets walk backwards. "Not present" outcomes are `None`; bound violations
//! are [`Error::OutOfRange`].

use std::iter::FusedIterator;

use crate::error::{Error, Result};

// ============================================================================
// Matching Options
// ============================================================================

/// Equality and key extraction used by the matching operations.
///
/// Two elements match when `equality(key(a), key(b))` holds. The default is
/// `PartialEq` on the elements themselves.
pub struct Opts<'f, T, K = T> {
    pub equality: Box<dyn Fn(&K, &K) -> bool + 'f>,
    pub key: Box<dyn Fn(&T) -> K + 'f>,
}

impl<'f, T: PartialEq + Clone + 'f> Default for Opts<'f, T> {
    fn default() -> Self {
        Opts {
            equality: Box::new(|a: &T, b: &T| a == b),
            key: Box::new(T::clone),
        }
    }
}

impl<'f, T: Clone + 'f> Opts<'f, T> {
    /// Compare whole elements with a custom equality
    pub fn with_equality(equality: impl Fn(&T, &T) -> bool + 'f) -> Self {
        Opts {
            equality: Box::new(equality),
            key: Box::new(T::clone),
        }
    }
}

impl<'f, T, K: PartialEq + 'f> Opts<'f, T, K> {
    /// Compare `key(element)` with `PartialEq`
    pub fn by_key(key: impl Fn(&T) -> K + 'f) -> Self {
        Opts {
            equality: Box::new(|a: &K, b: &K| a == b),
            key: Box::new(key),
        }
    }
}

impl<'f, T, K> Opts<'f, T, K> {
    /// Replace the equality, keeping the key function
    pub fn equality(mut self, equality: impl Fn(&K, &K) -> bool + 'f) -> Self {
        self.equality = Box::new(equality);
        self
    }

    fn matches(&self, a: &T, b: &T) -> bool {
        (self.equality)(&(self.key)(a), &(self.key)(b))
    }
}

// ============================================================================
// Partitioning
// ============================================================================

/// Lazy partitions of a slice. Cloning restarts from the current point, and
/// the iterator holds only a cursor, so input length never affects stack use.
#[derive(Debug)]
pub struct Partitions<'a, T> {
    seq: &'a [T],
    start: usize,
    n: usize,
    step: usize,
}

// Manual impl: the cursor is cloneable even when T is not
impl<T> Clone for Partitions<'_, T> {
    fn clone(&self) -> Self {
        Partitions { ..*self }
    }
}

impl<'a, T> Iterator for Partitions<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.seq.len() {
            return None;
        }
        let end = self.start.saturating_add(self.n).min(self.seq.len());
        let chunk = &self.seq[self.start..end];
        self.start = self.start.saturating_add(self.step);
        Some(chunk)
    }
}

impl<T> FusedIterator for Partitions<'_, T> {}

/// Sub-slices of length `n` starting every `step` elements. The last
/// partition is shorter when the input runs out.
pub fn partition<T>(seq: &[T], n: usize, step: usize) -> Result<Partitions<'_, T>> {
    if n == 0 || step == 0 {
        return Err(Error::out_of_range(format!(
            "partition size and step must be positive (n={n}, step={step})"
        )));
    }
    Ok(Partitions {
        seq,
        start: 0,
        n,
        step,
    })
}

/// Consecutive pairs, the common case of [`partition`]
pub fn partition2<T>(seq: &[T]) -> Partitions<'_, T> {
    Partitions {
        seq,
        start: 0,
        n: 2,
        step: 2,
    }
}

// ============================================================================
// Prefixes, Suffixes, Ranges
// ============================================================================

pub fn take_first<T>(seq: &[T], n: usize) -> &[T] {
    &seq[..n.min(seq.len())]
}

pub fn take_last<T>(seq: &[T], n: usize) -> &[T] {
    &seq[seq.len() - n.min(seq.len())..]
}

/// `n` counts from the end: 0 is the last element
pub fn nth_from_end<T>(seq: &[T], n: usize) -> Result<&T> {
    seq.len()
        .checked_sub(n)
        .and_then(|rest| rest.checked_sub(1))
        .map(|i| &seq[i])
        .ok_or_else(|| {
            Error::out_of_range(format!(
                "index {n} from end of sequence of length {}",
                seq.len()
            ))
        })
}

/// Longest prefix satisfying `pred`; `pred` is not called past the first failure
pub fn take_while<T>(mut pred: impl FnMut(&T) -> bool, seq: &[T]) -> &[T] {
    let end = seq.iter().position(|x| !pred(x)).unwrap_or(seq.len());
    &seq[..end]
}

/// Integers in `[start, end)`
pub fn range(start: i64, end: i64) -> Vec<i64> {
    (start..end).collect()
}

pub fn last_element<T>(seq: &[T]) -> Option<&T> {
    seq.last()
}

// ============================================================================
// Rotation
// ============================================================================

/// Move the first `offset mod len` elements to the end. Negative offsets
/// rotate the other way.
pub fn rotate<T: Clone>(seq: &[T], offset: isize) -> Vec<T> {
    if seq.is_empty() {
        return Vec::new();
    }
    let k = offset.rem_euclid(seq.len() as isize) as usize;
    let mut out = Vec::with_capacity(seq.len());
    out.extend_from_slice(&seq[k..]);
    out.extend_from_slice(&seq[..k]);
    out
}

pub fn rotate1<T: Clone>(seq: &[T]) -> Vec<T> {
    rotate(seq, 1)
}

/// Rotate so the original first element sits at the middle index, or just
/// before the middle for even lengths.
pub fn center_rotate<T: Clone>(seq: &[T]) -> Vec<T> {
    if seq.is_empty() {
        return Vec::new();
    }
    let middle = (seq.len() - 1) / 2;
    rotate(seq, -(middle as isize))
}

// ============================================================================
// Positional Insertion and Movement
// ============================================================================

/// Insert `elt` after the element at `index`
pub fn insert_after<T: Clone>(elt: T, seq: &[T], index: usize) -> Result<Vec<T>> {
    if index >= seq.len() {
        return Err(Error::out_of_range(format!(
            "insert after index {index} in sequence of length {}",
            seq.len()
        )));
    }
    let mut out = seq.to_vec();
    out.insert(index + 1, elt);
    Ok(out)
}

/// Insert `elt` before the element at `index`; `index == len` appends
pub fn insert_before<T: Clone>(elt: T, seq: &[T], index: usize) -> Result<Vec<T>> {
    if index > seq.len() {
        return Err(Error::out_of_range(format!(
            "insert before index {index} in sequence of length {}",
            seq.len()
        )));
    }
    let mut out = seq.to_vec();
    out.insert(index, elt);
    Ok(out)
}

/// Index of the first element matching `elt`
pub fn position<T, K>(elt: &T, seq: &[T], opts: &Opts<'_, T, K>) -> Option<usize> {
    seq.iter().position(|x| opts.matches(elt, x))
}

/// Copy of `seq` without the first element matching `elt`
pub fn remove_first<T: Clone, K>(elt: &T, seq: &[T], opts: &Opts<'_, T, K>) -> Vec<T> {
    let mut out = seq.to_vec();
    if let Some(i) = position(elt, seq, opts) {
        out.remove(i);
    }
    out
}

/// Remove the first match of `elt`, then insert `elt` before `index` in what
/// remains.
///
/// When `elt` is absent it is inserted at `index` into the unmodified
/// sequence. `index` past the end appends.
pub fn move_element<T: Clone, K>(elt: T, seq: &[T], index: usize, opts: &Opts<'_, T, K>) -> Vec<T> {
    let mut out = remove_first(&elt, seq, opts);
    let index = index.min(out.len());
    out.insert(index, elt);
    out
}

// ============================================================================
// Cyclic Indexing
// ============================================================================

fn cyclic_index(len: usize, n: isize) -> usize {
    n.rem_euclid(len as isize) as usize
}

/// `(pos + n) mod len`, reduced before adding so no `n` can overflow
fn cyclic_step(len: usize, pos: usize, n: isize) -> usize {
    (pos + cyclic_index(len, n)) % len
}

/// Element at `n mod len`
pub fn cyclic_nth<T>(seq: &[T], n: isize) -> Result<&T> {
    if seq.is_empty() {
        return Err(Error::out_of_range("cyclic index into an empty sequence"));
    }
    Ok(&seq[cyclic_index(seq.len(), n)])
}

/// Move `elt` from position `p` to `(p + n) mod len`. `None` when absent.
pub fn cyclic_offset<T: Clone + PartialEq>(elt: &T, seq: &[T], n: isize) -> Option<Vec<T>> {
    let opts = Opts::default();
    let pos = position(elt, seq, &opts)?;
    let target = cyclic_step(seq.len(), pos, n);
    Some(move_element(elt.clone(), seq, target, &opts))
}

/// Element `n` steps from `elt`, wrapping around. `None` when `elt` is absent.
pub fn cyclic_nth_from<'a, T, K>(
    elt: &T,
    seq: &'a [T],
    n: isize,
    opts: &Opts<'_, T, K>,
) -> Option<&'a T> {
    let pos = position(elt, seq, opts)?;
    Some(&seq[cyclic_step(seq.len(), pos, n)])
}

/// Copy with the positions of `a` and `b` exchanged. `None` if either is absent.
pub fn swap<T: Clone + PartialEq>(a: &T, b: &T, seq: &[T]) -> Option<Vec<T>> {
    let i = seq.iter().position(|x| x == a)?;
    let j = seq.iter().position(|x| x == b)?;
    let mut out = seq.to_vec();
    out.swap(i, j);
    Some(out)
}

// ============================================================================
// Duplicates
// ============================================================================

/// First key, scanning left to right, that has a later duplicate
pub fn has_duplicates<T, K>(seq: &[T], opts: &Opts<'_, T, K>) -> Option<K> {
    let mut keys: Vec<K> = seq.iter().map(|x| (opts.key)(x)).collect();
    let first = (0..keys.len()).find(|&i| {
        keys[i + 1..]
            .iter()
            .any(|later| (opts.equality)(&keys[i], later))
    })?;
    Some(keys.swap_remove(first))
}
