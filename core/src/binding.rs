//! Conditional binding and short-circuit evaluation.
//!
//! Every form takes its branches as closures and hands the tested value to the
//! branch as an explicit parameter (conventionally named `it`). Test
//! expressions run exactly once and strictly left to right; branches that are
//! not taken never run. Nothing here catches anything: a `Result` returned
//! by a branch comes back to the caller untouched.

use crate::language::Value;

/// Values that may be empty. `bind` yields the payload a branch receives when
/// the value is non-empty.
pub trait Binding {
    type Bound;

    fn bind(self) -> Option<Self::Bound>;
}

impl<T> Binding for Option<T> {
    type Bound = T;

    fn bind(self) -> Option<T> {
        self
    }
}

impl Binding for bool {
    type Bound = ();

    fn bind(self) -> Option<()> {
        self.then_some(())
    }
}

impl Binding for Value {
    type Bound = Value;

    fn bind(self) -> Option<Value> {
        (!self.is_nil()).then_some(self)
    }
}

/// An empty list is the empty value
impl<T> Binding for Vec<T> {
    type Bound = Vec<T>;

    fn bind(self) -> Option<Vec<T>> {
        (!self.is_empty()).then_some(self)
    }
}

/// Non-consuming emptiness check, used where the tested value itself is the
/// result (see [`AAnd`]).
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        !self.is_nil()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

/// Evaluate `bind` once; run `then` with its payload or `otherwise` when empty.
pub fn guarded_bind<B, R>(
    bind: impl FnOnce() -> B,
    then: impl FnOnce(B::Bound) -> R,
    otherwise: impl FnOnce() -> R,
) -> R
where
    B: Binding,
{
    match bind().bind() {
        Some(bound) => then(bound),
        None => otherwise(),
    }
}

/// Anaphoric if: `test` is already evaluated, its payload is `it`
pub fn aif<B: Binding, R>(
    test: B,
    then: impl FnOnce(B::Bound) -> R,
    otherwise: impl FnOnce() -> R,
) -> R {
    guarded_bind(|| test, then, otherwise)
}

/// Anaphoric when: `None` if `test` is empty
pub fn awhen<B: Binding, R>(test: B, body: impl FnOnce(B::Bound) -> R) -> Option<R> {
    test.bind().map(body)
}

/// Sequential bindings with short-circuit.
///
/// Each `pattern = expr` is evaluated in order and may refer to the names
/// bound before it. The first empty expression makes the whole form `None`
/// without evaluating the rest; otherwise the body's value is wrapped in
/// `Some`.
///
/// ```
/// use wgutil::all_bind;
///
/// let frames = vec![10, 20, 30];
/// let found = all_bind!(
///     first = frames.first().copied(),
///     next = frames.iter().copied().find(|&f| f > first)
///     => first + next
/// );
/// assert_eq!(found, Some(30));
/// ```
#[macro_export]
macro_rules! all_bind {
    ($name:pat = $expr:expr => $body:expr) => {
        match $crate::binding::Binding::bind($expr) {
            Some($name) => Some($body),
            None => None,
        }
    };
    ($name:pat = $expr:expr, $($rest:tt)+) => {
        match $crate::binding::Binding::bind($expr) {
            Some($name) => $crate::all_bind!($($rest)+),
            None => None,
        }
    };
}

/// Anaphoric cond: clauses are tried in order, the first non-empty test wins
/// and no later test is evaluated.
///
/// ```
/// use wgutil::binding::ACond;
///
/// let mode = ACond::new()
///     .clause(|| None::<&str>, |m| m.to_string())
///     .clause(|| Some("org-mode"), |m| format!("{m}!"))
///     .clause(|| -> Option<&'static str> { unreachable!() }, |m| m.to_string())
///     .finish();
/// assert_eq!(mode.as_deref(), Some("org-mode!"));
/// ```
pub struct ACond<R> {
    result: Option<R>,
}

impl<R> Default for ACond<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ACond<R> {
    pub fn new() -> Self {
        ACond { result: None }
    }

    pub fn clause<B: Binding>(
        self,
        test: impl FnOnce() -> B,
        branch: impl FnOnce(B::Bound) -> R,
    ) -> Self {
        if self.result.is_some() {
            return self;
        }
        ACond {
            result: test().bind().map(branch),
        }
    }

    /// Result of the winning clause, if any
    pub fn finish(self) -> Option<R> {
        self.result
    }

    /// Result of the winning clause, or of `fallback` when none matched
    pub fn otherwise(self, fallback: impl FnOnce() -> R) -> R {
        self.result.unwrap_or_else(fallback)
    }
}

/// Anaphoric and: each step sees the previous value as `it`. Evaluation stops
/// at the first falsy value, which becomes the result; otherwise the result is
/// the last value.
pub struct AAnd<T> {
    value: T,
    stopped: bool,
}

impl<T: Truthy> AAnd<T> {
    pub fn new(first: T) -> Self {
        let stopped = !first.is_truthy();
        AAnd {
            value: first,
            stopped,
        }
    }

    pub fn then(self, step: impl FnOnce(&T) -> T) -> Self {
        if self.stopped {
            return self;
        }
        AAnd::new(step(&self.value))
    }

    pub fn finish(self) -> T {
        self.value
    }
}
