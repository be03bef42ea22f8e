//! Thin wrappers over a host editor's buffers, frames, keymaps and hooks.
//!
//! The session layer never talks to an editor directly. It goes through the
//! [`Host`] and [`Keymap`] traits, and the free functions in this crate add
//! the lookups it needs on top: name-or-handle resolution, filtering of
//! internal buffers, regex search and cyclic frame stepping.
//!
//! [`InMemoryHost`] and [`SparseKeymap`] implement the traits without an
//! editor, for tests and for embedding.

use std::fmt;
use std::path::PathBuf;

use regex::Regex;
use tracing::{debug, trace};
use wgutil::sequence::cyclic_nth_from;
use wgutil::{Error, Opts, Result, Symbol};

pub mod memory;

pub use memory::{BufferId, FrameId, InMemoryHost, SparseKeymap};

/// Buffer, frame and hook access on a host editor.
///
/// Accessors taking a buffer return `None` once that buffer has been killed.
pub trait Host {
    type Buffer: Clone + PartialEq + fmt::Debug;
    type Frame: Clone + PartialEq + fmt::Debug;

    /// Live buffers in the host's order
    fn buffers(&self) -> Vec<Self::Buffer>;
    fn buffer_name(&self, buffer: &Self::Buffer) -> Option<String>;
    fn buffer_file(&self, buffer: &Self::Buffer) -> Option<Option<PathBuf>>;
    fn buffer_mode(&self, buffer: &Self::Buffer) -> Option<Symbol>;

    /// Live frames in the host's order
    fn frames(&self) -> Vec<Self::Frame>;
    fn selected_frame(&self) -> Option<Self::Frame>;

    /// Add `function` to `hook`; adding it twice is a no-op
    fn add_hook(&mut self, hook: Symbol, function: Symbol);
    fn remove_hook(&mut self, hook: Symbol, function: Symbol);
}

pub trait Keymap {
    /// Bind `key` to `command`, or unbind it when `command` is `None`
    fn define_key(&mut self, key: &str, command: Option<Symbol>);
}

/// A buffer given either by name or by handle
#[derive(Debug, Clone, PartialEq)]
pub enum BufferRef<'a, B> {
    Name(&'a str),
    Handle(B),
}

impl<'a, B> From<&'a str> for BufferRef<'a, B> {
    fn from(name: &'a str) -> Self {
        BufferRef::Name(name)
    }
}

// ============================================================================
// Buffers
// ============================================================================

/// Resolve `buffer` to a live buffer handle
pub fn get_buffer<H: Host>(host: &H, buffer: BufferRef<'_, H::Buffer>) -> Result<H::Buffer> {
    match buffer {
        BufferRef::Name(name) => host
            .buffers()
            .into_iter()
            .find(|b| host.buffer_name(b).as_deref() == Some(name))
            .ok_or_else(|| {
                debug!(name, "No buffer with this name");
                Error::NotFound(format!("buffer {name:?}"))
            }),
        BufferRef::Handle(handle) => {
            if host.buffer_name(&handle).is_some() {
                Ok(handle)
            } else {
                debug!(buffer = ?handle, "Buffer handle is no longer live");
                Err(Error::NotFound(format!("buffer {handle:?}")))
            }
        }
    }
}

fn killed<B: fmt::Debug>(buffer: &B) -> Error {
    Error::NotFound(format!("buffer {buffer:?}"))
}

pub fn buffer_name<H: Host>(host: &H, buffer: BufferRef<'_, H::Buffer>) -> Result<String> {
    let b = get_buffer(host, buffer)?;
    host.buffer_name(&b).ok_or_else(|| killed(&b))
}

/// File the buffer is visiting, `None` for a buffer with no file
pub fn buffer_file_path<H: Host>(
    host: &H,
    buffer: BufferRef<'_, H::Buffer>,
) -> Result<Option<PathBuf>> {
    let b = get_buffer(host, buffer)?;
    host.buffer_file(&b).ok_or_else(|| killed(&b))
}

pub fn buffer_major_mode<H: Host>(host: &H, buffer: BufferRef<'_, H::Buffer>) -> Result<Symbol> {
    let b = get_buffer(host, buffer)?;
    host.buffer_mode(&b).ok_or_else(|| killed(&b))
}

/// Buffers a user would recognize: internal buffers have names starting
/// with a space.
pub fn interesting_buffers<H: Host>(host: &H) -> Vec<H::Buffer> {
    host.buffers()
        .into_iter()
        .filter(|b| {
            host.buffer_name(b)
                .is_some_and(|name| !name.starts_with(' '))
        })
        .collect()
}

/// First buffer whose name matches `pattern`, searching `candidates` or all
/// live buffers.
pub fn find_buffer_matching<H: Host>(
    host: &H,
    pattern: &Regex,
    candidates: Option<&[H::Buffer]>,
) -> Option<H::Buffer> {
    let found = match candidates {
        Some(list) => list
            .iter()
            .find(|b| host.buffer_name(b).is_some_and(|name| pattern.is_match(&name)))
            .cloned(),
        None => host
            .buffers()
            .into_iter()
            .find(|b| host.buffer_name(b).is_some_and(|name| pattern.is_match(&name))),
    };
    trace!(pattern = pattern.as_str(), found = found.is_some(), "Searched buffers");
    found
}

// ============================================================================
// Frames
// ============================================================================

/// Frame `n` steps from `from` (the selected frame by default) in the host's
/// frame order, wrapping around.
pub fn cyclic_nth_frame<H: Host>(host: &H, n: isize, from: Option<&H::Frame>) -> Result<H::Frame> {
    let start = match from {
        Some(frame) => frame.clone(),
        None => host
            .selected_frame()
            .ok_or_else(|| Error::NotFound("selected frame".to_string()))?,
    };
    let frames = host.frames();
    let frame = cyclic_nth_from(&start, &frames, n, &Opts::default())
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("frame {start:?}")))?;
    trace!(from = ?start, n, to = ?frame, "Stepped frames");
    Ok(frame)
}

// ============================================================================
// Keymaps and Hooks
// ============================================================================

/// Apply `bindings` to `keymap` in order and hand the keymap back for chaining
pub fn fill_keymap<'k, K, I, S>(keymap: &'k mut K, bindings: I) -> &'k mut K
where
    K: Keymap + ?Sized,
    I: IntoIterator<Item = (S, Option<Symbol>)>,
    S: AsRef<str>,
{
    for (key, command) in bindings {
        keymap.define_key(key.as_ref(), command);
    }
    keymap
}

/// Install, or with `remove` uninstall, each `(hook, function)` pair
pub fn add_or_remove_hooks<H, I>(host: &mut H, remove: bool, pairs: I)
where
    H: Host + ?Sized,
    I: IntoIterator<Item = (Symbol, Symbol)>,
{
    for (hook, function) in pairs {
        debug!(%hook, %function, remove, "Updating hook");
        if remove {
            host.remove_hook(hook, function);
        } else {
            host.add_hook(hook, function);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_host() -> (InMemoryHost, BufferId, BufferId, BufferId) {
        let mut host = InMemoryHost::new();
        let scratch = host.create_buffer("*scratch*", None, "lisp-interaction-mode");
        let main = host.create_buffer("main.rs", Some("/src/main.rs".into()), "rust-mode");
        let minibuf = host.create_buffer(" *Minibuf-0*", None, "minibuffer-mode");
        (host, scratch, main, minibuf)
    }

    #[test]
    fn test_get_buffer_by_name_and_handle() {
        let (host, scratch, main, _) = sample_host();
        assert_eq!(get_buffer(&host, BufferRef::Name("main.rs")).unwrap(), main);
        assert_eq!(get_buffer(&host, BufferRef::Handle(scratch)).unwrap(), scratch);
        assert!(matches!(
            get_buffer(&host, "nope".into()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_killed_buffer_is_not_found() {
        let (mut host, scratch, _, _) = sample_host();
        host.kill_buffer(scratch);
        assert!(get_buffer(&host, BufferRef::Handle(scratch)).is_err());
        assert!(buffer_name(&host, BufferRef::Handle(scratch)).is_err());
    }

    #[test]
    fn test_buffer_accessors() {
        let (host, scratch, main, _) = sample_host();
        assert_eq!(buffer_name(&host, BufferRef::Handle(main)).unwrap(), "main.rs");
        assert_eq!(
            buffer_file_path(&host, "main.rs".into()).unwrap(),
            Some(PathBuf::from("/src/main.rs"))
        );
        assert_eq!(buffer_file_path(&host, BufferRef::Handle(scratch)).unwrap(), None);
        assert!(buffer_major_mode(&host, "main.rs".into()).unwrap().is("rust-mode"));
    }

    #[test]
    fn test_interesting_buffers_skip_internal() {
        let (host, scratch, main, _) = sample_host();
        assert_eq!(interesting_buffers(&host), vec![scratch, main]);
    }

    #[test]
    fn test_find_buffer_matching() {
        let (host, scratch, main, minibuf) = sample_host();
        let rust = Regex::new(r"\.rs$").unwrap();
        assert_eq!(find_buffer_matching(&host, &rust, None), Some(main));
        assert_eq!(find_buffer_matching(&host, &rust, Some(&[scratch, minibuf][..])), None);

        let starred = Regex::new(r"^\*").unwrap();
        assert_eq!(find_buffer_matching(&host, &starred, None), Some(scratch));
    }

    #[test]
    fn test_cyclic_nth_frame() {
        let mut host = InMemoryHost::new();
        let a = host.create_frame();
        let b = host.create_frame();
        let c = host.create_frame();
        host.select_frame(b);

        assert_eq!(cyclic_nth_frame(&host, 1, None).unwrap(), c);
        assert_eq!(cyclic_nth_frame(&host, 2, None).unwrap(), a);
        assert_eq!(cyclic_nth_frame(&host, -1, Some(&a)).unwrap(), c);
        assert_eq!(cyclic_nth_frame(&host, 0, Some(&a)).unwrap(), a);
    }

    #[test]
    fn test_cyclic_nth_frame_huge_steps() {
        let mut host = InMemoryHost::new();
        let a = host.create_frame();
        let b = host.create_frame();
        // isize::MAX is odd, isize::MIN is even
        assert_eq!(cyclic_nth_frame(&host, isize::MAX, Some(&a)).unwrap(), b);
        assert_eq!(cyclic_nth_frame(&host, isize::MIN, Some(&a)).unwrap(), a);
    }

    #[test]
    fn test_cyclic_nth_frame_without_frames() {
        let host = InMemoryHost::new();
        assert!(matches!(cyclic_nth_frame(&host, 1, None), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_fill_keymap_chains() {
        let mut keymap = SparseKeymap::new();
        fill_keymap(&mut keymap, [("C-c w s", Some(Symbol::new("wg-save")))])
            .define_key("C-c w l", Some(Symbol::new("wg-load")));
        assert_eq!(keymap.lookup("C-c w s"), Some(Symbol::new("wg-save")));
        assert_eq!(keymap.lookup("C-c w l"), Some(Symbol::new("wg-load")));
    }

    #[test]
    fn test_add_then_remove_hooks() {
        let mut host = InMemoryHost::new();
        let kill = Symbol::new("kill-emacs-hook");
        let pairs = [
            (kill, Symbol::new("wg-save-on-exit")),
            (Symbol::new("delete-frame-functions"), Symbol::new("wg-forget-frame")),
        ];

        add_or_remove_hooks(&mut host, false, pairs);
        add_or_remove_hooks(&mut host, false, pairs);
        assert_eq!(host.hook_functions(kill), &[Symbol::new("wg-save-on-exit")]);

        add_or_remove_hooks(&mut host, true, pairs);
        assert!(host.hook_functions(kill).is_empty());
    }
}
