//! A host with no editor behind it.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use tracing::trace;
use wgutil::{Alist, Symbol};

use crate::{Host, Keymap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

#[derive(Debug, Clone)]
struct BufferState {
    id: BufferId,
    name: String,
    file: Option<PathBuf>,
    mode: Symbol,
}

/// Buffers, frames and hooks kept in plain collections
#[derive(Debug, Default)]
pub struct InMemoryHost {
    buffers: Vec<BufferState>,
    frames: Vec<FrameId>,
    selected: Option<FrameId>,
    hooks: FxHashMap<Symbol, Vec<Symbol>>,
    next_id: u64,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn buffer(&self, id: BufferId) -> Option<&BufferState> {
        self.buffers.iter().find(|b| b.id == id)
    }

    pub fn create_buffer(&mut self, name: &str, file: Option<PathBuf>, mode: &str) -> BufferId {
        let id = BufferId(self.fresh_id());
        self.buffers.push(BufferState {
            id,
            name: name.to_string(),
            file,
            mode: Symbol::new(mode),
        });
        trace!(?id, name, "Created buffer");
        id
    }

    /// Returns whether the buffer was live
    pub fn kill_buffer(&mut self, id: BufferId) -> bool {
        let before = self.buffers.len();
        self.buffers.retain(|b| b.id != id);
        self.buffers.len() != before
    }

    /// New frame at the end of the frame list. The first frame is selected.
    pub fn create_frame(&mut self) -> FrameId {
        let id = FrameId(self.fresh_id());
        self.frames.push(id);
        self.selected.get_or_insert(id);
        id
    }

    pub fn delete_frame(&mut self, id: FrameId) {
        self.frames.retain(|f| *f != id);
        if self.selected == Some(id) {
            self.selected = self.frames.first().copied();
        }
    }

    /// Select `id`; ignored for a frame that does not exist
    pub fn select_frame(&mut self, id: FrameId) {
        if self.frames.contains(&id) {
            self.selected = Some(id);
        }
    }

    /// Functions on `hook`, most recently added first
    pub fn hook_functions(&self, hook: Symbol) -> &[Symbol] {
        self.hooks.get(&hook).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Host for InMemoryHost {
    type Buffer = BufferId;
    type Frame = FrameId;

    fn buffers(&self) -> Vec<BufferId> {
        self.buffers.iter().map(|b| b.id).collect()
    }

    fn buffer_name(&self, buffer: &BufferId) -> Option<String> {
        self.buffer(*buffer).map(|b| b.name.clone())
    }

    fn buffer_file(&self, buffer: &BufferId) -> Option<Option<PathBuf>> {
        self.buffer(*buffer).map(|b| b.file.clone())
    }

    fn buffer_mode(&self, buffer: &BufferId) -> Option<Symbol> {
        self.buffer(*buffer).map(|b| b.mode)
    }

    fn frames(&self) -> Vec<FrameId> {
        self.frames.clone()
    }

    fn selected_frame(&self) -> Option<FrameId> {
        self.selected
    }

    fn add_hook(&mut self, hook: Symbol, function: Symbol) {
        let functions = self.hooks.entry(hook).or_default();
        if !functions.contains(&function) {
            functions.insert(0, function);
        }
    }

    fn remove_hook(&mut self, hook: Symbol, function: Symbol) {
        if let Some(functions) = self.hooks.get_mut(&hook) {
            functions.retain(|f| *f != function);
            if functions.is_empty() {
                self.hooks.remove(&hook);
            }
        }
    }
}

/// Key descriptions mapped to command symbols
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseKeymap {
    bindings: Alist<String, Symbol>,
}

impl SparseKeymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &str) -> Option<Symbol> {
        self.bindings.get(&key.to_string()).copied()
    }

    /// Bindings, most recently defined key first
    pub fn bindings(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Keymap for SparseKeymap {
    fn define_key(&mut self, key: &str, command: Option<Symbol>) {
        let key = key.to_string();
        self.bindings = match command {
            Some(command) => self.bindings.put(key, command),
            None => self.bindings.remove(&key),
        };
    }
}
