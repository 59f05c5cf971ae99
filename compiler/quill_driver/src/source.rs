//! Loaded sources and the source registry.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use quill_ir::{SourceId, TokenBuffer};

/// One loaded source file.
///
/// `path` and `data` are immutable once the source is registered. The token
/// buffer slot is allocated at registration and written exactly once by the
/// tokenize stage: the `OnceLock` gives the slot a stable identity, so the
/// tokenizing worker publishes through it without re-entering the registry
/// (and without a second lock acquisition per source).
#[derive(Debug)]
pub struct Source {
    id: SourceId,
    path: PathBuf,
    data: String,
    tokens: OnceLock<TokenBuffer>,
}

impl Source {
    fn new(id: SourceId, path: PathBuf, data: String) -> Self {
        Source {
            id,
            path,
            data,
            tokens: OnceLock::new(),
        }
    }

    /// The source's dense id.
    #[inline]
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The filesystem path the source was loaded from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as displayable text, for diagnostics.
    #[inline]
    pub fn origin(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }

    /// The raw source text.
    #[inline]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The token buffer, once the tokenize stage has populated it.
    #[inline]
    pub fn token_buffer(&self) -> Option<&TokenBuffer> {
        self.tokens.get()
    }

    /// Publish the tokenize stage's output. Returns `false` if the slot was
    /// already written, which is a contract violation on the caller's side.
    pub(crate) fn install_token_buffer(&self, buffer: TokenBuffer) -> bool {
        self.tokens.set(buffer).is_ok()
    }
}

/// Registry of all sources loaded under one driver.
///
/// Append-only; ids are dense and assigned in insertion order. Mutation is
/// serialized by the driver's source-manager lock. Readers that only observe
/// the registry after a task group has drained need no locking beyond
/// cloning out the `Arc<Source>` they care about.
#[derive(Debug, Default)]
pub struct SourceManager {
    sources: Vec<Arc<Source>>,
    by_path: FxHashMap<PathBuf, SourceId>,
}

impl SourceManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        SourceManager::default()
    }

    /// Hint that `additional` sources are about to be added.
    pub fn reserve(&mut self, additional: usize) {
        self.sources.reserve(additional);
        self.by_path.reserve(additional);
    }

    /// Register a source, returning its newly assigned id.
    ///
    /// A path that is already registered is not inserted again; the existing
    /// id is returned instead.
    pub fn add_source(&mut self, path: PathBuf, data: String) -> SourceId {
        if let Some(&existing) = self.by_path.get(&path) {
            return existing;
        }

        debug_assert!(self.sources.len() < u32::MAX as usize, "source registry overflow");
        let id = SourceId::new(self.sources.len() as u32);
        self.by_path.insert(path.clone(), id);
        self.sources.push(Arc::new(Source::new(id, path, data)));
        id
    }

    /// Get the source for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this registry.
    #[inline]
    pub fn get(&self, id: SourceId) -> &Arc<Source> {
        &self.sources[id.index()]
    }

    /// Get the source for `id`, if it exists.
    #[inline]
    pub fn try_get(&self, id: SourceId) -> Option<&Arc<Source>> {
        self.sources.get(id.index())
    }

    /// Look up a source by the path it was registered under.
    pub fn find_by_path(&self, path: &Path) -> Option<SourceId> {
        self.by_path.get(path).copied()
    }

    /// Iterate over all sources in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = &Arc<Source>> {
        self.sources.iter()
    }

    /// Number of registered sources.
    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::TokenBuffer;

    #[test]
    fn ids_are_dense_and_in_insertion_order() {
        let mut manager = SourceManager::new();
        let a = manager.add_source("a.ql".into(), "a".into());
        let b = manager.add_source("b.ql".into(), "b".into());

        assert_eq!(a, SourceId::new(0));
        assert_eq!(b, SourceId::new(1));
        assert_eq!(manager.len(), 2);

        let ids: Vec<SourceId> = manager.sources().map(|s| s.id()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn duplicate_path_returns_existing_id() {
        let mut manager = SourceManager::new();
        let first = manager.add_source("a.ql".into(), "a".into());
        let second = manager.add_source("a.ql".into(), "other".into());

        assert_eq!(first, second);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get(first).data(), "a");
    }

    #[test]
    fn find_by_path_round_trips() {
        let mut manager = SourceManager::new();
        let id = manager.add_source("src/main.ql".into(), String::new());
        assert_eq!(manager.find_by_path(Path::new("src/main.ql")), Some(id));
        assert_eq!(manager.find_by_path(Path::new("missing.ql")), None);
    }

    #[test]
    fn token_buffer_installs_exactly_once() {
        let mut manager = SourceManager::new();
        let id = manager.add_source("a.ql".into(), String::new());
        let source = manager.get(id);

        assert!(source.token_buffer().is_none());
        assert!(source.install_token_buffer(TokenBuffer::new()));
        assert!(!source.install_token_buffer(TokenBuffer::new()));
        assert!(source.token_buffer().is_some());
    }
}
