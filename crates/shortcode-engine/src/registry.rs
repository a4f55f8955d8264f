use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError, RwLock},
};

use crate::{
    error::ParseError,
    handler::{HandlerFn, Invocation, Replacement},
    parser::Parser,
};

static REGISTRIES: OnceLock<Mutex<HashMap<String, Registry>>> = OnceLock::new();

/// A named set of shortcode handlers.
///
/// Cloning is cheap and every clone sees the same handlers. [`Registry::get`]
/// hands out process-wide instances by name; [`Registry::new`] builds one that
/// belongs only to its owner.
///
/// The handler map is locked only for lookups and changes, never while a
/// handler runs, so handlers may register tags or parse reentrantly. Changing
/// handlers from another thread during a parse is the caller's business: the
/// parse sees whatever is registered at each lookup.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    handlers: RwLock<HashMap<String, Arc<HandlerFn>>>,
}

impl Registry {
    /// A standalone registry, not reachable through [`Registry::get`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                handlers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// The process-wide registry called `name`, created on first use and kept
    /// for the life of the process.
    pub fn get(name: &str) -> Registry {
        let table = REGISTRIES.get_or_init(Default::default);
        let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entry(name.to_string())
            .or_insert_with(|| Registry::new(name))
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Installs `handler` for `tag`, replacing any previous one. Tag names are
    /// case-sensitive.
    pub fn register<F>(&self, tag: impl Into<String>, handler: F)
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<Replacement> + Send + Sync + 'static,
    {
        let tag = tag.into();
        log::debug!("registry {}: register [{tag}]", self.name());
        self.write().insert(tag, Arc::new(handler));
    }

    /// Removes the handler for `tag`, returning whether there was one.
    pub fn unregister(&self, tag: &str) -> bool {
        self.write().remove(tag).is_some()
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.read().contains_key(tag)
    }

    /// Registered tag names, sorted.
    pub fn registered_tags(&self) -> Vec<String> {
        let mut tags: Vec<_> = self.read().keys().cloned().collect();
        tags.sort();
        tags
    }

    /// The handler for `tag`. The returned handle stays valid after the tag is
    /// unregistered.
    pub fn handler(&self, tag: &str) -> Option<Arc<HandlerFn>> {
        self.read().get(tag).cloned()
    }

    /// Rewrites every shortcode in `text` with this registry's handlers.
    pub fn parse(&self, text: &str) -> Result<String, ParseError> {
        Parser::new(self).parse(text)
    }

    /// Whether two handles refer to the same registry.
    pub fn same_as(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<HandlerFn>>> {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<HandlerFn>>> {
        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.inner.name)
            .field("tags", &self.registered_tags())
            .finish()
    }
}
