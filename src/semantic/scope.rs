//! Chainable nested symbol tables.
//!
//! Scopes live in an arena and refer to their parent by [`ScopeId`]. A chain
//! is walked toward the root by [`Scopes::lookup`] (most specific binding
//! wins) and from the root by [`Scopes::lookdown`] (least specific binding
//! wins). Scopes that model inheritance put the oldest ancestor at the root.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Handle of one scope inside a [`Scopes`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Scope<T> {
    parent: Option<ScopeId>,
    symbols: FxHashMap<SmolStr, T>,
}

/// Arena of scopes holding values of type `T`.
#[derive(Debug, Clone)]
pub struct Scopes<T> {
    scopes: Vec<Scope<T>>,
}

impl<T> Default for Scopes<T> {
    fn default() -> Self {
        Self { scopes: Vec::new() }
    }
}

impl<T> Scopes<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope nested in `parent` (or a new root).
    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push(Scope {
            parent,
            symbols: FxHashMap::default(),
        });
        id
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.index()).and_then(|s| s.parent)
    }

    /// Bind `name` in `scope`, returning the value it replaces in that scope.
    pub fn add(&mut self, scope: ScopeId, name: impl Into<SmolStr>, value: T) -> Option<T> {
        self.scopes
            .get_mut(scope.index())
            .and_then(|s| s.symbols.insert(name.into(), value))
    }

    /// Only the given scope.
    pub fn look(&self, scope: ScopeId, name: &str) -> Option<&T> {
        self.scopes.get(scope.index())?.symbols.get(name)
    }

    /// The given scope, then toward the root.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&T> {
        self.scope_for(scope, name)
            .and_then(|found| self.look(found, name))
    }

    /// From the root toward the given scope; the first match wins.
    pub fn lookdown(&self, scope: ScopeId, name: &str) -> Option<&T> {
        self.build_scope_chain(scope)
            .into_iter()
            .rev()
            .find_map(|id| self.look(id, name))
    }

    /// The innermost scope of the chain in which `name` is bound.
    pub fn scope_for(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.build_scope_chain(scope)
            .into_iter()
            .find(|&id| self.look(id, name).is_some())
    }

    /// `scope` followed by each of its ancestors.
    fn build_scope_chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            if id.index() >= self.scopes.len() {
                break;
            }
            chain.push(id);
            current = self.parent(id);
        }
        chain
    }
}
