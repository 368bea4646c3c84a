//! Process-wide declaration registry.
//!
//! Maps each [`DeclarationId`] to the methods marked pure virtual under it.
//! The registry starts empty, only ever grows, and is never torn down.
//! All access goes through one mutex; writes happen while classes are being
//! defined, which is not a hot path.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::method::MethodRef;
use crate::types::DeclarationId;

static GLOBAL: LazyLock<Arc<DeclarationRegistry>> =
    LazyLock::new(|| Arc::new(DeclarationRegistry::new()));

#[derive(Debug, Default)]
pub struct DeclarationRegistry {
    buckets: Mutex<HashMap<DeclarationId, Vec<MethodRef>>>,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide registry.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Create an empty bucket for `id` if it has none yet.
    pub fn register(&self, id: DeclarationId) {
        self.buckets.lock().entry(id).or_default();
    }

    /// Allocate and register a generated id that is not yet in use.
    pub fn register_fresh(&self) -> DeclarationId {
        let mut buckets = self.buckets.lock();
        let mut id = DeclarationId::generate();
        while buckets.contains_key(&id) {
            id = DeclarationId::generate(); // should never really happen
        }
        buckets.insert(id.clone(), Vec::new());
        id
    }

    /// Add a method to the bucket of `id`, creating the bucket if needed.
    /// The same method may be appended more than once.
    pub fn append(&self, id: &DeclarationId, method: MethodRef) {
        self.buckets
            .lock()
            .entry(id.clone())
            .or_default()
            .push(method);
    }

    /// Current bucket contents; empty for unknown ids.
    pub fn lookup(&self, id: &DeclarationId) -> Vec<MethodRef> {
        self.buckets.lock().get(id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, id: &DeclarationId) -> bool {
        self.buckets.lock().contains_key(id)
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.lock().is_empty()
    }
}
