use std::sync::Arc;

use purevirt_core::config::DeclarationConfig;
use purevirt_core::method::{Method, MethodRef};
use purevirt_core::registry::DeclarationRegistry;
use purevirt_core::types::{DeclarationId, PureVirtualError, PureVirtualMark};
use tracing::{debug, trace};

/// Parameter names a forced not-implemented method may not use.
pub const RESERVED_PARAM_NAMES: [&str; 2] = ["_func_", "_impl_"];

/// Marks methods as pure virtual under one declaration.
///
/// Every marked method is recorded in the registry bucket of the marker's id.
#[derive(Debug, Clone)]
pub struct Marker {
    id: DeclarationId,
    config: DeclarationConfig,
    registry: Arc<DeclarationRegistry>,
}

impl Marker {
    /// New declaration with a generated id.
    pub fn fresh(registry: Arc<DeclarationRegistry>, config: DeclarationConfig) -> Self {
        let id = registry.register_fresh();
        debug!(declaration = %id, ?config, "new pure virtual declaration");
        Self {
            id,
            config,
            registry,
        }
    }

    /// Declaration under a caller-chosen id. An id that is already registered
    /// keeps its bucket.
    pub fn bound(
        registry: Arc<DeclarationRegistry>,
        id: DeclarationId,
        config: DeclarationConfig,
    ) -> Self {
        registry.register(id.clone());
        debug!(declaration = %id, ?config, "bound pure virtual declaration");
        Self {
            id,
            config,
            registry,
        }
    }

    pub fn id(&self) -> &DeclarationId {
        &self.id
    }

    pub fn config(&self) -> DeclarationConfig {
        self.config
    }

    /// Stamp `method` as pure virtual and register it.
    pub fn mark(&self, method: Method) -> Result<MethodRef, PureVirtualError> {
        if let Some(existing) = method.mark() {
            return Err(PureVirtualError::AlreadyMarked {
                method: method.name().to_string(),
                declaration: existing.declaration_id.clone(),
            });
        }

        if self.config.force_not_implemented {
            let conflicts: Vec<String> = method
                .signature()
                .param_names()
                .filter(|name| RESERVED_PARAM_NAMES.contains(name))
                .map(str::to_string)
                .collect();
            if !conflicts.is_empty() {
                return Err(PureVirtualError::NamingConflict {
                    method: method.name().to_string(),
                    params: conflicts,
                });
            }
        }

        let mark = PureVirtualMark {
            is_pure_virtual: true,
            declaration_id: self.id.clone(),
            force_not_implemented: self.config.force_not_implemented,
            strict_defaults: self.config.strict_defaults,
            strict_types: self.config.strict_types,
        };
        let method = Arc::new(method.with_mark(mark));
        self.registry.append(&self.id, Arc::clone(&method));
        trace!(declaration = %self.id, method = method.name(), "marked pure virtual");
        Ok(method)
    }

    /// Methods marked so far under this declaration.
    pub fn methods(&self) -> Vec<MethodRef> {
        self.registry.lookup(&self.id)
    }
}
