use std::sync::{Arc, OnceLock};

use purevirt_core::class::{Class, ClassDef, ClassRef, Instance, Members, INITIALIZER};
use purevirt_core::config::{DeclarationConfig, PurevirtConfig};
use purevirt_core::method::MethodRef;
use purevirt_core::registry::DeclarationRegistry;
use purevirt_core::signature::Value;
use purevirt_core::types::{DeclarationId, PureVirtualError};
use tracing::{debug, warn};

use crate::gate;
use crate::marker::Marker;
use crate::validator;

/// Entry point for defining and instantiating pure virtual class hierarchies.
///
/// `define` is the class-creation hook and `instantiate` the instance-creation
/// hook. Both read the runtime's [`PurevirtConfig`].
#[derive(Debug)]
pub struct Runtime {
    registry: Arc<DeclarationRegistry>,
    config: PurevirtConfig,
    default_marker: OnceLock<Marker>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Runtime over the process-wide registry with default configuration.
    pub fn new() -> Self {
        Self::with_registry(DeclarationRegistry::global(), PurevirtConfig::default())
    }

    /// Runtime over the process-wide registry.
    pub fn with_config(config: PurevirtConfig) -> Self {
        Self::with_registry(DeclarationRegistry::global(), config)
    }

    pub fn with_registry(registry: Arc<DeclarationRegistry>, config: PurevirtConfig) -> Self {
        Self {
            registry,
            config,
            default_marker: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &Arc<DeclarationRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &PurevirtConfig {
        &self.config
    }

    /// New declaration with the configured default options.
    pub fn new_declaration(&self) -> Marker {
        self.new_declaration_with(self.config.defaults)
    }

    pub fn new_declaration_with(&self, config: DeclarationConfig) -> Marker {
        Marker::fresh(Arc::clone(&self.registry), config)
    }

    /// Declaration under a caller-chosen name.
    pub fn declare(&self, name: &str, config: DeclarationConfig) -> Marker {
        Marker::bound(Arc::clone(&self.registry), DeclarationId::named(name), config)
    }

    /// Shared declaration with default options, created on first use.
    pub fn pure_virtual(&self) -> &Marker {
        self.default_marker.get_or_init(|| self.new_declaration())
    }

    /// Define a class. Derived classes are validated against each direct base
    /// and the definition fails with every finding at once.
    pub fn define(&self, def: ClassDef) -> Result<ClassRef, PureVirtualError> {
        let class = Class::from_def_unchecked(def)?;

        if class.descriptor().is_root() {
            debug!(class = class.name(), "defined pure virtual root");
        } else if self.config.enforce.validate_on_define {
            let report = validator::validate(&class);
            if !report.is_empty() {
                warn!(
                    class = class.name(),
                    must_overload = report.must_overload_count(),
                    wrong_signature = report.wrong_signature_count(),
                    "pure virtual class declaration rejected"
                );
                return Err(PureVirtualError::Declaration(report));
            }
            debug!(class = class.name(), bases = class.bases().len(), "defined class");
        }

        Ok(Arc::new(class))
    }

    /// Build an instance, run its initializer, then gate it.
    pub fn instantiate(
        &self,
        class: &ClassRef,
        args: &[Value],
    ) -> Result<Instance, PureVirtualError> {
        let instance = Instance::allocate_unchecked(Arc::clone(class));
        match instance.resolve(INITIALIZER) {
            Some(init) => {
                init.invoke(&instance, args)?;
            }
            None if !args.is_empty() => {
                return Err(PureVirtualError::Bind {
                    method: class.name().to_string(),
                    reason: format!("takes no arguments but {} were given", args.len()),
                });
            }
            None => {}
        }

        if self.config.enforce.gate_instances {
            gate::check_instance(&instance)?;
        }
        Ok(instance)
    }

    /// Registry lookup by declaration id.
    pub fn virtual_methods_for_declaration(&self, id: &DeclarationId) -> Vec<MethodRef> {
        self.registry.lookup(id)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
