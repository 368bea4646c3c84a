use purevirt_core::class::{Instance, Members};
use purevirt_core::signature::truthy;
use purevirt_core::types::PureVirtualError;
use tracing::warn;

use crate::introspect::list_pure_virtual_methods;

/// Class (or instance) attribute that lets a pure virtual class be instantiated.
pub const PV_ALLOW_BASE_INSTANCE: &str = "pv_allow_base_instance";

/// Whether the escape flag resolves truthy on the instance or its classes.
pub fn allows_base_instance(instance: &Instance) -> bool {
    instance
        .attribute(PV_ALLOW_BASE_INSTANCE)
        .is_some_and(|v| truthy(&v))
}

/// Refuse a fully built instance that still resolves pure virtual routines.
pub fn check_instance(instance: &Instance) -> Result<(), PureVirtualError> {
    let functions = list_pure_virtual_methods(instance);
    if functions.is_empty() {
        return Ok(());
    }
    if allows_base_instance(instance) {
        warn!(
            class = instance.type_name(),
            methods = %functions.join(", "),
            "instantiating pure virtual class via {}",
            PV_ALLOW_BASE_INSTANCE
        );
        return Ok(());
    }
    Err(PureVirtualError::Instantiation {
        class: instance.type_name().to_string(),
        methods: functions,
    })
}
