//! Enforcement of pure virtual methods for purevirt class hierarchies.
//!
//! Two checks guard a hierarchy:
//! - class definition: every pure virtual method of a direct base must be
//!   overridden with a compatible signature ([`validator`], [`compare`])
//! - instantiation: an object may not resolve any pure virtual method unless
//!   its class sets `pv_allow_base_instance` ([`gate`])
//!
//! [`marker::Marker`] declares pure virtual methods and [`engine::Runtime`] wires
//! both checks into class and instance creation.

pub mod compare;
pub mod engine;
pub mod gate;
pub mod introspect;
pub mod marker;
pub mod validator;

pub use engine::Runtime;
pub use introspect::{is_pure_virtual_type, list_pure_virtual_methods};
pub use marker::Marker;
