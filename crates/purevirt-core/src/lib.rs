//! Core object model, signatures, and declaration registry for purevirt.
//!
//! This crate provides the foundational data structures used by the enforcement layer:
//! - [`types`]: Declaration ids, pure virtual marks, validation reports, and the error type
//! - [`signature`]: Parameters, call signatures, and argument binding
//! - [`method`]: Methods with shared identity and dispatch
//! - [`class`]: Class definitions, instances, and member lookup
//! - [`mro`]: C3 method resolution order
//! - [`registry`]: The process-wide [`DeclarationRegistry`](registry::DeclarationRegistry)
//! - [`config`]: Configuration loading from `purevirt.json`

pub mod class;
pub mod config;
pub mod method;
pub mod mro;
pub mod registry;
pub mod signature;
pub mod types;
