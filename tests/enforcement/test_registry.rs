// Tests for declaration scopes and registry queries
use std::sync::Arc;

use purevirt_core::class::ClassDef;
use purevirt_core::config::DeclarationConfig;
use purevirt_core::method::Method;
use purevirt_core::registry::DeclarationRegistry;
use purevirt_core::signature::Signature;
use purevirt_core::types::DeclarationId;
use purevirt_enforce::Runtime;

use crate::common::{interface, path_sig, runtime};

#[test]
fn test_declaration_groups_its_methods() {
    let rt = runtime();
    let io = rt.new_declaration();
    let other = rt.new_declaration();
    interface(&rt, &io);
    other.mark(Method::stub("close", Signature::method())).unwrap();

    let names: Vec<String> = rt
        .virtual_methods_for_declaration(io.id())
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(names, vec!["save", "load"]);
    assert_eq!(rt.virtual_methods_for_declaration(other.id()).len(), 1);
}

#[test]
fn test_methods_carry_declaration_id() {
    let rt = runtime();
    let pv = rt.declare("persistence", DeclarationConfig::default());
    let iface = interface(&rt, &pv);
    for method in iface.own_methods().values() {
        assert_eq!(
            method.mark().unwrap().declaration_id,
            DeclarationId::named("persistence")
        );
    }
}

#[test]
fn test_registry_outlives_classes() {
    let registry = Arc::new(DeclarationRegistry::new());
    let rt = Runtime::with_registry(Arc::clone(&registry), Default::default());
    let pv = rt.new_declaration();
    {
        let class = rt
            .define(ClassDef::new("Temp").method(pv.mark(Method::stub("gone", path_sig())).unwrap()))
            .unwrap();
        drop(class);
    }
    assert_eq!(registry.lookup(pv.id()).len(), 1);
    assert!(registry.contains(pv.id()));
}

#[test]
fn test_global_runtime_uses_global_registry() {
    let rt = Runtime::new();
    let pv = rt.new_declaration();
    pv.mark(Method::stub("global_probe", Signature::method())).unwrap();
    assert!(DeclarationRegistry::global().contains(pv.id()));
    assert_eq!(
        DeclarationRegistry::global().lookup(pv.id())[0].name(),
        "global_probe"
    );
}

#[test]
fn test_runtimes_share_a_registry_not_default_markers() {
    let registry = Arc::new(DeclarationRegistry::new());
    let a = Runtime::with_registry(Arc::clone(&registry), Default::default());
    let b = Runtime::with_registry(Arc::clone(&registry), Default::default());
    assert_ne!(a.pure_virtual().id(), b.pure_virtual().id());
    assert_eq!(registry.len(), 2);
}
