// Tests for classes with several direct bases
use purevirt_core::class::ClassDef;
use purevirt_core::method::Method;
use purevirt_core::signature::Signature;
use purevirt_core::types::PureVirtualError;
use purevirt_enforce::list_pure_virtual_methods;

use crate::common::{concrete, runtime};

#[test]
fn test_each_base_reported_separately() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let reader = rt
        .define(ClassDef::new("Reader").method(pv.mark(Method::stub("read", Signature::method())).unwrap()))
        .unwrap();
    let writer = rt
        .define(ClassDef::new("Writer").method(pv.mark(Method::stub("write", Signature::method())).unwrap()))
        .unwrap();

    let err = rt
        .define(ClassDef::new("Stream").base(&reader).base(&writer))
        .unwrap_err();
    let PureVirtualError::Declaration(report) = &err else {
        panic!("unexpected: {err}");
    };
    assert_eq!(report.bases.len(), 2);
    let msg = err.to_string();
    assert!(msg.contains("from base: 'Reader'"));
    assert!(msg.contains("from base: 'Writer'"));
}

#[test]
fn test_satisfying_both_bases() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let reader = rt
        .define(ClassDef::new("Reader").method(pv.mark(Method::stub("read", Signature::method())).unwrap()))
        .unwrap();
    let writer = rt
        .define(ClassDef::new("Writer").method(pv.mark(Method::stub("write", Signature::method())).unwrap()))
        .unwrap();
    let stream = rt
        .define(
            ClassDef::new("Stream")
                .base(&reader)
                .base(&writer)
                .method(concrete("read", Signature::method()))
                .method(concrete("write", Signature::method())),
        )
        .unwrap();
    assert!(list_pure_virtual_methods(&stream).is_empty());
    assert!(rt.instantiate(&stream, &[]).is_ok());
}

#[test]
fn test_sibling_base_supplies_implementation() {
    // Mixin(Concrete) precedes Abstract in the resolution order, so its
    // method resolves on the new class and counts as an override.
    let rt = runtime();
    let pv = rt.new_declaration();
    let abstract_base = rt
        .define(ClassDef::new("Abstract").method(pv.mark(Method::stub("run", Signature::method())).unwrap()))
        .unwrap();
    let mixin = rt
        .define(ClassDef::new("Mixin").method(concrete("run", Signature::method())))
        .unwrap();
    let job = rt
        .define(ClassDef::new("Job").base(&mixin).base(&abstract_base))
        .unwrap();
    assert!(rt.instantiate(&job, &[]).is_ok());

    // Reversed order resolves the stub first.
    let err = rt
        .define(ClassDef::new("Reversed").base(&abstract_base).base(&mixin))
        .unwrap_err();
    assert!(err.to_string().contains("- run"));
}
