// Tests for override signature rules under strict and loose declarations
use purevirt_core::class::{ClassDef, ClassRef};
use purevirt_core::config::DeclarationConfig;
use purevirt_core::method::Method;
use purevirt_core::signature::{Param, Signature};
use purevirt_core::types::PureVirtualError;
use purevirt_enforce::{Marker, Runtime};

use crate::common::{concrete, runtime};

fn foo_sig(typed: bool, garb: bool) -> Signature {
    let (mut filepath, mut flag) = (Param::new("filepath"), Param::new("garb").with_default(garb));
    if typed {
        filepath = filepath.annotated("str");
        flag = flag.annotated("bool");
    }
    Signature::method().param(filepath).param(flag)
}

fn base(rt: &Runtime, pv: &Marker) -> ClassRef {
    rt.define(ClassDef::new("Py3TestClass").method(pv.mark(Method::stub("foo", foo_sig(true, false))).unwrap()))
        .unwrap()
}

fn with_foo(rt: &Runtime, base: &ClassRef, name: &str, sig: Signature) -> Result<ClassRef, PureVirtualError> {
    rt.define(ClassDef::new(name).base(base).method(concrete("foo", sig)))
}

#[test]
fn test_strict_types_by_default() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let base = base(&rt, &pv);

    let dropped_hint = Signature::method()
        .param(Param::new("filepath").annotated("str"))
        .param(Param::new("garb").with_default(false));
    let err = with_foo(&rt, &base, "WrongHintSignature", dropped_hint).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("wrong signature from base: 'Py3TestClass'"));
    assert!(msg.contains("def foo(self, filepath: str, garb=false): -> def foo(self, filepath: str, garb: bool = false):"));

    assert!(with_foo(&rt, &base, "RightHintSignature", foo_sig(true, false)).is_ok());
}

#[test]
fn test_loose_hints_still_check_defaults() {
    let rt = runtime();
    let pv = rt.new_declaration_with(DeclarationConfig::default().strict_types(false));
    let base = base(&rt, &pv);

    assert!(with_foo(&rt, &base, "ShouldBeOkay", foo_sig(false, false)).is_ok());
    let err = with_foo(&rt, &base, "ShouldFail", foo_sig(false, true)).unwrap_err();
    assert!(matches!(err, PureVirtualError::Declaration(_)));
}

#[test]
fn test_strict_defaults_toggle() {
    let rt = runtime();

    let strict = rt.new_declaration();
    let strict_base = base(&rt, &strict);
    let err = with_foo(&rt, &strict_base, "ChangedDefault", foo_sig(true, true)).unwrap_err();
    let PureVirtualError::Declaration(report) = err else {
        panic!("expected declaration error");
    };
    assert_eq!(report.wrong_signature_count(), 1);
    assert_eq!(report.must_overload_count(), 0);

    let loose = rt.new_declaration_with(DeclarationConfig::default().strict_defaults(false));
    let loose_base = base(&rt, &loose);
    assert!(with_foo(&rt, &loose_base, "ChangedDefault", foo_sig(true, true)).is_ok());
}

#[test]
fn test_renamed_parameter_fails_even_when_loose() {
    let rt = runtime();
    let pv = rt.new_declaration_with(
        DeclarationConfig::default()
            .strict_defaults(false)
            .strict_types(false),
    );
    let base = base(&rt, &pv);
    let renamed = Signature::method()
        .param(Param::new("path"))
        .param(Param::new("garb").with_default(false));
    assert!(with_foo(&rt, &base, "Renamed", renamed).is_err());

    let extra = foo_sig(false, false).param(Param::new("more"));
    assert!(with_foo(&rt, &base, "Extra", extra).is_err());
}

#[test]
fn test_equal_default_value_written_differently() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let root = rt
        .define(ClassDef::new("Sized").method(
            pv.mark(Method::stub("resize", Signature::method().param(Param::new("factor").with_default(2))))
                .unwrap(),
        ))
        .unwrap();
    let float_default = Signature::method().param(Param::new("factor").with_default(2.0));
    let child = rt.define(ClassDef::new("Scaled").base(&root).method(concrete("resize", float_default)));
    assert!(child.is_ok());
}

#[test]
fn test_explicit_args_attribute_skips_signature_check() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let root = rt
        .define(
            ClassDef::new("Loose")
                .attr("pv_explicit_args", false)
                .method(pv.mark(Method::stub("foo", foo_sig(true, false))).unwrap()),
        )
        .unwrap();
    assert!(with_foo(&rt, &root, "Anything", Signature::method()).is_ok());
    // Overriding is still required.
    assert!(rt.define(ClassDef::new("Nothing").base(&root)).is_err());
}

#[test]
fn test_both_categories_reported_together() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let root = rt
        .define(
            ClassDef::new("Io")
                .method(pv.mark(Method::stub("read", Signature::method())).unwrap())
                .method(pv.mark(Method::stub("write", Signature::method().param(Param::new("data")))).unwrap()),
        )
        .unwrap();
    let err = rt
        .define(ClassDef::new("Half").base(&root).method(concrete("write", Signature::method())))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("must be overloaded from base: 'Io' before class can be used:\n    - read\n"));
    assert!(msg.contains("- 'Half': The following overload functions have the wrong signature from base: 'Io'"));
    assert!(msg.contains("def write(self): -> def write(self, data):"));
}

#[test]
fn test_string_defaults_quoted_in_report() {
    let rt = runtime();
    let pv = rt.new_declaration();
    let root = rt
        .define(ClassDef::new("File").method(
            pv.mark(Method::stub("open", Signature::method().param(Param::new("mode").with_default("r"))))
                .unwrap(),
        ))
        .unwrap();
    let write_mode = Signature::method().param(Param::new("mode").with_default("w"));
    let err = define_override(&rt, &root, "open", write_mode).unwrap_err();
    assert!(err
        .to_string()
        .contains("def open(self, mode='w'): -> def open(self, mode='r'):"));
}

fn define_override(
    rt: &Runtime,
    base: &ClassRef,
    method: &str,
    sig: Signature,
) -> Result<ClassRef, PureVirtualError> {
    rt.define(ClassDef::new("Writer").base(base).method(concrete(method, sig)))
}
