use purevirt_core::class::{Class, Members};
use purevirt_core::signature::truthy;
use purevirt_core::types::{BaseFindings, SignatureMismatch, ValidationReport};
use tracing::debug;

use crate::compare::first_mismatch;

/// Base-class attribute. When it resolves false, overrides of that base's
/// pure virtual methods are not signature-checked.
pub const PV_EXPLICIT_ARGS: &str = "pv_explicit_args";

/// Validate a class under construction against each of its direct bases.
///
/// Roots are never validated. Each base is scanned for every pure virtual
/// routine it resolves, own or inherited.
pub fn validate(class: &Class) -> ValidationReport {
    let mut report = ValidationReport::new(class.name(), class.file().map(str::to_string));
    if class.descriptor().is_root() {
        return report;
    }
    for base in class.bases() {
        report.push(check_base(class, base));
    }
    report
}

fn check_base(class: &Class, base: &Class) -> BaseFindings {
    let mut findings = BaseFindings::new(base.name());
    let explicit_args = base.attribute(PV_EXPLICIT_ARGS).map_or(true, |v| truthy(&v));

    for (name, call) in base.routines() {
        let Some(mark) = call.mark().filter(|m| m.is_pure_virtual) else {
            continue;
        };

        let attr = match class.resolve(&name) {
            Some(attr) if !attr.same_implementation(&call) => attr,
            // Check 1: inherited unchanged
            _ => {
                findings.must_overload.insert(call.name().to_string());
                continue;
            }
        };

        // Check 2: do the arguments line up?
        if !explicit_args {
            continue;
        }
        if let Some(mismatch) = first_mismatch(call.signature(), attr.signature(), mark.into()) {
            debug!(
                class = class.name(),
                base = base.name(),
                method = %name,
                %mismatch,
                "override signature mismatch"
            );
            findings.wrong_signature.insert(SignatureMismatch {
                name: call.name().to_string(),
                expected: call.signature().to_string(),
                actual: attr.signature().to_string(),
            });
        }
    }
    findings
}
