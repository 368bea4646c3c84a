//! Signature compatibility between a pure virtual declaration and its override.
//!
//! Names, kinds, and order must always match. Defaults and annotations are
//! compared only under their strict flags. Return annotations are never compared.

use std::fmt;

use purevirt_core::signature::{values_equal, Signature};
use purevirt_core::types::PureVirtualMark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignaturePolicy {
    pub strict_defaults: bool,
    pub strict_types: bool,
}

impl SignaturePolicy {
    pub const STRICT: Self = Self {
        strict_defaults: true,
        strict_types: true,
    };
}

impl From<&PureVirtualMark> for SignaturePolicy {
    fn from(mark: &PureVirtualMark) -> Self {
        Self {
            strict_defaults: mark.strict_defaults,
            strict_types: mark.strict_types,
        }
    }
}

/// First difference found between two signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Arity { expected: usize, actual: usize },
    Name { position: usize, expected: String, actual: String },
    Kind { param: String },
    Default { param: String },
    Annotation { param: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Arity { expected, actual } => {
                write!(f, "expected {} parameter(s), found {}", expected, actual)
            }
            Mismatch::Name {
                position,
                expected,
                actual,
            } => write!(
                f,
                "parameter {} is `{}`, expected `{}`",
                position, actual, expected
            ),
            Mismatch::Kind { param } => write!(f, "parameter `{}` changed kind", param),
            Mismatch::Default { param } => write!(f, "default of `{}` differs", param),
            Mismatch::Annotation { param } => write!(f, "annotation of `{}` differs", param),
        }
    }
}

pub fn compatible(
    base: &Signature,
    derived: &Signature,
    strict_defaults: bool,
    strict_types: bool,
) -> bool {
    let policy = SignaturePolicy {
        strict_defaults,
        strict_types,
    };
    first_mismatch(base, derived, policy).is_none()
}

pub fn first_mismatch(
    base: &Signature,
    derived: &Signature,
    policy: SignaturePolicy,
) -> Option<Mismatch> {
    let (expected, actual) = (base.params(), derived.params());
    if expected.len() != actual.len() {
        return Some(Mismatch::Arity {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (position, (e, a)) in expected.iter().zip(actual).enumerate() {
        if e.name != a.name {
            return Some(Mismatch::Name {
                position,
                expected: e.name.clone(),
                actual: a.name.clone(),
            });
        }
        if e.kind != a.kind {
            return Some(Mismatch::Kind {
                param: e.name.clone(),
            });
        }
        if policy.strict_defaults {
            let same = match (&e.default, &a.default) {
                (Some(x), Some(y)) => values_equal(x, y),
                (None, None) => true,
                _ => false,
            };
            if !same {
                return Some(Mismatch::Default {
                    param: e.name.clone(),
                });
            }
        }
        if policy.strict_types && e.annotation != a.annotation {
            return Some(Mismatch::Annotation {
                param: e.name.clone(),
            });
        }
    }
    None
}
