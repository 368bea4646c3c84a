use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one pure virtual declaration scope.
///
/// Generated ids are UUID v4 strings; caller-supplied ids are used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationId(String);

impl DeclarationId {
    /// Fresh random identifier. Collisions against a registry are the
    /// registry's concern, see `DeclarationRegistry::register_fresh`.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Caller-chosen identifier.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata stamped onto a method by a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PureVirtualMark {
    pub is_pure_virtual: bool,
    pub declaration_id: DeclarationId,
    pub force_not_implemented: bool,
    pub strict_defaults: bool,
    pub strict_types: bool,
}

/// Per-class metadata fixed at class-creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub has_base_class: bool,
}

impl ClassDescriptor {
    /// A root introduces pure virtual methods and is never validated.
    pub fn is_root(&self) -> bool {
        !self.has_base_class
    }
}

/// An override whose signature does not line up with the base declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignatureMismatch {
    pub name: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for SignatureMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "def {name}{actual}: -> def {name}{expected}:",
            name = self.name,
            actual = self.actual,
            expected = self.expected,
        )
    }
}

/// Findings of a derived class against one of its direct bases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFindings {
    pub base: String,
    pub must_overload: BTreeSet<String>,
    pub wrong_signature: BTreeSet<SignatureMismatch>,
}

impl BaseFindings {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.must_overload.is_empty() && self.wrong_signature.is_empty()
    }
}

/// Result of validating one class definition against its bases.
///
/// Only bases with findings are kept in `bases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file: Option<String>,
    pub bases: Vec<BaseFindings>,
}

impl ValidationReport {
    pub fn new(class: impl Into<String>, file: Option<String>) -> Self {
        Self {
            class: class.into(),
            file,
            bases: Vec::new(),
        }
    }

    /// Record the findings for a base, dropping empty ones.
    pub fn push(&mut self, findings: BaseFindings) {
        if !findings.is_empty() {
            self.bases.push(findings);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bases.iter().all(BaseFindings::is_empty)
    }

    pub fn must_overload_count(&self) -> usize {
        self.bases.iter().map(|b| b.must_overload.len()).sum()
    }

    pub fn wrong_signature_count(&self) -> usize {
        self.bases.iter().map(|b| b.wrong_signature.len()).sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn class_label(&self) -> String {
        match &self.file {
            Some(file) => format!("'{}' {}", self.class, file),
            None => format!("'{}'", self.class),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.class_label();
        f.write_str("Pure Virtual Class Declaration:\n")?;
        for (i, findings) in self.bases.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            if !findings.must_overload.is_empty() {
                let names: Vec<&str> = findings.must_overload.iter().map(String::as_str).collect();
                write!(
                    f,
                    "- {}: The following pure virtual functions must be overloaded from base: '{}' before class can be used:\n    - {}",
                    label,
                    findings.base,
                    names.join("\n    - "),
                )?;
                if !findings.wrong_signature.is_empty() {
                    f.write_str("\n")?;
                }
            }
            if !findings.wrong_signature.is_empty() {
                let lines: Vec<String> = findings
                    .wrong_signature
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                write!(
                    f,
                    "- {}: The following overload functions have the wrong signature from base: '{}'\n    - {}",
                    label,
                    findings.base,
                    lines.join("\n    - "),
                )?;
            }
        }
        Ok(())
    }
}

/// Errors raised by class definition, instantiation, and dispatch.
#[derive(Debug, thiserror::Error)]
pub enum PureVirtualError {
    #[error("{0}")]
    Declaration(ValidationReport),

    #[error(
        "Cannot instantiate pure virtual class '{class}' with pure virtual functions: ({})",
        .methods.join(", ")
    )]
    Instantiation { class: String, methods: Vec<String> },

    #[error("'{class}.{method}' is pure virtual and was called without an implementation")]
    NotImplemented { class: String, method: String },

    #[error(
        "Pure virtual function '{method}' uses reserved parameter name(s): {}",
        .params.join(", ")
    )]
    NamingConflict { method: String, params: Vec<String> },

    #[error("'{method}' is already marked pure virtual under declaration {declaration}")]
    AlreadyMarked {
        method: String,
        declaration: DeclarationId,
    },

    #[error(
        "Cannot create a consistent method resolution order for '{class}' with bases ({})",
        .bases.join(", ")
    )]
    InconsistentHierarchy { class: String, bases: Vec<String> },

    #[error("'{class}' object has no method '{method}'")]
    NoSuchMethod { class: String, method: String },

    #[error("{method}(): {reason}")]
    Bind { method: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T, E = PureVirtualError> = std::result::Result<T, E>;
