//! Call signatures for methods in the class model.
//!
//! A signature lists parameters in declaration order, including the receiver
//! (`self`) when the method takes one. Defaults are JSON values; annotations are
//! opaque type names compared textually.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime value passed to and returned from method bodies.
pub type Value = serde_json::Value;

/// Conventional receiver name, skipped when binding call arguments.
pub const RECEIVER: &str = "self";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Positional,
    /// `*args`
    VarPositional,
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annotation: Option<String>,
}

impl Param {
    fn of_kind(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            annotation: None,
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self::of_kind(name, ParamKind::Positional)
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::of_kind(name, ParamKind::VarPositional)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::of_kind(name, ParamKind::KeywordOnly)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::of_kind(name, ParamKind::VarKeyword)
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn annotated(mut self, ty: impl Into<String>) -> Self {
        self.annotation = Some(ty.into());
        self
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::VarPositional => f.write_str("*")?,
            ParamKind::VarKeyword => f.write_str("**")?,
            ParamKind::Positional | ParamKind::KeywordOnly => {}
        }
        f.write_str(&self.name)?;
        if let Some(ty) = &self.annotation {
            write!(f, ": {}", ty)?;
        }
        match (&self.default, &self.annotation) {
            (Some(value), Some(_)) => write!(f, " = {}", DefaultText(value)),
            (Some(value), None) => write!(f, "={}", DefaultText(value)),
            (None, _) => Ok(()),
        }
    }
}

/// Default value as shown in signatures: strings single-quoted, other values
/// as JSON.
struct DefaultText<'a>(&'a Value);

impl fmt::Display for DefaultText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => {
                let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
                write!(f, "'{}'", escaped)
            }
            other => write!(f, "{}", other),
        }
    }
}

/// Why call arguments could not be bound to a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("missing required argument(s): {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("takes {expected} positional argument(s) but {given} were given")]
    TooMany { expected: usize, given: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub returns: Option<String>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signature starting with the `self` receiver.
    pub fn method() -> Self {
        Self::new().param(Param::new(RECEIVER))
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn has_receiver(&self) -> bool {
        self.params
            .first()
            .is_some_and(|p| p.kind == ParamKind::Positional && p.name == RECEIVER)
    }

    /// Bind positional call arguments (receiver excluded) to the parameters.
    ///
    /// Returns one value per non-receiver parameter: var-positional extras are
    /// packed into an array, a var-keyword parameter binds an empty object,
    /// keyword-only parameters take their defaults.
    pub fn bind(&self, args: &[Value]) -> Result<Vec<Value>, BindError> {
        let skip = usize::from(self.has_receiver());
        let mut remaining = args.iter();
        let mut bound = Vec::with_capacity(self.params.len() - skip);
        let mut missing = Vec::new();
        let mut accepts_extra = false;

        for param in &self.params[skip..] {
            match param.kind {
                ParamKind::Positional => match remaining.next() {
                    Some(value) => bound.push(value.clone()),
                    None => match &param.default {
                        Some(default) => bound.push(default.clone()),
                        None => missing.push(format!("'{}'", param.name)),
                    },
                },
                ParamKind::VarPositional => {
                    accepts_extra = true;
                    bound.push(Value::Array(remaining.by_ref().cloned().collect()));
                }
                ParamKind::KeywordOnly => match &param.default {
                    Some(default) => bound.push(default.clone()),
                    None => missing.push(format!("'{}'", param.name)),
                },
                ParamKind::VarKeyword => bound.push(Value::Object(Default::default())),
            }
        }

        if !missing.is_empty() {
            return Err(BindError::Missing(missing));
        }
        if !accepts_extra && !remaining.as_slice().is_empty() {
            let expected = self.params[skip..]
                .iter()
                .filter(|p| p.kind == ParamKind::Positional)
                .count();
            return Err(BindError::TooMany {
                expected,
                given: args.len(),
            });
        }
        Ok(bound)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let mut seen_var_positional = false;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match param.kind {
                ParamKind::VarPositional => seen_var_positional = true,
                ParamKind::KeywordOnly if !seen_var_positional => {
                    f.write_str("*, ")?;
                    seen_var_positional = true;
                }
                _ => {}
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")?;
        if let Some(ty) = &self.returns {
            write!(f, " -> {}", ty)?;
        }
        Ok(())
    }
}

/// Value equality with numeric semantics: `1` equals `1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                x.as_f64() == y.as_f64()
            } else {
                x == y
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Truthiness of a flag value: false, null, zero, and empty values are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
