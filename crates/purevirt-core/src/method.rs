use std::fmt;
use std::sync::Arc;

use crate::class::{Instance, Members};
use crate::signature::{Signature, Value};
use crate::types::{PureVirtualError, PureVirtualMark};

/// Callable body of a method. Receives the instance and the bound arguments
/// (receiver excluded, see [`Signature::bind`]).
pub type MethodBody =
    Arc<dyn Fn(&Instance, &[Value]) -> Result<Value, PureVirtualError> + Send + Sync>;

/// Shared handle to a method.
pub type MethodRef = Arc<Method>;

#[derive(Clone)]
pub struct Method {
    name: String,
    signature: Signature,
    body: MethodBody,
    mark: Option<PureVirtualMark>,
}

impl Method {
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, PureVirtualError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            body: Arc::new(body),
            mark: None,
        }
    }

    /// A method whose body itself reports `NotImplemented`.
    pub fn stub(name: impl Into<String>, signature: Signature) -> Self {
        let name = name.into();
        let method = name.clone();
        Self::new(name, signature, move |instance, _| {
            Err(PureVirtualError::NotImplemented {
                class: instance.type_name().to_string(),
                method: method.clone(),
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn mark(&self) -> Option<&PureVirtualMark> {
        self.mark.as_ref()
    }

    pub fn is_pure_virtual(&self) -> bool {
        self.mark.as_ref().is_some_and(|m| m.is_pure_virtual)
    }

    /// True if both methods run the same body. Clones share their body, so a
    /// cloned base method is not an override.
    pub fn same_implementation(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }

    /// Attach a pure virtual mark. Markers are the intended caller.
    pub fn with_mark(mut self, mark: PureVirtualMark) -> Self {
        self.mark = Some(mark);
        self
    }

    /// Dispatch a call. A method marked with `force_not_implemented` fails
    /// before binding; otherwise the arguments are bound and the body runs.
    pub fn invoke(&self, instance: &Instance, args: &[Value]) -> Result<Value, PureVirtualError> {
        if let Some(mark) = &self.mark {
            if mark.is_pure_virtual && mark.force_not_implemented {
                return Err(PureVirtualError::NotImplemented {
                    class: instance.type_name().to_string(),
                    method: self.name.clone(),
                });
            }
        }
        let bound = self
            .signature
            .bind(args)
            .map_err(|e| PureVirtualError::Bind {
                method: self.name.clone(),
                reason: e.to_string(),
            })?;
        (self.body)(instance, &bound)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("mark", &self.mark)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}{}", self.name, self.signature)
    }
}
