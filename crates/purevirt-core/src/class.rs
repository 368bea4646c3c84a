//! Classes, instances, and attribute resolution.
//!
//! Classes are immutable once created and shared as [`ClassRef`]. Lookups walk
//! the class itself first, then its C3 method resolution order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::method::MethodRef;
use crate::mro;
use crate::signature::Value;
use crate::types::{ClassDescriptor, PureVirtualError};

pub type ClassRef = Arc<Class>;

/// Name of the optional initializer run by instantiation.
pub const INITIALIZER: &str = "__init__";

/// Member lookup shared by classes and instances.
pub trait Members {
    /// Name of the class, or of the instance's class.
    fn type_name(&self) -> &str;

    /// Resolve a method by name along the lookup path.
    fn resolve(&self, name: &str) -> Option<MethodRef>;

    /// Every resolvable method keyed by name, as seen through the lookup path.
    fn routines(&self) -> BTreeMap<String, MethodRef>;

    /// Resolve a plain attribute by name along the lookup path.
    fn attribute(&self, name: &str) -> Option<Value>;
}

impl<T: Members + ?Sized> Members for Arc<T> {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn resolve(&self, name: &str) -> Option<MethodRef> {
        (**self).resolve(name)
    }

    fn routines(&self) -> BTreeMap<String, MethodRef> {
        (**self).routines()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}

/// A class body waiting to be defined.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<ClassRef>,
    pub methods: Vec<MethodRef>,
    pub attributes: BTreeMap<String, Value>,
    pub file: Option<String>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            methods: Vec::new(),
            attributes: BTreeMap::new(),
            file: None,
        }
    }

    pub fn base(mut self, base: &ClassRef) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Add a method. A later method with the same name replaces an earlier one.
    pub fn method(mut self, method: MethodRef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Source location shown in declaration errors.
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

#[derive(Debug)]
pub struct Class {
    name: String,
    bases: Vec<ClassRef>,
    methods: BTreeMap<String, MethodRef>,
    attributes: BTreeMap<String, Value>,
    file: Option<String>,
    mro: Vec<ClassRef>,
    descriptor: ClassDescriptor,
}

impl Class {
    /// Assemble a class from its definition without the class-creation hook.
    /// Only the resolution order is checked; `Runtime::define` in the
    /// enforcement crate runs pure virtual validation.
    pub fn from_def_unchecked(def: ClassDef) -> Result<Self, PureVirtualError> {
        let mro = mro::linearize(&def.name, &def.bases)?;
        let methods = def
            .methods
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect();
        Ok(Self {
            descriptor: ClassDescriptor {
                has_base_class: !def.bases.is_empty(),
            },
            name: def.name,
            bases: def.bases,
            methods,
            attributes: def.attributes,
            file: def.file,
            mro,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[ClassRef] {
        &self.bases
    }

    /// Ancestors in resolution order, the class itself excluded.
    pub fn mro(&self) -> &[ClassRef] {
        &self.mro
    }

    pub fn descriptor(&self) -> ClassDescriptor {
        self.descriptor
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Methods defined directly in this class body.
    pub fn own_methods(&self) -> &BTreeMap<String, MethodRef> {
        &self.methods
    }

    pub fn own_attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    fn lookup_path(&self) -> impl Iterator<Item = &Class> {
        std::iter::once(self).chain(self.mro.iter().map(|c| &**c))
    }
}

impl Members for Class {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, name: &str) -> Option<MethodRef> {
        self.lookup_path()
            .find_map(|c| c.methods.get(name))
            .map(Arc::clone)
    }

    fn routines(&self) -> BTreeMap<String, MethodRef> {
        let mut table = BTreeMap::new();
        for class in self.lookup_path() {
            for (name, method) in &class.methods {
                table
                    .entry(name.clone())
                    .or_insert_with(|| Arc::clone(method));
            }
        }
        table
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.lookup_path()
            .find_map(|c| c.attributes.get(name))
            .cloned()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}

/// An object of a defined class with its own attribute table.
#[derive(Debug)]
pub struct Instance {
    class: ClassRef,
    attributes: RwLock<BTreeMap<String, Value>>,
}

impl Instance {
    /// Allocation without the instance-creation hook: no initializer, no gate.
    /// `Runtime::instantiate` in the enforcement crate does both.
    pub fn allocate_unchecked(class: ClassRef) -> Self {
        Self {
            class,
            attributes: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.write().insert(name.into(), value.into());
    }

    /// Call a method resolved through the class.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, PureVirtualError> {
        let method = self
            .class
            .resolve(name)
            .ok_or_else(|| PureVirtualError::NoSuchMethod {
                class: self.class.name().to_string(),
                method: name.to_string(),
            })?;
        method.invoke(self, args)
    }
}

impl Members for Instance {
    fn type_name(&self) -> &str {
        self.class.name()
    }

    fn resolve(&self, name: &str) -> Option<MethodRef> {
        self.class.resolve(name)
    }

    fn routines(&self) -> BTreeMap<String, MethodRef> {
        self.class.routines()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).or_else(|| self.class.attribute(name))
    }
}
