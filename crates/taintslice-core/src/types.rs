use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified name of a type, e.g. `java.io.InputStream`.
///
/// Types are identified structurally by name; the hierarchy resolves names to
/// [`TypeInfo`](crate::hierarchy::TypeInfo) entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Parameter and return shape of a method. `ret == None` means void.
///
/// Descriptors compare structurally, so two call graph representations of the
/// same signature always match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    pub params: Vec<TypeName>,
    pub ret: Option<TypeName>,
}

impl Descriptor {
    pub fn new(params: Vec<TypeName>, ret: Option<TypeName>) -> Self {
        Self { params, ret }
    }

    pub fn returns_void(&self) -> bool {
        self.ret.is_none()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{param}")?;
        }
        match &self.ret {
            Some(ret) => write!(f, "){ret}"),
            None => write!(f, ")void"),
        }
    }
}

/// Opaque identifier of a method: declaring type, name, and descriptor.
///
/// Usable as a map key; equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub owner: TypeName,
    pub name: String,
    pub descriptor: Descriptor,
}

impl MethodSignature {
    pub fn new(owner: impl Into<TypeName>, name: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor,
        }
    }

    pub fn return_type(&self) -> Option<&TypeName> {
        self.descriptor.ret.as_ref()
    }

    pub fn returns_void(&self) -> bool {
        self.descriptor.returns_void()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.descriptor)
    }
}

/// Identity of one heap field, used to relate stores and loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub owner: TypeName,
    pub name: String,
}

impl FieldRef {
    pub fn new(owner: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}
