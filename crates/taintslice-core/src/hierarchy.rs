use crate::types::{Descriptor, MethodSignature, TypeName};
use crate::SliceError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A method as declared on one type. The signature's owner is the declaring
/// type, which matters for inherited methods: a subclass that does not
/// override keeps the superclass's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub descriptor: Descriptor,
    pub is_abstract: bool,
}

impl MethodDecl {
    pub fn signature(&self, owner: &TypeName) -> MethodSignature {
        MethodSignature::new(owner.clone(), self.name.clone(), self.descriptor.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: TypeName,
    pub superclass: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    pub is_abstract: bool,
    pub methods: Vec<MethodDecl>,
}

/// The program's type hierarchy: name resolution, subtype closure, and
/// method-set enumeration with override shadowing.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    types: IndexMap<TypeName, TypeInfo>,
    direct_subtypes: HashMap<TypeName, Vec<TypeName>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_types(types: impl IntoIterator<Item = TypeInfo>) -> Self {
        let mut hierarchy = Self::new();
        for info in types {
            hierarchy.add_type(info);
        }
        hierarchy
    }

    pub fn add_type(&mut self, info: TypeInfo) {
        if let Some(superclass) = &info.superclass {
            self.direct_subtypes
                .entry(superclass.clone())
                .or_default()
                .push(info.name.clone());
        }
        for interface in &info.interfaces {
            self.direct_subtypes
                .entry(interface.clone())
                .or_default()
                .push(info.name.clone());
        }
        self.types.insert(info.name.clone(), info);
    }

    pub fn resolve(&self, name: &TypeName) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Direct and transitive subtypes of `base`, including `base` itself.
    ///
    /// Fails with [`SliceError::UnresolvedType`] when `base` is not in the
    /// hierarchy at all.
    pub fn subtype_closure(&self, base: &TypeName) -> crate::Result<IndexSet<TypeName>> {
        if !self.contains(base) {
            return Err(SliceError::UnresolvedType(base.clone()));
        }

        let mut closure = IndexSet::new();
        let mut worklist = vec![base.clone()];
        while let Some(current) = worklist.pop() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(children) = self.direct_subtypes.get(&current) {
                worklist.extend(children.iter().cloned());
            }
        }
        Ok(closure)
    }

    /// The full method set of `name`, including methods inherited through
    /// superclasses and interfaces, with override shadowing: the declaration
    /// nearest the type hides any farther one with the same name and
    /// descriptor. Supertypes are walked breadth-first, superclass before
    /// interfaces, so class declarations win over interface defaults.
    ///
    /// Returns each method paired with its abstractness.
    pub fn all_methods(&self, name: &TypeName) -> Vec<(MethodSignature, bool)> {
        let mut seen: IndexSet<(String, Descriptor)> = IndexSet::new();
        let mut visited: IndexSet<TypeName> = IndexSet::new();
        let mut methods = Vec::new();
        let mut queue = VecDeque::from([name.clone()]);

        while let Some(type_name) = queue.pop_front() {
            if !visited.insert(type_name.clone()) {
                continue;
            }
            let Some(info) = self.resolve(&type_name) else {
                continue;
            };
            for decl in &info.methods {
                if seen.insert((decl.name.clone(), decl.descriptor.clone())) {
                    methods.push((decl.signature(&info.name), decl.is_abstract));
                }
            }
            if let Some(superclass) = &info.superclass {
                queue.push_back(superclass.clone());
            }
            queue.extend(info.interfaces.iter().cloned());
        }

        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, ret: Option<&str>, is_abstract: bool) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            descriptor: Descriptor::new(vec![], ret.map(TypeName::from)),
            is_abstract,
        }
    }

    fn class(
        name: &str,
        superclass: Option<&str>,
        is_abstract: bool,
        methods: Vec<MethodDecl>,
    ) -> TypeInfo {
        TypeInfo {
            name: TypeName::from(name),
            superclass: superclass.map(TypeName::from),
            interfaces: vec![],
            is_abstract,
            methods,
        }
    }

    #[test]
    fn closure_is_reflexive_and_transitive() {
        let hierarchy = TypeHierarchy::from_types(vec![
            class("lib.Base", None, true, vec![]),
            class("lib.Mid", Some("lib.Base"), true, vec![]),
            class("lib.Leaf", Some("lib.Mid"), false, vec![]),
            class("lib.Other", None, false, vec![]),
        ]);

        let closure = hierarchy.subtype_closure(&TypeName::from("lib.Base")).unwrap();
        assert!(closure.contains(&TypeName::from("lib.Base")));
        assert!(closure.contains(&TypeName::from("lib.Mid")));
        assert!(closure.contains(&TypeName::from("lib.Leaf")));
        assert!(!closure.contains(&TypeName::from("lib.Other")));
    }

    #[test]
    fn unresolved_base_type_is_an_error() {
        let hierarchy = TypeHierarchy::new();
        let err = hierarchy
            .subtype_closure(&TypeName::from("lib.Missing"))
            .unwrap_err();
        assert_eq!(err, SliceError::UnresolvedType(TypeName::from("lib.Missing")));
    }

    #[test]
    fn interface_implementors_are_subtypes() {
        let mut hierarchy = TypeHierarchy::new();
        hierarchy.add_type(class("lib.Readable", None, true, vec![]));
        hierarchy.add_type(TypeInfo {
            name: TypeName::from("app.Impl"),
            superclass: None,
            interfaces: vec![TypeName::from("lib.Readable")],
            is_abstract: false,
            methods: vec![],
        });

        let closure = hierarchy
            .subtype_closure(&TypeName::from("lib.Readable"))
            .unwrap();
        assert!(closure.contains(&TypeName::from("app.Impl")));
    }

    #[test]
    fn inherited_methods_keep_declaring_owner_and_overrides_shadow() {
        let hierarchy = TypeHierarchy::from_types(vec![
            class(
                "lib.Base",
                None,
                true,
                vec![decl("read", Some("int"), true), decl("close", None, false)],
            ),
            class(
                "app.Impl",
                Some("lib.Base"),
                false,
                vec![decl("read", Some("int"), false)],
            ),
        ]);

        let methods = hierarchy.all_methods(&TypeName::from("app.Impl"));
        let read = methods
            .iter()
            .find(|(sig, _)| sig.name == "read")
            .expect("read present");
        assert_eq!(read.0.owner, TypeName::from("app.Impl"));
        assert!(!read.1, "override is concrete");

        let close = methods
            .iter()
            .find(|(sig, _)| sig.name == "close")
            .expect("close inherited");
        assert_eq!(close.0.owner, TypeName::from("lib.Base"));
    }

    #[test]
    fn interface_default_methods_are_inherited() {
        let mut hierarchy = TypeHierarchy::new();
        hierarchy.add_type(class(
            "lib.Readable",
            None,
            true,
            vec![decl("read", Some("int"), false)],
        ));
        hierarchy.add_type(TypeInfo {
            name: TypeName::from("app.Impl"),
            superclass: None,
            interfaces: vec![TypeName::from("lib.Readable")],
            is_abstract: false,
            methods: vec![],
        });

        let methods = hierarchy.all_methods(&TypeName::from("app.Impl"));
        let read = methods
            .iter()
            .find(|(sig, _)| sig.name == "read")
            .expect("default method inherited through the interface");
        assert_eq!(read.0.owner, TypeName::from("lib.Readable"));
        assert!(!read.1);
    }

    #[test]
    fn class_declarations_shadow_interface_defaults() {
        let mut hierarchy = TypeHierarchy::new();
        hierarchy.add_type(class(
            "lib.Readable",
            None,
            true,
            vec![decl("read", Some("int"), false)],
        ));
        hierarchy.add_type(class(
            "lib.Base",
            None,
            false,
            vec![decl("read", Some("int"), false)],
        ));
        hierarchy.add_type(TypeInfo {
            name: TypeName::from("app.Impl"),
            superclass: Some(TypeName::from("lib.Base")),
            interfaces: vec![TypeName::from("lib.Readable")],
            is_abstract: false,
            methods: vec![],
        });

        let methods = hierarchy.all_methods(&TypeName::from("app.Impl"));
        let reads: Vec<_> = methods.iter().filter(|(sig, _)| sig.name == "read").collect();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].0.owner, TypeName::from("lib.Base"));
    }
}
