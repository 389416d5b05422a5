use crate::hierarchy::TypeHierarchy;
use crate::types::{MethodSignature, TypeName};
use indexmap::IndexSet;

/// What counts as a sensitive operation: a base type plus a name prefix and
/// exact return type its concrete implementations must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub base_type: TypeName,
    pub name_prefix: String,
    pub return_type: TypeName,
}

impl SourceSpec {
    pub fn new(
        base_type: impl Into<TypeName>,
        name_prefix: impl Into<String>,
        return_type: impl Into<TypeName>,
    ) -> Self {
        Self {
            base_type: base_type.into(),
            name_prefix: name_prefix.into(),
            return_type: return_type.into(),
        }
    }
}

/// Concrete methods, reachable through the subtype hierarchy of the spec's
/// base type, whose name starts with the spec's prefix and whose return type
/// structurally equals the spec's return type.
///
/// Abstract classes are skipped entirely (no concrete dispatch target), as
/// are abstract method declarations on concrete classes' superclasses. A base
/// type without matching subtypes yields an empty set; a base type missing
/// from the hierarchy is an error.
pub fn find_implementors(
    hierarchy: &TypeHierarchy,
    spec: &SourceSpec,
) -> crate::Result<IndexSet<MethodSignature>> {
    let closure = hierarchy.subtype_closure(&spec.base_type)?;

    let mut methods = IndexSet::new();
    for type_name in &closure {
        let Some(info) = hierarchy.resolve(type_name) else {
            continue;
        };
        if info.is_abstract {
            continue;
        }
        for (signature, is_abstract) in hierarchy.all_methods(type_name) {
            if is_abstract {
                continue;
            }
            if signature.name.starts_with(&spec.name_prefix)
                && signature.descriptor.ret.as_ref() == Some(&spec.return_type)
            {
                methods.insert(signature);
            }
        }
    }

    Ok(methods)
}
