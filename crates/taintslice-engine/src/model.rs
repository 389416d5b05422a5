/*! Serialized whole-program model.
 *
 * The engine analyzes a program description loaded from disk: classes with
 * their hierarchy links and loader, methods with optional bodies in the core
 * instruction form, and a list of entry point methods. JSON on disk, loaded
 * and saved as a unit.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use taintslice_core::{
    Descriptor, Instruction, Loader, MethodDecl, MethodIr, MethodSignature, TypeInfo, TypeName,
    ValueId,
};

/// A whole program: every class in scope plus the entry points analysis
/// starts from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramModel {
    pub classes: Vec<ClassModel>,
    #[serde(default)]
    pub entrypoints: Vec<MethodKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassModel {
    pub name: TypeName,
    #[serde(default)]
    pub superclass: Option<TypeName>,
    #[serde(default)]
    pub interfaces: Vec<TypeName>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub loader: Loader,
    #[serde(default)]
    pub methods: Vec<MethodModel>,
}

impl ClassModel {
    /// The hierarchy view of this class: declarations only, no bodies.
    pub fn type_info(&self) -> TypeInfo {
        TypeInfo {
            name: self.name.clone(),
            superclass: self.superclass.clone(),
            interfaces: self.interfaces.clone(),
            is_abstract: self.is_abstract,
            methods: self
                .methods
                .iter()
                .map(|m| MethodDecl {
                    name: m.name.clone(),
                    descriptor: m.descriptor.clone(),
                    is_abstract: m.is_abstract,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodModel {
    pub name: String,
    pub descriptor: Descriptor,
    #[serde(default)]
    pub is_abstract: bool,
    /// Absent for abstract and platform-opaque methods; such methods still
    /// get call graph nodes, with empty bodies.
    #[serde(default)]
    pub body: Option<BodyModel>,
}

impl MethodModel {
    pub fn signature(&self, owner: &TypeName) -> MethodSignature {
        MethodSignature::new(owner.clone(), self.name.clone(), self.descriptor.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyModel {
    #[serde(default)]
    pub params: Vec<ValueId>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl BodyModel {
    pub fn to_ir(&self) -> MethodIr {
        MethodIr::new(self.params.clone(), self.instructions.clone())
    }
}

/// Names an entry point method. Descriptor-free: every overload with the
/// name becomes a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodKey {
    pub owner: TypeName,
    pub name: String,
}

pub fn save_model(model: &ProgramModel, path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(model)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(path, json)?;
    Ok(())
}

pub fn load_model(path: impl AsRef<Path>) -> io::Result<ProgramModel> {
    let json = fs::read_to_string(path)?;
    let model =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(model)
}
