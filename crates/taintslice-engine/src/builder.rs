/*! Call graph construction over a program model.
 *
 * Scope exclusions trim classes before anything else sees them. Dispatch is
 * class-hierarchy based: an invoke's possible callees are the concrete
 * overrides of the declared target across the subtype closure of its owner.
 * Context policy is decided per call edge by the selected algorithm.
 */

use anyhow::{bail, Result};
use std::collections::HashMap;
use taintslice_core::{
    Algorithm, CallGraph, Context, Instruction, Loader, MethodIr, MethodSignature, NodeId,
    ScopeConfig, SiteId, TypeHierarchy, TypeName,
};

use crate::model::{ClassModel, MethodModel, ProgramModel};

/// Classes whose methods stay context-insensitive under `ContainerOneCfa`.
const CONTAINER_PREFIXES: &[&str] = &["java.util.", "java.lang.reflect."];

fn is_container(owner: &TypeName) -> bool {
    CONTAINER_PREFIXES
        .iter()
        .any(|prefix| owner.as_str().starts_with(prefix))
}

/// The model after scope trimming, indexed for lookup during construction.
pub struct ScopedProgram<'a> {
    classes: HashMap<TypeName, &'a ClassModel>,
    bodies: HashMap<MethodSignature, &'a MethodModel>,
}

impl<'a> ScopedProgram<'a> {
    pub fn new(model: &'a ProgramModel, scope: &ScopeConfig) -> Self {
        let mut classes = HashMap::new();
        let mut bodies = HashMap::new();
        for class in &model.classes {
            if scope.excludes(class.name.as_str()) {
                continue;
            }
            classes.insert(class.name.clone(), class);
            for method in &class.methods {
                bodies.insert(method.signature(&class.name), method);
            }
        }
        Self { classes, bodies }
    }

    pub fn hierarchy(&self) -> TypeHierarchy {
        TypeHierarchy::from_types(self.classes.values().map(|c| c.type_info()))
    }

    fn class(&self, name: &TypeName) -> Option<&'a ClassModel> {
        self.classes.get(name).copied()
    }

    fn method(&self, signature: &MethodSignature) -> Option<&'a MethodModel> {
        self.bodies.get(signature).copied()
    }

    fn loader_of(&self, owner: &TypeName) -> Loader {
        self.class(owner).map(|c| c.loader).unwrap_or_default()
    }

    fn ir_of(&self, signature: &MethodSignature) -> MethodIr {
        self.method(signature)
            .and_then(|m| m.body.as_ref())
            .map(|b| b.to_ir())
            .unwrap_or_else(MethodIr::empty)
    }
}

/// All concrete methods an invoke of `target` may dispatch to.
///
/// Walks the subtype closure of the declared owner and collects each
/// subtype's resolved implementation of the target's name and descriptor,
/// attributed to its declaring type. An owner missing from the hierarchy
/// resolves to nothing; the site simply has no callees.
fn dispatch(hierarchy: &TypeHierarchy, target: &MethodSignature) -> Vec<MethodSignature> {
    let Ok(closure) = hierarchy.subtype_closure(&target.owner) else {
        return Vec::new();
    };

    let mut callees = Vec::new();
    for subtype in &closure {
        for (signature, is_abstract) in hierarchy.all_methods(subtype) {
            if is_abstract
                || signature.name != target.name
                || signature.descriptor != target.descriptor
            {
                continue;
            }
            if !callees.contains(&signature) {
                callees.push(signature);
            }
        }
    }
    callees
}

fn callee_context(
    algorithm: Algorithm,
    caller: &MethodSignature,
    site: SiteId,
    callee: &MethodSignature,
) -> Context {
    let qualified = Context::CallSite {
        caller: caller.clone(),
        site,
    };
    match algorithm {
        Algorithm::ZeroCfa => Context::Root,
        Algorithm::VanillaOneCfa => qualified,
        Algorithm::ContainerOneCfa => {
            if is_container(&callee.owner) {
                Context::Root
            } else {
                qualified
            }
        }
    }
}

/// Builds the whole-program call graph from the model's entry points.
pub fn build_call_graph(
    program: &ScopedProgram<'_>,
    hierarchy: &TypeHierarchy,
    model: &ProgramModel,
    algorithm: Algorithm,
) -> Result<CallGraph> {
    let mut graph = CallGraph::new();
    let mut worklist: Vec<NodeId> = Vec::new();

    for key in &model.entrypoints {
        let Some(class) = program.class(&key.owner) else {
            continue;
        };
        for method in class.methods.iter().filter(|m| m.name == key.name) {
            let signature = method.signature(&class.name);
            let ir = program.ir_of(&signature);
            let node = graph.add_node(signature, Context::Root, class.loader, ir);
            graph.add_entrypoint(node);
            worklist.push(node);
        }
    }
    if graph.entrypoints().is_empty() {
        bail!("no entry point resolved within the analysis scope");
    }

    while let Some(current) = worklist.pop() {
        let (caller_method, sites) = {
            let node = graph
                .node(current)
                .ok_or_else(|| anyhow::anyhow!("node {current} vanished during construction"))?;
            let sites: Vec<(SiteId, MethodSignature)> = node
                .ir
                .iter()
                .filter_map(|(_, inst)| match inst {
                    Instruction::Invoke { site, target, .. } => Some((*site, target.clone())),
                    _ => None,
                })
                .collect();
            (node.method.clone(), sites)
        };

        for (site, target) in sites {
            for callee in dispatch(hierarchy, &target) {
                let context = callee_context(algorithm, &caller_method, site, &callee);
                let callee_node = match graph.find_node(&callee, &context) {
                    Some(existing) => existing,
                    None => {
                        let loader = program.loader_of(&callee.owner);
                        let ir = program.ir_of(&callee);
                        let node = graph.add_node(callee.clone(), context.clone(), loader, ir);
                        worklist.push(node);
                        node
                    }
                };
                graph.add_call_edge(current, site, callee_node);
            }
        }
    }

    Ok(graph)
}
