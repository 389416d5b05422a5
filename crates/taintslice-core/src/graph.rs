use crate::ir::{MethodIr, SiteId};
use crate::types::MethodSignature;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of one node in the whole-program call graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Which logical loader produced a node's declaring type.
///
/// Only `Application` nodes are valid slicing roots: sensitive-operation
/// implementations live in platform code and must never seed a slice
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Loader {
    Application,
    Platform,
    Bootstrap,
}

impl Loader {
    pub fn is_application(self) -> bool {
        matches!(self, Loader::Application)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Loader::Application
    }
}

/// Calling context qualifying a node.
///
/// `Root` is the context-insensitive activation; `CallSite` qualifies a node
/// by the immediate call site that reaches it (one level, not nested).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Context {
    Root,
    CallSite {
        caller: MethodSignature,
        site: SiteId,
    },
}

/// A context-qualified method activation in the call graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallGraphNode {
    pub id: NodeId,
    pub method: MethodSignature,
    pub context: Context,
    pub loader: Loader,
    pub ir: MethodIr,
}

/// The whole-program call graph.
///
/// Edges are recorded per call site, so dependence analysis can resolve the
/// callees of one `Invoke` without conflating distinct sites in the same
/// caller. The method index replaces the per-target linear node scan; lookup
/// behavior is otherwise unchanged.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    nodes: IndexMap<NodeId, CallGraphNode>,
    site_edges: HashMap<(NodeId, SiteId), Vec<NodeId>>,
    successors: HashMap<NodeId, Vec<NodeId>>,
    predecessors: HashMap<NodeId, Vec<NodeId>>,
    reverse_site_edges: HashMap<NodeId, Vec<(NodeId, SiteId)>>,
    method_index: HashMap<MethodSignature, Vec<NodeId>>,
    entrypoints: Vec<NodeId>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        method: MethodSignature,
        context: Context,
        loader: Loader,
        ir: MethodIr,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.method_index
            .entry(method.clone())
            .or_default()
            .push(id);
        self.nodes.insert(
            id,
            CallGraphNode {
                id,
                method,
                context,
                loader,
                ir,
            },
        );
        id
    }

    pub fn add_call_edge(&mut self, caller: NodeId, site: SiteId, callee: NodeId) {
        let at_site = self.site_edges.entry((caller, site)).or_default();
        if !at_site.contains(&callee) {
            at_site.push(callee);
        }

        let succ = self.successors.entry(caller).or_default();
        if !succ.contains(&callee) {
            succ.push(callee);
        }
        let pred = self.predecessors.entry(callee).or_default();
        if !pred.contains(&caller) {
            pred.push(caller);
        }
        let rev = self.reverse_site_edges.entry(callee).or_default();
        if !rev.contains(&(caller, site)) {
            rev.push((caller, site));
        }
    }

    pub fn add_entrypoint(&mut self, node: NodeId) {
        if !self.entrypoints.contains(&node) {
            self.entrypoints.push(node);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&CallGraphNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CallGraphNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node whose owning method equals `method`, across all contexts.
    pub fn nodes_for_method(&self, method: &MethodSignature) -> &[NodeId] {
        self.method_index
            .get(method)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The node for a (method, context) pair, if the graph contains it.
    pub fn find_node(&self, method: &MethodSignature, context: &Context) -> Option<NodeId> {
        self.nodes_for_method(method)
            .iter()
            .copied()
            .find(|id| self.nodes[id].context == *context)
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.successors.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.predecessors
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Callee nodes reached from one call site in one caller node.
    pub fn callees_at(&self, caller: NodeId, site: SiteId) -> &[NodeId] {
        self.site_edges
            .get(&(caller, site))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every (caller node, site) pair with an edge into `callee`.
    pub fn calling_sites(&self, callee: NodeId) -> &[(NodeId, SiteId)] {
        self.reverse_site_edges
            .get(&callee)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn entrypoints(&self) -> &[NodeId] {
        &self.entrypoints
    }
}
