/*! Core data model and forward slicing pipeline for TaintSlice.
 *
 * Auditing a compiled program for data-flow leaks starts from the places where a value escapes a
 * sensitive operation. This crate provides the call graph, type hierarchy, and statement model the
 * pipeline works over, plus the analyses that turn a set of taint-source signatures into forward
 * interprocedural slices: every statement whose outcome can be influenced by a sensitive call's
 * return value.
 */

pub mod analysis;
pub mod engine;
pub mod graph;
pub mod hierarchy;
pub mod ir;
pub mod points_to;
pub mod statement;
pub mod types;

pub use analysis::callsites::{find_application_callers, find_call_sites};
pub use analysis::criteria::derive_return_criterion;
pub use analysis::pipeline::{Pipeline, SliceReport, TaintSourceSet};
pub use analysis::slicer::{
    ControlDependenceOptions, DataDependenceOptions, ForwardSlicer, Slice,
};
pub use analysis::sources::{find_implementors, SourceSpec};
pub use engine::{Algorithm, AnalysisEngine, AnalysisResult, ScopeConfig};
pub use graph::{CallGraph, CallGraphNode, Context, Loader, NodeId};
pub use hierarchy::{MethodDecl, TypeHierarchy, TypeInfo};
pub use ir::{Instruction, MethodIr, SiteId, ValueId};
pub use points_to::{AllocationSite, PointsToResult};
pub use statement::{Statement, StatementKind};
pub use types::{Descriptor, FieldRef, MethodSignature, TypeName};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SliceError {
    #[error("unresolved type: {0}")]
    UnresolvedType(TypeName),
    #[error("cannot slice forward from a call to {0}: the declared target returns void")]
    VoidReturn(MethodSignature),
    #[error("no call site for {target} found in {node} despite a call graph edge")]
    CallSiteNotFound {
        node: NodeId,
        target: MethodSignature,
    },
    #[error("call site for {target} in {node} resolves to indices {indices:?}, expected exactly one")]
    AmbiguousCallSite {
        node: NodeId,
        target: MethodSignature,
        indices: Vec<usize>,
    },
    #[error("statement {0} does not name an instruction in its node")]
    InvalidStatement(Statement),
    #[error("unknown call graph node: {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, SliceError>;

#[cfg(test)]
mod tests;
