use crate::graph::{CallGraph, NodeId};
use crate::ir::Instruction;
use crate::statement::Statement;
use crate::types::MethodSignature;
use crate::SliceError;
use indexmap::IndexSet;

/// Application-code nodes with a call edge into any activation of `target`.
///
/// Library and platform callers are always excluded: the implementations of
/// sensitive operations call each other internally, and those internal call
/// sites are never valid slicing roots.
pub fn find_application_callers(graph: &CallGraph, target: &MethodSignature) -> IndexSet<NodeId> {
    let mut callers = IndexSet::new();
    for &callee in graph.nodes_for_method(target) {
        for &pred in graph.predecessors(callee) {
            let is_application = graph
                .node(pred)
                .map(|node| node.loader.is_application())
                .unwrap_or(false);
            if is_application {
                callers.insert(pred);
            }
        }
    }
    callers
}

/// The call statements within one node that invoke `target`, matched by
/// structural descriptor comparison against the declared target.
///
/// The caller is expected to have come out of [`find_application_callers`];
/// finding no site in a node the call graph says calls `target` means the
/// edge view and the instruction view of the same node disagree, which is an
/// engine defect and fails fast.
pub fn find_call_sites(
    graph: &CallGraph,
    node_id: NodeId,
    target: &MethodSignature,
) -> crate::Result<Vec<Statement>> {
    let node = graph.node(node_id).ok_or(SliceError::UnknownNode(node_id))?;

    let mut statements = Vec::new();
    for (_, inst) in node.ir.iter() {
        if let Instruction::Invoke {
            site,
            target: declared,
            ..
        } = inst
        {
            if declared.descriptor == target.descriptor {
                let indices = node.ir.call_site_indices(*site);
                if indices.len() != 1 {
                    return Err(SliceError::AmbiguousCallSite {
                        node: node_id,
                        target: target.clone(),
                        indices,
                    });
                }
                statements.push(Statement::normal(node_id, indices[0]));
            }
        }
    }

    if statements.is_empty() {
        return Err(SliceError::CallSiteNotFound {
            node: node_id,
            target: target.clone(),
        });
    }
    Ok(statements)
}
