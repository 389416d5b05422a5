/*! Flow-insensitive allocation-site points-to analysis.
 *
 * Every `New` seeds its own allocation site. Copies and phis union their
 * operands' sets, heap flow is field-based (one summary set per field,
 * regardless of base object), and calls transfer argument sets into callee
 * parameters and callee return sets back into invoke results. The transfer
 * functions are monotone over finite sets, so the sweep reaches a fixpoint.
 */

use std::collections::{HashMap, HashSet};
use taintslice_core::{
    AllocationSite, CallGraph, FieldRef, Instruction, NodeId, PointsToResult, ValueId,
};

/// Computes the points-to result for every (node, value) pair in the graph.
pub fn analyze(graph: &CallGraph) -> PointsToResult {
    let mut result = PointsToResult::new();
    let mut fields: HashMap<FieldRef, HashSet<AllocationSite>> = HashMap::new();

    // Seeds never change across sweeps.
    for node in graph.nodes() {
        for (index, inst) in node.ir.iter() {
            if let Instruction::New { result: value, .. } = inst {
                result.insert(node.id, *value, AllocationSite { node: node.id, index });
            }
        }
    }

    loop {
        let mut changed = false;
        let mut updates: Vec<(NodeId, ValueId, HashSet<AllocationSite>)> = Vec::new();

        for node in graph.nodes() {
            for (_, inst) in node.ir.iter() {
                match inst {
                    Instruction::Assign { result: dest, source } => {
                        copy(&result, node.id, *source, node.id, *dest, &mut updates);
                    }
                    Instruction::Phi { result: dest, operands } => {
                        for operand in operands {
                            copy(&result, node.id, *operand, node.id, *dest, &mut updates);
                        }
                    }
                    Instruction::Store { field, value, .. } => {
                        if let Some(sites) = result.points_to(node.id, *value) {
                            let summary = fields.entry(field.clone()).or_default();
                            for site in sites {
                                changed |= summary.insert(*site);
                            }
                        }
                    }
                    Instruction::Load { result: dest, field, .. } => {
                        if let Some(summary) = fields.get(field) {
                            if !summary.is_empty() {
                                updates.push((node.id, *dest, summary.clone()));
                            }
                        }
                    }
                    Instruction::Invoke { site, args, result: ret, .. } => {
                        for callee in graph.callees_at(node.id, *site) {
                            transfer_call(&result, graph, node.id, args, *ret, *callee, &mut updates);
                        }
                    }
                    _ => {}
                }
            }
        }

        for (node, value, sites) in updates {
            changed |= result.extend(node, value, sites);
        }
        if !changed {
            break;
        }
    }

    result
}

fn copy(
    result: &PointsToResult,
    from_node: NodeId,
    from_value: ValueId,
    to_node: NodeId,
    to_value: ValueId,
    updates: &mut Vec<(NodeId, ValueId, HashSet<AllocationSite>)>,
) {
    if let Some(sites) = result.points_to(from_node, from_value) {
        if !sites.is_empty() {
            updates.push((to_node, to_value, sites.clone()));
        }
    }
}

fn transfer_call(
    result: &PointsToResult,
    graph: &CallGraph,
    caller: NodeId,
    args: &[ValueId],
    ret: Option<ValueId>,
    callee: NodeId,
    updates: &mut Vec<(NodeId, ValueId, HashSet<AllocationSite>)>,
) {
    let Some(callee_node) = graph.node(callee) else {
        return;
    };

    for (arg, param) in args.iter().zip(callee_node.ir.params.iter()) {
        copy(result, caller, *arg, callee, *param, updates);
    }

    if let Some(ret_value) = ret {
        for (_, inst) in callee_node.ir.iter() {
            if let Instruction::Return { value: Some(returned) } = inst {
                copy(result, callee, *returned, caller, ret_value, updates);
            }
        }
    }
}
