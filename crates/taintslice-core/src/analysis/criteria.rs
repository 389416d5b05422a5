use crate::graph::CallGraph;
use crate::ir::Instruction;
use crate::statement::{Statement, StatementKind};
use crate::SliceError;

/// Convert a call statement into the criterion to slice forward from: the
/// pseudo-statement defining the call's return value in the caller.
///
/// Non-call statements pass through unchanged. A call whose declared target
/// returns void is rejected outright: this pipeline slices forward from
/// return values only, and the caller must be able to tell "no criterion
/// possible" apart from one silently dropped.
pub fn derive_return_criterion(graph: &CallGraph, statement: Statement) -> crate::Result<Statement> {
    let StatementKind::Normal { index } = statement.kind else {
        return Ok(statement);
    };
    let node = graph
        .node(statement.node)
        .ok_or(SliceError::UnknownNode(statement.node))?;

    match node.ir.get(index) {
        Some(Instruction::Invoke { target, .. }) => {
            if target.returns_void() {
                Err(SliceError::VoidReturn(target.clone()))
            } else {
                Ok(Statement::return_caller(statement.node, index))
            }
        }
        Some(_) => Ok(statement),
        None => Err(SliceError::InvalidStatement(statement)),
    }
}
