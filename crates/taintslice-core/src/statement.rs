use crate::graph::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a statement stands for within its node's instruction stream.
///
/// `Normal` is an ordinary instruction at an index. `NormalReturnCaller` is
/// the pseudo-location for "the value returned by this call, as seen by the
/// caller" and is the only valid slicing criterion derived from a call. The
/// remaining kinds exist for interprocedural edges and pass through the
/// criterion deriver unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Normal { index: usize },
    NormalReturnCaller { index: usize },
    ParamCallee { param: usize },
    MethodEntry,
    MethodExit,
}

/// A location within one call graph node, the unit of slicing criteria and
/// slice output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub node: NodeId,
    pub kind: StatementKind,
}

impl Statement {
    pub fn normal(node: NodeId, index: usize) -> Self {
        Self {
            node,
            kind: StatementKind::Normal { index },
        }
    }

    pub fn return_caller(node: NodeId, index: usize) -> Self {
        Self {
            node,
            kind: StatementKind::NormalReturnCaller { index },
        }
    }

    pub fn param_callee(node: NodeId, param: usize) -> Self {
        Self {
            node,
            kind: StatementKind::ParamCallee { param },
        }
    }

    pub fn entry(node: NodeId) -> Self {
        Self {
            node,
            kind: StatementKind::MethodEntry,
        }
    }

    pub fn exit(node: NodeId) -> Self {
        Self {
            node,
            kind: StatementKind::MethodExit,
        }
    }

    /// The instruction index this statement is anchored at, if any.
    pub fn index(&self) -> Option<usize> {
        match self.kind {
            StatementKind::Normal { index } | StatementKind::NormalReturnCaller { index } => {
                Some(index)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatementKind::Normal { index } => write!(f, "{}[normal@{index}]", self.node),
            StatementKind::NormalReturnCaller { index } => {
                write!(f, "{}[ret-caller@{index}]", self.node)
            }
            StatementKind::ParamCallee { param } => write!(f, "{}[param-callee#{param}]", self.node),
            StatementKind::MethodEntry => write!(f, "{}[entry]", self.node),
            StatementKind::MethodExit => write!(f, "{}[exit]", self.node),
        }
    }
}
