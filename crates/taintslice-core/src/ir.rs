use crate::types::{FieldRef, MethodSignature, TypeName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SSA-style value number, local to one method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Identity of one source-level call site within a method body.
///
/// A well-formed body has exactly one instruction per site id; the call-site
/// finder verifies this when it resolves a site back to its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site{}", self.0)
    }
}

/// One instruction in a method's flat instruction stream.
///
/// Branch targets are instruction indices into the same stream; a `Branch`
/// falls through to the next index when the condition does not take it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Const {
        result: ValueId,
    },
    Assign {
        result: ValueId,
        source: ValueId,
    },
    Compute {
        result: ValueId,
        operands: Vec<ValueId>,
    },
    New {
        result: ValueId,
        class: TypeName,
    },
    Load {
        result: ValueId,
        object: ValueId,
        field: FieldRef,
    },
    Store {
        object: ValueId,
        field: FieldRef,
        value: ValueId,
    },
    Invoke {
        site: SiteId,
        target: MethodSignature,
        args: Vec<ValueId>,
        result: Option<ValueId>,
    },
    Branch {
        condition: ValueId,
        target: usize,
    },
    Goto {
        target: usize,
    },
    Return {
        value: Option<ValueId>,
    },
    Phi {
        result: ValueId,
        operands: Vec<ValueId>,
    },
}

impl Instruction {
    pub fn is_invoke(&self) -> bool {
        matches!(self, Instruction::Invoke { .. })
    }

    /// The value this instruction defines, including an `Invoke`'s result.
    ///
    /// Dependence analysis attributes an invoke result to the call's
    /// return-caller pseudo-statement instead; see
    /// [`DefUseChains`](crate::analysis::defuse::DefUseChains).
    pub fn result(&self) -> Option<ValueId> {
        match self {
            Instruction::Const { result }
            | Instruction::Assign { result, .. }
            | Instruction::Compute { result, .. }
            | Instruction::New { result, .. }
            | Instruction::Load { result, .. }
            | Instruction::Phi { result, .. } => Some(*result),
            Instruction::Invoke { result, .. } => *result,
            _ => None,
        }
    }

    /// Every value this instruction consumes.
    pub fn uses(&self) -> Vec<ValueId> {
        match self {
            Instruction::Const { .. } | Instruction::Goto { .. } => Vec::new(),
            Instruction::Assign { source, .. } => vec![*source],
            Instruction::Compute { operands, .. } | Instruction::Phi { operands, .. } => {
                operands.clone()
            }
            Instruction::New { .. } => Vec::new(),
            Instruction::Load { object, .. } => vec![*object],
            Instruction::Store { object, value, .. } => vec![*object, *value],
            Instruction::Invoke { args, .. } => args.clone(),
            Instruction::Branch { condition, .. } => vec![*condition],
            Instruction::Return { value } => value.iter().copied().collect(),
        }
    }
}

/// A method body: parameter values plus a flat instruction stream with
/// stable indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodIr {
    pub params: Vec<ValueId>,
    pub instructions: Vec<Instruction>,
}

impl MethodIr {
    pub fn new(params: Vec<ValueId>, instructions: Vec<Instruction>) -> Self {
        Self {
            params,
            instructions,
        }
    }

    /// Body of an abstract or native method: no instructions at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Instruction)> {
        self.instructions.iter().enumerate()
    }

    /// All instruction indices carrying the given call site id.
    pub fn call_site_indices(&self, site: SiteId) -> Vec<usize> {
        self.iter()
            .filter_map(|(index, inst)| match inst {
                Instruction::Invoke { site: s, .. } if *s == site => Some(index),
                _ => None,
            })
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_site_indices_resolve_by_site_id() {
        let target = MethodSignature::new(
            "java.io.InputStream",
            "read",
            crate::types::Descriptor::new(vec![], Some(TypeName::from("int"))),
        );
        let ir = MethodIr::new(
            vec![],
            vec![
                Instruction::Invoke {
                    site: SiteId(0),
                    target: target.clone(),
                    args: vec![],
                    result: Some(ValueId(0)),
                },
                Instruction::Invoke {
                    site: SiteId(1),
                    target,
                    args: vec![],
                    result: Some(ValueId(1)),
                },
            ],
        );
        assert_eq!(ir.call_site_indices(SiteId(1)), vec![1]);
        assert_eq!(ir.call_site_indices(SiteId(7)), Vec::<usize>::new());
    }

    #[test]
    fn results_and_uses_cover_every_operand() {
        let store = Instruction::Store {
            object: ValueId(0),
            field: FieldRef::new("lib.Buf", "data"),
            value: ValueId(1),
        };
        assert_eq!(store.result(), None);
        assert_eq!(store.uses(), vec![ValueId(0), ValueId(1)]);

        let branch = Instruction::Branch {
            condition: ValueId(2),
            target: 0,
        };
        assert_eq!(branch.uses(), vec![ValueId(2)]);

        let void_call = Instruction::Invoke {
            site: SiteId(0),
            target: MethodSignature::new(
                "lib.Sink",
                "drain",
                crate::types::Descriptor::new(vec![], None),
            ),
            args: vec![ValueId(3)],
            result: None,
        };
        assert!(void_call.is_invoke());
        assert_eq!(void_call.result(), None);
        assert_eq!(void_call.uses(), vec![ValueId(3)]);
    }
}
