use crate::ir::{Instruction, MethodIr, ValueId};
use std::collections::HashMap;

/// Where a value is defined within one method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Def {
    /// The k-th parameter.
    Param(usize),
    /// An ordinary defining instruction at this index.
    Instruction(usize),
    /// The result of the invoke at this index. The definition belongs to the
    /// call's return-caller pseudo-statement, not the call statement itself.
    ReturnValue(usize),
}

/// Def/use chains for one method body.
#[derive(Debug, Clone, Default)]
pub struct DefUseChains {
    defs: HashMap<ValueId, Def>,
    uses: HashMap<ValueId, Vec<usize>>,
    inst_defs: HashMap<usize, Vec<ValueId>>,
    invoke_results: HashMap<usize, ValueId>,
}

impl DefUseChains {
    pub fn build(ir: &MethodIr) -> Self {
        let mut defs = HashMap::new();
        let mut uses: HashMap<ValueId, Vec<usize>> = HashMap::new();
        let mut inst_defs: HashMap<usize, Vec<ValueId>> = HashMap::new();
        let mut invoke_results = HashMap::new();

        for (position, &param) in ir.params.iter().enumerate() {
            defs.insert(param, Def::Param(position));
        }

        for (index, inst) in ir.iter() {
            if let Some(result) = inst.result() {
                if inst.is_invoke() {
                    defs.insert(result, Def::ReturnValue(index));
                    invoke_results.insert(index, result);
                } else {
                    defs.insert(result, Def::Instruction(index));
                    inst_defs.entry(index).or_default().push(result);
                }
            }
            for value in inst.uses() {
                uses.entry(value).or_default().push(index);
            }
        }

        Self {
            defs,
            uses,
            inst_defs,
            invoke_results,
        }
    }

    pub fn def(&self, value: ValueId) -> Option<Def> {
        self.defs.get(&value).copied()
    }

    /// Instruction indices that consume `value`. Branch conditions are
    /// ordinary uses; `Branch` is an instruction like any other.
    pub fn uses_of(&self, value: ValueId) -> &[usize] {
        self.uses.get(&value).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Values defined by the ordinary instruction at `index`. Excludes invoke
    /// results, which are looked up via [`Self::invoke_result`].
    pub fn defined_at(&self, index: usize) -> &[ValueId] {
        self.inst_defs
            .get(&index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The result value of the invoke at `index`, if it has one.
    pub fn invoke_result(&self, index: usize) -> Option<ValueId> {
        self.invoke_results.get(&index).copied()
    }

    pub fn is_used(&self, value: ValueId) -> bool {
        self.uses.contains_key(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SiteId;
    use crate::types::{Descriptor, MethodSignature, TypeName};

    #[test]
    fn invoke_results_are_attributed_to_the_return_site() {
        let read = MethodSignature::new(
            "java.io.InputStream",
            "read",
            Descriptor::new(vec![], Some(TypeName::from("int"))),
        );
        let ir = MethodIr::new(
            vec![ValueId(0)],
            vec![
                Instruction::Invoke {
                    site: SiteId(0),
                    target: read,
                    args: vec![ValueId(0)],
                    result: Some(ValueId(1)),
                },
                Instruction::Compute {
                    result: ValueId(2),
                    operands: vec![ValueId(1)],
                },
            ],
        );
        let chains = DefUseChains::build(&ir);

        assert_eq!(chains.def(ValueId(0)), Some(Def::Param(0)));
        assert_eq!(chains.def(ValueId(1)), Some(Def::ReturnValue(0)));
        assert_eq!(chains.def(ValueId(2)), Some(Def::Instruction(1)));
        assert_eq!(chains.invoke_result(0), Some(ValueId(1)));
        assert!(chains.defined_at(0).is_empty());
        assert_eq!(chains.uses_of(ValueId(1)), &[1]);
        assert_eq!(chains.uses_of(ValueId(0)), &[0]);
    }
}
