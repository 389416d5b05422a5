use crate::ir::{Instruction, MethodIr};
use std::collections::{HashMap, HashSet};

/// Intraprocedural control dependence for one method body, computed at
/// instruction granularity over the body's implicit control flow graph.
///
/// Uses the standard postdominator construction: `j` is control dependent on
/// branch `i` when some successor of `i` is postdominated by `j` but `i`
/// itself is not. A virtual exit joins every method-leaving instruction so
/// bodies with multiple returns postdominate correctly.
#[derive(Debug, Clone, Default)]
pub struct ControlDependence {
    dependents: HashMap<usize, Vec<usize>>,
    roots: Vec<usize>,
}

impl ControlDependence {
    pub fn build(ir: &MethodIr) -> Self {
        let len = ir.len();
        if len == 0 {
            return Self::default();
        }

        let exit = len;
        let successors: Vec<Vec<usize>> = (0..len)
            .map(|index| Self::cfg_successors(ir, index, exit))
            .collect();

        let postdom = Self::postdominators(len, exit, &successors);

        let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut controlled: HashSet<usize> = HashSet::new();

        for branch in 0..len {
            if successors[branch].len() < 2 {
                continue;
            }
            for candidate in 0..len {
                let strictly_postdominates =
                    candidate != branch && postdom[&branch].contains(&candidate);
                if strictly_postdominates {
                    continue;
                }
                let on_some_path = successors[branch]
                    .iter()
                    .any(|&succ| postdom[&succ].contains(&candidate));
                if on_some_path {
                    dependents.entry(branch).or_default().push(candidate);
                    controlled.insert(candidate);
                }
            }
        }

        let roots = (0..len).filter(|i| !controlled.contains(i)).collect();

        Self { dependents, roots }
    }

    /// Successor indices with every method-leaving path routed to the
    /// virtual exit: `Return`, a target past the end of the stream, and the
    /// fall-through of the last instruction. A trailing `Branch` keeps both
    /// edges this way, so it still counts as a branch below.
    fn cfg_successors(ir: &MethodIr, index: usize, exit: usize) -> Vec<usize> {
        let len = ir.len();
        let next = index + 1;
        let next_or_exit = if next < len { next } else { exit };
        match ir.get(index) {
            Some(Instruction::Branch { target, .. }) => {
                let taken = if *target < len { *target } else { exit };
                if taken == next_or_exit {
                    vec![next_or_exit]
                } else {
                    vec![next_or_exit, taken]
                }
            }
            Some(Instruction::Goto { target }) => {
                vec![if *target < len { *target } else { exit }]
            }
            Some(Instruction::Return { .. }) | None => vec![exit],
            Some(_) => vec![next_or_exit],
        }
    }

    /// Iterative set-intersection postdominator computation over instruction
    /// indices plus the virtual exit.
    fn postdominators(
        len: usize,
        exit: usize,
        successors: &[Vec<usize>],
    ) -> HashMap<usize, HashSet<usize>> {
        let all: HashSet<usize> = (0..=exit).collect();
        let mut postdom: HashMap<usize, HashSet<usize>> = HashMap::new();
        postdom.insert(exit, HashSet::from([exit]));
        for index in 0..len {
            postdom.insert(index, all.clone());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for index in (0..len).rev() {
                let mut meet: Option<HashSet<usize>> = None;
                for &succ in &successors[index] {
                    let succ_set = &postdom[&succ];
                    meet = Some(match meet {
                        Some(acc) => acc.intersection(succ_set).copied().collect(),
                        None => succ_set.clone(),
                    });
                }
                let mut updated = meet.unwrap_or_default();
                updated.insert(index);
                if postdom[&index] != updated {
                    postdom.insert(index, updated);
                    changed = true;
                }
            }
        }

        postdom
    }

    /// Instruction indices whose execution is guarded by the branch at
    /// `index`.
    pub fn dependents_of(&self, index: usize) -> &[usize] {
        self.dependents
            .get(&index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Instructions guarded by no branch: the targets of the method-entry
    /// interprocedural control edge.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Instruction, ValueId};

    fn diamond() -> MethodIr {
        // 0: cond def, 1: branch -> 3, 2: then-side, 3: join/return
        MethodIr::new(
            vec![],
            vec![
                Instruction::Const { result: ValueId(0) },
                Instruction::Branch {
                    condition: ValueId(0),
                    target: 3,
                },
                Instruction::Compute {
                    result: ValueId(1),
                    operands: vec![ValueId(0)],
                },
                Instruction::Return { value: None },
            ],
        )
    }

    #[test]
    fn guarded_instruction_depends_on_its_branch() {
        let cd = ControlDependence::build(&diamond());
        assert_eq!(cd.dependents_of(1), &[2]);
        assert!(cd.dependents_of(0).is_empty());
    }

    #[test]
    fn join_point_is_a_root() {
        let cd = ControlDependence::build(&diamond());
        assert!(cd.roots().contains(&0));
        assert!(cd.roots().contains(&1));
        assert!(cd.roots().contains(&3), "join postdominates the branch");
        assert!(!cd.roots().contains(&2));
    }

    #[test]
    fn empty_body_has_no_dependence() {
        let cd = ControlDependence::build(&MethodIr::empty());
        assert!(cd.roots().is_empty());
    }

    #[test]
    fn loop_back_edge_controls_its_body() {
        // 0: const, 1: branch -> 3 (exit test), 2: goto 1 (body), 3: return
        let ir = MethodIr::new(
            vec![],
            vec![
                Instruction::Const { result: ValueId(0) },
                Instruction::Branch {
                    condition: ValueId(0),
                    target: 3,
                },
                Instruction::Goto { target: 1 },
                Instruction::Return { value: None },
            ],
        );
        let cd = ControlDependence::build(&ir);
        let deps = cd.dependents_of(1);
        assert!(deps.contains(&2), "loop body is guarded by the test");
    }

    #[test]
    fn trailing_branch_still_guards_the_loop_body() {
        // 0: const, 1: body, 2: branch -> 1 with the not-taken path
        // falling off the end of the method
        let ir = MethodIr::new(
            vec![],
            vec![
                Instruction::Const { result: ValueId(0) },
                Instruction::Compute {
                    result: ValueId(1),
                    operands: vec![ValueId(0)],
                },
                Instruction::Branch {
                    condition: ValueId(1),
                    target: 1,
                },
            ],
        );
        let cd = ControlDependence::build(&ir);
        assert!(
            cd.dependents_of(2).contains(&1),
            "repeating the body is decided by the trailing test"
        );
        assert!(cd.roots().contains(&0));
        assert!(!cd.roots().contains(&1));
    }
}
