use crate::graph::NodeId;
use crate::ir::ValueId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One heap allocation, identified by the node and instruction that
/// performed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationSite {
    pub node: NodeId,
    pub index: usize,
}

impl fmt::Display for AllocationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node, self.index)
    }
}

/// Result of the engine's points-to analysis: for each value in each node,
/// the set of allocations it may refer to.
///
/// Values without an entry are conservatively treated as possibly aliasing
/// anything; the dependence analysis only ever queries heap base objects, so
/// the conservatism costs precision, not soundness.
#[derive(Debug, Clone, Default)]
pub struct PointsToResult {
    sets: HashMap<(NodeId, ValueId), HashSet<AllocationSite>>,
}

impl PointsToResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, value: ValueId, site: AllocationSite) {
        self.sets.entry((node, value)).or_default().insert(site);
    }

    /// Union `sites` into the set for `(node, value)`; reports whether the
    /// set grew, so fixpoint loops can detect convergence.
    pub fn extend(
        &mut self,
        node: NodeId,
        value: ValueId,
        sites: impl IntoIterator<Item = AllocationSite>,
    ) -> bool {
        let set = self.sets.entry((node, value)).or_default();
        let before = set.len();
        set.extend(sites);
        set.len() != before
    }

    pub fn points_to(&self, node: NodeId, value: ValueId) -> Option<&HashSet<AllocationSite>> {
        self.sets.get(&(node, value))
    }

    pub fn may_alias(&self, a: (NodeId, ValueId), b: (NodeId, ValueId)) -> bool {
        if a == b {
            return true;
        }
        match (self.sets.get(&a), self.sets.get(&b)) {
            (Some(x), Some(y)) => !x.is_disjoint(y),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_allocations_do_not_alias() {
        let mut pts = PointsToResult::new();
        let n = NodeId(0);
        pts.insert(n, ValueId(0), AllocationSite { node: n, index: 0 });
        pts.insert(n, ValueId(1), AllocationSite { node: n, index: 1 });
        assert!(!pts.may_alias((n, ValueId(0)), (n, ValueId(1))));
    }

    #[test]
    fn shared_allocation_and_unknown_values_alias() {
        let mut pts = PointsToResult::new();
        let n = NodeId(0);
        let site = AllocationSite { node: n, index: 0 };
        pts.insert(n, ValueId(0), site);
        pts.insert(n, ValueId(1), site);
        assert!(pts.may_alias((n, ValueId(0)), (n, ValueId(1))));
        assert!(pts.may_alias((n, ValueId(0)), (n, ValueId(9))));
    }

    #[test]
    fn extend_reports_growth() {
        let mut pts = PointsToResult::new();
        let n = NodeId(0);
        let site = AllocationSite { node: n, index: 3 };
        assert!(pts.extend(n, ValueId(0), [site]));
        assert!(!pts.extend(n, ValueId(0), [site]));
    }
}
