use crate::analysis::cfg::ControlDependence;
use crate::analysis::defuse::DefUseChains;
use crate::graph::{CallGraph, NodeId};
use crate::ir::{Instruction, ValueId};
use crate::points_to::PointsToResult;
use crate::statement::{Statement, StatementKind};
use crate::types::FieldRef;
use indexmap::IndexSet;
use std::collections::{HashMap, VecDeque};

/// A computed forward slice: the set of statements reachable from a
/// criterion by dependence. Unordered semantics with deterministic iteration.
pub type Slice = IndexSet<Statement>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDependenceOptions {
    None,
    /// Locals, heap via points-to, and interprocedural call/return edges.
    Full,
}

impl DataDependenceOptions {
    pub fn is_enabled(self) -> bool {
        matches!(self, DataDependenceOptions::Full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlDependenceOptions {
    None,
    /// Intra- and interprocedural control dependence.
    Full,
}

impl ControlDependenceOptions {
    pub fn is_enabled(self) -> bool {
        matches!(self, ControlDependenceOptions::Full)
    }
}

/// Index of every heap read in the program, keyed by field, so a `Store` can
/// find the `Load`s it may reach. Built once per slicer over the whole graph.
#[derive(Debug, Clone, Default)]
struct HeapIndex {
    readers: HashMap<FieldRef, Vec<(NodeId, usize, ValueId)>>,
}

impl HeapIndex {
    fn build(graph: &CallGraph) -> Self {
        let mut readers: HashMap<FieldRef, Vec<(NodeId, usize, ValueId)>> = HashMap::new();
        for node in graph.nodes() {
            for (index, inst) in node.ir.iter() {
                if let Instruction::Load { object, field, .. } = inst {
                    readers
                        .entry(field.clone())
                        .or_default()
                        .push((node.id, index, *object));
                }
            }
        }
        Self { readers }
    }

    fn readers_of(&self, field: &FieldRef) -> &[(NodeId, usize, ValueId)] {
        self.readers
            .get(field)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Forward interprocedural slicer: graph reachability over the union of data
/// and control dependence edges, visiting each statement at most once.
///
/// Dependence is resolved per concrete call graph node, so context
/// distinctions already present in the graph carry through to the slice; no
/// additional context merging happens here. Per-node def/use chains and
/// control dependence are cached across criteria.
pub struct ForwardSlicer<'a> {
    graph: &'a CallGraph,
    points_to: &'a PointsToResult,
    data: DataDependenceOptions,
    control: ControlDependenceOptions,
    heap: HeapIndex,
    defuse: HashMap<NodeId, DefUseChains>,
    control_deps: HashMap<NodeId, ControlDependence>,
}

impl<'a> ForwardSlicer<'a> {
    pub fn new(
        graph: &'a CallGraph,
        points_to: &'a PointsToResult,
        data: DataDependenceOptions,
        control: ControlDependenceOptions,
    ) -> Self {
        let heap = if data.is_enabled() {
            HeapIndex::build(graph)
        } else {
            HeapIndex::default()
        };
        Self {
            graph,
            points_to,
            data,
            control,
            heap,
            defuse: HashMap::new(),
            control_deps: HashMap::new(),
        }
    }

    /// The full forward slice from one criterion.
    pub fn compute(&mut self, criterion: Statement) -> Slice {
        let mut slice = Slice::new();
        let mut worklist = VecDeque::new();
        worklist.push_back(criterion);

        while let Some(statement) = worklist.pop_front() {
            if !slice.insert(statement) {
                continue;
            }
            for successor in self.successors(statement) {
                if !slice.contains(&successor) {
                    worklist.push_back(successor);
                }
            }
        }

        slice
    }

    fn successors(&mut self, statement: Statement) -> Vec<Statement> {
        let mut out = Vec::new();
        match statement.kind {
            StatementKind::Normal { index } => {
                if self.data.is_enabled() {
                    self.data_successors(statement.node, index, &mut out);
                }
                if self.control.is_enabled() {
                    self.control_successors(statement.node, index, &mut out);
                }
            }
            StatementKind::NormalReturnCaller { index } => {
                if self.data.is_enabled() {
                    let result = self.defuse(statement.node).invoke_result(index);
                    if let Some(result) = result {
                        self.push_uses(statement.node, result, &mut out);
                    }
                }
            }
            StatementKind::ParamCallee { param } => {
                if self.data.is_enabled() {
                    let value = self
                        .graph
                        .node(statement.node)
                        .and_then(|node| node.ir.params.get(param).copied());
                    if let Some(value) = value {
                        self.push_uses(statement.node, value, &mut out);
                    }
                }
            }
            StatementKind::MethodEntry => {
                if self.control.is_enabled() {
                    let roots = self.control_deps(statement.node).roots().to_vec();
                    out.extend(
                        roots
                            .into_iter()
                            .map(|index| Statement::normal(statement.node, index)),
                    );
                }
            }
            StatementKind::MethodExit => {}
        }
        out
    }

    fn data_successors(&mut self, node: NodeId, index: usize, out: &mut Vec<Statement>) {
        let defined = self.defuse(node).defined_at(index).to_vec();
        for value in defined {
            self.push_uses(node, value, out);
        }

        let Some(graph_node) = self.graph.node(node) else {
            return;
        };
        match graph_node.ir.get(index) {
            Some(Instruction::Store { object, field, .. }) => {
                for &(reader, load_index, base) in self.heap.readers_of(field) {
                    if self.points_to.may_alias((node, *object), (reader, base)) {
                        out.push(Statement::normal(reader, load_index));
                    }
                }
            }
            Some(Instruction::Invoke { site, args, .. }) => {
                for &callee in self.graph.callees_at(node, *site) {
                    let param_count = self
                        .graph
                        .node(callee)
                        .map(|n| n.ir.params.len())
                        .unwrap_or(0);
                    for position in 0..args.len().min(param_count) {
                        out.push(Statement::param_callee(callee, position));
                    }
                }
            }
            Some(Instruction::Return { value: Some(_) }) => {
                for &(caller, site) in self.graph.calling_sites(node) {
                    let Some(caller_node) = self.graph.node(caller) else {
                        continue;
                    };
                    for call_index in caller_node.ir.call_site_indices(site) {
                        if let Some(Instruction::Invoke {
                            result: Some(_), ..
                        }) = caller_node.ir.get(call_index)
                        {
                            out.push(Statement::return_caller(caller, call_index));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn control_successors(&mut self, node: NodeId, index: usize, out: &mut Vec<Statement>) {
        let dependents = self.control_deps(node).dependents_of(index).to_vec();
        out.extend(
            dependents
                .into_iter()
                .map(|dependent| Statement::normal(node, dependent)),
        );

        let Some(graph_node) = self.graph.node(node) else {
            return;
        };
        if let Some(Instruction::Invoke { site, .. }) = graph_node.ir.get(index) {
            for &callee in self.graph.callees_at(node, *site) {
                out.push(Statement::entry(callee));
            }
        }
    }

    fn push_uses(&mut self, node: NodeId, value: ValueId, out: &mut Vec<Statement>) {
        let uses = self.defuse(node).uses_of(value).to_vec();
        out.extend(uses.into_iter().map(|index| Statement::normal(node, index)));
    }

    fn defuse(&mut self, node: NodeId) -> &DefUseChains {
        let graph = self.graph;
        self.defuse.entry(node).or_insert_with(|| {
            graph
                .node(node)
                .map(|n| DefUseChains::build(&n.ir))
                .unwrap_or_default()
        })
    }

    fn control_deps(&mut self, node: NodeId) -> &ControlDependence {
        let graph = self.graph;
        self.control_deps.entry(node).or_insert_with(|| {
            graph
                .node(node)
                .map(|n| ControlDependence::build(&n.ir))
                .unwrap_or_default()
        })
    }
}
