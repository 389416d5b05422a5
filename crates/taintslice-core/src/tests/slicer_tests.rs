use super::fixture::*;
use crate::analysis::slicer::{
    ControlDependenceOptions, DataDependenceOptions, ForwardSlicer,
};
use crate::graph::{CallGraph, Context, Loader, NodeId};
use crate::ir::{Instruction, MethodIr, ValueId};
use crate::points_to::{AllocationSite, PointsToResult};
use crate::statement::Statement;
use crate::types::{FieldRef, MethodSignature};

fn full_slice(analysis: &crate::AnalysisResult, criterion: Statement) -> crate::Slice {
    ForwardSlicer::new(
        &analysis.call_graph,
        &analysis.points_to,
        DataDependenceOptions::Full,
        ControlDependenceOptions::Full,
    )
    .compute(criterion)
}

#[test]
fn slicing_is_idempotent() {
    let (analysis, main_node, _) = branching_program();
    let criterion = Statement::return_caller(main_node, 0);

    let mut slicer = ForwardSlicer::new(
        &analysis.call_graph,
        &analysis.points_to,
        DataDependenceOptions::Full,
        ControlDependenceOptions::Full,
    );
    let first = slicer.compute(criterion);
    let second = slicer.compute(criterion);
    assert_eq!(first, second);

    // A fresh slicer with cold caches agrees too.
    assert_eq!(first, full_slice(&analysis, criterion));
}

#[test]
fn full_dependence_is_a_superset_of_each_kind_alone() {
    let (analysis, main_node, _) = branching_program();
    let criterion = Statement::return_caller(main_node, 0);

    let full = full_slice(&analysis, criterion);
    let data_only = ForwardSlicer::new(
        &analysis.call_graph,
        &analysis.points_to,
        DataDependenceOptions::Full,
        ControlDependenceOptions::None,
    )
    .compute(criterion);
    let control_only = ForwardSlicer::new(
        &analysis.call_graph,
        &analysis.points_to,
        DataDependenceOptions::None,
        ControlDependenceOptions::Full,
    )
    .compute(criterion);

    assert!(data_only.is_subset(&full));
    assert!(control_only.is_subset(&full));
}

#[test]
fn disabled_dependence_kinds_stop_propagation() {
    let (analysis, main_node, _) = branching_program();
    let criterion = Statement::return_caller(main_node, 0);

    let control_only = ForwardSlicer::new(
        &analysis.call_graph,
        &analysis.points_to,
        DataDependenceOptions::None,
        ControlDependenceOptions::Full,
    )
    .compute(criterion);

    // Without data edges the return value never reaches its uses.
    assert_eq!(control_only.len(), 1);
    assert!(control_only.contains(&criterion));
}

/// Writer stores a tainted value into a field; reader loads from an aliased
/// object. The store must reach the load exactly when the bases may alias.
fn heap_program(aliased: bool) -> (crate::AnalysisResult, NodeId, NodeId) {
    let field = FieldRef::new("lib.Buf", "data");

    let mut graph = CallGraph::new();
    let writer = graph.add_node(
        MethodSignature::new("app.Writer", "fill", void_descriptor()),
        Context::Root,
        Loader::Application,
        MethodIr::new(
            vec![],
            vec![
                Instruction::New {
                    result: ValueId(0),
                    class: "lib.Buf".into(),
                },
                Instruction::Const { result: ValueId(1) },
                Instruction::Store {
                    object: ValueId(0),
                    field: field.clone(),
                    value: ValueId(1),
                },
            ],
        ),
    );
    let reader = graph.add_node(
        MethodSignature::new("app.Reader", "scan", void_descriptor()),
        Context::Root,
        Loader::Application,
        MethodIr::new(
            vec![ValueId(5)],
            vec![
                Instruction::Load {
                    result: ValueId(6),
                    object: ValueId(5),
                    field,
                },
                Instruction::Compute {
                    result: ValueId(7),
                    operands: vec![ValueId(6)],
                },
                Instruction::Return { value: None },
            ],
        ),
    );

    let shared = AllocationSite {
        node: writer,
        index: 0,
    };
    let mut points_to = PointsToResult::new();
    points_to.insert(writer, ValueId(0), shared);
    if aliased {
        points_to.insert(reader, ValueId(5), shared);
    } else {
        points_to.insert(
            reader,
            ValueId(5),
            AllocationSite {
                node: reader,
                index: 99,
            },
        );
    }

    let analysis = crate::AnalysisResult {
        call_graph: graph,
        points_to,
        hierarchy: stream_hierarchy(false),
    };
    (analysis, writer, reader)
}

#[test]
fn store_reaches_aliased_load() {
    let (analysis, writer, reader) = heap_program(true);
    let slice = full_slice(&analysis, Statement::normal(writer, 2));

    assert!(slice.contains(&Statement::normal(reader, 0)), "load reached");
    assert!(
        slice.contains(&Statement::normal(reader, 1)),
        "loaded value's use reached"
    );
}

#[test]
fn store_skips_non_aliased_load() {
    let (analysis, writer, reader) = heap_program(false);
    let slice = full_slice(&analysis, Statement::normal(writer, 2));

    assert!(!slice.contains(&Statement::normal(reader, 0)));
    assert_eq!(slice.len(), 1);
}

#[test]
fn method_entry_reaches_unguarded_statements() {
    let (analysis, _, helper_node) = helper_program();
    let slice = full_slice(&analysis, Statement::entry(helper_node));

    assert!(slice.contains(&Statement::normal(helper_node, 0)));
    assert!(slice.contains(&Statement::normal(helper_node, 1)));
}
