use crate::analysis::callsites::{find_application_callers, find_call_sites};
use crate::analysis::criteria::derive_return_criterion;
use crate::analysis::slicer::{ControlDependenceOptions, DataDependenceOptions, ForwardSlicer};
use crate::analysis::sources::{find_implementors, SourceSpec};
use crate::engine::AnalysisResult;
use crate::graph::NodeId;
use crate::statement::Statement;
use crate::types::MethodSignature;
use indexmap::{IndexMap, IndexSet};
use std::time::{Duration, Instant};

/// Discovered sensitive operations mapped to their application-code caller
/// nodes. Built once per run, read-only afterwards.
pub type TaintSourceSet = IndexMap<MethodSignature, IndexSet<NodeId>>;

/// What a full pipeline run produced: aggregated slices (concatenated, not
/// deduplicated across criteria) plus counts and wall-clock time.
#[derive(Debug, Clone)]
pub struct SliceReport {
    pub sources: usize,
    pub criteria: usize,
    pub statements: Vec<Statement>,
    pub elapsed: Duration,
}

/// Sequences the slicing stages end to end over one engine result.
///
/// Each stage is exposed on its own so a driver can report progress between
/// them; [`Pipeline::run`] chains them all. Errors propagate unhandled: a
/// single failing criterion aborts the whole batch.
pub struct Pipeline<'a> {
    analysis: &'a AnalysisResult,
}

impl<'a> Pipeline<'a> {
    pub fn new(analysis: &'a AnalysisResult) -> Self {
        Self { analysis }
    }

    /// Concrete sensitive operations for every spec, unioned.
    pub fn collect_sources(
        &self,
        specs: &[SourceSpec],
    ) -> crate::Result<IndexSet<MethodSignature>> {
        let mut sources = IndexSet::new();
        for spec in specs {
            sources.extend(find_implementors(&self.analysis.hierarchy, spec)?);
        }
        Ok(sources)
    }

    /// Application-code callers per source. Sources that alias to the same
    /// caller node keep their sets merged per source entry.
    pub fn collect_callers(&self, sources: &IndexSet<MethodSignature>) -> TaintSourceSet {
        let mut callers: TaintSourceSet = IndexMap::new();
        for source in sources {
            let found = find_application_callers(&self.analysis.call_graph, source);
            callers.entry(source.clone()).or_default().extend(found);
        }
        callers
    }

    /// Call statements for every (source, caller) pair.
    pub fn collect_call_sites(&self, callers: &TaintSourceSet) -> crate::Result<Vec<Statement>> {
        let mut calls = Vec::new();
        for (source, nodes) in callers {
            for &node in nodes {
                calls.extend(find_call_sites(&self.analysis.call_graph, node, source)?);
            }
        }
        Ok(calls)
    }

    /// One return-value criterion per call statement.
    pub fn derive_criteria(&self, calls: &[Statement]) -> crate::Result<Vec<Statement>> {
        calls
            .iter()
            .map(|&call| derive_return_criterion(&self.analysis.call_graph, call))
            .collect()
    }

    /// Forward slices for every criterion under full data and control
    /// dependence, aggregated by concatenation.
    pub fn compute_slices(&self, criteria: &[Statement]) -> Vec<Statement> {
        let mut slicer = ForwardSlicer::new(
            &self.analysis.call_graph,
            &self.analysis.points_to,
            DataDependenceOptions::Full,
            ControlDependenceOptions::Full,
        );
        let mut statements = Vec::new();
        for &criterion in criteria {
            statements.extend(slicer.compute(criterion));
        }
        statements
    }

    /// The whole pipeline: sources, callers, call sites, criteria, slices.
    pub fn run(&self, specs: &[SourceSpec]) -> crate::Result<SliceReport> {
        let start = Instant::now();

        let sources = self.collect_sources(specs)?;
        let callers = self.collect_callers(&sources);
        let calls = self.collect_call_sites(&callers)?;
        let criteria = self.derive_criteria(&calls)?;
        let statements = self.compute_slices(&criteria);

        Ok(SliceReport {
            sources: sources.len(),
            criteria: criteria.len(),
            statements,
            elapsed: start.elapsed(),
        })
    }
}
