/*! Reference program analysis engine for TaintSlice.
 *
 * Realizes the core `AnalysisEngine` trait over a serialized whole-program
 * model: load the model from disk, trim it to the configured scope, build
 * the type hierarchy and call graph under the selected algorithm, then run
 * points-to analysis over the finished graph.
 *
 * Any other engine producing an `AnalysisResult` can replace this one; the
 * slicing pipeline never sees past the trait.
 */

pub mod builder;
pub mod model;
pub mod points_to;

pub use builder::{build_call_graph, ScopedProgram};
pub use model::{load_model, save_model, BodyModel, ClassModel, MethodKey, MethodModel, ProgramModel};

use anyhow::{Context as _, Result};
use std::path::Path;
use taintslice_core::{Algorithm, AnalysisEngine, AnalysisResult, ScopeConfig};

/// Engine over an on-disk [`ProgramModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelEngine;

impl ModelEngine {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes an already-loaded model. The trait entry point delegates
    /// here after reading the target path.
    pub fn analyze_model(
        &self,
        model: &ProgramModel,
        algorithm: Algorithm,
        scope: &ScopeConfig,
    ) -> Result<AnalysisResult> {
        let program = ScopedProgram::new(model, scope);
        let hierarchy = program.hierarchy();
        let call_graph = build_call_graph(&program, &hierarchy, model, algorithm)
            .with_context(|| format!("building call graph with {algorithm}"))?;
        let points_to = points_to::analyze(&call_graph);

        Ok(AnalysisResult {
            call_graph,
            points_to,
            hierarchy,
        })
    }
}

impl AnalysisEngine for ModelEngine {
    fn analyze(
        &self,
        target: &Path,
        algorithm: Algorithm,
        scope: &ScopeConfig,
    ) -> Result<AnalysisResult> {
        let model = load_model(target)
            .with_context(|| format!("loading program model from {}", target.display()))?;
        self.analyze_model(&model, algorithm, scope)
    }
}
