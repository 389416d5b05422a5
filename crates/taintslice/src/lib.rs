/*! Unified interface for forward slicing from taint sources.
 *
 * Single import for everything you need: the slicing pipeline and its data
 * model, plus the reference analysis engine that drives it over a serialized
 * program model.
 */

pub use taintslice_core as core;
pub use taintslice_engine as engine;

pub use taintslice_core::{
    Algorithm, AnalysisEngine, AnalysisResult, CallGraph, Pipeline, ScopeConfig, Slice,
    SliceError, SliceReport, SourceSpec, Statement, StatementKind, TypeHierarchy,
};

pub use taintslice_engine::{load_model, save_model, ModelEngine, ProgramModel};
