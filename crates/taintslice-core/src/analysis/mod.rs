/*! The slicing pipeline's analyses.
 *
 * Locating taint sources, their application call sites, and the criteria to slice from is
 * orchestration; the algorithmic heart is the forward slicer, a reachability computation over an
 * implicit interprocedural dependence graph built from per-node def/use chains, control dependence,
 * heap store/load relations, and call/return edges.
 */

pub mod callsites;
pub mod cfg;
pub mod criteria;
pub mod defuse;
pub mod pipeline;
pub mod slicer;
pub mod sources;

pub use callsites::{find_application_callers, find_call_sites};
pub use cfg::ControlDependence;
pub use criteria::derive_return_criterion;
pub use defuse::DefUseChains;
pub use pipeline::{Pipeline, SliceReport, TaintSourceSet};
pub use slicer::{ControlDependenceOptions, DataDependenceOptions, ForwardSlicer, Slice};
pub use sources::{find_implementors, SourceSpec};
