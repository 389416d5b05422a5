use crate::graph::CallGraph;
use crate::hierarchy::TypeHierarchy;
use crate::points_to::PointsToResult;
use anyhow::Result;
use std::fmt;
use std::path::Path;

/// The enumerated call graph construction strategies an engine may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Context-insensitive.
    ZeroCfa,
    /// One level of call-site sensitivity everywhere.
    VanillaOneCfa,
    /// Call-site sensitivity except for container-class methods.
    ContainerOneCfa,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::ZeroCfa => "0cfa",
            Algorithm::VanillaOneCfa => "vanilla-1cfa",
            Algorithm::ContainerOneCfa => "container-1cfa",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type patterns excluded from the analyzed scope, passed explicitly into
/// engine construction. Patterns are name prefixes, one per line in the
/// parsed form; trimming the scope is the primary scalability lever.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeConfig {
    pub exclusions: Vec<String>,
}

impl ScopeConfig {
    pub fn new(exclusions: Vec<String>) -> Self {
        Self { exclusions }
    }

    /// Parse one prefix pattern per line; blank lines and `#` comments are
    /// ignored.
    pub fn parse(text: &str) -> Self {
        let exclusions = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { exclusions }
    }

    pub fn excludes(&self, type_name: &str) -> bool {
        self.exclusions
            .iter()
            .any(|pattern| type_name.starts_with(pattern.as_str()))
    }
}

/// Everything the slicing pipeline consumes from an engine run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub call_graph: CallGraph,
    pub points_to: PointsToResult,
    pub hierarchy: TypeHierarchy,
}

/// The external program analysis engine: builds the call graph, points-to
/// result, and type hierarchy from a program's entry points.
///
/// The core pipeline never binds to a concrete engine; anything that can
/// produce an [`AnalysisResult`] can drive it.
pub trait AnalysisEngine {
    fn analyze(
        &self,
        target: &Path,
        algorithm: Algorithm,
        scope: &ScopeConfig,
    ) -> Result<AnalysisResult>;
}
