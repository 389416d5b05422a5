use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use taintslice_core::{Algorithm, AnalysisEngine, Pipeline, ScopeConfig, SourceSpec, Statement};
use taintslice_engine::ModelEngine;

/// Platform-class prefixes bundled with the binary; passed to the engine as
/// the analysis scope on every run.
const EXCLUSIONS: &str = include_str!("../resources/exclusions.txt");

#[derive(Parser)]
#[command(name = "taintslice")]
#[command(about = "TaintSlice - forward slicing from sensitive taint sources")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the program model to analyze
    target: PathBuf,

    /// Call graph construction algorithm
    #[arg(value_enum)]
    analysis: AnalysisChoice,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnalysisChoice {
    #[value(name = "0cfa")]
    ZeroCfa,
    #[value(name = "vanilla-1cfa")]
    VanillaOneCfa,
    #[value(name = "container-1cfa")]
    ContainerOneCfa,
}

impl From<AnalysisChoice> for Algorithm {
    fn from(choice: AnalysisChoice) -> Self {
        match choice {
            AnalysisChoice::ZeroCfa => Algorithm::ZeroCfa,
            AnalysisChoice::VanillaOneCfa => Algorithm::VanillaOneCfa,
            AnalysisChoice::ContainerOneCfa => Algorithm::ContainerOneCfa,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cmd_slice(cli.target, cli.analysis.into(), cli.verbose)
}

fn cmd_slice(target: PathBuf, algorithm: Algorithm, verbose: bool) -> Result<()> {
    use colored::*;
    use std::time::Instant;

    println!("{}", " TaintSlice".bright_blue().bold());
    println!("{}", "=".repeat(50).bright_blue());
    println!(" Target: {}", target.display());
    println!(" Analysis: {algorithm}");
    println!();

    let scope = ScopeConfig::parse(EXCLUSIONS);
    let specs = [SourceSpec::new("java.io.InputStream", "read", "int")];
    let start = Instant::now();

    println!(" Building call graph and points-to result...");
    let analysis = ModelEngine::new().analyze(&target, algorithm, &scope)?;
    println!(
        "   {} call graph nodes, {} types in scope",
        analysis.call_graph.len(),
        analysis.hierarchy.len()
    );

    let pipeline = Pipeline::new(&analysis);

    println!(" Locating taint sources...");
    let sources = pipeline.collect_sources(&specs)?;
    if sources.is_empty() {
        println!("{}", "  No concrete taint sources in scope".yellow());
        return Ok(());
    }
    if verbose {
        for source in &sources {
            println!("   {source}");
        }
    }

    println!(" Finding application call sites...");
    let callers = pipeline.collect_callers(&sources);
    let calls = pipeline.collect_call_sites(&callers)?;

    println!(" Deriving slicing criteria...");
    let criteria = pipeline.derive_criteria(&calls)?;

    println!(" Computing forward slices...");
    let statements = pipeline.compute_slices(&criteria);

    if verbose {
        for statement in &statements {
            print_statement(&analysis, statement);
        }
    }

    println!();
    println!("{}", " Slicing complete".bright_green().bold());
    println!("   Sources: {}", sources.len());
    println!("   Criteria: {}", criteria.len());
    println!("   Statements: {}", statements.len());
    println!("   Time: {}ms", start.elapsed().as_millis());

    Ok(())
}

fn print_statement(analysis: &taintslice_core::AnalysisResult, statement: &Statement) {
    match analysis.call_graph.node(statement.node) {
        Some(node) => println!("   {} in {}", statement, node.method),
        None => println!("   {statement}"),
    }
}
