use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reqgraph::config::AnalysisConfig;
use reqgraph::formatters::{GraphTextFormatter, TraceWriter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "reqgraph",
    version,
    about = "Extract a method relationship graph from a Python codebase"
)]
struct Cli {
    /// Root directory of the codebase to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Base directory for run artifacts
    #[arg(short, long, value_name = "DIR", default_value = "traces")]
    traces: PathBuf,

    /// Name of this run's artifact directory (default: <input>_<timestamp>)
    #[arg(long, value_name = "NAME")]
    run_name: Option<String>,

    /// TOML file with analysis settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write an indented syntax tree per parsed file
    #[arg(long)]
    dump_trees: bool,

    /// Also write the graph as JSON
    #[arg(long)]
    json: bool,

    /// Skip base-class dependency resolution
    #[arg(long)]
    no_dependencies: bool,

    /// Extract files one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,

    /// Print the graph text to stdout
    #[arg(long)]
    print: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if cli.dump_trees {
        config.dump_trees = true;
    }
    if cli.json {
        config.emit_json = true;
    }
    if cli.no_dependencies {
        config.resolve_dependencies = false;
    }
    if cli.sequential {
        config.parallel = false;
    }
    Ok(config)
}

fn default_run_name(input: &Path) -> String {
    let base = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "codebase".to_string());
    format!("{}_{}", base, chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(&cli)?;

    let input = cli
        .input
        .canonicalize()
        .with_context(|| format!("cannot resolve input {}", cli.input.display()))?;
    let run_name = cli
        .run_name
        .clone()
        .unwrap_or_else(|| default_run_name(&input));
    let run_dir = cli.traces.join(run_name);

    info!("Input: {}", input.display());
    info!("Traces: {}", run_dir.display());

    let run = reqgraph::run_analysis(&input, &config)?;
    if run.analysis.is_empty() {
        anyhow::bail!("nothing to analyze: no readable source files under {}", input.display());
    }

    TraceWriter::new(&run_dir)
        .with_tree_dumps(config.dump_trees)
        .with_json(config.emit_json)
        .write_run(&run)?;

    if cli.print {
        println!("{}", GraphTextFormatter::new().format_graph(&run.graph));
    }

    info!(
        "Analysis complete in {:.2}s: {} nodes, {} edges",
        start_time.elapsed().as_secs_f64(),
        run.graph.node_count(),
        run.graph.edge_count()
    );
    Ok(())
}
