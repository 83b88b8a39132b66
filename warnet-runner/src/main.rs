mod reports;
mod runs;
mod seeds;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;
use warnet_model::SimulationConfig;

use runs::{DoctrineChoice, SeedRuns, run_all};
use seeds::resolve_seeds;
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Coloured final statistics per doctrine
    Console,
    /// Full statistics history of every run
    Json,
    /// Summary table
    Markdown,
    /// One row per turn per doctrine per seed
    Csv,
}

#[derive(Parser, Debug)]
#[command(
    name = "warnet-runner",
    version,
    about = "Compare precision and area bombing on a simulated warfare production network"
)]
struct Args {
    /// Base configuration file (JSON); flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of network nodes
    #[arg(long)]
    nodes: Option<u32>,

    /// Number of directed edges
    #[arg(long)]
    edges: Option<u32>,

    /// Workers assigned to each node at the start
    #[arg(long)]
    workers_per_node: Option<u32>,

    /// Maximum number of turns per run
    #[arg(long)]
    turns: Option<u32>,

    /// Bombing doctrine(s) to simulate
    #[arg(long, value_enum, default_value_t = DoctrineChoice::Both)]
    doctrine: DoctrineChoice,

    /// Seeds to run (comma-separated, decimal or 0x-prefixed hex)
    #[arg(long)]
    seeds: Option<String>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    let seed_tokens = args.seeds.as_deref().map(split_csv).unwrap_or_default();
    let seeds = resolve_seeds(&seed_tokens, config.seed)?;

    if args.report == ReportFormat::Console {
        announce_banner(&config, &seeds, args.doctrine);
    }

    let start_time = Instant::now();
    let results = run_all(&config, &seeds, args.doctrine).await?;
    write_reports(&args, &results, start_time)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .try_init();
}

fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SimulationConfig::from_json(&text)
                .with_context(|| format!("invalid configuration file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(nodes) = args.nodes {
        config.num_nodes = nodes;
    }
    if let Some(edges) = args.edges {
        config.num_edges = edges;
    }
    if let Some(workers) = args.workers_per_node {
        config.workers_per_node = workers;
    }
    if let Some(turns) = args.turns {
        config.max_turns = turns;
    }

    config
        .validate()
        .context("invalid simulation configuration")?;
    Ok(config)
}

fn announce_banner(config: &SimulationConfig, seeds: &[u64], doctrine: DoctrineChoice) {
    println!("{}", "💣 Warfare Network Simulator".bright_cyan().bold());
    println!("{}", "============================".cyan());
    println!(
        "{} nodes, {} edges, {} workers per node, up to {} turns",
        config.num_nodes, config.num_edges, config.workers_per_node, config.max_turns
    );
    println!("Doctrine: {doctrine:?}, seeds: {seeds:?}");
}

fn write_reports(args: &Args, results: &[SeedRuns], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(output_target.writer(), results)?,
        ReportFormat::Markdown => {
            reports::generate_markdown_report(output_target.writer(), results)?;
        }
        ReportFormat::Csv => reports::generate_csv_report(output_target.writer(), results)?,
        ReportFormat::Console => reports::generate_console_report(
            output_target.writer(),
            results,
            start_time.elapsed(),
        )?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        self.writer().flush()
    }
}
