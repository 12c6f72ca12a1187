#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use csv::Writer;
use log::LevelFilter;
use pushflow::generate::{random_network, GeneratorConfig};
use pushflow::{
    dimacs, Counters, FlowArc, FlowProblem, FordFulkerson, MatrixNetwork, MaxFlow, RawArc,
    RelabelToFront,
};
use serde::Serialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

type Cap = i64;

#[derive(Debug, Parser)]
#[command(version, about = "Max flow by push-relabel and augmenting paths")]
struct Cli {
    /// Logging verbosity
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the max flow of a network and compare the engines
    Solve(SolveArgs),
    /// Write a random network in DIMACS format
    Generate(GenerateArgs),
}

#[derive(Debug, clap::Args)]
struct SolveArgs {
    /// Network file (DIMACS, or CSV with `from,to,capacity` rows)
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    #[arg(long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,

    /// Vertex count for CSV input, defaults to the largest index plus one
    #[arg(long)]
    vertices: Option<usize>,

    /// Source vertex for CSV input (0-based)
    #[arg(long)]
    source: Option<usize>,

    /// Sink vertex for CSV input (0-based)
    #[arg(long)]
    sink: Option<usize>,

    /// Write one CSV row per engine run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    #[arg(long)]
    vertices: usize,

    /// Percentage of vertex pairs carrying an arc
    #[arg(long)]
    density: u8,

    #[arg(long, default_value_t = 1)]
    min_capacity: u64,

    #[arg(long, default_value_t = 1000)]
    max_capacity: u64,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output file, stdout if omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Auto,
    Dimacs,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Both,
    FordFulkerson,
    RelabelToFront,
}

#[derive(Debug, Serialize)]
struct RunReport {
    algorithm: &'static str,
    vertices: usize,
    arcs: usize,
    max_flow: Cap,
    elapsed_micros: u128,
    pushes: u64,
    relabels: u64,
    discharges: u64,
    gaps: u64,
    augmenting_paths: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    TermLogger::init(
        cli.log_level.into(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(|e| e.to_string())?;

    match cli.command {
        Command::Solve(args) => solve(&args),
        Command::Generate(args) => generate(&args),
    }
}

fn solve(args: &SolveArgs) -> Result<(), Box<dyn Error>> {
    let problem = load(args)?;
    log::info!(
        "loaded {} vertices, {} arcs, source {}, sink {}",
        problem.vertex_count(),
        problem.arc_count(),
        problem.source(),
        problem.sink()
    );

    let mut reports = Vec::new();
    if args.algorithm != Algorithm::FordFulkerson {
        let engine = RelabelToFront::new(&problem);
        reports.push(timed("relabel-to-front", &problem, engine)?);
    }
    if args.algorithm != Algorithm::RelabelToFront {
        let engine = FordFulkerson::<MatrixNetwork<Cap>>::new(&problem);
        reports.push(timed("ford-fulkerson", &problem, engine)?);
    }

    for r in &reports {
        log::info!("----------------------------------");
        log::info!("      Algorithm = {}", r.algorithm);
        log::info!("       Max flow = {}", r.max_flow);
        log::info!("   Elapsed (us) = {}", r.elapsed_micros);
        log::info!("         Pushes = {}", r.pushes);
        log::info!("       Relabels = {}", r.relabels);
        log::info!("     Discharges = {}", r.discharges);
        log::info!("           Gaps = {}", r.gaps);
        log::info!("Augmenting paths = {}", r.augmenting_paths);
    }

    if let Some(path) = &args.report {
        write_report(&reports, path)?;
    }

    if let [a, b] = reports.as_slice() {
        if a.max_flow != b.max_flow {
            return Err(format!(
                "{} found {} but {} found {}",
                a.algorithm, a.max_flow, b.algorithm, b.max_flow
            )
            .into());
        }
    }
    Ok(())
}

fn timed<E>(
    algorithm: &'static str,
    problem: &FlowProblem<Cap>,
    mut engine: E,
) -> Result<RunReport, Box<dyn Error>>
where
    E: MaxFlow<Capacity = Cap>,
{
    let start = Instant::now();
    let max_flow = engine.run().map_err(|e| e.to_string())?;
    let elapsed = start.elapsed();
    let Counters {
        pushes,
        relabels,
        discharges,
        gaps,
        augmenting_paths,
    } = *engine.counters();

    Ok(RunReport {
        algorithm,
        vertices: problem.vertex_count(),
        arcs: problem.arc_count(),
        max_flow,
        elapsed_micros: elapsed.as_micros(),
        pushes,
        relabels,
        discharges,
        gaps,
        augmenting_paths,
    })
}

fn load(args: &SolveArgs) -> Result<FlowProblem<Cap>, Box<dyn Error>> {
    let csv = match args.format {
        Format::Csv => true,
        Format::Dimacs => false,
        Format::Auto => has_extension(&args.input, "csv"),
    };

    if csv {
        read_arcs_csv(args)
    } else {
        let text = fs::read_to_string(&args.input)?;
        Ok(dimacs::parse(&text).map_err(|e| e.to_string())?)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

// Function to read the arcs from a CSV file
fn read_arcs_csv(args: &SolveArgs) -> Result<FlowProblem<Cap>, Box<dyn Error>> {
    let (Some(source), Some(sink)) = (args.source, args.sink) else {
        return Err("CSV input needs --source and --sink".into());
    };

    let mut rdr = csv::Reader::from_path(&args.input)?;
    let arcs = rdr
        .deserialize::<RawArc<Cap>>()
        .map(|row| -> Result<FlowArc<Cap>, Box<dyn Error>> {
            Ok(FlowArc::try_from(row?).map_err(|e| e.to_string())?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vertex_count = args.vertices.unwrap_or_else(|| {
        arcs.iter()
            .map(|a| a.from().max(a.to()))
            .chain([source, sink])
            .max()
            .map_or(0, |v| v + 1)
    });

    Ok(FlowProblem::from_arcs(vertex_count, source, sink, arcs)
        .map_err(|e| e.to_string())?)
}

// Function to write the run reports
fn write_report(reports: &[RunReport], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;
    for r in reports {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    log::info!("report written to {}", path.display());
    Ok(())
}

fn generate(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = GeneratorConfig {
        vertex_count: args.vertices,
        density: args.density,
        min_capacity: args.min_capacity,
        max_capacity: args.max_capacity,
        seed: args.seed,
    };
    let problem: FlowProblem<Cap> = random_network(&config).map_err(|e| e.to_string())?;
    let text = dimacs::write(&problem);

    match &args.output {
        Some(path) => {
            fs::write(path, text)?;
            log::info!("network written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
