//! u-schedule-sim CLI
//!
//! Provides commands for:
//! - Listing the algorithm and scenario catalogs
//! - Running one simulation from a scenario, a JSON request or a random workload
//! - Comparing policies across scenarios
//!
//! Binary: u-schedule-sim

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_schedule_sim::experiment::{self, default_policies};
use u_schedule_sim::models::{
    Capacity, CapacityModel, Occupancy, SimulationRequest, DEFAULT_ALPHA,
};
use u_schedule_sim::{
    algorithms, scenarios, simulate_with, Policy, SimulationConfig, SimulationError,
};

/// Machine-pool scheduling simulator
#[derive(Parser)]
#[command(name = "u-schedule-sim")]
#[command(
    about = "Discrete-event simulator for SPT, EDF, priority and DPE dispatching",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Catalog {
    Algorithms,
    Scenarios,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a catalog
    List {
        /// Which catalog
        #[arg(value_enum)]
        what: Catalog,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run one simulation
    Run(RunArgs),

    /// Compare policies across scenarios
    Compare {
        /// Scenario ids (repeatable)
        #[arg(short, long, conflicts_with = "all")]
        scenario: Vec<String>,

        /// Use every built-in scenario
        #[arg(long)]
        all: bool,

        /// DPE alphas to compare (repeatable, default 0.5 0.7 0.9)
        #[arg(long)]
        alpha: Vec<f64>,

        /// Print JSON rows instead of a table
        #[arg(long)]
        json: bool,

        /// Also export the rows as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Built-in scenario id
    #[arg(short, long, group = "source")]
    scenario: Option<String>,

    /// JSON request file
    #[arg(short, long, group = "source")]
    input: Option<PathBuf>,

    /// Random workload seed
    #[arg(long, group = "source")]
    synthetic: Option<u64>,

    /// Number of tasks for --synthetic
    #[arg(long, default_value_t = 20)]
    tasks: usize,

    /// Policy id (overrides the request file)
    #[arg(short, long)]
    algorithm: Option<String>,

    /// DPE alpha
    #[arg(long)]
    alpha: Option<f64>,

    /// Number of machines
    #[arg(short, long)]
    machines: Option<usize>,

    /// CPU units per machine
    #[arg(long)]
    cpu: Option<u32>,

    /// RAM units per machine
    #[arg(long)]
    ram: Option<u32>,

    /// Alternate large (8 CPU / 32 RAM) and small (4 / 8) machines
    #[arg(long, conflicts_with_all = ["cpu", "ram"])]
    heterogeneous: bool,

    /// Let several tasks share a machine while capacity allows
    #[arg(long)]
    shared: bool,

    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so JSON on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { what, json } => list(what, json)?,
        Commands::Run(args) => run(args)?,
        Commands::Compare {
            scenario,
            all,
            alpha,
            json,
            csv,
        } => compare(&scenario, all, &alpha, json, csv.as_deref())?,
    }

    Ok(())
}

fn list(what: Catalog, json: bool) -> Result<(), SimulationError> {
    match (what, json) {
        (Catalog::Algorithms, true) => println!("{}", serde_json::to_string_pretty(algorithms())?),
        (Catalog::Algorithms, false) => {
            for info in algorithms() {
                println!("{:<16} {:<30} {}", info.id, info.name, info.description);
            }
        }
        (Catalog::Scenarios, true) => {
            println!("{}", serde_json::to_string_pretty(scenarios::builtin())?)
        }
        (Catalog::Scenarios, false) => {
            for s in scenarios::builtin() {
                println!(
                    "{:<26} {:>2} tasks {:>2} machines  {}",
                    s.id,
                    s.tasks.len(),
                    s.num_machines,
                    s.description
                );
            }
        }
    }
    Ok(())
}

fn load_request(args: &RunArgs) -> Result<SimulationRequest, SimulationError> {
    let algorithm = args.algorithm.as_deref().unwrap_or("DPE");
    let alpha = args.alpha.unwrap_or(DEFAULT_ALPHA);

    let mut request = if let Some(path) = &args.input {
        let mut request: SimulationRequest = serde_json::from_str(&fs::read_to_string(path)?)?;
        if let Some(algorithm) = &args.algorithm {
            request.algorithm = algorithm.clone();
        }
        if let Some(alpha) = args.alpha {
            request.alpha = alpha;
        }
        request
    } else if let Some(seed) = args.synthetic {
        scenarios::synthetic(seed, args.tasks, args.machines.unwrap_or(2)).request(algorithm, alpha)
    } else {
        let id = args.scenario.as_deref().unwrap_or("light-load");
        scenarios::find(id)?.request(algorithm, alpha)
    };

    if let Some(machines) = args.machines {
        request.num_machines = machines;
    }
    Ok(request)
}

fn build_config(args: &RunArgs) -> SimulationConfig {
    let mut config = SimulationConfig::new();
    if args.heterogeneous {
        config = config.with_capacity_model(CapacityModel::heterogeneous());
    } else if args.cpu.is_some() || args.ram.is_some() {
        config = config.with_capacity(Capacity::new(
            args.cpu.unwrap_or(1),
            args.ram.unwrap_or(1),
        ));
    }
    if args.shared {
        config = config.with_occupancy(Occupancy::Shared);
    }
    config
}

fn run(args: RunArgs) -> Result<(), SimulationError> {
    let request = load_request(&args)?;
    let config = build_config(&args);
    let result = simulate_with(&request, &config)?;
    let json = serde_json::to_string_pretty(&result)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            for entry in &result.logs {
                println!("[{:>6.1}] {}", entry.time, entry.message);
            }
            println!(
                "\nmakespan {:.1} | met {}/{} | HIGH {:.1}% | LOW {:.1}%",
                result.makespan,
                result.kpi.total_met_deadline,
                result.total_tasks,
                result.kpi.high_success_rate,
                result.kpi.low_success_rate
            );
            info!(path = %path.display(), "result written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn compare(
    ids: &[String],
    all: bool,
    alphas: &[f64],
    json: bool,
    csv: Option<&Path>,
) -> Result<(), SimulationError> {
    let selected = if all || ids.is_empty() {
        scenarios::builtin().to_vec()
    } else {
        ids.iter()
            .map(|id| scenarios::find(id).cloned())
            .collect::<Result<Vec<_>, _>>()?
    };

    let policies = if alphas.is_empty() {
        default_policies()
    } else {
        let mut policies = vec![Policy::Spt, Policy::Edf, Policy::PriorityFirst];
        policies.extend(alphas.iter().map(|&alpha| Policy::Dpe { alpha }));
        policies
    };

    let rows = experiment::run_matrix(&selected, &policies, &SimulationConfig::default())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", experiment::format_table(&rows));
    }
    if let Some(path) = csv {
        experiment::write_csv(&rows, fs::File::create(path)?)?;
        info!(path = %path.display(), rows = rows.len(), "comparison exported");
    }
    Ok(())
}
