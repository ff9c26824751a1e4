// River crossing scheduler: command-line front end.
//
// Two questions can be asked about an instance:
//
// - `check`: is there a schedule that gets everyone across within a given
//   horizon, and if so which one?
// - `minimize`: what is the minimal crossing time, and what schedule achieves it?
//
// Every schedule printed here has been replayed by the independent verifier.

use clap::{Parser, Subcommand};
use ferry_core::{
    find_minimal_horizon, solve_at_horizon, verify_schedule, Error, Instance, MinisatBackend,
    Schedule, SearchOptions,
};
use tracing_subscriber::EnvFilter;

/// SAT-based river crossing scheduler
#[derive(Parser, Debug)]
#[command(name = "ferry-core")]
#[command(about = "Minimal-time river crossing schedules via SAT", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look for a schedule that finishes within a fixed horizon
    Check {
        /// Crossing duration of each agent, e.g. 1,3,6,8
        #[arg(short, long, value_delimiter = ',', required = true)]
        durations: Vec<u32>,

        /// Number of agents the vehicle carries per trip
        #[arg(short, long, default_value_t = 2)]
        capacity: usize,

        /// Time by which everyone must be across
        #[arg(short = 't', long)]
        horizon: u32,
    },

    /// Find the minimal crossing time
    Minimize {
        /// Crossing duration of each agent, e.g. 1,3,6,8
        #[arg(short, long, value_delimiter = ',', required = true)]
        durations: Vec<u32>,

        /// Number of agents the vehicle carries per trip
        #[arg(short, long, default_value_t = 2)]
        capacity: usize,

        /// First horizon to try
        #[arg(long, default_value_t = 0)]
        min_horizon: u32,

        /// Give up after this horizon
        #[arg(long)]
        max_horizon: Option<u32>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Check {
            durations,
            capacity,
            horizon,
        } => check_cmd(durations, capacity, horizon),
        Command::Minimize {
            durations,
            capacity,
            min_horizon,
            max_horizon,
        } => minimize_cmd(
            durations,
            capacity,
            SearchOptions {
                min_horizon,
                max_horizon,
            },
        ),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn check_cmd(durations: Vec<u32>, capacity: usize, horizon: u32) -> Result<(), Error> {
    let instance = Instance::new(durations, capacity)?;
    let mut backend = MinisatBackend::default();

    match solve_at_horizon(&instance, horizon, &mut backend)? {
        Some(schedule) => {
            print_schedule(&instance, horizon, &schedule)?;
        }
        None => {
            println!("Infeasible: no schedule finishes within {}", horizon);
        }
    }
    Ok(())
}

fn minimize_cmd(durations: Vec<u32>, capacity: usize, options: SearchOptions) -> Result<(), Error> {
    let instance = Instance::new(durations, capacity)?;
    let mut backend = MinisatBackend::default();

    let solution = find_minimal_horizon(&instance, &options, &mut backend)?;
    println!("Minimal crossing time: {}", solution.horizon);
    print_schedule(&instance, solution.horizon, &solution.schedule)
}

fn print_schedule(instance: &Instance, horizon: u32, schedule: &Schedule) -> Result<(), Error> {
    verify_schedule(instance.durations(), instance.capacity(), horizon, schedule)
        .map_err(|violation| Error::contract(format!("decoded schedule is invalid: {}", violation)))?;

    println!("Schedule ({} trips, horizon {}):", schedule.len(), horizon);
    print!("{}", schedule);
    Ok(())
}
