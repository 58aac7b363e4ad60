//! qforge Command-Line Interface
//!
//! Runs OpenQASM 2.0 circuits on the local simulators.
//!
//! ```text
//! qforge run bell.qasm --shots 2000 --seed 7
//! qforge state bell.qasm --representation sparse
//! qforge library qft --qubits 4 > qft4.qasm
//! qforge backends
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

use qforge_state::Representation;

mod commands;

use commands::{backends, library, run, state, version};

/// qforge - exact local simulation of quantum circuits
#[derive(Parser, Debug)]
#[command(name = "qforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv); ignored when RUST_LOG is set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format shared by the reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample a circuit and print the measurement histogram
    Run {
        /// OpenQASM 2.0 source file
        input: PathBuf,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u32,

        /// Master seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// State representation (dense, sparse)
        #[arg(short, long, default_value = "dense")]
        representation: Representation,

        /// Registered backend to run on
        #[arg(short, long, default_value = "simulator")]
        backend: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the final state's nonzero amplitudes
    State {
        /// OpenQASM 2.0 source file
        input: PathBuf,

        /// State representation (dense, sparse)
        #[arg(short, long, default_value = "dense")]
        representation: Representation,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print a library circuit as OpenQASM 2.0
    Library {
        /// Circuit family (bell, ghz, qft, iqft, grover)
        name: String,

        /// Number of qubits
        #[arg(short = 'n', long, default_value = "2")]
        qubits: u32,

        /// Marked basis state for grover
        #[arg(long, default_value = "0")]
        marked: usize,
    },

    /// List registered backends
    Backends,

    /// Show version information
    Version,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            input,
            shots,
            seed,
            representation,
            backend,
            format,
        } => {
            let options = run::RunOptions {
                shots,
                seed,
                representation,
                backend,
                format,
            };
            run::execute(&input, &options).await
        }

        Commands::State {
            input,
            representation,
            format,
        } => state::execute(&input, representation, format).await,

        Commands::Library {
            name,
            qubits,
            marked,
        } => library::execute(&name, qubits, marked),

        Commands::Backends => backends::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
