#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use commands::suite::Suite;
use gauntlet_core::bench::TakParams;
use gauntlet_core::config::{
    ALLOCS_PER_WORKER, CONCURRENT_WORKERS, COUNTER_INCREMENTS, COUNTER_THREADS, PROGRESS_INTERVAL,
    TAK_ARGS,
};
use gauntlet_core::workload::{
    ConcurrentStressParams, CounterParams, InjectedFault, StackProbeParams,
};
use gauntlet_core::Config;
use miette::Result;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "gauntlet")]
#[command(author, version, about = "Raw CPU, memory and concurrency micro-benchmarks", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Worker pool size for pooled workloads (0 = available parallelism)
    #[arg(long, global = true, env = "GAUNTLET_THREADS")]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Primes, small-buffer churn, Fibonacci and parallel primes
    Mixed,

    /// Recursive Fibonacci, block allocation, requests, sieve and vector add
    Heavy,

    /// Long-running workloads folded into one checksum
    Extreme,

    /// Takeuchi function
    Tak {
        #[arg(long, default_value_t = TAK_ARGS.0, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, default_value_t = TAK_ARGS.1, allow_negative_numbers = true)]
        y: i32,
        #[arg(long, default_value_t = TAK_ARGS.2, allow_negative_numbers = true)]
        z: i32,
    },

    /// Allocate and retain blocks until the target or the first failure
    AllocStress {
        /// Number of blocks (non-numeric input falls back to 1000)
        #[arg(allow_hyphen_values = true)]
        count: Option<String>,

        /// Block size in KiB
        #[arg(long, default_value_t = commands::alloc::DEFAULT_BLOCK_KIB)]
        block_kib: u64,

        /// Bytes between forced page writes (0 disables touching)
        #[arg(long, default_value_t = commands::alloc::DEFAULT_STRIDE)]
        stride: usize,
    },

    /// Many workers allocating in parallel, each isolated from the others
    ConcurrentStress {
        #[arg(long, default_value_t = CONCURRENT_WORKERS)]
        workers: u32,

        /// Allocations per worker
        #[arg(long, default_value_t = ALLOCS_PER_WORKER)]
        allocs: u32,

        /// Allocation size in KiB
        #[arg(long, default_value_t = 64)]
        size_kib: usize,

        /// Make the first N workers fault halfway through
        #[arg(long, default_value_t = 0)]
        inject_faults: u32,

        /// Injected faults panic inside the worker instead of returning
        #[arg(long, requires = "inject_faults")]
        panic_faults: bool,
    },

    /// Recurse until the stack overflows, printing progress
    StackProbe {
        /// Probe thread stack size in MiB
        #[arg(long, default_value_t = 1024)]
        stack_mib: usize,

        /// Stop cleanly at this depth
        #[arg(long)]
        max_depth: Option<u64>,

        /// Frames between progress lines
        #[arg(long, default_value_t = PROGRESS_INTERVAL)]
        interval: u64,
    },

    /// Threads incrementing one shared atomic counter
    Counter {
        /// Incrementing threads
        #[arg(long, default_value_t = COUNTER_THREADS)]
        workers: u32,

        /// Increments per thread
        #[arg(long, default_value_t = COUNTER_INCREMENTS)]
        increments: u64,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::default()
        .with_verbosity(cli.verbose)
        .with_json(cli.json)
        .with_threads(cli.threads);

    logging::init(config.verbosity, config.json);

    let span = tracing::info_span!("gauntlet", command = ?cli.command);
    let _guard = span.enter();
    tracing::debug!(pool_size = config.pool_size(), "starting");

    let json = config.json;
    match cli.command {
        Commands::Version => commands::version::run(json)?,
        Commands::Mixed => commands::suite::run(Suite::Mixed, json)?,
        Commands::Heavy => commands::suite::run(Suite::Heavy, json)?,
        Commands::Extreme => commands::suite::run(Suite::Extreme, json)?,
        Commands::Tak { x, y, z } => commands::suite::run(Suite::Tak(TakParams { x, y, z }), json)?,
        Commands::AllocStress {
            count,
            block_kib,
            stride,
        } => return commands::alloc::run(count.as_deref(), block_kib, stride, json),
        Commands::ConcurrentStress {
            workers,
            allocs,
            size_kib,
            inject_faults,
            panic_faults,
        } => {
            let params = ConcurrentStressParams {
                workers,
                allocs_per_worker: allocs,
                alloc_size: size_kib.saturating_mul(1024),
                threads: config.threads,
                inject_faults,
                fault_kind: if panic_faults {
                    InjectedFault::Panic
                } else {
                    InjectedFault::Fail
                },
            };
            return commands::concurrent::run(params, json);
        }
        Commands::StackProbe {
            stack_mib,
            max_depth,
            interval,
        } => {
            let params = StackProbeParams {
                stack_bytes: stack_mib.saturating_mul(1024 * 1024),
                progress_interval: interval,
                max_depth,
            };
            commands::probe::run(params, json)?;
        }
        Commands::Counter {
            workers,
            increments,
        } => commands::counter::run(
            CounterParams {
                threads: workers,
                increments,
            },
            json,
        )?,
    }

    Ok(ExitCode::SUCCESS)
}
