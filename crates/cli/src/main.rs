//! Cycle-level DRAM memory subsystem simulator CLI.

use clap::Parser;
use std::process;

use dramsim::config::Config;
use dramsim::mem::request::AccessKind;
use dramsim::mem::system::System;
use dramsim::sim::loader;

#[derive(Parser, Debug)]
#[command(
    name = "dramsim",
    author,
    version,
    about = "Cycle-level DRAM memory subsystem simulator",
    long_about = None,
)]
struct Cli {
    /// Access trace to replay: one `R <hex-addr>` or `W <hex-addr>` per line.
    trace: String,

    /// Simulator configuration (JSON). Defaults to a single DDR3-1600
    /// controller when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Stop after this many cycles even if requests are still in flight.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Print every dispatched command after the run.
    #[arg(long)]
    trace_commands: bool,

    /// Dump the final controller/channel/rank/bank state.
    #[arg(long)]
    dump: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fatal(&e)),
        None => Config::default(),
    };
    if cli.trace_commands {
        config.general.record_commands = true;
    }

    let accesses = loader::load_trace(&cli.trace).unwrap_or_else(|e| fatal(&e));
    let mut system = System::new(&config).unwrap_or_else(|e| fatal(&e));

    for access in &accesses {
        let result = match access.kind {
            AccessKind::Read => system.read(access.addr),
            AccessKind::Write => system.write(access.addr),
        };
        if let Err(e) = result {
            fatal::<()>(&e);
        }
    }

    match cli.max_cycles {
        Some(cycle) => system.run_until(cycle),
        None => {
            system.run_to_idle();
        }
    }

    if cli.trace_commands {
        for record in system.records() {
            println!(
                "cycle {:>8}  mc{}.{} rank {} bank {}  {:<9} #{:<6} row {:<6} (queued at {})",
                record.dispatched_at,
                record.controller,
                record.channel,
                record.rank,
                record.bank,
                record.kind.to_string(),
                record.id,
                record.row,
                record.created_at,
            );
        }
    }
    if cli.dump {
        print!("{system}");
    }

    let frequency = config.general.frequency_mhz;
    system.stats().print(system.now(), frequency);
}

fn fatal<T>(error: &dyn std::error::Error) -> T {
    eprintln!("\x1b[1;31merror:\x1b[0m {error}");
    process::exit(1);
}
