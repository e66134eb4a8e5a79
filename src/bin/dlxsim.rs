//! CLI entry point: `dlxsim [-D] <program>`.
//!
//! Assembles `program`, runs it to completion, and dumps final state.
//! This binary is an external collaborator, not core — argument parsing
//! and dump formatting live here and in [`dlxsim::debug`], never inside
//! the pipeline itself.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dlxsim::constants::MAX_LINES_OF_CODE;
use dlxsim::debug;
use dlxsim::{Simulator, SimulatorConfig};

/// Cycle-accurate simulator for a five-stage pipelined DLX integer
/// processor.
#[derive(Parser, Debug)]
#[command(name = "dlxsim", author, version, about)]
struct Cli {
    /// Output additional information about simulator state
    #[arg(short = 'D', long = "debug")]
    debug: bool,

    /// Path to an assembled DLX program
    program: String,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // A malformed invocation is a usage error, not a fatal
            // simulator condition: print clap's message and exit 0.
            let _ = e.print();
            process::exit(0);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let program = match dlxsim::assembler::assemble_file(&cli.program, MAX_LINES_OF_CODE) {
        Ok(program) => program,
        Err(e) => {
            println!("{e}");
            process::exit(0);
        }
    };

    let mut sim = Simulator::new(program.instructions, program.data, SimulatorConfig::default());

    if let Err(e) = sim.run() {
        println!("{e}");
        process::exit(e.exit_code());
    }

    let state = &sim.state;
    if cli.debug {
        println!("Registers:");
        print!("{}", debug::format_registers(&state.register_file));
        println!("Memory:");
        print!("{}", debug::format_memory(&state.data_memory));
        println!("Instructions: {}", state.instructions_executed);
        println!("Cycles: {}", state.cycles_executed);
    } else {
        println!("Final register file values:");
        print!("{}", debug::format_registers_final(&state.register_file));
        let (ipc, cpi) = debug::format_rates(state.instructions_executed, state.cycles_executed);
        println!("\nCycles executed: {}", state.cycles_executed);
        println!("IPC:  {ipc}");
        println!("CPI:  {cpi}");
    }
}
