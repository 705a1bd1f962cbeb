//! Command-line front end for the burr puzzle solver core.
//!
//! This binary is a thin demonstration harness, not part of the solver
//! core: it reads six shape-text lines (slots `A..F`, in order) from a
//! file or stdin and prints the resulting disassembly as assembly-text
//! tokens. JSON puzzle-catalog loading and 3D/STL rendering of the
//! solution are explicitly out of scope (spec §6) and are not implemented
//! here either.

use std::fs;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use burr_solver::puzzle::Puzzle;
use burr_solver::solver::{self, AtomicCancel, Cancellation, SolveOptions};

/// Solves a six-piece burr puzzle and prints its disassembly.
#[derive(Parser)]
#[command(name = "burr-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a text file with six shape lines (slots A..F, in order).
    /// Reads from stdin if omitted.
    shapes: Option<String>,

    /// A known assembly string (e.g. "A1a B2c C3b D4a E5c F6a") to
    /// disassemble directly, skipping the assembly search.
    #[arg(long)]
    assembly: Option<String>,

    /// Use the multi-threaded assembly search.
    #[arg(long)]
    parallel: bool,

    /// Number of worker threads for `--parallel` (default: available
    /// parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Abort the search after this many milliseconds and report "no
    /// disassembly found" instead of hanging indefinitely.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn read_shape_lines(path: Option<&str>) -> io::Result<Vec<String>> {
    let text = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn main() {
    let cli = Cli::parse();

    let lines = match read_shape_lines(cli.shapes.as_deref()) {
        Ok(lines) => lines,
        Err(e) => {
            eprintln!("Failed to read shape text: {e}");
            std::process::exit(1);
        }
    };

    if lines.len() != 6 {
        eprintln!("Expected 6 shape lines, found {}", lines.len());
        std::process::exit(1);
    }

    let puzzle = match Puzzle::from_text(&lines) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid shape text: {e}");
            std::process::exit(1);
        }
    };

    if puzzle.level() > 1 {
        println!(
            "Puzzle is level {} (higher levels can take longer to solve)",
            puzzle.level()
        );
    }

    let cancel_flag = Arc::new(AtomicBool::new(false));
    if let Some(timeout_ms) = cli.timeout_ms {
        let cancel_flag = cancel_flag.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(timeout_ms));
            cancel_flag.store(true, Ordering::Relaxed);
        });
    }
    let cancel = AtomicCancel(cancel_flag);

    let disassembly = if let Some(assembly_text) = &cli.assembly {
        match puzzle.load_assembly(assembly_text) {
            Ok(state) => {
                println!("Using known assembly: {assembly_text}");
                solver::disassemble_known(&puzzle.with_state(state), &cancel)
            }
            Err(e) => {
                eprintln!("Invalid assembly text: {e}");
                std::process::exit(1);
            }
        }
    } else if cli.parallel {
        let options = SolveOptions {
            workers: cli.workers.unwrap_or_else(|| SolveOptions::default().workers),
        };
        solver::solve_parallel(&puzzle, &options, &cancel)
    } else {
        solver::solve(&puzzle, &cancel as &dyn Cancellation)
    };

    match disassembly {
        Ok(path) => {
            let assembled = path.first().expect("path always starts with the assembly");
            println!("Valid assembly: {}", assembled.0.to_assembly_text());
            println!("Disassembly takes {} steps", path.len() - 1);
            for (state, mv) in path.iter().skip(1) {
                let mv = mv.as_ref().unwrap();
                println!(
                    "  move {} piece(s) {:?} by {} step(s) -> {}",
                    mv.pieces.len(),
                    mv.direction,
                    mv.steps,
                    state.to_assembly_text()
                );
            }
        }
        Err(e) => {
            println!("No disassembly found: {e}");
        }
    }
}
