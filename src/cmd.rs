//! Command line interface

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use galsim::design::stats::stats;
use galsim::io::{read_design_file, read_vector_file};
use galsim::testbench::{Event, Report, Testbench};
use galsim::{Design, Level};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show a design
    ///
    /// Will print the pins, the equations in evaluation order and statistics.
    #[clap()]
    Show(ShowArgs),

    /// Run test vectors on a design
    ///
    /// Test vector lines:
    ///    < A B /C     input pins
    ///    > Y0 Y1      output pins
    ///    10x          one value per input pin, then a clock tick
    ///    ? Y0=1 Y1=Z  expected values
    ///    @ name       new section
    ///
    /// The command fails if an assertion does not hold.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),
}

/// Command arguments for design informations
#[derive(Args)]
pub struct ShowArgs {
    /// Design to show
    file: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) -> Result<()> {
        let design = read_design(&self.file)?;
        println!("{design}");
        println!("Evaluation order:");
        for eq in design.resolve()? {
            println!("\t{}", design.equation_to_string(&eq));
        }
        if !design.description().trim().is_empty() {
            println!("\nDescription:\n{}", design.description().trim_end());
        }
        println!("\n{}", stats(&design));
        Ok(())
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Design to simulate
    design: PathBuf,

    /// Test vector file
    vectors: PathBuf,

    /// Print plain text, without terminal colors
    #[arg(long)]
    no_color: bool,
}

impl SimulateArgs {
    /// Run the test vectors; returns whether all assertions held
    pub fn run(&self) -> Result<bool> {
        let design = read_design(&self.design)?;
        let lines = read_vector_file(&self.vectors)
            .with_context(|| format!("Failed to read {}", self.vectors.display()))?;
        info!(
            "Running {} lines of test vectors on {}",
            lines.len(),
            design.name()
        );
        let report = Testbench::new(&design)?
            .run(&lines)
            .with_context(|| format!("Simulation of {} failed", self.vectors.display()))?;
        print_report(&report, !self.no_color);
        Ok(report.passed())
    }
}

fn read_design(path: &Path) -> Result<Design> {
    let design =
        read_design_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
    info!(
        "Read {} design {} with {} equations",
        design.device(),
        design.name(),
        design.equations().len()
    );
    Ok(design)
}

const GRAY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const BLUE: &str = "\x1b[34m";
const BOLD_RED: &str = "\x1b[1;31m";

fn cell(level: Level, color: bool) -> String {
    if !color {
        return format!("{level:<8}");
    }
    let c = match level {
        Level::High => BOLD_GREEN,
        Level::Low => GRAY,
        Level::Floating => BLUE,
    };
    format!("{c}{level:<8}{RESET}")
}

fn print_report(report: &Report, color: bool) {
    for event in report.events() {
        match event {
            Event::Section(name) => println!("\n{name}\n"),
            Event::Columns { inputs, outputs } => {
                print!("LINE  ");
                for p in inputs {
                    print!("{p:<8}");
                }
                print!("|     ");
                for p in outputs {
                    print!("{p:<8}");
                }
                println!();
            }
            Event::Row(row) => {
                print!("{:>4}  ", row.line);
                for l in &row.inputs {
                    print!("{}", cell(*l, color));
                }
                print!("|     ");
                for l in &row.outputs {
                    print!("{}", cell(*l, color));
                }
                println!("{}", row.comment);
            }
            Event::Failure(f) => {
                if color {
                    println!("{BOLD_RED}FAIL{RESET}  {f}");
                } else {
                    println!("FAIL  {f}");
                }
            }
        }
    }
    println!();
    println!(
        "{} ticks, {} of {} assertions passed",
        report.nb_ticks(),
        report.nb_assertions() - report.nb_failures(),
        report.nb_assertions()
    );
    if !report.passed() {
        println!("Failures:");
        for f in report.failures() {
            println!("  {f}");
        }
    }
}
