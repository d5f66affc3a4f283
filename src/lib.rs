//! Test vector simulation for GAL equation files
//!
//! This crate simulates GAL16V8, GAL20V8 and GAL22V10 designs written as sum-of-products
//! equations, and checks them against test vectors before a chip is programmed.
//!
//! # Usage
//!
//! ```bash
//! # Show available commands
//! galsim help
//! # Show the pins, equations and evaluation order of a design
//! galsim show decoder.pld
//! # Run test vectors; the exit code is non-zero if an assertion fails
//! galsim sim decoder.pld decoder.test
//! ```
//!
//! # File formats
//!
//! Designs use the usual GAL assembler syntax: device, name, pin list, equations and a
//! description. Destinations may carry `.R` (registered), `.T` (tristate) or `.E`
//! (output enable). See [`io::read_pld`].
//!
//! Test vectors are line-based: `<` lists the input pins, `>` the reported output pins,
//! each other line gives one bit per input and advances the simulation by one clock,
//! and `?` checks pin values. See [`io::read_vectors`].
//!
//! # Simulation model
//!
//! The simulation is cycle-based, with one tick per stimulus line:
//! * combinational equations see the values computed in the same tick, and are evaluated
//!   after the equations they depend on; a combinational loop is an error;
//! * registered equations see the values before the tick, like flip-flops on a clock edge;
//! * a tristate pin whose enable equation is false is floating (`Z`); a registered pin
//!   keeps its clocked value.
//!
//! ```
//! # use galsim::{io::read_pld, io::read_vectors, testbench::Testbench, Design};
//! let src = "GAL16V8
//! EXAMPLE
//! A B C OUT
//! OUT = A * B + /C
//! DESCRIPTION
//! ";
//! let design = Design::from_tree(read_pld(src.as_bytes()).unwrap()).unwrap();
//! let vectors = read_vectors("< A B C\n110\n? OUT=1\n101\n? OUT=0\n".as_bytes()).unwrap();
//! let report = Testbench::new(&design).unwrap().run(&vectors).unwrap();
//! assert!(report.passed());
//! ```

#![warn(missing_docs)]

pub mod design;
mod error;
pub mod io;
pub mod sim;
pub mod testbench;

pub use design::{Design, Equation, PinId, PinMode, PinRef};
pub use error::Error;
pub use sim::{Level, Simulator, State};
