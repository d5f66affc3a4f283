//! Run test vector scripts against a design
//!
//! A [`Testbench`] keeps the pin state across the script. Stimulus lines drive the current
//! input pins and advance the simulation by one tick; assertion lines compare the current
//! state to the expected values. Mismatches are recorded in the [`Report`] and do not stop
//! the run.

use std::fmt;

use tracing::{debug, trace};

use crate::design::{Design, PinRef};
use crate::io::{Directive, Line, PinToken};
use crate::sim::{Level, Simulator, State};
use crate::Error;

/// Pin values after a stimulus line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Line of the stimulus
    pub line: usize,
    /// Values of the input pins, as listed
    pub inputs: Vec<Level>,
    /// Values of the output pins, as listed
    pub outputs: Vec<Level>,
    /// Comment following the stimulus
    pub comment: String,
}

/// An assertion that did not hold
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// Line of the assertion
    pub line: usize,
    /// Pin as written in the assertion
    pub pin: String,
    /// Expected value
    pub expected: Level,
    /// Value in the simulation
    pub actual: Level,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} expected {}, got {}",
            self.line, self.pin, self.expected, self.actual
        )
    }
}

/// What happened during the run, in script order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new test section
    Section(String),
    /// Names of the input and output columns of the following rows
    Columns {
        /// Input pins, as written
        inputs: Vec<String>,
        /// Output pins, as written
        outputs: Vec<String>,
    },
    /// A tick
    Row(Row),
    /// A failed assertion
    Failure(Failure),
}

/// Outcome of a test vector run
#[derive(Clone, Debug, Default)]
pub struct Report {
    events: Vec<Event>,
    nb_ticks: usize,
    nb_assertions: usize,
    nb_failures: usize,
}

impl Report {
    /// Events in script order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of ticks simulated
    pub fn nb_ticks(&self) -> usize {
        self.nb_ticks
    }

    /// Number of pin values checked, excluding don't cares
    pub fn nb_assertions(&self) -> usize {
        self.nb_assertions
    }

    /// Number of pin values that did not match
    pub fn nb_failures(&self) -> usize {
        self.nb_failures
    }

    /// Failed assertions
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.events.iter().filter_map(|e| match e {
            Event::Failure(f) => Some(f),
            _ => None,
        })
    }

    /// Returns true if every assertion held
    pub fn passed(&self) -> bool {
        self.nb_failures == 0
    }
}

/// Interpreter for test vector scripts
pub struct Testbench<'a> {
    sim: Simulator<'a>,
    state: State,
    inputs: Vec<PinRef>,
    outputs: Vec<PinRef>,
    columns_shown: bool,
    report: Report,
}

impl<'a> Testbench<'a> {
    /// Prepare a run on a design, with all pins low
    pub fn new(design: &'a Design) -> Result<Testbench<'a>, Error> {
        let sim = Simulator::from_design(design)?;
        let state = sim.initial_state();
        Ok(Testbench {
            sim,
            state,
            inputs: Vec::new(),
            outputs: Vec::new(),
            columns_shown: false,
            report: Report::default(),
        })
    }

    /// Current pin values
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Pins driven by stimulus lines
    pub fn inputs(&self) -> &[PinRef] {
        &self.inputs
    }

    /// Pins reported after each tick
    pub fn outputs(&self) -> &[PinRef] {
        &self.outputs
    }

    /// Run a whole script and return the report
    ///
    /// Fails on the first line referencing an unknown pin, or if the simulation reads a
    /// floating pin.
    pub fn run(mut self, lines: &[Line]) -> Result<Report, Error> {
        for line in lines {
            self.step(line)?;
        }
        debug!(
            "{} ticks, {} assertions, {} failures",
            self.report.nb_ticks, self.report.nb_assertions, self.report.nb_failures
        );
        Ok(self.report)
    }

    /// Process a single line
    pub fn step(&mut self, line: &Line) -> Result<(), Error> {
        match &line.directive {
            Directive::Section(name) => {
                self.report.events.push(Event::Section(name.clone()));
                self.columns_shown = false;
            }
            Directive::Inputs(pins) => {
                self.inputs = self.lookup(pins, line.number)?;
                self.columns_shown = false;
            }
            Directive::Outputs(pins) => {
                self.outputs = self.lookup(pins, line.number)?;
                self.columns_shown = false;
            }
            Directive::Assert(expectations) => {
                for e in expectations {
                    let r = self.design().pin_ref(&e.pin.name, e.pin.inverted, line.number)?;
                    let Some(expected) = e.expected else {
                        continue;
                    };
                    self.report.nb_assertions += 1;
                    let actual = self.state.read(r);
                    if actual != expected {
                        self.report.nb_failures += 1;
                        self.report.events.push(Event::Failure(Failure {
                            line: line.number,
                            pin: self.design().pins().ref_to_string(r),
                            expected,
                            actual,
                        }));
                    }
                }
            }
            Directive::Stimulus { bits, comment } => {
                for (c, r) in bits.chars().zip(&self.inputs) {
                    match c {
                        '1' => self.state.drive(*r, true),
                        '0' => self.state.drive(*r, false),
                        _ => (),
                    }
                }
                self.state = self.sim.tick(&self.state)?;
                self.report.nb_ticks += 1;
                trace!("Tick at line {}: {:?}", line.number, self.state.levels());
                self.show_columns();
                let row = Row {
                    line: line.number,
                    inputs: self.inputs.iter().map(|r| self.state.read(*r)).collect(),
                    outputs: self.outputs.iter().map(|r| self.state.read(*r)).collect(),
                    comment: comment.clone(),
                };
                self.report.events.push(Event::Row(row));
            }
        }
        Ok(())
    }

    fn design(&self) -> &'a Design {
        self.sim.design()
    }

    fn lookup(&self, pins: &[PinToken], line: usize) -> Result<Vec<PinRef>, Error> {
        pins.iter()
            .map(|p| self.design().pin_ref(&p.name, p.inverted, line))
            .collect()
    }

    fn show_columns(&mut self) {
        if self.columns_shown {
            return;
        }
        let pins = self.design().pins();
        self.report.events.push(Event::Columns {
            inputs: self.inputs.iter().map(|r| pins.ref_to_string(*r)).collect(),
            outputs: self.outputs.iter().map(|r| pins.ref_to_string(*r)).collect(),
        });
        self.columns_shown = true;
    }
}
