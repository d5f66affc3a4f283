use tracing::trace;

use crate::design::{Design, Equation, PinId, PinMode};
use crate::sim::{Level, State};
use crate::Error;

/// Clocked simulation of a design, one tick per clock edge
///
/// Equations are ordered once at construction; [`Simulator::tick`] then computes the next state:
///   * combinational and tristate equations in dependency order, each seeing the values
///     computed before it in the same tick;
///   * enable equations into a side table;
///   * registered equations on the state before the tick;
///   * disabled pins are set floating, then the registered values are committed.
///
/// A registered output keeps its clocked value even if an enable equation gates it.
pub struct Simulator<'a> {
    design: &'a Design,
    equations: Vec<Equation>,
}

impl<'a> Simulator<'a> {
    /// Prepare the simulation of a design; fails if the combinational logic has a loop
    pub fn from_design(design: &'a Design) -> Result<Simulator<'a>, Error> {
        Ok(Simulator {
            design,
            equations: design.resolve()?,
        })
    }

    /// Prepare the simulation with an explicit evaluation order
    ///
    /// Each combinational equation must come after those driving the pins it reads.
    pub fn with_order(design: &'a Design, equations: Vec<Equation>) -> Simulator<'a> {
        Simulator { design, equations }
    }

    /// Design being simulated
    pub fn design(&self) -> &'a Design {
        self.design
    }

    /// Equations in evaluation order
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// State before the first tick: all pins low
    pub fn initial_state(&self) -> State {
        State::new(self.design.nb_pins())
    }

    /// Compute the state after one clock edge
    ///
    /// Input values must already be written into `state`.
    pub fn tick(&self, state: &State) -> Result<State, Error> {
        let mut next = state.clone();
        let mut enables: Vec<(PinId, bool)> = Vec::new();
        let mut registered: Vec<(PinId, bool)> = Vec::new();
        for eq in &self.equations {
            match eq.mode() {
                PinMode::Combinational | PinMode::Tristate => {
                    let v = self.evaluate(eq, &next)?;
                    next.set(eq.pin(), Level::from(v));
                }
                PinMode::Enable => {
                    let v = self.evaluate(eq, &next)?;
                    enables.push((eq.pin(), v));
                }
                PinMode::Registered => {
                    let v = self.evaluate(eq, state)?;
                    registered.push((eq.pin(), v));
                }
            }
        }
        for (pin, enabled) in enables {
            if !enabled {
                trace!("{} disabled", self.design.pins().name(pin));
                next.set(pin, Level::Floating);
            }
        }
        for (pin, v) in registered {
            next.set(pin, Level::from(v));
        }
        Ok(next)
    }

    fn evaluate(&self, eq: &Equation, state: &State) -> Result<bool, Error> {
        eq.evaluate(state).map_err(|pin| Error::FloatingInput {
            pin: self.design.pins().name(pin).to_owned(),
            equation: self.design.pins().name(eq.pin()).to_owned(),
        })
    }
}
