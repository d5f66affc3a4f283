use std::fmt;

use crate::design::pin::{PinId, PinMode, PinRef};
use crate::sim::State;

/// A sum-of-products equation driving one pin
///
/// The outer list of terms is OR'd, each term is the AND of its factors.
/// An inverted destination (`/OUT = ...`) inverts the whole sum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equation {
    output: PinRef,
    mode: PinMode,
    terms: Vec<Vec<PinRef>>,
}

impl Equation {
    /// Create an equation from its destination and its product terms
    pub fn new(output: PinRef, mode: PinMode, terms: Vec<Vec<PinRef>>) -> Equation {
        Equation {
            output,
            mode,
            terms,
        }
    }

    /// Destination of the equation, with its inversion
    pub fn output(&self) -> PinRef {
        self.output
    }

    /// Destination pin
    pub fn pin(&self) -> PinId {
        self.output.pin()
    }

    /// Role of the destination pin
    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Product terms, in source order
    pub fn terms(&self) -> &[Vec<PinRef>] {
        &self.terms
    }

    /// All factors of all terms, in source order and with duplicates
    pub fn dependencies(&self) -> impl Iterator<Item = PinRef> + '_ {
        self.terms.iter().flat_map(|t| t.iter().copied())
    }

    /// Evaluate the equation on a state
    ///
    /// Returns the floating pin if a factor reads one: a tristated output is not a valid
    /// input to another equation.
    pub fn evaluate(&self, state: &State) -> Result<bool, PinId> {
        let mut sum = false;
        for term in &self.terms {
            let mut product = true;
            for factor in term.iter() {
                let value = state.get(factor.pin()).to_bool().ok_or(factor.pin())?;
                product &= value ^ factor.is_inverted();
            }
            sum |= product;
        }
        Ok(sum ^ self.output.is_inverted())
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.output)?;
        if let Some(ext) = self.mode.extension() {
            write!(f, ".{ext}")?;
        }
        write!(f, " =")?;
        for (i, term) in self.terms.iter().enumerate() {
            if i != 0 {
                write!(f, " +")?;
            }
            for (j, factor) in term.iter().enumerate() {
                if j != 0 {
                    write!(f, " *")?;
                }
                write!(f, " {factor:?}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Level;

    fn r(i: usize) -> PinRef {
        PinRef::new(PinId::new(i), false)
    }

    /// OUT = A * B + /C
    fn scenario_a() -> Equation {
        Equation::new(
            r(3),
            PinMode::Combinational,
            vec![vec![r(0), r(1)], vec![!r(2)]],
        )
    }

    fn state_from(values: &[bool]) -> State {
        let mut state = State::new(values.len());
        for (i, v) in values.iter().enumerate() {
            state.set(PinId::new(i), Level::from(*v));
        }
        state
    }

    #[test]
    fn test_sum_of_products() {
        let eq = scenario_a();
        assert_eq!(eq.evaluate(&state_from(&[true, true, false, false])), Ok(true));
        assert_eq!(eq.evaluate(&state_from(&[true, false, false, false])), Ok(true));
        assert_eq!(eq.evaluate(&state_from(&[true, false, true, false])), Ok(false));
        assert_eq!(eq.evaluate(&state_from(&[true, true, true, false])), Ok(true));
    }

    #[test]
    fn test_inversion_symmetry() {
        let plain = Equation::new(r(1), PinMode::Combinational, vec![vec![r(0)]]);
        let inv = Equation::new(r(1), PinMode::Combinational, vec![vec![!r(0)]]);
        let inv_out = Equation::new(!r(1), PinMode::Combinational, vec![vec![r(0)]]);
        for v in [false, true] {
            let state = state_from(&[v, false]);
            assert_eq!(plain.evaluate(&state), Ok(v));
            assert_eq!(inv.evaluate(&state), Ok(!v));
            assert_eq!(inv_out.evaluate(&state), Ok(!v));
        }
    }

    #[test]
    fn test_floating_input() {
        let eq = scenario_a();
        let mut state = state_from(&[true, true, false, false]);
        state.set(PinId::new(1), Level::Floating);
        assert_eq!(eq.evaluate(&state), Err(PinId::new(1)));
    }

    #[test]
    fn test_dependencies() {
        let eq = Equation::new(
            r(3),
            PinMode::Combinational,
            vec![vec![r(0), r(1)], vec![!r(0)]],
        );
        let deps: Vec<PinId> = eq.dependencies().map(|d| d.pin()).collect();
        assert_eq!(deps, vec![PinId::new(0), PinId::new(1), PinId::new(0)]);
    }

    #[test]
    fn test_display() {
        let mut eq = scenario_a();
        assert_eq!(format!("{eq}"), "p3 = p0 * p1 + /p2");
        eq.mode = PinMode::Registered;
        assert_eq!(format!("{eq}"), "p3.R = p0 * p1 + /p2");
    }
}
