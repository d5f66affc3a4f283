//! Simulation of a design over successive clock edges

mod simulator;
mod state;

use crate::design::{Design, PinRef};
use crate::Error;

pub use simulator::Simulator;
pub use state::{Level, State};

/// Simulate a design over multiple ticks; return the state after each tick
///
/// Each pattern gives one value per input reference; it is written before the tick.
/// A pattern of another length is an [`Error::PatternLength`].
pub fn simulate(
    design: &Design,
    inputs: &[PinRef],
    patterns: &[Vec<bool>],
) -> Result<Vec<State>, Error> {
    let sim = Simulator::from_design(design)?;
    let mut state = sim.initial_state();
    let mut ret = Vec::new();
    for (index, pattern) in patterns.iter().enumerate() {
        if pattern.len() != inputs.len() {
            return Err(Error::PatternLength {
                index,
                expected: inputs.len(),
                got: pattern.len(),
            });
        }
        for (r, v) in inputs.iter().zip(pattern) {
            state.drive(*r, *v);
        }
        state = sim.tick(&state)?;
        ret.push(state.clone());
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{simulate, Level, Simulator};
    use crate::design::{Design, PinRef};
    use crate::io::read_pld;
    use crate::Error;

    fn design(src: &str) -> Design {
        Design::from_tree(read_pld(src.as_bytes()).unwrap()).unwrap()
    }

    fn refs(d: &Design, names: &[&str]) -> Vec<PinRef> {
        names
            .iter()
            .map(|n| d.pin_ref(n, false, 0).unwrap())
            .collect()
    }

    fn level(d: &Design, state: &super::State, name: &str) -> Level {
        state.get(d.pins().get(name).unwrap())
    }

    #[test]
    fn test_sum_of_products() {
        let d = design("GAL16V8\nSOP\nA B C OUT\nOUT = A * B + /C\nDESCRIPTION\n");
        let inputs = refs(&d, &["A", "B", "C"]);
        let states = simulate(
            &d,
            &inputs,
            &[
                vec![true, true, false],
                vec![true, false, false],
                vec![true, false, true],
            ],
        )
        .unwrap();
        assert_eq!(level(&d, &states[0], "OUT"), Level::High);
        assert_eq!(level(&d, &states[1], "OUT"), Level::High);
        assert_eq!(level(&d, &states[2], "OUT"), Level::Low);
    }

    #[test]
    fn test_registered() {
        let d = design("GAL16V8\nREG\nIN D Q\nD = IN\nQ.R = D\nDESCRIPTION\n");
        let inputs = refs(&d, &["IN"]);
        let states = simulate(&d, &inputs, &[vec![true], vec![true], vec![false]]).unwrap();
        assert_eq!(level(&d, &states[0], "D"), Level::High);
        assert_eq!(level(&d, &states[0], "Q"), Level::Low);
        assert_eq!(level(&d, &states[1], "Q"), Level::High);
        assert_eq!(level(&d, &states[2], "D"), Level::Low);
        assert_eq!(level(&d, &states[2], "Q"), Level::High);
    }

    #[test]
    fn test_registered_counter() {
        // Two-bit counter: registers read each other's previous value
        let d = design(
            "GAL16V8\nCOUNT\nCLK Q0 Q1\nQ0.R = /Q0\nQ1.R = Q0 * /Q1 + /Q0 * Q1\nDESCRIPTION\n",
        );
        let states = simulate(&d, &[], &vec![vec![]; 5]).unwrap();
        let values: Vec<(Level, Level)> = states
            .iter()
            .map(|s| (level(&d, s, "Q1"), level(&d, s, "Q0")))
            .collect();
        use Level::*;
        assert_eq!(
            values,
            vec![(Low, High), (High, Low), (High, High), (Low, Low), (Low, High)]
        );
    }

    #[test]
    fn test_tristate() {
        let d = design("GAL16V8\nTRI\nSEL DATA Y\nY.T = DATA\nY.E = SEL\nDESCRIPTION\n");
        let inputs = refs(&d, &["SEL", "DATA"]);
        let states = simulate(
            &d,
            &inputs,
            &[
                vec![false, true],
                vec![false, false],
                vec![true, true],
                vec![true, false],
                vec![false, true],
            ],
        )
        .unwrap();
        let y: Vec<Level> = states.iter().map(|s| level(&d, s, "Y")).collect();
        use Level::*;
        assert_eq!(y, vec![Floating, Floating, High, Low, Floating]);
    }

    #[test]
    fn test_registered_enable() {
        let d = design("GAL22V10\nRTRI\nCLK OE D Q\nQ.R = D\nQ.E = OE\nDESCRIPTION\n");
        let inputs = refs(&d, &["OE", "D"]);
        let states = simulate(&d, &inputs, &[vec![false, true], vec![true, false]]).unwrap();
        assert_eq!(level(&d, &states[0], "Q"), Level::High);
        assert_eq!(level(&d, &states[1], "Q"), Level::Low);
    }

    #[test]
    fn test_disabled_toggle() {
        // The register reads its own output while its enable is off
        let d = design("GAL22V10
TOGGLE
CLK OE Q
Q.R = /Q
Q.E = OE
DESCRIPTION
");
        let inputs = refs(&d, &["OE"]);
        let states = simulate(&d, &inputs, &vec![vec![false]; 4]).unwrap();
        let q: Vec<Level> = states.iter().map(|s| level(&d, s, "Q")).collect();
        use Level::*;
        assert_eq!(q, vec![High, Low, High, Low]);
    }

    #[test]
    fn test_floating_input() {
        let d = design(
            "GAL16V8\nFLOAT\nSEL DATA Y Z\nY.T = DATA\nY.E = SEL\nZ.R = Y\nDESCRIPTION\n",
        );
        let inputs = refs(&d, &["SEL"]);
        let err = simulate(&d, &inputs, &[vec![false], vec![false]]).unwrap_err();
        match err {
            Error::FloatingInput { pin, equation } => {
                assert_eq!(pin, "Y");
                assert_eq!(equation, "Z");
            }
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn test_pattern_length() {
        let d = design("GAL16V8\nSOP\nA B OUT\nOUT = A * B\nDESCRIPTION\n");
        let inputs = refs(&d, &["A", "B"]);
        let err = simulate(&d, &inputs, &[vec![true, true], vec![true]]).unwrap_err();
        assert!(matches!(
            err,
            Error::PatternLength {
                index: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_chained_combinational() {
        // Equations listed before the equations they read
        let d = design("GAL16V8\nCHAIN\nA B X Y OUT\nOUT = Y\nY = /X\nX = A * B\nDESCRIPTION\n");
        let inputs = refs(&d, &["A", "B"]);
        let states = simulate(&d, &inputs, &[vec![true, true], vec![true, false]]).unwrap();
        assert_eq!(level(&d, &states[0], "OUT"), Level::Low);
        assert_eq!(level(&d, &states[1], "OUT"), Level::High);
    }

    #[test]
    fn test_determinism() {
        let d = design("GAL16V8\nDET\nA B X Q\nX = A * /B\nQ.R = X + Q\nDESCRIPTION\n");
        let sim = Simulator::from_design(&d).unwrap();
        let mut state = sim.initial_state();
        state.drive(d.pin_ref("A", false, 0).unwrap(), true);
        let s1 = sim.tick(&state).unwrap();
        let s2 = sim.tick(&state).unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_order_independence() {
        let d = design(
            "GAL16V8\nORD\nA B C X Y Z OUT\nX = A * B\nY = X + C\nZ = /X * C\nOUT = Y * Z\nDESCRIPTION\n",
        );
        let inputs = refs(&d, &["A", "B", "C"]);
        let resolved = Simulator::from_design(&d).unwrap();
        for perm in d
            .equations()
            .iter()
            .cloned()
            .permutations(d.equations().len())
        {
            let order = crate::design::resolve(&perm).unwrap();
            let sim = Simulator::with_order(&d, order);
            for bits in 0..8 {
                let mut state = sim.initial_state();
                for (i, r) in inputs.iter().enumerate() {
                    state.drive(*r, bits & (1 << i) != 0);
                }
                assert_eq!(
                    sim.tick(&state).unwrap(),
                    resolved.tick(&state).unwrap()
                );
            }
        }
    }
}
