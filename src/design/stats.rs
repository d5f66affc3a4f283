//! Compute design statistics
//!
//! ```
//! # use galsim::{io::read_pld, Design};
//! # let src = "GAL16V8\nX\nA B OUT\nOUT = A * B + /A\nDESCRIPTION\n";
//! # let design = Design::from_tree(read_pld(src.as_bytes()).unwrap()).unwrap();
//! use galsim::design::stats::stats;
//! let stats = stats(&design);
//!
//! assert_eq!(stats.nb_registered, 0);
//! assert_eq!(stats.nb_terms, 2);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::{Design, PinMode};

/// Number of pins, equations and product terms in a design
#[derive(Clone, Debug, Default)]
pub struct DesignStats {
    /// Number of distinct pins
    pub nb_pins: usize,
    /// Number of pins not driven by any equation
    pub nb_inputs: usize,
    /// Number of combinational equations
    pub nb_combinational: usize,
    /// Number of registered equations
    pub nb_registered: usize,
    /// Number of tristate equations
    pub nb_tristate: usize,
    /// Number of enable equations
    pub nb_enable: usize,
    /// Total number of product terms
    pub nb_terms: usize,
    /// Largest number of factors in a single product term
    pub max_factors: usize,
}

impl DesignStats {
    /// Total number of equations
    pub fn nb_equations(&self) -> usize {
        self.nb_combinational + self.nb_registered + self.nb_tristate + self.nb_enable
    }
}

impl fmt::Display for DesignStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Pins: {}", self.nb_pins)?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Equations: {}", self.nb_equations())?;
        if self.nb_combinational != 0 {
            writeln!(f, "    Combinational: {}", self.nb_combinational)?;
        }
        if self.nb_registered != 0 {
            writeln!(f, "    Registered: {}", self.nb_registered)?;
        }
        if self.nb_tristate != 0 {
            writeln!(f, "    Tristate: {}", self.nb_tristate)?;
        }
        if self.nb_enable != 0 {
            writeln!(f, "    Enable: {}", self.nb_enable)?;
        }
        writeln!(f, "  Product terms: {}", self.nb_terms)?;
        writeln!(f, "  Max factors per term: {}", self.max_factors)
    }
}

/// Compute the statistics of a design
pub fn stats(design: &Design) -> DesignStats {
    let mut ret = DesignStats {
        nb_pins: design.nb_pins(),
        nb_inputs: design
            .pins()
            .pins()
            .filter(|p| !design.is_driven(*p))
            .count(),
        ..Default::default()
    };
    for eq in design.equations() {
        match eq.mode() {
            PinMode::Combinational => ret.nb_combinational += 1,
            PinMode::Registered => ret.nb_registered += 1,
            PinMode::Tristate => ret.nb_tristate += 1,
            PinMode::Enable => ret.nb_enable += 1,
        }
        ret.nb_terms += eq.terms().len();
        for t in eq.terms() {
            ret.max_factors = ret.max_factors.max(t.len());
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::stats;
    use crate::io::read_pld;
    use crate::Design;

    #[test]
    fn test_stats() {
        let src = "GAL22V10
COUNT
CLK A B Y Q0 Q1
Q0.R = /Q0
Q1.R = Q0 * /Q1 + /Q0 * Q1
Y.T = Q0 * Q1 * A
Y.E = B
DESCRIPTION
";
        let design = Design::from_tree(read_pld(src.as_bytes()).unwrap()).unwrap();
        let s = stats(&design);
        assert_eq!(s.nb_pins, 6);
        assert_eq!(s.nb_inputs, 3);
        assert_eq!(s.nb_registered, 2);
        assert_eq!(s.nb_tristate, 1);
        assert_eq!(s.nb_enable, 1);
        assert_eq!(s.nb_combinational, 0);
        assert_eq!(s.nb_equations(), 4);
        assert_eq!(s.nb_terms, 5);
        assert_eq!(s.max_factors, 3);
        assert!(s.to_string().contains("Registered: 2"));
    }
}
