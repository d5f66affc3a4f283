use core::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::design::equation::Equation;
use crate::design::pin::{PinId, PinMode, PinRef, PinTable};
use crate::design::resolve::resolve;
use crate::io::{Device, Tree};
use crate::Error;

/// A GAL design: declared pins and the equations driving them, with names resolved to [`PinId`]
#[derive(Debug, Clone)]
pub struct Design {
    device: Device,
    name: String,
    pins: PinTable,
    equations: Vec<Equation>,
    description: String,
}

impl Design {
    /// Build a design from a parsed file
    ///
    /// All names must be declared in the pin list. Each pin has at most one driving equation
    /// (combinational, registered or tristate) and at most one enable equation.
    pub fn from_tree(tree: Tree) -> Result<Design, Error> {
        let mut pins = PinTable::new();
        for p in &tree.pins {
            pins.declare(&p.name, p.inverted);
        }
        if tree.pins.len() != tree.header.device.nb_pins() {
            warn!(
                "{} has {} pins, but {} are declared",
                tree.header.device,
                tree.header.device.nb_pins(),
                tree.pins.len()
            );
        }

        let lookup = |name: &str, line: usize| -> Result<PinId, Error> {
            pins.get(name).ok_or_else(|| Error::UnknownPin {
                name: name.to_owned(),
                line,
            })
        };

        let mut drivers: FxHashMap<PinId, PinMode> = FxHashMap::default();
        let mut enables: FxHashMap<PinId, usize> = FxHashMap::default();
        let mut equations = Vec::new();
        for decl in &tree.equations {
            let pin = lookup(&decl.output.name, decl.line)?;
            let seen = if decl.mode == PinMode::Enable {
                enables.insert(pin, decl.line).is_some()
            } else {
                drivers.insert(pin, decl.mode).is_some()
            };
            if seen {
                return Err(Error::DuplicateEquation {
                    name: decl.output.name.clone(),
                    line: decl.line,
                });
            }
            let mut terms = Vec::new();
            for term in &decl.terms {
                let factors = term
                    .iter()
                    .map(|f| -> Result<PinRef, Error> {
                        Ok(PinRef::new(lookup(&f.name, decl.line)?, f.inverted))
                    })
                    .collect::<Result<Vec<PinRef>, Error>>()?;
                terms.push(factors);
            }
            equations.push(Equation::new(
                PinRef::new(pin, decl.output.inverted),
                decl.mode,
                terms,
            ));
        }
        for (pin, line) in &enables {
            match drivers.get(pin) {
                None => warn!(
                    "Enable equation for {} at line {} gates no equation",
                    pins.name(*pin),
                    line
                ),
                Some(PinMode::Tristate) => (),
                Some(mode) => warn!(
                    "Enable equation for {} at line {} gates a {} output",
                    pins.name(*pin),
                    line,
                    mode
                ),
            }
        }

        Ok(Design {
            device: tree.header.device,
            name: tree.header.name,
            pins,
            equations,
            description: tree.footer.description,
        })
    }

    /// Target device
    pub fn device(&self) -> Device {
        self.device
    }

    /// Design name from the header
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description from the footer
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared pins
    pub fn pins(&self) -> &PinTable {
        &self.pins
    }

    /// Return the number of distinct pins
    pub fn nb_pins(&self) -> usize {
        self.pins.nb_pins()
    }

    /// Equations in source order
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Return whether some pin is driven by an equation
    pub fn is_driven(&self, pin: PinId) -> bool {
        self.equations.iter().any(|e| e.pin() == pin)
    }

    /// Equations in evaluation order; fails on a combinational loop
    pub fn resolve(&self) -> Result<Vec<Equation>, Error> {
        let order = resolve(&self.equations).map_err(|l| Error::CombinationalLoop {
            pins: l
                .pins
                .iter()
                .map(|p| self.pins.name(*p).to_owned())
                .collect(),
        })?;
        debug!(
            "Evaluation order: {}",
            order.iter().map(|e| self.pins.name(e.pin())).join(" ")
        );
        Ok(order)
    }

    /// Reference a pin by name from an external source such as a test vector file
    pub fn pin_ref(&self, name: &str, inverted: bool, line: usize) -> Result<PinRef, Error> {
        match self.pins.get(name) {
            Some(p) => Ok(PinRef::new(p, inverted)),
            None => Err(Error::UnknownPin {
                name: name.to_owned(),
                line,
            }),
        }
    }

    /// Source text of an equation, with pin names
    pub fn equation_to_string(&self, eq: &Equation) -> String {
        let mut ret = self.pins.ref_to_string(eq.output());
        if let Some(ext) = eq.mode().extension() {
            ret.push('.');
            ret.push_str(ext);
        }
        ret.push_str(" = ");
        let terms: Vec<String> = eq
            .terms()
            .iter()
            .map(|t| {
                t.iter()
                    .map(|f| self.pins.ref_to_string(*f))
                    .collect::<Vec<_>>()
                    .join(" * ")
            })
            .collect();
        ret.push_str(&terms.join(" + "));
        ret
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} design {}", self.device, self.name)?;
        write!(f, "Pins:")?;
        for p in self.pins.pins() {
            let prefix = if self.pins.is_declared_inverted(p) {
                "/"
            } else {
                ""
            };
            write!(f, " {prefix}{}", self.pins.name(p))?;
        }
        writeln!(f)?;
        writeln!(f, "Equations:")?;
        for eq in &self.equations {
            writeln!(f, "\t{}", self.equation_to_string(eq))?;
        }
        Ok(())
    }
}
