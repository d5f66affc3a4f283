//! Error type shared by the readers, the design construction and the simulation

use std::io;

/// Errors that abort reading, building or simulating a design
///
/// Assertion mismatches are not errors: they are collected in a [`Report`](crate::testbench::Report).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading a file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The design or the test vectors could not be parsed
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line of the offending text
        line: usize,
        /// What was expected
        message: String,
    },

    /// A name was used that is not in the pin declarations
    #[error("unknown pin {name} at line {line}")]
    UnknownPin {
        /// Pin name, without inversion
        name: String,
        /// 1-based line of the reference
        line: usize,
    },

    /// Two equations drive the same pin
    #[error("pin {name} is driven by more than one equation (line {line})")]
    DuplicateEquation {
        /// Destination pin
        name: String,
        /// 1-based line of the second equation
        line: usize,
    },

    /// Combinational equations depend on each other in a loop
    #[error("combinational loop through pins {}", pins.join(", "))]
    CombinationalLoop {
        /// Destination pins of the equations left unordered
        pins: Vec<String>,
    },

    /// An equation read a floating (tristated) pin
    #[error("equation for {equation} reads floating pin {pin}")]
    FloatingInput {
        /// Pin whose value was floating
        pin: String,
        /// Destination pin of the equation being evaluated
        equation: String,
    },

    /// A simulation pattern does not give one value per input
    #[error("pattern {index} has {got} values for {expected} inputs")]
    PatternLength {
        /// 0-based index of the pattern
        index: usize,
        /// Number of inputs
        expected: usize,
        /// Number of values in the pattern
        got: usize,
    },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Error {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::parse(3, "expected '='").to_string(),
            "parse error at line 3: expected '='"
        );
        assert_eq!(
            Error::UnknownPin {
                name: "FOO".into(),
                line: 12
            }
            .to_string(),
            "unknown pin FOO at line 12"
        );
        assert_eq!(
            Error::CombinationalLoop {
                pins: vec!["X".into(), "Y".into()]
            }
            .to_string(),
            "combinational loop through pins X, Y"
        );
        assert_eq!(
            Error::FloatingInput {
                pin: "Y".into(),
                equation: "Z".into()
            }
            .to_string(),
            "equation for Z reads floating pin Y"
        );
        assert_eq!(
            Error::PatternLength {
                index: 2,
                expected: 3,
                got: 1
            }
            .to_string(),
            "pattern 2 has 1 values for 3 inputs"
        );
    }
}
