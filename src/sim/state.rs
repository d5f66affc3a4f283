use std::fmt;
use std::ops::Not;

use crate::design::{PinId, PinRef};

/// Value of a pin: driven high, driven low, or floating when a tristate output is disabled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Driven high
    High,
    /// Driven low
    #[default]
    Low,
    /// Not driven
    Floating,
}

impl Level {
    /// Boolean value of a driven pin, None if floating
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Level::High => Some(true),
            Level::Low => Some(false),
            Level::Floating => None,
        }
    }
}

impl From<bool> for Level {
    fn from(b: bool) -> Level {
        if b {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl Not for Level {
    type Output = Level;
    fn not(self) -> Level {
        match self {
            Level::High => Level::Low,
            Level::Low => Level::High,
            Level::Floating => Level::Floating,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::High => "HIGH",
            Level::Low => "LOW",
            Level::Floating => "Z",
        };
        f.pad(s)
    }
}

/// Values of all pins of a design, indexed by [`PinId`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    levels: Vec<Level>,
}

impl State {
    /// Create a state with all pins low
    pub fn new(nb_pins: usize) -> State {
        State {
            levels: vec![Level::Low; nb_pins],
        }
    }

    /// Return the number of pins
    pub fn nb_pins(&self) -> usize {
        self.levels.len()
    }

    /// Value of a pin
    pub fn get(&self, pin: PinId) -> Level {
        self.levels[pin.index()]
    }

    /// Set the value of a pin
    pub fn set(&mut self, pin: PinId, level: Level) {
        self.levels[pin.index()] = level;
    }

    /// All values, in pin order
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Value seen through a reference, inverted for `/PIN`
    pub fn read(&self, r: PinRef) -> Level {
        let l = self.get(r.pin());
        if r.is_inverted() {
            !l
        } else {
            l
        }
    }

    /// Drive a pin through a reference; `/PIN` driven true sets the pin low
    pub fn drive(&mut self, r: PinRef, value: bool) {
        self.set(r.pin(), Level::from(value ^ r.is_inverted()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert_eq!(!Level::High, Level::Low);
        assert_eq!(!Level::Floating, Level::Floating);
        assert_eq!(Level::Floating.to_bool(), None);
        assert_eq!(Level::High.to_bool(), Some(true));
        assert_eq!(format!("{:<6}|", Level::Floating), "Z     |");
        assert_eq!(format!("{}", Level::Low), "LOW");
    }

    #[test]
    fn test_state() {
        let mut s = State::new(3);
        assert_eq!(s.nb_pins(), 3);
        assert!(s.levels().iter().all(|l| *l == Level::Low));
        s.set(PinId::new(2), Level::Floating);
        assert_eq!(s.get(PinId::new(2)), Level::Floating);
        assert_eq!(s.get(PinId::new(0)), Level::Low);
    }

    #[test]
    fn test_inverted_access() {
        let mut s = State::new(2);
        let a = PinRef::new(PinId::new(0), false);
        s.drive(!a, true);
        assert_eq!(s.get(PinId::new(0)), Level::Low);
        assert_eq!(s.read(a), Level::Low);
        assert_eq!(s.read(!a), Level::High);
        s.drive(a, true);
        assert_eq!(s.read(a), Level::High);
        s.set(PinId::new(0), Level::Floating);
        assert_eq!(s.read(!a), Level::Floating);
    }
}
