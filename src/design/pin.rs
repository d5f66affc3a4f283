use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Not;

use fxhash::FxHashMap;

/// Dense identifier of a declared pin, used to index the simulation state
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct PinId(u32);

impl PinId {
    /// Create a pin identifier from its index in the pin table
    pub fn new(i: usize) -> PinId {
        PinId(i as u32)
    }

    /// Index of the pin in the pin table
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Reference to a pin at a use site: the pin and whether it is read inverted (`/A`)
///
/// Inversion is a property of the use site, not of the pin: two references to the same pin
/// compare equal and hash identically whatever their inversion.
/// Use [`PinRef::is_inverted`] to tell them apart.
#[derive(Clone, Copy)]
pub struct PinRef {
    a: u32,
}

impl PinRef {
    /// Create a reference to a pin
    pub fn new(pin: PinId, inverted: bool) -> PinRef {
        PinRef {
            a: (pin.0 << 1) | inverted as u32,
        }
    }

    /// Pin being referenced
    pub fn pin(&self) -> PinId {
        PinId(self.a >> 1)
    }

    /// Returns true if the pin is read inverted
    pub fn is_inverted(&self) -> bool {
        self.a & 1 != 0
    }
}

impl PartialEq for PinRef {
    fn eq(&self, other: &PinRef) -> bool {
        self.pin() == other.pin()
    }
}

impl Eq for PinRef {}

impl Hash for PinRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pin().hash(state);
    }
}

impl Not for PinRef {
    type Output = PinRef;
    fn not(self) -> PinRef {
        PinRef { a: self.a ^ 1u32 }
    }
}

impl fmt::Debug for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inverted() {
            write!(f, "/")?;
        }
        write!(f, "{}", self.pin())
    }
}

/// Role of an equation's destination pin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Plain sum of products, `OUT = ...`
    Combinational,
    /// Flip-flop output sampled on the clock edge, `OUT.R = ...`
    Registered,
    /// Output driven only while enabled, `OUT.T = ...`
    Tristate,
    /// Output enable of a tristate pin, `OUT.E = ...`
    Enable,
}

impl PinMode {
    /// Parse the extension following the dot in a destination (`R`, `T` or `E`, any case)
    pub fn from_extension(ext: &str) -> Option<PinMode> {
        match ext.to_ascii_uppercase().as_str() {
            "R" => Some(PinMode::Registered),
            "T" => Some(PinMode::Tristate),
            "E" => Some(PinMode::Enable),
            _ => None,
        }
    }

    /// Extension used in the source syntax, if any
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            PinMode::Combinational => None,
            PinMode::Registered => Some("R"),
            PinMode::Tristate => Some("T"),
            PinMode::Enable => Some("E"),
        }
    }

    /// Returns true for the modes evaluated in the combinational phase of a tick
    pub fn is_comb(&self) -> bool {
        !matches!(self, PinMode::Registered)
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PinMode::Combinational => "combinational",
            PinMode::Registered => "registered",
            PinMode::Tristate => "tristate",
            PinMode::Enable => "enable",
        };
        write!(f, "{s}")
    }
}

/// Names of the declared pins, with the lookup from name to [`PinId`]
#[derive(Clone, Debug, Default)]
pub struct PinTable {
    names: Vec<String>,
    inverted: Vec<bool>,
    index: FxHashMap<String, PinId>,
}

impl PinTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a pin; a name declared again returns the existing pin and keeps its first inversion
    pub fn declare(&mut self, name: &str, inverted: bool) -> PinId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = PinId::new(self.names.len());
        self.names.push(name.to_owned());
        self.inverted.push(inverted);
        self.index.insert(name.to_owned(), id);
        id
    }

    /// Number of distinct pins
    pub fn nb_pins(&self) -> usize {
        self.names.len()
    }

    /// Look up a pin by name
    pub fn get(&self, name: &str) -> Option<PinId> {
        self.index.get(name).copied()
    }

    /// Name of a pin
    pub fn name(&self, pin: PinId) -> &str {
        &self.names[pin.index()]
    }

    /// Whether the pin was declared active-low (`/NAME` in the pin list)
    pub fn is_declared_inverted(&self, pin: PinId) -> bool {
        self.inverted[pin.index()]
    }

    /// Iterate over all pins in declaration order
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        (0..self.names.len()).map(PinId::new)
    }

    /// Source text of a reference, such as `/A`
    pub fn ref_to_string(&self, r: PinRef) -> String {
        let prefix = if r.is_inverted() { "/" } else { "" };
        format!("{prefix}{}", self.name(r.pin()))
    }
}
