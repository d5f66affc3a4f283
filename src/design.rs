//! Representation of a GAL design: pins, sum-of-products equations and their evaluation order

mod design;
mod equation;
mod pin;
mod resolve;
pub mod stats;

pub use design::Design;
pub use equation::Equation;
pub use pin::{PinId, PinMode, PinRef, PinTable};
pub use resolve::{resolve, CombinationalLoop};
