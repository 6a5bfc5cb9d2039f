//! Hardware-facing interfaces.
//!
//! Thin traits over the ADC and the tone generator. Business logic stays in
//! the core modules and receives these as explicit handles; nothing here
//! touches global peripheral state.

pub mod sensor;
pub mod tone;

pub use sensor::{BeamSensor, ScriptedSensor};
pub use tone::{ToneCommand, ToneOutput};
