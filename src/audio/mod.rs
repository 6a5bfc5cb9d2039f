//! Software tone generation
//!
//! Architecture:
//! - One square-wave voice per beam: phase accumulator, linear gate ramp
//! - `ToneBank` implements `ToneOutput`, so the scheduler drives it directly
//! - Integer-only hot path, no allocation

pub mod bank;
pub mod voice;

pub use bank::ToneBank;
pub use voice::{FadeState, SquareVoice, VOICE_LEVEL};
