//! # LaserHarp
//!
//! Beam state machine and pitch acquisition core for a multi-beam laser harp.
//!
//! ## Architecture
//!
//! ```text
//! sensor ──▶ BeamUpdater ──▶ BeamState ──▶ BeamScheduler ──▶ ToneOutput
//!            (sampling ISR)  (1 atomic     (control loop)
//!                             word/beam)
//! ```
//!
//! - One producer per beam, one consumer for all beams
//! - Each beam publishes its whole decision in a single atomic store
//! - No locks, no blocking, no allocation on either side
//! - Hardware enters only through the [`hal`] traits, passed in explicitly

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod averager;
pub mod beam;
pub mod config;
pub mod error;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod notes;
pub mod pitch;
pub mod scheduler;
pub mod updater;

pub use averager::{SampleAverager, SAMPLE_WINDOW};
pub use beam::{BeamBank, BeamId, BeamSnapshot, BeamState, ChangeIndicator, NO_FREQUENCY};
pub use config::{HarpConfig, HarpSettings, ObstructedBand, CONFIG};
pub use error::ConfigError;
pub use hal::{BeamSensor, ScriptedSensor, ToneCommand, ToneOutput};
pub use log_globals::{ISR_LOG, LOOP_LOG};
pub use notes::{Note, NoteTable, NOTE_TABLE};
pub use pitch::PitchMode;
pub use scheduler::{BeamScheduler, Voice};
pub use updater::BeamUpdater;
