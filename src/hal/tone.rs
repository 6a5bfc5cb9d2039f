//! Tone output collaborator.
//!
//! Whatever makes sound for a beam: a PWM timer per beam on the firmware,
//! the software [`ToneBank`](crate::audio::ToneBank) on the host.

use crate::beam::BeamId;

/// Per-beam tone generator. Best-effort, never fails.
pub trait ToneOutput {
    /// Begin sounding `hz` on a silent beam.
    fn start(&mut self, beam: BeamId, hz: u16);

    /// Silence a sounding beam.
    fn stop(&mut self, beam: BeamId);

    /// Retune a sounding beam.
    fn change(&mut self, beam: BeamId, hz: u16);
}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    fn start(&mut self, beam: BeamId, hz: u16) {
        (**self).start(beam, hz)
    }

    fn stop(&mut self, beam: BeamId) {
        (**self).stop(beam)
    }

    fn change(&mut self, beam: BeamId, hz: u16) {
        (**self).change(beam, hz)
    }
}

/// One call to a [`ToneOutput`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneCommand {
    Start { beam: BeamId, hz: u16 },
    Stop { beam: BeamId },
    Change { beam: BeamId, hz: u16 },
}

impl ToneCommand {
    /// Beam this command targets.
    pub fn beam(&self) -> BeamId {
        match *self {
            Self::Start { beam, .. } | Self::Stop { beam } | Self::Change { beam, .. } => beam,
        }
    }

    /// Deliver to `output`.
    #[inline]
    pub fn apply<T: ToneOutput + ?Sized>(self, output: &mut T) {
        match self {
            Self::Start { beam, hz } => output.start(beam, hz),
            Self::Stop { beam } => output.stop(beam),
            Self::Change { beam, hz } => output.change(beam, hz),
        }
    }
}

impl core::fmt::Display for ToneCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Start { beam, hz } => write!(f, "start beam {} @ {} Hz", beam, hz),
            Self::Stop { beam } => write!(f, "stop beam {}", beam),
            Self::Change { beam, hz } => write!(f, "change beam {} -> {} Hz", beam, hz),
        }
    }
}
