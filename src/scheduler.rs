//! Beam scheduler: the consumer half of the pipeline.
//!
//! Runs in the cooperative control loop. Each [`poll`](BeamScheduler::poll)
//! visits every beam once:
//!
//! ```text
//! snapshot = beam.snapshot()            // one Acquire load
//! if snapshot.indicator == seen[beam]   // nothing new
//!     continue
//! seen[beam] = snapshot.indicator
//! command = transition(voice[beam], snapshot)
//! ```
//!
//! Per-beam voice state machine (consumer's view):
//!
//! ```text
//!            start                 change
//!   Silent ─────────▶ Sounding(hz) ──────▶ Sounding(hz')
//!     ▲                   │
//!     └───────stop────────┘
//! ```
//!
//! The command is derived from (voice, snapshot), not from the indicator
//! alone: if a beam went A → B → A between two passes the indicator moved,
//! but the output already matches and no call is made.

use crate::beam::{BeamBank, BeamId, BeamSnapshot, ChangeIndicator};
use crate::hal::tone::{ToneCommand, ToneOutput};
use crate::logging::LogStream;

/// What the scheduler believes a beam is currently sounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Voice {
    #[default]
    Silent,
    Sounding(u16),
}

impl Voice {
    /// Whether a tone is playing.
    #[inline]
    pub fn is_sounding(&self) -> bool {
        matches!(self, Voice::Sounding(_))
    }

    /// Voice state after `command` has been delivered.
    #[inline]
    pub fn after(self, command: &ToneCommand) -> Voice {
        match *command {
            ToneCommand::Start { hz, .. } | ToneCommand::Change { hz, .. } => Voice::Sounding(hz),
            ToneCommand::Stop { .. } => Voice::Silent,
        }
    }
}

/// Command needed to bring `voice` in line with `snapshot`, if any.
pub fn transition(beam: BeamId, voice: Voice, snapshot: &BeamSnapshot) -> Option<ToneCommand> {
    match (voice, snapshot.hz()) {
        (Voice::Silent, Some(hz)) => Some(ToneCommand::Start { beam, hz }),
        (Voice::Sounding(current), Some(hz)) if current != hz => Some(ToneCommand::Change { beam, hz }),
        (Voice::Sounding(_), None) => Some(ToneCommand::Stop { beam }),
        _ => None,
    }
}

/// Consumer for a bank of N beams.
pub struct BeamScheduler<'a, const N: usize> {
    beams: &'a BeamBank<N>,
    /// Last indicator seen per beam. `None` until the first inspection, so a
    /// scheduler created after sampling started still picks up live notes.
    seen: [Option<ChangeIndicator>; N],
    voices: [Voice; N],
    passes: u32,
    log: Option<&'a LogStream>,
}

impl<'a, const N: usize> BeamScheduler<'a, N> {
    /// Create a scheduler with every voice silent.
    pub fn new(beams: &'a BeamBank<N>) -> Self {
        Self {
            beams,
            seen: [None; N],
            voices: [Voice::Silent; N],
            passes: 0,
            log: None,
        }
    }

    /// Log every issued command to `log` (normally the control-loop stream).
    pub fn with_log(mut self, log: &'a LogStream) -> Self {
        self.log = Some(log);
        self
    }

    /// One control-loop pass over all beams.
    ///
    /// Issues at most one command per beam and returns how many were issued.
    /// Never blocks.
    pub fn poll<T: ToneOutput + ?Sized>(&mut self, output: &mut T) -> usize {
        self.passes = self.passes.wrapping_add(1);

        let mut issued = 0;
        for id in 0..N {
            if let Some(command) = self.service(id) {
                command.apply(output);
                issued += 1;
            }
        }
        issued
    }

    /// Stop every sounding voice (shutdown, fault).
    ///
    /// Cached indicators are kept: a beam that is still active will not be
    /// restarted until its decision changes again. Call
    /// [`resync`](Self::resync) to pick it up on the next pass instead.
    pub fn silence_all<T: ToneOutput + ?Sized>(&mut self, output: &mut T) -> usize {
        let mut issued = 0;
        for (beam, voice) in self.voices.iter_mut().enumerate() {
            if voice.is_sounding() {
                let command = ToneCommand::Stop { beam };
                command.apply(output);
                *voice = Voice::Silent;
                issued += 1;
            }
        }
        issued
    }

    /// Forget cached indicators; the next pass inspects every beam.
    pub fn resync(&mut self) {
        self.seen = [None; N];
    }

    /// Voice state for beam `id`.
    #[inline]
    pub fn voice(&self, id: BeamId) -> Option<Voice> {
        self.voices.get(id).copied()
    }

    /// Number of voices sounding.
    pub fn sounding_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }

    /// Passes run so far.
    #[inline]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    fn service(&mut self, id: BeamId) -> Option<ToneCommand> {
        let snapshot = self.beams[id].snapshot();
        let indicator = Some(snapshot.indicator());
        if self.seen[id] == indicator {
            return None;
        }
        self.seen[id] = indicator;

        let command = transition(id, self.voices[id], &snapshot)?;
        self.voices[id] = self.voices[id].after(&command);

        if let Some(log) = self.log {
            crate::rt_info!(log, self.passes, "{}", command);
        }
        Some(command)
    }
}
