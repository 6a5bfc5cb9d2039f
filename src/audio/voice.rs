//! Square-wave voice with phase accumulator and linear gate envelope
//!
//! Same waveform an AVR `tone()` pin produces, plus a short ramp on gate
//! changes so starting and stopping a beam does not click.

/// Envelope state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Output is zero
    Silent,
    /// Ramping up toward full level
    FadeIn,
    /// Full level
    Sustain,
    /// Ramping down toward zero
    FadeOut,
}

/// Output amplitude of one voice at full level (about -12 dBFS, so several
/// beams can sound together before the mix clips).
pub const VOICE_LEVEL: i16 = 8192;

/// One beam's oscillator.
pub struct SquareVoice {
    /// Phase accumulator, 32-bit fixed point. Top bit selects the half-cycle.
    phase: u32,
    /// Phase increment per output sample.
    phase_inc: u32,
    sample_rate: u32,
    /// Gate: true while the beam should sound.
    gate: bool,
    /// Envelope position, 0..=fade_len.
    level: u16,
    fade_len: u16,
}

impl SquareVoice {
    /// Create a silent voice.
    ///
    /// # Arguments
    /// * `sample_rate` - Output sample rate in Hz
    /// * `fade_samples` - Ramp length in samples (at least 1)
    pub fn new(sample_rate: u32, fade_samples: u16) -> Self {
        Self {
            phase: 0,
            phase_inc: 0,
            sample_rate: sample_rate.max(1),
            gate: false,
            level: 0,
            fade_len: fade_samples.max(1),
        }
    }

    /// phase_inc = hz * 2^32 / sample_rate
    #[inline]
    fn calc_phase_inc(hz: u16, sample_rate: u32) -> u32 {
        ((hz as u64) << 32).checked_div(sample_rate as u64).unwrap_or(0) as u32
    }

    /// Retune without resetting phase (no discontinuity beyond the edge).
    #[inline]
    pub fn set_frequency(&mut self, hz: u16) {
        self.phase_inc = Self::calc_phase_inc(hz, self.sample_rate);
    }

    /// Open the gate at `hz`.
    pub fn note_on(&mut self, hz: u16) {
        if !self.is_audible() {
            self.phase = 0;
        }
        self.set_frequency(hz);
        self.gate = true;
    }

    /// Close the gate; the envelope ramps down.
    pub fn note_off(&mut self) {
        self.gate = false;
    }

    /// Current envelope state.
    pub fn fade_state(&self) -> FadeState {
        match (self.gate, self.level) {
            (true, l) if l >= self.fade_len => FadeState::Sustain,
            (true, _) => FadeState::FadeIn,
            (false, 0) => FadeState::Silent,
            (false, _) => FadeState::FadeOut,
        }
    }

    /// Gate open or still ramping down.
    #[inline]
    pub fn is_audible(&self) -> bool {
        self.gate || self.level > 0
    }

    /// Generate the next sample.
    #[inline]
    pub fn next_sample(&mut self) -> i16 {
        if self.gate {
            self.level = (self.level + 1).min(self.fade_len);
        } else {
            self.level = self.level.saturating_sub(1);
        }

        if self.level == 0 {
            return 0;
        }

        let high = self.phase < 0x8000_0000;
        self.phase = self.phase.wrapping_add(self.phase_inc);

        let amplitude = (VOICE_LEVEL as i32 * self.level as i32) / self.fade_len as i32;
        if high {
            amplitude as i16
        } else {
            -amplitude as i16
        }
    }

    /// Silence immediately, no ramp.
    pub fn reset(&mut self) {
        self.phase = 0;
        self.gate = false;
        self.level = 0;
    }
}
