//! Software tone output: one [`SquareVoice`] per beam, mixed to mono PCM.

use super::voice::SquareVoice;
use crate::beam::BeamId;
use crate::hal::tone::ToneOutput;

/// Default anti-click ramp: 2 ms.
pub const DEFAULT_FADE_MS: u32 = 2;

/// N-voice tone generator implementing [`ToneOutput`].
///
/// Commands for beams outside `0..N` are ignored (best effort, like the
/// hardware it stands in for).
pub struct ToneBank<const N: usize> {
    voices: [SquareVoice; N],
    sample_rate: u32,
}

impl<const N: usize> ToneBank<N> {
    /// Silent bank with the default ramp.
    pub fn new(sample_rate: u32) -> Self {
        let fade = (sample_rate * DEFAULT_FADE_MS / 1000).min(u16::MAX as u32) as u16;
        Self::with_fade(sample_rate, fade)
    }

    /// Silent bank with a `fade_samples` ramp.
    pub fn with_fade(sample_rate: u32, fade_samples: u16) -> Self {
        Self {
            voices: core::array::from_fn(|_| SquareVoice::new(sample_rate, fade_samples)),
            sample_rate,
        }
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Voice for beam `id`.
    pub fn voice(&self, id: BeamId) -> Option<&SquareVoice> {
        self.voices.get(id)
    }

    /// Voices currently audible (gate open or ramping down).
    pub fn audible_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_audible()).count()
    }

    /// Fill `out` with the mix of all voices, saturating at the i16 range.
    pub fn render(&mut self, out: &mut [i16]) {
        for sample in out.iter_mut() {
            let mix: i32 = self.voices.iter_mut().map(|v| v.next_sample() as i32).sum();
            *sample = mix.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }
    }

    /// Silence everything immediately.
    pub fn reset(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.reset();
        }
    }
}

impl<const N: usize> ToneOutput for ToneBank<N> {
    fn start(&mut self, beam: BeamId, hz: u16) {
        if let Some(voice) = self.voices.get_mut(beam) {
            voice.note_on(hz);
        }
    }

    fn stop(&mut self, beam: BeamId) {
        if let Some(voice) = self.voices.get_mut(beam) {
            voice.note_off();
        }
    }

    fn change(&mut self, beam: BeamId, hz: u16) {
        if let Some(voice) = self.voices.get_mut(beam) {
            voice.set_frequency(hz);
        }
    }
}
