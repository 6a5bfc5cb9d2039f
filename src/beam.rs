//! Module: beam
//!
//! Purpose: Shared per-beam state, written by the sampling context and read by
//! the control loop.
//!
//! Architecture:
//! ```text
//! BeamUpdater ──publish()──▶ BeamState ──snapshot()──▶ BeamScheduler
//! (tick ISR)                 (1 x AtomicU32)           (main loop)
//! ```
//!
//! The three consumer-visible fields (`active`, `frequency`, change indicator)
//! are packed into one 32-bit word and published with a single Release store.
//! The consumer reads them with a single Acquire load, so it can never pair a
//! half-written frequency with a stale indicator.
//!
//! Word layout:
//! ```text
//! [31..25 reserved][24 active][23..16 indicator:i8][15..0 frequency:i16]
//! ```
//!
//! Safety: Safe. One writer per beam (its updater), one reader (the scheduler).
//! Requires 32-bit atomics on the target.

use core::sync::atomic::{AtomicU32, Ordering};

/// Index of a beam within its bank.
pub type BeamId = usize;

/// Frequency value published while a beam is inactive.
pub const NO_FREQUENCY: i16 = -1;

const FREQ_MASK: u32 = 0x0000_FFFF;
const INDICATOR_SHIFT: u32 = 16;
const ACTIVE_BIT: u32 = 1 << 24;

/// Narrow change summary for one beam.
///
/// Advanced by the producer every time the beam's output decision changes.
/// Consecutive distinct decisions always carry distinct values; a run of
/// identical decisions keeps the same value. Wraps after 256 changes.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeIndicator(i8);

impl ChangeIndicator {
    /// Value before the first change.
    pub const INITIAL: Self = Self(-1);

    /// Create from a raw value.
    pub const fn from_raw(raw: i8) -> Self {
        Self(raw)
    }

    /// Raw value.
    pub const fn get(self) -> i8 {
        self.0
    }

    /// Indicator for the next distinct decision.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Default for ChangeIndicator {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// One consistent view of a beam's published state.
///
/// Only constructible as [`silent`](Self::silent) or
/// [`sounding`](Self::sounding), so `frequency == NO_FREQUENCY` iff
/// `!active` holds for every value of this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeamSnapshot {
    active: bool,
    frequency: i16,
    indicator: ChangeIndicator,
}

impl BeamSnapshot {
    /// Power-on state: inactive, initial indicator.
    pub const IDLE: Self = Self::silent(ChangeIndicator::INITIAL);

    /// Inactive beam.
    pub const fn silent(indicator: ChangeIndicator) -> Self {
        Self {
            active: false,
            frequency: NO_FREQUENCY,
            indicator,
        }
    }

    /// Active beam at `hz`. Frequencies above `i16::MAX` saturate.
    pub const fn sounding(hz: u16, indicator: ChangeIndicator) -> Self {
        let frequency = if hz > i16::MAX as u16 {
            i16::MAX
        } else {
            hz as i16
        };
        Self {
            active: true,
            frequency,
            indicator,
        }
    }

    /// Beam obstructed, note should sound.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw frequency field, `NO_FREQUENCY` when inactive.
    #[inline]
    pub const fn frequency(&self) -> i16 {
        self.frequency
    }

    /// Frequency in Hz, `None` when inactive.
    #[inline]
    pub const fn hz(&self) -> Option<u16> {
        if self.active {
            Some(self.frequency as u16)
        } else {
            None
        }
    }

    /// Change indicator published with this state.
    #[inline]
    pub const fn indicator(&self) -> ChangeIndicator {
        self.indicator
    }

    /// Same decision, different indicator.
    #[inline]
    pub const fn with_indicator(self, indicator: ChangeIndicator) -> Self {
        Self { indicator, ..self }
    }

    /// Same output decision (ignores the indicator).
    #[inline]
    pub fn same_output(&self, other: &Self) -> bool {
        self.active == other.active && self.frequency == other.frequency
    }

    /// Pack into the published word.
    pub const fn to_bits(self) -> u32 {
        let mut bits = (self.frequency as u16) as u32;
        bits |= ((self.indicator.0 as u8) as u32) << INDICATOR_SHIFT;
        if self.active {
            bits |= ACTIVE_BIT;
        }
        bits
    }

    /// Unpack a published word.
    ///
    /// A word with the active bit set but a negative frequency decodes as
    /// silent, keeping the sentinel invariant for any input.
    pub const fn from_bits(bits: u32) -> Self {
        let frequency = (bits & FREQ_MASK) as u16 as i16;
        let indicator = ChangeIndicator(((bits >> INDICATOR_SHIFT) & 0xFF) as u8 as i8);
        if bits & ACTIVE_BIT != 0 && frequency >= 0 {
            Self {
                active: true,
                frequency,
                indicator,
            }
        } else {
            Self::silent(indicator)
        }
    }
}

impl Default for BeamSnapshot {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Shared state of one beam.
///
/// # Safety
///
/// No `unsafe`: the word is an `AtomicU32`. The single-writer rule is a
/// convention, not a type-system guarantee: only the beam's own
/// [`BeamUpdater`](crate::updater::BeamUpdater) may call
/// [`publish`](Self::publish).
///
/// # Memory Ordering
///
/// - Producer: `Release` store of the whole word
/// - Consumer: `Acquire` load of the whole word
pub struct BeamState {
    word: AtomicU32,
}

impl BeamState {
    /// Inactive beam with the initial indicator.
    pub const fn new() -> Self {
        Self {
            word: AtomicU32::new(BeamSnapshot::IDLE.to_bits()),
        }
    }

    /// Publish a new state. Producer side only.
    #[inline]
    pub fn publish(&self, snapshot: BeamSnapshot) {
        self.word.store(snapshot.to_bits(), Ordering::Release);
    }

    /// Read all fields in one atomic load.
    #[inline]
    pub fn snapshot(&self) -> BeamSnapshot {
        BeamSnapshot::from_bits(self.word.load(Ordering::Acquire))
    }

    /// Current change indicator.
    #[inline]
    pub fn change_indicator(&self) -> ChangeIndicator {
        self.snapshot().indicator()
    }

    /// Whether the beam is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.snapshot().is_active()
    }

    /// Current frequency field (`NO_FREQUENCY` when inactive).
    #[inline]
    pub fn frequency(&self) -> i16 {
        self.snapshot().frequency()
    }
}

impl Default for BeamState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed set of N beams, one per physical channel.
///
/// `const`-constructible so it can live in a `static` shared between the
/// sampling interrupt and the control loop.
pub struct BeamBank<const N: usize> {
    beams: [BeamState; N],
}

impl<const N: usize> BeamBank<N> {
    /// N inactive beams.
    pub const fn new() -> Self {
        Self {
            beams: [const { BeamState::new() }; N],
        }
    }

    /// Beam `id`, if it exists.
    #[inline]
    pub fn get(&self, id: BeamId) -> Option<&BeamState> {
        self.beams.get(id)
    }

    /// All beams in index order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, BeamState> {
        self.beams.iter()
    }

    /// Number of beams.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// True for a zero-beam bank.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Number of beams currently active.
    pub fn active_count(&self) -> usize {
        self.beams.iter().filter(|b| b.is_active()).count()
    }
}

impl<const N: usize> Default for BeamBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::ops::Index<BeamId> for BeamBank<N> {
    type Output = BeamState;

    fn index(&self, id: BeamId) -> &BeamState {
        &self.beams[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state() {
        let beam = BeamState::new();
        let snap = beam.snapshot();

        assert!(!snap.is_active());
        assert_eq!(snap.frequency(), NO_FREQUENCY);
        assert_eq!(snap.hz(), None);
        assert_eq!(snap.indicator(), ChangeIndicator::INITIAL);
    }

    #[test]
    fn test_publish_roundtrip() {
        let beam = BeamState::new();
        let snap = BeamSnapshot::sounding(440, ChangeIndicator::from_raw(-128));
        beam.publish(snap);

        assert_eq!(beam.snapshot(), snap);
        assert_eq!(beam.frequency(), 440);
        assert!(beam.is_active());
        assert_eq!(beam.change_indicator().get(), -128);
    }

    #[test]
    fn test_sounding_saturates() {
        let snap = BeamSnapshot::sounding(u16::MAX, ChangeIndicator::INITIAL);
        assert_eq!(snap.frequency(), i16::MAX);
        assert_eq!(BeamSnapshot::from_bits(snap.to_bits()), snap);
    }

    #[test]
    fn test_from_bits_keeps_sentinel_invariant() {
        // Active bit with a negative frequency is not a valid state.
        let bits = ACTIVE_BIT | (NO_FREQUENCY as u16 as u32);
        let snap = BeamSnapshot::from_bits(bits);
        assert!(!snap.is_active());
        assert_eq!(snap.frequency(), NO_FREQUENCY);
    }

    #[test]
    fn test_indicator_wraps() {
        let ind = ChangeIndicator::from_raw(i8::MAX);
        assert_eq!(ind.next().get(), i8::MIN);
        assert_eq!(ChangeIndicator::INITIAL.next().get(), 0);
    }

    #[test]
    fn test_bank_indexing() {
        let bank = BeamBank::<7>::new();
        assert_eq!(bank.len(), 7);
        assert!(bank.get(7).is_none());

        bank[3].publish(BeamSnapshot::sounding(262, ChangeIndicator::INITIAL.next()));
        assert_eq!(bank.active_count(), 1);
        assert!(bank.iter().nth(3).unwrap().is_active());
    }
}
