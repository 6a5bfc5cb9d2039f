//! Moving-average smoothing of raw ADC readings.
//!
//! A short window damps single-sample spikes while adding at most `N` ticks
//! of latency. The window starts zero-filled, so the first `N - 1` averages
//! are pulled toward zero; callers that care use [`SampleAverager::is_primed`].

/// Default smoothing window: 4 samples.
pub const SAMPLE_WINDOW: usize = 4;

/// Fixed-size moving average over the last `N` readings.
///
/// Ring-buffer storage, oldest sample evicted on every push. Integer mean,
/// truncated toward zero.
#[derive(Clone, Debug)]
pub struct SampleAverager<const N: usize = SAMPLE_WINDOW> {
    /// Ring of readings. `head` is the slot the next push overwrites
    /// (i.e. the oldest reading).
    slots: [u16; N],
    head: usize,
    /// Running sum of `slots`.
    sum: u32,
    /// Pushes since creation/reset, saturating at N.
    filled: usize,
}

impl<const N: usize> SampleAverager<N> {
    /// Create an averager with a zero-filled window.
    pub const fn new() -> Self {
        assert!(N > 0, "Averaging window must not be empty");

        Self {
            slots: [0; N],
            head: 0,
            sum: 0,
            filled: 0,
        }
    }

    /// Push a reading and return the new average.
    #[inline]
    pub fn push(&mut self, sample: u16) -> u16 {
        let evicted = self.slots[self.head];
        self.slots[self.head] = sample;
        self.head = (self.head + 1) % N;
        self.sum = self.sum - evicted as u32 + sample as u32;
        if self.filled < N {
            self.filled += 1;
        }
        self.average()
    }

    /// Current average without pushing.
    #[inline]
    pub fn average(&self) -> u16 {
        (self.sum / N as u32) as u16
    }

    /// True once N readings have been pushed since creation/reset.
    #[inline]
    pub fn is_primed(&self) -> bool {
        self.filled == N
    }

    /// Readings pushed since creation/reset, saturating at N.
    #[inline]
    pub fn count(&self) -> usize {
        self.filled
    }

    /// Window contents, oldest first.
    pub fn window(&self) -> [u16; N] {
        core::array::from_fn(|i| self.slots[(self.head + i) % N])
    }

    /// Most recent reading (0 before the first push).
    #[inline]
    pub fn latest(&self) -> u16 {
        self.slots[(self.head + N - 1) % N]
    }

    /// Window length.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Back to the zero-filled initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for SampleAverager<N> {
    fn default() -> Self {
        Self::new()
    }
}
