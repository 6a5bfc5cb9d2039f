//! Beam updater: the producer half of the pipeline.
//!
//! Runs once per beam per sampling tick, in the sampling (interrupt) context.
//! Pure logic over two handles: a [`BeamSensor`] to read and a [`BeamState`]
//! to publish into. Fully testable on host.
//!
//! # Tick contract
//!
//! 1. Read one raw sample (clamped to the configured ADC full scale)
//! 2. Push it through the moving average
//! 3. Decide activity: the last `N` raw readings were all inside the
//!    obstructed band, and so is their average
//! 4. Active: frequency = pitch of the smoothed value. Inactive: sentinel
//! 5. If the decision differs from the last one, advance the change
//!    indicator and publish decision + indicator in one store
//!
//! A full window of obstructed readings is needed to activate, so the first
//! note is never computed from the zero-filled start of the window. A single
//! unobstructed reading releases the beam.
//!
//! A stuck sensor reads as a steady value and is not detected here.

use crate::averager::{SampleAverager, SAMPLE_WINDOW};
use crate::beam::{BeamBank, BeamId, BeamSnapshot, BeamState};
use crate::config::{HarpConfig, HarpSettings};
use crate::hal::sensor::BeamSensor;
use crate::logging::LogStream;

/// Producer for one beam.
pub struct BeamUpdater<'a, S, const N: usize = SAMPLE_WINDOW> {
    id: BeamId,
    sensor: S,
    averager: SampleAverager<N>,
    state: &'a BeamState,
    config: &'a HarpConfig,
    settings: HarpSettings,
    /// Consecutive obstructed raw readings, saturating at N.
    obstructed_run: usize,
    /// Last decision written to `state`.
    published: BeamSnapshot,
    ticks: u32,
    log: Option<&'a LogStream>,
}

impl<'a, S: BeamSensor, const N: usize> BeamUpdater<'a, S, N> {
    /// Create the updater for beam `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - Beam index, used in log messages
    /// * `sensor` - This beam's sensor; owned, nobody else reads it
    /// * `state` - This beam's shared record; this updater is its only writer
    /// * `config` - Configuration, reloaded whenever its generation moves
    pub fn new(id: BeamId, sensor: S, state: &'a BeamState, config: &'a HarpConfig) -> Self {
        Self {
            id,
            sensor,
            averager: SampleAverager::new(),
            state,
            config,
            settings: config.settings(),
            obstructed_run: 0,
            published: state.snapshot(),
            ticks: 0,
            log: None,
        }
    }

    /// Log transitions to `log` (normally the sampling-context stream).
    pub fn with_log(mut self, log: &'a LogStream) -> Self {
        self.log = Some(log);
        self
    }

    /// Run one sampling tick. Returns the decision now published.
    ///
    /// # Timing
    ///
    /// O(1): one sensor read, one atomic load, at most one atomic store.
    /// Never blocks, never allocates.
    pub fn tick(&mut self) -> BeamSnapshot {
        self.ticks = self.ticks.wrapping_add(1);
        self.refresh_settings();

        let raw = self.sensor.read().min(self.settings.adc_max());
        let smoothed = self.averager.push(raw);

        let band = self.settings.band;
        self.obstructed_run = if band.contains(raw) {
            (self.obstructed_run + 1).min(N)
        } else {
            0
        };
        let active = self.obstructed_run == N && band.contains(smoothed);

        let indicator = self.published.indicator();
        let decision = if active {
            BeamSnapshot::sounding(self.settings.pitch_mode.pitch(smoothed), indicator)
        } else {
            BeamSnapshot::silent(indicator)
        };

        if !decision.same_output(&self.published) {
            // Indicator goes out in the same store as the decision it
            // describes.
            let next = decision.with_indicator(indicator.next());
            self.log_transition(&next);
            self.state.publish(next);
            self.published = next;
        }

        self.published
    }

    /// Forget all history and publish an inactive beam.
    pub fn reset(&mut self) {
        self.averager.reset();
        self.obstructed_run = 0;
        if self.published.is_active() {
            let next = BeamSnapshot::silent(self.published.indicator().next());
            self.log_transition(&next);
            self.state.publish(next);
            self.published = next;
        }
    }

    /// Beam index.
    #[inline]
    pub fn id(&self) -> BeamId {
        self.id
    }

    /// Last published decision.
    #[inline]
    pub fn published(&self) -> BeamSnapshot {
        self.published
    }

    /// Smoothing state.
    #[inline]
    pub fn averager(&self) -> &SampleAverager<N> {
        &self.averager
    }

    /// Raw sample window, oldest first.
    #[inline]
    pub fn window(&self) -> [u16; N] {
        self.averager.window()
    }

    /// Ticks run so far.
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Settings used by the last tick.
    #[inline]
    pub fn settings(&self) -> &HarpSettings {
        &self.settings
    }

    /// Access the sensor (e.g. to rewind a scripted one).
    #[inline]
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    #[inline]
    fn refresh_settings(&mut self) {
        if self.config.generation() != self.settings.generation {
            self.settings = self.config.settings();
            self.obstructed_run = self.trailing_obstructed();
        }
    }

    /// Most recent stored readings inside the current band, newest first,
    /// ignoring the zero-filled slots of an unprimed window.
    fn trailing_obstructed(&self) -> usize {
        let band = self.settings.band;
        self.averager
            .window()
            .iter()
            .rev()
            .take(self.averager.count())
            .take_while(|&&raw| band.contains(raw))
            .count()
    }

    fn log_transition(&self, next: &BeamSnapshot) {
        let Some(log) = self.log else {
            return;
        };
        match (self.published.hz(), next.hz()) {
            (None, Some(hz)) => crate::rt_info!(log, self.ticks, "beam {} on @ {} Hz", self.id, hz),
            (Some(_), None) => crate::rt_info!(log, self.ticks, "beam {} off", self.id),
            (Some(from), Some(to)) => {
                crate::rt_debug!(log, self.ticks, "beam {} {} -> {} Hz", self.id, from, to)
            }
            (None, None) => {}
        }
    }
}

/// Run one tick for every updater, in order.
///
/// This is the body of the sampling interrupt.
pub fn tick_all<S: BeamSensor, const N: usize>(updaters: &mut [BeamUpdater<'_, S, N>]) {
    for updater in updaters.iter_mut() {
        updater.tick();
    }
}

/// Build one updater per beam of `bank`, sensors produced by `make_sensor`.
pub fn updaters_for<'a, S, F, const B: usize>(
    bank: &'a BeamBank<B>,
    config: &'a HarpConfig,
    mut make_sensor: F,
) -> [BeamUpdater<'a, S, SAMPLE_WINDOW>; B]
where
    S: BeamSensor,
    F: FnMut(BeamId) -> S,
{
    core::array::from_fn(|id| BeamUpdater::new(id, make_sensor(id), &bank[id], config))
}
