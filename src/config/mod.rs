//! Module: config
//!
//! Purpose: Runtime configuration for the beam pipeline.
//!
//! Architecture:
//! - One `HarpConfig` per instrument, usually the `CONFIG` static
//! - Every field is an atomic; setters validate, store, then bump `generation`
//! - Readers cache a [`HarpSettings`] copy and reload only when the
//!   generation moves (one atomic load per tick in the sampling context)
//!
//! A reader can race a setter and pick up a new field value tagged with the
//! old generation. The following tick sees the new generation and reloads,
//! so the cached copy converges within one tick.
//!
//! Safety: RT-safe. All access via atomics, no locks, no retries.

use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::error::ConfigError;
use crate::pitch::PitchMode;

/// Default ADC resolution (ATmega-class 10-bit converter).
pub const DEFAULT_ADC_BITS: u8 = 10;

/// Default lower bound of the obstructed band.
pub const DEFAULT_BAND_MIN: u16 = 40;

/// Default upper bound of the obstructed band.
pub const DEFAULT_BAND_MAX: u16 = 1000;

/// Readings inside this range (inclusive) mean "hand in the beam".
///
/// Readings outside it are light reaching the sensor unobstructed, or a
/// saturated sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstructedBand {
    pub min: u16,
    pub max: u16,
}

impl ObstructedBand {
    /// Create a band, rejecting `min > max`.
    pub const fn new(min: u16, max: u16) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::EmptyBand);
        }
        Ok(Self { min, max })
    }

    /// Whether `reading` is an obstructed reading.
    #[inline]
    pub const fn contains(&self, reading: u16) -> bool {
        reading >= self.min && reading <= self.max
    }

    const fn to_bits(self) -> u32 {
        ((self.max as u32) << 16) | self.min as u32
    }

    const fn from_bits(bits: u32) -> Self {
        Self {
            min: bits as u16,
            max: (bits >> 16) as u16,
        }
    }
}

impl Default for ObstructedBand {
    fn default() -> Self {
        Self {
            min: DEFAULT_BAND_MIN,
            max: DEFAULT_BAND_MAX,
        }
    }
}

/// Plain copy of the configuration at one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarpSettings {
    pub band: ObstructedBand,
    pub pitch_mode: PitchMode,
    pub adc_bits: u8,
    pub generation: u16,
}

impl HarpSettings {
    /// Full-scale ADC reading.
    #[inline]
    pub const fn adc_max(&self) -> u16 {
        adc_max_for(self.adc_bits)
    }
}

impl Default for HarpSettings {
    fn default() -> Self {
        Self {
            band: ObstructedBand::default(),
            pitch_mode: PitchMode::default(),
            adc_bits: DEFAULT_ADC_BITS,
            generation: 0,
        }
    }
}

/// Lock-free runtime configuration.
pub struct HarpConfig {
    /// Band packed as `max << 16 | min` so both bounds change together.
    band: AtomicU32,
    pitch_mode: AtomicU8,
    adc_bits: AtomicU8,
    /// Incremented after every accepted change.
    generation: AtomicU16,
}

/// Global configuration instance.
pub static CONFIG: HarpConfig = HarpConfig::new();

impl HarpConfig {
    /// Configuration with default values, generation 0.
    pub const fn new() -> Self {
        Self {
            band: AtomicU32::new(
                ObstructedBand {
                    min: DEFAULT_BAND_MIN,
                    max: DEFAULT_BAND_MAX,
                }
                .to_bits(),
            ),
            pitch_mode: AtomicU8::new(PitchMode::Quantized as u8),
            adc_bits: AtomicU8::new(DEFAULT_ADC_BITS),
            generation: AtomicU16::new(0),
        }
    }

    /// Current generation.
    #[inline]
    pub fn generation(&self) -> u16 {
        self.generation.load(Ordering::Acquire)
    }

    /// Copy of all fields, tagged with the generation read first.
    pub fn settings(&self) -> HarpSettings {
        let generation = self.generation();
        HarpSettings {
            band: self.band(),
            // Only validated values are ever stored.
            pitch_mode: PitchMode::from_u8(self.pitch_mode.load(Ordering::Relaxed))
                .unwrap_or_default(),
            adc_bits: self.adc_bits.load(Ordering::Relaxed),
            generation,
        }
    }

    /// Current obstructed band.
    #[inline]
    pub fn band(&self) -> ObstructedBand {
        ObstructedBand::from_bits(self.band.load(Ordering::Relaxed))
    }

    /// Current pitch mode.
    #[inline]
    pub fn pitch_mode(&self) -> PitchMode {
        PitchMode::from_u8(self.pitch_mode.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Full-scale ADC reading for the configured resolution.
    #[inline]
    pub fn adc_max(&self) -> u16 {
        adc_max_for(self.adc_bits.load(Ordering::Relaxed))
    }

    /// Set the obstructed band.
    pub fn set_band(&self, min: u16, max: u16) -> Result<(), ConfigError> {
        let band = ObstructedBand::new(min, max)?;
        if band.max > self.adc_max() {
            return Err(ConfigError::BandExceedsAdc);
        }
        self.band.store(band.to_bits(), Ordering::Relaxed);
        self.bump();
        Ok(())
    }

    /// Set the pitch mode.
    pub fn set_pitch_mode(&self, mode: PitchMode) {
        self.pitch_mode.store(mode as u8, Ordering::Relaxed);
        self.bump();
    }

    /// Set the pitch mode from its raw byte.
    pub fn set_pitch_mode_raw(&self, raw: u8) -> Result<(), ConfigError> {
        let mode = PitchMode::from_u8(raw)?;
        self.set_pitch_mode(mode);
        Ok(())
    }

    /// Set the ADC resolution in bits.
    ///
    /// Rejected if the current band would no longer fit.
    pub fn set_adc_bits(&self, bits: u8) -> Result<(), ConfigError> {
        if bits == 0 || bits > 16 {
            return Err(ConfigError::InvalidResolution);
        }
        if self.band().max > adc_max_for(bits) {
            return Err(ConfigError::BandExceedsAdc);
        }
        self.adc_bits.store(bits, Ordering::Relaxed);
        self.bump();
        Ok(())
    }

    /// Restore defaults (generation keeps counting).
    pub fn reset_defaults(&self) {
        self.adc_bits.store(DEFAULT_ADC_BITS, Ordering::Relaxed);
        self.band
            .store(ObstructedBand::default().to_bits(), Ordering::Relaxed);
        self.pitch_mode
            .store(PitchMode::default() as u8, Ordering::Relaxed);
        self.bump();
    }

    #[inline]
    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }
}

impl Default for HarpConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
const fn adc_max_for(bits: u8) -> u16 {
    if bits >= 16 {
        u16::MAX
    } else {
        (1u16 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarpConfig::new();
        let settings = config.settings();

        assert_eq!(settings, HarpSettings::default());
        assert_eq!(settings.adc_max(), 1023);
        assert!(settings.band.contains(440));
        assert!(!settings.band.contains(1023));
        assert!(!settings.band.contains(0));
    }

    #[test]
    fn test_set_band_bumps_generation() {
        let config = HarpConfig::new();
        config.set_band(100, 900).unwrap();

        assert_eq!(config.generation(), 1);
        assert_eq!(config.band(), ObstructedBand { min: 100, max: 900 });
    }

    #[test]
    fn test_rejected_change_keeps_generation() {
        let config = HarpConfig::new();

        assert_eq!(config.set_band(500, 100), Err(ConfigError::EmptyBand));
        assert_eq!(config.set_band(0, 2000), Err(ConfigError::BandExceedsAdc));
        assert_eq!(config.set_adc_bits(0), Err(ConfigError::InvalidResolution));
        assert_eq!(config.set_adc_bits(8), Err(ConfigError::BandExceedsAdc));
        assert_eq!(config.generation(), 0);
    }

    #[test]
    fn test_wider_adc_allows_wider_band() {
        let config = HarpConfig::new();
        config.set_adc_bits(12).unwrap();
        config.set_band(40, 4000).unwrap();

        assert_eq!(config.adc_max(), 4095);
        assert_eq!(config.generation(), 2);
    }

    #[test]
    fn test_reset_defaults() {
        let config = HarpConfig::new();
        config.set_pitch_mode(PitchMode::Direct);
        config.reset_defaults();

        assert_eq!(config.pitch_mode(), PitchMode::Quantized);
        assert_eq!(config.generation(), 2);
    }
}
