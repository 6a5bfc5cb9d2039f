//! Smoothed reading → note frequency.
//!
//! The sensor chain is calibrated so that one ADC count corresponds to one
//! Hz: an obstruction reading of 440 means "play 440 Hz". How that value is
//! turned into the published frequency depends on the instrument mode.

use crate::error::ConfigError;
use crate::notes::NOTE_TABLE;

/// How a smoothed reading becomes a frequency.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PitchMode {
    /// Snap to the nearest note of the C major table (ties go low).
    #[default]
    Quantized = 0,
    /// Pass the smoothed reading through unchanged.
    Direct = 1,
}

impl PitchMode {
    /// Convert from the raw stored byte.
    pub fn from_u8(value: u8) -> Result<Self, ConfigError> {
        match value {
            0 => Ok(Self::Quantized),
            1 => Ok(Self::Direct),
            _ => Err(ConfigError::UnknownPitchMode),
        }
    }

    /// Frequency in Hz for a smoothed reading.
    #[inline]
    pub fn pitch(self, smoothed: u16) -> u16 {
        match self {
            Self::Quantized => NOTE_TABLE.nearest(smoothed).hz,
            Self::Direct => smoothed,
        }
    }

    /// Lowercase name, as shown in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quantized => "quantized",
            Self::Direct => "direct",
        }
    }
}

impl TryFrom<u8> for PitchMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<PitchMode> for u8 {
    fn from(mode: PitchMode) -> Self {
        mode as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantized_snaps_to_table() {
        assert_eq!(PitchMode::Quantized.pitch(440), 440);
        assert_eq!(PitchMode::Quantized.pitch(452), 440);
        assert_eq!(PitchMode::Quantized.pitch(480), 494);
        assert_eq!(PitchMode::Quantized.pitch(300), 294);
    }

    #[test]
    fn test_direct_passes_through() {
        assert_eq!(PitchMode::Direct.pitch(452), 452);
        assert_eq!(PitchMode::Direct.pitch(0), 0);
    }

    #[test]
    fn test_raw_conversion() {
        assert_eq!(PitchMode::try_from(1), Ok(PitchMode::Direct));
        assert_eq!(u8::from(PitchMode::Quantized), 0);
        assert_eq!(PitchMode::from_u8(9), Err(ConfigError::UnknownPitchMode));
    }
}
