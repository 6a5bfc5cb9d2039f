//! Configuration error types

/// Rejected configuration change, with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// E01: Obstructed band lower bound above upper bound
    EmptyBand,
    /// E02: Obstructed band reaches past the ADC's full scale
    BandExceedsAdc,
    /// E03: Raw pitch mode value not recognised
    UnknownPitchMode,
    /// E04: ADC resolution outside 1..=16 bits
    InvalidResolution,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyBand => "E01",
            Self::BandExceedsAdc => "E02",
            Self::UnknownPitchMode => "E03",
            Self::InvalidResolution => "E04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyBand => "band min above band max",
            Self::BandExceedsAdc => "band exceeds ADC range",
            Self::UnknownPitchMode => "unknown pitch mode",
            Self::InvalidResolution => "invalid ADC resolution",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
