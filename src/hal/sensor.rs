//! Beam light sensor input.
//!
//! The ADC driver itself (channel muxing, reference, prescaler) lives outside
//! this crate. The core only needs "give me the current reading".

/// One beam's analog sensor.
///
/// Contract: returns a value in `[0, ADC_MAX]` synchronously and never fails.
/// Clamping to the converter range is the driver's job.
pub trait BeamSensor {
    fn read(&mut self) -> u16;
}

impl<F> BeamSensor for F
where
    F: FnMut() -> u16,
{
    #[inline]
    fn read(&mut self) -> u16 {
        self()
    }
}

/// Sensor that replays a fixed sequence of readings.
///
/// Holds the last reading once the script runs out (a hand that stays put).
/// Used by the host simulator and by tests.
#[derive(Clone, Debug)]
pub struct ScriptedSensor<'a> {
    script: &'a [u16],
    pos: usize,
    idle: u16,
}

impl<'a> ScriptedSensor<'a> {
    /// Replay `script`; an empty script reads `0`.
    pub const fn new(script: &'a [u16]) -> Self {
        Self {
            script,
            pos: 0,
            idle: 0,
        }
    }

    /// Reading returned for an empty script.
    pub const fn with_idle(mut self, idle: u16) -> Self {
        self.idle = idle;
        self
    }

    /// Readings consumed so far (saturates at the script length).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every scripted reading has been returned.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.script.len()
    }

    /// Start the script over.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

impl BeamSensor for ScriptedSensor<'_> {
    fn read(&mut self) -> u16 {
        match self.script.get(self.pos) {
            Some(&value) => {
                self.pos += 1;
                value
            }
            None => self.script.last().copied().unwrap_or(self.idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_sensor_holds_last() {
        let mut sensor = ScriptedSensor::new(&[1, 2, 3]);
        assert_eq!(sensor.read(), 1);
        assert_eq!(sensor.read(), 2);
        assert_eq!(sensor.read(), 3);
        assert!(sensor.is_exhausted());
        assert_eq!(sensor.read(), 3);
    }

    #[test]
    fn test_rewind_restarts_script() {
        let mut sensor = ScriptedSensor::new(&[7, 8]);
        sensor.read();
        assert_eq!(sensor.position(), 1);

        sensor.rewind();
        assert_eq!(sensor.position(), 0);
        assert_eq!(sensor.read(), 7);
    }

    #[test]
    fn test_empty_script_reads_idle() {
        let mut sensor = ScriptedSensor::new(&[]).with_idle(1023);
        assert_eq!(sensor.read(), 1023);
    }

    #[test]
    fn test_closure_sensor() {
        let mut n = 0u16;
        let mut sensor = || {
            n += 10;
            n
        };
        assert_eq!(BeamSensor::read(&mut sensor), 10);
        assert_eq!(BeamSensor::read(&mut sensor), 20);
    }
}
