//! Module: notes
//!
//! Purpose: Static note table. Maps (octave, scale degree) to frequency in Hz
//! for a diatonic C major scale.
//!
//! Frequencies are equal-tempered (A4 = 440 Hz) rounded to whole Hz, which is
//! the resolution the tone hardware accepts.
//!
//! Safety: Safe. Pure data, `const` lookups only.

/// Degrees per octave in a diatonic scale (C D E F G A B).
pub const DEGREES: usize = 7;

/// Lowest octave covered by [`NOTE_TABLE`].
pub const FIRST_OCTAVE: u8 = 2;

/// Number of octaves covered by [`NOTE_TABLE`].
pub const OCTAVES: usize = 5;

/// Total number of notes in the table.
pub const NOTE_COUNT: usize = OCTAVES * DEGREES;

/// Scale degree names, index = degree.
pub const DEGREE_NAMES: [&str; DEGREES] = ["C", "D", "E", "F", "G", "A", "B"];

/// C major, octaves 2..=6, ascending.
const FREQUENCIES: [[u16; DEGREES]; OCTAVES] = [
    [65, 73, 82, 87, 98, 110, 123],
    [131, 147, 165, 175, 196, 220, 247],
    [262, 294, 330, 349, 392, 440, 494],
    [523, 587, 659, 698, 784, 880, 988],
    [1047, 1175, 1319, 1397, 1568, 1760, 1976],
];

/// A note in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// Scientific pitch octave (4 = middle C octave).
    pub octave: u8,
    /// Scale degree, 0 = C .. 6 = B.
    pub degree: u8,
    /// Frequency in Hz.
    pub hz: u16,
}

impl Note {
    /// Degree name without octave ("A" for A4).
    pub fn name(&self) -> &'static str {
        DEGREE_NAMES[self.degree as usize]
    }
}

/// Read-only view over the note table.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoteTable;

/// The one note table.
pub static NOTE_TABLE: NoteTable = NoteTable;

impl NoteTable {
    /// Frequency for `(octave, degree)`, or `None` outside the table.
    pub const fn frequency(&self, octave: u8, degree: u8) -> Option<u16> {
        if octave < FIRST_OCTAVE || degree as usize >= DEGREES {
            return None;
        }
        let row = (octave - FIRST_OCTAVE) as usize;
        if row >= OCTAVES {
            return None;
        }
        Some(FREQUENCIES[row][degree as usize])
    }

    /// Note at flat index `i` (0 = lowest C).
    pub fn get(&self, i: usize) -> Option<Note> {
        if i >= NOTE_COUNT {
            return None;
        }
        let row = i / DEGREES;
        let degree = i % DEGREES;
        Some(Note {
            octave: FIRST_OCTAVE + row as u8,
            degree: degree as u8,
            hz: FREQUENCIES[row][degree],
        })
    }

    /// All notes, ascending by frequency.
    pub fn iter(&self) -> impl Iterator<Item = Note> + '_ {
        (0..NOTE_COUNT).filter_map(move |i| self.get(i))
    }

    /// Lowest frequency in the table.
    pub const fn lowest(&self) -> u16 {
        FREQUENCIES[0][0]
    }

    /// Highest frequency in the table.
    pub const fn highest(&self) -> u16 {
        FREQUENCIES[OCTAVES - 1][DEGREES - 1]
    }

    /// Nearest note to `hz`.
    ///
    /// Ties resolve to the lower note. Values outside the table clamp to the
    /// first/last entry.
    pub fn nearest(&self, hz: u16) -> Note {
        // Table is ascending: first note at or above hz, then compare with
        // its lower neighbour.
        let above = (0..NOTE_COUNT)
            .find(|&i| self.hz_at(i) >= hz)
            .unwrap_or(NOTE_COUNT - 1);

        let idx = if above == 0 {
            0
        } else {
            let lower = self.hz_at(above - 1);
            let upper = self.hz_at(above);
            if hz.saturating_sub(lower) <= upper.saturating_sub(hz) {
                above - 1
            } else {
                above
            }
        };

        let row = idx / DEGREES;
        let degree = idx % DEGREES;
        Note {
            octave: FIRST_OCTAVE + row as u8,
            degree: degree as u8,
            hz: FREQUENCIES[row][degree],
        }
    }

    #[inline]
    fn hz_at(&self, i: usize) -> u16 {
        FREQUENCIES[i / DEGREES][i % DEGREES]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ascending() {
        let hz: [u16; NOTE_COUNT] = core::array::from_fn(|i| NOTE_TABLE.get(i).unwrap().hz);
        for pair in hz.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_middle_octave_matches_c_major() {
        assert_eq!(NOTE_TABLE.frequency(4, 0), Some(262));
        assert_eq!(NOTE_TABLE.frequency(4, 5), Some(440));
        assert_eq!(NOTE_TABLE.frequency(4, 6), Some(494));
    }

    #[test]
    fn test_out_of_range_lookup() {
        assert_eq!(NOTE_TABLE.frequency(1, 0), None);
        assert_eq!(NOTE_TABLE.frequency(7, 0), None);
        assert_eq!(NOTE_TABLE.frequency(4, 7), None);
        assert!(NOTE_TABLE.get(NOTE_COUNT).is_none());
    }

    #[test]
    fn test_nearest_tie_goes_low() {
        // Midway between A4 (440) and B4 (494) is 467.
        assert_eq!(NOTE_TABLE.nearest(467).hz, 440);
        assert_eq!(NOTE_TABLE.nearest(468).hz, 494);
    }

    #[test]
    fn test_nearest_clamps() {
        assert_eq!(NOTE_TABLE.nearest(0).hz, NOTE_TABLE.lowest());
        assert_eq!(NOTE_TABLE.nearest(u16::MAX).hz, NOTE_TABLE.highest());
    }
}
