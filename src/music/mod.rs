/*
Note Model
==========

Notes are identified structurally by pitch class + octave. There is no
lifecycle: values are derived on demand from a graph position or a random
pick and compared by their linear key number.

Key Numbering
-------------

The piano keyboard widgets label every white key with a sequential number,
counted from C1 = key 1:

    key_number = (octave - 1) * 12 + semitone + 1

Where semitone: C=0, C#=1, D=2, D#=3, E=4, F=5, F#=6, G=7, G#=8, A=9,
A#=10, B=11. So C4 = key 37 and B8 = key 96.

Display follows the sharp spelling used everywhere in the game ("C#4",
never "Db4").
*/

use std::fmt;
use std::str::FromStr;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The 12 pitch classes, sharp-spelled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// All pitch classes in ascending semitone order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Semitone offset within the octave (C = 0 .. B = 11).
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// Pitch class for a semitone offset; wraps modulo 12.
    pub fn from_semitone(semitone: u8) -> Self {
        Self::ALL[(semitone % 12) as usize]
    }

    /// Black keys are the sharps.
    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As
        )
    }

    /// Display name without the octave ("C", "C#", ...).
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }
}

/// A concrete note: pitch class + octave. Identity is structural.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub class: PitchClass,
    pub octave: i8,
}

impl Note {
    pub fn new(class: PitchClass, octave: i8) -> Self {
        Self { class, octave }
    }

    /// Sequential piano-key number, counted from C1 = 1.
    pub fn key_number(self) -> i32 {
        (self.octave as i32 - 1) * 12 + self.class.semitone() as i32 + 1
    }

    /// Equal-tempered frequency in Hz, tuned to A4 = 440.
    pub fn frequency(self) -> f32 {
        let a4 = Note::new(PitchClass::A, 4).key_number();
        440.0 * 2f32.powf((self.key_number() - a4) as f32 / 12.0)
    }

    /// A uniformly random note within an inclusive octave span.
    pub fn random<R: Rng>(rng: &mut R, octaves: std::ops::RangeInclusive<i8>) -> Self {
        let class = PitchClass::ALL[rng.gen_range(0..12)];
        let octave = rng.gen_range(*octaves.start()..=*octaves.end());
        Self { class, octave }
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key_number().cmp(&other.key_number())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.name(), self.octave)
    }
}

/// Error for unparseable note names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNoteError(pub String);

impl fmt::Display for ParseNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a note name: {:?}", self.0)
    }
}

impl std::error::Error for ParseNoteError {}

impl FromStr for Note {
    type Err = ParseNoteError;

    /// Parses sharp-spelled names like "C4" or "A#3".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, octave) = s.split_at(s.len() - s.chars().rev().take_while(|c| c.is_ascii_digit() || *c == '-').count());
        let class = PitchClass::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ParseNoteError(s.to_string()))?;
        let octave: i8 = octave.parse().map_err(|_| ParseNoteError(s.to_string()))?;
        Ok(Note { class, octave })
    }
}
