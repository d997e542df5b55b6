/*
Chromatic Note Names
====================

The touch surface counts pitch in half-steps above the lowest A of a standard
keyboard (A0 = 27.5 Hz). Note indices therefore start at A rather than C:

    A=0  A#=1  B=2  C=3  C#=4  D=5  D#=6  E=7  F=8  F#=9  G=10  G#=11

An octave number counts whole A-to-A octaves above A0, so "G, octave 2" is
12 * 2 + 10 = 34 half-steps above A0.

Example usage:
  let base = Note::G;
  assert_eq!(base.index(), 10);
  assert_eq!(Note::from_index(14), Note::B); // wraps around the octave
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half-steps per octave in equal temperament.
pub const HALF_STEPS_PER_OCTAVE: i32 = 12;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Note {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    #[default]
    G,
    GSharp,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::A,
        Note::ASharp,
        Note::B,
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
    ];

    /// Chromatic index within the octave, counted from A.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Note for a chromatic index; indices outside `0..12` wrap.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(HALF_STEPS_PER_OCTAVE) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
        }
    }
}
