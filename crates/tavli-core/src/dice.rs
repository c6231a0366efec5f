//! Dice rolls and randomness sources.
//!
//! The rules engine never rolls on its own. Anything that needs fresh dice
//! takes a [`DiceSource`], so tests and replays can script every roll.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors produced when building dice from untrusted values
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DiceError {
    #[error("Die value {0} is outside 1-6")]
    OutOfRange(u8),

    #[error("A roll needs one or two dice, got {0}")]
    WrongCount(usize),
}

/// A roll of one or two dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    first: u8,
    second: Option<u8>,
}

impl Dice {
    /// Create a standard two-dice roll
    pub fn new(first: u8, second: u8) -> Result<Self, DiceError> {
        Ok(Self {
            first: check_face(first)?,
            second: Some(check_face(second)?),
        })
    }

    /// Create a single-die roll (used when only one value is left to play)
    pub fn single(value: u8) -> Result<Self, DiceError> {
        Ok(Self {
            first: check_face(value)?,
            second: None,
        })
    }

    /// Build dice from a slice of one or two values
    pub fn from_values(values: &[u8]) -> Result<Self, DiceError> {
        match values {
            [a] => Self::single(*a),
            [a, b] => Self::new(*a, *b),
            other => Err(DiceError::WrongCount(other.len())),
        }
    }

    /// Roll two dice from a source
    pub fn roll<S: DiceSource + ?Sized>(source: &mut S) -> Self {
        let first = source.roll_die().clamp(1, 6);
        let second = source.roll_die().clamp(1, 6);
        Self {
            first,
            second: Some(second),
        }
    }

    /// The raw face values
    pub fn values(&self) -> Vec<u8> {
        let mut values = vec![self.first];
        values.extend(self.second);
        values
    }

    /// Whether both dice show the same face
    pub fn is_double(&self) -> bool {
        self.second == Some(self.first)
    }

    /// Move distances this roll grants; a double is played four times
    pub fn moves(&self) -> Vec<u8> {
        if self.is_double() {
            vec![self.first; 4]
        } else {
            self.values()
        }
    }

    /// Sum of all move distances
    pub fn pips(&self) -> u32 {
        self.moves().iter().map(|&d| d as u32).sum()
    }
}

fn check_face(value: u8) -> Result<u8, DiceError> {
    if (1..=6).contains(&value) {
        Ok(value)
    } else {
        Err(DiceError::OutOfRange(value))
    }
}

/// Provider of uniformly distributed die faces in 1..=6
pub trait DiceSource {
    fn roll_die(&mut self) -> u8;
}

/// Dice backed by a random number generator
pub struct RngDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<StdRng> {
    /// Entropy-seeded dice
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible dice for replays
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceSource for RngDice<R> {
    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Scripted dice: hands out the given faces in order, then repeats the last
/// one (or 1 if the script was empty).
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    faces: VecDeque<u8>,
    last: u8,
}

impl FixedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            last: 1,
        }
    }
}

impl DiceSource for FixedDice {
    fn roll_die(&mut self) -> u8 {
        if let Some(face) = self.faces.pop_front() {
            self.last = face;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_expands_to_four_moves() {
        let dice = Dice::new(5, 5).unwrap();
        assert!(dice.is_double());
        assert_eq!(dice.moves(), vec![5, 5, 5, 5]);
        assert_eq!(dice.pips(), 20);
    }

    #[test]
    fn test_plain_roll_keeps_both_values() {
        let dice = Dice::new(3, 4).unwrap();
        assert!(!dice.is_double());
        assert_eq!(dice.moves(), vec![3, 4]);
    }

    #[test]
    fn test_out_of_range_faces_rejected() {
        assert_eq!(Dice::new(0, 3), Err(DiceError::OutOfRange(0)));
        assert_eq!(Dice::new(2, 7), Err(DiceError::OutOfRange(7)));
        assert_eq!(
            Dice::from_values(&[1, 2, 3]),
            Err(DiceError::WrongCount(3))
        );
    }

    #[test]
    fn test_fixed_dice_follow_script() {
        let mut source = FixedDice::new([6, 2, 4]);
        assert_eq!(Dice::roll(&mut source).values(), vec![6, 2]);
        assert_eq!(Dice::roll(&mut source).values(), vec![4, 4]);
    }

    #[test]
    fn test_seeded_dice_are_reproducible() {
        let mut a = RngDice::with_seed(42);
        let mut b = RngDice::with_seed(42);
        for _ in 0..50 {
            let face = a.roll_die();
            assert!((1..=6).contains(&face));
            assert_eq!(face, b.roll_die());
        }
    }
}
