//! The three Tavli variants and their rule sets.
//!
//! Every variant moves checkers along a 24-step path. A checker's *progress*
//! counts the steps it has travelled: entering from the bar with a die of `d`
//! lands on progress `d`, the home board is progress 19-24, and anything past
//! 24 is borne off. [`Variant::point_at`] maps progress to board points:
//!
//! | Variant        | White path | Black path            |
//! |----------------|------------|-----------------------|
//! | Portes/Plakoto | 1 -> 24    | 24 -> 1               |
//! | Fevga          | 24 -> 1    | 12 -> 1, then 24 -> 13 |
//!
//! Rule differences live behind the [`Rules`] trait. A match picks its
//! implementation once through [`Variant::rules`].

use crate::board::{Board, Color, Point};
use crate::win;
use serde::{Deserialize, Serialize};

/// Length of a checker's path around the board
pub const PATH_LENGTH: u8 = 24;

/// A Fevga prime of this many consecutive points is forbidden
pub const FEVGA_PRIME: u8 = 6;

/// Which game of Tavli is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Portes,
    Plakoto,
    Fevga,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Portes, Variant::Plakoto, Variant::Fevga];

    /// The rule set for this variant
    pub fn rules(&self) -> &'static dyn Rules {
        match self {
            Variant::Portes => &Portes,
            Variant::Plakoto => &Plakoto,
            Variant::Fevga => &Fevga,
        }
    }

    /// Starting `(progress, count)` stacks, identical for both colors
    pub fn starting_layout(&self) -> &'static [(u8, u8)] {
        match self {
            Variant::Portes => &[(1, 2), (12, 5), (17, 3), (19, 5)],
            Variant::Plakoto | Variant::Fevga => &[(1, 15)],
        }
    }

    /// Board point `color` stands on after `progress` steps (1-24)
    pub fn point_at(&self, color: Color, progress: u8) -> Point {
        match (self, color) {
            (Variant::Portes | Variant::Plakoto, Color::White) => progress,
            (Variant::Portes | Variant::Plakoto, Color::Black) | (Variant::Fevga, Color::White) => {
                PATH_LENGTH + 1 - progress
            }
            (Variant::Fevga, Color::Black) => (PATH_LENGTH * 2 - 12 - progress) % PATH_LENGTH + 1,
        }
    }

    /// Steps `color` has travelled when standing on playing point `point`
    pub fn progress_of(&self, color: Color, point: Point) -> u8 {
        match (self, color) {
            (Variant::Portes | Variant::Plakoto, Color::White) => point,
            (Variant::Portes | Variant::Plakoto, Color::Black) | (Variant::Fevga, Color::White) => {
                PATH_LENGTH + 1 - point
            }
            (Variant::Fevga, Color::Black) => (PATH_LENGTH + 12 - point) % PATH_LENGTH + 1,
        }
    }

    /// A color's starting point, which Plakoto calls its mother point
    pub fn mother_point(&self, color: Color) -> Point {
        self.point_at(color, 1)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Portes => write!(f, "portes"),
            Variant::Plakoto => write!(f, "plakoto"),
            Variant::Fevga => write!(f, "fevga"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portes" => Ok(Variant::Portes),
            "plakoto" => Ok(Variant::Plakoto),
            "fevga" => Ok(Variant::Fevga),
            other => Err(format!("unknown variant: {}", other)),
        }
    }
}

/// Variant-specific rules
pub trait Rules: Send + Sync {
    fn variant(&self) -> Variant;

    /// Whether `color` may land on playing point `point`
    fn is_legal_destination(&self, board: &Board, point: Point, color: Color) -> bool {
        !board.is_blocked(point, color, self.variant())
    }

    /// Whether the board left behind by a `color` move is acceptable
    fn permits_result(&self, _after: &Board, _color: Color) -> bool {
        true
    }

    /// The winner on this board, if any
    fn check_win(&self, board: &Board) -> Option<Color> {
        win::standard_winner(board)
    }
}

/// Hitting game: a lone checker can be hit and sent to the bar
pub struct Portes;

/// Pinning game: checkers never share a point with the opponent
pub struct Plakoto;

/// Running game: both sides travel the same way and may not build primes
pub struct Fevga;

impl Rules for Portes {
    fn variant(&self) -> Variant {
        Variant::Portes
    }
}

impl Rules for Plakoto {
    fn variant(&self) -> Variant {
        Variant::Plakoto
    }

    fn check_win(&self, board: &Board) -> Option<Color> {
        win::standard_winner(board).or_else(|| win::mother_point_winner(board, Variant::Plakoto))
    }
}

impl Rules for Fevga {
    fn variant(&self) -> Variant {
        Variant::Fevga
    }

    fn permits_result(&self, after: &Board, color: Color) -> bool {
        after.longest_run(color) < FEVGA_PRIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for variant in Variant::ALL {
            for color in Color::ALL {
                let mut seen = std::collections::HashSet::new();
                for progress in 1..=PATH_LENGTH {
                    let point = variant.point_at(color, progress);
                    assert!((1..=24).contains(&point), "{variant} {color} {progress}");
                    assert_eq!(variant.progress_of(color, point), progress);
                    seen.insert(point);
                }
                assert_eq!(seen.len(), 24);
            }
        }
    }

    #[test]
    fn test_fevga_black_wraps_around() {
        let v = Variant::Fevga;
        assert_eq!(v.point_at(Color::Black, 1), 12);
        assert_eq!(v.point_at(Color::Black, 12), 1);
        assert_eq!(v.point_at(Color::Black, 13), 24);
        assert_eq!(v.point_at(Color::Black, 24), 13);
    }

    #[test]
    fn test_mother_points() {
        assert_eq!(Variant::Plakoto.mother_point(Color::White), 1);
        assert_eq!(Variant::Plakoto.mother_point(Color::Black), 24);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Plakoto".parse::<Variant>(), Ok(Variant::Plakoto));
        assert_eq!(" fevga ".parse::<Variant>(), Ok(Variant::Fevga));
        assert!("narde".parse::<Variant>().is_err());
    }

    #[test]
    fn test_rules_dispatch_matches_variant() {
        for variant in Variant::ALL {
            assert_eq!(variant.rules().variant(), variant);
        }
    }

    #[test]
    fn test_fevga_allows_single_hit_only() {
        let board = Board::from_layout(&[(10, Color::Black, 1), (11, Color::Black, 2)]);
        let rules = Variant::Fevga.rules();
        assert!(rules.is_legal_destination(&board, 10, Color::White));
        assert!(!rules.is_legal_destination(&board, 11, Color::White));
        assert!(rules.is_legal_destination(&board, 12, Color::White));
    }
}
