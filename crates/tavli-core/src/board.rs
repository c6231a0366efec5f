//! Board representation: 24 playing points, the bar and the off-board tray.
//!
//! This module contains:
//! - Point numbering and checker colors
//! - The 26-entry board and its occupancy queries
//! - Structural validation for boards received from untrusted callers
//! - The copy-then-mutate move helper used by every board transition

use crate::actions::Move;
use crate::variant::Variant;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board point index (0 = bar, 1-24 = playing points, 25 = off)
pub type Point = u8;

/// Captured checkers wait here to re-enter
pub const BAR: Point = 0;

/// Borne-off checkers are collected here
pub const OFF: Point = 25;

/// Number of entries in a board (bar, 24 points, off)
pub const BOARD_SIZE: usize = 26;

/// Checkers each side starts with
pub const CHECKERS_PER_SIDE: u32 = 15;

/// Progress along a path at which a checker reaches its home board
pub const HOME_START: u8 = 19;

/// Checker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors, white first
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other side
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Structural problems with a board
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Board has {0} points, expected 26")]
    WrongLength(usize),

    #[error("Entry {index} is labelled as point {point}")]
    Misnumbered { index: usize, point: Point },

    #[error("Point {0} holds checkers of both colors")]
    MixedOccupancy(Point),

    #[error("Point {point} holds {count} {color} checkers, more than 15")]
    Overfull { point: Point, color: Color, count: u8 },

    #[error("{color} has {count} checkers, expected 15")]
    CheckerCount { color: Color, count: u32 },

    #[error("Point {0} is not on the board")]
    OutOfRange(Point),

    #[error("No {color} checker on point {point}")]
    EmptySource { point: Point, color: Color },
}

/// Contents of one board entry.
///
/// Playing points hold at most one color. The bar and the off tray are
/// shared, so both counts may be non-zero there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardPoint {
    pub point: Point,
    pub white: u8,
    pub black: u8,
}

impl BoardPoint {
    pub fn empty(point: Point) -> Self {
        Self {
            point,
            white: 0,
            black: 0,
        }
    }

    /// Checkers of `color` on this entry
    pub fn count(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn count_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// The single color occupying this entry, if exactly one is present
    pub fn color(&self) -> Option<Color> {
        match (self.white, self.black) {
            (0, 0) => None,
            (_, 0) => Some(Color::White),
            (0, _) => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.white == 0 && self.black == 0
    }
}

/// The full board, indexed by point number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    points: Vec<BoardPoint>,
}

impl Board {
    /// A board with no checkers on it
    pub fn empty() -> Self {
        Self {
            points: (0..BOARD_SIZE as Point).map(BoardPoint::empty).collect(),
        }
    }

    /// Wrap raw entries without validation (see [`Board::validate`])
    pub fn from_points(points: Vec<BoardPoint>) -> Self {
        Self { points }
    }

    /// Build a board from `(point, color, count)` placements.
    ///
    /// Placements outside 0-25 are ignored.
    pub fn from_layout(layout: &[(Point, Color, u8)]) -> Self {
        let mut board = Self::empty();
        for &(point, color, count) in layout {
            if let Some(entry) = board.points.get_mut(point as usize) {
                let slot = entry.count_mut(color);
                *slot = slot.saturating_add(count);
            }
        }
        board
    }

    /// The starting position for a variant
    pub fn starting(variant: Variant) -> Self {
        let mut board = Self::empty();
        for color in Color::ALL {
            for &(progress, count) in variant.starting_layout() {
                let point = variant.point_at(color, progress);
                *board.points[point as usize].count_mut(color) += count;
            }
        }
        board
    }

    /// All 26 entries
    pub fn points(&self) -> &[BoardPoint] {
        &self.points
    }

    /// Entry for a point, if it exists
    pub fn get(&self, point: Point) -> Option<&BoardPoint> {
        self.points.get(point as usize)
    }

    /// Number of `color` checkers on `point` (0 for unknown points)
    pub fn piece_count_at(&self, point: Point, color: Color) -> u8 {
        self.get(point).map(|p| p.count(color)).unwrap_or(0)
    }

    /// Whether the opposing side has checkers on `point`
    pub fn is_occupied_by_opponent(&self, point: Point, color: Color) -> bool {
        self.piece_count_at(point, color.opponent()) > 0
    }

    /// Whether `color` is barred from landing on `point`.
    ///
    /// Two or more opposing checkers always block; in Plakoto a single one
    /// is enough.
    pub fn is_blocked(&self, point: Point, color: Color, variant: Variant) -> bool {
        let opposing = self.piece_count_at(point, color.opponent());
        match variant {
            Variant::Plakoto => opposing >= 1,
            Variant::Portes | Variant::Fevga => opposing >= 2,
        }
    }

    /// Whether every `color` checker on the playing points is in its home board
    pub fn all_in_home_board(&self, color: Color, variant: Variant) -> bool {
        self.playing_points(color)
            .all(|point| variant.progress_of(color, point) >= HOME_START)
    }

    /// Playing points (1-24) holding at least one `color` checker, ascending
    pub fn playing_points(&self, color: Color) -> impl Iterator<Item = Point> + '_ {
        (1..OFF).filter(move |&p| self.piece_count_at(p, color) > 0)
    }

    /// Progress of the `color` checker furthest from home, if any are in play
    pub fn furthest_progress(&self, color: Color, variant: Variant) -> Option<u8> {
        self.playing_points(color)
            .map(|point| variant.progress_of(color, point))
            .min()
    }

    /// Checkers of `color` waiting on the bar
    pub fn on_bar(&self, color: Color) -> u8 {
        self.piece_count_at(BAR, color)
    }

    /// Checkers of `color` already borne off
    pub fn borne_off(&self, color: Color) -> u8 {
        self.piece_count_at(OFF, color)
    }

    /// Total `color` checkers on every entry including bar and off
    pub fn checker_count(&self, color: Color) -> u32 {
        self.points.iter().map(|p| p.count(color) as u32).sum()
    }

    /// `color` checkers still in the game (bar and playing points)
    pub fn checkers_in_play(&self, color: Color) -> u32 {
        self.checker_count(color) - self.borne_off(color) as u32
    }

    /// Longest run of consecutive playing points held by `color`
    pub fn longest_run(&self, color: Color) -> u8 {
        let mut longest = 0;
        let mut run = 0;
        for point in 1..OFF {
            if self.piece_count_at(point, color) > 0 {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        longest
    }

    /// Shape checks: 26 entries, numbered in order, no mixed playing points
    /// and no entry holding more than a full side
    pub fn is_well_formed(&self) -> bool {
        self.check_shape().is_ok()
    }

    fn check_shape(&self) -> Result<(), BoardError> {
        if self.points.len() != BOARD_SIZE {
            return Err(BoardError::WrongLength(self.points.len()));
        }
        for (index, entry) in self.points.iter().enumerate() {
            if entry.point as usize != index {
                return Err(BoardError::Misnumbered {
                    index,
                    point: entry.point,
                });
            }
            if entry.point != BAR && entry.point != OFF && entry.white > 0 && entry.black > 0 {
                return Err(BoardError::MixedOccupancy(entry.point));
            }
            for color in Color::ALL {
                let count = entry.count(color);
                if count as u32 > CHECKERS_PER_SIDE {
                    return Err(BoardError::Overfull {
                        point: entry.point,
                        color,
                        count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Full validation for a board in a live match, including conservation
    pub fn validate(&self) -> Result<(), BoardError> {
        self.check_shape()?;
        for color in Color::ALL {
            let count = self.checker_count(color);
            if count != CHECKERS_PER_SIDE {
                return Err(BoardError::CheckerCount { color, count });
            }
        }
        Ok(())
    }

    /// Copy the board and play `mv` for `color` on the copy.
    ///
    /// Legality is not checked here beyond the source holding a checker. A
    /// lone opposing checker on the destination is sent to the bar.
    pub fn apply_hypothetical(&self, mv: &Move, color: Color) -> Result<Board, BoardError> {
        self.check_shape()?;
        if mv.to as usize >= BOARD_SIZE {
            return Err(BoardError::OutOfRange(mv.to));
        }
        if self.piece_count_at(mv.from, color) == 0 {
            return Err(BoardError::EmptySource {
                point: mv.from,
                color,
            });
        }

        let mut next = self.clone();
        *next.points[mv.from as usize].count_mut(color) -= 1;

        if mv.to != OFF && next.piece_count_at(mv.to, color.opponent()) == 1 {
            *next.points[mv.to as usize].count_mut(color.opponent()) = 0;
            next.add_checker(BAR, color.opponent())?;
        }
        next.add_checker(mv.to, color)?;

        Ok(next)
    }

    fn add_checker(&mut self, point: Point, color: Color) -> Result<(), BoardError> {
        let slot = self.points[point as usize].count_mut(color);
        *slot = slot.checked_add(1).ok_or(BoardError::Overfull {
            point,
            color,
            count: u8::MAX,
        })?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
