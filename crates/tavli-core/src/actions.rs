//! Moves and the events that result from them.
//!
//! This module defines the single-step move a player submits, the tag that
//! classifies an applied move, and the events a match emits.

use crate::board::{Color, Point, BAR, OFF};
use crate::dice::Dice;
use serde::{Deserialize, Serialize};

/// One checker moved by one die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Source point (0 when entering from the bar)
    pub from: Point,
    /// Destination point (25 when bearing off)
    pub to: Point,
    /// Die value consumed
    pub die: u8,
}

impl Move {
    pub fn new(from: Point, to: Point, die: u8) -> Self {
        Self { from, to, die }
    }

    pub fn is_bar_entry(&self) -> bool {
        self.from == BAR
    }

    pub fn is_bear_off(&self) -> bool {
        self.to == OFF
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let from = if self.is_bar_entry() {
            "bar".to_string()
        } else {
            self.from.to_string()
        };
        let to = if self.is_bear_off() {
            "off".to_string()
        } else {
            self.to.to_string()
        };
        write!(f, "{}/{} ({})", from, to, self.die)
    }
}

/// How an applied move changed the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Plain move between playing points
    Move,
    /// Checker left the board for good
    BearOff,
    /// Checker re-entered from the bar
    EnterFromBar,
    /// Lone opposing checker was hit and sent to the bar
    Nail,
    /// No legal move existed; the turn was forfeited
    Blocked,
}

/// One row of a match's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub turn: u32,
    pub player: Color,
    /// `None` for a forfeited turn
    pub mv: Option<Move>,
    pub kind: MoveKind,
}

/// Events that occur as a result of rolling or moving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled
    DiceRolled { player: Color, dice: Dice },

    /// A checker was moved
    CheckerMoved { record: MoveRecord },

    /// The roll left no legal move
    TurnForfeited { record: MoveRecord, unused: Vec<u8> },

    /// Turn passed to the other side
    TurnEnded { player: Color, next_player: Color },

    /// A player won the game
    GameWon { player: Color },
}
