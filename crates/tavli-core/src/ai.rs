//! Heuristic AI player.
//!
//! The bot is stateless: it enumerates the legal single-step moves, scores
//! each one with a weighted heuristic and plays the best. Ties go to the
//! move enumerated first, so the same position always yields the same move.

use crate::actions::Move;
use crate::board::{Board, Color, BAR, HOME_START, OFF};
use crate::game::GameState;
use crate::rules;
use crate::variant::Variant;
use serde::{Deserialize, Serialize};

/// Heuristic weights.
///
/// Every move first gets the base score of its category (bear-off, hit,
/// point-making or plain), then the bonuses and penalties on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiWeights {
    /// Base score for bearing a checker off
    pub bear_off: i32,
    /// Base score for any move that hits a blot
    pub hit_base: i32,
    /// Base score for landing on a point we already hold
    pub point_base: i32,
    /// Base score for every other move
    pub plain_base: i32,
    /// Hitting a blot with a regular move
    pub hit: i32,
    /// Hitting a blot while entering from the bar
    pub bar_entry_hit: i32,
    /// Landing on a point we already hold
    pub make_point: i32,
    /// Bringing a checker into the home board
    pub advance_home: i32,
    /// Leaving a single checker behind on the origin point
    pub leave_blot: i32,
    /// Plakoto: per opposing checker within six points of a new blot
    pub exposure_per_checker: i32,
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            bear_off: 400,
            hit_base: 300,
            point_base: 200,
            plain_base: 100,
            hit: 50,
            bar_entry_hit: 30,
            make_point: 20,
            advance_home: 15,
            leave_blot: -10,
            exposure_per_checker: -5,
        }
    }
}

impl AiWeights {
    /// Parse weights from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A bot playing one color
#[derive(Debug, Clone)]
pub struct Bot {
    pub player: Color,
    pub weights: AiWeights,
}

impl Bot {
    pub fn new(player: Color) -> Self {
        Self::with_weights(player, AiWeights::default())
    }

    pub fn with_weights(player: Color, weights: AiWeights) -> Self {
        Self { player, weights }
    }

    /// Choose a move with the dice still available in `state`
    pub fn choose_move(&self, state: &GameState, variant: Variant) -> Option<Move> {
        if !state.board.is_well_formed() {
            return None;
        }

        let moves = rules::legal_moves(&state.board, self.player, variant, &state.available_moves);

        let mut best: Option<(Move, i32)> = None;
        for mv in moves {
            let score = self.score_move(&state.board, &mv, variant);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((mv, score));
            }
        }
        best.map(|(mv, _)| mv)
    }

    /// Score one legal move. Moves off the board score `i32::MIN`.
    pub fn score_move(&self, board: &Board, mv: &Move, variant: Variant) -> i32 {
        if mv.from >= OFF || mv.to == BAR || mv.to > OFF {
            return i32::MIN;
        }

        let w = &self.weights;
        let color = self.player;
        let mut score = if mv.is_bear_off() {
            w.bear_off
        } else if board.piece_count_at(mv.to, color.opponent()) == 1 {
            w.hit_base + if mv.is_bar_entry() { w.bar_entry_hit } else { w.hit }
        } else if board.piece_count_at(mv.to, color) >= 1 {
            w.point_base + w.make_point
        } else {
            w.plain_base
        };

        if !mv.is_bear_off() {
            let was_home = !mv.is_bar_entry() && variant.progress_of(color, mv.from) >= HOME_START;
            if !was_home && variant.progress_of(color, mv.to) >= HOME_START {
                score += w.advance_home;
            }

            if variant == Variant::Plakoto && board.piece_count_at(mv.to, color) == 0 {
                score += w.exposure_per_checker * threats(board, mv, color, variant) as i32;
            }
        }

        if !mv.is_bar_entry() && board.piece_count_at(mv.from, color) == 2 {
            score += w.leave_blot;
        }

        score
    }
}

/// Opposing checkers that could reach the destination of `mv` with one die
fn threats(board: &Board, mv: &Move, color: Color, variant: Variant) -> u32 {
    let opponent = color.opponent();
    let target = variant.progress_of(opponent, mv.to);

    let mut count = 0;
    for distance in 1..=6u8 {
        if target > distance {
            let point = variant.point_at(opponent, target - distance);
            count += board.piece_count_at(point, opponent) as u32;
        } else if target == distance {
            count += board.on_bar(opponent) as u32;
        }
    }
    count
}

/// Pick a move for `color`, or `None` when nothing is legal
pub fn make_ai_move(state: &GameState, variant: Variant, color: Color) -> Option<Move> {
    Bot::new(color).choose_move(state, variant)
}
