//! Tavli - rules engine for Greek backgammon
//!
//! This crate provides the game logic for the three Tavli variants
//! (Portes, Plakoto and Fevga), including:
//! - Board representation with the bar and the off-board tray
//! - Move legality checks and legal move enumeration
//! - Win detection, including Plakoto's mother point win
//! - A heuristic AI opponent
//! - An immutable match state machine (roll, move, pass)
//!
//! # Architecture
//!
//! The rules are pure functions over plain values: no I/O, no hidden
//! randomness. Dice come from an injected [`DiceSource`]. The engine can be
//! compiled to:
//! - Native Rust for server-side match hosting
//! - WebAssembly for a browser client (`wasm` feature)
//!
//! # Modules
//!
//! - [`board`]: Points, colors and the 26-entry board
//! - [`variant`]: Variant geometry and the per-variant [`Rules`]
//! - [`rules`]: Legality checks, enumeration and move application
//! - [`win`]: Win conditions
//! - [`ai`]: Heuristic bot
//! - [`game`]: Match state machine

pub mod actions;
pub mod ai;
pub mod board;
pub mod dice;
pub mod game;
pub mod rules;
pub mod variant;
#[cfg(feature = "wasm")]
pub mod wasm;
pub mod win;

// Re-export commonly used types
pub use actions::{GameEvent, Move, MoveKind, MoveRecord};
pub use ai::{make_ai_move, AiWeights, Bot};
pub use board::{Board, BoardError, BoardPoint, Color, Point, BAR, OFF};
pub use dice::{Dice, DiceError, DiceSource, FixedDice, RngDice};
pub use game::{GameError, GameState, Match, TurnPhase};
pub use rules::{
    apply_move, calculate_available_moves, check_move, legal_moves, validate_move, IllegalMove,
};
pub use variant::{Rules, Variant};
pub use win::check_win;

/// Winner of the match in `state`, if any
pub fn check_win_condition(state: &GameState, variant: Variant) -> Option<Color> {
    check_win(&state.board, variant)
}
