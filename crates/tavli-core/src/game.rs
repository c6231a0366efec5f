//! Match state machine.
//!
//! This module contains the immutable `GameState` value and the
//! roll/move/turn-advance flow. Every transition returns a new state and
//! leaves the old one untouched, so a host can keep each one as history.

use crate::actions::{GameEvent, Move, MoveKind, MoveRecord};
use crate::ai::Bot;
use crate::board::{Board, Color};
use crate::dice::{Dice, DiceSource};
use crate::rules::{self, IllegalMove};
use crate::variant::Variant;
use crate::win;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Phase of the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    /// The player to act must roll
    Rolling,
    /// Dice are rolled and moves remain
    Moving,
    /// Nothing more to do (the game is over)
    Waiting,
}

/// Errors that can occur when rolling or moving
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Die {0} is not available")]
    DiceNotAvailable(u8),

    #[error("Illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    #[error("Game is over")]
    GameOver,
}

/// Complete state of a match between moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board
    pub board: Board,
    /// Color whose turn it is
    pub current_player: Color,
    /// Phase of the current turn
    pub phase: TurnPhase,
    /// Dice rolled this turn
    pub dice: Option<Dice>,
    /// Die values not yet played this turn
    pub available_moves: Vec<u8>,
    /// Turn number (starts at 1)
    pub turn_number: u32,
    /// Set once somebody has won
    pub winner: Option<Color>,
}

impl GameState {
    /// Fresh match for a variant; white rolls first
    pub fn new(variant: Variant) -> Self {
        Self::with_board(Board::starting(variant), Color::White)
    }

    /// Match resuming from an arbitrary position
    pub fn with_board(board: Board, current_player: Color) -> Self {
        Self {
            board,
            current_player,
            phase: TurnPhase::Rolling,
            dice: None,
            available_moves: Vec::new(),
            turn_number: 1,
            winner: None,
        }
    }

    /// Position with dice already rolled, ready for moves
    pub fn with_dice(board: Board, current_player: Color, dice: Dice) -> Self {
        Self {
            phase: TurnPhase::Moving,
            dice: Some(dice),
            available_moves: dice.moves(),
            ..Self::with_board(board, current_player)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Legal moves for the player to act with the dice still unplayed
    pub fn legal_moves(&self, variant: Variant) -> Vec<Move> {
        if self.phase != TurnPhase::Moving {
            return Vec::new();
        }
        rules::legal_moves(&self.board, self.current_player, variant, &self.available_moves)
    }

    /// Roll the dice for `player`.
    ///
    /// If the roll leaves no legal move the turn is forfeited straight away.
    pub fn roll<S: DiceSource + ?Sized>(
        &self,
        variant: Variant,
        player: Color,
        source: &mut S,
    ) -> Result<(GameState, Vec<GameEvent>), GameError> {
        self.check_can_act(player, TurnPhase::Rolling)?;

        let dice = Dice::roll(source);
        let mut next = self.clone();
        next.dice = Some(dice);
        next.available_moves = dice.moves();
        next.phase = TurnPhase::Moving;

        let mut events = vec![GameEvent::DiceRolled { player, dice }];
        debug!(%player, dice = ?dice.values(), turn = self.turn_number, "dice rolled");

        if next.legal_moves(variant).is_empty() {
            let record = MoveRecord {
                turn: next.turn_number,
                player,
                mv: None,
                kind: MoveKind::Blocked,
            };
            events.push(GameEvent::TurnForfeited {
                record,
                unused: next.available_moves.clone(),
            });
            events.push(next.end_turn());
        }

        Ok((next, events))
    }

    /// Apply one move for `player`.
    pub fn apply_move(
        &self,
        variant: Variant,
        player: Color,
        mv: Move,
    ) -> Result<(GameState, Vec<GameEvent>), GameError> {
        self.check_can_act(player, TurnPhase::Moving)?;
        if !self.available_moves.contains(&mv.die) {
            return Err(GameError::DiceNotAvailable(mv.die));
        }
        rules::check_move(&self.board, &self.available_moves, &mv, player, variant)?;

        let (board, kind) = rules::apply_move(&self.board, &mv, player)?;
        let mut next = self.clone();
        next.board = board;
        if let Some(index) = next.available_moves.iter().position(|&d| d == mv.die) {
            next.available_moves.remove(index);
        }

        let record = MoveRecord {
            turn: self.turn_number,
            player,
            mv: Some(mv),
            kind,
        };
        debug!(%player, %mv, ?kind, "checker moved");
        let mut events = vec![GameEvent::CheckerMoved { record }];

        if let Some(winner) = win::check_win(&next.board, variant) {
            next.winner = Some(winner);
            next.phase = TurnPhase::Waiting;
            next.available_moves.clear();
            info!(%winner, %variant, turn = self.turn_number, "game won");
            events.push(GameEvent::GameWon { player: winner });
            return Ok((next, events));
        }

        // Unplayable leftover dice are forfeited
        if next.legal_moves(variant).is_empty() {
            events.push(next.end_turn());
        }

        Ok((next, events))
    }

    fn check_can_act(&self, player: Color, phase: TurnPhase) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        if self.phase != phase {
            return Err(GameError::InvalidPhase);
        }
        Ok(())
    }

    fn end_turn(&mut self) -> GameEvent {
        let player = self.current_player;
        let next_player = player.opponent();
        self.current_player = next_player;
        self.phase = TurnPhase::Rolling;
        self.dice = None;
        self.available_moves.clear();
        self.turn_number += 1;
        GameEvent::TurnEnded {
            player,
            next_player,
        }
    }
}

/// A match: its variant, current state and full move history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub variant: Variant,
    state: GameState,
    history: Vec<MoveRecord>,
}

impl Match {
    pub fn new(variant: Variant) -> Self {
        Self::with_id(Uuid::new_v4(), variant)
    }

    pub fn with_id(id: Uuid, variant: Variant) -> Self {
        Self {
            id,
            variant,
            state: GameState::new(variant),
            history: Vec::new(),
        }
    }

    /// The most recent state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Every move and forfeited turn so far, oldest first
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Roll for the player to act
    pub fn roll<S: DiceSource + ?Sized>(
        &mut self,
        player: Color,
        source: &mut S,
    ) -> Result<Vec<GameEvent>, GameError> {
        let (next, events) = self.state.roll(self.variant, player, source)?;
        self.commit(next, &events);
        Ok(events)
    }

    /// Play one move
    pub fn play(&mut self, player: Color, mv: Move) -> Result<Vec<GameEvent>, GameError> {
        let (next, events) = self.state.apply_move(self.variant, player, mv)?;
        self.commit(next, &events);
        Ok(events)
    }

    /// The bot's choice for the player to act, if any move is legal
    pub fn ai_move(&self, bot: &Bot) -> Option<Move> {
        let mv = bot.choose_move(&self.state, self.variant);
        debug!(match_id = %self.id, player = %bot.player, ?mv, "bot decision");
        mv
    }

    fn commit(&mut self, next: GameState, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::CheckerMoved { record } | GameEvent::TurnForfeited { record, .. } => {
                    self.history.push(record.clone());
                }
                _ => {}
            }
        }
        self.state = next;
    }
}
