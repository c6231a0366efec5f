//! Move legality, legal move enumeration and move application.
//!
//! The checks here are fail-closed: malformed input yields an
//! [`IllegalMove`] (or `false`/an empty list through the convenience
//! wrappers), never a panic.

use crate::actions::{Move, MoveKind};
use crate::board::{Board, BoardError, Color, Point, BAR, BOARD_SIZE, OFF};
use crate::game::GameState;
use crate::variant::{Variant, PATH_LENGTH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a move was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    #[error("Board is malformed")]
    CorruptBoard,

    #[error("Die {0} is not available")]
    DieNotAvailable(u8),

    #[error("Point {0} is not on the board")]
    PointOutOfRange(Point),

    #[error("No checker of yours on point {0}")]
    EmptySource(Point),

    #[error("Checkers on the bar must enter first")]
    MustEnterFromBar,

    #[error("Die {die} from {from} lands on {expected}, not {requested}")]
    WrongDestination {
        from: Point,
        die: u8,
        expected: Point,
        requested: Point,
    },

    #[error("Point {0} is blocked")]
    Blocked(Point),

    #[error("Cannot bear off until every checker is home")]
    NotAllHome,

    #[error("Cannot bear off with a higher die while checkers sit further back")]
    NotFurthestChecker,

    #[error("Move would build a forbidden prime")]
    CreatesPrime,
}

/// Check one move for `color` against the dice still available.
pub fn check_move(
    board: &Board,
    available: &[u8],
    mv: &Move,
    color: Color,
    variant: Variant,
) -> Result<(), IllegalMove> {
    if !board.is_well_formed() {
        return Err(IllegalMove::CorruptBoard);
    }
    if !(1..=6).contains(&mv.die) || !available.contains(&mv.die) {
        return Err(IllegalMove::DieNotAvailable(mv.die));
    }
    for point in [mv.from, mv.to] {
        if point as usize >= BOARD_SIZE {
            return Err(IllegalMove::PointOutOfRange(point));
        }
    }
    if mv.from == OFF || board.piece_count_at(mv.from, color) == 0 {
        return Err(IllegalMove::EmptySource(mv.from));
    }
    if board.on_bar(color) > 0 && mv.from != BAR {
        return Err(IllegalMove::MustEnterFromBar);
    }

    let expected = destination(board, mv.from, mv.die, color, variant)?;
    if expected != mv.to {
        return Err(IllegalMove::WrongDestination {
            from: mv.from,
            die: mv.die,
            expected,
            requested: mv.to,
        });
    }

    let rules = variant.rules();
    if mv.to != OFF && !rules.is_legal_destination(board, mv.to, color) {
        return Err(IllegalMove::Blocked(mv.to));
    }

    let after = board
        .apply_hypothetical(mv, color)
        .map_err(|_| IllegalMove::CorruptBoard)?;
    if !rules.permits_result(&after, color) {
        return Err(IllegalMove::CreatesPrime);
    }

    Ok(())
}

/// Where a checker of `color` on `from` lands with `die`, including the
/// bear-off eligibility checks.
fn destination(
    board: &Board,
    from: Point,
    die: u8,
    color: Color,
    variant: Variant,
) -> Result<Point, IllegalMove> {
    if from == BAR {
        return Ok(variant.point_at(color, die));
    }

    let progress = variant.progress_of(color, from);
    let target = progress + die;
    if target <= PATH_LENGTH {
        return Ok(variant.point_at(color, target));
    }

    if !board.all_in_home_board(color, variant) {
        return Err(IllegalMove::NotAllHome);
    }
    // Over-bearing is only allowed from the rearmost checker
    if target > PATH_LENGTH + 1 && board.furthest_progress(color, variant) != Some(progress) {
        return Err(IllegalMove::NotFurthestChecker);
    }
    Ok(OFF)
}

/// Whether `mv` is legal for `color` in `state`.
pub fn validate_move(mv: &Move, state: &GameState, variant: Variant, color: Color) -> bool {
    check_move(&state.board, &state.available_moves, mv, color, variant).is_ok()
}

/// Every legal single-step move for `color` on `board` with the given dice.
///
/// Moves come out in a stable order: bar entries, then bear-offs, then
/// regular moves by ascending source point, each by die in the order given.
/// Playing every die is not enforced.
pub fn legal_moves(board: &Board, color: Color, variant: Variant, dice: &[u8]) -> Vec<Move> {
    if !board.is_well_formed() {
        return Vec::new();
    }

    let mut faces: Vec<u8> = Vec::with_capacity(dice.len());
    for &die in dice {
        if (1..=6).contains(&die) && !faces.contains(&die) {
            faces.push(die);
        }
    }

    let mut candidates = Vec::new();

    if board.on_bar(color) > 0 {
        for &die in &faces {
            candidates.push(Move::new(BAR, variant.point_at(color, die), die));
        }
    } else {
        if board.all_in_home_board(color, variant) {
            for point in board.playing_points(color) {
                let progress = variant.progress_of(color, point);
                for &die in &faces {
                    if progress + die > PATH_LENGTH {
                        candidates.push(Move::new(point, OFF, die));
                    }
                }
            }
        }
        for point in board.playing_points(color) {
            let progress = variant.progress_of(color, point);
            for &die in &faces {
                if progress + die <= PATH_LENGTH {
                    candidates.push(Move::new(point, variant.point_at(color, progress + die), die));
                }
            }
        }
    }

    let mut moves: Vec<Move> = Vec::with_capacity(candidates.len());
    for mv in candidates {
        if !moves.contains(&mv) && check_move(board, &faces, &mv, color, variant).is_ok() {
            moves.push(mv);
        }
    }
    moves
}

/// Legal moves for `color` in `state` with the given (already expanded) dice.
pub fn calculate_available_moves(
    state: &GameState,
    variant: Variant,
    color: Color,
    dice: &[u8],
) -> Vec<Move> {
    legal_moves(&state.board, color, variant, dice)
}

/// Play a move that has already been validated, returning the new board and
/// the kind of move it was.
pub fn apply_move(
    board: &Board,
    mv: &Move,
    color: Color,
) -> Result<(Board, MoveKind), IllegalMove> {
    let hit = mv.to != OFF && board.piece_count_at(mv.to, color.opponent()) == 1;
    let next = board.apply_hypothetical(mv, color).map_err(|e| match e {
        BoardError::EmptySource { point, .. } => IllegalMove::EmptySource(point),
        BoardError::OutOfRange(point) => IllegalMove::PointOutOfRange(point),
        _ => IllegalMove::CorruptBoard,
    })?;

    let kind = if hit {
        MoveKind::Nail
    } else if mv.is_bar_entry() {
        MoveKind::EnterFromBar
    } else if mv.is_bear_off() {
        MoveKind::BearOff
    } else {
        MoveKind::Move
    };

    Ok((next, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(
        board: &Board,
        dice: &[u8],
        mv: Move,
        color: Color,
        variant: Variant,
    ) -> Result<(), IllegalMove> {
        check_move(board, dice, &mv, color, variant)
    }

    #[test]
    fn test_opening_moves_from_back_checkers() {
        let board = Board::starting(Variant::Portes);
        let moves = legal_moves(&board, Color::White, Variant::Portes, &[3, 4]);
        assert!(moves.contains(&Move::new(1, 4, 3)));
        assert!(moves.contains(&Move::new(1, 5, 4)));
        // 17 + 3 = 20 is open, 12 + 4 = 16 is open
        assert!(moves.contains(&Move::new(17, 20, 3)));
        assert!(moves.contains(&Move::new(12, 16, 4)));
        assert!(moves.iter().all(|m| m.die == 3 || m.die == 4));
    }

    #[test]
    fn test_black_moves_downward() {
        let board = Board::starting(Variant::Portes);
        let moves = legal_moves(&board, Color::Black, Variant::Portes, &[2]);
        assert!(moves.contains(&Move::new(24, 22, 2)));
        assert!(moves.contains(&Move::new(6, 4, 2)));
        // 13 - 2 = 11 is open
        assert!(moves.contains(&Move::new(13, 11, 2)));
    }

    #[test]
    fn test_unavailable_die_rejected() {
        let board = Board::starting(Variant::Portes);
        assert_eq!(
            check(&board, &[3, 4], Move::new(1, 6, 5), Color::White, Variant::Portes),
            Err(IllegalMove::DieNotAvailable(5))
        );
    }

    #[test]
    fn test_wrong_destination_rejected() {
        let board = Board::starting(Variant::Portes);
        assert!(matches!(
            check(&board, &[3], Move::new(1, 5, 3), Color::White, Variant::Portes),
            Err(IllegalMove::WrongDestination { expected: 4, .. })
        ));
    }

    #[test]
    fn test_out_of_range_and_empty_sources() {
        let board = Board::starting(Variant::Portes);
        assert_eq!(
            check(&board, &[3], Move::new(30, 33, 3), Color::White, Variant::Portes),
            Err(IllegalMove::PointOutOfRange(30))
        );
        assert_eq!(
            check(&board, &[3], Move::new(2, 5, 3), Color::White, Variant::Portes),
            Err(IllegalMove::EmptySource(2))
        );
        // Black's checkers cannot be moved by white
        assert_eq!(
            check(&board, &[3], Move::new(6, 9, 3), Color::White, Variant::Portes),
            Err(IllegalMove::EmptySource(6))
        );
    }

    #[test]
    fn test_bar_priority() {
        let board = Board::from_layout(&[
            (BAR, Color::White, 1),
            (12, Color::White, 14),
            (20, Color::Black, 15),
        ]);
        assert_eq!(
            check(&board, &[3, 5], Move::new(12, 15, 3), Color::White, Variant::Portes),
            Err(IllegalMove::MustEnterFromBar)
        );
        assert!(check(&board, &[3, 5], Move::new(BAR, 3, 3), Color::White, Variant::Portes).is_ok());

        let moves = legal_moves(&board, Color::White, Variant::Portes, &[3, 5]);
        assert_eq!(moves, vec![Move::new(BAR, 3, 3), Move::new(BAR, 5, 5)]);
    }

    #[test]
    fn test_black_enters_from_the_top() {
        let board = Board::from_layout(&[(BAR, Color::Black, 1), (20, Color::White, 2)]);
        let moves = legal_moves(&board, Color::Black, Variant::Portes, &[5, 2]);
        // 25 - 5 = 20 is held by two white checkers
        assert_eq!(moves, vec![Move::new(BAR, 23, 2)]);
    }

    #[test]
    fn test_portes_hit_and_block() {
        let board = Board::from_layout(&[
            (3, Color::White, 2),
            (6, Color::Black, 1),
            (7, Color::Black, 2),
        ]);
        assert!(check(&board, &[3], Move::new(3, 6, 3), Color::White, Variant::Portes).is_ok());
        assert_eq!(
            check(&board, &[4], Move::new(3, 7, 4), Color::White, Variant::Portes),
            Err(IllegalMove::Blocked(7))
        );

        let (after, kind) = apply_move(&board, &Move::new(3, 6, 3), Color::White).unwrap();
        assert_eq!(kind, MoveKind::Nail);
        assert_eq!(after.on_bar(Color::Black), 1);
    }

    #[test]
    fn test_plakoto_never_lands_on_opponent() {
        let board = Board::from_layout(&[(3, Color::White, 2), (6, Color::Black, 1)]);
        assert_eq!(
            check(&board, &[3], Move::new(3, 6, 3), Color::White, Variant::Plakoto),
            Err(IllegalMove::Blocked(6))
        );
        let moves = legal_moves(&board, Color::White, Variant::Plakoto, &[3, 1]);
        assert_eq!(moves, vec![Move::new(3, 4, 1)]);
    }

    #[test]
    fn test_fevga_prime_forbidden() {
        // White travels downward in Fevga; 10-14 are held, 15 would make six
        let board = Board::from_layout(&[
            (10, Color::White, 2),
            (11, Color::White, 2),
            (12, Color::White, 2),
            (13, Color::White, 2),
            (14, Color::White, 2),
            (18, Color::White, 5),
        ]);
        assert_eq!(
            check(&board, &[3], Move::new(18, 15, 3), Color::White, Variant::Fevga),
            Err(IllegalMove::CreatesPrime)
        );
        assert!(check(&board, &[2], Move::new(18, 16, 2), Color::White, Variant::Fevga).is_ok());
        let moves = legal_moves(&board, Color::White, Variant::Fevga, &[3, 2]);
        assert!(!moves.contains(&Move::new(18, 15, 3)));
    }

    #[test]
    fn test_exact_and_over_bear_off() {
        let board = Board::from_layout(&[(20, Color::White, 1), (23, Color::White, 2)]);
        // 20 is five away from off, but it is the rearmost checker
        assert!(check(&board, &[6, 4], Move::new(20, OFF, 6), Color::White, Variant::Portes).is_ok());
        // 23 is two away; a 4 over-bears while 20 is still further back
        assert_eq!(
            check(&board, &[6, 4], Move::new(23, OFF, 4), Color::White, Variant::Portes),
            Err(IllegalMove::NotFurthestChecker)
        );
        assert!(check(&board, &[2], Move::new(23, OFF, 2), Color::White, Variant::Portes).is_ok());
    }

    #[test]
    fn test_bear_off_requires_all_home() {
        let board = Board::from_layout(&[(23, Color::White, 2), (10, Color::White, 1)]);
        assert_eq!(
            check(&board, &[2], Move::new(23, OFF, 2), Color::White, Variant::Portes),
            Err(IllegalMove::NotAllHome)
        );
        let moves = legal_moves(&board, Color::White, Variant::Portes, &[2]);
        assert_eq!(moves, vec![Move::new(10, 12, 2)]);
    }

    #[test]
    fn test_black_bears_off_from_low_points() {
        let board = Board::from_layout(&[(2, Color::Black, 1), (5, Color::Black, 1)]);
        let moves = legal_moves(&board, Color::Black, Variant::Portes, &[6, 2]);
        assert!(moves.contains(&Move::new(5, OFF, 6)));
        assert!(moves.contains(&Move::new(2, OFF, 2)));
        assert!(!moves.contains(&Move::new(2, OFF, 6)));
        assert!(moves.contains(&Move::new(5, 3, 2)));
    }

    #[test]
    fn test_doubles_do_not_duplicate_moves() {
        let board = Board::starting(Variant::Portes);
        let once = legal_moves(&board, Color::White, Variant::Portes, &[2]);
        let doubled = legal_moves(&board, Color::White, Variant::Portes, &[2, 2, 2, 2]);
        assert_eq!(once, doubled);
    }

    #[test]
    fn test_corrupt_board_fails_closed() {
        let board = Board::from_points(Vec::new());
        assert_eq!(
            check(&board, &[3], Move::new(1, 4, 3), Color::White, Variant::Portes),
            Err(IllegalMove::CorruptBoard)
        );
        assert!(legal_moves(&board, Color::White, Variant::Portes, &[3, 4]).is_empty());
    }

    #[test]
    fn test_saturated_point_fails_closed() {
        let board = Board::from_layout(&[(5, Color::White, 1), (6, Color::White, 255)]);
        assert_eq!(
            check(&board, &[1], Move::new(5, 6, 1), Color::White, Variant::Portes),
            Err(IllegalMove::CorruptBoard)
        );
        assert!(legal_moves(&board, Color::White, Variant::Portes, &[1, 2]).is_empty());

        let hit_onto_full_bar = Board::from_layout(&[
            (BAR, Color::Black, 255),
            (4, Color::Black, 1),
            (3, Color::White, 2),
        ]);
        assert!(legal_moves(&hit_onto_full_bar, Color::White, Variant::Portes, &[1]).is_empty());
    }

    #[test]
    fn test_move_kinds() {
        let board = Board::from_layout(&[(BAR, Color::White, 1), (22, Color::White, 1)]);
        let (_, kind) = apply_move(&board, &Move::new(BAR, 2, 2), Color::White).unwrap();
        assert_eq!(kind, MoveKind::EnterFromBar);
        let (_, kind) = apply_move(&board, &Move::new(22, OFF, 3), Color::White).unwrap();
        assert_eq!(kind, MoveKind::BearOff);
        let (_, kind) = apply_move(&board, &Move::new(22, 23, 1), Color::White).unwrap();
        assert_eq!(kind, MoveKind::Move);
    }
}
