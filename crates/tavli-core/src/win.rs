//! Win detection.

use crate::board::{Board, Color};
use crate::variant::Variant;

/// Winner under the given variant's rules, if the game is over
pub fn check_win(board: &Board, variant: Variant) -> Option<Color> {
    variant.rules().check_win(board)
}

/// A side wins once nothing is left on the bar or the playing points.
///
/// White is checked first, so it takes precedence on a board where both
/// sides have somehow finished.
pub fn standard_winner(board: &Board) -> Option<Color> {
    Color::ALL
        .into_iter()
        .find(|&color| board.checkers_in_play(color) == 0)
}

/// Plakoto's instant win: the opponent has a checker on the bar while we
/// hold at least two checkers on the opponent's mother point.
pub fn mother_point_winner(board: &Board, variant: Variant) -> Option<Color> {
    Color::ALL.into_iter().find(|&color| {
        let opponent = color.opponent();
        board.on_bar(opponent) >= 1 && board.piece_count_at(variant.mother_point(opponent), color) >= 2
    })
}
