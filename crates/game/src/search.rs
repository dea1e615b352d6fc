//! Exhaustive minimax over the remaining game tree.
//!
//! Terminal positions score `WIN_SCORE - depth` for an AI win and
//! `-WIN_SCORE + depth` for a loss, so the engine prefers the quickest win
//! and the slowest loss. The whole tree is searched on a single scratch board
//! with a strict place/undo pair per branch.

use crate::board::{Board, CELL_COUNT, Choice, GameStatus, Mark};

pub const WIN_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub choice: Choice,
    pub score: i32,
}

/// Best move for `ai` on `board`, or `None` when no cell is open.
///
/// Equal scores keep the first candidate in ascending cell order.
pub fn best_move(board: &Board, ai: Mark) -> Option<Evaluation> {
    let mut scratch = *board;
    let mut best: Option<Evaluation> = None;

    for choice in board.open_cells() {
        if scratch.apply(choice, ai).is_err() {
            continue;
        }
        let score = minimax(&mut scratch, ai, 0, false);
        scratch.clear(choice);

        if best.is_none_or(|b| score > b.score) {
            best = Some(Evaluation { choice, score });
        }
    }

    best
}

/// Scores every open cell for `ai`, in ascending cell order.
pub fn evaluate_moves(board: &Board, ai: Mark) -> Vec<Evaluation> {
    let mut scratch = *board;

    board
        .open_cells()
        .filter_map(|choice| {
            scratch.apply(choice, ai).ok()?;
            let score = minimax(&mut scratch, ai, 0, false);
            scratch.clear(choice);
            Some(Evaluation { choice, score })
        })
        .collect()
}

fn minimax(board: &mut Board, ai: Mark, depth: i32, maximizing: bool) -> i32 {
    match board.evaluate() {
        GameStatus::Won(mark) if mark == ai => return WIN_SCORE - depth,
        GameStatus::Won(_) => return -WIN_SCORE + depth,
        GameStatus::Draw => return 0,
        GameStatus::InProgress => {}
    }

    let mover = if maximizing { ai } else { ai.opponent() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for choice in (0..CELL_COUNT).filter_map(Choice::from_index) {
        // Occupied cells refuse the placement.
        if board.apply(choice, mover).is_err() {
            continue;
        }
        let value = minimax(board, ai, depth + 1, !maximizing);
        board.clear(choice);

        best = if maximizing {
            best.max(value)
        } else {
            best.min(value)
        };
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn choice(n: i64) -> Choice {
        Choice::new(n).unwrap()
    }

    #[test]
    fn test_empty_board_picks_first_cell_with_draw_score() {
        let eval = best_move(&Board::new(), Mark::X).unwrap();

        assert_eq!(eval.choice, choice(1));
        assert_eq!(eval.score, 0);
    }

    #[test]
    fn test_full_board_has_no_move() {
        assert_eq!(best_move(&board("XOXXOOOXX"), Mark::X), None);
    }

    #[test]
    fn test_takes_immediate_win() {
        // X to move with 3 completing the top row.
        let eval = best_move(&board("XX.OO...."), Mark::X).unwrap();

        assert_eq!(eval.choice, choice(3));
        assert_eq!(eval.score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_immediate_loss() {
        // O to move; X threatens 3.
        let eval = best_move(&board("XX..O...."), Mark::O).unwrap();

        assert_eq!(eval.choice, choice(3));
    }

    #[test]
    fn test_prefers_faster_win() {
        // X can win now at 9 (diagonal) or set up slower wins elsewhere.
        let eval = best_move(&board("XO.OX...."), Mark::X).unwrap();

        assert_eq!(eval.choice, choice(9));
        assert_eq!(eval.score, WIN_SCORE);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let original = board("X...O....");
        let copy = original;
        let _ = best_move(&original, Mark::X);
        let _ = evaluate_moves(&original, Mark::X);

        assert_eq!(original, copy);
    }

    #[test]
    fn test_evaluate_moves_matches_best_move() {
        let position = board("X...O...X");
        let scores = evaluate_moves(&position, Mark::O);
        let best = best_move(&position, Mark::O).unwrap();
        let top = scores.iter().map(|e| e.score).max().unwrap();

        assert_eq!(scores.len(), 6);
        assert_eq!(best.score, top);
        assert_eq!(
            scores.iter().find(|e| e.score == top).map(|e| e.choice),
            Some(best.choice)
        );
        // Taking a corner here loses to a double threat.
        assert!(scores.iter().find(|e| e.choice == choice(3)).unwrap().score < 0);
    }

    /// Plays every possible opponent reply against the engine and returns
    /// whether the engine ever lost.
    fn engine_ever_loses(board: Board, ai: Mark, to_move: Mark) -> bool {
        match board.evaluate() {
            GameStatus::Won(mark) => return mark != ai,
            GameStatus::Draw => return false,
            GameStatus::InProgress => {}
        }

        if to_move == ai {
            let eval = best_move(&board, ai).unwrap();
            let next = board.with_move(eval.choice, ai).unwrap();
            engine_ever_loses(next, ai, ai.opponent())
        } else {
            board.open_cells().any(|reply| {
                let next = board.with_move(reply, to_move).unwrap();
                engine_ever_loses(next, ai, ai)
            })
        }
    }

    #[test]
    fn test_never_loses_moving_first() {
        assert!(!engine_ever_loses(Board::new(), Mark::X, Mark::X));
    }

    #[test]
    fn test_never_loses_moving_second() {
        assert!(!engine_ever_loses(Board::new(), Mark::O, Mark::X));
    }
}
