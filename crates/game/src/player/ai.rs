use crate::board::Choice;
use crate::search;

use super::{MoveSource, Turn, TurnError};

/// Plays the minimax engine's move. Never illegal.
#[derive(Debug, Default)]
pub struct LocalAi;

impl LocalAi {
    pub fn new() -> Self {
        Self
    }
}

impl MoveSource for LocalAi {
    fn name(&self) -> &str {
        "engine"
    }

    fn next_move(&mut self, turn: &mut Turn<'_>) -> Result<Choice, TurnError> {
        let eval = search::best_move(turn.board, turn.mark).ok_or(TurnError::NoMovesLeft)?;
        log::info!(
            "Engine ({}) chose {} (score {})",
            turn.mark,
            eval.choice,
            eval.score
        );
        Ok(eval.choice)
    }
}
