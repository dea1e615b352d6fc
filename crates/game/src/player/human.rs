use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::board::{self, Choice};

use super::{MoveSource, Turn, TurnError};

/// Reads moves from a console. Illegal input is reported and asked for again;
/// it never ends the session.
pub struct LocalHuman<R, W> {
    input: R,
    output: W,
}

impl LocalHuman<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LocalHuman<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, turn: &Turn<'_>) -> io::Result<()> {
        write!(
            self.output,
            "\n{}\nPlayer {}, enter a number:  ",
            turn.board, turn.mark
        )?;
        self.output.flush()
    }
}

/// Reads a leading integer the way a console user means it: surrounding
/// blanks are ignored, trailing junk is dropped, no digits at all reads as 0.
pub fn parse_number(line: &str) -> i64 {
    let trimmed = line.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

impl<R: BufRead, W: Write> MoveSource for LocalHuman<R, W> {
    fn name(&self) -> &str {
        "console"
    }

    fn next_move(&mut self, turn: &mut Turn<'_>) -> Result<Choice, TurnError> {
        loop {
            self.prompt(turn)?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(TurnError::InputClosed);
            }

            match board::validate(parse_number(&line), turn.board) {
                Ok(choice) => return Ok(choice),
                Err(e) => {
                    log::debug!("Rejected console input {:?}: {}", line.trim_end(), e);
                    writeln!(self.output, "ERROR: {}", e)?;
                }
            }
        }
    }
}
