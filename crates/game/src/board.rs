//! Board state, move validation and terminal-state detection.

use std::fmt;
use std::str::FromStr;

pub const CELL_COUNT: usize = 9;

/// Rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A cell number in `1..=9` that has passed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Choice(u8);

impl Choice {
    pub fn new(number: i64) -> Result<Self, IllegalMove> {
        if (1..=CELL_COUNT as i64).contains(&number) {
            Ok(Self(number as u8))
        } else {
            Err(IllegalMove::OutOfRange(number))
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| Self(index as u8 + 1))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn to_ascii(self) -> u8 {
        b'0' + self.0
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("invalid move: must be a number [1-9], got {0}")]
    OutOfRange(i64),
    #[error("invalid move: square {0} already taken")]
    Occupied(Choice),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected {expected} cells, got {got}")]
    Length { expected: usize, got: usize },
    #[error("invalid character '{character}' at cell {cell}")]
    Character { character: char, cell: usize },
    #[error("invalid mark counts: X={x_count}, O={o_count} (X moves first)")]
    MarkCounts { x_count: usize, o_count: usize },
    #[error("both X and O have a completed line")]
    BothWin,
    #[error("{winner} has a line but did not move last: X={x_count}, O={o_count}")]
    WinnerMismatch {
        winner: Mark,
        x_count: usize,
        o_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Mark),
    Draw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Nine cells, each either empty or holding a mark.
///
/// An empty cell is shown by its placeholder: its own 1-based number.
/// The board is `Copy`, so callers that need a scratch copy (the search)
/// just take one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

/// The placeholder character shown for an empty cell at `index`.
pub fn placeholder(index: usize) -> char {
    char::from(b'1' + index as u8)
}

/// Checks that `number` is a cell on the board and that the cell is still empty.
pub fn validate(number: i64, board: &Board) -> Result<Choice, IllegalMove> {
    let choice = Choice::new(number)?;
    if board.is_open(choice) {
        Ok(choice)
    } else {
        Err(IllegalMove::Occupied(choice))
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, choice: Choice) -> Option<Mark> {
        self.cells[choice.index()]
    }

    pub fn is_open(&self, choice: Choice) -> bool {
        self.cells[choice.index()].is_none()
    }

    /// The character a cell displays: its mark, or its placeholder when empty.
    pub fn cell_char(&self, index: usize) -> char {
        self.cells[index].map_or_else(|| placeholder(index), Mark::to_char)
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Choice> + '_ {
        (0..CELL_COUNT)
            .filter(|&i| self.cells[i].is_none())
            .filter_map(Choice::from_index)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&c| c == Some(mark)).count()
    }

    /// Whose turn it is by mark counts, or `None` once the game is over.
    pub fn to_move(&self) -> Option<Mark> {
        if self.evaluate().is_terminal() {
            return None;
        }
        if self.count(Mark::X) > self.count(Mark::O) {
            Some(Mark::O)
        } else {
            Some(Mark::X)
        }
    }

    pub fn apply(&mut self, choice: Choice, mark: Mark) -> Result<(), IllegalMove> {
        if !self.is_open(choice) {
            return Err(IllegalMove::Occupied(choice));
        }
        self.cells[choice.index()] = Some(mark);
        Ok(())
    }

    pub fn with_move(&self, choice: Choice, mark: Mark) -> Result<Board, IllegalMove> {
        let mut next = *self;
        next.apply(choice, mark)?;
        Ok(next)
    }

    /// Empties a cell. Only the search uses this, to undo its own placement.
    pub(crate) fn clear(&mut self, choice: Choice) {
        self.cells[choice.index()] = None;
    }

    fn has_line(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Some(mark)))
    }

    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            line[1..]
                .iter()
                .all(|&i| self.cells[i] == Some(first))
                .then_some(first)
        })
    }

    pub fn evaluate(&self) -> GameStatus {
        if let Some(mark) = self.winner() {
            GameStatus::Won(mark)
        } else if self.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses nine characters: `X`, `O`, or an empty marker (`.`, `_`, or the
    /// cell's own placeholder digit).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELL_COUNT {
            return Err(BoardParseError::Length {
                expected: CELL_COUNT,
                got: chars.len(),
            });
        }

        let mut board = Board::new();
        for (index, &character) in chars.iter().enumerate() {
            board.cells[index] = match character {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '.' | '_' => None,
                c if c == placeholder(index) => None,
                _ => {
                    return Err(BoardParseError::Character {
                        character,
                        cell: index + 1,
                    });
                }
            };
        }

        let x_count = board.count(Mark::X);
        let o_count = board.count(Mark::O);
        if x_count != o_count && x_count != o_count + 1 {
            return Err(BoardParseError::MarkCounts { x_count, o_count });
        }

        // The winner must be the side that moved last, and play stops there.
        let winner = match (board.has_line(Mark::X), board.has_line(Mark::O)) {
            (true, true) => return Err(BoardParseError::BothWin),
            (true, false) if x_count != o_count + 1 => Some(Mark::X),
            (false, true) if x_count != o_count => Some(Mark::O),
            _ => None,
        };
        if let Some(winner) = winner {
            return Err(BoardParseError::WinnerMismatch {
                winner,
                x_count,
                o_count,
            });
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let base = row * 3;
            writeln!(f, "     |     |     ")?;
            writeln!(
                f,
                "  {}  |  {}  |  {} ",
                self.cell_char(base),
                self.cell_char(base + 1),
                self.cell_char(base + 2)
            )?;
            if row < 2 {
                writeln!(f, "_____|_____|_____")?;
            }
        }
        writeln!(f, "     |     |     ")
    }
}
