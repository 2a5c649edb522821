use std::collections::BTreeSet;
use std::str::FromStr;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::agent::{Agent, Move};
use crate::error::{Error, Result};
use crate::{Cell, GameConfig, Grid};

/// A board with its mines laid out (no game logic beyond counting!)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minefield {
    grid: Grid,
    mines: BTreeSet<Cell>,
}
impl Minefield {
    /// Create a minefield from an ASCII-encoded description, where:
    /// - `*` is a mine
    /// - `.` is a safe cell
    /// - Trailing or leading whitespace is ignored
    ///
    /// # Errors
    ///
    /// If the board is not rectangular, has a width or height of 0, or
    /// contains any other character.
    pub fn new(encoded: &str) -> Result<Self> {
        let invalid = |message: String| {
            Error::InvalidBoard {
                message,
            }
        };
        let lines = encoded.trim().lines().map(str::trim).collect_vec();
        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.chars().count());
        if width == 0 {
            return Err(invalid("board must have at least one cell".to_string()));
        }
        if let Some(line) = lines.iter().find(|line| line.chars().count() != width) {
            return Err(invalid(format!(
                concat!(
                    "board must be rectangular (found line with length {},",
                    " expected length {})",
                ),
                line.chars().count(),
                width,
            )));
        }
        let mut mines = BTreeSet::new();
        for (row, line) in lines.into_iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                match c {
                    '*' => {
                        mines.insert((row, col));
                    },
                    '.' => (),
                    _ => {
                        return Err(invalid(format!(
                            "invalid character '{c}' at ({row}, {col})"
                        )));
                    },
                }
            }
        }
        Ok(Self {
            grid: Grid::new(height, width),
            mines,
        })
    }

    /// Lay `config.mines` mines on distinct cells, uniformly at random.
    ///
    /// # Errors
    ///
    /// If the configuration doesn't validate.
    pub fn random(config: &GameConfig, rng: &mut impl Rng) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let cells = grid.cells().collect_vec();
        Ok(Self {
            grid,
            mines: cells.choose_multiple(rng, config.mines).copied().collect(),
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines touching `cell`, not counting `cell` itself
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        self.grid
            .neighbours(cell)
            .filter(|&neighbour| self.is_mine(neighbour))
            .count()
    }

    /// Have exactly the mines been flagged?
    pub fn won(&self, flagged: &BTreeSet<Cell>) -> bool {
        *flagged == self.mines
    }
}
impl FromStr for Minefield {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// How a game driven by [`play`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every safe cell was revealed
    Won { moves: usize, guesses: usize },
    /// `cell` was a mine
    Lost {
        cell: Cell,
        moves: usize,
        guesses: usize,
    },
}

/// Let `agent` play `field` until it reveals every safe cell or steps on a
/// mine. Known mines are passed back to the agent as flags.
///
/// # Errors
///
/// If the agent's knowledge rejects one of the field's counts, which means
/// the agent already knew something about this game that the field disagrees
/// with.
pub fn play<R: Rng>(field: &Minefield, agent: &mut Agent<R>) -> Result<Outcome> {
    let safe_cells = field.grid().len() - field.mines().len();
    let mut moves = 0;
    let mut guesses = 0;
    while agent.knowledge().moves_made().len() < safe_cells {
        let flags = agent.knowledge().mine_cells().clone();
        let Some(next) = agent.next_move(&flags) else {
            break;
        };
        moves += 1;
        if let Move::Guess(_) = next {
            guesses += 1;
        }
        let cell = next.cell();
        if field.is_mine(cell) {
            tracing::debug!(?cell, moves, guesses, "stepped on a mine");
            return Ok(Outcome::Lost {
                cell,
                moves,
                guesses,
            });
        }
        let count = field.nearby_mines(cell);
        tracing::trace!(?next, count, "revealed");
        agent.add_observation(cell, count)?;
    }
    Ok(Outcome::Won {
        moves,
        guesses,
    })
}
