use thiserror::Error;

use crate::Cell;

/// Why an observation was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationFault {
    #[error("cell lies outside the {height}x{width} grid")]
    OutOfBounds { height: usize, width: usize },

    #[error("count {count} exceeds the {neighbours} cells around it")]
    CountExceedsNeighbours { count: usize, neighbours: usize },

    #[error("cell is already known to be a mine")]
    KnownMine,

    /// The count can't be reconciled with what is already known about the
    /// neighbourhood.
    #[error(
        "count {count} contradicts {known_mines} known mine(s) and {unknown} \
         unknown cell(s) around it"
    )]
    Contradiction {
        count: usize,
        known_mines: usize,
        unknown: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid observation at {cell:?}: {reason}")]
    InvalidObservation { cell: Cell, reason: ObservationFault },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid board: {message}")]
    InvalidBoard { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
