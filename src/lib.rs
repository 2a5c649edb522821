//! Knowledge-based minesweeper move inference.
//!
//! A [`KnowledgeBase`] collects *sentences* ("exactly N of these cells are
//! mines") from revealed cells, and propagates them to find cells that are
//! certainly mines or certainly safe. An [`Agent`] picks moves from that
//! knowledge, guessing at random when nothing is certain.
//!
//! ```
//! use minesweeper_kb::KnowledgeBase;
//!
//! let mut kb = KnowledgeBase::new(3, 3);
//! kb.add_observation((0, 0), 1).unwrap();
//! kb.add_observation((0, 1), 1).unwrap();
//! assert!(kb.safe_moves().contains(&(0, 2)));
//! ```
mod agent;
mod config;
mod error;
mod grid;
mod infer;
pub mod util;

pub use agent::{Agent, Move};
pub use config::GameConfig;
pub use error::{Error, ObservationFault, Result};
pub use grid::Grid;
pub use infer::{Fact, KnowledgeBase, Sentence};

/// A cell on the board, as `(row, col)`
pub type Cell = (usize, usize);
