use std::collections::BTreeSet;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::infer::KnowledgeBase;
use crate::{Cell, Grid};

/// A move chosen by an [`Agent`]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Move {
    /// Proven safe
    Deduced(Cell),
    /// Nothing was certain; picked at random
    Guess(Cell),
}
impl Move {
    pub fn cell(&self) -> Cell {
        match *self {
            Move::Deduced(cell) | Move::Guess(cell) => cell,
        }
    }
}

/// Move-selection policy on top of a [`KnowledgeBase`].
#[derive(Debug, Clone)]
pub struct Agent<R: Rng = StdRng> {
    knowledge: KnowledgeBase,
    rng: R,
}
impl Agent<StdRng> {
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_rng(Grid::new(height, width), StdRng::from_entropy())
    }

    /// An agent whose guesses are reproducible
    pub fn seeded(grid: Grid, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }
}
impl<R: Rng> Agent<R> {
    pub fn with_rng(grid: Grid, rng: R) -> Self {
        Self {
            knowledge: KnowledgeBase::with_grid(grid),
            rng,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn knowledge_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge
    }

    /// See [`KnowledgeBase::add_observation`].
    ///
    /// # Errors
    ///
    /// Whatever the knowledge base rejects.
    pub fn add_observation(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.knowledge.add_observation(cell, count)
    }

    /// The first unprobed cell proven safe, in `(row, col)` order
    pub fn choose_safe_move(&self) -> Option<Cell> {
        let moves_made = self.knowledge.moves_made();
        self.knowledge
            .known_safes()
            .iter()
            .find(|cell| !moves_made.contains(cell))
            .copied()
    }

    /// A uniformly random cell that hasn't been probed and isn't in `flags`.
    ///
    /// `None` once every cell is one or the other.
    pub fn choose_random_move(&mut self, flags: &BTreeSet<Cell>) -> Option<Cell> {
        let moves_made = self.knowledge.moves_made();
        let candidates = self
            .knowledge
            .grid()
            .cells()
            .filter(|cell| !moves_made.contains(cell) && !flags.contains(cell))
            .collect_vec();
        candidates.choose(&mut self.rng).copied()
    }

    /// A safe move if there is one, otherwise a guess.
    ///
    /// Guesses steer clear of known mines as well as `flags`, unless known
    /// mines are all that is left.
    pub fn next_move(&mut self, flags: &BTreeSet<Cell>) -> Option<Move> {
        if let Some(cell) = self.choose_safe_move() {
            return Some(Move::Deduced(cell));
        }
        let avoid = flags
            .union(self.knowledge.mine_cells())
            .copied()
            .collect::<BTreeSet<_>>();
        self.choose_random_move(&avoid)
            .or_else(|| self.choose_random_move(flags))
            .map(Move::Guess)
    }
}
