use std::collections::{BTreeSet, VecDeque};
use std::mem;

use itertools::Itertools;

use crate::error::{Error, ObservationFault, Result};
use crate::infer::Sentence;
use crate::{Cell, Grid};

/// A single proven statement about a cell.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fact {
    Mine(Cell),
    Safe(Cell),
}

/// Everything that can be concluded from `sentence` on its own
fn conclusions(sentence: &Sentence) -> impl Iterator<Item = Fact> {
    sentence
        .known_mines()
        .into_iter()
        .map(Fact::Mine)
        .chain(sentence.known_safes().into_iter().map(Fact::Safe))
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// What is known about one game: live sentences plus the cells whose status
/// has been settled.
///
/// Every mutation is followed by propagation to a fixed point, so between
/// calls the sentences only mention undecided cells, none is empty and none
/// is repeated.
pub struct KnowledgeBase {
    grid: Grid,
    /// Live sentences, in the order they were learned
    sentences: Vec<Sentence>,
    mines: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    moves_made: BTreeSet<Cell>,
}
impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_grid(Grid::new(height, width))
    }

    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            sentences: Vec::new(),
            mines: BTreeSet::new(),
            safes: BTreeSet::new(),
            moves_made: BTreeSet::new(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    /// Every cell proven safe, probed or not
    pub fn known_safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    /// Every cell proven to be a mine
    pub fn mine_cells(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    /// Cells proven safe that haven't been probed yet
    pub fn safe_moves(&self) -> BTreeSet<Cell> {
        self.safes.difference(&self.moves_made).copied().collect()
    }

    pub fn is_known_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub fn is_known_safe(&self, cell: Cell) -> bool {
        self.safes.contains(&cell)
    }

    /// Record that `cell` was revealed and has `count` mines around it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidObservation`] if the cell is off the grid, the count
    /// can't fit around it, or the count contradicts what is already known.
    /// The knowledge base is left untouched in that case.
    pub fn add_observation(&mut self, cell: Cell, count: usize) -> Result<()> {
        let fault = |reason| {
            Error::InvalidObservation {
                cell,
                reason,
            }
        };
        if !self.grid.contains(cell) {
            return Err(fault(ObservationFault::OutOfBounds {
                height: self.grid.height(),
                width: self.grid.width(),
            }));
        }
        let neighbours = self.grid.neighbours(cell).collect_vec();
        if count > neighbours.len() {
            return Err(fault(ObservationFault::CountExceedsNeighbours {
                count,
                neighbours: neighbours.len(),
            }));
        }
        if self.mines.contains(&cell) {
            return Err(fault(ObservationFault::KnownMine));
        }

        let known_mines = neighbours
            .iter()
            .filter(|neighbour| self.mines.contains(neighbour))
            .count();
        let unknown = neighbours
            .into_iter()
            .filter(|neighbour| {
                !self.mines.contains(neighbour)
                    && !self.safes.contains(neighbour)
                    && !self.moves_made.contains(neighbour)
            })
            .collect_vec();
        let remaining = count
            .checked_sub(known_mines)
            .filter(|&remaining| remaining <= unknown.len())
            .ok_or_else(|| {
                fault(ObservationFault::Contradiction {
                    count,
                    known_mines,
                    unknown: unknown.len(),
                })
            })?;

        tracing::debug!(?cell, count, known_mines, unknown = unknown.len(), "observation");
        self.moves_made.insert(cell);
        self.learn(Fact::Safe(cell), &mut VecDeque::new());
        if !unknown.is_empty() {
            self.sentences.push(Sentence::new(unknown, remaining));
        }
        self.propagate();
        Ok(())
    }

    /// Record that `cell` is a mine and propagate.
    ///
    /// Already-known mines are a no-op. A cell already proven safe is left
    /// alone (with a warning) so the two sets never overlap.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.learn(Fact::Mine(cell), &mut VecDeque::new()) {
            self.propagate();
        }
    }

    /// Record that `cell` is safe and propagate. See [`Self::mark_mine`].
    pub fn mark_safe(&mut self, cell: Cell) {
        if self.learn(Fact::Safe(cell), &mut VecDeque::new()) {
            self.propagate();
        }
    }

    /// Add `fact` to the global sets and strip it from every sentence.
    ///
    /// Conclusions of the sentences it changed are queued on `pending`.
    /// Returns `false` if the fact was already known or contradicts a known
    /// fact.
    fn learn(&mut self, fact: Fact, pending: &mut VecDeque<Fact>) -> bool {
        let (cell, known, opposite) = match fact {
            Fact::Mine(cell) => (cell, &mut self.mines, &self.safes),
            Fact::Safe(cell) => (cell, &mut self.safes, &self.mines),
        };
        if !self.grid.contains(cell) {
            tracing::warn!(?fact, "ignoring fact about a cell off the grid");
            return false;
        }
        if opposite.contains(&cell) {
            tracing::warn!(?fact, "ignoring fact contradicting what is already known");
            return false;
        }
        if !known.insert(cell) {
            return false;
        }
        tracing::trace!(?fact, "learned");

        for sentence in &mut self.sentences {
            let changed = match fact {
                Fact::Mine(cell) => sentence.mark_mine(cell),
                Fact::Safe(cell) => sentence.mark_safe(cell),
            };
            if changed {
                pending.extend(conclusions(sentence));
            }
        }
        true
    }

    /// Apply every rule until nothing changes
    fn propagate(&mut self) {
        loop {
            let settled = self.settle();
            let pruned = self.prune();
            let reduced = self.reduce();
            if !(settled || pruned || reduced) {
                break;
            }
        }
    }

    /// Learn everything the sentences conclude individually, following the
    /// knock-on conclusions through a worklist until it runs dry.
    fn settle(&mut self) -> bool {
        let mut pending = self
            .sentences
            .iter()
            .flat_map(conclusions)
            .collect::<VecDeque<_>>();
        let mut learned = false;
        while let Some(fact) = pending.pop_front() {
            learned |= self.learn(fact, &mut pending);
        }
        learned
    }

    /// Drop empty and repeated sentences
    fn prune(&mut self) -> bool {
        let before = self.sentences.len();
        self.sentences = mem::take(&mut self.sentences)
            .into_iter()
            .filter(|sentence| !sentence.is_empty())
            .unique()
            .collect();
        self.sentences.len() != before
    }

    /// Subset inference: for every sentence strictly inside another, add
    /// what the larger one says about the cells left over. Both originals are
    /// kept, so later sentences can still be subtracted from either.
    ///
    /// Returns whether any new sentence was added.
    fn reduce(&mut self) -> bool {
        let mut derived = Vec::new();
        for (sub, sup) in self
            .sentences
            .iter()
            .cartesian_product(self.sentences.iter())
            .filter(|(sub, sup)| sub.is_strict_subset_of(sup))
        {
            let Some(sentence) = sup.difference(sub) else {
                tracing::trace!(%sub, %sup, "skipping inconsistent subset pair");
                continue;
            };
            if !self.sentences.contains(&sentence) && !derived.contains(&sentence) {
                tracing::debug!(%sub, %sup, %sentence, "subset inference");
                derived.push(sentence);
            }
        }
        let added = !derived.is_empty();
        self.sentences.extend(derived);
        added
    }
}
