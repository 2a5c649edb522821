use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::Cell;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Cells are removed from a sentence as their status becomes known, so a
/// sentence only ever talks about undecided cells. Two sentences with the same
/// cells and count are the same statement.
pub struct Sentence {
    /// Undecided cells; ordered so that every walk over them is reproducible
    cells: BTreeSet<Cell>,
    /// How many of `cells` are mines
    count: usize,
}
impl Sentence {
    /// # Panics
    ///
    /// If `count` is larger than the number of distinct cells.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        Self::try_new(cells, count).expect("Sentence with more mines than cells")
    }

    /// Build a sentence, or `None` if `count` can't fit in `cells`.
    pub fn try_new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Option<Self> {
        let cells = cells.into_iter().collect::<BTreeSet<_>>();
        (count <= cells.len()).then_some(Self {
            cells,
            count,
        })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Cells that must be mines going by this sentence alone
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if !self.cells.is_empty() && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Cells that must be safe going by this sentence alone
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Drop a cell now known to be a mine, taking its mine with it.
    ///
    /// Absent cells are ignored, so this can be applied to every sentence
    /// blindly. Returns whether anything changed.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if !self.cells.remove(&cell) {
            return false;
        }
        match self.count.checked_sub(1) {
            Some(count) => self.count = count,
            None => {
                tracing::warn!(?cell, sentence = %self, "mine marked in a mine-free sentence");
            },
        }
        true
    }

    /// Drop a cell now known to be safe. Absent cells are ignored. Returns
    /// whether anything changed.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    /// Is this sentence's cell set non-empty and strictly inside `other`'s?
    pub fn is_strict_subset_of(&self, other: &Self) -> bool {
        !self.cells.is_empty()
            && self.cells.len() < other.cells.len()
            && self.cells.is_subset(&other.cells)
    }

    /// Apply the subset rule: if `sub` covers part of this sentence, the rest
    /// of this sentence holds the rest of its mines.
    ///
    /// `None` if `sub` isn't a strict subset, or if the result would be empty
    /// or inconsistent (fewer mines than `sub` claims, or more mines than
    /// cells left over).
    pub fn difference(&self, sub: &Self) -> Option<Self> {
        if !sub.is_strict_subset_of(self) {
            return None;
        }
        let count = self.count.checked_sub(sub.count)?;
        Self::try_new(self.cells.difference(&sub.cells).copied(), count)
            .filter(|sentence| !sentence.is_empty())
    }
}
impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} = {}",
            self.cells.iter().map(|cell| format!("{cell:?}")).join(", "),
            self.count
        )
    }
}
