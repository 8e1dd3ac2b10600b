//! Settled cells - the static stack at the bottom of the board
//!
//! Cells are keyed by coordinate, so two settled cells can never share a
//! position. Keys are `(row, col)` which makes iteration row-major from the top
//! and lets a row be scanned as a contiguous range.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::geometry::Cell;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettledCells {
    cells: BTreeMap<(i32, i32), Cell>,
}

impl SettledCells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        self.cells.contains_key(&(row, col))
    }

    pub fn get(&self, col: i32, row: i32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Add a cell. Returns false (and keeps the existing cell) if the
    /// coordinate is already taken.
    pub fn insert(&mut self, cell: Cell) -> bool {
        match self.cells.entry((cell.row, cell.col)) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(cell);
                true
            }
        }
    }

    /// Iterate top to bottom, left to right.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// Number of settled cells in `row`.
    pub fn row_len(&self, row: i32) -> usize {
        self.cells.range((row, i32::MIN)..=(row, i32::MAX)).count()
    }

    /// Smallest row index holding a settled cell (the top of the stack).
    pub fn highest_row(&self) -> Option<i32> {
        self.cells.keys().next().map(|&(row, _)| row)
    }

    /// Nearest settled row strictly below `row` in column `col`.
    pub fn first_row_below(&self, col: i32, row: i32) -> Option<i32> {
        self.cells
            .range((row + 1, i32::MIN)..)
            .find(|(&(_, c), _)| c == col)
            .map(|(&(r, _), _)| r)
    }

    /// Rows whose cell count equals `width`, in ascending order.
    pub fn full_rows(&self, width: i32) -> Vec<i32> {
        let mut counts: BTreeMap<i32, i32> = BTreeMap::new();
        for &(row, _) in self.cells.keys() {
            *counts.entry(row).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n == width)
            .map(|(row, _)| row)
            .collect()
    }

    /// Remove every full row and let the rows above fall into the gap.
    /// Returns the removed cells.
    pub fn clear_full_rows(&mut self, width: i32) -> Vec<Cell> {
        let full = self.full_rows(width);
        self.remove_rows(&full)
    }

    /// Remove `rows` (ascending) and compact the stack.
    ///
    /// Each remaining cell moves down by the number of removed rows beneath it,
    /// so a contiguous block of `n` removed rows shifts everything above it by
    /// exactly `n`. Only `row` changes; `col`, color and id are preserved.
    pub fn remove_rows(&mut self, rows: &[i32]) -> Vec<Cell> {
        if rows.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let old = std::mem::take(&mut self.cells);
        for ((row, col), cell) in old {
            if rows.binary_search(&row).is_ok() {
                removed.push(cell);
                continue;
            }
            let moved = cell.translated(0, rows_beneath(rows, row));
            self.cells.insert((moved.row, col), moved);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// How many of `rows` lie strictly below `row`.
pub fn rows_beneath(rows: &[i32], row: i32) -> i32 {
    rows.iter().filter(|&&r| r > row).count() as i32
}

impl FromIterator<Cell> for SettledCells {
    /// Later duplicates of a coordinate are dropped.
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        let mut settled = Self::new();
        for cell in iter {
            settled.insert(cell);
        }
        settled
    }
}

impl Extend<Cell> for SettledCells {
    /// Cells landing on a taken coordinate are dropped, like in `collect`.
    fn extend<T: IntoIterator<Item = Cell>>(&mut self, iter: T) {
        for cell in iter {
            self.insert(cell);
        }
    }
}

impl Serialize for SettledCells {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.values())
    }
}
