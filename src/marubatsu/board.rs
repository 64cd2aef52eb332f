use std::collections::HashSet;

use crate::types::Position;

/// Mark of one side. X always opens; O is the computer side on the levels
/// that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other side. There is no third state.
    pub fn opposite(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Grid for one marubatsu round.
///
/// Blocked cells are fixed when the round starts and are never playable;
/// they also never hold a mark, which is what keeps them out of the win
/// lines: a line through a blocked cell can never be uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Mark>>,
    blocked: HashSet<Position>,
}

impl Board {
    pub fn new(size: usize, blocked: HashSet<Position>) -> Self {
        debug_assert!(
            blocked
                .iter()
                .all(|p| (p.row as usize) < size && (p.col as usize) < size),
            "blocked cell out of bounds"
        );
        Self {
            size,
            cells: vec![None; size * size],
            blocked,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the mark at `(row, col)`.
    ///
    /// Panics when the coordinate is off the board; callers are expected to
    /// supply validated coordinates.
    pub fn mark(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells[self.index(row, col)]
    }

    pub fn is_blocked(&self, row: usize, col: usize) -> bool {
        self.blocked.contains(&Position {
            row: row as u8,
            col: col as u8,
        })
    }

    pub fn blocked(&self) -> &HashSet<Position> {
        &self.blocked
    }

    /// Whether `(row, col)` can receive a mark right now.
    pub fn is_playable(&self, row: usize, col: usize) -> bool {
        self.mark(row, col).is_none() && !self.is_blocked(row, col)
    }

    /// Places `mark`. Returns `false` and changes nothing when the cell is
    /// occupied or blocked.
    pub fn apply_move(&mut self, row: usize, col: usize, mark: Mark) -> bool {
        if !self.is_playable(row, col) {
            return false;
        }
        let index = self.index(row, col);
        self.cells[index] = Some(mark);
        true
    }

    /// Clears a cell back to empty. Used by the one-time X removal ability.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        let index = self.index(row, col);
        self.cells[index] = None;
    }

    /// The owner of any completed row, column, or diagonal.
    pub fn check_winner(&self) -> Option<Mark> {
        let n = self.size;
        for i in 0..n {
            if let Some(mark) = self.line_owner((0..n).map(|j| (i, j))) {
                return Some(mark);
            }
            if let Some(mark) = self.line_owner((0..n).map(|j| (j, i))) {
                return Some(mark);
            }
        }
        if let Some(mark) = self.line_owner((0..n).map(|i| (i, i))) {
            return Some(mark);
        }
        self.line_owner((0..n).map(|i| (i, n - 1 - i)))
    }

    fn line_owner(&self, mut line: impl Iterator<Item = (usize, usize)>) -> Option<Mark> {
        let (row, col) = line.next()?;
        let first = self.mark(row, col)?;
        if line.all(|(r, c)| self.mark(r, c) == Some(first)) {
            Some(first)
        } else {
            None
        }
    }

    /// Every non-blocked cell is occupied. Blocked cells are exempt from
    /// the required-fill set.
    pub fn is_full(&self) -> bool {
        for row in 0..self.size {
            for col in 0..self.size {
                if self.mark(row, col).is_none() && !self.is_blocked(row, col) {
                    return false;
                }
            }
        }
        true
    }

    /// Cells a mark may be placed on, in row-major scan order. The search
    /// relies on this order for deterministic tie-breaking.
    pub fn playable_cells(&self) -> Vec<Position> {
        let mut out = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.is_playable(row, col) {
                    out.push(Position {
                        row: row as u8,
                        col: col as u8,
                    });
                }
            }
        }
        out
    }

    /// Converts the grid to row-major cells where 0=empty, 1=X, 2=O.
    /// Blocked cells read as 0; they are reported separately.
    pub fn to_array(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| match cell {
                None => 0,
                Some(Mark::X) => 1,
                Some(Mark::O) => 2,
            })
            .collect()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) out of range"
        );
        row * self.size + col
    }
}

/// Picks the blocked cells for one round. The count follows the level
/// tiers: none before level 3, then 2, 3, and 4 from level 7 on. Distinct
/// in-bounds coordinates are drawn from a seeded generator so tests can
/// pin the exact set.
pub fn generate_blocked_cells(level: u32, size: usize, seed: u64) -> HashSet<Position> {
    use rand::prelude::*;

    let target = match level {
        0..=2 => 0,
        3..=4 => 2,
        5..=6 => 3,
        _ => 4,
    };
    if target == 0 {
        return HashSet::new();
    }

    let mut cells = HashSet::with_capacity(target);
    let mut rng = SmallRng::seed_from_u64(seed);
    while cells.len() < target {
        let row = rng.random_range(0..size) as u8;
        let col = rng.random_range(0..size) as u8;
        cells.insert(Position { row, col });
    }
    cells
}
