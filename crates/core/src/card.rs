//! Bingo tickets: a 3x9 grid where each column draws from its own decade.
//!
//! Cells are stored column-major, so index `col * CARD_ROWS + row` addresses a
//! cell. Every card carries exactly [`CARD_NUMBERS`] distinct numbers.

use crate::{CardLayout, RngState, RoundToken, MAX_BALL};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

pub const CARD_ROWS: usize = 3;
pub const CARD_COLS: usize = 9;
pub const CARD_CELLS: usize = CARD_ROWS * CARD_COLS;
pub const CARD_NUMBERS: usize = 15;
pub const NUMBERS_PER_ROW: usize = 5;

/// How many of a column's three slots hold a number, one entry per column.
const FILL_COUNTS: [usize; CARD_COLS] = [1, 1, 1, 1, 2, 2, 2, 2, 3];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Cell {
    Blank,
    Number(u8),
}

impl Cell {
    pub fn number(self) -> Option<u8> {
        match self {
            Self::Blank => None,
            Self::Number(n) => Some(n),
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Numeric form where a blank reads as 0.
    pub fn value(self) -> u8 {
        self.number().unwrap_or(0)
    }
}

/// Numbers a column may hold. The last column also takes 90.
pub fn column_range(col: usize) -> RangeInclusive<u8> {
    match col {
        0 => 1..=9,
        c if c + 1 >= CARD_COLS => 80..=MAX_BALL,
        c => {
            let start = (c * 10) as u8;
            start..=start + 9
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardProgress {
    pub marked: usize,
    pub total: usize,
}

impl CardProgress {
    pub fn is_complete(self) -> bool {
        self.total > 0 && self.marked == self.total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    cells: Vec<Cell>,
}

impl Card {
    /// Builds a card from column-major cells. Returns `None` unless there are
    /// exactly [`CARD_CELLS`] of them.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == CARD_CELLS).then_some(Self { cells })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row >= CARD_ROWS || col >= CARD_COLS {
            return Cell::Blank;
        }
        self.cells[col * CARD_ROWS + row]
    }

    pub fn row(&self, row: usize) -> [Cell; CARD_COLS] {
        let mut out = [Cell::Blank; CARD_COLS];
        for (col, slot) in out.iter_mut().enumerate() {
            *slot = self.cell(row, col);
        }
        out
    }

    pub fn column(&self, col: usize) -> &[Cell] {
        let start = col.min(CARD_COLS - 1) * CARD_ROWS;
        &self.cells[start..start + CARD_ROWS]
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().filter_map(|cell| cell.number())
    }

    pub fn contains(&self, number: u8) -> bool {
        number > 0 && self.numbers().any(|n| n == number)
    }

    pub fn row_counts(&self) -> [usize; CARD_ROWS] {
        let mut counts = [0usize; CARD_ROWS];
        for (row, count) in counts.iter_mut().enumerate() {
            *count = self.row(row).iter().filter(|cell| !cell.is_blank()).count();
        }
        counts
    }

    pub fn progress(&self, called: &BTreeSet<u8>) -> CardProgress {
        let mut progress = CardProgress {
            marked: 0,
            total: 0,
        };
        for n in self.numbers() {
            progress.total += 1;
            if called.contains(&n) {
                progress.marked += 1;
            }
        }
        progress
    }

    /// Rows that hold at least one number and have every number called.
    pub fn completed_rows(&self, called: &BTreeSet<u8>) -> Vec<usize> {
        (0..CARD_ROWS)
            .filter(|&row| {
                let numbers: Vec<u8> = self.row(row).iter().filter_map(|c| c.number()).collect();
                !numbers.is_empty() && numbers.iter().all(|n| called.contains(n))
            })
            .collect()
    }

    pub fn is_full_house(&self, called: &BTreeSet<u8>) -> bool {
        self.progress(called).is_complete()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardGenerator {
    layout: CardLayout,
}

impl CardGenerator {
    pub fn new(layout: CardLayout) -> Self {
        Self { layout }
    }

    /// Card for one ticket slot of one round. Pure in its inputs.
    pub fn ticket(&self, seed: u64, token: RoundToken, ticket: usize) -> Card {
        let mut rng = RngState::for_ticket(seed, token.0, ticket);
        self.generate(&mut rng)
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Card {
        let picks: Vec<[u8; CARD_ROWS]> = (0..CARD_COLS).map(|col| pick_column(col, rng)).collect();

        let mut fills = FILL_COUNTS;
        fills.shuffle(rng);

        let rows = match self.layout {
            CardLayout::Scattered => scattered_rows(&fills, rng),
            CardLayout::Balanced => balanced_rows(&fills, rng),
        };

        let mut cells = Vec::with_capacity(CARD_CELLS);
        for col in 0..CARD_COLS {
            for row in 0..CARD_ROWS {
                cells.push(if rows[col][row] {
                    Cell::Number(picks[col][row])
                } else {
                    Cell::Blank
                });
            }
        }
        Card { cells }
    }
}

/// Three candidates from the column's decade, ascending.
fn pick_column<R: Rng + ?Sized>(col: usize, rng: &mut R) -> [u8; CARD_ROWS] {
    let mut pool: Vec<u8> = column_range(col).collect();
    pool.shuffle(rng);
    let mut picked = [pool[0], pool[1], pool[2]];
    picked.sort_unstable();
    picked
}

fn scattered_rows<R: Rng + ?Sized>(
    fills: &[usize; CARD_COLS],
    rng: &mut R,
) -> [[bool; CARD_ROWS]; CARD_COLS] {
    let mut out = [[false; CARD_ROWS]; CARD_COLS];
    for (col, &fill) in fills.iter().enumerate() {
        let mut order = [0usize, 1, 2];
        order.shuffle(rng);
        for &row in order.iter().take(fill) {
            out[col][row] = true;
        }
    }
    out
}

/// Greedy largest-remaining-quota assignment. Columns are served by
/// descending fill, which keeps every row quota reachable.
fn balanced_rows<R: Rng + ?Sized>(
    fills: &[usize; CARD_COLS],
    rng: &mut R,
) -> [[bool; CARD_ROWS]; CARD_COLS] {
    let mut out = [[false; CARD_ROWS]; CARD_COLS];
    let mut quota = [NUMBERS_PER_ROW; CARD_ROWS];

    let mut columns: Vec<usize> = (0..CARD_COLS).collect();
    columns.shuffle(rng);
    columns.sort_by(|a, b| fills[*b].cmp(&fills[*a]));

    for col in columns {
        let mut rows = [0usize, 1, 2];
        rows.shuffle(rng);
        rows.sort_by(|a, b| quota[*b].cmp(&quota[*a]));
        for &row in rows.iter().take(fills[col]) {
            out[col][row] = true;
            quota[row] = quota[row].saturating_sub(1);
        }
    }
    out
}
