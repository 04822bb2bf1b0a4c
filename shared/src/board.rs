//! The 4x4 letter grid: dealing, rotation, wire encoding and word search

use crate::cubes::{CubePool, CUBE_COUNT, CUBE_FACES};
use crate::error::BoardError;
use crate::BOARD_SIZE;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Single stored letter standing for the inseparable "Qu" cell
pub const QU_SENTINEL: char = 'Q';

// The visited set of a search is a bitmask with one bit per cell.
const _: () = assert!(CUBE_COUNT <= u16::BITS as usize);

/// A grid position as `(row, col)`
pub type Cell = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[char; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn from_rows(cells: [[char; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Deals a fresh board: every cube lands on exactly one cell, showing one
    /// uniformly chosen face.
    pub fn generate<R: Rng>(pool: &CubePool, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..pool.cubes().len()).collect();
        order.shuffle(rng);

        let mut cells = [[' '; BOARD_SIZE]; BOARD_SIZE];
        for (position, cube_index) in order.into_iter().enumerate() {
            let cube = &pool.cubes()[cube_index];
            cells[position / BOARD_SIZE][position % BOARD_SIZE] = cube[rng.gen_range(0..CUBE_FACES)];
        }

        Self { cells }
    }

    pub fn regenerate<R: Rng>(&mut self, pool: &CubePool, rng: &mut R) {
        *self = Self::generate(pool, rng);
    }

    pub fn cell(&self, (row, col): Cell) -> char {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[char; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    pub fn rotate_clockwise(&mut self) {
        let old = self.cells;
        for (i, row) in old.iter().enumerate() {
            for (j, &letter) in row.iter().enumerate() {
                self.cells[j][BOARD_SIZE - 1 - i] = letter;
            }
        }
    }

    pub fn rotate_counter_clockwise(&mut self) {
        let old = self.cells;
        for (i, row) in old.iter().enumerate() {
            for (j, &letter) in row.iter().enumerate() {
                self.cells[BOARD_SIZE - 1 - j][i] = letter;
            }
        }
    }

    /// Row-major wire form. The Qu cell stays a single `Q`.
    pub fn encode(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    pub fn decode(encoded: &str) -> Result<Self, BoardError> {
        let letters: Vec<char> = encoded.trim().chars().collect();
        if letters.len() != CUBE_COUNT {
            return Err(BoardError::WrongLength {
                expected: CUBE_COUNT,
                found: letters.len(),
            });
        }
        if let Some(&bad) = letters.iter().find(|c| !c.is_ascii_alphabetic()) {
            return Err(BoardError::InvalidCell(bad));
        }

        let mut cells = [[' '; BOARD_SIZE]; BOARD_SIZE];
        for (position, letter) in letters.into_iter().enumerate() {
            cells[position / BOARD_SIZE][position % BOARD_SIZE] = letter.to_ascii_uppercase();
        }
        Ok(Self { cells })
    }

    /// Whether `word` can be traced through adjacent cells without reusing one
    pub fn contains(&self, word: &str) -> bool {
        self.find_path(word).is_some()
    }

    /// Finds the first path of cells spelling `word`, trying start cells in
    /// row-major order.
    ///
    /// Each `Q` in the word must be followed by `U`; the pair occupies one cell.
    /// A word with a bare `Q` can never be spelled.
    pub fn find_path(&self, word: &str) -> Option<Vec<Cell>> {
        let target = fold_qu(word)?;
        if target.is_empty() {
            return None;
        }

        let mut path = Vec::with_capacity(target.len());
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.trace((row, col), &target, 0, &mut path) {
                    return Some(path);
                }
            }
        }
        None
    }

    /// Depth-first match of `word` starting at `cell`. `visited` holds the
    /// cells already consumed by the current path and is copied per call, so
    /// backing out of a branch releases its cell automatically.
    fn trace(&self, cell: Cell, word: &[char], visited: u16, path: &mut Vec<Cell>) -> bool {
        let (row, col) = cell;
        let bit = 1u16 << (row * BOARD_SIZE + col);
        if visited & bit != 0 || self.cells[row][col] != word[0] {
            return false;
        }

        path.push(cell);
        if word.len() == 1 {
            return true;
        }

        let visited = visited | bit;
        for r in row.saturating_sub(1)..=(row + 1).min(BOARD_SIZE - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(BOARD_SIZE - 1) {
                if (r, c) != cell && self.trace((r, c), &word[1..], visited, path) {
                    return true;
                }
            }
        }

        path.pop();
        false
    }
}

/// Uppercases `word` and collapses every "QU" to the sentinel.
fn fold_qu(word: &str) -> Option<Vec<char>> {
    let mut letters = Vec::with_capacity(word.len());
    let mut chars = word.chars().map(|c| c.to_ascii_uppercase());

    while let Some(letter) = chars.next() {
        letters.push(letter);
        if letter == QU_SENTINEL && chars.next() != Some('U') {
            return None;
        }
    }
    Some(letters)
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|&letter| {
                    if letter == QU_SENTINEL {
                        format!("{:<3}", "Qu")
                    } else {
                        format!("{:<3}", letter)
                    }
                })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
