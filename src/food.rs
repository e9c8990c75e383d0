use rand::Rng;

use crate::arena::Arena;
use crate::Coords;

/// A single food cell. It knows nothing about the snake; callers reroll it
/// until it lands on a free cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    cell: Coords,
}

impl Food {
    pub fn new(cell: Coords) -> Self {
        Food { cell }
    }

    pub fn regenerate<R: Rng>(&mut self, arena: &Arena, rng: &mut R) {
        self.cell = arena.random_cell(rng);
    }

    /// Rerolls until `is_taken` rejects the cell, returning the number of
    /// draws. The caller must make sure a free cell exists.
    pub fn regenerate_until<R, F>(&mut self, arena: &Arena, rng: &mut R, is_taken: F) -> usize
    where
        R: Rng,
        F: Fn(Coords) -> bool,
    {
        let mut draws = 0;
        loop {
            self.regenerate(arena, rng);
            draws += 1;
            if !is_taken(self.cell) {
                return draws;
            }
        }
    }

    pub fn cell(&self) -> Coords {
        self.cell
    }
}
