use rand::Rng;

use crate::snake::Snake;
use crate::{Coords, GridInt};

/// Grid bounds, `columns` x `rows` cells starting at (0, 0).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    columns: GridInt,
    rows: GridInt,
}

/// Why a round ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

impl Arena {
    pub fn new(columns: GridInt, rows: GridInt) -> Self {
        assert!(columns > 0 && rows > 0, "arena needs at least one cell");
        Arena { columns, rows }
    }

    pub fn columns(&self) -> GridInt {
        self.columns
    }

    pub fn rows(&self) -> GridInt {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn contains(&self, (x, y): Coords) -> bool {
        x >= 0 && x < self.columns && y >= 0 && y < self.rows
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Coords {
        (rng.gen_range(0..self.columns), rng.gen_range(0..self.rows))
    }

    /// Checks the snake after it moved. Walls are checked before the body.
    pub fn collision(&self, snake: &Snake) -> Option<Collision> {
        if !self.contains(snake.head()) {
            Some(Collision::Wall)
        } else if snake.eats_itself() {
            Some(Collision::SelfBite)
        } else {
            None
        }
    }
}
