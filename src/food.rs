use anyhow::Result;
use rand::Rng;

use crate::term::Screen;
use crate::Coords;

pub const FOOD_CHAR: char = 'O';

/// A single piece of food somewhere inside the walls.
///
/// Placement does not look at the snake, so food can occasionally land on
/// a body segment.
#[derive(Clone, Debug)]
pub struct Food {
    position: Coords,
    width: i16,
    height: i16,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(width: i16, height: i16, rng: &mut R) -> Self {
        let mut food = Food { position: (1, 1), width, height };
        food.spawn(rng);
        food
    }

    /// Moves to a uniformly random interior cell: column in `1..=width-2`,
    /// row in `1..=height-2`.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let x = rng.gen_range(1..=(self.width - 2).max(1));
        let y = rng.gen_range(1..=(self.height - 2).max(1));
        self.position = (x, y);
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn set_position(&mut self, pos: Coords) {
        self.position = pos;
    }

    pub fn draw<S: Screen + ?Sized>(&self, screen: &mut S) -> Result<()> {
        screen.print_at(self.position, FOOD_CHAR)
    }
}
