use std::collections::VecDeque;

use anyhow::{ensure, Result};

use crate::term::Screen;
use crate::Coords;
use Direction::*;

pub const HEAD_CHAR: char = '0';
pub const BODY_CHAR: char = 'o';
pub const MIN_LENGTH: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Only the four unit vectors map to a direction.
    pub fn from_delta(dx: i16, dy: i16) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Up),
            (0, 1) => Some(Down),
            (-1, 0) => Some(Left),
            (1, 0) => Some(Right),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Clone, Debug)]
pub struct Snake {
    // Head at the front, tail at the back
    body: VecDeque<Coords>,
    direction: Direction,
    grow_next_move: bool,
}

impl Snake {
    /// A snake of `size` segments whose head is at `head`, trailing behind it
    /// opposite to `direction`.
    pub fn new(head: Coords, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let size = size.max(MIN_LENGTH) as i16;

        let body = (0..size)
            .map(|i| (head.0 - dx * i, head.1 - dy * i))
            .collect();
        Snake { body, direction, grow_next_move: false }
    }

    /// Builds a snake from explicit segments, head first.
    pub fn from_segments(segments: &[Coords], direction: Direction) -> Result<Self> {
        ensure!(
            segments.len() >= MIN_LENGTH,
            "a snake needs at least {} segments, got {}",
            MIN_LENGTH,
            segments.len()
        );

        for pair in segments.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let dist = (a.0 - b.0).abs() + (a.1 - b.1).abs();
            ensure!(dist == 1, "segments {:?} and {:?} are not adjacent", a, b);
        }

        Ok(Snake { body: segments.iter().copied().collect(), direction, grow_next_move: false })
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_growing(&self) -> bool {
        self.grow_next_move
    }

    /// Turning straight back onto the neck is ignored. Turning onto the
    /// current heading or a perpendicular one always applies.
    pub fn set_direction(&mut self, new_direction: Direction) {
        match (&new_direction, &self.direction) {
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right) => {}
            _ => self.direction = new_direction,
        };
    }

    /// Vector form of [`Snake::set_direction`]. Anything other than a unit
    /// vector is ignored.
    pub fn change_direction(&mut self, dx: i16, dy: i16) {
        if let Some(dir) = Direction::from_delta(dx, dy) {
            self.set_direction(dir);
        }
    }

    pub fn move_step(&mut self) {
        let (dx, dy) = self.direction.delta();
        let old_head = self.head();
        self.body.push_front((old_head.0 + dx, old_head.1 + dy));

        if self.grow_next_move {
            self.grow_next_move = false;
        } else {
            self.body.pop_back();
        }
    }

    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    pub fn collision(&self, width: i16, height: i16) -> Option<Collision> {
        let (x, y) = self.head();

        if x <= 0 || x >= width - 1 || y <= 0 || y >= height - 1 {
            return Some(Collision::Wall);
        }

        if self.body.iter().skip(1).any(|seg| *seg == (x, y)) {
            return Some(Collision::Body);
        }

        None
    }

    pub fn check_collision(&self, width: i16, height: i16) -> bool {
        self.collision(width, height).is_some()
    }

    pub fn draw<S: Screen + ?Sized>(&self, screen: &mut S) -> Result<()> {
        for (i, pos) in self.body.iter().enumerate() {
            let ch = if i == 0 { HEAD_CHAR } else { BODY_CHAR };
            screen.print_at(*pos, ch)?;
        }
        Ok(())
    }
}
