use std::{thread::sleep, time::Duration};

use crate::food::Food;
use crate::snake::{Collision, Direction::{self, *}, Snake};
use crate::term::{Key, Screen};
use crate::Coords;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

pub const TICK_INTERVAL_MS: u64 = 100;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FOOD_SCORE: u32 = 10;

pub const BORDER_CHAR: char = '#';

/// Why a session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Crashed(Collision),
    Quit,
}

pub struct SnakeGame<S: Screen, R: Rng> {
    width: i16,
    height: i16,
    snake: Snake,
    food: Food,
    score: u32,
    outcome: Option<Outcome>,
    paused: bool,
    tick: Duration,
    term: S,
    rng: R,
}

impl<S: Screen, R: Rng> SnakeGame<S, R> {
    /// A fresh session: snake centered and heading right, food placed at
    /// random, score zero.
    pub fn new(width: i16, height: i16, term: S, mut rng: R) -> Self {
        let center = (width / 2, height / 2);
        let snake = Snake::new(center, INITIAL_SNAKE_LENGTH, Right);
        let food = Food::new(width, height, &mut rng);

        SnakeGame {
            width,
            height,
            snake,
            food,
            score: 0,
            outcome: None,
            paused: false,
            tick: Duration::from_millis(TICK_INTERVAL_MS),
            term,
            rng,
        }
    }

    /// Overrides the 100ms sleep between ticks. Zero runs the loop flat out.
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn run(&mut self) -> Result<()> {
        info!(width = self.width, height = self.height, "session started");

        while !self.is_over() {
            self.handle_input()?;
            if !self.paused {
                self.update();
            }
            self.draw()?;
            sleep(self.tick);
        }

        self.show_game_over()
    }

    /// Consumes at most one pending key.
    pub fn handle_input(&mut self) -> Result<()> {
        let key = match self.term.poll_key()? {
            Some(key) => key,
            None => return Ok(()),
        };

        match key {
            Key::Char('w') | Key::Up => self.turn(Up),
            Key::Char('a') | Key::Left => self.turn(Left),
            Key::Char('s') | Key::Down => self.turn(Down),
            Key::Char('d') | Key::Right => self.turn(Right),
            Key::Char('q') | Key::Interrupt => self.finish(Outcome::Quit),
            Key::Char('p') | Key::Esc => self.toggle_pause(),
            _ => {}
        }

        Ok(())
    }

    pub fn update(&mut self) {
        self.snake.move_step();

        if self.snake.head() == self.food.position() {
            self.score += FOOD_SCORE;
            self.snake.grow();
            self.food.spawn(&mut self.rng);
            debug!(score = self.score, food = ?self.food.position(), "food eaten");
        }

        if let Some(collision) = self.snake.collision(self.width, self.height) {
            self.finish(Outcome::Crashed(collision));
        }
    }

    pub fn draw(&mut self) -> Result<()> {
        self.term.clear()?;
        self.draw_borders()?;

        self.snake.draw(&mut self.term)?;
        self.food.draw(&mut self.term)?;

        self.term.print_str_at((2, 0), &format!(" Score: {} ", self.score))?;
        if self.paused {
            self.term.print_str_at((self.width - 10, 0), " PAUSED ")?;
        }

        self.term.flush()
    }

    pub fn show_game_over(&mut self) -> Result<()> {
        let (cx, cy) = (self.width / 2, self.height / 2);

        self.term.clear()?;
        self.term.print_str_at((cx - 5, cy), "GAME OVER!")?;
        self.term.print_str_at((cx - 10, cy + 1), &format!("Final Score: {}", self.score))?;
        self.term.print_str_at((cx - 12, cy + 3), "Press any key to exit...")?;
        self.term.flush()?;

        self.term.read_key_blocking()?;
        Ok(())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn place_food(&mut self, pos: Coords) {
        self.food.set_position(pos);
    }

    pub fn screen(&self) -> &S {
        &self.term
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.term
    }

    ///////////////////////////////////////////////////////////////////////////

    fn turn(&mut self, dir: Direction) {
        self.snake.set_direction(dir);
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            info!(score = self.score, length = self.snake.len(), ?outcome, "game over");
            self.outcome = Some(outcome);
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (end_x, end_y) = (self.width - 1, self.height - 1);

        for x in 0..self.width {
            self.term.print_at((x, 0), BORDER_CHAR)?;
            self.term.print_at((x, end_y), BORDER_CHAR)?;
        }

        for y in 0..self.height {
            self.term.print_at((0, y), BORDER_CHAR)?;
            self.term.print_at((end_x, y), BORDER_CHAR)?;
        }

        Ok(())
    }
}
