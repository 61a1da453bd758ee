use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SpeedRamp;
use crate::grid::{Board, Cell, Direction};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Translated by one block.
    Moved,
    /// Grew by one block; `interval` is the new desired tick interval.
    Ate { interval: Duration },
    /// Hit a wall or itself. The session is now over.
    Collision,
    /// Called after game over; nothing happened.
    Halted,
}

/// Everything one game session owns.
#[derive(Debug, Clone)]
pub struct SessionState {
    board: Board,
    ramp: SpeedRamp,
    rng: ChaCha8Rng,
    snake: VecDeque<Cell>,
    direction: Direction,
    food: Cell,
    score: u32,
    interval: Duration,
    phase: Phase,
}

impl SessionState {
    pub fn new(board: Board, ramp: SpeedRamp, seed: u64) -> Self {
        let mut state = Self {
            board,
            ramp,
            rng: ChaCha8Rng::seed_from_u64(seed),
            snake: VecDeque::new(),
            direction: Direction::Right,
            food: board.center(),
            score: 0,
            interval: ramp.initial(),
            phase: Phase::Running,
        };
        state.reset();
        state
    }

    pub fn reset(&mut self) {
        self.snake.clear();
        self.snake.push_front(self.board.center());
        self.direction = Direction::Right;
        self.food = self.board.random_cell(&mut self.rng);
        self.score = 0;
        self.interval = self.ramp.initial();
        self.phase = Phase::Running;
    }

    /// Accepts any direction except a straight reversal.
    pub fn turn(&mut self, requested: Direction) -> bool {
        if requested == self.direction.opposite() {
            return false;
        }
        self.direction = requested;
        true
    }

    pub fn step(&mut self) -> StepOutcome {
        if self.phase == Phase::GameOver {
            return StepOutcome::Halted;
        }

        let head = self.head();
        let next = head.offset(self.direction, self.board.block);

        if !self.board.contains(next) || self.snake.contains(&next) {
            self.phase = Phase::GameOver;
            info!(
                "Game over at ({}, {}): score {}, length {}",
                next.x,
                next.y,
                self.score,
                self.snake.len()
            );
            return StepOutcome::Collision;
        }

        self.snake.push_front(next);

        if next == self.food {
            self.score += 1;
            // May land on the body; it is not resampled.
            self.food = self.board.random_cell(&mut self.rng);
            self.interval = self.ramp.next(self.interval);
            debug!(
                "Ate food, score {}, interval {} ms",
                self.score,
                self.interval.as_millis()
            );
            StepOutcome::Ate {
                interval: self.interval,
            }
        } else {
            self.snake.pop_back();
            StepOutcome::Moved
        }
    }

    pub fn head(&self) -> Cell {
        // reset() always leaves one segment and step() never removes the last one
        self.snake.front().copied().unwrap_or_else(|| self.board.center())
    }

    pub fn snake(&self) -> impl ExactSizeIterator<Item = &Cell> {
        self.snake.iter()
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn debug_set_food(&mut self, food: Cell) {
        self.food = food;
    }

    /// Replaces the body, head first. An empty slice is ignored.
    pub fn debug_set_snake(&mut self, segments_head_first: &[Cell], direction: Direction) {
        if segments_head_first.is_empty() {
            return;
        }
        self.snake = segments_head_first.iter().copied().collect();
        self.direction = direction;
        self.phase = Phase::Running;
    }
}
