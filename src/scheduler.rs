use std::time::Duration;

use log::{debug, info};

use crate::game::{Phase, SessionState, StepOutcome};
use crate::grid::Direction;

/// A recurring deadline. Times are seconds on the frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTask {
    interval: Duration,
    next_due: f64,
}

impl PeriodicTask {
    pub fn new(interval: Duration, now: f64) -> Self {
        Self {
            interval,
            next_due: now + interval.as_secs_f64(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: f64) -> bool {
        now >= self.next_due
    }

    /// Consumes one firing if due. A loop that fell a whole period behind is
    /// resynchronised instead of replaying the missed ticks.
    pub fn fire(&mut self, now: f64) -> bool {
        if !self.is_due(now) {
            return false;
        }
        let period = self.interval.as_secs_f64();
        self.next_due += period;
        if self.next_due <= now {
            self.next_due = now + period;
        }
        true
    }
}

/// Owns the session and the single task that drives it.
#[derive(Debug)]
pub struct Scheduler {
    session: SessionState,
    task: Option<PeriodicTask>,
}

impl Scheduler {
    /// Wraps a session without starting it; call `start_game` to begin ticking.
    pub fn new(session: SessionState) -> Self {
        Self {
            session,
            task: None,
        }
    }

    pub fn start_game(&mut self, now: f64) {
        self.session.reset();
        self.reschedule(self.session.interval(), now);
        info!(
            "New game on {}x{} board",
            self.session.board().width,
            self.session.board().height
        );
    }

    pub fn turn(&mut self, direction: Direction) -> bool {
        self.session.turn(direction)
    }

    /// Runs at most one step if the task is due.
    pub fn poll(&mut self, now: f64) -> Option<StepOutcome> {
        let task = self.task.as_mut()?;
        if !task.fire(now) {
            return None;
        }

        let outcome = self.session.step();
        match outcome {
            StepOutcome::Ate { interval } => self.reschedule(interval, now),
            StepOutcome::Collision | StepOutcome::Halted => self.cancel(),
            StepOutcome::Moved => {}
        }
        Some(outcome)
    }

    pub fn is_ticking(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&PeriodicTask> {
        self.task.as_ref()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.phase() == Phase::GameOver
    }

    fn cancel(&mut self) {
        self.task = None;
    }

    fn reschedule(&mut self, interval: Duration, now: f64) {
        debug!("Tick interval {} ms", interval.as_millis());
        self.task = Some(PeriodicTask::new(interval, now));
    }
}
