use log::{debug, info};

use crate::game::StepOutcome;
use crate::input::{InputEvent, letter_direction};
use crate::overlay::{HighScoreList, Overlay, SaveDialog};
use crate::scheduler::Scheduler;
use crate::scoreboard::{ScoreBoard, ScoreBoardEvent, SubmitError, validate_player_name};

/// Ties the running game to its overlays and the score board.
pub struct App {
    scheduler: Scheduler,
    overlay: Overlay,
    scoreboard: ScoreBoard,
}

impl App {
    pub fn new(scheduler: Scheduler, scoreboard: ScoreBoard) -> Self {
        Self {
            scheduler,
            overlay: Overlay::default(),
            scoreboard,
        }
    }

    pub fn start_game(&mut self, now: f64) {
        self.overlay.save = None;
        self.scheduler.start_game(now);
    }

    pub fn handle(&mut self, event: InputEvent, now: f64) {
        if self.overlay.high_scores.is_some() {
            match event {
                InputEvent::Cancel | InputEvent::Confirm => self.close_high_scores(),
                InputEvent::Turn(direction) => {
                    self.scheduler.turn(direction);
                }
                InputEvent::Char(_) | InputEvent::Backspace => {}
            }
            return;
        }

        if self.overlay.save.is_some() {
            match event {
                InputEvent::Char(ch) => self.overlay.type_char(ch),
                InputEvent::Backspace => self.overlay.backspace(),
                InputEvent::Confirm => {
                    // Rejection is shown as a toast; the dialog stays open.
                    let _ = self.submit_high_score(now);
                }
                InputEvent::Cancel => self.cancel_high_score(now),
                InputEvent::Turn(_) => {}
            }
            return;
        }

        match event {
            InputEvent::Turn(direction) => {
                self.scheduler.turn(direction);
            }
            InputEvent::Char(ch) => match ch.to_ascii_lowercase() {
                'r' => self.start_game(now),
                'h' => self.open_high_scores(),
                _ => {
                    if let Some(direction) = letter_direction(ch) {
                        self.scheduler.turn(direction);
                    }
                }
            },
            InputEvent::Backspace | InputEvent::Confirm | InputEvent::Cancel => {}
        }
    }

    /// Advances the game if a tick is due and reacts to the end of a session.
    pub fn tick(&mut self, now: f64) -> Option<StepOutcome> {
        self.drain_notifications(now);
        self.overlay.expire(now);

        let outcome = self.scheduler.poll(now)?;
        if outcome == StepOutcome::Collision {
            self.overlay.save = Some(SaveDialog::new(self.scheduler.score()));
        }
        Some(outcome)
    }

    pub fn submit_high_score(&mut self, now: f64) -> Result<(), SubmitError> {
        let Some(dialog) = self.overlay.save.as_ref() else {
            return Ok(());
        };
        let score = dialog.score;
        let name = match validate_player_name(&dialog.name) {
            Ok(name) => name,
            Err(err) => {
                self.overlay.alert(err.to_string(), now);
                return Err(err);
            }
        };
        info!("Submitting score {score} for {name}");
        self.scoreboard.submit(name, score);
        self.start_game(now);
        Ok(())
    }

    pub fn cancel_high_score(&mut self, now: f64) {
        if self.overlay.save.is_some() {
            self.start_game(now);
        }
    }

    pub fn open_high_scores(&mut self) {
        self.overlay.high_scores = Some(HighScoreList::Loading);
        self.scoreboard.fetch();
    }

    pub fn close_high_scores(&mut self) {
        self.overlay.high_scores = None;
    }

    pub fn drain_notifications(&mut self, now: f64) {
        for event in self.scoreboard.drain() {
            self.apply(event, now);
        }
    }

    pub fn apply(&mut self, event: ScoreBoardEvent, now: f64) {
        match event {
            ScoreBoardEvent::Submitted => {
                self.overlay.alert("Your score has been submitted!", now);
            }
            ScoreBoardEvent::SubmitFailed(_) => {
                self.overlay.alert("Failed to submit your score.", now);
            }
            ScoreBoardEvent::Loaded {
                generation,
                entries,
            } => {
                if generation != self.scoreboard.fetch_generation() {
                    debug!("Dropping stale high score listing {generation}");
                    return;
                }
                // A list closed while loading stays closed.
                if let Some(list) = self.overlay.high_scores.as_mut() {
                    *list = HighScoreList::Ready(entries);
                }
            }
            ScoreBoardEvent::LoadFailed { generation, .. } => {
                if generation != self.scoreboard.fetch_generation() {
                    debug!("Dropping stale high score failure {generation}");
                    return;
                }
                if let Some(list) = self.overlay.high_scores.as_mut() {
                    *list = HighScoreList::Failed;
                }
                self.overlay.alert("Failed to load high scores.", now);
            }
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }
}
