pub mod app;
pub mod config;
pub mod game;
pub mod grid;
pub mod input;
pub mod overlay;
pub mod render;
pub mod scheduler;
pub mod scoreboard;

pub use app::App;
pub use config::{GameConfig, ScoreBoardConfig, SpeedRamp};
pub use game::{Phase, SessionState, StepOutcome};
pub use grid::{Board, Cell, Direction};
pub use scheduler::{PeriodicTask, Scheduler};
pub use scoreboard::{
    HttpScoreService, ScoreBoard, ScoreBoardEvent, ScoreEntry, ScoreService, SubmitError,
};
