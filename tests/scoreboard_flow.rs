use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use snake_scoreboard::input::InputEvent;
use snake_scoreboard::overlay::HighScoreList;
use snake_scoreboard::{
    App, Board, Cell, Direction, Phase, ScoreBoard, ScoreBoardEvent, ScoreEntry, ScoreService,
    Scheduler, SessionState, SpeedRamp, StepOutcome, SubmitError,
};

#[derive(Default)]
struct RecordingService {
    calls: AtomicUsize,
    submitted: Mutex<Vec<(String, u32)>>,
    fail: bool,
}

impl ScoreService for RecordingService {
    fn submit(&self, name: &str, score: u32) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("network down");
        }
        self.submitted
            .lock()
            .unwrap()
            .push((name.to_owned(), score));
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("network down");
        }
        Ok(vec![ScoreEntry {
            name: "ana".into(),
            score: 7,
        }])
    }
}

const WAIT: Duration = Duration::from_secs(5);

/// Polls the score board until a worker reports back.
fn wait_for_event(app: &App) -> ScoreBoardEvent {
    let deadline = Instant::now() + WAIT;
    loop {
        if let Some(event) = app.scoreboard().drain().into_iter().next() {
            return event;
        }
        assert!(Instant::now() < deadline, "no score board event within {WAIT:?}");
        thread::sleep(Duration::from_millis(5));
    }
}

fn app_with(service: Arc<RecordingService>) -> App {
    let session = SessionState::new(Board::new(600, 600, 20), SpeedRamp::default(), 17);
    let mut app = App::new(Scheduler::new(session), ScoreBoard::new(service));
    app.start_game(0.0);
    app
}

/// Crashes the snake into the right wall with one point on the board.
fn finish_game(app: &mut App) {
    let session = app.scheduler_mut().session_mut();
    session.debug_set_food(Cell::new(320, 300));
    app.tick(0.13);
    app.scheduler_mut()
        .session_mut()
        .debug_set_snake(&[Cell::new(580, 0)], Direction::Right);
    assert_eq!(app.tick(1.0), Some(StepOutcome::Collision));
}

fn type_name(app: &mut App, name: &str) {
    for ch in name.chars() {
        app.handle(InputEvent::Char(ch), 1.0);
    }
}

#[test]
fn collision_opens_save_dialog_with_final_score() {
    let mut app = app_with(Arc::new(RecordingService::default()));
    finish_game(&mut app);

    let dialog = app.overlay().save.as_ref().expect("dialog should open");
    assert_eq!(dialog.score, 1);
    assert!(app.scheduler().is_game_over());
    assert!(!app.scheduler().is_ticking());
}

#[test]
fn empty_name_is_rejected_without_network_or_restart() {
    let service = Arc::new(RecordingService::default());
    let mut app = app_with(Arc::clone(&service));
    finish_game(&mut app);
    type_name(&mut app, "   ");

    assert_eq!(app.submit_high_score(1.5), Err(SubmitError::EmptyName));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.scheduler().session().phase(), Phase::GameOver);
    assert!(app.overlay().save.is_some());
    let toast = app.overlay().toast.as_ref().expect("user should be told");
    assert_eq!(toast.message, "Please enter your name!");
}

#[test]
fn valid_name_submits_and_restarts() {
    let service = Arc::new(RecordingService::default());
    let mut app = app_with(Arc::clone(&service));
    finish_game(&mut app);
    type_name(&mut app, " ana ");
    app.handle(InputEvent::Confirm, 1.5);

    assert!(app.overlay().save.is_none());
    assert_eq!(app.scheduler().session().phase(), Phase::Running);
    assert_eq!(app.scheduler().score(), 0);

    assert_eq!(wait_for_event(&app), ScoreBoardEvent::Submitted);
    assert_eq!(
        *service.submitted.lock().unwrap(),
        vec![("ana".to_owned(), 1)]
    );
}

#[test]
fn failed_submission_still_restarts() {
    let service = Arc::new(RecordingService {
        fail: true,
        ..Default::default()
    });
    let mut app = app_with(Arc::clone(&service));
    finish_game(&mut app);
    type_name(&mut app, "bo");
    assert_eq!(app.submit_high_score(1.5), Ok(()));
    assert_eq!(app.scheduler().session().phase(), Phase::Running);

    let event = wait_for_event(&app);
    assert!(matches!(event, ScoreBoardEvent::SubmitFailed(_)));
    app.apply(event, 2.0);
    assert!(app.overlay().toast.is_some());
}

#[test]
fn cancel_restarts_without_submitting() {
    let service = Arc::new(RecordingService::default());
    let mut app = app_with(Arc::clone(&service));
    finish_game(&mut app);
    app.handle(InputEvent::Cancel, 1.5);

    assert!(app.overlay().save.is_none());
    assert!(app.scheduler().is_ticking());
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn high_scores_load_into_the_list() {
    let mut app = app_with(Arc::new(RecordingService::default()));
    app.handle(InputEvent::Char('h'), 0.5);
    assert_eq!(app.overlay().high_scores, Some(HighScoreList::Loading));

    let event = wait_for_event(&app);
    app.apply(event, 0.6);
    let list = app.overlay().high_scores.as_ref().unwrap();
    assert_eq!(list.entries().len(), 1);
    assert_eq!(list.entries()[0].to_string(), "ana: 7");

    app.handle(InputEvent::Cancel, 0.7);
    assert!(app.overlay().high_scores.is_none());
}

#[test]
fn failed_listing_leaves_list_empty_and_alerts() {
    let service = Arc::new(RecordingService {
        fail: true,
        ..Default::default()
    });
    let mut app = app_with(service);
    app.open_high_scores();

    let event = wait_for_event(&app);
    app.apply(event, 0.6);
    let list = app.overlay().high_scores.as_ref().unwrap();
    assert!(list.entries().is_empty());
    let toast = app.overlay().toast.as_ref().unwrap();
    assert_eq!(toast.message, "Failed to load high scores.");
}

#[test]
fn letters_steer_and_restart_outside_dialogs() {
    let mut app = app_with(Arc::new(RecordingService::default()));
    app.handle(InputEvent::Char('w'), 0.01);
    assert_eq!(app.scheduler().session().direction(), Direction::Up);
    app.handle(InputEvent::Turn(Direction::Down), 0.02);
    assert_eq!(app.scheduler().session().direction(), Direction::Up);

    app.handle(InputEvent::Char('R'), 0.03);
    assert_eq!(app.scheduler().session().direction(), Direction::Right);
}

#[test]
fn typing_in_dialog_does_not_steer_or_restart() {
    let mut app = app_with(Arc::new(RecordingService::default()));
    finish_game(&mut app);
    type_name(&mut app, "rwh");

    assert_eq!(app.overlay().save.as_ref().unwrap().name, "rwh");
    assert!(app.overlay().high_scores.is_none());
    assert!(app.scheduler().is_game_over());
}

#[test]
fn stale_listing_does_not_replace_a_newer_one() {
    let mut app = app_with(Arc::new(RecordingService::default()));
    app.open_high_scores();
    let abandoned = app.scoreboard().fetch_generation();
    app.close_high_scores();
    app.open_high_scores();
    let current = app.scoreboard().fetch_generation();
    assert_ne!(abandoned, current);

    app.apply(
        ScoreBoardEvent::Loaded {
            generation: current,
            entries: vec![ScoreEntry {
                name: "ana".into(),
                score: 7,
            }],
        },
        0.5,
    );
    app.apply(
        ScoreBoardEvent::LoadFailed {
            generation: abandoned,
            reason: "network down".into(),
        },
        0.6,
    );
    app.apply(
        ScoreBoardEvent::Loaded {
            generation: abandoned,
            entries: Vec::new(),
        },
        0.7,
    );

    let list = app.overlay().high_scores.as_ref().unwrap();
    assert_eq!(list.entries().len(), 1);
    assert_eq!(list.entries()[0].to_string(), "ana: 7");
    assert!(app.overlay().toast.is_none());
}
