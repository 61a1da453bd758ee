use std::sync::Arc;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use macroquad::prelude::*;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use snake_scoreboard::config::{CONFIG_PATH, load_config};
use snake_scoreboard::input::poll_input;
use snake_scoreboard::render::draw_frame;
use snake_scoreboard::{App, HttpScoreService, ScoreBoard, Scheduler, SessionState};

fn init_logging() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("failed to initialize logger")
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Snake".to_owned(),
        window_width: 760,
        window_height: 760,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = init_logging() {
        eprintln!("{err:#}");
    }

    let config = load_config(CONFIG_PATH);
    // Sized once; later window resizes only move the board.
    let board = config.board_for_viewport(screen_width());
    let seed = (macroquad::miniquad::date::now() * 1_000_000.0) as u64;
    info!(
        "Starting snake on a {}x{} surface, block {}",
        board.width, board.height, board.block
    );

    let session = SessionState::new(board, config.speed, seed);
    let service = Arc::new(HttpScoreService::new(config.scoreboard.clone()));
    let mut app = App::new(Scheduler::new(session), ScoreBoard::new(service));
    app.start_game(get_time());

    loop {
        let now = get_time();

        if is_key_pressed(KeyCode::Q) && is_key_down(KeyCode::LeftControl) {
            break;
        }

        for event in poll_input() {
            app.handle(event, now);
        }
        app.tick(now);

        draw_frame(&app, now);
        next_frame().await;
    }
}
