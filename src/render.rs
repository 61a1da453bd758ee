use macroquad::prelude::*;

use crate::app::App;
use crate::grid::{Board, Cell};
use crate::overlay::{HighScoreList, Overlay, SaveDialog};

const BACKGROUND: Color = Color::new(0.08, 0.08, 0.1, 1.0);
const BOARD: Color = Color::new(0.95, 0.95, 0.92, 1.0);
const SNAKE_FILL: Color = GREEN;
const SNAKE_OUTLINE: Color = BLACK;
const FOOD: Color = RED;
const PANEL: Color = Color::new(0.1, 0.1, 0.12, 0.92);
const SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.5);

const HUD_HEIGHT: f32 = 40.0;

/// Where the board sits in the window this frame.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub off_x: f32,
    pub off_y: f32,
}

impl Layout {
    pub fn centered(board: Board) -> Self {
        let off_x = ((screen_width() - board.width as f32) * 0.5).max(0.0);
        let off_y = ((screen_height() - board.height as f32 + HUD_HEIGHT) * 0.5).max(HUD_HEIGHT);
        Self { off_x, off_y }
    }

    fn cell_rect(&self, cell: Cell, block: i32) -> Rect {
        Rect::new(
            self.off_x + cell.x as f32,
            self.off_y + cell.y as f32,
            block as f32,
            block as f32,
        )
    }
}

pub fn draw_frame(app: &App, now: f64) {
    let session = app.scheduler().session();
    let board = session.board();
    let layout = Layout::centered(board);

    clear_background(BACKGROUND);
    draw_rectangle(
        layout.off_x,
        layout.off_y,
        board.width as f32,
        board.height as f32,
        BOARD,
    );

    for cell in session.snake() {
        let r = layout.cell_rect(*cell, board.block);
        draw_rectangle(r.x, r.y, r.w, r.h, SNAKE_FILL);
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, SNAKE_OUTLINE);
    }

    let food = layout.cell_rect(session.food(), board.block);
    draw_rectangle(food.x, food.y, food.w, food.h, FOOD);

    draw_text(
        &format!("Score: {}", session.score()),
        layout.off_x,
        layout.off_y - 12.0,
        28.0,
        WHITE,
    );
    let hint = "Arrows/WASD move  R restart  H high scores";
    let m = measure_text(hint, None, 16, 1.0);
    draw_text(
        hint,
        layout.off_x + board.width as f32 - m.width,
        layout.off_y - 14.0,
        16.0,
        GRAY,
    );

    draw_overlay(app.overlay(), now);
}

fn draw_overlay(overlay: &Overlay, now: f64) {
    if let Some(dialog) = &overlay.save {
        draw_save_dialog(dialog, overlay.is_typing(), now);
    }
    if let Some(list) = &overlay.high_scores {
        draw_high_scores(list);
    }
    if let Some(toast) = &overlay.toast {
        let m = measure_text(&toast.message, None, 22, 1.0);
        let x = (screen_width() - m.width) * 0.5;
        let y = screen_height() - 32.0;
        draw_rectangle(x - 12.0, y - 26.0, m.width + 24.0, 36.0, PANEL);
        draw_text(&toast.message, x, y, 22.0, YELLOW);
    }
}

fn panel(width: f32, height: f32) -> (f32, f32) {
    let x = (screen_width() - width) * 0.5;
    let y = (screen_height() - height) * 0.5;
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), SHADE);
    draw_rectangle(x, y, width, height, PANEL);
    draw_rectangle_lines(x, y, width, height, 2.0, GREEN);
    (x, y)
}

fn centered_text(text: &str, y: f32, size: u16, color: Color) {
    let m = measure_text(text, None, size, 1.0);
    draw_text(text, (screen_width() - m.width) * 0.5, y, size as f32, color);
}

fn draw_save_dialog(dialog: &SaveDialog, focused: bool, now: f64) {
    let (_, y) = panel(360.0, 200.0);
    centered_text("GAME OVER", y + 40.0, 36, RED);
    centered_text(&format!("Your score: {}", dialog.score), y + 76.0, 22, WHITE);

    let caret = if focused && (now * 2.0) as i64 % 2 == 0 { "_" } else { " " };
    centered_text(&format!("Name: {}{}", dialog.name, caret), y + 116.0, 22, GREEN);
    centered_text("Enter: submit   Esc: skip", y + 160.0, 18, GRAY);
}

fn draw_high_scores(list: &HighScoreList) {
    let (x, y) = panel(360.0, 420.0);
    centered_text("HIGH SCORES", y + 40.0, 32, GREEN);

    let mut line_y = y + 80.0;
    match list {
        HighScoreList::Loading => centered_text("Loading...", line_y, 20, GRAY),
        HighScoreList::Failed => {}
        HighScoreList::Ready(entries) => {
            for entry in entries.iter().take(12) {
                draw_text(&entry.to_string(), x + 32.0, line_y, 20.0, WHITE);
                line_y += 24.0;
            }
        }
    }
    centered_text("Esc: close", y + 400.0, 18, GRAY);
}
