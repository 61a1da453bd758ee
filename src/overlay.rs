use crate::scoreboard::ScoreEntry;

pub const MAX_NAME_LEN: usize = 24;
const TOAST_SECONDS: f64 = 2.5;

/// Game-over banner with the name entry for submitting the final score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDialog {
    pub score: u32,
    pub name: String,
}

impl SaveDialog {
    pub fn new(score: u32) -> Self {
        Self {
            score,
            name: String::new(),
        }
    }

    pub fn push(&mut self, ch: char) {
        if ch.is_control() || self.name.chars().count() >= MAX_NAME_LEN {
            return;
        }
        self.name.push(ch);
    }

    pub fn backspace(&mut self) {
        self.name.pop();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighScoreList {
    Loading,
    Ready(Vec<ScoreEntry>),
    Failed,
}

impl HighScoreList {
    pub fn entries(&self) -> &[ScoreEntry] {
        match self {
            Self::Ready(entries) => entries,
            Self::Loading | Self::Failed => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub expires_at: f64,
}

/// Everything drawn on top of the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub save: Option<SaveDialog>,
    pub high_scores: Option<HighScoreList>,
    pub toast: Option<Toast>,
}

impl Overlay {
    pub fn alert(&mut self, message: impl Into<String>, now: f64) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: now + TOAST_SECONDS,
        });
    }

    pub fn expire(&mut self, now: f64) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if let Some(dialog) = self.save.as_mut() {
            dialog.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(dialog) = self.save.as_mut() {
            dialog.backspace();
        }
    }

    /// True while keystrokes belong to the name field.
    pub fn is_typing(&self) -> bool {
        self.save.is_some() && self.high_scores.is_none()
    }
}
