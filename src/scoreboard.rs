use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use log::{error, info, warn};
use reqwest::blocking::{Client, multipart};

use crate::config::ScoreBoardConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.score)
    }
}

/// Parses the published sheet: a header row, then `name,score` rows.
/// Blank and malformed rows are dropped. Highest score first.
pub fn parse_listing(body: &str) -> Vec<ScoreEntry> {
    let mut entries: Vec<ScoreEntry> = body
        .split('\n')
        .skip(1)
        .map(|row| row.trim_end_matches('\r'))
        .filter(|row| !row.trim().is_empty())
        .filter_map(|row| {
            let mut fields = row.split(',');
            let name = fields.next()?.trim();
            let raw_score = fields.next().unwrap_or_default().trim();
            match raw_score.parse::<u32>() {
                Ok(score) => Some(ScoreEntry {
                    name: name.to_owned(),
                    score,
                }),
                Err(_) => {
                    warn!("Skipping score row {row:?}");
                    None
                }
            }
        })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    EmptyName,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("Please enter your name!"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Trims the name and rejects it if nothing is left.
pub fn validate_player_name(raw: &str) -> Result<String, SubmitError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SubmitError::EmptyName);
    }
    Ok(name.to_owned())
}

/// The remote score board.
pub trait ScoreService: Send + Sync {
    fn submit(&self, name: &str, score: u32) -> Result<()>;
    fn fetch(&self) -> Result<Vec<ScoreEntry>>;
}

pub struct HttpScoreService {
    client: Client,
    config: ScoreBoardConfig,
}

impl HttpScoreService {
    pub fn new(config: ScoreBoardConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ScoreBoardConfig) -> Self {
        Self { client, config }
    }
}

impl ScoreService for HttpScoreService {
    fn submit(&self, name: &str, score: u32) -> Result<()> {
        let form = multipart::Form::new()
            .text(self.config.name_field.clone(), name.to_owned())
            .text(self.config.score_field.clone(), score.to_string());
        // The form endpoint's answer is not inspected; reaching it is enough.
        let response = self
            .client
            .post(&self.config.submit_url)
            .multipart(form)
            .send()
            .context("failed to post score form")?;
        info!("Score form answered {}", response.status());
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>> {
        let body = self
            .client
            .get(&self.config.listing_url)
            .send()
            .context("failed to request high scores")?
            .error_for_status()
            .context("high score listing refused")?
            .text()
            .context("failed to read high score listing")?;
        Ok(parse_listing(&body))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreBoardEvent {
    Submitted,
    SubmitFailed(String),
    /// `generation` is the number `ScoreBoard::fetch` returned for the request.
    Loaded {
        generation: u64,
        entries: Vec<ScoreEntry>,
    },
    LoadFailed {
        generation: u64,
        reason: String,
    },
}

/// Runs score board calls on detached threads and collects their results.
pub struct ScoreBoard {
    service: Arc<dyn ScoreService>,
    tx: Sender<ScoreBoardEvent>,
    rx: Receiver<ScoreBoardEvent>,
    fetch_generation: u64,
}

impl ScoreBoard {
    pub fn new(service: Arc<dyn ScoreService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            service,
            tx,
            rx,
            fetch_generation: 0,
        }
    }

    pub fn submit(&self, name: String, score: u32) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let event = match service.submit(&name, score) {
                Ok(()) => {
                    info!("Submitted score {score} for {name}");
                    ScoreBoardEvent::Submitted
                }
                Err(err) => {
                    error!("Error submitting the form: {err:#}");
                    ScoreBoardEvent::SubmitFailed(format!("{err:#}"))
                }
            };
            // The receiver is gone only when the game is shutting down.
            let _ = tx.send(event);
        });
    }

    /// Starts a listing request and returns its generation. Only the latest
    /// generation is current; earlier requests still report back.
    pub fn fetch(&mut self) -> u64 {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let event = match service.fetch() {
                Ok(entries) => {
                    info!("Loaded {} high scores", entries.len());
                    ScoreBoardEvent::Loaded {
                        generation,
                        entries,
                    }
                }
                Err(err) => {
                    error!("Failed to fetch high scores: {err:#}");
                    ScoreBoardEvent::LoadFailed {
                        generation,
                        reason: format!("{err:#}"),
                    }
                }
            };
            let _ = tx.send(event);
        });
        generation
    }

    pub fn fetch_generation(&self) -> u64 {
        self.fetch_generation
    }

    /// Everything that finished since the last call.
    pub fn drain(&self) -> Vec<ScoreBoardEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
