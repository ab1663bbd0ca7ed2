//! Score state controller
//! Owns the running score, the set-score text buffer and the input error flag.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use thiserror::Error;

/// Quick add/subtract amounts, in button order
pub const PRESET_INCREMENTS: [i64; 7] = [1, 2, 5, 10, 20, 50, 100];

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("not a whole number: {text:?}")]
    InvalidScoreText {
        text: String,
        #[source]
        source: ParseIntError,
    },
}

/// Events the UI forwards to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    Add(i64),
    Subtract(i64),
    TextChanged(String),
    CommitText,
    Reset,
}

/// Everything needed to rebuild the controller after the view is recreated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: i64,
    #[serde(default)]
    pub pending_text: String,
    #[serde(default)]
    pub input_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreController {
    score: i64,
    pending_text: String,
    input_error: bool,
}

impl ScoreController {
    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    pub fn input_error(&self) -> bool {
        self.input_error
    }

    /// Add a preset amount. Wraps at the i64 boundary instead of panicking.
    pub fn add(&mut self, delta: i64) {
        self.score = self.score.wrapping_add(delta);
        tracing::debug!(delta, score = self.score, "add");
    }

    pub fn subtract(&mut self, delta: i64) {
        self.score = self.score.wrapping_sub(delta);
        tracing::debug!(delta, score = self.score, "subtract");
    }

    /// Replace the pending text verbatim. Any edit clears a previous input error.
    pub fn update_pending_text(&mut self, raw: impl Into<String>) {
        self.pending_text = raw.into();
        if self.input_error {
            self.input_error = false;
        }
    }

    /// Parse the pending text into the score.
    ///
    /// On failure the score is left alone and the error flag is raised; the
    /// returned error is informational only, the flag is the contract.
    pub fn commit_text(&mut self) -> Result<i64, ScoreError> {
        match parse_score(&self.pending_text) {
            Ok(value) => {
                self.score = value;
                self.input_error = false;
                tracing::debug!(score = value, "score set from text");
                Ok(value)
            }
            Err(e) => {
                self.input_error = true;
                tracing::debug!("rejected score text: {}", e);
                Err(e)
            }
        }
    }

    /// Zero the score and clear the pending text. The error flag is left as is.
    pub fn reset(&mut self) {
        self.score = 0;
        self.pending_text.clear();
        tracing::debug!("score reset");
    }

    pub fn apply(&mut self, event: ScoreEvent) {
        match event {
            ScoreEvent::Add(delta) => self.add(delta),
            ScoreEvent::Subtract(delta) => self.subtract(delta),
            ScoreEvent::TextChanged(text) => self.update_pending_text(text),
            ScoreEvent::CommitText => {
                let _ = self.commit_text();
            }
            ScoreEvent::Reset => self.reset(),
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            pending_text: self.pending_text.clone(),
            input_error: self.input_error,
        }
    }

    pub fn restore(snapshot: ScoreSnapshot) -> Self {
        Self {
            score: snapshot.score,
            pending_text: snapshot.pending_text,
            input_error: snapshot.input_error,
        }
    }
}

/// Parse user text as a base-10 signed whole number (surrounding whitespace ignored)
pub fn parse_score(text: &str) -> Result<i64, ScoreError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|source| ScoreError::InvalidScoreText {
            text: trimmed.to_string(),
            source,
        })
}
