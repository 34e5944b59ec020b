use std::sync::Arc;

use super::client::{ScoreSubmission, SubmitError};
use crate::persistence::{ScoreEntry, ScoreStore};

/// Where the current run's submission stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Submitted,
    /// Last attempt failed; another attempt is allowed
    Failed(String),
}

/// A request started by [`Submission::begin`], stamped with the run it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    run: u64,
    pub body: ScoreSubmission,
}

/// Submission flow for finished runs.
///
/// Nothing here touches the simulation: an outcome only changes this state
/// and, on success, the local top scores. Outcomes that arrive after
/// [`Submission::reset`] still record the score but leave the new run's
/// state alone.
pub struct Submission {
    state: SubmissionState,
    run: u64,
    store: Arc<dyn ScoreStore>,
}

impl Submission {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self {
            state: SubmissionState::Idle,
            run: 0,
            store,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Start over for a new run
    pub fn reset(&mut self) {
        self.run += 1;
        self.state = SubmissionState::Idle;
    }

    /// Validate and mark the submission as in flight
    pub fn begin(&mut self, name: &str, score: u32) -> Result<PendingSubmission, SubmitError> {
        match self.state {
            SubmissionState::Submitted => return Err(SubmitError::AlreadySubmitted),
            SubmissionState::Submitting => return Err(SubmitError::InProgress),
            _ => {}
        }

        let name = name.trim();
        if name.is_empty() {
            self.state = SubmissionState::Failed(SubmitError::EmptyName.to_string());
            return Err(SubmitError::EmptyName);
        }

        self.state = SubmissionState::Submitting;
        Ok(PendingSubmission {
            run: self.run,
            body: ScoreSubmission {
                name: name.to_string(),
                score,
            },
        })
    }

    /// Record the outcome of a request started with [`Submission::begin`].
    ///
    /// The outcome is handed back so callers can surface it.
    pub fn finish(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<(), SubmitError>,
    ) -> Result<(), SubmitError> {
        let current = pending.run == self.run;
        let submission = pending.body;

        match &outcome {
            Ok(()) => {
                log::info!(
                    "Score {} submitted for {}",
                    submission.score,
                    submission.name
                );
                let entry = ScoreEntry::new(submission.name, submission.score);
                if let Err(err) = self.store.append_top_score(entry) {
                    log::warn!("Failed to record local top score: {:#}", err);
                }
                if current {
                    self.state = SubmissionState::Submitted;
                }
            }
            Err(err) => {
                log::warn!("Error submitting score: {:#}", err);
                if current {
                    self.state =
                        SubmissionState::Failed("Failed to submit score. Please try again.".into());
                }
            }
        }

        if !current {
            log::debug!("Outcome for run {} arrived during run {}", pending.run, self.run);
        }
        outcome
    }

    /// One-line status for the game over panel
    pub fn status_message(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Idle => None,
            SubmissionState::Submitting => Some("Submitting..."),
            SubmissionState::Submitted => Some("Score submitted to leaderboard successfully!"),
            SubmissionState::Failed(message) => Some(message),
        }
    }
}
