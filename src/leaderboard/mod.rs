//! Best-effort score submission to a remote leaderboard

pub mod client;
pub mod submission;

pub use client::{HttpPoster, ScorePoster, ScoreSubmission, SubmitError, DEFAULT_ENDPOINT};
pub use submission::{PendingSubmission, Submission, SubmissionState};
