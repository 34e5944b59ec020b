use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/scores";

/// Body posted to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please enter your name")]
    EmptyName,

    #[error("score already submitted")]
    AlreadySubmitted,

    #[error("a submission is already in flight")]
    InProgress,

    #[error("leaderboard request failed")]
    Http(#[from] reqwest::Error),

    #[error("leaderboard answered with HTTP {0}")]
    Status(u16),
}

/// Transport for score submissions
pub trait ScorePoster: Send + Sync {
    fn post(
        &self,
        submission: &ScoreSubmission,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Posts submissions as JSON over HTTP
pub struct HttpPoster {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPoster {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl ScorePoster for HttpPoster {
    async fn post(&self, submission: &ScoreSubmission) -> Result<(), SubmitError> {
        log::debug!("Submitting {:?} to {}", submission, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status.as_u16()));
        }
        Ok(())
    }
}
