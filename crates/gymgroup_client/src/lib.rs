//! Session-authenticated client for the gym portal's busyness data.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod http_client;

#[derive(Debug, Error)]
pub enum GymClientError {
    /// The portal login flow failed: missing forgery token or the response
    /// did not carry the logged-in marker. Carries the login URL.
    #[error("'{0}' login process failed")]
    Login(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One busyness reading for a branch, as returned by the portal API.
///
/// The portal reports the branch fill level as a percentage. Values are
/// expected in [0, 100] but are passed through unchecked.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct BranchOccupancy {
    #[serde(rename = "currentBranch")]
    pub capacity: f64,
}

/// Anything that can answer per-branch occupancy queries.
///
/// The live implementation is [`http_client::GymSession`]; tests poll a fake.
#[async_trait]
pub trait OccupancySource: Send + Sync {
    async fn branch_occupancy(
        &self,
        gym_id: &str,
    ) -> Result<Option<BranchOccupancy>, GymClientError>;
}
