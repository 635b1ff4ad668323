//! Reqwest-based login and busyness queries for the gym portal.
//!
//! The portal has no API tokens: authentication is a browser-style flow in
//! which a hidden forgery token is scraped from the login page and posted
//! back with the member's credentials, with cookies carried across both
//! requests and every query that follows.

use crate::config::Config;
use crate::{BranchOccupancy, GymClientError, OccupancySource};
use async_trait::async_trait;
use regex::Regex;
use secrecy::ExposeSecret;
use std::sync::LazyLock;

const LOGIN_PATH: &str = "/login/";
const BUSYNESS_PATH: &str = "/api/sitecore/GymBusyness/GetGymBusynessByBranchAndActivity";
/// Fixed portal configuration identifier sent with every busyness query.
const BUSYNESS_CONFIGURATION_ID: &str = "{05E4232E-6743-4A7E-B32A-7B36DBA51F34}";

static TOKEN_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]*\bid\s*=\s*"forgeryToken"[^>]*>"#).expect("valid literal regex")
});
static VALUE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bvalue\s*=\s*"([^"]*)""#).expect("valid literal regex"));

/// Pull the hidden forgery token out of the login page markup.
///
/// Deliberately narrow: the rest of the login flow only sees `Option<&str>`,
/// so the scraping strategy can change without touching session handling.
/// Attribute order within the `<input>` tag is not assumed.
pub fn extract_forgery_token(html: &str) -> Option<&str> {
    let tag = TOKEN_INPUT.find(html)?;
    VALUE_ATTR
        .captures(tag.as_str())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Unauthenticated client for the gym portal. Consumed by [`GymClient::login`].
#[derive(Debug)]
pub struct GymClient {
    base_url: String,
    client: reqwest::Client,
}

impl GymClient {
    pub fn new(base_url: &str) -> Result<Self, GymClientError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Run the portal login flow and return a live session.
    ///
    /// GETs the login page, scrapes the forgery token, then POSTs the
    /// member's credentials with the page's cookies attached. The portal
    /// greets a logged-in member by name, so a "Welcome" substring in the
    /// response body is the success oracle. One shot: a failure of any step
    /// is [`GymClientError::Login`] with no retry and no distinction between
    /// bad credentials and a transient fault.
    pub async fn login(self, config: &Config) -> Result<GymSession, GymClientError> {
        let login_url = format!("{}{}", self.base_url, LOGIN_PATH);

        let page = self.client.get(&login_url).send().await?.text().await?;
        let token = extract_forgery_token(&page)
            .ok_or_else(|| GymClientError::Login(login_url.clone()))?
            .to_string();

        let form = [
            ("email", config.email.as_str()),
            ("pin", config.pin.expose_secret()),
            ("forgeryToken", token.as_str()),
        ];
        let body = self
            .client
            .post(&login_url)
            .form(&form)
            .send()
            .await?
            .text()
            .await?;

        if !body.contains("Welcome") {
            return Err(GymClientError::Login(login_url));
        }

        tracing::debug!("portal login succeeded for {}", config.email);
        Ok(GymSession {
            base_url: self.base_url,
            client: self.client,
        })
    }
}

/// An authenticated portal session: the cookie jar from a successful login.
///
/// Reused serially across per-gym queries; dropped at process end. There is
/// no renewal — a long-lived process would need to log in again.
#[derive(Debug)]
pub struct GymSession {
    base_url: String,
    client: reqwest::Client,
}

impl GymSession {
    /// Query the current busyness of one branch.
    ///
    /// Returns `Ok(None)` on any non-200 status rather than an error; the
    /// caller decides whether a missing reading matters.
    pub async fn branch_occupancy(
        &self,
        gym_id: &str,
    ) -> Result<Option<BranchOccupancy>, GymClientError> {
        let url = format!("{}{}", self.base_url, BUSYNESS_PATH);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("branchId", gym_id),
                ("configurationId", BUSYNESS_CONFIGURATION_ID),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!("busyness query for branch {gym_id} returned {status}");
            return Ok(None);
        }
        Ok(Some(resp.json::<BranchOccupancy>().await?))
    }
}

#[async_trait]
impl OccupancySource for GymSession {
    async fn branch_occupancy(
        &self,
        gym_id: &str,
    ) -> Result<Option<BranchOccupancy>, GymClientError> {
        GymSession::branch_occupancy(self, gym_id).await
    }
}
