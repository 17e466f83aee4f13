//! MusicBrainz access.
//!
//! [`MetadataService`] is the seam the resolver talks to. [`MusicBrainzClient`]
//! is the HTTP implementation and [`RateLimited`] puts every call behind a
//! [`RateGate`].

use serde::Deserialize;
use std::time::Duration;

use crate::error::ServiceError;
use crate::models::{ArtistCredit, Candidate, Release};
use crate::rate_limit::RateGate;

pub const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// Upper bound on search results per track
pub const MAX_SEARCH_LIMIT: usize = 10;

// ============================================================================
// Service Contract
// ============================================================================

/// The two metadata calls the resolver needs.
pub trait MetadataService {
    /// Search recordings by title and artist, best matches first.
    fn search_recordings(
        &self,
        title: &str,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, ServiceError>;

    /// All releases that contain the given recording.
    fn fetch_releases(&self, recording_id: &str) -> Result<Vec<Release>, ServiceError>;
}

impl<S: MetadataService + ?Sized> MetadataService for &S {
    fn search_recordings(
        &self,
        title: &str,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, ServiceError> {
        (**self).search_recordings(title, artist, limit)
    }

    fn fetch_releases(&self, recording_id: &str) -> Result<Vec<Release>, ServiceError> {
        (**self).fetch_releases(recording_id)
    }
}

/// Wraps a service so that every call first waits on the gate.
pub struct RateLimited<S, G> {
    inner: S,
    gate: G,
}

impl<S: MetadataService, G: RateGate> RateLimited<S, G> {
    pub fn new(inner: S, gate: G) -> Self {
        Self { inner, gate }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: MetadataService, G: RateGate> MetadataService for RateLimited<S, G> {
    fn search_recordings(
        &self,
        title: &str,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, ServiceError> {
        self.gate.wait_turn();
        self.inner.search_recordings(title, artist, limit)
    }

    fn fetch_releases(&self, recording_id: &str) -> Result<Vec<Release>, ServiceError> {
        self.gate.wait_turn();
        self.inner.fetch_releases(recording_id)
    }
}

// ============================================================================
// Wire Models
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    recordings: Vec<MbRecording>,
}

#[derive(Debug, Deserialize)]
struct MbRecording {
    id: String,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<MbArtistCredit>,
    #[serde(default)]
    releases: Vec<MbRelease>,
}

#[derive(Debug, Deserialize)]
struct MbArtistCredit {
    #[serde(default)]
    name: String,
    artist: Option<MbArtist>,
}

#[derive(Debug, Deserialize)]
struct MbArtist {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MbRelease {
    id: String,
    #[serde(default)]
    title: String,
    date: Option<String>,
}

impl From<MbRecording> for Candidate {
    fn from(rec: MbRecording) -> Self {
        Candidate {
            id: rec.id,
            artist_credits: rec
                .artist_credit
                .into_iter()
                .map(|c| ArtistCredit {
                    name: c.name,
                    artist: c.artist.map(|a| a.name),
                })
                .collect(),
        }
    }
}

impl From<MbRelease> for Release {
    fn from(rel: MbRelease) -> Self {
        Release {
            id: rel.id,
            title: rel.title,
            date: rel.date,
        }
    }
}

/// Parse a `/recording?query=` response body.
pub fn parse_search_response(body: &str) -> Result<Vec<Candidate>, ServiceError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.recordings.into_iter().map(Candidate::from).collect())
}

/// Parse a `/recording/<id>?inc=releases` response body.
pub fn parse_recording_releases(body: &str) -> Result<Vec<Release>, ServiceError> {
    let recording: MbRecording = serde_json::from_str(body)?;
    Ok(recording.releases.into_iter().map(Release::from).collect())
}

// ============================================================================
// Query Building
// ============================================================================

/// Escape Lucene query syntax characters.
pub fn lucene_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '+' | '-' | '&' | '|' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~'
                | '*' | '?' | ':' | '\\' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the recording search query, e.g. `recording:(yesterday) artist:(the beatles)`.
pub fn recording_query(title: &str, artist: &str) -> String {
    format!(
        "recording:({}) artist:({})",
        lucene_escape(&title.to_lowercase()),
        lucene_escape(&artist.to_lowercase())
    )
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Connection settings for [`MusicBrainzClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Contact (email or URL) sent in the User-Agent, required by MusicBrainz
    pub contact: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(contact: impl Into<String>) -> Self {
        Self {
            base_url: MUSICBRAINZ_BASE_URL.to_string(),
            contact: contact.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} ( {} )",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.contact
        )
    }
}

/// Blocking MusicBrainz web-service client. Does no pacing of its own.
pub struct MusicBrainzClient {
    http_client: ureq::Agent,
    base_url: String,
}

impl MusicBrainzClient {
    pub fn new(config: &ClientConfig) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .user_agent(&config.user_agent())
            .timeout_connect(Duration::from_secs(5))
            .timeout(config.timeout)
            .build();

        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ServiceError> {
        log::debug!("GET {} {:?}", url, query);
        let mut request = self
            .http_client
            .get(url)
            .set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        let response = request.call()?;
        response
            .into_string()
            .map_err(|e| ServiceError::Transport(format!("failed to read response: {}", e)))
    }
}

impl MetadataService for MusicBrainzClient {
    fn search_recordings(
        &self,
        title: &str,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, ServiceError> {
        let url = format!("{}/recording", self.base_url);
        let query = recording_query(title, artist);
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();
        let body = self.get(
            &url,
            &[("query", query.as_str()), ("limit", limit.as_str()), ("fmt", "json")],
        )?;
        parse_search_response(&body)
    }

    fn fetch_releases(&self, recording_id: &str) -> Result<Vec<Release>, ServiceError> {
        let url = format!("{}/recording/{}", self.base_url, recording_id);
        let body = self.get(&url, &[("inc", "releases"), ("fmt", "json")])?;
        parse_recording_releases(&body)
    }
}
