//! Core data models for the year-resolution pipeline.
//!
//! This module contains the input records, the metadata-service shapes the
//! resolver works on, and the output catalog types.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Input
// ============================================================================

/// One track handed over by the playlist collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
    /// Year reported by the playlist source, used only as a fallback.
    #[serde(default)]
    pub fallback_year: Option<i32>,
}

impl TrackQuery {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        fallback_year: Option<i32>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            fallback_year,
        }
    }

    /// Label used in progress lines and the skip log: "artist – title".
    pub fn label(&self) -> String {
        format!("{} – {}", self.artist, self.title)
    }
}

// ============================================================================
// Metadata Service Models
// ============================================================================

/// A single artist-credit entry on a recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistCredit {
    /// Name as credited on the recording (may differ for collaborations)
    pub name: String,
    /// Canonical name of the linked artist, when the credit carries an identity
    pub artist: Option<String>,
}

impl ArtistCredit {
    pub fn linked(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: Some(artist.into()),
        }
    }

    pub fn unlinked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: None,
        }
    }
}

/// Recording returned by a metadata search. Scoped to one resolution call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub artist_credits: Vec<ArtistCredit>,
}

impl Candidate {
    /// First credit with a linked artist identity.
    pub fn primary_credit(&self) -> Option<&ArtistCredit> {
        self.artist_credits.iter().find(|c| c.artist.is_some())
    }

    /// Linked name of [`Candidate::primary_credit`].
    /// Returns None when no credit carries one (or the linked name is empty),
    /// which callers must treat as "unknown", not as a mismatch.
    pub fn primary_artist(&self) -> Option<&str> {
        self.primary_credit()
            .and_then(|c| c.artist.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// One release containing a recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub id: String,
    pub title: String,
    /// Free-form date: "YYYY", "YYYY-MM", "YYYY-MM-DD" or empty
    pub date: Option<String>,
}

impl Release {
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(release_year)
    }

    /// "Help! (1965) [id]" for diagnostics.
    pub fn describe(&self) -> String {
        let year = self
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "????".to_string());
        format!("{} ({}) [{}]", self.title, year, self.id)
    }
}

/// Release with the lowest year. Ties keep the first one seen.
pub fn earliest_release(releases: &[Release]) -> Option<(i32, &Release)> {
    releases
        .iter()
        .filter_map(|r| r.year().map(|y| (y, r)))
        .min_by_key(|(y, _)| *y)
}

/// Extract the leading 4-digit year from a release date string.
/// Returns None for absent, empty, or non-year-prefixed dates, and for year 0.
pub fn release_year(date: &str) -> Option<i32> {
    let prefix = date.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<i32>().ok().filter(|&y| y > 0)
}

// ============================================================================
// Resolution
// ============================================================================

/// Where a resolved year came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSource {
    MetadataService,
    Fallback,
    None,
}

impl fmt::Display for YearSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            YearSource::MetadataService => "MusicBrainz",
            YearSource::Fallback => "fallback",
            YearSource::None => "-",
        };
        f.write_str(label)
    }
}

/// Outcome for one track. Produced once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionResult {
    pub year: Option<i32>,
    pub source: YearSource,
}

impl ResolutionResult {
    /// Pick between the resolver's year and the playlist fallback.
    pub fn decide(resolved: Option<i32>, fallback: Option<i32>) -> Self {
        match (resolved, fallback) {
            (Some(year), _) => Self {
                year: Some(year),
                source: YearSource::MetadataService,
            },
            (None, Some(year)) => Self {
                year: Some(year),
                source: YearSource::Fallback,
            },
            (None, None) => Self {
                year: None,
                source: YearSource::None,
            },
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Row of the Hitster catalog. Serialized as `[title, artist, year]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSong {
    pub title: String,
    pub artist: String,
    pub year: i32,
}

impl Serialize for OutputSong {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.title, &self.artist, self.year).serialize(serializer)
    }
}

/// Full run result: songs in input order plus the skip log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub songs: Vec<OutputSong>,
    pub skipped: Vec<String>,
}
