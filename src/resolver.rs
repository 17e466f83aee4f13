//! Original release year resolution.
//!
//! Given a (title, artist) pair from a playlist, search MusicBrainz for
//! recordings, drop the ones credited to somebody else (covers), and take the
//! earliest release year over every release of the surviving recordings.

use crate::models::{earliest_release, Candidate};
use crate::musicbrainz::{MetadataService, MAX_SEARCH_LIMIT};
use crate::normalize::{ArtistMatcher, ContainmentMatcher};

pub struct YearResolver<S> {
    service: S,
    matcher: Box<dyn ArtistMatcher>,
    search_limit: usize,
}

impl<S: MetadataService> YearResolver<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            matcher: Box::new(ContainmentMatcher),
            search_limit: MAX_SEARCH_LIMIT,
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn ArtistMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Number of search results to consider, clamped to 1..=MAX_SEARCH_LIMIT.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        self
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Earliest credible release year for the song, or None.
    ///
    /// A failed search gives up on the track. A failed release fetch only
    /// skips that candidate; years from the other candidates still count.
    pub fn resolve_original_year(&self, title: &str, artist: &str) -> Option<i32> {
        let candidates = match self
            .service
            .search_recordings(title, artist, self.search_limit)
        {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("[MB] Search failed for {} – {}: {}", artist, title, e);
                return None;
            }
        };

        if candidates.is_empty() {
            log::info!("[MB] No recordings found for {} – {}", artist, title);
            return None;
        }

        let mut earliest: Option<i32> = None;

        for candidate in candidates.iter().filter(|c| self.is_same_artist(artist, c)) {
            let releases = match self.service.fetch_releases(&candidate.id) {
                Ok(releases) => releases,
                Err(e) => {
                    log::warn!("[MB] Release fetch failed for {}: {}", candidate.id, e);
                    continue;
                }
            };

            let Some((year, release)) = earliest_release(&releases) else {
                continue;
            };
            log::debug!("{}: earliest release {}", candidate.id, release.describe());
            earliest = Some(earliest.map_or(year, |e| e.min(year)));
        }

        earliest
    }

    /// Unknown credits are kept; only a present, non-matching credit marks a cover.
    fn is_same_artist(&self, artist: &str, candidate: &Candidate) -> bool {
        let Some(credited) = candidate.primary_artist() else {
            return true;
        };
        let same = self.matcher.matches(artist, credited);
        if !same {
            let credited_as = candidate.primary_credit().map_or("", |c| c.name.as_str());
            log::debug!(
                "Skipping {} by '{}' credited as '{}' (searched '{}')",
                candidate.id,
                credited,
                credited_as,
                artist
            );
        }
        same
    }
}
