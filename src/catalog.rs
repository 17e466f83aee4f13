//! Turns a track list into a Hitster catalog.
//!
//! Tracks are resolved one at a time, strictly in input order. A track that
//! gets no year from MusicBrainz falls back to the playlist year; a track
//! with neither lands in the skip log.

use crate::models::{Catalog, OutputSong, ResolutionResult, TrackQuery};
use crate::musicbrainz::MetadataService;
use crate::resolver::YearResolver;

/// Progress hooks, called around each track.
pub trait CatalogObserver {
    /// Before the lookup. `index` is 1-based.
    fn track_started(&mut self, _index: usize, _total: usize, _track: &TrackQuery) {}

    fn track_finished(
        &mut self,
        _index: usize,
        _total: usize,
        _track: &TrackQuery,
        _result: &ResolutionResult,
    ) {
    }
}

/// Observer that ignores everything.
pub struct Silent;

impl CatalogObserver for Silent {}

/// Resolve a single track, applying the fallback rule.
pub fn resolve_track<S: MetadataService>(
    resolver: &YearResolver<S>,
    track: &TrackQuery,
) -> ResolutionResult {
    let resolved = resolver.resolve_original_year(&track.title, &track.artist);
    ResolutionResult::decide(resolved, track.fallback_year)
}

/// Resolve every track and collect the catalog.
pub fn build_catalog<S: MetadataService>(
    resolver: &YearResolver<S>,
    tracks: &[TrackQuery],
    observer: &mut dyn CatalogObserver,
) -> Catalog {
    let total = tracks.len();
    let mut catalog = Catalog::default();

    for (i, track) in tracks.iter().enumerate() {
        let index = i + 1;
        observer.track_started(index, total, track);

        let result = resolve_track(resolver, track);
        match result.year {
            Some(year) => catalog.songs.push(OutputSong {
                title: track.title.clone(),
                artist: track.artist.clone(),
                year,
            }),
            None => catalog.skipped.push(track.label()),
        }

        observer.track_finished(index, total, track, &result);
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearSource;
    use crate::resolver::tests::{candidate, unthrottled, FakeService};

    #[derive(Default)]
    struct Recorder {
        started: Vec<usize>,
        finished: Vec<(usize, ResolutionResult)>,
    }

    impl CatalogObserver for Recorder {
        fn track_started(&mut self, index: usize, _total: usize, _track: &TrackQuery) {
            self.started.push(index);
        }

        fn track_finished(
            &mut self,
            index: usize,
            _total: usize,
            _track: &TrackQuery,
            result: &ResolutionResult,
        ) {
            self.finished.push((index, *result));
        }
    }

    #[test]
    fn test_remaster_resolves_to_original() {
        let service = FakeService::default()
            .with_search("Yesterday", vec![candidate("rec-1", Some("The Beatles"))])
            .with_releases("rec-1", &["1965-08-06", "2009-09-09"]);
        let resolver = unthrottled(&service);
        let track = TrackQuery::new("Yesterday", "The Beatles", Some(2009));

        let result = resolve_track(&resolver, &track);
        assert_eq!(result.year, Some(1965));
        assert_eq!(result.source, YearSource::MetadataService);
    }

    #[test]
    fn test_fallback_year_used() {
        let service = FakeService::default();
        let resolver = unthrottled(&service);
        let track = TrackQuery::new("Obscure", "Unknown Band", Some(2001));

        let result = resolve_track(&resolver, &track);
        assert_eq!(result.year, Some(2001));
        assert_eq!(result.source, YearSource::Fallback);
    }

    #[test]
    fn test_unresolvable_track_is_skipped() {
        let service = FakeService::default();
        let resolver = unthrottled(&service);
        let tracks = vec![TrackQuery::new("Obscure", "Unknown Band", None)];

        let catalog = build_catalog(&resolver, &tracks, &mut Silent);
        assert!(catalog.songs.is_empty());
        assert_eq!(catalog.skipped, vec!["Unknown Band – Obscure".to_string()]);
    }

    #[test]
    fn test_catalog_keeps_input_order() {
        let service = FakeService::default()
            .with_search("Yesterday", vec![candidate("rec-1", Some("The Beatles"))])
            .with_releases("rec-1", &["1965-08-06", "2009"])
            .with_failed_search("Wonderwall");
        let resolver = unthrottled(&service);
        let tracks = vec![
            TrackQuery::new("Wonderwall", "Oasis", Some(1995)),
            TrackQuery::new("Lost", "Nobody", None),
            TrackQuery::new("Yesterday", "The Beatles", Some(2009)),
        ];

        let mut recorder = Recorder::default();
        let catalog = build_catalog(&resolver, &tracks, &mut recorder);

        let rows: Vec<_> = catalog
            .songs
            .iter()
            .map(|s| (s.title.as_str(), s.year))
            .collect();
        assert_eq!(rows, vec![("Wonderwall", 1995), ("Yesterday", 1965)]);
        assert_eq!(catalog.skipped, vec!["Nobody – Lost".to_string()]);

        assert_eq!(recorder.started, vec![1, 2, 3]);
        let sources: Vec<_> = recorder.finished.iter().map(|(_, r)| r.source).collect();
        assert_eq!(
            sources,
            vec![YearSource::Fallback, YearSource::None, YearSource::MetadataService]
        );
    }

    #[test]
    fn test_empty_track_list() {
        let service = FakeService::default();
        let resolver = unthrottled(&service);
        let catalog = build_catalog(&resolver, &[], &mut Silent);
        assert_eq!(catalog, Catalog::default());
        assert!(service.calls.borrow().is_empty());
    }
}
