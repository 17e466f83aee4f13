//! Track list input and catalog output files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::models::{OutputSong, TrackQuery};

/// Read a JSON array of `{title, artist, fallback_year}` records.
pub fn read_tracks(path: &Path) -> Result<Vec<TrackQuery>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open track list '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse track list '{}'", path.display()))
}

/// Write the catalog as a pretty-printed JSON array of `[title, artist, year]`.
pub fn write_songs(path: &Path, songs: &[OutputSong]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, songs).context("Failed to serialize catalog")?;
    writer.write_all(b"\n")?;
    writer.flush().context("Failed to flush output file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.json");
        fs::write(
            &path,
            r#"[
                {"title": "Yesterday", "artist": "The Beatles", "fallback_year": 2009},
                {"title": "Jóga", "artist": "Björk", "fallback_year": null},
                {"title": "Untitled", "artist": "Unknown"}
            ]"#,
        )
        .unwrap();

        let tracks = read_tracks(&path).unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0], TrackQuery::new("Yesterday", "The Beatles", Some(2009)));
        assert_eq!(tracks[1].artist, "Björk");
        assert_eq!(tracks[1].fallback_year, None);
        assert_eq!(tracks[2].fallback_year, None);
    }

    #[test]
    fn test_read_tracks_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tracks(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open track list"));
    }

    #[test]
    fn test_read_tracks_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.json");
        fs::write(&path, r#"[{"title": "No artist"}]"#).unwrap();
        let err = read_tracks(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse track list"));
    }

    #[test]
    fn test_write_songs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hitster_songs.json");
        let songs = vec![
            OutputSong {
                title: "Yesterday".into(),
                artist: "The Beatles".into(),
                year: 1965,
            },
            OutputSong {
                title: "Jóga".into(),
                artist: "Björk".into(),
                year: 1997,
            },
        ];

        write_songs(&path, &songs).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        // non-ASCII kept as-is
        assert!(written.contains("Björk"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            serde_json::json!([["Yesterday", "The Beatles", 1965], ["Jóga", "Björk", 1997]])
        );
    }
}
