//! Safety utilities to prevent clobbering the input.
//!
//! The catalog is written over whatever sits at the output path, so the path
//! is validated before any (slow, rate-limited) lookup work starts.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output must have a `.json` extension
/// - Output cannot be the same file as the track list
/// - Output cannot be an existing directory
///
/// # Arguments
/// * `output` - The catalog path that will be created/overwritten
/// * `input` - The track list that must not be overwritten
pub fn validate_output_path(output: &Path, input: &Path) -> Result<()> {
    let is_json = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        bail!(
            "Safety check failed: output file '{}' must have a .json extension",
            output.display()
        );
    }

    if output.is_dir() {
        bail!(
            "Safety check failed: output '{}' is a directory",
            output.display()
        );
    }

    let same = match (output.canonicalize(), input.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => output == input,
    };
    if same {
        bail!(
            "Safety check failed: output '{}' cannot be the same as input '{}'",
            output.display(),
            input.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_valid_output() {
        let output = PathBuf::from("/tmp/hitster_songs.json");
        let input = PathBuf::from("/data/playlist.json");
        assert!(validate_output_path(&output, &input).is_ok());
    }

    #[test]
    fn test_wrong_extension() {
        let output = PathBuf::from("/tmp/hitster_songs.txt");
        let input = PathBuf::from("/data/playlist.json");
        let result = validate_output_path(&output, &input);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must have a .json extension"));
    }

    #[test]
    fn test_output_equals_input() {
        let path = PathBuf::from("/data/playlist.json");
        let result = validate_output_path(&path, &path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot be the same as input"));
    }

    #[test]
    fn test_output_equals_input_via_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("playlist.json");
        fs::write(&input, "[]").unwrap();
        let output = dir.path().join(".").join("playlist.json");
        assert!(validate_output_path(&output, &input).is_err());
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("catalog.json");
        fs::create_dir(&output).unwrap();
        let input = dir.path().join("playlist.json");
        assert!(validate_output_path(&output, &input).is_err());
    }
}
