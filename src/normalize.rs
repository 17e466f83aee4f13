//! Artist name normalization and matching for cover detection.
//!
//! The resolver asks an [`ArtistMatcher`] whether a recording's credited
//! artist is the artist we searched for. Anything that fails the check is
//! treated as a cover and dropped before release dates are looked at.
//!
//! CRITICAL: `normalize_artist` must stay idempotent. Run tests after changes.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Parenthesized segments: "(Remaster 2009)", "(feat. X)". Non-greedy.
pub static PAREN_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());

/// Bracketed segments: "[Live]"
pub static BRACKET_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());

/// "feat." and everything after it
pub static FEAT_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfeat\..*").unwrap());

/// "ft." and everything after it
pub static FT_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bft\..*").unwrap());

/// Anything that is not a word character or whitespace
pub static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Standalone "the" (not inside "theory", "bathe", ...)
pub static THE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bthe\b").unwrap());

/// Default similarity threshold for [`SimilarityMatcher`]
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

// ============================================================================
// NORMALIZATION FUNCTIONS
// ============================================================================

/// Normalize an artist name for comparison.
///
/// Lowercases, drops "(...)" and "[...]" segments, cuts at "feat."/"ft.",
/// strips punctuation, removes the word "the" and trims.
/// e.g., "The Beatles" → "beatles", "Artist (feat. Other)" → "artist"
pub fn normalize_artist(name: &str) -> String {
    let mut result = name.to_lowercase();
    result = PAREN_SEGMENT.replace_all(&result, "").to_string();
    result = BRACKET_SEGMENT.replace_all(&result, "").to_string();
    result = FEAT_TAIL.replace(&result, "").to_string();
    result = FT_TAIL.replace(&result, "").to_string();
    result = PUNCTUATION.replace_all(&result, "").to_string();
    result = THE_WORD.replace_all(&result, "").to_string();
    result.trim().to_string()
}

/// Loose artist comparison: equal after normalization, or one contains the other.
///
/// Biased toward false positives so that inconsistent crediting between the
/// playlist source and MusicBrainz does not drop the original artist.
/// Note that an empty name contains in everything.
pub fn artists_match(a: &str, b: &str) -> bool {
    let na = normalize_artist(a);
    let nb = normalize_artist(b);
    na == nb || na.contains(&nb) || nb.contains(&na)
}

// ============================================================================
// MATCHERS
// ============================================================================

/// Policy deciding whether two artist credits name the same artist.
pub trait ArtistMatcher {
    fn matches(&self, a: &str, b: &str) -> bool;
}

/// Default policy: [`artists_match`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentMatcher;

impl ArtistMatcher for ContainmentMatcher {
    fn matches(&self, a: &str, b: &str) -> bool {
        artists_match(a, b)
    }
}

/// Stricter policy: normalized Levenshtein similarity must reach `threshold`.
///
/// Rejects substring-only hits like "Queen" vs "Queens of the Stone Age".
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    pub threshold: f64,
}

impl SimilarityMatcher {
    /// Out-of-range thresholds are clamped; NaN falls back to the default.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_SIMILARITY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }
}

/// Parse a similarity threshold from the command line. Accepts 0.0..=1.0.
pub fn parse_similarity_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(format!("{} is not in 0.0..=1.0", value));
    }
    Ok(threshold)
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl ArtistMatcher for SimilarityMatcher {
    fn matches(&self, a: &str, b: &str) -> bool {
        let na = normalize_artist(a);
        let nb = normalize_artist(b);
        if na == nb {
            return true;
        }
        if na.is_empty() || nb.is_empty() {
            return false;
        }
        strsim::normalized_levenshtein(&na, &nb) >= self.threshold
    }
}

// ============================================================================
// TESTS
// ============================================================================
