use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use hitster_catalog::catalog::build_catalog;
use hitster_catalog::files::{read_tracks, write_songs};
use hitster_catalog::musicbrainz::{
    ClientConfig, MusicBrainzClient, RateLimited, MUSICBRAINZ_BASE_URL,
};
use hitster_catalog::normalize::{
    parse_similarity_threshold, ArtistMatcher, ContainmentMatcher, SimilarityMatcher,
};
use hitster_catalog::progress::{format_duration, set_log_only, BarAwareLogger, ConsoleProgress};
use hitster_catalog::rate_limit::MinIntervalGate;
use hitster_catalog::resolver::YearResolver;
use hitster_catalog::safety::validate_output_path;

#[derive(Parser)]
#[command(name = "hitster-catalog")]
#[command(about = "Build a Hitster song catalog with original release years from MusicBrainz")]
struct Args {
    /// Track list: JSON array of {title, artist, fallback_year}
    input: PathBuf,

    #[arg(default_value = "hitster_songs.json")]
    output: PathBuf,

    /// Contact (email or URL) for the MusicBrainz User-Agent
    #[arg(long, env = "HITSTER_CONTACT")]
    contact: Option<String>,

    /// Minimum gap between MusicBrainz calls
    #[arg(long, default_value = "1100", value_parser = clap::value_parser!(u64).range(1100..))]
    min_interval_ms: u64,

    /// Search results to consider per track
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=10))]
    limit: u64,

    #[arg(long, value_enum, default_value_t = MatcherKind::Containment)]
    matcher: MatcherKind,

    /// Only used with --matcher similarity
    #[arg(long, default_value = "0.85", value_parser = parse_similarity_threshold)]
    similarity_threshold: f64,

    #[arg(long, env = "MUSICBRAINZ_URL", default_value = MUSICBRAINZ_BASE_URL)]
    musicbrainz_url: String,

    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Hide the progress bar, print plain lines
    #[arg(long)]
    log_only: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MatcherKind {
    /// Equal or substring after normalization
    Containment,
    /// Normalized edit-distance similarity
    Similarity,
}

fn main() -> Result<()> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).build();
    BarAwareLogger::new(logger).init()?;

    let args = Args::parse();
    set_log_only(args.log_only);

    let contact = match args.contact.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => bail!(
            "Set HITSTER_CONTACT (or pass --contact) to an email or URL.\n\
             MusicBrainz requires an identifying User-Agent for API access."
        ),
    };

    validate_output_path(&args.output, &args.input)?;

    let start = Instant::now();

    println!("Reading track list: {:?}", args.input);
    let tracks = read_tracks(&args.input)?;
    println!("Found {} tracks.\n", tracks.len());

    let mut config = ClientConfig::new(contact);
    config.base_url = args.musicbrainz_url;
    config.timeout = Duration::from_secs(args.timeout_secs);

    let interval = Duration::from_millis(args.min_interval_ms);
    let service = RateLimited::new(MusicBrainzClient::new(&config), MinIntervalGate::new(interval));

    let matcher: Box<dyn ArtistMatcher> = match args.matcher {
        MatcherKind::Containment => Box::new(ContainmentMatcher),
        MatcherKind::Similarity => Box::new(SimilarityMatcher::new(args.similarity_threshold)),
    };
    let resolver = YearResolver::new(service)
        .with_matcher(matcher)
        .with_search_limit(args.limit as usize);

    println!(
        "Looking up original release years via MusicBrainz (at least {} per call) ...\n",
        format_duration(interval)
    );

    let mut progress = ConsoleProgress::new(tracks.len());
    let catalog = build_catalog(&resolver, &tracks, &mut progress);
    progress.finish(catalog.songs.len());

    write_songs(&args.output, &catalog.songs)?;

    println!("\n{:=<60}", "");
    println!("Done!  Saved {} songs to {:?}.", catalog.songs.len(), args.output);
    println!("  Elapsed: {}", format_duration(start.elapsed()));
    println!("{:=<60}", "");

    if !catalog.skipped.is_empty() {
        println!("\nSkipped {} tracks (no year found):", catalog.skipped.len());
        for s in &catalog.skipped {
            println!("  - {}", s);
        }
    }

    Ok(())
}
