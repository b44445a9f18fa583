use anyhow::Result;
use cineasts::cache::ResponseCache;
use cineasts::catalog::MovieStream;
use cineasts::client::{ClientConfig, TmdbClient};
use cineasts::config;
use cineasts::cypher::CypherExporter;
use cineasts::stats::RunStats;
use cineasts::tables::TableExporter;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cineasts")]
#[command(about = "Export themoviedb.org movie metadata as Neo4j Cypher or relational CSV")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream Cypher bulk-load statements to stdout
    Cypher(ExportArgs),
    /// Write movies/people/actors/directors CSV tables into the cache directory
    Csv(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// API key from themoviedb.org
    #[arg(long)]
    api_key: String,

    /// Delay between requests in milliseconds, to avoid rate limit blocks
    #[arg(long, default_value_t = config::DEFAULT_DELAY_MS)]
    delay_ms: u64,

    /// Minimum vote count, used to filter out lesser-known films
    #[arg(long, default_value_t = config::DEFAULT_MIN_VOTES)]
    min_votes: u32,

    /// Discovery page to start from
    #[arg(long, default_value_t = 1)]
    start_page: u64,

    /// Stop after this many discovery pages (for testing)
    #[arg(long)]
    limit: Option<u64>,

    /// Directory for cached API responses and CSV output
    #[arg(long, default_value = config::DEFAULT_CACHE_DIR)]
    cache_dir: String,
}

fn build_client(args: &ExportArgs) -> Result<TmdbClient> {
    let cache = ResponseCache::new(&args.cache_dir)?;
    let client_config = ClientConfig {
        api_key: args.api_key.clone(),
        base_url: config::API_BASE.to_string(),
        delay: Duration::from_millis(args.delay_ms),
        min_votes: args.min_votes,
    };
    TmdbClient::new(client_config, cache)
}

fn run_cypher(args: ExportArgs) -> Result<()> {
    let client = build_client(&args)?;
    let stats = RunStats::new();
    let start = Instant::now();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut exporter = CypherExporter::new(&client, &stats, &mut out);
    exporter.write_preamble()?;

    let pb = make_spinner();
    for movie in MovieStream::new(&client, &stats, args.start_page, args.limit) {
        pb.set_message(movie.title.clone());
        exporter.write_movie(&movie)?;
        pb.inc(1);
    }
    exporter.finish()?;
    pb.finish_and_clear();

    print_summary(&stats, start.elapsed());
    Ok(())
}

fn run_csv(args: ExportArgs) -> Result<()> {
    let client = build_client(&args)?;
    let stats = RunStats::new();
    let start = Instant::now();

    let mut exporter = TableExporter::create(&client, &stats, Path::new(&args.cache_dir))?;

    let pb = make_spinner();
    for movie in MovieStream::new(&client, &stats, args.start_page, args.limit) {
        pb.set_message(movie.title.clone());
        exporter.write_movie(&movie)?;
        pb.inc(1);
    }
    exporter.finish()?;
    pb.finish_and_clear();

    print_summary(&stats, start.elapsed());
    Ok(())
}

fn make_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {pos} movies  {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_summary(stats: &RunStats, elapsed: Duration) {
    eprintln!();
    eprintln!("=== Summary ===");
    eprintln!("Total time:         {:.2}s", elapsed.as_secs_f64());
    eprintln!();
    eprintln!("Pages fetched:      {}", stats.pages());
    eprintln!("Pages failed:       {}", stats.page_failures());
    eprintln!("Movies resolved:    {}", stats.movies_resolved());
    eprintln!("Movies exported:    {}", stats.movies_exported());
    eprintln!("Missing credits:    {}", stats.movies_missing_credits());
    eprintln!("Unusable dates:     {}", stats.movies_undated());
    eprintln!("Movie failures:     {}", stats.movie_failures());
    eprintln!("People failures:    {}", stats.people_failures());
    eprintln!("Actor links:        {}", stats.actor_links());
    eprintln!("Director links:     {}", stats.director_links());
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr: stdout is the Cypher payload channel.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Cypher(args) => run_cypher(args),
        Commands::Csv(args) => run_csv(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
