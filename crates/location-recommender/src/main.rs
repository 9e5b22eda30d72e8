//! Outsourcing Location Recommender CLI
//!
//! Ranks outsourcing locations for a service type and headcount and compares
//! the top pick against in-house US staffing.
//!
//! Usage:
//!   recommend-locations --data-dir data --service customer-service \
//!                       --agents 50 --region latin-america --region asia

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use location_recommender::report::{render_text, RecommendationReport};
use location_recommender::session::SessionStore;
use location_recommender::{
    loader, parse_agent_count, recommend_with, RecommendationRequest, RoiComparison, RoiConfig,
    ScorerConfig, DEFAULT_AGENT_COUNT,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "recommend-locations",
    about = "Rank outsourcing locations against an in-house US baseline"
)]
struct Args {
    /// Directory holding the reference JSON tables
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Service type key (e.g. customer-service, sales, tech-support)
    #[arg(short, long)]
    service: Option<String>,

    /// Number of agents; unparseable values fall back to 50
    #[arg(short, long)]
    agents: Option<String>,

    /// Region id to include (repeatable; "all" disables filtering)
    #[arg(short, long = "region")]
    regions: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file overriding scoring constants
    #[arg(long)]
    scoring_config: Option<PathBuf>,

    /// Directory for the saved last request
    #[arg(long, default_value = ".session")]
    session_dir: PathBuf,

    /// Fill missing flags from the saved last request
    #[arg(long)]
    restore: bool,

    /// Clear the saved last request and exit
    #[arg(long)]
    reset: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the report
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("Outsourcing Location Recommender");
    info!("{}", "=".repeat(60));

    let session = SessionStore::new(&args.session_dir);
    if args.reset {
        session.clear();
        info!("Saved request cleared");
        return Ok(());
    }

    let data = loader::load_reference_data(&args.data_dir).with_context(|| {
        format!(
            "Failed to load data from {}. Check the data directory and try again.",
            args.data_dir.display()
        )
    })?;

    let saved = if args.restore { session.load() } else { None };
    let request = build_request(&args, saved)?;

    if !data.is_known_service(&request.service_type) {
        warn!(
            "No US baseline for service {:?}; using customer-service rates",
            request.service_type
        );
    }

    let scorer_config = match &args.scoring_config {
        Some(path) => load_scorer_config(path)?,
        None => ScorerConfig::default(),
    };
    let roi_config = RoiConfig {
        monthly_hours: scorer_config.monthly_hours,
        ..RoiConfig::default()
    };

    session.save(&request);

    let results = recommend_with(&request, &data, &scorer_config);
    let roi = RoiComparison::from_top_result(&request, &data, &results, &roi_config);

    info!("{} recommendations", results.len());

    let rendered = match args.format {
        OutputFormat::Text => render_text(&results, &request, roi.as_ref()),
        OutputFormat::Json => {
            let report = RecommendationReport::new(request, results, roi);
            serde_json::to_string_pretty(&report)?
        }
    };

    match &args.output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, rendered)
                .with_context(|| format!("failed writing output: {}", path.display()))?;
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Merge CLI flags with the saved request; flags win
fn build_request(
    args: &Args,
    saved: Option<RecommendationRequest>,
) -> Result<RecommendationRequest> {
    let service_type = args
        .service
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| saved.as_ref().map(|s| s.service_type.clone()));
    let Some(service_type) = service_type else {
        bail!("Please select a service type (--service)");
    };

    let agent_count = match (&args.agents, &saved) {
        (Some(raw), _) => parse_agent_count(raw),
        // A restored zero is coerced like a flag value
        (None, Some(saved)) => match saved.agent_count {
            0 => DEFAULT_AGENT_COUNT,
            n => n,
        },
        (None, None) => DEFAULT_AGENT_COUNT,
    };

    let selected_regions = match (args.regions.is_empty(), saved) {
        (true, Some(saved)) => saved.selected_regions,
        _ => args.regions.clone(),
    };

    Ok(RecommendationRequest::new(agent_count, service_type, selected_regions))
}

fn load_scorer_config(path: &Path) -> Result<ScorerConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed reading scoring config: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed parsing scoring config: {}", path.display()))
}
