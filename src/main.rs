use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use castsense::config::AppConfig;
use castsense::dune::DuneClient;
use castsense::neynar::NeynarClient;
use castsense::openai::OpenAiClient;
use castsense::server;

#[derive(Parser)]
#[command(name = "castsense", about = "Farcaster analytics frame server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the frame server.
    Serve(ServeArgs),
    /// Fetch one reshaped metric for a FID and print it as JSON.
    Fetch(FetchArgs),
    /// Summarize the replies under a cast.
    Summarize(SummarizeArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct FetchArgs {
    #[arg(long)]
    fid: u64,
    #[arg(long)]
    metric: String,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct SummarizeArgs {
    #[arg(long)]
    hash: String,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    Stats,
    ActiveHours,
    Channels,
    Tiers,
    TopCast,
    Words,
    Recommendations,
}

impl Metric {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "stats" => Some(Metric::Stats),
            "hours" | "active-hours" => Some(Metric::ActiveHours),
            "channels" => Some(Metric::Channels),
            "tiers" => Some(Metric::Tiers),
            "top-cast" | "cast" => Some(Metric::TopCast),
            "words" => Some(Metric::Words),
            "recs" | "recommendations" => Some(Metric::Recommendations),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("castsense=info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_serve(args).await,
        Command::Fetch(args) => run_fetch(args).await,
        Command::Summarize(args) => run_summarize(args).await,
    }
}

async fn run_serve(args: ServeArgs) -> Result<(), String> {
    let (mut config, _) = AppConfig::load(args.config)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    server::serve(config).await
}

async fn run_fetch(args: FetchArgs) -> Result<(), String> {
    let (config, _) = AppConfig::load(args.config)?;
    let dune = DuneClient::from_config(&config.dune)?;
    let metric = Metric::from_str(&args.metric)
        .ok_or_else(|| format!("invalid metric: {}", args.metric))?;

    let value = match metric {
        Metric::Stats => serde_json::Value::Object(dune.fid_stats(args.fid).await?),
        Metric::ActiveHours => to_json(&dune.active_hours(args.fid).await?)?,
        Metric::Channels => to_json(&dune.top_channels(args.fid).await?)?,
        Metric::Tiers => to_json(&dune.follower_tiers(args.fid).await?)?,
        Metric::TopCast => serde_json::Value::Object(dune.top_cast(args.fid).await?),
        Metric::Words => to_json(&dune.trending_words(args.fid).await?)?,
        Metric::Recommendations => to_json(&dune.recommendations(args.fid).await?)?,
    };

    let rendered = serde_json::to_string_pretty(&value)
        .map_err(|err| format!("failed to render metric: {}", err))?;
    println!("{}", rendered);
    Ok(())
}

async fn run_summarize(args: SummarizeArgs) -> Result<(), String> {
    let (config, _) = AppConfig::load(args.config)?;
    let neynar = NeynarClient::from_config(&config.neynar)?;
    let openai =
        OpenAiClient::from_config(&config.openai).ok_or("OPENAI_API_KEY is not set")?;

    let conversation = neynar.conversation(&args.hash).await?;
    let message = openai
        .summarize_replies(&conversation.cast_text, &conversation.replies)
        .await?;
    println!("{}", message);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|err| format!("failed to render metric: {}", err))
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
