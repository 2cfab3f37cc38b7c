mod export;


use std::path::PathBuf;

use clap::{Parser, Subcommand};
use insight_analysis::{smart_search, suggest_keywords, Analyzer, ThemeManager};
use insight_core::{AnalysisResult, AppConfig, ConfigError};
use insight_gemini::GeminiClient;
use insight_store::FsStore;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "insight-cli")]
#[command(about = "Reddit market-research analysis from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run (or load from cache) the full analysis for a query.
    Analyze {
        query: String,
        /// Skip the cache and re-run grounding + synthesis.
        #[arg(long)]
        refresh: bool,
        /// Print the raw JSON document instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Suggest related keywords for a research theme.
    Keywords { theme: String },
    /// Answer a question from Reddit discussions, with sources.
    Search { question: String },
    /// Manage the theme watchlist.
    Themes {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Export a cached analysis as CSV files. Never calls the backend.
    Export {
        query: String,
        /// Output directory for the CSV files.
        #[arg(long, default_value = "./export")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum ThemeCommands {
    /// Create a theme; keywords are suggested by the backend.
    Add { name: String },
    List,
    /// Flip a theme's active flag.
    Toggle { id: Uuid },
    Remove { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match insight_core::load_app_config() {
        Ok(config) => config,
        Err(e @ ConfigError::MissingEnvVar(_)) => {
            // The credential gates every backend call; without it nothing can
            // run, so fail up front with one clear notice.
            anyhow::bail!("{e}\nSet GEMINI_API_KEY (e.g. in .env) and try again.");
        }
        Err(e) => return Err(e.into()),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Analyze {
            query,
            refresh,
            json,
        } => run_analyze(&config, &query, refresh, json).await,
        Commands::Keywords { theme } => run_keywords(&config, &theme).await,
        Commands::Search { question } => run_search(&config, &question).await,
        Commands::Themes { command } => run_themes(&config, command).await,
        Commands::Export { query, out } => run_export(&config, &query, &out),
    }
}

fn build_client(config: &AppConfig) -> anyhow::Result<GeminiClient> {
    Ok(GeminiClient::with_base_url(
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout_secs,
        &config.gemini_base_url,
    )?)
}

fn cache_store(config: &AppConfig) -> anyhow::Result<FsStore> {
    Ok(FsStore::open(&config.cache_dir)?)
}

async fn run_analyze(
    config: &AppConfig,
    query: &str,
    refresh: bool,
    json: bool,
) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(build_client(config)?, cache_store(config)?);
    let result = analyzer.analyze(query, refresh).await?;

    mark_matching_theme(config, query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(query, &result);
    }
    Ok(())
}

async fn run_keywords(config: &AppConfig, theme: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let keywords = suggest_keywords(&client, theme).await?;
    for keyword in keywords {
        println!("{keyword}");
    }
    Ok(())
}

async fn run_search(config: &AppConfig, question: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let answer = smart_search(&client, question).await?;
    println!("{}", answer.summary);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for source in answer.sources {
            println!("  {}  {}", source.title, source.url);
        }
    }
    Ok(())
}

async fn run_themes(config: &AppConfig, command: ThemeCommands) -> anyhow::Result<()> {
    let manager = ThemeManager::new(cache_store(config)?);
    match command {
        ThemeCommands::Add { name } => {
            let client = build_client(config)?;
            let keywords = suggest_keywords(&client, &name).await?;
            let theme = manager.add(&name, keywords)?;
            println!("added theme {} ({})", theme.name, theme.id);
            for keyword in theme.keywords {
                println!("  {keyword}");
            }
        }
        ThemeCommands::List => {
            for theme in manager.list()? {
                let flag = if theme.is_active { "active" } else { "paused" };
                let analyzed = theme
                    .last_analyzed
                    .map_or_else(|| "never analyzed".to_string(), |t| t.to_rfc3339());
                println!("{}  {}  [{}]  {}", theme.id, theme.name, flag, analyzed);
            }
        }
        ThemeCommands::Toggle { id } => {
            if manager.toggle(id)? {
                println!("toggled {id}");
            } else {
                println!("no theme with id {id}");
            }
        }
        ThemeCommands::Remove { id } => {
            if manager.remove(id)? {
                println!("removed {id}");
            } else {
                println!("no theme with id {id}");
            }
        }
    }
    Ok(())
}

fn run_export(config: &AppConfig, query: &str, out: &std::path::Path) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(build_client(config)?, cache_store(config)?);
    let Some(result) = analyzer.cache().get(query) else {
        anyhow::bail!("no cached analysis for \"{query}\"; run `analyze` first");
    };
    let written = export::write_analysis_csv(&result, out)?;
    if written.is_empty() {
        println!("cached analysis has no tabular data to export");
    } else {
        for name in written {
            println!("wrote {}", out.join(name).display());
        }
    }
    Ok(())
}

/// Stamps the watchlist entry matching `query` (by name, case-insensitive)
/// as analyzed. Absence of a match is not an error.
fn mark_matching_theme(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let manager = ThemeManager::new(cache_store(config)?);
    let folded = query.trim().to_lowercase();
    for theme in manager.list()? {
        if theme.name.trim().to_lowercase() == folded {
            manager.mark_analyzed(theme.id)?;
        }
    }
    Ok(())
}

fn print_summary(query: &str, result: &AnalysisResult) {
    println!("Analysis for \"{query}\"");
    if let Some(updated) = result.meta.last_updated {
        println!(
            "  sample: {} posts ({}), updated {}",
            result.meta.fetched_post_count,
            result.meta.fetch_mode,
            updated.to_rfc3339()
        );
    }

    let metrics = &result.metrics;
    println!(
        "  volume {} ({:+.1}%), engagement {:.1}%, ~{} active users, {} active trends",
        metrics.total_posts_volume,
        metrics.total_posts_growth,
        metrics.engagement_rate,
        metrics.active_users,
        metrics.active_trends
    );

    if !result.topics.is_empty() {
        println!("\nTopics:");
        for topic in &result.topics {
            println!(
                "  {}  vol {}  growth {:+.1}%  sentiment {:.0}",
                topic.title, topic.volume, topic.growth, topic.sentiment
            );
        }
    }
    if !result.subreddits.is_empty() {
        println!("\nSubreddits:");
        for sub in &result.subreddits {
            println!(
                "  {}  {} members  {:.1}% of sample",
                sub.name, sub.member_count, sub.percentage
            );
        }
    }
    if !result.brands.is_empty() {
        println!("\nBrands:");
        for brand in &result.brands {
            println!(
                "  {}  {} mentions  yoy {:+.1}%  pos/neu/neg {:.0}/{:.0}/{:.0}",
                brand.name,
                brand.mentions,
                brand.yoy_growth,
                brand.sentiment.pos,
                brand.sentiment.neu,
                brand.sentiment.neg
            );
        }
    }
}
