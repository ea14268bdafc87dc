use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tubetrend::dataset::Dataset;
use tubetrend::dataset::models::{
    CategorySentiment, FilterCriteria, LeaderboardRow, RankMetric, Summary, TrendPoint,
    trending_date,
};
use tubetrend::query;
use tubetrend::view::DashboardView;

#[derive(Parser)]
#[command(name = "tubetrend", version, about = "YouTube trending tag enrichment and analytics")]
struct Cli {
    /// Path to the enriched dataset CSV
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "table")]
    format: Format,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Yaml,
}

/// Row selection shared by the query commands.
#[derive(Args)]
struct FilterArgs {
    /// First trending date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last trending date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Only include this category (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<String>,
}

impl FilterArgs {
    fn criteria(&self, metric: RankMetric) -> FilterCriteria {
        FilterCriteria {
            start_date: self.from,
            end_date: self.to,
            categories: self.categories.iter().cloned().collect(),
            rank_metric: metric,
        }
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    trending_date::parse(raw).ok_or_else(|| format!("invalid date `{raw}`, expected YYYY-MM-DD"))
}

#[derive(Subcommand)]
enum Commands {
    /// Derive tag features from raw trending CSVs and write the enriched dataset
    Enrich {
        /// Raw CSV files or directories containing them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output CSV (defaults to the dataset path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel workers (0 = auto-detect from config)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,
    },

    /// Show row, video and channel counts
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List the categories present in the dataset
    Categories,

    /// Mean tag polarity per category
    Sentiment {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Trending videos per category over time
    Trend {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Rank videos by an engagement metric
    Top {
        /// Which metric to rank by (views, likes, dislikes, comments)
        #[arg(default_value = "views")]
        metric: RankMetric,

        /// Number of results (defaults to config leaderboard.limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Emit the full dashboard view: counts, chart specs and leaderboard
    View {
        /// Leaderboard metric (views, likes, dislikes, comments)
        #[arg(short, long, default_value = "views")]
        metric: RankMetric,

        /// Leaderboard rows (defaults to every row)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = tubetrend::config::AppConfig::load();

    // Resolve dataset path: CLI > config > XDG default
    let data_path = cli
        .data
        .or(config.data_path.clone())
        .unwrap_or_else(tubetrend::config::default_data_path);
    log::info!("Dataset: {}", data_path.display());

    match cli.command {
        Commands::Enrich { inputs, output, jobs } => {
            let output = output.unwrap_or(data_path);
            let workers = if jobs > 0 { jobs } else { config.resolve_workers() };
            let scorer = config.scorer()?;

            let result = tubetrend::enrich::enrich_files(&inputs, &output, scorer.as_ref(), workers)
                .context("Enrichment failed")?;
            println!(
                "Enrichment complete: {} rows, {} with empty tags, mean polarity {:.3}",
                result.rows, result.empty_tags, result.mean_sentiment
            );
            println!("Wrote {}", output.display());
        }

        Commands::Summary { filter } => {
            let dataset = load_dataset(&data_path)?;
            let subset = query::filter_by_criteria(&dataset, &filter.criteria(RankMetric::default()));
            let summary = query::summarize(&subset);
            if !emit(cli.format, &summary)? {
                print_summary(&summary);
            }
        }

        Commands::Categories => {
            let dataset = load_dataset(&data_path)?;
            let categories = dataset.categories();
            if emit(cli.format, &categories)? {
                return Ok(());
            }
            if categories.is_empty() {
                println!("No categories found.");
                return Ok(());
            }
            println!("{} categories:", categories.len());
            for c in &categories {
                println!("  {}", c);
            }
        }

        Commands::Sentiment { filter } => {
            let dataset = load_dataset(&data_path)?;
            let subset = query::filter_by_criteria(&dataset, &filter.criteria(RankMetric::default()));
            let sentiment = query::aggregate_sentiment_by_category(&subset);
            if emit(cli.format, &sentiment)? {
                return Ok(());
            }
            if sentiment.is_empty() {
                println!("No results found.");
                return Ok(());
            }
            print_sentiment_table(&sentiment);
        }

        Commands::Trend { filter } => {
            let dataset = load_dataset(&data_path)?;
            let subset = query::filter_by_criteria(&dataset, &filter.criteria(RankMetric::default()));
            let trend = query::aggregate_trend_with_threshold(&subset, config.trend.daily_max_span_days);
            if emit(cli.format, &trend)? {
                return Ok(());
            }
            if trend.is_empty() {
                println!("No results found.");
                return Ok(());
            }
            print_trend_table(&trend);
        }

        Commands::Top { metric, limit, filter } => {
            let dataset = load_dataset(&data_path)?;
            let subset = query::filter_by_criteria(&dataset, &filter.criteria(metric));
            let mut board = query::build_leaderboard(&subset, metric);
            board.truncate(limit.unwrap_or(config.leaderboard.limit));

            if emit(cli.format, &board)? {
                return Ok(());
            }
            if board.is_empty() {
                println!("No results found.");
                return Ok(());
            }
            println!("Top {} videos by {}:", board.len(), metric.label());
            println!();
            print_leaderboard(&board, metric);
        }

        Commands::View { metric, limit, filter } => {
            let dataset = load_dataset(&data_path)?;
            let criteria = filter.criteria(metric);
            let view = DashboardView::build(&dataset, &criteria, &config.view_settings(limit));
            // Chart specs only make sense as documents, so the table format falls back to JSON
            match cli.format {
                Format::Yaml => print!("{}", serde_yaml::to_string(&view)?),
                Format::Table | Format::Json => {
                    println!("{}", serde_json::to_string_pretty(&view)?)
                }
            }
        }
    }

    Ok(())
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::open(path).with_context(|| {
        format!(
            "Failed to load dataset {}. Run `tubetrend enrich` first or pass --data.",
            path.display()
        )
    })
}

/// Print `value` as JSON or YAML. Returns false for the table format.
fn emit<T: Serialize + ?Sized>(format: Format, value: &T) -> Result<bool> {
    match format {
        Format::Table => return Ok(false),
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(true)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn print_summary(summary: &Summary) {
    println!("Dataset Summary");
    println!("===============");
    println!("Rows:       {}", summary.rows);
    println!("Videos:     {}", summary.videos);
    println!("Channels:   {}", summary.channels);
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => println!("Dates:      {} to {}", first, last),
        _ => println!("Dates:      -"),
    }
}

fn print_sentiment_table(rows: &[CategorySentiment]) {
    println!("{:<30} {:>9} {:>7}", "Category", "Polarity", "Videos");
    println!("{}", "-".repeat(48));

    for c in rows {
        println!(
            "{:<30} {:>9.3} {:>7}",
            truncate(&c.category_id, 30),
            c.mean_sentiment,
            c.video_count
        );
    }

    println!();
    println!("Polarity = mean compound score of each video's latest tags (-1 to 1)");
}

fn print_trend_table(points: &[TrendPoint]) {
    println!("{:<12} {:<30} {:>7}", "Bucket", "Category", "Videos");
    println!("{}", "-".repeat(51));

    for p in points {
        println!(
            "{:<12} {:<30} {:>7}",
            p.bucket.to_string(),
            truncate(&p.category_id, 30),
            p.video_count
        );
    }
}

/// Print the leaderboard with the ranking metric named underneath.
fn print_leaderboard(rows: &[LeaderboardRow], metric: RankMetric) {
    println!(
        "{:>4}  {:<40} {:<20} {:<15} {:>12} {:>10} {:>9} {:>9}",
        "Rank", "Title", "Channel", "Category", "Views", "Likes", "Dislikes", "Comments"
    );
    println!("{}", "-".repeat(128));

    for r in rows {
        println!(
            "{:>4}  {:<40} {:<20} {:<15} {:>12} {:>10} {:>9} {:>9}",
            r.rank,
            truncate(&r.title, 40),
            truncate(&r.channel_name, 20),
            truncate(&r.category, 15),
            r.views,
            r.likes,
            r.dislikes,
            r.comments,
        );
    }

    println!();
    println!("Ranked by: {} (latest row per video, ties share a rank)", metric.label());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_parses_metric_names_and_aliases() {
        let cli = Cli::try_parse_from(["tubetrend", "top", "comment_count", "-n", "5"]).unwrap();
        match cli.command {
            Commands::Top { metric, limit, .. } => {
                assert_eq!(metric, RankMetric::Comments);
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected the top command"),
        }
        assert!(Cli::try_parse_from(["tubetrend", "top", "shares"]).is_err());
    }

    #[test]
    fn test_view_defaults() {
        let cli = Cli::try_parse_from(["tubetrend", "view", "-c", "Music", "-c", "Gaming"]).unwrap();
        match cli.command {
            Commands::View { metric, limit, filter } => {
                assert_eq!(metric, RankMetric::Views);
                assert_eq!(limit, None);
                assert_eq!(filter.categories, vec!["Music", "Gaming"]);
            }
            _ => panic!("expected the view command"),
        }
    }
}
