//! ghprofile CLI
//!
//! Builds a GitHub profile README from the user's public activity.

mod settings;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use ghprofile_analyzer::{summarize, ComprehensiveSummary, TrendSummary};
use ghprofile_collector::feed::FeedReader;
use ghprofile_collector::github::GithubCollector;
use ghprofile_collector::skills::SkillsReader;
use ghprofile_collector::CollectorError;
use ghprofile_models::{BlogPost, SkillCatalogue};
use ghprofile_narrator::{build_prompt, GeminiClient, Narrator, Publisher};
use settings::{is_valid_username, Settings};
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const SIDE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const GEMINI_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_BLOG_POSTS: usize = 5;

#[derive(Parser)]
#[command(name = "ghp")]
#[command(about = "ghprofile - AI-written GitHub profile READMEs")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, analyze, narrate and write the READMEs
    Generate,

    /// Print the aggregated summary and trends without calling the AI service
    Analyze {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the prompt that would be sent to the AI service
    Prompt,
}

/// Aggregated profile for one run
struct ProfileData {
    summary: ComprehensiveSummary,
    trends: TrendSummary,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    if cli.settings.username.is_empty() {
        bail!("A GitHub username is required (--username or GITHUB_USERNAME)");
    }
    if !is_valid_username(&cli.settings.username) {
        bail!("Invalid GitHub username: {:?}", cli.settings.username);
    }

    match cli.command {
        Commands::Generate => generate(&cli.settings).await?,
        Commands::Analyze { json } => analyze(&cli.settings, json).await?,
        Commands::Prompt => prompt(&cli.settings).await?,
    }

    Ok(())
}

async fn generate(settings: &Settings) -> Result<()> {
    info!(username = %settings.username, "Generating profile");

    let data = collect(settings).await?;
    let (blog_posts, skills) = side_documents(settings).await?;

    let narrator_config = settings.narrator_config();
    let publisher = Publisher::new(settings.publisher_config(&narrator_config));

    let documents = match settings.gemini_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => {
            let client = GeminiClient::new(key, settings.gemini_model.clone(), GEMINI_TIMEOUT)?
                .with_base_url(settings.gemini_api_base.clone());
            info!(model = %settings.gemini_model, "Generating profile text");
            Narrator::new(Some(client), narrator_config)
                .generate_profile(&data.summary, &data.trends, &blog_posts, &skills)
                .await
        }
        None => {
            Narrator::<GeminiClient>::new(None, narrator_config)
                .generate_profile(&data.summary, &data.trends, &blog_posts, &skills)
                .await
        }
    };

    let written = publisher.publish(&documents)?;
    for path in &written {
        println!("  wrote {}", path.display());
    }

    println!("\nProfile generated!");
    Ok(())
}

async fn analyze(settings: &Settings, json: bool) -> Result<()> {
    let data = collect(settings).await?;

    if json {
        let out = serde_json::json!({
            "summary": data.summary,
            "trends": data.trends,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_report(&data);
    Ok(())
}

async fn prompt(settings: &Settings) -> Result<()> {
    let data = collect(settings).await?;
    let (blog_posts, skills) = side_documents(settings).await?;

    let text = build_prompt(
        &data.summary,
        &data.trends,
        &blog_posts,
        &skills,
        &settings.narrator_config(),
    );
    println!("{}", text);
    Ok(())
}

/// Fetch GitHub data and aggregate it; individual fetch failures degrade to empty data
async fn collect(settings: &Settings) -> Result<ProfileData> {
    let config = settings.collector_config();

    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN not set. API rate limits will be restricted.");
    }

    let collector = GithubCollector::new(config)?;
    let username = settings.username.as_str();

    info!("Fetching user profile");
    let user = degrade("user profile", collector.get_user(username).await);

    info!("Fetching starred repositories");
    let starred = degrade("starred repositories", collector.get_starred_repos(username).await);

    info!("Fetching owned repositories");
    let owned = degrade("owned repositories", collector.get_user_repos(username).await);

    info!("Fetching recent activity");
    let events = degrade("recent activity", collector.get_recent_activity(username).await);

    info!(
        starred = starred.len(),
        owned = owned.len(),
        events = events.len(),
        "Analyzing data"
    );
    let (summary, trends) = summarize(
        &starred,
        &owned,
        &events,
        Utc::now(),
        &settings.analysis_config(),
    );

    Ok(ProfileData {
        summary: summary.with_user(user),
        trends,
    })
}

async fn side_documents(settings: &Settings) -> Result<(Vec<BlogPost>, SkillCatalogue)> {
    let user_agent = settings.user_agent();

    let blog_posts = match settings.blog_rss_url.as_deref() {
        Some(url) if !url.is_empty() => {
            info!(url = url, "Fetching blog posts");
            FeedReader::new(&user_agent, SIDE_FETCH_TIMEOUT)?
                .fetch_posts(url, MAX_BLOG_POSTS)
                .await
        }
        _ => Vec::new(),
    };

    let skills = match settings.skills_url.as_deref() {
        Some(url) if !url.is_empty() => {
            info!(url = url, "Fetching skills");
            SkillsReader::new(&user_agent, SIDE_FETCH_TIMEOUT)?
                .fetch(url)
                .await
        }
        _ => SkillCatalogue::default(),
    };

    Ok((blog_posts, skills))
}

/// Log a failed fetch and carry on with empty data
fn degrade<T: Default>(what: &str, result: ghprofile_collector::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(CollectorError::RateLimited(wait)) => {
            warn!(wait_secs = wait, "Rate limited while fetching {}, continuing without it", what);
            T::default()
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch {}, continuing without it", what);
            T::default()
        }
    }
}

fn print_report(data: &ProfileData) {
    let summary = &data.summary;
    let trends = &data.trends;
    let activity = &summary.activity;

    println!("User: {} ({})", summary.user.display_name(), summary.user.login);
    println!("Location: {}", summary.user.location.as_deref().unwrap_or("-"));
    println!(
        "Repos: {} public, {} analyzed | Stars given: {} ({} recent)",
        summary.user.public_repos,
        summary.own_repos.len(),
        summary.starred.len(),
        summary.recent_stars.len()
    );
    println!();

    println!("Activity: {}", trends.activity_pattern);
    println!("  Commits:        {}", activity.commits);
    println!("  PRs created:    {}", activity.prs_created);
    println!("  PRs reviewed:   {}", activity.prs_reviewed);
    println!("  Issues opened:  {}", activity.issues_opened);
    println!("  Comments:       {}", activity.issues_commented);
    println!("  Repos touched:  {}", activity.repos_worked_on.len());

    let active: Vec<_> = summary.active_repos().collect();
    if !active.is_empty() {
        println!("\n{:<30} {:<12} {:<8} UPDATED", "ACTIVE REPO", "LANGUAGE", "STARS");
        println!("{}", "-".repeat(66));
        for repo in active.iter().take(5) {
            println!(
                "{:<30} {:<12} {:<8} {}",
                repo.name,
                repo.language.as_deref().unwrap_or("-"),
                repo.stars,
                repo.updated_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
        if active.len() > 5 {
            println!("  ... and {} more", active.len() - 5);
        }
    }

    if !trends.emerging_topics.is_empty() {
        println!("\nEmerging topics:");
        for topic in &trends.emerging_topics {
            println!(
                "  {:<25} {}/{} ({:.0}%)",
                topic.topic,
                topic.recent_count,
                topic.total_count,
                topic.ratio() * 100.0
            );
        }
    }

    if !trends.growing_languages.is_empty() {
        println!("\nGrowing languages: {}", trends.growing_languages.join(", "));
    }

    if !trends.expertise_areas.is_empty() {
        let areas: Vec<_> = trends.expertise_areas.iter().map(|c| c.as_str()).collect();
        println!("Expertise areas: {}", areas.join(", "));
    }

    let top_languages = summary.all_languages.most_common(8);
    if !top_languages.is_empty() {
        println!("\nTop languages:");
        for (lang, count) in top_languages {
            println!("  {:<20} {}", lang, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_with_settings() {
        let cli = Cli::try_parse_from([
            "ghp",
            "--username",
            "octocat",
            "--expertise-area",
            "Rust",
            "--expertise-area",
            "Distributed systems",
            "analyze",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.settings.username, "octocat");
        assert_eq!(
            cli.settings.expertise_areas,
            vec!["Rust".to_string(), "Distributed systems".to_string()]
        );
        assert!(matches!(cli.command, Commands::Analyze { json: true }));
    }

    #[test]
    fn settings_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "ghp",
            "generate",
            "--username",
            "octocat",
            "--recent-days",
            "7",
            "-o",
            "profile",
        ])
        .unwrap();

        assert_eq!(cli.settings.username, "octocat");
        assert_eq!(cli.settings.recent_days, 7);
        assert_eq!(cli.settings.output_dir, std::path::PathBuf::from("profile"));
        assert!(matches!(cli.command, Commands::Generate));
    }

    #[test]
    fn settings_defaults() {
        let cli = Cli::try_parse_from(["ghp", "--username", "octocat", "generate"]).unwrap();
        let s = &cli.settings;

        assert_eq!(s.recent_days, 30);
        assert_eq!(s.very_recent_days, 90);
        assert_eq!(s.max_recent_commits, 10);
        assert_eq!(s.max_active_repos, 5);
        assert_eq!(s.max_recent_stars, 12);
        assert_eq!(s.readme_filename, "README.md");
        assert_eq!(s.gemini_api_base, "https://generativelanguage.googleapis.com");

        let narrator = s.narrator_config();
        let publisher = s.publisher_config(&narrator);
        assert_eq!(publisher.primary_locale.file_name(), "README.pt-br.md");
        assert_eq!(publisher.secondary_locale.file_name(), "README.en.md");
    }

    #[test]
    fn degrade_yields_default_on_error() {
        let starred: Vec<u32> = degrade("stars", Err(CollectorError::RateLimited(60)));
        assert!(starred.is_empty());

        let ok: Vec<u32> = degrade("stars", Ok(vec![1, 2]));
        assert_eq!(ok, vec![1, 2]);
    }
}
