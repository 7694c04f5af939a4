mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use minihub::config::{parse_base_url, HubConfig};
use minihub::Hub;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minihub=info"));
    // stderr keeps --json output on stdout machine-readable
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = HubConfig::load(cli.config.as_deref())?;
    if let Some(u) = &cli.base_url { config.base_url = parse_base_url(u)?; }
    if let Some(d) = cli.database_url { config.database_url = Some(d); }

    let hub = Hub::connect(&config).await?;

    match cli.command {
        Commands::Games => {
            let games = hub.get_all_games().await;
            if cli.json { return print_json(&games).map(|_| ExitCode::SUCCESS); }
            for g in games {
                println!("{} (appid {}): {:.2}% of {} reviews, peak {} players", g.name, g.appid, g.rating, g.total_reviews, g.max_players);
            }
        }
        Commands::Movies => {
            let movies = hub.get_movies().await;
            if cli.json { return print_json(&movies).map(|_| ExitCode::SUCCESS); }
            for m in movies {
                println!("{} ({}) by {}, rated {:.1}", m.title, m.year, m.director, m.rating);
                if !m.actors.is_empty() { println!("  starring {}", m.actors.join(", ")); }
            }
        }
        Commands::Videos => {
            let videos = hub.get_videos().await;
            if cli.json { return print_json(&videos).map(|_| ExitCode::SUCCESS); }
            for v in videos {
                println!("[{}] {} {}", v.platform, v.id, v.url);
            }
        }
        Commands::AddVideo { url, id, platform } => {
            let record = cli::video_from_args(url, id, platform)?;
            let result = hub.add_video(record.clone()).await;
            if cli.json {
                print_json(&result)?;
            } else if result.success {
                println!("Added {} video {}", record.platform, record.id);
            } else {
                eprintln!("Failed to add video: {}", result.error.as_deref().unwrap_or("unknown error"));
            }
            if !result.success { return Ok(ExitCode::FAILURE); }
        }
        Commands::Clear => {
            let removed = hub.clear_storage().await?;
            println!("Removed {removed} cached entries");
        }
        Commands::Vacuum => {
            hub.vacuum_db().await?;
            println!("Database compacted");
        }
    }
    Ok(ExitCode::SUCCESS)
}
