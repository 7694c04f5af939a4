use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use minihub::types::VideoRecord;

/// Command-line front end for the mini-app data layer
#[derive(Parser, Debug)]
#[command(name = "minihub")]
#[command(about = "Fetch mini-app fixtures and manage the local video cache", long_about = None)]
pub struct Cli {
    /// Config file (defaults to config.toml in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Server the fixtures are fetched from
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Database holding the local video cache
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List games for the comparison view
    Games,
    /// List movies for the guessing game
    Movies,
    /// List videos, fetching them only on first use
    Videos,
    /// Append a video to the local cache
    AddVideo {
        /// Watch URL; id and platform are derived from it unless given
        #[arg(long)]
        url: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        platform: Option<String>,
    },
    /// Forget every cached value
    Clear,
    /// Compact the database file
    Vacuum,
}

pub fn video_from_args(url: String, id: Option<String>, platform: Option<String>) -> Result<VideoRecord> {
    match (id, platform) {
        (Some(id), Some(platform)) => Ok(VideoRecord::new(id, url, platform)),
        (id, platform) => {
            let mut v = VideoRecord::from_url(&url)?;
            if let Some(id) = id { v.id = id; }
            if let Some(p) = platform { v.platform = p; }
            Ok(v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["minihub", "videos", "--json", "--base-url", "http://x.local"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.base_url.as_deref(), Some("http://x.local"));
        assert!(matches!(cli.command, Commands::Videos));
    }

    #[test]
    fn add_video_requires_url() {
        assert!(Cli::try_parse_from(["minihub", "add-video", "--id", "x"]).is_err());
        let cli = Cli::try_parse_from(["minihub", "add-video", "--url", "https://youtu.be/abc"]).unwrap();
        match cli.command {
            Commands::AddVideo { url, id, platform } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert!(id.is_none() && platform.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn explicit_id_and_platform_skip_url_parsing() {
        let v = video_from_args("local-file.mp4".into(), Some("clip1".into()), Some("local".into())).unwrap();
        assert_eq!(v, VideoRecord::new("clip1", "local-file.mp4", "local"));
    }

    #[test]
    fn derived_fields_can_be_overridden() {
        let v = video_from_args("https://youtu.be/abc".into(), Some("custom".into()), None).unwrap();
        assert_eq!(v, VideoRecord::new("custom", "https://youtu.be/abc", "youtube"));
        assert!(video_from_args("https://example.com/clip".into(), None, None).is_err());
    }
}
