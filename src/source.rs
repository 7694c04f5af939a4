use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub const GAMES_PATH: &str = "/all_games.json";
pub const MOVIES_PATH: &str = "/all_movies.json";
pub const VIDEOS_PATH: &str = "/videos.json";

/// Where the static fixtures come from.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Body of the resource at `path`. Non-success responses are errors.
    async fn fetch(&self, path: &str) -> Result<String>;
}

/// Fetches fixtures over HTTP from a static file server.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!("minihub/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout { builder = builder.timeout(t); }
        let client = builder.build().context("building http client")?;
        Ok(Self { client, base_url })
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        // Relative join so a base like http://host/app/ keeps its prefix
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("joining '{path}' onto {}", self.base_url))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        let resp = self.client.get(url.clone()).send().await
            .with_context(|| format!("requesting {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("unexpected status {status} from {url}"));
        }
        resp.text().await.with_context(|| format!("reading body of {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_base_prefix() {
        let f = HttpFetcher::new(Url::parse("http://localhost:5173/app/").unwrap(), None).unwrap();
        assert_eq!(f.resolve(VIDEOS_PATH).unwrap().as_str(), "http://localhost:5173/app/videos.json");
        let f = HttpFetcher::new(Url::parse("http://localhost:5173").unwrap(), None).unwrap();
        assert_eq!(f.resolve(GAMES_PATH).unwrap().as_str(), "http://localhost:5173/all_games.json");
    }
}
