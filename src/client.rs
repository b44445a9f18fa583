use crate::cache::{self, ResponseCache};
use crate::models::{DiscoverPage, Movie, Person};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Read-only view of the movie-metadata API: the seam between the network
/// and the rest of the pipeline. Tests substitute an in-memory fake.
pub trait MovieDb {
    /// One page of the discovery listing.
    fn discover_page(&self, page: u64) -> Result<DiscoverPage>;

    /// Full movie record including embedded cast and crew.
    fn movie(&self, id: u64) -> Result<Movie>;

    /// Person record (name, birthday, deathday).
    fn person(&self, id: u64) -> Result<Person>;
}

pub struct ClientConfig {
    pub api_key: String,
    /// Injectable for tests; `config::API_BASE` in production.
    pub base_url: String,
    /// Fixed pause before every outbound request. Rate-limit courtesy,
    /// not a backoff mechanism.
    pub delay: Duration,
    pub min_votes: u32,
}

/// Caching HTTP client for the themoviedb.org API. Strictly sequential:
/// one outstanding request at a time, each preceded by the configured
/// delay unless the response cache already holds the URL.
pub struct TmdbClient {
    config: ClientConfig,
    http: Client,
    cache: ResponseCache,
}

impl TmdbClient {
    pub fn new(config: ClientConfig, cache: ResponseCache) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, http, cache })
    }

    fn discover_url(&self, page: u64) -> String {
        format!(
            "{}/discover/movie?page={}&api_key={}&vote_count.gte={}",
            self.config.base_url, page, self.config.api_key, self.config.min_votes
        )
    }

    fn movie_url(&self, id: u64) -> String {
        format!(
            "{}/movie/{}?api_key={}&append_to_response=casts",
            self.config.base_url, id, self.config.api_key
        )
    }

    fn person_url(&self, id: u64) -> String {
        format!(
            "{}/person/{}?api_key={}",
            self.config.base_url, id, self.config.api_key
        )
    }

    /// Cache read, or a single delayed GET. Non-success responses are
    /// errors and are never cached, so a later run can retry them.
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let key = cache::cache_key(url, &self.config.api_key);
        self.cache.get_or_populate(&key, || {
            thread::sleep(self.config.delay);
            debug!(key, "Fetching");
            let response = self
                .http
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .with_context(|| format!("Request failed: {key}"))?
                .error_for_status()
                .with_context(|| format!("Request rejected: {key}"))?;
            let body = response
                .bytes()
                .with_context(|| format!("Failed to read response body: {key}"))?;
            Ok(body.to_vec())
        })
    }
}

impl MovieDb for TmdbClient {
    fn discover_page(&self, page: u64) -> Result<DiscoverPage> {
        let body = self.fetch(&self.discover_url(page))?;
        serde_json::from_slice(&body)
            .with_context(|| format!("Failed to decode discovery page {page}"))
    }

    fn movie(&self, id: u64) -> Result<Movie> {
        let body = self.fetch(&self.movie_url(id))?;
        serde_json::from_slice(&body).with_context(|| format!("Failed to decode movie {id}"))
    }

    fn person(&self, id: u64) -> Result<Person> {
        let body = self.fetch(&self.person_url(id))?;
        serde_json::from_slice(&body).with_context(|| format!("Failed to decode person {id}"))
    }
}
