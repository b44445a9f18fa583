use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one export run, printed in the end-of-run summary. Shared
/// by `&` reference between the catalog stream and the export formatter,
/// so updates go through relaxed atomics.
#[derive(Default)]
pub struct RunStats {
    pages_fetched: AtomicU64,
    pages_failed: AtomicU64,
    movies_resolved: AtomicU64,
    movies_failed: AtomicU64,
    movies_missing_credits: AtomicU64,
    movies_undated: AtomicU64,
    movies_exported: AtomicU64,
    people_failed: AtomicU64,
    actor_links: AtomicU64,
    director_links: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_pages(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_page_failures(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_movies_resolved(&self) {
        self.movies_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_movie_failures(&self) {
        self.movies_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_movies_missing_credits(&self) {
        self.movies_missing_credits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_movies_undated(&self) {
        self.movies_undated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_movies_exported(&self) {
        self.movies_exported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_people_failures(&self) {
        self.people_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_actor_links(&self) {
        self.actor_links.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_director_links(&self) {
        self.director_links.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn page_failures(&self) -> u64 {
        self.pages_failed.load(Ordering::Relaxed)
    }

    pub fn movies_resolved(&self) -> u64 {
        self.movies_resolved.load(Ordering::Relaxed)
    }

    pub fn movie_failures(&self) -> u64 {
        self.movies_failed.load(Ordering::Relaxed)
    }

    pub fn movies_missing_credits(&self) -> u64 {
        self.movies_missing_credits.load(Ordering::Relaxed)
    }

    pub fn movies_undated(&self) -> u64 {
        self.movies_undated.load(Ordering::Relaxed)
    }

    pub fn movies_exported(&self) -> u64 {
        self.movies_exported.load(Ordering::Relaxed)
    }

    pub fn people_failures(&self) -> u64 {
        self.people_failed.load(Ordering::Relaxed)
    }

    pub fn actor_links(&self) -> u64 {
        self.actor_links.load(Ordering::Relaxed)
    }

    pub fn director_links(&self) -> u64 {
        self.director_links.load(Ordering::Relaxed)
    }
}
