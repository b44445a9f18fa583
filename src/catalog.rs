use crate::client::MovieDb;
use crate::models::{Movie, MovieSummary};
use crate::stats::RunStats;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Lazy walk of the discovery listing from `start_page`, resolving every
/// listed movie to its full record and yielding the ones with a usable
/// cast and crew, in API-listing order.
///
/// The walk stops at the total-page count reported by the listing and
/// never requests a page beyond it. A damaged page is logged and skipped
/// once that bound is known; a damaged first page ends the walk, since
/// there is no bound to iterate against.
pub struct MovieStream<'a, D: MovieDb> {
    db: &'a D,
    stats: &'a RunStats,
    next_page: u64,
    total_pages: Option<u64>,
    pages_left: Option<u64>,
    pending: VecDeque<MovieSummary>,
    done: bool,
}

impl<'a, D: MovieDb> MovieStream<'a, D> {
    pub fn new(db: &'a D, stats: &'a RunStats, start_page: u64, page_limit: Option<u64>) -> Self {
        Self {
            db,
            stats,
            next_page: start_page.max(1),
            total_pages: None,
            pages_left: page_limit,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Total-page count reported by the listing, once a page has been read.
    pub fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    /// Fetches the next discovery page into `pending`. Returns false when
    /// the walk is over.
    fn fetch_next_page(&mut self) -> bool {
        if self.pages_left == Some(0) {
            debug!("Page limit reached");
            return false;
        }
        if let Some(total) = self.total_pages {
            if self.next_page > total {
                return false;
            }
        }

        let page = self.next_page;
        self.next_page += 1;
        if let Some(left) = self.pages_left.as_mut() {
            *left -= 1;
        }

        match self.db.discover_page(page) {
            Ok(listing) => {
                self.stats.inc_pages();
                self.total_pages = Some(listing.total_pages);
                info!(
                    page,
                    total_pages = listing.total_pages,
                    results = listing.results.len(),
                    "Fetched discovery page"
                );
                self.pending.extend(listing.results);
                true
            }
            Err(e) => {
                self.stats.inc_page_failures();
                warn!(page, error = %e, "Skipping unreadable discovery page");
                self.total_pages.is_some()
            }
        }
    }
}

impl<'a, D: MovieDb> Iterator for MovieStream<'a, D> {
    type Item = Movie;

    fn next(&mut self) -> Option<Movie> {
        loop {
            if self.done {
                return None;
            }
            while let Some(summary) = self.pending.pop_front() {
                match self.db.movie(summary.id) {
                    Ok(movie) if movie.has_credits() => {
                        self.stats.inc_movies_resolved();
                        return Some(movie);
                    }
                    Ok(_) => {
                        self.stats.inc_movies_missing_credits();
                        debug!(
                            movie_id = summary.id,
                            title = %summary.title,
                            "Skipping movie without cast or crew"
                        );
                    }
                    Err(e) => {
                        self.stats.inc_movie_failures();
                        warn!(movie_id = summary.id, error = %e, "Skipping unreadable movie");
                    }
                }
            }
            if !self.fetch_next_page() {
                self.done = true;
            }
        }
    }
}
