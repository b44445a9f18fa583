//! Cineasts: themoviedb.org catalog export for Neo4j
//!
//! This crate walks the remote movie catalog and serializes it for bulk
//! loading into a graph database, in one of two formats:
//!
//! 1. **Cypher** -- one `MERGE`-based load unit per movie on stdout,
//!    preceded by index-creation statements
//! 2. **CSV** -- four relational tables (movies, people, actors,
//!    directors) suitable for `LOAD CSV`
//!
//! # Architecture
//!
//! The pipeline is a strictly sequential fetch-transform-emit loop:
//!
//! - **Catalog pagination** -- Walks the paged discovery listing to the
//!   reported total-page count, resolving each listed movie to its full
//!   record and dropping movies lacking a cast or a crew
//! - **Person enrichment** -- Each cast/crew entry is resolved to a
//!   person record for name and birth/death years
//! - **Response caching** -- Every API response is cached on disk keyed
//!   by URL, so an interrupted run restarts cheaply from any page and a
//!   warm run is byte-reproducible without touching the network
//! - **Rate limiting** -- A fixed delay before every outbound request;
//!   skip-and-continue on per-record failures so one damaged record
//!   cannot abort an hours-long crawl
//!
//! # Key Modules
//!
//! - [`client`] -- Caching HTTP client and the [`client::MovieDb`] seam
//! - [`catalog`] -- Lazy movie stream over the discovery listing
//! - [`cypher`] -- Cypher bulk-load statement emitter
//! - [`tables`] -- Relational CSV emitter with run-wide people dedup
//! - [`cache`] -- URL-keyed get-or-populate response cache
//! - [`sanitize`] -- Identifier/label/quoting helpers for Cypher output
//! - [`models`] -- Wire types and the export eligibility rules
//! - [`stats`] -- Run counters for the end-of-run summary
//! - [`config`] -- Constants (API base, defaults, table names)
//!
//! # Example Usage
//!
//! ```bash
//! # Stream Cypher to stdout, caching responses under ./cache
//! cineasts cypher --api-key $TMDB_KEY > movies.cypher
//!
//! # Write movies.csv / people.csv / actors.csv / directors.csv
//! cineasts csv --api-key $TMDB_KEY
//!
//! # Resume a crawl from page 500, two pages only
//! cineasts cypher --api-key $TMDB_KEY --start-page 500 --limit 2
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod cypher;
pub mod models;
pub mod sanitize;
pub mod stats;
pub mod tables;
