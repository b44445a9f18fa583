/// Base URL of the themoviedb.org API, v3
pub const API_BASE: &str = "https://api.themoviedb.org/3";

/// Delay inserted before every outbound request, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 350;

/// Minimum vote count for discovery, filtering out lesser-known films
pub const DEFAULT_MIN_VOTES: u32 = 10;

/// Cache directory for raw API responses, relative to the working
/// directory. The CSV tables are written here as well.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Crew job title selecting the entries exported as directors
pub const DIRECTOR_JOB: &str = "Director";

pub const MOVIES_CSV: &str = "movies.csv";
pub const PEOPLE_CSV: &str = "people.csv";
pub const ACTORS_CSV: &str = "actors.csv";
pub const DIRECTORS_CSV: &str = "directors.csv";
