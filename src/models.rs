use crate::sanitize;
use serde::Deserialize;
use tracing::warn;

/// One page of the discovery listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverPage {
    pub page: u64,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    pub total_pages: u64,
    #[serde(default)]
    pub total_results: u64,
}

/// A movie row of a discovery page. Only the id is needed to resolve the
/// full record; the title is kept for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

/// Full movie record with cast and crew embedded under `casts`
/// (`append_to_response=casts`).
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub casts: Credits,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastEntry>,
    #[serde(default)]
    pub crew: Vec<CrewEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastEntry {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// A single role, or several separated by `/` or `\`.
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewEntry {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
}

/// Person record from the person-detail endpoint. Birthday and deathday
/// are nullable in the wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
}

/// Year from the leading 4 characters of a date string; 0 when the field
/// is too short or does not parse. Never panics on malformed input.
fn year_prefix(date: &str) -> i64 {
    if date.len() < 4 {
        return 0;
    }
    date.get(..4)
        .and_then(|prefix| prefix.parse::<i64>().ok())
        .unwrap_or(0)
}

impl Movie {
    /// `None` when the release-date string is shorter than 4 characters
    /// (the movie is excluded from export). An unparseable 4-char prefix
    /// is logged and exported as year 0 rather than aborting the run.
    pub fn release_year(&self) -> Option<i64> {
        let date = self.release_date.as_deref().unwrap_or("");
        if date.len() < 4 {
            return None;
        }
        match date.get(..4).and_then(|prefix| prefix.parse::<i64>().ok()) {
            Some(year) => Some(year),
            None => {
                warn!(movie_id = self.id, release_date = date, "Unparseable release date");
                Some(0)
            }
        }
    }

    /// Movies without both a cast and a crew are excluded from export.
    pub fn has_credits(&self) -> bool {
        !self.casts.cast.is_empty() && !self.casts.crew.is_empty()
    }
}

impl Person {
    pub fn birth_year(&self) -> i64 {
        year_prefix(self.birthday.as_deref().unwrap_or(""))
    }

    pub fn death_year(&self) -> i64 {
        year_prefix(self.deathday.as_deref().unwrap_or(""))
    }

    /// A person is emitted (Actor/Director label, people table) only with
    /// a non-empty name, a birthday of at least 4 characters, and a name
    /// that survives identifier sanitization.
    pub fn is_eligible(&self) -> bool {
        !self.name.is_empty()
            && self.birthday.as_deref().unwrap_or("").len() >= 4
            && !sanitize::identifier(&self.name).trim_matches('_').is_empty()
    }
}
