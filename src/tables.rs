use crate::client::MovieDb;
use crate::config;
use crate::models::{Movie, Person};
use crate::sanitize;
use crate::stats::RunStats;
use anyhow::{Context, Result};
use csv::Writer;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Writes the four relational tables (movies, people, actors, directors).
/// People are deduplicated across the whole run; actor and director join
/// rows are written once per occurrence.
pub struct TableExporter<'a, D: MovieDb> {
    db: &'a D,
    stats: &'a RunStats,
    movies: Writer<File>,
    people: Writer<File>,
    actors: Writer<File>,
    directors: Writer<File>,
    seen_people: FxHashSet<u64>,
}

impl<'a, D: MovieDb> TableExporter<'a, D> {
    /// Opens the four tables in `dir` and writes their header rows.
    pub fn create(db: &'a D, stats: &'a RunStats, dir: &Path) -> Result<Self> {
        let mut movies = table_writer(dir, config::MOVIES_CSV)?;
        movies.write_record(["movieId", "title", "avgVote", "releaseYear", "tagline", "genres"])?;
        let mut people = table_writer(dir, config::PEOPLE_CSV)?;
        people.write_record(["personId", "name", "birthYear", "deathYear"])?;
        let mut actors = table_writer(dir, config::ACTORS_CSV)?;
        actors.write_record(["personId", "movieId", "characters"])?;
        let mut directors = table_writer(dir, config::DIRECTORS_CSV)?;
        directors.write_record(["personId", "movieId"])?;

        Ok(Self {
            db,
            stats,
            movies,
            people,
            actors,
            directors,
            seen_people: FxHashSet::default(),
        })
    }

    pub fn write_movie(&mut self, movie: &Movie) -> Result<()> {
        let Some(release) = movie.release_year() else {
            self.stats.inc_movies_undated();
            debug!(movie_id = movie.id, "Skipping movie with unusable release date");
            return Ok(());
        };

        let genres = movie
            .genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(":");
        self.movies.write_record([
            movie.id.to_string(),
            movie.title.clone(),
            movie.vote_average.to_string(),
            release.to_string(),
            movie.tagline.clone().unwrap_or_default(),
            genres,
        ])?;

        for entry in &movie.casts.cast {
            let actor = match self.db.person(entry.id) {
                Ok(person) => person,
                Err(e) => {
                    self.stats.inc_people_failures();
                    warn!(person_id = entry.id, error = %e, "Skipping unresolvable cast member");
                    continue;
                }
            };
            if !actor.is_eligible() {
                continue;
            }
            self.write_person(&actor)?;
            let characters =
                sanitize::split_characters(entry.character.as_deref().unwrap_or("")).join(":");
            self.actors
                .write_record([actor.id.to_string(), movie.id.to_string(), characters])?;
            self.stats.inc_actor_links();
        }

        for entry in &movie.casts.crew {
            if entry.job != config::DIRECTOR_JOB {
                continue;
            }
            let director = match self.db.person(entry.id) {
                Ok(person) => person,
                Err(e) => {
                    self.stats.inc_people_failures();
                    warn!(person_id = entry.id, error = %e, "Skipping unresolvable director");
                    continue;
                }
            };
            if !director.is_eligible() {
                continue;
            }
            self.write_person(&director)?;
            self.directors
                .write_record([director.id.to_string(), movie.id.to_string()])?;
            self.stats.inc_director_links();
        }

        self.stats.inc_movies_exported();
        Ok(())
    }

    /// One people row per person for the whole run, however many films
    /// they appear in.
    fn write_person(&mut self, person: &Person) -> Result<()> {
        if !self.seen_people.insert(person.id) {
            return Ok(());
        }
        self.people.write_record([
            person.id.to_string(),
            person.name.clone(),
            person.birth_year().to_string(),
            person.death_year().to_string(),
        ])?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.movies.flush()?;
        self.people.flush()?;
        self.actors.flush()?;
        self.directors.flush()?;
        Ok(())
    }
}

fn table_writer(dir: &Path, name: &str) -> Result<Writer<File>> {
    let path = dir.join(name);
    Writer::from_path(&path).with_context(|| format!("Failed to create table: {:?}", path))
}
