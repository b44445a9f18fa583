use crate::client::MovieDb;
use crate::config;
use crate::models::{Movie, Person};
use crate::sanitize;
use crate::stats::RunStats;
use anyhow::Result;
use rustc_hash::FxHashSet;
use std::io::Write;
use tracing::{debug, warn};

/// Emits one Cypher bulk-load unit per movie. Node variables are derived
/// from sanitized person names, so each unit declares a person at most
/// once and later references within the unit reuse the variable.
pub struct CypherExporter<'a, D: MovieDb, W: Write> {
    db: &'a D,
    stats: &'a RunStats,
    out: W,
}

impl<'a, D: MovieDb, W: Write> CypherExporter<'a, D, W> {
    pub fn new(db: &'a D, stats: &'a RunStats, out: W) -> Self {
        Self { db, stats, out }
    }

    /// Index statements expected to run once, before any load units.
    pub fn write_preamble(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "CREATE INDEX movie_title IF NOT EXISTS FOR (m:Movie) ON (m.title);"
        )?;
        writeln!(
            self.out,
            "CREATE INDEX person_name IF NOT EXISTS FOR (p:Person) ON (p.name);"
        )?;
        Ok(())
    }

    /// One load unit: movie upsert, cast pass, then crew pass, terminated
    /// by `RETURN movie.title;`.
    ///
    /// The cast pass runs strictly before the crew pass. An actor-director
    /// is declared by the cast pass and the crew pass only adds the
    /// `Director` label and edge to the already-declared variable.
    pub fn write_movie(&mut self, movie: &Movie) -> Result<()> {
        let Some(release) = movie.release_year() else {
            self.stats.inc_movies_undated();
            debug!(movie_id = movie.id, "Skipping movie with unusable release date");
            return Ok(());
        };

        writeln!(self.out, "MERGE (movie:Movie {{id:{}}})", movie.id)?;
        writeln!(
            self.out,
            "ON CREATE SET movie.title = {}",
            sanitize::quote(&movie.title)
        )?;
        writeln!(self.out, "    , movie.release = {release}")?;
        if movie.vote_average > 0.0 {
            writeln!(self.out, "    , movie.voteAverage = {}", movie.vote_average)?;
        }
        if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
            writeln!(self.out, "    , movie.tagline = {}", sanitize::quote(tagline))?;
        }
        for genre in &movie.genres {
            let suffix = sanitize::label(&genre.name);
            if suffix.is_empty() {
                debug!(movie_id = movie.id, genre = %genre.name, "Genre has no usable label");
                continue;
            }
            writeln!(self.out, "    , movie:{suffix}")?;
        }

        let mut declared: FxHashSet<u64> = FxHashSet::default();

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
            let ident = sanitize::identifier(&actor.name);
            let roles = role_list(entry.character.as_deref().unwrap_or(""));
            if declared.insert(actor.id) {
                self.declare_person(&ident, &actor)?;
                writeln!(self.out, "  SET {ident}:Actor")?;
                writeln!(self.out, "  MERGE ({ident})-[{ident}_act:ACTS_IN]->(movie)")?;
                writeln!(self.out, "  SET {ident}_act.roles = [{roles}]")?;
            } else {
                // Duplicate cast entry: union the new roles into the
                // existing edge, never append duplicates.
                writeln!(
                    self.out,
                    "  SET {ident}_act.roles = [x IN {ident}_act.roles WHERE NOT x IN [{roles}]] + [{roles}]"
                )?;
            }
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
            let ident = sanitize::identifier(&director.name);
            if declared.insert(director.id) {
                self.declare_person(&ident, &director)?;
            }
            writeln!(self.out, "  SET {ident}:Director")?;
            writeln!(self.out, "  MERGE ({ident})-[:DIRECTED]->(movie)")?;
            self.stats.inc_director_links();
        }

        writeln!(self.out, "RETURN movie.title;")?;
        self.stats.inc_movies_exported();
        Ok(())
    }

    fn declare_person(&mut self, ident: &str, person: &Person) -> Result<()> {
        writeln!(self.out, "  MERGE ({ident}:Person {{id:{}}})", person.id)?;
        writeln!(
            self.out,
            "  ON CREATE SET {ident}.name = {}",
            sanitize::quote(&person.name)
        )?;
        let born = person.birth_year();
        if born > 0 {
            writeln!(self.out, "    , {ident}.born = {born}")?;
        }
        let died = person.death_year();
        if died > 0 {
            writeln!(self.out, "    , {ident}.died = {died}")?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Quoted, comma-joined role list for a character field.
fn role_list(character: &str) -> String {
    sanitize::split_characters(character)
        .iter()
        .map(|role| sanitize::quote(role))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{cast, crew, genre, movie, person, FakeDb};
    use crate::models::Movie;

    fn export(db: &FakeDb, movie: &Movie) -> (String, u64) {
        let stats = RunStats::new();
        let mut out = Vec::new();
        let mut exporter = CypherExporter::new(db, &stats, &mut out);
        exporter.write_movie(movie).unwrap();
        (String::from_utf8(out).unwrap(), stats.movies_exported())
    }

    fn line_count(haystack: &str, needle: &str) -> usize {
        haystack.lines().filter(|line| line.contains(needle)).count()
    }

    #[test]
    fn preamble_creates_indexes() {
        let db = FakeDb::default();
        let stats = RunStats::new();
        let mut out = Vec::new();
        let mut exporter = CypherExporter::new(&db, &stats, &mut out);
        exporter.write_preamble().unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("CREATE INDEX movie_title IF NOT EXISTS FOR (m:Movie) ON (m.title);"));
        assert!(text.contains("CREATE INDEX person_name IF NOT EXISTS FOR (p:Person) ON (p.name);"));
    }

    #[test]
    fn movie_with_short_release_date_is_skipped_entirely() {
        let db = FakeDb::default();
        let m = movie(1, "Broken", "19");
        let (text, exported) = export(&db, &m);
        assert!(text.is_empty());
        assert_eq!(exported, 0);
    }

    #[test]
    fn movie_node_carries_optional_fields_and_genre_labels() {
        let db = FakeDb::default();
        let mut m = movie(603, "The Matrix", "1999-03-30");
        m.vote_average = 8.7;
        m.tagline = Some("Welcome to the Real World.".to_string());
        m.genres.push(genre("Science Fiction"));
        m.genres.push(genre("Action"));
        let (text, _) = export(&db, &m);

        assert!(text.contains("MERGE (movie:Movie {id:603})"));
        assert!(text.contains("ON CREATE SET movie.title = \"The Matrix\""));
        assert!(text.contains("    , movie.release = 1999"));
        assert!(text.contains("    , movie.voteAverage = 8.7"));
        assert!(text.contains("    , movie.tagline = \"Welcome to the Real World.\""));
        assert!(text.contains("    , movie:ScienceFiction"));
        assert!(text.contains("    , movie:Action"));
        assert!(text.trim_end().ends_with("RETURN movie.title;"));
    }

    #[test]
    fn zero_vote_and_empty_tagline_are_omitted() {
        let db = FakeDb::default();
        let mut m = movie(1, "Plain", "2000-01-01");
        m.tagline = Some(String::new());
        let (text, _) = export(&db, &m);
        assert!(!text.contains("voteAverage"));
        assert!(!text.contains("tagline"));
    }

    #[test]
    fn all_numeric_genre_is_dropped_rather_than_emitting_a_bare_label() {
        let db = FakeDb::default();
        let mut m = movie(1, "Plain", "2000-01-01");
        m.genres.push(genre("1917"));
        let (text, _) = export(&db, &m);
        assert!(!text.contains("movie:\n"));
        assert_eq!(line_count(&text, ", movie:"), 0);
    }

    #[test]
    fn actor_is_declared_with_roles_edge() {
        let mut db = FakeDb::default();
        db.add_person(person(10, "Martin Lawrence", "1965-04-16"));
        let mut m = movie(1, "Big Momma's House", "2000-06-02");
        m.casts.cast.push(cast(10, "Martin Lawrence", "Big Momma / Malcolm Turner"));
        m.casts.crew.push(crew(20, "Raja Gosnell", "Director"));
        let (text, _) = export(&db, &m);

        assert!(text.contains("  MERGE (Martin_Lawrence:Person {id:10})"));
        assert!(text.contains("  ON CREATE SET Martin_Lawrence.name = \"Martin Lawrence\""));
        assert!(text.contains("    , Martin_Lawrence.born = 1965"));
        assert!(!text.contains("Martin_Lawrence.died"));
        assert!(text.contains("  SET Martin_Lawrence:Actor"));
        assert!(text.contains("  MERGE (Martin_Lawrence)-[Martin_Lawrence_act:ACTS_IN]->(movie)"));
        assert!(text.contains(
            "  SET Martin_Lawrence_act.roles = [\"Big Momma\",\"Malcolm Turner\"]"
        ));
    }

    #[test]
    fn duplicate_cast_entry_unions_roles_on_the_single_edge() {
        let mut db = FakeDb::default();
        db.add_person(person(10, "Martin Lawrence", "1965-04-16"));
        let mut m = movie(1, "Big Momma's House", "2000-06-02");
        m.casts.cast.push(cast(10, "Martin Lawrence", "Big Momma"));
        m.casts.cast.push(cast(10, "Martin Lawrence", "Malcolm Turner / Big Momma"));
        let (text, _) = export(&db, &m);

        assert_eq!(line_count(&text, "MERGE (Martin_Lawrence:Person"), 1);
        assert_eq!(line_count(&text, ":ACTS_IN]->(movie)"), 1);
        assert!(text.contains(
            "  SET Martin_Lawrence_act.roles = [x IN Martin_Lawrence_act.roles WHERE NOT x IN [\"Malcolm Turner\",\"Big Momma\"]] + [\"Malcolm Turner\",\"Big Momma\"]"
        ));
    }

    #[test]
    fn ineligible_people_are_not_declared() {
        let mut db = FakeDb::default();
        db.add_person(person(11, "No Birthday", ""));
        db.add_person(person(12, "", "1970-01-01"));
        db.add_person(person(13, "2 4", "1970-01-01"));
        let mut m = movie(1, "Plain", "2000-01-01");
        m.casts.cast.push(cast(11, "No Birthday", "A"));
        m.casts.cast.push(cast(12, "", "B"));
        m.casts.crew.push(crew(13, "2 4", "Director"));
        let (text, _) = export(&db, &m);

        assert!(!text.contains(":Actor"));
        assert!(!text.contains(":Director"));
        assert!(!text.contains(":Person {id:11}"));
        assert!(!text.contains(":Person {id:12}"));
        assert!(!text.contains(":Person {id:13}"));
    }

    #[test]
    fn unresolvable_person_is_skipped_and_counted() {
        let db = FakeDb::default();
        let mut m = movie(1, "Plain", "2000-01-01");
        m.casts.cast.push(cast(99, "Ghost", "Nobody"));
        let stats = RunStats::new();
        let mut out = Vec::new();
        let mut exporter = CypherExporter::new(&db, &stats, &mut out);
        exporter.write_movie(&m).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!text.contains(":Actor"));
        assert!(text.contains("RETURN movie.title;"));
        assert_eq!(stats.people_failures(), 1);
        assert_eq!(stats.movies_exported(), 1);
    }

    #[test]
    fn director_gets_label_and_edge() {
        let mut db = FakeDb::default();
        db.add_person(person(20, "Raja Gosnell", "1958-12-25"));
        let mut m = movie(1, "Big Momma's House", "2000-06-02");
        m.casts.crew.push(crew(20, "Raja Gosnell", "Director"));
        let (text, _) = export(&db, &m);

        assert!(text.contains("  MERGE (Raja_Gosnell:Person {id:20})"));
        assert!(text.contains("  SET Raja_Gosnell:Director"));
        assert!(text.contains("  MERGE (Raja_Gosnell)-[:DIRECTED]->(movie)"));
        assert!(!text.contains(":Actor"));
    }

    #[test]
    fn non_director_crew_is_ignored() {
        let mut db = FakeDb::default();
        db.add_person(person(21, "Some Writer", "1950-01-01"));
        let mut m = movie(1, "Plain", "2000-01-01");
        m.casts.crew.push(crew(21, "Some Writer", "Writer"));
        let (text, _) = export(&db, &m);
        assert!(!text.contains("Some_Writer"));
    }

    #[test]
    fn actor_director_is_declared_once_by_the_cast_pass() {
        let mut db = FakeDb::default();
        db.add_person(person(10, "Clint Eastwood", "1930-05-31"));
        let mut m = movie(1, "Unforgiven", "1992-08-07");
        m.casts.cast.push(cast(10, "Clint Eastwood", "William Munny"));
        m.casts.crew.push(crew(10, "Clint Eastwood", "Director"));
        let (text, _) = export(&db, &m);

        assert_eq!(line_count(&text, "MERGE (Clint_Eastwood:Person"), 1);
        assert!(text.contains("  SET Clint_Eastwood:Actor"));
        assert!(text.contains("  SET Clint_Eastwood:Director"));
        assert!(text.contains("  MERGE (Clint_Eastwood)-[Clint_Eastwood_act:ACTS_IN]->(movie)"));
        assert!(text.contains("  MERGE (Clint_Eastwood)-[:DIRECTED]->(movie)"));
    }

    #[test]
    fn duplicate_director_entry_declares_once_and_merges_edge_idempotently() {
        let mut db = FakeDb::default();
        db.add_person(person(20, "Raja Gosnell", "1958-12-25"));
        let mut m = movie(1, "Plain", "2000-01-01");
        m.casts.crew.push(crew(20, "Raja Gosnell", "Director"));
        m.casts.crew.push(crew(20, "Raja Gosnell", "Director"));
        let (text, _) = export(&db, &m);

        assert_eq!(line_count(&text, "MERGE (Raja_Gosnell:Person"), 1);
        // Both entries emit a MERGE for the same edge pattern, which the
        // database resolves to a single relationship.
        assert_eq!(line_count(&text, "MERGE (Raja_Gosnell)-[:DIRECTED]->(movie)"), 2);
    }

    #[test]
    fn dead_person_gets_a_died_year() {
        let mut db = FakeDb::default();
        let mut p = person(30, "Gene Hackman", "1930-01-30");
        p.deathday = Some("2025-02-18".to_string());
        db.add_person(p);
        let mut m = movie(1, "Unforgiven", "1992-08-07");
        m.casts.cast.push(cast(30, "Gene Hackman", "Little Bill"));
        let (text, _) = export(&db, &m);
        assert!(text.contains("    , Gene_Hackman.born = 1930"));
        assert!(text.contains("    , Gene_Hackman.died = 2025"));
    }
}
