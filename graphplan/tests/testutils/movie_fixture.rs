//! Movie schema fixture

use graphplan::pattern::DataType;
use graphplan::{SchemaConcept, SchemaGraph};
use std::path::PathBuf;

/// Productions, people, genres and characters, with casting and genre relations
pub fn movie_schema() -> SchemaGraph {
    SchemaGraph::new()
        .define(SchemaConcept::role("production-with-cast"))
        .define(SchemaConcept::role("actor"))
        .define(SchemaConcept::role("character-being-played"))
        .define(SchemaConcept::role("production-with-genre"))
        .define(SchemaConcept::role("genre-of-production"))
        .define(SchemaConcept::role("director"))
        .define(SchemaConcept::role("production-being-directed"))
        .define(
            SchemaConcept::relation("has-cast")
                .relates("production-with-cast")
                .relates("actor")
                .relates("character-being-played"),
        )
        .define(
            SchemaConcept::relation("has-genre")
                .relates("production-with-genre")
                .relates("genre-of-production"),
        )
        .define(
            SchemaConcept::relation("directed-by")
                .relates("production-being-directed")
                .relates("director"),
        )
        .define(SchemaConcept::relation("character-in-production"))
        .define(SchemaConcept::resource("title", DataType::String))
        .define(SchemaConcept::resource("name", DataType::String))
        .define(SchemaConcept::resource("tmdb-vote-count", DataType::Long))
        .define(
            SchemaConcept::entity("production")
                .plays("production-with-cast")
                .plays("production-with-genre")
                .plays("production-being-directed")
                .has("title")
                .has("tmdb-vote-count"),
        )
        .define(SchemaConcept::entity("movie").sub("production"))
        .define(
            SchemaConcept::entity("person")
                .plays("actor")
                .plays("director")
                .has("name"),
        )
        .define(SchemaConcept::entity("genre").plays("genre-of-production").has("name"))
        .define(
            SchemaConcept::entity("character")
                .plays("character-being-played")
                .has("name"),
        )
}

/// A schema with `person` and `name` but no `has` between them
pub fn schema_without_has() -> SchemaGraph {
    SchemaGraph::new()
        .define(SchemaConcept::entity("person"))
        .define(SchemaConcept::resource("name", DataType::String))
}

/// Write the movie schema to a JSON file inside a fresh temporary directory
pub fn write_movie_schema() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("movie_schema.json");
    let json = movie_schema().to_json().expect("Failed to serialize schema");
    std::fs::write(&path, json).expect("Failed to write schema");
    (dir, path)
}
