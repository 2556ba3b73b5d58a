//! Schema and configuration loading tests

#[path = "testutils/mod.rs"]
mod testutils;

use std::io::Write;

use graphplan::schema::SchemaError;
use graphplan::{var, Pattern, PlannerConfig, QueryPlanner, SchemaGraph, SchemaProvider};
use testutils::movie_fixture::{movie_schema, write_movie_schema};

#[test]
fn test_schema_round_trips_through_file() {
    testutils::init_logging();
    let (_dir, path) = write_movie_schema();
    let loaded = SchemaGraph::from_path(&path).unwrap();
    assert_eq!(loaded.len(), movie_schema().len());
    assert!(loaded.is_subtype("movie", "production"));
    assert!(loaded.can_have("movie", "title"));

    let planner = QueryPlanner::new();
    let pattern = Pattern::new(vec![var("x").unwrap().isa("movie").has("title", "Heat")]);
    assert!(planner.plan(&pattern, &loaded).is_ok());
}

#[test]
fn test_schema_without_meta_concepts_is_completed() {
    let json = r#"{
        "concepts": {
            "person": {"label": "person", "kind": "entity_type", "sup": "entity"}
        }
    }"#;
    let schema = SchemaGraph::from_json(json).unwrap();
    assert!(schema.resolve_type("thing").is_some());
    assert!(schema.is_subtype("person", "thing"));
}

#[test]
fn test_malformed_schema_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = SchemaGraph::from_path(file.path()).unwrap_err();
    assert!(matches!(err, SchemaError::SerializationError(_)));

    let err = SchemaGraph::from_path(file.path().with_extension("missing")).unwrap_err();
    assert!(matches!(err, SchemaError::IoError(_)));
}

#[test]
fn test_planner_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"cost_model": {{"instances_per_type": 1000}}, "trace_plans": true}}"#
    )
    .unwrap();
    let config = PlannerConfig::from_path(file.path()).unwrap();
    assert_eq!(config.cost_model.instances_per_type, 1000.0);

    let planner = QueryPlanner::with_config(config).unwrap();
    let schema = movie_schema();
    let plan = planner
        .plan(&Pattern::new(vec![var("x").unwrap().isa("movie")]), &schema)
        .unwrap();
    assert_eq!(plan.total_cost(), 1001.0);
    assert!(plan.trace().is_some());
}
