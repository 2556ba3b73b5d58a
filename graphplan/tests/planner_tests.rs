//! Planner tests
//!
//! Properties every plan must satisfy: one fragment per equivalent set,
//! dependency soundness, determinism, and clean failure instead of a
//! partial plan.

#[path = "testutils/mod.rs"]
mod testutils;

use std::collections::{BTreeSet, HashSet};

use graphplan::pattern::{ValuePredicate, Var};
use graphplan::plan::{lower, ContractViolation, FragmentArena, PlanningError};
use graphplan::{
    anon, var, EquivalentFragmentSet, ErrorKind, Fragment, GraphPlanError, MatchQuery, Pattern,
    PlannerConfig, QueryContext, QueryPlanner,
};
use testutils::movie_fixture::movie_schema;
use testutils::recording_executor::{FailingExecutor, RecordingExecutor};

fn v(name: &str) -> Var {
    Var::new(name).unwrap()
}

fn godfather_cast() -> Pattern {
    Pattern::new(vec![
        var("x").unwrap().isa("movie").has("title", "Godfather"),
        anon()
            .isa("has-cast")
            .rel_role("production-with-cast", v("x"))
            .rel_role("actor", v("y")),
        var("y").unwrap().isa("person").has("name", ValuePredicate::Regex("^Al".into())),
    ])
}

fn rendered(plan: &graphplan::Plan) -> Vec<String> {
    plan.fragments().map(|f| f.to_string()).collect()
}

#[test]
fn test_one_fragment_per_set() {
    testutils::init_logging();
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let pattern = godfather_cast();

    let plan = planner.plan(&pattern, &schema).unwrap();
    let arena = FragmentArena::build(lower(&pattern).unwrap());
    assert_eq!(plan.len(), arena.len());

    let mut seen = HashSet::new();
    for step in plan.steps() {
        assert!(seen.insert(step.set), "set {} planned twice", step.set);
        assert!(arena.set(step.set).unwrap().contains(&step.fragment));
    }
}

#[test]
fn test_range_on_one_variable_keeps_both_bounds() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let pattern = Pattern::new(vec![
        var("x").unwrap().isa("movie").has_var("tmdb-vote-count", v("n")),
        var("n")
            .unwrap()
            .val(ValuePredicate::gt(3i64))
            .val(ValuePredicate::lt(10i64)),
    ]);
    let plan = planner.plan(&pattern, &schema).unwrap();
    let steps = rendered(&plan);
    assert_eq!(plan.len(), 5);
    assert!(steps.contains(&"$n[value:> 3]".to_string()), "{:?}", steps);
    assert!(steps.contains(&"$n[value:< 10]".to_string()), "{:?}", steps);
}

#[test]
fn test_one_player_in_two_roles_keeps_both_role_players() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let pattern = Pattern::new(vec![var("r")
        .unwrap()
        .isa("has-cast")
        .rel_role("actor", v("x"))
        .rel_role("character-being-played", v("x"))]);
    let plan = planner.plan(&pattern, &schema).unwrap();
    let steps = rendered(&plan);
    assert_eq!(plan.len(), 6);
    assert!(steps.iter().any(|s| s.contains("rel:actor")), "{:?}", steps);
    assert!(
        steps.iter().any(|s| s.contains("rel:character-being-played")),
        "{:?}",
        steps
    );
}

#[test]
fn test_plan_is_dependency_sound() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let pattern = Pattern::new(vec![
        var("x").unwrap().isa("movie").has_var("tmdb-vote-count", v("a")),
        var("y").unwrap().isa("movie").has_var("tmdb-vote-count", v("b")),
        var("b").unwrap().val(ValuePredicate::gt(v("a"))),
        var("x").unwrap().neq(v("y")),
    ]);
    let plan = planner.plan(&pattern, &schema).unwrap();
    assert!(plan.is_dependency_sound());

    let mut bound: BTreeSet<Var> = BTreeSet::new();
    for fragment in plan.fragments() {
        for dependency in fragment.dependencies() {
            assert!(bound.contains(dependency), "{} ran before {}", fragment, dependency);
        }
        bound.extend(fragment.variable_names().iter().cloned());
    }
}

#[test]
fn test_planning_is_deterministic() {
    let schema = movie_schema();
    let pattern = godfather_cast();
    let first = QueryPlanner::new().plan(&pattern, &schema).unwrap();
    let second = QueryPlanner::new().plan(&pattern, &schema).unwrap();
    assert_eq!(rendered(&first), rendered(&second));
    assert_eq!(first.total_cost(), second.total_cost());
}

#[test]
fn test_plan_starts_from_cheapest_lookup() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let plan = planner
        .plan(&Pattern::new(vec![var("x").unwrap().isa("movie")]), &schema)
        .unwrap();
    assert_eq!(
        rendered(&plan),
        vec!["$_label-movie[label:movie]", "$_label-movie<-[isa]-$x"]
    );
}

#[test]
fn test_literal_value_is_used_as_index_entry_point() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let plan = planner
        .plan(
            &Pattern::new(vec![var("x").unwrap().has("title", "Godfather")]),
            &schema,
        )
        .unwrap();
    assert_eq!(
        rendered(&plan),
        vec!["$_attr0[value:\"Godfather\"]", "$_attr0<-[has:title]-$x"]
    );
}

#[test]
fn test_start_vars_change_the_entry_point() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let pattern = Pattern::new(vec![var("x").unwrap().has_var("title", v("t"))]);
    let start: BTreeSet<Var> = [v("x")].into_iter().collect();
    let plan = planner.plan_with_start(&pattern, &schema, &start).unwrap();
    assert_eq!(rendered(&plan), vec!["$x-[has:title]->$t"]);
    assert_eq!(plan.start_vars(), &start);
}

#[test]
fn test_equivalent_sets_with_aux_vars_are_equal() {
    let a = EquivalentFragmentSet::new(vec![
        Fragment::out_role_player(v("r"), v("x"), Some(v("role1")), None),
        Fragment::in_role_player(v("x"), v("r"), Some(v("role1")), None),
    ])
    .unwrap();
    let b = EquivalentFragmentSet::new(vec![
        Fragment::in_role_player(v("x"), v("r"), Some(v("role2")), None),
        Fragment::out_role_player(v("r"), v("x"), Some(v("role2")), None),
    ])
    .unwrap();
    assert_eq!(a, b);
    assert_eq!(FragmentArena::build(vec![a, b]).len(), 1);
}

#[test]
fn test_fragment_without_set_is_a_contract_violation() {
    let arena = FragmentArena::build(lower(&godfather_cast()).unwrap());
    let stray = Fragment::id(v("nowhere"), "V42");
    let err: GraphPlanError = arena.owning_set(&stray).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::Contract);

    let err = EquivalentFragmentSet::new(Vec::new()).unwrap_err();
    assert_eq!(err, ContractViolation::EmptyFragmentSet);
}

#[test]
fn test_cyclic_dependency_fails_without_partial_plan() {
    let planner = QueryPlanner::new();
    let sets = vec![
        EquivalentFragmentSet::new(vec![Fragment::value(v("a"), ValuePredicate::gt(v("b")))]).unwrap(),
        EquivalentFragmentSet::new(vec![Fragment::value(v("b"), ValuePredicate::gt(v("a")))]).unwrap(),
        EquivalentFragmentSet::new(vec![Fragment::label(v("t"), "movie")]).unwrap(),
    ];
    let err = planner.plan_sets(sets, &BTreeSet::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Planning);
    assert!(matches!(
        err,
        GraphPlanError::Planning(PlanningError::CyclicDependency { .. })
    ));
    assert!(err.to_string().contains("$a"));
}

#[test]
fn test_unbound_dependency_fails() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let pattern = Pattern::new(vec![
        var("x").unwrap().isa("movie").has_var("title", v("t")),
        var("t").unwrap().val(ValuePredicate::eq(v("missing"))),
    ]);
    let err = planner.plan(&pattern, &schema).unwrap_err();
    match err {
        GraphPlanError::Planning(PlanningError::UnboundDependencies { variables, .. }) => {
            assert_eq!(variables, vec!["$missing".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_trace_explains_every_step() {
    let planner = QueryPlanner::with_config(PlannerConfig::tracing()).unwrap();
    let schema = movie_schema();
    let plan = planner.plan(&godfather_cast(), &schema).unwrap();
    let trace = plan.trace().unwrap();
    assert_eq!(trace.steps.len(), plan.len());
    for (step, traced) in plan.steps().iter().zip(&trace.steps) {
        assert_eq!(step.fragment.to_string(), traced.chosen);
        assert!(traced.candidates >= 1);
    }
}

#[test]
fn test_match_query_executes_plan_in_order() {
    testutils::init_logging();
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let executor = RecordingExecutor::new();
    let ctx = QueryContext {
        planner: &planner,
        schema: &schema,
        executor: &executor,
    };

    let query = MatchQuery::new(godfather_cast())
        .unwrap()
        .select(vec![v("y")])
        .unwrap();
    let answers: Vec<_> = query.stream(ctx).collect::<graphplan::Result<_>>().unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].keys().cloned().collect::<Vec<_>>(), vec![v("y")]);

    let plan = query.plan(&planner, &schema).unwrap();
    assert_eq!(executor.visited(), rendered(&plan));
}

#[test]
fn test_traversal_failure_is_a_data_error() {
    let planner = QueryPlanner::new();
    let schema = movie_schema();
    let ctx = QueryContext {
        planner: &planner,
        schema: &schema,
        executor: &FailingExecutor,
    };
    let query = MatchQuery::new(Pattern::new(vec![var("x").unwrap().isa("movie")])).unwrap();
    let err = query.stream(ctx).next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.to_string().contains("storage unavailable"));
}
