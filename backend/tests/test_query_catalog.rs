use cricket_backend::{run_load, CellValue, QueryCatalog, QueryError, QueryRunner};

mod helpers;
use helpers as h;

fn count_at(row: &[CellValue], idx: usize) -> i64 {
    match row[idx] {
        CellValue::Integer(v) => v,
        ref other => panic!("expected an integer count, got {:?}", other),
    }
}

#[test]
fn test_top_test_players_after_truncated_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    h::write_datasets(dir.path(), 600);
    let settings = h::settings_for(dir.path());
    run_load(&settings);

    let catalog = QueryCatalog::new();
    let runner = QueryRunner::open(&settings.db_path, &catalog).expect("open");
    let result = runner.run("top_test_players").expect("query");

    assert_eq!(result.columns, vec!["player_of_match".to_string(), "awards_count".to_string()]);
    assert!(!result.rows.is_empty());
    assert!(result.rows.len() <= 10);

    let idx = result.column_index("awards_count").expect("awards_count column");
    let counts: Vec<i64> = result.rows.iter().map(|r| count_at(r, idx)).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "not descending: {:?}", counts);
    // 500 rows spread over 15 players
    assert_eq!(counts.iter().copied().max(), Some(34));
}

#[test]
fn test_every_catalog_query_runs_on_empty_tables() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("cricket.sqlite");
    let mut dbm = h::connected_manager(&db_path);
    dbm.close();

    let catalog = QueryCatalog::new();
    let runner = QueryRunner::open(&db_path, &catalog).expect("open");

    let results = runner.run_all(None);
    assert_eq!(results.len(), catalog.len());
    for res in results {
        let result = match res {
            Ok(r) => r,
            Err(e) => panic!("query failed: {}", e),
        };
        assert!(result.rows.is_empty(), "{} returned rows", result.name);
        assert!(!result.columns.is_empty());
    }
}

#[test]
fn test_smallest_margin_wickets_ascending() {
    let dir = tempfile::tempdir().expect("tempdir");
    h::write_datasets(dir.path(), 50);
    let settings = h::settings_for(dir.path());
    run_load(&settings);

    let catalog = QueryCatalog::new();
    let runner = QueryRunner::open(&settings.db_path, &catalog).expect("open");
    let result = runner.run("smallest_margin_wickets_t20").expect("query");

    assert_eq!(result.columns, vec!["match_id", "outcome_by_wickets", "season"]);
    assert_eq!(result.rows.len(), 10);
    let margins: Vec<i64> = result.rows.iter().map(|r| count_at(r, 1)).collect();
    assert!(margins.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(margins[0], 2);
}

#[test]
fn test_gender_distribution_counts_all_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    h::write_datasets(dir.path(), 30);
    let settings = h::settings_for(dir.path());
    run_load(&settings);

    let catalog = QueryCatalog::new();
    let runner = QueryRunner::open(&settings.db_path, &catalog).expect("open");
    let result = runner.run("gender_distribution_t20").expect("query");

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0][0], CellValue::Text("male".to_string()));
    assert_eq!(result.rows[0][1], CellValue::Integer(20));
    assert_eq!(result.rows[1][1], CellValue::Integer(10));
}

#[test]
fn test_run_all_for_one_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    h::write_datasets(dir.path(), 20);
    let settings = h::settings_for(dir.path());
    run_load(&settings);

    let catalog = QueryCatalog::new();
    let runner = QueryRunner::open(&settings.db_path, &catalog).expect("open");
    let names: Vec<String> = runner
        .run_all(Some(cricket_backend::MatchFormat::Odi))
        .into_iter()
        .map(|r| r.expect("query").name)
        .collect();

    assert_eq!(names, vec!["highest_run_victories_odi", "overs_distribution_odi", "frequent_venues_odi"]);
}

#[test]
fn test_unknown_query_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("cricket.sqlite");
    h::connected_manager(&db_path);

    let catalog = QueryCatalog::new();
    let runner = QueryRunner::open(&db_path, &catalog).expect("open");
    assert!(matches!(runner.run("drop_everything"), Err(QueryError::UnknownQuery(_))));
}

#[test]
fn test_open_missing_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = QueryCatalog::new();
    let res = QueryRunner::open(&dir.path().join("absent.sqlite"), &catalog);
    assert!(matches!(res, Err(QueryError::Open { .. })));
}
