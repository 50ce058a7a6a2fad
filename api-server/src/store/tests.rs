use ecocity_snake_core::{
    submit_run, Identity, LeaderboardEntry, LeaderboardStore, ProfileStore, ProfileUpdate,
    RunResult,
};
use tempfile::TempDir;

use super::*;

fn test_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path()).unwrap();
    (store, dir)
}

fn update(score: u32, at: u64, highest: Option<u32>) -> ProfileUpdate {
    ProfileUpdate {
        last_run_score: score,
        last_run_timestamp_ms: at,
        highest_score: highest,
    }
}

fn row(id: &str, score: u32) -> LeaderboardEntry {
    LeaderboardEntry {
        id: id.to_string(),
        name: format!("name-{id}"),
        photo_url: None,
        highest_score: score,
    }
}

fn player(id: &str) -> Identity {
    Identity {
        id: id.to_string(),
        display_name: Some("Ada".to_string()),
        photo_url: Some("https://img.example/ada.png".to_string()),
    }
}

#[test]
fn open_creates_data_dir() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    SqliteStore::open(&nested).unwrap();
    assert!(nested.join("ecocity.db").exists());
}

#[test]
fn missing_profile_reads_as_none() {
    let (store, _dir) = test_store();
    assert!(store.get_profile("nobody").unwrap().is_none());
    assert_eq!(store.highest_score("nobody").unwrap(), None);
}

#[test]
fn merge_keeps_highest_score_when_update_omits_it() {
    let (store, _dir) = test_store();
    store.merge_profile("u1", &update(40, 1_000, Some(40))).unwrap();
    store.merge_profile("u1", &update(15, 2_000, None)).unwrap();

    let profile = store.get_profile("u1").unwrap().unwrap();
    assert_eq!(profile.last_run_score, 15);
    assert_eq!(profile.last_run_timestamp_ms, 2_000);
    assert_eq!(profile.highest_score, Some(40));
    assert_eq!(store.highest_score("u1").unwrap(), Some(40));
}

#[test]
fn first_merge_without_best_leaves_it_null() {
    let (store, _dir) = test_store();
    store.merge_profile("u1", &update(0, 1_000, None)).unwrap();
    let profile = store.get_profile("u1").unwrap().unwrap();
    assert_eq!(profile.highest_score, None);
}

#[test]
fn upsert_replaces_row_fields() {
    let (store, _dir) = test_store();
    store.upsert_entry(&row("u1", 10)).unwrap();

    let mut newer = row("u1", 30);
    newer.name = "Renamed".to_string();
    newer.photo_url = Some("https://img.example/new.png".to_string());
    store.upsert_entry(&newer).unwrap();

    let rows = store.top_entries(10).unwrap();
    assert_eq!(rows, vec![newer]);
    assert_eq!(store.counts().unwrap(), (0, 1));
}

#[test]
fn stale_previous_best_cannot_lower_stored_scores() {
    let (store, _dir) = test_store();
    let first = RunResult {
        score: 90,
        finished_at_ms: 1_000,
    };
    submit_run(&store, &store, Some(&player("u1")), first, Some(0));

    // The client still believes its best is 10, so 50 looks like a new best.
    let stale = RunResult {
        score: 50,
        finished_at_ms: 2_000,
    };
    let report = submit_run(&store, &store, Some(&player("u1")), stale, Some(10));
    assert!(report.new_best);
    assert!(report.is_clean());

    let profile = store.get_profile("u1").unwrap().unwrap();
    assert_eq!(profile.last_run_score, 50);
    assert_eq!(profile.highest_score, Some(90));
    let rows = store.top_entries(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].highest_score, 90);
}

#[test]
fn lower_upsert_keeps_score_but_updates_name() {
    let (store, _dir) = test_store();
    store.upsert_entry(&row("u1", 30)).unwrap();
    store.upsert_entry(&row("u2", 30)).unwrap();

    let mut renamed = row("u1", 5);
    renamed.name = "Renamed".to_string();
    store.upsert_entry(&renamed).unwrap();

    let rows = store.top_entries(10).unwrap();
    let u1 = rows.iter().find(|r| r.id == "u1").unwrap();
    assert_eq!(u1.name, "Renamed");
    assert_eq!(u1.highest_score, 30);
}

#[test]
fn top_entries_ranks_and_limits() {
    let (store, _dir) = test_store();
    for (id, score) in [("a", 5), ("b", 50), ("c", 20), ("d", 35)] {
        store.upsert_entry(&row(id, score)).unwrap();
    }
    let rows = store.top_entries(3).unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "c"]);
}

#[test]
fn submit_equal_score_writes_profile_only() {
    let (store, _dir) = test_store();
    let run = RunResult {
        score: 100,
        finished_at_ms: 5_000,
    };
    let report = submit_run(&store, &store, Some(&player("u1")), run, Some(100));
    assert!(report.attempted);
    assert!(!report.new_best);
    assert!(report.is_clean());

    assert_eq!(store.counts().unwrap(), (1, 0));
    let profile = store.get_profile("u1").unwrap().unwrap();
    assert_eq!(profile.last_run_score, 100);
    assert_eq!(profile.last_run_timestamp_ms, 5_000);
}

#[test]
fn submit_new_best_writes_both() {
    let (store, _dir) = test_store();
    let run = RunResult {
        score: 101,
        finished_at_ms: 6_000,
    };
    let report = submit_run(&store, &store, Some(&player("u1")), run, Some(100));
    assert!(report.new_best);

    let rows = store.top_entries(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].highest_score, 101);
    assert_eq!(rows[0].name, "Ada");
    assert_eq!(store.highest_score("u1").unwrap(), Some(101));
}

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = SqliteStore::open(dir.path()).unwrap();
        store.merge_profile("u1", &update(7, 1, Some(7))).unwrap();
        store.upsert_entry(&row("u1", 7)).unwrap();
    }
    let store = SqliteStore::open(dir.path()).unwrap();
    assert_eq!(store.highest_score("u1").unwrap(), Some(7));
    assert_eq!(store.top_entries(1).unwrap().len(), 1);
}
