use chrono::Duration;
use relic_core::model::{ArtifactId, Points, SessionSnapshot, SessionSummary};
use relic_core::time::fixed_now;
use storage::repository::{
    SessionSummaryRepository, SnapshotRepository, Storage, StorageError,
};
use storage::sqlite::{DatabaseLocation, SqliteRepository};

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn summary(minutes: i64, score_halves: u32) -> SessionSummary {
    let started = fixed_now() + Duration::minutes(minutes);
    SessionSummary::from_persisted(
        started,
        started + Duration::minutes(2),
        5,
        Points::from_halves(score_halves),
        Points::whole(25),
    )
    .unwrap()
}

#[tokio::test]
async fn snapshot_upsert_replaces_previous_progress() {
    let repo = connect("memdb_snapshot_upsert").await;
    assert!(repo.load_snapshot("default").await.unwrap().is_none());

    let first = SessionSnapshot {
        round_count: 1,
        score: Points::from_halves(5),
        used_pool: [ArtifactId::new(2)].into_iter().collect(),
        started_at: None,
    };
    repo.save_snapshot("default", &first, fixed_now())
        .await
        .unwrap();

    let second = SessionSnapshot {
        round_count: 2,
        score: Points::from_halves(15),
        used_pool: [2, 0].into_iter().map(ArtifactId::new).collect(),
        started_at: Some(fixed_now()),
    };
    let later = fixed_now() + Duration::seconds(30);
    repo.save_snapshot("default", &second, later).await.unwrap();

    let stored = repo.load_snapshot("default").await.unwrap().unwrap();
    assert_eq!(stored.snapshot, second);
    assert_eq!(stored.saved_at, later);

    repo.clear_snapshot("default").await.unwrap();
    assert!(repo.load_snapshot("default").await.unwrap().is_none());
}

#[tokio::test]
async fn snapshots_are_isolated_per_profile() {
    let repo = connect("memdb_snapshot_profiles").await;
    let snapshot = SessionSnapshot {
        round_count: 3,
        score: Points::whole(9),
        used_pool: [ArtifactId::new(1)].into_iter().collect(),
        started_at: None,
    };
    repo.save_snapshot("ada", &snapshot, fixed_now())
        .await
        .unwrap();

    assert!(repo.load_snapshot("grace").await.unwrap().is_none());
    assert_eq!(
        repo.load_snapshot("ada").await.unwrap().unwrap().snapshot,
        snapshot
    );
}

#[tokio::test]
async fn summaries_round_trip_half_points_and_list_latest_first() {
    let repo = connect("memdb_summaries").await;
    let older = repo.append_summary(&summary(0, 25)).await.unwrap();
    let newer = repo.append_summary(&summary(10, 41)).await.unwrap();
    assert_ne!(older, newer);

    let fetched = repo.get_summary(older).await.unwrap();
    assert_eq!(fetched.final_score(), Points::from_halves(25));
    assert_eq!(fetched.max_score(), Points::whole(25));
    assert_eq!(fetched.rounds_played(), 5);

    let rows = repo.list_summaries(10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, newer);
    assert_eq!(rows[0].summary.final_score(), Points::from_halves(41));
    assert_eq!(rows[1].id, older);

    assert_eq!(repo.list_summaries(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_summary_is_not_found() {
    let repo = connect("memdb_summary_missing").await;
    assert!(matches!(
        repo.get_summary(404).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn migrations_can_run_twice() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn open_creates_missing_database_directory() {
    let root = std::env::temp_dir().join(format!("relic-open-{}", std::process::id()));
    let location = DatabaseLocation::File(root.join("nested/quiz.sqlite3"));

    let storage = Storage::open(&location).await.expect("open");
    assert!(root.join("nested/quiz.sqlite3").exists());
    assert!(storage.snapshots.load_snapshot("default").await.unwrap().is_none());

    drop(storage);
    let _ = std::fs::remove_dir_all(&root);
}
