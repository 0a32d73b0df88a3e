use std::sync::Arc;

use chrono::Duration;
use relic_core::QuizEvent;
use relic_core::model::{CorrectYear, Points, QuizSettings};
use relic_core::time::fixed_now;
use services::{Clock, QuizLoopService, QuizSession};
use storage::pool::StaticPoolLoader;
use storage::repository::{InMemoryRepository, SessionSummaryRepository, SnapshotRepository};

const POOL: &str = r#"[
    {"imageURL": "vase.png", "correctAnswer": "Vase", "distractors": ["Urn"], "correctYear": 1200},
    {"imageURL": "lamp.png", "correctAnswer": "Oil lamp",
     "distractors": ["Jug", "Cup"], "correctYear": 300},
    {"imageURL": "clock.png", "correctAnswer": "Clock",
     "distractors": ["Barometer"], "correctYear": [1800, 1850]}
]"#;

fn loop_service(repo: &InMemoryRepository, settings: QuizSettings) -> QuizLoopService {
    loop_service_at(repo, settings, Clock::fixed(fixed_now()))
}

fn loop_service_at(
    repo: &InMemoryRepository,
    settings: QuizSettings,
    clock: Clock,
) -> QuizLoopService {
    QuizLoopService::new(
        clock,
        Arc::new(StaticPoolLoader::from_json(POOL).unwrap()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        settings,
    )
    .with_profile("smoke")
    .with_seed(42)
}

fn exact_year(session: &QuizSession) -> i32 {
    match session.attempt().unwrap().artifact().correct_year() {
        CorrectYear::Exact(year) => year,
        CorrectYear::Range { lower, .. } => lower,
    }
}

async fn play_perfect_round(svc: &QuizLoopService, session: &mut QuizSession) -> Vec<QuizEvent> {
    svc.start_round(session).unwrap();
    let answer = session.attempt().unwrap().artifact().correct_answer().to_owned();
    let year = exact_year(session);
    svc.submit(session, Some(&answer), year).await.unwrap()
}

#[tokio::test]
async fn completed_session_stores_summary_and_keeps_used_pool() {
    let repo = InMemoryRepository::new();
    let settings = QuizSettings::default().with_session_length(2).unwrap();
    let svc = loop_service(&repo, settings);

    let mut session = svc.start_session().await.unwrap();
    play_perfect_round(&svc, &mut session).await;
    let events = play_perfect_round(&svc, &mut session).await;

    let Some(QuizEvent::SessionComplete(done)) = events.last() else {
        panic!("expected session completion, got {events:?}");
    };
    assert_eq!(done.final_score, Points::whole(10));
    assert_eq!(done.max_score, Points::whole(10));
    assert!(session.is_complete());

    let summary_id = session.summary_id().expect("summary persisted");
    let summary = repo.get_summary(summary_id).await.unwrap();
    assert_eq!(summary.rounds_played(), 2);
    assert_eq!(summary.final_score(), Points::whole(10));

    let stored = repo.load_snapshot("smoke").await.unwrap().unwrap();
    assert_eq!(stored.snapshot.round_count, 0);
    assert_eq!(stored.snapshot.score, Points::ZERO);
    assert_eq!(stored.snapshot.used_pool.len(), 2);

    svc.play_again(&mut session).await.unwrap();
    assert_eq!(session.state().round_count, 0);
    assert_eq!(session.summary_id(), None);

    // The third artifact is the only one left in this cycle.
    svc.start_round(&mut session).unwrap();
    let third = session.attempt().unwrap().artifact_id();
    assert!(!stored.snapshot.used_pool.contains(third));

    let history = svc.history(10).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn reload_resumes_stored_progress() {
    let repo = InMemoryRepository::new();
    let svc = loop_service(&repo, QuizSettings::default());

    let mut session = svc.start_session().await.unwrap();
    play_perfect_round(&svc, &mut session).await;
    drop(session);

    let resumed = svc.start_session().await.unwrap();
    assert!(resumed.is_resumed());
    assert_eq!(resumed.state().round_count, 1);
    assert_eq!(resumed.state().score, Points::whole(5));
    assert_eq!(resumed.state().used_pool.len(), 1);
}

#[tokio::test]
async fn resumed_session_keeps_its_original_start() {
    let repo = InMemoryRepository::new();
    let settings = QuizSettings::default().with_session_length(2).unwrap();
    let first = loop_service(&repo, settings.clone());

    let mut session = first.start_session().await.unwrap();
    play_perfect_round(&first, &mut session).await;
    drop(session);

    let stored = repo.load_snapshot("smoke").await.unwrap().unwrap();
    assert_eq!(stored.snapshot.started_at, Some(fixed_now()));

    let later = fixed_now() + Duration::minutes(10);
    let second = loop_service_at(&repo, settings, Clock::fixed(later));
    let mut resumed = second.start_session().await.unwrap();
    assert!(resumed.is_resumed());
    assert_eq!(resumed.started_at(), fixed_now());

    play_perfect_round(&second, &mut resumed).await;
    let summary = repo
        .get_summary(resumed.summary_id().expect("summary persisted"))
        .await
        .unwrap();
    assert_eq!(summary.started_at(), fixed_now());
    assert_eq!(summary.completed_at(), later);

    let next = repo.load_snapshot("smoke").await.unwrap().unwrap();
    assert_eq!(next.snapshot.started_at, None);
}

#[tokio::test]
async fn timer_expiry_finalizes_and_persists() {
    let repo = InMemoryRepository::new();
    let settings = QuizSettings::default()
        .with_timed_mode(true)
        .with_time_limit_secs(5)
        .unwrap();
    let svc = loop_service(&repo, settings);

    let mut session = svc.start_session().await.unwrap();
    let ready = svc.start_round(&mut session).unwrap();
    assert_eq!(ready.time_limit_secs, Some(5));
    assert!(session.has_live_timer());

    for expected in (1..5).rev() {
        let events = svc.tick(&mut session).await.unwrap();
        assert_eq!(events, vec![QuizEvent::TimerTick { remaining_secs: expected }]);
    }

    let events = svc.tick(&mut session).await.unwrap();
    let Some(QuizEvent::FinalFeedback(feedback)) = events.get(1) else {
        panic!("expected final feedback, got {events:?}");
    };
    assert!(feedback.timed_out);
    assert_eq!(feedback.selected_answer, None);
    assert!(!session.has_live_timer());

    let stored = repo.load_snapshot("smoke").await.unwrap().unwrap();
    assert_eq!(stored.snapshot.round_count, 1);
    assert_eq!(stored.snapshot.score, feedback.cumulative_score);
}
