use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};
use ulid::Ulid;

use super::*;
use crate::limits::RESERVATION_DURATION_MS;
use crate::model::*;

async fn engine_with_users(emails: &[&str]) -> (Engine, Vec<Ulid>) {
    let engine = Engine::new();
    let mut ids = Vec::new();
    for email in emails {
        ids.push(engine.login(email).await.unwrap().id);
    }
    (engine, ids)
}

async fn seat_status(engine: &Engine, floor: u32, seat_id: &str) -> SeatStatus {
    engine
        .get_seats(Some(floor))
        .await
        .into_iter()
        .find(|s| s.id == seat_id)
        .unwrap()
        .status
}

async fn reservation_count(engine: &Engine) -> usize {
    engine.store().reservations.read().await.len()
}

// ── Seat queries ─────────────────────────────────────────

#[tokio::test]
async fn seats_start_available() {
    let engine = Engine::new();
    let seats = engine.get_seats(None).await;
    assert_eq!(seats.len(), 60);
    assert!(seats.iter().all(|s| s.status == SeatStatus::Available));
}

#[tokio::test]
async fn seats_filtered_by_floor() {
    let engine = Engine::new();
    let seats = engine.get_seats(Some(2)).await;
    assert_eq!(seats.len(), 20);
    assert!(seats.iter().all(|s| s.floor == 2));
    assert_eq!(seats[0].id, "seat-2-01");
}

#[tokio::test]
async fn unknown_floor_is_empty() {
    let engine = Engine::new();
    assert!(engine.get_seats(Some(7)).await.is_empty());
}

#[tokio::test]
async fn floor_summaries_count_occupied() {
    let (engine, users) = engine_with_users(&["a@x.org", "b@x.org"]).await;
    engine.create_reservation(users[0], "seat-1-01").await.unwrap();
    engine.create_reservation(users[1], "seat-3-05").await.unwrap();

    let summaries = engine.floor_summaries().await;
    assert_eq!(summaries.len(), 3);
    assert_eq!(
        summaries[0],
        FloorSummary {
            floor: 1,
            total: 20,
            occupied: 1,
            available: 19,
        }
    );
    assert_eq!(summaries[1].occupied, 0);
    assert_eq!(summaries[2].occupied, 1);
}

#[tokio::test]
async fn get_seat_reports_status() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    engine.create_reservation(users[0], "seat-2-03").await.unwrap();
    let seat = engine.get_seat("seat-2-03").await.unwrap();
    assert_eq!(seat.status, SeatStatus::Occupied);
    assert!(engine.get_seat("seat-0-00").await.is_none());
}

// ── Create ───────────────────────────────────────────────

#[tokio::test]
async fn create_then_active_reservation_matches() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    let created = assert_ok!(engine.create_reservation(users[0], "seat-1-01").await);

    assert_eq!(created.status, ReservationStatus::Active);
    assert_eq!(created.seat_id, "seat-1-01");
    assert_eq!(created.seat_label, "1F-01");
    assert_eq!(created.floor, 1);
    assert_eq!(created.end_at, Some(created.start_at + RESERVATION_DURATION_MS));
    assert_eq!(created.canceled_at, None);

    let active = engine.get_active_reservation(users[0]).await;
    assert_eq!(active, Some(created));
}

#[tokio::test]
async fn create_on_occupied_seat_conflicts() {
    let (engine, users) = engine_with_users(&["a@x.org", "b@x.org"]).await;
    engine.create_reservation(users[0], "seat-1-01").await.unwrap();

    let err = assert_err!(engine.create_reservation(users[1], "seat-1-01").await);
    assert!(matches!(err, EngineError::SeatTaken(ref s) if s == "seat-1-01"));
    assert!(err.is_conflict());
    assert_eq!(err.to_string(), "seat already taken");

    assert_eq!(reservation_count(&engine).await, 1);
    assert!(engine.get_active_reservation(users[1]).await.is_none());
}

#[tokio::test]
async fn create_with_active_reservation_conflicts_on_any_seat() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    engine.create_reservation(users[0], "seat-1-01").await.unwrap();

    for seat in ["seat-1-02", "seat-3-20", "seat-1-01"] {
        let err = engine.create_reservation(users[0], seat).await.unwrap_err();
        assert!(matches!(err, EngineError::UserHasActiveReservation(_)));
        assert_eq!(err.to_string(), "user already has an active reservation");
    }
    assert_eq!(reservation_count(&engine).await, 1);
}

#[tokio::test]
async fn user_check_runs_before_seat_check() {
    let (engine, users) = engine_with_users(&["a@x.org", "b@x.org"]).await;
    engine.create_reservation(users[0], "seat-1-01").await.unwrap();
    engine.create_reservation(users[1], "seat-1-02").await.unwrap();

    // Both invariants would be violated; the user conflict wins.
    let err = engine.create_reservation(users[1], "seat-1-01").await.unwrap_err();
    assert!(matches!(err, EngineError::UserHasActiveReservation(_)));
}

#[tokio::test]
async fn create_unknown_seat_fails_without_conflict() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    let err = engine.create_reservation(users[0], "seat-9-99").await.unwrap_err();
    assert!(matches!(err, EngineError::SeatNotFound(_)));
    assert!(!err.is_conflict());
    assert_eq!(reservation_count(&engine).await, 0);
}

#[tokio::test]
async fn create_unknown_user_fails() {
    let engine = Engine::new();
    let err = engine.create_reservation(Ulid::new(), "seat-1-01").await.unwrap_err();
    assert!(matches!(err, EngineError::UserNotFound(_)));
    assert_eq!(reservation_count(&engine).await, 0);
}

// ── Cancel ───────────────────────────────────────────────

#[tokio::test]
async fn cancel_frees_seat_for_another_user() {
    let (engine, users) = engine_with_users(&["a@x.org", "b@x.org"]).await;
    let r = engine.create_reservation(users[0], "seat-1-01").await.unwrap();

    assert!(engine.cancel_reservation(r.id).await);

    let canceled = engine.get_reservation(r.id).await.unwrap();
    assert_eq!(canceled.status, ReservationStatus::Canceled);
    assert!(canceled.canceled_at.is_some());
    assert!(engine.get_active_reservation(users[0]).await.is_none());

    let taken = engine.create_reservation(users[1], "seat-1-01").await.unwrap();
    assert_eq!(taken.user_id, users[1]);
}

#[tokio::test]
async fn cancel_unknown_id_is_noop() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    let r = engine.create_reservation(users[0], "seat-1-01").await.unwrap();

    assert!(!engine.cancel_reservation(Ulid::new()).await);

    assert_eq!(reservation_count(&engine).await, 1);
    assert_eq!(engine.get_reservation(r.id).await, Some(r));
}

#[tokio::test]
async fn cancel_twice_keeps_first_timestamp() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    let r = engine.create_reservation(users[0], "seat-1-01").await.unwrap();

    assert!(engine.cancel_reservation(r.id).await);
    let first = engine.get_reservation(r.id).await.unwrap();
    assert!(!engine.cancel_reservation(r.id).await);
    let second = engine.get_reservation(r.id).await.unwrap();
    assert_eq!(first, second);
}

// ── History ──────────────────────────────────────────────

#[tokio::test]
async fn history_is_newest_first_and_per_user() {
    let (engine, users) = engine_with_users(&["a@x.org", "b@x.org"]).await;

    let mut created = Vec::new();
    for seat in ["seat-1-01", "seat-1-02", "seat-2-01"] {
        let r = engine.create_reservation(users[0], seat).await.unwrap();
        engine.cancel_reservation(r.id).await;
        created.push(r.id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    let last = engine.create_reservation(users[0], "seat-3-01").await.unwrap();
    created.push(last.id);
    engine.create_reservation(users[1], "seat-3-02").await.unwrap();

    let history = engine.get_history(users[0]).await;
    let ids: Vec<Ulid> = history.iter().map(|r| r.id).collect();
    created.reverse();
    assert_eq!(ids, created);
    assert!(history.windows(2).all(|w| w[0].start_at >= w[1].start_at));
    assert_eq!(history[0].status, ReservationStatus::Active);
    assert!(history[1..].iter().all(|r| r.status == ReservationStatus::Canceled));
}

#[tokio::test]
async fn history_of_unknown_user_is_empty() {
    let engine = Engine::new();
    assert!(engine.get_history(Ulid::new()).await.is_empty());
}

// ── Scenarios ────────────────────────────────────────────

#[tokio::test]
async fn scenario_reserve_cancel_rebook() {
    let (engine, users) = engine_with_users(&["a@x.org", "b@x.org"]).await;

    let r = engine.create_reservation(users[0], "seat-1-01").await.unwrap();
    assert_eq!(seat_status(&engine, 1, "seat-1-01").await, SeatStatus::Occupied);

    engine.cancel_reservation(r.id).await;
    assert_eq!(seat_status(&engine, 1, "seat-1-01").await, SeatStatus::Available);

    engine.create_reservation(users[1], "seat-1-01").await.unwrap();
    assert_eq!(seat_status(&engine, 1, "seat-1-01").await, SeatStatus::Occupied);
}

#[tokio::test]
async fn scenario_second_reservation_before_cancel() {
    let (engine, users) = engine_with_users(&["a@x.org"]).await;
    engine.create_reservation(users[0], "seat-1-01").await.unwrap();
    let err = engine.create_reservation(users[0], "seat-2-10").await.unwrap_err();
    assert!(err.to_string().contains("already has an active reservation"));
}

// ── Concurrency ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_on_one_seat_admit_one() {
    let engine = Arc::new(Engine::new());
    let mut users = Vec::new();
    for i in 0..16 {
        users.push(engine.login(&format!("u{i}@x.org")).await.unwrap().id);
    }

    let handles: Vec<_> = users
        .iter()
        .map(|&uid| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.create_reservation(uid, "seat-2-02").await })
        })
        .collect();

    let mut ok = 0;
    for h in futures::future::join_all(handles).await {
        match h.unwrap() {
            Ok(_) => ok += 1,
            Err(e) => assert!(matches!(e, EngineError::SeatTaken(_))),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(reservation_count(&engine).await, 1);
}

#[tokio::test(start_paused = true)]
async fn latency_is_applied_to_queries() {
    let engine = Engine::new().with_latency(std::time::Duration::from_millis(300));
    let started = tokio::time::Instant::now();
    engine.get_seats(Some(1)).await;
    assert!(started.elapsed() >= std::time::Duration::from_millis(300));
}
