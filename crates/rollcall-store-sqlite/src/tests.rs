//! Integration tests for `SqliteRegistry` against in-memory and on-disk
//! databases.

use std::sync::Arc;

use rollcall_core::{
  guest::{CheckInResult, Guest, GuestRow, Identifier, NewGuest},
  registry::GuestRegistry,
};
use tokio::task::JoinSet;

use crate::SqliteRegistry;

async fn registry() -> SqliteRegistry {
  SqliteRegistry::open_in_memory()
    .await
    .expect("in-memory registry")
}

fn row(name: &str, contact: &str, seat: &str) -> GuestRow {
  GuestRow::new(name, contact, seat)
}

async fn load_one(r: &SqliteRegistry, name: &str, seat: &str) -> Guest {
  r.add_guest(NewGuest::try_from(row(name, "", seat)).unwrap())
    .await
    .unwrap()
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_load_skips_malformed_rows() {
  let r = registry().await;

  let summary = r
    .bulk_load(vec![
      row("Ana", "", "A1"),
      row("", "", "B2"),
      row("Bob", "", "B3"),
    ])
    .await
    .unwrap();
  assert_eq!(summary.inserted, 2);
  assert_eq!(summary.skipped, 1);

  let names: Vec<_> = r
    .list_all()
    .await
    .unwrap()
    .into_iter()
    .map(|g| g.name)
    .collect();
  assert_eq!(names, ["Ana", "Bob"]);
}

#[tokio::test]
async fn list_all_sorts_by_name() {
  let r = registry().await;
  r.bulk_load(vec![
    row("Carla", "", "C1"),
    row("Ana", "ana@example.com", "A1"),
    row("Bob", "", "B1"),
  ])
  .await
  .unwrap();

  let guests = r.list_all().await.unwrap();
  let names: Vec<_> = guests.iter().map(|g| g.name.as_str()).collect();
  assert_eq!(names, ["Ana", "Bob", "Carla"]);
  assert_eq!(guests[0].contact.as_deref(), Some("ana@example.com"));
  assert_eq!(guests[1].contact, None);
  assert!(guests.iter().all(|g| !g.checked_in && g.checked_in_at.is_none()));
}

#[tokio::test]
async fn bulk_load_assigns_unique_identifiers() {
  let r = registry().await;
  let rows = (0..50).map(|i| row(&format!("Guest {i}"), "", "GA")).collect();
  r.bulk_load(rows).await.unwrap();

  let mut identifiers: Vec<_> = r
    .list_all()
    .await
    .unwrap()
    .into_iter()
    .map(|g| g.identifier)
    .collect();
  identifiers.sort_by(|a, b| a.as_str().cmp(b.as_str()));
  identifiers.dedup();
  assert_eq!(identifiers.len(), 50);
}

#[tokio::test]
async fn bulk_load_appends_without_clearing() {
  let r = registry().await;
  r.bulk_load(vec![row("Ana", "", "A1")]).await.unwrap();
  r.bulk_load(vec![row("Bob", "", "B1")]).await.unwrap();
  assert_eq!(r.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn add_guest_and_find() {
  let r = registry().await;
  let ana = load_one(&r, "Ana", "A1").await;

  let found = r.find_by_identifier(&ana.identifier).await.unwrap();
  assert_eq!(found, Some(ana));
}

#[tokio::test]
async fn find_unknown_returns_none() {
  let r = registry().await;
  load_one(&r, "Ana", "A1").await;
  let found = r.find_by_identifier(&Identifier::generate()).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn clear_all_is_final() {
  let r = registry().await;
  let ana = load_one(&r, "Ana", "A1").await;

  r.clear_all().await.unwrap();
  r.clear_all().await.unwrap();

  assert!(r.list_all().await.unwrap().is_empty());
  assert_eq!(
    r.try_check_in(&ana.identifier).await.unwrap(),
    CheckInResult::NotFound
  );
}

// ─── Check-in ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_check_in_then_already_used() {
  let r = registry().await;
  let ana = load_one(&r, "Ana", "A1").await;

  let first = match r.try_check_in(&ana.identifier).await.unwrap() {
    CheckInResult::FirstTime(g) => g,
    other => panic!("expected first check-in, got {other:?}"),
  };
  assert!(first.checked_in);
  let at = first.checked_in_at.expect("timestamp set on check-in");

  for _ in 0..3 {
    match r.try_check_in(&ana.identifier).await.unwrap() {
      CheckInResult::AlreadyUsed(g) => {
        assert_eq!(g.name, "Ana");
        assert_eq!(g.seat, "A1");
        // The original timestamp is never overwritten.
        assert_eq!(g.checked_in_at, Some(at));
      }
      other => panic!("expected already used, got {other:?}"),
    }
  }
}

#[tokio::test]
async fn unknown_identifier_is_always_not_found() {
  let r = registry().await;
  load_one(&r, "Ana", "A1").await;
  let ghost = Identifier::new("not-a-real-code");

  for _ in 0..5 {
    assert_eq!(r.try_check_in(&ghost).await.unwrap(), CheckInResult::NotFound);
  }
  assert_eq!(r.stats().await.unwrap().checked_in, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_check_ins_admit_exactly_one() {
  let r = Arc::new(registry().await);
  let ana = load_one(&r, "Ana", "A1").await;

  let mut tasks = JoinSet::new();
  for _ in 0..64 {
    let r = Arc::clone(&r);
    let identifier = ana.identifier.clone();
    tasks.spawn(async move { r.try_check_in(&identifier).await.unwrap() });
  }

  let mut first = 0;
  let mut already = 0;
  while let Some(result) = tasks.join_next().await {
    match result.unwrap() {
      CheckInResult::FirstTime(_) => first += 1,
      CheckInResult::AlreadyUsed(_) => already += 1,
      CheckInResult::NotFound => panic!("guest vanished"),
    }
  }
  assert_eq!(first, 1);
  assert_eq!(already, 63);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_check_ins_across_connections_admit_exactly_one() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("guests.db");

  let a = SqliteRegistry::open(&path).await.unwrap();
  let b = SqliteRegistry::open(&path).await.unwrap();
  let ana = load_one(&a, "Ana", "A1").await;

  let mut tasks = JoinSet::new();
  for i in 0..32 {
    let r = if i % 2 == 0 { a.clone() } else { b.clone() };
    let identifier = ana.identifier.clone();
    tasks.spawn(async move { r.try_check_in(&identifier).await.unwrap() });
  }

  let mut first = 0;
  while let Some(result) = tasks.join_next().await {
    if matches!(result.unwrap(), CheckInResult::FirstTime(_)) {
      first += 1;
    }
  }
  assert_eq!(first, 1);
  assert_eq!(b.stats().await.unwrap().checked_in, 1);
}

#[tokio::test]
async fn check_in_state_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("guests.db");

  let ana = {
    let r = SqliteRegistry::open(&path).await.unwrap();
    let ana = load_one(&r, "Ana", "A1").await;
    r.try_check_in(&ana.identifier).await.unwrap();
    ana
  };

  let r = SqliteRegistry::open(&path).await.unwrap();
  assert!(matches!(
    r.try_check_in(&ana.identifier).await.unwrap(),
    CheckInResult::AlreadyUsed(_)
  ));
}

// ─── Reset and stats ─────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_is_idempotent() {
  let r = registry().await;
  r.bulk_load(vec![row("Ana", "", "A1"), row("Bob", "", "B1")])
    .await
    .unwrap();
  for guest in r.list_all().await.unwrap() {
    r.try_check_in(&guest.identifier).await.unwrap();
  }

  assert_eq!(r.reset_all_check_ins().await.unwrap(), 2);
  assert_eq!(r.reset_all_check_ins().await.unwrap(), 0);
  assert_eq!(r.stats().await.unwrap().checked_in, 0);
  assert!(
    r.list_all()
      .await
      .unwrap()
      .iter()
      .all(|g| !g.checked_in && g.checked_in_at.is_none())
  );
}

#[tokio::test]
async fn reset_allows_a_new_first_check_in() {
  let r = registry().await;
  let ana = load_one(&r, "Ana", "A1").await;

  r.try_check_in(&ana.identifier).await.unwrap();
  r.reset_all_check_ins().await.unwrap();
  assert!(matches!(
    r.try_check_in(&ana.identifier).await.unwrap(),
    CheckInResult::FirstTime(_)
  ));
}

#[tokio::test]
async fn stats_arithmetic() {
  let r = registry().await;
  r.bulk_load(vec![
    row("Ana", "", "A1"),
    row("Bob", "", "B1"),
    row("Carla", "", "C1"),
  ])
  .await
  .unwrap();
  let ana = r.list_all().await.unwrap().remove(0);
  r.try_check_in(&ana.identifier).await.unwrap();

  let stats = r.stats().await.unwrap();
  assert_eq!(stats.total, 3);
  assert_eq!(stats.checked_in, 1);
  assert_eq!(stats.pending, 2);
  assert_eq!(stats.percentage, 33.3);
}

#[tokio::test]
async fn stats_of_empty_registry() {
  let r = registry().await;
  let stats = r.stats().await.unwrap();
  assert_eq!(stats.total, 0);
  assert_eq!(stats.percentage, 0.0);
}
