//! Integration tests for the draw service task.
//!
//! Time is paused so the settle delay and the eligibility interval can be
//! stepped through deterministically. Wall-clock time for window math comes
//! from a [`ManualClock`].

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{FixedOffset, NaiveTime, TimeZone, Utc};
use lucky_core::clock::ManualClock;
use lucky_core::draw::DrawPhase;
use lucky_core::prize::PrizeTable;
use lucky_core::selection::scripted_sampler;
use lucky_core::types::Timestamp;
use lucky_core::window::{WindowPolicy, WindowZone};
use lucky_engine::{
    DrawHandle, DrawOrchestrator, DrawOutcome, DrawService, EligibilityMonitor, EngineError,
    ResetOutcome, RevealOutcome, ServiceConfig,
};
use lucky_ledger::MemoryLedger;
use lucky_store::{MemoryStore, WinRecordStore};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn start_service(clock: &ManualClock, ledger: Arc<MemoryLedger>) -> DrawService {
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    let policy = WindowPolicy::new(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), WindowZone::Fixed(offset));
    let (reconciler, outcomes) = lucky_ledger::SyncReconciler::new(ledger);
    let store = WinRecordStore::load(Arc::new(MemoryStore::new()));

    let orchestrator = DrawOrchestrator::new(Arc::new(PrizeTable::default()), policy, store, reconciler)
        .with_clock(Arc::new(clock.clone()))
        .with_sampler(scripted_sampler(vec![0.2]));

    DrawService::start(
        orchestrator,
        outcomes,
        ServiceConfig {
            settle_delay: Duration::from_millis(500),
            eligibility_interval: Duration::from_secs(60),
        },
    )
}

async fn play(draw: &DrawHandle) {
    assert_matches!(draw.start_draw().await.unwrap(), DrawOutcome::Started { .. });
    assert_matches!(draw.confirm_reveal().await.unwrap(), RevealOutcome::Revealed { .. });
}

// ---------------------------------------------------------------------------
// Test: full cycle settles on its own and the record gets synced
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn reveal_settles_after_delay_and_syncs() {
    let clock = ManualClock::new(utc(2026, 2, 10, 4, 0));
    let ledger = Arc::new(MemoryLedger::accepting());
    let service = start_service(&clock, ledger.clone());
    let draw = service.handle();

    play(&draw).await;

    let snapshot = draw.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, DrawPhase::Revealing);
    assert_eq!(snapshot.attempts_remaining, 0);

    tokio::time::sleep(Duration::from_millis(600)).await;

    let snapshot = draw.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, DrawPhase::Idle);
    assert!(snapshot.pending.is_none());

    let history = draw.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].prize_id, "lucky-8");
    assert!(history[0].synced);
    assert_eq!(ledger.received().len(), 1);

    service.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: the monitor notices a window boundary without user action
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn monitor_reopens_window_after_boundary() {
    let clock = ManualClock::new(utc(2026, 2, 10, 4, 0));
    let service = start_service(&clock, Arc::new(MemoryLedger::accepting()));
    let draw = service.handle();

    play(&draw).await;
    assert!(draw.snapshot().await.unwrap().has_played);

    // Next day, 10:30 Taipei.
    clock.set(utc(2026, 2, 11, 2, 30));
    tokio::time::sleep(Duration::from_secs(61)).await;

    let snapshot = draw.snapshot().await.unwrap();
    assert!(!snapshot.has_played);
    assert_eq!(snapshot.attempts_remaining, 1);

    service.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: concurrent reveals from two handles credit the window once
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn concurrent_reveals_create_one_record() {
    let clock = ManualClock::new(utc(2026, 2, 10, 4, 0));
    let service = start_service(&clock, Arc::new(MemoryLedger::accepting()));
    let first = service.handle();
    let second = service.handle();

    first.start_draw().await.unwrap();
    let (a, b) = tokio::join!(first.confirm_reveal(), second.confirm_reveal());

    let revealed = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter(|o| matches!(o, RevealOutcome::Revealed { .. }))
        .count();
    assert_eq!(revealed, 1);
    assert_eq!(first.history().await.unwrap().len(), 1);

    service.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: a slow ledger answering after a reset changes nothing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn late_sync_after_reset_is_dropped() {
    let clock = ManualClock::new(utc(2026, 2, 10, 4, 0));
    let ledger = Arc::new(MemoryLedger::accepting().with_delay(Duration::from_secs(5)));
    let service = start_service(&clock, ledger.clone());
    let draw = service.handle();

    play(&draw).await;
    let ticket = draw.request_reset().await.unwrap();
    assert_eq!(
        draw.confirm_reset(ticket.token).await.unwrap(),
        ResetOutcome::Reset { cleared: 1 }
    );

    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(ledger.received().len(), 1);
    assert!(draw.history().await.unwrap().is_empty());
    assert!(!draw.snapshot().await.unwrap().has_played);

    service.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: handles report Stopped after shutdown
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn handles_fail_after_shutdown() {
    let clock = ManualClock::new(utc(2026, 2, 10, 4, 0));
    let service = start_service(&clock, Arc::new(MemoryLedger::accepting()));
    let draw = service.handle();

    service.shutdown().await;

    assert_matches!(draw.snapshot().await, Err(EngineError::Stopped));
    assert_matches!(draw.start_draw().await, Err(EngineError::Stopped));
}

// ---------------------------------------------------------------------------
// Test: monitor lifecycle
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn monitor_start_is_idempotent_and_stop_joins() {
    let clock = ManualClock::new(utc(2026, 2, 10, 4, 0));
    let service = start_service(&clock, Arc::new(MemoryLedger::accepting()));

    let mut monitor = EligibilityMonitor::new(Duration::from_secs(1));
    assert!(!monitor.is_running());

    monitor.start(service.handle());
    monitor.start(service.handle());
    assert!(monitor.is_running());

    monitor.stop().await;
    assert!(!monitor.is_running());

    service.shutdown().await;
}
