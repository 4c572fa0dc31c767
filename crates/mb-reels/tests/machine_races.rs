//! Slot machine timing and race suite
//!
//! Runs the async machine on a paused tokio clock:
//! - reels land at start delay + animation, never earlier
//! - stale recommendation answers never overwrite a newer cycle
//! - service failures and panics still end in a fallback recommendation
//! - the daily limit gates spins; admin and day rollover lift it

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};

use mb_core::{Catalog, Category, Language};
use mb_oracle::{
    Curator, OracleError, Recommendation, RecommendationRequest, RecommendationService,
    RecommendationSource, fallback,
};
use mb_reels::{MachineEvent, ReelTiming, SlotMachine, SpinPhase, SpinRejected};
use mb_state::{ManualClock, MemoryStore, UsageGuard};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn build(curator: Curator, limit: u32) -> (SlotMachine, Arc<ManualClock>) {
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let clock = Arc::new(ManualClock::new(today()));
    let usage = UsageGuard::load_with_limit(MemoryStore::shared(), clock.clone(), limit);
    let machine = SlotMachine::builder(catalog, usage)
        .timing(ReelTiming::normal())
        .curator(curator)
        .seed(31)
        .language(Language::En)
        .build();
    (machine, clock)
}

fn item(name: &str) -> Recommendation {
    Recommendation {
        item_name: name.to_string(),
        price_label: "$12".to_string(),
        rationale: "test".to_string(),
        search_keyword: name.to_lowercase(),
        image_url: None,
        source: RecommendationSource::Service,
    }
}

fn drain(events: &mut broadcast::Receiver<MachineEvent>) -> Vec<MachineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// First call blocks until the gate opens and answers "Stale"; later calls answer "Fresh"
struct GatedService {
    calls: AtomicUsize,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait]
impl RecommendationService for GatedService {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch(&self, _: &RecommendationRequest) -> Result<Recommendation, OracleError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            let gate = self.gate.lock().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            return Ok(item("Stale"));
        }
        Ok(item("Fresh"))
    }
}

struct FailingService;

#[async_trait]
impl RecommendationService for FailingService {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self, _: &RecommendationRequest) -> Result<Recommendation, OracleError> {
        Err(OracleError::Status {
            status: 429,
            body: "quota exhausted".to_string(),
        })
    }
}

struct PanickingService;

#[async_trait]
impl RecommendationService for PanickingService {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn fetch(&self, _: &RecommendationRequest) -> Result<Recommendation, OracleError> {
        panic!("service exploded");
    }
}

/// Answers after three seconds, recording that the call began and ended
#[derive(Default)]
struct SlowService {
    started: AtomicBool,
    finished: AtomicBool,
}

#[async_trait]
impl RecommendationService for SlowService {
    fn name(&self) -> &str {
        "slow"
    }

    async fn fetch(&self, _: &RecommendationRequest) -> Result<Recommendation, OracleError> {
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3)).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(item("Late"))
    }
}

struct EchoService;

#[async_trait]
impl RecommendationService for EchoService {
    fn name(&self) -> &str {
        "echo"
    }

    async fn fetch(&self, request: &RecommendationRequest) -> Result<Recommendation, OracleError> {
        Ok(item(&format!("{} & {}", request.tea, request.flower)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REEL TIMING
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_reels_land_at_delay_plus_animation() {
    let (machine, _) = build(Curator::offline(), 5);
    let mut events = machine.subscribe();
    let plan = machine.request_spin().unwrap();

    tokio::time::sleep(Duration::from_millis(3499)).await;
    let early = drain(&mut events);
    assert!(!early.iter().any(|e| matches!(e, MachineEvent::ReelLanded { .. })));
    assert_eq!(
        early
            .iter()
            .filter(|e| matches!(e, MachineEvent::ReelStarted { .. }))
            .count(),
        4
    );

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(
        drain(&mut events),
        vec![MachineEvent::ReelLanded {
            cycle: plan.cycle,
            reel: Category::Tea
        }]
    );

    tokio::time::sleep(Duration::from_millis(1000)).await;
    let landed: Vec<Category> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            MachineEvent::ReelLanded { reel, .. } => Some(reel),
            _ => None,
        })
        .collect();
    assert_eq!(landed, vec![Category::Activity, Category::Perfume, Category::Flower]);
    assert_eq!(machine.phase(), SpinPhase::Finished);
}

#[tokio::test(start_paused = true)]
async fn test_event_sequence_for_one_cycle() {
    let (machine, _) = build(Curator::with_service(Arc::new(EchoService)), 5);
    let mut events = machine.subscribe();
    let plan = machine.request_spin().unwrap();
    let (result, recommendation) = machine.wait_settled(plan.cycle).await.unwrap();

    let seen = drain(&mut events);
    assert_eq!(
        seen.first(),
        Some(&MachineEvent::SpinStarted {
            cycle: plan.cycle,
            targets: plan.target_indices
        })
    );
    let tail = &seen[seen.len() - 3..];
    assert_eq!(
        tail,
        &[
            MachineEvent::ResultReady {
                cycle: plan.cycle,
                result: result.clone()
            },
            MachineEvent::RecommendationLoading { cycle: plan.cycle },
            MachineEvent::RecommendationReady {
                cycle: plan.cycle,
                recommendation: recommendation.clone()
            },
        ]
    );
    assert!(seen.iter().all(|e| e.cycle() == plan.cycle));

    let names = result.display_names();
    assert_eq!(recommendation.item_name, format!("{} & {}", names[0], names[3]));
}

#[tokio::test(start_paused = true)]
async fn test_spin_rejected_while_spinning() {
    let (machine, _) = build(Curator::offline(), 5);
    let plan = machine.request_spin().unwrap();
    assert!(matches!(
        machine.request_spin(),
        Err(SpinRejected::AlreadySpinning)
    ));
    assert!(matches!(machine.restart(), Err(SpinRejected::NotFinished)));
    assert_eq!(machine.cycle(), plan.cycle);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STALE RECOMMENDATIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_stale_recommendation_does_not_overwrite_new_cycle() {
    let (open_gate, gate) = oneshot::channel();
    let service = GatedService {
        calls: AtomicUsize::new(0),
        gate: Mutex::new(Some(gate)),
    };
    let (machine, _) = build(Curator::with_service(Arc::new(service)), 5);
    let mut events = machine.subscribe();

    let first = machine.request_spin().unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(machine.phase(), SpinPhase::Finished);
    assert!(machine.recommendation().is_loading());

    // New spin while the first answer is still in flight
    let second = machine.request_spin().unwrap();
    assert!(second.cycle > first.cycle);
    let (_, fresh) = machine.wait_settled(second.cycle).await.unwrap();
    assert_eq!(fresh.item_name, "Fresh");

    // Let the stale answer arrive
    open_gate.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        machine.recommendation().ready().map(|r| r.item_name.clone()),
        Some("Fresh".to_string())
    );
    assert!(!drain(&mut events).iter().any(|e| matches!(
        e,
        MachineEvent::RecommendationReady { cycle, .. } if *cycle == first.cycle
    )));
}

#[tokio::test(start_paused = true)]
async fn test_recommendation_after_restart_discarded() {
    let (open_gate, gate) = oneshot::channel();
    let service = GatedService {
        calls: AtomicUsize::new(0),
        gate: Mutex::new(Some(gate)),
    };
    let (machine, _) = build(Curator::with_service(Arc::new(service)), 5);

    machine.request_spin().unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    machine.restart().unwrap();

    open_gate.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(machine.phase(), SpinPhase::Idle);
    assert!(machine.result().is_none());
    assert!(machine.recommendation().ready().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════════
// FALLBACKS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_service_failure_ends_in_failure_fallback() {
    let (machine, _) = build(Curator::with_service(Arc::new(FailingService)), 5);
    let plan = machine.request_spin().unwrap();
    let (_, recommendation) = machine.wait_settled(plan.cycle).await.unwrap();
    assert_eq!(recommendation, fallback::failure(Language::En));
    assert!(!machine.recommendation().is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_service_panic_ends_in_failure_fallback() {
    let (machine, _) = build(Curator::with_service(Arc::new(PanickingService)), 5);
    let plan = machine.request_spin().unwrap();
    let (_, recommendation) = machine.wait_settled(plan.cycle).await.unwrap();
    assert_eq!(recommendation.source, RecommendationSource::FailureFallback);

    // Machine is still usable afterwards
    machine.restart().unwrap();
    assert!(machine.request_spin().is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_in_flight_service_call() {
    let service = Arc::new(SlowService::default());
    let (machine, _) = build(Curator::with_service(service.clone()), 5);
    let mut events = machine.subscribe();
    machine.request_spin().unwrap();

    loop {
        if let MachineEvent::RecommendationLoading { .. } = events.recv().await.unwrap() {
            break;
        }
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(service.started.load(Ordering::SeqCst));
    assert!(!service.finished.load(Ordering::SeqCst));

    drop(machine);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!service.finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_offline_fallback_is_distinct() {
    let (machine, _) = build(Curator::offline(), 5);
    let plan = machine.request_spin().unwrap();
    let (_, recommendation) = machine.wait_settled(plan.cycle).await.unwrap();
    assert_eq!(recommendation, fallback::offline(Language::En));
    assert_ne!(recommendation, fallback::failure(Language::En));
}

// ═══════════════════════════════════════════════════════════════════════════════
// USAGE GATE
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_limit_gates_until_admin_or_new_day() {
    let (machine, clock) = build(Curator::offline(), 2);
    for round in 0..2 {
        let plan = machine.request_spin().unwrap();
        machine.wait_settled(plan.cycle).await.unwrap();
        assert_eq!(machine.usage().attempts_today, round + 1);
    }

    assert_eq!(machine.remaining(), 0);
    assert!(!machine.can_spin());
    assert!(matches!(
        machine.request_spin(),
        Err(SpinRejected::LimitReached)
    ));
    // Rejection leaves the finished result on display
    assert!(machine.result().is_some());

    assert!(machine.toggle_admin());
    let plan = machine.request_spin().unwrap();
    machine.wait_settled(plan.cycle).await.unwrap();
    assert_eq!(machine.usage().attempts_today, 2);

    assert!(!machine.toggle_admin());
    assert!(!machine.can_spin());

    clock.advance_days(1);
    assert!(machine.can_spin());
    assert_eq!(machine.usage().attempts_today, 0);
}

#[tokio::test(start_paused = true)]
async fn test_language_switch_applies_to_next_result() {
    let (machine, _) = build(Curator::offline(), 5);
    machine.set_language(Language::Ja);
    let plan = machine.request_spin().unwrap();
    let (result, recommendation) = machine.wait_settled(plan.cycle).await.unwrap();
    assert_eq!(result.language, Language::Ja);
    assert_eq!(recommendation, fallback::offline(Language::Ja));
    assert_eq!(machine.snapshot().language, Language::Ja);
}
