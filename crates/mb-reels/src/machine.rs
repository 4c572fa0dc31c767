//! Slot machine — async driver around the spin coordinator
//!
//! Owns the four reel timers and the recommendation task. All state lives
//! behind one lock; timers and the fetch task never hold it across an
//! await. Every notification goes out as a [`MachineEvent`] on a broadcast
//! channel so any number of front ends can follow along.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use mb_core::{Catalog, Category, Language, MoodResult};
use mb_oracle::{Curator, Recommendation, fallback};
use mb_state::{UsageGuard, UsageState};

use crate::coordinator::{
    CycleId, RecommendationSlot, RecommendationTicket, ReportOutcome, SpinCoordinator, SpinPhase,
    SpinPlan, SpinRejected,
};
use crate::random::{RandomSource, SeededRandom};
use crate::reel::{ReelMotion, ReelReport, ReelUnit};
use crate::timing::ReelTiming;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Machine notifications
#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    SpinStarted {
        cycle: CycleId,
        targets: [usize; 4],
    },
    ReelStarted {
        cycle: CycleId,
        reel: Category,
    },
    ReelLanded {
        cycle: CycleId,
        reel: Category,
    },
    ResultReady {
        cycle: CycleId,
        result: MoodResult,
    },
    RecommendationLoading {
        cycle: CycleId,
    },
    RecommendationReady {
        cycle: CycleId,
        recommendation: Recommendation,
    },
    Restarted {
        cycle: CycleId,
    },
}

impl MachineEvent {
    pub fn cycle(&self) -> CycleId {
        match self {
            MachineEvent::SpinStarted { cycle, .. }
            | MachineEvent::ReelStarted { cycle, .. }
            | MachineEvent::ReelLanded { cycle, .. }
            | MachineEvent::ResultReady { cycle, .. }
            | MachineEvent::RecommendationLoading { cycle }
            | MachineEvent::RecommendationReady { cycle, .. }
            | MachineEvent::Restarted { cycle } => *cycle,
        }
    }
}

/// Point-in-time view of the machine
#[derive(Debug, Clone)]
pub struct MachineSnapshot {
    pub cycle: CycleId,
    pub phase: SpinPhase,
    pub landed: [bool; 4],
    pub result: Option<MoodResult>,
    pub recommendation: RecommendationSlot,
    pub usage: UsageState,
    pub limit: u32,
    pub remaining: u32,
    pub language: Language,
}

struct Inner {
    coordinator: SpinCoordinator,
    usage: UsageGuard,
    reels: [ReelUnit; 4],
    motions: Option<[ReelMotion; 4]>,
    started_at: Option<Instant>,
}

/// Aborts the wrapped task when dropped, so aborting the outer fetch task
/// also stops the service call it is awaiting
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Handles shared with timer and fetch tasks
#[derive(Clone)]
struct Shared {
    inner: Arc<Mutex<Inner>>,
    curator: Arc<Curator>,
    event_tx: broadcast::Sender<MachineEvent>,
    fetch_tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Shared {
    fn emit(&self, event: MachineEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn on_reel_landed(&self, report: ReelReport) {
        let outcome = {
            let mut inner = self.inner.lock();
            let Inner {
                coordinator, usage, ..
            } = &mut *inner;
            coordinator.report_reel_complete(report, usage)
        };

        match outcome {
            ReportOutcome::Ignored => {}
            ReportOutcome::Counted { completed } => {
                log::trace!(
                    "[SlotMachine] {} landed ({}/4) in cycle {}",
                    report.reel.tag(),
                    completed,
                    report.cycle
                );
                self.emit(MachineEvent::ReelLanded {
                    cycle: report.cycle,
                    reel: report.reel,
                });
            }
            ReportOutcome::Finished { result, ticket } => {
                self.emit(MachineEvent::ReelLanded {
                    cycle: report.cycle,
                    reel: report.reel,
                });
                self.emit(MachineEvent::ResultReady {
                    cycle: ticket.cycle,
                    result,
                });
                self.emit(MachineEvent::RecommendationLoading {
                    cycle: ticket.cycle,
                });
                self.spawn_fetch(ticket);
            }
        }
    }

    fn spawn_fetch(&self, ticket: RecommendationTicket) {
        let shared = self.clone();
        let handle = tokio::spawn(async move {
            let RecommendationTicket { cycle, request } = ticket;
            let language = request.language;
            let curator = Arc::clone(&shared.curator);

            // Separate task so a panicking service still yields a fallback
            let mut call = AbortOnDrop(tokio::spawn(async move {
                curator.recommend(&request).await
            }));
            let fetched = (&mut call.0).await;
            let recommendation = match fetched {
                Ok(recommendation) => recommendation,
                Err(e) => {
                    log::error!(
                        "[SlotMachine] Recommendation task for cycle {} failed: {}",
                        cycle,
                        e
                    );
                    fallback::failure(language)
                }
            };
            shared.deliver(cycle, recommendation);
        });

        let mut tasks = self.fetch_tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    fn deliver(&self, cycle: CycleId, recommendation: Recommendation) {
        let accepted = self
            .inner
            .lock()
            .coordinator
            .accept_recommendation(cycle, recommendation.clone());
        if accepted {
            self.emit(MachineEvent::RecommendationReady {
                cycle,
                recommendation,
            });
        }
    }
}

/// Four reels, one coordinator, one recommendation slot
///
/// Must be driven from inside a tokio runtime.
pub struct SlotMachine {
    shared: Shared,
    timing: ReelTiming,
    reel_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SlotMachine {
    pub fn builder(catalog: Arc<Catalog>, usage: UsageGuard) -> SlotMachineBuilder {
        SlotMachineBuilder::new(catalog, usage)
    }

    /// Subscribe to machine events
    pub fn subscribe(&self) -> broadcast::Receiver<MachineEvent> {
        self.shared.event_tx.subscribe()
    }

    pub fn timing(&self) -> &ReelTiming {
        &self.timing
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(self.shared.inner.lock().coordinator.catalog())
    }

    /// Start a spin: draw targets, cancel leftover reel timers and launch
    /// four new ones.
    pub fn request_spin(&self) -> Result<SpinPlan, SpinRejected> {
        let mut inner = self.shared.inner.lock();
        let Inner {
            coordinator,
            usage,
            reels,
            motions,
            started_at,
        } = &mut *inner;

        let plan = coordinator.request_spin(usage)?;

        let mut reel_tasks = self.reel_tasks.lock();
        for task in reel_tasks.drain(..) {
            task.abort();
        }

        let planned: [ReelMotion; 4] = std::array::from_fn(|i| {
            reels[i].plan_spin(plan.target_indices[i], plan.rotations[i], &self.timing)
        });
        *motions = Some(planned.clone());
        *started_at = Some(Instant::now());
        drop(inner);

        log::info!(
            "[SlotMachine] Spin {} started, targets {:?}",
            plan.cycle,
            plan.target_indices
        );
        self.shared.emit(MachineEvent::SpinStarted {
            cycle: plan.cycle,
            targets: plan.target_indices,
        });

        for motion in &planned {
            let report = ReelReport {
                cycle: plan.cycle,
                reel: motion.reel,
            };
            let on_start = {
                let shared = self.shared.clone();
                move || {
                    shared.emit(MachineEvent::ReelStarted {
                        cycle: report.cycle,
                        reel: report.reel,
                    })
                }
            };
            let on_land = {
                let shared = self.shared.clone();
                move || shared.on_reel_landed(report)
            };
            reel_tasks.push(motion.spawn_timer(on_start, on_land));
        }

        Ok(plan)
    }

    /// Finished → Idle, clearing the result and recommendation
    pub fn restart(&self) -> Result<(), SpinRejected> {
        let cycle = {
            let mut inner = self.shared.inner.lock();
            let was_finished = inner.coordinator.phase() == SpinPhase::Finished;
            inner.coordinator.restart()?;
            if !was_finished {
                return Ok(());
            }
            inner.coordinator.cycle()
        };
        log::debug!("[SlotMachine] Restarted after cycle {}", cycle);
        self.shared.emit(MachineEvent::Restarted { cycle });
        Ok(())
    }

    pub fn phase(&self) -> SpinPhase {
        self.shared.inner.lock().coordinator.phase()
    }

    pub fn cycle(&self) -> CycleId {
        self.shared.inner.lock().coordinator.cycle()
    }

    pub fn result(&self) -> Option<MoodResult> {
        self.shared.inner.lock().coordinator.result().cloned()
    }

    pub fn recommendation(&self) -> RecommendationSlot {
        self.shared.inner.lock().coordinator.recommendation().clone()
    }

    pub fn usage(&self) -> UsageState {
        self.shared.inner.lock().usage.state()
    }

    pub fn remaining(&self) -> u32 {
        self.shared.inner.lock().usage.remaining()
    }

    /// Whether a spin would be accepted right now
    pub fn can_spin(&self) -> bool {
        let mut inner = self.shared.inner.lock();
        inner.coordinator.phase() != SpinPhase::Spinning && inner.usage.can_spin()
    }

    /// Flip the admin override. Returns the new flag.
    pub fn toggle_admin(&self) -> bool {
        self.shared.inner.lock().usage.toggle_admin()
    }

    pub fn language(&self) -> Language {
        self.shared.inner.lock().coordinator.language()
    }

    /// Language for the next derived result
    pub fn set_language(&self, language: Language) {
        self.shared.inner.lock().coordinator.set_language(language);
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        let inner = self.shared.inner.lock();
        let session = inner.coordinator.session();
        MachineSnapshot {
            cycle: session.cycle,
            phase: session.phase,
            landed: session.landed,
            result: inner.coordinator.result().cloned(),
            recommendation: inner.coordinator.recommendation().clone(),
            usage: inner.usage.state(),
            limit: inner.usage.limit(),
            remaining: inner.usage.remaining(),
            language: inner.coordinator.language(),
        }
    }

    /// Item index showing in each reel's window right now
    pub fn reel_frame(&self) -> [usize; 4] {
        let inner = self.shared.inner.lock();
        match (&inner.motions, inner.started_at) {
            (Some(motions), Some(started_at)) => {
                let elapsed = started_at.elapsed();
                std::array::from_fn(|i| motions[i].index_at(elapsed))
            }
            _ => std::array::from_fn(|i| inner.reels[i].rest_index()),
        }
    }

    /// Wait until `cycle` has both a result and a recommendation. Returns
    /// `None` if the machine moves on to another cycle or restarts first.
    pub async fn wait_settled(&self, cycle: CycleId) -> Option<(MoodResult, Recommendation)> {
        let mut events = self.subscribe();
        loop {
            {
                let inner = self.shared.inner.lock();
                let coordinator = &inner.coordinator;
                if coordinator.cycle() != cycle || coordinator.phase() == SpinPhase::Idle {
                    return None;
                }
                if let (Some(result), Some(recommendation)) =
                    (coordinator.result(), coordinator.recommendation().ready())
                {
                    return Some((result.clone(), recommendation.clone()));
                }
            }

            match events.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Cancel all pending reel timers and recommendation tasks
    pub fn shutdown(&self) {
        for task in self.reel_tasks.lock().drain(..) {
            task.abort();
        }
        for task in self.shared.fetch_tasks.lock().drain(..) {
            task.abort();
        }
    }
}

impl Drop for SlotMachine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builder for [`SlotMachine`]
pub struct SlotMachineBuilder {
    catalog: Arc<Catalog>,
    usage: UsageGuard,
    timing: ReelTiming,
    curator: Option<Curator>,
    rng: Option<Box<dyn RandomSource>>,
    language: Language,
    event_capacity: usize,
}

impl SlotMachineBuilder {
    pub fn new(catalog: Arc<Catalog>, usage: UsageGuard) -> Self {
        Self {
            catalog,
            usage,
            timing: ReelTiming::normal(),
            curator: None,
            rng: None,
            language: Language::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn timing(mut self, timing: ReelTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Recommendation curator (offline when not set)
    pub fn curator(mut self, curator: Curator) -> Self {
        self.curator = Some(curator);
        self
    }

    /// Random source for targets, rotations and scores
    pub fn random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Reproducible draws
    pub fn seed(self, seed: u64) -> Self {
        self.random(Box::new(SeededRandom::seeded(seed)))
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> SlotMachine {
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(SeededRandom::from_os()));
        let curator = self.curator.unwrap_or_else(Curator::offline);
        let reels = Category::ALL.map(|category| ReelUnit::new(category, self.catalog.len(category)));
        let coordinator = SpinCoordinator::new(self.catalog, rng, &self.timing, self.language);
        let (event_tx, _) = broadcast::channel(self.event_capacity);

        SlotMachine {
            shared: Shared {
                inner: Arc::new(Mutex::new(Inner {
                    coordinator,
                    usage: self.usage,
                    reels,
                    motions: None,
                    started_at: None,
                })),
                curator: Arc::new(curator),
                event_tx,
                fetch_tasks: Arc::new(Mutex::new(Vec::new())),
            },
            timing: self.timing,
            reel_tasks: Mutex::new(Vec::new()),
        }
    }
}
