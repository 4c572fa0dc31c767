//! Spin coordinator — the session state machine
//!
//! ```text
//!            request_spin            4th distinct report
//!   Idle ───────────────> Spinning ─────────────────────> Finished
//!    ^                                                      │  │
//!    └────────────────────────── restart ───────────────────┘  │
//!                                                              │
//!              Spinning <────────── request_spin ──────────────┘
//! ```
//!
//! Synchronous and free of timers: the async driver feeds it reel reports
//! and recommendation answers, each tagged with the [`CycleId`] it was
//! issued for. Anything tagged with an older cycle is dropped.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mb_core::{Catalog, CatalogError, Category, Language, MoodResult, SCORE_SPAN, Selections};
use mb_oracle::{Recommendation, RecommendationRequest};
use mb_state::UsageGuard;

use crate::random::RandomSource;
use crate::reel::ReelReport;
use crate::timing::ReelTiming;

/// Spin cycle identifier. Strictly increasing per coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CycleId(pub u64);

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Finished,
}

/// Current spin cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSession {
    pub cycle: CycleId,
    pub phase: SpinPhase,
    /// One index per reel, in reel order
    pub target_indices: [usize; 4],
    /// Reels that reported for this cycle
    pub landed: [bool; 4],
}

impl SpinSession {
    fn idle(cycle: CycleId) -> Self {
        Self {
            cycle,
            phase: SpinPhase::Idle,
            target_indices: [0; 4],
            landed: [false; 4],
        }
    }

    /// Number of reels that reported (0..=4)
    pub fn completed_reels(&self) -> usize {
        self.landed.iter().filter(|l| **l).count()
    }
}

/// Everything the driver needs to animate a new spin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinPlan {
    pub cycle: CycleId,
    pub target_indices: [usize; 4],
    /// Full strip cycles per reel (visual only)
    pub rotations: [u32; 4],
}

/// Request issued once per finished cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationTicket {
    pub cycle: CycleId,
    pub request: RecommendationRequest,
}

/// Recommendation display slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecommendationSlot {
    #[default]
    Empty,
    Loading,
    Ready(Recommendation),
}

impl RecommendationSlot {
    pub fn is_loading(&self) -> bool {
        matches!(self, RecommendationSlot::Loading)
    }

    pub fn ready(&self) -> Option<&Recommendation> {
        match self {
            RecommendationSlot::Ready(rec) => Some(rec),
            _ => None,
        }
    }
}

/// What a reel report did
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Stale cycle, wrong phase or duplicate reel
    Ignored,
    /// Counted; still waiting for other reels
    Counted { completed: usize },
    /// Fourth reel: result derived, recommendation requested
    Finished {
        result: MoodResult,
        ticket: RecommendationTicket,
    },
}

/// Why a spin or restart was refused
#[derive(Debug, thiserror::Error)]
pub enum SpinRejected {
    #[error("A spin is already in progress")]
    AlreadySpinning,

    #[error("Daily limit reached")]
    LimitReached,

    #[error("No finished spin to restart from")]
    NotFinished,

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Owner of the spin session, current result and recommendation slot
pub struct SpinCoordinator {
    catalog: Arc<Catalog>,
    rng: Box<dyn RandomSource>,
    rotations: (u32, u32),
    language: Language,
    next_cycle: u64,
    session: SpinSession,
    selections: Option<Selections>,
    result: Option<MoodResult>,
    recommendation: RecommendationSlot,
}

impl SpinCoordinator {
    pub fn new(
        catalog: Arc<Catalog>,
        rng: Box<dyn RandomSource>,
        timing: &ReelTiming,
        language: Language,
    ) -> Self {
        Self {
            catalog,
            rng,
            rotations: timing.rotation_range(),
            language,
            next_cycle: 1,
            session: SpinSession::idle(CycleId(0)),
            selections: None,
            result: None,
            recommendation: RecommendationSlot::Empty,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn phase(&self) -> SpinPhase {
        self.session.phase
    }

    pub fn cycle(&self) -> CycleId {
        self.session.cycle
    }

    pub fn session(&self) -> &SpinSession {
        &self.session
    }

    pub fn result(&self) -> Option<&MoodResult> {
        self.result.as_ref()
    }

    pub fn recommendation(&self) -> &RecommendationSlot {
        &self.recommendation
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Language for results derived from now on
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Start a new cycle. Rejected while spinning or when the usage guard
    /// vetoes. Clears the previous result and recommendation.
    pub fn request_spin(&mut self, usage: &mut UsageGuard) -> Result<SpinPlan, SpinRejected> {
        if self.session.phase == SpinPhase::Spinning {
            return Err(SpinRejected::AlreadySpinning);
        }
        if !usage.can_spin() {
            return Err(SpinRejected::LimitReached);
        }

        let lengths = self.catalog.reel_lengths();
        let target_indices =
            lengths.map(|len| self.rng.next_below(len).min(len.saturating_sub(1)));
        let selections = self.catalog.select(target_indices)?;
        let (min, max) = self.rotations;
        let spread = (max - min) as usize + 1;
        let rotations = [(); 4].map(|_| min + self.rng.next_below(spread) as u32);

        let cycle = CycleId(self.next_cycle);
        self.next_cycle += 1;

        self.session = SpinSession {
            cycle,
            phase: SpinPhase::Spinning,
            target_indices,
            landed: [false; 4],
        };
        self.selections = Some(selections);
        self.result = None;
        self.recommendation = RecommendationSlot::Empty;

        log::debug!("[Coordinator] Cycle {} targets {:?}", cycle, target_indices);
        Ok(SpinPlan {
            cycle,
            target_indices,
            rotations,
        })
    }

    /// Count one reel's completion. The fourth distinct reel of the current
    /// cycle derives the result, records the attempt and hands back a
    /// recommendation ticket. Order of arrival never matters.
    pub fn report_reel_complete(
        &mut self,
        report: ReelReport,
        usage: &mut UsageGuard,
    ) -> ReportOutcome {
        if self.session.phase != SpinPhase::Spinning || report.cycle != self.session.cycle {
            log::debug!(
                "[Coordinator] Ignoring {} report for cycle {} (current {}, {:?})",
                report.reel.tag(),
                report.cycle,
                self.session.cycle,
                self.session.phase
            );
            return ReportOutcome::Ignored;
        }

        let slot = &mut self.session.landed[report.reel.index()];
        if *slot {
            log::debug!(
                "[Coordinator] Duplicate {} report in cycle {}",
                report.reel.tag(),
                report.cycle
            );
            return ReportOutcome::Ignored;
        }
        *slot = true;

        let completed = self.session.completed_reels();
        if completed < Category::ALL.len() {
            return ReportOutcome::Counted { completed };
        }

        let Some(selections) = self.selections.take() else {
            // Spinning always carries selections; keep the machine recoverable anyway
            log::error!(
                "[Coordinator] Cycle {} finished without selections",
                self.session.cycle
            );
            self.session.phase = SpinPhase::Idle;
            return ReportOutcome::Ignored;
        };

        let offset = self.rng.next_below(SCORE_SPAN);
        let result = MoodResult::derive(selections, offset, self.language);
        let attempts = usage.record_attempt();

        self.session.phase = SpinPhase::Finished;
        self.result = Some(result.clone());
        self.recommendation = RecommendationSlot::Loading;

        log::info!(
            "[Coordinator] Cycle {} finished: {:?} score {} (attempts today: {})",
            self.session.cycle,
            result.selections.ids(),
            result.score,
            attempts
        );

        let ticket = RecommendationTicket {
            cycle: self.session.cycle,
            request: RecommendationRequest::for_result(&result),
        };
        ReportOutcome::Finished { result, ticket }
    }

    /// Store a recommendation if it belongs to the current finished cycle.
    /// Returns false when it was discarded as stale.
    pub fn accept_recommendation(
        &mut self,
        cycle: CycleId,
        recommendation: Recommendation,
    ) -> bool {
        let current = cycle == self.session.cycle
            && self.session.phase == SpinPhase::Finished
            && self.recommendation.is_loading();
        if !current {
            log::debug!(
                "[Coordinator] Discarding recommendation for cycle {} (current {}, {:?})",
                cycle,
                self.session.cycle,
                self.session.phase
            );
            return false;
        }
        self.recommendation = RecommendationSlot::Ready(recommendation);
        true
    }

    /// Finished → Idle, clearing the result and recommendation. Idle is a no-op.
    pub fn restart(&mut self) -> Result<(), SpinRejected> {
        match self.session.phase {
            SpinPhase::Spinning => Err(SpinRejected::NotFinished),
            SpinPhase::Idle => Ok(()),
            SpinPhase::Finished => {
                self.session = SpinSession::idle(self.session.cycle);
                self.selections = None;
                self.result = None;
                self.recommendation = RecommendationSlot::Empty;
                Ok(())
            }
        }
    }
}

impl fmt::Debug for SpinCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinCoordinator")
            .field("session", &self.session)
            .field("language", &self.language)
            .field("result", &self.result)
            .field("recommendation", &self.recommendation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRandom, SequenceRandom};
    use mb_oracle::fallback;
    use mb_state::{ManualClock, MemoryStore};

    fn setup(rng: Box<dyn RandomSource>) -> (SpinCoordinator, UsageGuard) {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let clock = Arc::new(ManualClock::new(
            chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        ));
        let usage = UsageGuard::load(MemoryStore::shared(), clock);
        let coordinator = SpinCoordinator::new(catalog, rng, &ReelTiming::normal(), Language::Kr);
        (coordinator, usage)
    }

    fn report(cycle: CycleId, reel: Category) -> ReelReport {
        ReelReport { cycle, reel }
    }

    #[test]
    fn test_spin_draws_valid_targets() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(1)));
        let plan = coord.request_spin(&mut usage).unwrap();
        let lengths = coord.catalog().reel_lengths();
        for i in 0..4 {
            assert!(plan.target_indices[i] < lengths[i]);
            assert!((12..=17).contains(&plan.rotations[i]));
        }
        assert_eq!(coord.phase(), SpinPhase::Spinning);
        assert_eq!(plan.cycle, CycleId(1));
    }

    #[test]
    fn test_three_reports_keep_spinning() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(2)));
        let plan = coord.request_spin(&mut usage).unwrap();
        for reel in [Category::Flower, Category::Tea, Category::Perfume] {
            assert!(matches!(
                coord.report_reel_complete(report(plan.cycle, reel), &mut usage),
                ReportOutcome::Counted { .. }
            ));
        }
        assert_eq!(coord.phase(), SpinPhase::Spinning);
        assert!(coord.result().is_none());
        assert_eq!(usage.state().attempts_today, 0);
    }

    #[test]
    fn test_duplicate_report_ignored() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(3)));
        let plan = coord.request_spin(&mut usage).unwrap();
        coord.report_reel_complete(report(plan.cycle, Category::Tea), &mut usage);
        for _ in 0..3 {
            assert_eq!(
                coord.report_reel_complete(report(plan.cycle, Category::Tea), &mut usage),
                ReportOutcome::Ignored
            );
        }
        assert_eq!(coord.session().completed_reels(), 1);
        assert_eq!(coord.phase(), SpinPhase::Spinning);
    }

    #[test]
    fn test_finish_derives_once() {
        let rng = SequenceRandom::new(vec![3, 0, 3, 2, 0, 0, 0, 0, 7]);
        let (mut coord, mut usage) = setup(Box::new(rng));
        let plan = coord.request_spin(&mut usage).unwrap();
        assert_eq!(plan.target_indices, [3, 0, 3, 2]);

        let mut finished = None;
        for reel in Category::ALL {
            if let ReportOutcome::Finished { result, ticket } =
                coord.report_reel_complete(report(plan.cycle, reel), &mut usage)
            {
                finished = Some((result, ticket));
            }
        }
        let (result, ticket) = finished.unwrap();
        assert_eq!(result.selections.ids(), ["tea_4", "act_1", "perf_4", "flow_3"]);
        assert_eq!(result.score, 87);
        assert_eq!(
            result.commentary,
            mb_core::commentary::resolve(result.selections.ids(), Language::Kr)
        );
        assert_eq!(ticket.cycle, plan.cycle);
        assert_eq!(ticket.request.language, Language::Kr);
        assert_eq!(coord.phase(), SpinPhase::Finished);
        assert!(coord.recommendation().is_loading());
        assert_eq!(usage.state().attempts_today, 1);

        // Late duplicate after finishing changes nothing
        assert_eq!(
            coord.report_reel_complete(report(plan.cycle, Category::Tea), &mut usage),
            ReportOutcome::Ignored
        );
        assert_eq!(usage.state().attempts_today, 1);
    }

    #[test]
    fn test_rejects_while_spinning() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(4)));
        coord.request_spin(&mut usage).unwrap();
        assert!(matches!(
            coord.request_spin(&mut usage),
            Err(SpinRejected::AlreadySpinning)
        ));
        assert!(matches!(coord.restart(), Err(SpinRejected::NotFinished)));
    }

    #[test]
    fn test_stale_recommendation_discarded() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(5)));
        let first = coord.request_spin(&mut usage).unwrap();
        for reel in Category::ALL {
            coord.report_reel_complete(report(first.cycle, reel), &mut usage);
        }
        let second = coord.request_spin(&mut usage).unwrap();
        assert!(second.cycle > first.cycle);

        assert!(!coord.accept_recommendation(first.cycle, fallback::offline(Language::Kr)));
        assert_eq!(coord.recommendation(), &RecommendationSlot::Empty);

        // Stale reel report from the first cycle is not counted either
        assert_eq!(
            coord.report_reel_complete(report(first.cycle, Category::Tea), &mut usage),
            ReportOutcome::Ignored
        );
        assert_eq!(coord.session().completed_reels(), 0);
    }

    #[test]
    fn test_restart_clears() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(6)));
        let plan = coord.request_spin(&mut usage).unwrap();
        for reel in Category::ALL {
            coord.report_reel_complete(report(plan.cycle, reel), &mut usage);
        }
        assert!(coord.accept_recommendation(plan.cycle, fallback::failure(Language::Kr)));
        assert!(coord.recommendation().ready().is_some());

        coord.restart().unwrap();
        assert_eq!(coord.phase(), SpinPhase::Idle);
        assert!(coord.result().is_none());
        assert_eq!(coord.recommendation(), &RecommendationSlot::Empty);
        assert!(!coord.accept_recommendation(plan.cycle, fallback::failure(Language::Kr)));
    }

    #[test]
    fn test_limit_gate() {
        let (mut coord, mut usage) = setup(Box::new(SeededRandom::seeded(8)));
        for _ in 0..mb_state::DAILY_LIMIT {
            let plan = coord.request_spin(&mut usage).unwrap();
            for reel in Category::ALL {
                coord.report_reel_complete(report(plan.cycle, reel), &mut usage);
            }
        }
        assert!(matches!(
            coord.request_spin(&mut usage),
            Err(SpinRejected::LimitReached)
        ));
        assert_eq!(coord.phase(), SpinPhase::Finished);

        usage.toggle_admin();
        assert!(coord.request_spin(&mut usage).is_ok());
    }
}
