//! Verification sequencer.
//!
//! Runs the battery as a timed process: `idle → running(0) → … →
//! running(5) → idle`. Each step marks its check as running, waits a
//! randomized cosmetic delay, then evaluates the check with the pure
//! analyzer. The delay never influences the outcome.
//!
//! State is published through a [`watch`] channel, so observers always see
//! the latest snapshot. Starting while a run is in progress is a no-op.
//! A run can be cancelled from any step, and dropping the [`Sequencer`]
//! aborts its pending timer.

pub mod state;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::checks::{BATTERY, evaluate};
use crate::config::SequencerConfig;
use crate::error::ConfigError;
use crate::project::Project;
use crate::util::TaskGuard;

pub use state::{Phase, RunEnd, VerificationSnapshot};
use state::RunInput;

/// Handle to one verification sequencer.
#[derive(Debug)]
pub struct Sequencer {
    config: SequencerConfig,
    state: Arc<watch::Sender<VerificationSnapshot>>,
    rng: Mutex<ChaCha8Rng>,
    task: Mutex<Option<TaskGuard>>,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (tx, _) = watch::channel(VerificationSnapshot::new(config.log_capacity));
        Ok(Self {
            config,
            state: Arc::new(tx),
            rng: Mutex::new(rng),
            task: Mutex::new(None),
        })
    }

    /// Start a run over a snapshot of `project`.
    ///
    /// Returns `false` and leaves the current run untouched if one is
    /// already in progress.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, project: &Project) -> bool {
        let mut run = 0;
        self.state.send_if_modified(|s| {
            if s.is_running() {
                return false;
            }
            run = s.run + 1;
            s.begin(run, &project.name);
            true
        });
        if run == 0 {
            warn!(project = %project.id, "verification already running, start ignored");
            return false;
        }

        let delays: Vec<Duration> = BATTERY.iter().map(|_| self.next_delay()).collect();
        let input = RunInput::from_project(project);
        info!(project = %project.id, run, "verification started");

        let handle = tokio::spawn(drive(self.state.clone(), run, input, delays));
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        *task = Some(TaskGuard::new(handle));
        true
    }

    /// Abort the current run. Returns `false` if nothing was running.
    pub fn cancel(&self) -> bool {
        let mut cancelled = false;
        self.state.send_if_modified(|s| {
            if !s.is_running() {
                return false;
            }
            s.cancel();
            cancelled = true;
            true
        });
        if let Some(mut guard) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            guard.abort();
        }
        if cancelled {
            info!("verification cancelled");
        }
        cancelled
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running()
    }

    pub fn snapshot(&self) -> VerificationSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationSnapshot> {
        self.state.subscribe()
    }

    /// Wait until no run is in progress and return the final snapshot.
    pub async fn wait_idle(&self) -> VerificationSnapshot {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|s| !s.is_running()).await;
        self.snapshot()
    }

    fn next_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let jitter = rng.gen_range(0..=self.config.step_delay_jitter_ms);
        Duration::from_millis(self.config.step_delay_min_ms.saturating_add(jitter))
    }
}

async fn drive(
    state: Arc<watch::Sender<VerificationSnapshot>>,
    run: u64,
    input: RunInput,
    delays: Vec<Duration>,
) {
    for (step, (id, delay)) in BATTERY.into_iter().zip(delays).enumerate() {
        if !apply(&state, run, |s| s.enter_step(step)) {
            return;
        }

        tokio::time::sleep(delay).await;

        let result = evaluate(id, &input.as_analysis());
        debug!(run, check = %id, status = result.status.tag(), "check resolved");
        if !apply(&state, run, |s| s.resolve_step(step, result)) {
            return;
        }
    }

    if apply(&state, run, |s| s.finish()) {
        info!(run, "verification complete");
    }
}

/// Apply `f` only if `run` is still the active run.
fn apply(
    state: &watch::Sender<VerificationSnapshot>,
    run: u64,
    f: impl FnOnce(&mut VerificationSnapshot),
) -> bool {
    let mut applied = false;
    state.send_if_modified(|s| {
        if s.run != run || !s.is_running() {
            return false;
        }
        f(s);
        applied = true;
        true
    });
    applied
}

/// Run the whole battery over `project` and return the final snapshot.
pub async fn run_battery(
    project: &Project,
    config: SequencerConfig,
) -> Result<VerificationSnapshot, ConfigError> {
    let sequencer = Sequencer::new(config)?;
    sequencer.start(project);
    Ok(sequencer.wait_idle().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::eval::AnalysisInput;
    use crate::checks::{CheckId, CheckStatus, analyze};
    use state::{LOG_CANCELLED, LOG_COMPLETE, LOG_START};

    fn project() -> Project {
        Project {
            code: "void setup(){} void loop(){}".into(),
            ..Project::new("p1", "Blinky")
        }
    }

    fn seeded() -> SequencerConfig {
        SequencerConfig {
            seed: Some(42),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_matches_the_pure_analyzer() {
        let p = project();
        let snapshot = run_battery(&p, seeded()).await.unwrap();

        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.last_end, Some(RunEnd::Complete));
        assert_eq!(snapshot.results, analyze(&AnalysisInput::from_project(&p)));
    }

    #[tokio::test(start_paused = true)]
    async fn log_is_time_ordered() {
        let snapshot = run_battery(&project(), seeded()).await.unwrap();
        let log: Vec<_> = snapshot.log.entries().collect();

        assert_eq!(log.len(), 2 + 6 + 1);
        assert_eq!(log[0], LOG_START);
        assert_eq!(log[1], "Target project: Blinky");
        assert_eq!(log[2], "[PASS] Logic Entry Point: All checks passed.");
        assert!(log[7].starts_with("[WARN] Serial Communication Check"));
        assert_eq!(log[8], LOG_COMPLETE);
        assert_eq!(snapshot.log.newest_first().next(), Some(LOG_COMPLETE));
    }

    #[tokio::test(start_paused = true)]
    async fn checks_resolve_strictly_in_order() {
        let seq = Sequencer::new(seeded()).unwrap();
        let mut rx = seq.subscribe();
        assert!(seq.start(&project()));

        let mut steps = Vec::new();
        loop {
            let s = rx.borrow_and_update().clone();
            if let Phase::Running { step } = s.phase {
                if steps.last() != Some(&step) {
                    steps.push(step);
                }
                assert!(s.results[..step].iter().all(|r| r.status.is_terminal()));
                assert!(s.results[step + 1..].iter().all(|r| r.status == CheckStatus::Idle));
            } else if s.last_end.is_some() {
                break;
            }
            rx.changed().await.unwrap();
        }
        assert_eq!(steps, vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_is_a_noop() {
        let seq = Sequencer::new(seeded()).unwrap();
        assert!(seq.start(&project()));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let before = seq.snapshot();
        let other = Project::new("p2", "Other");
        assert!(!seq.start(&other));
        assert_eq!(seq.snapshot(), before);

        let done = seq.wait_idle().await;
        assert_eq!(done.run, 1);
        assert_eq!(done.log.entries().nth(1), Some("Target project: Blinky"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_remaining_checks() {
        let seq = Sequencer::new(seeded()).unwrap();
        seq.start(&project());
        // Past the first step (max 1300 ms), before the third.
        tokio::time::sleep(Duration::from_millis(1400)).await;

        assert!(seq.cancel());
        let s = seq.snapshot();
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.last_end, Some(RunEnd::Cancelled));
        assert_eq!(s.results[0].status, CheckStatus::Pass);
        assert_eq!(s.results[5].status, CheckStatus::Idle);
        assert_eq!(s.log.last(), Some(LOG_CANCELLED));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(seq.snapshot(), s);
        assert!(!seq.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn a_new_run_may_follow_a_cancelled_one() {
        let seq = Sequencer::new(seeded()).unwrap();
        seq.start(&project());
        tokio::time::sleep(Duration::from_millis(900)).await;
        seq.cancel();

        assert!(seq.start(&project()));
        let done = seq.wait_idle().await;
        assert_eq!(done.run, 2);
        assert_eq!(done.last_end, Some(RunEnd::Complete));
        assert!(done.results.iter().all(|r| r.status.is_terminal()));
    }

    #[tokio::test(start_paused = true)]
    async fn step_delays_stay_within_bounds() {
        let seq = Sequencer::new(seeded()).unwrap();
        let (lo, hi) = seeded().step_delay_bounds();
        for _ in 0..100 {
            let d = seq.next_delay();
            assert!(d >= lo && d <= hi, "{d:?} out of bounds");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn run_reads_a_snapshot_of_the_project() {
        let seq = Sequencer::new(seeded()).unwrap();
        let mut p = project();
        seq.start(&p);
        p.code.clear();

        let done = seq.wait_idle().await;
        let entry = done.results.iter().find(|r| r.id == CheckId::EntryPoint).unwrap();
        assert_eq!(entry.status, CheckStatus::Pass);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SequencerConfig {
            step_delay_min_ms: 0,
            ..Default::default()
        };
        assert!(Sequencer::new(config).is_err());
    }
}
