//! Runtime simulator.
//!
//! Emulates firmware activity without executing anything: while running, a
//! fixed-interval tick advances a phase counter and, with a fixed
//! probability, rewrites one declared digital output to a random level.
//! Pin states are forked from the project at start, so the project's own
//! control states are never touched.
//!
//! The tick task lives in a [`TaskGuard`]; stopping the simulator or
//! dropping it clears the timer.

pub mod state;
pub mod waveform;

use std::sync::{Arc, Mutex, PoisonError};

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SimulatorConfig;
use crate::error::ConfigError;
use crate::project::{ControlKind, Project};
use crate::util::TaskGuard;

pub use state::SimulationSnapshot;

#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    state: Arc<watch::Sender<SimulationSnapshot>>,
    rng: Mutex<ChaCha8Rng>,
    task: Mutex<Option<TaskGuard>>,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (tx, _) = watch::channel(SimulationSnapshot::new(config.log_capacity));
        Ok(Self {
            config,
            state: Arc::new(tx),
            rng: Mutex::new(rng),
            task: Mutex::new(None),
        })
    }

    /// Boot the virtual board from `project` and start ticking.
    ///
    /// Returns `false` without side effects if already running.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, project: &Project) -> bool {
        let mut session = 0;
        self.state.send_if_modified(|s| {
            if s.running {
                return false;
            }
            session = s.session + 1;
            s.boot(session, project);
            true
        });
        if session == 0 {
            warn!(project = %project.id, "simulation already running, start ignored");
            return false;
        }

        let outputs: Vec<u32> = project
            .controls
            .iter()
            .filter(|c| c.kind == ControlKind::DigitalOutput)
            .filter_map(|c| c.pin.number())
            .collect();
        let rng = {
            let mut seed_source = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            ChaCha8Rng::seed_from_u64(seed_source.next_u64())
        };
        info!(project = %project.id, session, outputs = outputs.len(), "simulation started");

        let handle = tokio::spawn(tick_loop(
            self.state.clone(),
            session,
            outputs,
            self.config.clone(),
            rng,
        ));
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        *task = Some(TaskGuard::new(handle));
        true
    }

    /// Halt the tick process. Pin states are kept.
    ///
    /// Returns `false` if the simulator was not running.
    pub fn stop(&self) -> bool {
        if let Some(mut guard) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            guard.abort();
        }
        let stopped = self.state.send_if_modified(|s| {
            if !s.running {
                return false;
            }
            s.halt();
            true
        });
        if stopped {
            info!("simulation halted");
        }
        stopped
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SimulationSnapshot> {
        self.state.subscribe()
    }
}

async fn tick_loop(
    state: Arc<watch::Sender<SimulationSnapshot>>,
    session: u64,
    outputs: Vec<u32>,
    config: SimulatorConfig,
    mut rng: ChaCha8Rng,
) {
    let period = config.tick_interval();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let boot = tokio::time::sleep(config.boot_delay());
    tokio::pin!(boot);
    let mut booted = false;

    loop {
        tokio::select! {
            () = &mut boot, if !booted => {
                booted = true;
                if !apply(&state, session, |s| s.setup_finished()) {
                    return;
                }
            }
            _ = ticker.tick() => {
                let flip = (!outputs.is_empty() && rng.gen_bool(config.flip_probability))
                    .then(|| (outputs[rng.gen_range(0..outputs.len())], rng.gen_bool(0.5)));
                if let Some((pin, level)) = flip {
                    debug!(session, pin, level, "pin toggled");
                }
                if !apply(&state, session, |s| s.advance(config.phase_modulus, flip)) {
                    return;
                }
            }
        }
    }
}

/// Apply `f` only while `session` is the running session.
fn apply(
    state: &watch::Sender<SimulationSnapshot>,
    session: u64,
    f: impl FnOnce(&mut SimulationSnapshot),
) -> bool {
    let mut applied = false;
    state.send_if_modified(|s| {
        if s.session != session || !s.running {
            return false;
        }
        f(s);
        applied = true;
        true
    });
    applied
}
