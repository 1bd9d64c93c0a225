//! Background scrambler for the cube.
//!
//! A run draws a step count, then a producer thread picks one wall per step
//! and hands it to the interaction thread over a bounded channel. The
//! interaction thread applies each step through its normal key path and calls
//! [`Mixer::record`] so the run's log file mirrors what actually happened.

use std::{
    fs::File,
    io::{self, LineWriter, Write},
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use cube_core::Wall;
use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

const QUEUE_CAPACITY: usize = 8;

#[derive(Debug, Error)]
pub enum MixerError {
    #[error("invalid step range {min}..={max}")]
    InvalidStepRange { min: u32, max: u32 },
    #[error("cannot open mixer log {path}: {source}")]
    OpenLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write mixer log: {0}")]
    WriteLog(#[source] io::Error),
    #[error("cannot spawn mixer thread: {0}")]
    Spawn(#[source] io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixerConfig {
    pub min_steps: u32,
    pub max_steps: u32,
    pub step_delay: Duration,
    pub log_path: PathBuf,
    pub seed: Option<u64>,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            min_steps: 50,
            max_steps: 99,
            step_delay: Duration::from_millis(50),
            log_path: PathBuf::from("mixer.txt"),
            seed: None,
        }
    }
}

/// One randomly chosen wall turn, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerStep {
    pub index: u32,
    pub total: u32,
    pub wall: Wall,
}

/// Steps that arrived since the last poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixerPoll {
    pub steps: Vec<MixerStep>,
    /// The producer is gone and the queue is empty.
    pub finished: bool,
}

/// Handle to a running scramble. Dropping it cancels the run and joins the
/// producer thread.
#[derive(Debug)]
pub struct Mixer {
    receiver: Receiver<MixerStep>,
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
    log: LineWriter<File>,
    log_path: PathBuf,
    total: u32,
    recorded: u32,
}

impl Mixer {
    /// Open (truncating) the log and start producing steps.
    pub fn start(config: &MixerConfig) -> Result<Self, MixerError> {
        if config.min_steps == 0 || config.min_steps > config.max_steps {
            return Err(MixerError::InvalidStepRange {
                min: config.min_steps,
                max: config.max_steps,
            });
        }

        let file = File::create(&config.log_path).map_err(|source| MixerError::OpenLog {
            path: config.log_path.clone(),
            source,
        })?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let total = rng.gen_range(config.min_steps..=config.max_steps);

        let (sender, receiver) = bounded(QUEUE_CAPACITY);
        let (cancel, cancelled) = bounded(1);
        let delay = config.step_delay;
        let handle = thread::Builder::new()
            .name("mixer".into())
            .spawn(move || produce(rng, total, delay, sender, cancelled))
            .map_err(MixerError::Spawn)?;

        info!("Mixer started: {total} steps, log at {}", config.log_path.display());
        Ok(Self {
            receiver,
            cancel,
            handle: Some(handle),
            log: LineWriter::new(file),
            log_path: config.log_path.clone(),
            total,
            recorded: 0,
        })
    }

    /// Drain every queued step without blocking.
    pub fn poll(&self) -> MixerPoll {
        let mut poll = MixerPoll::default();
        loop {
            match self.receiver.try_recv() {
                Ok(step) => poll.steps.push(step),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    poll.finished = true;
                    break;
                }
            }
        }
        poll
    }

    /// Append the log line for a step that has been applied, or refused
    /// because `blocked_by` was mid-turn.
    pub fn record(&mut self, step: &MixerStep, signed_angle: i32, blocked_by: Option<Wall>) -> Result<(), MixerError> {
        let line = log_line(step.wall, signed_angle, blocked_by);
        writeln!(self.log, "{line}").map_err(MixerError::WriteLog)?;
        self.recorded += 1;
        debug!("Mixer step {}/{}: {line}", step.index, step.total);
        Ok(())
    }

    /// Ask the producer to stop. A producer waiting out its step delay wakes
    /// up immediately.
    pub fn cancel(&self) {
        if self.cancel.try_send(()).is_ok() {
            info!("Mixer cancelled after {} of {} steps", self.recorded, self.total);
        }
    }

    pub fn total_steps(&self) -> u32 {
        self.total
    }

    pub fn recorded_steps(&self) -> u32 {
        self.recorded
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl Drop for Mixer {
    fn drop(&mut self) {
        // Full or disconnected both mean the producer is already stopping.
        let _ = self.cancel.try_send(());
        // Unblock a producer waiting on a full queue.
        self.receiver = crossbeam_channel::never();
        if let Err(err) = self.log.flush() {
            warn!("Failed to flush mixer log: {err}");
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Mixer thread panicked");
            }
        }
    }
}

fn produce(mut rng: StdRng, total: u32, delay: Duration, sender: Sender<MixerStep>, cancelled: Receiver<()>) {
    if !matches!(cancelled.try_recv(), Err(TryRecvError::Empty)) {
        return;
    }
    for index in 1..=total {
        let wall = Wall::ALL[rng.gen_range(0..Wall::ALL.len())];
        if sender.send(MixerStep { index, total, wall }).is_err() {
            return;
        }
        // The step delay doubles as the wait for a cancel.
        match cancelled.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// `"Right wall rotation (90 deg)"`, with a `" [blocked: Up lock]"` suffix
/// when the turn was refused.
pub fn log_line(wall: Wall, signed_angle: i32, blocked_by: Option<Wall>) -> String {
    let mut line = format!("{wall} wall rotation ({signed_angle} deg)");
    if let Some(blocking) = blocked_by {
        line.push_str(&format!(" [blocked: {blocking} lock]"));
    }
    line
}
