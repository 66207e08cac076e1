//! Job scheduler: long-lived engine executing the installed trigger set.
//!
//! Each job gets a timer task (computes the next fire time and sleeps) and a
//! worker task (runs the callback). Firings travel between them through a
//! bounded(1) channel: when a callback overruns its schedule, at most one
//! pending firing is kept and further grid points are dropped, never queued.

use chrono::Local;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::scheduler::types::{next_occurrence, JobKind, Trigger, TriggerSpec};

/// Future type returned by job callbacks.
pub type JobFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// Callback invoked on each firing of a job.
pub type JobCallback = Arc<dyn Fn() -> JobFuture + Send + Sync>;

/// A trigger spec bound to its callback.
pub struct Job {
    pub spec: TriggerSpec,
    pub callback: JobCallback,
}

impl Job {
    pub fn new<F, Fut>(spec: TriggerSpec, callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            spec,
            callback: Arc::new(move || Box::pin(callback()) as JobFuture),
        }
    }
}

struct JobRuntime {
    cancel: CancellationToken,
    timer: JoinHandle<()>,
    worker: JoinHandle<()>,
}

struct JobEntry {
    job: Job,
    runtime: Option<JobRuntime>,
}

#[derive(Default)]
struct EngineState {
    running: bool,
    jobs: HashMap<JobKind, JobEntry>,
}

/// Background engine holding the compiled trigger set.
///
/// `replace_jobs` swaps the installed set atomically: jobs present in both
/// sets with an unchanged trigger keep their original next-fire computation,
/// removed jobs are cancelled, added jobs are scheduled from the moment of
/// replacement. A failing or panicking callback is logged at the firing
/// boundary and never cancels the job's future firings.
pub struct JobScheduler {
    state: Mutex<EngineState>,
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl JobScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Begin executing all installed jobs in the background.
    pub async fn start(&self) {
        let mut state = self.state.lock().await;
        if state.running {
            return;
        }
        state.running = true;
        for entry in state.jobs.values_mut() {
            if entry.runtime.is_none() {
                entry.runtime = Some(spawn_runtime(&entry.job));
            }
        }
        info!(jobs = state.jobs.len(), "Scheduler started");
    }

    /// Halt future firings. In-flight callback executions complete before
    /// this returns; the job set stays installed for a later `start`.
    pub async fn stop(&self) {
        let runtimes: Vec<(JobKind, JobRuntime)> = {
            let mut state = self.state.lock().await;
            if !state.running {
                return;
            }
            state.running = false;
            state
                .jobs
                .iter_mut()
                .filter_map(|(kind, entry)| entry.runtime.take().map(|rt| (*kind, rt)))
                .collect()
        };

        for (kind, rt) in runtimes {
            rt.cancel.cancel();
            if let Err(e) = rt.timer.await {
                error!(%kind, error = %e, "Timer task failed on shutdown");
            }
            // The worker finishes any in-flight callback and discards a
            // still-queued firing.
            if let Err(e) = rt.worker.await {
                error!(%kind, error = %e, "Worker task failed on shutdown");
            }
        }
        info!("Scheduler stopped");
    }

    /// Atomically swap the installed job set.
    pub async fn replace_jobs(&self, new_jobs: Vec<Job>) {
        let mut state = self.state.lock().await;
        let running = state.running;
        let mut old = std::mem::take(&mut state.jobs);

        for job in new_jobs {
            let kind = job.spec.kind;
            let entry = match old.remove(&kind) {
                // Same identity, same trigger: keep the live runtime so the
                // next-fire time is not reset.
                Some(existing) if existing.job.spec.trigger == job.spec.trigger => existing,
                Some(existing) => {
                    cancel_runtime(existing);
                    debug!(%kind, "Trigger changed, rescheduling from now");
                    let runtime = running.then(|| spawn_runtime(&job));
                    JobEntry { job, runtime }
                }
                None => {
                    let runtime = running.then(|| spawn_runtime(&job));
                    JobEntry { job, runtime }
                }
            };
            state.jobs.insert(kind, entry);
        }

        for (kind, entry) in old {
            debug!(%kind, "Job removed from schedule");
            cancel_runtime(entry);
        }
    }

    /// Snapshot of the installed trigger set, ordered by job identity.
    pub async fn active_triggers(&self) -> Vec<TriggerSpec> {
        let state = self.state.lock().await;
        let mut specs: Vec<TriggerSpec> = state.jobs.values().map(|e| e.job.spec).collect();
        specs.sort_by_key(|s| s.kind);
        specs
    }
}

fn cancel_runtime(entry: JobEntry) {
    if let Some(rt) = entry.runtime {
        // In-flight work is allowed to finish; the tasks wind down on
        // their own once cancelled.
        rt.cancel.cancel();
    }
}

fn spawn_runtime(job: &Job) -> JobRuntime {
    let kind = job.spec.kind;
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel::<()>(1);

    let timer = tokio::spawn(timer_loop(kind, job.spec.trigger, tx, cancel.clone()));
    let worker = tokio::spawn(worker_loop(kind, rx, job.callback.clone(), cancel.clone()));

    JobRuntime {
        cancel,
        timer,
        worker,
    }
}

async fn timer_loop(
    kind: JobKind,
    trigger: Trigger,
    tx: mpsc::Sender<()>,
    cancel: CancellationToken,
) {
    match trigger {
        Trigger::Absolute { hour, minute } => loop {
            let now = Local::now();
            let Some(next) = next_occurrence(now, hour, minute) else {
                error!(%kind, hour, minute, "No next occurrence, job will not fire");
                return;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(wait) => {}
            }
            dispatch(kind, &tx);
        },
        Trigger::Interval { period } => {
            let mut next = Instant::now() + period;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep_until(next) => {}
                }
                dispatch(kind, &tx);
                next += period;
                // If the engine fell behind, skip missed grid points; the
                // single queued firing already covers them.
                let now = Instant::now();
                while next <= now {
                    next += period;
                }
            }
        }
    }
}

fn dispatch(kind: JobKind, tx: &mpsc::Sender<()>) {
    if tx.try_send(()).is_err() {
        debug!(%kind, "Firing coalesced, previous one still pending");
    }
}

async fn worker_loop(
    kind: JobKind,
    mut rx: mpsc::Receiver<()>,
    callback: JobCallback,
    cancel: CancellationToken,
) {
    loop {
        // An in-flight callback always completes, but a firing still sitting
        // in the queue when the job is cancelled must not start.
        let firing = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            firing = rx.recv() => firing,
        };
        if firing.is_none() {
            return;
        }
        // Run the callback in its own task so a panic is contained at the
        // join boundary and the schedule continues.
        match tokio::spawn(callback()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(%kind, error = format!("{e:#}"), "Job callback failed"),
            Err(e) => error!(%kind, error = %e, "Job callback panicked"),
        }
    }
}
