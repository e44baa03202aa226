//! Session controller: attach, start the session, execute runs in order.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{Instrument, error, info, warn};

use crate::api::{BotError, RunError};
use crate::context::SessionContext;
use crate::health::HealthMonitor;
use crate::runs::Run;

/// Outcome of a single run.
#[derive(Debug)]
pub struct RunReport {
    pub name: String,
    pub elapsed: Duration,
    pub outcome: Result<(), RunError>,
}

/// Outcome of every run executed in one session.
#[derive(Debug, Default)]
pub struct SessionReport {
    pub runs: Vec<RunReport>,
}

impl SessionReport {
    pub fn succeeded(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.runs.len() - self.succeeded()
    }
}

/// Drives one game session.
pub struct Bot {
    ctx: SessionContext,
}

impl Bot {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.ctx
    }

    /// Waits until the reader resolves a local player, checking once per poll
    /// interval.
    pub async fn wait_for_game(&mut self, timeout: Duration) -> Result<(), BotError> {
        let interval = self.ctx.config.timing.poll_interval();
        let deadline = Instant::now() + timeout;
        loop {
            if self.ctx.is_attached() {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(BotError::AttachTimeout(timeout));
            }
            sleep(interval.min(deadline - now)).await;
        }
    }

    /// Rebuilds the session cache and installs the first snapshot.
    pub async fn start_session(&mut self) -> Result<(), BotError> {
        let snapshot = self.ctx.start_session().await?;
        info!(
            parent: self.ctx.span(),
            player = %snapshot.player.name,
            area = %snapshot.area(),
            "session started"
        );
        Ok(())
    }

    /// Executes `runs` in order.
    ///
    /// Every installed snapshot is checked against the health floors while a
    /// run is active; a breach abandons the run with [`RunError::LowHealth`].
    /// A failed run is logged and the next one starts, unless the session is
    /// gone, which ends the session with [`BotError::Detached`].
    pub async fn run(&mut self, runs: &[Box<dyn Run>]) -> Result<SessionReport, BotError> {
        let mut report = SessionReport::default();
        let monitor = HealthMonitor::new(self.ctx.config.health);
        for run in runs {
            let name = run.name().to_owned();
            let started = Instant::now();
            info!(parent: self.ctx.span(), run = %name, "run starting");

            let mut snapshots = self.ctx.subscribe();
            let outcome = tokio::select! {
                biased;
                outcome = run.run(&mut self.ctx) => outcome,
                breach = monitor.watch(&mut snapshots) => Err(RunError::LowHealth(breach)),
            };
            let elapsed = started.elapsed();

            match &outcome {
                Ok(()) => info!(parent: self.ctx.span(), run = %name, ?elapsed, "run finished"),
                Err(err) if err.is_detached() => {
                    error!(parent: self.ctx.span(), run = %name, ?elapsed, "session detached");
                    return Err(BotError::Detached { run: name });
                }
                Err(err) => {
                    warn!(parent: self.ctx.span(), run = %name, ?elapsed, error = %err, "run failed")
                }
            }
            report.runs.push(RunReport {
                name,
                elapsed,
                outcome,
            });
        }
        Ok(report)
    }

    /// Full session lifecycle: attach, start, run everything.
    pub async fn run_session(mut self, runs: Vec<Box<dyn Run>>) -> Result<SessionReport, BotError> {
        let span = self.ctx.span().clone();
        async move {
            let timeout = self.ctx.config.timing.attach_timeout();
            self.wait_for_game(timeout).await?;
            self.start_session().await?;
            let report = self.run(&runs).await?;
            info!(
                succeeded = report.succeeded(),
                failed = report.failed(),
                "session complete"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
