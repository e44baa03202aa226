//! Runs several bot sessions side by side, one tokio task each.
//!
//! Sessions share nothing; a panic or abort in one task is reported through
//! [`SupervisorError::SessionJoin`] and leaves the others running.

use std::collections::BTreeMap;
use std::future::Future;

use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};

use crate::api::BotError;
use crate::bot::SessionReport;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("session `{0}` is already running")]
    DuplicateSession(String),

    #[error("no session named `{0}`")]
    UnknownSession(String),

    #[error("session `{name}` failed")]
    Session {
        name: String,
        #[source]
        source: BotError,
    },

    #[error("session `{name}` did not complete")]
    SessionJoin {
        name: String,
        #[source]
        source: JoinError,
    },
}

type SessionTask = JoinHandle<Result<SessionReport, BotError>>;

#[derive(Default)]
pub struct Supervisor {
    sessions: BTreeMap<String, SessionTask>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `session` under `name`. Names stay taken until joined.
    pub fn start<F>(&mut self, name: impl Into<String>, session: F) -> Result<(), SupervisorError>
    where
        F: Future<Output = Result<SessionReport, BotError>> + Send + 'static,
    {
        let name = name.into();
        if self.sessions.contains_key(&name) {
            return Err(SupervisorError::DuplicateSession(name));
        }
        info!(session = %name, "starting session");
        self.sessions.insert(name, tokio::spawn(session));
        Ok(())
    }

    /// Aborts one session at its next await point.
    pub fn stop(&self, name: &str) -> Result<(), SupervisorError> {
        let task = self
            .sessions
            .get(name)
            .ok_or_else(|| SupervisorError::UnknownSession(name.to_owned()))?;
        info!(session = %name, "stopping session");
        task.abort();
        Ok(())
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.sessions
            .get(name)
            .is_some_and(|task| !task.is_finished())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sessions.keys().map(String::as_str)
    }

    /// Waits for one session and releases its name.
    ///
    /// Cancel-safe: dropping the future leaves the session registered.
    pub async fn join(&mut self, name: &str) -> Result<SessionReport, SupervisorError> {
        let task = self
            .sessions
            .get_mut(name)
            .ok_or_else(|| SupervisorError::UnknownSession(name.to_owned()))?;
        let joined = task.await;
        self.sessions.remove(name);

        let name = name.to_owned();
        match joined {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(source)) => Err(SupervisorError::Session { name, source }),
            Err(source) => Err(SupervisorError::SessionJoin { name, source }),
        }
    }

    /// Aborts every session and waits for all of them.
    pub async fn shutdown(&mut self) -> Vec<(String, Result<SessionReport, SupervisorError>)> {
        for task in self.sessions.values() {
            task.abort();
        }
        let names: Vec<String> = self.sessions.keys().cloned().collect();
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            let outcome = self.join(&name).await;
            if let Err(err) = &outcome {
                warn!(session = %name, error = %err, "session ended abnormally");
            }
            outcomes.push((name, outcome));
        }
        outcomes
    }

    /// Waits for every session in name order.
    pub async fn join_all(&mut self) -> Vec<(String, Result<SessionReport, SupervisorError>)> {
        let names: Vec<String> = self.sessions.keys().cloned().collect();
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            let outcome = self.join(&name).await;
            outcomes.push((name, outcome));
        }
        outcomes
    }
}
