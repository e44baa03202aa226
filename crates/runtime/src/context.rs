//! Per-session state shared by steps, characters and runs.
//!
//! A [`SessionContext`] owns the reader of one game session and the latest
//! snapshot it produced. Steps receive it as `&mut SessionContext`; nothing in
//! it is shared with other sessions.

use std::sync::Arc;

use game_core::{BotConfig, WorldSnapshot};
use tokio::sync::watch;
use tracing::{Span, debug, info_span};

use crate::api::{Actions, ContextError, GameReader, InputSink, ReaderError};
use crate::character::{Character, build_character};

pub struct SessionContext {
    pub config: Arc<BotConfig>,
    pub character: Arc<dyn Character>,
    pub actions: Arc<dyn Actions>,
    pub input: Arc<dyn InputSink>,
    reader: Box<dyn GameReader>,
    snapshot: Arc<WorldSnapshot>,
    published: watch::Sender<Arc<WorldSnapshot>>,
    span: Span,
}

impl SessionContext {
    pub fn builder(name: impl Into<String>) -> SessionContextBuilder {
        SessionContextBuilder::new(name)
    }

    /// Latest snapshot; empty until the first successful poll.
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Stream of installed snapshots, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Arc<WorldSnapshot>> {
        self.published.subscribe()
    }

    pub fn is_attached(&self) -> bool {
        self.reader.is_attached()
    }

    /// Re-reads the world and installs the new snapshot.
    ///
    /// On failure the previous snapshot stays installed but is not returned.
    pub async fn refresh(&mut self) -> Result<Arc<WorldSnapshot>, ReaderError> {
        self.poll(false).await
    }

    /// Rebuilds the session cache (player unit, seed, map) and refreshes.
    pub async fn start_session(&mut self) -> Result<Arc<WorldSnapshot>, ReaderError> {
        self.poll(true).await
    }

    async fn poll(&mut self, new_session: bool) -> Result<Arc<WorldSnapshot>, ReaderError> {
        let snapshot = Arc::new(self.reader.poll(new_session).await?);
        debug!(
            parent: &self.span,
            area = %snapshot.area(),
            monsters = snapshot.monsters.len(),
            "snapshot refreshed"
        );
        self.snapshot = Arc::clone(&snapshot);
        self.published.send_replace(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// Builder for [`SessionContext`].
///
/// The character defaults to the class named in the configuration.
pub struct SessionContextBuilder {
    name: String,
    config: Option<Arc<BotConfig>>,
    reader: Option<Box<dyn GameReader>>,
    actions: Option<Arc<dyn Actions>>,
    input: Option<Arc<dyn InputSink>>,
    character: Option<Arc<dyn Character>>,
}

impl SessionContextBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
            reader: None,
            actions: None,
            input: None,
            character: None,
        }
    }

    pub fn config(mut self, config: impl Into<Arc<BotConfig>>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn reader(mut self, reader: impl GameReader + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    pub fn actions(mut self, actions: Arc<dyn Actions>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn input(mut self, input: Arc<dyn InputSink>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn character(mut self, character: Arc<dyn Character>) -> Self {
        self.character = Some(character);
        self
    }

    pub fn build(self) -> Result<SessionContext, ContextError> {
        let config = self.config.ok_or(ContextError::Missing("config"))?;
        let reader = self.reader.ok_or(ContextError::Missing("reader"))?;
        let actions = self.actions.ok_or(ContextError::Missing("actions"))?;
        let input = self.input.ok_or(ContextError::Missing("input"))?;
        let character = self
            .character
            .unwrap_or_else(|| build_character(&config));

        let span = info_span!(
            "session",
            name = %self.name,
            character = character.name()
        );

        let snapshot = Arc::new(WorldSnapshot::default());
        let (published, _) = watch::channel(Arc::clone(&snapshot));
        Ok(SessionContext {
            config,
            character,
            actions,
            input,
            reader,
            snapshot,
            published,
            span,
        })
    }
}
