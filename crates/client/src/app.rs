//! Composition root: one bot session per configured name.
use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::{ConfigLoader, ContentFactory};
use runtime::{
    Bot, DumpMemorySource, FileMapService, SessionContext, StateReader, Supervisor, build_runs,
    parse_runs,
};
use tracing::{error, info, warn};

use crate::backend::{DryRunActions, LoggingInput};
use crate::config::ClientConfig;
use crate::demo::demo_session;

pub async fn run(config: ClientConfig) -> Result<()> {
    let content = ContentFactory::new(&config.data_dir);
    let mut supervisor = Supervisor::new();

    for name in &config.sessions {
        let ctx = build_session(&config, &content, name)
            .with_context(|| format!("building session `{name}`"))?;
        let runs = build_runs(&parse_runs(&ctx.config.game.runs)?);
        supervisor.start(name.clone(), Bot::new(ctx).run_session(runs))?;
    }

    let joined = tokio::select! {
        outcomes = supervisor.join_all() => Some(outcomes),
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for ctrl-c")?;
            None
        }
    };
    let outcomes = match joined {
        Some(outcomes) => outcomes,
        None => {
            warn!("interrupted, stopping sessions");
            supervisor.shutdown().await
        }
    };

    for (name, outcome) in outcomes {
        match outcome {
            Ok(report) => info!(
                session = %name,
                succeeded = report.succeeded(),
                failed = report.failed(),
                "session finished"
            ),
            Err(err) => error!(session = %name, error = %err, "session failed"),
        }
    }
    Ok(())
}

fn build_session(
    config: &ClientConfig,
    content: &ContentFactory,
    name: &str,
) -> Result<SessionContext> {
    let bot_config = ConfigLoader::load(&config.session_config_path(name))?;
    let builder = SessionContext::builder(name);

    let builder = match &config.dump_path {
        Some(path) => {
            let memory = DumpMemorySource::open(path)
                .with_context(|| format!("opening memory dump {}", path.display()))?;
            let offsets = content.load_offsets()?;
            let reader = StateReader::new(
                memory,
                FileMapService::new(content.clone()),
                offsets,
                bot_config.game.difficulty,
            );
            info!(session = name, dump = %path.display(), "reading memory dump");
            builder
                .reader(reader)
                .actions(Arc::new(DryRunActions))
                .input(Arc::new(LoggingInput))
        }
        None => {
            let demo = demo_session(&bot_config.character.name, &bot_config.bindings);
            info!(session = name, "no memory dump configured, using demo world");
            builder
                .reader(demo.reader)
                .actions(demo.actions)
                .input(demo.input)
        }
    };

    Ok(builder.config(bot_config).build()?)
}
