//! Scripted runs and the catalog that builds them from configuration.

mod baal;

use async_trait::async_trait;

pub use baal::{Baal, WAVE_SIGNATURES};

use crate::api::{CatalogError, RunError};
use crate::context::SessionContext;

/// One scripted trip from town to an encounter and back.
#[async_trait]
pub trait Run: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &mut SessionContext) -> Result<(), RunError>;
}

/// Runs known to the catalog, named as they appear in configuration.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RunKind {
    Baal,
}

impl RunKind {
    pub fn build(self) -> Box<dyn Run> {
        match self {
            RunKind::Baal => Box::new(Baal::new()),
        }
    }
}

/// Parses configured run names, failing on the first unknown one.
pub fn parse_runs<S: AsRef<str>>(names: &[S]) -> Result<Vec<RunKind>, CatalogError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref().trim();
            name.parse::<RunKind>()
                .map_err(|_| CatalogError::UnknownRun(name.to_owned()))
        })
        .collect()
}

pub fn build_runs(kinds: &[RunKind]) -> Vec<Box<dyn Run>> {
    kinds.iter().map(|kind| kind.build()).collect()
}
