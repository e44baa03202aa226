//! Snapshot source seam between the session loop and the memory reader.
use async_trait::async_trait;
use game_core::WorldSnapshot;

use crate::memory::{MemorySource, ReaderError, StateReader, StaticMapService};

/// Something that produces world snapshots for one session.
#[async_trait]
pub trait GameReader: Send + Sync {
    fn is_attached(&self) -> bool;

    async fn poll(&mut self, new_session: bool) -> Result<WorldSnapshot, ReaderError>;
}

#[async_trait]
impl<M, S> GameReader for StateReader<M, S>
where
    M: MemorySource,
    S: StaticMapService,
{
    fn is_attached(&self) -> bool {
        StateReader::is_attached(self)
    }

    async fn poll(&mut self, new_session: bool) -> Result<WorldSnapshot, ReaderError> {
        StateReader::poll(self, new_session).await
    }
}
