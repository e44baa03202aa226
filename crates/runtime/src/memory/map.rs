//! Static map metadata service.
//!
//! Map layouts depend only on the session seed and difficulty, so the reader
//! fetches them once per session and caches the result.
use std::sync::Arc;

use async_trait::async_trait;
use game_content::ContentFactory;
use game_core::{Difficulty, MapData};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("no map data for seed {seed} on {difficulty}")]
    NotFound { seed: String, difficulty: Difficulty },

    #[error("map service failed: {0}")]
    Backend(String),
}

/// Resolves a session seed into per-area map layouts.
#[async_trait]
pub trait StaticMapService: Send + Sync {
    async fn fetch(&self, seed: &str, difficulty: Difficulty) -> Result<MapData, MapError>;
}

#[async_trait]
impl<T: StaticMapService + ?Sized> StaticMapService for Arc<T> {
    async fn fetch(&self, seed: &str, difficulty: Difficulty) -> Result<MapData, MapError> {
        (**self).fetch(seed, difficulty).await
    }
}

/// Map service reading pre-generated RON dumps from a content directory.
#[derive(Clone, Debug)]
pub struct FileMapService {
    content: ContentFactory,
}

impl FileMapService {
    pub fn new(content: ContentFactory) -> Self {
        Self { content }
    }
}

#[async_trait]
impl StaticMapService for FileMapService {
    async fn fetch(&self, seed: &str, difficulty: Difficulty) -> Result<MapData, MapError> {
        let path = self.content.map_path(seed, difficulty);
        if !path.exists() {
            return Err(MapError::NotFound {
                seed: seed.to_owned(),
                difficulty,
            });
        }
        debug!(path = %path.display(), "loading map data");

        let content = self.content.clone();
        let seed = seed.to_owned();
        tokio::task::spawn_blocking(move || content.load_map(&seed, difficulty))
            .await
            .map_err(|e| MapError::Backend(e.to_string()))?
            .map_err(|e| MapError::Backend(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Area, Position};

    #[tokio::test]
    async fn reads_map_for_seed_and_difficulty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        std::fs::write(
            dir.path().join("maps/77-hell.ron"),
            "(areas: {131: (origin: (x: 15000, y: 5000), grid: (width: 1, height: 1, walkable: [true]))})",
        )
        .unwrap();
        let service = FileMapService::new(ContentFactory::new(dir.path()));

        let map = service.fetch("77", Difficulty::Hell).await.unwrap();
        assert_eq!(
            map.origin(Area::THRONE_OF_DESTRUCTION),
            Some(Position::new(15000, 5000))
        );

        let missing = service.fetch("77", Difficulty::Normal).await;
        assert!(matches!(missing, Err(MapError::NotFound { .. })));
    }
}
