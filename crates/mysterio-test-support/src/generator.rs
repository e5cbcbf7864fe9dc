//! Scripted scenario generators for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mysterio_scenario::{Difficulty, GenerationError, ScenarioGenerator};
use serde_json::Value;

/// A generator that returns the same document on every call and counts how
/// often it was asked.
#[derive(Debug)]
pub struct StaticScenarioGenerator {
    document: Value,
    calls: AtomicUsize,
}

impl StaticScenarioGenerator {
    /// Create a generator that always answers with `document`.
    #[must_use]
    pub fn new(document: Value) -> Self {
        Self {
            document,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScenarioGenerator for StaticScenarioGenerator {
    async fn generate(
        &self,
        _player_count: usize,
        _difficulty: Difficulty,
    ) -> Result<Value, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }
}

/// A generator whose backend is always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingScenarioGenerator;

#[async_trait]
impl ScenarioGenerator for FailingScenarioGenerator {
    async fn generate(
        &self,
        _player_count: usize,
        _difficulty: Difficulty,
    ) -> Result<Value, GenerationError> {
        Err(GenerationError::Unavailable("generator backend unreachable".into()))
    }
}

/// A generator that never answers. Useful for exercising time boxes and
/// cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StallingScenarioGenerator;

#[async_trait]
impl ScenarioGenerator for StallingScenarioGenerator {
    async fn generate(
        &self,
        _player_count: usize,
        _difficulty: Difficulty,
    ) -> Result<Value, GenerationError> {
        std::future::pending().await
    }
}
