//! The trust boundary between a scenario generator and the domain.

use std::sync::Arc;
use std::time::Duration;

use mysterio_core::error::DomainError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::difficulty::Difficulty;
use crate::generator::ScenarioGenerator;
use crate::model::ValidatedScenario;
use crate::schema::ScenarioSchema;

/// Wraps a generator with a time box, caller cancellation, and schema
/// validation. Nothing else in the workspace calls a generator directly.
#[derive(Clone)]
pub struct ScenarioSource {
    generator: Arc<dyn ScenarioGenerator>,
    schema: Arc<ScenarioSchema>,
    timeout: Duration,
}

impl std::fmt::Debug for ScenarioSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioSource")
            .field("schema", &self.schema)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ScenarioSource {
    /// Creates a scenario source.
    #[must_use]
    pub fn new(
        generator: Arc<dyn ScenarioGenerator>,
        schema: Arc<ScenarioSchema>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            schema,
            timeout,
        }
    }

    /// The schema every produced scenario conforms to.
    #[must_use]
    pub fn schema(&self) -> &ScenarioSchema {
        &self.schema
    }

    /// Generates a scenario and validates it.
    ///
    /// # Errors
    ///
    /// - `DomainError::GenerationCancelled` if `cancel` fires first.
    /// - `DomainError::GenerationTimedOut` if the generator exceeds the time box.
    /// - `DomainError::GenerationFailed` if the generator reports an error.
    /// - `DomainError::SchemaViolation` if the document does not conform.
    pub async fn produce(
        &self,
        player_count: usize,
        difficulty: Difficulty,
        cancel: &CancellationToken,
    ) -> Result<ValidatedScenario, DomainError> {
        let generation = tokio::time::timeout(
            self.timeout,
            self.generator.generate(player_count, difficulty),
        );

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!(player_count, %difficulty, "scenario generation cancelled by caller");
                return Err(DomainError::GenerationCancelled);
            }
            outcome = generation => outcome,
        };

        let raw = match outcome {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                warn!(error = %err, "scenario generator failed");
                return Err(DomainError::GenerationFailed(err.to_string()));
            }
            Err(_elapsed) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms = millis, "scenario generator timed out");
                return Err(DomainError::GenerationTimedOut(millis));
            }
        };

        let scenario = ValidatedScenario::parse(&raw, &self.schema).map_err(|err| {
            warn!(path = %err.path, reason = %err.reason, "generated scenario rejected");
            DomainError::from(err)
        })?;

        debug!(
            title = %scenario.meta.title,
            phases = scenario.phases.len(),
            roles = scenario.roles.len(),
            "scenario generated"
        );
        Ok(scenario)
    }
}
