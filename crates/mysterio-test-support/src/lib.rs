//! Shared test mocks and fixtures for the Mysterio party-game engine.

mod clock;
mod fixtures;
mod generator;
mod repository;

pub use clock::{FixedClock, fixed_now};
pub use fixtures::{scenario_document, validated_scenario};
pub use generator::{FailingScenarioGenerator, StallingScenarioGenerator, StaticScenarioGenerator};
pub use repository::FailingRepository;
