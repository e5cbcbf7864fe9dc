//! Mysterio: scenario content.
//!
//! Typed scenario model, the scenario-schema definition, the validator that
//! guards the trust boundary, and the generator interface with its built-in
//! template implementation.

pub mod difficulty;
pub mod generator;
pub mod model;
pub mod schema;
pub mod source;
pub mod template;
pub mod validator;

pub use difficulty::Difficulty;
pub use generator::{GenerationError, ScenarioGenerator};
pub use model::{
    Phase, PhaseContent, PrivateBlock, PublicBlock, Role, RoleId, Scenario, ScenarioMeta, Secret,
    ValidatedScenario,
};
pub use schema::{ScenarioSchema, SchemaDefinitionError};
pub use source::ScenarioSource;
pub use template::TemplateScenarioGenerator;
pub use validator::{SchemaError, validate};
