//! Deploy coordination: project resolution, upload, and the staged pipeline.

pub mod orchestrator;
pub mod publisher;
pub mod resolver;

pub use orchestrator::{DeployOutcome, DeployRequest, DeployStage, Deployer};
pub use publisher::publish;
pub use resolver::resolve_project;
