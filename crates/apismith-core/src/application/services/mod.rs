//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project", "verify a tree" or
//! "sweep the configuration space".

pub mod generation_service;
pub mod scaffold_service;
pub mod sweep_service;
pub mod verify_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use generation_service::{GenerationService, ModulePlan};
pub use scaffold_service::{ScaffoldOptions, ScaffoldOutcome, ScaffoldService};
pub use sweep_service::{SweepFailure, SweepReport, SweepService, SweepSpec};
pub use verify_service::ImportVerifier;
