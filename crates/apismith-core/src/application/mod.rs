//! Application layer for apismith.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (generation, verification, sweeps,
//!   scaffolding)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! composition rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    GenerationService, ImportVerifier, ModulePlan, ScaffoldOptions, ScaffoldOutcome,
    ScaffoldService, SweepFailure, SweepReport, SweepService, SweepSpec,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ModuleCatalog, ModuleRenderer};

pub use error::ApplicationError;
