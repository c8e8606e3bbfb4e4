//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `apismith-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ModuleCatalog`: the static module registry and layout table
//!   - `ModuleRenderer`: turns a module and its context into text
//!   - `Filesystem`: file operations for persistence
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Filesystem, ModuleCatalog, ModuleRenderer};

#[cfg(test)]
pub use output::MockFilesystem;
