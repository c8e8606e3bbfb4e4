//! apismith core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the apismith
//! FastAPI project generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           apismith-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Generation, Verify, Sweep, Scaffold)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Driven: Catalog, Renderer, Filesystem)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    apismith-adapters (Infrastructure)   │
//! │ (BuiltinCatalog, LocalFilesystem, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectConfig, LayoutResolver, Tree)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apismith_core::prelude::*;
//!
//! let config = ProjectConfig::builder()
//!     .name("shop-api")
//!     .structure(Structure::DomainDriven)
//!     .auth_method(AuthMethod::Jwt)
//!     .build()?;
//!
//! // `catalog` and `renderer` come from apismith-adapters.
//! let engine = GenerationService::new(catalog, renderer)?;
//! let tree = engine.generate(&config)?;
//! let report = ImportVerifier::new()?.verify(&tree);
//! assert!(report.is_clean());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationService, ImportVerifier, ScaffoldOptions, ScaffoldService, SweepReport,
        SweepService, SweepSpec,
        ports::{Filesystem, ModuleCatalog, ModuleRenderer},
    };
    pub use crate::domain::{
        AuthMethod, Broker, CacheBackend, ConsistencyReport, Database, GeneratedTree,
        LoggingLibrary, MigrationTool, Orm, ProjectConfig, PythonVersion, Structure, TaskQueue,
    };
    pub use crate::error::{ApismithError, ApismithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
