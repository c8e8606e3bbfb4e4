//! Sweep Service - exhaustive `(generate, verify)` over a configuration space.
//!
//! Every combination in the cartesian product of a [`SweepSpec`] goes through
//! the configuration builder. Rejected combinations are counted as skipped;
//! accepted ones are generated and verified in parallel. Failures are
//! aggregated, never short-circuited, and reported in combination order.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        services::{GenerationService, ImportVerifier},
    },
    domain::{
        AuthMethod, Broker, CacheBackend, Database, Finding, LoggingLibrary, MigrationTool, Orm,
        ProjectConfig, PythonVersion, Structure, TaskQueue,
    },
    error::ApismithResult,
};

const SWEEP_PROJECT_NAME: &str = "sweep-project";

const AXES: usize = 15;

/// Allowed values per axis.
///
/// `None` on the migration tool and broker axes leaves the value to the
/// builder's inference from the ORM and task queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub structures: Vec<Structure>,
    pub databases: Vec<Database>,
    pub orms: Vec<Orm>,
    pub migration_tools: Vec<Option<MigrationTool>>,
    pub auth_methods: Vec<AuthMethod>,
    pub cache_backends: Vec<CacheBackend>,
    pub task_queues: Vec<TaskQueue>,
    pub brokers: Vec<Option<Broker>>,
    pub logging: Vec<LoggingLibrary>,
    pub include_examples: Vec<bool>,
    pub admin_panel: Vec<bool>,
    pub docker: Vec<bool>,
    pub github_actions: Vec<bool>,
    pub pre_commit: Vec<bool>,
    pub python_versions: Vec<PythonVersion>,
}

impl Default for SweepSpec {
    /// Structure × database × ORM × auth × cache × examples.
    fn default() -> Self {
        Self {
            structures: Structure::ALL.to_vec(),
            databases: Database::ALL.to_vec(),
            orms: Orm::ALL.to_vec(),
            migration_tools: vec![None],
            auth_methods: AuthMethod::ALL.to_vec(),
            cache_backends: CacheBackend::ALL.to_vec(),
            task_queues: vec![TaskQueue::None],
            brokers: vec![None],
            logging: vec![LoggingLibrary::Standard],
            include_examples: vec![true, false],
            admin_panel: vec![false],
            docker: vec![false],
            github_actions: vec![false],
            pre_commit: vec![false],
            python_versions: vec![PythonVersion::default()],
        }
    }
}

impl SweepSpec {
    /// Every value on every axis. Migration tools and brokers are listed
    /// explicitly, which covers every inferred value too.
    pub fn exhaustive() -> Self {
        Self {
            migration_tools: MigrationTool::ALL.iter().copied().map(Some).collect(),
            task_queues: TaskQueue::ALL.to_vec(),
            brokers: Broker::ALL.iter().copied().map(Some).collect(),
            logging: LoggingLibrary::ALL.to_vec(),
            admin_panel: vec![true, false],
            docker: vec![true, false],
            github_actions: vec![true, false],
            pre_commit: vec![true, false],
            python_versions: PythonVersion::ALL.to_vec(),
            ..Self::default()
        }
    }

    /// Size of the cartesian product.
    pub fn combinations(&self) -> usize {
        self.radices().iter().product()
    }

    fn radices(&self) -> [usize; AXES] {
        [
            self.structures.len(),
            self.databases.len(),
            self.orms.len(),
            self.migration_tools.len(),
            self.auth_methods.len(),
            self.cache_backends.len(),
            self.task_queues.len(),
            self.brokers.len(),
            self.logging.len(),
            self.include_examples.len(),
            self.admin_panel.len(),
            self.docker.len(),
            self.github_actions.len(),
            self.pre_commit.len(),
            self.python_versions.len(),
        ]
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        const NAMES: [&str; AXES] = [
            "structures",
            "databases",
            "orms",
            "migration_tools",
            "auth_methods",
            "cache_backends",
            "task_queues",
            "brokers",
            "logging",
            "include_examples",
            "admin_panel",
            "docker",
            "github_actions",
            "pre_commit",
            "python_versions",
        ];
        match self.radices().iter().position(|len| *len == 0) {
            Some(axis) => Err(ApplicationError::InvalidSweep {
                reason: format!("axis '{}' has no values", NAMES[axis]),
            }),
            None => Ok(()),
        }
    }

    /// Build combination `index` (mixed-radix, last axis fastest).
    fn configuration(&self, index: usize) -> Result<ProjectConfig, crate::domain::DomainError> {
        let mut digits = [0usize; AXES];
        let mut rest = index;
        for (digit, radix) in digits.iter_mut().zip(self.radices()).rev() {
            *digit = rest % radix;
            rest /= radix;
        }

        let mut builder = ProjectConfig::builder()
            .name(SWEEP_PROJECT_NAME)
            .structure(self.structures[digits[0]])
            .database(self.databases[digits[1]])
            .orm(self.orms[digits[2]])
            .auth_method(self.auth_methods[digits[4]])
            .cache_backend(self.cache_backends[digits[5]])
            .task_queue(self.task_queues[digits[6]])
            .logging(self.logging[digits[8]])
            .include_examples(self.include_examples[digits[9]])
            .admin_panel(self.admin_panel[digits[10]])
            .docker(self.docker[digits[11]])
            .github_actions(self.github_actions[digits[12]])
            .pre_commit(self.pre_commit[digits[13]])
            .python_version(self.python_versions[digits[14]]);
        if let Some(tool) = self.migration_tools[digits[3]] {
            builder = builder.migration_tool(tool);
        }
        if let Some(broker) = self.brokers[digits[7]] {
            builder = builder.broker(broker);
        }
        builder.build()
    }
}

/// One combination that generated with findings or failed to generate.
#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub combination: String,
    pub findings: Vec<Finding>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub total: usize,
    pub tested: usize,
    pub skipped: usize,
    pub failures: Vec<SweepFailure>,
    pub elapsed_ms: u64,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.failures.iter().map(|f| f.findings.len()).sum()
    }
}

enum Outcome {
    Skipped,
    Passed,
    Failed(SweepFailure),
}

pub struct SweepService {
    engine: GenerationService,
    verifier: ImportVerifier,
    jobs: Option<usize>,
}

impl SweepService {
    pub fn new(engine: GenerationService, verifier: ImportVerifier) -> Self {
        Self {
            engine,
            verifier,
            jobs: None,
        }
    }

    /// Run on a dedicated pool of `jobs` threads instead of rayon's global one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Sweep `spec`, calling `progress` once per finished combination.
    #[instrument(skip_all, fields(combinations = spec.combinations()))]
    pub fn run(
        &self,
        spec: &SweepSpec,
        progress: Option<&(dyn Fn() + Sync)>,
    ) -> ApismithResult<SweepReport> {
        spec.validate()?;
        info!("starting sweep");

        let started = Instant::now();
        let outcomes = match self.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| ApplicationError::ThreadPool {
                        reason: e.to_string(),
                    })?;
                pool.install(|| self.run_all(spec, progress))
            }
            None => self.run_all(spec, progress),
        };

        let mut report = SweepReport {
            total: outcomes.len(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            ..SweepReport::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Skipped => report.skipped += 1,
                Outcome::Passed => report.tested += 1,
                Outcome::Failed(failure) => {
                    report.tested += 1;
                    report.failures.push(failure);
                }
            }
        }

        info!(
            tested = report.tested,
            skipped = report.skipped,
            failures = report.failures.len(),
            elapsed_ms = report.elapsed_ms,
            "sweep finished"
        );
        Ok(report)
    }

    fn run_all(&self, spec: &SweepSpec, progress: Option<&(dyn Fn() + Sync)>) -> Vec<Outcome> {
        (0..spec.combinations())
            .into_par_iter()
            .map(|index| {
                let outcome = self.run_one(spec, index);
                if let Some(tick) = progress {
                    tick();
                }
                outcome
            })
            .collect()
    }

    fn run_one(&self, spec: &SweepSpec, index: usize) -> Outcome {
        let Ok(config) = spec.configuration(index) else {
            return Outcome::Skipped;
        };

        match self.engine.generate(&config) {
            Ok(tree) => {
                let report = self.verifier.verify(&tree);
                if report.is_clean() {
                    Outcome::Passed
                } else {
                    warn!(
                        combination = %config.label(),
                        findings = report.findings.len(),
                        "unresolved references"
                    );
                    Outcome::Failed(SweepFailure {
                        combination: config.label(),
                        findings: report.findings,
                        error: None,
                    })
                }
            }
            Err(e) => {
                warn!(combination = %config.label(), error = %e, "generation failed");
                Outcome::Failed(SweepFailure {
                    combination: config.label(),
                    findings: Vec::new(),
                    error: Some(e.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SweepSpec {
        SweepSpec {
            structures: vec![Structure::Flat],
            databases: vec![Database::Postgres, Database::None],
            orms: vec![Orm::SqlAlchemy],
            migration_tools: vec![None],
            auth_methods: vec![AuthMethod::None],
            cache_backends: vec![CacheBackend::None],
            task_queues: vec![TaskQueue::None],
            brokers: vec![None],
            logging: vec![LoggingLibrary::Standard],
            include_examples: vec![true],
            admin_panel: vec![false],
            docker: vec![false],
            github_actions: vec![false],
            pre_commit: vec![false],
            python_versions: vec![PythonVersion::Py312],
        }
    }

    #[test]
    fn combinations_is_product_of_axes() {
        assert_eq!(SweepSpec::default().combinations(), 3 * 4 * 4 * 4 * 4 * 2);
        assert_eq!(small().combinations(), 2);
    }

    #[test]
    fn invalid_combinations_fail_to_build() {
        let spec = small();
        assert!(spec.configuration(0).is_ok());
        // Database::None with an explicit SQLAlchemy ORM.
        assert!(spec.configuration(1).is_err());
    }

    #[test]
    fn last_axis_varies_fastest() {
        let spec = SweepSpec {
            docker: vec![false, true],
            ..small()
        };
        assert!(!spec.configuration(0).unwrap().docker());
        assert!(spec.configuration(1).unwrap().docker());
    }

    #[test]
    fn empty_axis_is_rejected() {
        let spec = SweepSpec {
            orms: vec![],
            ..small()
        };
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("orms"));
    }

    #[test]
    fn exhaustive_covers_every_axis() {
        let spec = SweepSpec::exhaustive();
        assert_eq!(spec.task_queues.len(), TaskQueue::ALL.len());
        assert_eq!(spec.migration_tools.len(), MigrationTool::ALL.len());
        assert_eq!(spec.brokers.len(), Broker::ALL.len());
        assert_eq!(spec.python_versions.len(), PythonVersion::ALL.len());
        assert_eq!(spec.docker.len(), 2);
        assert_eq!(spec.pre_commit.len(), 2);
        assert_eq!(
            spec.combinations(),
            SweepSpec::default().combinations()
                * MigrationTool::ALL.len()
                * TaskQueue::ALL.len()
                * Broker::ALL.len()
                * LoggingLibrary::ALL.len()
                * 2
                * 2
                * 2
                * 2
                * PythonVersion::ALL.len()
        );
    }

    #[test]
    fn explicit_migration_tool_and_broker_reach_the_builder() {
        let spec = SweepSpec {
            migration_tools: vec![None, Some(MigrationTool::None)],
            task_queues: vec![TaskQueue::Celery],
            brokers: vec![Some(Broker::RabbitMq)],
            github_actions: vec![true],
            python_versions: vec![PythonVersion::Py310],
            ..small()
        };
        let inferred = spec.configuration(0).unwrap();
        assert_eq!(inferred.migration_tool(), MigrationTool::Alembic);
        assert_eq!(inferred.broker(), Broker::RabbitMq);
        assert!(inferred.github_actions());
        assert_eq!(inferred.python_version(), PythonVersion::Py310);

        let explicit = spec.configuration(1).unwrap();
        assert_eq!(explicit.migration_tool(), MigrationTool::None);
    }

    #[test]
    fn incompatible_broker_is_skipped() {
        let spec = SweepSpec {
            task_queues: vec![TaskQueue::None],
            brokers: vec![Some(Broker::Redis)],
            ..small()
        };
        assert!(spec.configuration(0).is_err());
    }
}
