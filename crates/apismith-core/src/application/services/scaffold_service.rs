//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Generate the tree for a configuration
//! 2. Verify its cross-module references
//! 3. Write it to the filesystem, rolling back on failure
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::{GenerationService, ImportVerifier},
    },
    domain::{ConsistencyReport, GeneratedTree, ProjectConfig},
    error::ApismithResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Write into an existing directory, replacing files with the same path.
    /// Files the tree does not contain are left untouched.
    pub overwrite: bool,
    /// Refuse to persist a tree with verifier findings.
    pub strict: bool,
}

/// Result of a successful scaffold.
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub root: PathBuf,
    pub files_written: usize,
    pub report: ConsistencyReport,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    engine: GenerationService,
    verifier: ImportVerifier,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given engine and adapters.
    pub fn new(
        engine: GenerationService,
        verifier: ImportVerifier,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            engine,
            verifier,
            filesystem,
        }
    }

    pub fn engine(&self) -> &GenerationService {
        &self.engine
    }

    /// Generate and verify without touching the filesystem.
    pub fn preview(
        &self,
        config: &ProjectConfig,
    ) -> ApismithResult<(GeneratedTree, ConsistencyReport)> {
        let tree = self.engine.generate(config)?;
        let report = self.verifier.verify(&tree);
        Ok((tree, report))
    }

    /// Scaffold a new project into `output_dir/<project name>`.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            output_dir = %output_dir.as_ref().display()
        )
    )]
    pub fn scaffold(
        &self,
        config: &ProjectConfig,
        output_dir: impl AsRef<Path>,
        options: ScaffoldOptions,
    ) -> ApismithResult<ScaffoldOutcome> {
        info!(structure = %config.structure(), "Scaffolding project");

        let root = output_dir.as_ref().join(config.project_name());
        let (tree, report) = self.preview(config)?;
        info!(files = tree.len(), "Tree generated");

        if !report.is_clean() {
            if options.strict {
                return Err(ApplicationError::VerificationFailed {
                    findings: report.findings,
                }
                .into());
            }
            for finding in &report.findings {
                warn!(%finding, "Unresolved reference");
            }
        }

        let files_written = self.write_tree(&tree, &root, options.overwrite)?;

        info!("Scaffold completed successfully");
        Ok(ScaffoldOutcome {
            root,
            files_written,
            report,
        })
    }

    /// Write `tree` below `root`.
    ///
    /// A directory this call created is removed again if any write fails.
    /// With `overwrite`, files already under `root` that the tree does not
    /// produce are never deleted.
    pub fn write_tree(
        &self,
        tree: &GeneratedTree,
        root: &Path,
        overwrite: bool,
    ) -> ApismithResult<usize> {
        let existed = self.filesystem.exists(root);
        if existed && !overwrite {
            return Err(ApplicationError::ProjectExists {
                path: root.to_path_buf(),
            }
            .into());
        }

        match self.write_all(tree, root) {
            Ok(count) => {
                info!(count, "Successfully wrote all files");
                Ok(count)
            }
            Err(e) => {
                if existed {
                    warn!("Write failed inside an existing directory, leaving it in place");
                } else {
                    warn!("Write failed, attempting rollback");
                    self.rollback(root);
                }
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn write_all(&self, tree: &GeneratedTree, root: &Path) -> ApismithResult<usize> {
        self.filesystem.create_dir_all(root)?;

        let mut count = 0;
        for (relative, file) in tree.files() {
            let path = root.join(relative.as_path());

            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }

            self.filesystem.write_file(&path, &file.content)?;

            if file.permissions.executable_flag() {
                self.filesystem.set_permissions(&path, true)?;
            }
            count += 1;
        }

        Ok(count)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::application::services::test_support::{CallTemplate, TestCatalog};
    use crate::domain::{
        Dependency, DomainError, LayoutEntry, LogicalModule, ModuleId, Permissions,
        RenderContext, always,
    };
    use crate::error::ApismithError;

    const CONFIG: ModuleId = ModuleId::new("app.config");
    const MAIN: ModuleId = ModuleId::new("app.main");
    const PRESTART: ModuleId = ModuleId::new("scripts.prestart");

    static MAIN_DEPS: &[Dependency] = &[Dependency::always(CONFIG)];

    fn settings(_: &RenderContext<'_>) -> Result<String, DomainError> {
        Ok("DEBUG = False\n".into())
    }

    fn main_module(ctx: &RenderContext<'_>) -> Result<String, DomainError> {
        Ok(format!("from {} import DEBUG\n", ctx.import(CONFIG)?))
    }

    fn broken_main(_: &RenderContext<'_>) -> Result<String, DomainError> {
        Ok("from app.missing import thing\n".into())
    }

    fn prestart(_: &RenderContext<'_>) -> Result<String, DomainError> {
        Ok("#!/usr/bin/env bash\n".into())
    }

    fn engine(main_template: crate::domain::TemplateFn) -> GenerationService {
        let modules = vec![
            LogicalModule {
                id: CONFIG,
                description: "settings",
                include: always,
                dependencies: &[],
                template: settings,
                permissions: Permissions::read_write(),
            },
            LogicalModule {
                id: MAIN,
                description: "entrypoint",
                include: always,
                dependencies: MAIN_DEPS,
                template: main_template,
                permissions: Permissions::read_write(),
            },
            LogicalModule {
                id: PRESTART,
                description: "prestart script",
                include: always,
                dependencies: &[],
                template: prestart,
                permissions: Permissions::executable(),
            },
        ];
        let layout = vec![
            LayoutEntry::shared(CONFIG, "app/config.py"),
            LayoutEntry::shared(MAIN, "app/main.py"),
            LayoutEntry::shared(PRESTART, "scripts/prestart.sh"),
        ];
        GenerationService::new(
            Box::new(TestCatalog {
                modules,
                layout,
                skeleton: vec![],
            }),
            Box::new(CallTemplate),
        )
        .unwrap()
    }

    fn service(filesystem: MockFilesystem, main_template: crate::domain::TemplateFn) -> ScaffoldService {
        ScaffoldService::new(
            engine(main_template),
            ImportVerifier::new().unwrap(),
            Box::new(filesystem),
        )
    }

    fn config() -> ProjectConfig {
        ProjectConfig::builder().name("svc").build().unwrap()
    }

    #[test]
    fn writes_every_file_and_marks_scripts_executable() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().times(4).returning(|_, _| Ok(()));
        fs.expect_set_permissions()
            .withf(|path, executable| path.ends_with("scripts/prestart.sh") && *executable)
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = service(fs, main_module)
            .scaffold(&config(), "/work", ScaffoldOptions::default())
            .unwrap();

        assert_eq!(outcome.files_written, 4);
        assert_eq!(outcome.root, PathBuf::from("/work/svc"));
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn failed_write_rolls_back_created_directory() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            if path.ends_with("app/main.py") {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into())
            } else {
                Ok(())
            }
        });
        fs.expect_remove_dir_all()
            .withf(|path| path == Path::new("/work/svc"))
            .times(1)
            .returning(|_| Ok(()));

        let err = service(fs, main_module)
            .scaffold(&config(), "/work", ScaffoldOptions::default())
            .unwrap_err();

        assert!(err.is_retryable());
    }

    #[test]
    fn failed_overwrite_keeps_existing_directory() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "read-only".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all().times(0);

        let options = ScaffoldOptions {
            overwrite: true,
            strict: false,
        };
        assert!(service(fs, main_module).scaffold(&config(), "/work", options).is_err());
    }

    #[test]
    fn existing_project_is_refused() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);

        let err = service(fs, main_module)
            .scaffold(&config(), "/work", ScaffoldOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            ApismithError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn strict_mode_refuses_unresolved_references() {
        // No filesystem expectations: any call would fail the test.
        let fs = MockFilesystem::new();
        let options = ScaffoldOptions {
            overwrite: false,
            strict: true,
        };

        let err = service(fs, broken_main)
            .scaffold(&config(), "/work", options)
            .unwrap_err();

        match err {
            ApismithError::Application(ApplicationError::VerificationFailed { findings }) => {
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].file.as_str(), "app/main.py");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lenient_mode_writes_despite_findings() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_set_permissions().returning(|_, _| Ok(()));

        let outcome = service(fs, broken_main)
            .scaffold(&config(), "/work", ScaffoldOptions::default())
            .unwrap();

        assert_eq!(outcome.report.findings.len(), 1);
    }

    #[test]
    fn preview_does_no_io() {
        let fs = MockFilesystem::new();
        let (tree, report) = service(fs, main_module).preview(&config()).unwrap();
        assert!(tree.contains("app/__init__.py"));
        assert!(report.is_clean());
    }
}
