//! End-to-end generation scenarios against the built-in catalog.

use apismith_adapters::{
    DiskTreeLoader, LocalFilesystem, catalog::ids, generation_service, scaffold_service,
    sweep_service,
};
use apismith_core::{
    application::{ImportVerifier, ScaffoldOptions, SweepSpec},
    domain::{
        AuthMethod, Broker, CacheBackend, Database, DomainError, ErrorCategory, GeneratedTree,
        MigrationTool, Orm, ProjectConfig, Structure, TaskQueue,
    },
};
use tempfile::TempDir;

fn generate(config: &ProjectConfig) -> GeneratedTree {
    generation_service().unwrap().generate(config).unwrap()
}

fn assert_clean(tree: &GeneratedTree) {
    let report = ImportVerifier::new().unwrap().verify(tree);
    assert!(report.is_clean(), "{:#?}", report.findings);
}

#[test]
fn flat_project_without_auth_has_no_security_references() {
    let config = ProjectConfig::builder()
        .name("flat-api")
        .structure(Structure::Flat)
        .auth_method(AuthMethod::None)
        .build()
        .unwrap();
    let tree = generate(&config);

    assert!(!tree.contains("app/security.py"));
    for (path, file) in tree.files() {
        assert!(
            !file.content.contains("import get_current_user")
                && !file.content.contains("app.security"),
            "{path} references the security module"
        );
        if path.as_str().contains("routes") {
            assert!(
                !file.content.contains("CurrentUser"),
                "{path} requires a current user"
            );
        }
    }
    assert_clean(&tree);
}

#[test]
fn domain_driven_admin_imports_user_from_the_users_domain() {
    let config = ProjectConfig::builder()
        .name("shop-api")
        .structure(Structure::DomainDriven)
        .orm(Orm::SqlAlchemy)
        .include_examples(true)
        .admin_panel(true)
        .build()
        .unwrap();
    let tree = generate(&config);

    assert_eq!(
        tree.path_of(ids::USER_MODEL).map(|p| p.as_str()),
        Some("app/domains/users/models/user.py")
    );
    let admin = tree.path_of(ids::ADMIN).unwrap();
    let views = &tree.get(admin.as_str()).unwrap().content;
    assert!(views.contains("from app.domains.users.models.user import User"));
    assert_clean(&tree);
}

#[test]
fn tortoise_admin_is_rejected_before_generation() {
    let err = ProjectConfig::builder()
        .name("shop-api")
        .orm(Orm::Tortoise)
        .admin_panel(true)
        .build()
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Compatibility);
    assert!(matches!(err, DomainError::IncompatibleOptions { .. }));
}

#[test]
fn layered_and_flat_select_the_same_modules_at_different_paths() {
    let build = |structure| {
        ProjectConfig::builder()
            .name("orders")
            .structure(structure)
            .auth_method(AuthMethod::Jwt)
            .cache_backend(CacheBackend::Redis)
            .build()
            .unwrap()
    };
    let (layered, flat) = (build(Structure::Layered), build(Structure::Flat));
    let engine = generation_service().unwrap();

    assert_eq!(engine.included(&layered), engine.included(&flat));

    let layered_tree = engine.generate(&layered).unwrap();
    let flat_tree = engine.generate(&flat).unwrap();
    assert_ne!(
        layered_tree.path_of(ids::SECURITY),
        flat_tree.path_of(ids::SECURITY)
    );

    let layered_deps = &layered_tree.get("app/api/deps.py").unwrap().content;
    let flat_deps = &flat_tree.get("app/deps.py").unwrap().content;
    assert!(layered_deps.contains("from app.core.security import"));
    assert!(flat_deps.contains("from app.security import"));

    assert_clean(&layered_tree);
    assert_clean(&flat_tree);
}

#[test]
fn default_sweep_has_no_unresolved_imports() {
    let report = sweep_service().unwrap().run(&SweepSpec::default(), None).unwrap();

    assert_eq!(report.total, SweepSpec::default().combinations());
    assert!(report.tested > 0);
    assert!(
        report.is_success(),
        "{} failing combinations, first: {:#?}",
        report.failures.len(),
        report.failures.first()
    );
}

#[test]
#[ignore = "covers every option on every axis; run with --ignored"]
fn exhaustive_sweep_has_no_unresolved_imports() {
    let report = sweep_service()
        .unwrap()
        .run(&SweepSpec::exhaustive(), None)
        .unwrap();
    assert!(report.is_success(), "{:#?}", report.failures.first());
}

#[test]
fn task_queue_projects_wire_worker_and_jobs() {
    for queue in [TaskQueue::Celery, TaskQueue::Arq, TaskQueue::Dramatiq] {
        let config = ProjectConfig::builder()
            .name("jobs-api")
            .task_queue(queue)
            .docker(true)
            .build()
            .unwrap();
        let tree = generate(&config);

        assert!(tree.path_of(ids::WORKER).is_some(), "{queue}: no worker");
        assert!(tree.path_of(ids::TASK_ROUTES).is_some(), "{queue}: no routes");
        assert!(tree.get("docker-compose.yml").unwrap().content.contains("worker:"));
        assert_clean(&tree);
    }
}

#[test]
fn sql_project_without_migrations_has_no_alembic_tree() {
    for structure in Structure::ALL {
        let config = ProjectConfig::builder()
            .name("plain-api")
            .structure(*structure)
            .orm(Orm::SqlModel)
            .migration_tool(MigrationTool::None)
            .build()
            .unwrap();
        let tree = generate(&config);

        assert!(tree.path_of(ids::MIGRATIONS_ENV).is_none(), "{structure}");
        assert!(!tree.contains("alembic.ini"), "{structure}");
        assert_clean(&tree);
    }
}

#[test]
fn rabbitmq_queues_verify_clean() {
    for queue in [TaskQueue::Celery, TaskQueue::Dramatiq] {
        let config = ProjectConfig::builder()
            .name("amqp-api")
            .task_queue(queue)
            .broker(Broker::RabbitMq)
            .docker(true)
            .build()
            .unwrap();
        let tree = generate(&config);

        assert!(tree.get("docker-compose.yml").unwrap().content.contains("rabbitmq:"));
        assert_clean(&tree);
    }
}

#[test]
fn pinned_migration_and_broker_sweep_is_clean() {
    let spec = SweepSpec {
        migration_tools: vec![Some(MigrationTool::None)],
        task_queues: vec![TaskQueue::Celery, TaskQueue::Dramatiq],
        brokers: vec![Some(Broker::RabbitMq)],
        include_examples: vec![true],
        ..SweepSpec::default()
    };
    let report = sweep_service().unwrap().run(&spec, None).unwrap();

    assert!(report.tested > 0);
    assert!(report.is_success(), "{:#?}", report.failures.first());
}

#[test]
fn overwrite_keeps_files_from_an_earlier_configuration() {
    let out = TempDir::new().unwrap();
    let service = scaffold_service(Box::new(LocalFilesystem::new())).unwrap();
    let with_queue = ProjectConfig::builder()
        .name("redo-api")
        .task_queue(TaskQueue::Celery)
        .build()
        .unwrap();
    let first = service
        .scaffold(&with_queue, out.path(), ScaffoldOptions::default())
        .unwrap();
    let worker = generate(&with_queue).path_of(ids::WORKER).unwrap().clone();

    let without_queue = ProjectConfig::builder().name("redo-api").build().unwrap();
    let second = service
        .scaffold(
            &without_queue,
            out.path(),
            ScaffoldOptions {
                overwrite: true,
                strict: false,
            },
        )
        .unwrap();

    assert_eq!(second.files_written, generate(&without_queue).len());
    assert!(first.root.join(worker.as_path()).is_file());
}

#[test]
fn scaffolded_project_reloads_and_verifies_from_disk() {
    let out = TempDir::new().unwrap();
    let config = ProjectConfig::builder()
        .name("disk-api")
        .database(Database::Sqlite)
        .auth_method(AuthMethod::Session)
        .build()
        .unwrap();

    let outcome = scaffold_service(Box::new(LocalFilesystem::new()))
        .unwrap()
        .scaffold(&config, out.path(), ScaffoldOptions::default())
        .unwrap();
    assert!(outcome.report.is_clean());

    let reloaded = DiskTreeLoader::new(&outcome.root).load().unwrap();
    assert_eq!(reloaded.len(), generate(&config).len());
    assert_clean(&reloaded);
}
