//! Property tests over arbitrary valid configurations, run against the
//! built-in catalog.

use std::collections::BTreeSet;

use apismith_adapters::{catalog::ids, generation_service};
use apismith_core::{
    application::{GenerationService, ImportVerifier},
    domain::{
        AuthMethod, Broker, CacheBackend, Database, LoggingLibrary, MigrationTool, Orm,
        ProjectConfig, Structure, TaskQueue,
    },
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Choices {
    database: Database,
    orm: Option<Orm>,
    migrations: Option<MigrationTool>,
    auth: AuthMethod,
    admin: bool,
    cache: CacheBackend,
    queue: TaskQueue,
    broker: Option<Broker>,
    logging: LoggingLibrary,
    examples: bool,
    tooling: (bool, bool, bool),
}

fn choices() -> impl Strategy<Value = Choices> {
    (
        (
            prop::sample::select(Database::ALL),
            prop::option::of(prop::sample::select(Orm::ALL)),
            prop::option::of(prop::sample::select(MigrationTool::ALL)),
            prop::sample::select(AuthMethod::ALL),
            any::<bool>(),
            prop::sample::select(CacheBackend::ALL),
        ),
        (
            prop::sample::select(TaskQueue::ALL),
            prop::option::of(prop::sample::select(Broker::ALL)),
            prop::sample::select(LoggingLibrary::ALL),
            any::<bool>(),
            any::<(bool, bool, bool)>(),
        ),
    )
        .prop_map(
            |(
                (database, orm, migrations, auth, admin, cache),
                (queue, broker, logging, examples, tooling),
            )| {
                Choices {
                    database,
                    orm,
                    migrations,
                    auth,
                    admin,
                    cache,
                    queue,
                    broker,
                    logging,
                    examples,
                    tooling,
                }
            },
        )
}

fn build(c: &Choices, structure: Structure) -> Option<ProjectConfig> {
    let (docker, github_actions, pre_commit) = c.tooling;
    let mut builder = ProjectConfig::builder()
        .name("prop-api")
        .structure(structure)
        .database(c.database)
        .auth_method(c.auth)
        .admin_panel(c.admin)
        .cache_backend(c.cache)
        .task_queue(c.queue)
        .logging(c.logging)
        .include_examples(c.examples)
        .docker(docker)
        .github_actions(github_actions)
        .pre_commit(pre_commit);
    if let Some(orm) = c.orm {
        builder = builder.orm(orm);
    }
    if let Some(tool) = c.migrations {
        builder = builder.migration_tool(tool);
    }
    if let Some(broker) = c.broker {
        builder = builder.broker(broker);
    }
    builder.build().ok()
}

fn engine() -> GenerationService {
    generation_service().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    /// Every active dependency of an included module is itself included.
    #[test]
    fn selection_is_closed(c in choices(), structure in prop::sample::select(Structure::ALL)) {
        let Some(config) = build(&c, structure) else { return Ok(()) };
        let plan = engine().plan(&config).unwrap();
        let included: BTreeSet<_> = plan.iter().filter(|p| p.included).map(|p| p.id).collect();

        for module in plan.iter().filter(|p| p.included) {
            for dep in &module.dependencies {
                prop_assert!(
                    included.contains(dep),
                    "{} depends on {} which is not included", module.id, dep
                );
            }
        }
    }

    /// Generated trees never reference a module that is absent from the tree.
    #[test]
    fn generated_trees_verify_clean(c in choices(), structure in prop::sample::select(Structure::ALL)) {
        let Some(config) = build(&c, structure) else { return Ok(()) };
        let tree = engine().generate(&config).unwrap();
        let report = ImportVerifier::new().unwrap().verify(&tree);

        prop_assert!(report.is_clean(), "{}: {:#?}", config.label(), report.findings);
    }

    /// Each included module lands on its own path.
    #[test]
    fn module_paths_are_unique(c in choices(), structure in prop::sample::select(Structure::ALL)) {
        let Some(config) = build(&c, structure) else { return Ok(()) };
        let engine = engine();
        let included = engine.included(&config);
        let tree = engine.generate(&config).unwrap();

        let paths: BTreeSet<_> = included
            .iter()
            .map(|id| tree.path_of(*id).map(|p| p.as_str().to_string()))
            .collect::<Option<_>>()
            .unwrap();
        prop_assert_eq!(paths.len(), included.len());
    }

    /// The structure moves files around but never changes what is selected.
    #[test]
    fn selection_ignores_structure(c in choices()) {
        let engine = engine();
        let selections: Vec<_> = Structure::ALL
            .iter()
            .filter_map(|s| build(&c, *s))
            .map(|config| engine.included(&config))
            .collect();
        let Some((first, rest)) = selections.split_first() else { return Ok(()) };

        for selection in rest {
            prop_assert_eq!(selection, first);
        }
    }

    /// Generating the same configuration twice gives byte-identical trees.
    #[test]
    fn generation_is_deterministic(c in choices(), structure in prop::sample::select(Structure::ALL)) {
        let Some(config) = build(&c, structure) else { return Ok(()) };
        let engine = engine();
        prop_assert_eq!(engine.generate(&config).unwrap(), engine.generate(&config).unwrap());
    }
}

#[test]
fn main_module_is_always_selected() {
    for structure in Structure::ALL {
        let config = ProjectConfig::builder()
            .name("svc")
            .structure(*structure)
            .database(Database::None)
            .include_examples(false)
            .build()
            .unwrap();
        assert!(engine().included(&config).contains(&ids::MAIN));
    }
}
