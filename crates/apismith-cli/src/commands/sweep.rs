//! `apismith sweep`: generate and verify every combination of a
//! configuration space.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use apismith_adapters::sweep_service;
use apismith_core::application::{SweepReport, SweepSpec};

use crate::{
    cli::{GlobalArgs, ReportFormat, SweepArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON envelope around a sweep report.
#[derive(Debug, Serialize)]
struct SweepRun<'a> {
    run_id: Uuid,
    finished_at: DateTime<Utc>,
    combinations: usize,
    spec: &'a SweepSpec,
    #[serde(flatten)]
    report: &'a SweepReport,
}

#[instrument(skip_all)]
pub fn execute(
    args: SweepArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let spec = build_spec(&args);
    let combinations = spec.combinations();
    let run_id = Uuid::new_v4();
    info!(%run_id, combinations, "sweep requested");

    let mut service = sweep_service()?;
    if let Some(jobs) = jobs(&args, &config) {
        service = service.with_jobs(jobs);
    }

    let json = args.format == ReportFormat::Json;
    if !json {
        output.header(&format!("Sweeping {combinations} combinations"))?;
    }

    let bar = output.progress_bar(combinations, !args.no_progress && !json);
    let tick: &(dyn Fn() + Sync) = &|| bar.inc(1);
    let report = service.run(&spec, Some(tick))?;
    bar.finish_and_clear();

    if json {
        output.json(
            "sweep report",
            &SweepRun {
                run_id,
                finished_at: Utc::now(),
                combinations,
                spec: &spec,
                report: &report,
            },
        )?;
    } else {
        print_report(&report, &output)?;
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::SweepFailed {
            failures: report.failures.len(),
            tested: report.tested,
        })
    }
}

/// Start from the default (or exhaustive) space and replace every axis the
/// user listed explicitly.
fn build_spec(args: &SweepArgs) -> SweepSpec {
    fn axis<T: Clone>(target: &mut Vec<T>, given: &[T]) {
        if !given.is_empty() {
            *target = given.to_vec();
        }
    }

    let mut spec = if args.exhaustive {
        SweepSpec::exhaustive()
    } else {
        SweepSpec::default()
    };
    axis(&mut spec.structures, &args.structures);
    axis(&mut spec.databases, &args.databases);
    axis(&mut spec.orms, &args.orms);
    axis(&mut spec.migration_tools, &pinned(&args.migration_tools));
    axis(&mut spec.auth_methods, &args.auth_methods);
    axis(&mut spec.cache_backends, &args.cache_backends);
    axis(&mut spec.task_queues, &args.task_queues);
    axis(&mut spec.brokers, &pinned(&args.brokers));
    axis(&mut spec.logging, &args.logging);
    axis(&mut spec.include_examples, &args.include_examples);
    axis(&mut spec.admin_panel, &args.admin_panel);
    axis(&mut spec.docker, &args.docker);
    axis(&mut spec.github_actions, &args.github_actions);
    axis(&mut spec.pre_commit, &args.pre_commit);
    axis(&mut spec.python_versions, &args.python_versions);
    spec
}

fn pinned<T: Copy>(values: &[T]) -> Vec<Option<T>> {
    values.iter().copied().map(Some).collect()
}

/// `--jobs` wins; a configured value of zero means one worker per CPU.
fn jobs(args: &SweepArgs, config: &AppConfig) -> Option<usize> {
    args.jobs
        .or((config.sweep.jobs > 0).then_some(config.sweep.jobs))
        .filter(|n| *n > 0)
}

fn print_report(report: &SweepReport, out: &OutputManager) -> CliResult<()> {
    for failure in &report.failures {
        out.error(&failure.combination)?;
        if let Some(error) = &failure.error {
            out.detail(&format!("    {error}"))?;
        }
        for finding in &failure.findings {
            out.detail(&format!("    {finding}"))?;
        }
    }

    let summary = format!(
        "{} tested, {} skipped as incompatible, {} failed in {} ms",
        report.tested,
        report.skipped,
        report.failures.len(),
        report.elapsed_ms
    );
    if report.is_success() {
        out.success(&summary)?;
    } else {
        out.warning(&summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use apismith_core::domain::{Broker, Database, MigrationTool, Structure, TaskQueue};
    use clap::Parser;

    fn sweep_args(argv: &[&str]) -> SweepArgs {
        let mut full = vec!["apismith", "sweep"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Sweep(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn listed_axes_override_defaults() {
        let spec = build_spec(&sweep_args(&["--structures", "flat", "--databases", "sqlite,none"]));
        assert_eq!(spec.structures, vec![Structure::Flat]);
        assert_eq!(spec.databases, vec![Database::Sqlite, Database::None]);
        assert_eq!(spec.orms, SweepSpec::default().orms);
    }

    #[test]
    fn exhaustive_covers_task_queues() {
        let spec = build_spec(&sweep_args(&["--exhaustive"]));
        assert_eq!(spec.task_queues, TaskQueue::ALL.to_vec());
        assert!(spec.combinations() > SweepSpec::default().combinations());
    }

    #[test]
    fn listed_migrations_and_brokers_are_pinned() {
        let spec = build_spec(&sweep_args(&[
            "--migrations", "none", "--task-queues", "celery,dramatiq", "--brokers", "rabbitmq",
        ]));
        assert_eq!(spec.migration_tools, vec![Some(MigrationTool::None)]);
        assert_eq!(spec.brokers, vec![Some(Broker::RabbitMq)]);
        assert_eq!(spec.python_versions, SweepSpec::default().python_versions);

        let defaults = build_spec(&sweep_args(&[]));
        assert_eq!(defaults.migration_tools, vec![None]);
        assert_eq!(defaults.brokers, vec![None]);
    }

    #[test]
    fn jobs_prefer_flag_then_config() {
        let mut config = AppConfig::default();
        assert_eq!(jobs(&sweep_args(&[]), &config), None);

        config.sweep.jobs = 3;
        assert_eq!(jobs(&sweep_args(&[]), &config), Some(3));
        assert_eq!(jobs(&sweep_args(&["-j", "2"]), &config), Some(2));
    }
}
