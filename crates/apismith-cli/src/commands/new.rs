//! Implementation of the `apismith new` command.
//!
//! Responsibility: turn arguments into a `ProjectConfig`, call the scaffold
//! service and display results. No composition logic lives here.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use apismith_adapters::{LocalFilesystem, catalog::ids, scaffold_service};
use apismith_core::{
    application::ScaffoldOptions,
    domain::{ConsistencyReport, DomainError, ProjectConfig, validate_project_name},
    error::ApismithError,
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    commands::resolve_project,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `apismith new` command.
///
/// 1. Split the argument into project name and output directory
/// 2. Merge defaults, `--from` and flags into a validated configuration
/// 3. Confirm unless `--yes`, `--quiet` or `--dry-run`
/// 4. Preview (`--dry-run`) or scaffold
/// 5. Print next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (project_name, output_dir) = resolve_project_path(&args.name)?;
    let project = resolve_project(Some(&project_name), &args.project, &config)?;
    let project_path = output_dir.join(project.project_name());
    debug!(config = %project.label(), "Configuration resolved");

    if !global.quiet && !args.yes && !args.dry_run {
        show_configuration(&project, &project_path, &output)?;
        if !output.confirm("Continue?")? {
            return Err(CliError::Cancelled);
        }
    }

    if project_path.exists() && !args.force && !args.dry_run {
        return Err(CliError::ProjectExists { path: project_path });
    }

    let service = scaffold_service(Box::new(LocalFilesystem::new()))?;

    if args.dry_run {
        let (tree, report) = service.preview(&project)?;
        output.info(&format!(
            "Dry run: would create {} files at {}",
            tree.len(),
            project_path.display()
        ))?;
        for (path, file) in tree.files() {
            let mode = if file.permissions.executable_flag() { " (executable)" } else { "" };
            output.detail(&format!("  {path}{mode}  {} bytes", file.size()))?;
        }
        report_findings(&report, &output)?;
        return Ok(());
    }

    output.header(&format!("Creating '{}'...", project.project_name()))?;
    info!(path = %project_path.display(), "Scaffold started");

    let outcome = service.scaffold(
        &project,
        &output_dir,
        ScaffoldOptions {
            overwrite: args.force,
            strict: args.strict,
        },
    )?;
    report_findings(&outcome.report, &output)?;

    output.success(&format!(
        "Project '{}' created ({} files)",
        project.project_name(),
        outcome.files_written
    ))?;

    let main = service
        .engine()
        .layout()
        .module_path(ids::MAIN, project.structure())
        .map_err(ApismithError::from)?;
    print_next_steps(&project, &main, &output)?;
    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split `name` into the project name (last component) and the directory
/// the project is created in.
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract a project name".into(),
        })?
        .to_string();

    validate_project_name(&project_name).map_err(|e| match e {
        DomainError::InvalidProjectName { name, reason } => {
            CliError::InvalidProjectName { name, reason }
        }
        other => CliError::Core(ApismithError::from(other)),
    })?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    Ok((project_name, parent))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    project: &ProjectConfig,
    location: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:     {}", project.project_name()))?;
    out.print(&format!("  Structure:   {}", project.structure()))?;
    out.print(&format!(
        "  Database:    {} ({}, migrations: {})",
        project.database(),
        project.orm(),
        project.migration_tool()
    ))?;
    out.print(&format!("  Auth:        {}", project.auth_method()))?;
    out.print(&format!("  Cache:       {}", project.cache_backend()))?;
    out.print(&format!(
        "  Tasks:       {} (broker: {})",
        project.task_queue(),
        project.broker()
    ))?;
    out.print(&format!("  Admin panel: {}", project.admin_panel()))?;
    out.print(&format!("  Examples:    {}", project.include_examples()))?;
    out.print(&format!("  Location:    {}", location.display()))?;
    out.print("")?;
    Ok(())
}

fn report_findings(report: &ConsistencyReport, out: &OutputManager) -> CliResult<()> {
    if report.is_clean() {
        out.success(&format!(
            "{} references across {} files resolve",
            report.references_checked, report.files_checked
        ))?;
        return Ok(());
    }
    out.warning(&format!("{} unresolved reference(s):", report.findings.len()))?;
    for finding in &report.findings {
        out.warning(&format!("  {finding}"))?;
    }
    Ok(())
}

fn print_next_steps(project: &ProjectConfig, main: &str, out: &OutputManager) -> CliResult<()> {
    out.print("")?;
    out.print("Next steps:")?;
    out.print(&format!("  cd {}", project.project_name()))?;
    out.print("  python -m venv .venv && source .venv/bin/activate")?;
    out.print("  pip install -e \".[dev]\"")?;
    out.print("  cp .env.example .env")?;
    out.print(&format!("  uvicorn {main}:app --reload"))?;
    Ok(())
}
