//! `apismith modules`: show which catalog modules a configuration selects
//! and where they land.

use serde::Serialize;
use tracing::instrument;

use apismith_adapters::generation_service;
use apismith_core::application::ModulePlan;

use crate::{
    cli::{GlobalArgs, ListFormat, ModulesArgs},
    commands::resolve_project,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct ModuleRow {
    id: String,
    description: &'static str,
    included: bool,
    path: String,
    dependencies: Vec<String>,
}

impl From<ModulePlan> for ModuleRow {
    fn from(plan: ModulePlan) -> Self {
        Self {
            id: plan.id.to_string(),
            description: plan.description,
            included: plan.included,
            path: plan.path.to_string(),
            dependencies: plan.dependencies.iter().map(ToString::to_string).collect(),
        }
    }
}

#[instrument(skip_all)]
pub fn execute(
    args: ModulesArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = resolve_project(None, &args.project, &config)?;
    let rows = select_rows(generation_service()?.plan(&project)?, args.all);

    match args.format {
        ListFormat::Json => output.json("module list", &rows)?,
        ListFormat::Table => {
            output.header(&format!("Modules for {}", project.label()))?;
            print_table(&rows, args.all, &output)?;
        }
    }
    Ok(())
}

fn select_rows(plan: Vec<ModulePlan>, all: bool) -> Vec<ModuleRow> {
    plan.into_iter()
        .filter(|p| all || p.included)
        .map(ModuleRow::from)
        .collect()
}

fn print_table(rows: &[ModuleRow], all: bool, out: &OutputManager) -> CliResult<()> {
    let id_width = rows.iter().map(|r| r.id.len()).max().unwrap_or(2).max(2);
    let path_width = rows.iter().map(|r| r.path.len()).max().unwrap_or(4).max(4);

    out.print(&format!(
        "  {:id_width$}  {:path_width$}  DESCRIPTION",
        "ID", "PATH"
    ))?;
    for row in rows {
        out.print(&format!(
            "{}{:id_width$}  {:path_width$}  {}",
            match (all, row.included) {
                (true, false) => "- ",
                (true, true) => "+ ",
                (false, _) => "  ",
            },
            row.id,
            row.path,
            row.description
        ))?;
    }
    out.print("")?;
    let included = rows.iter().filter(|r| r.included).count();
    out.info(&format!("{included} of {} modules selected", rows.len()))?;
    Ok(())
}
