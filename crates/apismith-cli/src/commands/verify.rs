//! `apismith verify`: check that every internal import in a project
//! resolves to a generated module.

use tracing::{info, instrument};

use apismith_adapters::{DiskTreeLoader, generation_service};
use apismith_core::{
    application::ImportVerifier,
    domain::{ConsistencyReport, GeneratedTree},
};

use crate::{
    cli::{GlobalArgs, ReportFormat, VerifyArgs},
    commands::resolve_project,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Verify a project on disk (`--dir`) or a freshly generated one.
#[instrument(skip_all)]
pub fn execute(
    args: VerifyArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (tree, source) = match &args.dir {
        Some(dir) => (DiskTreeLoader::new(dir).load()?, dir.display().to_string()),
        None => {
            let project = resolve_project(None, &args.project, &config)?;
            let tree = generation_service()?.generate(&project)?;
            (tree, project.label())
        }
    };

    let report = ImportVerifier::new()?.verify(&tree);
    info!(
        files = report.files_checked,
        references = report.references_checked,
        findings = report.findings.len(),
        "verification finished"
    );

    match args.format {
        ReportFormat::Json => output.json("verification report", &report)?,
        ReportFormat::Human => print_report(&source, &tree, &report, &output)?,
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::UnresolvedImports {
            findings: report.findings.len(),
        })
    }
}

fn print_report(
    source: &str,
    tree: &GeneratedTree,
    report: &ConsistencyReport,
    out: &OutputManager,
) -> CliResult<()> {
    out.header(&format!("Verifying {source}"))?;
    out.detail(&format!(
        "{} files, {} Python files, {} internal references",
        tree.len(),
        report.files_checked,
        report.references_checked
    ))?;

    if report.is_clean() {
        out.success("All internal imports resolve")?;
        return Ok(());
    }
    for finding in &report.findings {
        out.error(&finding.to_string())?;
    }
    Ok(())
}
