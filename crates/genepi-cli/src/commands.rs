use anyhow::{Context, Result};
use tracing::info;

use genepi_cli::check::{
    CheckReport, CheckRequest, load_known_ids, load_vocabulary, resolve_locations, run_check,
    template_line,
};

use crate::cli::{CheckArgs, LocationsArgs, ReportFormatArg, TemplateArgs};
use crate::summary::{print_locations, print_report};

/// Run `check` and print its report. Returns the report so the caller can
/// pick an exit code.
pub fn run_check_command(args: &CheckArgs) -> Result<CheckReport> {
    let known = load_known_ids(args.known_file.as_deref(), &args.known_ids)?;
    let vocabulary = load_vocabulary(args.locations.as_deref())?;
    info!(
        known = known.len(),
        locations = vocabulary.len(),
        "starting check"
    );
    let request = CheckRequest {
        file: args.file.clone(),
        workflow: args.workflow.into(),
        known,
        identifier: args.identifier,
        max_samples: args.max_samples,
        today: None,
    };
    let report = run_check(&request, &vocabulary)
        .with_context(|| format!("check {}", args.file.display()))?;
    match args.format {
        ReportFormatArg::Table => print_report(&report),
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{json}");
        }
    }
    Ok(report)
}

pub fn run_template(args: &TemplateArgs) {
    println!("{}", template_line(args.workflow.into(), args.identifier));
}

pub fn run_locations(args: &LocationsArgs) -> Result<()> {
    let vocabulary = load_vocabulary(Some(args.locations.as_path()))?;
    let resolved = resolve_locations(&vocabulary, &args.queries);
    print_locations(&resolved);
    Ok(())
}
