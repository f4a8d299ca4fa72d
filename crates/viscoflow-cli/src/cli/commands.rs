use super::CliError;
use super::helpers::*;
use anyhow::Context;
use std::path::{Path, PathBuf};
use viscoflow_core::config::ConsoleConfig;
use viscoflow_core::domain::{ParameterRecord, ResultSeries};
use viscoflow_core::modules::display::{render_sampled_table, render_summary};
use viscoflow_core::modules::solver::{SIMULATION_FAILED_MESSAGE, decode_response};
use viscoflow_core::modules::{SimulationInvoker, SimulationSession, sample};

#[derive(clap::Args)]
pub(super) struct ParameterArgs {
    /// Parameter record (JSON, wire field names); missing fields keep defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// Catalog material applied on top of the parameter record
    #[arg(long)]
    material: Option<String>,

    /// Material catalog file, overriding the configured source
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Field override as FIELD=VALUE (wire name; `,` or `.` separator)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    overrides: Vec<String>,

    /// Display sampling interval in metres (`,` or `.` separator)
    #[arg(long)]
    interval: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct ReportArgs {
    /// Spreadsheet report path (defaults to export.fileName from config)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write one CSV file per sheet into this directory
    #[arg(long)]
    csv_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SimulateArgs {
    #[command(flatten)]
    params: ParameterArgs,

    /// Replay a recorded solver response instead of calling the solver
    #[arg(long)]
    response_file: Option<PathBuf>,

    /// Solver base URL, overriding solver.baseUrl from config
    #[arg(long)]
    solver_url: Option<String>,

    /// Skip writing the report
    #[arg(long)]
    no_report: bool,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(clap::Args)]
pub(super) struct SampleArgs {
    /// Recorded solver response (JSON)
    #[arg(long)]
    response_file: PathBuf,

    /// Display sampling interval in metres (`,` or `.` separator)
    #[arg(long, default_value = "0.1")]
    interval: String,
}

#[derive(clap::Args)]
pub(super) struct ExportArgs {
    #[command(flatten)]
    params: ParameterArgs,

    /// Recorded solver response (JSON)
    #[arg(long)]
    response_file: PathBuf,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(clap::Args)]
pub(super) struct MaterialsArgs {
    /// Material catalog file, overriding the configured source
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct ApplyMaterialArgs {
    /// Catalog material id
    #[arg(value_name = "MATERIAL_ID")]
    material_id: String,

    /// Base parameter record (JSON); defaults are used when omitted
    #[arg(long)]
    params: Option<PathBuf>,

    /// Material catalog file, overriding the configured source
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Write the resulting record here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub(super) fn run_simulate_command(
    config: &ConsoleConfig,
    args: SimulateArgs,
) -> Result<i32, CliError> {
    let params = resolve_parameters(config, &args.params)?;
    let transport = solver_transport(
        &config.solver,
        args.response_file.as_deref(),
        args.solver_url.as_deref(),
    );
    let invoker = SimulationInvoker::new(transport, config.solver.require_flow_profiles);
    let mut session = SimulationSession::new(params);

    let outcome = session.run(&invoker).map(ResultSeries::clone);
    let series = match outcome {
        Ok(series) => series,
        Err(error) => {
            eprintln!(
                "{}",
                session.last_error().unwrap_or(SIMULATION_FAILED_MESSAGE)
            );
            return Err(error.into());
        }
    };

    let rows = sample(&series, params.display_step);
    println!("{}", render_summary(series.metrics()));
    println!();
    println!("{}", render_sampled_table(&rows));

    if !args.no_report {
        let out = report_path(config, &args.report);
        let written = write_report(
            &params,
            &rows,
            series.metrics(),
            &out,
            args.report.csv_dir.as_deref(),
        )?;
        print_written(&written);
    }
    Ok(0)
}

pub(super) fn run_sample_command(config: &ConsoleConfig, args: SampleArgs) -> Result<i32, CliError> {
    let body = read_text(&args.response_file, "solver response")?;
    let series = decode_response(&body, config.solver.require_flow_profiles)?;
    let rows = sample(&series, parse_interval(&args.interval)?);
    println!("{}", render_sampled_table(&rows));
    Ok(0)
}

pub(super) fn run_export_command(config: &ConsoleConfig, args: ExportArgs) -> Result<i32, CliError> {
    let params = resolve_parameters(config, &args.params)?;
    let transport = solver_transport(&config.solver, Some(args.response_file.as_path()), None);
    let series = SimulationInvoker::new(transport, config.solver.require_flow_profiles)
        .invoke(&params)?;

    let rows = sample(&series, params.display_step);
    let out = report_path(config, &args.report);
    let written = write_report(
        &params,
        &rows,
        series.metrics(),
        &out,
        args.report.csv_dir.as_deref(),
    )?;
    print_written(&written);
    Ok(0)
}

pub(super) fn run_materials_command(
    config: &ConsoleConfig,
    args: MaterialsArgs,
) -> Result<i32, CliError> {
    let source = material_source(config, args.catalog.as_deref())?;
    let materials = source.list_materials()?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&materials).context("failed to render catalog")?;
        println!("{}", rendered);
        return Ok(0);
    }

    for material in &materials {
        println!(
            "{}\t{}\t{}\t{} properties\t{} coefficients",
            material.id,
            material.name,
            material.material_type,
            material.property_values.len(),
            material.coefficient_values.len()
        );
    }
    Ok(0)
}

pub(super) fn run_apply_material_command(
    config: &ConsoleConfig,
    args: ApplyMaterialArgs,
) -> Result<i32, CliError> {
    let base = match &args.params {
        Some(path) => read_parameter_file(path)?,
        None => ParameterRecord::default(),
    };
    let source = material_source(config, args.catalog.as_deref())?;
    let material = find_material(source.as_ref(), &args.material_id)?;
    let record = apply_catalog_material(&material, &base);

    let rendered =
        serde_json::to_string_pretty(&record).context("failed to render parameter record")?;
    match &args.out {
        Some(path) => {
            write_text(path, &rendered)?;
            println!("Parameters: {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(0)
}

fn resolve_parameters(
    config: &ConsoleConfig,
    args: &ParameterArgs,
) -> Result<ParameterRecord, CliError> {
    let mut record = match &args.params {
        Some(path) => read_parameter_file(path)?,
        None => ParameterRecord::default(),
    };
    if let Some(material_id) = &args.material {
        let source = material_source(config, args.catalog.as_deref())?;
        let material = find_material(source.as_ref(), material_id)?;
        record = apply_catalog_material(&material, &record);
    }
    apply_overrides(&record, &args.overrides, args.interval.as_deref())
}

fn report_path(config: &ConsoleConfig, args: &ReportArgs) -> PathBuf {
    args.out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.file_name))
}

fn write_text(path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("Report: {}", path.display());
    }
}
