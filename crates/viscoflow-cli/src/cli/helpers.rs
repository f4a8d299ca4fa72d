use super::CliError;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use viscoflow_core::config::{CatalogConfig, ConsoleConfig, SolverConfig};
use viscoflow_core::domain::{
    ConsoleError, Material, ParameterField, ParameterRecord, SampledRow, SolverMetrics,
};
use viscoflow_core::modules::{
    Credentials, EditState, HttpSolverTransport, MaterialParameterMapper, MaterialSource,
    ParameterForm, RecordedSolverTransport, SolverTransport, accept, catalog_from_config, export,
    finalize, write_csv_bundle, write_xlsx,
};

/// Installs the stderr subscriber; returns `false` when one is already set.
pub(super) fn init_tracing(verbose: bool) -> bool {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        Ok(()) => true,
        Err(error) => {
            debug!(%error, "tracing subscriber already installed");
            false
        }
    }
}

pub(super) fn load_config(path: Option<&Path>) -> Result<ConsoleConfig, CliError> {
    ConsoleConfig::load_or_default(path)
        .map_err(|error| CliError::Console(ConsoleError::from(error)))
}

pub(super) fn read_text(path: &Path, what: &str) -> Result<String, CliError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {} '{}'", what, path.display()))?;
    Ok(content)
}

pub(super) fn read_parameter_file(path: &Path) -> Result<ParameterRecord, CliError> {
    let content = read_text(path, "parameter file")?;
    serde_json::from_str(&content).map_err(|source| {
        CliError::Console(ConsoleError::input_validation(
            "INPUT.PARAMETER_FILE",
            format!("failed to parse parameter file '{}': {}", path.display(), source),
        ))
    })
}

/// Applies `FIELD=VALUE` overrides and the display interval through the same
/// edit rules as typed input.
pub(super) fn apply_overrides(
    record: &ParameterRecord,
    overrides: &[String],
    interval: Option<&str>,
) -> Result<ParameterRecord, CliError> {
    let mut form = ParameterForm::from_record(record);
    for entry in overrides {
        let Some((name, raw)) = entry.split_once('=') else {
            return Err(CliError::Usage(format!(
                "invalid override '{}'; expected FIELD=VALUE",
                entry
            )));
        };
        let field = ParameterField::from_wire_name(name.trim()).ok_or_else(|| {
            CliError::Usage(format!(
                "unknown parameter '{}'; expected one of: {}",
                name,
                field_names()
            ))
        })?;
        edit_field(&mut form, field, raw)?;
    }
    if let Some(raw) = interval {
        edit_field(&mut form, ParameterField::DisplayStep, raw)?;
    }
    Ok(form.resolve()?)
}

fn edit_field(form: &mut ParameterForm, field: ParameterField, raw: &str) -> Result<(), CliError> {
    if form.edit(field, raw.trim()) == EditState::Rejected {
        return Err(rejected_number(raw, field));
    }
    Ok(())
}

/// Reads a standalone `--interval` value; `,` and `.` are both separators.
pub(super) fn parse_interval(raw: &str) -> Result<f64, CliError> {
    if !accept(raw.trim()).is_accepted() {
        return Err(rejected_number(raw, ParameterField::DisplayStep));
    }
    Ok(finalize(raw)?)
}

fn rejected_number(raw: &str, field: ParameterField) -> CliError {
    CliError::Console(ConsoleError::input_validation(
        "INPUT.PARAMETER_OVERRIDE",
        format!("'{}' is not a number for '{}'", raw, field.label()),
    ))
}

fn field_names() -> String {
    ParameterField::ALL
        .iter()
        .map(|field| field.wire_name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn credentials(config: &SolverConfig) -> Credentials {
    Credentials {
        bearer_token: config.auth_token.clone(),
    }
}

pub(super) fn material_source(
    config: &ConsoleConfig,
    catalog_override: Option<&Path>,
) -> Result<Box<dyn MaterialSource>, CliError> {
    let catalog = match catalog_override {
        Some(path) => CatalogConfig {
            path: Some(path.to_path_buf()),
            ..config.catalog.clone()
        },
        None => config.catalog.clone(),
    };
    Ok(catalog_from_config(
        &catalog,
        Duration::from_secs(config.solver.timeout_secs),
        credentials(&config.solver),
    )?)
}

pub(super) fn find_material(
    source: &dyn MaterialSource,
    material_id: &str,
) -> Result<Material, CliError> {
    source.material(material_id)?.ok_or_else(|| {
        CliError::Console(ConsoleError::input_validation(
            "INPUT.MATERIAL_NOT_FOUND",
            format!("material '{}' is not in the catalog", material_id),
        ))
    })
}

pub(super) fn apply_catalog_material(
    material: &Material,
    base: &ParameterRecord,
) -> ParameterRecord {
    let outcome = MaterialParameterMapper::default().apply_with_outcome(material, base);
    info!(
        material = %material.id,
        applied = outcome.applied.len(),
        "applied catalog material"
    );
    outcome.record
}

pub(super) fn solver_transport(
    config: &SolverConfig,
    response_file: Option<&Path>,
    solver_url: Option<&str>,
) -> Box<dyn SolverTransport> {
    if let Some(path) = response_file {
        return Box::new(RecordedSolverTransport::new(path));
    }
    match solver_url {
        Some(base_url) => Box::new(HttpSolverTransport::from_config(&SolverConfig {
            base_url: base_url.to_string(),
            ..config.clone()
        })),
        None => Box::new(HttpSolverTransport::from_config(config)),
    }
}

pub(super) fn write_report(
    params: &ParameterRecord,
    rows: &[SampledRow],
    metrics: &SolverMetrics,
    out: &Path,
    csv_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, CliError> {
    let document = export(params, rows, metrics);
    write_xlsx(&document, out).map_err(|error| CliError::Console(error.into()))?;

    let mut written = vec![out.to_path_buf()];
    if let Some(dir) = csv_dir {
        let csv_files =
            write_csv_bundle(&document, dir).map_err(|error| CliError::Console(error.into()))?;
        written.extend(csv_files);
    }
    Ok(written)
}
