//! Two-sheet simulation report: parameters with summary metrics, and the
//! sampled result table. Values are written at full precision.

use crate::domain::{ConsoleError, ParameterRecord, SampledRow, SolverMetrics};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PARAMETERS_SHEET: &str = "Параметры";
pub const RESULTS_SHEET: &str = "Результаты";
pub const DEFAULT_REPORT_FILE_NAME: &str = "simulation_results.xlsx";

pub const METRIC_LABELS: [&str; 3] = [
    "Время расчёта (мс)",
    "Количество операций",
    "Использовано памяти (байт)",
];

pub const RESULT_COLUMNS: [&str; 5] = [
    "Позиция (м)",
    "Температура (°C)",
    "Вязкость (Па·с)",
    "Скорость (м/с)",
    "Давление (Па)",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn from_optional(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }

    fn csv_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => value.to_string(),
            Self::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub file_stem: &'static str,
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Data rows plus the header row, if any.
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub sheets: Vec<Sheet>,
}

impl ReportDocument {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

pub fn export(
    params: &ParameterRecord,
    rows: &[SampledRow],
    metrics: &SolverMetrics,
) -> ReportDocument {
    let mut parameter_rows: Vec<Vec<Cell>> = params
        .entries()
        .map(|(field, value)| vec![Cell::Text(field.label().to_string()), Cell::Number(value)])
        .collect();
    let metric_values = [
        metrics.calculation_time_ms,
        metrics.operations_count as f64,
        metrics.memory_usage_bytes as f64,
    ];
    parameter_rows.extend(
        METRIC_LABELS
            .iter()
            .zip(metric_values)
            .map(|(label, value)| vec![Cell::Text((*label).to_string()), Cell::Number(value)]),
    );

    let result_rows = rows
        .iter()
        .map(|row| {
            vec![
                Cell::Number(row.position),
                Cell::Number(row.temperature),
                Cell::Number(row.viscosity),
                Cell::from_optional(row.velocity),
                Cell::from_optional(row.pressure),
            ]
        })
        .collect();

    ReportDocument {
        sheets: vec![
            Sheet {
                name: PARAMETERS_SHEET,
                file_stem: "parameters",
                header: None,
                rows: parameter_rows,
            },
            Sheet {
                name: RESULTS_SHEET,
                file_stem: "results",
                header: Some(RESULT_COLUMNS.iter().map(|column| column.to_string()).collect()),
                rows: result_rows,
            },
        ],
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create report directory '{}': {source}", path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write workbook '{}': {source}", path.display())]
    Xlsx { path: PathBuf, source: XlsxError },
    #[error("failed to write sheet '{}': {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

impl From<ExportError> for ConsoleError {
    fn from(error: ExportError) -> Self {
        let message = error.to_string();
        match error {
            ExportError::Directory { .. } => ConsoleError::io_system("IO.EXPORT_DIRECTORY", message),
            ExportError::Xlsx { .. } => ConsoleError::io_system("IO.EXPORT_XLSX", message),
            ExportError::Csv { .. } => ConsoleError::io_system("IO.EXPORT_CSV", message),
        }
    }
}

pub fn write_xlsx(document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let xlsx_error = |source| ExportError::Xlsx {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = build_workbook(document).map_err(xlsx_error)?;
    workbook.save(path).map_err(xlsx_error)?;
    info!(path = %path.display(), "wrote report workbook");
    Ok(())
}

fn build_workbook(document: &ReportDocument) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in &document.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        let mut row_index: u32 = 0;
        if let Some(header) = &sheet.header {
            for (column, title) in header.iter().enumerate() {
                worksheet.write_string_with_format(row_index, column as u16, title, &bold)?;
            }
            row_index += 1;
        }
        for row in &sheet.rows {
            for (column, cell) in row.iter().enumerate() {
                let column = column as u16;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_index, column, text)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row_index, column, *value)?;
                    }
                    Cell::Empty => {}
                }
            }
            row_index += 1;
        }
        worksheet.set_column_width(0, if sheet.header.is_some() { 14 } else { 44 })?;
    }

    Ok(workbook)
}

/// Writes one CSV file per sheet into `dir`, named after the sheet stem.
pub fn write_csv_bundle(document: &ReportDocument, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(document.sheets.len());
    for sheet in &document.sheets {
        let path = dir.join(format!("{}.csv", sheet.file_stem));
        write_csv_sheet(sheet, &path).map_err(|source| ExportError::Csv {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "wrote report csv bundle");
    Ok(written)
}

fn write_csv_sheet(sheet: &Sheet, path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    if let Some(header) = &sheet.header {
        writer.write_record(header)?;
    }
    for row in &sheet.rows {
        writer.write_record(row.iter().map(Cell::csv_text))?;
    }
    writer.flush()?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| ExportError::Directory {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Cell, PARAMETERS_SHEET, RESULT_COLUMNS, RESULTS_SHEET, export, write_csv_bundle, write_xlsx,
    };
    use crate::domain::{ParameterField, ParameterRecord, SampledRow, SolverMetrics};
    use std::fs;
    use tempfile::TempDir;

    fn rows() -> Vec<SampledRow> {
        vec![
            SampledRow {
                position: 0.0,
                temperature: 190.0,
                viscosity: 1234.5678901234,
                velocity: Some(0.1),
                pressure: Some(0.0),
            },
            SampledRow {
                position: 0.5,
                temperature: 187.25,
                viscosity: 1300.0,
                velocity: Some(0.1),
                pressure: Some(2.5e5),
            },
            SampledRow {
                position: 1.0,
                temperature: 185.125,
                viscosity: 1350.0,
                velocity: None,
                pressure: None,
            },
        ]
    }

    fn metrics() -> SolverMetrics {
        SolverMetrics {
            calculation_time_ms: 12.0,
            operations_count: 5050,
            memory_usage_bytes: 2424,
            ..SolverMetrics::default()
        }
    }

    #[test]
    fn document_has_parameters_and_results_sheets() {
        let document = export(&ParameterRecord::default(), &rows(), &metrics());

        let names: Vec<&str> = document.sheets.iter().map(|sheet| sheet.name).collect();
        assert_eq!(names, vec![PARAMETERS_SHEET, RESULTS_SHEET]);

        let results = document.sheet(RESULTS_SHEET).expect("results sheet");
        assert_eq!(results.rows.len(), 3);
        assert_eq!(results.row_count(), 4);
        assert_eq!(results.header.as_deref().map(|header| header.len()), Some(RESULT_COLUMNS.len()));

        let parameters = document.sheet(PARAMETERS_SHEET).expect("parameters sheet");
        assert_eq!(parameters.row_count(), ParameterField::ALL.len() + 3);
    }

    #[test]
    fn parameter_rows_follow_field_order_with_unit_labels() {
        let params = ParameterRecord::default().with(ParameterField::Density, 1180.0);
        let document = export(&params, &rows(), &metrics());
        let parameters = document.sheet(PARAMETERS_SHEET).expect("parameters sheet");

        assert_eq!(parameters.rows[0][0], Cell::Text("Ширина канала (м)".to_string()));
        assert_eq!(parameters.rows[3][0], Cell::Text("Плотность (кг/м³)".to_string()));
        assert_eq!(parameters.rows[3][1], Cell::Number(1180.0));
        assert_eq!(parameters.rows[17][0], Cell::Text("Время расчёта (мс)".to_string()));
        assert_eq!(parameters.rows[18][1], Cell::Number(5050.0));
        assert_eq!(parameters.rows[19][1], Cell::Number(2424.0));
    }

    #[test]
    fn results_keep_full_precision_and_blank_missing_profiles() {
        let document = export(&ParameterRecord::default(), &rows(), &metrics());
        let results = document.sheet(RESULTS_SHEET).expect("results sheet");

        assert_eq!(results.rows[0][2], Cell::Number(1234.5678901234));
        assert_eq!(results.rows[2][3], Cell::Empty);
        assert_eq!(results.rows[2][4], Cell::Empty);
    }

    #[test]
    fn xlsx_writer_produces_a_zip_container() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("reports/simulation_results.xlsx");
        let document = export(&ParameterRecord::default(), &rows(), &metrics());

        write_xlsx(&document, &path).expect("workbook should be written");
        let bytes = fs::read(&path).expect("workbook readable");
        assert!(bytes.starts_with(b"PK"), "xlsx should be a zip archive");
    }

    #[test]
    fn csv_bundle_writes_one_file_per_sheet() {
        let temp = TempDir::new().expect("tempdir should be created");
        let document = export(&ParameterRecord::default(), &rows(), &metrics());

        let written = write_csv_bundle(&document, temp.path()).expect("bundle written");
        assert_eq!(written.len(), 2);

        let results = fs::read_to_string(temp.path().join("results.csv")).expect("results csv");
        let lines: Vec<&str> = results.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Позиция (м),"));
        assert_eq!(lines[3], "1,185.125,1350,,");

        let parameters =
            fs::read_to_string(temp.path().join("parameters.csv")).expect("parameters csv");
        assert_eq!(parameters.lines().count(), ParameterField::ALL.len() + 3);
    }
}
