use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const RESPONSE: &str = r#"
{
  "positions": [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0],
  "temperatures": [190.0, 189.5, 189.0, 188.5, 188.0, 187.5, 187.0, 186.5, 186.0, 185.5, 185.0],
  "viscosities": [1000.0, 1010.0, 1020.0, 1030.0, 1040.0, 1050.0, 1060.0, 1070.0, 1080.0, 1090.0, 1100.0],
  "velocities": [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1],
  "pressures": [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
  "calculationTime": 4,
  "operationsCount": 1111,
  "memoryUsage": 264,
  "productivity": 18.25,
  "finalTemperature": 185.0,
  "finalViscosity": 1100.0
}
"#;

const RESPONSE_WITHOUT_PROFILES: &str = r#"
{
  "positions": [0.0, 0.5, 1.0],
  "temperatures": [190.0, 187.5, 185.0],
  "viscosities": [1000.0, 1050.0, 1100.0],
  "calculationTime": 1,
  "operationsCount": 3,
  "memoryUsage": 72
}
"#;

const CATALOG: &str = r#"
[
  {
    "id": "pmma",
    "name": "ПММА",
    "materialType": "polymer",
    "propertyValues": [
      { "property": { "id": "p-1", "propertyName": "Плотность", "unitOfMeasurement": "кг/м³" }, "propertyValue": 1180.0 },
      { "property": { "id": "p-2", "propertyName": "Цвет", "unitOfMeasurement": "" }, "propertyValue": 3.0 }
    ],
    "coefficientValues": [
      { "coefficient": { "id": "c-1", "coefficientName": "Индекс течения", "unitOfMeasurement": "" }, "coefficientValue": 0.42 }
    ]
  },
  { "id": "ps", "name": "ПС", "materialType": "polymer" }
]
"#;

#[test]
fn simulate_prints_sampled_table_and_writes_report() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    let report_path = temp.path().join("out/report.xlsx");
    write_file(&response_path, RESPONSE);

    let output = run_viscoflow(&[
        "simulate",
        "--response-file",
        path_arg(&response_path),
        "--interval",
        "0.5",
        "--out",
        path_arg(&report_path),
    ]);

    assert!(
        output.status.success(),
        "simulate should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Количество операций: 1111"));
    assert!(stdout.contains("Производительность: 18.25 кг/ч"));

    let table_rows: Vec<&str> = stdout
        .lines()
        .filter(|line| line.matches('\t').count() == 4)
        .collect();
    assert_eq!(table_rows.len(), 4, "header plus three sampled rows");
    assert!(table_rows[1].starts_with("0.000\t190.00"));
    assert!(table_rows[2].starts_with("0.500\t187.50"));
    assert!(table_rows[3].starts_with("1.000\t185.00"));

    let bytes = fs::read(&report_path).expect("report should be written");
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn simulate_reports_solver_failure_with_solver_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    let report_path = temp.path().join("report.xlsx");
    write_file(&response_path, RESPONSE_WITHOUT_PROFILES);

    let output = run_viscoflow(&[
        "simulate",
        "--response-file",
        path_arg(&response_path),
        "--out",
        path_arg(&report_path),
    ]);

    assert_eq!(
        output.status.code(),
        Some(4),
        "solver errors exit with 4, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Ошибка при выполнении моделирования"));
    assert!(stderr.contains("[SOLVER.RESPONSE_PROFILES]"));
    assert!(stderr.contains("FATAL EXIT CODE: 4"));
    assert!(!report_path.exists(), "no report after a failed run");
}

#[test]
fn lenient_config_accepts_missing_flow_profiles() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    let config_path = temp.path().join("console.json");
    write_file(&response_path, RESPONSE_WITHOUT_PROFILES);
    write_file(
        &config_path,
        r#"{ "solver": { "requireFlowProfiles": false } }"#,
    );

    let output = run_viscoflow(&[
        "sample",
        "--config",
        path_arg(&config_path),
        "--response-file",
        path_arg(&response_path),
        "--interval",
        "0.5",
    ]);

    assert!(
        output.status.success(),
        "sample should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.500\t187.50\t1050.00\t-\t-"));
}

#[test]
fn sample_keeps_end_points_and_interval_crossings() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    write_file(&response_path, RESPONSE);

    let output = run_viscoflow(&[
        "sample",
        "--response-file",
        path_arg(&response_path),
        "--interval",
        "0.3",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let positions: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(positions, vec!["0.000", "0.300", "0.600", "0.900", "1.000"]);
}

#[test]
fn interval_accepts_comma_separator_like_parameter_fields() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    write_file(&response_path, RESPONSE);

    let simulated = run_viscoflow(&[
        "simulate",
        "--response-file",
        path_arg(&response_path),
        "--interval",
        "0,5",
        "--no-report",
    ]);
    assert!(
        simulated.status.success(),
        "simulate should accept 0,5, stderr: {}",
        String::from_utf8_lossy(&simulated.stderr)
    );
    let stdout = String::from_utf8_lossy(&simulated.stdout);
    let sampled: Vec<&str> = stdout
        .lines()
        .filter(|line| line.matches('\t').count() == 4)
        .skip(1)
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(sampled, vec!["0.000", "0.500", "1.000"]);

    let sampled = run_viscoflow(&[
        "sample",
        "--response-file",
        path_arg(&response_path),
        "--interval",
        "0,3",
    ]);
    assert!(sampled.status.success());
    let stdout = String::from_utf8_lossy(&sampled.stdout);
    assert!(stdout.contains("0.600\t"));

    let malformed = run_viscoflow(&[
        "sample",
        "--response-file",
        path_arg(&response_path),
        "--interval",
        "0,3,1",
    ]);
    assert_eq!(malformed.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&malformed.stderr).contains("INPUT.PARAMETER_OVERRIDE"));
}

#[test]
fn export_writes_workbook_and_csv_bundle() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    let params_path = temp.path().join("params.json");
    let report_path = temp.path().join("report.xlsx");
    let csv_dir = temp.path().join("csv");
    write_file(&response_path, RESPONSE);
    write_file(&params_path, r#"{ "density": 950.0, "displayStep": 0.25 }"#);

    let output = run_viscoflow(&[
        "export",
        "--params",
        path_arg(&params_path),
        "--response-file",
        path_arg(&response_path),
        "--out",
        path_arg(&report_path),
        "--csv-dir",
        path_arg(&csv_dir),
    ]);

    assert!(
        output.status.success(),
        "export should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(report_path.exists());

    let parameters = fs::read_to_string(csv_dir.join("parameters.csv")).expect("parameters csv");
    assert_eq!(parameters.lines().count(), 20);
    assert!(parameters.contains("Плотность (кг/м³),950"));

    let results = fs::read_to_string(csv_dir.join("results.csv")).expect("results csv");
    // 0.0, 0.3 (first point past 0.25), 0.5, 0.8 (past 0.75), 1.0
    assert_eq!(results.lines().count(), 6);
}

#[test]
fn apply_material_maps_recognized_catalog_names() {
    let temp = TempDir::new().expect("tempdir should be created");
    let catalog_path = temp.path().join("materials.json");
    write_file(&catalog_path, CATALOG);

    let output = run_viscoflow(&["apply-material", "pmma", "--catalog", path_arg(&catalog_path)]);

    assert!(
        output.status.success(),
        "apply-material should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let record: Value = serde_json::from_slice(&output.stdout).expect("record should be JSON");
    assert_eq!(record["density"], Value::from(1180.0));
    assert_eq!(record["flowIndex"], Value::from(0.42));
    assert_eq!(record["heatCapacity"], Value::from(2000.0));
}

#[test]
fn materials_lists_catalog_and_unknown_material_is_input_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let catalog_path = temp.path().join("materials.json");
    write_file(&catalog_path, CATALOG);

    let listing = run_viscoflow(&["materials", "--catalog", path_arg(&catalog_path)]);
    assert!(listing.status.success());
    let stdout = String::from_utf8_lossy(&listing.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.lines().next().is_some_and(|line| line.starts_with("pmma\tПММА")));

    let missing = run_viscoflow(&["apply-material", "pvc", "--catalog", path_arg(&catalog_path)]);
    assert_eq!(missing.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("INPUT.MATERIAL_NOT_FOUND"));
}

#[test]
fn invalid_override_and_non_positive_geometry_are_rejected_before_solving() {
    let temp = TempDir::new().expect("tempdir should be created");
    let response_path = temp.path().join("response.json");
    write_file(&response_path, RESPONSE);

    let malformed = run_viscoflow(&[
        "simulate",
        "--response-file",
        path_arg(&response_path),
        "--set",
        "width=0,1,2",
        "--no-report",
    ]);
    assert_eq!(malformed.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&malformed.stderr).contains("INPUT.PARAMETER_OVERRIDE"));

    let zero_width = run_viscoflow(&[
        "simulate",
        "--response-file",
        path_arg(&response_path),
        "--set",
        "width=0",
        "--no-report",
    ]);
    assert_eq!(zero_width.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&zero_width.stderr).contains("INPUT.PARAMETER_NOT_POSITIVE"));
}

#[test]
fn missing_response_file_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_viscoflow(&[
        "sample",
        "--response-file",
        path_arg(&temp.path().join("missing.json")),
    ]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[IO.CLI]"));
}

fn run_viscoflow(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_viscoflow"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("viscoflow should run")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths should be UTF-8")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, content).expect("file should be written");
}
