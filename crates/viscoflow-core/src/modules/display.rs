//! Display-time formatting for the operator. Exported reports never go
//! through here.

use crate::domain::{SampledRow, SolverMetrics};
use crate::modules::export::RESULT_COLUMNS;

pub const POSITION_DECIMALS: usize = 3;
pub const VALUE_DECIMALS: usize = 2;

const MISSING: &str = "-";

pub fn format_position(value: f64) -> String {
    format!("{:.*}", POSITION_DECIMALS, value)
}

pub fn format_value(value: f64) -> String {
    format!("{:.*}", VALUE_DECIMALS, value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), format_value)
}

pub fn render_summary(metrics: &SolverMetrics) -> String {
    let mut lines = vec![
        format!("Время расчёта: {} мс", format_value(metrics.calculation_time_ms)),
        format!("Количество операций: {}", metrics.operations_count),
        format!("Использовано памяти: {} байт", metrics.memory_usage_bytes),
    ];
    if let Some(productivity) = metrics.productivity {
        lines.push(format!("Производительность: {} кг/ч", format_value(productivity)));
    }
    if let Some(temperature) = metrics.final_temperature {
        lines.push(format!("Конечная температура: {} °C", format_value(temperature)));
    }
    if let Some(viscosity) = metrics.final_viscosity {
        lines.push(format!("Конечная вязкость: {} Па·с", format_value(viscosity)));
    }
    lines.join("\n")
}

/// Tab-separated table with a header row, one line per sampled row.
pub fn render_sampled_table(rows: &[SampledRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(RESULT_COLUMNS.join("\t"));
    for row in rows {
        lines.push(
            [
                format_position(row.position),
                format_value(row.temperature),
                format_value(row.viscosity),
                format_optional(row.velocity),
                format_optional(row.pressure),
            ]
            .join("\t"),
        );
    }
    lines.join("\n")
}
