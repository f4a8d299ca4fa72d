use super::{ConsoleError, SolverResult};
use serde::Serialize;

/// Scalar summary returned alongside the field profiles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SolverMetrics {
    pub calculation_time_ms: f64,
    pub operations_count: u64,
    pub memory_usage_bytes: u64,
    pub productivity: Option<f64>,
    pub final_temperature: Option<f64>,
    pub final_viscosity: Option<f64>,
}

/// One displayed sample of the result series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampledRow {
    pub position: f64,
    pub temperature: f64,
    pub viscosity: f64,
    pub velocity: Option<f64>,
    pub pressure: Option<f64>,
}

/// Dense solver output: parallel profiles indexed by solver step.
///
/// Construction checks that every present profile has the length of
/// `positions` and that positions are finite and non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSeries {
    positions: Vec<f64>,
    temperatures: Vec<f64>,
    viscosities: Vec<f64>,
    velocities: Option<Vec<f64>>,
    pressures: Option<Vec<f64>>,
    metrics: SolverMetrics,
}

impl ResultSeries {
    pub fn new(
        positions: Vec<f64>,
        temperatures: Vec<f64>,
        viscosities: Vec<f64>,
        velocities: Option<Vec<f64>>,
        pressures: Option<Vec<f64>>,
        metrics: SolverMetrics,
    ) -> SolverResult<Self> {
        let expected = positions.len();
        let profiles = [
            ("temperatures", Some(&temperatures)),
            ("viscosities", Some(&viscosities)),
            ("velocities", velocities.as_ref()),
            ("pressures", pressures.as_ref()),
        ];
        for (name, profile) in profiles {
            let Some(profile) = profile else {
                continue;
            };
            if profile.len() != expected {
                return Err(ConsoleError::solver(
                    "SOLVER.RESULT_SHAPE",
                    format!(
                        "result profile '{}' has {} entries but 'positions' has {}",
                        name,
                        profile.len(),
                        expected
                    ),
                ));
            }
        }

        if let Some(index) = positions.iter().position(|value| !value.is_finite()) {
            return Err(ConsoleError::solver(
                "SOLVER.RESULT_POSITIONS",
                format!("position at index {} is not finite", index),
            ));
        }
        if let Some(index) = positions.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(ConsoleError::solver(
                "SOLVER.RESULT_POSITIONS",
                format!(
                    "positions decrease between index {} ({}) and {} ({})",
                    index,
                    positions[index],
                    index + 1,
                    positions[index + 1]
                ),
            ));
        }

        Ok(Self {
            positions,
            temperatures,
            viscosities,
            velocities,
            pressures,
            metrics,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn viscosities(&self) -> &[f64] {
        &self.viscosities
    }

    pub fn velocities(&self) -> Option<&[f64]> {
        self.velocities.as_deref()
    }

    pub fn pressures(&self) -> Option<&[f64]> {
        self.pressures.as_deref()
    }

    pub fn has_flow_profiles(&self) -> bool {
        self.velocities.is_some() && self.pressures.is_some()
    }

    pub fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }

    pub fn last_position(&self) -> Option<f64> {
        self.positions.last().copied()
    }

    pub fn row(&self, index: usize) -> Option<SampledRow> {
        let position = *self.positions.get(index)?;
        Some(SampledRow {
            position,
            temperature: self.temperatures[index],
            viscosity: self.viscosities[index],
            velocity: self.velocities.as_ref().map(|values| values[index]),
            pressure: self.pressures.as_ref().map(|values| values[index]),
        })
    }
}
