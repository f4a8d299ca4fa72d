pub mod errors;
pub mod material;
pub mod results;

pub use errors::{
    ConsoleError, ConsoleErrorCategory, ConsoleResult, InputResult, SolverResult,
};
pub use material::{Coefficient, CoefficientValue, Material, Property, PropertyValue};
pub use results::{ResultSeries, SampledRow, SolverMetrics};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Named fields of the channel-flow parameter record, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Width,
    Depth,
    Length,
    Density,
    HeatCapacity,
    GlassTransitionTemp,
    MeltingTemp,
    CoverSpeed,
    CoverTemp,
    Mu0,
    FirstConstantVlf,
    SecondConstantVlf,
    CastingTemp,
    FlowIndex,
    HeatTransfer,
    Step,
    DisplayStep,
}

impl ParameterField {
    pub const ALL: [ParameterField; 17] = [
        Self::Width,
        Self::Depth,
        Self::Length,
        Self::Density,
        Self::HeatCapacity,
        Self::GlassTransitionTemp,
        Self::MeltingTemp,
        Self::CoverSpeed,
        Self::CoverTemp,
        Self::Mu0,
        Self::FirstConstantVlf,
        Self::SecondConstantVlf,
        Self::CastingTemp,
        Self::FlowIndex,
        Self::HeatTransfer,
        Self::Step,
        Self::DisplayStep,
    ];

    /// Property name used in the solver request body.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Depth => "depth",
            Self::Length => "length",
            Self::Density => "density",
            Self::HeatCapacity => "heatCapacity",
            Self::GlassTransitionTemp => "glassTransitionTemp",
            Self::MeltingTemp => "meltingTemp",
            Self::CoverSpeed => "coverSpeed",
            Self::CoverTemp => "coverTemp",
            Self::Mu0 => "mu0",
            Self::FirstConstantVlf => "firstConstantVLF",
            Self::SecondConstantVlf => "secondConstantVLF",
            Self::CastingTemp => "castingTemp",
            Self::FlowIndex => "flowIndex",
            Self::HeatTransfer => "heatTransfer",
            Self::Step => "step",
            Self::DisplayStep => "displayStep",
        }
    }

    /// Human-readable label with the physical unit embedded.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Width => "Ширина канала (м)",
            Self::Depth => "Глубина канала (м)",
            Self::Length => "Длина канала (м)",
            Self::Density => "Плотность (кг/м³)",
            Self::HeatCapacity => "Удельная теплоёмкость (Дж/(кг·°C))",
            Self::GlassTransitionTemp => "Температура стеклования (°C)",
            Self::MeltingTemp => "Температура плавления (°C)",
            Self::CoverSpeed => "Скорость крышки (м/с)",
            Self::CoverTemp => "Температура крышки (°C)",
            Self::Mu0 => "Коэффициент консистенции μ0 (Па·сⁿ)",
            Self::FirstConstantVlf => "Первая константа ВЛФ C1",
            Self::SecondConstantVlf => "Вторая константа ВЛФ C2 (°C)",
            Self::CastingTemp => "Температура приведения (°C)",
            Self::FlowIndex => "Индекс течения n",
            Self::HeatTransfer => "Коэффициент теплоотдачи крышки (Вт/(м²·°C))",
            Self::Step => "Шаг расчёта по длине (м)",
            Self::DisplayStep => "Шаг вывода в таблицу (м)",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Fields the solver rejects unless strictly positive.
    pub const fn requires_positive(self) -> bool {
        matches!(
            self,
            Self::Width
                | Self::Depth
                | Self::Length
                | Self::CoverSpeed
                | Self::CoverTemp
                | Self::Step
        )
    }
}

impl Display for ParameterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).wire_name())
    }
}

/// Canonical simulation input. Serializes to the solver request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRecord {
    pub width: f64,
    pub depth: f64,
    pub length: f64,
    pub density: f64,
    #[serde(rename = "heatCapacity")]
    pub heat_capacity: f64,
    #[serde(rename = "glassTransitionTemp")]
    pub glass_transition_temp: f64,
    #[serde(rename = "meltingTemp")]
    pub melting_temp: f64,
    #[serde(rename = "coverSpeed")]
    pub cover_speed: f64,
    #[serde(rename = "coverTemp")]
    pub cover_temp: f64,
    pub mu0: f64,
    #[serde(rename = "firstConstantVLF")]
    pub first_constant_vlf: f64,
    #[serde(rename = "secondConstantVLF")]
    pub second_constant_vlf: f64,
    #[serde(rename = "castingTemp")]
    pub casting_temp: f64,
    #[serde(rename = "flowIndex")]
    pub flow_index: f64,
    #[serde(rename = "heatTransfer")]
    pub heat_transfer: f64,
    pub step: f64,
    #[serde(rename = "displayStep")]
    pub display_step: f64,
}

impl Default for ParameterRecord {
    fn default() -> Self {
        Self {
            width: 0.1,
            depth: 0.01,
            length: 1.0,
            density: 1000.0,
            heat_capacity: 2000.0,
            glass_transition_temp: 100.0,
            melting_temp: 200.0,
            cover_speed: 0.1,
            cover_temp: 150.0,
            mu0: 10000.0,
            first_constant_vlf: 8.86,
            second_constant_vlf: 101.6,
            casting_temp: 190.0,
            flow_index: 0.3,
            heat_transfer: 1000.0,
            step: 0.01,
            display_step: 0.1,
        }
    }
}

impl ParameterRecord {
    pub const fn get(&self, field: ParameterField) -> f64 {
        match field {
            ParameterField::Width => self.width,
            ParameterField::Depth => self.depth,
            ParameterField::Length => self.length,
            ParameterField::Density => self.density,
            ParameterField::HeatCapacity => self.heat_capacity,
            ParameterField::GlassTransitionTemp => self.glass_transition_temp,
            ParameterField::MeltingTemp => self.melting_temp,
            ParameterField::CoverSpeed => self.cover_speed,
            ParameterField::CoverTemp => self.cover_temp,
            ParameterField::Mu0 => self.mu0,
            ParameterField::FirstConstantVlf => self.first_constant_vlf,
            ParameterField::SecondConstantVlf => self.second_constant_vlf,
            ParameterField::CastingTemp => self.casting_temp,
            ParameterField::FlowIndex => self.flow_index,
            ParameterField::HeatTransfer => self.heat_transfer,
            ParameterField::Step => self.step,
            ParameterField::DisplayStep => self.display_step,
        }
    }

    pub fn set(&mut self, field: ParameterField, value: f64) {
        let slot = match field {
            ParameterField::Width => &mut self.width,
            ParameterField::Depth => &mut self.depth,
            ParameterField::Length => &mut self.length,
            ParameterField::Density => &mut self.density,
            ParameterField::HeatCapacity => &mut self.heat_capacity,
            ParameterField::GlassTransitionTemp => &mut self.glass_transition_temp,
            ParameterField::MeltingTemp => &mut self.melting_temp,
            ParameterField::CoverSpeed => &mut self.cover_speed,
            ParameterField::CoverTemp => &mut self.cover_temp,
            ParameterField::Mu0 => &mut self.mu0,
            ParameterField::FirstConstantVlf => &mut self.first_constant_vlf,
            ParameterField::SecondConstantVlf => &mut self.second_constant_vlf,
            ParameterField::CastingTemp => &mut self.casting_temp,
            ParameterField::FlowIndex => &mut self.flow_index,
            ParameterField::HeatTransfer => &mut self.heat_transfer,
            ParameterField::Step => &mut self.step,
            ParameterField::DisplayStep => &mut self.display_step,
        };
        *slot = value;
    }

    pub fn with(mut self, field: ParameterField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (ParameterField, f64)> + '_ {
        ParameterField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }

    /// Checks that must pass before the record is sent to the solver.
    pub fn validate_for_submission(&self) -> InputResult<()> {
        for (field, value) in self.entries() {
            if !value.is_finite() {
                return Err(ConsoleError::input_validation(
                    "INPUT.PARAMETER_NOT_FINITE",
                    format!("parameter '{}' is not a finite number", field.label()),
                ));
            }
            if field.requires_positive() && value <= 0.0 {
                return Err(ConsoleError::input_validation(
                    "INPUT.PARAMETER_NOT_POSITIVE",
                    format!(
                        "parameter '{}' must be positive, got {}",
                        field.label(),
                        value
                    ),
                ));
            }
        }
        Ok(())
    }
}
