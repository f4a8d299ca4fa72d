//! Solver boundary: request encoding, transports, response decoding, and the
//! session state that keeps the last good result across failures.

use super::traits::SolverTransport;
use crate::config::SolverConfig;
use crate::domain::{
    ConsoleError, ParameterRecord, ResultSeries, SolverMetrics, SolverResult,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Message shown to the operator when a simulation request fails.
pub const SIMULATION_FAILED_MESSAGE: &str = "Ошибка при выполнении моделирования";

#[derive(Debug, thiserror::Error)]
pub enum SolverTransportError {
    #[error("solver responded with HTTP {status}")]
    Status { status: u16 },
    #[error("solver is unreachable: {message}")]
    Unreachable { message: String },
    #[error("failed to read solver response body: {source}")]
    Body { source: std::io::Error },
    #[error("failed to read recorded response '{}': {source}", path.display())]
    Recorded {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<SolverTransportError> for ConsoleError {
    fn from(error: SolverTransportError) -> Self {
        let message = format!("simulation failed: {}", error);
        match error {
            SolverTransportError::Status { .. } => {
                ConsoleError::solver("SOLVER.HTTP_STATUS", message)
            }
            SolverTransportError::Unreachable { .. } | SolverTransportError::Body { .. } => {
                ConsoleError::solver("SOLVER.TRANSPORT", message)
            }
            SolverTransportError::Recorded { .. } => {
                ConsoleError::io_system("IO.SOLVER_RECORDED_RESPONSE", message)
            }
        }
    }
}

/// Explicit credential passed to transports that talk to protected endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpSolverTransport {
    endpoint: String,
    timeout: Duration,
    credentials: Credentials,
}

impl HttpSolverTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, credentials: Credentials) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            credentials,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(
            config.endpoint(),
            Duration::from_secs(config.timeout_secs),
            Credentials {
                bearer_token: config.auth_token.clone(),
            },
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SolverTransport for HttpSolverTransport {
    fn submit(&self, body: &str) -> Result<String, SolverTransportError> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let mut request = agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(token) = &self.credentials.bearer_token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        match request.send_string(body) {
            Ok(response) => response
                .into_string()
                .map_err(|source| SolverTransportError::Body { source }),
            Err(ureq::Error::Status(status, _)) => Err(SolverTransportError::Status { status }),
            Err(ureq::Error::Transport(transport)) => Err(SolverTransportError::Unreachable {
                message: transport.to_string(),
            }),
        }
    }
}

/// Replays a recorded solver response from disk.
#[derive(Debug, Clone)]
pub struct RecordedSolverTransport {
    path: PathBuf,
}

impl RecordedSolverTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SolverTransport for RecordedSolverTransport {
    fn submit(&self, _body: &str) -> Result<String, SolverTransportError> {
        fs::read_to_string(&self.path).map_err(|source| SolverTransportError::Recorded {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SimulationResponse {
    positions: Vec<f64>,
    temperatures: Vec<f64>,
    viscosities: Vec<f64>,
    #[serde(default)]
    velocities: Option<Vec<f64>>,
    #[serde(default)]
    pressures: Option<Vec<f64>>,
    #[serde(rename = "calculationTime")]
    calculation_time: f64,
    #[serde(rename = "operationsCount")]
    operations_count: u64,
    #[serde(rename = "memoryUsage")]
    memory_usage: u64,
    #[serde(default)]
    productivity: Option<f64>,
    #[serde(rename = "finalTemperature", default)]
    final_temperature: Option<f64>,
    #[serde(rename = "finalViscosity", default)]
    final_viscosity: Option<f64>,
}

pub fn encode_request(params: &ParameterRecord) -> SolverResult<String> {
    serde_json::to_string(params).map_err(|source| {
        ConsoleError::internal(
            "SYS.SOLVER_REQUEST_ENCODE",
            format!("failed to encode simulation request: {}", source),
        )
    })
}

/// Decodes a solver response body into a validated series.
///
/// With `require_flow_profiles` set, a response without both `velocities` and
/// `pressures` is rejected.
pub fn decode_response(body: &str, require_flow_profiles: bool) -> SolverResult<ResultSeries> {
    let response: SimulationResponse = serde_json::from_str(body).map_err(|source| {
        ConsoleError::solver(
            "SOLVER.RESPONSE_DECODE",
            format!("simulation failed: malformed solver response: {}", source),
        )
    })?;

    if require_flow_profiles && (response.velocities.is_none() || response.pressures.is_none()) {
        return Err(ConsoleError::solver(
            "SOLVER.RESPONSE_PROFILES",
            "simulation failed: solver response lacks 'velocities' or 'pressures'",
        ));
    }

    let metrics = SolverMetrics {
        calculation_time_ms: response.calculation_time,
        operations_count: response.operations_count,
        memory_usage_bytes: response.memory_usage,
        productivity: response.productivity,
        final_temperature: response.final_temperature,
        final_viscosity: response.final_viscosity,
    };
    ResultSeries::new(
        response.positions,
        response.temperatures,
        response.viscosities,
        response.velocities,
        response.pressures,
        metrics,
    )
}

#[derive(Debug, Clone)]
pub struct SimulationInvoker<T> {
    transport: T,
    require_flow_profiles: bool,
}

impl<T> SimulationInvoker<T>
where
    T: SolverTransport,
{
    pub fn new(transport: T, require_flow_profiles: bool) -> Self {
        Self {
            transport,
            require_flow_profiles,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn invoke(&self, params: &ParameterRecord) -> SolverResult<ResultSeries> {
        params.validate_for_submission()?;
        let body = encode_request(params)?;
        info!(bytes = body.len(), "submitting simulation request");

        let response = self.transport.submit(&body).map_err(ConsoleError::from)?;
        let series = decode_response(&response, self.require_flow_profiles)?;
        info!(
            points = series.len(),
            calculation_time_ms = series.metrics().calculation_time_ms,
            "simulation completed"
        );
        Ok(series)
    }
}

/// Console state for one operator: the current parameters and the most
/// recent successful result. Failures never clear an earlier result.
#[derive(Debug, Clone, Default)]
pub struct SimulationSession {
    params: ParameterRecord,
    last_result: Option<ResultSeries>,
    last_error: Option<String>,
}

impl SimulationSession {
    pub fn new(params: ParameterRecord) -> Self {
        Self {
            params,
            last_result: None,
            last_error: None,
        }
    }

    pub fn params(&self) -> &ParameterRecord {
        &self.params
    }

    pub fn set_params(&mut self, params: ParameterRecord) {
        self.params = params;
    }

    pub fn last_result(&self) -> Option<&ResultSeries> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn run<T>(&mut self, invoker: &SimulationInvoker<T>) -> SolverResult<&ResultSeries>
    where
        T: SolverTransport,
    {
        match invoker.invoke(&self.params) {
            Ok(series) => {
                self.last_error = None;
                Ok(self.last_result.insert(series))
            }
            Err(error) => {
                warn!(error = %error, "simulation request failed");
                self.last_error = Some(format!("{}: {}", SIMULATION_FAILED_MESSAGE, error.message()));
                Err(error)
            }
        }
    }
}
