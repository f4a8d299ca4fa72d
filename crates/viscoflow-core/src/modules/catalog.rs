use super::solver::Credentials;
use super::traits::MaterialSource;
use crate::config::{CatalogConfig, join_url};
use crate::domain::{ConsoleError, ConsoleResult, Material};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read material catalog '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse material catalog '{origin}': {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
    #[error("material API '{url}' responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("material API '{url}' is unreachable: {message}")]
    Unreachable { url: String, message: String },
    #[error("no material catalog configured; set catalog.path or catalog.baseUrl")]
    NotConfigured,
}

impl From<CatalogError> for ConsoleError {
    fn from(error: CatalogError) -> Self {
        let message = error.to_string();
        match error {
            CatalogError::Read { .. } => ConsoleError::io_system("IO.CATALOG_READ", message),
            CatalogError::Parse { .. } => {
                ConsoleError::input_validation("INPUT.CATALOG_PARSE", message)
            }
            CatalogError::Status { .. } | CatalogError::Unreachable { .. } => {
                ConsoleError::io_system("IO.CATALOG_HTTP", message)
            }
            CatalogError::NotConfigured => {
                ConsoleError::input_validation("INPUT.CATALOG_SOURCE", message)
            }
        }
    }
}

/// Materials stored as a JSON array in a local file.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MaterialSource for JsonFileCatalog {
    fn list_materials(&self) -> ConsoleResult<Vec<Material>> {
        let content = fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.clone(),
            source,
        })?;
        let materials: Vec<Material> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                origin: self.path.display().to_string(),
                source,
            })?;
        debug!(path = %self.path.display(), count = materials.len(), "loaded material catalog");
        Ok(materials)
    }
}

/// Material read API: `GET {base}/materials` and `GET {base}/materials/{id}`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    timeout: Duration,
    credentials: Credentials,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            credentials,
        }
    }

    fn get(&self, url: &str) -> Result<Option<String>, CatalogError> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let mut request = agent.get(url);
        if let Some(token) = &self.credentials.bearer_token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }
        match request.call() {
            Ok(response) => response
                .into_string()
                .map(Some)
                .map_err(|source| CatalogError::Unreachable {
                    url: url.to_string(),
                    message: source.to_string(),
                }),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(ureq::Error::Status(status, _)) => Err(CatalogError::Status {
                url: url.to_string(),
                status,
            }),
            Err(ureq::Error::Transport(transport)) => Err(CatalogError::Unreachable {
                url: url.to_string(),
                message: transport.to_string(),
            }),
        }
    }
}

impl MaterialSource for HttpCatalog {
    fn list_materials(&self) -> ConsoleResult<Vec<Material>> {
        let url = join_url(&self.base_url, "materials");
        let body = self.get(&url)?.unwrap_or_else(|| "[]".to_string());
        let materials = serde_json::from_str(&body)
            .map_err(|source| CatalogError::Parse { origin: url, source })?;
        Ok(materials)
    }

    fn material(&self, id: &str) -> ConsoleResult<Option<Material>> {
        let url = join_url(&self.base_url, &format!("materials/{}", id));
        let Some(body) = self.get(&url)? else {
            return Ok(None);
        };
        let material = serde_json::from_str(&body)
            .map_err(|source| CatalogError::Parse { origin: url, source })?;
        Ok(Some(material))
    }
}

/// Picks the configured catalog source; a file path wins over a URL.
pub fn catalog_from_config(
    config: &CatalogConfig,
    timeout: Duration,
    credentials: Credentials,
) -> ConsoleResult<Box<dyn MaterialSource>> {
    if let Some(path) = &config.path {
        return Ok(Box::new(JsonFileCatalog::new(path)));
    }
    if let Some(base_url) = &config.base_url {
        return Ok(Box::new(HttpCatalog::new(base_url, timeout, credentials)));
    }
    Err(CatalogError::NotConfigured.into())
}
