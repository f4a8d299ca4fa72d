pub mod catalog;
pub mod display;
pub mod export;
pub mod input;
pub mod mapping;
pub mod sampler;
pub mod solver;

mod traits;

pub use catalog::{CatalogError, HttpCatalog, JsonFileCatalog, catalog_from_config};
pub use export::{ExportError, ReportDocument, export, write_csv_bundle, write_xlsx};
pub use input::{EditState, FieldValue, ParameterForm, accept, finalize};
pub use mapping::{MappingOutcome, MaterialParameterMapper, apply_material};
pub use sampler::{sample, sample_indices};
pub use solver::{
    Credentials, HttpSolverTransport, RecordedSolverTransport, SimulationInvoker,
    SimulationSession, SolverTransportError,
};
pub use traits::{MaterialSource, SolverTransport};
