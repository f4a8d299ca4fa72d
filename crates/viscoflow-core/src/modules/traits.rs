use crate::domain::{ConsoleResult, Material};
use crate::modules::solver::SolverTransportError;

/// Carries a JSON request body to the solver and returns the raw response body.
pub trait SolverTransport {
    fn submit(&self, body: &str) -> Result<String, SolverTransportError>;
}

/// Read-only access to catalog materials.
pub trait MaterialSource {
    fn list_materials(&self) -> ConsoleResult<Vec<Material>>;

    fn material(&self, id: &str) -> ConsoleResult<Option<Material>> {
        Ok(self
            .list_materials()?
            .into_iter()
            .find(|material| material.id == id))
    }
}

impl<T> SolverTransport for &T
where
    T: SolverTransport + ?Sized,
{
    fn submit(&self, body: &str) -> Result<String, SolverTransportError> {
        (**self).submit(body)
    }
}

impl<T> SolverTransport for Box<T>
where
    T: SolverTransport + ?Sized,
{
    fn submit(&self, body: &str) -> Result<String, SolverTransportError> {
        (**self).submit(body)
    }
}
