use super::domain::{ApplicationId, ApplicationRecord};

/// Read-only access to stored applications so the generator can be exercised in isolation.
///
/// Implementations return at most one record per identifier. Duplicate rows for a single
/// identifier are a data-integrity problem for the store to report as [`LookupError::Integrity`].
pub trait ApplicationLookup: Send + Sync {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, LookupError>;
}

/// Error enumeration for record lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("multiple records stored for application {0}")]
    Integrity(ApplicationId),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
