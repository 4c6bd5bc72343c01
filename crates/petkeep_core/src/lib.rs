//! Core data-access layer for the PetKeep adoption catalog.
//! This crate is the single source of truth for catalog invariants:
//! owner/pet referential integrity, atomic adoption and cascade deletes,
//! and the asynchronous operation status protocol consumed by UI layers.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod status;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::owner::{Owner, OwnerId};
pub use model::pet::{Pet, PetId, Species};
pub use model::CatalogValidationError;
pub use repo::catalog_repo::{
    CatalogRepository, RepoError, RepoResult, SqliteCatalogRepository,
};
pub use service::catalog_service::CatalogService;
pub use status::{OperationStatus, StatusStream};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
