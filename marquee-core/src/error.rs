use thiserror::Error;

/// Error taxonomy shared by repositories and services.
///
/// Repositories translate store failures into these variants so no caller
/// ever inspects a store-specific error code: unique-constraint violations
/// become [`CatalogError::Conflict`], foreign-key violations become
/// [`CatalogError::Validation`], everything else is flattened into
/// [`CatalogError::Internal`] with the detail kept for the log.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
