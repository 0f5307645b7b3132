//! Crate-wide error type.
//!
//! Only conditions that stop a run are errors. "No samples" and "too few
//! samples after filtering" are ordinary analysis outcomes, see
//! [`AnalysisOutcome`](crate::analyzer::AnalysisOutcome).

/// Result alias used throughout padspan.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested brand/model pair is not in the catalog.
    #[error("tablet not found: {brand} {model}")]
    LookupFailure { brand: String, model: String },

    /// A JSON inventory was loaded but does not list the requested model.
    #[error("tablet model not found in inventory: {model}")]
    InventoryModelMissing { model: String },

    /// Catalog or inventory contents are structurally valid JSON but unusable.
    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// No pointer backend could be reached and the run is configured to abort.
    #[error("pointer position unavailable: {0}")]
    AcquisitionUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("selection cancelled")]
    SelectionCancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// `true` for both catalog and inventory misses. The binary exits with `1` on these.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Error::LookupFailure { .. } | Error::InventoryModelMissing { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_are_classified() {
        let miss = Error::LookupFailure {
            brand: "Wacom".into(),
            model: "Nope".into(),
        };
        assert!(miss.is_lookup_failure());
        assert_eq!(miss.to_string(), "tablet not found: Wacom Nope");

        let inv = Error::InventoryModelMissing { model: "X".into() };
        assert!(inv.is_lookup_failure());

        assert!(!Error::SelectionCancelled.is_lookup_failure());
        assert!(!Error::Config("bad".into()).is_lookup_failure());
    }
}
