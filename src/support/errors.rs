use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Persistence: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }
}

/// Failure to hand a cost event to a downstream consumer.
///
/// Never propagated to API callers; the costing service logs and counts it.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Rejected by downstream with status {0}")]
    Rejected(u16),
}
