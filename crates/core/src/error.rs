#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Index {index} out of range for {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },
}
