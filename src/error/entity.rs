use thiserror::Error;

/// A requested entity (a stored chapter, for instance) does not exist.
///
/// Storage backends return it inside an [`anyhow::Error`]; the HTTP layer
/// recovers it with `downcast_ref` and answers `404`.
///
/// # Example
/// ```
/// use pdf_vault::error::entity::NotFoundError;
///
/// let err = anyhow::Error::from(NotFoundError::new("Chapter"));
/// assert_eq!(err.to_string(), "Chapter not found");
/// assert_eq!(err.downcast_ref::<NotFoundError>().unwrap().entity, "Chapter");
/// ```
#[derive(Debug, Error)]
#[error("{entity} not found")]
pub struct NotFoundError {
    /// Name of the missing entity.
    pub entity: &'static str,
}

impl NotFoundError {
    pub fn new(entity: &'static str) -> Self {
        Self { entity }
    }
}
