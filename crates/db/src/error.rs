use gharpayy_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules.
///
/// Plain CRUD methods return `sqlx::Error` directly; methods that check an
/// invariant inside a transaction (room counts, status transitions) return
/// this so the caller can tell a rule violation from a database failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            DbError::Core(e) => Some(e),
            DbError::Sqlx(_) => None,
        }
    }
}
