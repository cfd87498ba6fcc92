use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

/// Outcome of a failed subscription insert.
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// The address is already in the `subscribers` table (UNIQUE violation)
    #[error("Email already subscribed")]
    AlreadySubscribed,

    #[error("Failed to save subscriber: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for SubscribeError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                SubscribeError::AlreadySubscribed
            }
            _ => SubscribeError::Database(err),
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// Subscriber row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub subscribed_at: String,
}
