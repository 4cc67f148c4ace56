use thiserror::Error;

/// Errors that can occur when reading or writing stored records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record that an operation needs to modify does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An insert collided with a unique field of an existing record.
    #[error("{entity} with {field} {value} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A stored row could not be turned back into a record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The backing store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
