use thiserror::Error;

use crate::types::{DecodeError, KeyValidationError};

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum StorageError {
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
    #[error("key already exists: {key}")]
    KeyAlreadyExists { key: String },
    #[error("storage error: {message}")]
    Internal { message: String },
}

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::KeyAlreadyExists { key: key.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Self::KeyNotFound { key } => Some(key),
            Self::KeyAlreadyExists { key } => Some(key),
            Self::Internal { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    pub fn key_already_exists(&self) -> bool {
        matches!(self, Self::KeyAlreadyExists { .. })
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by table operations: CRUD, query/scan, and item validation.
///
/// Roughly mirrors the hosted service's error taxonomy: validation failures
/// (bad keys, bad expressions), resource-state failures (missing table/index),
/// conditional-check failures, and internal/storage failures.
#[derive(Debug, Clone, Error)]
pub enum TableError {
    #[error("{0}")]
    InvalidKey(#[from] KeyValidationError),

    #[error("item not found")]
    ItemNotFound,

    #[error("item already exists")]
    ItemAlreadyExists,

    #[error("conditional check failed")]
    ConditionFailed,

    #[error("update error: {0}")]
    UpdateError(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("index not found: {0}")]
    IndexNotFound(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("table is not active: {0}")]
    TableNotActive(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("provisioned throughput exceeded")]
    ThroughputExceeded,

    #[error("transaction cancelled")]
    TransactionCancelled(Vec<TransactionCancelReason>),
}

impl TableError {
    pub fn update_error(message: impl Into<String>) -> Self {
        Self::UpdateError(message.into())
    }

    pub fn index_not_found(name: impl Into<String>) -> Self {
        Self::IndexNotFound(name.into())
    }

    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound(name.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound)
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey(_))
    }

    pub fn is_condition_failed(&self) -> bool {
        matches!(self, Self::ConditionFailed)
    }

    pub fn item_already_exists(&self) -> bool {
        matches!(self, Self::ItemAlreadyExists)
    }

    pub fn is_update_error(&self) -> bool {
        matches!(self, Self::UpdateError(_))
    }

    pub fn is_index_not_found(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }

    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_transaction_canceled(&self) -> bool {
        matches!(self, Self::TransactionCancelled(_))
    }

    /// Errors the batch/transaction coordinators treat as retriable (the
    /// sub-request is moved to unprocessed/cancelled output rather than
    /// aborting the whole request).
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::ThroughputExceeded)
    }
}

impl From<StorageError> for TableError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<DecodeError> for TableError {
    fn from(err: DecodeError) -> Self {
        Self::Encoding(err.to_string())
    }
}

pub type TableResult<T> = Result<T, TableError>;

/// Result of evaluating a condition/filter/key-condition expression.
pub type EvalResult = TableResult<bool>;

/// Per-item cancellation code reported alongside a failed TransactWriteItems
/// call, mirroring the hosted service's CancellationReasons shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionCancelReason {
    None,
    ConditionalCheckFailed,
    ItemNotFound,
    DuplicateRequest,
    ValidationError,
}

impl TransactionCancelReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ConditionalCheckFailed => "ConditionalCheckFailed",
            Self::ItemNotFound => "ItemNotFound",
            Self::DuplicateRequest => "DuplicateRequest",
            Self::ValidationError => "ValidationError",
        }
    }
}

impl std::fmt::Display for TransactionCancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
