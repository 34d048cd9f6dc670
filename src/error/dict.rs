use thiserror::Error;

pub type DictResult<T> = Result<T, DictError>;

/// Ошибки операций над `Dict`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DictError {
    // ==== Ошибки ключей ====
    #[error("Key already exists")]
    KeyExists,

    #[error("Key not found")]
    KeyNotFound,

    // ==== Память ====
    #[error("Failed to allocate {buckets} buckets")]
    AllocationFailure { buckets: usize },

    // ==== Изменение размера ====
    #[error("Resize rejected: rehashing in progress")]
    RehashInProgress,

    #[error("Resize rejected: table already has {size} buckets")]
    SameSize { size: usize },

    #[error("Resize is disabled")]
    ResizeDisabled,

    // ==== Колбэки DictType ====
    #[error("Duplication failed: {0}")]
    DupFailed(String),

    // ==== Нарушение контракта итератора ====
    #[error("Fatal iterator misuse: fingerprint {expected:#018x} != {actual:#018x}")]
    FatalIteratorMisuse { expected: u64, actual: u64 },
}
