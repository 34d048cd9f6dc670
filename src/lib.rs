//! Foundational in-memory data structures for Zumic.
//!
//! The centerpiece is [`Dict`], a chained hash table that grows in powers of
//! two and moves its entries to the new table incrementally, a few buckets
//! per operation, so no single call pays for a full rehash. Around it live
//! the helpers a key-value engine needs: a doubly linked [`List`], the
//! compact sorted [`IntSet`], the binary-safe string [`Sds`] and a partial
//! quicksort ([`pqsort`]).

/// Dictionary tunables loaded through the `config` crate.
pub mod config;
/// Data structures: Dict, List, IntSet, Sds, pqsort.
pub mod database;
/// Error types for every module.
pub mod error;
/// `tracing` subscriber setup.
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Tunables.
pub use crate::config::DictConfig;
/// Data types.
pub use database::{
    pqsort, pqsort_by, DefaultDictType, Dict, DictType, Direction, Entry, IntSet,
    IntSetEncoding, List, Sds,
};
/// Operation errors and result types.
pub use error::{ConfigError, DictError, DictResult, LoggingError};
/// Logging.
pub use logging::{init_logging, LoggingConfig};
