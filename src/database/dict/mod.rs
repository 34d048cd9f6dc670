pub mod dict_base;
pub mod dict_type;
pub mod entry;
pub mod iter;
pub mod resize;
pub mod stats;

mod sampling;
mod scan;
mod table;

// Publicly re-export the dictionary API from the submodules to simplify
// access from external code.
pub use dict_base::*;
pub use dict_type::*;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use iter::{DictIter, SafeIter, UnsafeIter};
pub use resize::{disable_resize, enable_resize, resize_enabled, suppress_resize, ResizeSuppression};
pub use stats::{DictStats, TableStats, STATS_VECTLEN};
pub use table::EntryId;
