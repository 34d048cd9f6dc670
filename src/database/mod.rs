pub mod dict;
pub mod intset;
pub mod list;
pub mod pqsort;
pub mod sds;

pub use dict::*;
pub use intset::*;
pub use list::*;
pub use pqsort::{pqsort, pqsort_by};
pub use sds::*;
