pub mod list_base;

pub use list_base::*;
