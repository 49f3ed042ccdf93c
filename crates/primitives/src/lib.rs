//! Leaf types shared by the registry, data and content crates.
//!
//! - [`ResourceId`]: the `(namespace, name)` key every registry is indexed by.
//! - [`Priority`]: named priority levels for data sources and data types.

mod id;
mod priority;

pub use id::{IdError, MAX_ID_LEN, ResourceId, is_valid_name, is_valid_namespace};
pub use priority::Priority;
