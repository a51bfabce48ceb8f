//! Property-to-field mapping
//!
//! Translates human-readable property references into the concrete fields the
//! external store indexes them under.

pub mod datatype;
pub mod property;
pub mod store;

pub use datatype::DataType;
pub use property::PropertyFieldMapper;
pub use store::{MemoryPropertyStore, PropertyInfo, PropertyStore};
