//! Translator module for the migration engine.
//!
//! Converts legacy collection and field definitions into the target schema
//! representation.

mod collection;
mod field;
mod options;
mod tables;

pub use collection::translate_collection;
pub use field::{invalid_json_default, translate_field};
pub use options::translate_options;
