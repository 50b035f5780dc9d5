//! Parsers for the text formats the documentation is built from: the
//! `[section key=value]` scene/resource format and annotated scripts.

pub mod dott;
pub mod entry;
pub mod fields;
pub mod script;

pub use dott::{parse_resource_body, parse_resource_header, parse_scene_body, parse_scene_header, Lookups};
pub use entry::EntryStream;
pub use fields::{decode_entry, EntryFields};
pub use script::parse_script;
