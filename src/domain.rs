//! Domain module - table extraction value types
//!
//! Records, header maps and label dictionaries, plus the markup capability the
//! extraction pipeline is written against.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod label;
pub mod markup;
pub mod record;

pub use label::{LabelDictionary, LabelEntry, LabelEntryConfig, Matcher};
pub use markup::MarkupNode;
pub use record::{HeaderMap, Record, TableData, Value};
