//! HTML table parsing infrastructure
//!
//! Label translation, header mapping and content row extraction over any
//! [`MarkupNode`](crate::domain::MarkupNode) document, the horizontal and
//! vertical table orchestration built on them, and a config-driven parser.

pub mod content_extractor;
pub mod header_mapper;
pub mod label_translator;
pub mod options;
pub mod table;
pub mod table_parser;
pub mod validation;

#[cfg(test)]
mod test_support;

// Re-export public types
pub use content_extractor::{default_parser, default_parser_with, extract_rows};
pub use header_mapper::build_header_map;
pub use label_translator::{translate_label_to_key, translate_label_to_key_with};
pub use options::{
    ColumnParser, ColumnParsers, CompiledSelector, ContentOptions, HeaderOptions, RowFilter,
    TableOptions, TextCleanup, VerticalTableOptions,
};
pub use table::{parse_table, parse_vertical_table};
pub use table_parser::{CompiledTable, CompiledVertical, TableParser};
pub use validation::RequiredKeys;

use crate::infrastructure::parsing_error::ParsingResult;
use anyhow::Result;

/// Generic HTML parser trait for type-safe parsing
pub trait HtmlParser {
    type Output;
    type Config;

    /// Parse HTML content with given configuration
    fn parse(&self, html: &str, config: &Self::Config) -> Result<Self::Output>;
}

/// Validation trait for parsed results
pub trait Validator<T: ?Sized> {
    /// Validate parsed data for completeness and correctness
    fn validate(&self, data: &T) -> ParsingResult<()>;
}
