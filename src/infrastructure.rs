//! Infrastructure layer for HTML table extraction
//!
//! This module provides the scraper-backed document model, text
//! normalization, table parsing, configuration loading and logging.

pub mod config; // Layouts, logging settings and defaults
pub mod html; // scraper-backed MarkupNode implementation
pub mod logging; // Logging infrastructure
pub mod parsing; // Header mapping and row extraction
pub mod parsing_error; // Error types
pub mod text; // Whitespace, entities, encoding repair and hashing

// Re-export commonly used items
pub use config::{ExtractionConfig, LoggingConfig, TableLayout, VerticalLayout};
pub use html::{HtmlDocument, HtmlNode};
pub use logging::{init_default_logging, init_logging};
pub use parsing::{
    ColumnParsers, CompiledSelector, CompiledTable, CompiledVertical, ContentOptions,
    HeaderOptions, HtmlParser, RequiredKeys, TableOptions, TableParser, TextCleanup, Validator,
    VerticalTableOptions,
};
pub use parsing_error::{ParsingError, ParsingResult};
pub use text::TextNormalizer;
