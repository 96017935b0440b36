//! Table Harvest - label-driven HTML table extraction
//!
//! Maps the header labels of an HTML table to caller-defined keys through a
//! label dictionary, then turns each content row into a keyed record.
//! Vertical (label/value) tables fold into a single record.

pub mod domain;
pub mod infrastructure;

pub use domain::{HeaderMap, LabelDictionary, MarkupNode, Matcher, Record, TableData, Value};
pub use infrastructure::parsing::{
    build_header_map, default_parser, default_parser_with, extract_rows, parse_table,
    parse_vertical_table, translate_label_to_key, translate_label_to_key_with,
};
pub use infrastructure::text::{content_hash, decode_entities, encode_entities, normalize, record_hash};
pub use infrastructure::{
    ColumnParsers, CompiledSelector, CompiledTable, CompiledVertical, ContentOptions,
    ExtractionConfig, HeaderOptions, HtmlDocument, HtmlNode, HtmlParser, ParsingError,
    ParsingResult, RequiredKeys, TableLayout, TableOptions, TableParser, TextCleanup,
    TextNormalizer, Validator, VerticalLayout, VerticalTableOptions,
};
