//! Configuration infrastructure
//!
//! Named table layouts, the text encoding used for repair, and logging
//! settings. Loaded from TOML or JSON through the `config` crate with
//! `TABLE_HARVEST_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

use crate::domain::LabelDictionary;
use crate::infrastructure::html::compile_selector;
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
use crate::infrastructure::text::TextNormalizer;

/// Default configuration values
pub mod defaults {
    /// Fallback encoding for byte input that is not valid UTF-8
    pub const ENCODING: &str = "utf-8";

    /// Decorative inline elements dropped from label and cell text
    pub const DECORATIVE_SELECTOR: &str = "i";

    /// Header rows are selected separately from content rows
    pub const FIRST_ROW_HEADER: bool = false;

    /// Whitespace text between cells does not count as a column
    pub const IGNORE_TEXT_NODES: bool = true;

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    /// Prefix of environment variable overrides, e.g. `TABLE_HARVEST_ENCODING`
    pub const ENV_PREFIX: &str = "TABLE_HARVEST";
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Module-specific log level filters (e.g., "html5ever": "warn")
    pub module_filters: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            module_filters: BTreeMap::from([
                ("html5ever".to_string(), "warn".to_string()),
                ("selectors".to_string(), "warn".to_string()),
            ]),
        }
    }
}

fn default_first_row_header() -> bool {
    defaults::FIRST_ROW_HEADER
}

fn default_ignore_text_nodes() -> bool {
    defaults::IGNORE_TEXT_NODES
}

fn default_decorative_selector() -> String {
    defaults::DECORATIVE_SELECTOR.to_string()
}

/// A horizontal table: one record per content row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub header_selector: String,
    pub content_selector: String,
    pub dictionary: LabelDictionary,
    #[serde(default = "default_first_row_header")]
    pub first_row_header: bool,
    #[serde(default = "default_ignore_text_nodes")]
    pub ignore_text_nodes: bool,
    #[serde(default = "default_decorative_selector")]
    pub decorative_selector: String,
    /// Keys every extracted record must carry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_keys: Vec<String>,
}

impl TableLayout {
    #[must_use]
    pub fn new(
        header_selector: impl Into<String>,
        content_selector: impl Into<String>,
        dictionary: LabelDictionary,
    ) -> Self {
        Self {
            header_selector: header_selector.into(),
            content_selector: content_selector.into(),
            dictionary,
            first_row_header: defaults::FIRST_ROW_HEADER,
            ignore_text_nodes: defaults::IGNORE_TEXT_NODES,
            decorative_selector: defaults::DECORATIVE_SELECTOR.to_string(),
            required_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_first_row_header(mut self, first_row_header: bool) -> Self {
        self.first_row_header = first_row_header;
        self
    }

    #[must_use]
    pub fn with_ignore_text_nodes(mut self, ignore_text_nodes: bool) -> Self {
        self.ignore_text_nodes = ignore_text_nodes;
        self
    }

    #[must_use]
    pub fn with_decorative_selector(mut self, decorative_selector: impl Into<String>) -> Self {
        self.decorative_selector = decorative_selector.into();
        self
    }

    #[must_use]
    pub fn with_required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self, name: &str) -> ParsingResult<()> {
        validate_selector(name, "header_selector", &self.header_selector)?;
        validate_selector(name, "content_selector", &self.content_selector)?;
        validate_selector(name, "decorative_selector", &self.decorative_selector)?;
        validate_dictionary(name, &self.dictionary)
    }
}

/// A vertical table: label/value rows folded into a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalLayout {
    pub row_selector: String,
    pub header_selector: String,
    pub content_selector: String,
    pub dictionary: LabelDictionary,
    #[serde(default = "default_decorative_selector")]
    pub decorative_selector: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_keys: Vec<String>,
}

impl VerticalLayout {
    #[must_use]
    pub fn new(
        row_selector: impl Into<String>,
        header_selector: impl Into<String>,
        content_selector: impl Into<String>,
        dictionary: LabelDictionary,
    ) -> Self {
        Self {
            row_selector: row_selector.into(),
            header_selector: header_selector.into(),
            content_selector: content_selector.into(),
            dictionary,
            decorative_selector: defaults::DECORATIVE_SELECTOR.to_string(),
            required_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_decorative_selector(mut self, decorative_selector: impl Into<String>) -> Self {
        self.decorative_selector = decorative_selector.into();
        self
    }

    #[must_use]
    pub fn with_required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self, name: &str) -> ParsingResult<()> {
        validate_selector(name, "row_selector", &self.row_selector)?;
        validate_selector(name, "header_selector", &self.header_selector)?;
        validate_selector(name, "content_selector", &self.content_selector)?;
        validate_selector(name, "decorative_selector", &self.decorative_selector)?;
        validate_dictionary(name, &self.dictionary)
    }
}

/// Complete extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// WHATWG label of the fallback encoding used to repair byte input
    pub encoding: String,

    /// Horizontal table layouts by name
    pub tables: HashMap<String, TableLayout>,

    /// Vertical table layouts by name
    pub vertical_tables: HashMap<String, VerticalLayout>,

    pub logging: LoggingConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            encoding: defaults::ENCODING.to_string(),
            tables: HashMap::new(),
            vertical_tables: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Load from a TOML/JSON/YAML file, then apply `TABLE_HARVEST_*` overrides.
    ///
    /// Nested keys use a double underscore: `TABLE_HARVEST_LOGGING__LEVEL=debug`.
    pub fn from_file(path: impl AsRef<Path>) -> ParsingResult<Self> {
        Self::load(path.as_ref(), None)
    }

    /// `environment` replaces the process environment when given
    fn load(path: &Path, environment: Option<config::Map<String, String>>) -> ParsingResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(environment),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!(
            "Loaded {} table and {} vertical layouts from {}",
            config.tables.len(),
            config.vertical_tables.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load from an in-memory document, without environment overrides
    pub fn from_str(source: &str, format: config::FileFormat) -> ParsingResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, format))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, layout: TableLayout) -> Self {
        self.tables.insert(name.into(), layout);
        self
    }

    #[must_use]
    pub fn with_vertical_table(mut self, name: impl Into<String>, layout: VerticalLayout) -> Self {
        self.vertical_tables.insert(name.into(), layout);
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Normalizer for the configured fallback encoding
    pub fn normalizer(&self) -> ParsingResult<TextNormalizer> {
        TextNormalizer::with_encoding_label(&self.encoding)
    }

    pub fn validate(&self) -> ParsingResult<()> {
        self.normalizer()?;
        for (name, layout) in &self.tables {
            layout.validate(name)?;
        }
        for (name, layout) in &self.vertical_tables {
            layout.validate(name)?;
        }
        Ok(())
    }
}

fn validate_selector(layout: &str, field: &str, selector: &str) -> ParsingResult<()> {
    if selector.trim().is_empty() {
        return Err(ParsingError::configuration(format!(
            "{layout}: {field} must not be empty"
        )));
    }
    compile_selector(selector).map(|_| ())
}

fn validate_dictionary(layout: &str, dictionary: &LabelDictionary) -> ParsingResult<()> {
    if dictionary.is_empty() {
        return Err(ParsingError::configuration(format!(
            "{layout}: dictionary must not be empty"
        )));
    }
    if let Some(entry) = dictionary.iter().find(|entry| entry.key.is_empty()) {
        return Err(ParsingError::InvalidDictionaryEntry {
            key: entry.key.clone(),
            reason: format!("{layout}: keys must not be empty"),
        });
    }
    Ok(())
}
