//! Config-driven table parser
//!
//! Holds a validated [`ExtractionConfig`] and runs its named layouts over
//! HTML source.

use std::collections::HashMap;
use std::path::Path;

use scraper::Selector;
use tracing::debug;

use super::options::{CompiledSelector, TableOptions, TextCleanup, VerticalTableOptions};
use super::table::{parse_table, parse_vertical_table};
use super::validation::RequiredKeys;
use super::{HtmlParser, Validator};
use crate::domain::{Record, TableData};
use crate::infrastructure::config::{ExtractionConfig, TableLayout, VerticalLayout};
use crate::infrastructure::html::{HtmlDocument, HtmlNode, compile_selector};
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
use crate::infrastructure::text::TextNormalizer;

/// A horizontal layout with its selectors compiled
#[derive(Debug, Clone)]
pub struct CompiledTable {
    layout: TableLayout,
    header: Selector,
    content: Selector,
    decorative: Selector,
}

impl CompiledTable {
    pub fn compile(layout: TableLayout) -> ParsingResult<Self> {
        Ok(Self {
            header: compile_selector(&layout.header_selector)?,
            content: compile_selector(&layout.content_selector)?,
            decorative: compile_selector(&layout.decorative_selector)?,
            layout,
        })
    }

    #[must_use]
    pub const fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Options reusing the compiled selectors, ready for column parsers or a row filter
    #[must_use]
    pub fn options<'p, 'd>(&self, normalizer: TextNormalizer) -> TableOptions<'p, HtmlNode<'d>> {
        let layout = &self.layout;
        TableOptions::from_selectors(
            CompiledSelector::from_compiled(layout.header_selector.as_str(), self.header.clone()),
            CompiledSelector::from_compiled(layout.content_selector.as_str(), self.content.clone()),
            layout.dictionary.clone(),
            cleanup(normalizer, &layout.decorative_selector, &self.decorative),
        )
        .with_first_row_header(layout.first_row_header)
        .with_ignore_text_nodes(layout.ignore_text_nodes)
    }
}

/// A vertical layout with its selectors compiled
#[derive(Debug, Clone)]
pub struct CompiledVertical {
    layout: VerticalLayout,
    row: Selector,
    header: Selector,
    content: Selector,
    decorative: Selector,
}

impl CompiledVertical {
    pub fn compile(layout: VerticalLayout) -> ParsingResult<Self> {
        Ok(Self {
            row: compile_selector(&layout.row_selector)?,
            header: compile_selector(&layout.header_selector)?,
            content: compile_selector(&layout.content_selector)?,
            decorative: compile_selector(&layout.decorative_selector)?,
            layout,
        })
    }

    #[must_use]
    pub const fn layout(&self) -> &VerticalLayout {
        &self.layout
    }

    #[must_use]
    pub fn options<'p, 'd>(&self, normalizer: TextNormalizer) -> VerticalTableOptions<'p, HtmlNode<'d>> {
        let layout = &self.layout;
        VerticalTableOptions::from_selectors(
            CompiledSelector::from_compiled(layout.row_selector.as_str(), self.row.clone()),
            CompiledSelector::from_compiled(layout.header_selector.as_str(), self.header.clone()),
            CompiledSelector::from_compiled(layout.content_selector.as_str(), self.content.clone()),
            layout.dictionary.clone(),
            cleanup(normalizer, &layout.decorative_selector, &self.decorative),
        )
    }
}

fn cleanup<'d>(normalizer: TextNormalizer, source: &str, decorative: &Selector) -> TextCleanup<HtmlNode<'d>> {
    TextCleanup::from_compiled(normalizer, CompiledSelector::from_compiled(source, decorative.clone()))
}

/// Parser for the table layouts of an [`ExtractionConfig`]
#[derive(Debug, Clone)]
pub struct TableParser {
    config: ExtractionConfig,
    normalizer: TextNormalizer,
    tables: HashMap<String, CompiledTable>,
    vertical_tables: HashMap<String, CompiledVertical>,
}

impl TableParser {
    /// Validate `config` and compile every layout it names
    pub fn new(config: ExtractionConfig) -> ParsingResult<Self> {
        config.validate()?;
        let normalizer = config.normalizer()?;

        let mut tables = HashMap::new();
        for (name, layout) in &config.tables {
            tables.insert(name.clone(), CompiledTable::compile(layout.clone())?);
        }
        let mut vertical_tables = HashMap::new();
        for (name, layout) in &config.vertical_tables {
            vertical_tables.insert(name.clone(), CompiledVertical::compile(layout.clone())?);
        }

        debug!(
            "Compiled {} table and {} vertical layouts",
            tables.len(),
            vertical_tables.len()
        );
        Ok(Self {
            config,
            normalizer,
            tables,
            vertical_tables,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> ParsingResult<Self> {
        Self::new(ExtractionConfig::from_file(path)?)
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    #[must_use]
    pub const fn normalizer(&self) -> TextNormalizer {
        self.normalizer
    }

    pub fn table_layout(&self, name: &str) -> ParsingResult<&CompiledTable> {
        self.tables.get(name).ok_or_else(|| ParsingError::UnknownLayout {
            name: name.to_string(),
        })
    }

    pub fn vertical_layout(&self, name: &str) -> ParsingResult<&CompiledVertical> {
        self.vertical_tables
            .get(name)
            .ok_or_else(|| ParsingError::UnknownLayout {
                name: name.to_string(),
            })
    }

    /// Options for `table`, ready for column parsers or a row filter
    #[must_use]
    pub fn table_options<'p, 'd>(&self, table: &CompiledTable) -> TableOptions<'p, HtmlNode<'d>> {
        table.options(self.normalizer)
    }

    #[must_use]
    pub fn vertical_options<'p, 'd>(&self, table: &CompiledVertical) -> VerticalTableOptions<'p, HtmlNode<'d>> {
        table.options(self.normalizer)
    }

    pub fn parse_vertical(&self, html: &str, table: &CompiledVertical) -> anyhow::Result<Option<Record>> {
        let document = HtmlDocument::parse_document(html);
        parse_vertical_table(Some(&document.root()), &self.vertical_options(table))
    }

    /// Run the named horizontal layout and check its required keys
    pub fn parse_named_table(&self, html: &str, name: &str) -> anyhow::Result<Option<TableData>> {
        let table = self.table_layout(name)?;
        let data = self.parse(html, table)?;

        if let Some(data) = &data {
            debug!("Layout '{}' produced {} rows", name, data.len());
            RequiredKeys::new(&table.layout().required_keys).validate(data)?;
        }
        Ok(data)
    }

    /// Run the named vertical layout and check its required keys
    pub fn parse_named_vertical(&self, html: &str, name: &str) -> anyhow::Result<Option<Record>> {
        let table = self.vertical_layout(name)?;
        let record = self.parse_vertical(html, table)?;

        if let Some(record) = &record {
            debug!("Layout '{}' produced {} fields", name, record.len());
            RequiredKeys::new(&table.layout().required_keys).validate(record)?;
        }
        Ok(record)
    }
}

impl HtmlParser for TableParser {
    type Output = Option<TableData>;
    type Config = CompiledTable;

    fn parse(&self, html: &str, config: &Self::Config) -> anyhow::Result<Self::Output> {
        let document = HtmlDocument::parse_document(html);
        parse_table(Some(&document.root()), &self.table_options(config))
    }
}
