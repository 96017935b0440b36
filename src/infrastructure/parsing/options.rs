//! Per-call options and caller-supplied callbacks
//!
//! Option structures are plain data built with chained `with_*` setters.
//! Their selectors are compiled when the options are built.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::domain::{HeaderMap, LabelDictionary, MarkupNode, Record};
use crate::infrastructure::config::defaults;
use crate::infrastructure::text::TextNormalizer;

/// Custom extraction for one column: `(cell, record, key)`.
///
/// The cell is `None` when the row has no child at the column's index. The
/// parser may write any keys it likes into the record.
pub type ColumnParser<'p, N> = Box<dyn Fn(Option<&N>, &mut Record, &str) -> anyhow::Result<()> + 'p>;

/// Row acceptance test: `(record, row children, header map)`
pub type RowFilter<'p, N> = Box<dyn Fn(&Record, &[N], &HeaderMap) -> anyhow::Result<bool> + 'p>;

/// Column key to custom parser registry
pub struct ColumnParsers<'p, N> {
    parsers: HashMap<String, ColumnParser<'p, N>>,
}

impl<N> Default for ColumnParsers<'_, N> {
    fn default() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }
}

impl<'p, N> ColumnParsers<'p, N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `parser` for `key`, builder style
    #[must_use]
    pub fn with<F>(mut self, key: impl Into<String>, parser: F) -> Self
    where
        F: Fn(Option<&N>, &mut Record, &str) -> anyhow::Result<()> + 'p,
    {
        self.insert(key, parser);
        self
    }

    pub fn insert<F>(&mut self, key: impl Into<String>, parser: F)
    where
        F: Fn(Option<&N>, &mut Record, &str) -> anyhow::Result<()> + 'p,
    {
        self.parsers.insert(key.into(), Box::new(parser));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ColumnParser<'p, N>> {
        self.parsers.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl<N> fmt::Debug for ColumnParsers<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.parsers.keys()).finish()
    }
}

/// A selector string together with its compiled form.
///
/// Compilation happens once, at construction. A rejected selector is logged
/// and kept without a compiled form; extraction calls then soft-fail.
pub struct CompiledSelector<N: MarkupNode> {
    source: String,
    compiled: Option<N::Selector>,
}

impl<N: MarkupNode> CompiledSelector<N> {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = match N::compile(&source) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Selector rejected: {}", e);
                None
            }
        };
        Self { source, compiled }
    }

    /// Wrap a selector that was already compiled
    #[must_use]
    pub fn from_compiled(source: impl Into<String>, compiled: N::Selector) -> Self {
        Self {
            source: source.into(),
            compiled: Some(compiled),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `None` when the selector was rejected
    #[must_use]
    pub const fn compiled(&self) -> Option<&N::Selector> {
        self.compiled.as_ref()
    }
}

impl<N: MarkupNode> Clone for CompiledSelector<N> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            compiled: self.compiled.clone(),
        }
    }
}

impl<N: MarkupNode> fmt::Debug for CompiledSelector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSelector")
            .field("source", &self.source)
            .field("valid", &self.compiled.is_some())
            .finish()
    }
}

/// Text cleanup applied to labels and default-extracted cells
pub struct TextCleanup<N: MarkupNode> {
    normalizer: TextNormalizer,
    /// Decorative inline nodes (icons) left out of the text
    decorative: CompiledSelector<N>,
}

impl<N: MarkupNode> Default for TextCleanup<N> {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), defaults::DECORATIVE_SELECTOR)
    }
}

impl<N: MarkupNode> TextCleanup<N> {
    #[must_use]
    pub fn new(normalizer: TextNormalizer, decorative_selector: impl Into<String>) -> Self {
        Self::from_compiled(normalizer, CompiledSelector::new(decorative_selector))
    }

    #[must_use]
    pub const fn from_compiled(normalizer: TextNormalizer, decorative: CompiledSelector<N>) -> Self {
        Self {
            normalizer,
            decorative,
        }
    }

    #[must_use]
    pub const fn normalizer(&self) -> TextNormalizer {
        self.normalizer
    }

    #[must_use]
    pub fn decorative_selector(&self) -> &str {
        self.decorative.source()
    }

    /// Normalized text of `node` without its decorative descendants.
    ///
    /// A rejected decorative selector keeps the decorative nodes.
    #[must_use]
    pub fn clean_text(&self, node: &N) -> String {
        let raw = match self.decorative.compiled() {
            Some(decorative) => node.text_excluding(decorative),
            None => node.text(),
        };
        self.normalizer.clean(&raw)
    }
}

impl<N: MarkupNode> Clone for TextCleanup<N> {
    fn clone(&self) -> Self {
        Self {
            normalizer: self.normalizer,
            decorative: self.decorative.clone(),
        }
    }
}

impl<N: MarkupNode> fmt::Debug for TextCleanup<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCleanup")
            .field("normalizer", &self.normalizer)
            .field("decorative", &self.decorative)
            .finish()
    }
}

/// Options for [`build_header_map`](super::build_header_map)
#[derive(Debug, Clone)]
pub struct HeaderOptions<N: MarkupNode> {
    /// Selector for header rows
    pub selector: CompiledSelector<N>,
    pub dictionary: LabelDictionary,
    /// Map only the first selected row
    pub first_row_header: bool,
    /// Skip text-node rows and leave text children out of column indexes
    pub ignore_text_nodes: bool,
    pub cleanup: TextCleanup<N>,
}

impl<N: MarkupNode> HeaderOptions<N> {
    #[must_use]
    pub fn new(selector: impl Into<String>, dictionary: LabelDictionary) -> Self {
        Self {
            selector: CompiledSelector::new(selector),
            dictionary,
            first_row_header: defaults::FIRST_ROW_HEADER,
            ignore_text_nodes: defaults::IGNORE_TEXT_NODES,
            cleanup: TextCleanup::default(),
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
    pub fn with_cleanup(mut self, cleanup: TextCleanup<N>) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Options for [`extract_rows`](super::extract_rows)
pub struct ContentOptions<'p, N: MarkupNode> {
    /// Selector for content rows
    pub selector: CompiledSelector<N>,
    pub header_map: HeaderMap,
    pub column_parsers: ColumnParsers<'p, N>,
    /// Skip the first selected row as the header
    pub first_row_header: bool,
    pub ignore_text_nodes: bool,
    pub filter: Option<RowFilter<'p, N>>,
    pub cleanup: TextCleanup<N>,
}

impl<'p, N: MarkupNode> ContentOptions<'p, N> {
    #[must_use]
    pub fn new(selector: impl Into<String>, header_map: HeaderMap) -> Self {
        Self {
            selector: CompiledSelector::new(selector),
            header_map,
            column_parsers: ColumnParsers::new(),
            first_row_header: defaults::FIRST_ROW_HEADER,
            ignore_text_nodes: defaults::IGNORE_TEXT_NODES,
            filter: None,
            cleanup: TextCleanup::default(),
        }
    }

    #[must_use]
    pub fn with_column_parsers(mut self, column_parsers: ColumnParsers<'p, N>) -> Self {
        self.column_parsers = column_parsers;
        self
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
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Record, &[N], &HeaderMap) -> anyhow::Result<bool> + 'p,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: TextCleanup<N>) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Options for [`parse_table`](super::parse_table)
pub struct TableOptions<'p, N: MarkupNode> {
    pub header_selector: CompiledSelector<N>,
    pub content_selector: CompiledSelector<N>,
    pub dictionary: LabelDictionary,
    pub column_parsers: ColumnParsers<'p, N>,
    /// Header and content share one selector; the first row is the header
    pub first_row_header: bool,
    pub ignore_text_nodes: bool,
    pub filter: Option<RowFilter<'p, N>>,
    pub cleanup: TextCleanup<N>,
}

impl<'p, N: MarkupNode> TableOptions<'p, N> {
    #[must_use]
    pub fn new(
        header_selector: impl Into<String>,
        content_selector: impl Into<String>,
        dictionary: LabelDictionary,
    ) -> Self {
        Self::from_selectors(
            CompiledSelector::new(header_selector),
            CompiledSelector::new(content_selector),
            dictionary,
            TextCleanup::default(),
        )
    }

    /// Build from selectors and cleanup that were compiled up front
    #[must_use]
    pub fn from_selectors(
        header_selector: CompiledSelector<N>,
        content_selector: CompiledSelector<N>,
        dictionary: LabelDictionary,
        cleanup: TextCleanup<N>,
    ) -> Self {
        Self {
            header_selector,
            content_selector,
            dictionary,
            column_parsers: ColumnParsers::new(),
            first_row_header: defaults::FIRST_ROW_HEADER,
            ignore_text_nodes: defaults::IGNORE_TEXT_NODES,
            filter: None,
            cleanup,
        }
    }

    #[must_use]
    pub fn with_column_parsers(mut self, column_parsers: ColumnParsers<'p, N>) -> Self {
        self.column_parsers = column_parsers;
        self
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
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Record, &[N], &HeaderMap) -> anyhow::Result<bool> + 'p,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: TextCleanup<N>) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Options for [`parse_vertical_table`](super::parse_vertical_table)
pub struct VerticalTableOptions<'p, N: MarkupNode> {
    /// Selector for the rows; each row contributes at most one key
    pub row_selector: CompiledSelector<N>,
    /// Selector for the label cell, scoped to the row
    pub header_selector: CompiledSelector<N>,
    /// Selector for the value cell, scoped to the row
    pub content_selector: CompiledSelector<N>,
    pub dictionary: LabelDictionary,
    pub column_parsers: ColumnParsers<'p, N>,
    pub cleanup: TextCleanup<N>,
}

impl<'p, N: MarkupNode> VerticalTableOptions<'p, N> {
    #[must_use]
    pub fn new(
        row_selector: impl Into<String>,
        header_selector: impl Into<String>,
        content_selector: impl Into<String>,
        dictionary: LabelDictionary,
    ) -> Self {
        Self::from_selectors(
            CompiledSelector::new(row_selector),
            CompiledSelector::new(header_selector),
            CompiledSelector::new(content_selector),
            dictionary,
            TextCleanup::default(),
        )
    }

    /// Build from selectors and cleanup that were compiled up front
    #[must_use]
    pub fn from_selectors(
        row_selector: CompiledSelector<N>,
        header_selector: CompiledSelector<N>,
        content_selector: CompiledSelector<N>,
        dictionary: LabelDictionary,
        cleanup: TextCleanup<N>,
    ) -> Self {
        Self {
            row_selector,
            header_selector,
            content_selector,
            dictionary,
            column_parsers: ColumnParsers::new(),
            cleanup,
        }
    }

    #[must_use]
    pub fn with_column_parsers(mut self, column_parsers: ColumnParsers<'p, N>) -> Self {
        self.column_parsers = column_parsers;
        self
    }

    #[must_use]
    pub fn with_cleanup(mut self, cleanup: TextCleanup<N>) -> Self {
        self.cleanup = cleanup;
        self
    }
}
