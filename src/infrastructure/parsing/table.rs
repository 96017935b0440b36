//! Horizontal and vertical table orchestration
//!
//! Horizontal tables yield one record per content row, with columns resolved
//! through a header map. Vertical tables yield a single record: each row
//! carries one label cell (the key) and one value cell.

use tracing::debug;

use super::content_extractor::{RowScan, apply_column_parser};
use super::header_mapper::HeaderScan;
use super::label_translator::resolve_column_key;
use super::options::{TableOptions, VerticalTableOptions};
use crate::domain::{MarkupNode, Record, TableData};

/// Map the header row(s), then extract the content rows with that map.
///
/// `Ok(None)` when the document is missing, no header map could be built, or
/// content row selection was rejected.
pub fn parse_table<N: MarkupNode>(
    document: Option<&N>,
    options: &TableOptions<'_, N>,
) -> anyhow::Result<Option<TableData>> {
    let Some(document) = document else {
        debug!("No document given for table extraction");
        return Ok(None);
    };

    let header_scan = HeaderScan {
        selector: &options.header_selector,
        dictionary: &options.dictionary,
        first_row_header: options.first_row_header,
        ignore_text_nodes: options.ignore_text_nodes,
        cleanup: &options.cleanup,
    };
    let Some(header_map) = header_scan.run(document) else {
        return Ok(None);
    };

    let row_scan = RowScan {
        selector: &options.content_selector,
        header_map: &header_map,
        column_parsers: &options.column_parsers,
        first_row_header: options.first_row_header,
        ignore_text_nodes: options.ignore_text_nodes,
        filter: options.filter.as_ref(),
        cleanup: &options.cleanup,
    };
    let Some(data) = row_scan.run(document)? else {
        return Ok(None);
    };

    Ok(Some(TableData { header_map, data }))
}

/// Fold label/value rows into one record.
///
/// Rows whose label cell is missing, empty, or unknown to the dictionary are
/// skipped. The label and value cells are the first matches of their
/// selectors inside the row. `Ok(None)` when the document is missing or any
/// selector is rejected.
pub fn parse_vertical_table<N: MarkupNode>(
    document: Option<&N>,
    options: &VerticalTableOptions<'_, N>,
) -> anyhow::Result<Option<Record>> {
    let Some(document) = document else {
        debug!("No document given for vertical table extraction");
        return Ok(None);
    };

    let (Some(row_selector), Some(header_selector), Some(content_selector)) = (
        options.row_selector.compiled(),
        options.header_selector.compiled(),
        options.content_selector.compiled(),
    ) else {
        debug!("Vertical table selectors were rejected");
        return Ok(None);
    };

    let rows = document.select(row_selector);
    let mut record = Record::new();
    for row in &rows {
        let header = first_match(row, header_selector);
        let Some(key) = resolve_column_key(header.as_ref(), &options.dictionary, &options.cleanup) else {
            continue;
        };

        let content = first_match(row, content_selector);
        apply_column_parser(
            &options.column_parsers,
            content.as_ref(),
            &mut record,
            &key,
            &options.cleanup,
        )?;
    }

    debug!("Extracted {} fields from {} vertical rows", record.len(), rows.len());
    Ok(Some(record))
}

fn first_match<N: MarkupNode>(row: &N, selector: &N::Selector) -> Option<N> {
    row.select(selector).into_iter().next()
}
