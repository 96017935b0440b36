//! Content row extraction driven by a header map

use serde_json::Value;
use tracing::{debug, trace};

use super::options::{ColumnParsers, CompiledSelector, ContentOptions, RowFilter, TextCleanup};
use crate::domain::{HeaderMap, MarkupNode, Record};

/// Default column extraction with the default text cleanup.
///
/// Writes the cleaned text of `cell` under `key`; a missing cell writes nothing.
pub fn default_parser<N: MarkupNode>(cell: Option<&N>, record: &mut Record, key: &str) {
    default_parser_with(cell, record, key, &TextCleanup::default());
}

/// [`default_parser`] with explicit cleanup settings
pub fn default_parser_with<N: MarkupNode>(
    cell: Option<&N>,
    record: &mut Record,
    key: &str,
    cleanup: &TextCleanup<N>,
) {
    let Some(cell) = cell else {
        return;
    };
    record.insert(key.to_string(), Value::String(cleanup.clean_text(cell)));
}

/// Run the custom parser registered for `key`, or the default extraction
pub(crate) fn apply_column_parser<N: MarkupNode>(
    column_parsers: &ColumnParsers<'_, N>,
    cell: Option<&N>,
    record: &mut Record,
    key: &str,
    cleanup: &TextCleanup<N>,
) -> anyhow::Result<()> {
    match column_parsers.get(key) {
        Some(parser) => parser(cell, record, key),
        None => {
            default_parser_with(cell, record, key, cleanup);
            Ok(())
        }
    }
}

/// Extract one record per selected content row.
///
/// `Ok(None)` means there was no document or the row selector was rejected.
/// Errors returned by column parsers or the row filter are passed through
/// untouched.
pub fn extract_rows<N: MarkupNode>(
    document: Option<&N>,
    options: &ContentOptions<'_, N>,
) -> anyhow::Result<Option<Vec<Record>>> {
    let Some(document) = document else {
        return Ok(None);
    };

    RowScan {
        selector: &options.selector,
        header_map: &options.header_map,
        column_parsers: &options.column_parsers,
        first_row_header: options.first_row_header,
        ignore_text_nodes: options.ignore_text_nodes,
        filter: options.filter.as_ref(),
        cleanup: &options.cleanup,
    }
    .run(document)
}

pub(crate) struct RowScan<'o, 'p, N: MarkupNode> {
    pub selector: &'o CompiledSelector<N>,
    pub header_map: &'o HeaderMap,
    pub column_parsers: &'o ColumnParsers<'p, N>,
    pub first_row_header: bool,
    pub ignore_text_nodes: bool,
    pub filter: Option<&'o RowFilter<'p, N>>,
    pub cleanup: &'o TextCleanup<N>,
}

impl<N: MarkupNode> RowScan<'_, '_, N> {
    pub fn run(&self, document: &N) -> anyhow::Result<Option<Vec<Record>>> {
        let Some(selector) = self.selector.compiled() else {
            debug!("Content selector '{}' was rejected", self.selector.source());
            return Ok(None);
        };
        let rows = document.select(selector);

        let mut data = Vec::new();
        let mut skip_header = self.first_row_header;
        let mut rejected = 0usize;

        for row in rows {
            if self.ignore_text_nodes && row.is_text() {
                continue;
            }
            if skip_header {
                skip_header = false;
                continue;
            }

            let cells = row.children(!self.ignore_text_nodes);
            let record = self.build_record(&cells)?;

            if let Some(filter) = self.filter {
                if !filter(&record, &cells, self.header_map)? {
                    rejected += 1;
                    trace!("Row rejected by filter: {:?}", record);
                    continue;
                }
            }
            data.push(record);
        }

        debug!(
            "Extracted {} rows with '{}' ({} rejected by filter)",
            data.len(),
            self.selector.source(),
            rejected
        );
        Ok(Some(data))
    }

    fn build_record(&self, cells: &[N]) -> anyhow::Result<Record> {
        let mut record = Record::new();
        for (key, index) in self.header_map.iter() {
            apply_column_parser(
                self.column_parsers,
                cells.get(index),
                &mut record,
                key,
                self.cleanup,
            )?;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::html::{HtmlDocument, HtmlNode};
    use anyhow::anyhow;
    use crate::infrastructure::parsing::test_support::record;
    use serde_json::json;

    const TABLE: &str = r#"
        <table>
          <thead>
            <tr>
              <th>number   </th>
              <th> complicated  stuff</th>
              <th>  my text</th>
              <th>some other stuff</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <td>111   </td>
              <td> aaa<span class="stuff">123ddd</span> bb</td>
              <td>aaa</td>
              <td>ccc</td>
            </tr>
            <tr>
              <td>222</td>
              <td>cc567<span class="stuff">890eee11</span></td>
              <td>   bbb</td>
              <td>ddd</td>
            </tr>
          </tbody>
        </table>"#;

    fn split_stuff<N: MarkupNode>(cell: Option<&N>, record: &mut Record, key: &str) -> anyhow::Result<()> {
        let stuff = match cell {
            Some(cell) => cell
                .select_all(".stuff")?
                .iter()
                .map(MarkupNode::text)
                .collect::<String>(),
            None => String::new(),
        };
        let letters: String = stuff.chars().filter(|c| !c.is_ascii_digit()).collect();
        let numbers: String = stuff.chars().filter(char::is_ascii_digit).collect();
        record.insert(key.to_string(), json!(letters.trim()));
        record.insert("numbers".to_string(), json!(numbers));
        Ok(())
    }

    #[test]
    fn test_default_parser_removes_icon_elements() {
        let doc = HtmlDocument::parse_fragment("<span><i>*</i><b>  hello   </b></span>");
        let span = doc.root().select_all("span").unwrap().remove(0);
        let mut data = Record::new();

        default_parser(Some(&span), &mut data, "aaa");
        assert_eq!(data, record(&[("aaa", json!("hello"))]));
    }

    #[test]
    fn test_default_parser_with_missing_cell_leaves_record_unchanged() {
        let mut data = record(&[("kept", json!("value"))]);
        let before = data.clone();

        default_parser::<HtmlNode>(None, &mut data, "aaa");
        assert_eq!(data, before);
        assert!(!data.contains_key("aaa"));
    }

    #[test]
    fn test_parse_contents_from_table() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        let header_map: HeaderMap = [("id", 0), ("name", 2)].into_iter().collect();

        let data = extract_rows(Some(&doc.root()), &ContentOptions::new("tbody tr", header_map))
            .unwrap()
            .unwrap();
        assert_eq!(
            data,
            vec![
                record(&[("id", json!("111")), ("name", json!("aaa"))]),
                record(&[("id", json!("222")), ("name", json!("bbb"))]),
            ]
        );
    }

    #[test]
    fn test_parse_contents_with_custom_column_parser() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        let header_map: HeaderMap = [("id", 0), ("my_type", 1), ("name", 2)].into_iter().collect();
        let options = ContentOptions::new("tbody tr", header_map)
            .with_column_parsers(ColumnParsers::<HtmlNode>::new().with("my_type", split_stuff));

        let data = extract_rows(Some(&doc.root()), &options).unwrap().unwrap();
        assert_eq!(
            data,
            vec![
                record(&[
                    ("id", json!("111")),
                    ("name", json!("aaa")),
                    ("my_type", json!("ddd")),
                    ("numbers", json!("123")),
                ]),
                record(&[
                    ("id", json!("222")),
                    ("name", json!("bbb")),
                    ("my_type", json!("eee")),
                    ("numbers", json!("89011")),
                ]),
            ]
        );
    }

    #[test]
    fn test_parse_contents_with_headers_on_first_row() {
        let doc = HtmlDocument::parse_fragment(
            "<table><tr><td>number</td><td>my text</td></tr>\
             <tr><td>111   </td><td>aaa</td></tr>\
             <tr><td>222</td><td>   bbb</td></tr></table>",
        );
        let header_map: HeaderMap = [("id", 0), ("name", 1)].into_iter().collect();
        let options = ContentOptions::<HtmlNode>::new("tr", header_map).with_first_row_header(true);

        let data = extract_rows(Some(&doc.root()), &options).unwrap().unwrap();
        assert_eq!(
            data,
            vec![
                record(&[("id", json!("111")), ("name", json!("aaa"))]),
                record(&[("id", json!("222")), ("name", json!("bbb"))]),
            ]
        );
    }

    #[test]
    fn test_kept_text_nodes_count_as_columns() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        // whitespace, td, whitespace, td, whitespace, td, whitespace, td, whitespace
        let header_map: HeaderMap = [("id", 1), ("name", 5)].into_iter().collect();
        let options = ContentOptions::<HtmlNode>::new("tbody tr", header_map)
            .with_ignore_text_nodes(false)
            .with_filter(|_record, cells, _header_map| {
                assert_eq!(cells.len(), 9);
                assert!(cells[0].is_text());
                assert!(cells[8].is_text());
                assert!(!cells[1].is_text());
                Ok(true)
            });

        let data = extract_rows(Some(&doc.root()), &options).unwrap().unwrap();
        assert_eq!(
            data,
            vec![
                record(&[("id", json!("111")), ("name", json!("aaa"))]),
                record(&[("id", json!("222")), ("name", json!("bbb"))]),
            ]
        );

        let between_cells = ContentOptions::<HtmlNode>::new("tbody tr", [("gap", 2)].into_iter().collect())
            .with_ignore_text_nodes(false);
        let gaps = extract_rows(Some(&doc.root()), &between_cells).unwrap().unwrap();
        assert_eq!(gaps[0], record(&[("gap", json!(""))]));
    }

    #[test]
    fn test_missing_cells_are_skipped_by_default_parser() {
        let doc = HtmlDocument::parse_fragment("<table><tr><td>only</td></tr></table>");
        let header_map: HeaderMap = [("first", 0), ("second", 5)].into_iter().collect();

        let data = extract_rows(Some(&doc.root()), &ContentOptions::<HtmlNode>::new("tr", header_map))
            .unwrap()
            .unwrap();
        assert_eq!(data, vec![record(&[("first", json!("only"))])]);
    }

    #[test]
    fn test_filter_excludes_rows() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        let header_map: HeaderMap = [("id", 0)].into_iter().collect();
        let options = ContentOptions::<HtmlNode>::new("tbody tr", header_map)
            .with_filter(|record, cells, header_map| {
                assert_eq!(cells.len(), 4);
                assert!(header_map.contains_key("id"));
                Ok(record.get("id") != Some(&json!("111")))
            });

        let data = extract_rows(Some(&doc.root()), &options).unwrap().unwrap();
        assert_eq!(data, vec![record(&[("id", json!("222"))])]);
    }

    #[test]
    fn test_no_matching_rows_is_empty_not_none() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        let header_map: HeaderMap = [("id", 0)].into_iter().collect();
        let options = ContentOptions::<HtmlNode>::new("tfoot tr", header_map);

        assert_eq!(extract_rows(Some(&doc.root()), &options).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_bad_selector_and_missing_document_soft_fail() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        let options = ContentOptions::<HtmlNode>::new("tbody tr[", HeaderMap::new());

        assert_eq!(extract_rows(Some(&doc.root()), &options).unwrap(), None);
        assert_eq!(extract_rows(None, &options).unwrap(), None);
    }

    #[test]
    fn test_callback_errors_propagate() {
        let doc = HtmlDocument::parse_fragment(TABLE);
        let header_map: HeaderMap = [("id", 0)].into_iter().collect();
        let options = ContentOptions::new("tbody tr", header_map).with_column_parsers(
            ColumnParsers::<HtmlNode>::new().with("id", |_cell, _record, key| Err(anyhow!("cannot parse {key}"))),
        );

        let err = extract_rows(Some(&doc.root()), &options).unwrap_err();
        assert_eq!(err.to_string(), "cannot parse id");

        let failing_filter = ContentOptions::<HtmlNode>::new("tbody tr", [("id", 0)].into_iter().collect())
            .with_filter(|_record, _cells, _header_map| Err(anyhow!("filter exploded")));
        let err = extract_rows(Some(&doc.root()), &failing_filter).unwrap_err();
        assert_eq!(err.to_string(), "filter exploded");
    }
}
