//! Header row scanning into a key to column index map

use tracing::debug;

use super::label_translator::resolve_column_key;
use super::options::{CompiledSelector, HeaderOptions, TextCleanup};
use crate::domain::{HeaderMap, LabelDictionary, MarkupNode};

/// Build a header map from the rows selected in `document`.
///
/// Returns `None` when there is no document, the selector is rejected, or no
/// header row was selected. Without `first_row_header` every selected row is
/// mapped and the last one wins.
#[must_use]
pub fn build_header_map<N: MarkupNode>(
    document: Option<&N>,
    options: &HeaderOptions<N>,
) -> Option<HeaderMap> {
    HeaderScan {
        selector: &options.selector,
        dictionary: &options.dictionary,
        first_row_header: options.first_row_header,
        ignore_text_nodes: options.ignore_text_nodes,
        cleanup: &options.cleanup,
    }
    .run(document?)
}

pub(crate) struct HeaderScan<'o, N: MarkupNode> {
    pub selector: &'o CompiledSelector<N>,
    pub dictionary: &'o LabelDictionary,
    pub first_row_header: bool,
    pub ignore_text_nodes: bool,
    pub cleanup: &'o TextCleanup<N>,
}

impl<N: MarkupNode> HeaderScan<'_, N> {
    #[must_use]
    pub fn run(&self, document: &N) -> Option<HeaderMap> {
        let Some(selector) = self.selector.compiled() else {
            debug!("Header selector '{}' was rejected", self.selector.source());
            return None;
        };

        let mut rows: Vec<N> = document
            .select(selector)
            .into_iter()
            .filter(|row| !(self.ignore_text_nodes && row.is_text()))
            .collect();
        if self.first_row_header {
            rows.truncate(1);
        }

        let mut header_map = None;
        for row in &rows {
            header_map = Some(self.map_row(row));
        }

        match &header_map {
            Some(map) => debug!("Mapped {} header columns from {} row(s)", map.len(), rows.len()),
            None => debug!("No header rows matched '{}'", self.selector.source()),
        }
        header_map
    }

    fn map_row(&self, row: &N) -> HeaderMap {
        let mut column_map = HeaderMap::new();
        for (index, column) in row.children(!self.ignore_text_nodes).iter().enumerate() {
            if let Some(key) = resolve_column_key(Some(column), self.dictionary, self.cleanup) {
                column_map.insert(key, index);
            }
        }
        column_map
    }
}
