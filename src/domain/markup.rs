//! Markup capability consumed by the extraction pipeline
//!
//! The pipeline never parses markup or evaluates selectors itself. Anything
//! that can answer these queries can be used as a document or an element;
//! `infrastructure::html` provides the `scraper` backed implementation.

use std::fmt;

use crate::infrastructure::parsing_error::ParsingResult;

/// A node of an already parsed markup tree.
///
/// The node passed as the "document" to an extraction call is only used as the
/// scope for selector queries. Selectors are compiled once through
/// [`MarkupNode::compile`] and reused for every row and cell.
pub trait MarkupNode: Clone {
    /// Compiled form of a selector string
    type Selector: Clone + fmt::Debug;

    fn compile(selector: &str) -> ParsingResult<Self::Selector>;

    /// Descendants matching `selector`, in document order
    fn select(&self, selector: &Self::Selector) -> Vec<Self>;

    /// Direct children; text children are only included when `include_text`
    fn children(&self, include_text: bool) -> Vec<Self>;

    /// Whether this node is a bare text node
    fn is_text(&self) -> bool;

    /// Concatenated text content of the node and its descendants
    fn text(&self) -> String;

    /// Text content with every descendant subtree matching `selector` left out
    fn text_excluding(&self, selector: &Self::Selector) -> String;

    /// [`select`](MarkupNode::select) with a selector compiled on the spot
    fn select_all(&self, selector: &str) -> ParsingResult<Vec<Self>> {
        Ok(self.select(&Self::compile(selector)?))
    }

    /// [`text_excluding`](MarkupNode::text_excluding) with a selector compiled on the spot
    fn text_without(&self, selector: &str) -> ParsingResult<String> {
        Ok(self.text_excluding(&Self::compile(selector)?))
    }
}
