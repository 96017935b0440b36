//! HTML document access backed by `scraper`
//!
//! Implements [`MarkupNode`] over a parsed `scraper::Html` tree so the
//! extraction pipeline can run against real markup.

use scraper::{ElementRef, Html, Selector};

use crate::domain::MarkupNode;
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Compile a CSS selector, mapping parse failures into [`ParsingError`]
pub fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// An owned, parsed HTML tree
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document
    #[must_use]
    pub fn parse_document(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parse an HTML fragment such as a lone `<table>`
    #[must_use]
    pub fn parse_fragment(source: &str) -> Self {
        Self {
            html: Html::parse_fragment(source),
        }
    }

    /// Root element, used as the scope for extraction calls
    #[must_use]
    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode::Element(self.html.root_element())
    }

    #[must_use]
    pub const fn html(&self) -> &Html {
        &self.html
    }
}

impl From<Html> for HtmlDocument {
    fn from(html: Html) -> Self {
        Self { html }
    }
}

/// Element or text node borrowed from an [`HtmlDocument`]
#[derive(Debug, Clone, Copy)]
pub enum HtmlNode<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

impl<'a> HtmlNode<'a> {
    /// The wrapped element, if this is not a text node
    #[must_use]
    pub const fn as_element(&self) -> Option<ElementRef<'a>> {
        match self {
            Self::Element(element) => Some(*element),
            Self::Text(_) => None,
        }
    }

    /// Local tag name, `None` for text nodes
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.as_element().map(|element| element.value().name())
    }
}

impl<'a> From<ElementRef<'a>> for HtmlNode<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self::Element(element)
    }
}

impl MarkupNode for HtmlNode<'_> {
    type Selector = Selector;

    fn compile(selector: &str) -> ParsingResult<Selector> {
        compile_selector(selector)
    }

    fn select(&self, selector: &Selector) -> Vec<Self> {
        match self {
            Self::Element(element) => element.select(selector).map(Self::Element).collect(),
            Self::Text(_) => Vec::new(),
        }
    }

    fn children(&self, include_text: bool) -> Vec<Self> {
        let Self::Element(element) = self else {
            return Vec::new();
        };

        element
            .children()
            .filter_map(|child| {
                if let Some(child_element) = ElementRef::wrap(child) {
                    return Some(Self::Element(child_element));
                }
                if include_text {
                    return child.value().as_text().map(|text| Self::Text(&**text));
                }
                None
            })
            .collect()
    }

    fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    fn text(&self) -> String {
        match self {
            Self::Element(element) => element.text().collect(),
            Self::Text(text) => (*text).to_string(),
        }
    }

    fn text_excluding(&self, noise: &Selector) -> String {
        match self {
            Self::Element(element) => {
                let mut out = String::new();
                collect_text(*element, noise, &mut out);
                out
            }
            Self::Text(text) => (*text).to_string(),
        }
    }
}

fn collect_text(element: ElementRef<'_>, noise: &Selector, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !noise.matches(&child_element) {
                collect_text(child_element, noise, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
