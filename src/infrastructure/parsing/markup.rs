//! Markup capability layer
//!
//! Extraction code only ever asks a node four things: first descendant
//! matching a query, all descendants matching a query, its text, and an
//! attribute. `ElementQuery` describes what to look for independently of the
//! HTML library; `CompiledQuery` is the library-specific compiled form.

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

use super::{ParsingError, ParsingResult};

/// A library-neutral description of an element query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementQuery {
    /// Any element carrying the class, e.g. `.PlanName`
    Class { class: String },
    /// A tag inside an element carrying the class, e.g. `.CompanyName b`
    ClassDescendant { class: String, tag: String },
    /// A tag whose attribute value starts with a prefix, e.g. `span[id^="lblKWh_"]`
    AttributePrefix {
        tag: String,
        attribute: String,
        prefix: String,
    },
    /// A tag with an exact `aria-label`
    AccessibleLabel { tag: String, label: String },
    /// Raw CSS, for anything the other shapes don't cover
    Css { selector: String },
}

impl ElementQuery {
    pub fn class(class: &str) -> Self {
        Self::Class {
            class: class.to_string(),
        }
    }

    pub fn class_descendant(class: &str, tag: &str) -> Self {
        Self::ClassDescendant {
            class: class.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn attribute_prefix(tag: &str, attribute: &str, prefix: &str) -> Self {
        Self::AttributePrefix {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            prefix: prefix.to_string(),
        }
    }

    pub fn accessible_label(tag: &str, label: &str) -> Self {
        Self::AccessibleLabel {
            tag: tag.to_string(),
            label: label.to_string(),
        }
    }

    /// Render as a CSS selector string.
    pub fn to_css(&self) -> String {
        match self {
            Self::Class { class } => format!(".{class}"),
            Self::ClassDescendant { class, tag } => format!(".{class} {tag}"),
            Self::AttributePrefix {
                tag,
                attribute,
                prefix,
            } => format!("{tag}[{attribute}^=\"{}\"]", escape_css_string(prefix)),
            Self::AccessibleLabel { tag, label } => {
                format!("{tag}[aria-label=\"{}\"]", escape_css_string(label))
            }
            Self::Css { selector } => selector.clone(),
        }
    }

    pub fn compile(&self) -> ParsingResult<CompiledQuery> {
        CompiledQuery::parse(&self.to_css())
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A compiled query, ready to run against parsed markup.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    css: String,
    selector: Selector,
}

impl CompiledQuery {
    pub fn parse(css: &str) -> ParsingResult<Self> {
        let selector = Selector::parse(css)
            .map_err(|e| ParsingError::invalid_selector(css, &format!("{e:?}")))?;
        Ok(Self {
            css: css.to_string(),
            selector,
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// What the extractor needs from a node of a parsed document.
pub trait MarkupNode: Sized {
    fn find_first(&self, query: &CompiledQuery) -> Option<Self>;
    fn find_all(&self, query: &CompiledQuery) -> Vec<Self>;
    /// Concatenated text of all descendant text nodes, untrimmed
    fn text_content(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
}

impl MarkupNode for ElementRef<'_> {
    fn find_first(&self, query: &CompiledQuery) -> Option<Self> {
        self.select(query.selector()).next()
    }

    fn find_all(&self, query: &CompiledQuery) -> Vec<Self> {
        self.select(query.selector()).collect()
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_query_rendering() {
        assert_eq!(ElementQuery::class("PlanName").to_css(), ".PlanName");
        assert_eq!(
            ElementQuery::class_descendant("CompanyName", "b").to_css(),
            ".CompanyName b"
        );
        assert_eq!(
            ElementQuery::attribute_prefix("span", "id", "MainContent_lblKWh_").to_css(),
            "span[id^=\"MainContent_lblKWh_\"]"
        );
        assert_eq!(
            ElementQuery::accessible_label("a", "Say \"hi\"").to_css(),
            "a[aria-label=\"Say \\\"hi\\\"\"]"
        );
    }

    #[test]
    fn test_every_query_shape_compiles() {
        let queries = [
            ElementQuery::class("Pricing"),
            ElementQuery::class_descendant("CompanyName", "b"),
            ElementQuery::attribute_prefix("span", "id", "x_"),
            ElementQuery::accessible_label("a", "Sign Up for Supplier Plan"),
        ];
        for query in &queries {
            assert!(query.compile().is_ok(), "{}", query.to_css());
        }
    }

    #[test]
    fn test_invalid_css_is_reported() {
        let err = CompiledQuery::parse("div[").unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { .. }));
    }

    #[test]
    fn test_element_ref_capabilities() {
        let doc = Html::parse_fragment(
            r#"<div><p class="x">one <b>two</b></p><p class="x">three</p><a href="/go">go</a></div>"#,
        );
        let root = doc.root_element();
        let para = CompiledQuery::parse(".x").unwrap();
        let anchor = CompiledQuery::parse("a").unwrap();

        assert_eq!(root.find_all(&para).len(), 2);
        assert_eq!(root.find_first(&para).unwrap().text_content(), "one two");
        assert_eq!(root.find_first(&anchor).unwrap().attr("href").as_deref(), Some("/go"));
        assert_eq!(root.find_first(&anchor).unwrap().attr("title"), None);
    }
}
