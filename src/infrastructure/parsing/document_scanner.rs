//! Plan block discovery

use scraper::{ElementRef, Html};

use super::markup::{CompiledQuery, MarkupNode};

/// Every plan block of the document, in source order. An empty result is a
/// valid outcome.
pub fn scan<'a>(document: &'a Html, plan_block: &CompiledQuery) -> Vec<ElementRef<'a>> {
    document.root_element().find_all(plan_block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_in_document_order() {
        let doc = Html::parse_document(
            r#"<html><body>
                <table class="tblCompareList" id="a"></table>
                <div><table class="tblCompareList" id="b"><tr><td>
                    <table class="tblCompareList" id="c"></table>
                </td></tr></table></div>
            </body></html>"#,
        );
        let query = CompiledQuery::parse(".tblCompareList").unwrap();
        let ids: Vec<_> = scan(&doc, &query)
            .iter()
            .filter_map(|block| block.attr("id"))
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_scan_without_blocks_is_empty() {
        let doc = Html::parse_document("<html><body><p>No plans today</p></body></html>");
        let query = CompiledQuery::parse(".tblCompareList").unwrap();
        assert!(scan(&doc, &query).is_empty());

        let empty = Html::parse_document("");
        assert!(scan(&empty, &query).is_empty());
    }
}
