//! Field extraction from a single plan block

use super::markup::{CompiledQuery, MarkupNode};
use crate::domain::SignUpLink;

/// Trimmed text of the first descendant matching `query`.
pub fn extract_field<N: MarkupNode>(block: &N, query: &CompiledQuery) -> Option<String> {
    block
        .find_first(query)
        .map(|node| node.text_content().trim().to_string())
}

/// Remove a leading label from extracted text.
///
/// When `text` starts with `prefix` (case-sensitive) the remainder is
/// returned trimmed; otherwise `text` comes back unchanged.
pub fn strip_prefix(text: Option<&str>, prefix: &str) -> Option<String> {
    let text = text?;
    Some(match text.strip_prefix(prefix) {
        Some(rest) => rest.trim().to_string(),
        None => text.to_string(),
    })
}

/// Extract a field and strip its label in one step.
pub fn extract_labeled<N: MarkupNode>(
    block: &N,
    query: &CompiledQuery,
    label: Option<&str>,
) -> Option<String> {
    let text = extract_field(block, query);
    match label {
        Some(label) => strip_prefix(text.as_deref(), label),
        None => text,
    }
}

/// Sign-up link of the first matching anchor, distinguishing a missing
/// anchor from an anchor without `href`.
pub fn extract_anchor<N: MarkupNode>(block: &N, query: &CompiledQuery) -> SignUpLink {
    match block.find_first(query) {
        None => SignUpLink::NoAnchor,
        Some(anchor) => anchor
            .attr("href")
            .map_or(SignUpLink::NoHref, SignUpLink::Href),
    }
}
