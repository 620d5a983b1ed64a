//! Pure normalization steps shared by the listing and detail resolvers.
//!
//! Nothing here touches the network. Every function is deterministic, so the
//! same payload always normalizes to the same output.

use crate::types::{ImageAsset, RichTextBlock};
use url::{ParseError, Url};

/// Make an image URL absolute.
///
/// URLs that already carry a scheme (`https://cdn/...`, `data:...`) are
/// returned unchanged. Anything else is treated as a path on the content
/// source and prefixed with `base_url` exactly once.
///
/// ```text
/// absolute_url("http://cms:1337", "/uploads/a.jpg")        → "http://cms:1337/uploads/a.jpg"
/// absolute_url("http://cms:1337", "https://cdn.x/a.jpg")   → "https://cdn.x/a.jpg"
/// absolute_url("http://cms:1337/", "uploads/a.jpg")        → "http://cms:1337/uploads/a.jpg"
/// ```
pub fn absolute_url(base_url: &str, url: &str) -> String {
    if has_scheme(url) {
        return url.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// True unless the URL parser needs a base to make sense of `url`.
///
/// A URL with a scheme but a bad remainder (`http://`) still counts as
/// absolute: it is passed through rather than glued onto the base.
fn has_scheme(url: &str) -> bool {
    !matches!(Url::parse(url), Err(ParseError::RelativeUrlWithoutBase))
}

/// Flatten rich-text blocks into plain text.
///
/// Spans inside a block are concatenated with no separator; blocks are
/// joined by a blank line. A block without children still contributes an
/// empty entry, so paragraph spacing survives. Block types are not
/// distinguished.
pub fn flatten_description(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            block
                .children
                .iter()
                .map(|span| span.text.as_str())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Alt text for the cover image on the listing page.
pub fn cover_alt(image: &ImageAsset, title: &str) -> String {
    non_empty_alt(image).unwrap_or_else(|| title.to_string())
}

/// Alt text for the image at `index` (0-based) on the detail page.
pub fn detail_alt(image: &ImageAsset, title: &str, index: usize) -> String {
    non_empty_alt(image).unwrap_or_else(|| format!("{} - {}", title, index + 1))
}

fn non_empty_alt(image: &ImageAsset) -> Option<String> {
    image
        .alternative_text
        .as_deref()
        .filter(|alt| !alt.is_empty())
        .map(String::from)
}
