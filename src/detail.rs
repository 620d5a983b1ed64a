//! Detail resolver: one moment, located by the identifier in the page path.
//!
//! There is no fetch-by-id call. The whole collection is fetched and scanned
//! in source order for the first matching `id`. The identifier is read as a
//! leading decimal integer (`"7abc"` and `"7.0"` both mean 7). Text with no
//! leading digits can never match, so it resolves to not-found like any
//! other unknown id.

use crate::listing::RenderImage;
use crate::normalize::{absolute_url, detail_alt, flatten_description};
use crate::source::ContentSource;
use crate::types::Moment;

/// A moment ready for its detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentDetail {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub date: String,
    /// Flattened description. Empty means "no description section".
    pub description: String,
    /// Every image, in order, with absolute URLs and alt text.
    pub images: Vec<RenderImage>,
}

/// Parse the leading decimal integer of the path identifier.
///
/// Leading whitespace and one optional sign are accepted, then the longest
/// run of ASCII digits. Whatever follows the digits is ignored. No digits,
/// or a value outside `i64`, gives `None`.
///
/// ```text
/// "42"    → Some(42)
/// " -3x"  → Some(-3)
/// "7.0"   → Some(7)
/// "abc"   → None
/// ```
pub fn parse_id(id_text: &str) -> Option<i64> {
    let text = id_text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..sign_len + digits_len].parse().ok()
}

/// Fetch the collection and resolve `id_text`. `None` means not found,
/// whether the id is unknown, malformed, or the fetch failed.
pub async fn resolve_detail(
    source: &dyn ContentSource,
    base_url: &str,
    id_text: &str,
) -> Option<MomentDetail> {
    let moments = match source.fetch_moments().await {
        Ok(moments) => moments,
        Err(e) => {
            tracing::error!(id = id_text, error = %e, "failed to fetch moment detail");
            return None;
        }
    };
    let id = parse_id(id_text)?;
    find_moment(&moments, id).map(|moment| moment_detail(moment, base_url))
}

/// First moment with the given id, in source order.
pub fn find_moment(moments: &[Moment], id: i64) -> Option<&Moment> {
    moments.iter().find(|moment| moment.id == id)
}

/// Normalize a moment for rendering.
pub fn moment_detail(moment: &Moment, base_url: &str) -> MomentDetail {
    MomentDetail {
        id: moment.id,
        title: moment.title.clone(),
        location: moment.location.clone(),
        date: moment.date.clone(),
        description: flatten_description(&moment.description),
        images: moment
            .images
            .iter()
            .enumerate()
            .map(|(idx, image)| RenderImage {
                src: absolute_url(base_url, &image.url),
                alt: detail_alt(image, &moment.title, idx),
                width: image.width,
                height: image.height,
            })
            .collect(),
    }
}
