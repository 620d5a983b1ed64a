//! Wire types shared by the content source, the resolvers and the templates.
//!
//! These mirror the JSON the content API returns for
//! `GET /api/moments?populate=image`. Decoding is tolerant: content editors
//! routinely leave fields empty, and the API reports an empty field as `null`
//! rather than omitting it, so every non-identifier field falls back to its
//! default instead of failing the whole moment.

use serde::{Deserialize, Deserializer};

/// One published moment: a titled, dated, located set of photos.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Moment {
    /// Identifier assigned by the content source. Only ever compared for equality.
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// Rich-text description blocks, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<RichTextBlock>,
    /// Photos in display order. The first one is the cover.
    ///
    /// The API names the relation `image` even though it holds many.
    #[serde(
        default,
        rename = "image",
        alias = "images",
        deserialize_with = "null_as_default"
    )]
    pub images: Vec<ImageAsset>,
}

/// A single uploaded photo as the content source describes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    /// Absolute URL, or a path relative to the content source base URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
    #[serde(default)]
    pub alternative_text: Option<String>,
}

/// A block-level rich-text node. Only the text of its children is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<TextSpan>,
}

/// An inline span. Formatting flags (bold, italic, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextSpan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
