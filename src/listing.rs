//! Listing resolver: the whole collection as gallery cards.
//!
//! A failed fetch is logged and becomes an empty list, so the landing page
//! shows its empty state both when nothing is published and when the content
//! source is down.

use crate::normalize::{absolute_url, cover_alt};
use crate::source::ContentSource;
use crate::types::Moment;

/// How many cards, counted by position in the fetched collection, get their
/// cover loaded eagerly.
pub const EAGER_COVERS: usize = 4;

/// An image ready for an `<img>` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderImage {
    /// Absolute URL.
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// One tile of the masonry grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub date: String,
    pub cover: RenderImage,
    /// Total number of images in the moment; the badge shows it when > 1.
    pub image_count: usize,
    /// Load the cover eagerly with high priority (above-the-fold cards).
    pub eager: bool,
}

impl GalleryCard {
    /// Count shown on the card badge, if any.
    pub fn badge(&self) -> Option<usize> {
        (self.image_count > 1).then_some(self.image_count)
    }
}

/// Fetch the collection and map it to cards. Never fails.
pub async fn resolve_listing(source: &dyn ContentSource, base_url: &str) -> Vec<GalleryCard> {
    match source.fetch_moments().await {
        Ok(moments) => gallery_cards(&moments, base_url),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch moment listing");
            Vec::new()
        }
    }
}

/// Map moments to cards, dropping moments without images.
pub fn gallery_cards(moments: &[Moment], base_url: &str) -> Vec<GalleryCard> {
    moments
        .iter()
        .enumerate()
        .filter_map(|(position, moment)| {
            let cover = moment.images.first()?;
            Some(GalleryCard {
                id: moment.id,
                title: moment.title.clone(),
                location: moment.location.clone(),
                date: moment.date.clone(),
                cover: RenderImage {
                    src: absolute_url(base_url, &cover.url),
                    alt: cover_alt(cover, &moment.title),
                    width: cover.width,
                    height: cover.height,
                },
                image_count: moment.images.len(),
                eager: position < EAGER_COVERS,
            })
        })
        .collect()
}
