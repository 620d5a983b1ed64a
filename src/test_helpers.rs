//! Shared test utilities for the moments-gal test suite.
//!
//! Provides builders for wire types and an in-memory [`ContentSource`] so
//! resolver, template and router tests never touch the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = StubSource::ok(vec![
//!     moment(1, "Empty", vec![]),
//!     moment(2, "Lake", vec![image("/uploads/lake.jpg", None)]),
//! ]);
//! let cards = resolve_listing(&source, BASE_URL).await;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::{ContentSource, MomentsFuture, SourceError};
use crate::types::{ImageAsset, Moment, RichTextBlock, TextSpan};

pub const BASE_URL: &str = "http://127.0.0.1:1337";

// =========================================================================
// Wire type builders
// =========================================================================

pub fn image(url: &str, alt: Option<&str>) -> ImageAsset {
    ImageAsset {
        url: url.to_string(),
        width: 1200,
        height: 800,
        alternative_text: alt.map(String::from),
    }
}

pub fn block(spans: &[&str]) -> RichTextBlock {
    RichTextBlock {
        kind: "paragraph".to_string(),
        children: spans
            .iter()
            .map(|text| TextSpan {
                text: text.to_string(),
            })
            .collect(),
    }
}

pub fn moment(id: i64, title: &str, images: Vec<ImageAsset>) -> Moment {
    Moment {
        id,
        title: title.to_string(),
        location: "Hangzhou".to_string(),
        date: "2024-04-05".to_string(),
        description: vec![],
        images,
    }
}

// =========================================================================
// In-memory content source
// =========================================================================

/// What the stub answers with.
pub enum StubReply {
    Moments(Vec<Moment>),
    Status(u16),
}

/// A [`ContentSource`] answering every call with the same reply and
/// counting how often it was asked.
pub struct StubSource {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn ok(moments: Vec<Moment>) -> Self {
        Self {
            reply: StubReply::Moments(moments),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            reply: StubReply::Status(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentSource for StubSource {
    fn fetch_moments(&self) -> MomentsFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.reply {
            StubReply::Moments(moments) => Ok(moments.clone()),
            StubReply::Status(status) => Err(SourceError::Status {
                url: format!("{BASE_URL}/api/moments?populate=image"),
                status: *status,
            }),
        };
        Box::pin(async move { result })
    }
}
