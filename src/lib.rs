//! # Moments Gallery
//!
//! A small photo gallery for "moments": titled collections of photos with a
//! location, a date and a rich-text description, authored in a headless
//! content API. The gallery owns no data. Every page view fetches the current
//! collection, normalizes it, and renders HTML.
//!
//! # Architecture: Fetch → Resolve → Render
//!
//! ```text
//! 1. Fetch     content API  →  Vec<Moment>        (one GET, no caching)
//! 2. Resolve   Vec<Moment>  →  cards / detail     (filter, locate, normalize)
//! 3. Render    cards/detail →  HTML               (maud templates)
//! ```
//!
//! Resolution and rendering are pure functions of the fetched collection, so
//! the same content always produces byte-identical pages, and tests exercise
//! them with an in-memory content source.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | `ContentSource` trait and the HTTP client for the content API |
//! | [`types`] | Wire types decoded from the content API |
//! | [`normalize`] | URL normalization, description flattening, alt-text fallback |
//! | [`listing`] | Listing resolver: collection → gallery cards |
//! | [`detail`] | Detail resolver: collection + id → one normalized moment |
//! | [`render`] | HTML pages using Maud |
//! | [`server`] | Axum router and server loop |
//! | [`config`] | Layered config loading, validation, CSS generation |
//! | [`output`] | `check` command inventory formatting |
//!
//! # Design Decisions
//!
//! ## Failures Degrade to "Nothing to Show"
//!
//! Transport errors, error statuses and undecodable bodies are logged and
//! turned into an empty listing or a not-found page. There is no retry and no
//! partial result: a visitor sees either the current content or nothing. Only
//! the `check` command reports fetch failures as failures.
//!
//! ## Detail Pages Scan the Whole Collection
//!
//! The detail resolver fetches the same collection as the listing and scans it
//! for the requested id instead of calling a fetch-by-id endpoint. Both views
//! therefore read identical data and share one decoding path.
//!
//! ## Tolerant Decoding
//!
//! Content editors leave fields empty, and the API reports those as `null`.
//! Every field but `id` falls back to its default; a moment without a usable
//! `id` is skipped on its own rather than blanking the whole page.

pub mod config;
pub mod detail;
pub mod listing;
pub mod normalize;
pub mod output;
pub mod render;
pub mod server;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
