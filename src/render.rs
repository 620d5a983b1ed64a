//! HTML page rendering.
//!
//! Turns resolver output into complete HTML documents. Rendering is pure: the
//! same cards or detail record always produce the same bytes.
//!
//! ## Pages
//!
//! - **Listing** (`/`): masonry grid of gallery cards, or an empty-state
//!   message when there is nothing to show
//! - **Detail** (`/moment/{id}`): title, location and date, every photo at
//!   full width, then the description rendered as Markdown
//! - **Not found**: quotes the requested identifier and links back home
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time; color and grid custom
//! properties generated from the config are prepended to it.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated content is escaped, including whatever editors type into
//! the content source.

use crate::config::{self, SiteConfig};
use crate::detail::MomentDetail;
use crate::listing::{GalleryCard, RenderImage};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, html as md_html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Full stylesheet for a site: generated custom properties + static rules.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    config: &SiteConfig,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(site_css(config))) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// `<title>` text: page name followed by the site title.
fn page_title(page: &str, config: &SiteConfig) -> String {
    if page.is_empty() {
        config.site.title.clone()
    } else {
        format!("{} · {}", page, config.site.title)
    }
}

fn render_image(image: &RenderImage, class: &str, eager: bool) -> Markup {
    html! {
        img class=(class)
            src=(image.src)
            alt=(image.alt)
            width=(image.width)
            height=(image.height)
            loading=(if eager { "eager" } else { "lazy" })
            fetchpriority=[eager.then_some("high")]
            decoding="async";
    }
}

/// Render flattened description text as Markdown.
///
/// Raw HTML is shown as text rather than passed through.
pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new(text).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the landing page with the masonry grid.
pub fn render_listing(cards: &[GalleryCard], config: &SiteConfig) -> Markup {
    if cards.is_empty() {
        return render_empty(config);
    }

    let content = html! {
        main.listing-page {
            header.site-header {
                h1 { (config.site.title) }
                @if !config.site.subtitle.is_empty() {
                    p.subtitle { (config.site.subtitle) }
                }
            }
            div.moment-grid {
                @for card in cards {
                    (render_card(card))
                }
            }
        }
    };

    base_document(&page_title("", config), config, None, content)
}

fn render_card(card: &GalleryCard) -> Markup {
    html! {
        a.moment-card href={ "/moment/" (card.id) } {
            @if let Some(count) = card.badge() {
                span.photo-count { (count) " photos" }
            }
            (render_image(&card.cover, "cover", card.eager))
            div.card-overlay {
                h2 { (card.title) }
                div.card-meta {
                    span { (card.location) }
                    span { (card.date) }
                }
            }
        }
    }
}

fn render_empty(config: &SiteConfig) -> Markup {
    let content = html! {
        main.empty-page {
            h1 { (config.site.title) }
            p.empty-message { (config.site.empty_message) }
        }
    };
    base_document(&page_title("", config), config, Some("centered"), content)
}

/// Renders a moment's detail page.
///
/// The description section is left out entirely when the text is empty.
pub fn render_detail(detail: &MomentDetail, config: &SiteConfig) -> Markup {
    let content = html! {
        main.detail-page {
            a.back-link href="/" { "← All moments" }
            header.detail-header {
                h1 { (detail.title) }
                div.detail-meta {
                    span { (detail.location) }
                    span.separator { "•" }
                    span { (detail.date) }
                }
            }
            div.photo-stack {
                @for (idx, image) in detail.images.iter().enumerate() {
                    figure {
                        (render_image(image, "photo", idx == 0))
                    }
                }
            }
            @if !detail.description.is_empty() {
                article.description {
                    (PreEscaped(markdown_to_html(&detail.description)))
                }
            }
        }
    };

    base_document(&page_title(&detail.title, config), config, None, content)
}

/// Renders the not-found page for an identifier that matched nothing.
pub fn render_not_found(id_text: &str, config: &SiteConfig) -> Markup {
    let content = html! {
        main.not-found-page {
            h1 { "Oops! (404)" }
            p { "No moment found with ID " code { (id_text) } "." }
            a.home-button href="/" { "Back to all moments" }
        }
    };
    base_document(&page_title("Not found", config), config, Some("centered"), content)
}

// ============================================================================
// Tests
// ============================================================================
