//! CLI output formatting for the `check` command.
//!
//! # Information-First Display
//!
//! Every moment leads with its position in the collection and its title, with
//! the details an operator needs to trace it back to the content admin shown
//! as indented context lines:
//!
//! ```text
//! Moments
//! 001 Spring outing (2 photos)
//!     Id: 7
//!     Hangzhou · 2024-04-05
//!     Description: 2 blocks, 22 chars
//!     001 http://127.0.0.1:1337/uploads/a.jpg (1200x800)
//!     002 https://elsewhere.example/b.jpg (1200x800)
//!         Warning: https://elsewhere.example is not an allowed image origin
//! 002 Drafts (0 photos)
//!     Id: 9
//!     Hidden from listing: no images
//!
//! Listed 1 of 2 moments, 2 images
//! ```
//!
//! `format_*` functions are pure and return lines for testability; the
//! `print_*` wrapper writes them to stdout.

use crate::config::SiteConfig;
use crate::normalize::{absolute_url, flatten_description};
use crate::types::Moment;
use url::Url;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line for a moment: position, title and photo count.
///
/// ```text
/// 001 Spring outing (2 photos)
/// 002 (untitled) (1 photo)
/// ```
fn moment_header(index: usize, title: &str, photos: usize) -> String {
    let title = if title.is_empty() { "(untitled)" } else { title };
    let noun = if photos == 1 { "photo" } else { "photos" };
    format!("{} {} ({} {})", format_index(index), title, photos, noun)
}

/// Origin of an absolute URL, when it has one.
fn url_origin(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .map(|u| u.origin().ascii_serialization())
        .filter(|origin| origin != "null")
}

/// Format the inventory of a fetched collection.
pub fn format_check_output(moments: &[Moment], config: &SiteConfig) -> Vec<String> {
    let allowed = config.image_origins();
    let mut lines = vec!["Moments".to_string()];
    let mut listed = 0;
    let mut images = 0;

    if moments.is_empty() {
        lines.push(format!("{}(none published)", indent(1)));
    }

    for (i, moment) in moments.iter().enumerate() {
        lines.push(moment_header(i + 1, &moment.title, moment.images.len()));
        lines.push(format!("{}Id: {}", indent(1), moment.id));

        let place_time: Vec<&str> = [moment.location.as_str(), moment.date.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !place_time.is_empty() {
            lines.push(format!("{}{}", indent(1), place_time.join(" · ")));
        }

        let description = flatten_description(&moment.description);
        if !description.is_empty() {
            lines.push(format!(
                "{}Description: {} blocks, {} chars",
                indent(1),
                moment.description.len(),
                description.chars().count()
            ));
        }

        if moment.images.is_empty() {
            lines.push(format!("{}Hidden from listing: no images", indent(1)));
            continue;
        }
        listed += 1;

        for (j, image) in moment.images.iter().enumerate() {
            images += 1;
            let src = absolute_url(config.base_url(), &image.url);
            lines.push(format!(
                "{}{} {} ({}x{})",
                indent(1),
                format_index(j + 1),
                src,
                image.width,
                image.height
            ));
            match url_origin(&src) {
                Some(origin) if !allowed.contains(&origin) => lines.push(format!(
                    "{}Warning: {} is not an allowed image origin",
                    indent(2),
                    origin
                )),
                Some(_) => {}
                None => lines.push(format!("{}Warning: not an http(s) URL", indent(2))),
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Listed {} of {} moments, {} images",
        listed,
        moments.len(),
        images
    ));
    lines
}

/// Print the inventory to stdout.
pub fn print_check_output(moments: &[Moment], config: &SiteConfig) {
    for line in format_check_output(moments, config) {
        println!("{}", line);
    }
}
