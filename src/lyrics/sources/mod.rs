//! The individual lyrics source adapters.
//!
//! Each adapter is one failure-prone strategy against one external service,
//! with its own quirks kept intact: the regional API returns nearest-match
//! hits that must be re-checked, the international API 404s on anything
//! slightly off, the token-authenticated one needs a credential and two
//! round-trips, and the scrapes live at the mercy of markup drift.

mod genius;
mod letras;
mod lyrics_ovh;
mod vagalume;

pub use genius::GeniusSource;
pub use letras::LetrasSource;
pub use lyrics_ovh::LyricsOvhSource;
pub use vagalume::VagalumeSource;

use scraper::{ElementRef, Node};
use std::time::Duration;

/// Network budget for a single adapter call. A slow source is a miss, not
/// a stalled request.
pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(12);

/// Request signature for the scrape-based sources; the lyrics sites serve
/// bot-looking clients an interstitial instead of the page.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Case-insensitive containment in either direction. The sources answer
/// with their own rendition of a title ("Bohemian Rhapsody - Remastered
/// 2011"), so an exact comparison would reject perfectly good hits.
pub(crate) fn loose_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Flattens an HTML element into plain text, turning `<br>` into newlines
/// and block elements into paragraph breaks. Used by both scrape adapters.
pub(crate) fn element_to_text(element: ElementRef) -> String {
    let mut out = String::new();
    push_node_text(element, &mut out);
    collapse_blank_lines(&out)
}

fn push_node_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => match el.name() {
                "br" => out.push('\n'),
                "script" | "style" => {}
                name => {
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        push_node_text(child_ref, out);
                        // paragraphs are stanzas, keep them separated
                        if name == "p" {
                            out.push_str("\n\n");
                        } else if name == "div" {
                            out.push('\n');
                        }
                    }
                }
            },
            _ => {}
        }
    }
}

/// Collapses runs of blank lines into a single separator and trims each
/// line's edges.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !previous_blank {
                lines.push("");
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\n")
}
