//! Server-rendered scan page.

use crate::scan::render::escape_html;
use crate::scan::{HtmlSurface, ScanQuery};

/// The embedded page template (compiled into the binary).
const PAGE_HTML: &str = include_str!("templates/index.html");

/// Fill the page template with form values, status and results.
///
/// Placeholders are substituted in one pass over the template, so
/// substituted text is never scanned for further placeholders.
pub fn render_page(form: &ScanQuery, surface: &HtmlSurface) -> String {
    let mut out = String::with_capacity(PAGE_HTML.len() + 1024);
    let mut rest = PAGE_HTML;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        match &after[..end] {
            "category" => out.push_str(&escape_html(&form.category)),
            "min_edge" => out.push_str(&escape_html(&form.min_edge)),
            "stake" => out.push_str(&escape_html(&form.stake)),
            "max_markets" => out.push_str(&escape_html(&form.max_markets)),
            "status" => out.push_str(&surface.status_html()),
            "results" => out.push_str(&surface.grid_html()),
            other => {
                out.push_str("{{");
                out.push_str(other);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
