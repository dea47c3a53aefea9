//! Fixed head and foot of the rally book document.

use handlebars::html_escape;

const RESET_CSS: &str = include_str!("../assets/reset.css");
const PORTRAIT_CSS: &str = include_str!("../assets/portrait.css");
const LANDSCAPE_CSS: &str = include_str!("../assets/landscape.css");

/// Closing markup written after the last section.
pub const DOCUMENT_FOOT: &str = "</body>\n</html>\n";

/// Opening tag of a paginated stream container.
pub const PAGE_OPEN: &str = "<div class=\"page\">\n";
/// Opening tag of a non-paginated stream container.
pub const NOPAGE_OPEN: &str = "<div class=\"nopage\">\n";
/// Closing tag of a stream container.
pub const CONTAINER_CLOSE: &str = "</div>\n";
/// One padding unit.
pub const PADDING_UNIT: &str = "<br>";

/// Build the document head.
///
/// The style block holds the reset stylesheet, the page stylesheet chosen by
/// `landscape` and, when given, the project stylesheet.
///
/// # Examples
///
/// ```
/// use rbook_render::document_head;
///
/// let head = document_head("Fish & Chips Run", false, None);
/// assert!(head.starts_with("<!DOCTYPE html>"));
/// assert!(head.contains("<title>Fish &amp; Chips Run</title>"));
/// assert!(head.contains("A4 portrait"));
/// ```
#[must_use]
pub fn document_head(title: &str, landscape: bool, project_css: Option<&str>) -> String {
    let page_css = if landscape { LANDSCAPE_CSS } else { PORTRAIT_CSS };
    let mut head = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    head.push_str("<title>");
    head.push_str(&html_escape(title));
    head.push_str("</title>\n<style>\n");
    head.push_str(RESET_CSS);
    head.push_str(page_css);
    if let Some(css) = project_css {
        head.push_str(css);
        if !css.ends_with('\n') {
            head.push('\n');
        }
    }
    head.push_str("</style>\n</head>\n<body>\n");
    head
}

/// Padding markup for `units` missing grid units.
#[must_use]
pub fn padding(units: usize) -> String {
    PADDING_UNIT.repeat(units)
}
