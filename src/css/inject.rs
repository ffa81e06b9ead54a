//! Named inline style elements in the document head.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::dom::{Document, Element};

/// Attribute that tags a managed `<style>` element with its id.
pub const STYLE_ATTR: &str = "uizy-design";

/// Id used when none is given.
pub const DEFAULT_STYLE_ID: &str = "main";

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s\s+").expect("valid whitespace regex"))
}

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n|\r").expect("valid line break regex"))
}

/// Collapse whitespace runs to one space, drop line breaks, trim.
pub fn minify_css(css: &str) -> String {
    let collapsed = whitespace_runs().replace_all(css, " ");
    line_breaks().replace_all(&collapsed, "").trim().to_owned()
}

/// The managed style element for `id`, if one exists.
pub fn style_element(doc: &Document, id: &str) -> Option<Element> {
    doc.head()
        .children()
        .into_iter()
        .find(|el| el.tag_name() == "style" && el.get_attribute(STYLE_ATTR).as_deref() == Some(id))
}

/// Write minified `css` into the style element tagged `id`, creating it in
/// the head on first use. Later calls for the same id replace the text.
pub fn inject_css(doc: &Document, css: &str, id: &str) -> Element {
    let style = match style_element(doc, id) {
        Some(style) => style,
        None => {
            let style = doc.create_element("style");
            style.set_attribute(STYLE_ATTR, id);
            doc.head().append_child(&style);
            style
        }
    };
    let text = minify_css(css);
    debug!(id, bytes = text.len(), "css injected");
    style.set_text_content(&text);
    style
}
