//! Snapshot helpers.
//!
//! Convert a subtree into an indented outline (tag, id and classes per line)
//! suitable for `insta` snapshots. Attributes other than `id` are left out so
//! snapshots only change when structure or classes do.

use crate::dom::Element;

/// Outline `root` and its descendants, two spaces per level.
///
/// ```ignore
/// uizy-app
///   uizy-header .uizy-header .sb-2
///   uizy-drawer #nav .d-flex .df-col ...
/// ```
pub fn outline(root: &Element) -> String {
    let mut lines = Vec::new();
    walk(root, 0, &mut lines);
    lines.join("\n")
}

fn walk(el: &Element, depth: usize, lines: &mut Vec<String>) {
    let mut line = format!("{}{}", "  ".repeat(depth), el.tag_name());
    if let Some(id) = el.get_attribute("id") {
        line.push_str(" #");
        line.push_str(&id);
    }
    for class in el.class_list().to_vec() {
        line.push_str(" .");
        line.push_str(&class);
    }
    let text = el.text_content();
    if el.children().is_empty() && !text.is_empty() {
        line.push_str(&format!(" {text:?}"));
    }
    lines.push(line);
    for child in el.children() {
        walk(&child, depth + 1, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn outlines_nested_elements() {
        let doc = Document::new();
        let list = doc.create_element("ul");
        list.set_attribute("id", "menu");
        let item = doc.create_element("li");
        item.class_list().add("active");
        item.set_text_content("Home");
        list.append_child(&item);
        doc.body().append_child(&list);

        insta::assert_snapshot!(outline(&list), @r#"
        ul #menu
          li .active "Home"
        "#);
    }
}
