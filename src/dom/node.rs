//! Node types: NodeId, NodeData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data associated with a single element node.
///
/// Attributes keep insertion order because the `ui-box` binder scans them in
/// declaration order. The `class` and `style` attributes are not stored in
/// `attributes`; they live in `classes` and `style` and are synthesized on
/// read.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Lower-case tag name (e.g. `uizy-drawer`, `style`).
    pub tag: String,
    /// Attributes other than `class` and `style`, in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Class list tokens, deduplicated, in insertion order.
    pub classes: Vec<String>,
    /// Inline style declarations, in insertion order.
    pub style: Vec<(String, String)>,
    /// Own text content (children contribute their own when read).
    pub text: String,
}

impl NodeData {
    /// Create a new `NodeData` for the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set the `id` attribute (builder).
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(&class.into());
        self
    }

    /// The `id` attribute, if present.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Read an attribute. `class` and `style` are synthesized from their
    /// structured forms.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "class" => None,
            "style" if !self.style.is_empty() => Some(
                self.style
                    .iter()
                    .map(|(k, v)| format!("{k}: {v};"))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            "style" => None,
            _ => self.attr(&name).map(str::to_owned),
        }
    }

    /// Whether the attribute is present (presence-boolean semantics).
    pub fn has_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => !self.classes.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attributes.iter().any(|(k, _)| *k == name),
        }
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "class" => {
                self.classes.clear();
                for token in value.split_whitespace() {
                    self.add_class(token);
                }
            }
            "style" => {
                self.style.clear();
                for decl in value.split(';') {
                    if let Some((k, v)) = decl.split_once(':') {
                        self.set_style(k.trim(), v.trim());
                    }
                }
            }
            _ => match self.attributes.iter_mut().find(|(k, _)| *k == name) {
                Some(slot) => slot.1 = value,
                None => self.attributes.push((name, value)),
            },
        }
    }

    /// Remove an attribute. No-op if absent.
    pub fn remove_attribute(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.classes.clear(),
            "style" => self.style.clear(),
            _ => self.attributes.retain(|(k, _)| *k != name),
        }
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present or empty.
    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a class: add if absent, remove if present. Returns whether the
    /// class is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    /// Read an inline style property.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property. An empty value removes it, like
    /// assigning `""` to a `CSSStyleDeclaration` field.
    pub fn set_style(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.style.retain(|(k, _)| k != property);
            return;
        }
        match self.style.iter_mut().find(|(k, _)| k == property) {
            Some(slot) => slot.1 = value.to_owned(),
            None => self.style.push((property.to_owned(), value.to_owned())),
        }
    }
}
