//! The `ui-box` attribute grammar.
//!
//! `:name[:mod...]="value"` and `u-name[:mod...]="value"` declare a binding.
//! `:text`/`u-text` is the store text binding and `use`/`use:props` drive
//! component classes; everything else is either a native event or a
//! directive.

use indexmap::IndexMap;

use crate::dom::Element;
use crate::registry::DirectiveBinding;

/// Name of the text binding.
pub const TEXT: &str = "text";

/// One parsed binding attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrBinding {
    pub name: String,
    pub modifiers: Vec<String>,
    pub value: String,
}

impl AttrBinding {
    /// Parse an attribute. Returns `None` for attributes outside the grammar.
    pub fn parse(attr: &str, value: &str) -> Option<Self> {
        let rest = attr
            .strip_prefix(':')
            .or_else(|| attr.strip_prefix("u-"))?;
        let mut parts = rest.split(':');
        let name = parts.next().filter(|n| !n.is_empty())?;
        Some(Self {
            name: name.to_owned(),
            modifiers: parts.filter(|m| !m.is_empty()).map(str::to_owned).collect(),
            value: value.to_owned(),
        })
    }

    /// The first modifier, used as a directive argument.
    pub fn arg(&self) -> &str {
        self.modifiers.first().map_or("", String::as_str)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m == name)
    }
}

/// Every binding attribute of `el`, in attribute order.
pub fn bindings(el: &Element) -> Vec<AttrBinding> {
    el.attributes()
        .iter()
        .filter_map(|(name, value)| AttrBinding::parse(name, value))
        .collect()
}

/// The value of the `:text`/`u-text` binding, if present.
pub fn text_binding(el: &Element) -> Option<String> {
    bindings(el)
        .into_iter()
        .find(|b| b.name == TEXT)
        .map(|b| b.value)
}

// ---------------------------------------------------------------------------
// Directive grouping
// ---------------------------------------------------------------------------

/// All occurrences of one directive on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveGroup {
    pub name: String,
    pub occurrences: Vec<AttrBinding>,
}

impl DirectiveGroup {
    /// The occurrence that supplies the context value: the first one without
    /// modifiers, else the first.
    pub fn primary(&self) -> &AttrBinding {
        self.occurrences
            .iter()
            .find(|b| b.modifiers.is_empty())
            .unwrap_or(&self.occurrences[0])
    }

    pub fn directive_bindings(&self) -> Vec<DirectiveBinding> {
        self.occurrences
            .iter()
            .map(|b| DirectiveBinding {
                value: b.value.clone(),
                arg: b.arg().to_owned(),
            })
            .collect()
    }
}

/// Group bindings by name, keeping the order of first appearance.
pub fn group(bindings: impl IntoIterator<Item = AttrBinding>) -> Vec<DirectiveGroup> {
    let mut groups: IndexMap<String, Vec<AttrBinding>> = IndexMap::new();
    for binding in bindings {
        groups.entry(binding.name.clone()).or_default().push(binding);
    }
    groups
        .into_iter()
        .map(|(name, occurrences)| DirectiveGroup { name, occurrences })
        .collect()
}

// ---------------------------------------------------------------------------
// Event modifiers
// ---------------------------------------------------------------------------

/// Modifiers understood on event bindings (`:click:prevent:once`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventModifiers {
    pub prevent: bool,
    pub stop: bool,
    pub once: bool,
    /// Only run when the event originated on the element itself.
    pub self_only: bool,
}

impl EventModifiers {
    pub fn from_binding(binding: &AttrBinding) -> Self {
        Self {
            prevent: binding.has_modifier("prevent"),
            stop: binding.has_modifier("stop"),
            once: binding.has_modifier("once"),
            self_only: binding.has_modifier("self"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(attr: &str, value: &str) -> AttrBinding {
        AttrBinding::parse(attr, value).unwrap()
    }

    #[test]
    fn parses_both_prefixes() {
        assert_eq!(
            b(":click:prevent:once", "go()"),
            AttrBinding {
                name: "click".into(),
                modifiers: vec!["prevent".into(), "once".into()],
                value: "go()".into(),
            }
        );
        assert_eq!(b("u-tooltip:top", "Hi").arg(), "top");
    }

    #[test]
    fn ignores_other_attributes() {
        assert_eq!(AttrBinding::parse("class", "x"), None);
        assert_eq!(AttrBinding::parse("use", "a"), None);
        assert_eq!(AttrBinding::parse(":", "x"), None);
        assert_eq!(AttrBinding::parse("u-", "x"), None);
    }

    #[test]
    fn groups_occurrences_in_first_seen_order() {
        let groups = group(vec![
            b(":tip:pos", "top"),
            b(":ripple", ""),
            b(":tip", "Hello"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "tip");
        assert_eq!(groups[0].primary().value, "Hello");
        assert_eq!(
            groups[0].directive_bindings(),
            vec![
                DirectiveBinding {
                    value: "top".into(),
                    arg: "pos".into()
                },
                DirectiveBinding {
                    value: "Hello".into(),
                    arg: String::new()
                },
            ]
        );
    }

    #[test]
    fn primary_falls_back_to_first() {
        let groups = group(vec![b(":tip:a", "1"), b(":tip:b", "2")]);
        assert_eq!(groups[0].primary().value, "1");
    }

    #[test]
    fn event_modifiers() {
        let m = EventModifiers::from_binding(&b(":click:stop:self", ""));
        assert!(m.stop && m.self_only);
        assert!(!m.prevent && !m.once);
    }
}
