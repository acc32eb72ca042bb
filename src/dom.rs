//! Small helpers over the `kuchiki` tree.
//!
//! The page is held as an in-memory HTML tree. Everything that reads or
//! mutates element attributes, inline styles or field values goes through
//! here so the rest of the crate never touches `RefCell<Attributes>` directly.

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;
use serde_json::{Map, Value};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse a full HTML page.
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Create a detached HTML element with no attributes.
pub fn create_element(tag: &str) -> NodeRef {
    NodeRef::new_element(
        QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        std::iter::empty(),
    )
}

/// Create a detached element whose only child is a text node.
pub fn element_with_text(tag: &str, text: &str) -> NodeRef {
    let element = create_element(tag);
    element.append(NodeRef::new_text(text));
    element
}

pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(name).map(str::to_owned))
}

pub fn has_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .map(|element| element.attributes.borrow().contains(name))
        .unwrap_or(false)
}

pub fn set_attr(node: &NodeRef, name: &str, value: impl Into<String>) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().insert(name, value.into());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().remove(name);
    }
}

/// Set or clear a boolean attribute such as `checked` or `disabled`.
pub fn set_flag(node: &NodeRef, name: &str, on: bool) {
    if on {
        set_attr(node, name, "");
    } else {
        remove_attr(node, name);
    }
}

/// All elements under `root` (inclusive) matching `selector`, in document order.
///
/// An invalid selector matches nothing.
pub fn select_all(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match root.select(selector) {
        Ok(matches) => matches.map(|element| element.as_node().clone()).collect(),
        Err(()) => {
            log::warn!("Ignoring invalid selector: {}", selector);
            Vec::new()
        }
    }
}

pub fn select_first(root: &NodeRef, selector: &str) -> Option<NodeRef> {
    root.select_first(selector)
        .ok()
        .map(|element| element.as_node().clone())
}

/// Nearest ancestor of `node` (not `node` itself) matching `selector`.
pub fn closest(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    let selectors = kuchiki::Selectors::compile(selector).ok()?;
    node.ancestors()
        .filter_map(|ancestor| ancestor.into_element_ref())
        .find(|element| selectors.matches(element))
        .map(|element| element.as_node().clone())
}

/// Swap `old` for `new` at the same position under the same parent.
pub fn replace_node(old: &NodeRef, new: &NodeRef) {
    old.insert_before(new.clone());
    old.detach();
}

/// Replace all children of `node` with a single text node.
pub fn set_text(node: &NodeRef, text: &str) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    if !text.is_empty() {
        node.append(NodeRef::new_text(text));
    }
}

/// Read one property out of the inline `style` attribute.
pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    let style = attr(node, "style")?;
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Set (or remove, when `value` is `None`) one inline style property,
/// leaving the other declarations untouched.
pub fn set_style_property(node: &NodeRef, property: &str, value: Option<&str>) {
    let current = attr(node, "style").unwrap_or_default();
    let mut declarations: Vec<String> = current
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .filter(|declaration| {
            declaration
                .split_once(':')
                .map(|(name, _)| !name.trim().eq_ignore_ascii_case(property))
                .unwrap_or(true)
        })
        .map(str::to_owned)
        .collect();

    if let Some(value) = value {
        declarations.push(format!("{}:{}", property, value));
    }

    if declarations.is_empty() {
        remove_attr(node, "style");
    } else {
        set_attr(node, "style", format!("{};", declarations.join(";")));
    }
}

/// The `type` of an `input`, lower-cased, defaulting to `text`.
pub fn input_type(node: &NodeRef) -> String {
    attr(node, "type")
        .map(|kind| kind.trim().to_ascii_lowercase())
        .filter(|kind| !kind.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

/// Current value of a single-line `input` or a `textarea`.
pub fn field_value(node: &NodeRef) -> String {
    match tag_name(node).as_deref() {
        Some("textarea") => node.text_contents(),
        _ => attr(node, "value").unwrap_or_default(),
    }
}

/// Apply host-provided values to the named fields under `root`.
///
/// Strings set text values, select options and pick radios by value.
/// Booleans tick or clear checkboxes. Numbers are written as text.
pub fn fill_fields(root: &NodeRef, values: &Map<String, Value>) {
    for field in select_all(root, "input, textarea, select") {
        let Some(name) = attr(&field, "name") else {
            continue;
        };
        let Some(value) = values.get(&name) else {
            continue;
        };
        fill_field(&field, value);
    }
}

fn fill_field(field: &NodeRef, value: &Value) {
    let text = match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    };

    match tag_name(field).as_deref() {
        Some("textarea") => {
            if let Some(text) = text {
                set_text(field, &text);
            }
        }
        Some("select") => {
            if let Some(text) = text {
                for option in select_all(field, "option") {
                    let option_value =
                        attr(&option, "value").unwrap_or_else(|| option.text_contents());
                    set_flag(&option, "selected", option_value == text);
                }
            }
        }
        Some("input") => match (input_type(field).as_str(), value) {
            ("checkbox" | "radio", Value::Bool(checked)) => set_flag(field, "checked", *checked),
            ("checkbox" | "radio", _) => {
                let own = attr(field, "value").unwrap_or_else(|| "on".to_string());
                set_flag(field, "checked", text.as_deref() == Some(own.as_str()));
            }
            (_, _) => {
                if let Some(text) = text {
                    set_attr(field, "value", text);
                }
            }
        },
        _ => {}
    }
}
