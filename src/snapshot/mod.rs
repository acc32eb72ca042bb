//! Field snapshots: swapping live form fields for static, printable nodes.
//!
//! A [`Snapshot`] is an explicit list of reversible substitutions. Building
//! one mutates the tree in place; [`Restorer`] undoes it.

pub mod restore;

#[cfg(test)]
mod mod_tests;

use std::fmt::Write as _;

use kuchiki::NodeRef;

use crate::dom;

pub use restore::Restorer;

pub const CHECKBOX_CHECKED: &str = "\u{2611}";
pub const CHECKBOX_UNCHECKED: &str = "\u{2610}";
pub const RADIO_CHECKED: &str = "\u{25C9}";
pub const RADIO_UNCHECKED: &str = "\u{25CB}";

/// Field groups, in the order they are traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// text, email, tel, date and number inputs
    SingleLine,
    MultiLine,
    Checkbox,
    Radio,
}

impl FieldKind {
    pub const TRAVERSAL_ORDER: [FieldKind; 4] = [
        FieldKind::SingleLine,
        FieldKind::MultiLine,
        FieldKind::Checkbox,
        FieldKind::Radio,
    ];

    fn selector(self) -> &'static str {
        match self {
            FieldKind::SingleLine => {
                r#"input[type="text"], input[type="email"], input[type="tel"], input[type="date"], input[type="number"], input:not([type])"#
            }
            FieldKind::MultiLine => "textarea",
            FieldKind::Checkbox => r#"input[type="checkbox"]"#,
            FieldKind::Radio => r#"input[type="radio"]"#,
        }
    }
}

/// One field whose element was substituted by a static node.
#[derive(Debug, Clone)]
pub struct ReplacementRecord {
    pub kind: FieldKind,
    pub original: NodeRef,
    pub replacement: NodeRef,
    pub parent: NodeRef,
}

impl ReplacementRecord {
    /// Whether the replacement is still a direct child of the recorded parent.
    pub fn is_in_place(&self) -> bool {
        self.replacement
            .parent()
            .map(|parent| parent == self.parent)
            .unwrap_or(false)
    }
}

/// Ordered substitutions made for one submission attempt.
#[derive(Debug, Default)]
pub struct Snapshot {
    records: Vec<ReplacementRecord>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ReplacementRecord] {
        &self.records
    }

    pub(crate) fn pop(&mut self) -> Option<ReplacementRecord> {
        self.records.pop()
    }
}

/// Builds a [`Snapshot`] by replacing fields under a root in place.
pub struct FieldSnapshotBuilder;

impl FieldSnapshotBuilder {
    /// Replace every supported field under `root` with its static form.
    ///
    /// Single-line and multi-line fields with an empty value are left alone.
    /// Checkboxes and radios are always replaced, since their unchecked glyph
    /// is meaningful on paper. Unsupported field kinds are ignored.
    pub fn snapshot(root: &NodeRef) -> Snapshot {
        let mut snapshot = Snapshot::default();

        for kind in FieldKind::TRAVERSAL_ORDER {
            for original in dom::select_all(root, kind.selector()) {
                let Some(parent) = original.parent() else {
                    continue;
                };
                let Some(replacement) = static_node(kind, &original) else {
                    continue;
                };

                dom::replace_node(&original, &replacement);
                snapshot.records.push(ReplacementRecord {
                    kind,
                    original,
                    replacement,
                    parent,
                });
            }
        }

        log::debug!("Snapshot replaced {} fields", snapshot.len());
        snapshot
    }
}

fn static_node(kind: FieldKind, original: &NodeRef) -> Option<NodeRef> {
    match kind {
        FieldKind::SingleLine => {
            let value = dom::field_value(original);
            (!value.is_empty()).then(|| static_text(original, &value))
        }
        FieldKind::MultiLine => {
            let value = dom::field_value(original);
            (!value.is_empty()).then(|| static_block(&value))
        }
        FieldKind::Checkbox => Some(indicator(
            checkbox_glyph(dom::has_attr(original, "checked")),
            "font-size:1.2em;vertical-align:middle;margin-right:4px;",
        )),
        FieldKind::Radio => Some(indicator(
            radio_glyph(dom::has_attr(original, "checked")),
            "font-size:1.1em;vertical-align:middle;margin-right:4px;",
        )),
    }
}

pub fn checkbox_glyph(checked: bool) -> &'static str {
    if checked {
        CHECKBOX_CHECKED
    } else {
        CHECKBOX_UNCHECKED
    }
}

pub fn radio_glyph(checked: bool) -> &'static str {
    if checked {
        RADIO_CHECKED
    } else {
        RADIO_UNCHECKED
    }
}

fn static_text(original: &NodeRef, value: &str) -> NodeRef {
    let mut css =
        String::from("display:inline-block;padding:4px 2px;border-bottom:1px solid #999;");
    if let Some(width) = declared_width(original) {
        let _ = write!(css, "min-width:{};", width);
    }
    css.push_str("font-family:inherit;font-size:inherit;color:#333;");
    // Explicit font choices on the field win over the inherited ones.
    for property in ["font-family", "font-style"] {
        if let Some(value) = dom::style_property(original, property) {
            let _ = write!(css, "{}:{};", property, value);
        }
    }

    let span = dom::element_with_text("span", value);
    dom::set_attr(&span, "style", css);
    span
}

fn static_block(value: &str) -> NodeRef {
    let block = dom::element_with_text("div", value);
    dom::set_attr(
        &block,
        "style",
        "padding:8px;border:1px solid #999;border-radius:4px;min-height:60px;white-space:pre-wrap;font-family:inherit;font-size:inherit;color:#333;",
    );
    block
}

fn indicator(glyph: &str, css: &str) -> NodeRef {
    let span = dom::element_with_text("span", glyph);
    dom::set_attr(&span, "style", css);
    span
}

/// Width the field was laid out with: an inline `width`, else its `size` in `ch`.
fn declared_width(field: &NodeRef) -> Option<String> {
    dom::style_property(field, "width").or_else(|| {
        dom::attr(field, "size")
            .and_then(|size| size.trim().parse::<u32>().ok())
            .filter(|size| *size > 0)
            .map(|size| format!("{}ch", size))
    })
}
