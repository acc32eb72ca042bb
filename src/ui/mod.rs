//! UI state around a submission: the submit control, print-only toggles,
//! the failure alert and the confirmation panel.

pub mod confirmation;
pub mod filename;


use std::cell::RefCell;

use kuchiki::NodeRef;
use serde::{Deserialize, Serialize};

use crate::dom;

pub use confirmation::BackLink;

/// Selectors locating the parts of a page the pipeline works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSelectors {
    pub form: String,
    /// Subtree handed to the renderer; falls back to the form itself.
    pub render_root: String,
    pub submit_control: String,
    pub form_type_field: String,
    /// First match supplies the name part of the document filename.
    pub name_field: String,
    /// Shown only while rendering (searched in the whole page).
    pub print_only: Vec<String>,
    /// Hidden while rendering (searched in the render root).
    pub hidden_in_render_root: Vec<String>,
    /// Hidden while rendering (searched in the form).
    pub hidden_in_form: Vec<String>,
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            form: "form[action]".to_string(),
            render_root: ".section".to_string(),
            submit_control: ".form-submit".to_string(),
            form_type_field: r#"input[name="_form_type"]"#.to_string(),
            name_field: r#"input[name="First Name"], input[name="Full Name"], input[name="Name"]"#
                .to_string(),
            print_only: vec![".print-title".to_string(), ".print-subtitle".to_string()],
            hidden_in_render_root: vec![".info-box".to_string()],
            hidden_in_form: vec![".text-center:last-child".to_string()],
        }
    }
}

/// User-facing strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiText {
    pub generating_label: String,
    pub submitting_label: String,
    /// Manual fallback named in the failure alert.
    pub contact_email: String,
    pub confirmation_heading: String,
    pub back_link: Option<BackLink>,
}

impl Default for UiText {
    fn default() -> Self {
        Self {
            generating_label: "Generating PDF...".to_string(),
            submitting_label: "Submitting...".to_string(),
            contact_email: String::new(),
            confirmation_heading: "Thank You!".to_string(),
            back_link: None,
        }
    }
}

impl UiText {
    pub fn failure_alert(&self) -> String {
        format!(
            "There was an issue submitting the form. Your PDF has been downloaded. \
             Please try again or email the form to {}.",
            self.contact_email
        )
    }
}

/// Receives user-visible alerts.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Notifier for headless hosts: alerts go to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        log::warn!("ALERT: {}", message);
    }
}

/// Inline styles changed for rendering, with what they were before.
#[must_use = "print layout changes must be reverted"]
pub struct PrintLayout {
    changed: Vec<(NodeRef, Option<String>)>,
}

impl PrintLayout {
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Put every touched element's inline style back exactly as it was.
    pub fn revert(self) {
        for (node, prior) in self.changed.into_iter().rev() {
            match prior {
                Some(style) => dom::set_attr(&node, "style", style),
                None => dom::remove_attr(&node, "style"),
            }
        }
    }
}

/// Owns the user-visible state of one bound form.
pub struct UiStateController {
    document: NodeRef,
    form: NodeRef,
    submit_control: Option<NodeRef>,
    selectors: FormSelectors,
    text: UiText,
    idle_label: RefCell<Option<String>>,
}

impl UiStateController {
    pub fn new(document: NodeRef, form: NodeRef, selectors: FormSelectors, text: UiText) -> Self {
        let submit_control = dom::select_first(&form, &selectors.submit_control);
        if submit_control.is_none() {
            log::warn!("No submit control matches {}", selectors.submit_control);
        }
        Self {
            document,
            form,
            submit_control,
            selectors,
            text,
            idle_label: RefCell::new(None),
        }
    }

    pub fn form(&self) -> &NodeRef {
        &self.form
    }

    pub fn text(&self) -> &UiText {
        &self.text
    }

    /// Subtree handed to the renderer: the closest render-root ancestor of
    /// the form, else the first one on the page, else the form itself.
    pub fn render_root(&self) -> NodeRef {
        dom::closest(&self.form, &self.selectors.render_root)
            .or_else(|| dom::select_first(&self.document, &self.selectors.render_root))
            .unwrap_or_else(|| self.form.clone())
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_control
            .as_ref()
            .map(|control| !dom::has_attr(control, "disabled"))
            .unwrap_or(true)
    }

    pub fn submit_label(&self) -> Option<String> {
        self.submit_control
            .as_ref()
            .map(|control| control.text_contents())
    }

    /// Disable the control and show a status label, remembering the idle label.
    pub fn disable_submit(&self, status: &str) {
        let Some(control) = &self.submit_control else {
            return;
        };
        self.idle_label
            .borrow_mut()
            .get_or_insert_with(|| control.text_contents());
        dom::set_flag(control, "disabled", true);
        dom::set_text(control, status);
    }

    pub fn set_submit_label(&self, status: &str) {
        if let Some(control) = &self.submit_control {
            dom::set_text(control, status);
        }
    }

    /// Re-enable the control with the label it had before the run.
    pub fn enable_submit(&self) {
        let Some(control) = &self.submit_control else {
            return;
        };
        if let Some(label) = self.idle_label.borrow_mut().take() {
            dom::set_text(control, &label);
        }
        dom::set_flag(control, "disabled", false);
    }

    /// Show print-only elements and hide screen-only ones.
    pub fn apply_print_layout(&self) -> PrintLayout {
        let mut layout = PrintLayout {
            changed: Vec::new(),
        };
        let root = self.render_root();

        for selector in &self.selectors.print_only {
            if let Some(node) = dom::select_first(&self.document, selector) {
                set_display(&mut layout, node, "block");
            }
        }
        for selector in &self.selectors.hidden_in_render_root {
            if let Some(node) = dom::select_first(&root, selector) {
                set_display(&mut layout, node, "none");
            }
        }
        for selector in &self.selectors.hidden_in_form {
            if let Some(node) = dom::select_first(&self.form, selector) {
                set_display(&mut layout, node, "none");
            }
        }
        layout
    }

    /// Human title of the document: the form-type field when it has a value,
    /// else the page title.
    pub fn document_title(&self) -> String {
        let form_type = dom::select_first(&self.form, &self.selectors.form_type_field)
            .map(|field| dom::field_value(&field).trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(form_type) = form_type {
            return form_type;
        }
        let page_title = dom::select_first(&self.document, "title")
            .map(|title| title.text_contents())
            .unwrap_or_default();
        filename::title_from_page(&page_title).to_string()
    }

    pub fn document_filename(&self) -> String {
        let name = dom::select_first(&self.form, &self.selectors.name_field)
            .map(|field| dom::field_value(&field));
        filename::document_filename(name.as_deref(), &self.document_title())
    }

    pub fn alert_submission_failure(&self, notifier: &dyn Notifier) {
        notifier.alert(&self.text.failure_alert());
    }

    /// Detach the form for good and put the confirmation panel in its place.
    pub fn show_confirmation(&self, document_title: &str) {
        let panel = confirmation::panel(&self.text, document_title);
        if self.form.parent().is_some() {
            self.form.insert_before(panel);
        } else {
            log::warn!("Bound form is already detached; confirmation appended to body");
            match dom::select_first(&self.document, "body") {
                Some(body) => body.append(panel),
                None => self.document.append(panel),
            }
        }
        self.form.detach();
    }
}

fn set_display(layout: &mut PrintLayout, node: NodeRef, display: &str) {
    let prior = dom::attr(&node, "style");
    dom::set_style_property(&node, "display", Some(display));
    layout.changed.push((node, prior));
}
