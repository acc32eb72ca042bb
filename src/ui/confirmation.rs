use kuchiki::NodeRef;
use serde::{Deserialize, Serialize};

use super::UiText;
use crate::dom;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackLink {
    pub href: String,
    pub label: String,
}

impl BackLink {
    /// Parse `href|label`; a bare href is its own label.
    pub fn parse(value: &str) -> Option<Self> {
        let (href, label) = match value.split_once('|') {
            Some((href, label)) => (href.trim(), label.trim()),
            None => (value.trim(), value.trim()),
        };
        if href.is_empty() {
            return None;
        }
        Some(Self {
            href: href.to_string(),
            label: label.to_string(),
        })
    }
}

/// Static success panel. All user data enters as text nodes.
pub fn panel(text: &UiText, document_title: &str) -> NodeRef {
    let panel = dom::create_element("div");
    dom::set_attr(&panel, "class", "form-section form-confirmation");
    dom::set_attr(&panel, "style", "text-align:center;padding:60px 30px;");

    let heading = dom::element_with_text("h2", &text.confirmation_heading);
    dom::set_attr(&heading, "style", "color:#3a6b57;");
    panel.append(heading);

    let document_title = match document_title.trim() {
        "" => super::filename::TITLE_FALLBACK,
        title => title,
    };
    let submitted = dom::element_with_text(
        "p",
        &format!(
            "Your {} has been submitted successfully.",
            document_title.to_lowercase()
        ),
    );
    dom::set_attr(&submitted, "style", "font-size:1.1em;margin:20px 0;");
    panel.append(submitted);

    panel.append(dom::element_with_text(
        "p",
        "A PDF copy has been downloaded to your device for your records.",
    ));

    if let Some(link) = &text.back_link {
        let paragraph = dom::create_element("p");
        dom::set_attr(&paragraph, "style", "margin-top:30px;");
        let anchor = dom::element_with_text("a", &link.label);
        dom::set_attr(&anchor, "href", link.href.as_str());
        dom::set_attr(&anchor, "class", "btn-primary");
        paragraph.append(anchor);
        panel.append(paragraph);
    }

    panel
}
