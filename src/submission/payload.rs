//! Collecting a form's named fields the way a browser builds `FormData`.

use kuchiki::NodeRef;

use crate::dom;
use crate::render::Blob;

/// A file part appended to the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub field: String,
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Named field values in document order, plus an optional file part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub attachment: Option<Attachment>,
}

impl FormPayload {
    /// Gather every named, enabled field under `form`.
    ///
    /// Unchecked checkboxes and radios, buttons and file inputs contribute
    /// nothing. A checked box without a `value` submits `on`.
    pub fn from_form(form: &NodeRef) -> Self {
        let mut fields = Vec::new();

        for field in dom::select_all(form, "input, textarea, select") {
            let Some(name) = dom::attr(&field, "name").filter(|name| !name.is_empty()) else {
                continue;
            };
            if dom::has_attr(&field, "disabled") {
                continue;
            }

            match dom::tag_name(&field).as_deref() {
                Some("textarea") => fields.push((name, field.text_contents())),
                Some("select") => {
                    fields.extend(selected_options(&field).into_iter().map(|v| (name.clone(), v)))
                }
                _ => match dom::input_type(&field).as_str() {
                    "submit" | "button" | "reset" | "image" | "file" => {}
                    "checkbox" | "radio" => {
                        if dom::has_attr(&field, "checked") {
                            let value = dom::attr(&field, "value").unwrap_or_else(|| "on".into());
                            fields.push((name, value));
                        }
                    }
                    _ => fields.push((name, dom::field_value(&field))),
                },
            }
        }

        Self {
            fields,
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, field: &str, filename: &str, blob: &Blob) -> Self {
        self.attachment = Some(Attachment {
            field: field.to_string(),
            filename: filename.to_string(),
            mime: blob.mime.clone(),
            bytes: blob.bytes.clone(),
        });
        self
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

fn option_value(option: &NodeRef) -> String {
    dom::attr(option, "value").unwrap_or_else(|| option.text_contents().trim().to_string())
}

fn selected_options(select: &NodeRef) -> Vec<String> {
    let options = dom::select_all(select, "option");
    let selected: Vec<String> = options
        .iter()
        .filter(|option| dom::has_attr(option, "selected") && !dom::has_attr(option, "disabled"))
        .map(option_value)
        .collect();

    if !selected.is_empty() || dom::has_attr(select, "multiple") {
        return selected;
    }
    // A single select with nothing marked submits its first option.
    options.first().map(option_value).into_iter().collect()
}
