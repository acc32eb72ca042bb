//! Output document naming.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALPHANUMERIC_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

const NAME_FALLBACK: &str = "form";
pub const TITLE_FALLBACK: &str = "document";

/// Case-fold and collapse every run of non-alphanumerics to one hyphen.
pub fn slugify(value: &str, fallback: &str) -> String {
    let lowered = value.to_lowercase();
    let slug = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        return fallback.to_string();
    }
    slug.to_string()
}

/// The page title up to the first `|` separator.
pub fn title_from_page(page_title: &str) -> &str {
    page_title.split('|').next().unwrap_or_default().trim()
}

/// `<name>-<title>.pdf`, e.g. `jane-doe-intake-form.pdf`.
pub fn document_filename(name: Option<&str>, title: &str) -> String {
    format!(
        "{}-{}.pdf",
        slugify(name.unwrap_or_default(), NAME_FALLBACK),
        slugify(title, TITLE_FALLBACK)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_filename() {
        assert_eq!(
            document_filename(Some("Jane Doe"), "Intake Form"),
            "jane-doe-intake-form.pdf"
        );
        assert_eq!(
            document_filename(Some("  Mary-Ann  O'Neil "), "Consent / Release (v2)"),
            "mary-ann-o-neil-consent-release-v2.pdf"
        );
        assert_eq!(document_filename(None, "Intake"), "form-intake.pdf");
        assert_eq!(document_filename(Some(""), "!!!"), "form-document.pdf");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Test--Name", "fb"), "test-name");
        assert_eq!(slugify("  Spaces  ", "fb"), "spaces");
        assert_eq!(slugify("", "fb"), "fb");
    }

    #[test]
    fn test_title_from_page() {
        assert_eq!(title_from_page("Health History | Little Steps"), "Health History");
        assert_eq!(title_from_page("Plain"), "Plain");
        assert_eq!(title_from_page(""), "");
    }
}
