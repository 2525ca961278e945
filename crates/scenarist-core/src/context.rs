//! UI Context Extraction
//!
//! Harvests human-readable labels for interactive elements from an optional
//! HTML fragment (a wireframe snapshot in the surrounding system). The
//! labels are woven into synthesized preconditions as flavor text only, so
//! extraction failure must never block scenario generation: null, blank, or
//! unparseable input yields an empty list.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

const INTERACTIVE_SELECTOR: &str =
    "input, textarea, select, button, a, [role], [onclick], [tabindex]";

const MAX_SELECT_OPTIONS: usize = 5;

/// Extract deduplicated UI element descriptions in order of first
/// appearance. Returns an empty vec for missing or blank input.
pub fn extract_ui_context(html: Option<&str>) -> Vec<String> {
    let html = match html {
        Some(h) if !h.trim().is_empty() => h,
        _ => return Vec::new(),
    };

    let selector = match Selector::parse(INTERACTIVE_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_fragment(html);
    let mut seen = HashSet::new();
    let mut elements = Vec::new();

    for element in document.select(&selector) {
        let description = describe_element(&document, element);
        if seen.insert(description.clone()) {
            elements.push(description);
        }
    }

    tracing::debug!(count = elements.len(), "ui context extracted");
    elements
}

fn describe_element(document: &Html, element: ElementRef<'_>) -> String {
    let descriptor = element_descriptor(element);
    let label = resolve_label(document, element);

    let mut description = match label {
        Some(label) => format!("{}: {}", descriptor, label),
        None => descriptor,
    };

    if element.value().name() == "select" {
        if let Some(options) = option_summary(element) {
            description.push_str(&format!(" ({})", options));
        }
    }

    description
}

/// Human phrase for the kind of control.
fn element_descriptor(element: ElementRef<'_>) -> String {
    let tag = element.value().name();
    match tag {
        "input" => {
            let input_type = element.value().attr("type").unwrap_or("text").to_lowercase();
            match input_type.as_str() {
                "text" => "text input".to_string(),
                "password" => "password input".to_string(),
                "checkbox" => "checkbox".to_string(),
                "radio" => "radio button".to_string(),
                "submit" | "button" => "button".to_string(),
                "file" => "file input".to_string(),
                other => format!("{} input", other),
            }
        }
        "textarea" => "text area".to_string(),
        "select" => "dropdown".to_string(),
        "button" => "button".to_string(),
        "a" => "link".to_string(),
        _ => match element.value().attr("role") {
            Some(role) if !role.trim().is_empty() => role.trim().to_lowercase(),
            _ => "interactive element".to_string(),
        },
    }
}

/// Resolve a human label for the element, trying sources from most to
/// least explicit.
fn resolve_label(document: &Html, element: ElementRef<'_>) -> Option<String> {
    for attr in ["aria-label", "title", "placeholder", "name", "id"] {
        if let Some(value) = element.value().attr(attr) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    if let Some(label) = associated_label_text(document, element) {
        return Some(label);
    }

    if let Some(label) = enclosing_label_text(element) {
        return Some(label);
    }

    if let Some(label) = labelledby_text(document, element) {
        return Some(label);
    }

    let own_text = collapse_text(element);
    if !own_text.is_empty() {
        return Some(own_text);
    }

    None
}

/// `<label for="...">` text for the element's id.
fn associated_label_text(document: &Html, element: ElementRef<'_>) -> Option<String> {
    let id = element.value().attr("id")?;
    let selector = Selector::parse("label").ok()?;
    for label in document.select(&selector) {
        if label.value().attr("for") == Some(id) {
            let text = collapse_text(label);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Text of an enclosing `<label>` ancestor.
fn enclosing_label_text(element: ElementRef<'_>) -> Option<String> {
    let mut node = element.parent()?;
    loop {
        if let Some(ancestor) = ElementRef::wrap(node) {
            if ancestor.value().name() == "label" {
                let text = collapse_text(ancestor);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        node = node.parent()?;
    }
}

/// Text of the element referenced by aria-labelledby.
fn labelledby_text(document: &Html, element: ElementRef<'_>) -> Option<String> {
    let target_id = element.value().attr("aria-labelledby")?.trim();
    if target_id.is_empty() {
        return None;
    }
    let selector = Selector::parse("*").ok()?;
    for candidate in document.select(&selector) {
        if candidate.value().attr("id") == Some(target_id) {
            let text = collapse_text(candidate);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Up to five option labels for a select, with a "+N more" suffix when
/// truncated.
fn option_summary(element: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("option").ok()?;
    let labels: Vec<String> = element
        .select(&selector)
        .map(collapse_text)
        .filter(|t| !t.is_empty())
        .collect();

    if labels.is_empty() {
        return None;
    }

    if labels.len() > MAX_SELECT_OPTIONS {
        let shown = labels[..MAX_SELECT_OPTIONS].join(", ");
        Some(format!("{}, +{} more", shown, labels.len() - MAX_SELECT_OPTIONS))
    } else {
        Some(labels.join(", "))
    }
}

fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_blank_input() {
        assert!(extract_ui_context(None).is_empty());
        assert!(extract_ui_context(Some("")).is_empty());
        assert!(extract_ui_context(Some("   \n ")).is_empty());
    }

    #[test]
    fn test_placeholder_label() {
        let html = r#"<input type="text" placeholder="Username">"#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(elements, vec!["text input: Username".to_string()]);
    }

    #[test]
    fn test_aria_label_wins_over_placeholder() {
        let html = r#"<input type="text" aria-label="Search query" placeholder="Search...">"#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(elements, vec!["text input: Search query".to_string()]);
    }

    #[test]
    fn test_button_text_content() {
        let html = "<button>  Submit \n order </button>";
        let elements = extract_ui_context(Some(html));
        assert_eq!(elements, vec!["button: Submit order".to_string()]);
    }

    #[test]
    fn test_id_beats_associated_label() {
        // The resolution order tries the element's own id before the
        // associated <label for>, so the id wins when both are present.
        let html = r#"<label for="em">Email address</label><input type="email" id="em">"#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(elements, vec!["email input: em".to_string()]);
    }

    #[test]
    fn test_enclosing_label() {
        let html = r#"<label>Remember me <input type="checkbox"></label>"#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(elements, vec!["checkbox: Remember me".to_string()]);
    }

    #[test]
    fn test_select_options_truncated() {
        let html = r#"<select aria-label="Country">
            <option>AR</option><option>BR</option><option>CL</option>
            <option>DE</option><option>ES</option><option>FR</option><option>IT</option>
        </select>"#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(
            elements,
            vec!["dropdown: Country (AR, BR, CL, DE, ES, +2 more)".to_string()]
        );
    }

    #[test]
    fn test_deduplication_preserves_first_appearance() {
        let html = r#"
            <button>Save</button>
            <a href="/home" title="Home">Home</a>
            <button>Save</button>
        "#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(
            elements,
            vec!["button: Save".to_string(), "link: Home".to_string()]
        );
    }

    #[test]
    fn test_role_carrier_without_label() {
        let html = r#"<div role="slider"></div>"#;
        let elements = extract_ui_context(Some(html));
        assert_eq!(elements, vec!["slider".to_string()]);
    }

    #[test]
    fn test_unparseable_markup_degrades_quietly() {
        // html5ever error-corrects rather than failing; the point is that
        // nothing panics and output stays usable.
        let html = "<<<button>Ok</button><input placeholder='Q'";
        let elements = extract_ui_context(Some(html));
        assert!(elements.iter().any(|e| e.contains("Ok") || e.contains("Q")) || elements.is_empty());
    }
}
