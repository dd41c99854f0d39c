//! Detail page field extraction
//!
//! A decision's detail page lays its metadata out as a table of label cells
//! followed by value cells. Extraction is best effort: a missing label or an
//! unexpected layout yields an empty string for that field and nothing else.

use crate::model::{DetailField, Record};
use scraper::{ElementRef, Html, Selector};

/// Selector for the metadata table of a detail page
const DETAIL_TABLE: &str = "table.table";

/// Removes the title heading from the metadata table and returns its text
///
/// The heading sits inside the table and usually repeats the case number, so
/// it has to leave the tree before labels are searched.
///
/// # Returns
///
/// The trimmed heading text, or an empty string if the page has none
pub fn take_heading(document: &mut Html) -> String {
    let heading = match Selector::parse("table.table h2") {
        Ok(selector) => document
            .select(&selector)
            .next()
            .map(|h2| (h2.id(), h2.text().collect::<String>())),
        Err(_) => None,
    };

    match heading {
        Some((id, text)) => {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
            text.trim().to_string()
        }
        None => String::new(),
    }
}

/// Returns the element field lookups are restricted to
///
/// This is the metadata table when present, the whole document otherwise.
pub fn detail_scope(document: &Html) -> ElementRef<'_> {
    Selector::parse(DETAIL_TABLE)
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Extracts the value following the first cell whose text contains `label`
///
/// The value is the text of the next element after the label cell in
/// document order (normally the adjacent `td`), trimmed.
///
/// # Arguments
///
/// * `scope` - Element whose descendant cells are searched
/// * `label` - Substring the label cell must contain
///
/// # Returns
///
/// The trimmed value, or an empty string when the label is absent or has no
/// following element
///
/// # Example
///
/// ```
/// use putusan_scraper::crawler::extract_field;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     "<table><tr><td>Nomor</td><td> 12/Pid/2021 </td></tr></table>",
/// );
/// assert_eq!(extract_field(html.root_element(), "Nomor"), "12/Pid/2021");
/// assert_eq!(extract_field(html.root_element(), "Kaidah"), "");
/// ```
pub fn extract_field(scope: ElementRef<'_>, label: &str) -> String {
    let cell_selector = match Selector::parse("td") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    let label_cell = scope
        .select(&cell_selector)
        .find(|cell| cell.text().collect::<String>().contains(label));

    label_cell
        .and_then(next_element)
        .map(|value| value.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Runs every metadata lookup against a scope and stores the values
///
/// Each lookup is independent, so a missing label only blanks its own field.
pub fn extract_details(scope: ElementRef<'_>, record: &mut Record) {
    for field in DetailField::ALL {
        let value = extract_field(scope, field.label());
        if value.is_empty() {
            tracing::trace!("No value for '{}' on {}", field, record.source_link);
        }
        record.set_detail(field, value);
    }
}

/// Finds the first element after `element` in document order that is not
/// one of its descendants
fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut current = Some(*element);

    while let Some(node) = current {
        if let Some(sibling) = node.next_siblings().find_map(ElementRef::wrap) {
            return Some(sibling);
        }
        current = node.parent();
    }

    None
}
