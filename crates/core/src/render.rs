//! HTML templates for funnel elements.
//!
//! Each element type maps to one fixed fragment. The mapping is total:
//! [`ElementType::Unknown`] falls back to a plain content `<div>`.

use crate::element::{ElementType, FunnelElement};
use crate::element_list::ElementList;

/// Shown in place of the element list when a funnel has no elements.
pub const EMPTY_FUNNEL_HINT: &str = "Drag elements here to build your funnel";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_element(element: &FunnelElement) -> String {
    let content = escape_html(&element.content);
    match element.element_type {
        ElementType::Header => format!(r#"<h2 class="text-2xl font-bold">{content}</h2>"#),
        ElementType::Text => format!("<p>{content}</p>"),
        ElementType::Button => format!(
            r#"<button class="bg-indigo-600 text-white px-4 py-2 rounded">{content}</button>"#
        ),
        ElementType::Form => format!(
            concat!(
                r#"<div class="p-4 border rounded">"#,
                r#"<p class="mb-2">Form: {content}</p>"#,
                r#"<input type="text" class="border p-2 w-full mb-2" placeholder="Name" />"#,
                r#"<input type="email" class="border p-2 w-full mb-2" placeholder="Email" />"#,
                r#"<button class="bg-indigo-600 text-white px-4 py-2 rounded w-full">Submit</button>"#,
                "</div>"
            ),
            content = content
        ),
        ElementType::Image => format!(
            r#"<div class="bg-gray-200 p-4 text-center">[Image Placeholder: {content}]</div>"#
        ),
        ElementType::Video => format!(
            r#"<div class="bg-gray-200 p-4 text-center">[Video Placeholder: {content}]</div>"#
        ),
        ElementType::Unknown => format!("<div>{content}</div>"),
    }
}

/// Render an ordered element list, wrapping each element in a container
/// tagged with its id and type.
pub fn render_funnel(elements: &ElementList) -> String {
    if elements.is_empty() {
        return format!(r#"<p class="text-gray-400 text-center py-10">{EMPTY_FUNNEL_HINT}</p>"#);
    }

    elements
        .iter()
        .map(|element| {
            format!(
                r#"<div class="funnel-element" data-id="{id}" data-type="{ty}">{body}</div>"#,
                id = escape_html(element.id.as_str()),
                ty = element.element_type,
                body = render_element(element),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
