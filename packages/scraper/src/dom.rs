//! Static-HTML evaluation of [`PageQuery`] descriptors.
//!
//! Both renderers in this crate keep the raw document body of the current
//! page and hand it to [`evaluate`] together with the page URL. The
//! document is parsed per query and dropped before returning, so no parsed
//! DOM outlives a single call.

use card_catalog_models::TableMatrix;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::{PageQuery, ScrapeError};

/// Evaluates `query` against `html`, resolving relative links against
/// `base_url`.
///
/// # Errors
///
/// Returns [`ScrapeError::MissingElement`] when a listing container is
/// absent and [`ScrapeError::Parse`] for invalid selectors.
pub fn evaluate(
    html: &str,
    base_url: Option<&Url>,
    query: &PageQuery,
) -> Result<serde_json::Value, ScrapeError> {
    let document = Html::parse_document(html);

    match query {
        PageQuery::ListingLinks {
            container_id,
            link_selector,
        } => {
            let links = listing_links(&document, base_url, container_id, link_selector)?;
            Ok(serde_json::Value::from(links))
        }
        PageQuery::LinkByText { contains } => {
            let link = link_by_text(&document, base_url, contains)?;
            Ok(link.map_or(serde_json::Value::Null, Into::into))
        }
        PageQuery::Tables => {
            let tables = extract_tables(&document)?;
            serde_json::to_value(tables).map_err(|e| ScrapeError::Parse(e.to_string()))
        }
        PageQuery::FirstText { class_name } => {
            Ok(first_text(&document, class_name)?.map_or(serde_json::Value::Null, Into::into))
        }
    }
}

fn listing_links(
    document: &Html,
    base_url: Option<&Url>,
    container_id: &str,
    link_selector: &str,
) -> Result<Vec<String>, ScrapeError> {
    let container_sel = parse_selector(&format!("[id=\"{}\"]", escape_attr(container_id)))?;
    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| ScrapeError::MissingElement(format!("#{container_id}")))?;

    let link_sel = parse_selector(link_selector)?;
    Ok(container
        .select(&link_sel)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| resolve_href(base_url, href))
        .collect())
}

fn link_by_text(
    document: &Html,
    base_url: Option<&Url>,
    contains: &str,
) -> Result<Option<String>, ScrapeError> {
    let anchor_sel = parse_selector("a")?;
    Ok(document
        .select(&anchor_sel)
        .filter(|anchor| element_text(*anchor).contains(contains))
        .find_map(|anchor| anchor.value().attr("href"))
        .map(|href| resolve_href(base_url, href)))
}

fn extract_tables(document: &Html) -> Result<Vec<TableMatrix>, ScrapeError> {
    let table_sel = parse_selector("table")?;
    let header_sel = parse_selector("tr th")?;
    let row_sel = parse_selector("tr")?;
    let label_sel = parse_selector("th")?;
    let cell_sel = parse_selector("td")?;

    Ok(document
        .select(&table_sel)
        .map(|table| {
            let header = table.select(&header_sel).map(element_text).collect();

            let mut data = Vec::new();
            let mut row_labels = Vec::new();
            for row in table.select(&row_sel) {
                row_labels.push(row.select(&label_sel).next().map(element_text));
                data.push(row.select(&cell_sel).map(element_text).collect());
            }

            TableMatrix {
                header,
                data,
                row_labels,
            }
        })
        .collect())
}

fn first_text(document: &Html, class_name: &str) -> Result<Option<String>, ScrapeError> {
    let sel = parse_selector(&format!("[class~=\"{}\"]", escape_attr(class_name)))?;
    Ok(document.select(&sel).next().map(element_text))
}

/// Elements that start a new line of rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "footer", "li", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Rendered text of `element`, approximating `innerText`.
///
/// Text nodes are joined as-is, so inline markup never adds spaces. `<br>`
/// and block element boundaries become line breaks. Within each line,
/// whitespace runs collapse to one space; lines are trimmed and blank lines
/// dropped.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_rendered_text(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_rendered_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            // Source line breaks are plain whitespace when rendered.
            out.extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
        } else if let Some(child) = ElementRef::wrap(child) {
            match child.value().name() {
                "br" => out.push('\n'),
                "script" | "style" => {}
                name if BLOCK_ELEMENTS.contains(&name) => {
                    out.push('\n');
                    push_rendered_text(child, out);
                    out.push('\n');
                }
                _ => push_rendered_text(child, out),
            }
        }
    }
}

/// Resolves `href` against `base_url`, falling back to the raw value.
#[must_use]
pub fn resolve_href(base_url: Option<&Url>, href: &str) -> String {
    base_url
        .and_then(|base| base.join(href).ok())
        .map_or_else(|| href.to_owned(), |url| url.to_string())
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}
