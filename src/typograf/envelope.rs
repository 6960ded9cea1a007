//! SOAP envelope building and response parsing for `ProcessText`.
//!
//! The request body is a fixed template filled by string substitution, so
//! the bytes on the wire match what the service has always received. The
//! response is parsed with `roxmltree` and walked by namespace URI rather
//! than by prefix.

use roxmltree::{Document, Node};

use super::{FormattingConfig, TypografError};

/// SOAP 1.1 envelope namespace.
pub const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Typograf web service namespace.
pub const TYPOGRAF_NS: &str = "http://typograf.artlebedev.ru/webservices/";

/// Text the service returns instead of a result when it rejects a request.
const REJECTION_SENTINEL: &str = "error: unknown action or encoding";

/// Maximum number of characters of a response body kept in an error.
const MAX_SNIPPET_CHARS: usize = 256;

/// Escape the three XML-significant characters the service cares about.
///
/// `&` goes first so the entities produced for `<` and `>` are not
/// escaped a second time.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Undo exactly one level of [`escape`].
pub fn unescape(text: &str) -> String {
    text.replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

/// Build the `ProcessText` request envelope for `text` under `config`.
pub fn build_envelope(text: &str, config: &FormattingConfig) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
            r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
            r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            "<soap:Body>",
            r#"<ProcessText xmlns="http://typograf.artlebedev.ru/webservices/">"#,
            "<text>{text}</text>",
            "<entityType>{entity_type}</entityType>",
            "<useBr>{use_br}</useBr>",
            "<useP>{use_p}</useP>",
            "<maxNobr>{max_nobr}</maxNobr>",
            "</ProcessText>",
            "</soap:Body>",
            "</soap:Envelope>",
        ),
        text = escape(text),
        entity_type = config.entity_type.code(),
        use_br = u8::from(config.use_break),
        use_p = u8::from(config.use_paragraph),
        max_nobr = config.max_no_break_span,
    )
}

/// Extract the processed text from a `ProcessTextResponse` body.
///
/// # Errors
///
/// Returns [`TypografError::MalformedResponse`] when the body is not XML or
/// the result node is missing or blank, and
/// [`TypografError::ServiceRejected`] when the service answered with its
/// rejection sentinel.
pub fn parse_response(body: &str) -> Result<String, TypografError> {
    let doc = Document::parse(body).map_err(|e| TypografError::MalformedResponse {
        reason: format!("invalid XML: {e}"),
        snippet: snippet(body),
    })?;

    let result = child_element(doc.root_element(), SOAP_NS, "Body")
        .and_then(|b| child_element(b, TYPOGRAF_NS, "ProcessTextResponse"))
        .and_then(|r| child_element(r, TYPOGRAF_NS, "ProcessTextResult"))
        .ok_or_else(|| TypografError::MalformedResponse {
            reason: "ProcessTextResult element not found".to_owned(),
            snippet: snippet(body),
        })?;

    let text: String = result
        .children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();

    if text.trim().is_empty() {
        return Err(TypografError::MalformedResponse {
            reason: "ProcessTextResult element is blank".to_owned(),
            snippet: snippet(body),
        });
    }

    if text.trim().eq_ignore_ascii_case(REJECTION_SENTINEL) {
        return Err(TypografError::ServiceRejected(text));
    }

    Ok(unescape(&text))
}

fn child_element<'a, 'input>(
    parent: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.has_tag_name((namespace, name)))
}

/// Collapse whitespace and truncate a body for inclusion in an error.
pub(crate) fn snippet(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_SNIPPET_CHARS {
        let shortened = collapsed.chars().take(MAX_SNIPPET_CHARS).collect::<String>();
        return format!("{shortened}...[truncated]");
    }
    collapsed
}
