//! Envelope building, escaping and response parsing.

use typobot::typograf::envelope::{build_envelope, escape, parse_response, unescape};
use typobot::typograf::{EntityType, FormattingConfig, TypografError};

const DEFAULT_ENVELOPE: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
    r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
    r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
    "<soap:Body>",
    r#"<ProcessText xmlns="http://typograf.artlebedev.ru/webservices/">"#,
    "<text>Fish &amp; chips &lt;3</text>",
    "<entityType>3</entityType>",
    "<useBr>0</useBr>",
    "<useP>0</useP>",
    "<maxNobr>0</maxNobr>",
    "</ProcessText>",
    "</soap:Body>",
    "</soap:Envelope>",
);

fn response_with(result: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            "<soap:Body>",
            r#"<ProcessTextResponse xmlns="http://typograf.artlebedev.ru/webservices/">"#,
            "<ProcessTextResult>{}</ProcessTextResult>",
            "</ProcessTextResponse>",
            "</soap:Body>",
            "</soap:Envelope>",
        ),
        result
    )
}

// ── Escaping ──

#[test]
fn escape_unescape_is_identity_on_markup_alphabet() {
    let alphabet = ['&', '<', '>'];
    let mut words = vec![String::new()];
    for _ in 0..5 {
        let next: Vec<String> = words
            .iter()
            .flat_map(|w| alphabet.iter().map(move |c| format!("{w}{c}")))
            .collect();
        for w in &next {
            assert_eq!(&unescape(&escape(w)), w);
        }
        words = next;
    }
}

#[test]
fn escape_unescape_is_identity_on_entity_lookalikes() {
    for text in ["&lt;", "&amp;gt;", "&&amp;;", "a&gt;b", "<&lt;>", "&amp", ";&;"] {
        assert_eq!(unescape(&escape(text)), text);
    }
}

#[test]
fn unescape_removes_one_level_only() {
    assert_eq!(unescape("Hello &amp;amp; world"), "Hello &amp; world");
    assert_eq!(unescape("&amp;lt;"), "&lt;");
}

// ── Envelope ──

#[test]
fn default_envelope_matches_service_template() {
    let envelope = build_envelope("Fish & chips <3", &FormattingConfig::default());
    assert_eq!(envelope, DEFAULT_ENVELOPE);
}

#[test]
fn envelope_renders_options() {
    let config = FormattingConfig {
        entity_type: EntityType::Number,
        use_break: true,
        use_paragraph: true,
        max_no_break_span: 7,
    };
    let envelope = build_envelope("", &config);
    assert!(envelope.contains("<text></text>"));
    assert!(envelope.contains("<entityType>2</entityType>"));
    assert!(envelope.contains("<useBr>1</useBr>"));
    assert!(envelope.contains("<useP>1</useP>"));
    assert!(envelope.contains("<maxNobr>7</maxNobr>"));
}

#[test]
fn envelope_is_well_formed_xml_for_hostile_text() {
    let envelope = build_envelope(
        "</text><entityType>1</entityType> & <![CDATA[x]]>",
        &FormattingConfig::default(),
    );
    let doc = match roxmltree::Document::parse(&envelope) {
        Ok(doc) => doc,
        Err(err) => panic!("envelope should be valid XML: {err}"),
    };
    let text = doc
        .descendants()
        .find(|n| n.has_tag_name(("http://typograf.artlebedev.ru/webservices/", "text")))
        .and_then(|n| n.text());
    assert_eq!(
        text,
        Some("</text><entityType>1</entityType> & <![CDATA[x]]>")
    );
}

// ── Response parsing ──

#[test]
fn parse_returns_unescaped_result() {
    let parsed = parse_response(&response_with("&amp;laquo;ok&amp;raquo; &amp;lt;b&amp;gt;"));
    match parsed {
        Ok(text) => assert_eq!(text, "&laquo;ok&raquo; <b>"),
        Err(err) => panic!("response should parse: {err}"),
    }
}

#[test]
fn parse_matches_by_namespace_not_prefix() {
    let body = concat!(
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" "#,
        r#"xmlns:t="http://typograf.artlebedev.ru/webservices/">"#,
        "<s:Body><t:ProcessTextResponse><t:ProcessTextResult>ok</t:ProcessTextResult>",
        "</t:ProcessTextResponse></s:Body></s:Envelope>",
    );
    assert!(matches!(parse_response(body), Ok(ref text) if text == "ok"));
}

#[test]
fn parse_rejects_result_in_wrong_namespace() {
    let body = concat!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
        "<soap:Body><ProcessTextResponse><ProcessTextResult>ok</ProcessTextResult>",
        "</ProcessTextResponse></soap:Body></soap:Envelope>",
    );
    assert!(matches!(
        parse_response(body),
        Err(TypografError::MalformedResponse { .. })
    ));
}

#[test]
fn parse_rejects_empty_result() {
    assert!(matches!(
        parse_response(&response_with("")),
        Err(TypografError::MalformedResponse { .. })
    ));
}

#[test]
fn parse_rejects_whitespace_only_result() {
    for blank in ["   ", "\n\t ", "&#10; "] {
        match parse_response(&response_with(blank)) {
            Err(TypografError::MalformedResponse { reason, .. }) => {
                assert!(reason.contains("blank"), "{blank:?}: {reason}");
            }
            other => panic!("expected MalformedResponse for {blank:?}, got {other:?}"),
        }
    }
}

#[test]
fn parse_rejects_non_xml() {
    match parse_response("not xml at all") {
        Err(TypografError::MalformedResponse { reason, snippet }) => {
            assert!(reason.starts_with("invalid XML"));
            assert_eq!(snippet, "not xml at all");
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[test]
fn parse_flags_sentinel_in_any_case() {
    for sentinel in [
        "Error: unknown action or encoding",
        "eRRoR: Unknown Action Or Encoding",
    ] {
        assert!(matches!(
            parse_response(&response_with(sentinel)),
            Err(TypografError::ServiceRejected(_))
        ));
    }
}

#[test]
fn parse_does_not_flag_text_that_merely_mentions_sentinel() {
    let text = "The service said: error: unknown action or encoding";
    assert!(matches!(parse_response(&response_with(text)), Ok(ref t) if t == text));
}
