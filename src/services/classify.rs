//! Pure per-service response classification.
//!
//! Every function here takes the raw [`ProbeOutcome`] and returns a verdict
//! plus an optional region code. Nothing in this module performs I/O or
//! returns an error: malformed JSON, missing HTML elements, and unknown
//! response shapes all degrade to a terminal verdict.

use super::{ServiceKind, Verdict};
use crate::probe::ProbeOutcome;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Application-level code bilibili returns for a region-locked episode.
const BILIBILI_REGION_LOCKED: i64 = -10403;

/// Marker present in the Gemini page when the app is served in this region.
const GEMINI_AVAILABLE_MARKER: &str = "45631641,null,true";

/// Region code embedded in the Gemini page payload, e.g. `,2,1,200,"USA"`.
static GEMINI_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",2,1,200,"([A-Z]{3})""#).expect("valid region pattern"));

/// Dispatches the raw outcome to the service's classification strategy.
pub fn classify(kind: ServiceKind, outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    match kind {
        ServiceKind::BilibiliPlayurl => classify_bilibili(outcome),
        ServiceKind::OpenAiTrace => classify_trace(outcome),
        ServiceKind::OpenAiIos => classify_ios(outcome),
        ServiceKind::OpenAiCompliance => classify_compliance(outcome),
        ServiceKind::Gemini => classify_gemini(outcome),
        ServiceKind::YoutubePremium => classify_youtube(outcome),
    }
}

/// Bilibili playurl: JSON `code` 0 means playable, -10403 means the episode
/// is region locked. The body is consulted whenever present, so a 4xx
/// response that still carries the structured code classifies as `No`
/// rather than `Failed`.
fn classify_bilibili(outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    let Some(body) = outcome.body.as_deref() else {
        return (Verdict::Failed, None);
    };

    let verdict = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("code").and_then(|c| c.as_i64()) {
            Some(0) => Verdict::Yes,
            Some(BILIBILI_REGION_LOCKED) => Verdict::No,
            _ => Verdict::Failed,
        },
        Err(_) => Verdict::Failed,
    };
    (verdict, None)
}

/// Cloudflare trace endpoint: newline-delimited `key=value` pairs. The
/// `loc` key carries the egress country. An answer without `loc`, or an
/// HTTP error status, resolves to `Unknown` ("Unknown country code" in the
/// report); only a transport failure is `Failed`.
fn classify_trace(outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    if outcome.error.is_some() {
        return (Verdict::Failed, None);
    }
    if outcome.status.map(|s| s >= 400).unwrap_or(false) {
        return (Verdict::Unknown, None);
    }
    let Some(body) = outcome.body.as_deref() else {
        return (Verdict::Failed, None);
    };

    match parse_key_value_lines(body).remove("loc") {
        Some(loc) if !loc.is_empty() => (Verdict::Yes, Some(loc)),
        _ => (Verdict::Unknown, None),
    }
}

/// ChatGPT mobile-web front door: classified purely by blocking phrases,
/// in order, first match wins. The rate-limit page is only served when the
/// ISP is not blocked, hence its counter-intuitive mapping to `Yes`.
fn classify_ios(outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    let Some(body) = outcome.body.as_deref() else {
        return (Verdict::Failed, None);
    };
    let lower = body.to_lowercase();

    let verdict = if lower.contains("you may be connected to a disallowed isp") {
        Verdict::DisallowedIsp
    } else if lower.contains("request is not allowed. please try again later.") {
        Verdict::Yes
    } else if lower.contains("sorry, you have been blocked") {
        Verdict::Blocked
    } else {
        Verdict::Failed
    };
    (verdict, None)
}

/// OpenAI compliance endpoint: presence of `unsupported_country` is the
/// only negative signal.
fn classify_compliance(outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    let Some(body) = outcome.body.as_deref() else {
        return (Verdict::Failed, None);
    };

    if body.to_lowercase().contains("unsupported_country") {
        (Verdict::Unsupported, None)
    } else {
        (Verdict::Yes, None)
    }
}

/// Gemini web app: a literal marker in the page payload signals
/// availability; the region is a 3-letter code matched against the
/// original-case body.
fn classify_gemini(outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    let Some(body) = outcome.body.as_deref() else {
        return (Verdict::Failed, None);
    };

    let verdict = if body.contains(GEMINI_AVAILABLE_MARKER) {
        Verdict::Yes
    } else {
        Verdict::No
    };
    let region = GEMINI_REGION
        .captures(body)
        .map(|caps| caps[1].to_string());
    (verdict, region)
}

/// YouTube Premium landing page. The not-available phrase wins over
/// everything else, including any `country-code` element in the page.
fn classify_youtube(outcome: &ProbeOutcome) -> (Verdict, Option<String>) {
    let Some(body) = outcome.body.as_deref() else {
        return (Verdict::Failed, None);
    };
    let lower = body.to_lowercase();

    if lower.contains("youtube premium is not available in your country") {
        (Verdict::No, None)
    } else if lower.contains("ad-free") {
        (Verdict::Yes, element_text_by_id(body, "country-code"))
    } else {
        (Verdict::Failed, None)
    }
}

/// Splits a `key=value` line block into a map. Lines without `=` are
/// ignored; a duplicate key keeps the last value.
fn parse_key_value_lines(body: &str) -> std::collections::HashMap<&str, String> {
    body.lines()
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            Some((key, value.trim().to_string()))
        })
        .collect()
}

/// Returns the trimmed text content of the element with the given id, or
/// `None` when the document has no such element or it is empty.
fn element_text_by_id(document: &str, id: &str) -> Option<String> {
    let selector = Selector::parse(&format!("#{id}")).ok()?;
    let html = Html::parse_document(document);
    let text: String = html.select(&selector).next()?.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> ProbeOutcome {
        ProbeOutcome::response(200, body)
    }

    #[test]
    fn test_bilibili_playable() {
        assert_eq!(
            classify_bilibili(&ok(r#"{"code":0,"message":"success"}"#)),
            (Verdict::Yes, None)
        );
    }

    #[test]
    fn test_bilibili_region_locked() {
        assert_eq!(
            classify_bilibili(&ok(r#"{"code":-10403,"message":"抱歉您所在地区不可观看！"}"#)),
            (Verdict::No, None)
        );
    }

    #[test]
    fn test_bilibili_unexpected_code() {
        assert_eq!(classify_bilibili(&ok(r#"{"code":42}"#)), (Verdict::Failed, None));
    }

    #[test]
    fn test_bilibili_malformed_json() {
        assert_eq!(
            classify_bilibili(&ok("<html>not json</html>")),
            (Verdict::Failed, None)
        );
    }

    #[test]
    fn test_bilibili_region_locked_on_4xx() {
        // Structured error body still classifies even with an HTTP error status
        assert_eq!(
            classify_bilibili(&ProbeOutcome::response(412, r#"{"code":-10403}"#)),
            (Verdict::No, None)
        );
    }

    #[test]
    fn test_trace_with_loc() {
        let (verdict, region) = classify_trace(&ok("fl=123\nip=1.2.3.4\nloc=JP\ntls=TLSv1.3"));
        assert_eq!(verdict, Verdict::Yes);
        assert_eq!(region.as_deref(), Some("JP"));
    }

    #[test]
    fn test_trace_without_loc() {
        assert_eq!(
            classify_trace(&ok("ip=1.2.3.4\ntls=TLSv1.3")),
            (Verdict::Unknown, None)
        );
    }

    #[test]
    fn test_trace_http_error_is_unknown() {
        assert_eq!(
            classify_trace(&ProbeOutcome::response(403, "forbidden")),
            (Verdict::Unknown, None)
        );
    }

    #[test]
    fn test_trace_transport_error_is_failed() {
        assert_eq!(
            classify_trace(&ProbeOutcome::transport_error("timed out")),
            (Verdict::Failed, None)
        );
    }

    #[test]
    fn test_ios_disallowed_isp() {
        assert_eq!(
            classify_ios(&ok("Error: You may be connected to a disallowed ISP.")),
            (Verdict::DisallowedIsp, None)
        );
    }

    #[test]
    fn test_ios_rate_limit_means_unlocked() {
        // The rate-limit page is only served to permitted ISPs
        assert_eq!(
            classify_ios(&ok("Request is not allowed. Please try again later.")),
            (Verdict::Yes, None)
        );
    }

    #[test]
    fn test_ios_blocked() {
        assert_eq!(
            classify_ios(&ok("<title>Sorry, you have been blocked</title>")),
            (Verdict::Blocked, None)
        );
    }

    #[test]
    fn test_ios_first_match_wins() {
        let body = "You may be connected to a disallowed ISP. Sorry, you have been blocked";
        assert_eq!(classify_ios(&ok(body)), (Verdict::DisallowedIsp, None));
    }

    #[test]
    fn test_ios_unrecognized_body() {
        assert_eq!(classify_ios(&ok("<html>hello</html>")), (Verdict::Failed, None));
    }

    #[test]
    fn test_compliance_unsupported_country() {
        assert_eq!(
            classify_compliance(&ok(r#"{"error":"unsupported_country"}"#)),
            (Verdict::Unsupported, None)
        );
    }

    #[test]
    fn test_compliance_supported() {
        assert_eq!(
            classify_compliance(&ok(r#"{"analytics":true}"#)),
            (Verdict::Yes, None)
        );
    }

    #[test]
    fn test_gemini_available_with_region() {
        let body = r#"...45631641,null,true...,2,1,200,"USA"..."#;
        let (verdict, region) = classify_gemini(&ok(body));
        assert_eq!(verdict, Verdict::Yes);
        assert_eq!(region.as_deref(), Some("USA"));
    }

    #[test]
    fn test_gemini_unavailable_with_region() {
        let body = r#"nothing here,2,1,200,"FRA" tail"#;
        let (verdict, region) = classify_gemini(&ok(body));
        assert_eq!(verdict, Verdict::No);
        assert_eq!(region.as_deref(), Some("FRA"));
    }

    #[test]
    fn test_gemini_no_region() {
        assert_eq!(classify_gemini(&ok("45631641,null,true")), (Verdict::Yes, None));
    }

    #[test]
    fn test_youtube_available_with_region() {
        let body = r#"Enjoy ad-free videos <span id="country-code"> US </span>"#;
        let (verdict, region) = classify_youtube(&ok(body));
        assert_eq!(verdict, Verdict::Yes);
        assert_eq!(region.as_deref(), Some("US"));
    }

    #[test]
    fn test_youtube_not_available_ignores_region_element() {
        let body =
            r#"YouTube Premium is not available in your country <span id="country-code">US</span>"#;
        assert_eq!(classify_youtube(&ok(body)), (Verdict::No, None));
    }

    #[test]
    fn test_youtube_missing_region_element() {
        assert_eq!(
            classify_youtube(&ok("watch ad-free today")),
            (Verdict::Yes, None)
        );
    }

    #[test]
    fn test_youtube_unrecognized_body() {
        assert_eq!(classify_youtube(&ok("<html></html>")), (Verdict::Failed, None));
    }

    #[test]
    fn test_parse_key_value_lines() {
        let map = parse_key_value_lines("a=1\nbroken\nb=2=3\n");
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(map.get("b").map(String::as_str), Some("2=3"));
        assert!(!map.contains_key("broken"));
    }

    #[test]
    fn test_element_text_by_id() {
        let doc = r#"<html><body><div id="country-code">
            DE
        </div></body></html>"#;
        assert_eq!(element_text_by_id(doc, "country-code").as_deref(), Some("DE"));
        assert_eq!(element_text_by_id(doc, "missing"), None);
        assert_eq!(element_text_by_id("<div id=\"x\"></div>", "x"), None);
    }
}
