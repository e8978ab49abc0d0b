//! Service registry, verdict vocabulary, and per-service report lines.

mod classify;

pub use classify::classify;

use crate::country::country_code_to_emoji;
use serde::Serialize;

/// Fixed-vocabulary outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Service is reachable and unlocked
    Yes,
    /// Service answered and refused this region
    No,
    /// Service answered with an unsupported-country marker
    Unsupported,
    /// Service answered with an outright block page
    Blocked,
    /// Service rejected the network as a disallowed ISP
    DisallowedIsp,
    /// Transport failed or the response matched no known pattern
    Failed,
    /// Service answered but region/availability could not be determined
    Unknown,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Yes => "Yes",
            Verdict::No => "No",
            Verdict::Unsupported => "Unsupported Country",
            Verdict::Blocked => "Blocked",
            Verdict::DisallowedIsp => "Disallowed ISP",
            Verdict::Failed => "Failed",
            Verdict::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// Which classification strategy a service uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceKind {
    /// Bilibili playurl endpoints: JSON `code` field (0 / -10403)
    BilibiliPlayurl,
    /// Cloudflare trace endpoint: newline-delimited `key=value`, `loc` key
    OpenAiTrace,
    /// ChatGPT mobile-web front door: blocking-phrase table
    OpenAiIos,
    /// OpenAI compliance endpoint: `unsupported_country` marker
    OpenAiCompliance,
    /// Gemini web app: literal marker plus 3-letter region regex
    Gemini,
    /// YouTube Premium landing page: phrase match plus HTML country element
    YoutubePremium,
}

/// One declared probe target: display name, endpoint, and classifier tag.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSpec {
    /// Stable id used for CLI selection
    pub id: &'static str,
    /// Display name used in report lines
    pub name: &'static str,
    /// Endpoint probed with a single GET
    pub url: &'static str,
    /// Classification strategy
    pub kind: ServiceKind,
}

/// Classified outcome of one probe.
///
/// `region` is independent of `verdict`: a service can be unlocked with an
/// unknown region or refused with a known one.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub service: String,
    pub kind: ServiceKind,
    pub verdict: Verdict,
    /// 2- or 3-letter ISO code extracted from the response, if any
    pub region: Option<String>,
}

impl ProbeResult {
    /// Synthesized result for a probe whose task never settled normally.
    pub fn failed(spec: &ServiceSpec) -> Self {
        Self {
            service: spec.name.to_string(),
            kind: spec.kind,
            verdict: Verdict::Failed,
            region: None,
        }
    }

    /// Renders the report line for this result, following each service's
    /// own output shape.
    pub fn line(&self) -> String {
        match self.kind {
            ServiceKind::OpenAiTrace => match (&self.region, self.verdict) {
                (Some(region), _) => {
                    format!(
                        "{}: {}{}",
                        self.service,
                        country_code_to_emoji(region),
                        region
                    )
                }
                (None, Verdict::Failed) => format!("{}: Failed", self.service),
                (None, _) => format!("{}: Unknown country code", self.service),
            },
            ServiceKind::Gemini => match &self.region {
                Some(region) => format!(
                    "{}: {} {}{}",
                    self.service,
                    self.verdict,
                    country_code_to_emoji(region),
                    region
                ),
                None => format!("{}: {}", self.service, self.verdict),
            },
            ServiceKind::YoutubePremium => match (&self.region, self.verdict) {
                (Some(region), Verdict::Yes) => format!(
                    "{}: Yes, Region: {}{}",
                    self.service,
                    country_code_to_emoji(region),
                    region
                ),
                _ => format!("{}: {}", self.service, self.verdict),
            },
            _ => format!("{}: {}", self.service, self.verdict),
        }
    }
}

/// All supported services, in the fixed order their lines appear in the
/// report.
pub fn default_services() -> Vec<ServiceSpec> {
    vec![
        ServiceSpec {
            id: "bilibili-mainland",
            name: "Bilibili Mainland",
            url: "https://api.bilibili.com/pgc/player/web/playurl?avid=82846771&qn=0&type=&otype=json&ep_id=307247&fourk=1&fnver=0&fnval=16&module=bangumi",
            kind: ServiceKind::BilibiliPlayurl,
        },
        ServiceSpec {
            id: "bilibili-hkmotw",
            name: "Bilibili HK/MO/TW",
            url: "https://api.bilibili.com/pgc/player/web/playurl?avid=18281381&cid=29892777&qn=0&type=&otype=json&ep_id=183799&fourk=1&fnver=0&fnval=16&module=bangumi",
            kind: ServiceKind::BilibiliPlayurl,
        },
        ServiceSpec {
            id: "chatgpt",
            name: "ChatGPT",
            url: "https://chat.openai.com/cdn-cgi/trace",
            kind: ServiceKind::OpenAiTrace,
        },
        ServiceSpec {
            id: "chatgpt-ios",
            name: "ChatGPT iOS",
            url: "https://ios.chat.openai.com/",
            kind: ServiceKind::OpenAiIos,
        },
        ServiceSpec {
            id: "chatgpt-web",
            name: "ChatGPT Web",
            url: "https://api.openai.com/compliance/cookie_requirements",
            kind: ServiceKind::OpenAiCompliance,
        },
        ServiceSpec {
            id: "gemini",
            name: "Gemini",
            url: "https://gemini.google.com",
            kind: ServiceKind::Gemini,
        },
        ServiceSpec {
            id: "youtube-premium",
            name: "YouTube Premium",
            url: "https://www.youtube.com/premium",
            kind: ServiceKind::YoutubePremium,
        },
    ]
}

/// Look up a service by its CLI id.
pub fn get_service(id: &str) -> Option<ServiceSpec> {
    default_services().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_is_stable() {
        let ids: Vec<_> = default_services().iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "bilibili-mainland",
                "bilibili-hkmotw",
                "chatgpt",
                "chatgpt-ios",
                "chatgpt-web",
                "gemini",
                "youtube-premium",
            ]
        );
    }

    #[test]
    fn test_get_service() {
        assert_eq!(get_service("gemini").map(|s| s.name), Some("Gemini"));
        assert!(get_service("netflix").is_none());
    }

    #[test]
    fn test_plain_line() {
        let result = ProbeResult {
            service: "Bilibili Mainland".to_string(),
            kind: ServiceKind::BilibiliPlayurl,
            verdict: Verdict::No,
            region: None,
        };
        assert_eq!(result.line(), "Bilibili Mainland: No");
    }

    #[test]
    fn test_trace_line_with_region() {
        let result = ProbeResult {
            service: "ChatGPT".to_string(),
            kind: ServiceKind::OpenAiTrace,
            verdict: Verdict::Yes,
            region: Some("JP".to_string()),
        };
        assert_eq!(result.line(), "ChatGPT: \u{1F1EF}\u{1F1F5}JP");
    }

    #[test]
    fn test_trace_line_without_region() {
        let result = ProbeResult {
            service: "ChatGPT".to_string(),
            kind: ServiceKind::OpenAiTrace,
            verdict: Verdict::Unknown,
            region: None,
        };
        assert_eq!(result.line(), "ChatGPT: Unknown country code");
    }

    #[test]
    fn test_gemini_line_with_region() {
        let result = ProbeResult {
            service: "Gemini".to_string(),
            kind: ServiceKind::Gemini,
            verdict: Verdict::Yes,
            region: Some("USA".to_string()),
        };
        assert_eq!(result.line(), "Gemini: Yes \u{1F1FA}\u{1F1F8}USA");
    }

    #[test]
    fn test_youtube_line_with_region() {
        let result = ProbeResult {
            service: "YouTube Premium".to_string(),
            kind: ServiceKind::YoutubePremium,
            verdict: Verdict::Yes,
            region: Some("US".to_string()),
        };
        assert_eq!(
            result.line(),
            "YouTube Premium: Yes, Region: \u{1F1FA}\u{1F1F8}US"
        );
    }

    #[test]
    fn test_disallowed_isp_line() {
        let result = ProbeResult {
            service: "ChatGPT iOS".to_string(),
            kind: ServiceKind::OpenAiIos,
            verdict: Verdict::DisallowedIsp,
            region: None,
        };
        assert_eq!(result.line(), "ChatGPT iOS: Disallowed ISP");
    }
}
