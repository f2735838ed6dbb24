//! 기본 위협 템플릿 -- 컴포넌트 종류별 STRIDE 위협 목록

use serde::Serialize;

use threatforge_core::types::{ComponentType, Rating, Severity, StrideCategory};

/// 위협 템플릿
///
/// 노드 생성 시 [`crate::derive::derive_threats`]가 새 id를 붙여 [`Threat`]로 만듭니다.
///
/// [`Threat`]: threatforge_core::types::Threat
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatTemplate {
    pub category: StrideCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub likelihood: Rating,
    pub impact: Rating,
    pub cwe_id: Option<&'static str>,
}

use Rating::{High as H, Low as L, Medium as M};
use StrideCategory::{
    DenialOfService, ElevationOfPrivilege, InformationDisclosure, Repudiation, Spoofing,
    Tampering,
};

const fn t(
    category: StrideCategory,
    title: &'static str,
    description: &'static str,
    severity: Severity,
    likelihood: Rating,
    impact: Rating,
    cwe_id: &'static str,
) -> ThreatTemplate {
    ThreatTemplate {
        category,
        title,
        description,
        severity,
        likelihood,
        impact,
        cwe_id: Some(cwe_id),
    }
}

const WEB_APPLICATION: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Session Hijacking",
        "Attacker steals or predicts session tokens to impersonate legitimate users",
        Severity::High,
        M,
        H,
        "CWE-384",
    ),
    t(
        Tampering,
        "Cross-Site Scripting (XSS)",
        "Injection of malicious scripts into web pages viewed by other users",
        Severity::High,
        H,
        M,
        "CWE-79",
    ),
    t(
        InformationDisclosure,
        "Sensitive Data Exposure",
        "Unintended exposure of sensitive information through error messages or logs",
        Severity::Medium,
        M,
        M,
        "CWE-200",
    ),
    t(
        DenialOfService,
        "Application-Layer DoS",
        "Resource exhaustion through expensive operations or slow requests",
        Severity::Medium,
        M,
        H,
        "CWE-400",
    ),
    t(
        ElevationOfPrivilege,
        "Broken Access Control",
        "Bypass of authorization checks to access restricted functionality",
        Severity::Critical,
        M,
        H,
        "CWE-284",
    ),
];

const MOBILE_APP: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Insecure Authentication",
        "Weak or bypassable authentication mechanisms in mobile app",
        Severity::High,
        M,
        H,
        "CWE-287",
    ),
    t(
        Tampering,
        "Code Tampering",
        "Modification of app binary or runtime manipulation",
        Severity::High,
        L,
        H,
        "CWE-494",
    ),
    t(
        InformationDisclosure,
        "Insecure Data Storage",
        "Sensitive data stored insecurely on device",
        Severity::High,
        M,
        H,
        "CWE-922",
    ),
    t(
        ElevationOfPrivilege,
        "Root/Jailbreak Bypass",
        "Security controls bypassed on rooted/jailbroken devices",
        Severity::Medium,
        L,
        M,
        "CWE-919",
    ),
];

const API_GATEWAY: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "API Key Theft",
        "Unauthorized access through stolen or leaked API credentials",
        Severity::High,
        M,
        H,
        "CWE-522",
    ),
    t(
        Tampering,
        "Request Manipulation",
        "Modification of API requests in transit",
        Severity::Medium,
        M,
        M,
        "CWE-472",
    ),
    t(
        DenialOfService,
        "Rate Limit Bypass",
        "Circumvention of rate limiting controls",
        Severity::Medium,
        M,
        M,
        "CWE-770",
    ),
    t(
        ElevationOfPrivilege,
        "Broken Function Level Authorization",
        "Access to administrative APIs by regular users",
        Severity::Critical,
        M,
        H,
        "CWE-285",
    ),
];

const DATABASE: &[ThreatTemplate] = &[
    t(
        Tampering,
        "SQL Injection",
        "Execution of arbitrary SQL commands through unsanitized input",
        Severity::Critical,
        M,
        H,
        "CWE-89",
    ),
    t(
        InformationDisclosure,
        "Unauthorized Data Access",
        "Direct database access bypassing application layer controls",
        Severity::Critical,
        L,
        H,
        "CWE-284",
    ),
    t(
        DenialOfService,
        "Resource Exhaustion",
        "Database overload through expensive queries or connection flooding",
        Severity::High,
        M,
        H,
        "CWE-400",
    ),
];

const CACHE: &[ThreatTemplate] = &[
    t(
        Tampering,
        "Cache Poisoning",
        "Injection of malicious data into cache storage",
        Severity::High,
        L,
        H,
        "CWE-349",
    ),
    t(
        InformationDisclosure,
        "Cache Side-Channel",
        "Information leakage through cache timing attacks",
        Severity::Medium,
        L,
        M,
        "CWE-208",
    ),
    t(
        DenialOfService,
        "Cache Exhaustion",
        "Memory exhaustion through cache flooding",
        Severity::Medium,
        M,
        M,
        "CWE-400",
    ),
];

const MESSAGE_QUEUE: &[ThreatTemplate] = &[
    t(
        Tampering,
        "Message Manipulation",
        "Modification of messages in transit or storage",
        Severity::High,
        L,
        H,
        "CWE-471",
    ),
    t(
        Repudiation,
        "Message Repudiation",
        "Denial of message publication or consumption",
        Severity::Medium,
        M,
        M,
        "CWE-778",
    ),
    t(
        InformationDisclosure,
        "Unencrypted Message Data",
        "Sensitive data exposed in plaintext messages",
        Severity::High,
        M,
        H,
        "CWE-311",
    ),
    t(
        DenialOfService,
        "Queue Flooding",
        "Message queue overwhelmed with malicious messages",
        Severity::Medium,
        M,
        H,
        "CWE-400",
    ),
];

const EXTERNAL_SERVICE: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Service Impersonation",
        "Malicious service posing as legitimate third-party",
        Severity::High,
        L,
        H,
        "CWE-290",
    ),
    t(
        Tampering,
        "Response Manipulation",
        "Man-in-the-middle modification of service responses",
        Severity::High,
        L,
        H,
        "CWE-300",
    ),
    t(
        InformationDisclosure,
        "Data Leakage to Third-Party",
        "Excessive data shared with external service",
        Severity::Medium,
        M,
        M,
        "CWE-359",
    ),
    t(
        DenialOfService,
        "Service Dependency Failure",
        "Application failure due to external service unavailability",
        Severity::Medium,
        M,
        H,
        "CWE-636",
    ),
];

const USER_ACTOR: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Identity Spoofing",
        "Attacker impersonating legitimate user",
        Severity::High,
        M,
        H,
        "CWE-290",
    ),
    t(
        Repudiation,
        "Action Repudiation",
        "User denying performed actions",
        Severity::Medium,
        M,
        M,
        "CWE-778",
    ),
    t(
        ElevationOfPrivilege,
        "Privilege Escalation",
        "User gaining unauthorized elevated access",
        Severity::Critical,
        M,
        H,
        "CWE-269",
    ),
];

const LOAD_BALANCER: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Forwarded Header Spoofing",
        "Client forges X-Forwarded-For headers to evade IP-based controls",
        Severity::Medium,
        M,
        M,
        "CWE-348",
    ),
    t(
        InformationDisclosure,
        "Plaintext Backend Traffic",
        "TLS terminated at the balancer leaves backend hops unencrypted",
        Severity::Medium,
        L,
        H,
        "CWE-319",
    ),
    t(
        DenialOfService,
        "Connection Saturation",
        "Connection table exhaustion through floods of half-open connections",
        Severity::High,
        M,
        H,
        "CWE-400",
    ),
];

const DNS: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "DNS Cache Poisoning",
        "Forged responses redirect clients to attacker-controlled hosts",
        Severity::High,
        L,
        H,
        "CWE-350",
    ),
    t(
        Tampering,
        "Zone Record Hijacking",
        "Unauthorized modification of DNS records through registrar or API compromise",
        Severity::Critical,
        L,
        H,
        "CWE-284",
    ),
    t(
        DenialOfService,
        "DNS Amplification",
        "Resolver abused to amplify traffic or flooded with queries",
        Severity::Medium,
        M,
        H,
        "CWE-406",
    ),
];

const FILE_STORAGE: &[ThreatTemplate] = &[
    t(
        Tampering,
        "Malicious File Upload",
        "Upload of executable or malformed content that is later served or processed",
        Severity::High,
        M,
        H,
        "CWE-434",
    ),
    t(
        Repudiation,
        "Unlogged Object Access",
        "Object reads and deletes are not recorded in access logs",
        Severity::Medium,
        M,
        M,
        "CWE-778",
    ),
    t(
        InformationDisclosure,
        "Public Bucket Exposure",
        "Misconfigured storage permissions expose objects to anonymous users",
        Severity::Critical,
        M,
        H,
        "CWE-732",
    ),
];

const CDN: &[ThreatTemplate] = &[
    t(
        Tampering,
        "Edge Cache Poisoning",
        "Unkeyed request inputs poison responses cached at the edge",
        Severity::High,
        L,
        H,
        "CWE-349",
    ),
    t(
        InformationDisclosure,
        "Cached Private Content",
        "User-specific responses cached and served to other users",
        Severity::Medium,
        M,
        M,
        "CWE-524",
    ),
];

const AUTH_SERVICE: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Credential Stuffing",
        "Automated login attempts with credentials leaked from other services",
        Severity::High,
        H,
        H,
        "CWE-307",
    ),
    t(
        Repudiation,
        "Missing Authentication Audit Trail",
        "Logins, failures and token grants are not recorded",
        Severity::Medium,
        M,
        M,
        "CWE-778",
    ),
    t(
        ElevationOfPrivilege,
        "Token Forgery",
        "Weak signature validation allows crafted tokens with elevated claims",
        Severity::Critical,
        L,
        H,
        "CWE-347",
    ),
];

const EMAIL_SERVICE: &[ThreatTemplate] = &[
    t(
        Spoofing,
        "Sender Spoofing",
        "Missing SPF, DKIM or DMARC lets attackers send mail as the domain",
        Severity::High,
        M,
        M,
        "CWE-290",
    ),
    t(
        InformationDisclosure,
        "Sensitive Data in Email",
        "Tokens or personal data sent in cleartext email bodies",
        Severity::Medium,
        M,
        M,
        "CWE-312",
    ),
];

const SEARCH_SERVICE: &[ThreatTemplate] = &[
    t(
        Tampering,
        "Search Query Injection",
        "User input interpreted as query DSL alters search semantics",
        Severity::High,
        M,
        H,
        "CWE-943",
    ),
    t(
        InformationDisclosure,
        "Index Data Leakage",
        "Search results expose documents the caller is not authorized to read",
        Severity::Medium,
        M,
        M,
        "CWE-200",
    ),
    t(
        DenialOfService,
        "Expensive Query DoS",
        "Wildcard or aggregation-heavy queries exhaust cluster resources",
        Severity::Medium,
        M,
        M,
        "CWE-400",
    ),
];

const LOGGING_SERVICE: &[ThreatTemplate] = &[
    t(
        Tampering,
        "Log Injection",
        "Unsanitized input forges or corrupts log entries",
        Severity::Medium,
        M,
        M,
        "CWE-117",
    ),
    t(
        Repudiation,
        "Audit Log Deletion",
        "Attacker with write access removes evidence from the log store",
        Severity::High,
        L,
        H,
        "CWE-779",
    ),
    t(
        InformationDisclosure,
        "Secrets in Logs",
        "Credentials and tokens written to logs readable by operators",
        Severity::High,
        M,
        H,
        "CWE-532",
    ),
];

/// 컴포넌트 종류의 기본 위협 템플릿
///
/// 신뢰 경계와 알 수 없는 종류는 빈 목록입니다.
pub(crate) fn for_component(component_type: &ComponentType) -> &'static [ThreatTemplate] {
    match component_type {
        ComponentType::WebApplication => WEB_APPLICATION,
        ComponentType::MobileApp => MOBILE_APP,
        ComponentType::ApiGateway => API_GATEWAY,
        ComponentType::Database => DATABASE,
        ComponentType::Cache => CACHE,
        ComponentType::MessageQueue => MESSAGE_QUEUE,
        ComponentType::ExternalService => EXTERNAL_SERVICE,
        ComponentType::UserActor => USER_ACTOR,
        ComponentType::LoadBalancer => LOAD_BALANCER,
        ComponentType::Dns => DNS,
        ComponentType::FileStorage => FILE_STORAGE,
        ComponentType::Cdn => CDN,
        ComponentType::AuthService => AUTH_SERVICE,
        ComponentType::EmailService => EMAIL_SERVICE,
        ComponentType::SearchService => SEARCH_SERVICE,
        ComponentType::LoggingService => LOGGING_SERVICE,
        ComponentType::TrustBoundary | ComponentType::Unknown(_) => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_boundary_has_no_threats() {
        assert!(for_component(&ComponentType::TrustBoundary).is_empty());
        assert!(for_component(&ComponentType::Unknown("x".to_owned())).is_empty());
    }

    #[test]
    fn every_other_known_type_has_threats() {
        for ty in ComponentType::KNOWN.iter().filter(|t| !t.is_boundary()) {
            let templates = for_component(ty);
            assert!(
                (2..=5).contains(&templates.len()),
                "{ty} has {} templates",
                templates.len()
            );
        }
    }

    #[test]
    fn titles_unique_within_type() {
        for ty in ComponentType::KNOWN.iter() {
            let mut titles: Vec<&str> = for_component(ty).iter().map(|t| t.title).collect();
            let before = titles.len();
            titles.sort_unstable();
            titles.dedup();
            assert_eq!(titles.len(), before, "duplicate title for {ty}");
        }
    }

    #[test]
    fn templates_never_use_info_severity() {
        for ty in ComponentType::KNOWN.iter() {
            for template in for_component(ty) {
                assert_ne!(template.severity, Severity::Info);
                assert!(template.cwe_id.is_some_and(|c| c.starts_with("CWE-")));
            }
        }
    }

    #[test]
    fn web_application_matches_reference_table() {
        let templates = for_component(&ComponentType::WebApplication);
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0].title, "Session Hijacking");
        assert_eq!(templates[1].cwe_id, Some("CWE-79"));
        assert_eq!(templates[4].severity, Severity::Critical);
    }
}
