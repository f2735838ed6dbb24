//! 기본 완화책 템플릿 -- STRIDE 분류별 통제 목록 (카탈로그 순서 유지)

use serde::Serialize;

use threatforge_core::types::{ControlType, StrideCategory};

/// 완화책 템플릿
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MitigationTemplate {
    pub title: &'static str,
    pub description: &'static str,
    /// 1 (가장 높음) - 5
    pub priority: u8,
    pub control_type: ControlType,
    pub nist_control: Option<&'static str>,
    pub owasp_recommendation: Option<&'static str>,
}

use ControlType::{Corrective, Detective, Preventive};

const fn m(
    title: &'static str,
    description: &'static str,
    priority: u8,
    control_type: ControlType,
    nist_control: &'static str,
    owasp_recommendation: Option<&'static str>,
) -> MitigationTemplate {
    MitigationTemplate {
        title,
        description,
        priority,
        control_type,
        nist_control: Some(nist_control),
        owasp_recommendation,
    }
}

const SPOOFING: &[MitigationTemplate] = &[
    m(
        "Multi-Factor Authentication",
        "Implement MFA for all user authentication",
        1,
        Preventive,
        "IA-2",
        Some("ASVS 2.8"),
    ),
    m(
        "Certificate-Based Authentication",
        "Use mutual TLS for service-to-service authentication",
        2,
        Preventive,
        "IA-3",
        None,
    ),
    m(
        "Session Management",
        "Implement secure session handling with rotation and timeout",
        1,
        Preventive,
        "SC-23",
        Some("ASVS 3.3"),
    ),
];

const TAMPERING: &[MitigationTemplate] = &[
    m(
        "Input Validation",
        "Validate and sanitize all user input",
        1,
        Preventive,
        "SI-10",
        Some("ASVS 5.1"),
    ),
    m(
        "Data Integrity Checks",
        "Implement cryptographic integrity verification",
        2,
        Detective,
        "SI-7",
        None,
    ),
    m(
        "Parameterized Queries",
        "Use parameterized queries or ORM to prevent injection",
        1,
        Preventive,
        "SI-10",
        Some("ASVS 5.3"),
    ),
];

const REPUDIATION: &[MitigationTemplate] = &[
    m(
        "Comprehensive Logging",
        "Log all security-relevant events with timestamps",
        2,
        Detective,
        "AU-2",
        Some("ASVS 7.1"),
    ),
    m(
        "Digital Signatures",
        "Implement digital signatures for critical transactions",
        3,
        Preventive,
        "AU-10",
        None,
    ),
    m(
        "Audit Trail Protection",
        "Protect audit logs from modification or deletion",
        2,
        Preventive,
        "AU-9",
        None,
    ),
];

const INFORMATION_DISCLOSURE: &[MitigationTemplate] = &[
    m(
        "Data Encryption at Rest",
        "Encrypt sensitive data in storage",
        1,
        Preventive,
        "SC-28",
        Some("ASVS 6.2"),
    ),
    m(
        "Data Encryption in Transit",
        "Use TLS 1.3 for all data transmission",
        1,
        Preventive,
        "SC-8",
        Some("ASVS 9.1"),
    ),
    m(
        "Access Control Lists",
        "Implement least privilege access controls",
        1,
        Preventive,
        "AC-6",
        Some("ASVS 4.1"),
    ),
    m(
        "Data Masking",
        "Mask sensitive data in logs and error messages",
        2,
        Preventive,
        "SI-11",
        None,
    ),
];

const DENIAL_OF_SERVICE: &[MitigationTemplate] = &[
    m(
        "Rate Limiting",
        "Implement request rate limiting and throttling",
        1,
        Preventive,
        "SC-5",
        Some("ASVS 11.1"),
    ),
    m(
        "Resource Quotas",
        "Set resource limits per user/request",
        2,
        Preventive,
        "SC-6",
        None,
    ),
    m(
        "Auto-Scaling",
        "Implement auto-scaling infrastructure",
        3,
        Corrective,
        "CP-2",
        None,
    ),
    m(
        "DDoS Protection",
        "Deploy DDoS mitigation services",
        2,
        Preventive,
        "SC-5",
        None,
    ),
];

const ELEVATION_OF_PRIVILEGE: &[MitigationTemplate] = &[
    m(
        "Role-Based Access Control",
        "Implement RBAC with principle of least privilege",
        1,
        Preventive,
        "AC-2",
        Some("ASVS 4.2"),
    ),
    m(
        "Privilege Separation",
        "Separate administrative and user functions",
        1,
        Preventive,
        "AC-6",
        None,
    ),
    m(
        "Authorization Checks",
        "Verify authorization for every request",
        1,
        Preventive,
        "AC-3",
        Some("ASVS 4.1"),
    ),
    m(
        "Security Monitoring",
        "Monitor for privilege escalation attempts",
        2,
        Detective,
        "SI-4",
        None,
    ),
];

/// STRIDE 분류의 기본 완화책 템플릿
pub(crate) fn for_category(category: StrideCategory) -> &'static [MitigationTemplate] {
    match category {
        StrideCategory::Spoofing => SPOOFING,
        StrideCategory::Tampering => TAMPERING,
        StrideCategory::Repudiation => REPUDIATION,
        StrideCategory::InformationDisclosure => INFORMATION_DISCLOSURE,
        StrideCategory::DenialOfService => DENIAL_OF_SERVICE,
        StrideCategory::ElevationOfPrivilege => ELEVATION_OF_PRIVILEGE,
    }
}
