//! 보고서 요약 -- 심각도별 위협 수와 완화책 적용률
//!
//! 외부 보고서 렌더러(PDF 등)가 읽는 필드입니다. 내보내기마다 새로 계산됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use threatforge_core::types::{Mitigation, Severity, StrideCategory, Threat};

/// 위협 모델 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_threats: usize,
    pub critical_threats: usize,
    pub high_threats: usize,
    pub medium_threats: usize,
    pub low_threats: usize,
    /// 구현 완료 완화책 비율 (0-100, 반올림)
    pub mitigation_coverage: u8,
}

impl ReportSummary {
    /// 위협과 (id 기준 중복 제거된) 완화책 목록에서 요약을 계산합니다.
    pub fn compute(threats: &[Threat], mitigations: &[Mitigation]) -> Self {
        let count = |severity: Severity| threats.iter().filter(|t| t.severity == severity).count();
        let implemented = mitigations.iter().filter(|m| m.is_implemented()).count();

        Self {
            total_threats: threats.len(),
            critical_threats: count(Severity::Critical),
            high_threats: count(Severity::High),
            medium_threats: count(Severity::Medium),
            low_threats: count(Severity::Low),
            mitigation_coverage: coverage_percent(implemented, mitigations.len()),
        }
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} threats ({} critical, {} high, {} medium, {} low), {}% mitigated",
            self.total_threats,
            self.critical_threats,
            self.high_threats,
            self.medium_threats,
            self.low_threats,
            self.mitigation_coverage,
        )
    }
}

/// `round(100 * implemented / total)`, `total == 0`이면 0
///
/// 0.5는 올림합니다.
pub fn coverage_percent(implemented: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let implemented = implemented.min(total);
    // (200 * i + t) / (2 * t) == floor(100 * i / t + 0.5)
    ((200 * implemented + total) / (2 * total)) as u8
}

/// 보고서용 위협 한 줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportThreat {
    pub title: String,
    pub severity: Severity,
    pub category: StrideCategory,
    pub description: String,
}

impl From<&Threat> for ReportThreat {
    fn from(threat: &Threat) -> Self {
        Self {
            title: threat.title.clone(),
            severity: threat.severity,
            category: threat.category,
            description: threat.description.clone(),
        }
    }
}

/// 보고서 소비자에게 넘기는 묶음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub model_name: String,
    pub summary: ReportSummary,
    pub threats: Vec<ReportThreat>,
}
