//! 위험 점수 -- 발생 가능성 × 영향도

use serde::Serialize;

use threatforge_core::types::{Rating, Severity, Threat};

/// 위험 점수를 계산합니다 (1-9).
pub fn risk_score(likelihood: Rating, impact: Rating) -> u8 {
    likelihood.weight() * impact.weight()
}

/// 점수를 위험 등급으로 변환합니다.
///
/// `>= 9` critical, `>= 6` high, `>= 3` medium, 그 외 low.
pub fn risk_level(score: u8) -> Severity {
    match score {
        9.. => Severity::Critical,
        6..=8 => Severity::High,
        3..=5 => Severity::Medium,
        _ => Severity::Low,
    }
}

/// 위협 하나의 위험 평가
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub threat_id: String,
    pub title: String,
    pub score: u8,
    pub level: Severity,
}

impl RiskAssessment {
    /// 위협을 평가합니다.
    pub fn of(threat: &Threat) -> Self {
        let score = risk_score(threat.likelihood, threat.impact);
        Self {
            threat_id: threat.id.clone(),
            title: threat.title.clone(),
            score,
            level: risk_level(score),
        }
    }
}

/// 위협 목록을 위험 점수 내림차순으로 평가합니다.
///
/// 점수가 같으면 원래 순서를 유지합니다.
pub fn rank_threats<'a>(threats: impl IntoIterator<Item = &'a Threat>) -> Vec<RiskAssessment> {
    let mut ranked: Vec<RiskAssessment> = threats.into_iter().map(RiskAssessment::of).collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_product_of_weights() {
        assert_eq!(risk_score(Rating::High, Rating::High), 9);
        assert_eq!(risk_score(Rating::Medium, Rating::High), 6);
        assert_eq!(risk_score(Rating::Low, Rating::Medium), 2);
        assert_eq!(risk_score(Rating::Low, Rating::Low), 1);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(risk_level(9), Severity::Critical);
        assert_eq!(risk_level(6), Severity::High);
        assert_eq!(risk_level(4), Severity::Medium);
        assert_eq!(risk_level(3), Severity::Medium);
        assert_eq!(risk_level(2), Severity::Low);
        assert_eq!(risk_level(0), Severity::Low);
    }

    #[test]
    fn ranking_is_stable_and_descending() {
        let security =
            crate::derive::derive_node_security(&threatforge_core::ComponentType::WebApplication);
        let ranked = rank_threats(&security.threats);
        assert_eq!(ranked.len(), security.threats.len());
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        // Session Hijacking (M×H=6) 이 Application-Layer DoS (M×H=6) 보다 앞
        assert_eq!(ranked[0].title, "Session Hijacking");
    }
}
