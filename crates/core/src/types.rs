//! 도메인 타입 -- 위협 모델 전역에서 사용되는 공통 타입
//!
//! 컴포넌트 종류, STRIDE 분류, 심각도, 위협/완화책 레코드를 정의합니다.
//! 직렬화 형식은 내보내기 문서(JSON)의 필드 이름과 값 표기를 그대로 따릅니다.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// 선택 필드의 `null`을 필드 기본값으로 읽습니다.
///
/// 문서 검증은 선택 필드의 `null`을 허용하므로, `Option`이 아닌 선택 필드는
/// `#[serde(default, deserialize_with = "null_as_default")]`로 같은 규칙을 따릅니다.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 아키텍처 컴포넌트 종류
///
/// 닫힌 집합이지만, 문서에서 읽은 알 수 없는 문자열은 [`ComponentType::Unknown`]으로
/// 원문 그대로 보존됩니다. 알 수 없는 종류는 기본 위협이 없는 것으로 취급합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    /// 브라우저 기반 웹 애플리케이션
    WebApplication,
    /// iOS / Android 모바일 앱
    MobileApp,
    /// API 게이트웨이 또는 리버스 프록시
    ApiGateway,
    /// SQL / NoSQL 데이터베이스
    Database,
    /// 인메모리 캐시
    Cache,
    /// 메시지 브로커
    MessageQueue,
    /// 서드파티 API / 서비스
    ExternalService,
    /// 사람 또는 자동화된 행위자
    UserActor,
    /// 보안/네트워크 경계
    TrustBoundary,
    /// 로드 밸런서
    LoadBalancer,
    /// DNS 리졸버 / 존
    Dns,
    /// 오브젝트 / 파일 스토리지
    FileStorage,
    /// 콘텐츠 전송 네트워크
    Cdn,
    /// 인증 / ID 제공자
    AuthService,
    /// 이메일 발송 서비스
    EmailService,
    /// 검색 엔진
    SearchService,
    /// 로그 수집 / 감사 서비스
    LoggingService,
    /// 카탈로그에 없는 종류 (원문 보존)
    Unknown(String),
}

impl ComponentType {
    /// 카탈로그가 알고 있는 모든 컴포넌트 종류 (팔레트 순서)
    pub const KNOWN: [ComponentType; 17] = [
        ComponentType::WebApplication,
        ComponentType::MobileApp,
        ComponentType::ApiGateway,
        ComponentType::Database,
        ComponentType::Cache,
        ComponentType::MessageQueue,
        ComponentType::ExternalService,
        ComponentType::UserActor,
        ComponentType::TrustBoundary,
        ComponentType::LoadBalancer,
        ComponentType::Dns,
        ComponentType::FileStorage,
        ComponentType::Cdn,
        ComponentType::AuthService,
        ComponentType::EmailService,
        ComponentType::SearchService,
        ComponentType::LoggingService,
    ];

    /// 직렬화에 쓰이는 camelCase 식별자를 반환합니다.
    pub fn as_str(&self) -> &str {
        match self {
            Self::WebApplication => "webApplication",
            Self::MobileApp => "mobileApp",
            Self::ApiGateway => "apiGateway",
            Self::Database => "database",
            Self::Cache => "cache",
            Self::MessageQueue => "messageQueue",
            Self::ExternalService => "externalService",
            Self::UserActor => "userActor",
            Self::TrustBoundary => "trustBoundary",
            Self::LoadBalancer => "loadBalancer",
            Self::Dns => "dns",
            Self::FileStorage => "fileStorage",
            Self::Cdn => "cdn",
            Self::AuthService => "authService",
            Self::EmailService => "emailService",
            Self::SearchService => "searchService",
            Self::LoggingService => "loggingService",
            Self::Unknown(raw) => raw,
        }
    }

    /// 문자열에서 컴포넌트 종류를 파싱합니다.
    ///
    /// 실패하지 않습니다. 모르는 값은 `Unknown`으로 감쌉니다.
    pub fn parse(s: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Self::Unknown(s.to_owned()))
    }

    /// 카탈로그에 정의된 종류인지 여부
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// 신뢰 경계 노드인지 여부
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::TrustBoundary)
    }
}

impl From<String> for ComponentType {
    fn from(raw: String) -> Self {
        match Self::parse(&raw) {
            Self::Unknown(_) => Self::Unknown(raw),
            known => known,
        }
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        match value {
            ComponentType::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 컴포넌트 분류 (팔레트 그룹)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    /// 애플리케이션
    Application,
    /// 인프라스트럭처
    Infrastructure,
    /// 외부 요소
    External,
    /// 경계
    Boundary,
}

impl ComponentCategory {
    /// 팔레트 그룹 표시 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Application => "Applications",
            Self::Infrastructure => "Infrastructure",
            Self::External => "External",
            Self::Boundary => "Boundaries",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// STRIDE 위협 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrideCategory {
    /// 위장
    Spoofing,
    /// 변조
    Tampering,
    /// 부인
    Repudiation,
    /// 정보 노출
    InformationDisclosure,
    /// 서비스 거부
    DenialOfService,
    /// 권한 상승
    ElevationOfPrivilege,
}

impl StrideCategory {
    /// 전체 분류 (STRIDE 순서)
    pub const ALL: [StrideCategory; 6] = [
        StrideCategory::Spoofing,
        StrideCategory::Tampering,
        StrideCategory::Repudiation,
        StrideCategory::InformationDisclosure,
        StrideCategory::DenialOfService,
        StrideCategory::ElevationOfPrivilege,
    ];

    /// 직렬화 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spoofing => "spoofing",
            Self::Tampering => "tampering",
            Self::Repudiation => "repudiation",
            Self::InformationDisclosure => "informationDisclosure",
            Self::DenialOfService => "denialOfService",
            Self::ElevationOfPrivilege => "elevationOfPrivilege",
        }
    }

    /// 표시 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spoofing => "Spoofing",
            Self::Tampering => "Tampering",
            Self::Repudiation => "Repudiation",
            Self::InformationDisclosure => "Information Disclosure",
            Self::DenialOfService => "Denial of Service",
            Self::ElevationOfPrivilege => "Elevation of Privilege",
        }
    }

    /// 한 줄 설명
    pub fn description(&self) -> &'static str {
        match self {
            Self::Spoofing => "Pretending to be something or someone other than yourself",
            Self::Tampering => "Modifying data or code without authorization",
            Self::Repudiation => "Claiming to not have performed an action",
            Self::InformationDisclosure => "Exposing information to unauthorized individuals",
            Self::DenialOfService => "Denying or degrading service to users",
            Self::ElevationOfPrivilege => "Gaining capabilities without proper authorization",
        }
    }

    /// 문자열에서 분류를 파싱합니다 (대소문자, 구분자 무시).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "s" | "spoofing" => Some(Self::Spoofing),
            "t" | "tampering" => Some(Self::Tampering),
            "r" | "repudiation" => Some(Self::Repudiation),
            "i" | "informationdisclosure" => Some(Self::InformationDisclosure),
            "d" | "denialofservice" | "dos" => Some(Self::DenialOfService),
            "e" | "elevationofprivilege" | "eop" => Some(Self::ElevationOfPrivilege),
            _ => None,
        }
    }
}

impl fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 심각도 레벨
///
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Info < Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 정보성
    #[default]
    Info,
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 -- 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" | "informational" => Some(Self::Info),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 직렬화 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "Info"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 3단계 등급 (발생 가능성, 영향도)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// 낮음
    Low,
    /// 중간
    Medium,
    /// 높음
    High,
}

impl Rating {
    /// 위험 점수 계산용 가중치 (low=1, medium=2, high=3)
    pub fn weight(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// 공격 트리에 쓰이는 발생 확률 (high=0.7, medium=0.4, low=0.1)
    pub fn probability(&self) -> f64 {
        match self {
            Self::High => 0.7,
            Self::Medium => 0.4,
            Self::Low => 0.1,
        }
    }

    /// 직렬화 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// 문자열에서 등급을 파싱합니다 (대소문자 무시).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "med" | "m" => Some(Self::Medium),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 완화책 우선순위 (1 = 가장 높음, 5 = 가장 낮음)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// 허용 최솟값
    pub const MIN: u8 = 1;
    /// 허용 최댓값
    pub const MAX: u8 = 5;

    /// 범위를 검증하여 우선순위를 생성합니다.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// 원시 값
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "priority must be {}-{}, got {value}",
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// 완화책 구현 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MitigationStatus {
    /// 구현 완료
    Implemented,
    /// 계획됨
    Planned,
    /// 미구현
    #[default]
    NotImplemented,
}

impl MitigationStatus {
    /// 직렬화 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implemented => "implemented",
            Self::Planned => "planned",
            Self::NotImplemented => "not-implemented",
        }
    }

    /// 문자열에서 상태를 파싱합니다 (대소문자, `_`/`-` 무시).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "implemented" | "done" => Some(Self::Implemented),
            "planned" => Some(Self::Planned),
            "not-implemented" | "notimplemented" | "none" => Some(Self::NotImplemented),
            _ => None,
        }
    }
}

impl fmt::Display for MitigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 통제 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    /// 예방 통제
    Preventive,
    /// 탐지 통제
    Detective,
    /// 교정 통제
    Corrective,
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preventive => write!(f, "preventive"),
            Self::Detective => write!(f, "detective"),
            Self::Corrective => write!(f, "corrective"),
        }
    }
}

/// 컴포넌트 신뢰 수준
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrustLevel {
    /// 신뢰
    Trusted,
    /// 비신뢰
    Untrusted,
    /// 부분 신뢰 (새 노드 기본값)
    #[default]
    SemiTrusted,
}

/// 데이터 분류 등급
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataClassification {
    /// 공개
    Public,
    /// 내부용 (새 노드 기본값)
    #[default]
    Internal,
    /// 기밀
    Confidential,
    /// 제한
    Restricted,
}

/// 위협 레코드
///
/// `mitigation_ids`는 같은 노드의 완화책을 id로만 가리키는 약한 참조입니다.
/// 완화책이 삭제되어도 자동으로 정리되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    /// 위협 ID
    pub id: String,
    /// STRIDE 분류
    pub category: StrideCategory,
    /// 제목
    pub title: String,
    /// 상세 설명
    pub description: String,
    /// 심각도
    pub severity: Severity,
    /// 발생 가능성
    pub likelihood: Rating,
    /// 영향도
    pub impact: Rating,
    /// 공격 벡터 (있을 경우)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_vector: Option<String>,
    /// CWE ID (예: CWE-79)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwe_id: Option<String>,
    /// 연결된 완화책 ID 목록
    #[serde(default, deserialize_with = "null_as_default")]
    pub mitigation_ids: Vec<String>,
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}, {})",
            self.severity,
            self.title,
            self.category,
            self.cwe_id.as_deref().unwrap_or("no CWE"),
        )
    }
}

/// 완화책 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mitigation {
    /// 완화책 ID
    pub id: String,
    /// 제목
    pub title: String,
    /// 상세 설명
    pub description: String,
    /// 우선순위 (1-5)
    pub priority: Priority,
    /// 구현 상태
    pub status: MitigationStatus,
    /// 통제 유형
    pub control_type: ControlType,
    /// NIST SP 800-53 통제 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nist_control: Option<String>,
    /// OWASP ASVS 권고
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owasp_recommendation: Option<String>,
}

impl Mitigation {
    /// 구현 완료 여부
    pub fn is_implemented(&self) -> bool {
        self.status == MitigationStatus::Implemented
    }
}

impl fmt::Display for Mitigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ({})",
            self.priority, self.status, self.title, self.control_type,
        )
    }
}
