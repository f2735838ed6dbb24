//! 컴포넌트 정의 -- 팔레트에 표시되는 컴포넌트 종류별 메타데이터

use serde::Serialize;

use threatforge_core::types::{ComponentCategory, ComponentType, StrideCategory};

/// 컴포넌트 정의
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// 컴포넌트 종류
    #[serde(rename = "id")]
    pub component_type: ComponentType,
    /// 표시 이름
    pub name: &'static str,
    /// 아이콘 이름
    pub icon: &'static str,
    /// 설명
    pub description: &'static str,
    /// 팔레트 분류
    pub category: ComponentCategory,
    /// 이 종류에 해당하는 STRIDE 분류
    pub default_threats: &'static [StrideCategory],
}

use StrideCategory::{
    DenialOfService as D, ElevationOfPrivilege as E, InformationDisclosure as I,
    Repudiation as R, Spoofing as S, Tampering as T,
};

/// 팔레트 순서의 전체 정의
pub(crate) fn definitions() -> Vec<ComponentDefinition> {
    vec![
        // Applications
        def(
            ComponentType::WebApplication,
            "Web Application",
            "Globe",
            "Browser-based web application",
            ComponentCategory::Application,
            &[S, T, R, I, D, E],
        ),
        def(
            ComponentType::MobileApp,
            "Mobile App",
            "Smartphone",
            "iOS or Android mobile application",
            ComponentCategory::Application,
            &[S, T, R, I, E],
        ),
        def(
            ComponentType::ApiGateway,
            "API Gateway",
            "Workflow",
            "API gateway or reverse proxy",
            ComponentCategory::Application,
            &[S, T, D, E],
        ),
        def(
            ComponentType::AuthService,
            "Auth Service",
            "KeyRound",
            "Identity provider or authentication service",
            ComponentCategory::Application,
            &[S, R, E],
        ),
        // Infrastructure
        def(
            ComponentType::Database,
            "Database",
            "Database",
            "SQL or NoSQL database",
            ComponentCategory::Infrastructure,
            &[T, I, D],
        ),
        def(
            ComponentType::Cache,
            "Cache",
            "HardDrive",
            "In-memory cache (Redis, Memcached)",
            ComponentCategory::Infrastructure,
            &[T, I, D],
        ),
        def(
            ComponentType::MessageQueue,
            "Message Queue",
            "MessagesSquare",
            "Message broker (RabbitMQ, Kafka)",
            ComponentCategory::Infrastructure,
            &[T, R, I, D],
        ),
        def(
            ComponentType::LoadBalancer,
            "Load Balancer",
            "Network",
            "Layer 4/7 load balancer",
            ComponentCategory::Infrastructure,
            &[S, I, D],
        ),
        def(
            ComponentType::Dns,
            "DNS",
            "Signpost",
            "DNS resolver or authoritative zone",
            ComponentCategory::Infrastructure,
            &[S, T, D],
        ),
        def(
            ComponentType::FileStorage,
            "File Storage",
            "FolderOpen",
            "Object or file storage (S3, GCS, NFS)",
            ComponentCategory::Infrastructure,
            &[T, R, I],
        ),
        def(
            ComponentType::Cdn,
            "CDN",
            "Zap",
            "Content delivery network edge",
            ComponentCategory::Infrastructure,
            &[T, I, D],
        ),
        def(
            ComponentType::SearchService,
            "Search Service",
            "Search",
            "Search engine (Elasticsearch, OpenSearch)",
            ComponentCategory::Infrastructure,
            &[T, I, D],
        ),
        def(
            ComponentType::LoggingService,
            "Logging Service",
            "ScrollText",
            "Log aggregation and audit service",
            ComponentCategory::Infrastructure,
            &[T, R, I],
        ),
        // External
        def(
            ComponentType::ExternalService,
            "External Service",
            "Cloud",
            "Third-party API or service",
            ComponentCategory::External,
            &[S, T, I, D],
        ),
        def(
            ComponentType::EmailService,
            "Email Service",
            "Mail",
            "Transactional email provider",
            ComponentCategory::External,
            &[S, I],
        ),
        def(
            ComponentType::UserActor,
            "User/Actor",
            "User",
            "Human user or automated actor",
            ComponentCategory::External,
            &[S, R, E],
        ),
        // Boundaries
        def(
            ComponentType::TrustBoundary,
            "Trust Boundary",
            "Shield",
            "Security or network boundary",
            ComponentCategory::Boundary,
            &[],
        ),
    ]
}

fn def(
    component_type: ComponentType,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    category: ComponentCategory,
    default_threats: &'static [StrideCategory],
) -> ComponentDefinition {
    ComponentDefinition {
        component_type,
        name,
        icon,
        description,
        category,
        default_threats,
    }
}

/// 새 노드의 기본 라벨
///
/// 알 수 없는 종류는 원문 문자열을 그대로 사용합니다.
pub fn default_label(component_type: &ComponentType) -> String {
    let label = match component_type {
        ComponentType::WebApplication => "Web Application",
        ComponentType::MobileApp => "Mobile App",
        ComponentType::ApiGateway => "API Gateway",
        ComponentType::Database => "Database",
        ComponentType::Cache => "Cache",
        ComponentType::MessageQueue => "Message Queue",
        ComponentType::ExternalService => "External Service",
        ComponentType::UserActor => "User",
        ComponentType::TrustBoundary => "Trust Boundary",
        ComponentType::LoadBalancer => "Load Balancer",
        ComponentType::Dns => "DNS",
        ComponentType::FileStorage => "File Storage",
        ComponentType::Cdn => "CDN",
        ComponentType::AuthService => "Auth Service",
        ComponentType::EmailService => "Email Service",
        ComponentType::SearchService => "Search Service",
        ComponentType::LoggingService => "Logging Service",
        ComponentType::Unknown(raw) => raw.as_str(),
    };
    label.to_owned()
}
