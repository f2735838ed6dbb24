//! 아키텍처 템플릿 -- 미리 구성된 컴포넌트/엣지/신뢰 경계 레이아웃
//!
//! 위치는 템플릿 내부의 상대 좌표입니다. 캔버스에 놓일 때
//! 배율과 오프셋이 적용됩니다. 엣지는 `components`의 인덱스 쌍입니다.

use serde::Serialize;

use threatforge_core::diagram::Position;
use threatforge_core::types::ComponentType;

/// 템플릿 구성 컴포넌트
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub position: Position,
}

/// 신뢰 경계 사각형
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoundaryRect {
    pub position: Position,
    pub width: f64,
    pub height: f64,
}

/// 아키텍처 템플릿
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// 팔레트 분류 (예: "Classic")
    pub category: &'static str,
    pub components: &'static [TemplateComponent],
    /// `(source, target)` 인덱스 쌍
    pub edges: &'static [(usize, usize)],
    pub trust_boundaries: &'static [BoundaryRect],
}

impl ArchitectureTemplate {
    /// 컴포넌트 위치의 경계 상자 `(min, max)`
    ///
    /// 컴포넌트가 없으면 `None`입니다.
    pub fn component_bounds(&self) -> Option<(Position, Position)> {
        bounds(self.components.iter().map(|c| c.position))
    }

    /// 신뢰 경계 사각형 전체를 덮는 경계 상자 `(min, max)`
    pub fn boundary_bounds(&self) -> Option<(Position, Position)> {
        bounds(self.trust_boundaries.iter().flat_map(|b| {
            [
                b.position,
                Position::new(b.position.x + b.width, b.position.y + b.height),
            ]
        }))
    }
}

/// 좌표 집합의 경계 상자
pub fn bounds(points: impl IntoIterator<Item = Position>) -> Option<(Position, Position)> {
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((
            Position::new(min.x.min(p.x), min.y.min(p.y)),
            Position::new(max.x.max(p.x), max.y.max(p.y)),
        )),
    })
}

const fn c(component_type: ComponentType, x: f64, y: f64) -> TemplateComponent {
    TemplateComponent {
        component_type,
        position: Position::new(x, y),
    }
}

const fn b(x: f64, y: f64, width: f64, height: f64) -> BoundaryRect {
    BoundaryRect {
        position: Position::new(x, y),
        width,
        height,
    }
}

use ComponentType::{
    ApiGateway, Cache, Database, ExternalService, MessageQueue, MobileApp, UserActor,
    WebApplication,
};

pub(crate) const TEMPLATES: &[ArchitectureTemplate] = &[
    ArchitectureTemplate {
        id: "restApi",
        name: "REST API Service",
        description: "Standard REST API with database and cache",
        icon: "Workflow",
        category: "Full Stack",
        components: &[
            c(UserActor, 400.0, 50.0),
            c(ApiGateway, 400.0, 180.0),
            c(WebApplication, 200.0, 350.0),
            c(Database, 400.0, 450.0),
            c(Cache, 600.0, 450.0),
            c(ExternalService, 750.0, 180.0),
        ],
        edges: &[(0, 1), (1, 2), (2, 3), (2, 4), (2, 5)],
        trust_boundaries: &[b(100.0, 130.0, 600.0, 400.0)],
    },
    ArchitectureTemplate {
        id: "microservices",
        name: "Microservices",
        description: "Distributed microservices with message queue",
        icon: "MessagesSquare",
        category: "Distributed",
        components: &[
            c(UserActor, 400.0, 50.0),
            c(ApiGateway, 400.0, 150.0),
            c(WebApplication, 150.0, 300.0),
            c(WebApplication, 400.0, 300.0),
            c(WebApplication, 650.0, 300.0),
            c(MessageQueue, 400.0, 450.0),
            c(Database, 150.0, 550.0),
            c(Database, 400.0, 550.0),
            c(Database, 650.0, 550.0),
            c(Cache, 400.0, 650.0),
        ],
        edges: &[
            (0, 1),
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 5),
            (3, 5),
            (4, 5),
            (2, 6),
            (3, 7),
            (4, 8),
            (3, 9),
        ],
        trust_boundaries: &[
            b(80.0, 240.0, 250.0, 480.0),
            b(330.0, 240.0, 250.0, 480.0),
            b(580.0, 240.0, 250.0, 480.0),
        ],
    },
    ArchitectureTemplate {
        id: "mobileBackend",
        name: "Mobile Backend",
        description: "Mobile app with backend services",
        icon: "Smartphone",
        category: "Mobile",
        components: &[
            c(MobileApp, 400.0, 50.0),
            c(ApiGateway, 400.0, 180.0),
            c(WebApplication, 250.0, 350.0),
            c(Database, 400.0, 450.0),
            c(ExternalService, 600.0, 250.0),
        ],
        edges: &[(0, 1), (1, 2), (2, 3), (2, 4)],
        trust_boundaries: &[b(200.0, 130.0, 400.0, 400.0)],
    },
    ArchitectureTemplate {
        id: "threeTier",
        name: "Three-Tier Application",
        description: "Classic three-tier architecture",
        icon: "Database",
        category: "Classic",
        components: &[
            c(UserActor, 400.0, 30.0),
            c(WebApplication, 400.0, 150.0),
            c(ApiGateway, 400.0, 280.0),
            c(Database, 400.0, 450.0),
        ],
        edges: &[(0, 1), (1, 2), (2, 3)],
        trust_boundaries: &[b(150.0, 100.0, 500.0, 100.0), b(150.0, 230.0, 500.0, 280.0)],
    },
    ArchitectureTemplate {
        id: "eventDriven",
        name: "Event-Driven Architecture",
        description: "Services communicating via events",
        icon: "Cloud",
        category: "Async",
        components: &[
            c(UserActor, 100.0, 50.0),
            c(WebApplication, 100.0, 150.0),
            c(MessageQueue, 300.0, 150.0),
            c(WebApplication, 500.0, 150.0),
            c(Database, 500.0, 350.0),
            c(Cache, 300.0, 350.0),
            c(ExternalService, 650.0, 150.0),
        ],
        edges: &[(0, 1), (1, 2), (2, 3), (3, 4), (1, 5), (3, 6)],
        trust_boundaries: &[b(30.0, 90.0, 200.0, 200.0), b(430.0, 90.0, 300.0, 200.0)],
    },
    ArchitectureTemplate {
        id: "saasPlatform",
        name: "SaaS Platform",
        description: "Multi-tenant SaaS with shared services",
        icon: "HardDrive",
        category: "Enterprise",
        components: &[
            c(UserActor, 100.0, 50.0),
            c(UserActor, 300.0, 50.0),
            c(UserActor, 500.0, 50.0),
            c(ApiGateway, 300.0, 150.0),
            c(WebApplication, 100.0, 280.0),
            c(WebApplication, 300.0, 280.0),
            c(WebApplication, 500.0, 280.0),
            c(Database, 300.0, 420.0),
            c(Cache, 500.0, 420.0),
            c(MessageQueue, 100.0, 420.0),
            c(ExternalService, 650.0, 200.0),
        ],
        edges: &[
            (0, 3),
            (1, 3),
            (2, 3),
            (3, 4),
            (3, 5),
            (3, 6),
            (4, 9),
            (5, 7),
            (6, 8),
            (5, 10),
        ],
        trust_boundaries: &[
            b(30.0, 220.0, 240.0, 280.0),
            b(280.0, 220.0, 240.0, 280.0),
            b(530.0, 220.0, 240.0, 280.0),
        ],
    },
];
