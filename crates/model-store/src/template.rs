//! 아키텍처 템플릿 배치
//!
//! 템플릿의 상대 좌표를 간격 배율만큼 넓히고, 넓힌 경계 상자의 중심이
//! 드롭 지점에 오도록 평행 이동합니다.
//!
//! ```text
//! center       = (min + max) / 2
//! scaledCenter = min + (center - min) * scale
//! offset       = drop - scaledCenter
//! placed       = min + (pos - min) * scale + offset
//! ```
//!
//! 신뢰 경계는 자기 사각형들의 경계 상자로 같은 계산을 하며, 컴포넌트보다 먼저
//! 삽입되어 뒤에 그려집니다. 전체 배치는 하나의 스냅샷으로 커밋됩니다.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use threatforge_core::diagram::Position;
use threatforge_core::metrics as m;
use threatforge_core::types::ComponentType;
use threatforge_engine::Catalog;

use crate::error::StoreError;
use crate::store::{Handles, ModelSnapshot, ThreatModelStore, new_edge, new_node};

/// 경계 노드 라벨
pub const BOUNDARY_LABEL: &str = "Trust Boundary";

/// 템플릿 배치 결과
#[derive(Debug, Clone)]
pub struct PlacedTemplate {
    /// 템플릿 컴포넌트 순서대로의 새 노드 id
    pub component_ids: Vec<String>,
    /// 새 신뢰 경계 노드 id
    pub boundary_ids: Vec<String>,
    /// 새 엣지 id
    pub edge_ids: Vec<String>,
    /// 커밋된 스냅샷
    pub snapshot: Arc<ModelSnapshot>,
}

/// 경계 상자를 드롭 지점 중심으로 배치하는 변환
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    anchor: Position,
    scale: f64,
    offset: Position,
}

impl Placement {
    /// 경계 상자 `(min, max)`를 `scale`배 넓혀 `drop`에 중심을 맞춥니다.
    pub fn centered(bounds: (Position, Position), scale: f64, drop: Position) -> Self {
        let (min, max) = bounds;
        let center = Position::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        let scaled_center = Position::new(
            min.x + (center.x - min.x) * scale,
            min.y + (center.y - min.y) * scale,
        );
        Self {
            anchor: min,
            scale,
            offset: Position::new(drop.x - scaled_center.x, drop.y - scaled_center.y),
        }
    }

    /// 템플릿 좌표를 캔버스 좌표로 변환합니다.
    pub fn apply(&self, pos: Position) -> Position {
        Position::new(
            self.anchor.x + (pos.x - self.anchor.x) * self.scale + self.offset.x,
            self.anchor.y + (pos.y - self.anchor.y) * self.scale + self.offset.y,
        )
    }

    /// 길이를 배율만큼 늘립니다.
    pub fn scale_len(&self, len: f64) -> f64 {
        len * self.scale
    }
}

impl ThreatModelStore {
    /// 템플릿을 드롭 지점에 배치합니다.
    ///
    /// 매번 새 id를 발급하므로 같은 템플릿을 여러 번 배치해도 노드를 공유하지 않습니다.
    pub fn instantiate_template(
        &mut self,
        template_id: &str,
        drop: Position,
    ) -> Result<PlacedTemplate, StoreError> {
        let template = Catalog::global()
            .template(template_id)
            .ok_or_else(|| StoreError::UnknownTemplate(template_id.to_owned()))?;
        let scale = self.config().spacing_multiplier;
        let drop = drop.finite_or_origin();

        let mut boundaries = Vec::with_capacity(template.trust_boundaries.len());
        if let Some(bounds) = template.boundary_bounds() {
            let placement = Placement::centered(bounds, scale, drop);
            for rect in template.trust_boundaries {
                let mut node =
                    new_node(ComponentType::TrustBoundary, placement.apply(rect.position));
                node.data.label = BOUNDARY_LABEL.to_owned();
                node.width = Some(placement.scale_len(rect.width));
                node.height = Some(placement.scale_len(rect.height));
                boundaries.push(node);
            }
        }

        let mut components = Vec::with_capacity(template.components.len());
        if let Some(bounds) = template.component_bounds() {
            let placement = Placement::centered(bounds, scale, drop);
            for component in template.components {
                components.push(new_node(
                    component.component_type.clone(),
                    placement.apply(component.position),
                ));
            }
        }

        let component_ids: Vec<String> = components.iter().map(|n| n.id.clone()).collect();
        let boundary_ids: Vec<String> = boundaries.iter().map(|n| n.id.clone()).collect();

        let mut edges = Vec::with_capacity(template.edges.len());
        for &(from, to) in template.edges {
            match (component_ids.get(from), component_ids.get(to)) {
                (Some(source), Some(target)) => {
                    edges.push(new_edge(source, target, Handles::default()));
                }
                _ => debug!(
                    template = template.id,
                    from,
                    to,
                    "template edge out of range, skipped"
                ),
            }
        }
        let edge_ids: Vec<String> = edges.iter().map(|e| e.id.clone()).collect();

        let mut next = ModelSnapshot::clone(&self.snapshot());
        next.nodes.extend(boundaries);
        next.nodes.extend(components);
        next.edges.extend(edges);
        let snapshot = self.commit(next);

        counter!(m::STORE_TEMPLATES_INSTANTIATED_TOTAL, m::LABEL_TEMPLATE => template.id)
            .increment(1);
        counter!(m::STORE_NODES_CREATED_TOTAL)
            .increment((component_ids.len() + boundary_ids.len()) as u64);
        counter!(m::STORE_EDGES_CREATED_TOTAL).increment(edge_ids.len() as u64);
        info!(
            template = template.id,
            drop = %drop,
            components = component_ids.len(),
            boundaries = boundary_ids.len(),
            edges = edge_ids.len(),
            "template instantiated"
        );

        Ok(PlacedTemplate {
            component_ids,
            boundary_ids,
            edge_ids,
            snapshot,
        })
    }
}
