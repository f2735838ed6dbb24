//! 카탈로그 -- 읽기 전용 참조 데이터
//!
//! [`Catalog`]는 프로세스당 한 번 생성되며 ([`Catalog::global`]), 이후 변경되지 않습니다.
//!
//! # 구성
//!
//! - 컴포넌트 정의 (팔레트)
//! - 컴포넌트 종류별 기본 위협 템플릿
//! - STRIDE 분류별 기본 완화책 템플릿
//! - 아키텍처 템플릿
//!
//! # 인덱싱
//!
//! 컴포넌트 종류와 템플릿 id로 O(1) 조회할 수 있도록 HashMap 인덱스를 둡니다.

pub mod components;
pub mod mitigations;
pub mod templates;
pub mod threats;

use std::collections::HashMap;
use std::sync::OnceLock;

use threatforge_core::types::{ComponentCategory, ComponentType, StrideCategory};

pub use components::{ComponentDefinition, default_label};
pub use mitigations::MitigationTemplate;
pub use templates::{ArchitectureTemplate, BoundaryRect, TemplateComponent};
pub use threats::ThreatTemplate;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// 정적 카탈로그
pub struct Catalog {
    /// 팔레트 순서의 컴포넌트 정의
    components: Vec<ComponentDefinition>,
    /// 컴포넌트 종류 -> `components` 인덱스
    component_index: HashMap<ComponentType, usize>,
    /// 템플릿 id -> `TEMPLATES` 인덱스
    template_index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// 프로세스 전역 카탈로그를 반환합니다.
    pub fn global() -> &'static Catalog {
        CATALOG.get_or_init(Catalog::build)
    }

    fn build() -> Self {
        let components = components::definitions();
        let component_index = components
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.component_type.clone(), idx))
            .collect();
        let template_index = templates::TEMPLATES
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.id, idx))
            .collect();

        tracing::debug!(
            components = components.len(),
            templates = templates::TEMPLATES.len(),
            "catalog built"
        );

        Self {
            components,
            component_index,
            template_index,
        }
    }

    /// 전체 컴포넌트 정의 (팔레트 순서)
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    /// 컴포넌트 종류의 정의
    ///
    /// 알 수 없는 종류는 `None`입니다.
    pub fn component(&self, component_type: &ComponentType) -> Option<&ComponentDefinition> {
        self.component_index
            .get(component_type)
            .and_then(|&idx| self.components.get(idx))
    }

    /// 분류에 속하는 컴포넌트 정의
    pub fn components_in(
        &self,
        category: ComponentCategory,
    ) -> impl Iterator<Item = &ComponentDefinition> {
        self.components
            .iter()
            .filter(move |def| def.category == category)
    }

    /// 컴포넌트 종류의 기본 위협 템플릿
    pub fn threat_templates(&self, component_type: &ComponentType) -> &'static [ThreatTemplate] {
        threats::for_component(component_type)
    }

    /// STRIDE 분류의 기본 완화책 템플릿
    pub fn mitigation_templates(&self, category: StrideCategory) -> &'static [MitigationTemplate] {
        mitigations::for_category(category)
    }

    /// 전체 아키텍처 템플릿
    pub fn templates(&self) -> &'static [ArchitectureTemplate] {
        templates::TEMPLATES
    }

    /// id로 아키텍처 템플릿을 찾습니다.
    pub fn template(&self, id: &str) -> Option<&'static ArchitectureTemplate> {
        self.template_index
            .get(id)
            .and_then(|&idx| templates::TEMPLATES.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_returns_same_instance() {
        let a = Catalog::global() as *const Catalog;
        let b = Catalog::global() as *const Catalog;
        assert_eq!(a, b);
    }

    #[test]
    fn component_lookup_by_type() {
        let catalog = Catalog::global();
        let def = catalog.component(&ComponentType::Database).unwrap();
        assert_eq!(def.name, "Database");
        assert_eq!(def.category, ComponentCategory::Infrastructure);
        assert!(
            catalog
                .component(&ComponentType::Unknown("mainframe".to_owned()))
                .is_none()
        );
    }

    #[test]
    fn declared_categories_cover_template_categories() {
        let catalog = Catalog::global();
        for def in catalog.components() {
            for template in catalog.threat_templates(&def.component_type) {
                assert!(
                    def.default_threats.contains(&template.category),
                    "{} declares no {} but has template '{}'",
                    def.component_type,
                    template.category,
                    template.title
                );
            }
        }
    }

    #[test]
    fn template_lookup_by_id() {
        let catalog = Catalog::global();
        assert_eq!(catalog.template("threeTier").unwrap().name, "Three-Tier Application");
        assert!(catalog.template("monolith").is_none());
    }

    #[test]
    fn components_in_boundary_category() {
        let boundaries: Vec<_> = Catalog::global()
            .components_in(ComponentCategory::Boundary)
            .collect();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].component_type, ComponentType::TrustBoundary);
    }
}
